#![no_main]

use libfuzzer_sys::fuzz_target;
use toontab::{parse_str, read_table_str, ParseOptions, TableOptions};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let strict = ParseOptions::default();
    let lenient = ParseOptions {
        strict: false,
        ..ParseOptions::default()
    };
    let _ = parse_str(text, &strict);
    let _ = parse_str(text, &lenient);
    let _ = read_table_str(text, &TableOptions::default());
});
