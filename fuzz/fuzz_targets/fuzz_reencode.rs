#![no_main]

use libfuzzer_sys::fuzz_target;
use toontab::{encode, parse_str, EncodeOptions, ParseOptions};

// Canonical encoding of whatever parses must itself parse, and canonical
// encoding must be a fixed point.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let opts = ParseOptions {
        strict: false,
        ..ParseOptions::default()
    };
    let Ok(value) = parse_str(text, &opts) else {
        return;
    };
    let enc_opts = EncodeOptions {
        strict: false,
        canonical: true,
        ..EncodeOptions::default()
    };
    let encoded = encode(&value, &enc_opts).expect("lenient encoding cannot fail");
    let reparsed = parse_str(&encoded, &opts).expect("encoded output must parse");
    let re_encoded = encode(&reparsed, &enc_opts).expect("lenient encoding cannot fail");
    assert_eq!(encoded, re_encoded);
});
