use std::fs::File;
use std::io::{stdin, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "toontab",
    about = "TOON <-> JSON converter, validator, and inspector",
    version
)]
struct Args {
    /// Encode JSON to TOON (default decodes TOON to JSON)
    #[arg(short, long)]
    encode: bool,

    /// Validate the input and report the first problem, if any
    #[arg(long, conflicts_with_all = ["encode", "format", "peek", "info"])]
    validate: bool,

    /// Re-emit the input as pretty-printed TOON
    #[arg(long)]
    format: bool,

    /// Sort object keys byte-lexicographically (with --format or --encode)
    #[arg(long)]
    canonical: bool,

    /// Spaces per indentation step
    #[arg(long, default_value_t = 2)]
    indent: usize,

    /// Disable strict mode (lenient literals, tabs in indentation)
    #[arg(long)]
    lenient: bool,

    /// Show the first N lines and the top-level shape of a file
    #[arg(long, value_name = "N")]
    peek: Option<usize>,

    /// Count arrays and objects and report tabular structure
    #[arg(long)]
    info: bool,

    /// Pretty-print JSON output (when decoding)
    #[arg(long)]
    pretty: bool,

    /// Input file (defaults to stdin)
    input: Option<PathBuf>,
}

fn read_input(path: &Option<PathBuf>) -> Result<String> {
    let mut buf = String::new();
    match path {
        Some(path) => {
            File::open(path)
                .with_context(|| format!("cannot open {}", path.display()))?
                .read_to_string(&mut buf)?;
        }
        None => {
            stdin().read_to_string(&mut buf)?;
        }
    }
    Ok(buf)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let parse_opts = toontab::ParseOptions {
        strict: !args.lenient,
        ..toontab::ParseOptions::default()
    };
    let encode_opts = toontab::EncodeOptions {
        indent: args.indent,
        strict: !args.lenient,
        canonical: args.canonical,
        ..toontab::EncodeOptions::default()
    };

    if let Some(n) = args.peek {
        let Some(path) = &args.input else {
            bail!("--peek requires a file argument");
        };
        let peek = toontab::peek(path, n)?;
        println!("type: {:?}", peek.kind);
        if !peek.first_keys.is_empty() {
            println!("keys: {}", peek.first_keys.join(", "));
        }
        for line in &peek.preview {
            println!("| {line}");
        }
        return Ok(());
    }

    if args.info {
        let Some(path) = &args.input else {
            bail!("--info requires a file argument");
        };
        let info = toontab::info(path, &parse_opts)?;
        println!("arrays: {}", info.array_count);
        println!("objects: {}", info.object_count);
        println!("tabular: {}", info.has_tabular);
        if let Some(rows) = info.declared_rows {
            println!("rows: {rows}");
        }
        return Ok(());
    }

    let buf = read_input(&args.input)?;

    if args.validate {
        let report = toontab::validate_str(&buf, &parse_opts);
        if report.ok {
            println!("ok");
            return Ok(());
        }
        let issue = report.error.expect("failed validation carries an issue");
        if issue.line > 0 {
            bail!("invalid at line {}: {}", issue.line, issue.message);
        }
        bail!("invalid: {}", issue.message);
    }

    if args.format {
        print!("{}", toontab::reformat_str(&buf, &encode_opts)?);
        return Ok(());
    }

    if args.encode {
        let json: serde_json::Value = serde_json::from_str(&buf)?;
        let value = toontab::json::from_json(json);
        print!("{}", toontab::encode(&value, &encode_opts)?);
        return Ok(());
    }

    let value = toontab::parse_str(&buf, &parse_opts)?;
    let json = toontab::json::to_json(&value);
    if args.pretty {
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("{}", serde_json::to_string(&json)?);
    }
    Ok(())
}
