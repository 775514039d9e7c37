//! Thin CLI driver: `jpegtool <in>.jpg` decodes to a sibling `.ppm`;
//! `jpegtool <in>.ppm <out>.jpg` encodes. All real logic lives in the
//! library crate; this binary is just argument dispatch.
use std::path::Path;
use std::process::ExitCode;

use baseline_jpeg::{Decoder, Encoder};

fn usage() -> &'static str {
    "usage:\n  jpegtool <path>.jpg|.jpeg        decode to <path>.ppm\n  jpegtool <path>.ppm <path>.jpg   encode\n  jpegtool -h                      print this message"
}

fn main() -> ExitCode {
    env_logger::init();
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.as_slice() {
        [flag] if flag == "-h" || flag == "--help" => {
            println!("{}", usage());
            ExitCode::SUCCESS
        }
        [input] if has_extension(input, &["jpg", "jpeg"]) => decode_to_ppm(input),
        [input, output] if has_extension(input, &["ppm"]) && has_extension(output, &["jpg", "jpeg"]) => {
            encode_from_ppm(input, output)
        }
        _ => {
            eprintln!("{}", usage());
            ExitCode::FAILURE
        }
    }
}

fn has_extension(path: &str, exts: &[&str]) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| exts.iter().any(|want| want.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

fn decode_to_ppm(input: &str) -> ExitCode {
    let mut decoder = Decoder::new();
    let image = match decoder.decode_file(input) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("error decoding {input}: {e}");
            return ExitCode::FAILURE;
        }
    };
    let out_path = Path::new(input).with_extension("ppm");
    if let Err(e) = image.dump_ppm(&out_path) {
        eprintln!("error writing {}: {e}", out_path.display());
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn encode_from_ppm(input: &str, output: &str) -> ExitCode {
    let encoder = Encoder::new();
    if let Err(e) = encoder.encode_ppm_file(input, output) {
        eprintln!("error encoding {input}: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
