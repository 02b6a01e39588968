//! The `ungzip` command-line tool: decompress `file.gz` into `file`.

use std::env;
use std::fs::{self, File};
use std::process::ExitCode;

use log::debug;

fn usage() {
    println!("Usage: ungzip filename.gz");
    println!("       ungzip -h");
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        usage();
        return ExitCode::FAILURE;
    }
    if args[1] == "-h" {
        usage();
        return ExitCode::SUCCESS;
    }

    let filename = &args[1];
    let output_name = match filename.strip_suffix(".gz") {
        Some(stem) if !stem.is_empty() => stem,
        _ => {
            eprintln!("Expecting filename with .gz extension");
            return ExitCode::FAILURE;
        }
    };

    let input = match fs::read(filename) {
        Ok(input) => input,
        Err(err) => {
            eprintln!("Failed to read {filename} into memory: {err}");
            return ExitCode::FAILURE;
        }
    };
    debug!("read {} compressed bytes from {filename}", input.len());

    let mut output = match File::create(output_name) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Failed to open {output_name} to write to: {err}");
            return ExitCode::FAILURE;
        }
    };

    match ungzip::gzip::decompress(&input, &mut output) {
        Ok(()) => {
            println!("Successfully decompressed into {output_name}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            // Don't leave a partial output file behind.
            drop(output);
            if let Err(remove_err) = fs::remove_file(output_name) {
                eprintln!("Failed to remove {output_name}: {remove_err}");
            }
            eprintln!("Failed to decompress {filename}: {err}");
            ExitCode::FAILURE
        }
    }
}
