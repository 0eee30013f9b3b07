//! vane-render – email document JSON → HTML.
//!
//! Usage:
//!   vane-render [input.json|-] [-o output.html] [--fragment] [--lang en]
//!               [--max-depth N] [--max-nodes N]
//!   vane-render --guide
//!
//! Input is read from stdin when omitted or `-`. On failure the error body an
//! HTTP shell would send is printed to stderr and the exit code is 1.

use std::io::{self, Read};
use std::{env, fs, path::PathBuf, process};

use vane_email::{
    component_guide, render_document_with, render_node_with, Document, EmailError, RenderOptions,
};

fn print_usage(program: &str) {
    eprintln!("Usage: {program} [input.json|-] [-o output.html] [--fragment] [--lang L] [--max-depth N] [--max-nodes N]");
    eprintln!("       {program} --guide");
}

fn parse_limit(flag: &str, value: Option<&String>, program: &str) -> usize {
    match value.and_then(|v| v.parse().ok()) {
        Some(n) => n,
        None => {
            eprintln!("{flag} expects a positive integer");
            print_usage(program);
            process::exit(1);
        }
    }
}

fn read_input(input: Option<&PathBuf>) -> Result<String, EmailError> {
    let mut json = String::new();
    match input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .map_err(|e| {
                EmailError::ValidationError(format!("Failed to read '{}': {}", path.display(), e))
            }),
        _ => io::stdin()
            .read_to_string(&mut json)
            .map(|_| json)
            .map_err(|e| EmailError::ValidationError(format!("Failed to read stdin: {}", e))),
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("vane-render");

    let mut options = RenderOptions::default();
    let mut input: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;
    let mut fragment = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--guide" => {
                print!("{}", component_guide());
                return;
            }
            "--fragment" | "-f" => fragment = true,
            "-o" | "--output" => match iter.next() {
                Some(path) => output = Some(PathBuf::from(path)),
                None => {
                    eprintln!("{arg} expects a path");
                    process::exit(1);
                }
            },
            "--lang" => match iter.next() {
                Some(lang) => options.lang = lang.clone(),
                None => {
                    eprintln!("--lang expects a language code");
                    process::exit(1);
                }
            },
            "--max-depth" => options.max_depth = parse_limit(arg, iter.next(), program),
            "--max-nodes" => options.max_nodes = parse_limit(arg, iter.next(), program),
            "--help" | "-h" => {
                print_usage(program);
                process::exit(0);
            }
            "-" => input = Some(PathBuf::from("-")),
            other if other.starts_with('-') => {
                eprintln!("Unknown flag: {other}");
                print_usage(program);
                process::exit(1);
            }
            path => {
                if input.is_some() {
                    eprintln!("Unexpected argument: {path}");
                    print_usage(program);
                    process::exit(1);
                }
                input = Some(PathBuf::from(path));
            }
        }
    }

    let result = read_input(input.as_ref())
        .and_then(|json| Document::from_json_with(&json, &options))
        .and_then(|document| {
            if fragment {
                render_node_with(&document.component, &options)
            } else {
                render_document_with(&document, &options)
            }
        });

    let html = match result {
        Ok(html) => html,
        Err(e) => {
            eprintln!("{}", e.response_body());
            process::exit(1);
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = fs::write(&path, html) {
                eprintln!("Error writing '{}': {e}", path.display());
                process::exit(1);
            }
            log::info!("wrote {}", path.display());
        }
        None => println!("{}", html),
    }
}
