//! # BASIC to JavaScript
//!
//! Translates a BASIC program and runs it, or opens an interactive prompt
//! when no program is given.

mod term;

use ansi_term::Style;
use anyhow::{bail, Context, Result};
use basic::mach::{self, Sandbox};
use clap::Parser;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const EXAMPLES: &[(&str, &str)] = &[
    ("euler", include_str!("../demos/euler.bas")),
    ("lifegame", include_str!("../demos/lifegame.bas")),
    ("ninedig", include_str!("../demos/ninedig.bas")),
    ("sieve", include_str!("../demos/sieve.bas")),
    ("testpage", include_str!("../demos/testpage.bas")),
    ("testSub", include_str!("../demos/testSub.bas")),
    ("time", include_str!("../demos/time.bas")),
];

/// Translate line-numbered BASIC into JavaScript and run it
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Program text
    #[arg(long, conflicts_with_all = ["file", "example"])]
    input: Option<String>,

    /// Program file, or an http(s) URL to fetch it from
    #[arg(long, value_name = "PATH|URL", conflicts_with = "example")]
    file: Option<String>,

    /// Built-in example program
    #[arg(long, value_name = "NAME")]
    example: Option<String>,

    /// Print the translated script instead of running it
    #[arg(long)]
    compile_only: bool,

    /// Print the names of the built-in examples
    #[arg(long)]
    list_examples: bool,

    /// Raise the log level, repeat for more
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env = env_logger::Env::default()
        .filter_or("BASIC_LOG", level)
        .write_style_or("BASIC_LOG_STYLE", "auto");
    env_logger::init_from_env(env);

    if args.list_examples {
        for (name, _) in EXAMPLES {
            println!("{}", name);
        }
        return Ok(());
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    })
    .context("failed to set Ctrl-C handler")?;

    let source = match source(&args)? {
        Some(source) => source,
        None => {
            term::main(interrupted);
            return Ok(());
        }
    };

    if args.compile_only {
        print_result(&mach::compile(&source));
        return Ok(());
    }
    info!("translated script:\n{}", mach::compile(&source));
    let output = match mach::translate(&source) {
        Ok(program) => Sandbox::new().with_interrupt(interrupted).execute(&program),
        Err(error) => format!("ERROR: {}", error),
    };
    print_result(&output);
    Ok(())
}

fn print_result(text: &str) {
    if text.starts_with("ERROR") {
        println!("{}", Style::new().bold().paint(text));
    } else {
        println!("{}", text);
    }
}

fn source(args: &Args) -> Result<Option<String>> {
    if let Some(input) = &args.input {
        return Ok(Some(input.clone()));
    }
    if let Some(file) = &args.file {
        return fetch(file).map(Some);
    }
    if let Some(name) = &args.example {
        return match EXAMPLES.iter().find(|(example, _)| *example == name.as_str()) {
            Some((_, source)) => Ok(Some(source.to_string())),
            None => bail!("no example named {}; try --list-examples", name),
        };
    }
    Ok(None)
}

fn fetch(location: &str) -> Result<String> {
    if location.starts_with("http://") || location.starts_with("https://") {
        debug!("fetching {}", location);
        let response = reqwest::blocking::get(location)
            .and_then(|response| response.error_for_status())
            .with_context(|| format!("failed to fetch {}", location))?;
        return response
            .text()
            .with_context(|| format!("failed to read {}", location));
    }
    std::fs::read_to_string(location).with_context(|| format!("failed to open {}", location))
}
