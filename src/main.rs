use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use pile::interpreter::{
    evaluator::core::{DEFAULT_ERROR_FORMAT, Interpreter, Options},
    value::core::Value,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Globals a build script conventionally leaves behind for the build.
const OUTPUTS: &[&str] = &["OUTPUT", "SOURCES", "CFLAGS", "LFLAGS", "LIBRARIES"];

/// pile runs a build script written in Eve and reports the build settings it
/// produced.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The build script to run.
    #[arg(default_value = "Pilefile")]
    file: PathBuf,

    /// Defines a global macro before the script runs, as NAME=VALUE.
    #[arg(short = 'D', value_name = "NAME=VALUE", value_parser = parse_define)]
    define: Vec<(String, String)>,

    /// Prints every global the script left behind.
    #[arg(long)]
    dump: bool,

    /// Layout of error messages; `{file}`, `{line}` and `{message}` are
    /// replaced.
    #[arg(long, value_name = "FMT", default_value = DEFAULT_ERROR_FORMAT)]
    error_format: String,

    /// Logs what the interpreter does.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_define(text: &str) -> Result<(String, String), String> {
    match text.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, found '{text}'")),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("pile=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                                  .with(filter)
                                  .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let options = Options { error_format: args.error_format,
                            ..Options::default() };
    let mut interpreter = Interpreter::new().with_options(options);

    for (name, value) in args.define {
        if let Err(e) = interpreter.define_global(&name, Value::Macro(value)) {
            eprintln!("error: -D {name}: {e}");
            return ExitCode::FAILURE;
        }
    }

    interpreter.read_file(&args.file);

    let names = if args.dump {
        interpreter.global_names()
    } else {
        OUTPUTS.iter().map(ToString::to_string).collect()
    };
    for name in names {
        if let Some(value) = interpreter.global(&name) {
            println!("{name} = {value}");
        }
    }

    if interpreter.error_count() > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
