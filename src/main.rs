use std::env;
use std::fs;
use std::path::PathBuf;

use tagml::{artifact, diagnostics};

const USAGE: &str = "Usage: tagml <source.xml> [--out <path>] [--run]";

/// Parsed command line configuration. Built once in `main` and passed down;
/// there is no global argument state.
struct Config {
    input: PathBuf,
    output: Option<PathBuf>,
    run: bool,
}

/// Walks the argument list and collects every problem instead of stopping at
/// the first, so one invocation reports everything that is wrong with it.
fn parse_args(args: &[String]) -> Result<Config, Vec<String>> {
    let mut problems = Vec::new();
    let mut input = None;
    let mut output = None;
    let mut run = false;

    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "--out" => {
                index += 1;
                match args.get(index) {
                    Some(path) => output = Some(PathBuf::from(path)),
                    None => problems.push("--out requires a file path".to_string()),
                }
            }
            "--run" => run = true,
            flag if flag.starts_with('-') => {
                problems.push(format!("unknown flag `{}`", flag));
            }
            path => {
                if input.is_none() {
                    input = Some(PathBuf::from(path));
                } else {
                    problems.push(format!("unexpected argument `{}`", path));
                }
            }
        }
        index += 1;
    }

    if input.is_none() {
        problems.push("missing required source file path".to_string());
    }
    match input {
        Some(input) if problems.is_empty() => Ok(Config { input, output, run }),
        _ => Err(problems),
    }
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let config = match parse_args(&args) {
        Ok(config) => config,
        Err(problems) => {
            for problem in &problems {
                eprintln!("Command line error: {}", problem);
            }
            eprintln!("{}", USAGE);
            std::process::exit(1);
        }
    };

    let source = match fs::read_to_string(&config.input) {
        Ok(source) => source,
        Err(error) => {
            diagnostics::report_io_error(&config.input, &error);
            std::process::exit(1);
        }
    };

    let mut exec = match tagml::compile(&source) {
        Ok(exec) => exec,
        Err(error) => {
            diagnostics::report_compile_error(&config.input, &source, &error);
            std::process::exit(1);
        }
    };

    if let Some(path) = &config.output {
        if let Err(error) = artifact::emit(&exec, path) {
            diagnostics::report_artifact_error(&error);
            std::process::exit(1);
        }
    }

    if config.run {
        if let Err(error) = exec.run() {
            diagnostics::report_run_error(&error);
            std::process::exit(1);
        }
    }
}
