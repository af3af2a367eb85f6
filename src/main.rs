use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
    time::Instant,
};

use cimple::{ast::unparse::unparse, check_source, compile_source, display_error, CompileOutput};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Compiler for the cimple language, targeting the SPIM MIPS simulator
#[derive(Parser)]
#[command(name = "cimple")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the cimple source file
    input: PathBuf,

    /// Where to write the assembly, defaults to the input with a `.s` extension
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the annotated program to this file
    #[arg(long, value_name = "FILE")]
    unparse: Option<PathBuf>,

    /// Stop after semantic analysis without generating code
    #[arg(long)]
    check: bool,

    /// Show the offending source line under each diagnostic
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let start = Instant::now();

    let source = match fs::read_to_string(&cli.input) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error: could not read {}: {}", cli.input.display(), error);
            return ExitCode::from(2);
        }
    };

    let result = if cli.check {
        check_source(&source)
    } else {
        compile_source(&source)
    };
    let output = match result {
        Ok(output) => output,
        Err(error) => {
            eprintln!("Internal compiler error: {}", error);
            return ExitCode::from(2);
        }
    };
    info!(elapsed = ?start.elapsed(), "compiled {}", cli.input.display());

    report(&output, &source, cli.verbose);

    if let Some(path) = &cli.unparse {
        if let Some(program) = &output.program {
            if let Err(code) = write_file(path, &unparse(program, Some(&output.symbols))) {
                return code;
            }
        }
    }

    if !output.succeeded() {
        return ExitCode::from(1);
    }

    if let Some(assembly) = &output.assembly {
        let path = cli
            .output
            .clone()
            .unwrap_or_else(|| default_output(&cli.input));
        if let Err(code) = write_file(&path, &assembly.to_string()) {
            return code;
        }
        debug!(lines = assembly.len(), path = %path.display(), "wrote assembly");
    }

    ExitCode::SUCCESS
}

fn report(output: &CompileOutput, source: &str, verbose: bool) {
    for error in &output.diagnostics {
        if verbose {
            eprintln!("{}", display_error(error, source));
        } else {
            eprintln!("{}", error);
        }
    }
}

fn default_output(input: &Path) -> PathBuf {
    input.with_extension("s")
}

fn write_file(path: &Path, contents: &str) -> Result<(), ExitCode> {
    fs::write(path, contents).map_err(|error| {
        eprintln!("Error: could not write {}: {}", path.display(), error);
        ExitCode::from(2)
    })
}
