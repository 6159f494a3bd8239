use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use minic::{analyze, render, Analysis};

/// Lexes and parses C-like sources, writing each syntax tree as a Graphviz DOT file.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Source files, or directories whose `.c` files are all processed
    #[arg(default_value = "samples")]
    inputs: Vec<PathBuf>,

    /// Directory receiving the `<name>_program.dot` files
    #[arg(short, long, value_name = "DIR", default_value = "trees")]
    out_dir: PathBuf,

    /// Do not print the token listing
    #[arg(long)]
    no_tokens: bool,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    execute(&cli)
}

fn execute(cli: &Cli) -> Result<ExitCode> {
    let mut all_clean = true;
    for path in collect_sources(&cli.inputs)? {
        all_clean &= run_file(cli, &path)?;
    }

    Ok(if all_clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Expands directories into their `.c` files, sorted by name.
fn collect_sources(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            sources.push(input.clone());
            continue;
        }

        let mut found = Vec::new();
        let entries = fs::read_dir(input)
            .with_context(|| format!("failed to read directory {}", input.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == "c") {
                found.push(path);
            }
        }
        found.sort();
        sources.extend(found);
    }
    Ok(sources)
}

/// Processes one file. Returns `false` when the file had lexical or syntax errors.
fn run_file(cli: &Cli, path: &Path) -> Result<bool> {
    println!("\n--- Processing: {}", path.display());

    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read input file {}", path.display()))?;
    let analysis = analyze(&source);

    if !cli.no_tokens {
        println!("Tokens:");
        for token in analysis.tokens() {
            println!(
                "  {:8} '{}'  ({}:{})",
                token.kind.name(),
                token.text,
                token.line,
                token.column
            );
        }
    }

    let program = match &analysis {
        Analysis::Parsed { program, .. } => program,
        Analysis::LexFailed { .. } => {
            println!("\nLexical errors:");
            print!("{}", analysis.diagnostics());
            println!("Skipping syntax analysis because of lexical errors.");
            return Ok(false);
        }
        Analysis::ParseFailed { .. } => {
            println!("\nSyntax errors:");
            print!("{}", analysis.diagnostics());
            println!("Skipping tree generation because of syntax errors.");
            return Ok(false);
        }
    };

    println!("\nParse finished. Writing the syntax tree...");
    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("failed to create directory {}", cli.out_dir.display()))?;
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "program".to_string());
    let out = cli.out_dir.join(format!("{}_program.dot", stem));
    fs::write(&out, render::to_dot(program))
        .with_context(|| format!("failed to write {}", out.display()))?;
    tracing::info!(path = %out.display(), "wrote syntax tree");
    println!("Saved: {}", out.display());

    Ok(true)
}
