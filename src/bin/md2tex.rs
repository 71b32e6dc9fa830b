//! md2tex: interactive Markdown to LaTeX converter.
//!
//! A line-oriented REPL: `convert <input.md> [output.tex]` converts a file,
//! resolves its footnote citations against the registered bibliographic
//! sources, and writes the accepted records to a BibTeX file.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use markdown_latex::{
    bibtex, convert_file, resolve, BibSource, ConsoleChooser, CrossRefSource, Error,
    GoogleScholarSource,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    println!("Welcome to the Markdown to LaTeX converter!");
    print_usage();

    let stdin = io::stdin();
    loop {
        print!("\n> ");
        let _ = io::stdout().flush();

        let mut command = String::new();
        match stdin.lock().read_line(&mut command) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let args = split_command(command.trim());
        let Some(first) = args.first() else { continue };

        match first.as_str() {
            "exit" | "quit" => {
                println!("Exiting. Goodbye!");
                break;
            }
            "help" => print_usage(),
            "convert" => {
                if args.len() < 2 {
                    println!("Error: Missing input file. Usage: convert <input_file> [output_file]");
                    continue;
                }
                let input = Path::new(&args[1]);
                let output = args.get(2).map(PathBuf::from);
                run_convert(input, output);
            }
            other => {
                println!("Unknown command: {}", other);
                println!("Type 'help' for available commands.");
            }
        }
    }
}

fn print_usage() {
    println!("\n===== Markdown to LaTeX Converter =====");
    println!("Available commands:");
    println!("  1. convert <input_markdown_file> [output_latex_file]");
    println!("     - Convert a markdown file to LaTeX");
    println!("     - Without an output file, output goes to <input_file_name>.tex");
    println!("  2. help");
    println!("     - Display this help message");
    println!("  3. exit");
    println!("     - Exit the program");
    println!("======================================");
}

/// Split a command line into arguments, honoring double quotes so paths
/// with spaces survive.
fn split_command(command: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in command.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ' ' if !in_quotes => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        args.push(current);
    }

    args
}

/// Default output path: the input path with a `.tex` extension.
fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("tex")
}

fn run_convert(input: &Path, output: Option<PathBuf>) {
    let converted = match convert_file(input) {
        Ok(converted) => converted,
        Err(Error::Io(e)) => {
            eprintln!("Error: Cannot open input file {}: {}", input.display(), e);
            return;
        }
        Err(e) => {
            eprintln!("Error: Conversion failed: {}", e);
            return;
        }
    };

    let output = output.unwrap_or_else(|| default_output_path(input));
    if let Err(e) = std::fs::write(&output, &converted.latex) {
        eprintln!("Error: Cannot write output file {}: {}", output.display(), e);
        return;
    }
    println!("Conversion successful. LaTeX content written to {}", output.display());

    if converted.definitions.is_empty() {
        return;
    }

    let sources: Vec<Box<dyn BibSource>> = vec![
        Box::new(CrossRefSource::new()),
        Box::new(GoogleScholarSource::new()),
    ];
    let mut chooser = ConsoleChooser;
    let records = resolve(&converted.definitions, &sources, &mut chooser);

    let bib_path = converted
        .metadata
        .bibliography
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            output
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join("references.bib")
        });

    match bibtex::save_bibliography(&records, &bib_path) {
        Ok(()) => println!("BibTeX file saved: {}", bib_path.display()),
        Err(e) => eprintln!("Error saving BibTeX file: {}", e),
    }
}
