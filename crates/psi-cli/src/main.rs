use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use psi_config::PsiConfig;
use psi_java::{Diagnostic, DiagnosticKind, DumpNode, SyntaxTree};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "psi", version, about = "Java syntax tree inspector (parse, roles, check)")]
struct Cli {
    /// TOML config file (`[logging]`, `[assertions]`, `[editing]`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the syntax tree and parse errors of a file
    Parse(FileArgs),
    /// Print every node with its role in the parent
    Roles(FileArgs),
    /// Report parse errors, malformed literals and unresolved references
    Check(FileArgs),
}

#[derive(Args)]
struct FileArgs {
    /// Java source file
    file: PathBuf,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    let config = match &cli.config {
        Some(path) => PsiConfig::load(path)?,
        None => PsiConfig::default(),
    };
    psi_config::init_tracing(&config.logging);
    config.assertions.apply();

    let (args, with_roles) = match &cli.command {
        Command::Parse(args) | Command::Check(args) => (args, false),
        Command::Roles(args) => (args, true),
    };
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let mut tree = SyntaxTree::parse(&text);
    tree.set_settings(config.edit_settings());
    tracing::debug!(file = %args.file.display(), len = text.len(), "parsed");

    match cli.command {
        Command::Parse(_) | Command::Roles(_) => {
            let errors: Vec<Located> = tree
                .parse_errors()
                .iter()
                .map(|e| Located::new(&text, e.message.clone(), e.range.start().into()))
                .collect();
            let exit = if errors.is_empty() { 0 } else { 1 };
            if args.json {
                let output = ParseOutput {
                    tree: tree.dump_node(tree.root(), with_roles),
                    errors,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print!("{}", tree.dump(tree.root(), with_roles));
                for e in &errors {
                    println!("error:{}:{}: {}", e.line, e.column, e.message);
                }
            }
            Ok(exit)
        }
        Command::Check(_) => {
            let diagnostics = tree.diagnostics();
            let report = CheckReport::new(&text, diagnostics);
            let exit = if report.diagnostics.is_empty() { 0 } else { 1 };
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for d in &report.diagnostics {
                    println!(
                        "{}:{}:{}: {} {}",
                        args.file.display(),
                        d.line,
                        d.column,
                        kind_label(d.kind),
                        d.message
                    );
                }
                println!("summary: {} problems", report.summary.problems);
            }
            Ok(exit)
        }
    }
}

fn kind_label(kind: DiagnosticKind) -> &'static str {
    match kind {
        DiagnosticKind::ParseError => "[syntax]",
        DiagnosticKind::LiteralError => "[literal]",
        DiagnosticKind::UnresolvedReference => "[unresolved]",
    }
}

#[derive(Serialize)]
struct ParseOutput {
    tree: DumpNode,
    errors: Vec<Located>,
}

#[derive(Serialize)]
struct Located {
    message: String,
    line: usize,
    column: usize,
}

impl Located {
    fn new(text: &str, message: String, offset: u32) -> Self {
        let (line, column) = line_col(text, offset);
        Located {
            message,
            line,
            column,
        }
    }
}

#[derive(Serialize)]
struct CheckReport {
    diagnostics: Vec<CheckDiagnostic>,
    summary: Summary,
}

#[derive(Serialize)]
struct CheckDiagnostic {
    kind: DiagnosticKind,
    message: String,
    line: usize,
    column: usize,
    start: u32,
    end: u32,
}

#[derive(Serialize)]
struct Summary {
    problems: usize,
}

impl CheckReport {
    fn new(text: &str, diagnostics: Vec<Diagnostic>) -> Self {
        let diagnostics: Vec<CheckDiagnostic> = diagnostics
            .into_iter()
            .map(|d| {
                let (line, column) = line_col(text, d.start);
                CheckDiagnostic {
                    kind: d.kind,
                    message: d.message,
                    line,
                    column,
                    start: d.start,
                    end: d.end,
                }
            })
            .collect();
        let problems = diagnostics.len();
        CheckReport {
            diagnostics,
            summary: Summary { problems },
        }
    }
}

/// 1-based line and column (in characters) of a byte offset.
fn line_col(text: &str, offset: u32) -> (usize, usize) {
    let offset = (offset as usize).min(text.len());
    let before = text.get(..offset).unwrap_or(text);
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let line = before.matches('\n').count() + 1;
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}
