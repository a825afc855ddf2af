mod config;
mod test_runner;

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use codespan_reporting::diagnostic::Diagnostic;
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use serde::Serialize;
use symbols::{Corpus, IndexError, SolutionsIndex, SymbolIndex};
use tracing_subscriber::EnvFilter;
use transform::{Pipeline, annotate_code_blocks};

use config::Config;

const SUBCOMMANDS: &[&str] = &["render", "index", "extract", "annotate", "test", "help"];

#[derive(Parser)]
#[command(name = "codedoc", version, about = "Render code-aware markdown")]
struct Cli {
    /// Disable colored diagnostic output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log lookup decisions to stderr (-vv for trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Configuration file
    #[arg(long, global = true, default_value = "codedoc.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transform a markdown document
    Render(RenderArgs),

    /// Print the symbol index of a corpus as JSON
    Index(IndexArgs),

    /// Print one symbol's source
    Extract(ExtractArgs),

    /// Print symbol occurrences in a code file as JSON
    Annotate(AnnotateArgs),

    /// Run .test.md test files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Markdown source file
    file: String,

    /// Emit the transformed tree and code annotations as JSON
    #[arg(long)]
    json: bool,

    /// Corpus root (overrides the config file)
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Base directory for non-indexed fence paths
    #[arg(long)]
    project_root: Option<PathBuf>,

    /// Remove leading docstrings from resolved code
    #[arg(long)]
    strip_docstrings: bool,
}

#[derive(clap::Args)]
struct IndexArgs {
    /// Corpus root (overrides the config file)
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Print the solutions index instead of the symbol index
    #[arg(long)]
    solutions: bool,
}

#[derive(clap::Args)]
struct ExtractArgs {
    /// Source file to read
    file: String,

    /// Qualified symbol name, e.g. `Class.method`
    symbol: String,

    /// Drop the symbol's leading docstring
    #[arg(long)]
    strip_docstring: bool,
}

#[derive(clap::Args)]
struct AnnotateArgs {
    /// Code file to annotate
    file: String,

    /// Corpus root (overrides the config file)
    #[arg(long)]
    corpus: Option<PathBuf>,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.md file or directory containing them
    path: String,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    // `codedoc file.md` is shorthand for `codedoc render file.md`.
    let mut args: Vec<String> = std::env::args().collect();
    let first_positional =
        (1..args.len()).find(|&i| !args[i].starts_with('-') && args[i - 1] != "--config");
    if let Some(pos) = first_positional {
        if !SUBCOMMANDS.contains(&args[pos].as_str()) {
            args.insert(pos, "render".to_string());
        }
    }

    let cli = Cli::parse_from(&args);
    init_logging(cli.verbose);

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => fail(e),
    };

    match cli.command {
        Command::Render(render_args) => do_render(render_args, &config, cli.no_color),
        Command::Index(index_args) => do_index(index_args, &config),
        Command::Extract(extract_args) => do_extract(extract_args),
        Command::Annotate(annotate_args) => do_annotate(annotate_args, &config),
        Command::Test(test_args) => {
            let path = Path::new(&test_args.path);
            if test_args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let exit_code =
                test_runner::run_tests(path, cli.no_color, &test_args.category, &config);
            process::exit(exit_code);
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn fail(message: impl Display) -> ! {
    eprintln!("error: {}", message);
    process::exit(1);
}

fn read_source(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => fail(format!("cannot read '{}': {}", path, e)),
    }
}

/// Build both indexes from `root`. Without a corpus the indexes are empty
/// and every indexed fence is reported as unresolved.
pub(crate) fn load_indexes(
    root: Option<&Path>,
    extensions: &[String],
) -> Result<(SymbolIndex, SolutionsIndex), IndexError> {
    let Some(root) = root else {
        tracing::debug!("no corpus configured");
        return Ok((SymbolIndex::new(), SolutionsIndex::new()));
    };
    let corpus = Corpus::load(root, extensions)?;
    Ok((SymbolIndex::build(&corpus), SolutionsIndex::build(&corpus)))
}

fn indexes_or_exit(corpus: Option<&PathBuf>, config: &Config) -> (SymbolIndex, SolutionsIndex) {
    let root = corpus.or(config.corpus.as_ref());
    match load_indexes(root.map(PathBuf::as_path), &config.source_extensions) {
        Ok(indexes) => indexes,
        Err(e) => fail(e),
    }
}

fn print_json(value: &impl Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(e),
    }
}

#[derive(Serialize)]
struct RenderOutput<'a> {
    document: &'a codedoc::Document,
    annotations: Vec<transform::BlockAnnotations>,
}

fn do_render(args: RenderArgs, config: &Config, no_color: bool) {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let source = read_source(&args.file);

    let mut files = SimpleFiles::new();
    let file_id = files.add(args.file.clone(), source.clone());

    let (document, parse_warnings) = codedoc::Parser::new(source.clone(), file_id).parse();

    let (symbols, solutions) = indexes_or_exit(args.corpus.as_ref(), config);

    let mut options = config.pipeline.clone();
    if let Some(root) = args.project_root {
        options.project_root = root;
    }
    if args.strip_docstrings {
        options.strip_docstrings = true;
    }

    let pipeline = match Pipeline::new(&symbols, &solutions, options) {
        Ok(p) => p,
        Err(e) => fail(e),
    };
    let transformed = pipeline.run(document, &source);

    let diagnostics: Vec<Diagnostic<usize>> = parse_warnings
        .iter()
        .map(|w| w.to_diagnostic())
        .chain(transformed.warnings.iter().map(|w| w.to_diagnostic(file_id)))
        .collect();
    let writer = StandardStream::stderr(color_choice);
    emit_diagnostics(&writer, &files, &diagnostics);

    if args.json {
        print_json(&RenderOutput {
            document: &transformed.document,
            annotations: annotate_code_blocks(&transformed.document, &symbols),
        });
    } else {
        print!("{}", transformed.document);
    }
}

fn do_index(args: IndexArgs, config: &Config) {
    let (symbols, solutions) = indexes_or_exit(args.corpus.as_ref(), config);
    if args.solutions {
        print_json(&solutions);
    } else {
        print_json(&symbols);
    }
}

fn do_extract(args: ExtractArgs) {
    let source = read_source(&args.file);
    let code = symbols::extract_symbol(&source, &args.symbol, args.strip_docstring);
    if code.is_empty() {
        fail(format!("symbol `{}` not found in {}", args.symbol, args.file));
    }
    print!("{}", code);
}

fn do_annotate(args: AnnotateArgs, config: &Config) {
    let code = read_source(&args.file);
    let (symbols, _) = indexes_or_exit(args.corpus.as_ref(), config);
    print_json(&symbols::annotate(&code, &symbols));
}

fn emit_diagnostics(
    writer: &StandardStream,
    files: &SimpleFiles<String, String>,
    diagnostics: &[Diagnostic<usize>],
) {
    let config = term::Config::default();
    for diagnostic in diagnostics {
        let _ = term::emit_to_write_style(&mut writer.lock(), &config, files, diagnostic);
    }
}
