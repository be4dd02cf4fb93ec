use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

use mdsplit::{GroupWarning, LeadingContent, group_with};
use pipeline::{
    DEFAULT_INDEX_WIDTH, DocumentOutcome, MAX_INDEX_WIDTH, SplitConfig, Splitter, chunk_dirs, chunk_file_name,
    chunk_files,
};

const SUBCOMMANDS: &[&str] = &["split", "inspect", "list", "help"];

#[derive(Parser)]
#[command(
    name = "mdsplit",
    version,
    about = "Split markdown documents into per-section chunk files"
)]
struct Cli {
    /// Disable colored diagnostic output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "info")]
    log_level: Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write chunk files for every .md file in a directory
    Split(SplitArgs),

    /// Show how a single file would be chunked, without writing anything
    Inspect(InspectArgs),

    /// List existing chunk directories and their files
    List(ListArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum LeadingArg {
    /// Discard content before the first heading
    Drop,
    /// Write content before the first heading as a leading chunk
    Keep,
}

impl From<LeadingArg> for LeadingContent {
    fn from(arg: LeadingArg) -> Self {
        match arg {
            LeadingArg::Drop => LeadingContent::Drop,
            LeadingArg::Keep => LeadingContent::Keep,
        }
    }
}

#[derive(clap::Args)]
struct SplitArgs {
    /// Directory containing the markdown sources
    #[arg(default_value = "docs")]
    docs: PathBuf,

    /// Output root (default: <DOCS>/chunks)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Config file (default: <DOCS>/mdsplit.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Policy for content before the first heading
    #[arg(long, value_enum)]
    leading: Option<LeadingArg>,

    /// Digits in chunk file names
    #[arg(long)]
    index_width: Option<usize>,

    /// Continue with the next file when one fails
    #[arg(long)]
    keep_going: bool,
}

#[derive(clap::Args)]
struct InspectArgs {
    /// Markdown file to inspect
    file: PathBuf,

    /// Policy for content before the first heading
    #[arg(long, value_enum, default_value = "drop")]
    leading: LeadingArg,

    /// Digits in chunk file names
    #[arg(long, default_value_t = DEFAULT_INDEX_WIDTH)]
    index_width: usize,
}

#[derive(clap::Args)]
struct ListArgs {
    /// Directory containing the markdown sources
    #[arg(default_value = "docs")]
    docs: PathBuf,

    /// Output root (default: <DOCS>/chunks)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Config file (default: <DOCS>/mdsplit.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    let args = with_default_subcommand(std::env::args().collect());
    let cli = Cli::parse_from(&args);

    if let Err(e) = setup_logging(cli.log_level) {
        eprintln!("warning: cannot install logger: {}", e);
    }

    let color_choice = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let exit_code = match cli.command {
        Command::Split(split_args) => do_split(split_args, color_choice),
        Command::Inspect(inspect_args) => do_inspect(inspect_args, color_choice),
        Command::List(list_args) => do_list(list_args),
    };
    process::exit(exit_code);
}

/// `mdsplit docs` and a bare `mdsplit` behave like `mdsplit split ...`.
fn with_default_subcommand(mut args: Vec<String>) -> Vec<String> {
    let mut rest = args.iter().skip(1);
    let mut first_pos = None;
    while let Some(arg) = rest.next() {
        if arg == "--log-level" {
            rest.next();
            continue;
        }
        if !arg.starts_with('-') {
            first_pos = Some(arg.as_str());
            break;
        }
    }

    let wants_info = args
        .iter()
        .skip(1)
        .any(|a| matches!(a.as_str(), "-h" | "--help" | "-V" | "--version"));
    let inject = match first_pos {
        Some(pos) => !SUBCOMMANDS.contains(&pos),
        None => !wants_info,
    };

    if inject {
        args.insert(1, "split".to_string());
    }
    args
}

fn setup_logging(level: Level) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn load_config(
    docs: &Path,
    config_path: Option<&Path>,
    out: Option<&Path>,
) -> pipeline::Result<SplitConfig> {
    let mut config = match config_path {
        Some(path) => SplitConfig::load(path)?,
        None => SplitConfig::discover(docs)?,
    };
    if let Some(out) = out {
        config.output_dir = Some(out.to_path_buf());
    }
    Ok(config)
}

fn do_split(args: SplitArgs, color_choice: ColorChoice) -> i32 {
    let config = load_config(&args.docs, args.config.as_deref(), args.out.as_deref()).and_then(
        |mut config| {
            if let Some(leading) = args.leading {
                config.leading_content = leading.into();
            }
            if let Some(width) = args.index_width {
                config.index_width = width;
            }
            config.keep_going |= args.keep_going;
            config.validate()?;
            Ok(config)
        },
    );
    let config = match config {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            return 1;
        }
    };

    let splitter = Splitter::new(config);
    let report = match splitter.split_directory(&args.docs) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {}", e);
            return 1;
        }
    };

    let writer = StandardStream::stderr(color_choice);
    let term_config = term::Config::default();
    for document in &report.documents {
        if let DocumentOutcome::Written { dir, chunks } = &document.outcome {
            println!("{} -> {} ({} chunks)", document.path.display(), dir.display(), chunks);
        }
        emit_warnings(
            &writer,
            &term_config,
            &document.path,
            &document.source,
            &document.warnings,
        );
    }
    for (path, error) in &report.failures {
        eprintln!("error: {}: {}", path.display(), error);
    }

    eprintln!(
        "ok: {} written, {} skipped, {} failed",
        report.written(),
        report.skipped(),
        report.failures.len()
    );

    if report.is_success() { 0 } else { 1 }
}

fn do_inspect(args: InspectArgs, color_choice: ColorChoice) -> i32 {
    if !(1..=MAX_INDEX_WIDTH).contains(&args.index_width) {
        eprintln!("error: --index-width must be between 1 and {}", MAX_INDEX_WIDTH);
        return 1;
    }

    let source = match std::fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", args.file.display(), e);
            return 1;
        }
    };

    let mut files = SimpleFiles::new();
    let file_id = files.add(args.file.display().to_string(), source.clone());

    let document = mdsplit::parser::Parser::new(source, file_id).parse();
    let grouping = group_with(document.nodes, args.leading.into());

    for (i, chunk) in grouping.chunks.iter().enumerate() {
        let path = chunk.heading_path();
        let label = if path.is_empty() {
            "(no heading)".to_string()
        } else {
            path.join(" > ")
        };
        println!(
            "{}  {}  ({} blocks)",
            chunk_file_name(i, args.index_width),
            label,
            chunk.len()
        );
    }

    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    for warning in grouping.warnings(file_id) {
        let diagnostic = warning.to_diagnostic();
        let _ = term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic);
    }
    0
}

fn do_list(args: ListArgs) -> i32 {
    let config = match load_config(&args.docs, args.config.as_deref(), args.out.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            return 1;
        }
    };
    let out_root = Splitter::new(config).output_root(&args.docs);

    let listing = chunk_dirs(&out_root).and_then(|dirs| {
        dirs.into_iter()
            .map(|dir| chunk_files(&dir).map(|files| (dir, files)))
            .collect::<pipeline::Result<Vec<_>>>()
    });
    let listing = match listing {
        Ok(l) => l,
        Err(e) => {
            eprintln!("error: {}", e);
            return 1;
        }
    };

    for (dir, files) in listing {
        println!("{} ({} chunks)", dir.display(), files.len());
        for file in files {
            if let Some(name) = file.file_name() {
                println!("  {}", name.to_string_lossy());
            }
        }
    }
    0
}

/// Render a document's grouping warnings against its own source text.
fn emit_warnings(
    writer: &StandardStream,
    config: &term::Config,
    path: &Path,
    source: &str,
    warnings: &[GroupWarning],
) {
    if warnings.is_empty() {
        return;
    }
    let mut files = SimpleFiles::new();
    files.add(path.display().to_string(), source.to_string());
    for warning in warnings {
        let diagnostic = warning.to_diagnostic();
        let _ = term::emit_to_write_style(&mut writer.lock(), config, &files, &diagnostic);
    }
}
