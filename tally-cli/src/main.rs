use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tally_ingest::{FormatRegistry, parse_csv_with_format, parse_with_format};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod output;
mod registry;
mod state;

use output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Parse bank statement text into transactions")]
struct Cli {
    /// Log level for tally's own targets (overridden by RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse extracted statement text (one line per text line)
    Parse {
        /// Text file to read, or `-` for stdin
        input: PathBuf,

        /// Statement format id (default: parse.default_format from config)
        #[arg(long)]
        format: Option<String>,

        /// Output style (default: parse.output from config)
        #[arg(long, value_enum)]
        output: Option<OutputFormat>,

        /// Continuation lines an anchor may pull in
        #[arg(long)]
        lookahead: Option<usize>,

        /// Statement text or online-banking CSV (default: by file extension)
        #[arg(long, value_enum)]
        input_kind: Option<InputKind>,
    },

    /// List registered statement formats
    Formats,

    /// Manage ~/.tally/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputKind {
    Text,
    Csv,
}

impl InputKind {
    fn for_path(path: &Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => InputKind::Csv,
            _ => InputKind::Text,
        }
    }
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,

    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;

    init_tracing(cli.log_level.as_deref().unwrap_or(&cfg.log.level));

    match cli.command {
        Command::Parse {
            input,
            format,
            output,
            lookahead,
            input_kind,
        } => {
            let format = match format.or_else(|| cfg.parse.default_format.clone()) {
                Some(f) => f,
                None => bail!("no statement format given (pass --format <id>)"),
            };
            let registry = registry::load_registry(&cfg.formats_dir()?)?;
            run_parse(
                &registry,
                &input,
                &format,
                output.unwrap_or(cfg.parse.output),
                lookahead.or(cfg.parse.lookahead),
                input_kind.unwrap_or_else(|| InputKind::for_path(&input)),
            )?;
        }

        Command::Formats => {
            let registry = registry::load_registry(&cfg.formats_dir()?)?;
            for id in registry.ids() {
                let f = registry.get(id)?;
                let patterns: Vec<&str> = f
                    .profile()
                    .date_patterns
                    .iter()
                    .map(|p| p.format.as_str())
                    .collect();
                println!(
                    "{:<12} prefix={:<6} dates={}",
                    id,
                    f.profile().reference_prefix,
                    patterns.join(",")
                );
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let s = toml::to_string_pretty(&cfg).context("serialize config")?;
                println!("# {}", config::config_path()?.display());
                print!("{s}");
            }
        },
    }

    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tally_ingest={level},tally_cli={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut s = String::new();
        io::stdin().read_to_string(&mut s).context("read stdin")?;
        return Ok(s);
    }
    if !input.exists() {
        bail!("input not found: {}", input.display());
    }
    std::fs::read_to_string(input).with_context(|| format!("read {}", input.display()))
}

fn run_parse(
    registry: &FormatRegistry,
    input: &Path,
    format_id: &str,
    output: OutputFormat,
    lookahead: Option<usize>,
    input_kind: InputKind,
) -> Result<()> {
    let text = read_input(input)?;

    let mut format = registry.get(format_id)?.clone();
    if let Some(n) = lookahead {
        format = format.with_lookahead(n);
    }

    let stmt = match input_kind {
        InputKind::Text => {
            let lines: Vec<&str> = text.lines().collect();
            parse_with_format(&lines, &format)
        }
        InputKind::Csv => parse_csv_with_format(text.as_bytes(), &format),
    }
    .with_context(|| format!("parsing {} as {}", input.display(), format_id))?;

    if output == OutputFormat::Csv {
        for d in stmt.diagnostics() {
            eprintln!("skipped {d}");
        }
    }
    info!(
        transactions = stmt.len(),
        skipped = stmt.diagnostics().len(),
        "parsed {}",
        input.display()
    );

    output::write_statement(io::stdout().lock(), &stmt, output)
}
