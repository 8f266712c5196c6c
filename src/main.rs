//! # Folio - plain-text search and replace
//!
//! Drives the folio core from the command line: every file goes through
//! the same load/save normalization an editor tab would apply.
//!
//! ```bash
//! folio find notes.txt TODO
//! folio replace notes.txt '^(\d+)\. ' '$1) ' --regex
//! folio replace notes.txt foo bar --lines 10:20
//! folio goto notes.txt 42
//! folio normalize notes.txt
//! ```

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_core::{Config, DocumentId, Session, paths};
use folio_search::Query;

/// Folio - plain-text search and replace
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every match as line:column
    Find {
        file: PathBuf,
        query: String,
        #[command(flatten)]
        options: SearchOptions,
    },
    /// Replace matches and save the file
    Replace {
        file: PathBuf,
        query: String,
        replacement: String,
        #[command(flatten)]
        options: SearchOptions,
        /// Only replace inside lines START:END (1-indexed, inclusive)
        #[arg(long, value_name = "START:END", value_parser = parse_line_range)]
        lines: Option<(usize, usize)>,
    },
    /// Print one line
    Goto { file: PathBuf, line: usize },
    /// Rewrite a file with trailing whitespace and blank lines removed
    Normalize { file: PathBuf },
}

#[derive(ClapArgs, Debug)]
struct SearchOptions {
    /// Treat the query as a regular expression
    #[arg(short, long)]
    regex: bool,

    /// Ignore letter case
    #[arg(short, long)]
    ignore_case: bool,
}

impl SearchOptions {
    fn query(&self, text: &str, config: &Config) -> Query {
        let query = if self.regex || config.search.regex {
            Query::pattern(text)
        } else {
            Query::literal(text)
        };
        query.case_sensitive(config.search.case_sensitive && !self.ignore_case)
    }
}

fn parse_line_range(s: &str) -> Result<(usize, usize), String> {
    let (start, end) = s
        .split_once(':')
        .ok_or_else(|| format!("expected START:END, got '{s}'"))?;
    let start = start.parse().map_err(|e| format!("bad start line: {e}"))?;
    let end = end.parse().map_err(|e| format!("bad end line: {e}"))?;
    Ok((start, end))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting folio v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load(),
    };

    run(args.command, Session::new(config))
}

fn run(command: Command, mut session: Session) -> anyhow::Result<()> {
    match command {
        Command::Find {
            file,
            query,
            options,
        } => {
            let id = open(&mut session, &file)?;
            let query = options.query(&query, session.config());
            let entry = session.get(id)?;
            let matches = entry.find(query)?;
            if matches.is_empty() {
                println!("no match");
            }
            for (i, m) in matches.matches().iter().enumerate() {
                let pos = entry.document.char_to_position(m.start)?;
                let text = entry.document.slice(m.start, m.end)?;
                println!("{}/{} {} {}", i + 1, matches.len(), pos, text);
            }
        }
        Command::Replace {
            file,
            query,
            replacement,
            options,
            lines,
        } => {
            let id = open(&mut session, &file)?;
            let query = options.query(&query, session.config());
            let entry = session.get_mut(id)?;
            let in_selection = match lines {
                Some((start, end)) => {
                    if !entry.selection.select_lines(&entry.document, start, end) {
                        anyhow::bail!("Line range {start}:{end} is outside the file");
                    }
                    true
                }
                None => false,
            };
            let count = entry.replace(query, &replacement, in_selection)?;
            if count > 0 {
                session.save(id)?;
            }
            println!("{} replaced in {}", count, paths::encode_home(&file));
        }
        Command::Goto { file, line } => {
            let id = open(&mut session, &file)?;
            let entry = session.get_mut(id)?;
            if entry.goto_line(line) {
                let (start, end) = entry.selection.normalized();
                print!("{}", entry.document.slice(start, end)?);
                if line == entry.document.line_count() {
                    println!();
                }
            }
        }
        Command::Normalize { file } => {
            let id = open(&mut session, &file)?;
            session.save(id)?;
        }
    }
    Ok(())
}

fn open(session: &mut Session, file: &Path) -> anyhow::Result<DocumentId> {
    let cwd = std::env::current_dir().context("No current directory")?;
    let path = paths::resolve(file, cwd);
    session
        .open(&path)
        .with_context(|| format!("Failed to open {}", paths::encode_home(&path)))
}
