use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tally_core::{Summary, Transaction};
use tally_ingest::parse_statement_csv;
use tally_rules::{CategoryStore, categorize};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod report;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Keyword-based bank statement categorizer")]
struct Cli {
    /// Category store document (overrides store.path in config.toml)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write ~/.tally/config.toml, optionally seeding the category store
    Init {
        /// Seed an empty store with the built-in starter rules
        #[arg(long)]
        starter: bool,
    },

    /// Categorize a statement CSV and print the rows
    Categorize {
        /// Statement CSV with Date, Details, Amount, Debit/Credit columns
        #[arg(long)]
        csv: PathBuf,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Rows to print (0 = all; default from display.preview_rows)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Income, expenses, net, per-category spend and monthly trend
    Summary {
        #[arg(long)]
        csv: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Manage categories
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },

    /// Manage keywords
    Keyword {
        #[command(subcommand)]
        command: KeywordCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    /// Add a category with no keywords (no-op if it exists)
    Add { name: String },

    /// List categories and keywords in match order
    List,
}

#[derive(Subcommand, Debug)]
enum KeywordCommand {
    /// Append a keyword to an existing category
    Add { category: String, keyword: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = config::load_config();
    init_logging(cfg.as_ref().map(|c| c.log.level.as_str()).unwrap_or("warn"));
    let cfg = cfg?;

    let store_path = cfg.store_path(cli.store.as_deref())?;

    match cli.command {
        Command::Init { starter } => {
            config::init_config()?;
            if starter {
                seed_starter(&store_path)?;
            }
        }

        Command::Categorize { csv, json, limit } => {
            let store = CategoryStore::load(&store_path);
            let records = load_and_categorize(&csv, &store)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                let limit = limit.unwrap_or(cfg.display.preview_rows);
                print!("{}", report::render_records(&records, limit, &cfg.display.currency));
            }
        }

        Command::Summary { csv, json } => {
            let store = CategoryStore::load(&store_path);
            let records = load_and_categorize(&csv, &store)?;
            let summary = Summary::from_records(&records);

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", report::render_summary(&summary, &cfg.display.currency));
            }
        }

        Command::Category { command } => match command {
            CategoryCommand::Add { name } => add_category(&store_path, &name)?,
            CategoryCommand::List => {
                let store = CategoryStore::load(&store_path);
                print!("{}", report::render_store(&store));
            }
        },

        Command::Keyword { command } => match command {
            KeywordCommand::Add { category, keyword } => {
                let mut store = CategoryStore::load(&store_path);
                let added = store
                    .add_keyword(&category, &keyword)
                    .with_context(|| format!("adding keyword '{}' to '{}'", keyword.trim(), category))?;
                if added {
                    persist(&store, &store_path);
                    println!("Added keyword {} to {}", keyword.trim().to_uppercase(), category);
                } else {
                    println!("{} already has keyword {}", category, keyword.trim().to_uppercase());
                }
            }
        },
    }

    Ok(())
}

/// stderr logger; RUST_LOG wins over the configured level
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_and_categorize(csv: &Path, store: &CategoryStore) -> Result<Vec<Transaction>> {
    if !csv.exists() {
        bail!("CSV not found: {} (pass --csv <path>)", csv.display());
    }
    let parsed = parse_statement_csv(csv).with_context(|| format!("parsing {}", csv.display()))?;
    if parsed.skipped_rows > 0 {
        warn!(skipped = parsed.skipped_rows, "rows with invalid date, amount or flag were dropped");
    }

    let records = categorize(&parsed.transactions, store);
    let uncategorized = records.iter().filter(|t| !t.is_categorized()).count();
    info!(total = records.len(), uncategorized, "categorized statement");
    Ok(records)
}

/// Save after a mutation. A failed save is reported but not fatal: the
/// in-memory store is still correct for this run.
fn persist(store: &CategoryStore, path: &Path) {
    if let Err(e) = store.save(path) {
        warn!(error = %e, "category store not saved");
        eprintln!("warning: {e}");
    }
}

fn add_category(store_path: &Path, name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("category name is empty");
    }

    let mut store = CategoryStore::load(store_path);
    if store.contains(name) {
        println!("Category already exists: {name}");
    } else {
        store.add_category(name);
        persist(&store, store_path);
        println!("Added category: {name}");
    }
    Ok(())
}

fn seed_starter(store_path: &Path) -> Result<()> {
    let existing = CategoryStore::load(store_path);
    if existing != CategoryStore::new() {
        println!(
            "Category store already has rules, leaving it alone: {}",
            store_path.display()
        );
        return Ok(());
    }
    CategoryStore::starter()
        .save(store_path)
        .with_context(|| format!("seeding {}", store_path.display()))?;
    println!("Seeded starter categories: {}", store_path.display());
    Ok(())
}
