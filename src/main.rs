// SPDX-License-Identifier: PMPL-1.0-or-later

//! astrofact: locale-aware request dispatch for voice-assistant skills
//!
//! Hosting glue for the dispatch engine: reads a platform request envelope,
//! runs it through the space-facts skill, and prints the response envelope.
//! Also ships a startup-validation command so configuration defects are
//! caught in CI rather than mid-conversation.

use anyhow::{Context, Result};
use astrofact::dispatch::DispatchOutcome;
use astrofact::facts::{FactTable, OsRandom};
use astrofact::i18n::{self, Lang};
use astrofact::skill;
use astrofact::types::Request;
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "astrofact")]
#[command(version = "1.0.0")]
#[command(about = "Locale-aware request dispatch engine for voice-assistant skills")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch one request envelope through the skill
    Dispatch {
        /// Request envelope file (JSON or YAML), or `-` for stdin
        #[arg(value_name = "REQUEST")]
        request: PathBuf,

        /// Pretty-print the response envelope
        #[arg(short, long)]
        pretty: bool,
    },

    /// Print one random space fact for a locale
    Fact {
        /// Locale tag to resolve (e.g. es-MX, en-GB)
        #[arg(short, long, default_value = "en-US")]
        locale: String,
    },

    /// Run startup validation checks on the catalog and fact table
    Validate,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Dispatch { request, pretty } => run_dispatch(&request, pretty),
        Commands::Fact { locale } => run_fact(&locale),
        Commands::Validate => run_validate(),
    }
}

fn run_dispatch(path: &PathBuf, pretty: bool) -> Result<()> {
    let request = read_envelope(path)?;
    let dispatcher = skill::default_skill()?;

    let stamp = Utc::now().format("%Y-%m-%d %H:%M:%S");
    eprintln!("{} {} turn: {}", stamp, "astrofact".dimmed(), request.locale);

    match dispatcher.dispatch(request)? {
        DispatchOutcome::Handled(response) => {
            let envelope = if pretty {
                serde_json::to_string_pretty(&response)?
            } else {
                serde_json::to_string(&response)?
            };
            println!("{envelope}");
            Ok(())
        }
        DispatchOutcome::Unhandled => {
            eprintln!("{}", "no handler claimed this request".yellow());
            std::process::exit(2);
        }
    }
}

fn read_envelope(path: &PathBuf) -> Result<Request> {
    let raw = if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("reading request envelope from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("reading request envelope from {}", path.display()))?
    };

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    if is_yaml {
        serde_yaml::from_str(&raw).context("parsing YAML request envelope")
    } else {
        serde_json::from_str(&raw).context("parsing JSON request envelope")
    }
}

fn run_fact(locale: &str) -> Result<()> {
    let lang = Lang::from_tag(locale);
    let table = FactTable::builtin();
    table.validate()?;
    let fact = table.pick(lang, &OsRandom)?;
    println!("{} {}", format!("[{lang}]").cyan(), fact);
    Ok(())
}

fn run_validate() -> Result<()> {
    println!("astrofact configuration checks");
    println!();

    let mut failed = false;
    failed |= report("message catalog", i18n::validate());

    let table = FactTable::builtin();
    failed |= report("fact table", table.validate());
    for lang in Lang::all() {
        let label = format!("facts ({lang})");
        let count = table.facts_for(*lang).len();
        if count > 0 {
            println!("  {} {label}: {count} entries", "OK".green());
        } else {
            println!("  {} {label}: empty", "ERROR".red());
            failed = true;
        }
    }

    if failed {
        anyhow::bail!("configuration checks reported issues");
    }
    println!();
    println!("{}", "all checks passed".green());
    Ok(())
}

fn report(label: &str, result: Result<()>) -> bool {
    match result {
        Ok(()) => {
            println!("  {} {label}", "OK".green());
            false
        }
        Err(error) => {
            println!("  {} {label}: {error}", "ERROR".red());
            true
        }
    }
}
