use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

use tally_classify::ZeroShotClient;
use tally_core::{
    Classifier, MonthlyMetric, Transaction, aggregate_monthly, combine_sources,
    expense_by_category, filter_date_range, normalize, summarize, top_expenses,
};
use tally_ingest::SourceKind;

mod config;
mod report;

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Multi-bank statement analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full parse -> classify -> aggregate pipeline
    Run {
        /// Path to the TOML configuration
        #[arg(long, default_value = "tally.toml")]
        config: PathBuf,

        /// Inclusive window start ("YYYY-MM-DD HH:MM:SS" or "YYYY-MM-DD"), overrides config
        #[arg(long)]
        start: Option<String>,

        /// Inclusive window end, overrides config
        #[arg(long)]
        end: Option<String>,

        /// Output directory for CSV artifacts, overrides config
        #[arg(long)]
        out: Option<PathBuf>,

        /// Skip the classification collaborator entirely
        #[arg(long)]
        no_classify: bool,
    },

    /// Write a default configuration file
    InitConfig {
        #[arg(long, default_value = "tally.toml")]
        path: PathBuf,
    },

    /// List the registered institutions
    Sources,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            config,
            start,
            end,
            out,
            no_classify,
        } => run(config, start, end, out, no_classify),
        Command::InitConfig { path } => config::init_config(&path),
        Command::Sources => {
            for kind in SourceKind::ALL {
                println!("{}", kind.name());
            }
            Ok(())
        }
    }
}

fn run(
    config_path: PathBuf,
    start: Option<String>,
    end: Option<String>,
    out: Option<PathBuf>,
    no_classify: bool,
) -> Result<()> {
    let cfg = config::load_config(&config_path)?;
    let sources = cfg.resolved_sources()?;
    if sources.is_empty() {
        bail!("no sources configured in {}", config_path.display());
    }

    let start = start
        .or_else(|| cfg.start_date.clone())
        .map(|s| config::parse_timestamp(&s))
        .transpose()?;
    let end = end
        .or_else(|| cfg.end_date.clone())
        .map(|s| config::parse_timestamp(&s))
        .transpose()?;

    let out_dir = out.unwrap_or_else(|| cfg.output_dir.clone());
    fs::create_dir_all(&out_dir).with_context(|| format!("create {}", out_dir.display()))?;

    let client;
    let classifier: Option<&dyn Classifier> = if cfg.classifier.enabled && !no_classify {
        client = ZeroShotClient::new(
            &cfg.classifier.endpoint,
            Some(cfg.classifier.api_token.clone()),
        );
        Some(&client)
    } else {
        None
    };
    let labels = if cfg.classifier.labels.is_empty() {
        tally_classify::default_labels()
    } else {
        cfg.classifier.labels.clone()
    };

    let mut per_source: Vec<(String, Vec<MonthlyMetric>)> = Vec::new();
    let mut all_txns: Vec<Transaction> = Vec::new();
    let mut failed = 0usize;

    for (kind, path) in &sources {
        let divider = "-".repeat(40);
        println!("\n{divider}\nProcessing source: {}\n{divider}", kind.name());

        // A structurally unreadable export fails this source only; the rest
        // of the batch still runs.
        let parsed = match kind.parse_path(path) {
            Ok(t) => t,
            Err(err) => {
                error!("{} ({}): {err}", kind.name(), path.display());
                failed += 1;
                continue;
            }
        };

        let normalized = normalize(parsed, classifier, &labels, cfg.classifier.batch_size);
        let txns = filter_date_range(&normalized, start, end);
        println!("{} transactions in window", txns.len());

        let metrics = aggregate_monthly(&txns);
        println!("\n{}", report::monthly_table(&metrics));

        let top = top_expenses(&txns, 5);
        if !top.is_empty() {
            println!("Top {} highest expenses:", top.len());
            for t in top {
                println!(
                    "  {}  {:>10.2}  {}",
                    t.date.format("%Y-%m-%d"),
                    t.amount,
                    t.description
                );
            }
            println!();
        }

        let categories = expense_by_category(&txns);
        if !categories.is_empty() {
            println!("{}", report::category_table(&categories));
        }

        let prefix = kind.name().to_lowercase();
        report::write_transactions_csv(
            &out_dir.join(format!("{prefix}_transactions.csv")),
            &txns,
        )?;
        report::write_monthly_csv(&out_dir.join(format!("{prefix}_metrics.csv")), &metrics)?;

        per_source.push((kind.name().to_string(), metrics));
        all_txns.extend(txns);
    }

    if per_source.is_empty() {
        bail!("all {failed} configured sources failed to parse");
    }

    let divider = "=".repeat(40);
    let tables: Vec<Vec<MonthlyMetric>> = per_source.iter().map(|(_, m)| m.clone()).collect();
    let combined = combine_sources(&tables);
    println!("\n{divider}\nCombined Monthly Metrics\n{divider}");
    println!("{}", report::combined_table(&combined));
    report::write_combined_csv(&out_dir.join("combined_metrics.csv"), &combined)?;

    let combined_categories = expense_by_category(&all_txns);
    if !combined_categories.is_empty() {
        println!("{divider}\nCombined Expenses by Category\n{divider}");
        println!("{}", report::category_table(&combined_categories));
    }

    let summary = summarize(&per_source, &combined);
    println!("{divider}\nSummary Statistics\n{divider}");
    println!("{}", report::summary_table(&summary));
    report::write_summary_csv(&out_dir.join("summary_statistics.csv"), &summary)?;

    if failed > 0 {
        println!("\n{failed} source(s) failed to parse; results above are partial.");
    }

    Ok(())
}
