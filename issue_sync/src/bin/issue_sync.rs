use std::sync::Arc;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};

use comicvine_ingestor::providers::comicvine_rest::ComicVineProvider;
use issue_sync::config::SyncConfig;
use issue_sync::sync::{Synchronizer, budget::WallClockBudget, week::week_start_for};

#[derive(Parser)]
#[command(version, about = "Issue Sync CLI")]
struct Cli {
    /// Path to a TOML config file; built-in defaults apply when omitted.
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Apply embedded migrations to the database.
    Migrate,
    /// Fetch (or serve from cache) a single volume.
    Volume {
        #[arg(long)]
        id: i64,
        /// Refetch even if the cached record is still fresh.
        #[arg(long)]
        force: bool,
    },
    /// Ingest the issues of a volume and list the cached set.
    Issues {
        #[arg(long)]
        volume_id: i64,
    },
    /// Prime the week containing DATE (default: today) under the budget.
    PrimeWeek {
        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,
    },
    /// Prime an arbitrary date range under the budget.
    PrimeRange {
        #[arg(long, value_name = "DATE")]
        start: NaiveDate,
        #[arg(long, value_name = "DATE")]
        end: NaiveDate,
    },
    /// Ensure the week is primed, then list its cached issues.
    Week {
        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => issue_sync::config::load_config_path(path)?,
        None => SyncConfig::default(),
    };

    let db_url = std::env::var("DATABASE_URL")?;

    if let Cmd::Migrate = cli.cmd {
        issue_sync::db::migrate::run_sqlite(&db_url)?;
        println!("migrations applied to {db_url}");
        return Ok(());
    }

    let mut conn = issue_sync::db::connection::connect_sqlite(&db_url)?;
    let provider = Arc::new(ComicVineProvider::new(config.http_timeout())?);
    let sync = Synchronizer::new(provider, config);

    match cli.cmd {
        Cmd::Migrate => {}
        Cmd::Volume { id, force } => {
            let volume = sync.get_volume(&mut conn, id, force).await?;
            let year = volume
                .start_year
                .map(|y| format!(" ({y})"))
                .unwrap_or_default();
            println!(
                "{} {}{} — {} issues, fetch_failed={}",
                volume.cv_id, volume.name, year, volume.count_of_issues, volume.fetch_failed
            );
        }
        Cmd::Issues { volume_id } => {
            let issues = sync.get_volume_issues(&mut conn, volume_id).await?;
            for issue in &issues {
                println!(
                    "{} #{} {} [{}]",
                    issue.cv_id,
                    issue.number.as_deref().unwrap_or("?"),
                    issue.name.as_deref().unwrap_or(""),
                    issue
                        .canonical_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "no date".to_string()),
                );
            }
            println!("{} cached issues", issues.len());
        }
        Cmd::PrimeWeek { date } => {
            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            let state = sync.ensure_week(&mut conn, date).await?;
            println!(
                "week {}: complete={} next={:?} page={} expires {}",
                state.week_start,
                state.priming_complete,
                state.next_date_to_prime,
                state.current_day_page,
                state.cache_expires,
            );
        }
        Cmd::PrimeRange { start, end } => {
            let mut budget = WallClockBudget::new(sync.config().prime_budget());
            let summary = sync
                .prime_issues_for_date_range(&mut conn, start, end, None, &mut budget)
                .await?;
            println!(
                "complete={} issues={} pages={} days_failed={} resume={:?}",
                summary.complete,
                summary.issues_upserted,
                summary.pages_fetched,
                summary.days_failed,
                summary.resume,
            );
        }
        Cmd::Week { date } => {
            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            let state = sync.ensure_week(&mut conn, date).await?;
            let rows = issue_sync::query::week_issues(&mut conn, week_start_for(date))?;
            for (issue, volume) in &rows {
                println!(
                    "{} {} #{}",
                    issue
                        .canonical_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "????-??-??".to_string()),
                    volume.name,
                    issue.number.as_deref().unwrap_or("?"),
                );
            }
            println!(
                "{} issues cached for week {} (priming_complete={})",
                rows.len(),
                state.week_start,
                state.priming_complete,
            );
        }
    }

    Ok(())
}
