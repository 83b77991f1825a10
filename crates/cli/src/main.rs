//! Study-schedule planner command line.

mod repl;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use planner_core::Clock;
use planner_core::model::{Difficulty, HourBudget, Subject, SubjectId};
use services::{Dashboard, PlannerService};
use storage::SqliteRepository;

#[derive(Parser)]
#[command(name = "planner")]
#[command(about = "Greedy exam-revision scheduler", long_about = None)]
struct Cli {
    /// SQLite file holding the subject list.
    #[arg(long, global = true, default_value = "planner.sqlite")]
    database: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a subject to the stored list
    Add {
        /// Subject name
        name: String,
        /// Exam date (YYYY-MM-DD)
        #[arg(long)]
        exam: NaiveDate,
        /// easy, medium, or hard
        #[arg(long)]
        difficulty: Difficulty,
    },
    /// List the stored subjects
    List,
    /// Generate and print a study schedule
    Schedule {
        /// Use the reduced 2/4/6 hour budget
        #[arg(long)]
        light: bool,
        /// Schedule as of this date instead of today (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Interactive dashboard: day views, completion tracking, burnout timer
    Dashboard {
        /// Use the reduced 2/4/6 hour budget
        #[arg(long)]
        light: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let database_url = format!("sqlite:{}?mode=rwc", cli.database.display());
    let repo = SqliteRepository::connect(&database_url)
        .await
        .with_context(|| format!("opening database {}", cli.database.display()))?;
    repo.migrate().await.context("running migrations")?;
    info!(database = %cli.database.display(), "database ready");
    let store = repo.into_storage().subjects;

    match cli.command {
        Commands::Add {
            name,
            exam,
            difficulty,
        } => {
            let service = PlannerService::new(Clock::default_clock(), store);
            let mut subjects = service.load_subjects().await?;
            let id = SubjectId::new(u64::try_from(subjects.len()).unwrap_or(u64::MAX));
            let subject = Subject::new(id, name, exam, difficulty)?;
            let added = format!(
                "added {} (exam {}, {})",
                subject.name(),
                subject.exam_date(),
                subject.difficulty()
            );
            subjects.push(subject);
            service.save_subjects(&subjects).await?;
            println!("{added}");
        }
        Commands::List => {
            let service = PlannerService::new(Clock::default_clock(), store);
            let subjects = service.load_subjects().await?;
            if subjects.is_empty() {
                println!("no subjects stored");
                return Ok(());
            }
            println!("Subjects ({})", subjects.len());
            for subject in &subjects {
                println!(
                    "  {} | exam {} | {}",
                    subject.name(),
                    subject.exam_date(),
                    subject.difficulty()
                );
            }
        }
        Commands::Schedule { light, today } => {
            let clock = reference_clock(today);
            let service = service_for(clock, store, light);
            let (subjects, generated) = service.generate_from_store().await?;

            for notice in &generated.notices {
                eprintln!("warning: {notice}");
            }
            if generated.plan.is_empty() {
                println!("nothing to schedule");
                return Ok(());
            }

            let dash = Dashboard::new(clock, subjects, generated.plan);
            for date in dash.tasks_by_date().keys() {
                println!("{date}");
                for entry in dash.day_view(*date).entries {
                    let eve = if entry.flags.warn { "  (exam tomorrow)" } else { "" };
                    println!("  {:<20} {:>5.2}h{}", entry.subject, entry.hours, eve);
                }
            }
        }
        Commands::Dashboard { light } => {
            let clock = Clock::default_clock();
            let service = service_for(clock, store, light);
            let (subjects, generated) = service.generate_from_store().await?;

            for notice in &generated.notices {
                eprintln!("warning: {notice}");
            }
            let dash = Dashboard::new(clock, subjects, generated.plan);
            repl::run(dash)?;
        }
    }

    Ok(())
}

fn service_for(
    clock: Clock,
    store: std::sync::Arc<dyn storage::SubjectStore>,
    light: bool,
) -> PlannerService {
    let service = PlannerService::new(clock, store);
    if light {
        service.with_budget(HourBudget::light())
    } else {
        service
    }
}

/// Real time, unless an explicit reference date pins the clock to that
/// day's midnight.
fn reference_clock(today: Option<NaiveDate>) -> Clock {
    match today {
        Some(date) => Clock::fixed(date.and_time(NaiveTime::MIN).and_utc()),
        None => Clock::default_clock(),
    }
}
