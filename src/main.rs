use std::io;
use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod aggregate;
mod config;
mod db;
mod error;
mod gradebook;
mod import;
mod models;
mod ranking;
mod report;
mod seed;
mod store;

use config::StorageConfig;
use gradebook::Gradebook;
use models::Submission;
use store::{FileBackend, KeyValueBackend, RosterStore};

#[derive(Parser)]
#[command(name = "classroom-leaderboard")]
#[command(about = "Grade tracker and class leaderboard", long_about = None)]
struct Cli {
    /// Directory holding the roster file
    #[arg(long, global = true, env = "CLASSROOM_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    /// Store the roster in Postgres (DATABASE_URL) instead of a file
    #[arg(long, global = true)]
    postgres: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Replace the roster with the demo class or a name,email CSV
    Seed {
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Record one graded assignment
    Submit {
        #[arg(long)]
        student: String,
        #[arg(long)]
        assignment: String,
        #[arg(long)]
        score: String,
    },
    /// Record grades from a student_id,assignment_name,score CSV
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Print the class ranking
    Leaderboard {
        #[arg(long, default_value_t = report::LEADERBOARD_SIZE)]
        limit: usize,
    },
    /// Print the class average and grade distribution
    Stats,
    /// Generate a markdown report
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn init_tracing() {
    // RUST_LOG controls verbosity; stdout is reserved for command output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match StorageConfig::resolve(cli.data_dir, cli.postgres)? {
        StorageConfig::File { data_dir } => run(FileBackend::new(data_dir), cli.command).await,
        StorageConfig::Postgres { database_url } => {
            let pool = PgPoolOptions::new()
                .max_connections(1)
                .connect(&database_url)
                .await
                .context("failed to connect to Postgres")?;

            if matches!(cli.command, Commands::InitDb) {
                db::init_db(&pool).await?;
                println!("Schema ready.");
                return Ok(());
            }
            run(db::PgBackend::new(pool), cli.command).await
        }
    }
}

async fn run<B: KeyValueBackend>(backend: B, command: Commands) -> anyhow::Result<()> {
    if matches!(command, Commands::InitDb) {
        anyhow::bail!("init-db only applies to --postgres storage");
    }

    let store = RosterStore::new(backend, seed::default_roster());
    let mut gradebook = Gradebook::open(store)
        .await
        .context("failed to load roster")?;

    match command {
        Commands::InitDb => {}
        Commands::Seed { csv } => {
            let roster = match &csv {
                Some(path) => import::read_roster(path)?,
                None => seed::default_roster(),
            };
            let roster = gradebook.reset(roster).await?;
            println!("Roster reset with {} students.", roster.len());
        }
        Commands::Submit {
            student,
            assignment,
            score,
        } => {
            let submission = Submission::parse(&student, &assignment, &score)?;
            let roster = gradebook.submit(&submission).await?;
            if let Some(updated) = roster.find(&submission.student_id) {
                println!(
                    "Grade recorded for {}: average {:.1}% across {} assignments, now #{}.",
                    updated.name, updated.average_grade, updated.assignments, updated.rank
                );
            }
        }
        Commands::Import { csv } => {
            let submissions = import::read_submissions(&csv)?;
            gradebook.submit_batch(&submissions).await?;
            println!(
                "Recorded {} grades from {}.",
                submissions.len(),
                csv.display()
            );
        }
        Commands::Leaderboard { limit } => {
            let roster = gradebook.roster();
            if roster.is_empty() {
                println!("No students enrolled.");
                return Ok(());
            }

            let now = Utc::now();
            println!("Class leaderboard:");
            for student in roster.students().iter().take(limit) {
                println!("- {}", report::leaderboard_line(student, roster.len(), now));
            }
        }
        Commands::Stats => {
            let summary = report::summarize(gradebook.roster());
            println!("Total students: {}", summary.student_count);
            println!("Class average: {:.1}%", summary.class_average);
            println!("Top score: {:.1}%", summary.top_average);
            println!("Grade distribution:");
            for entry in &summary.distribution {
                println!("- {}%: {}", entry.band.label(), entry.count);
            }
        }
        Commands::Report { out } => {
            let report = report::build_report(gradebook.roster(), Utc::now());
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
