//! Run the planning pipeline for a whole book of client profiles
//!
//! Outputs one readiness / funding row per household

use std::path::PathBuf;
use std::time::Instant;

use advisory_planner::{
    assumptions::PlanningAssumptions,
    pipeline::{compute_plan, PlanOutputs, PlanningSession},
    profile::load_profiles,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "run_book", about = "Batch readiness for a book of client profiles")]
struct Cli {
    /// Book of client profiles (JSON array)
    #[arg(default_value = "data/sample_book.json")]
    book: PathBuf,

    /// Directory holding planning_assumptions.csv
    #[arg(long, default_value = "data")]
    assumptions: PathBuf,

    /// Valuation date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Output CSV
    #[arg(long, default_value = "book_readiness_output.csv")]
    output: PathBuf,
}

/// One household's line in the book summary
#[derive(Debug, Serialize)]
struct BookRow {
    client: String,
    net_worth: f64,
    savings_rate: f64,
    readiness_score: u8,
    status: String,
    required_portfolio: f64,
    projected_savings: f64,
    income_gap: f64,
    expected_final: f64,
    total_funding_gap: f64,
    invalid_issues: usize,
}

impl BookRow {
    fn from_plan(plan: &PlanOutputs) -> Self {
        Self {
            client: plan.client_name.clone(),
            net_worth: plan.net_worth,
            savings_rate: plan.savings_rate,
            readiness_score: plan.readiness.readiness_score,
            status: format!("{:?}", plan.readiness.status),
            required_portfolio: plan.readiness.required_portfolio,
            projected_savings: plan.readiness.projected_savings,
            income_gap: plan.readiness.income_gap,
            expected_final: plan.scenario_summary.map(|s| s.expected).unwrap_or(0.0),
            total_funding_gap: plan.projects.iter().map(|p| p.funding_gap).sum(),
            invalid_issues: plan.issues.iter().filter(|i| i.is_invalid()).count(),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let start = Instant::now();
    println!("Loading profiles from {}...", cli.book.display());

    let profiles = load_profiles(&cli.book).with_context(|| format!("loading {}", cli.book.display()))?;
    println!("Loaded {} profiles in {:?}", profiles.len(), start.elapsed());

    let assumptions = PlanningAssumptions::from_csv_path(&cli.assumptions)
        .with_context(|| format!("loading assumptions from {}", cli.assumptions.display()))?;
    let today = cli.today.unwrap_or_else(|| chrono::Local::now().date_naive());

    println!("Computing plans...");
    let calc_start = Instant::now();

    // Households are independent sessions
    let rows: Vec<BookRow> = profiles
        .into_par_iter()
        .map(|profile| {
            let session = PlanningSession::new(profile, assumptions.clone());
            BookRow::from_plan(&compute_plan(&session, today))
        })
        .collect();

    println!("Plans complete in {:?}", calc_start.elapsed());

    let mut writer = csv::Writer::from_path(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    println!("Output written to {}", cli.output.display());

    let on_track = rows.iter().filter(|r| r.status == "OnTrack").count();
    let average = if rows.is_empty() {
        0.0
    } else {
        rows.iter().map(|r| r.readiness_score as f64).sum::<f64>() / rows.len() as f64
    };

    println!("\nBook Summary:");
    println!("  Households:        {}", rows.len());
    println!("  On track:          {}", on_track);
    println!("  Average readiness: {:.1}", average);
    println!("  Total income gap:  ${:.0}/yr", rows.iter().map(|r| r.income_gap).sum::<f64>());

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
