//! Advisory Planner CLI
//!
//! Computes the full plan for one household profile and prints a summary

use std::fs::File;
use std::path::PathBuf;

use advisory_planner::{
    assumptions::PlanningAssumptions,
    pipeline::{compute_plan, generate_actions, PlanningSession},
    profile::{load_accounts, load_expenses, load_life_events, load_profile},
    timeline::group_items,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "advisory_planner",
    version,
    about = "Household financial plan: scenarios, readiness, glide path and project funding"
)]
struct Cli {
    /// Client profile (JSON)
    profile: PathBuf,

    /// Directory holding planning_assumptions.csv (built-in defaults when omitted)
    #[arg(long)]
    assumptions: Option<PathBuf>,

    /// Valuation date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Detected life events (JSON) to import as goals and projects
    #[arg(long)]
    events: Option<PathBuf>,

    /// Expense export (CSV) replacing the profile's expenses
    #[arg(long)]
    expenses: Option<PathBuf>,

    /// Account export (CSV) replacing the profile's accounts
    #[arg(long)]
    accounts: Option<PathBuf>,

    /// Write the scenario series to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the full computed snapshot to this JSON file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Also generate the action timeline
    #[arg(long)]
    actions: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    println!("Advisory Planner v{}", env!("CARGO_PKG_VERSION"));
    println!("=======================\n");

    let today = cli.today.unwrap_or_else(|| chrono::Local::now().date_naive());

    let assumptions = match &cli.assumptions {
        Some(dir) => PlanningAssumptions::from_csv_path(dir)
            .with_context(|| format!("loading assumptions from {}", dir.display()))?,
        None => PlanningAssumptions::default_planning(),
    };

    let mut profile = load_profile(&cli.profile)
        .with_context(|| format!("loading profile {}", cli.profile.display()))?;
    if let Some(path) = &cli.expenses {
        profile.expenses = load_expenses(path).with_context(|| format!("loading expenses {}", path.display()))?;
    }
    if let Some(path) = &cli.accounts {
        profile.accounts = load_accounts(path).with_context(|| format!("loading accounts {}", path.display()))?;
    }

    let mut session = PlanningSession::new(profile, assumptions);
    if let Some(path) = &cli.events {
        let events = load_life_events(path).with_context(|| format!("loading events {}", path.display()))?;
        let (imported, outcome) = session.import_events(&events, today);
        println!(
            "Imported {} goal(s) from {} event(s), {} skipped",
            outcome.imported.len(),
            events.len(),
            outcome.skipped.len()
        );
        session = imported;
    }

    let plan = compute_plan(&session, today);

    println!("Client: {}  (as of {})", plan.client_name, plan.as_of);
    println!("  Net worth:     ${:>14.2}", plan.net_worth);
    println!("  Savings rate:  {:>14.1}%", plan.savings_rate);
    println!("  Annual saving: ${:>14.2}", plan.annual_savings);
    println!();

    println!("Net worth scenarios ({} years):", plan.scenarios.rows.len().saturating_sub(1));
    println!("{:>6} {:>16} {:>16} {:>16} {:>16}", "Year", "Optimistic", "Expected", "Conservative", "Real");
    println!("{}", "-".repeat(74));
    for row in plan.scenarios.rows.iter().step_by(5) {
        println!(
            "{:>6} {:>16.2} {:>16.2} {:>16.2} {:>16.2}",
            row.year, row.optimistic, row.expected, row.conservative, row.real
        );
    }
    if let Some(summary) = &plan.scenario_summary {
        println!(
            "  {}: expected ${:.0} (${:.0} in today's money), range ${:.0}",
            summary.final_year, summary.expected, summary.real, summary.range
        );
    }
    println!();

    let readiness = &plan.readiness;
    println!("Retirement readiness: {} ({:?})", readiness.readiness_score, readiness.status);
    println!("  Required portfolio:  ${:.2}", readiness.required_portfolio);
    println!("  Projected savings:   ${:.2}", readiness.projected_savings);
    println!("  Projected income:    ${:.2}/yr", readiness.total_projected_income);
    println!("  Income gap:          ${:.2}/yr", readiness.income_gap);
    println!();

    if let Some(target) = plan.glide_path.target_at(plan.glide_path.current_age) {
        println!(
            "Glide path at age {}: {}/{}/{} stocks/bonds/cash",
            target.age, target.stocks, target.bonds, target.cash
        );
    }
    if let Some(signal) = &plan.rebalance {
        println!(
            "  Current stocks {:.1}% vs target {}%: {}",
            signal.current_stocks,
            signal.target_stocks,
            if signal.needs_rebalancing { "rebalance" } else { "within range" }
        );
    }
    println!();

    if !plan.goals.is_empty() {
        println!("Goals:");
        for goal in &plan.goals {
            println!(
                "  {:<28} {:>6.1}%  {:>5}  ${:.0} to go",
                goal.name,
                goal.progress_pct,
                goal.horizon.as_str(),
                goal.remaining_amount
            );
        }
        println!();
    }

    for funding in &plan.projects {
        println!(
            "Project {}: cost ${:.0}, funding ${:.0}, gap ${:.0} ({:?})",
            funding.project_id, funding.total_cost, funding.total_funding, funding.funding_gap, funding.status
        );
    }

    if !plan.issues.is_empty() {
        println!("\nValidation ({}):", plan.issues.len());
        for issue in &plan.issues {
            println!("  [{:?}] {}: {}", issue.severity, issue.field, issue.message);
        }
    }

    if cli.actions {
        let actions = generate_actions(&session, today);
        println!("\nAction timeline ({} items):", actions.len());
        for (label, items) in group_items(&actions) {
            println!("  {}", label);
            for item in items {
                println!("    - [{}] {}", item.timing.year.map(|y| y.to_string()).unwrap_or_default(), item.action);
            }
        }
    }

    if let Some(path) = &cli.csv {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("creating {}", path.display()))?;
        for row in &plan.scenarios.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        println!("\nScenario series written to: {}", path.display());
    }

    if let Some(path) = &cli.json {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(file, &plan)?;
        println!("Snapshot written to: {}", path.display());
    }

    Ok(())
}
