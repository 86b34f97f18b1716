//! Command Line Interface for the trading plan projector.
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;
use prettytable::{Table, row};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tradeplan_domain::config::Config;
use tradeplan_domain::enums::Scenario;
use tradeplan_domain::metrics::{estimate_bankruptcy_risk, instrument_streak_report};
use tradeplan_domain::math::risk_percent;
use tradeplan_domain::settings::Settings;
use tradeplan_domain::value_objects::{MonteCarloResult, ProjectionResult};
use tradeplan_simulation::prelude::*;

#[derive(Parser)]
#[command(name = "tradeplan")]
#[command(about = "Trading account growth projection and Monte Carlo risk simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project deposit growth month by month
    Project {
        #[command(flatten)]
        plan: PlanArgs,

        /// Print the full result as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Run a Monte Carlo simulation of the plan
    MonteCarlo {
        #[command(flatten)]
        plan: PlanArgs,

        /// Months simulated per iteration
        #[arg(long, default_value_t = 24)]
        months: u32,

        /// Number of iterations
        #[arg(short, long, default_value_t = 1000)]
        iterations: usize,

        /// Run seed
        #[arg(long, env = "TRADEPLAN_SEED", default_value_t = 42)]
        seed: u64,

        /// Run iterations on a single thread
        #[arg(long)]
        sequential: bool,
    },
    /// Estimate ruin probability and loss-streak statistics
    Risk {
        #[command(flatten)]
        plan: PlanArgs,

        /// Balance to evaluate (defaults to the initial deposit)
        #[arg(long)]
        deposit: Option<Decimal>,
    },
    /// Print the settings document with current allocations
    Settings {
        #[command(flatten)]
        plan: PlanArgs,

        /// Write the document to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct PlanArgs {
    /// Settings JSON file (defaults to the built-in plan)
    #[arg(short, long, env = "TRADEPLAN_SETTINGS")]
    settings: Option<PathBuf>,

    /// Initial deposit
    #[arg(long)]
    initial: Option<Decimal>,

    /// Target deposit
    #[arg(long)]
    target: Option<Decimal>,

    /// Base risk percent per month
    #[arg(long)]
    risk: Option<Decimal>,

    /// Monthly contribution
    #[arg(long)]
    contribution: Option<Decimal>,

    /// Scenario: pessimistic, realistic or optimistic
    #[arg(long)]
    scenario: Option<Scenario>,

    /// Projection horizon in months
    #[arg(long, default_value_t = 24)]
    horizon: u32,

    /// Start date for milestone dates (defaults to today)
    #[arg(long)]
    start_date: Option<NaiveDate>,
}

impl PlanArgs {
    fn load_settings(&self) -> Result<Settings> {
        let mut settings = match &self.settings {
            Some(path) => read_settings(path)?,
            None => Settings::default(),
        };
        if let Some(initial) = self.initial {
            settings.initial_deposit = initial;
        }
        if let Some(target) = self.target {
            settings.target_deposit = target;
        }
        if let Some(risk) = self.risk {
            settings.initial_risk_percent = risk;
        }
        if let Some(contribution) = self.contribution {
            settings.monthly_deposit = contribution;
        }
        if let Some(scenario) = self.scenario {
            settings.scenario_type = scenario.as_str().to_string();
        }
        Ok(settings)
    }

    fn load_config(&self) -> Result<Config> {
        let start_date = self
            .start_date
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        let config = self
            .load_settings()?
            .into_config(start_date)?
            .with_horizon(self.horizon);
        Ok(config)
    }
}

fn read_settings(path: &Path) -> Result<Settings> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file {}", path.display()))?;
    let settings = Settings::from_json(&json)
        .with_context(|| format!("failed to parse settings file {}", path.display()))?;
    info!(path = %path.display(), pairs = settings.trading_pairs.len(), "Loaded settings");
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Project { plan, json } => {
            let config = plan.load_config()?;
            let result = compute_projection(&config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_projection(&config, &result);
            }
        }
        Commands::MonteCarlo {
            plan,
            months,
            iterations,
            seed,
            sequential,
        } => {
            let config = plan.load_config()?;
            let settings = MonteCarloConfig::default()
                .with_months(months)
                .with_iterations(iterations)
                .with_seed(seed)
                .with_parallel(!sequential);

            println!("🎲 Running {} iterations over {} months (Ctrl-C to cancel)...", iterations, months);

            let service = MonteCarloService::new();
            let token = CancellationToken::new();
            let mut handle = tokio::task::spawn_blocking({
                let service = service.clone();
                let token = token.clone();
                let config = config.clone();
                move || service.run(&config, &settings, token)
            });

            let outcome = tokio::select! {
                joined = &mut handle => joined?,
                _ = tokio::signal::ctrl_c() => {
                    warn!("Interrupt received, cancelling simulation");
                    token.cancel();
                    handle.await?
                }
            };

            match outcome {
                Ok(result) => print_monte_carlo(&config, &result),
                Err(SimulationError::Cancelled) => println!("❌ Simulation cancelled."),
                Err(err) => return Err(err.into()),
            }
        }
        Commands::Risk { plan, deposit } => {
            let config = plan.load_config()?;
            let deposit = deposit.unwrap_or(config.initial_deposit);
            let risk = risk_percent(deposit, config.base_risk_percent);
            let estimate = estimate_bankruptcy_risk(deposit, risk, &config.instruments)?;

            println!("⚠️  Ruin estimate for a {} deposit at {}% risk", deposit.round_dp(2), risk.round_dp(2));
            let mut table = Table::new();
            table.add_row(row!["Probability", format!("{}%", estimate.probability_percent)]);
            table.add_row(row!["Critical loss streak", estimate.critical_loss_streak]);
            table.add_row(row![
                "Expected months to risk",
                estimate
                    .expected_months_to_risk
                    .map_or_else(|| "never".to_string(), |m| m.to_string())
            ]);
            table.add_row(row!["Weighted win rate", format!("{}%", estimate.weighted_win_rate.round_dp(2))]);
            table.add_row(row!["Weighted reward:risk", estimate.weighted_reward_risk.round_dp(2)]);
            table.printstd();

            let mut streaks = Table::new();
            streaks.set_titles(row!["Pair", "3 losses in a row", "Expected streak", "Most probable streak"]);
            for report in instrument_streak_report(&config.instruments) {
                streaks.add_row(row![
                    report.symbol,
                    format!("{}%", report.three_in_a_row_pct.round_dp(2)),
                    report.profile.expected,
                    report.profile.most_probable
                ]);
            }
            streaks.printstd();
        }
        Commands::Settings { plan, output } => {
            let mut settings = plan.load_settings()?;
            settings.refresh_allocations()?;
            let json = settings.to_json_pretty()?;
            match output {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("✅ Settings written to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
    }

    Ok(())
}

fn print_projection(config: &Config, result: &ProjectionResult) {
    if result.target_reached {
        println!(
            "✅ Target {} reached in {} months ({} days)",
            config.target_deposit, result.months_elapsed, result.days
        );
    } else {
        println!(
            "❌ Target {} not reached within {} months",
            config.target_deposit, config.horizon_months
        );
    }

    let bands = result.growth_bands();
    println!(
        "Final deposit: {} | Avg monthly growth: {}% (pessimistic {}%, optimistic {}%)",
        result.final_deposit.round_dp(2),
        bands.realistic.round_dp(2),
        bands.pessimistic.round_dp(2),
        bands.optimistic.round_dp(2)
    );
    println!(
        "Max drawdown: {}% over {} months | Max monthly risk: {}",
        result.max_drawdown_percent.round_dp(2),
        result.max_drawdown_duration_months,
        result.max_risk_amount().round_dp(2)
    );

    let mut months = Table::new();
    months.set_titles(row!["Month", "Deposit", "Growth %", "Profit", "Risk %", "Risk", "Trades", "Fees", "Drawdown %"]);
    let mut previous: Option<Decimal> = None;
    for record in &result.monthly_data {
        let growth = previous
            .and_then(|p| record.growth_pct(p))
            .map_or_else(String::new, |g| g.round_dp(2).to_string());
        previous = Some(record.deposit);
        months.add_row(row![
            record.month,
            record.deposit.round_dp(2),
            growth,
            record.profit.round_dp(2),
            record.risk_percent.round_dp(2),
            record.risk_amount.round_dp(2),
            record.trades,
            record.fees.round_dp(2),
            record.drawdown_percent.round_dp(2)
        ]);
    }
    months.printstd();

    let mut milestones = Table::new();
    milestones.set_titles(row!["Target", "Month", "Days", "Date", "Risk %", "Note"]);
    for milestone in &result.milestones {
        milestones.add_row(row![
            milestone.target_amount,
            milestone.months_to_reach,
            milestone.days,
            milestone.projected_date,
            milestone.risk_percent_at_crossing.round_dp(2),
            milestone.note.as_deref().unwrap_or("")
        ]);
    }
    milestones.printstd();

    let mut pairs = Table::new();
    pairs.set_titles(row!["Pair", "Profit", "Trades", "Contribution %"]);
    for pair in &result.instrument_results {
        pairs.add_row(row![
            pair.symbol,
            pair.total_profit.round_dp(2),
            pair.total_trades,
            pair.contribution_percent.round_dp(1)
        ]);
    }
    pairs.printstd();
}

fn print_monte_carlo(config: &Config, result: &MonteCarloResult) {
    let mut table = Table::new();
    table.set_titles(row!["Cut", "Final deposit", "ROI %", "CAGR %", "Max drawdown %"]);
    for (label, iteration) in result.percentile_cuts.labeled() {
        table.add_row(row![
            label,
            iteration.final_deposit.round_dp(2),
            iteration.roi_percent.round_dp(2),
            iteration.cagr_percent.round_dp(2),
            iteration.max_drawdown_percent.round_dp(2)
        ]);
    }
    table.printstd();

    let hundred = Decimal::ONE_HUNDRED;
    println!(
        "Average final deposit: {} | Average max drawdown: {}%",
        result.average_final_deposit.round_dp(2),
        result.average_max_drawdown.round_dp(2)
    );
    println!(
        "Probability of doubling {}: {}% | Probability of loss: {}%",
        config.initial_deposit,
        (result.probability_of_doubling * hundred).round_dp(1),
        (result.probability_of_loss * hundred).round_dp(1)
    );
}
