use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::thread;
use std::time::Duration;
use tradeplan_domain::config::Config;
use tradeplan_domain::settings::Settings;
use tradeplan_simulation::prelude::*;

fn default_plan() -> Config {
    Settings::default()
        .into_config(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
        .unwrap()
}

fn quick() -> MonteCarloConfig {
    MonteCarloConfig::default()
        .with_months(12)
        .with_iterations(200)
        .with_seed(2024)
}

#[test]
fn test_percentiles_are_monotonic() {
    let result = run_monte_carlo(&default_plan(), &quick()).unwrap();
    let cuts = &result.percentile_cuts;
    assert!(cuts.worst.final_deposit <= cuts.p10.final_deposit);
    assert!(cuts.p10.final_deposit <= cuts.p25.final_deposit);
    assert!(cuts.p25.final_deposit <= cuts.p50.final_deposit);
    assert!(cuts.p50.final_deposit <= cuts.p75.final_deposit);
    assert!(cuts.p75.final_deposit <= cuts.p90.final_deposit);
    assert!(cuts.p90.final_deposit <= cuts.best.final_deposit);

    assert!(result.average_final_deposit >= cuts.worst.final_deposit);
    assert!(result.average_final_deposit <= cuts.best.final_deposit);
    assert!(result.probability_of_doubling >= Decimal::ZERO);
    assert!(result.probability_of_doubling <= Decimal::ONE);
    assert!(result.probability_of_doubling + result.probability_of_loss <= Decimal::ONE);
}

#[test]
fn test_parallel_matches_sequential() {
    let config = default_plan();
    let parallel = run_monte_carlo(&config, &quick().with_parallel(true)).unwrap();
    let sequential = run_monte_carlo(&config, &quick().with_parallel(false)).unwrap();
    assert_eq!(parallel, sequential);
}

#[test]
fn test_percentile_traces() {
    let result = run_monte_carlo(&default_plan(), &quick()).unwrap();
    let traces = result.percentile_traces();
    assert_eq!(traces[2].0, "p50");
    for (_, trace) in traces {
        assert_eq!(trace.len(), 12);
        assert!(trace.windows(2).all(|w| w[0].month + 1 == w[1].month));
    }
}

#[test]
fn test_service_rejects_concurrent_runs() {
    let service = MonteCarloService::new();
    let config = default_plan();
    let heavy = MonteCarloConfig::default()
        .with_months(24)
        .with_iterations(20_000)
        .with_parallel(false);

    let token = CancellationToken::new();
    let runner = {
        let service = service.clone();
        let config = config.clone();
        let token = token.clone();
        thread::spawn(move || service.run(&config, &heavy, token))
    };

    while !service.is_running() && !runner.is_finished() {
        thread::sleep(Duration::from_millis(1));
    }
    if service.is_running() {
        let second = service.run(&config, &quick(), CancellationToken::new());
        assert_eq!(second, Err(SimulationError::Busy));
    }

    token.cancel();
    let first = runner.join().unwrap();
    assert!(matches!(first, Ok(_) | Err(SimulationError::Cancelled)));
    assert!(!service.is_running());

    // the slot is free again
    assert!(service.run(&config, &quick(), CancellationToken::new()).is_ok());
}

#[test]
fn test_service_cancel_discards_run() {
    let service = MonteCarloService::new();
    let config = default_plan();
    let heavy = MonteCarloConfig::default()
        .with_months(24)
        .with_iterations(50_000)
        .with_parallel(false);

    let runner = {
        let service = service.clone();
        let config = config.clone();
        thread::spawn(move || service.run(&config, &heavy, CancellationToken::new()))
    };

    let mut cancelled = false;
    while !runner.is_finished() {
        if service.cancel() {
            cancelled = true;
            break;
        }
        thread::sleep(Duration::from_millis(1));
    }
    let outcome = runner.join().unwrap();
    if cancelled {
        assert_eq!(outcome, Err(SimulationError::Cancelled));
    }
    assert!(!service.is_running());
}
