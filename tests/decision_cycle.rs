use chrono::{DateTime, Duration, TimeZone, Utc};

use fixrate::app::pipeline::{DecisionOutput, run_cycle};
use fixrate::config::EngineConfig;
use fixrate::data::{ScenarioConfig, generate_scenario};
use fixrate::domain::{
    BankProduct, FixedRate, MarketEstimate, RateSnapshot, SwapHistoryPoint, Tenor, Verdict,
};
use fixrate::io::ingest::DecisionInput;

const LOAN: f64 = 500_000.0;

fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
}

fn snapshot(three: f64, five: f64, ten: f64) -> RateSnapshot {
    RateSnapshot {
        period: "October 2026".to_string(),
        floating: 4.80,
        fixed: vec![
            FixedRate { tenor: Tenor::THREE, rate: three },
            FixedRate { tenor: Tenor::FIVE, rate: five },
            FixedRate { tenor: Tenor::TEN, rate: ten },
        ],
    }
}

fn estimate(tenor: Tenor, current: f64, estimated: f64, samples: u32, dispersion: f64) -> MarketEstimate {
    MarketEstimate {
        tenor,
        estimated,
        current: Some(current),
        diff: Some(((estimated - current) * 1000.0).round() / 1000.0),
        sample_count: samples,
        dispersion,
    }
}

fn swap(tenor: Tenor, days_ago: i64, value: f64) -> SwapHistoryPoint {
    SwapHistoryPoint {
        observed_at: as_of() - Duration::days(days_ago),
        tenor,
        value,
        source: "test".to_string(),
    }
}

fn flat_history(tenor: Tenor) -> Vec<SwapHistoryPoint> {
    vec![swap(tenor, 89, 3.90), swap(tenor, 45, 3.92), swap(tenor, 0, 3.90)]
}

fn input(snapshot: RateSnapshot, estimates: Option<Vec<MarketEstimate>>) -> DecisionInput {
    DecisionInput {
        as_of: as_of(),
        loan_amount: None,
        snapshot: Some(snapshot),
        estimates,
        bank_products: Vec::new(),
        swap_history: Vec::new(),
    }
}

fn signal_for(output: &DecisionOutput, tenor: Tenor) -> &fixrate::domain::TenorSignal {
    output
        .signal
        .per_tenor
        .iter()
        .find(|s| s.tenor == tenor)
        .expect("tenor scored")
}

#[test]
fn clear_rise_binds_the_tenor() {
    let mut input = input(
        snapshot(4.50, 4.60, 4.80),
        Some(vec![estimate(Tenor::THREE, 4.50, 4.70, 6, 0.05)]),
    );
    input.swap_history = flat_history(Tenor::THREE);

    let output = run_cycle(&input, LOAN, &EngineConfig::default());

    let three = signal_for(&output, Tenor::THREE);
    assert_eq!(three.verdict, Verdict::Bind);
    assert!((three.score - 2.8).abs() < 1e-9);
    assert!((three.confidence - 0.75).abs() < 1e-9);

    assert_eq!(output.signal.verdict, Verdict::Bind);
    assert_eq!(output.signal.best_tenor, Some(Tenor::THREE));
    assert_eq!(output.signal.headline(), "BIND 3Y");
    assert!(output.signal.reasons[0].starts_with("Best bind by score: 3 yr"));

    let opportunity = output.signal.opportunity.as_ref().expect("opportunity");
    assert_eq!(opportunity.verdict, Verdict::Bind);
    assert_eq!(opportunity.tenor, Tenor::THREE);

    assert_eq!(output.savings.len(), 1);
    assert_eq!(output.savings[0].annual_diff, 1000.0);
    assert!(output.savings[0].bind_now);
}

#[test]
fn no_estimates_is_uncertain_everywhere() {
    let output = run_cycle(
        &input(snapshot(4.50, 4.60, 4.80), None),
        LOAN,
        &EngineConfig::default(),
    );

    assert_eq!(output.signal.verdict, Verdict::Uncertain);
    assert_eq!(output.signal.best_tenor, None);
    assert_eq!(output.signal.per_tenor.len(), 3);
    assert!(output.signal.per_tenor.iter().all(|s| s.verdict == Verdict::Uncertain));
    assert!(output.signal.opportunity.is_none());
    assert!(output.estimates.is_empty());
    assert!(output.savings.is_empty());
}

#[test]
fn conflicting_directions_stay_uncertain() {
    let mut input = input(
        snapshot(4.50, 4.60, 4.80),
        Some(vec![
            estimate(Tenor::FIVE, 4.60, 4.90, 2, 0.05),
            estimate(Tenor::TEN, 4.80, 4.40, 6, 0.05),
        ]),
    );
    input.swap_history = flat_history(Tenor::FIVE);
    input
        .swap_history
        .extend([swap(Tenor::TEN, 60, 3.50), swap(Tenor::TEN, 0, 3.20)]);

    let output = run_cycle(&input, LOAN, &EngineConfig::default());

    let five = signal_for(&output, Tenor::FIVE);
    let ten = signal_for(&output, Tenor::TEN);
    assert_eq!(five.verdict, Verdict::Bind);
    assert!(five.score < 1.5);
    assert_eq!(ten.verdict, Verdict::Wait);
    assert!(ten.score <= -1.5);

    assert_eq!(output.signal.verdict, Verdict::Uncertain);
    assert_eq!(output.signal.best_tenor, None);
    assert!(
        output
            .signal
            .reasons
            .iter()
            .any(|r| r.contains("different directions"))
    );

    // The side-note still highlights the biggest swing, even against the verdict.
    let opportunity = output.signal.opportunity.as_ref().expect("opportunity");
    assert_eq!(opportunity.verdict, Verdict::Wait);
    assert_eq!(opportunity.tenor, Tenor::TEN);
}

#[test]
fn savings_for_five_year_lock() {
    let output = run_cycle(
        &input(
            snapshot(3.90, 4.00, 4.20),
            Some(vec![estimate(Tenor::FIVE, 4.00, 4.30, 6, 0.05)]),
        ),
        LOAN,
        &EngineConfig::default(),
    );

    let five = output
        .savings
        .iter()
        .find(|s| s.tenor == Tenor::FIVE)
        .expect("5Y savings");
    assert_eq!(five.annual_diff, 1500.0);
    assert_eq!(five.total_diff, 7500.0);
    assert_eq!(five.years, 5);
    assert!(five.bind_now);
}

#[test]
fn near_tie_prefers_shorter_tenor() {
    let mut input = input(
        snapshot(4.50, 4.60, 4.80),
        Some(vec![
            estimate(Tenor::THREE, 4.50, 4.65, 6, 0.05),
            estimate(Tenor::FIVE, 4.60, 4.78, 6, 0.05),
        ]),
    );
    input.swap_history = flat_history(Tenor::THREE);
    input.swap_history.extend(flat_history(Tenor::FIVE));

    let output = run_cycle(&input, LOAN, &EngineConfig::default());

    assert!(signal_for(&output, Tenor::FIVE).score > signal_for(&output, Tenor::THREE).score);
    assert_eq!(output.signal.verdict, Verdict::Bind);
    assert_eq!(output.signal.best_tenor, Some(Tenor::THREE));
    assert!(output.signal.reasons.iter().any(|r| r.contains("shorter lock-in")));
}

#[test]
fn estimates_are_derived_from_bank_products() {
    let mut input = input(snapshot(4.50, 4.60, 4.80), None);
    input.bank_products = [4.90, 4.70, 4.80]
        .iter()
        .enumerate()
        .map(|(i, &rate)| BankProduct {
            bank: format!("Bank {i}"),
            product_name: "Fixed 3 yr".to_string(),
            nominal_rate: rate - 0.05,
            effective_rate: rate,
            bound_years: 3,
        })
        .collect();

    let output = run_cycle(&input, LOAN, &EngineConfig::default());

    assert_eq!(output.estimates.len(), 1);
    let est = &output.estimates[0];
    assert_eq!(est.tenor, Tenor::THREE);
    assert!((est.estimated - 4.65).abs() < 1e-9);
    assert!((est.diff.unwrap() - 0.15).abs() < 1e-9);
    assert_eq!(est.sample_count, 3);
    assert!((est.dispersion - 0.082).abs() < 1e-9);
}

#[test]
fn input_loan_amount_takes_precedence() {
    let mut input = input(
        snapshot(3.90, 4.00, 4.20),
        Some(vec![estimate(Tenor::FIVE, 4.00, 4.30, 6, 0.05)]),
    );
    input.loan_amount = Some(1_000_000.0);

    let output = run_cycle(&input, LOAN, &EngineConfig::default());

    assert_eq!(output.loan_amount, 1_000_000.0);
    assert_eq!(output.savings[0].annual_diff, 3000.0);
}

#[test]
fn window_info_follows_as_of() {
    let output = run_cycle(
        &input(snapshot(4.50, 4.60, 4.80), None),
        LOAN,
        &EngineConfig::default(),
    );
    let window = output.next_window.expect("next window");
    assert_eq!(window.start.to_string(), "2026-12-10");
    assert_eq!(output.days_to_window, Some(53));
}

#[test]
fn demo_scenario_is_deterministic() {
    let config = ScenarioConfig::new(7, as_of());
    let first = run_cycle(&generate_scenario(&config).unwrap(), LOAN, &EngineConfig::default());
    let second = run_cycle(&generate_scenario(&config).unwrap(), LOAN, &EngineConfig::default());

    assert_eq!(first, second);
    assert_eq!(first.signal.per_tenor.len(), 3);
}

#[test]
fn export_round_trips_through_json() {
    let mut input = input(
        snapshot(4.50, 4.60, 4.80),
        Some(vec![estimate(Tenor::THREE, 4.50, 4.70, 6, 0.05)]),
    );
    input.swap_history = flat_history(Tenor::THREE);
    let output = run_cycle(&input, LOAN, &EngineConfig::default());

    let path = std::env::temp_dir().join(format!("fixrate-export-{}.json", std::process::id()));
    fixrate::io::export::write_output_json(&path, &output).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    let back: DecisionOutput = serde_json::from_str(&text).unwrap();
    assert_eq!(back.as_of, output.as_of);
    assert_eq!(back.signal.verdict, Verdict::Bind);
    assert_eq!(back.signal.best_tenor, Some(Tenor::THREE));
    assert_eq!(back.signal.per_tenor.len(), 3);
    assert_eq!(back.signal.reasons, output.signal.reasons);
    assert_eq!(back.savings.len(), 1);
    assert!(text.contains("\"verdict\": \"BIND\""));
}

#[test]
fn non_standard_tenor_is_scored_with_default_penalty() {
    let seven = Tenor::new(7);
    let mut snapshot = snapshot(4.50, 4.60, 4.80);
    snapshot.fixed.push(FixedRate { tenor: seven, rate: 4.70 });
    let input = input(
        snapshot,
        Some(vec![
            estimate(Tenor::THREE, 4.50, 4.55, 6, 0.05),
            estimate(seven, 4.70, 5.20, 6, 0.05),
        ]),
    );

    let output = run_cycle(&input, LOAN, &EngineConfig::default());

    let tenors: Vec<u32> = output.signal.per_tenor.iter().map(|s| s.tenor.years()).collect();
    assert_eq!(tenors, vec![3, 5, 10, 7]);

    // 0.7 x 4.0 - 0.30 default penalty
    let seven_signal = signal_for(&output, seven);
    assert!((seven_signal.score - 2.5).abs() < 1e-9, "score={}", seven_signal.score);
    assert_eq!(seven_signal.verdict, Verdict::Bind);

    // The side-note never names a tenor that was not scored.
    let opportunity = output.signal.opportunity.as_ref().expect("opportunity");
    assert_eq!(opportunity.tenor, seven);
    assert!(output.signal.per_tenor.iter().any(|s| s.tenor == opportunity.tenor));
    assert_eq!(output.signal.best_tenor, Some(seven));

    let savings = output.savings.iter().find(|s| s.tenor == seven).expect("7Y savings");
    assert_eq!(savings.years, 7);
    assert_eq!(savings.annual_diff, 2500.0);
    assert_eq!(savings.total_diff, 17500.0);
}
