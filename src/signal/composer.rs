//! Aggregate recommendation across tenors.
//!
//! Selection rules:
//! 1. Any `BIND`: rank by (score desc, confidence desc). If the top two are
//!    within `near_tie`, the shorter tenor wins. The result is downgraded to
//!    `UNCERTAIN` when another tenor points strongly the other way while the
//!    winner is only moderately strong, or when the winner's confidence is low.
//! 2. Otherwise any `WAIT`: the most negative score wins (ties toward higher
//!    confidence), subject to the same confidence guard.
//! 3. Otherwise `UNCERTAIN`, explained by the highest-scoring tenor.
//!
//! The opportunity note is computed independently and may disagree with the
//! primary verdict.

use std::cmp::Ordering;

use crate::config::EngineConfig;
use crate::domain::{AggregateSignal, MarketEstimate, Opportunity, Tenor, TenorSignal, Verdict};

/// Combine all per-tenor signals of one decision cycle.
pub fn compose(
    per_tenor: Vec<TenorSignal>,
    estimates: &[MarketEstimate],
    config: &EngineConfig,
) -> AggregateSignal {
    let opportunity = max_opportunity(estimates, config);
    let (verdict, best_tenor, reasons) = decide(&per_tenor, config);

    tracing::info!(
        %verdict,
        best_tenor = ?best_tenor,
        opportunity = ?opportunity.as_ref().map(|o| &o.note),
        "aggregate recommendation"
    );

    AggregateSignal {
        verdict,
        best_tenor,
        opportunity,
        reasons,
        per_tenor,
    }
}

fn decide(signals: &[TenorSignal], config: &EngineConfig) -> (Verdict, Option<Tenor>, Vec<String>) {
    let a = &config.aggregate;

    if signals.is_empty() {
        return (
            Verdict::Uncertain,
            None,
            vec!["No tenor data available for assessment".to_string()],
        );
    }

    let mut binds: Vec<&TenorSignal> = signals.iter().filter(|s| s.verdict == Verdict::Bind).collect();
    let mut waits: Vec<&TenorSignal> = signals.iter().filter(|s| s.verdict == Verdict::Wait).collect();

    if !binds.is_empty() {
        binds.sort_by(|x, y| by_strength(x, y));
        let mut best = binds[0];
        let mut notes = Vec::new();

        if let Some(&runner_up) = binds.get(1) {
            if (best.score - runner_up.score).abs() < a.near_tie {
                if runner_up.tenor.years() < best.tenor.years() {
                    best = runner_up;
                }
                notes.push(
                    "Two tenors score nearly the same; choosing the shorter lock-in for lower risk".to_string(),
                );
            }
        }

        let mut reasons = vec![summary("Best bind by score", best)];
        reasons.extend(notes);

        let lowest = signals.iter().map(|s| s.score).fold(f64::INFINITY, f64::min);
        if lowest <= a.conflict_score && best.score < a.strong_bind_score {
            reasons.push("Tenors point in different directions, overall clarity is weak; staying UNCERTAIN".to_string());
            carry(&mut reasons, best, a.carried_reasons);
            return (Verdict::Uncertain, None, reasons);
        }
        if best.confidence < a.min_confidence {
            reasons.push("Low confidence in the best signal; UNCERTAIN rather than a hard BIND".to_string());
            carry(&mut reasons, best, a.carried_reasons);
            return (Verdict::Uncertain, None, reasons);
        }

        carry(&mut reasons, best, a.carried_reasons);
        return (Verdict::Bind, Some(best.tenor), reasons);
    }

    if !waits.is_empty() {
        waits.sort_by(|x, y| {
            x.score
                .total_cmp(&y.score)
                .then_with(|| y.confidence.total_cmp(&x.confidence))
        });
        let best = waits[0];
        let mut reasons = vec![
            summary("Strongest wait signal", best),
            "Tenor signals point to a lower next fixed rate".to_string(),
        ];

        if best.confidence < a.min_confidence {
            reasons.push("The signal is not robust enough; staying UNCERTAIN".to_string());
            carry(&mut reasons, best, a.carried_reasons);
            return (Verdict::Uncertain, None, reasons);
        }

        carry(&mut reasons, best, a.carried_reasons);
        return (Verdict::Wait, None, reasons);
    }

    let top = signals
        .iter()
        .min_by(|x, y| by_strength(x, y))
        .unwrap_or(&signals[0]);
    let mut reasons = vec![
        summary("Highest score", top),
        "No tenor scores strongly enough for a clear BIND or WAIT".to_string(),
    ];
    carry(&mut reasons, top, a.carried_reasons);
    (Verdict::Uncertain, None, reasons)
}

/// Score descending, then confidence descending.
fn by_strength(x: &TenorSignal, y: &TenorSignal) -> Ordering {
    y.score
        .total_cmp(&x.score)
        .then_with(|| y.confidence.total_cmp(&x.confidence))
}

fn summary(prefix: &str, signal: &TenorSignal) -> String {
    format!(
        "{prefix}: {} (score {:+.2}, confidence {:.2})",
        signal.tenor.label(),
        signal.score,
        signal.confidence
    )
}

fn carry(reasons: &mut Vec<String>, signal: &TenorSignal, n: usize) {
    reasons.extend(signal.reasons.iter().take(n).cloned());
}

/// The tenor with the largest projected swing, if it is large enough to mention.
pub fn max_opportunity(estimates: &[MarketEstimate], config: &EngineConfig) -> Option<Opportunity> {
    let mut best: Option<(Tenor, f64)> = None;
    for estimate in estimates {
        let Some(diff) = estimate.diff else {
            continue;
        };
        if best.is_none_or(|(_, b)| diff.abs() > b.abs()) {
            best = Some((estimate.tenor, diff));
        }
    }

    let (tenor, diff) = best?;
    if diff.abs() < config.aggregate.opportunity_min_diff {
        return None;
    }

    Some(if diff > 0.0 {
        Opportunity {
            verdict: Verdict::Bind,
            tenor,
            diff,
            note: format!("BIND {tenor}, largest projected gain from locking now ({diff:+.3}pp vs today's rate)"),
        }
    } else {
        Opportunity {
            verdict: Verdict::Wait,
            tenor,
            diff,
            note: format!(
                "WAIT ({tenor}), largest projected gain from waiting ({:.3}pp lower next rate)",
                diff.abs()
            ),
        }
    })
}
