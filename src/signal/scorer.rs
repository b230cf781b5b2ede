//! Per-tenor signal scoring.
//!
//! Three weak inputs are fused into one score:
//!
//! - rate signal: the estimated change in the next fixed rate
//! - trend signal: the change in the benchmark swap rate across the lookback
//! - quality penalty: thin or dispersed estimates cost score
//!
//! `score = w_rate * rate_score + w_trend * trend_score - quality_penalty - tenor_penalty`
//!
//! The verdict compares the score against a decision margin that widens when
//! the inputs are individually thin. Scoring is a pure function of its inputs.

use crate::config::EngineConfig;
use crate::domain::{DataQuality, MarketEstimate, SwapHistoryPoint, Tenor, TenorSignal, Verdict};

/// Estimate moves beyond this (pp) are described as directional.
const NOTABLE_DIFF: f64 = 0.05;
/// Swap moves beyond this (pp) are described as rising/falling.
const NOTABLE_TREND: f64 = 0.10;
/// Spans at least this long are reported as the full lookback.
const FULL_WINDOW_LABEL_DAYS: i64 = 80;

/// Everything the scorer reads for one tenor.
#[derive(Debug, Clone, Copy)]
pub struct TenorInput<'a> {
    pub tenor: Tenor,
    pub current_rate: Option<f64>,
    pub estimate: Option<&'a MarketEstimate>,
    /// Swap observations inside the lookback window.
    pub history: &'a [SwapHistoryPoint],
    /// Enables `projected_total_diff` on the output.
    pub loan_amount: Option<f64>,
}

/// Oldest-to-newest swap movement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendReading {
    /// `None` with fewer than two points.
    pub trend: Option<f64>,
    pub days: i64,
    pub points: usize,
    pub established: bool,
}

/// Score one tenor.
pub fn score_tenor(input: &TenorInput<'_>, config: &EngineConfig) -> TenorSignal {
    let label = input.tenor.label();
    let est_next = input.estimate.map(|e| e.estimated);
    let est_diff = input.estimate.and_then(|e| e.diff);
    let sample_count = input.estimate.map(|e| e.sample_count).unwrap_or(0);
    let dispersion = input.estimate.map(|e| e.dispersion).unwrap_or(0.0);
    let years = input.tenor.years();

    let projected_total_diff = est_diff
        .zip(input.loan_amount)
        .map(|(d, amount)| ((d / 100.0) * amount * years as f64).round());

    let trend = read_trend(input.history, config.score.trend_min_days);

    let rate_score = rate_score(est_diff, config);
    let trend_score = trend_score(&trend, config);
    let quality_penalty = quality_penalty(input.estimate, config);
    let data_quality = classify_quality(quality_penalty, config);
    let tenor_penalty = config.tenor.penalty_for(input.tenor);

    let score = round_to(
        config.score.rate_weight * rate_score + config.score.trend_weight * trend_score
            - quality_penalty
            - tenor_penalty,
        3,
    );
    let confidence = confidence(est_diff, trend_score, trend.established, quality_penalty, config);
    let margin = decision_margin(trend.established, sample_count, dispersion, config);

    let mut reasons = Vec::with_capacity(6);
    reasons.push(rate_observation(&label, input.current_rate, est_next, est_diff));
    if let Some(line) = trend_observation(&label, &trend) {
        reasons.push(line);
    }
    reasons.push(format!(
        "Data quality: {data_quality} (samples={sample_count}, dispersion={dispersion:.3})"
    ));
    reasons.push(format!(
        "Score: {score:+.2} = {:.1} x rate signal ({rate_score:+.2}) + {:.1} x swap signal ({trend_score:+.2}) \
         - data penalty ({quality_penalty:.2}) - tenor penalty ({tenor_penalty:.2})",
        config.score.rate_weight, config.score.trend_weight,
    ));

    let verdict = match est_diff {
        None => {
            reasons.push("Missing rate estimate, cannot give a robust recommendation".to_string());
            Verdict::Uncertain
        }
        Some(d)
            if d.abs() < config.decision.noise_diff
                && trend_score.abs() < config.decision.noise_trend_score =>
        {
            reasons.push("Small moves in both the estimate and the swap trend, the signal is weak".to_string());
            Verdict::Uncertain
        }
        Some(_) if score >= margin => Verdict::Bind,
        Some(_) if score <= -margin => Verdict::Wait,
        Some(_) => {
            reasons.push("Score is in the gray zone, neither a clear BIND nor a clear WAIT".to_string());
            Verdict::Uncertain
        }
    };

    tracing::debug!(
        tenor = %input.tenor,
        %verdict,
        score,
        confidence,
        margin,
        "scored tenor"
    );

    TenorSignal {
        tenor: input.tenor,
        verdict,
        score,
        confidence,
        data_quality,
        current_rate: input.current_rate,
        estimated_next: est_next,
        estimate_diff: est_diff,
        projected_total_diff,
        swap_trend: trend.trend,
        swap_trend_days: trend.days,
        reasons,
    }
}

/// Compare the oldest and newest observation.
///
/// Only the two endpoints matter; the points need not be sorted.
pub fn read_trend(history: &[SwapHistoryPoint], min_days: i64) -> TrendReading {
    let oldest = history.iter().min_by_key(|p| p.observed_at);
    let newest = history.iter().max_by_key(|p| p.observed_at);

    match (oldest, newest) {
        (Some(oldest), Some(newest)) if history.len() >= 2 => {
            let days = (newest.observed_at - oldest.observed_at).num_days();
            TrendReading {
                trend: Some(round_to(newest.value - oldest.value, 3)),
                days,
                points: history.len(),
                established: days >= min_days,
            }
        }
        _ => TrendReading {
            trend: None,
            days: 0,
            points: history.len(),
            established: false,
        },
    }
}

fn rate_score(est_diff: Option<f64>, config: &EngineConfig) -> f64 {
    let p = &config.score;
    est_diff
        .map(|d| (d / p.rate_unit).clamp(-p.rate_cap, p.rate_cap))
        .unwrap_or(0.0)
}

fn trend_score(trend: &TrendReading, config: &EngineConfig) -> f64 {
    let p = &config.score;
    match trend.trend {
        Some(t) if trend.established => (t / p.trend_unit).clamp(-p.trend_cap, p.trend_cap),
        _ => 0.0,
    }
}

/// Additive cost for thin or dispersed estimates.
pub fn quality_penalty(estimate: Option<&MarketEstimate>, config: &EngineConfig) -> f64 {
    let q = &config.quality;
    let Some(estimate) = estimate else {
        return q.missing_estimate_penalty;
    };

    let mut penalty = 0.0;
    if estimate.sample_count < q.min_samples {
        penalty += q.few_samples_penalty;
    } else if estimate.sample_count < q.good_samples {
        penalty += q.some_samples_penalty;
    }
    if estimate.dispersion > q.dispersion_floor {
        penalty += ((estimate.dispersion - q.dispersion_floor) / q.dispersion_floor)
            .min(q.dispersion_penalty_cap);
    }
    penalty
}

pub fn classify_quality(penalty: f64, config: &EngineConfig) -> DataQuality {
    if penalty <= config.quality.high_max {
        DataQuality::High
    } else if penalty <= config.quality.medium_max {
        DataQuality::Medium
    } else {
        DataQuality::Low
    }
}

fn confidence(
    est_diff: Option<f64>,
    trend_score: f64,
    trend_established: bool,
    quality_penalty: f64,
    config: &EngineConfig,
) -> f64 {
    let c = &config.confidence;
    let evidence = est_diff
        .map(|d| (d.abs() / c.full_evidence_diff).min(1.0))
        .unwrap_or(0.0);
    let trend_evidence = if trend_established {
        (trend_score.abs() / config.score.trend_cap).min(1.0)
    } else {
        c.missing_trend_evidence
    };
    let quality_factor = (1.0 - quality_penalty / c.quality_scale).max(0.0);

    let mut confidence =
        c.evidence_weight * evidence + c.trend_weight * trend_evidence + c.quality_weight * quality_factor;
    if !trend_established {
        confidence -= c.missing_trend_deduction;
    }
    round_to(confidence.clamp(c.min, c.max), 2)
}

/// Threshold `|score|` must reach for `BIND` / `WAIT`.
pub fn decision_margin(
    trend_established: bool,
    sample_count: u32,
    dispersion: f64,
    config: &EngineConfig,
) -> f64 {
    let d = &config.decision;
    let mut margin = d.base_margin;
    if !trend_established {
        margin += d.missing_trend_margin;
    }
    if sample_count > 0 && sample_count < config.quality.good_samples {
        margin += d.few_samples_margin;
    }
    if dispersion > d.high_dispersion {
        margin += d.high_dispersion_margin;
    }
    margin
}

fn rate_observation(
    label: &str,
    current: Option<f64>,
    est_next: Option<f64>,
    est_diff: Option<f64>,
) -> String {
    match (current, est_next, est_diff) {
        (Some(current), Some(next), Some(diff)) => {
            let head = format!("Now: {current:.3}% -> est. next: {next:.3}%");
            if diff > NOTABLE_DIFF {
                format!("{head} ({diff:+.3}pp), binding now is cheaper than waiting")
            } else if diff < -NOTABLE_DIFF {
                format!("{head} ({diff:+.3}pp), the next period is expected to be cheaper")
            } else {
                format!("{head} ({diff:+.3}pp), roughly unchanged")
            }
        }
        (Some(current), _, _) => {
            format!("Current fixed rate: {current:.3}% (no estimate for the next period)")
        }
        (None, Some(next), _) => {
            format!("Estimated next rate: {next:.3}% (no current {label} rate to compare against)")
        }
        (None, None, _) => format!("No current rate or estimate available for {label}"),
    }
}

fn trend_observation(label: &str, trend: &TrendReading) -> Option<String> {
    match trend.trend {
        Some(t) if trend.established => {
            let period = if trend.days < FULL_WINDOW_LABEL_DAYS {
                format!("last {}d", trend.days)
            } else {
                "last 90d".to_string()
            };
            Some(if t > NOTABLE_TREND {
                format!("Swap {label} rose {t:+.2}pp {period}, the market expects higher rates")
            } else if t < -NOTABLE_TREND {
                format!("Swap {label} fell {t:+.2}pp {period}, the market expects lower rates")
            } else {
                format!("Swap {label} stable ({t:+.2}pp {period})")
            })
        }
        Some(_) => Some(format!(
            "Swap history for {label} spans only {}d, too short to read a trend",
            trend.days
        )),
        None if trend.points < 2 => Some(format!(
            "Missing swap history for {label}, cannot assess the trend"
        )),
        None => None,
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
