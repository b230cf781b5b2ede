//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - assembled once per decision cycle and shared read-only across tenors
//! - exported to JSON
//! - reloaded later for reporting or comparisons

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fixed-rate lock-in period, identified by its bound-year count.
///
/// The configured tenors are 3, 5 and 10 years. Other values are representable
/// (an upstream source may report them) and are scored with the default tenor
/// penalty instead of being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tenor(u32);

impl Tenor {
    pub const THREE: Tenor = Tenor(3);
    pub const FIVE: Tenor = Tenor(5);
    pub const TEN: Tenor = Tenor(10);

    /// The configured tenors, in decision order.
    pub const ALL: [Tenor; 3] = [Tenor::THREE, Tenor::FIVE, Tenor::TEN];

    pub fn new(years: u32) -> Self {
        Self(years)
    }

    pub fn years(self) -> u32 {
        self.0
    }

    /// Human-readable label for terminal output and justifications.
    pub fn label(self) -> String {
        format!("{} yr", self.0)
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Y", self.0)
    }
}

/// A fixed rate for one tenor inside a `RateSnapshot`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedRate {
    pub tenor: Tenor,
    pub rate: f64,
}

/// The currently prevailing institutional rate set for one period.
///
/// Replaced wholesale on every refresh; never patched field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    /// Period label as published (e.g. "October 2026").
    pub period: String,
    /// Floating rate in percent.
    pub floating: f64,
    /// Zero or more fixed rates, one per tenor.
    #[serde(default)]
    pub fixed: Vec<FixedRate>,
}

impl RateSnapshot {
    /// Fixed rate for `tenor`, if one is published.
    pub fn fixed_rate(&self, tenor: Tenor) -> Option<f64> {
        self.fixed.iter().find(|r| r.tenor == tenor).map(|r| r.rate)
    }
}

/// An externally computed projection of the next prevailing fixed rate.
///
/// Rates are in percent, `diff` and `dispersion` in percentage points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEstimate {
    pub tenor: Tenor,
    /// Projected next rate.
    pub estimated: f64,
    /// Current rate the projection is compared against.
    #[serde(default)]
    pub current: Option<f64>,
    /// `estimated - current`; positive means the next period is likely pricier.
    #[serde(default)]
    pub diff: Option<f64>,
    /// Number of independent quotes backing the estimate.
    #[serde(default)]
    pub sample_count: u32,
    /// Standard deviation across the sampled quotes.
    #[serde(default)]
    pub dispersion: f64,
}

/// A single benchmark swap observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapHistoryPoint {
    pub observed_at: DateTime<Utc>,
    pub tenor: Tenor,
    /// Swap rate in percent.
    pub value: f64,
    #[serde(default = "default_source")]
    pub source: String,
}

fn default_source() -> String {
    "unknown".to_string()
}

/// A bank's fixed-rate product, used to derive a `MarketEstimate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankProduct {
    pub bank: String,
    #[serde(default)]
    pub product_name: String,
    pub nominal_rate: f64,
    pub effective_rate: f64,
    pub bound_years: u32,
}

/// Per-tenor and overall decision outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    /// Lock the fixed rate now.
    Bind,
    /// Stay floating until the next rate-setting window.
    Wait,
    Uncertain,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Bind => "BIND",
            Verdict::Wait => "WAIT",
            Verdict::Uncertain => "UNCERTAIN",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of the statistical quality behind an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataQuality {
    High,
    Medium,
    Low,
}

impl DataQuality {
    pub fn as_str(self) -> &'static str {
        match self {
            DataQuality::High => "high",
            DataQuality::Medium => "medium",
            DataQuality::Low => "low",
        }
    }
}

impl fmt::Display for DataQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scorer output for one tenor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenorSignal {
    pub tenor: Tenor,
    pub verdict: Verdict,
    /// Composite score, rounded to 3 decimals.
    pub score: f64,
    /// Confidence in `[0.10, 0.95]`, rounded to 2 decimals.
    pub confidence: f64,
    pub data_quality: DataQuality,

    pub current_rate: Option<f64>,
    pub estimated_next: Option<f64>,
    pub estimate_diff: Option<f64>,
    /// Currency difference over the whole tenor if the estimate holds.
    pub projected_total_diff: Option<f64>,
    /// Newest minus oldest swap value (3 dp), when at least two points exist.
    pub swap_trend: Option<f64>,
    pub swap_trend_days: i64,

    /// Ordered, human-readable audit trail.
    pub reasons: Vec<String>,
}

/// Advisory note naming the tenor with the largest projected swing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub verdict: Verdict,
    pub tenor: Tenor,
    pub diff: f64,
    pub note: String,
}

/// Composer output for one decision cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSignal {
    pub verdict: Verdict,
    /// Only set when the overall verdict is `BIND`.
    pub best_tenor: Option<Tenor>,
    pub opportunity: Option<Opportunity>,
    pub reasons: Vec<String>,
    pub per_tenor: Vec<TenorSignal>,
}

impl AggregateSignal {
    /// Headline recommendation, e.g. `BIND 3Y`, `WAIT` or `UNCERTAIN`.
    pub fn headline(&self) -> String {
        match (self.verdict, self.best_tenor) {
            (Verdict::Bind, Some(tenor)) => format!("BIND {tenor}"),
            (verdict, _) => verdict.to_string(),
        }
    }
}

/// Qualitative risk attached to a savings comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        })
    }
}

/// Monetary comparison of binding now vs. at the estimated next rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Savings {
    pub tenor: Tenor,
    pub fixed_rate: f64,
    pub estimated_next_rate: f64,
    pub loan_amount: f64,
    /// Positive: the next rate is higher, so binding now saves this much per year.
    pub annual_diff: f64,
    pub total_diff: f64,
    pub years: u32,
    pub bind_now: bool,
    pub risk: RiskLevel,
}
