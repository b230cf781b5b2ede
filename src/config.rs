//! Engine constants and process settings.
//!
//! Every threshold the scorer, composer and savings estimator use lives in
//! `EngineConfig` and is passed in explicitly, so tests can vary one knob at a
//! time. All fields default to the hand-tuned values; a TOML file only needs to
//! list the ones it overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::Tenor;
use crate::error::AppError;

pub const DEFAULT_LOAN_AMOUNT: f64 = 500_000.0;
/// Upper bound for any day-count setting (ten years).
pub const MAX_LOOKBACK_DAYS: i64 = 3650;

/// How the rate and trend signals are scaled and combined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreParams {
    /// Estimate difference (pp) worth one unit of rate score.
    pub rate_unit: f64,
    pub rate_cap: f64,
    /// Swap trend (pp) worth one unit of trend score.
    pub trend_unit: f64,
    pub trend_cap: f64,
    /// Minimum oldest-to-newest span for a trend to count.
    pub trend_min_days: i64,
    pub rate_weight: f64,
    pub trend_weight: f64,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            rate_unit: 0.05,
            rate_cap: 4.0,
            trend_unit: 0.10,
            trend_cap: 3.0,
            trend_min_days: 14,
            rate_weight: 0.7,
            trend_weight: 0.3,
        }
    }
}

/// Additive data-quality penalty and its classification cut-offs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityParams {
    pub missing_estimate_penalty: f64,
    /// Below this sample count the estimate is considered thin.
    pub min_samples: u32,
    pub few_samples_penalty: f64,
    /// Below this sample count (but at least `min_samples`) a smaller penalty applies.
    pub good_samples: u32,
    pub some_samples_penalty: f64,
    /// Dispersion above this costs `(dispersion - floor) / floor`, capped.
    pub dispersion_floor: f64,
    pub dispersion_penalty_cap: f64,
    /// Penalty at or below this is `high` quality.
    pub high_max: f64,
    /// Penalty at or below this is `medium` quality; above is `low`.
    pub medium_max: f64,
}

impl Default for QualityParams {
    fn default() -> Self {
        Self {
            missing_estimate_penalty: 1.2,
            min_samples: 3,
            few_samples_penalty: 1.2,
            good_samples: 5,
            some_samples_penalty: 0.5,
            dispersion_floor: 0.10,
            dispersion_penalty_cap: 1.2,
            high_max: 0.4,
            medium_max: 1.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TenorPenalty {
    pub years: u32,
    pub penalty: f64,
}

/// Longer commitments need a stronger signal before `BIND`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TenorParams {
    pub penalties: Vec<TenorPenalty>,
    /// Applied to any tenor missing from `penalties`.
    pub default_penalty: f64,
}

impl Default for TenorParams {
    fn default() -> Self {
        Self {
            penalties: vec![
                TenorPenalty { years: 3, penalty: 0.00 },
                TenorPenalty { years: 5, penalty: 0.25 },
                TenorPenalty { years: 10, penalty: 0.60 },
            ],
            default_penalty: 0.30,
        }
    }
}

impl TenorParams {
    pub fn penalty_for(&self, tenor: Tenor) -> f64 {
        self.penalties
            .iter()
            .find(|p| p.years == tenor.years())
            .map(|p| p.penalty)
            .unwrap_or(self.default_penalty)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceParams {
    /// Estimate difference (pp) that counts as full evidence.
    pub full_evidence_diff: f64,
    /// Trend evidence credited when no trend is established.
    pub missing_trend_evidence: f64,
    /// Quality penalty at which the quality factor reaches zero.
    pub quality_scale: f64,
    pub evidence_weight: f64,
    pub trend_weight: f64,
    pub quality_weight: f64,
    pub missing_trend_deduction: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for ConfidenceParams {
    fn default() -> Self {
        Self {
            full_evidence_diff: 0.20,
            missing_trend_evidence: 0.3,
            quality_scale: 2.4,
            evidence_weight: 0.55,
            trend_weight: 0.25,
            quality_weight: 0.20,
            missing_trend_deduction: 0.05,
            min: 0.10,
            max: 0.95,
        }
    }
}

/// Score threshold a tenor must clear for `BIND` / `WAIT`, plus the noise filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionParams {
    pub base_margin: f64,
    pub missing_trend_margin: f64,
    pub few_samples_margin: f64,
    pub high_dispersion: f64,
    pub high_dispersion_margin: f64,
    /// Both `|diff|` and `|trend_score|` below these is noise.
    pub noise_diff: f64,
    pub noise_trend_score: f64,
}

impl Default for DecisionParams {
    fn default() -> Self {
        Self {
            base_margin: 1.0,
            missing_trend_margin: 0.2,
            few_samples_margin: 0.2,
            high_dispersion: 0.15,
            high_dispersion_margin: 0.2,
            noise_diff: 0.03,
            noise_trend_score: 0.8,
        }
    }
}

/// Cross-tenor tie-breaking and guard thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateParams {
    /// Top two `BIND` scores closer than this are a near-tie (shorter tenor wins).
    pub near_tie: f64,
    /// A score at or below this anywhere conflicts with a weak `BIND`.
    pub conflict_score: f64,
    /// `BIND` winners scoring below this are considered weak.
    pub strong_bind_score: f64,
    pub min_confidence: f64,
    /// Smallest `|diff|` worth an opportunity note.
    pub opportunity_min_diff: f64,
    /// How many of the chosen tenor's own reasons to repeat.
    pub carried_reasons: usize,
}

impl Default for AggregateParams {
    fn default() -> Self {
        Self {
            near_tie: 0.25,
            conflict_score: -1.5,
            strong_bind_score: 1.5,
            min_confidence: 0.45,
            opportunity_min_diff: 0.01,
            carried_reasons: 2,
        }
    }
}

/// Thresholds for the savings risk label. Independent of `QualityParams`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskParams {
    pub high_dispersion: f64,
    pub elevated_dispersion: f64,
    pub min_samples: u32,
    pub good_samples: u32,
    pub long_tenor_years: u32,
    /// Total risk points at or below this is `low`.
    pub low_max: u32,
    /// Total risk points at or below this is `medium`; above is `high`.
    pub medium_max: u32,
}

impl Default for RiskParams {
    fn default() -> Self {
        Self {
            high_dispersion: 0.25,
            elevated_dispersion: 0.10,
            min_samples: 3,
            good_samples: 5,
            long_tenor_years: 10,
            low_max: 1,
            medium_max: 3,
        }
    }
}

/// Inputs to next-rate estimation and history windowing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketParams {
    /// The institution prices its fixed rates this far (pp) below the bank average.
    pub lender_margin: f64,
    /// Cheapest N bank products per tenor form the estimate.
    pub top_n: usize,
    pub swap_lookback_days: i64,
}

impl Default for MarketParams {
    fn default() -> Self {
        Self {
            lender_margin: 0.15,
            top_n: 5,
            swap_lookback_days: 90,
        }
    }
}

/// Every constant used by a decision cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub score: ScoreParams,
    pub quality: QualityParams,
    pub tenor: TenorParams,
    pub confidence: ConfidenceParams,
    pub decision: DecisionParams,
    pub aggregate: AggregateParams,
    pub risk: RiskParams,
    pub market: MarketParams,
}

impl EngineConfig {
    /// Load overrides from a TOML file; unspecified fields keep their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path).map_err(|source| AppError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: EngineConfig = toml::from_str(&text).map_err(|source| AppError::ConfigFormat {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the scoring arithmetic meaningless.
    pub fn validate(&self) -> Result<(), AppError> {
        let positive = [
            ("score.rate_unit", self.score.rate_unit),
            ("score.trend_unit", self.score.trend_unit),
            ("quality.dispersion_floor", self.quality.dispersion_floor),
            ("confidence.full_evidence_diff", self.confidence.full_evidence_diff),
            ("confidence.quality_scale", self.confidence.quality_scale),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(AppError::Config(format!("{name} must be > 0 (got {value}).")));
            }
        }
        if !(0.0..=1.0).contains(&self.confidence.min)
            || !(0.0..=1.0).contains(&self.confidence.max)
            || self.confidence.min > self.confidence.max
        {
            return Err(AppError::Config(
                "confidence.min/max must satisfy 0 <= min <= max <= 1.".to_string(),
            ));
        }
        if self.market.top_n == 0 {
            return Err(AppError::Config("market.top_n must be > 0.".to_string()));
        }
        if !(1..=MAX_LOOKBACK_DAYS).contains(&self.market.swap_lookback_days) {
            return Err(AppError::Config(format!(
                "market.swap_lookback_days must be in 1..={MAX_LOOKBACK_DAYS}."
            )));
        }
        if !(0..=MAX_LOOKBACK_DAYS).contains(&self.score.trend_min_days) {
            return Err(AppError::Config(format!(
                "score.trend_min_days must be in 0..={MAX_LOOKBACK_DAYS}."
            )));
        }
        Ok(())
    }
}

/// Process-level settings read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub loan_amount: f64,
    pub lender_margin: Option<f64>,
    pub config_path: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let loan_amount = match lookup("FIXRATE_LOAN_AMOUNT") {
            Some(raw) => parse_amount("FIXRATE_LOAN_AMOUNT", &raw)?,
            None => DEFAULT_LOAN_AMOUNT,
        };
        let lender_margin = match lookup("FIXRATE_LENDER_MARGIN") {
            Some(raw) => Some(raw.trim().parse::<f64>().map_err(|e| {
                AppError::Config(format!("FIXRATE_LENDER_MARGIN='{raw}': {e}"))
            })?),
            None => None,
        };
        let config_path = lookup("FIXRATE_CONFIG")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            loan_amount,
            lender_margin,
            config_path,
        })
    }

    /// Resolve the engine config: TOML file if configured, then env overrides.
    pub fn engine_config(&self, explicit: Option<&Path>) -> Result<EngineConfig, AppError> {
        let path = explicit.or(self.config_path.as_deref());
        let mut config = match path {
            Some(path) => EngineConfig::from_toml_file(path)?,
            None => EngineConfig::default(),
        };
        if let Some(margin) = self.lender_margin {
            config.market.lender_margin = margin;
        }
        Ok(config)
    }
}

pub fn parse_amount(name: &str, raw: &str) -> Result<f64, AppError> {
    let value = raw
        .trim()
        .replace('_', "")
        .parse::<f64>()
        .map_err(|e| AppError::Config(format!("{name}='{raw}': {e}")))?;
    if !(value.is_finite() && value > 0.0) {
        return Err(AppError::Config(format!("{name} must be a positive amount (got {raw}).")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenor_penalty_falls_back_to_default() {
        let tenor = TenorParams::default();
        assert_eq!(tenor.penalty_for(Tenor::THREE), 0.0);
        assert_eq!(tenor.penalty_for(Tenor::FIVE), 0.25);
        assert_eq!(tenor.penalty_for(Tenor::TEN), 0.60);
        assert_eq!(tenor.penalty_for(Tenor::new(7)), 0.30);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            [aggregate]
            near_tie = 0.5

            [[tenor.penalties]]
            years = 3
            penalty = 0.1
            "#,
        )
        .unwrap();
        assert_eq!(config.aggregate.near_tie, 0.5);
        assert_eq!(config.aggregate.min_confidence, 0.45);
        assert_eq!(config.tenor.penalty_for(Tenor::THREE), 0.1);
        // Replacing the list drops the other configured tenors.
        assert_eq!(config.tenor.penalty_for(Tenor::FIVE), 0.30);
        assert_eq!(config.score, ScoreParams::default());
    }

    #[test]
    fn validate_rejects_zero_units() {
        let mut config = EngineConfig::default();
        assert!(config.validate().is_ok());
        config.score.rate_unit = 0.0;
        let err = config.validate().unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn validate_bounds_day_counts() {
        let mut config = EngineConfig::default();
        config.market.swap_lookback_days = MAX_LOOKBACK_DAYS;
        assert!(config.validate().is_ok());

        config.market.swap_lookback_days = i64::MAX / 2;
        assert!(config.validate().is_err());
        config.market.swap_lookback_days = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.score.trend_min_days = -1;
        assert!(config.validate().is_err());
        config.score.trend_min_days = MAX_LOOKBACK_DAYS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_lookback_in_toml_is_rejected() {
        let path = std::env::temp_dir().join(format!("fixrate-lookback-{}.toml", std::process::id()));
        std::fs::write(&path, "[market]\nswap_lookback_days = 4611686018427387903\n").unwrap();
        let result = EngineConfig::from_toml_file(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(result.unwrap_err().exit_code(), 2);
    }

    #[test]
    fn settings_parse_env_values() {
        let settings = Settings::from_lookup(|key| match key {
            "FIXRATE_LOAN_AMOUNT" => Some("750_000".to_string()),
            "FIXRATE_LENDER_MARGIN" => Some("0.2".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(settings.loan_amount, 750_000.0);
        assert_eq!(settings.lender_margin, Some(0.2));
        assert_eq!(settings.config_path, None);

        let config = settings.engine_config(None).unwrap();
        assert_eq!(config.market.lender_margin, 0.2);
    }

    #[test]
    fn settings_reject_bad_amount() {
        let err = Settings::from_lookup(|key| {
            (key == "FIXRATE_LOAN_AMOUNT").then(|| "lots".to_string())
        })
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
