//! Run parameters, their defaults, and validation.
//!
//! Two layers of checks:
//!   - `SimulationParameters::validate` enforces what the pipeline needs
//!     to be well defined (probabilities in [0,1], std > 0, ...).
//!   - `ParameterBounds` enforces the narrower ranges the interactive
//!     front end offers. Callers at the boundary apply it; the core does not.
//!
//! Both report every violated constraint at once.

use crate::{
    error::{AnalysisError, AnalysisResult, ParameterViolation},
    significance::TTestType,
    types::Group,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_POPULATION: usize = 10_000;
pub const DEFAULT_SPLIT: f64 = 0.5;
pub const DEFAULT_CONFIDENCE: f64 = 0.95;
pub const DEFAULT_SEED: u64 = 42;

/// Conversion and purchase behavior of one arm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmConfig {
    pub conversion_rate: f64,
    pub purchase_mean:   f64,
    pub purchase_std:    f64,
}

impl ArmConfig {
    pub fn store_brand_default() -> Self {
        Self { conversion_rate: 0.08, purchase_mean: 5.0, purchase_std: 1.5 }
    }

    pub fn national_brand_default() -> Self {
        Self { conversion_rate: 0.10, purchase_mean: 6.0, purchase_std: 2.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ParametersFile")]
pub struct SimulationParameters {
    /// Number of simulated users (N).
    pub population: usize,
    /// P(treatment) for each user.
    pub split:      f64,
    pub control:    ArmConfig,
    pub treatment:  ArmConfig,
    /// Confidence level as a fraction, e.g. 0.95.
    pub confidence: f64,
    pub seed:       u64,
    pub t_test:     TTestType,
    pub yates_correction: bool,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            population: DEFAULT_POPULATION,
            split:      DEFAULT_SPLIT,
            control:    ArmConfig::store_brand_default(),
            treatment:  ArmConfig::national_brand_default(),
            confidence: DEFAULT_CONFIDENCE,
            seed:       DEFAULT_SEED,
            t_test:     TTestType::Student,
            yates_correction: true,
        }
    }
}

/// On-disk shape: every field optional, arm fields included.
#[derive(Debug, Clone, Default, Deserialize)]
struct ArmFile {
    conversion_rate: Option<f64>,
    purchase_mean:   Option<f64>,
    purchase_std:    Option<f64>,
}

impl ArmFile {
    fn over(self, base: ArmConfig) -> ArmConfig {
        ArmConfig {
            conversion_rate: self.conversion_rate.unwrap_or(base.conversion_rate),
            purchase_mean:   self.purchase_mean.unwrap_or(base.purchase_mean),
            purchase_std:    self.purchase_std.unwrap_or(base.purchase_std),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ParametersFile {
    population: Option<usize>,
    split:      Option<f64>,
    #[serde(default)]
    control:    ArmFile,
    #[serde(default)]
    treatment:  ArmFile,
    confidence: Option<f64>,
    seed:       Option<u64>,
    t_test:     Option<TTestType>,
    yates_correction: Option<bool>,
}

impl From<ParametersFile> for SimulationParameters {
    fn from(file: ParametersFile) -> Self {
        let d = Self::default();
        Self {
            population: file.population.unwrap_or(d.population),
            split:      file.split.unwrap_or(d.split),
            control:    file.control.over(d.control),
            treatment:  file.treatment.over(d.treatment),
            confidence: file.confidence.unwrap_or(d.confidence),
            seed:       file.seed.unwrap_or(d.seed),
            t_test:     file.t_test.unwrap_or(d.t_test),
            yates_correction: file.yates_correction.unwrap_or(d.yates_correction),
        }
    }
}

impl SimulationParameters {
    /// Load from a JSON file. Fields absent from the file, including single
    /// fields of an arm, keep their defaults. Fields absent from the file keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let params: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {}: {e}", path.display()))?;
        Ok(params)
    }

    /// Significance level derived from the confidence level.
    pub fn alpha(&self) -> f64 {
        1.0 - self.confidence
    }

    pub fn arm(&self, group: Group) -> &ArmConfig {
        match group {
            Group::Control   => &self.control,
            Group::Treatment => &self.treatment,
        }
    }

    /// Check the constraints the pipeline relies on.
    pub fn validate(&self) -> AnalysisResult<()> {
        let mut violations = Vec::new();

        if self.population == 0 {
            violations.push(ParameterViolation::new(
                "population",
                "must be a positive number of users",
            ));
        }
        if !(0.0..=1.0).contains(&self.split) {
            violations.push(ParameterViolation::new(
                "split",
                format!("must be within [0, 1], got {}", self.split),
            ));
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            violations.push(ParameterViolation::new(
                "confidence",
                format!("must be strictly between 0 and 1, got {}", self.confidence),
            ));
        }

        for group in Group::ALL {
            let arm = self.arm(group);
            if !(0.0..=1.0).contains(&arm.conversion_rate) {
                violations.push(ParameterViolation::new(
                    format!("{group}.conversion_rate"),
                    format!("must be within [0, 1], got {}", arm.conversion_rate),
                ));
            }
            if !(arm.purchase_mean.is_finite() && arm.purchase_mean >= 0.0) {
                violations.push(ParameterViolation::new(
                    format!("{group}.purchase_mean"),
                    format!("must be a finite value >= 0, got {}", arm.purchase_mean),
                ));
            }
            if !(arm.purchase_std.is_finite() && arm.purchase_std > 0.0) {
                violations.push(ParameterViolation::new(
                    format!("{group}.purchase_std"),
                    format!("must be a finite value > 0, got {}", arm.purchase_std),
                ));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(AnalysisError::InvalidParameters(violations))
        }
    }
}

/// Inclusive ranges offered by the interactive front end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterBounds {
    pub population:      (usize, usize),
    pub conversion_rate: (f64, f64),
    pub purchase_mean:   (f64, f64),
    pub purchase_std:    (f64, f64),
    pub confidence:      (f64, f64),
}

impl ParameterBounds {
    pub fn interactive() -> Self {
        Self {
            population:      (1_000, 20_000),
            conversion_rate: (0.01, 0.20),
            purchase_mean:   (1.0, 20.0),
            purchase_std:    (0.5, 5.0),
            confidence:      (0.90, 0.99),
        }
    }

    /// Range violations plus every structural violation from
    /// `SimulationParameters::validate`, one entry per field.
    pub fn check(&self, params: &SimulationParameters) -> AnalysisResult<()> {
        let mut violations = Vec::new();

        let (lo, hi) = self.population;
        if params.population < lo || params.population > hi {
            violations.push(ParameterViolation::new(
                "population",
                format!("must be within [{lo}, {hi}], got {}", params.population),
            ));
        }
        check_range(&mut violations, "confidence", params.confidence, self.confidence);

        for group in Group::ALL {
            let arm = params.arm(group);
            check_range(
                &mut violations,
                &format!("{group}.conversion_rate"),
                arm.conversion_rate,
                self.conversion_rate,
            );
            check_range(
                &mut violations,
                &format!("{group}.purchase_mean"),
                arm.purchase_mean,
                self.purchase_mean,
            );
            check_range(
                &mut violations,
                &format!("{group}.purchase_std"),
                arm.purchase_std,
                self.purchase_std,
            );
        }

        if let Err(structural) = params.validate() {
            for v in structural.violations() {
                if !violations.iter().any(|seen: &ParameterViolation| seen.field == v.field) {
                    violations.push(v.clone());
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(AnalysisError::InvalidParameters(violations))
        }
    }
}

fn check_range(
    violations: &mut Vec<ParameterViolation>,
    field: &str,
    value: f64,
    (lo, hi): (f64, f64),
) {
    // Small tolerance so percent inputs like 99/100 land inside [0.90, 0.99].
    const EPS: f64 = 1e-9;
    if !(value >= lo - EPS && value <= hi + EPS) {
        violations.push(ParameterViolation::new(
            field,
            format!("must be within [{lo}, {hi}], got {value}"),
        ));
    }
}
