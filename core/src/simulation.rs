//! Conversion and purchase-amount generation.
//!
//! Per-arm behavior lives in an `ArmTable` keyed by `Group`, so the
//! simulator looks parameters up instead of branching per arm.
//!
//! Draw order (fixed, documented, never reordered):
//!   1. Conversion stream: one Bernoulli draw per user, in user order.
//!   2. Purchase stream: one Normal draw per *converted* user, in user order.
//!
//! Purchase amounts are NOT clamped. A wide distribution with a small mean
//! can produce negative amounts for converted users. This is a known quirk
//! that keeps the tested distribution exactly Normal(mean, std).

use crate::{
    config::{ArmConfig, SimulationParameters},
    error::{AnalysisError, AnalysisResult, ParameterViolation},
    rng::StageRng,
    types::{Group, UserRecord},
};
use rand::distributions::Bernoulli;
use rand_distr::Normal;

/// Ready-to-sample distributions for one arm.
#[derive(Debug, Clone, Copy)]
pub struct ArmParams {
    conversion: Bernoulli,
    purchase:   Normal<f64>,
}

impl ArmParams {
    /// Rejects a rate outside [0, 1] or a std that is not strictly positive.
    pub fn new(conversion_rate: f64, purchase_mean: f64, purchase_std: f64) -> AnalysisResult<Self> {
        let mut violations = Vec::new();

        let conversion = Bernoulli::new(conversion_rate);
        if conversion.is_err() {
            violations.push(ParameterViolation::new(
                "conversion_rate",
                format!("must be within [0, 1], got {conversion_rate}"),
            ));
        }
        // Normal::new accepts std == 0, which we do not.
        let purchase = if purchase_std.is_finite() && purchase_std > 0.0 {
            Normal::new(purchase_mean, purchase_std).ok()
        } else {
            None
        };
        if purchase.is_none() {
            violations.push(ParameterViolation::new(
                "purchase_std",
                format!("must be a finite value > 0, got {purchase_std}"),
            ));
        }

        match (conversion, purchase) {
            (Ok(conversion), Some(purchase)) => Ok(Self { conversion, purchase }),
            _ => Err(AnalysisError::InvalidParameters(violations)),
        }
    }

    pub fn from_config(arm: &ArmConfig) -> AnalysisResult<Self> {
        Self::new(arm.conversion_rate, arm.purchase_mean, arm.purchase_std)
    }
}

/// Group label -> arm parameters.
#[derive(Debug, Clone)]
pub struct ArmTable {
    arms: [ArmParams; 2],
}

impl ArmTable {
    pub fn new(control: ArmParams, treatment: ArmParams) -> Self {
        Self { arms: [control, treatment] }
    }

    pub fn from_parameters(params: &SimulationParameters) -> AnalysisResult<Self> {
        let mut violations = Vec::new();
        let mut built = Vec::with_capacity(2);

        for group in Group::ALL {
            match ArmParams::from_config(params.arm(group)) {
                Ok(arm) => built.push(arm),
                Err(e) => violations.extend(e.violations().iter().map(|v| {
                    ParameterViolation::new(
                        format!("{group}.{}", v.field),
                        v.message.clone(),
                    )
                })),
            }
        }

        if !violations.is_empty() {
            return Err(AnalysisError::InvalidParameters(violations));
        }
        Ok(Self::new(built[0], built[1]))
    }

    pub fn get(&self, group: Group) -> &ArmParams {
        &self.arms[group.index()]
    }
}

/// Turn group labels into user records. User ids run from 1..=len.
pub fn simulate_outcomes(
    groups: &[Group],
    arms: &ArmTable,
    conversion_rng: &mut StageRng,
    purchase_rng: &mut StageRng,
) -> Vec<UserRecord> {
    let converted: Vec<bool> = groups
        .iter()
        .map(|g| conversion_rng.sample(&arms.get(*g).conversion))
        .collect();

    let users: Vec<UserRecord> = groups
        .iter()
        .zip(converted)
        .enumerate()
        .map(|(i, (&group, converted))| {
            let purchase_amount = if converted {
                purchase_rng.sample(&arms.get(group).purchase)
            } else {
                0.0
            };
            UserRecord {
                id: i as u64 + 1,
                group,
                converted,
                purchase_amount,
            }
        })
        .collect();

    log::debug!(
        "{}/{}: simulated {} users, {} converted",
        conversion_rng.name,
        purchase_rng.name,
        users.len(),
        users.iter().filter(|u| u.converted).count()
    );
    users
}
