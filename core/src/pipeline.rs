//! The analysis pipeline: parameters in, report out.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Validation        every constraint checked, all violations reported together
//!   2. Assignment        StageSlot::Assignment stream, N draws
//!   3. Outcomes          StageSlot::Conversion then StageSlot::Purchase streams
//!   4. Aggregation       rates, converted-only means, contingency table
//!   5. Significance      chi-square on the table, t-test on converted purchases
//!   6. Decision          fixed rule over both p-values and alpha
//!
//! RULES:
//!   - No stage runs unless validation passed.
//!   - All randomness flows through the RngBank built from params.seed.
//!   - A run owns all of its state; runs share nothing and may execute in parallel.

use crate::{
    assignment::assign_groups,
    config::SimulationParameters,
    decision::{decide, Decision},
    error::{AnalysisError, AnalysisResult},
    rng::{RngBank, StageSlot},
    significance::{chi_square_independence, t_test, TestResult},
    simulation::{simulate_outcomes, ArmTable},
    summary::{converted_purchases, summarize, ContingencyTable},
    types::{Group, UserRecord},
};
use serde::{Deserialize, Serialize};

/// Everything one run hands to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub seed:       u64,
    pub confidence: f64,
    pub alpha:      f64,
    pub users:      Vec<UserRecord>,
    pub conversion_table: ContingencyTable,
    pub conversion_test:  TestResult,
    pub purchase_test:    TestResult,
    pub decision:         Decision,
    pub control_conversion_rate:   f64,
    pub treatment_conversion_rate: f64,
    /// `None` when the arm has no converted users.
    pub control_avg_purchase:      Option<f64>,
    pub treatment_avg_purchase:    Option<f64>,
    /// Converted users whose unclamped purchase draw came out negative.
    pub negative_purchase_count:   usize,
}

impl AnalysisReport {
    pub fn conversion_rate(&self, group: Group) -> f64 {
        match group {
            Group::Control   => self.control_conversion_rate,
            Group::Treatment => self.treatment_conversion_rate,
        }
    }

    pub fn avg_purchase(&self, group: Group) -> Option<f64> {
        match group {
            Group::Control   => self.control_avg_purchase,
            Group::Treatment => self.treatment_avg_purchase,
        }
    }

    /// Purchase amounts of converted users in `group`.
    pub fn purchases(&self, group: Group) -> Vec<f64> {
        converted_purchases(&self.users, group)
    }
}

pub struct AnalysisEngine {
    params:   SimulationParameters,
    arms:     ArmTable,
    rng_bank: RngBank,
}

impl AnalysisEngine {
    /// Validate `params` and prepare the per-arm distributions.
    pub fn new(params: SimulationParameters) -> AnalysisResult<Self> {
        params.validate()?;
        let arms = ArmTable::from_parameters(&params)?;
        let rng_bank = RngBank::new(params.seed);
        Ok(Self { params, arms, rng_bank })
    }

    /// Simulate the users only (stages 2 and 3).
    pub fn simulate(&self) -> AnalysisResult<Vec<UserRecord>> {
        let mut assign_rng = self.rng_bank.for_stage(StageSlot::Assignment);
        let groups = assign_groups(self.params.population, self.params.split, &mut assign_rng)?;

        let mut conversion_rng = self.rng_bank.for_stage(StageSlot::Conversion);
        let mut purchase_rng = self.rng_bank.for_stage(StageSlot::Purchase);
        Ok(simulate_outcomes(&groups, &self.arms, &mut conversion_rng, &mut purchase_rng))
    }

    /// Run every stage and build the report.
    pub fn run(&self) -> AnalysisResult<AnalysisReport> {
        let users = self.simulate()?;

        for group in Group::ALL {
            if !users.iter().any(|u| u.group == group) {
                return Err(AnalysisError::insufficient(format!(
                    "{group} group received no users out of {}",
                    users.len()
                )));
            }
        }

        let summary = summarize(&users)?;

        let conversion_test =
            chi_square_independence(&summary.contingency, self.params.yates_correction)?;

        let control_purchases = converted_purchases(&users, Group::Control);
        let treatment_purchases = converted_purchases(&users, Group::Treatment);
        let purchase_test = t_test(&control_purchases, &treatment_purchases, self.params.t_test)
            .map_err(|e| match e {
                AnalysisError::InsufficientData { what } => AnalysisError::InsufficientData {
                    what: format!(
                        "purchase comparison ({} control / {} treatment converted users): {what}",
                        control_purchases.len(),
                        treatment_purchases.len()
                    ),
                },
                other => other,
            })?;

        let alpha = self.params.alpha();
        let decision = decide(conversion_test.p_value, purchase_test.p_value, alpha);

        let negative_purchase_count = control_purchases
            .iter()
            .chain(&treatment_purchases)
            .filter(|amount| **amount < 0.0)
            .count();
        if negative_purchase_count > 0 {
            log::warn!(
                "{negative_purchase_count} converted users drew a negative purchase amount (left unclamped)"
            );
        }

        log::info!(
            "seed={} n={} p_conversion={:.4} p_purchase={:.4} alpha={:.2} decision={:?}",
            self.params.seed,
            users.len(),
            conversion_test.p_value,
            purchase_test.p_value,
            alpha,
            decision
        );

        Ok(AnalysisReport {
            seed: self.params.seed,
            confidence: self.params.confidence,
            alpha,
            conversion_table: summary.contingency,
            conversion_test,
            purchase_test,
            decision,
            control_conversion_rate: summary.control.conversion_rate,
            treatment_conversion_rate: summary.treatment.conversion_rate,
            control_avg_purchase: summary.control.avg_purchase,
            treatment_avg_purchase: summary.treatment.avg_purchase,
            negative_purchase_count,
            users,
        })
    }
}

/// One-shot entry point: validate, simulate, analyze, decide.
pub fn run_analysis(params: &SimulationParameters) -> AnalysisResult<AnalysisReport> {
    AnalysisEngine::new(params.clone())?.run()
}
