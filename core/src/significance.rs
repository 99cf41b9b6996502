//! Hypothesis tests used to compare the two arms.
//!
//! Both tests are pure functions of their inputs and keep no state, so
//! independent analyses may call them concurrently.

use crate::{
    error::{AnalysisError, AnalysisResult},
    summary::ContingencyTable,
    types::Group,
};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF, StudentsT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TTestType {
    /// Pooled variance, equal-variance assumption.
    #[default]
    Student,
    /// Unequal variances, Welch-Satterthwaite degrees of freedom.
    Welch,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// The test statistic value (chi-square or t).
    pub statistic: f64,
    /// Two-sided p-value, always within [0, 1].
    pub p_value: f64,
    pub degrees_of_freedom: f64,
}

/// Pearson chi-square test of independence on a 2×2 group × conversion table.
///
/// With `yates` set, each |observed - expected| is shrunk by min(0.5, |observed - expected|)
/// before squaring; a 2×2 table always has one degree of freedom, so the
/// correction always applies.
///
/// Fails with `InsufficientData` when a row or column total is zero, because
/// every expected count in that line would be zero.
pub fn chi_square_independence(table: &ContingencyTable, yates: bool) -> AnalysisResult<TestResult> {
    for group in Group::ALL {
        if table.row_total(group) == 0 {
            return Err(AnalysisError::insufficient(format!(
                "chi-square test: {group} group has no users"
            )));
        }
    }
    for converted in [false, true] {
        if table.col_total(converted) == 0 {
            let outcome = if converted { "converted" } else { "non-converted" };
            return Err(AnalysisError::insufficient(format!(
                "chi-square test: no {outcome} users in either group"
            )));
        }
    }

    let total = table.total() as f64;
    let mut chi_square = 0.0;
    for group in Group::ALL {
        for converted in [false, true] {
            let observed = table.get(group, converted) as f64;
            let expected =
                table.row_total(group) as f64 * table.col_total(converted) as f64 / total;
            let observed = if yates { yates_adjust(observed, expected) } else { observed };
            chi_square += (observed - expected).powi(2) / expected;
        }
    }

    let df = 1.0;
    let p_value = ChiSquared::new(df)
        .map(|dist| dist.sf(chi_square))
        .map_err(|e| anyhow::anyhow!("chi-square distribution: {e}"))?;

    Ok(TestResult {
        statistic: chi_square,
        p_value: p_value.clamp(0.0, 1.0),
        degrees_of_freedom: df,
    })
}

/// Move `observed` toward `expected` by at most 0.5.
fn yates_adjust(observed: f64, expected: f64) -> f64 {
    let diff = expected - observed;
    observed + diff.abs().min(0.5) * diff.signum()
}

/// Two-sample t-test of `x` against `y`. The statistic is positive when
/// mean(x) > mean(y).
///
/// Fails with `InsufficientData` when either sample has fewer than two
/// observations or both samples are constant (zero standard error).
pub fn t_test(x: &[f64], y: &[f64], test_type: TTestType) -> AnalysisResult<TestResult> {
    if x.len() < 2 || y.len() < 2 {
        return Err(AnalysisError::insufficient(format!(
            "t-test needs at least 2 observations per sample, got {} and {}",
            x.len(),
            y.len()
        )));
    }

    let (mean1, var1) = mean_and_variance(x);
    let (mean2, var2) = mean_and_variance(y);
    let n1 = x.len() as f64;
    let n2 = y.len() as f64;

    let (std_err, df) = match test_type {
        TTestType::Student => {
            let pooled_var = ((n1 - 1.0) * var1 + (n2 - 1.0) * var2) / (n1 + n2 - 2.0);
            ((pooled_var * (1.0 / n1 + 1.0 / n2)).sqrt(), n1 + n2 - 2.0)
        }
        TTestType::Welch => {
            let term1 = var1 / n1;
            let term2 = var2 / n2;
            let combined_var = term1 + term2;
            let df = combined_var * combined_var
                / (term1 * term1 / (n1 - 1.0) + term2 * term2 / (n2 - 1.0));
            (combined_var.sqrt(), df)
        }
    };

    if !(std_err > 0.0 && std_err.is_finite()) || !(df > 0.0 && df.is_finite()) {
        return Err(AnalysisError::insufficient(
            "t-test: both samples have zero variance",
        ));
    }

    let t_stat = (mean1 - mean2) / std_err;
    let p_value = two_sided_t_p_value(t_stat, df)?;

    Ok(TestResult {
        statistic: t_stat,
        p_value,
        degrees_of_freedom: df,
    })
}

fn two_sided_t_p_value(t_stat: f64, df: f64) -> AnalysisResult<f64> {
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| anyhow::anyhow!("Student's t distribution (df={df}): {e}"))?;
    Ok((2.0 * dist.sf(t_stat.abs())).clamp(0.0, 1.0))
}

/// Sample mean and unbiased variance (two-pass).
fn mean_and_variance(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let ss = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    (mean, ss / (n - 1.0))
}
