//! Text summary and chart-ready data for a finished run.
//!
//! Drawing is left to the caller; this module only shapes the numbers.

use crate::{
    pipeline::AnalysisReport,
    summary::converted_purchases,
    types::{Group, UserRecord},
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub label: String,
    pub value: f64,
}

/// "Conversion Rates by Group" bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionChart {
    pub title:   String,
    pub y_label: String,
    pub bars:    Vec<ChartBar>,
}

impl ConversionChart {
    pub fn from_report(report: &AnalysisReport) -> Self {
        Self {
            title: "Conversion Rates by Group".into(),
            y_label: "Conversion Rate".into(),
            bars: Group::ALL
                .iter()
                .map(|g| ChartBar {
                    label: g.label().into(),
                    value: report.conversion_rate(*g),
                })
                .collect(),
        }
    }
}

/// Min, quartiles and max of one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiveNumberSummary {
    pub min:    f64,
    pub q1:     f64,
    pub median: f64,
    pub q3:     f64,
    pub max:    f64,
}

impl FiveNumberSummary {
    /// `None` for an empty sample. Quartiles use linear interpolation
    /// between closest ranks.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        Some(Self {
            min:    sorted[0],
            q1:     quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q3:     quantile_sorted(&sorted, 0.75),
            max:    sorted[sorted.len() - 1],
        })
    }
}

fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlotSeries {
    pub label:   String,
    pub count:   usize,
    /// `None` when the arm has no converted users.
    pub summary: Option<FiveNumberSummary>,
}

/// "Purchase Amount Distribution by Group" over converted users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseBoxPlot {
    pub title:   String,
    pub y_label: String,
    pub series:  Vec<BoxPlotSeries>,
}

impl PurchaseBoxPlot {
    pub fn from_users(users: &[UserRecord]) -> Self {
        Self {
            title: "Purchase Amount Distribution by Group".into(),
            y_label: "Purchase Amount ($)".into(),
            series: Group::ALL
                .iter()
                .map(|g| {
                    let purchases = converted_purchases(users, *g);
                    BoxPlotSeries {
                        label: g.label().into(),
                        count: purchases.len(),
                        summary: FiveNumberSummary::from_values(&purchases),
                    }
                })
                .collect(),
        }
    }
}

fn fmt_purchase(avg: Option<f64>) -> String {
    match avg {
        Some(v) => format!("${v:.2}"),
        None => "no data".into(),
    }
}

/// Human-readable results block: rates, purchases, p-values, table, decision.
impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = &self.conversion_table;

        writeln!(f, "=== STATISTICAL RESULTS ===")?;
        writeln!(
            f,
            "  Conversion rates:   Store-Brand = {:.2}%, National-Brand = {:.2}% (p-value = {:.4})",
            self.control_conversion_rate * 100.0,
            self.treatment_conversion_rate * 100.0,
            self.conversion_test.p_value
        )?;
        writeln!(
            f,
            "  Average purchases:  Store-Brand = {}, National-Brand = {} (p-value = {:.4})",
            fmt_purchase(self.control_avg_purchase),
            fmt_purchase(self.treatment_avg_purchase),
            self.purchase_test.p_value
        )?;
        writeln!(
            f,
            "  Chi-square = {:.4} (df {}), t = {:.4} (df {:.1})",
            self.conversion_test.statistic,
            self.conversion_test.degrees_of_freedom,
            self.purchase_test.statistic,
            self.purchase_test.degrees_of_freedom
        )?;
        if self.negative_purchase_count > 0 {
            writeln!(f, "  Negative purchase draws: {}", self.negative_purchase_count)?;
        }
        writeln!(f)?;
        writeln!(f, "=== CONVERSION TABLE ===")?;
        writeln!(f, "  {:<10} {:>8} {:>8}", "group", "0", "1")?;
        for group in Group::ALL {
            writeln!(
                f,
                "  {:<10} {:>8} {:>8}",
                group.name(),
                table.get(group, false),
                table.get(group, true)
            )?;
        }
        writeln!(f)?;
        writeln!(f, "=== DECISION ===")?;
        writeln!(
            f,
            "  At a {:.0}% confidence level, the conclusion is: {}",
            self.confidence * 100.0,
            self.decision.message()
        )
    }
}

pub fn render_summary(report: &AnalysisReport) -> String {
    report.to_string()
}
