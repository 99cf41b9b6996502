//! Simulation and analysis core for the up-sell carousel A/B test.
//!
//! Pipeline, leaves first:
//!   - [`assignment`]   random split of N users into control / treatment
//!   - [`simulation`]   Bernoulli conversion + Normal purchase amount per user
//!   - [`summary`]      conversion rates, converted-only means, contingency table
//!   - [`significance`] chi-square test of independence and two-sample t-test
//!   - [`decision`]     recommendation from the two p-values
//!
//! [`pipeline::run_analysis`] wires them together from a
//! [`config::SimulationParameters`]; [`report`] shapes the result for display.

pub mod assignment;
pub mod config;
pub mod decision;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod rng;
pub mod significance;
pub mod simulation;
pub mod summary;
pub mod types;

pub use config::SimulationParameters;
pub use decision::Decision;
pub use error::{AnalysisError, AnalysisResult, ErrorKind};
pub use pipeline::{run_analysis, AnalysisReport};
