//! Random assignment of users to experiment arms.

use crate::{
    error::{AnalysisError, AnalysisResult},
    rng::StageRng,
    types::Group,
};
use rand::distributions::Bernoulli;

/// Draw `n` i.i.d. group labels with P(treatment) = `split`.
///
/// Index `i` of the result belongs to user `i + 1`. `n == 0` yields an
/// empty vector. Exactly `n` draws are taken from `rng`.
pub fn assign_groups(n: usize, split: f64, rng: &mut StageRng) -> AnalysisResult<Vec<Group>> {
    let coin = Bernoulli::new(split).map_err(|_| {
        AnalysisError::invalid("split", format!("must be within [0, 1], got {split}"))
    })?;

    let groups: Vec<Group> = (0..n)
        .map(|_| if rng.sample(&coin) { Group::Treatment } else { Group::Control })
        .collect();

    log::debug!(
        "{}: assigned {} users, {} to treatment",
        rng.name,
        n,
        groups.iter().filter(|g| **g == Group::Treatment).count()
    );
    Ok(groups)
}
