//! The game economy as seen by the engine

use flurry_core::EconomySnapshot;

/// Collaborator owning production, frenzies and reward payouts.
///
/// The engine polls `snapshot` once per intensity interval and calls
/// `collect_reward` when the player clicks a shown reward. Nothing else in
/// the engine touches economy state.
pub trait Economy {
    fn snapshot(&self) -> EconomySnapshot;

    /// Pay out a collected reward and return the amount granted
    fn collect_reward(&mut self) -> f64;
}
