//! Completion policies: the pass/fail gate for completion attempts.
//!
//! The engine does not grade submitted work. A policy decides from the
//! caller's "content changed" signal alone. Unchanged content never passes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Decides whether a completion attempt passes.
pub trait CompletionPolicy {
    /// Evaluate one attempt.
    fn evaluate(&mut self, has_unsaved_edits: bool) -> bool;
}

/// Passes changed content with a fixed probability.
#[derive(Debug, Clone)]
pub struct ProbabilisticPolicy {
    success_rate: f64,
    rng: StdRng,
}

impl ProbabilisticPolicy {
    /// Creates a policy seeded from system entropy.
    ///
    /// `success_rate` is clamped to `[0, 1]`.
    pub fn new(success_rate: f64) -> Self {
        Self {
            success_rate: clamp_rate(success_rate),
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a reproducible policy.
    pub fn seeded(success_rate: f64, seed: u64) -> Self {
        Self {
            success_rate: clamp_rate(success_rate),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Pass probability for changed content.
    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }
}

impl CompletionPolicy for ProbabilisticPolicy {
    fn evaluate(&mut self, has_unsaved_edits: bool) -> bool {
        if !has_unsaved_edits {
            return false;
        }
        let passed = self.rng.gen_bool(self.success_rate);
        debug!(passed, success_rate = self.success_rate, "Completion attempt evaluated");
        passed
    }
}

fn clamp_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(0.0, 1.0)
    }
}

/// Always passes changed content, or always fails, regardless of chance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedOutcomePolicy {
    passes: bool,
}

impl FixedOutcomePolicy {
    /// Policy passing every attempt with changed content.
    pub fn pass() -> Self {
        Self { passes: true }
    }

    /// Policy failing every attempt.
    pub fn fail() -> Self {
        Self { passes: false }
    }
}

impl CompletionPolicy for FixedOutcomePolicy {
    fn evaluate(&mut self, has_unsaved_edits: bool) -> bool {
        has_unsaved_edits && self.passes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_content_never_passes() {
        let mut policy = ProbabilisticPolicy::seeded(1.0, 7);
        assert!(!policy.evaluate(false));
        assert!(!FixedOutcomePolicy::pass().evaluate(false));
    }

    #[test]
    fn certain_rates_are_deterministic() {
        let mut always = ProbabilisticPolicy::seeded(1.0, 1);
        let mut never = ProbabilisticPolicy::seeded(0.0, 1);
        for _ in 0..20 {
            assert!(always.evaluate(true));
            assert!(!never.evaluate(true));
        }
    }

    #[test]
    fn seeded_policies_repeat() {
        let mut a = ProbabilisticPolicy::seeded(0.8, 42);
        let mut b = ProbabilisticPolicy::seeded(0.8, 42);
        let left: Vec<bool> = (0..32).map(|_| a.evaluate(true)).collect();
        let right: Vec<bool> = (0..32).map(|_| b.evaluate(true)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn rate_is_clamped() {
        assert_eq!(ProbabilisticPolicy::seeded(3.0, 0).success_rate(), 1.0);
        assert_eq!(ProbabilisticPolicy::new(-1.0).success_rate(), 0.0);
    }
}
