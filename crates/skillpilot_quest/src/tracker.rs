//! Session XP and success streak tracking.

use derive_getters::Getters;
use skillpilot_core::Achievement;
use skillpilot_error::InvalidAmountError;
use tracing::{debug, info};

/// Tracks XP earned this session and the consecutive-success streak.
///
/// Session XP starts at zero every session. The streak is seeded from
/// the progress store and saved back by the session controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct XpStreakTracker {
    /// XP earned during this session
    session_xp: u64,
    /// Current streak count
    streak: u32,
}

impl XpStreakTracker {
    /// Creates a tracker resuming from a persisted streak.
    pub fn new(streak: u32) -> Self {
        Self {
            session_xp: 0,
            streak,
        }
    }

    /// Records a successful completion.
    ///
    /// Returns the milestone reached by this success, if any. Milestones
    /// fire on the success that reaches them, not while the streak stays
    /// at that value.
    ///
    /// # Examples
    ///
    /// ```
    /// use skillpilot_core::Achievement;
    /// use skillpilot_quest::XpStreakTracker;
    ///
    /// let mut tracker = XpStreakTracker::default();
    /// assert_eq!(tracker.record_success(), None);
    /// assert_eq!(tracker.record_success(), None);
    /// assert_eq!(tracker.record_success(), Some(Achievement::Streak3));
    /// assert_eq!(tracker.record_success(), None);
    /// ```
    pub fn record_success(&mut self) -> Option<Achievement> {
        self.streak = self.streak.saturating_add(1);
        let achievement = Achievement::for_streak(self.streak);
        match achievement {
            Some(kind) => info!(streak = self.streak, achievement = %kind, "Achievement unlocked"),
            None => debug!(streak = self.streak, "Streak increased"),
        }
        achievement
    }

    /// Records a failed attempt. The streak decays by one, never below zero.
    pub fn record_failure(&mut self) {
        self.streak = self.streak.saturating_sub(1);
        debug!(streak = self.streak, "Streak decreased");
    }

    /// Adds XP to the session total and returns the new total.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmountError` for a negative amount.
    pub fn award_xp(&mut self, amount: i64) -> Result<u64, InvalidAmountError> {
        let amount = u64::try_from(amount).map_err(|_| InvalidAmountError::new(amount))?;
        self.session_xp = self.session_xp.saturating_add(amount);
        debug!(amount, total = self.session_xp, "XP awarded");
        Ok(self.session_xp)
    }
}
