//! Pure prompt-cadence decision rule.

use chrono::{DateTime, Duration, Utc};

use crate::config::CadenceConfig;
use crate::models::focus::FocusModePreferences;

/// Tunable cadence constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CadencePolicy {
    /// Minimum gap between two prompts.
    pub cooldown: Duration,
    /// Modulo applied while the prompt count is below `early_prompt_limit`.
    pub early_threshold: u32,
    /// Modulo applied afterwards.
    pub late_threshold: u32,
    /// Prompt count at which `late_threshold` takes over.
    pub early_prompt_limit: u32,
}

impl Default for CadencePolicy {
    fn default() -> Self {
        Self::from(&CadenceConfig::default())
    }
}

impl From<&CadenceConfig> for CadencePolicy {
    fn from(config: &CadenceConfig) -> Self {
        Self {
            cooldown: Duration::hours(i64::from(config.cooldown_hours)),
            early_threshold: config.early_threshold,
            late_threshold: config.late_threshold,
            early_prompt_limit: config.early_prompt_limit,
        }
    }
}

impl CadencePolicy {
    /// Modulo threshold for the given prompt count.
    #[must_use]
    pub fn threshold_for(&self, times_prompted: u32) -> u32 {
        if times_prompted < self.early_prompt_limit {
            self.early_threshold
        } else {
            self.late_threshold
        }
    }

    /// Decide whether a stored record permits showing the prompt at `now`.
    ///
    /// Opt-out wins, then the cooldown, then the modulo rule. A timestamp in
    /// the future counts as inside the cooldown.
    #[must_use]
    pub fn should_show(&self, prefs: &FocusModePreferences, now: DateTime<Utc>) -> bool {
        if prefs.dont_show_again {
            return false;
        }

        if let Some(last) = prefs.last_prompt_date {
            if now.signed_duration_since(last) < self.cooldown {
                return false;
            }
        }

        // Zero thresholds are rejected by config validation; treat as "always".
        match self.threshold_for(prefs.times_prompted) {
            0 => true,
            threshold => prefs.times_prompted % threshold == 0,
        }
    }
}
