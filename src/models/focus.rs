//! Focus-mode prompt preferences and cadence state.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Persisted focus-mode prompt preferences.
///
/// Stored as a single JSON document with camelCase keys so records written
/// by earlier app builds keep decoding.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FocusModePreferences {
    /// Permanent opt-out. Only a full reset clears it.
    #[serde(default)]
    pub dont_show_again: bool,
    /// When the prompt was last shown (or dismissed permanently).
    #[serde(default, deserialize_with = "deserialize_prompt_date")]
    pub last_prompt_date: Option<DateTime<Utc>>,
    /// Cumulative number of prompts shown.
    #[serde(default)]
    pub times_prompted: u32,
}

impl FocusModePreferences {
    /// Record that a prompt was displayed at `now`.
    pub fn record_shown(&mut self, now: DateTime<Utc>) {
        self.last_prompt_date = Some(now);
        self.times_prompted = self.times_prompted.saturating_add(1);
    }

    /// Record a permanent opt-out at `now`.
    pub fn record_opt_out(&mut self, now: DateTime<Utc>) {
        self.dont_show_again = true;
        self.last_prompt_date = Some(now);
    }
}

/// Decode `lastPromptDate` without failing the whole record.
///
/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (midnight UTC).
/// Anything else decodes as `None`, so the cooldown lapses but the opt-out
/// and counter survive.
fn deserialize_prompt_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let text = match raw {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(serde_json::Value::String(text)) => text,
        Some(other) => {
            warn!(value = %other, "ignoring non-string lastPromptDate");
            return Ok(None);
        }
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&text) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    if let Some(midnight) = NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(Some(midnight.and_utc()));
    }

    warn!(value = %text, "ignoring unparsable lastPromptDate");
    Ok(None)
}

/// Lifecycle of the cadence engine within one app session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CadenceState {
    /// Preferences have not been read yet.
    Unloaded,
    /// Preferences were read and a decision was made.
    Loaded {
        /// Whether the interstitial should be rendered this session.
        should_show: bool,
    },
}

/// Result of [`PromptCadenceEngine::load`](crate::cadence::PromptCadenceEngine::load).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CadenceSnapshot {
    /// Preferences in effect after the load (defaults when none were stored).
    pub preferences: FocusModePreferences,
    /// Whether the prompt should be shown.
    pub should_show_prompt: bool,
}
