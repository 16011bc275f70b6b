//! Focus-mode prompt cadence engine.
//!
//! Decides once per app session whether the focus-mode interstitial should
//! be rendered, and records the user's response. Every failure is logged
//! and resolved toward showing the prompt.

use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};

use super::policy::CadencePolicy;
use crate::clock::{Clock, SystemClock};
use crate::config::CadenceConfig;
use crate::models::focus::{CadenceSnapshot, CadenceState, FocusModePreferences};
use crate::store::KeyValueStore;

/// Outcome of reading the stored preferences record.
enum StoredRecord {
    Present(FocusModePreferences),
    Absent,
    /// The store failed; the durable record is unknown and may still exist.
    ReadFailed,
}

/// Per-session cadence state over a persisted preferences record.
pub struct PromptCadenceEngine {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    policy: CadencePolicy,
    key: String,
    preferences: FocusModePreferences,
    state: CadenceState,
    // False while the in-memory record is a stand-in for one the store
    // could not return. Writes are withheld until a read succeeds.
    record_known: bool,
}

impl PromptCadenceEngine {
    /// Create an engine in the `Unloaded` state using the system clock.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, config: &CadenceConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    /// Create an engine with an explicit clock.
    #[must_use]
    pub fn with_clock(
        store: Arc<dyn KeyValueStore>,
        config: &CadenceConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            clock,
            policy: CadencePolicy::from(config),
            key: config.preferences_key.clone(),
            preferences: FocusModePreferences::default(),
            state: CadenceState::Unloaded,
            record_known: false,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> CadenceState {
        self.state
    }

    /// In-memory preferences (defaults until loaded).
    #[must_use]
    pub fn preferences(&self) -> &FocusModePreferences {
        &self.preferences
    }

    /// Whether the prompt should be shown; `false` until [`load`](Self::load) runs.
    #[must_use]
    pub fn should_show_prompt(&self) -> bool {
        matches!(self.state, CadenceState::Loaded { should_show: true })
    }

    /// The decision rule in effect.
    #[must_use]
    pub fn policy(&self) -> &CadencePolicy {
        &self.policy
    }

    /// Read the stored preferences and decide whether to show the prompt.
    ///
    /// A missing, unreadable, or malformed record yields defaults and
    /// `should_show_prompt = true`. After an unreadable record, later
    /// mutations re-read the store and do not write until that succeeds.
    pub async fn load(&mut self) -> CadenceSnapshot {
        let span = info_span!("cadence_load");

        async move {
            let should_show = match self.read_record().await {
                StoredRecord::Present(prefs) => {
                    let show = self.policy.should_show(&prefs, self.clock.now());
                    self.preferences = prefs;
                    self.record_known = true;
                    show
                }
                StoredRecord::Absent => {
                    self.preferences = FocusModePreferences::default();
                    self.record_known = true;
                    true
                }
                StoredRecord::ReadFailed => {
                    self.preferences = FocusModePreferences::default();
                    self.record_known = false;
                    true
                }
            };

            self.state = CadenceState::Loaded { should_show };
            info!(
                should_show,
                times_prompted = self.preferences.times_prompted,
                dont_show_again = self.preferences.dont_show_again,
                "focus prompt cadence evaluated"
            );
            self.snapshot()
        }
        .instrument(span)
        .await
    }

    /// Record that the prompt was displayed.
    ///
    /// Call exactly once per prompt actually shown. In-memory state updates
    /// even if the write fails or is withheld.
    pub async fn mark_prompt_shown(&mut self) {
        self.ensure_loaded().await;
        let now = self.clock.now();
        self.preferences.record_shown(now);
        self.state = CadenceState::Loaded { should_show: false };
        self.persist().await;
        debug!(times_prompted = self.preferences.times_prompted, "focus prompt shown");
    }

    /// Permanently opt out of the prompt.
    pub async fn set_dont_show_again(&mut self) {
        self.ensure_loaded().await;
        let now = self.clock.now();
        self.preferences.record_opt_out(now);
        self.state = CadenceState::Loaded { should_show: false };
        self.persist().await;
        info!("focus prompt permanently dismissed");
    }

    /// Delete the stored record and restore defaults.
    ///
    /// Support and test flows only.
    pub async fn reset_preferences(&mut self) {
        if let Err(err) = self.store.remove(&self.key).await {
            warn!(%err, "failed to remove focus preferences");
        }
        self.preferences = FocusModePreferences::default();
        self.state = CadenceState::Loaded { should_show: true };
        self.record_known = true;
        info!("focus preferences reset");
    }

    /// Snapshot of the in-memory preferences and decision.
    #[must_use]
    pub fn snapshot(&self) -> CadenceSnapshot {
        CadenceSnapshot {
            preferences: self.preferences.clone(),
            should_show_prompt: self.should_show_prompt(),
        }
    }

    // Mutations start from the stored record so a write never clobbers
    // counters this session has not seen yet.
    async fn ensure_loaded(&mut self) {
        if self.state != CadenceState::Unloaded && self.record_known {
            return;
        }

        match self.read_record().await {
            StoredRecord::Present(prefs) => {
                self.preferences = prefs;
                self.record_known = true;
            }
            // Nothing durable to clobber; keep what this session has.
            StoredRecord::Absent => self.record_known = true,
            StoredRecord::ReadFailed => self.record_known = false,
        }
    }

    async fn read_record(&self) -> StoredRecord {
        let raw = match self.store.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return StoredRecord::Absent,
            Err(err) => {
                warn!(%err, "failed to read focus preferences; using defaults");
                return StoredRecord::ReadFailed;
            }
        };

        match serde_json::from_str::<FocusModePreferences>(&raw) {
            Ok(prefs) => StoredRecord::Present(prefs),
            Err(err) => {
                warn!(%err, "malformed focus preferences; using defaults");
                StoredRecord::Absent
            }
        }
    }

    async fn persist(&self) {
        if !self.record_known {
            warn!("focus preferences unreadable; write withheld");
            return;
        }

        let raw = match serde_json::to_string(&self.preferences) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(%err, "failed to encode focus preferences");
                return;
            }
        };

        if let Err(err) = self.store.set(&self.key, &raw).await {
            warn!(%err, "failed to persist focus preferences");
        }
    }
}
