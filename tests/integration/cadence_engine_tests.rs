//! Integration tests for the focus-mode prompt cadence engine.

use chrono::{DateTime, Duration, Utc};
use godeeper_core::clock::Clock;
use godeeper_core::models::focus::{CadenceState, FocusModePreferences};
use godeeper_core::store::{KeyValueStore, MemoryStore};

use super::test_helpers::{test_engine, ManualClock};

const PREFS_KEY: &str = "focusModePreferences";

async fn seed(store: &MemoryStore, prefs: &FocusModePreferences) {
    store
        .set(PREFS_KEY, &serde_json::to_string(prefs).expect("encode"))
        .await
        .expect("seed");
}

async fn stored(store: &MemoryStore) -> Option<FocusModePreferences> {
    store
        .get(PREFS_KEY)
        .await
        .expect("get")
        .map(|raw| serde_json::from_str(&raw).expect("decode"))
}

fn days_before(clock: &ManualClock, days: i64) -> Option<DateTime<Utc>> {
    Some(clock.now() - Duration::days(days))
}

// ─── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test]
async fn unloaded_engine_does_not_show() {
    let store = MemoryStore::new();
    let engine = test_engine(&store, &ManualClock::new());

    assert_eq!(engine.state(), CadenceState::Unloaded);
    assert!(!engine.should_show_prompt());
}

#[tokio::test]
async fn first_load_without_record_shows_prompt() {
    let store = MemoryStore::new();
    let mut engine = test_engine(&store, &ManualClock::new());

    let snapshot = engine.load().await;

    assert!(snapshot.should_show_prompt);
    assert_eq!(snapshot.preferences, FocusModePreferences::default());
    assert_eq!(engine.state(), CadenceState::Loaded { should_show: true });
    assert!(store.is_empty().await, "load must not write");
}

// ─── Cooldown ────────────────────────────────────────────────────────

#[tokio::test]
async fn prompt_is_suppressed_within_cooldown() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let mut engine = test_engine(&store, &clock);

    engine.load().await;
    engine.mark_prompt_shown().await;
    assert!(!engine.should_show_prompt());

    clock.advance(Duration::hours(23));
    let mut next_session = test_engine(&store, &clock);
    assert!(!next_session.load().await.should_show_prompt);
}

#[tokio::test]
async fn cooldown_ignores_counter_value() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    seed(
        &store,
        &FocusModePreferences {
            dont_show_again: false,
            last_prompt_date: Some(clock.now() - Duration::hours(1)),
            times_prompted: 10,
        },
    )
    .await;

    let mut engine = test_engine(&store, &clock);
    assert!(!engine.load().await.should_show_prompt);
}

#[tokio::test]
async fn cooldown_expires_after_configured_hours() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let mut engine = test_engine(&store, &clock);

    engine.load().await;
    engine.mark_prompt_shown().await;

    // times_prompted = 1 now; move the counter onto the late threshold.
    let mut prefs = stored(&store).await.expect("record");
    prefs.times_prompted = 10;
    seed(&store, &prefs).await;

    clock.advance(Duration::hours(24));
    let mut next_session = test_engine(&store, &clock);
    assert!(next_session.load().await.should_show_prompt);
}

// ─── Threshold rule ──────────────────────────────────────────────────

#[tokio::test]
async fn modulo_threshold_after_cooldown() {
    let cases = [
        (0, true),
        (1, false),
        (2, false),
        (3, false),
        (5, false),
        (6, false),
        (10, true),
        (15, false),
        (20, true),
    ];

    for (times_prompted, expected) in cases {
        let store = MemoryStore::new();
        let clock = ManualClock::new();
        seed(
            &store,
            &FocusModePreferences {
                dont_show_again: false,
                last_prompt_date: days_before(&clock, 2),
                times_prompted,
            },
        )
        .await;

        let mut engine = test_engine(&store, &clock);
        assert_eq!(
            engine.load().await.should_show_prompt,
            expected,
            "times_prompted = {times_prompted}"
        );
    }
}

// ─── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn mark_prompt_shown_increments_and_persists() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let mut engine = test_engine(&store, &clock);

    engine.load().await;
    engine.mark_prompt_shown().await;
    clock.advance(Duration::days(2));
    engine.mark_prompt_shown().await;

    let prefs = stored(&store).await.expect("record");
    assert_eq!(prefs.times_prompted, 2);
    assert_eq!(prefs.last_prompt_date, Some(clock.now()));
    assert_eq!(engine.preferences(), &prefs);
}

#[tokio::test]
async fn mutation_before_load_starts_from_stored_record() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    seed(
        &store,
        &FocusModePreferences {
            dont_show_again: false,
            last_prompt_date: days_before(&clock, 30),
            times_prompted: 7,
        },
    )
    .await;

    let mut engine = test_engine(&store, &clock);
    engine.mark_prompt_shown().await;

    assert_eq!(stored(&store).await.expect("record").times_prompted, 8);
}

#[tokio::test]
async fn opt_out_is_permanent_until_reset() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let mut engine = test_engine(&store, &clock);

    engine.load().await;
    engine.set_dont_show_again().await;
    assert!(!engine.should_show_prompt());

    // Clearing the date by hand does not lift the opt-out.
    let mut prefs = stored(&store).await.expect("record");
    assert!(prefs.dont_show_again);
    prefs.last_prompt_date = None;
    seed(&store, &prefs).await;

    clock.advance(Duration::days(365));
    let mut later = test_engine(&store, &clock);
    assert!(!later.load().await.should_show_prompt);

    later.mark_prompt_shown().await;
    assert!(stored(&store).await.expect("record").dont_show_again);

    later.reset_preferences().await;
    assert!(later.should_show_prompt());
    assert_eq!(stored(&store).await, None);

    let mut fresh = test_engine(&store, &clock);
    assert!(fresh.load().await.should_show_prompt);
}

#[tokio::test]
async fn reset_restores_defaults_in_memory() {
    let store = MemoryStore::new();
    let mut engine = test_engine(&store, &ManualClock::new());

    engine.load().await;
    engine.mark_prompt_shown().await;
    engine.reset_preferences().await;

    assert_eq!(engine.preferences(), &FocusModePreferences::default());
    assert_eq!(engine.state(), CadenceState::Loaded { should_show: true });
}

// ─── Failure handling ────────────────────────────────────────────────

#[tokio::test]
async fn malformed_record_is_treated_as_absent() {
    let store = MemoryStore::new();
    store.set(PREFS_KEY, "{not json").await.expect("seed");

    let mut engine = test_engine(&store, &ManualClock::new());
    let snapshot = engine.load().await;

    assert!(snapshot.should_show_prompt);
    assert_eq!(snapshot.preferences, FocusModePreferences::default());
}

#[tokio::test]
async fn bad_date_does_not_lose_opt_out() {
    let store = MemoryStore::new();
    store
        .set(
            PREFS_KEY,
            r#"{"dontShowAgain":true,"lastPromptDate":"yesterday","timesPrompted":4}"#,
        )
        .await
        .expect("seed");

    let mut engine = test_engine(&store, &ManualClock::new());
    let snapshot = engine.load().await;

    assert!(!snapshot.should_show_prompt);
    assert_eq!(snapshot.preferences.times_prompted, 4);
}

#[tokio::test]
async fn read_failure_fails_open() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    seed(
        &store,
        &FocusModePreferences {
            dont_show_again: true,
            last_prompt_date: days_before(&clock, 30),
            times_prompted: 4,
        },
    )
    .await;
    store.set_fail_reads(true);

    let mut engine = test_engine(&store, &clock);
    assert!(engine.load().await.should_show_prompt);
}

#[tokio::test]
async fn read_failure_never_overwrites_stored_record() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let original = FocusModePreferences {
        dont_show_again: true,
        last_prompt_date: days_before(&clock, 30),
        times_prompted: 7,
    };
    seed(&store, &original).await;
    store.set_fail_reads(true);

    let mut engine = test_engine(&store, &clock);
    assert!(engine.load().await.should_show_prompt);
    engine.mark_prompt_shown().await;
    engine.set_dont_show_again().await;

    // The session still reflects the user's response.
    assert_eq!(engine.preferences().times_prompted, 1);
    assert!(!engine.should_show_prompt());

    store.set_fail_reads(false);
    assert_eq!(stored(&store).await, Some(original));
}

#[tokio::test]
async fn mutation_after_read_recovers_builds_on_stored_record() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    seed(
        &store,
        &FocusModePreferences {
            dont_show_again: true,
            last_prompt_date: days_before(&clock, 30),
            times_prompted: 7,
        },
    )
    .await;
    store.set_fail_reads(true);

    let mut engine = test_engine(&store, &clock);
    engine.load().await;
    store.set_fail_reads(false);
    engine.mark_prompt_shown().await;

    let record = stored(&store).await.expect("record");
    assert!(record.dont_show_again);
    assert_eq!(record.times_prompted, 8);
    assert_eq!(record.last_prompt_date, Some(clock.now()));
}

#[tokio::test]
async fn write_failure_still_updates_memory() {
    let store = MemoryStore::new();
    let mut engine = test_engine(&store, &ManualClock::new());
    engine.load().await;
    store.set_fail_writes(true);

    engine.mark_prompt_shown().await;
    assert_eq!(engine.preferences().times_prompted, 1);
    assert!(!engine.should_show_prompt());

    engine.set_dont_show_again().await;
    assert!(engine.preferences().dont_show_again);
    assert!(store.is_empty().await);

    // Nothing reached the store, so the next session prompts again.
    store.set_fail_writes(false);
    let mut next_session = test_engine(&store, &ManualClock::new());
    assert!(next_session.load().await.should_show_prompt);
}
