//! Navigation collaborator abstraction.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use crate::models::link::NavigationTarget;
use crate::Result;

/// Host-side navigation surface.
///
/// Targets are opaque to the core; the host interprets them.
pub trait Router: Send + Sync {
    /// Navigate forward, keeping the current entry in history.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Router`](crate::AppError::Router) if the host rejects the target.
    fn push(&self, target: &NavigationTarget) -> Result<()>;

    /// Navigate without keeping the current entry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Router`](crate::AppError::Router) if the host rejects the target.
    fn replace(&self, target: &NavigationTarget) -> Result<()>;
}

/// A single instruction received by a [`RecordingRouter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum NavigationEvent {
    /// `push(target)`.
    Push(NavigationTarget),
    /// `replace(target)`.
    Replace(NavigationTarget),
}

/// [`Router`] that records every instruction in order.
#[derive(Debug, Default)]
pub struct RecordingRouter {
    events: Mutex<Vec<NavigationEvent>>,
}

impl RecordingRouter {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded instructions.
    #[must_use]
    pub fn events(&self) -> Vec<NavigationEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain and return the recorded instructions.
    pub fn take_events(&self) -> Vec<NavigationEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn record(&self, event: NavigationEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl Router for RecordingRouter {
    fn push(&self, target: &NavigationTarget) -> Result<()> {
        self.record(NavigationEvent::Push(target.clone()));
        Ok(())
    }

    fn replace(&self, target: &NavigationTarget) -> Result<()> {
        self.record(NavigationEvent::Replace(target.clone()));
        Ok(())
    }
}
