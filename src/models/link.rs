//! Deep-link resolution outcomes and navigation targets.

use std::fmt::{Display, Formatter};

use serde::Serialize;

/// Outcome of resolving one incoming URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResolution {
    /// Thread id extracted from the URL, if any.
    pub thread_id: Option<String>,
    /// Whether exactly one navigation instruction was issued.
    pub handled: bool,
}

impl LinkResolution {
    /// Outcome for a URL that carried no thread id.
    #[must_use]
    pub fn unhandled() -> Self {
        Self {
            thread_id: None,
            handled: false,
        }
    }

    /// Outcome for a URL that produced a navigation instruction.
    #[must_use]
    pub fn handled(thread_id: String) -> Self {
        Self {
            thread_id: Some(thread_id),
            handled: true,
        }
    }
}

/// Opaque router target interpreted by the host shell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NavigationTarget(String);

impl NavigationTarget {
    /// Wrap a raw target string.
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self(target.into())
    }

    /// Target addressing a single thread.
    #[must_use]
    pub fn thread(prefix: &str, thread_id: &str) -> Self {
        Self(format!("{prefix}{thread_id}"))
    }

    /// Borrow the raw target string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NavigationTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
