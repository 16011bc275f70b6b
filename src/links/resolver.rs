//! Deep-link routing with deferred navigation across sign-in.
//!
//! A link that arrives before the user is authenticated is parked in a
//! single pending slot and the host is sent to the sign-in entry point.
//! Once authentication succeeds the host calls
//! [`LinkResolver::flush_pending_link_if_any`] to resume it.
//!
//! The pending slot is last-write-wins: if two links arrive before a flush,
//! only the second one survives. Nothing here propagates an error to the
//! caller; store and router failures are logged and the call degrades to
//! "no deep link".

use std::sync::Arc;

use tracing::{debug, error, info, info_span, warn, Instrument};

use super::parser::parse_link;
use crate::config::LinkConfig;
use crate::models::link::{LinkResolution, NavigationTarget};
use crate::router::Router;
use crate::store::KeyValueStore;

/// Resolves incoming URLs into navigation and owns the pending-link slot.
#[derive(Clone)]
pub struct LinkResolver {
    store: Arc<dyn KeyValueStore>,
    router: Arc<dyn Router>,
    config: LinkConfig,
}

impl LinkResolver {
    /// Create a resolver over the given collaborators.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, router: Arc<dyn Router>, config: LinkConfig) -> Self {
        Self {
            store,
            router,
            config,
        }
    }

    /// Router target for a thread.
    #[must_use]
    pub fn thread_target(&self, thread_id: &str) -> NavigationTarget {
        NavigationTarget::thread(&self.config.thread_route_prefix, thread_id)
    }

    /// Router target for the sign-in entry point.
    #[must_use]
    pub fn auth_target(&self) -> NavigationTarget {
        NavigationTarget::new(self.config.auth_route.clone())
    }

    /// Route an incoming URL.
    ///
    /// Issues exactly one router instruction when the URL carries a thread
    /// id and none otherwise. When unauthenticated, the id is persisted
    /// (awaited) before the host is redirected to sign-in.
    pub async fn resolve_incoming_link(&self, url: &str, is_authenticated: bool) -> LinkResolution {
        let span = info_span!("resolve_incoming_link", is_authenticated);

        async move {
            let Some(thread_id) = parse_link(url) else {
                debug!(url, "url carries no thread id");
                return LinkResolution::unhandled();
            };

            if is_authenticated {
                let route = self.thread_target(&thread_id);
                self.navigate_push(&route);
                info!(thread_id = %thread_id, %route, "deep link opened");
            } else {
                // ── Park the id, then send the user to sign-in ──
                if let Err(err) = self
                    .store
                    .set(&self.config.pending_link_key, &thread_id)
                    .await
                {
                    warn!(thread_id = %thread_id, %err, "failed to persist pending link");
                }

                let route = self.auth_target();
                if let Err(err) = self.router.replace(&route) {
                    error!(%route, %err, "router rejected replace");
                }
                info!(thread_id = %thread_id, "deep link deferred until sign-in");
            }

            LinkResolution::handled(thread_id)
        }
        .instrument(span)
        .await
    }

    /// Read and clear the pending thread id.
    ///
    /// At most one caller observes a given value. If the slot cannot be
    /// cleared, `None` is returned and the value stays put for a later
    /// attempt.
    pub async fn take_pending_link(&self) -> Option<String> {
        let key = &self.config.pending_link_key;

        let value = match self.store.get(key).await {
            Ok(value) => value?,
            Err(err) => {
                warn!(%err, "failed to read pending link");
                return None;
            }
        };

        if let Err(err) = self.store.remove(key).await {
            warn!(%err, "failed to clear pending link");
            return None;
        }

        if value.is_empty() {
            return None;
        }
        Some(value)
    }

    /// Resume a deferred link after sign-in.
    ///
    /// Returns `true` when a pending id was consumed and a push was issued.
    pub async fn flush_pending_link_if_any(&self) -> bool {
        let span = info_span!("flush_pending_link");

        async move {
            let Some(thread_id) = self.take_pending_link().await else {
                debug!("no pending link");
                return false;
            };

            let route = self.thread_target(&thread_id);
            self.navigate_push(&route);
            info!(thread_id = %thread_id, %route, "pending link resumed");
            true
        }
        .instrument(span)
        .await
    }

    /// Drop any pending link without navigating.
    pub async fn clear_pending_link(&self) {
        if let Err(err) = self.store.remove(&self.config.pending_link_key).await {
            warn!(%err, "failed to clear pending link");
        }
    }

    fn navigate_push(&self, route: &NavigationTarget) {
        if let Err(err) = self.router.push(route) {
            error!(%route, %err, "router rejected push");
        }
    }
}
