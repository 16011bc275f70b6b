//! Delivery of launch and live deep-link URLs to the host.
//!
//! [`register_link_listener`] merges two sources: the URL that launched
//! the process (queried once) and the stream of URLs that arrive while the
//! app is running. Every URL is handed to the callback unchanged; the
//! callback decides what to do with it, usually by calling
//! [`LinkResolver::resolve_incoming_link`](super::LinkResolver::resolve_incoming_link).

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, warn, Instrument};

use crate::Result;

/// Platform-provided URL sources.
pub trait LinkSource: Send + Sync {
    /// URL that launched the process, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform query fails.
    fn initial_url(&self) -> Pin<Box<dyn Future<Output = Result<Option<String>>> + Send + '_>>;

    /// Subscribe to URLs arriving from now on.
    ///
    /// The stream is unbounded: a slow consumer delays URLs but never
    /// loses them.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<String>;
}

/// [`LinkSource`] fed programmatically by the host shell.
pub struct ChannelLinkSource {
    initial: Option<String>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<String>>>,
}

impl ChannelLinkSource {
    /// Create a source with an optional launch URL.
    #[must_use]
    pub fn new(initial: Option<String>) -> Self {
        Self {
            initial,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Deliver a URL to every current subscriber.
    ///
    /// Returns the number of subscribers that received it. Subscribers
    /// whose listener has exited are dropped.
    pub fn emit(&self, url: impl Into<String>) -> usize {
        let url = url.into();
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(url.clone()).is_ok());
        subscribers.len()
    }
}

impl LinkSource for ChannelLinkSource {
    fn initial_url(&self) -> Pin<Box<dyn Future<Output = Result<Option<String>>> + Send + '_>> {
        Box::pin(async move { Ok(self.initial.clone()) })
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }
}

/// Handle returned by [`register_link_listener`].
///
/// Dropping it unsubscribes.
pub struct LinkSubscription {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl LinkSubscription {
    /// Stop future deliveries.
    ///
    /// A callback already running is allowed to finish; no new one starts.
    pub fn unsubscribe(&self) {
        self.cancel.cancel();
    }

    /// Whether deliveries are still enabled.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Unsubscribe and wait for the delivery task to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(%err, "link listener task ended abnormally");
            }
        }
    }
}

impl Drop for LinkSubscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Start delivering launch and live URLs to `on_link`.
///
/// The live stream is subscribed before the launch URL is queried so no
/// event is missed in between. Deliveries run one at a time: the next URL
/// is not handed over until the previous callback future completes.
#[must_use]
pub fn register_link_listener<F, Fut>(source: Arc<dyn LinkSource>, mut on_link: F) -> LinkSubscription
where
    F: FnMut(String) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let mut live = source.subscribe();

    let task = tokio::spawn(
        async move {
            // ── Launch URL, at most once ─────────────────────
            match source.initial_url().await {
                Ok(Some(url)) if !token.is_cancelled() => {
                    debug!("delivering launch url");
                    on_link(url).await;
                }
                Ok(_) => {}
                Err(err) => warn!(%err, "failed to query launch url"),
            }

            // ── Live stream until unsubscribed ───────────────
            loop {
                let next = tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    next = live.recv() => next,
                };

                let Some(url) = next else {
                    debug!("link source closed");
                    break;
                };
                if token.is_cancelled() {
                    break;
                }
                on_link(url).await;
            }
        }
        .instrument(info_span!("link_listener")),
    );

    LinkSubscription {
        cancel,
        task: Some(task),
    }
}
