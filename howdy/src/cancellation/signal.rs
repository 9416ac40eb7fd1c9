//! Cancellation signal with deadlines, tags, and parent-to-child propagation.

use crate::context::{TagCarrier, Tags, REQUEST_ID_KEY, USER_ID_KEY};
use crate::errors::SharedError;
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::debug;

/// Why a signal settled.
#[derive(Clone)]
pub enum CancelReason {
    /// Cancellation was requested explicitly.
    Canceled,
    /// The signal's deadline elapsed.
    DeadlineExceeded,
    /// The signal was settled with an arbitrary error.
    Other(SharedError),
}

impl CancelReason {
    /// Builds an `Other` reason from any error.
    #[must_use]
    pub fn other<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Other(Arc::new(error))
    }

    /// Returns true for `Canceled`.
    #[must_use]
    pub const fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }

    /// Returns true for `DeadlineExceeded`.
    #[must_use]
    pub const fn is_deadline_exceeded(&self) -> bool {
        matches!(self, Self::DeadlineExceeded)
    }
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Canceled => f.write_str("signal canceled"),
            Self::DeadlineExceeded => f.write_str("deadline exceeded"),
            Self::Other(error) => write!(f, "{error}"),
        }
    }
}

impl fmt::Debug for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Canceled => f.write_str("Canceled"),
            Self::DeadlineExceeded => f.write_str("DeadlineExceeded"),
            Self::Other(error) => f.debug_tuple("Other").field(&error.to_string()).finish(),
        }
    }
}

struct Inner {
    /// `None` until settled; the first settlement is final.
    state: watch::Sender<Option<CancelReason>>,
    deadline: Option<Instant>,
    tags: Tags,
    children: Mutex<Vec<Weak<Inner>>>,
}

impl Inner {
    fn new(deadline: Option<Instant>, tags: Tags) -> Arc<Self> {
        let (state, _) = watch::channel(None);
        Arc::new(Self {
            state,
            deadline,
            tags,
            children: Mutex::new(Vec::new()),
        })
    }

    fn current(&self) -> Option<CancelReason> {
        self.state.borrow().clone()
    }

    fn settle(&self, reason: CancelReason) -> bool {
        let settled = self.state.send_if_modified(|state| {
            if state.is_some() {
                return false;
            }
            *state = Some(reason.clone());
            true
        });

        if settled {
            debug!(reason = %reason, tags = %self.tags, "Cancellation signal settled");
            let children = std::mem::take(&mut *self.children.lock());
            for child in children.iter().filter_map(Weak::upgrade) {
                child.settle(reason.clone());
            }
        }
        settled
    }
}

/// A handle representing whether an operation should stop.
///
/// Signals form a tree. Settling a signal settles every signal derived from
/// it, never its ancestors. A settled signal stays settled with the reason it
/// first received. Clones share state; derived signals do not.
///
/// Signals also carry [`Tags`] for log correlation. Tags are fixed at
/// derivation time: [`CancellationSignal::with_tag`] returns a child with the
/// extra tag and leaves the receiver untouched.
#[derive(Clone)]
pub struct CancellationSignal {
    inner: Arc<Inner>,
}

impl CancellationSignal {
    /// Creates a root signal with no deadline and no tags.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Inner::new(None, Tags::new()),
        }
    }

    fn derive(&self, deadline: Option<Instant>, tags: Tags) -> Self {
        let deadline = match (self.inner.deadline, deadline) {
            (Some(parent), Some(own)) => Some(parent.min(own)),
            (parent, own) => parent.or(own),
        };
        let child = Self {
            inner: Inner::new(deadline, tags),
        };

        // Holding the children lock while reading the parent state closes the
        // gap between a concurrent settle and our registration.
        let mut children = self.inner.children.lock();
        match self.inner.current() {
            Some(reason) => {
                drop(children);
                child.inner.settle(reason);
            }
            None => {
                children.retain(|weak| weak.strong_count() > 0);
                children.push(Arc::downgrade(&child.inner));
            }
        }
        child
    }

    /// Derives a child that settles whenever this signal does.
    #[must_use]
    pub fn child(&self) -> Self {
        self.derive(None, self.inner.tags.clone())
    }

    /// Derives a child that also settles at `deadline`.
    ///
    /// The child's effective deadline is the earlier of `deadline` and this
    /// signal's own.
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        self.derive(Some(deadline), self.inner.tags.clone())
    }

    /// Derives a child that also settles after `timeout`.
    ///
    /// A timeout too large to represent as an instant adds no deadline of
    /// its own; the child still inherits this signal's.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.derive(Instant::now().checked_add(timeout), self.inner.tags.clone())
    }

    /// Derives a child carrying an additional tag.
    #[must_use]
    pub fn with_tag(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.derive(None, self.inner.tags.with(key, value))
    }

    /// Derives a child tagged with a request ID.
    #[must_use]
    pub fn with_request_id(&self, request_id: impl Into<String>) -> Self {
        self.with_tag(REQUEST_ID_KEY, request_id)
    }

    /// Derives a child tagged with a user ID.
    #[must_use]
    pub fn with_user_id(&self, user_id: impl Into<String>) -> Self {
        self.with_tag(USER_ID_KEY, user_id)
    }

    /// Settles the signal as canceled.
    ///
    /// Returns false if the signal had already settled.
    pub fn cancel(&self) -> bool {
        self.inner.settle(CancelReason::Canceled)
    }

    /// Settles the signal with an arbitrary reason.
    ///
    /// Returns false if the signal had already settled.
    pub fn settle(&self, reason: CancelReason) -> bool {
        self.inner.settle(reason)
    }

    /// Returns the settlement reason without blocking.
    ///
    /// An elapsed deadline is recorded here, so the first observer of an
    /// expired signal settles it.
    #[must_use]
    pub fn reason(&self) -> Option<CancelReason> {
        let current = self.inner.current();
        if current.is_some() {
            return current;
        }
        if self.inner.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            self.inner.settle(CancelReason::DeadlineExceeded);
            return self.inner.current();
        }
        None
    }

    /// Returns true once the signal has settled.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.reason().is_some()
    }

    /// Returns the effective deadline, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Returns the tags carried by this signal.
    #[must_use]
    pub fn tags(&self) -> &Tags {
        &self.inner.tags
    }

    /// Waits until the signal settles and returns the reason.
    pub async fn settled(&self) -> CancelReason {
        // Subscribe before checking so a settle between the check and the
        // wait is still observed.
        let mut changes = self.inner.state.subscribe();
        loop {
            if let Some(reason) = self.reason() {
                return reason;
            }
            match self.inner.deadline {
                Some(deadline) => {
                    tokio::select! {
                        _ = changes.changed() => {}
                        () = tokio::time::sleep_until(deadline) => {}
                    }
                }
                None => {
                    // The sender lives in `self.inner`, so this cannot close
                    // while we hold `self`.
                    let _ = changes.changed().await;
                }
            }
        }
    }
}

impl Default for CancellationSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl TagCarrier for CancellationSignal {
    fn tags(&self) -> &Tags {
        &self.inner.tags
    }
}

impl fmt::Debug for CancellationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationSignal")
            .field("reason", &self.inner.current())
            .field("deadline", &self.inner.deadline)
            .field("tags", &self.inner.tags)
            .finish()
    }
}
