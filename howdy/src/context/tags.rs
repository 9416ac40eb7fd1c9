//! Immutable key/value tags for log correlation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Key under which a request ID is stored.
pub const REQUEST_ID_KEY: &str = "request_id";

/// Key under which a user ID is stored.
pub const USER_ID_KEY: &str = "user_id";

/// Anything that can hand tags to a logger.
pub trait TagCarrier {
    /// Returns the carried tags.
    fn tags(&self) -> &Tags;
}

/// An immutable mapping from tag key to value.
///
/// Tags are copy-on-write: [`Tags::with`] returns a new set and leaves the
/// original untouched, so a set attached to a carrier never changes. Entries
/// with empty values are stored but not rendered.
///
/// Iteration and rendering order is unspecified. Callers must not depend on
/// it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    entries: Arc<BTreeMap<String, String>>,
}

impl Tags {
    /// Creates an empty tag set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of this set with `key` set to `value`.
    #[must_use]
    pub fn with(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = (*self.entries).clone();
        entries.insert(key.into(), value.into());
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Gets a tag value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns the request ID tag, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.get(REQUEST_ID_KEY)
    }

    /// Returns the user ID tag, if present.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.get(USER_ID_KEY)
    }

    /// Returns the number of tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the tags.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Renders the log line prefix: `[k=v k2=v2] `, or an empty string when
    /// nothing would be shown.
    #[must_use]
    pub fn render_prefix(&self) -> String {
        let rendered = self.to_string();
        if rendered.is_empty() {
            rendered
        } else {
            format!("[{rendered}] ")
        }
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in self.iter().filter(|(_, v)| !v.is_empty()) {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{key}={value}")?;
            first = false;
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for Tags
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: Arc::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }
}

impl TagCarrier for Tags {
    fn tags(&self) -> &Tags {
        self
    }
}

/// Generates a fresh request ID.
#[must_use]
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}
