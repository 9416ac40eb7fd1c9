//! Correlation context carried alongside cancellation signals.
//!
//! This module provides:
//! - Immutable [`Tags`] for log correlation
//! - The [`TagCarrier`] seam the logger reads tags through

mod tags;

pub use tags::{generate_request_id, TagCarrier, Tags, REQUEST_ID_KEY, USER_ID_KEY};
