//! EONET feed adapter.
//!
//! This module provides the `EonetAdapter` which implements the
//! `FeedAdapter` trait for normalizing EONET v3 event records.

mod adapter;

pub use adapter::EonetAdapter;
