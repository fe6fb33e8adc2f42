//! Wire payloads exchanged with the metrics server.
//!
//! - Listing: `GET /metric` answers with the known metric names.
//! - Report: the collector `POST`s aggregated sample windows to `/metric`.
//!
//! Decoding never panics: malformed bodies come back as
//! `MetGridError::Decode`.

pub mod listing;
pub mod report;
