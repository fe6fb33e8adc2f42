//! metgrid core: data model, image URL rules, wire payloads and errors.
//!
//! This crate defines the contracts shared by the dashboard controller and
//! the host collector. It carries no runtime or transport dependencies so it
//! can be reused by any consumer of the `/metric` endpoints.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed server payloads surface as `MetGridError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod grid;
pub mod protocol;
pub mod url;

/// Shared result type.
pub use error::{ErrorCode, MetGridError, Result};
pub use grid::{AggregationOp, GridLayout, ImageCell, MetricName};
pub use url::{ChartSize, ImageUrl};
