//! metgrid dashboard library entry.
//!
//! Wires the metric listing source, the grid controller, the in-memory
//! document and the HTTP surface into the dashboard service. It is consumed
//! by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod grid;
pub mod obs;
pub mod ops;
pub mod page;
pub mod router;
pub mod source;
pub mod surface;
