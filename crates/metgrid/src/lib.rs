//! Top-level facade crate for metgrid.
//!
//! Re-exports the core model, the dashboard and the collector so users can depend on a single crate.

pub mod core {
    pub use metgrid_core::*;
}

pub mod dashboard {
    pub use metgrid_dashboard::*;
}

pub mod collector {
    pub use metgrid_collector::*;
}
