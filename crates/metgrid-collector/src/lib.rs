//! metgrid host collector.
//!
//! Samples host CPU, memory, temperature and network throughput once per
//! second, folds the samples into a `MetricReport` window and posts the
//! window to the metrics server's `/metric` endpoint every report period.

pub mod cli;
pub mod reporter;
pub mod sampler;

pub use cli::CollectorArgs;
pub use reporter::Reporter;
pub use sampler::{HostProbe, NetTotals, Sampler, SysinfoProbe};
