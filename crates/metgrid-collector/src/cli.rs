use std::time::Duration;

use clap::Parser;

use metgrid_core::error::{MetGridError, Result};

/// Sample host metrics and report them to a metgrid server.
#[derive(Debug, Clone, Parser)]
#[command(name = "metgrid-collector", version)]
pub struct CollectorArgs {
    /// Reporting interval in seconds.
    #[arg(long, default_value_t = 5)]
    pub report: u64,

    /// API hostname.
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// API port.
    #[arg(long, default_value_t = 8080)]
    pub port: u16,
}

impl CollectorArgs {
    pub fn validate(&self) -> Result<()> {
        if self.report == 0 {
            return Err(MetGridError::BadConfig("--report must be at least 1 second".into()));
        }
        if self.host.is_empty() {
            return Err(MetGridError::BadConfig("--host must not be empty".into()));
        }
        Ok(())
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}:{}/metric", self.host, self.port)
    }

    pub fn report_every(&self) -> Duration {
        Duration::from_secs(self.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_local_server() {
        let args = CollectorArgs::parse_from(["metgrid-collector"]);
        assert_eq!(args.report, 5);
        assert_eq!(args.endpoint(), "http://localhost:8080/metric");
        assert!(args.validate().is_ok());
    }

    #[test]
    fn flags_override_defaults() {
        let args = CollectorArgs::parse_from([
            "metgrid-collector",
            "--report",
            "10",
            "--host",
            "stats.internal",
            "--port",
            "9000",
        ]);
        assert_eq!(args.report_every(), Duration::from_secs(10));
        assert_eq!(args.endpoint(), "http://stats.internal:9000/metric");
    }

    #[test]
    fn zero_report_is_rejected() {
        let args = CollectorArgs::parse_from(["metgrid-collector", "--report", "0"]);
        assert_eq!(args.validate().unwrap_err().code().as_str(), "BAD_CONFIG");
    }
}
