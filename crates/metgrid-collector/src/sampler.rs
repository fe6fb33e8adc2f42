//! Host sampling.
//!
//! `HostProbe` reads raw host values; `Sampler` turns them into per-second
//! samples (priming CPU and network deltas on the first call) and folds them
//! into a report window.

use sysinfo::{Components, Networks, System};

use metgrid_core::protocol::report::MetricReport;

pub const CPU_PERCENT: &str = "system.cpu.percent";
pub const MEM_USED_PERCENT: &str = "system.mem.used_percent";
pub const CPU_TEMP_C: &str = "system.cpu.temp_c";
pub const NET_RECV_BYTES_PER_SEC: &str = "system.net.recv_bytes_per_sec";
pub const NET_SENT_BYTES_PER_SEC: &str = "system.net.sent_bytes_per_sec";

const CPU_SENSOR_KEYS: [&str; 6] = ["cpu", "package", "coretemp", "tdie", "tctl", "cpu_thermal"];

/// Cumulative byte counters across non-loopback interfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetTotals {
    pub recv: u64,
    pub sent: u64,
}

/// Raw host readings. `None` means unavailable on this host right now.
pub trait HostProbe: Send {
    /// Global CPU usage since the previous call, in percent.
    fn cpu_percent(&mut self) -> Option<f64>;
    fn mem_used_percent(&mut self) -> Option<f64>;
    /// Mean temperature of CPU-like sensors, in °C.
    fn cpu_temp_c(&mut self) -> Option<f64>;
    fn net_totals(&mut self) -> Option<NetTotals>;
}

pub fn is_cpu_sensor(label: &str) -> bool {
    let label = label.to_lowercase();
    CPU_SENSOR_KEYS.iter().any(|k| label.contains(k))
}

pub fn is_loopback(iface: &str) -> bool {
    iface.to_lowercase().starts_with("lo")
}

/// `HostProbe` backed by sysinfo.
pub struct SysinfoProbe {
    sys: System,
}

impl SysinfoProbe {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        Self { sys }
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl HostProbe for SysinfoProbe {
    fn cpu_percent(&mut self) -> Option<f64> {
        self.sys.refresh_cpu_usage();
        if self.sys.cpus().is_empty() {
            return None;
        }
        Some(f64::from(self.sys.global_cpu_usage()))
    }

    fn mem_used_percent(&mut self) -> Option<f64> {
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        if total == 0 {
            return None;
        }
        Some(self.sys.used_memory() as f64 / total as f64 * 100.0)
    }

    fn cpu_temp_c(&mut self) -> Option<f64> {
        let components = Components::new_with_refreshed_list();
        let temps: Vec<f64> = components
            .list()
            .iter()
            .filter(|c| is_cpu_sensor(c.label()))
            .filter_map(|c| Option::<f32>::from(c.temperature()))
            .filter(|t| t.is_finite())
            .map(f64::from)
            .collect();
        if temps.is_empty() {
            return None;
        }
        Some(temps.iter().sum::<f64>() / temps.len() as f64)
    }

    fn net_totals(&mut self) -> Option<NetTotals> {
        let networks = Networks::new_with_refreshed_list();
        let mut totals = NetTotals { recv: 0, sent: 0 };
        for (name, data) in networks.list() {
            if is_loopback(name) {
                continue;
            }
            totals.recv = totals.recv.saturating_add(data.total_received());
            totals.sent = totals.sent.saturating_add(data.total_transmitted());
        }
        Some(totals)
    }
}

/// Turns probe readings into samples.
pub struct Sampler<P> {
    probe: P,
    cpu_primed: bool,
    last_net: Option<NetTotals>,
}

impl<P: HostProbe> Sampler<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            cpu_primed: false,
            last_net: None,
        }
    }

    /// Take one round of samples (meant to run once per second).
    pub fn sample_into(&mut self, report: &mut MetricReport) {
        match self.probe.cpu_percent() {
            // first reading has no previous refresh to compare against
            Some(_) if !self.cpu_primed => self.cpu_primed = true,
            Some(pct) => report.add(CPU_PERCENT, pct),
            None => tracing::debug!("cpu usage unavailable"),
        }

        match self.probe.mem_used_percent() {
            Some(pct) => report.add(MEM_USED_PERCENT, pct),
            None => tracing::debug!("memory usage unavailable"),
        }

        if let Some(t) = self.probe.cpu_temp_c() {
            report.add(CPU_TEMP_C, t);
        }

        if let Some(now) = self.probe.net_totals() {
            if let Some(prev) = self.last_net {
                report.add(NET_RECV_BYTES_PER_SEC, now.recv.saturating_sub(prev.recv) as f64);
                report.add(NET_SENT_BYTES_PER_SEC, now.sent.saturating_sub(prev.sent) as f64);
            }
            self.last_net = Some(now);
        }
    }
}
