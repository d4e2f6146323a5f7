use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Default)]
pub struct Metrics {
    gate_checks: AtomicU64,
    permission_denials: AtomicU64,
    host_calls: AtomicU64,
    host_failures: AtomicU64,
    events_published: AtomicU64,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_gate_checks(&self) {
        self.gate_checks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_permission_denials(&self) {
        self.permission_denials.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_host_calls(&self) {
        self.host_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_host_failures(&self) {
        self.host_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_events_published(&self) {
        self.events_published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            gate_checks: self.gate_checks.load(Ordering::Relaxed),
            permission_denials: self.permission_denials.load(Ordering::Relaxed),
            host_calls: self.host_calls.load(Ordering::Relaxed),
            host_failures: self.host_failures.load(Ordering::Relaxed),
            events_published: self.events_published.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub gate_checks: u64,
    pub permission_denials: u64,
    pub host_calls: u64,
    pub host_failures: u64,
    pub events_published: u64,
}

impl MetricsSnapshot {
    pub fn host_success_rate(&self) -> f64 {
        if self.host_calls == 0 {
            return 1.0;
        }
        1.0 - (self.host_failures as f64 / self.host_calls as f64)
    }

    pub fn denial_rate(&self) -> f64 {
        if self.gate_checks == 0 {
            return 0.0;
        }
        self.permission_denials as f64 / self.gate_checks as f64
    }
}
