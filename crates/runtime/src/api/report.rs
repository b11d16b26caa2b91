//! What the runtime tells its clients about past ticks.
use serde::{Deserialize, Serialize};

use agent_core::{Action, Concern, TickPlan, Timestamp};

/// One action handed to the executor and how it went.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispatch {
    pub action: Action,
    pub success: bool,
}

/// Result of a single tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub at: Timestamp,
    /// Events applied at the start of the tick.
    pub events_applied: usize,
    pub plan: TickPlan,
    pub dispatched: Vec<Dispatch>,
}

impl TickReport {
    pub fn is_idle(&self) -> bool {
        self.dispatched.is_empty()
    }

    pub fn failures(&self) -> usize {
        self.dispatched.iter().filter(|d| !d.success).count()
    }
}

/// Running totals since the runtime started.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeStats {
    pub ticks: u64,
    pub idle_ticks: u64,
    pub heals: u64,
    pub attacks: u64,
    pub failures: u64,
    pub events: u64,
}

impl RuntimeStats {
    pub(crate) fn record(&mut self, report: &TickReport) {
        self.ticks += 1;
        self.events += report.events_applied as u64;
        if report.is_idle() {
            self.idle_ticks += 1;
        }
        for dispatch in &report.dispatched {
            if !dispatch.success {
                self.failures += 1;
                continue;
            }
            match dispatch.action.concern() {
                Concern::Heal => self.heals += 1,
                Concern::Attack => self.attacks += 1,
            }
        }
    }
}
