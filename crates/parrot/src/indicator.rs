use parrot_core::StatusLine;

use tracing::info;

/// Status line rendered as log output.
///
/// Stands in for the record lamp on machines without one. Only
/// transitions are logged; re-asserting the current level is silent.
#[derive(Debug, Default)]
pub struct LogIndicator {
    active: bool,
}

impl LogIndicator {
    pub(crate) fn new() -> Self {
        Self { active: false }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }
}

impl StatusLine for LogIndicator {
    fn set_active(&mut self, active: bool) {
        if self.active == active {
            return;
        }
        self.active = active;
        if active {
            info!("Indicator on");
        } else {
            info!("Indicator off");
        }
    }
}
