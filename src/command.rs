//! Command-based control for button monitors.

use crate::time::TimeDuration;
use crate::types::TriggerEdge;

/// Actions for controlling a monitor.
///
/// Dispatched with [`ButtonMonitor::handle_action`](crate::ButtonMonitor::handle_action).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorAction<D: TimeDuration> {
    /// Start monitoring.
    Start,
    /// Stop monitoring.
    Stop,
    /// Change which transition fires the callback.
    SetTriggerEdge(TriggerEdge),
    /// Change the minimum hold time.
    SetMinHold(D),
}

/// Command targeting a specific button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorCommand<Id, D: TimeDuration> {
    pub button_id: Id,
    pub action: MonitorAction<D>,
}

impl<Id, D: TimeDuration> MonitorCommand<Id, D> {
    /// Creates command.
    pub fn new(button_id: Id, action: MonitorAction<D>) -> Self {
        Self { button_id, action }
    }
}
