use std::time::Duration;

/// Default wait between observing a creation and reading its companies.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(10);

/// Default upper bound on a single outbound call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Tuning knobs for a [`crate::Dispatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Quiescence delay applied by the trigger entry points
    /// ([`crate::Dispatcher::dispatch_task`] and
    /// [`crate::Dispatcher::dispatch_company`]) before any read.
    ///
    /// Companies written alongside their task may not be visible to a read
    /// issued immediately after the task's creation event. Set to zero for a
    /// strongly consistent store.
    pub settle_delay: Duration,

    /// Bound on each outbound call. A call exceeding it is recorded as a
    /// timeout failure for that company only.
    pub call_timeout: Duration,
}

impl DispatchConfig {
    /// Configuration with no quiescence delay and the default call timeout.
    pub fn immediate() -> Self {
        Self {
            settle_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}
