use serde::{Deserialize, Serialize};

/// Capability exposed by components whose changes may be written to the
/// change log.
///
/// Logging hooks consult [`enabled`](Loggable::enabled) to decide whether
/// to emit a record for the component. [`set_loggable_enabled`] flips the
/// state on every implementor reachable from a root.
///
/// [`set_loggable_enabled`]: crate::set_loggable_enabled
pub trait Loggable {
    /// Enables or disables change logging for this component.
    fn set_enabled(&mut self, enabled: bool);

    /// Returns whether change logging is enabled for this component.
    fn enabled(&self) -> bool;
}

/// Minimal state holder implementing [`Loggable`].
///
/// The state is stored inverted, as `disabled`, so the default value is
/// enabled. Embed one in a struct and declare it with
/// [`loggable_graph!`](crate::loggable_graph) to make the struct loggable.
///
/// # Examples
///
/// ```
/// use loggable::{Loggable, LoggableFlag};
///
/// let mut flag = LoggableFlag::default();
/// assert!(flag.enabled());
///
/// flag.set_enabled(false);
/// assert!(!flag.enabled());
/// assert!(flag.is_disabled());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoggableFlag {
    disabled: bool,
}

impl LoggableFlag {
    /// Creates an enabled flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a flag that starts disabled.
    pub fn disabled() -> Self {
        Self { disabled: true }
    }

    /// Returns the stored disabled bit.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl Loggable for LoggableFlag {
    fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    fn enabled(&self) -> bool {
        !self.disabled
    }
}
