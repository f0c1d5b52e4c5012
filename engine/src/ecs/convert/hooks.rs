//! Reactive hooks fired after a conversion pass.
//!
//! Two hook points exist per singleton type:
//!
//! - **Changed**: the pass applied a winner. Receives the new slot value.
//! - **Unchanged**: candidates arrived but none won. Receives an [`UnchangedReport`].
//!
//! Idle ticks fire nothing. Hooks run after the slot write is committed, on the thread that
//! runs the tick, in registration order.

use std::fmt;

/// What an Unchanged hook is told about the pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnchangedReport {
    /// Short name of the singleton type.
    pub type_name: String,
    /// How many candidates arrived and were all turned down.
    pub contenders: usize,
}

type ChangedHook<T> = Box<dyn FnMut(&T)>;
type UnchangedHook = Box<dyn FnMut(&UnchangedReport)>;

/// The registered hooks for one singleton type.
pub struct Hooks<T> {
    changed: Vec<ChangedHook<T>>,
    unchanged: Vec<UnchangedHook>,
}

impl<T> Hooks<T> {
    pub fn new() -> Self {
        Self {
            changed: Vec::new(),
            unchanged: Vec::new(),
        }
    }

    /// Register a hook for passes that replaced the singleton.
    pub fn on_changed(&mut self, hook: impl FnMut(&T) + 'static) {
        self.changed.push(Box::new(hook));
    }

    /// Register a hook for passes that had candidates but left the singleton untouched.
    pub fn on_unchanged(&mut self, hook: impl FnMut(&UnchangedReport) + 'static) {
        self.unchanged.push(Box::new(hook));
    }

    pub(crate) fn fire_changed(&mut self, value: &T) {
        for hook in &mut self.changed {
            hook(value);
        }
    }

    pub(crate) fn fire_unchanged(&mut self, report: &UnchangedReport) {
        for hook in &mut self.unchanged {
            hook(report);
        }
    }

    /// Number of registered hooks, changed and unchanged.
    pub fn len(&self) -> usize {
        self.changed.len() + self.unchanged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for Hooks<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Hooks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("changed", &self.changed.len())
            .field("unchanged", &self.unchanged.len())
            .finish()
    }
}
