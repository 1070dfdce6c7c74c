//! The console state machine.
//!
//! Console state is the cross-product of three independent axes: whether the
//! console is active, whether the user is paging the scrollback, and which
//! input buffer the user is on. That gives twelve composite states, but the
//! transition rule is stated on the axes:
//!
//! * a legal transition changes exactly one axis;
//! * the activation axis may always change;
//! * the view and input-source axes may only change while the console is
//!   active;
//! * re-requesting the current state succeeds and does nothing.
//!
//! Illegal requests are rejected with a [`TransitionError`] and leave the
//! state untouched.

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    InScrollback,
    NotInScrollback,
}

/// Which input the user is on: the fresh line, a committed history entry,
/// or the editable copy of a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    NewInput,
    HistoricalInput,
    TempInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleState {
    pub activation: Activation,
    pub view: View,
    pub source: InputSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("transition changes more than one axis")]
    MultipleAxes,
    #[error("transition requires an active console")]
    InactiveConsole,
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self {
            activation: Activation::Inactive,
            view: View::NotInScrollback,
            source: InputSource::NewInput,
        }
    }
}

impl ConsoleState {
    pub fn is_active(&self) -> bool {
        self.activation == Activation::Active
    }

    pub fn is_in_scrollback(&self) -> bool {
        self.view == View::InScrollback
    }

    /// Validate a requested transition. `Ok` carries the target state so the
    /// caller can commit it and notify observers.
    pub fn transition_to(self, target: ConsoleState) -> Result<ConsoleState, TransitionError> {
        let changed = usize::from(self.activation != target.activation)
            + usize::from(self.view != target.view)
            + usize::from(self.source != target.source);
        match changed {
            0 => Ok(target),
            1 if self.activation != target.activation => Ok(target),
            1 => {
                // View and input-source changes need an active console on
                // both sides; the activation axis is unchanged here.
                if self.is_active() {
                    Ok(target)
                } else {
                    debug!(target: "console.state", from = ?self, to = ?target, "rejected: inactive");
                    Err(TransitionError::InactiveConsole)
                }
            }
            _ => {
                debug!(target: "console.state", from = ?self, to = ?target, "rejected: multiple axes");
                Err(TransitionError::MultipleAxes)
            }
        }
    }

    pub fn with_activation(self, activation: Activation) -> Self {
        Self { activation, ..self }
    }

    pub fn with_view(self, view: View) -> Self {
        Self { view, ..self }
    }

    pub fn with_source(self, source: InputSource) -> Self {
        Self { source, ..self }
    }
}

/// Observer notified after every successful state change.
pub trait StateObserver {
    fn on_change(&mut self, old: ConsoleState, new: ConsoleState);
}
