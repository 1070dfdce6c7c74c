//! Console logic: mode state machine, line editing, history, scrollback
//! paging, command dispatch, completion.
//!
//! The console is terminal-agnostic and single-threaded. A host owns a
//! [`ConsoleLogicModule`], translates its input events into key-action
//! calls, and paints from the render views (the visible input and the
//! scrollback window).

mod command;
mod console;
mod keys;
mod state;

pub use command::{CommandHandler, CommandOutcome, CommandRegistry, Completion};
pub use console::{ConsoleError, ConsoleLogicModule};
pub use keys::{ActionGates, Modifiers};
pub use state::{
    Activation, ConsoleState, InputSource, StateObserver, TransitionError, View,
};
