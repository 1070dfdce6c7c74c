//! Command dispatch and completion boundaries.
//!
//! The console itself knows nothing about YliLisp or any other command
//! semantics. Committed lines are split into a command word and parameters
//! and handed to the [`CommandRegistry`]; whatever the handler returns flows
//! back to the host untouched apart from the output text, which the console
//! writes into the scrollback.

use std::any::Any;
use std::collections::BTreeMap;

/// What a command handler produced: optional text for the scrollback and an
/// optional opaque value passed through to the host.
#[derive(Default)]
pub struct CommandOutcome {
    pub output: Option<String>,
    pub value: Option<Box<dyn Any>>,
}

impl CommandOutcome {
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn output(text: impl Into<String>) -> Self {
        Self {
            output: Some(text.into()),
            value: None,
        }
    }

    pub fn with_value(mut self, value: Box<dyn Any>) -> Self {
        self.value = Some(value);
        self
    }
}

impl std::fmt::Debug for CommandOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandOutcome")
            .field("output", &self.output)
            .field("has_value", &self.value.is_some())
            .finish()
    }
}

pub type CommandHandler = Box<dyn FnMut(&[String]) -> CommandOutcome>;

/// Named command handlers, ordered by name so completion output is stable.
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, CommandHandler>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`, replacing any previous handler.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: impl FnMut(&[String]) -> CommandOutcome + 'static,
    ) {
        self.commands.insert(name.into(), Box::new(handler));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Command names starting with `prefix`, in name order.
    pub fn complete(&self, prefix: &str) -> Vec<String> {
        self.commands
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Run the named command. `None` means the command is unknown.
    pub fn dispatch(&mut self, name: &str, parameters: &[String]) -> Option<CommandOutcome> {
        self.commands
            .get_mut(name)
            .map(|handler| handler(parameters))
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Parameter completion supplied by the host.
pub trait Completion {
    /// Candidates for the word under completion, any order.
    fn complete(&self, prefix: &str) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_runs_the_named_handler_with_parameters() {
        let mut registry = CommandRegistry::new();
        registry.register("echo", |parameters: &[String]| {
            CommandOutcome::output(parameters.join(" "))
        });
        let outcome = registry.dispatch("echo", &["a".into(), "b".into()]).unwrap();
        assert_eq!(outcome.output.as_deref(), Some("a b"));
    }

    #[test]
    fn unknown_commands_dispatch_to_none() {
        let mut registry = CommandRegistry::new();
        assert!(registry.dispatch("nope", &[]).is_none());
    }

    #[test]
    fn completion_is_prefix_filtered_and_sorted() {
        let mut registry = CommandRegistry::new();
        for name in ["help", "history", "quit", "heal"] {
            registry.register(name, |_: &[String]| CommandOutcome::silent());
        }
        assert_eq!(registry.complete("h"), ["heal", "help", "history"]);
        assert_eq!(registry.complete("he"), ["heal", "help"]);
        assert_eq!(registry.complete("z"), Vec::<String>::new());
    }

    #[test]
    fn opaque_values_pass_through() {
        let mut registry = CommandRegistry::new();
        registry.register("answer", |_: &[String]| {
            CommandOutcome::silent().with_value(Box::new(42_u32))
        });
        let outcome = registry.dispatch("answer", &[]).unwrap();
        let value = outcome.value.unwrap();
        assert_eq!(value.downcast_ref::<u32>(), Some(&42));
    }
}
