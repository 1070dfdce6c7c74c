//! The console logic module: one struct owning the input line, the history,
//! the scrollback, and the state machine, exposing every key action the
//! host can drive.
//!
//! Nothing here touches a terminal. The host feeds key actions and modifier
//! state in and reads render views back out.
//!
//! Mode handling invariants:
//! * the history holds commits only; editing a historical entry copies it
//!   into the console-owned temp input (`edit_input`) and switches to temp
//!   mode, and the copy reaches the history only through `enter_key`;
//! * every state change goes through the single-axis transition check;
//! * gated actions consume their one-shot gate even when they then do
//!   nothing, so a held key cannot retrigger.

use core_text::{ScrollbackBuffer, TextInput, TextInputHistory, TextLine};
use thiserror::Error;
use tracing::{debug, info};

use crate::command::{CommandOutcome, CommandRegistry, Completion};
use crate::keys::{ActionGates, Modifiers};
use crate::state::{Activation, ConsoleState, InputSource, StateObserver, TransitionError, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("history is empty")]
    EmptyHistory,
    #[error("no temp input to switch to")]
    NoTempInput,
}

pub struct ConsoleLogicModule {
    state: ConsoleState,
    new_input: TextInput,
    temp_input: TextInput,
    history: TextInputHistory,
    /// History index of the entry the temp input was copied from.
    temp_input_index: Option<usize>,
    scrollback: ScrollbackBuffer,
    registry: CommandRegistry,
    completion: Option<Box<dyn Completion>>,
    observer: Option<Box<dyn StateObserver>>,
    gates: ActionGates,
    modifiers: Modifiers,
    prompt: String,
    n_columns: usize,
    n_rows: usize,
}

impl Default for ConsoleLogicModule {
    fn default() -> Self {
        Self::new("$ ", 80, 24)
    }
}

impl ConsoleLogicModule {
    pub fn new(prompt: &str, n_columns: usize, n_rows: usize) -> Self {
        let n_columns = n_columns.max(1);
        let n_rows = n_rows.max(1);
        Self {
            state: ConsoleState::default(),
            new_input: TextInput::new(),
            temp_input: TextInput::new(),
            history: TextInputHistory::new(),
            temp_input_index: None,
            scrollback: ScrollbackBuffer::new(n_columns),
            registry: CommandRegistry::new(),
            completion: None,
            observer: None,
            gates: ActionGates::default(),
            modifiers: Modifiers::empty(),
            prompt: prompt.to_string(),
            n_columns,
            n_rows,
        }
    }

    // ---- wiring ---------------------------------------------------------

    pub fn register_command(
        &mut self,
        name: impl Into<String>,
        handler: impl FnMut(&[String]) -> CommandOutcome + 'static,
    ) {
        self.registry.register(name, handler);
    }

    pub fn command_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registry.names().map(String::from).collect();
        if !self.registry.contains("clear") {
            names.push("clear".to_string());
            names.sort();
        }
        names
    }

    pub fn set_completion(&mut self, completion: Box<dyn Completion>) {
        self.completion = Some(completion);
    }

    pub fn set_observer(&mut self, observer: Box<dyn StateObserver>) {
        self.observer = Some(observer);
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Re-arm a one-shot gate; the host calls this on key release.
    pub fn arm_action(&mut self, gate: ActionGates) {
        self.gates.arm(gate);
    }

    // ---- state transitions ----------------------------------------------

    fn request(&mut self, target: ConsoleState) -> Result<ConsoleState, ConsoleError> {
        let old = self.state;
        let new = old.transition_to(target)?;
        self.state = new;
        if new != old {
            debug!(target: "console.state", from = ?old, to = ?new, "state change");
            if let Some(observer) = self.observer.as_mut() {
                observer.on_change(old, new);
            }
        }
        Ok(new)
    }

    pub fn activate(&mut self) -> Result<ConsoleState, ConsoleError> {
        self.request(self.state.with_activation(Activation::Active))
    }

    pub fn deactivate(&mut self) -> Result<ConsoleState, ConsoleError> {
        self.request(self.state.with_activation(Activation::Inactive))
    }

    pub fn enter_scrollback_buffer(&mut self) -> Result<ConsoleState, ConsoleError> {
        let new = self.request(self.state.with_view(View::InScrollback))?;
        if !self.scrollback.is_in_buffer() {
            self.scrollback.enter_buffer(self.n_rows);
        }
        Ok(new)
    }

    pub fn exit_scrollback_buffer(&mut self) -> Result<ConsoleState, ConsoleError> {
        let new = self.request(self.state.with_view(View::NotInScrollback))?;
        self.scrollback.exit_buffer();
        Ok(new)
    }

    pub fn enter_new_input(&mut self) -> Result<ConsoleState, ConsoleError> {
        let new = self.request(self.state.with_source(InputSource::NewInput))?;
        if self.history.is_in_history() {
            self.history.exit_history();
        }
        Ok(new)
    }

    /// Switch to browsing the history. Requires at least one committed
    /// entry; lands on the most recent one.
    pub fn enter_historical_input(&mut self) -> Result<ConsoleState, ConsoleError> {
        if self.history.size() == 0 {
            return Err(ConsoleError::EmptyHistory);
        }
        let new = self.request(self.state.with_source(InputSource::HistoricalInput))?;
        if !self.history.is_in_history() {
            self.history.enter_history();
        }
        Ok(new)
    }

    pub fn enter_temp_input(&mut self) -> Result<ConsoleState, ConsoleError> {
        if self.temp_input_index.is_none() {
            return Err(ConsoleError::NoTempInput);
        }
        self.request(self.state.with_source(InputSource::TempInput))
    }

    /// Make the visible input editable. In historical mode this copies the
    /// viewed entry into the temp input and switches to temp mode; the
    /// history itself is never touched. In new-input and temp mode it does
    /// nothing.
    pub fn edit_input(&mut self) -> Result<ConsoleState, ConsoleError> {
        match self.state.source {
            InputSource::NewInput | InputSource::TempInput => Ok(self.state),
            InputSource::HistoricalInput => {
                let entry = self.history.get().cloned().ok_or(ConsoleError::EmptyHistory)?;
                self.temp_input = entry;
                self.temp_input_index = self.history.index();
                self.request(self.state.with_source(InputSource::TempInput))
            }
        }
    }

    pub fn invalidate_temp_input(&mut self) {
        self.temp_input.clear();
        self.temp_input_index = None;
    }

    // ---- editing --------------------------------------------------------

    fn can_edit(&self) -> bool {
        self.state.is_active() && !self.state.is_in_scrollback()
    }

    fn visible_input_mut(&mut self) -> Option<&mut TextInput> {
        match self.state.source {
            InputSource::NewInput => Some(&mut self.new_input),
            InputSource::TempInput => {
                self.temp_input_index.is_some().then_some(&mut self.temp_input)
            }
            InputSource::HistoricalInput => None,
        }
    }

    pub fn add_character(&mut self, c: char) -> bool {
        if !self.can_edit() || self.edit_input().is_err() {
            return false;
        }
        match self.visible_input_mut() {
            Some(input) => {
                input.add_character(c);
                true
            }
            None => false,
        }
    }

    pub fn backspace(&mut self) -> bool {
        if !self.can_edit() || !self.gates.take(ActionGates::BACKSPACE) {
            return false;
        }
        if self.edit_input().is_err() {
            return false;
        }
        match self.visible_input_mut() {
            Some(input) => input.delete_character(),
            None => false,
        }
    }

    pub fn move_cursor_left(&mut self) -> bool {
        if !self.can_edit() || self.edit_input().is_err() {
            return false;
        }
        match self.visible_input_mut() {
            Some(input) => input.move_cursor_left(),
            None => false,
        }
    }

    pub fn move_cursor_right(&mut self) -> bool {
        if !self.can_edit() || self.edit_input().is_err() {
            return false;
        }
        match self.visible_input_mut() {
            Some(input) => input.move_cursor_right(),
            None => false,
        }
    }

    /// Home: start of input, or first scrollback line while paging.
    pub fn home(&mut self) -> bool {
        if !self.gates.take(ActionGates::HOME) {
            return false;
        }
        if self.state.is_active() && self.state.is_in_scrollback() {
            return self.scrollback.move_to_first();
        }
        if !self.can_edit() || self.edit_input().is_err() {
            return false;
        }
        match self.visible_input_mut() {
            Some(input) => {
                input.move_cursor_to_start();
                true
            }
            None => false,
        }
    }

    /// End: end of input, or last scrollback page while paging.
    pub fn end(&mut self) -> bool {
        if !self.gates.take(ActionGates::END) {
            return false;
        }
        if self.state.is_active() && self.state.is_in_scrollback() {
            let n_rows = self.n_rows;
            return self.scrollback.move_to_last(n_rows);
        }
        if !self.can_edit() || self.edit_input().is_err() {
            return false;
        }
        match self.visible_input_mut() {
            Some(input) => {
                input.move_cursor_to_end();
                true
            }
            None => false,
        }
    }

    /// Ctrl-C: abandon the current input and return to a fresh line.
    pub fn ctrl_c(&mut self) -> bool {
        if !self.can_edit()
            || !self.modifiers.is_plain_ctrl()
            || !self.gates.take(ActionGates::CTRL_C)
        {
            return false;
        }
        self.new_input.clear();
        self.invalidate_temp_input();
        if self.history.is_in_history() {
            self.history.exit_history();
        }
        if self.state.source != InputSource::NewInput {
            let _ = self.request(self.state.with_source(InputSource::NewInput));
        }
        true
    }

    /// Ctrl-W: delete the word left of the cursor (trailing whitespace
    /// first, then the word itself).
    pub fn ctrl_w(&mut self) -> bool {
        if !self.can_edit()
            || !self.modifiers.is_plain_ctrl()
            || !self.gates.take(ActionGates::CTRL_W)
        {
            return false;
        }
        if self.edit_input().is_err() {
            return false;
        }
        let Some(input) = self.visible_input_mut() else {
            return false;
        };
        let mut deleted = false;
        while input.cursor_index() > 0 && input.chars()[input.cursor_index() - 1].is_whitespace() {
            input.delete_character();
            deleted = true;
        }
        while input.cursor_index() > 0 && !input.chars()[input.cursor_index() - 1].is_whitespace() {
            input.delete_character();
            deleted = true;
        }
        deleted
    }

    // ---- history navigation ---------------------------------------------

    pub fn move_to_previous_input(&mut self) -> bool {
        if !self.can_edit() || !self.gates.take(ActionGates::PREVIOUS_INPUT) {
            return false;
        }
        match self.state.source {
            InputSource::NewInput => self.enter_historical_input().is_ok(),
            InputSource::HistoricalInput => self.history.move_to_previous(),
            InputSource::TempInput => {
                if self
                    .request(self.state.with_source(InputSource::HistoricalInput))
                    .is_err()
                {
                    return false;
                }
                // Back on the origin entry; step older if one exists.
                self.history.move_to_previous();
                true
            }
        }
    }

    pub fn move_to_next_input(&mut self) -> bool {
        if !self.can_edit() || !self.gates.take(ActionGates::NEXT_INPUT) {
            return false;
        }
        match self.state.source {
            InputSource::NewInput => false,
            InputSource::HistoricalInput => {
                // Past the newest entry means back to the fresh line.
                self.history.move_to_next() || self.enter_new_input().is_ok()
            }
            InputSource::TempInput => self.enter_new_input().is_ok(),
        }
    }

    // ---- scrollback paging ----------------------------------------------

    pub fn page_up(&mut self) -> bool {
        if !self.state.is_active() || !self.gates.take(ActionGates::PAGE_UP) {
            return false;
        }
        if !self.state.is_in_scrollback() {
            return self.enter_scrollback_buffer().is_ok();
        }
        let n_rows = self.n_rows;
        self.scrollback.page_up(n_rows)
    }

    pub fn page_down(&mut self) -> bool {
        if !self.state.is_active()
            || !self.state.is_in_scrollback()
            || !self.gates.take(ActionGates::PAGE_DOWN)
        {
            return false;
        }
        let n_rows = self.n_rows;
        if self.scrollback.page_down(n_rows) {
            true
        } else {
            // Fell off the end of the content: leave paging mode.
            self.exit_scrollback_buffer().is_ok()
        }
    }

    // ---- commit ---------------------------------------------------------

    /// Commit the visible input: append it to the history, echo it to the
    /// scrollback behind the prompt, dispatch it, and reset to a fresh
    /// line. Returns the handler's outcome, `None` for an empty line or an
    /// unknown command.
    pub fn enter_key(&mut self) -> Option<CommandOutcome> {
        if !self.can_edit() || !self.gates.take(ActionGates::ENTER_KEY) {
            return None;
        }
        let text = self.get_visible_input().to_string();
        let echo = TextLine::from(self.prompt.as_str()).concat(&TextLine::from(text.as_str()));
        self.scrollback.add_to_buffer(&echo);

        let mut fields = text.split_whitespace();
        let command = fields.next().map(String::from);
        let parameters: Vec<String> = fields.map(String::from).collect();

        let outcome = match command {
            None => None,
            Some(command) => {
                self.history.add_to_history(TextInput::from(text.as_str()));
                info!(target: "console.exec", command = %command, n_parameters = parameters.len(), "dispatch");
                match self.registry.dispatch(&command, &parameters) {
                    Some(outcome) => {
                        if let Some(output) = &outcome.output {
                            for line in output.lines() {
                                self.scrollback.add_to_buffer(&TextLine::from(line));
                            }
                        }
                        Some(outcome)
                    }
                    None if command == "clear" => {
                        self.scrollback.clear();
                        Some(CommandOutcome::silent())
                    }
                    None => {
                        let unknown = format!("unknown command: {command}");
                        self.scrollback.add_to_buffer(&TextLine::from(unknown.as_str()));
                        None
                    }
                }
            }
        };

        self.new_input.clear();
        self.invalidate_temp_input();
        if self.history.is_in_history() {
            self.history.exit_history();
        }
        if self.state.source != InputSource::NewInput {
            let _ = self.request(self.state.with_source(InputSource::NewInput));
        }
        outcome
    }

    // ---- completion -----------------------------------------------------

    /// Tab completion. The command word completes against registered
    /// command names; anything after the first space completes against the
    /// host's completion provider. A unique candidate rewrites the input
    /// with the cursor at the end; several candidates are echoed to the
    /// scrollback.
    pub fn tab(&mut self) -> bool {
        if !self.can_edit() || !self.gates.take(ActionGates::TAB) {
            return false;
        }
        if self.edit_input().is_err() {
            return false;
        }
        let text = self.get_visible_input().to_string();
        let (head, prefix, completing_command) = match text.rfind(' ') {
            None => (String::new(), text.clone(), true),
            Some(space) => (
                text[..=space].to_string(),
                text[space + 1..].to_string(),
                false,
            ),
        };
        let candidates = if completing_command {
            let mut names = self.command_names();
            names.retain(|name| name.starts_with(&prefix));
            names
        } else {
            match &self.completion {
                Some(completion) => completion.complete(&prefix),
                None => Vec::new(),
            }
        };
        match candidates.as_slice() {
            [] => false,
            [only] => {
                let replacement = format!("{head}{only}");
                match self.visible_input_mut() {
                    Some(input) => {
                        input.clear();
                        input.add_characters(replacement.chars());
                        true
                    }
                    None => false,
                }
            }
            many => {
                let echo =
                    TextLine::from(self.prompt.as_str()).concat(&TextLine::from(text.as_str()));
                self.scrollback.add_to_buffer(&echo);
                for candidate in many {
                    self.scrollback.add_to_buffer(&TextLine::from(candidate.as_str()));
                }
                true
            }
        }
    }

    // ---- views and accessors --------------------------------------------

    pub fn state(&self) -> ConsoleState {
        self.state
    }

    pub fn get_visible_input(&self) -> &TextInput {
        match self.state.source {
            InputSource::NewInput => &self.new_input,
            InputSource::HistoricalInput => self.history.get().unwrap_or(&self.new_input),
            InputSource::TempInput => {
                if self.temp_input_index.is_some() {
                    &self.temp_input
                } else {
                    &self.new_input
                }
            }
        }
    }

    /// Rows the prompt plus the visible input occupy at the current width.
    pub fn get_n_lines_of_visible_input(&self) -> usize {
        let total = self.prompt.chars().count() + self.get_visible_input().size();
        (total.max(1)).div_ceil(self.n_columns)
    }

    /// The scrollback lines currently on screen: the page at the paging
    /// cursor, or the tail of the buffer when not paging.
    pub fn get_scrollback_view(&self) -> &[TextLine] {
        match self.scrollback.buffer_index() {
            Some(top) => self.scrollback.get_view(top, self.n_rows),
            None => {
                let top = self.scrollback.size().saturating_sub(self.n_rows);
                self.scrollback.get_view(top, self.n_rows)
            }
        }
    }

    pub fn get_temp_input_index(&self) -> Option<usize> {
        self.temp_input_index
    }

    pub fn history(&self) -> &TextInputHistory {
        &self.history
    }

    pub fn scrollback(&self) -> &ScrollbackBuffer {
        &self.scrollback
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: &str) {
        self.prompt = prompt.to_string();
    }

    pub fn n_columns(&self) -> usize {
        self.n_columns
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }
}

impl std::fmt::Debug for ConsoleLogicModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleLogicModule")
            .field("state", &self.state)
            .field("history_size", &self.history.size())
            .field("scrollback_size", &self.scrollback.size())
            .field("temp_input_index", &self.temp_input_index)
            .finish()
    }
}
