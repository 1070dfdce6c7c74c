//! Ylic entrypoint.
//!
//! Owns the terminal (raw mode, alternate screen, key decoding) and drives a
//! [`ConsoleLogicModule`] with the decoded actions. The console itself never
//! touches the terminal; everything on screen is rebuilt from its render
//! views after each event.

use anyhow::Result;
use core_console::{ActionGates, CommandOutcome, ConsoleLogicModule, Modifiers};
use core_lisp::{Expr, ExprKind, Parser, Scanner};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style};
use std::cell::RefCell;
use std::io::{Stdout, Write, stdout};
use std::path::Path;
use std::rc::Rc;
use std::sync::Once;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;

mod config;

fn configure_logging(log: &config::LogConfig) -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join(&log.file);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, &log.file);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log.filter));
    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(nb_writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(_) => Some(guard),
        Err(_err) => {
            // Global tracing subscriber already installed; drop guard so writer shuts down.
            None
        }
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

/// Raw-mode and alternate-screen guard. Restores the terminal on drop so a
/// panic unwinding through `main` does not leave the shell unusable.
struct TerminalGuard {
    enhanced: bool,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen)?;
        let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if enhanced {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        Ok(Self { enhanced })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.enhanced {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = execute!(stdout(), LeaveAlternateScreen, cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

fn render_expr(expr: &Expr, out: &mut String) {
    match expr.kind {
        ExprKind::FunctionCall => {
            out.push('(');
            out.push_str(&expr.token.text);
            for child in expr.children() {
                out.push(' ');
                render_expr(child, out);
            }
            out.push(')');
        }
        ExprKind::StringLiteral => {
            out.push('"');
            out.push_str(&expr.token.text);
            out.push('"');
        }
        _ => out.push_str(&expr.token.text),
    }
}

/// Scan and parse a source string, returning one scrollback line per
/// diagnostic and per top-level expression.
fn evaluate_lisp(source: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let scanner = Scanner::scan(source);
    for diagnostic in scanner.error_log().iter() {
        lines.push(diagnostic.to_string());
    }
    let parser = Parser::parse(scanner.tokens());
    for diagnostic in parser.error_log().iter() {
        lines.push(diagnostic.to_string());
    }
    for tree in parser.syntax_trees() {
        let mut rendered = String::new();
        render_expr(tree, &mut rendered);
        lines.push(rendered);
    }
    if lines.is_empty() {
        lines.push("no expressions".to_string());
    }
    lines
}

fn register_commands(console: &mut ConsoleLogicModule, committed: Rc<RefCell<Vec<String>>>) {
    console.register_command("lisp", |parameters: &[String]| {
        let source = parameters.join(" ");
        CommandOutcome::output(evaluate_lisp(&source).join("\n"))
    });
    console.register_command("history", move |_parameters: &[String]| {
        let committed = committed.borrow();
        if committed.is_empty() {
            CommandOutcome::output("history is empty")
        } else {
            let listing: Vec<String> = committed
                .iter()
                .enumerate()
                .map(|(n, line)| format!("{:>4}  {line}", n + 1))
                .collect();
            CommandOutcome::output(listing.join("\n"))
        }
    });
    console.register_command("help", |_parameters: &[String]| {
        CommandOutcome::output(
            "commands: clear, help, history, lisp <expression>\n\
             keys: Esc toggles the console, Ctrl-Q quits, PageUp/PageDown page \
             the scrollback, Up/Down browse the history, Tab completes",
        )
    });
}

fn draw(out: &mut Stdout, console: &ConsoleLogicModule) -> Result<()> {
    queue!(out, cursor::Hide, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
    if !console.state().is_active() {
        queue!(
            out,
            style::Print("console inactive (Esc to activate, Ctrl-Q to quit)"),
            cursor::Show
        )?;
        out.flush()?;
        return Ok(());
    }
    let mut row: u16 = 0;
    for line in console.get_scrollback_view() {
        queue!(out, cursor::MoveTo(0, row), style::Print(line))?;
        row = row.saturating_add(1);
    }
    let prompt = console.prompt();
    let input = console.get_visible_input();
    queue!(
        out,
        cursor::MoveTo(0, row),
        style::Print(prompt),
        style::Print(input)
    )?;
    let cursor_cells = prompt.chars().count() + input.cursor_index();
    let cursor_row = row + (cursor_cells / console.n_columns()) as u16;
    let cursor_col = (cursor_cells % console.n_columns()) as u16;
    queue!(out, cursor::MoveTo(cursor_col, cursor_row), cursor::Show)?;
    out.flush()?;
    Ok(())
}

fn to_modifiers(modifiers: KeyModifiers) -> Modifiers {
    let mut mods = Modifiers::empty();
    if modifiers.contains(KeyModifiers::CONTROL) {
        mods |= Modifiers::LEFT_CONTROL;
    }
    if modifiers.contains(KeyModifiers::ALT) {
        mods |= Modifiers::LEFT_ALT;
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        mods |= Modifiers::LEFT_SHIFT;
    }
    mods
}

/// Feed one key press into the console. Returns `true` when the host should
/// exit.
fn dispatch_key(
    console: &mut ConsoleLogicModule,
    committed: &Rc<RefCell<Vec<String>>>,
    key: KeyEvent,
) -> bool {
    console.set_modifiers(to_modifiers(key.modifiers));
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') if ctrl => return true,
        KeyCode::Esc => {
            let _ = if console.state().is_active() {
                console.deactivate()
            } else {
                console.activate()
            };
        }
        KeyCode::Char('c') if ctrl => {
            console.ctrl_c();
        }
        KeyCode::Char('w') if ctrl => {
            console.ctrl_w();
        }
        KeyCode::Char(_) if ctrl => {}
        KeyCode::Char(c) => {
            console.add_character(c);
        }
        KeyCode::Backspace => {
            console.backspace();
        }
        KeyCode::Enter => {
            let text = console.get_visible_input().to_string();
            let echoed_before = console.scrollback().size();
            let _ = console.enter_key();
            // The echo line is the first thing a commit appends, so growth
            // means the line actually went through.
            if console.scrollback().size() > echoed_before && !text.trim().is_empty() {
                committed.borrow_mut().push(text);
            }
        }
        KeyCode::Tab => {
            console.tab();
        }
        KeyCode::Left => {
            console.move_cursor_left();
        }
        KeyCode::Right => {
            console.move_cursor_right();
        }
        KeyCode::Home => {
            console.home();
        }
        KeyCode::End => {
            console.end();
        }
        KeyCode::Up => {
            console.move_to_previous_input();
        }
        KeyCode::Down => {
            console.move_to_next_input();
        }
        KeyCode::PageUp => {
            console.page_up();
        }
        KeyCode::PageDown => {
            console.page_down();
        }
        _ => {}
    }
    false
}

fn run(console: &mut ConsoleLogicModule, committed: Rc<RefCell<Vec<String>>>) -> Result<()> {
    let guard = TerminalGuard::enter()?;
    let mut out = stdout();
    draw(&mut out, console)?;
    loop {
        match crossterm::event::read()? {
            Event::Key(key) => match key.kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    if dispatch_key(console, &committed, key) {
                        break;
                    }
                    if !guard.enhanced {
                        // No release reporting: each event is a distinct
                        // physical press, so re-arm everything.
                        console.arm_action(ActionGates::all());
                    }
                    draw(&mut out, console)?;
                }
                KeyEventKind::Release => {
                    console.arm_action(ActionGates::all());
                }
            },
            Event::Resize(columns, rows) => {
                debug!(target: "runtime", columns, rows, "resize ignored; geometry is fixed at startup");
                draw(&mut out, console)?;
            }
            _ => {}
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let config = config::load_from(None)?;
    let _log_guard = configure_logging(&config.log);
    install_panic_hook();
    info!(target: "runtime", "startup");

    let (terminal_columns, terminal_rows) = terminal::size().unwrap_or((80, 24));
    let columns = if config.console.columns == 0 {
        terminal_columns
    } else {
        config.console.columns
    };
    // The bottom row belongs to the prompt.
    let rows = if config.console.rows == 0 {
        terminal_rows.saturating_sub(1).max(1)
    } else {
        config.console.rows
    };

    let mut console =
        ConsoleLogicModule::new(&config.console.prompt, columns as usize, rows as usize);
    let committed = Rc::new(RefCell::new(Vec::new()));
    register_commands(&mut console, Rc::clone(&committed));
    console.activate()?;

    run(&mut console, committed)?;
    info!(target: "runtime", "shutdown");
    Ok(())
}
