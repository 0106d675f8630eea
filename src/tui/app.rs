//! Dashboard application state and key handling.
//!
//! The app owns the session state: current parameters, the append-only
//! function set, the RNG, and the latest report. Every parameter change
//! triggers a full cycle — fresh shock sample, fresh evaluation — so the
//! charts always reflect exactly the current controls.

use crossterm::event::KeyCode;

use crate::aggregate::{evaluate, Report};
use crate::config::SimParams;
use crate::response::{FunctionSet, DEFAULT_CUSTOM_LABEL};
use crate::rng::SimRng;
use crate::shock::ShockSample;

/// Which sidebar control has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Shock count slider.
    ShockCount,
    /// Volatility slider.
    Volatility,
    /// Distribution selector.
    Distribution,
    /// Custom-function expression field.
    Expression,
    /// Custom-function label field.
    Label,
}

impl Focus {
    const ORDER: [Self; 5] = [
        Self::ShockCount,
        Self::Volatility,
        Self::Distribution,
        Self::Expression,
        Self::Label,
    ];

    fn next(self) -> Self {
        let i = Self::ORDER.iter().position(|&f| f == self).unwrap_or(0);
        Self::ORDER[(i + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        let i = Self::ORDER.iter().position(|&f| f == self).unwrap_or(0);
        Self::ORDER[(i + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    /// Whether this control is a free-text field.
    #[must_use]
    pub fn is_text(self) -> bool {
        matches!(self, Self::Expression | Self::Label)
    }
}

/// Whether key presses adjust controls or edit a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Keys adjust the focused control.
    Normal,
    /// Keys edit the focused text field.
    Editing,
}

/// Sidebar status line after a custom-function submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Message text.
    pub message: String,
    /// Whether this is an error.
    pub error: bool,
}

/// Dashboard application state.
pub struct App {
    /// Current parameters.
    pub params: SimParams,
    /// Session function set: built-ins plus submitted customs.
    pub functions: FunctionSet,
    /// Shock RNG.
    pub rng: SimRng,
    /// Latest report.
    pub report: Report,
    /// Focused control.
    pub focus: Focus,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Expression field contents.
    pub expression_input: String,
    /// Label field contents.
    pub label_input: String,
    /// Last submission outcome, if any.
    pub status: Option<StatusLine>,
    /// Whether the raw log panel is expanded.
    pub show_log: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Completed render cycles.
    pub cycle_count: u64,
}

impl App {
    /// Create the app and run the first cycle.
    ///
    /// A seed in `params` makes the shock stream reproducible; the default
    /// is entropy-seeded.
    #[must_use]
    pub fn new(params: SimParams) -> Self {
        let mut rng = params
            .seed
            .map_or_else(SimRng::from_entropy, SimRng::new);
        let functions = FunctionSet::builtins();
        let shocks = ShockSample::draw(&params, &mut rng);
        let report = evaluate(&functions, &params, &shocks);

        Self {
            params,
            functions,
            rng,
            report,
            focus: Focus::ShockCount,
            input_mode: InputMode::Normal,
            expression_input: String::new(),
            label_input: DEFAULT_CUSTOM_LABEL.to_string(),
            status: None,
            show_log: false,
            should_quit: false,
            cycle_count: 1,
        }
    }

    /// Run one full cycle: fresh shocks, fresh report.
    pub fn recompute(&mut self) {
        let shocks = ShockSample::draw(&self.params, &mut self.rng);
        self.report = evaluate(&self.functions, &self.params, &shocks);
        self.cycle_count += 1;
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyCode) {
        match self.input_mode {
            InputMode::Editing => self.handle_editing_key(key),
            InputMode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_editing_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Backspace => {
                self.active_buffer_mut().pop();
            }
            KeyCode::Char(c) => self.active_buffer_mut().push(c),
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::Left | KeyCode::Char('-') => self.adjust_focused(-1),
            KeyCode::Right | KeyCode::Char('+' | '=') => self.adjust_focused(1),
            KeyCode::Char('d') => {
                self.params.cycle_distribution();
                self.recompute();
            }
            KeyCode::Char('r') => self.recompute(),
            KeyCode::Char('l') => self.show_log = !self.show_log,
            KeyCode::Char('a') => self.apply_custom(),
            KeyCode::Char('e') => {
                if !self.focus.is_text() {
                    self.focus = Focus::Expression;
                }
                self.input_mode = InputMode::Editing;
            }
            KeyCode::Enter => {
                if self.focus.is_text() {
                    self.input_mode = InputMode::Editing;
                } else {
                    self.apply_custom();
                }
            }
            _ => {}
        }
    }

    fn adjust_focused(&mut self, direction: i64) {
        match self.focus {
            Focus::ShockCount => {
                self.params.bump_shock_count(direction);
                self.recompute();
            }
            Focus::Volatility => {
                self.params.bump_volatility(direction);
                self.recompute();
            }
            Focus::Distribution => {
                self.params.cycle_distribution();
                self.recompute();
            }
            Focus::Expression | Focus::Label => {}
        }
    }

    /// Submit the pending custom function.
    ///
    /// On success the function set grows by one and a fresh cycle runs; on
    /// failure the error is shown and nothing else changes.
    pub fn apply_custom(&mut self) {
        if self.expression_input.trim().is_empty() {
            self.status = Some(StatusLine {
                message: "Enter an expression in terms of x first".to_string(),
                error: true,
            });
            return;
        }

        match self
            .functions
            .add_custom(&self.expression_input, &self.label_input)
        {
            Ok(added) => {
                self.status = Some(StatusLine {
                    message: format!("Added '{}'", added.label()),
                    error: false,
                });
                self.recompute();
            }
            Err(err) => {
                self.status = Some(StatusLine {
                    message: format!("Invalid function: {err}"),
                    error: true,
                });
            }
        }
    }

    fn active_buffer_mut(&mut self) -> &mut String {
        match self.focus {
            Focus::Label => &mut self.label_input,
            _ => &mut self.expression_input,
        }
    }
}
