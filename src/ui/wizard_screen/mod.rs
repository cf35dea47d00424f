//! Add-building wizard screen
//!
//! The screen mirrors the session's current sub-step into editable widgets
//! and turns key presses into [`ScreenAction`]s. It never mutates the
//! session itself; the app applies the actions and calls [`WizardScreen::sync`]
//! before the next frame.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{widgets::ListState, Frame};

use crate::content::{ContentValidator, FieldSpec, Verdict};
use crate::ui::form_field::FormField;
use crate::wizard::{
    ContentState, FieldMap, FieldValue, JumpTarget, StatusReporter, StepKey, WizardSession,
};

mod completion;
mod content;
mod layout;
mod stepper;


/// Input mode of the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenMode {
    /// Editing the fields of the current sub-step
    Form,
    /// Picking a step or sub-step in the stepper
    Jump,
}

/// What the app should do in response to a key press
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    None,
    FieldChanged { name: String, value: FieldValue },
    Continue,
    Back,
    Skip,
    Jump(JumpTarget),
    Retry,
    Reset,
    Quit,
}

/// A rendered field and its widget
#[derive(Debug, Clone)]
pub(crate) struct FieldRow {
    pub(crate) spec: FieldSpec,
    pub(crate) widget: FormField,
}

/// Validation hook handed to the rendered component
struct ContentBinding {
    key: StepKey,
    validator: ContentValidator,
    reporter: StatusReporter,
}

pub struct WizardScreen {
    pub mode: ScreenMode,
    pub(crate) rows: Vec<FieldRow>,
    pub(crate) focus: usize,
    /// Load generation the rows were built from
    synced_generation: Option<u64>,
    binding: Option<ContentBinding>,
    /// Last verdict published by the component
    pub(crate) verdict: Option<Verdict>,
    /// Whether issues should be shown; set after the first edit or a
    /// refused continue
    pub(crate) show_issues: bool,
    pub(crate) jump_state: ListState,
    pub(crate) status_message: Option<String>,
}

impl Default for WizardScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardScreen {
    pub fn new() -> Self {
        Self {
            mode: ScreenMode::Form,
            rows: Vec::new(),
            focus: 0,
            synced_generation: None,
            binding: None,
            verdict: None,
            show_issues: false,
            jump_state: ListState::default(),
            status_message: None,
        }
    }

    /// Rebuild the widgets when the session loaded new content
    pub fn sync(&mut self, session: &WizardSession) {
        let ContentState::Ready(content) = session.content() else {
            self.rows.clear();
            self.synced_generation = None;
            self.binding = None;
            self.verdict = None;
            return;
        };
        if self.synced_generation == Some(session.generation()) {
            return;
        }

        self.rows = content
            .fields
            .iter()
            .map(|spec| {
                let value = session
                    .field(&spec.name)
                    .cloned()
                    .unwrap_or_else(|| spec.initial_value());
                FieldRow {
                    widget: FormField::from_spec(spec, &value),
                    spec: spec.clone(),
                }
            })
            .collect();
        self.focus = 0;
        self.verdict = None;
        self.show_issues = false;
        self.synced_generation = Some(session.generation());

        self.binding = match ContentValidator::new(content) {
            Ok(validator) => Some(ContentBinding {
                key: session.current_key(),
                validator,
                reporter: session.reporter(),
            }),
            Err(e) => {
                tracing::warn!(
                    component = %content.component,
                    error = %e,
                    "Component rules unavailable"
                );
                None
            }
        };
    }

    /// Evaluate the component's rules and publish the verdict to the session
    pub fn publish_status(&mut self, values: &FieldMap) {
        if let Some(binding) = &self.binding {
            let verdict = binding
                .validator
                .report(&binding.reporter, binding.key, values);
            self.verdict = Some(verdict);
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Current widget values keyed by field name
    pub fn values(&self) -> FieldMap {
        self.rows
            .iter()
            .map(|r| (r.spec.name.clone(), r.widget.value()))
            .collect()
    }

    /// Name of the focused field, if any
    pub fn focused_field(&self) -> Option<&str> {
        self.rows.get(self.focus).map(|r| r.spec.name.as_str())
    }

    pub fn handle_key(&mut self, key: KeyEvent, session: &WizardSession) -> ScreenAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return ScreenAction::Quit;
        }

        if session.is_completed() {
            return match key.code {
                KeyCode::Char('n') | KeyCode::Char('N') => ScreenAction::Reset,
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => ScreenAction::Quit,
                _ => ScreenAction::None,
            };
        }

        match self.mode {
            ScreenMode::Jump => self.handle_jump_key(key.code, session),
            ScreenMode::Form => self.handle_form_key(key, session),
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent, session: &WizardSession) -> ScreenAction {
        let actions = session.actions();

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('b') if actions.can_go_back => ScreenAction::Back,
                KeyCode::Char('s') if actions.can_skip => ScreenAction::Skip,
                KeyCode::Char('r') => self.retry_action(session),
                _ => ScreenAction::None,
            };
        }

        match key.code {
            KeyCode::Esc => ScreenAction::Quit,
            KeyCode::F(2) => {
                self.mode = ScreenMode::Jump;
                self.jump_state.select(session.stepper().active_index());
                ScreenAction::None
            }
            KeyCode::F(5) => self.retry_action(session),
            KeyCode::Tab | KeyCode::Down => {
                if !self.rows.is_empty() {
                    self.focus = (self.focus + 1) % self.rows.len();
                }
                ScreenAction::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                if !self.rows.is_empty() {
                    self.focus = (self.focus + self.rows.len() - 1) % self.rows.len();
                }
                ScreenAction::None
            }
            KeyCode::Enter => {
                if actions.can_continue {
                    ScreenAction::Continue
                } else {
                    if !session.is_loading() {
                        if let Some(binding) = &self.binding {
                            self.verdict = Some(binding.validator.evaluate(&self.values()));
                        }
                        self.show_issues = true;
                        self.set_status("Complete the required fields to continue");
                    }
                    ScreenAction::None
                }
            }
            code => {
                let Some(row) = self.rows.get_mut(self.focus) else {
                    return ScreenAction::None;
                };
                if !row.widget.handle_key(code) {
                    return ScreenAction::None;
                }
                self.show_issues = true;
                ScreenAction::FieldChanged {
                    name: row.spec.name.clone(),
                    value: row.widget.value(),
                }
            }
        }
    }

    fn handle_jump_key(&mut self, code: KeyCode, session: &WizardSession) -> ScreenAction {
        let stepper = session.stepper();
        let len = stepper.rows.len();
        if len == 0 {
            self.mode = ScreenMode::Form;
            return ScreenAction::None;
        }

        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                let i = self.jump_state.selected().map_or(0, |i| (i + len - 1) % len);
                self.jump_state.select(Some(i));
                ScreenAction::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let i = self.jump_state.selected().map_or(0, |i| (i + 1) % len);
                self.jump_state.select(Some(i));
                ScreenAction::None
            }
            KeyCode::Enter => {
                self.mode = ScreenMode::Form;
                self.jump_state
                    .selected()
                    .and_then(|i| stepper.rows.get(i))
                    .map_or(ScreenAction::None, |row| ScreenAction::Jump(row.target))
            }
            KeyCode::Esc | KeyCode::F(2) => {
                self.mode = ScreenMode::Form;
                ScreenAction::None
            }
            _ => ScreenAction::None,
        }
    }

    fn retry_action(&self, session: &WizardSession) -> ScreenAction {
        if matches!(session.content(), ContentState::Failed { .. }) {
            ScreenAction::Retry
        } else {
            ScreenAction::None
        }
    }

    pub fn render(&mut self, frame: &mut Frame, session: &WizardSession) {
        if session.is_completed() {
            self.render_completion(frame, session);
            return;
        }

        let areas = layout::split(frame.area());
        self.render_stepper(frame, areas.stepper, session);
        self.render_header(frame, areas.header, session);
        self.render_progress(frame, areas.progress, session);
        self.render_content(frame, areas.content, session);
        self.render_footer(frame, areas.footer, areas.status, session);
    }
}
