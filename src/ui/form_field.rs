//! Input widgets for sub-step fields

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::content::{FieldKind, FieldSpec};
use crate::wizard::FieldValue;

/// A form field widget that can handle different input types
#[derive(Debug, Clone, PartialEq)]
pub enum FormField {
    /// Single-line text input; `numeric` restricts typing to number characters
    TextInput {
        value: String,
        /// Cursor position in chars
        cursor_pos: usize,
        placeholder: String,
        numeric: bool,
    },
    /// Choice from predefined options; nothing chosen until the user picks
    Select {
        options: Vec<String>,
        selected: Option<usize>,
    },
    /// Boolean toggle
    Toggle { value: bool },
}

impl FormField {
    /// Create a widget for `spec` showing `value`
    pub fn from_spec(spec: &FieldSpec, value: &FieldValue) -> Self {
        match spec.kind {
            FieldKind::Text | FieldKind::Number => {
                let text = value.to_string();
                FormField::TextInput {
                    cursor_pos: text.chars().count(),
                    value: text,
                    placeholder: spec.placeholder.clone().unwrap_or_default(),
                    numeric: spec.kind == FieldKind::Number,
                }
            }
            FieldKind::Select => {
                let selected = value
                    .as_text()
                    .and_then(|v| spec.options.iter().position(|o| o == v));
                FormField::Select {
                    options: spec.options.clone(),
                    selected,
                }
            }
            FieldKind::Toggle => FormField::Toggle {
                value: value.as_flag().unwrap_or_else(|| value.is_filled()),
            },
        }
    }

    /// Get the current value
    pub fn value(&self) -> FieldValue {
        match self {
            FormField::TextInput { value, .. } => FieldValue::Text(value.clone()),
            FormField::Select { options, selected } => FieldValue::Text(
                selected
                    .and_then(|i| options.get(i).cloned())
                    .unwrap_or_default(),
            ),
            FormField::Toggle { value } => FieldValue::Flag(*value),
        }
    }

    /// Handle a key event, returns true if the value changed
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match self {
            FormField::TextInput {
                value,
                cursor_pos,
                numeric,
                ..
            } => match key {
                KeyCode::Char(c) => {
                    if *numeric && !(c.is_ascii_digit() || matches!(c, '.' | '-')) {
                        return false;
                    }
                    let at = byte_offset(value, *cursor_pos);
                    value.insert(at, c);
                    *cursor_pos += 1;
                    true
                }
                KeyCode::Backspace => {
                    if *cursor_pos == 0 {
                        return false;
                    }
                    *cursor_pos -= 1;
                    let at = byte_offset(value, *cursor_pos);
                    value.remove(at);
                    true
                }
                KeyCode::Delete => {
                    if *cursor_pos >= value.chars().count() {
                        return false;
                    }
                    let at = byte_offset(value, *cursor_pos);
                    value.remove(at);
                    true
                }
                KeyCode::Left => {
                    *cursor_pos = cursor_pos.saturating_sub(1);
                    false
                }
                KeyCode::Right => {
                    *cursor_pos = (*cursor_pos + 1).min(value.chars().count());
                    false
                }
                KeyCode::Home => {
                    *cursor_pos = 0;
                    false
                }
                KeyCode::End => {
                    *cursor_pos = value.chars().count();
                    false
                }
                _ => false,
            },
            FormField::Select { options, selected } => {
                if options.is_empty() {
                    return false;
                }
                let last = options.len() - 1;
                let next = match (key, *selected) {
                    (KeyCode::Right | KeyCode::Char('l' | ' '), None) => 0,
                    (KeyCode::Right | KeyCode::Char('l' | ' '), Some(i)) => {
                        if i >= last {
                            0
                        } else {
                            i + 1
                        }
                    }
                    (KeyCode::Left | KeyCode::Char('h'), None) => last,
                    (KeyCode::Left | KeyCode::Char('h'), Some(i)) => {
                        if i == 0 {
                            last
                        } else {
                            i - 1
                        }
                    }
                    _ => return false,
                };
                *selected = Some(next);
                true
            }
            FormField::Toggle { value } => match key {
                KeyCode::Char(' ') => {
                    *value = !*value;
                    true
                }
                KeyCode::Left | KeyCode::Char('h' | 'n') => {
                    let changed = *value;
                    *value = false;
                    changed
                }
                KeyCode::Right | KeyCode::Char('l' | 'y') => {
                    let changed = !*value;
                    *value = true;
                    changed
                }
                _ => false,
            },
        }
    }

    /// Render the field
    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let value_style = Style::default().fg(if focused { Color::White } else { Color::Gray });

        let line = match self {
            FormField::TextInput {
                value,
                cursor_pos,
                placeholder,
                ..
            } => {
                if value.is_empty() && !focused {
                    Line::from(Span::styled(
                        placeholder.as_str(),
                        Style::default().fg(Color::DarkGray),
                    ))
                } else {
                    let mut text = value.clone();
                    if focused {
                        text.insert(byte_offset(&text, *cursor_pos), '|');
                    }
                    Line::from(Span::styled(text, value_style))
                }
            }
            FormField::Select { options, selected } => {
                let label = selected
                    .and_then(|i| options.get(i))
                    .map_or("(choose)", String::as_str);
                let arrow_style = Style::default().fg(if focused {
                    Color::Cyan
                } else {
                    Color::DarkGray
                });
                Line::from(vec![
                    Span::styled("< ", arrow_style),
                    Span::styled(label.to_string(), value_style),
                    Span::styled(" >", arrow_style),
                ])
            }
            FormField::Toggle { value } => {
                let on = Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD);
                let off = Style::default().fg(Color::DarkGray);
                Line::from(vec![
                    Span::styled("[Yes]", if *value { on } else { off }),
                    Span::raw(" "),
                    Span::styled("[No]", if *value { off } else { on }),
                ])
            }
        };

        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Byte index of the `chars`-th character, or the end of the string
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(kind: FieldKind) -> FieldSpec {
        FieldSpec {
            name: "f".to_string(),
            label: "F".to_string(),
            kind,
            required: false,
            options: vec!["Office".to_string(), "Retail".to_string()],
            min: None,
            max: None,
            pattern: None,
            placeholder: Some("type here".to_string()),
            unit: None,
        }
    }

    #[test]
    fn test_text_input_editing() {
        let mut field = FormField::from_spec(&spec(FieldKind::Text), &FieldValue::text("ab"));
        assert!(field.handle_key(KeyCode::Char('c')));
        assert!(!field.handle_key(KeyCode::Left));
        assert!(field.handle_key(KeyCode::Backspace));
        assert_eq!(field.value(), FieldValue::text("ac"));
        assert!(field.handle_key(KeyCode::Delete));
        assert_eq!(field.value(), FieldValue::text("a"));
        assert!(!field.handle_key(KeyCode::Delete));
    }

    #[test]
    fn test_text_input_handles_multibyte() {
        let mut field = FormField::from_spec(&spec(FieldKind::Text), &FieldValue::text("Zürich"));
        field.handle_key(KeyCode::Home);
        field.handle_key(KeyCode::Right);
        field.handle_key(KeyCode::Right);
        assert!(field.handle_key(KeyCode::Backspace));
        assert_eq!(field.value(), FieldValue::text("Zrich"));
    }

    #[test]
    fn test_numeric_input_rejects_letters() {
        let mut field = FormField::from_spec(&spec(FieldKind::Number), &FieldValue::default());
        assert!(!field.handle_key(KeyCode::Char('x')));
        assert!(field.handle_key(KeyCode::Char('4')));
        assert!(field.handle_key(KeyCode::Char('.')));
        assert!(field.handle_key(KeyCode::Char('5')));
        assert_eq!(field.value(), FieldValue::text("4.5"));
    }

    #[test]
    fn test_select_starts_unchosen_and_cycles() {
        let mut field = FormField::from_spec(&spec(FieldKind::Select), &FieldValue::default());
        assert_eq!(field.value(), FieldValue::text(""));

        assert!(field.handle_key(KeyCode::Right));
        assert_eq!(field.value(), FieldValue::text("Office"));
        assert!(field.handle_key(KeyCode::Right));
        assert_eq!(field.value(), FieldValue::text("Retail"));
        assert!(field.handle_key(KeyCode::Right));
        assert_eq!(field.value(), FieldValue::text("Office"));
        assert!(field.handle_key(KeyCode::Left));
        assert_eq!(field.value(), FieldValue::text("Retail"));
    }

    #[test]
    fn test_select_restores_saved_option() {
        let field = FormField::from_spec(&spec(FieldKind::Select), &FieldValue::text("Retail"));
        assert_eq!(field.value(), FieldValue::text("Retail"));

        let unknown = FormField::from_spec(&spec(FieldKind::Select), &FieldValue::text("Castle"));
        assert_eq!(unknown.value(), FieldValue::text(""));
    }

    #[test]
    fn test_toggle() {
        let mut field = FormField::from_spec(&spec(FieldKind::Toggle), &FieldValue::Flag(false));
        assert!(field.handle_key(KeyCode::Char(' ')));
        assert_eq!(field.value(), FieldValue::Flag(true));
        assert!(!field.handle_key(KeyCode::Char('y')));
        assert!(field.handle_key(KeyCode::Char('n')));
        assert_eq!(field.value(), FieldValue::Flag(false));
    }
}
