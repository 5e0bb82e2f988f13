//! The add/edit contact form: four single-line inputs and a row of tag
//! checkboxes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use rolodex_core::model::{Contact, ContactFields, TagChecklist};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Phone,
    Address,
    Email,
    Tags,
}

impl FormField {
    const fn next(self) -> Self {
        match self {
            Self::Name => Self::Phone,
            Self::Phone => Self::Address,
            Self::Address => Self::Email,
            Self::Email => Self::Tags,
            Self::Tags => Self::Name,
        }
    }

    const fn prev(self) -> Self {
        match self {
            Self::Name => Self::Tags,
            Self::Phone => Self::Name,
            Self::Address => Self::Phone,
            Self::Email => Self::Address,
            Self::Tags => Self::Email,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Phone => "Phone",
            Self::Address => "Address",
            Self::Email => "Email",
            Self::Tags => "Tags",
        }
    }
}

/// What the form asks its owner to do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Submit,
    Cancel,
}

/// A text input with a char-indexed cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineInput {
    pub text: String,
    cursor: usize,
}

impl LineInput {
    pub fn set(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = char_len(&self.text);
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Apply an editing key. Returns true when the text changed.
    pub fn edit(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(char_len(&self.text)),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = char_len(&self.text),
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    return remove_char_at(&mut self.text, self.cursor);
                }
            }
            KeyCode::Delete => return remove_char_at(&mut self.text, self.cursor),
            KeyCode::Char(c) => {
                insert_char_at(&mut self.text, self.cursor, c);
                self.cursor += 1;
                return true;
            }
            _ => {}
        }
        false
    }

    pub fn display(&self, focused: bool) -> String {
        if focused {
            with_cursor(&self.text, self.cursor)
        } else {
            self.text.clone()
        }
    }
}

pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn byte_index_at_char(value: &str, char_idx: usize) -> usize {
    value
        .char_indices()
        .nth(char_idx)
        .map_or(value.len(), |(idx, _)| idx)
}

fn insert_char_at(value: &mut String, char_idx: usize, ch: char) {
    let idx = byte_index_at_char(value, char_idx);
    value.insert(idx, ch);
}

fn remove_char_at(value: &mut String, char_idx: usize) -> bool {
    if char_idx >= char_len(value) {
        return false;
    }
    let start = byte_index_at_char(value, char_idx);
    let end = byte_index_at_char(value, char_idx + 1);
    value.replace_range(start..end, "");
    true
}

fn with_cursor(value: &str, char_idx: usize) -> String {
    let mut out = String::new();
    let mut inserted = false;
    for (idx, ch) in value.chars().enumerate() {
        if idx == char_idx {
            out.push('█');
            inserted = true;
        }
        out.push(ch);
    }
    if !inserted {
        out.push('█');
    }
    out
}

#[derive(Debug, Clone)]
pub struct ContactForm {
    pub focus: FormField,
    pub name: LineInput,
    pub phone: LineInput,
    pub address: LineInput,
    pub email: LineInput,
    pub tags: TagChecklist,
    tag_cursor: usize,
}

impl ContactForm {
    pub fn new(vocabulary: &[String]) -> Self {
        Self {
            focus: FormField::Name,
            name: LineInput::default(),
            phone: LineInput::default(),
            address: LineInput::default(),
            email: LineInput::default(),
            tags: TagChecklist::new(vocabulary),
            tag_cursor: 0,
        }
    }

    /// Fill every input from `contact`, restoring tag checkbox state from
    /// its stored tags.
    pub fn populate(&mut self, contact: &Contact) {
        self.name.set(&contact.name);
        self.phone.set(&contact.phone);
        self.address.set(contact.address.as_deref().unwrap_or(""));
        self.email.set(contact.email.as_deref().unwrap_or(""));
        self.tags.apply_joined(&contact.tags.encode());
        self.tag_cursor = 0;
        self.focus = FormField::Name;
    }

    /// Blank every input and uncheck every tag.
    pub fn reset(&mut self) {
        self.name.clear();
        self.phone.clear();
        self.address.clear();
        self.email.clear();
        self.tags.clear();
        self.tag_cursor = 0;
        self.focus = FormField::Name;
    }

    pub fn to_fields(&self) -> ContactFields {
        ContactFields {
            name: self.name.text.clone(),
            phone: self.phone.text.clone(),
            address: self.address.text.clone(),
            email: self.email.text.clone(),
            tags: self.tags.selected(),
        }
    }

    pub const fn tag_cursor(&self) -> usize {
        self.tag_cursor
    }

    fn input_mut(&mut self, field: FormField) -> Option<&mut LineInput> {
        match field {
            FormField::Name => Some(&mut self.name),
            FormField::Phone => Some(&mut self.phone),
            FormField::Address => Some(&mut self.address),
            FormField::Email => Some(&mut self.email),
            FormField::Tags => None,
        }
    }

    fn input(&self, field: FormField) -> Option<&LineInput> {
        match field {
            FormField::Name => Some(&self.name),
            FormField::Phone => Some(&self.phone),
            FormField::Address => Some(&self.address),
            FormField::Email => Some(&self.email),
            FormField::Tags => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Char('s') if ctrl => return FormAction::Submit,
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.prev();
                return FormAction::None;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus = self.focus.next();
                return FormAction::None;
            }
            _ => {}
        }

        if self.focus == FormField::Tags {
            return self.handle_tags_key(key);
        }

        if key.code == KeyCode::Enter {
            self.focus = self.focus.next();
        } else if let Some(input) = self.input_mut(self.focus) {
            input.edit(key);
        }
        FormAction::None
    }

    fn handle_tags_key(&mut self, key: KeyEvent) -> FormAction {
        let last = self.tags.len().saturating_sub(1);
        match key.code {
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Left | KeyCode::Char('h') => {
                self.tag_cursor = self.tag_cursor.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.tag_cursor = (self.tag_cursor + 1).min(last);
            }
            KeyCode::Char(' ' | 'x') => {
                self.tags.toggle(self.tag_cursor);
            }
            _ => {}
        }
        FormAction::None
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, title: &str, focused: bool) {
        let border_color = if focused { Color::Green } else { Color::DarkGray };
        let label_style = Style::default().fg(Color::Gray);
        let active_label = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        let mut lines: Vec<Line<'static>> = Vec::new();
        for field in [
            FormField::Name,
            FormField::Phone,
            FormField::Address,
            FormField::Email,
        ] {
            let active = focused && self.focus == field;
            let value = self.input(field).map(|i| i.display(active)).unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:<9}", format!("{}:", field.label())),
                    if active { active_label } else { label_style },
                ),
                Span::raw(value),
            ]));
        }

        let tags_active = focused && self.focus == FormField::Tags;
        let mut tag_spans = vec![Span::styled(
            format!("{:<9}", "Tags:"),
            if tags_active { active_label } else { label_style },
        )];
        for (idx, checkbox) in self.tags.boxes().iter().enumerate() {
            let mark = if checkbox.checked { "[x]" } else { "[ ]" };
            let style = if tags_active && idx == self.tag_cursor {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else if checkbox.checked {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            tag_spans.push(Span::styled(format!("{mark} {}", checkbox.label), style));
            tag_spans.push(Span::raw("  "));
        }
        lines.push(Line::from(tag_spans));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(border_color))
            .title(format!(" {title} "))
            .title_style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
