//! Interactive contact list.
//!
//! [`ContactsView`] owns everything on screen: the latest list response, the
//! filter inputs, the reconciled list content, the add and edit forms, and
//! any pending modal. Keys become [`Command`]s; [`ContactsView::dispatch`]
//! is the only place commands change state, and it hands back the
//! [`Request`]s the caller must run. Their results come back through
//! [`ContactsView::complete`].

use super::command::{Command, Completion, Request};
use super::form::{ContactForm, FormAction, LineInput};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use rolodex_core::client::ClientError;
use rolodex_core::filter::{FilterCriteria, apply_filter};
use rolodex_core::model::{Contact, ContactId};
use rolodex_core::view::{ContactRow, Detail, ListContent, reconcile};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const STATUS_TTL: Duration = Duration::from_secs(3);

/// Which of the two forms is live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Adding,
    Editing { id: ContactId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    List,
    NameFilter,
    AddForm,
    EditForm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Modal {
    /// Blocking message, dismissed by any key.
    Alert(String),
    ConfirmDelete(ContactId),
}

pub struct ContactsView {
    vocabulary: Vec<String>,
    confirm_delete: bool,
    /// Most recent successful list response, replaced wholesale by each fetch.
    latest: Option<Vec<Contact>>,
    criteria: FilterCriteria,
    name_input: LineInput,
    /// Index into `vocabulary`; `None` means every tag.
    tag_choice: Option<usize>,
    content: ListContent,
    list_state: ListState,
    mode: FormMode,
    add_form: ContactForm,
    edit_form: ContactForm,
    focus: Focus,
    modal: Option<Modal>,
    status_msg: Option<(String, Instant)>,
    should_quit: bool,
}

impl ContactsView {
    pub fn new(vocabulary: Vec<String>, confirm_delete: bool) -> Self {
        Self {
            add_form: ContactForm::new(&vocabulary),
            edit_form: ContactForm::new(&vocabulary),
            vocabulary,
            confirm_delete,
            latest: None,
            criteria: FilterCriteria::default(),
            name_input: LineInput::default(),
            tag_choice: None,
            content: ListContent::Loading,
            list_state: ListState::default(),
            mode: FormMode::Adding,
            focus: Focus::List,
            modal: None,
            status_msg: None,
            should_quit: false,
        }
    }

    /// Requests to issue when the view first appears.
    pub fn start(&self) -> Vec<Request> {
        vec![Request::Fetch]
    }

    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub const fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub const fn content(&self) -> &ListContent {
        &self.content
    }

    /// Text of the pending alert, if one is open.
    pub fn alert(&self) -> Option<&str> {
        match &self.modal {
            Some(Modal::Alert(message)) => Some(message),
            _ => None,
        }
    }

    pub fn selected_row(&self) -> Option<&ContactRow> {
        self.list_state
            .selected()
            .and_then(|idx| self.content.rows().get(idx))
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_msg = Some((msg.into(), Instant::now()));
    }

    fn tag_query(&self) -> &str {
        self.tag_choice
            .and_then(|idx| self.vocabulary.get(idx))
            .map_or("", String::as_str)
    }

    /// Re-filter the latest response and replace the list content.
    fn rerender(&mut self) {
        let Some(latest) = &self.latest else {
            return;
        };
        let visible = apply_filter(latest, &self.criteria);
        self.content = reconcile(&visible);

        let rows = self.content.rows().len();
        let selected = match self.list_state.selected() {
            _ if rows == 0 => None,
            Some(idx) => Some(idx.min(rows - 1)),
            None => Some(0),
        };
        self.list_state.select(selected);
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Apply one command. Returns the service requests it needs.
    pub fn dispatch(&mut self, command: Command) -> Vec<Request> {
        debug!(?command, "dispatch");
        match command {
            Command::AddRequested => match self.mode {
                FormMode::Adding => vec![Request::Create(self.add_form.to_fields())],
                FormMode::Editing { .. } => Vec::new(),
            },
            Command::EditRequested(contact) => {
                self.edit_form.populate(&contact);
                self.mode = FormMode::Editing {
                    id: contact.id.clone(),
                };
                self.focus = Focus::EditForm;
                Vec::new()
            }
            Command::EditSubmitted => match &self.mode {
                FormMode::Editing { id } => {
                    vec![Request::Update(id.clone(), self.edit_form.to_fields())]
                }
                FormMode::Adding => Vec::new(),
            },
            Command::EditCancelled => {
                self.leave_editing();
                Vec::new()
            }
            Command::DeleteRequested(id) => {
                if self.confirm_delete {
                    self.modal = Some(Modal::ConfirmDelete(id));
                    Vec::new()
                } else {
                    self.dispatch(Command::DeleteConfirmed(id))
                }
            }
            Command::DeleteConfirmed(id) => {
                self.modal = None;
                vec![Request::Delete(id)]
            }
            Command::DeleteDeclined => {
                self.modal = None;
                Vec::new()
            }
            Command::FilterChanged => {
                self.criteria =
                    FilterCriteria::new(self.name_input.text.clone(), self.tag_query().to_string());
                self.rerender();
                vec![Request::Fetch]
            }
            Command::Refresh => vec![Request::Fetch],
            Command::Quit => {
                self.should_quit = true;
                Vec::new()
            }
        }
    }

    /// Only the form matching the current mode is shown or focusable.
    const fn active_form_focus(&self) -> Focus {
        match self.mode {
            FormMode::Adding => Focus::AddForm,
            FormMode::Editing { .. } => Focus::EditForm,
        }
    }

    fn leave_editing(&mut self) {
        self.mode = FormMode::Adding;
        self.edit_form.reset();
        if self.focus == Focus::EditForm {
            self.focus = Focus::List;
        }
    }

    /// Apply a finished request. Returns follow-up requests (the re-fetch
    /// after a successful mutation).
    pub fn complete(&mut self, completion: Completion) -> Vec<Request> {
        match completion {
            Completion::Fetched(Ok(contacts)) => {
                debug!(count = contacts.len(), "contact list received");
                self.latest = Some(contacts);
                self.rerender();
                Vec::new()
            }
            Completion::Fetched(Err(err)) => {
                warn!("contact list fetch failed: {err}");
                self.latest = None;
                self.content = ListContent::Failed;
                self.list_state.select(None);
                Vec::new()
            }
            Completion::Created(Ok(())) => {
                info!("contact added");
                self.add_form.reset();
                self.set_status("Contact added");
                vec![Request::Fetch]
            }
            Completion::Created(Err(err)) => {
                self.alert_failure("add", &err);
                Vec::new()
            }
            Completion::Updated { id, result: Ok(()) } => {
                info!(%id, "contact updated");
                if self.mode == (FormMode::Editing { id }) {
                    self.leave_editing();
                }
                self.set_status("Contact updated");
                vec![Request::Fetch]
            }
            Completion::Updated {
                result: Err(err), ..
            } => {
                self.alert_failure("update", &err);
                Vec::new()
            }
            Completion::Deleted(Ok(())) => {
                info!("contact deleted");
                self.set_status("Contact deleted");
                vec![Request::Fetch]
            }
            Completion::Deleted(Err(err)) => {
                self.alert_failure("delete", &err);
                Vec::new()
            }
        }
    }

    fn alert_failure(&mut self, verb: &str, err: &ClientError) {
        warn!(code = %err.code(), "{verb} failed: {err}");
        self.modal = Some(Modal::Alert(format!(
            "Failed to {verb} contact: {}",
            err.message()
        )));
    }

    // -----------------------------------------------------------------------
    // Keys
    // -----------------------------------------------------------------------

    /// Translate a key into at most one command and dispatch it.
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Request> {
        self.command_for_key(key)
            .map(|command| self.dispatch(command))
            .unwrap_or_default()
    }

    fn command_for_key(&mut self, key: KeyEvent) -> Option<Command> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Command::Quit);
        }

        match &self.modal {
            Some(Modal::Alert(_)) => {
                self.modal = None;
                return None;
            }
            Some(Modal::ConfirmDelete(id)) => {
                return match key.code {
                    KeyCode::Char('y' | 'Y') | KeyCode::Enter => {
                        Some(Command::DeleteConfirmed(id.clone()))
                    }
                    KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Command::DeleteDeclined),
                    _ => None,
                };
            }
            None => {}
        }

        match self.focus {
            Focus::List => self.list_key(key),
            Focus::NameFilter => self.name_filter_key(key),
            Focus::AddForm => match self.add_form.handle_key(key) {
                FormAction::Submit => Some(Command::AddRequested),
                FormAction::Cancel => {
                    self.focus = Focus::List;
                    None
                }
                FormAction::None => None,
            },
            Focus::EditForm => match self.edit_form.handle_key(key) {
                FormAction::Submit => Some(Command::EditSubmitted),
                FormAction::Cancel => Some(Command::EditCancelled),
                FormAction::None => None,
            },
        }
    }

    fn list_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Char('q') => Some(Command::Quit),
            KeyCode::Char('j') | KeyCode::Down => {
                self.select_by(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.select_by(-1);
                None
            }
            KeyCode::Char('e') | KeyCode::Enter => self
                .selected_row()
                .and_then(ContactRow::edit_snapshot)
                .cloned()
                .map(Command::EditRequested),
            KeyCode::Char('d' | 'x') | KeyCode::Delete => self
                .selected_row()
                .and_then(ContactRow::delete_target)
                .cloned()
                .map(Command::DeleteRequested),
            KeyCode::Char('a') | KeyCode::Tab => {
                self.focus = self.active_form_focus();
                None
            }
            KeyCode::Char('/') => {
                self.focus = Focus::NameFilter;
                None
            }
            KeyCode::Char('t') => {
                self.cycle_tag(true);
                Some(Command::FilterChanged)
            }
            KeyCode::Char('T') => {
                self.cycle_tag(false);
                Some(Command::FilterChanged)
            }
            KeyCode::Char('r') => Some(Command::Refresh),
            KeyCode::Esc if !self.name_input.text.is_empty() || self.tag_choice.is_some() => {
                self.name_input.clear();
                self.tag_choice = None;
                Some(Command::FilterChanged)
            }
            _ => None,
        }
    }

    fn name_filter_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Tab => {
                self.focus = Focus::List;
                None
            }
            _ => self.name_input.edit(key).then_some(Command::FilterChanged),
        }
    }

    /// Step through "all" followed by each vocabulary tag.
    fn cycle_tag(&mut self, forward: bool) {
        let len = self.vocabulary.len();
        self.tag_choice = match (self.tag_choice, forward) {
            _ if len == 0 => None,
            (None, true) => Some(0),
            (None, false) => Some(len - 1),
            (Some(idx), true) if idx + 1 < len => Some(idx + 1),
            (Some(idx), false) if idx > 0 => Some(idx - 1),
            (Some(_), _) => None,
        };
    }

    fn select_by(&mut self, delta: isize) {
        let rows = self.content.rows().len();
        if rows == 0 {
            self.list_state.select(None);
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(rows - 1);
        self.list_state.select(Some(next));
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    pub fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_filters(frame, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[1]);
        self.render_list(frame, body[0]);
        self.render_forms(frame, body[1]);

        frame.render_widget(
            Paragraph::new(self.build_status_bar()).alignment(Alignment::Left),
            chunks[2],
        );

        match &self.modal {
            Some(Modal::Alert(message)) => {
                render_modal(frame, area, " Error ", message, "press any key", Color::Red);
            }
            Some(Modal::ConfirmDelete(_)) => render_modal(
                frame,
                area,
                " Confirm ",
                "Delete this contact?",
                "[y] delete   [n] keep",
                Color::Yellow,
            ),
            None => {}
        }
    }

    fn render_filters(&self, frame: &mut Frame<'_>, area: Rect) {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        let name_focused = self.focus == Focus::NameFilter;
        frame.render_widget(
            Paragraph::new(self.name_input.display(name_focused)).block(pane_block(
                "Filter by name (/)",
                name_focused,
            )),
            halves[0],
        );

        let tag_label = self
            .tag_choice
            .and_then(|idx| self.vocabulary.get(idx))
            .map_or_else(|| "all".to_string(), Clone::clone);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("◀ ", Style::default().fg(Color::DarkGray)),
                Span::styled(tag_label, Style::default().fg(Color::Cyan)),
                Span::styled(" ▶", Style::default().fg(Color::DarkGray)),
            ]))
            .block(pane_block("Tag (t/T)", false)),
            halves[1],
        );
    }

    fn render_list(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let title = match &self.latest {
            Some(latest) => format!(
                "Contacts: {} of {}",
                self.content.rows().len(),
                latest.len()
            ),
            None => "Contacts".to_string(),
        };
        let block = pane_block(&title, self.focus == Focus::List);

        if let Some(placeholder) = self.content.placeholder() {
            let style = if self.content == ListContent::Failed {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let list = List::new([ListItem::new(Span::styled(placeholder, style))]).block(block);
            frame.render_widget(list, area);
            return;
        }

        let items: Vec<ListItem<'static>> = self.content.rows().iter().map(row_item).collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▌");
        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_forms(&self, frame: &mut Frame<'_>, area: Rect) {
        match &self.mode {
            FormMode::Adding => {
                self.add_form
                    .render(frame, area, "Add contact", self.focus == Focus::AddForm);
            }
            FormMode::Editing { id } => self.edit_form.render(
                frame,
                area,
                &format!("Edit contact {id}"),
                self.focus == Focus::EditForm,
            ),
        }
    }

    fn build_status_bar(&self) -> Line<'static> {
        if let Some((msg, at)) = &self.status_msg {
            if at.elapsed() < STATUS_TTL {
                return Line::from(Span::styled(msg.clone(), Style::default().fg(Color::Cyan)));
            }
        }

        let hints: &[(&str, &str)] = match self.focus {
            Focus::List => &[
                ("j/k", "move"),
                ("e", "edit"),
                ("d", "delete"),
                ("a", "add"),
                ("/", "name"),
                ("t", "tag"),
                ("r", "refresh"),
                ("q", "quit"),
            ],
            Focus::NameFilter => &[("type", "filter"), ("ESC", "done")],
            Focus::AddForm => &[
                ("TAB", "next field"),
                ("SPACE", "toggle tag"),
                ("CTRL+S", "add"),
                ("ESC", "back"),
            ],
            Focus::EditForm => &[
                ("TAB", "next field"),
                ("SPACE", "toggle tag"),
                ("CTRL+S", "save"),
                ("ESC", "cancel"),
            ],
        };

        let key_style = Style::default().fg(Color::Cyan);
        let dim_style = Style::default().fg(Color::DarkGray);
        let mut spans = Vec::with_capacity(hints.len() * 2);
        for (key, label) in hints {
            spans.push(Span::styled((*key).to_string(), key_style));
            spans.push(Span::styled(format!(" {label}  "), dim_style));
        }
        Line::from(spans)
    }
}

fn pane_block(title: &str, focused: bool) -> Block<'static> {
    let border_color = if focused { Color::Green } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {title} "))
        .title_style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
}

fn row_item(row: &ContactRow) -> ListItem<'static> {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            row.name.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" ({})", row.phone), Style::default().fg(Color::Gray)),
    ])];

    for detail in &row.details {
        match detail {
            Detail::Address(address) => lines.push(Line::from(Span::styled(
                format!("  {address}"),
                Style::default().fg(Color::DarkGray),
            ))),
            Detail::Email(email) => lines.push(Line::from(Span::styled(
                format!("  {email}"),
                Style::default().fg(Color::Blue),
            ))),
            Detail::Tags(chips) => {
                let mut spans = vec![Span::raw("  ")];
                for chip in chips {
                    spans.push(Span::styled(
                        format!("[{chip}]"),
                        Style::default().fg(Color::Black).bg(Color::Cyan),
                    ));
                    spans.push(Span::raw(" "));
                }
                lines.push(Line::from(spans));
            }
        }
    }
    ListItem::new(lines)
}

fn render_modal(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    message: &str,
    footer: &str,
    color: Color,
) {
    let width = area.width.saturating_sub(4).min(60);
    let height = area.height.saturating_sub(2).min(7);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let modal_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, modal_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(color))
        .title(title.to_string());
    let text = vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            footer.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        modal_area,
    );
}
