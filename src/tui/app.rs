//! Application state and key routing for the workbench.
//!
//! Three screens: the candidate table, the single-record detail sheet,
//! and the compare/merge view. Every key press mutates [`App`] (or the
//! [`MergeSession`] it owns) and the whole frame is redrawn.

use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, prelude::CrosstermBackend};
use tracing::warn;

use super::event::{self, AppEvent};
use super::ui;
use crate::model::fields::FieldKey;
use crate::model::pattern::Pattern;
use crate::model::types::PatternId;
use crate::session::{MergeSession, ReviewScope, open_review};
use crate::store;

// ---------------------------------------------------------------------------
// Table columns
// ---------------------------------------------------------------------------

/// A column of the candidate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableColumn {
    Customer,
    MajorCopyright,
    PatternScore,
    Os,
    InspectionDate,
    ControlPanelName,
    CopyrightName,
    AiProductName,
    AiCopyrightName,
    AiClassType,
    Accuracy,
    PatternReview,
    Reason,
    FileName,
}

impl TableColumn {
    pub const ALL: [Self; 14] = [
        Self::Customer,
        Self::MajorCopyright,
        Self::PatternScore,
        Self::Os,
        Self::InspectionDate,
        Self::ControlPanelName,
        Self::CopyrightName,
        Self::AiProductName,
        Self::AiCopyrightName,
        Self::AiClassType,
        Self::Accuracy,
        Self::PatternReview,
        Self::Reason,
        Self::FileName,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Customer => "Cust",
            Self::MajorCopyright => "Major",
            Self::PatternScore => "Score",
            Self::Os => "OS",
            Self::InspectionDate => "Received",
            Self::ControlPanelName => "Control panel name",
            Self::CopyrightName => "Copyright holder",
            Self::AiProductName => "AI product",
            Self::AiCopyrightName => "AI copyright holder",
            Self::AiClassType => "AI class",
            Self::Accuracy => "Accuracy",
            Self::PatternReview => "Review",
            Self::Reason => "Reason",
            Self::FileName => "File",
        }
    }

    pub fn value(self, p: &Pattern) -> &str {
        match self {
            Self::Customer => &p.customer,
            Self::MajorCopyright => &p.major_copyright,
            Self::PatternScore => &p.pattern_score,
            Self::Os => &p.os,
            Self::InspectionDate => &p.inspection_date,
            Self::ControlPanelName => &p.control_panel_name,
            Self::CopyrightName => &p.copyright_name,
            Self::AiProductName => &p.ai_product_name,
            Self::AiCopyrightName => &p.ai_copyright_name,
            Self::AiClassType => &p.ai_class_type,
            Self::Accuracy => &p.accuracy,
            Self::PatternReview => &p.pattern_review,
            Self::Reason => &p.reason,
            Self::FileName => &p.file_name,
        }
    }
}

/// Sort direction for the candidate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

// ---------------------------------------------------------------------------
// Compare view
// ---------------------------------------------------------------------------

/// Which pane of the compare screen has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Master,
    Target,
}

/// An in-progress edit of one master field.
#[derive(Debug, Clone)]
pub struct FieldEditor {
    pub key: FieldKey,
    /// Free-text buffer; unused while `choices` is set.
    pub buffer: String,
    /// Picker mode for enumerated fields: the option list and the cursor.
    pub choices: Option<(Vec<String>, usize)>,
}

/// State of the compare/merge screen.
#[derive(Debug)]
pub struct CompareView {
    pub session: MergeSession,
    pub focus: Focus,
    /// Field cursor shared by the master and target panels.
    pub field_cursor: usize,
    /// Cursor within the sidebar's non-master cards.
    pub sidebar_cursor: usize,
    pub editing: Option<FieldEditor>,
    /// Pending registration confirmation, carrying the unreviewed count.
    pub confirm_register: Option<usize>,
}

impl CompareView {
    fn new(session: MergeSession) -> Self {
        Self {
            session,
            focus: Focus::Sidebar,
            field_cursor: 0,
            sidebar_cursor: 0,
            editing: None,
            confirm_register: None,
        }
    }

    /// Non-master working-set members, in working-set order.
    pub fn sidebar_ids(&self) -> Vec<PatternId> {
        let master = self.session.master_id();
        self.session
            .records()
            .iter()
            .map(|p| p.id)
            .filter(|&id| id != master)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// The active screen.
#[derive(Debug)]
pub enum Screen {
    Table,
    Single(Pattern),
    Compare(CompareView),
}

/// A transient notification.
#[derive(Debug)]
pub struct Toast {
    pub message: String,
    raised_at: Instant,
}

/// Main application state.
pub struct App {
    pub records: Vec<Pattern>,
    /// Indices into `records`, in display order (sorting permutes this,
    /// never `records` itself).
    pub row_order: Vec<usize>,
    /// Checked rows, in checking order.
    pub selected: Vec<PatternId>,
    pub cursor: usize,
    pub column_cursor: usize,
    pub sort: Option<(usize, SortOrder)>,
    pub screen: Screen,
    pub toasts: VecDeque<Toast>,
    pub show_help: bool,
    pub should_quit: bool,
    toast_ttl: Duration,

    // Enumeration options for the detail pickers, derived once per fetch.
    pub sw_type_choices: Vec<String>,
    pub scan_sw_type_choices: Vec<String>,
    pub sw_group_choices: Vec<String>,
}

enum CompareOutcome {
    Stay,
    Toast(String),
    Unselect(PatternId, String),
    Close,
    Commit,
}

impl App {
    #[must_use]
    pub fn new(records: Vec<Pattern>, toast_secs: u64) -> Self {
        let sw_type_choices = store::sw_types(&records);
        let scan_sw_type_choices = store::scan_sw_types(&records);
        let sw_group_choices = store::sw_groups(&records);
        let row_order = (0..records.len()).collect();
        Self {
            records,
            row_order,
            selected: Vec::new(),
            cursor: 0,
            column_cursor: 0,
            sort: None,
            screen: Screen::Table,
            toasts: VecDeque::new(),
            show_help: false,
            should_quit: false,
            toast_ttl: Duration::from_secs(toast_secs),
            sw_type_choices,
            scan_sw_type_choices,
            sw_group_choices,
        }
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;

            match event::next_event(Duration::from_millis(100))? {
                AppEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    self.handle_key(key.code, key.modifiers);
                }
                AppEvent::Key(_) | AppEvent::Resize | AppEvent::Tick => {}
            }

            self.prune_toasts();
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Key routing
    // ------------------------------------------------------------------

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        // Any key closes the help overlay.
        if self.show_help {
            self.show_help = false;
            return;
        }

        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Table => self.handle_table_key(code, modifiers),
            Screen::Single(_) => self.handle_single_key(code),
            Screen::Compare(_) => self.handle_compare_key(code),
        }
    }

    fn handle_table_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if code == KeyCode::Char('s') && modifiers.contains(KeyModifiers::CONTROL) {
            self.toast("Demo workspace: edits are not persisted.");
            return;
        }

        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,

            KeyCode::Char('j') | KeyCode::Down => self.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-1),
            KeyCode::Char('h') | KeyCode::Left => self.move_column(-1),
            KeyCode::Char('l') | KeyCode::Right => self.move_column(1),

            KeyCode::Char(' ') => self.toggle_row(),
            KeyCode::Char('a') => self.toggle_all(),
            KeyCode::Char('s') => self.sort_by_column(),

            KeyCode::Enter => self.open_review_screen(),
            _ => {}
        }
    }

    fn handle_single_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Char('q') => self.screen = Screen::Table,
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Table operations
    // ------------------------------------------------------------------

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn move_cursor(&mut self, direction: i32) {
        let len = self.row_order.len();
        if len == 0 {
            return;
        }
        self.cursor = (self.cursor as i32 + direction).rem_euclid(len as i32) as usize;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn move_column(&mut self, direction: i32) {
        let len = TableColumn::ALL.len();
        self.column_cursor = (self.column_cursor as i32 + direction).rem_euclid(len as i32) as usize;
    }

    fn toggle_row(&mut self) {
        let Some(&idx) = self.row_order.get(self.cursor) else {
            return;
        };
        let id = self.records[idx].id;
        if let Some(pos) = self.selected.iter().position(|&s| s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id);
        }
    }

    fn toggle_all(&mut self) {
        if self.selected.len() == self.records.len() {
            self.selected.clear();
        } else {
            self.selected = self
                .row_order
                .iter()
                .map(|&idx| self.records[idx].id)
                .collect();
        }
    }

    fn sort_by_column(&mut self) {
        let column = self.column_cursor;
        let order = match self.sort {
            Some((prev, SortOrder::Asc)) if prev == column => SortOrder::Desc,
            _ => SortOrder::Asc,
        };
        self.sort = Some((column, order));

        let key = TableColumn::ALL[column];
        self.row_order.sort_by(|&a, &b| {
            let ord = key.value(&self.records[a]).cmp(key.value(&self.records[b]));
            match order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
    }

    fn open_review_screen(&mut self) {
        match open_review(&self.records, &self.selected) {
            Ok(ReviewScope::Single(pattern)) => self.screen = Screen::Single(pattern),
            Ok(ReviewScope::Comparing(session)) => {
                self.screen = Screen::Compare(CompareView::new(session));
            }
            Err(err) => {
                warn!(error = %err, "review could not be opened");
                self.toast(err.summary());
            }
        }
    }

    // ------------------------------------------------------------------
    // Compare operations
    // ------------------------------------------------------------------

    #[allow(clippy::too_many_lines)]
    fn handle_compare_key(&mut self, code: KeyCode) {
        let outcome = {
            let Screen::Compare(view) = &mut self.screen else {
                return;
            };

            // Confirmation popup swallows all input.
            if view.confirm_register.is_some() {
                match code {
                    KeyCode::Char('y') | KeyCode::Enter => CompareOutcome::Commit,
                    KeyCode::Char('n') | KeyCode::Esc => {
                        view.confirm_register = None;
                        CompareOutcome::Stay
                    }
                    _ => CompareOutcome::Stay,
                }
            } else if view.editing.is_some() {
                Self::handle_editor_key(view, code)
            } else {
                match code {
                    KeyCode::Esc => CompareOutcome::Close,
                    KeyCode::Char('?') => {
                        self.show_help = true;
                        CompareOutcome::Stay
                    }
                    KeyCode::Tab => {
                        view.focus = match view.focus {
                            Focus::Sidebar => Focus::Master,
                            Focus::Master => Focus::Target,
                            Focus::Target => Focus::Sidebar,
                        };
                        CompareOutcome::Stay
                    }
                    KeyCode::BackTab => {
                        view.focus = match view.focus {
                            Focus::Sidebar => Focus::Target,
                            Focus::Master => Focus::Sidebar,
                            Focus::Target => Focus::Master,
                        };
                        CompareOutcome::Stay
                    }
                    KeyCode::Char('j') | KeyCode::Down => {
                        Self::move_compare_cursor(view, 1);
                        CompareOutcome::Stay
                    }
                    KeyCode::Char('k') | KeyCode::Up => {
                        Self::move_compare_cursor(view, -1);
                        CompareOutcome::Stay
                    }
                    KeyCode::Char('w') => {
                        let unreviewed = view.session.unreviewed_count();
                        if unreviewed == 0 {
                            CompareOutcome::Commit
                        } else {
                            view.confirm_register = Some(unreviewed);
                            CompareOutcome::Stay
                        }
                    }
                    KeyCode::Enter if view.focus == Focus::Sidebar => {
                        match view.sidebar_ids().get(view.sidebar_cursor) {
                            Some(&id) => match view.session.select_comparison_target(id) {
                                Ok(()) => CompareOutcome::Stay,
                                Err(err) => Self::rejected(&err),
                            },
                            None => CompareOutcome::Stay,
                        }
                    }
                    KeyCode::Char('m') if view.focus == Focus::Sidebar => {
                        match view.sidebar_ids().get(view.sidebar_cursor) {
                            Some(&id) => match view.session.swap_master(id) {
                                Ok(()) => {
                                    view.sidebar_cursor = 0;
                                    CompareOutcome::Toast("Master record replaced.".to_owned())
                                }
                                Err(err) => Self::rejected(&err),
                            },
                            None => CompareOutcome::Stay,
                        }
                    }
                    KeyCode::Char('x') if view.focus == Focus::Sidebar => {
                        match view.sidebar_ids().get(view.sidebar_cursor) {
                            Some(&id) => match view.session.exclude(id) {
                                Ok(()) => {
                                    let max = view.sidebar_ids().len().saturating_sub(1);
                                    view.sidebar_cursor = view.sidebar_cursor.min(max);
                                    CompareOutcome::Unselect(
                                        id,
                                        "Record excluded from the list.".to_owned(),
                                    )
                                }
                                Err(err) => Self::rejected(&err),
                            },
                            None => CompareOutcome::Stay,
                        }
                    }
                    KeyCode::Enter | KeyCode::Char('e') if view.focus == Focus::Master => {
                        let key = FieldKey::ALL[view.field_cursor];
                        let options = match key {
                            FieldKey::SwType => Some(self.sw_type_choices.as_slice()),
                            FieldKey::ScanSwType => Some(self.scan_sw_type_choices.as_slice()),
                            FieldKey::SwGroup => Some(self.sw_group_choices.as_slice()),
                            _ => None,
                        };
                        view.editing = Some(Self::editor_for(&view.session, key, options));
                        CompareOutcome::Stay
                    }
                    KeyCode::Char('u') if view.focus == Focus::Master => {
                        let key = FieldKey::ALL[view.field_cursor];
                        if view.session.edited_fields().contains(&key) {
                            view.session.rollback_field(key);
                            CompareOutcome::Toast(format!(
                                "{} restored to its original value.",
                                key.label()
                            ))
                        } else {
                            CompareOutcome::Stay
                        }
                    }
                    KeyCode::Char('a') if view.focus == Focus::Target => {
                        let key = FieldKey::ALL[view.field_cursor];
                        match view.session.apply_to_master(key) {
                            Ok(()) => CompareOutcome::Toast(format!(
                                "{} applied to the master.",
                                key.label()
                            )),
                            Err(err) => Self::rejected(&err),
                        }
                    }
                    _ => CompareOutcome::Stay,
                }
            }
        };

        match outcome {
            CompareOutcome::Stay => {}
            CompareOutcome::Toast(message) => self.toast(message),
            CompareOutcome::Unselect(id, message) => {
                self.selected.retain(|&s| s != id);
                self.toast(message);
            }
            CompareOutcome::Close => self.screen = Screen::Table,
            CompareOutcome::Commit => {
                if let Screen::Compare(view) = std::mem::replace(&mut self.screen, Screen::Table) {
                    let count = view.session.finalize();
                    self.toast(format!("{count} records registered."));
                }
            }
        }
    }

    /// A rejected session operation leaves state unchanged: log it and
    /// surface a toast.
    fn rejected(err: &crate::error::ReviewError) -> CompareOutcome {
        warn!(error = %err, "operation rejected");
        CompareOutcome::Toast(err.summary())
    }

    /// Build the editor for a master field: a picker for the enumerated
    /// type fields, a free-text buffer otherwise.
    fn editor_for(session: &MergeSession, key: FieldKey, options: Option<&[String]>) -> FieldEditor {
        let current = session.master_fields().get(key).to_owned();
        match options {
            Some(values) => {
                let mut choices = vec![store::UNSPECIFIED.to_owned()];
                choices.extend(values.iter().cloned());
                let index = choices.iter().position(|v| *v == current).unwrap_or(0);
                FieldEditor {
                    key,
                    buffer: String::new(),
                    choices: Some((choices, index)),
                }
            }
            None => FieldEditor {
                key,
                buffer: current,
                choices: None,
            },
        }
    }

    fn handle_editor_key(view: &mut CompareView, code: KeyCode) -> CompareOutcome {
        let Some(editor) = view.editing.as_mut() else {
            return CompareOutcome::Stay;
        };

        match code {
            KeyCode::Esc => {
                view.editing = None;
            }
            KeyCode::Enter => {
                let value = match &editor.choices {
                    Some((choices, index)) => choices[*index].clone(),
                    None => editor.buffer.clone(),
                };
                let key = editor.key;
                view.session.edit_master_field(key, value);
                view.editing = None;
            }
            KeyCode::Left | KeyCode::Up => {
                if let Some((choices, index)) = editor.choices.as_mut() {
                    *index = index.checked_sub(1).unwrap_or(choices.len() - 1);
                }
            }
            KeyCode::Right | KeyCode::Down => {
                if let Some((choices, index)) = editor.choices.as_mut() {
                    *index = (*index + 1) % choices.len();
                }
            }
            KeyCode::Backspace => {
                if editor.choices.is_none() {
                    editor.buffer.pop();
                }
            }
            KeyCode::Char(c) => {
                if editor.choices.is_none() {
                    editor.buffer.push(c);
                }
            }
            _ => {}
        }
        CompareOutcome::Stay
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn move_compare_cursor(view: &mut CompareView, direction: i32) {
        match view.focus {
            Focus::Master | Focus::Target => {
                let len = FieldKey::ALL.len() as i32;
                view.field_cursor =
                    (view.field_cursor as i32 + direction).rem_euclid(len) as usize;
            }
            Focus::Sidebar => {
                let len = view.sidebar_ids().len();
                if len == 0 {
                    return;
                }
                view.sidebar_cursor =
                    (view.sidebar_cursor as i32 + direction).rem_euclid(len as i32) as usize;
            }
        }
    }

    // ------------------------------------------------------------------
    // Toasts
    // ------------------------------------------------------------------

    pub fn toast(&mut self, message: impl Into<String>) {
        self.toasts.push_back(Toast {
            message: message.into(),
            raised_at: Instant::now(),
        });
        while self.toasts.len() > 4 {
            self.toasts.pop_front();
        }
    }

    fn prune_toasts(&mut self) {
        let ttl = self.toast_ttl;
        self.toasts.retain(|t| t.raised_at.elapsed() < ttl);
    }

    /// Whether a record's table row is checked.
    #[must_use]
    pub fn is_selected(&self, id: PatternId) -> bool {
        self.selected.contains(&id)
    }
}
