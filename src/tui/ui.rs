use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Wrap},
};

use super::app::{App, CompareView, Focus, Screen, SortOrder, TableColumn};
use super::theme;
use crate::model::fields::{FieldKey, FieldValues};

/// Create a styled block with rounded corners
fn styled_block(title: &str, is_focused: bool) -> Block<'_> {
    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_type(theme::BORDER_TYPE)
        .border_style(if is_focused {
            Style::default().fg(theme::FOCUSED)
        } else {
            Style::default()
        })
}

pub fn draw(frame: &mut Frame, app: &App) {
    // Top-level layout: main area + status bar
    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let main_area = outer_chunks[0];
    let status_area = outer_chunks[1];

    match &app.screen {
        Screen::Table => draw_table(frame, app, main_area),
        Screen::Single(pattern) => draw_single(frame, pattern, main_area),
        Screen::Compare(view) => draw_compare(frame, view, main_area),
    }

    draw_status_bar(frame, app, status_area);

    // Popups (rendered last, on top)
    if let Screen::Compare(view) = &app.screen
        && let Some(unreviewed) = view.confirm_register
    {
        draw_confirm_popup(frame, unreviewed, view.session.len());
    }

    draw_toasts(frame, app);

    if app.show_help {
        draw_help_popup(frame);
    }
}

// ---------------------------------------------------------------------------
// Candidate table
// ---------------------------------------------------------------------------

const fn column_width(column: TableColumn) -> u16 {
    match column {
        TableColumn::Customer | TableColumn::MajorCopyright | TableColumn::PatternScore => 5,
        TableColumn::Os | TableColumn::AiClassType => 9,
        TableColumn::InspectionDate | TableColumn::Accuracy | TableColumn::FileName => 10,
        TableColumn::ControlPanelName => 30,
        TableColumn::CopyrightName | TableColumn::AiCopyrightName => 20,
        TableColumn::AiProductName => 24,
        TableColumn::PatternReview => 12,
        TableColumn::Reason => 32,
    }
}

fn draw_table(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    // Summary line above the grid.
    let summary = Line::from(vec![
        Span::styled(
            format!(" {} records", app.records.len()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("  {} selected", app.selected.len()),
            Style::default().fg(theme::COMPARING),
        ),
    ]);
    frame.render_widget(Paragraph::new(summary), chunks[0]);

    // Header: the highlighted column carries the sort indicator.
    let mut header_cells = vec![Cell::from(" ")];
    for (i, column) in TableColumn::ALL.iter().enumerate() {
        let indicator = match app.sort {
            Some((col, SortOrder::Asc)) if col == i => " ▲",
            Some((col, SortOrder::Desc)) if col == i => " ▼",
            _ => "",
        };
        let style = if i == app.column_cursor {
            Style::default()
                .fg(theme::FOCUSED)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        header_cells.push(Cell::from(format!("{}{indicator}", column.label())).style(style));
    }
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .row_order
        .iter()
        .enumerate()
        .map(|(pos, &idx)| {
            let p = &app.records[idx];
            let checked = app.is_selected(p.id);
            let mark = if checked { "[x]" } else { "[ ]" };

            let mut cells = vec![Cell::from(mark)];
            for column in TableColumn::ALL {
                cells.push(Cell::from(column.value(p).to_string()));
            }

            let style = if pos == app.cursor {
                Style::default()
                    .bg(theme::SELECTED_BG)
                    .add_modifier(Modifier::BOLD)
            } else if checked {
                Style::default().fg(theme::COMPARING)
            } else {
                Style::default()
            };
            Row::new(cells).style(style)
        })
        .collect();

    let mut widths = vec![Constraint::Length(3)];
    widths.extend(TableColumn::ALL.iter().map(|&c| Constraint::Length(column_width(c))));

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(styled_block("Patterns", true));
    frame.render_widget(table, chunks[1]);
}

// ---------------------------------------------------------------------------
// Single-record detail sheet
// ---------------------------------------------------------------------------

fn draw_single(frame: &mut Frame, pattern: &crate::model::pattern::Pattern, area: Rect) {
    let values = FieldValues::project(pattern);
    let mut lines = vec![Line::from("")];
    for key in FieldKey::ALL {
        let value = values.get(key);
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<22}", key.label()),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(value.to_string()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![Span::styled(
        "  Esc: back to the table",
        Style::default().fg(Color::DarkGray),
    )]));

    let title = format!("Record detail — {}", pattern.control_panel_name);
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(styled_block(&title, true));
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Compare screen
// ---------------------------------------------------------------------------

fn draw_compare(frame: &mut Frame, view: &CompareView, area: Rect) {
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(32), Constraint::Percentage(68)])
        .split(area);

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(main_chunks[0]);

    let right_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main_chunks[1]);

    draw_master_card(frame, view, left_chunks[0]);
    draw_candidate_list(frame, view, left_chunks[1]);
    draw_master_panel(frame, view, right_chunks[0]);
    draw_target_panel(frame, view, right_chunks[1]);
}

fn draw_master_card(frame: &mut Frame, view: &CompareView, area: Rect) {
    let master = view.session.master();
    let edited = view.session.edited_fields().len();

    let mut lines = vec![
        Line::from(Span::styled(
            master.control_panel_name.clone(),
            Style::default()
                .fg(theme::MASTER)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            master.ai_copyright_name.clone(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    if edited > 0 {
        lines.push(Line::from(Span::styled(
            format!("{edited} field(s) edited"),
            Style::default().fg(theme::EDITED),
        )));
    }

    let block = Block::default()
        .title("Master")
        .borders(Borders::ALL)
        .border_type(theme::BORDER_TYPE)
        .border_style(Style::default().fg(theme::MASTER));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_candidate_list(frame: &mut Frame, view: &CompareView, area: Rect) {
    let is_focused = view.focus == Focus::Sidebar;
    let ids = view.sidebar_ids();

    let items: Vec<ListItem> = ids
        .iter()
        .enumerate()
        .map(|(i, &id)| {
            let p = view
                .session
                .records()
                .iter()
                .find(|r| r.id == id)
                .expect("sidebar ids come from the working set");
            let comparing = view.session.compare_id() == Some(id);
            let reviewed = view.session.is_reviewed(id);
            let selected = is_focused && i == view.sidebar_cursor;

            let mut title_spans = vec![Span::styled(
                truncate(&p.control_panel_name, 26),
                Style::default().add_modifier(Modifier::BOLD),
            )];
            if comparing {
                title_spans.push(Span::styled(
                    " [comparing]",
                    Style::default().fg(theme::COMPARING),
                ));
            } else if reviewed {
                title_spans.push(Span::styled(
                    " [reviewed]",
                    Style::default().fg(theme::REVIEWED),
                ));
            }

            let mut lines = vec![
                Line::from(title_spans),
                Line::from(Span::styled(
                    format!("  {}", truncate(&p.ai_copyright_name, 28)),
                    Style::default().fg(Color::DarkGray),
                )),
            ];

            let mismatch = view.session.mismatches_with(id).unwrap_or_default();
            if mismatch.is_empty() {
                lines.push(Line::from(Span::styled(
                    "  matches master",
                    Style::default().fg(Color::DarkGray),
                )));
            } else {
                let labels: Vec<&str> = mismatch.iter().map(|k| k.label()).collect();
                lines.push(Line::from(Span::styled(
                    format!("  ≠ {}", labels.join(", ")),
                    Style::default().fg(theme::MISMATCH),
                )));
            }

            let style = if selected {
                Style::default().bg(theme::SELECTED_BG)
            } else {
                Style::default()
            };
            ListItem::new(lines).style(style)
        })
        .collect();

    let title = format!("Candidates ({})", ids.len());
    let block = styled_block(&title, is_focused);
    if items.is_empty() {
        let text = Paragraph::new("(no candidates left)")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(text, area);
    } else {
        frame.render_widget(List::new(items).block(block), area);
    }
}

fn draw_master_panel(frame: &mut Frame, view: &CompareView, area: Rect) {
    let is_focused = view.focus == Focus::Master;
    let session = &view.session;
    let mismatches = session.mismatches();
    let edited = session.edited_fields();
    let value_width = (area.width.saturating_sub(26)) as usize;

    let lines: Vec<Line> = FieldKey::ALL
        .iter()
        .enumerate()
        .map(|(i, &key)| {
            let at_cursor = is_focused && i == view.field_cursor;

            // An active editor replaces the stored value on its row.
            let (text, editing) = match view.editing.as_ref() {
                Some(editor) if editor.key == key => match &editor.choices {
                    Some((choices, index)) => (format!("◂ {} ▸", choices[*index]), true),
                    None => (format!("{}_", editor.buffer), true),
                },
                _ => (session.master_fields().get(key).to_owned(), false),
            };

            let mut value_style = if editing {
                Style::default()
                    .fg(theme::EDITED)
                    .add_modifier(Modifier::BOLD)
            } else if edited.contains(&key) {
                Style::default().fg(theme::EDITED)
            } else if mismatches.contains(&key) {
                Style::default().fg(theme::MISMATCH)
            } else {
                Style::default()
            };
            if at_cursor {
                value_style = value_style.bg(theme::SELECTED_BG);
            }

            let marker = if edited.contains(&key) && !editing {
                " ⟲"
            } else {
                ""
            };

            Line::from(vec![
                Span::styled(
                    format!(" {:<22}", key.label()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{}{marker}", truncate(&text, value_width)),
                    value_style,
                ),
            ])
        })
        .collect();

    let title = format!("Master — {}", truncate(&session.master().control_panel_name, 24));
    frame.render_widget(
        Paragraph::new(lines).block(styled_block(&title, is_focused)),
        area,
    );
}

fn draw_target_panel(frame: &mut Frame, view: &CompareView, area: Rect) {
    let is_focused = view.focus == Focus::Target;
    let session = &view.session;

    let Some(target) = session.compare_record() else {
        let text = Paragraph::new("No comparison target.\nPick a candidate from the list.")
            .style(Style::default().fg(Color::DarkGray))
            .block(styled_block("Comparison", is_focused));
        frame.render_widget(text, area);
        return;
    };

    let values = FieldValues::project(target);
    let mismatches = session.mismatches();
    let value_width = (area.width.saturating_sub(26)) as usize;

    let lines: Vec<Line> = FieldKey::ALL
        .iter()
        .enumerate()
        .map(|(i, &key)| {
            let at_cursor = is_focused && i == view.field_cursor;
            let mut value_style = if mismatches.contains(&key) {
                Style::default().fg(theme::MISMATCH)
            } else {
                Style::default()
            };
            if at_cursor {
                value_style = value_style.bg(theme::SELECTED_BG);
            }
            Line::from(vec![
                Span::styled(
                    format!(" {:<22}", key.label()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    truncate(values.get(key), value_width),
                    value_style,
                ),
            ])
        })
        .collect();

    let title = format!(
        "Comparison — {}",
        truncate(&target.control_panel_name, 22)
    );
    frame.render_widget(
        Paragraph::new(lines).block(styled_block(&title, is_focused)),
        area,
    );
}

// ---------------------------------------------------------------------------
// Status bar, popups, toasts
// ---------------------------------------------------------------------------

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let blue = Color::Blue;

    let hints: Vec<(&str, &str)> = match &app.screen {
        Screen::Table => vec![
            ("Select", "Space"),
            ("All", "a"),
            ("Column", "←/→"),
            ("Sort", "s"),
            ("Review", "Enter"),
            ("Save", "Ctrl+S"),
            ("Help", "?"),
            ("Quit", "q"),
        ],
        Screen::Single(_) => vec![("Back", "Esc"), ("Help", "?")],
        Screen::Compare(view) => {
            if view.editing.as_ref().is_some_and(|e| e.choices.is_some()) {
                vec![("Choose", "←/→"), ("Apply", "Enter"), ("Cancel", "Esc")]
            } else if view.editing.is_some() {
                vec![("Apply", "Enter"), ("Cancel", "Esc")]
            } else {
                match view.focus {
                    Focus::Sidebar => vec![
                        ("Compare", "Enter"),
                        ("Make master", "m"),
                        ("Exclude", "x"),
                        ("Pane", "Tab"),
                        ("Register", "w"),
                        ("Close", "Esc"),
                    ],
                    Focus::Master => vec![
                        ("Edit", "e"),
                        ("Rollback", "u"),
                        ("Field", "j/k"),
                        ("Pane", "Tab"),
                        ("Register", "w"),
                        ("Close", "Esc"),
                    ],
                    Focus::Target => vec![
                        ("Apply to master", "a"),
                        ("Field", "j/k"),
                        ("Pane", "Tab"),
                        ("Register", "w"),
                        ("Close", "Esc"),
                    ],
                }
            }
        }
    };

    // Format: "Action: key | Action: key | ..."
    let mut spans = Vec::new();
    for (i, (action, key)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(blue)));
        }
        spans.push(Span::styled(
            format!("{action}: "),
            Style::default().fg(blue),
        ));
        spans.push(Span::styled(*key, Style::default().fg(blue)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

fn draw_confirm_popup(frame: &mut Frame, unreviewed: usize, total: usize) {
    let popup_area = centered_rect(52, 9, frame.area());
    frame.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(""),
        Line::from(format!(
            "  {unreviewed} of {total} records have not been reviewed."
        )),
        Line::from("  Register anyway?"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  y: register  n: keep reviewing",
            Style::default().fg(Color::DarkGray),
        )]),
    ];

    let block = Block::default()
        .title("Confirm registration")
        .borders(Borders::ALL)
        .border_type(theme::BORDER_TYPE)
        .border_style(Style::default().fg(Color::Yellow));
    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}

#[allow(clippy::cast_possible_truncation)]
fn draw_toasts(frame: &mut Frame, app: &App) {
    let area = frame.area();

    for (i, toast) in app.toasts.iter().rev().take(3).enumerate() {
        let width = ((toast.message.chars().count() + 4) as u16).clamp(24, 60);
        let height = 3;
        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height * (i as u16 + 1) + 1);
        let toast_area = Rect::new(x, y, width.min(area.width), height.min(area.height));

        frame.render_widget(Clear, toast_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme::BORDER_TYPE)
            .border_style(Style::default().fg(Color::Blue));
        frame.render_widget(
            Paragraph::new(truncate(&toast.message, width.saturating_sub(3) as usize))
                .block(block),
            toast_area,
        );
    }
}

fn draw_help_popup(frame: &mut Frame) {
    let area = frame.area();
    let popup_width = 56.min(area.width.saturating_sub(4));
    let popup_height = 22.min(area.height.saturating_sub(4));
    let popup_area = centered_rect(popup_width, popup_height, area);

    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled(
            "Table",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("  j/k, Up/Down   Move row cursor"),
        Line::from("  h/l, Left/Right  Move column cursor"),
        Line::from("  Space          Check/uncheck row"),
        Line::from("  a              Check/uncheck all rows"),
        Line::from("  s              Sort by highlighted column"),
        Line::from("  Enter          Open review for checked rows"),
        Line::from("  Ctrl+S         Save (demo no-op)"),
        Line::from(""),
        Line::from(Span::styled(
            "Compare",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("  Tab            Cycle panes"),
        Line::from("  Enter          Compare candidate / edit field"),
        Line::from("  m              Make candidate the master"),
        Line::from("  x              Exclude candidate"),
        Line::from("  u              Roll back edited field"),
        Line::from("  a              Apply target value to master"),
        Line::from("  w              Register working set"),
        Line::from(""),
        Line::from(Span::styled(
            "General",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("  ?              This help"),
        Line::from("  q / Ctrl+C     Quit"),
    ];

    let block = Block::default()
        .title("Keybindings")
        .borders(Borders::ALL)
        .border_type(theme::BORDER_TYPE)
        .border_style(Style::default().fg(theme::FOCUSED));
    frame.render_widget(Paragraph::new(help_text).block(block), popup_area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
