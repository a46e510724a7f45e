//! Filterable, multi-select software table.

use std::collections::BTreeSet;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::app::catalog::Catalog;
use crate::domain::model::{EntryOrigin, SoftwareEntry};

/// Cursor, filter, and selection state over a [`Catalog`].
///
/// Selections are stored as catalog indices, so they survive filter changes.
#[derive(Debug, Default, Clone)]
pub struct SoftwareListState {
    catalog: Catalog,
    visible: Vec<usize>,
    cursor: usize,
    selected: BTreeSet<usize>,
    filter: String,
    filter_active: bool,
}

impl SoftwareListState {
    pub fn new(catalog: Catalog) -> Self {
        let mut state = Self {
            catalog,
            ..Self::default()
        };
        state.refresh_visible();
        state
    }

    /// Entry under the cursor.
    pub fn current_entry(&self) -> Option<&SoftwareEntry> {
        self.visible
            .get(self.cursor)
            .and_then(|index| self.catalog.get(*index))
    }

    pub fn select_next(&mut self) {
        if self.cursor + 1 < self.visible.len() {
            self.cursor += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Toggle the entry under the cursor. Returns the new selection state.
    pub fn toggle_current(&mut self) -> Option<bool> {
        let index = *self.visible.get(self.cursor)?;
        if self.selected.remove(&index) {
            Some(false)
        } else {
            self.selected.insert(index);
            Some(true)
        }
    }

    /// Select every visible entry, or clear them all when they are already selected.
    pub fn toggle_all_visible(&mut self) {
        let all_selected = self
            .visible
            .iter()
            .all(|index| self.selected.contains(index));
        if all_selected {
            for index in &self.visible {
                self.selected.remove(index);
            }
        } else {
            self.selected.extend(self.visible.iter().copied());
        }
    }

    /// Selected entries in catalog order.
    pub fn selected_entries(&self) -> Vec<SoftwareEntry> {
        self.selected
            .iter()
            .filter_map(|index| self.catalog.get(*index))
            .cloned()
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn begin_filter(&mut self) {
        self.filter_active = true;
    }

    pub fn end_filter(&mut self) {
        self.filter_active = false;
    }

    pub fn is_filter_active(&self) -> bool {
        self.filter_active
    }

    pub fn push_filter_char(&mut self, ch: char) {
        self.filter.push(ch);
        self.refresh_visible();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter.pop();
        self.refresh_visible();
    }

    pub fn clear_filter(&mut self) {
        if !self.filter.is_empty() {
            self.filter.clear();
            self.refresh_visible();
        }
    }

    pub fn set_filter<S: Into<String>>(&mut self, keyword: S) {
        self.filter = keyword.into();
        self.refresh_visible();
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Entries currently shown, in catalog order.
    pub fn visible_entries(&self) -> impl Iterator<Item = &SoftwareEntry> {
        self.visible
            .iter()
            .filter_map(|index| self.catalog.get(*index))
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn total_len(&self) -> usize {
        self.catalog.len()
    }

    pub fn cursor(&self) -> Option<usize> {
        (!self.visible.is_empty()).then_some(self.cursor)
    }

    fn refresh_visible(&mut self) {
        self.visible = self.catalog.filter_indices(&self.filter);
        if self.cursor >= self.visible.len() {
            self.cursor = self.visible.len().saturating_sub(1);
        }
    }

    fn iter_visible(&self) -> impl Iterator<Item = (usize, &SoftwareEntry)> {
        self.visible
            .iter()
            .filter_map(|index| self.catalog.get(*index).map(|entry| (*index, entry)))
    }
}

/// Renders the software table with its filter line.
#[derive(Debug, Default)]
pub struct SoftwareList;

impl SoftwareList {
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, state: &SoftwareListState) {
        let title = format!(
            "Software · {}/{} shown · {} selected",
            state.visible_len(),
            state.total_len(),
            state.selected_count()
        );
        let block = Block::default().borders(Borders::ALL).title(title);
        frame.render_widget(block.clone(), area);

        let inner = block.inner(area);
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(inner);

        let filter_text = if state.filter().is_empty() && !state.is_filter_active() {
            "⌕ search (press /)".to_string()
        } else {
            format!("⌕ {}", state.filter())
        };
        let mut filter_style = Style::default().fg(Color::Gray);
        if state.is_filter_active() {
            filter_style = filter_style.add_modifier(Modifier::BOLD).fg(Color::Cyan);
        }
        frame.render_widget(Paragraph::new(filter_text).style(filter_style), layout[0]);

        if state.visible_len() == 0 {
            let message = if state.total_len() == 0 {
                "No software found"
            } else {
                "No software matches the search"
            };
            let placeholder = Paragraph::new(message).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            );
            frame.render_widget(placeholder, layout[1]);
            return;
        }

        let rows: Vec<Row> = state
            .iter_visible()
            .enumerate()
            .map(|(display_idx, (index, entry))| {
                let marked = state.selected.contains(&index);
                let mark = if marked { "●" } else { " " };
                let name_style = if marked {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let mut row = Row::new(vec![
                    Cell::from(Span::styled(mark, Style::default().fg(Color::Cyan))),
                    Cell::from(Span::styled(entry.name.clone(), name_style)),
                    Cell::from(Span::styled(
                        entry.origin.label(),
                        Style::default().fg(origin_color(entry.origin)),
                    )),
                    Cell::from(Line::from(entry.location.display().to_string())),
                ]);
                if display_idx % 2 == 1 {
                    row = row.style(Style::default().bg(Color::Rgb(24, 24, 24)));
                }
                row
            })
            .collect();

        let widths = [
            Constraint::Length(1),
            Constraint::Length(32),
            Constraint::Length(9),
            Constraint::Min(20),
        ];
        let header = Row::new(vec!["", "Name", "Source", "Location"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");

        let mut table_state = TableState::default();
        table_state.select(state.cursor());
        frame.render_stateful_widget(table, layout[1], &mut table_state);
    }
}

fn origin_color(origin: EntryOrigin) -> Color {
    match origin {
        EntryOrigin::Shortcut => Color::Green,
        EntryOrigin::Registry => Color::Blue,
        EntryOrigin::Placeholder => Color::DarkGray,
    }
}
