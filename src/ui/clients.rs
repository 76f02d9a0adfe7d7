use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame,
};

use crate::models::{Client, Tab};
use crate::state::{ClientsView, ViewAction};
use crate::ui::sort_panel::{self, PanelAction, SortPanelState, render_sort_panel};

const INPUT_POLL: Duration = Duration::from_millis(100);

// Represents the state of the client table screen
pub struct ClientsState {
    view: ClientsView,
    table_state: TableState,
    sort_panel: Option<SortPanelState>,
}

pub enum ClientAction {
    Quit,
    Refresh,
}

impl ClientsState {
    pub fn new(view: ClientsView) -> Self {
        Self {
            view,
            table_state: TableState::default(),
            sort_panel: None,
        }
    }

    pub fn view(&self) -> &ClientsView {
        &self.view
    }

    pub fn is_sort_panel_open(&self) -> bool {
        self.sort_panel.is_some()
    }

    /// Forwards an action to the view and keeps the cursors in range.
    pub fn dispatch(&mut self, action: ViewAction) {
        if !self.view.dispatch(action) {
            return;
        }
        let rows = self.view.visible().len();
        match self.table_state.selected() {
            _ if rows == 0 => self.table_state.select(None),
            Some(i) if i >= rows => self.table_state.select(Some(rows - 1)),
            None => self.table_state.select(Some(0)),
            Some(_) => {}
        }
        if let Some(panel) = self.sort_panel.as_mut() {
            panel.clamp(self.view.criteria().len());
        }
    }

    pub fn next(&mut self) {
        let rows = self.view.visible().len();
        if rows == 0 {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) if i + 1 < rows => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let rows = self.view.visible().len();
        if rows == 0 {
            return;
        }

        let i = match self.table_state.selected() {
            Some(0) | None => rows - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }
}

fn format_date(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

fn status_badge(status: bool) -> Span<'static> {
    if status {
        Span::styled("● Active", Style::default().fg(Color::Green))
    } else {
        Span::styled("● Inactive", Style::default().fg(Color::DarkGray))
    }
}

fn client_row(client: &Client) -> Row<'static> {
    Row::new(vec![
        Cell::from(Span::styled(
            client.client_id.to_string(),
            Style::default().fg(Color::Blue),
        )),
        Cell::from(Span::styled(
            client.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Cell::from(client.client_type.as_str()),
        Cell::from(client.email.clone()),
        Cell::from(status_badge(client.status)),
        Cell::from(format_date(&client.created_at)),
        Cell::from(format_date(&client.updated_at)),
    ])
}

/// `Client Name ↑ A-Z | Created At ↓ Oldest`
fn sort_summary(view: &ClientsView) -> Spans<'static> {
    let mut spans = Vec::new();
    for (i, criterion) in view.criteria().as_slice().iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::raw(format!("{} ", criterion.field.label())));
        spans.push(Span::styled(
            criterion.direction.label_for(criterion.field),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    }
    spans.push(Span::styled(
        format!("  ({} sort)", view.criteria().len()),
        Style::default().fg(Color::Red),
    ));
    Spans::from(spans)
}

pub fn render_clients<B: Backend>(frame: &mut Frame<B>, state: &mut ClientsState) {
    let size = frame.size();
    let banner = state.view.last_error().is_some();

    // Create the layout
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(if banner { 3 } else { 0 }),
            Constraint::Min(1),
            Constraint::Length(3),
        ].as_ref())
        .split(size);

    let titles = Tab::ALL
        .iter()
        .map(|tab| Spans::from(tab.label()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(state.view.tab().index())
        .block(Block::default().title("Clients").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );
    frame.render_widget(tabs, chunks[0]);

    let summary = Paragraph::new(sort_summary(&state.view))
        .block(Block::default().title("Sorted by").borders(Borders::ALL));
    frame.render_widget(summary, chunks[1]);

    if let Some(message) = state.view.last_error() {
        let error = Paragraph::new(format!("Could not load clients: {message}"))
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(error, chunks[2]);
    }

    render_table(frame, state, chunks[3]);

    let buttons = Paragraph::new(
        "<←/→> Tab | <↑/↓> Move | <S> Sort | <R> Refresh | <Q> Quit",
    )
    .block(Block::default().borders(Borders::TOP))
    .style(Style::default().fg(Color::White));
    frame.render_widget(buttons, chunks[4]);

    if let Some(panel) = state.sort_panel.as_mut() {
        render_sort_panel(frame, state.view.criteria(), panel);
    }
}

fn render_table<B: Backend>(frame: &mut Frame<B>, state: &mut ClientsState, area: Rect) {
    let placeholder = if state.view.is_loading() {
        Some("Loading...")
    } else if state.view.visible().is_empty() {
        Some("No clients found.")
    } else {
        None
    };
    if let Some(text) = placeholder {
        let paragraph = Paragraph::new(text)
            .alignment(tui::layout::Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        "Client ID",
        "Client Name",
        "Client Type",
        "Email",
        "Status",
        "Created At",
        "Updated At",
    ])
    .style(Style::default().add_modifier(Modifier::BOLD))
    .bottom_margin(1);

    let rows: Vec<Row> = state.view.visible().into_iter().map(client_row).collect();
    let widths = [
        Constraint::Length(10),
        Constraint::Percentage(20),
        Constraint::Length(12),
        Constraint::Percentage(25),
        Constraint::Length(11),
        Constraint::Length(11),
        Constraint::Length(11),
    ];
    let table = Table::new(rows)
        .header(header)
        .block(Block::default().borders(Borders::ALL))
        .widths(&widths)
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));

    frame.render_stateful_widget(table, area, &mut state.table_state);
}

/// Applies one key press. Pure with respect to the terminal, so it can be
/// driven directly in tests.
pub fn handle_key(state: &mut ClientsState, key: KeyEvent) -> Option<ClientAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if let Some(panel) = state.sort_panel.as_mut() {
        match sort_panel::handle_key(panel, state.view.criteria(), key) {
            Some(PanelAction::Close) => state.sort_panel = None,
            Some(PanelAction::Edit(edit)) => state.dispatch(ViewAction::Criteria(edit)),
            None => {}
        }
        return None;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(ClientAction::Quit),
        KeyCode::Char('r') => return Some(ClientAction::Refresh),
        KeyCode::Char('s') => state.sort_panel = Some(SortPanelState::new()),
        KeyCode::Right | KeyCode::Tab => {
            let tab = state.view.tab().next();
            state.dispatch(ViewAction::SelectTab(tab));
        }
        KeyCode::Left | KeyCode::BackTab => {
            let tab = state.view.tab().previous();
            state.dispatch(ViewAction::SelectTab(tab));
        }
        KeyCode::Char(c @ '1'..='3') => {
            let tab = Tab::ALL[c as usize - '1' as usize];
            state.dispatch(ViewAction::SelectTab(tab));
        }
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        _ => {}
    }
    None
}

pub fn handle_input(state: &mut ClientsState) -> Result<Option<ClientAction>> {
    if !event::poll(INPUT_POLL)? {
        return Ok(None);
    }
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key));
    }
    Ok(None)
}
