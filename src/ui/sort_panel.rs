use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::models::{SortDirection, SortField};
use crate::sorting::{CriteriaAction, SortCriteria};
use crate::ui::centered_rect;

/// Cursor position within the open sort panel
#[derive(Debug, Default)]
pub struct SortPanelState {
    list_state: ListState,
}

pub enum PanelAction {
    Edit(CriteriaAction),
    Close,
}

impl SortPanelState {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self { list_state }
    }

    pub fn selected(&self) -> usize {
        self.list_state.selected().unwrap_or(0)
    }

    fn select(&mut self, index: usize) {
        self.list_state.select(Some(index));
    }

    /// Keeps the cursor on an existing row after the list changed length.
    pub fn clamp(&mut self, len: usize) {
        if self.selected() >= len {
            self.select(len.saturating_sub(1));
        }
    }

    pub fn next(&mut self, len: usize) {
        if len > 0 {
            self.select((self.selected() + 1) % len);
        }
    }

    pub fn previous(&mut self, len: usize) {
        if len > 0 {
            self.select((self.selected() + len - 1) % len);
        }
    }
}

/// Next field after the one at `index`, in canonical order, that no other
/// criterion uses.
fn next_free_field(criteria: &SortCriteria, index: usize) -> Option<SortField> {
    let current = criteria.get(index)?.field;
    let start = SortField::ALL.iter().position(|f| *f == current)?;
    (1..SortField::ALL.len())
        .map(|offset| SortField::ALL[(start + offset) % SortField::ALL.len()])
        .find(|field| !criteria.contains_field(*field))
}

pub fn render_sort_panel<B: Backend>(
    frame: &mut Frame<B>,
    criteria: &SortCriteria,
    panel: &mut SortPanelState,
) {
    let area = centered_rect(60, 60, frame.size());
    frame.render_widget(Clear, area);

    let block = Block::default().title("Sort By").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(criteria.len() as u16 + 2),
            Constraint::Min(1),
            Constraint::Length(3),
        ].as_ref())
        .split(inner);

    let only_one = criteria.len() == 1;
    let items: Vec<ListItem> = criteria
        .as_slice()
        .iter()
        .enumerate()
        .map(|(i, criterion)| {
            let active = Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD);
            let inactive = Style::default().fg(Color::DarkGray);
            let (asc_label, desc_label) = if criterion.field.is_timestamp() {
                ("Oldest to Newest", "Newest to Oldest")
            } else {
                ("A-Z", "Z-A")
            };
            let (asc_style, desc_style) = match criterion.direction {
                SortDirection::Ascending => (active, inactive),
                SortDirection::Descending => (inactive, active),
            };
            let remove = if only_one { "" } else { "  ×" };
            ListItem::new(Spans::from(vec![
                Span::raw(format!("{}. ", i + 1)),
                Span::styled(
                    format!("{:<12}", criterion.field.label()),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" [{asc_label}]"), asc_style),
                Span::styled(format!(" [{desc_label}]"), desc_style),
                Span::styled(remove, Style::default().fg(Color::Red)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::BOTTOM))
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));
    frame.render_stateful_widget(list, chunks[0], &mut panel.list_state);

    let unused: Vec<Spans> = criteria
        .available_fields()
        .into_iter()
        .map(|field| {
            Spans::from(Span::styled(
                format!("   {}", field.label()),
                Style::default().fg(Color::DarkGray),
            ))
        })
        .collect();
    frame.render_widget(Paragraph::new(unused), chunks[1]);

    let help = Paragraph::new(vec![
        Spans::from("<↑/↓> Select | <K/J> Move | <A> Asc | <D> Desc | <F> Field"),
        Spans::from("<+> Add | <X> Remove | <C> Clear all | <Enter/Esc> Apply"),
    ])
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help, chunks[2]);
}

pub fn handle_key(
    panel: &mut SortPanelState,
    criteria: &SortCriteria,
    key: KeyEvent,
) -> Option<PanelAction> {
    let len = criteria.len();
    let selected = panel.selected();
    let moving = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
        KeyCode::Esc | KeyCode::Enter => return Some(PanelAction::Close),
        KeyCode::Down if !moving => panel.next(len),
        KeyCode::Up if !moving => panel.previous(len),
        KeyCode::Char('K') | KeyCode::Up => {
            if selected > 0 {
                panel.select(selected - 1);
                return Some(PanelAction::Edit(CriteriaAction::Reorder {
                    from: selected,
                    to: selected - 1,
                }));
            }
        }
        KeyCode::Char('J') | KeyCode::Down => {
            if selected + 1 < len {
                panel.select(selected + 1);
                return Some(PanelAction::Edit(CriteriaAction::Reorder {
                    from: selected,
                    to: selected + 1,
                }));
            }
        }
        KeyCode::Char('a') => {
            return Some(PanelAction::Edit(CriteriaAction::ToggleDirection(
                selected,
                SortDirection::Ascending,
            )));
        }
        KeyCode::Char('d') => {
            return Some(PanelAction::Edit(CriteriaAction::ToggleDirection(
                selected,
                SortDirection::Descending,
            )));
        }
        KeyCode::Char('f') => {
            if let Some(field) = next_free_field(criteria, selected) {
                return Some(PanelAction::Edit(CriteriaAction::SetField(selected, field)));
            }
        }
        KeyCode::Char('+') | KeyCode::Char('n') => {
            return Some(PanelAction::Edit(CriteriaAction::Add));
        }
        KeyCode::Char('x') | KeyCode::Delete => {
            return Some(PanelAction::Edit(CriteriaAction::Remove(selected)));
        }
        KeyCode::Char('c') => return Some(PanelAction::Edit(CriteriaAction::ClearAll)),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortCriterion;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn three() -> SortCriteria {
        SortCriteria::new(vec![
            SortCriterion::ascending(SortField::Name),
            SortCriterion::ascending(SortField::ClientId),
            SortCriterion::ascending(SortField::Status),
        ])
        .unwrap()
    }

    #[test]
    fn move_down_reorders_and_follows_selection() {
        let mut panel = SortPanelState::new();
        let action = handle_key(&mut panel, &three(), key(KeyCode::Char('J')));
        assert!(matches!(
            action,
            Some(PanelAction::Edit(CriteriaAction::Reorder { from: 0, to: 1 }))
        ));
        assert_eq!(panel.selected(), 1);
    }

    #[test]
    fn move_up_at_top_does_nothing() {
        let mut panel = SortPanelState::new();
        assert!(handle_key(&mut panel, &three(), key(KeyCode::Char('K'))).is_none());
        assert_eq!(panel.selected(), 0);
    }

    #[test]
    fn arrows_wrap_selection() {
        let mut panel = SortPanelState::new();
        handle_key(&mut panel, &three(), key(KeyCode::Up));
        assert_eq!(panel.selected(), 2);
        handle_key(&mut panel, &three(), key(KeyCode::Down));
        assert_eq!(panel.selected(), 0);
    }

    #[test]
    fn field_cycles_to_next_unused_field() {
        let criteria = three();
        assert_eq!(next_free_field(&criteria, 0), Some(SortField::Type));
        // Name is taken, so ClientId skips past it
        assert_eq!(next_free_field(&criteria, 1), Some(SortField::Type));
        assert_eq!(next_free_field(&criteria, 2), Some(SortField::CreatedAt));
    }

    #[test]
    fn clamp_keeps_cursor_in_range() {
        let mut panel = SortPanelState::new();
        panel.select(2);
        panel.clamp(1);
        assert_eq!(panel.selected(), 0);
    }
}
