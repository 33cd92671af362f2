use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Padding, Paragraph};
use ratatui::Frame;

use crate::menu::Menu;
use crate::surface::{Surface, SurfaceError};
use crate::theme::ThemeTokens;

const PAD_X: u16 = 2;
const PAD_Y: u16 = 1;

// Below this we show a resize notice instead of the list.
const MIN_WIDTH: u16 = 20;
const MIN_HEIGHT: u16 = 5;

/// Result of one navigation round: a selected index into the menu, or quit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Item(usize),
    Cancelled,
}

/// Cursor position over a menu of known length. Mutated only by key events;
/// `selected_index` stays within `[0, len-1]`.
#[derive(Debug, Clone, Copy)]
pub struct NavigationState {
    pub selected_index: usize,
    len: usize,
}

impl NavigationState {
    #[must_use]
    pub fn new(len: usize) -> Self {
        debug_assert!(len > 0, "menus are never empty here");
        Self {
            selected_index: 0,
            len: len.max(1),
        }
    }

    pub fn up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn down(&mut self) {
        if self.selected_index + 1 < self.len {
            self.selected_index += 1;
        }
    }
}

/// Pure key mapping: mutates the cursor, returns a selection when the round
/// is over.
pub fn apply_key(
    state: &mut NavigationState,
    code: KeyCode,
    mods: KeyModifiers,
) -> Option<Selection> {
    match (code, mods) {
        (KeyCode::Char('c' | 'q'), KeyModifiers::CONTROL) => Some(Selection::Cancelled),
        (KeyCode::Up | KeyCode::Char('k'), _) => {
            state.up();
            None
        }
        (KeyCode::Down | KeyCode::Char('j'), _) => {
            state.down();
            None
        }
        (KeyCode::Enter, _) => Some(Selection::Item(state.selected_index)),
        (KeyCode::Esc, _) | (KeyCode::Char('q' | 'Q'), _) => Some(Selection::Cancelled),
        _ => None,
    }
}

/// Block until the user picks an item or quits. Redraws on every event, so
/// terminal resizes repaint naturally.
///
/// # Errors
/// Returns `SurfaceError` when drawing or reading input fails; the caller
/// treats that as a terminal fault.
pub fn navigate(
    surface: &mut Surface,
    menu: &Menu,
    theme: &ThemeTokens,
) -> Result<Selection, SurfaceError> {
    let mut state = NavigationState::new(menu.len());
    loop {
        surface.draw(|f| render(f, menu, state.selected_index, theme))?;
        match event::read().map_err(SurfaceError::Draw)? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if let Some(sel) = apply_key(&mut state, key.code, key.modifiers) {
                    return Ok(sel);
                }
            }
            _ => {}
        }
    }
}

pub fn render(f: &mut Frame, menu: &Menu, selected: usize, theme: &ThemeTokens) {
    let area = f.area();
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        render_resize_notice(f, area, theme);
        return;
    }

    let inner_width = area
        .width
        .saturating_sub(2 + PAD_X * 2) // borders + padding
        .max(1) as usize;
    let items: Vec<ListItem> = menu
        .items()
        .iter()
        .map(|it| {
            let mut spans = vec![Span::styled(
                clip(&it.label, inner_width),
                Style::default().fg(theme.menu_title),
            )];
            if let Some(desc) = &it.desc {
                let used = it.label.chars().count() + 2;
                if used < inner_width {
                    spans.push(Span::styled(
                        format!("  {}", clip(desc, inner_width - used)),
                        Style::default()
                            .fg(theme.menu_desc)
                            .add_modifier(Modifier::DIM),
                    ));
                }
            }
            ListItem::new(Line::from(spans))
        })
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border))
                .title("Setup")
                .padding(Padding::new(PAD_X, PAD_X, PAD_Y, PAD_Y)),
        )
        .highlight_style(
            Style::default()
                .fg(theme.selection_fg)
                .bg(theme.selection_bg),
        );
    f.render_stateful_widget(
        list,
        area,
        &mut ratatui::widgets::ListState::default().with_selected(Some(selected)),
    );
}

fn render_resize_notice(f: &mut Frame, area: Rect, theme: &ThemeTokens) {
    let notice = Paragraph::new("Terminal too small. Please resize.")
        .style(Style::default().fg(theme.notice));
    f.render_widget(notice, area);
}

/// Truncate to at most `max` characters, marking the cut with an ellipsis.
#[must_use]
pub fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(1);
    let mut out: String = s.chars().take(keep).collect();
    out.push('…');
    out
}
