//! Small display pieces shared by the screens: avatar, loader, tooltip,
//! owner menu and the delete confirmation popup.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::formatting::initials;
use super::theme::ThemeColors;
use crate::components::confirm::IRREVERSIBLE_WARNING;
use crate::components::{ConfirmationModal, MenuAction, OwnerMenu};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Avatar placeholder: the owner's initials in brackets. The image URL is
/// only used to pick the style, since images are not drawn.
pub fn avatar<'a>(owner: &str, image: &str, theme: &ThemeColors) -> Span<'a> {
    let color = if image.is_empty() {
        theme.text_dim
    } else {
        theme.secondary
    };
    Span::styled(
        format!("[{}] ", initials(owner)),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

/// Spinner frame for a clock reading in milliseconds
pub fn spinner_frame(millis: i64) -> &'static str {
    let index = (millis / 100).rem_euclid(SPINNER_FRAMES.len() as i64) as usize;
    SPINNER_FRAMES[index]
}

/// Animated "loading" line
pub fn loader<'a>(message: &str, theme: &ThemeColors) -> Line<'a> {
    let frame = spinner_frame(chrono::Utc::now().timestamp_millis());
    Line::from(Span::styled(
        format!("{} {}", frame, message),
        Style::default()
            .fg(theme.warning)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Tooltip shown under the control that raised it
pub fn tooltip<'a>(message: &str, theme: &ThemeColors) -> Line<'a> {
    Line::from(vec![
        Span::styled("  ⚠ ", Style::default().fg(theme.warning)),
        Span::styled(
            message.to_string(),
            Style::default()
                .fg(theme.warning)
                .add_modifier(Modifier::ITALIC),
        ),
    ])
}

/// Inline error lines, one per message
pub fn error_lines<'a>(messages: &[String], theme: &ThemeColors) -> Vec<Line<'a>> {
    messages
        .iter()
        .map(|message| {
            Line::from(Span::styled(
                format!("  ✗ {}", message),
                Style::default().fg(theme.error),
            ))
        })
        .collect()
}

/// Create a centered rectangle with percentage-based dimensions
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Dropdown with the owner's actions, anchored to the top-right of `anchor`
pub fn render_owner_menu(frame: &mut Frame, anchor: Rect, menu: &OwnerMenu, theme: &ThemeColors) {
    if !menu.is_open() {
        return;
    }

    let width = 14.min(anchor.width);
    let height = (MenuAction::ALL.len() as u16 + 2).min(anchor.height);
    let area = Rect {
        x: anchor.x + anchor.width.saturating_sub(width + 1),
        y: anchor.y + 1,
        width,
        height,
    };

    let items: Vec<ListItem> = MenuAction::ALL
        .iter()
        .map(|action| {
            let style = if *action == menu.selected() {
                Style::default()
                    .fg(theme.text)
                    .bg(theme.highlight_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            let style = if *action == MenuAction::Delete {
                style.fg(theme.error)
            } else {
                style
            };
            ListItem::new(Line::from(Span::styled(format!(" {}", action.label()), style)))
        })
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(
        List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent))
                .style(Style::default().bg(theme.background)),
        ),
        area,
    );
}

/// Delete confirmation popup
pub fn render_confirmation_modal(
    frame: &mut Frame,
    area: Rect,
    modal: &ConfirmationModal,
    theme: &ThemeColors,
) {
    let Some(target) = modal.target() else {
        return;
    };

    let modal_area = centered_rect(50, 30, area);
    frame.render_widget(Clear, modal_area);

    let footer = if modal.is_deleting() {
        loader("Deleting...", theme)
    } else {
        Line::from(vec![
            Span::styled(
                "y/Enter",
                Style::default()
                    .fg(theme.error)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(": Delete  ", Style::default().fg(theme.text_dim)),
            Span::styled(
                "n/Esc",
                Style::default()
                    .fg(theme.success)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(": Cancel", Style::default().fg(theme.text_dim)),
        ])
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            target.question(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            IRREVERSIBLE_WARNING,
            Style::default().fg(theme.warning),
        )),
        Line::from(""),
        footer,
    ];

    let popup = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(
                    Style::default()
                        .fg(theme.error)
                        .add_modifier(Modifier::BOLD),
                )
                .title(format!(" {} ", target.title()))
                .title_alignment(Alignment::Center)
                .style(Style::default().bg(theme.background)),
        );

    frame.render_widget(popup, modal_area);
}
