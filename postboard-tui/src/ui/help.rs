use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::theme::ThemeColors;
use super::widgets::centered_rect;
use crate::app::Screen;

type Shortcuts = Vec<(&'static str, Vec<(&'static str, &'static str)>)>;

/// Shortcuts that apply on `screen`, grouped by category
pub fn shortcuts_for(screen: Screen) -> Shortcuts {
    let global = (
        "Global",
        vec![("?", "Toggle this help"), ("Ctrl+C", "Quit")],
    );

    let screen_keys = match screen {
        Screen::Feed => (
            "Feed",
            vec![
                ("j/k, ↓/↑", "Move between posts"),
                ("Enter", "Open post and comments"),
                ("l", "Like / unlike"),
                ("p", "Show author's profile"),
                ("r", "Reload"),
                ("q/Esc", "Quit"),
            ],
        ),
        Screen::PostDetail => (
            "Post",
            vec![
                ("j/k, ↓/↑", "Move between post, composer, comments"),
                ("l", "Like / unlike"),
                ("c", "Write a comment"),
                ("e", "Edit (your post or comment)"),
                ("d", "Delete (your post or comment)"),
                ("m", "Owner menu"),
                ("p", "Show author's profile"),
                ("q/Esc", "Back to feed"),
            ],
        ),
        Screen::Profile => ("Profile", vec![("q/Esc", "Back")]),
    };

    let mut groups = vec![global, screen_keys];
    if screen == Screen::PostDetail {
        groups.push((
            "While typing",
            vec![
                ("Enter", "Save / send"),
                ("Tab", "Next post field"),
                ("Esc", "Cancel"),
            ],
        ));
    }
    groups
}

pub fn render_help_modal(frame: &mut Frame, screen: Screen, area: Rect, theme: &ThemeColors) {
    let modal_area = centered_rect(70, 80, area);
    frame.render_widget(Clear, modal_area);

    let mut lines = vec![Line::from("")];
    for (category, items) in shortcuts_for(screen) {
        lines.push(Line::from(Span::styled(
            category,
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )));
        for (key, description) in items {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<15}", key), Style::default().fg(theme.success)),
                Span::styled(description, Style::default().fg(theme.text)),
            ]));
        }
        lines.push(Line::from(""));
    }

    let help = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                )
                .title(" Keyboard Shortcuts ")
                .title_alignment(Alignment::Center)
                .style(Style::default().bg(theme.background)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(help, modal_area);
}
