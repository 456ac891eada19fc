use std::time::Instant;

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use super::formatting::{count_label, timestamp_label, wrap_indented};
use super::theme::ThemeColors;
use super::widgets::{avatar, error_lines, tooltip};
use crate::components::{CommentCard, EditPhase, LikeState, PostCard};

fn header_style(is_selected: bool, theme: &ThemeColors) -> Style {
    if is_selected {
        Style::default()
            .fg(theme.success)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.primary)
    }
}

fn author_line<'a>(
    owner: &str,
    image: &str,
    is_owner: bool,
    when: String,
    is_selected: bool,
    theme: &ThemeColors,
) -> Line<'a> {
    let style = header_style(is_selected, theme);
    let prefix = if is_selected { "▶ " } else { "  " };
    let mut spans = vec![
        Span::styled(prefix, style),
        avatar(owner, image, theme),
        Span::styled(format!("@{}", owner), style),
    ];
    if is_owner {
        spans.push(Span::styled(" (you)", Style::default().fg(theme.text_dim)));
    }
    spans.push(Span::styled(
        format!(" · {}", when),
        Style::default().fg(theme.text_dim),
    ));
    Line::from(spans)
}

/// Heart, likes and comment counts, plus the like tooltip when visible
fn post_footer<'a>(card: &PostCard, theme: &ThemeColors, now: Instant) -> Vec<Line<'a>> {
    let (heart, heart_style) = match card.like.state() {
        LikeState::Liked(_) => ("♥", Style::default().fg(theme.like)),
        LikeState::Liking => (
            "♥",
            Style::default().fg(theme.like).add_modifier(Modifier::DIM),
        ),
        LikeState::Unliking(_) => ("♡", Style::default().fg(theme.text_dim)),
        LikeState::NotLiked => ("♡", Style::default().fg(theme.text)),
    };

    let mut lines = vec![Line::from(vec![
        Span::raw("  "),
        Span::styled(heart, heart_style),
        Span::styled(
            format!(" {}", count_label(card.like.count(), "like")),
            Style::default().fg(theme.text),
        ),
        Span::styled("   💬 ", Style::default().fg(theme.text_dim)),
        Span::styled(
            count_label(card.comments_count(), "comment"),
            Style::default().fg(theme.text),
        ),
    ])];

    if let Some(message) = card.like.tooltip.message(now) {
        lines.push(tooltip(message, theme));
    }
    lines
}

/// A post as shown in the feed and at the top of the detail page
pub fn post_lines<'a>(
    card: &PostCard,
    is_selected: bool,
    width: usize,
    theme: &ThemeColors,
    now: Instant,
) -> Vec<Line<'a>> {
    let fields = card.fields();
    let mut lines = vec![author_line(
        card.owner(),
        card.profile_image(),
        card.is_owner(),
        timestamp_label(card.created_at(), card.updated_at()),
        is_selected,
        theme,
    )];

    lines.push(Line::from(Span::styled(
        format!("  {}", fields.title),
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
    )));
    lines.extend(wrap_indented(
        &fields.content,
        Style::default().fg(theme.text),
        width,
    ));
    if !fields.image.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  🖼  {}", fields.image),
            Style::default().fg(theme.text_dim),
        )));
    }
    lines.extend(post_footer(card, theme, now));
    lines
}

/// A comment row in the detail page
pub fn comment_lines<'a>(
    card: &CommentCard,
    is_selected: bool,
    width: usize,
    theme: &ThemeColors,
) -> Vec<Line<'a>> {
    let comment = card.comment();
    let mut lines = vec![author_line(
        &comment.owner,
        &comment.profile_image,
        card.is_owner(),
        timestamp_label(&comment.created_at, &comment.updated_at),
        is_selected,
        theme,
    )];

    let status = match card.edit_phase() {
        EditPhase::Viewing => None,
        EditPhase::Editing => Some("editing below"),
        EditPhase::Saving => Some("saving..."),
    };
    if let Some(status) = status {
        lines.push(Line::from(Span::styled(
            format!("  ({})", status),
            Style::default()
                .fg(theme.warning)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    lines.extend(wrap_indented(
        card.content(),
        Style::default().fg(theme.text),
        width,
    ));
    lines.extend(error_lines(card.editor().errors().field("content"), theme));
    for message in card.editor().errors().general() {
        lines.push(Line::from(Span::styled(
            format!("  ✗ {}", message),
            Style::default().fg(theme.error),
        )));
    }
    lines
}
