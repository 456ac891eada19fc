use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::cards::{comment_lines, post_lines};
use super::formatting::{char_counter, count_label, wrap_indented, BORDER_PADDING};
use super::theme::ThemeColors;
use super::widgets::{avatar, error_lines, loader, render_confirmation_modal, render_owner_menu, tooltip};
use crate::api::Backend;
use crate::app::{App, InputTarget};
use crate::components::{EditPhase, Focus, PostCard, PostDetailView};

fn bordered<'a>(title: impl Into<Line<'a>>, focused: bool, theme: &ThemeColors) -> Block<'a> {
    let border = if focused { theme.accent } else { theme.border };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title.into())
}

fn centered_message(frame: &mut Frame, area: Rect, line: Line, block: Block) {
    let paragraph = Paragraph::new(vec![Line::from(""), line])
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, area);
}

pub fn render_feed<B>(frame: &mut Frame, app: &App<B>, area: Rect, theme: &ThemeColors)
where
    B: Backend + Clone + 'static,
{
    let posts = app.feed.posts();
    let block = bordered(" Feed ", true, theme);

    if !posts.has_loaded() {
        centered_message(frame, area, loader("Loading posts...", theme), block);
        return;
    }
    if posts.is_empty() {
        let line = match posts.error() {
            Some(error) => Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(theme.error),
            )),
            None => Line::from(Span::styled(
                "No posts yet. Press r to refresh.",
                Style::default().fg(theme.text_dim),
            )),
        };
        centered_message(frame, area, line, block);
        return;
    }

    let width = area.width.saturating_sub(BORDER_PADDING) as usize;
    let now = Instant::now();
    let selected = app.feed.selected_index();

    let mut items: Vec<ListItem> = posts
        .items()
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let mut lines = post_lines(card, i == selected, width, theme, now);
            lines.push(Line::from(""));
            ListItem::new(lines)
        })
        .collect();

    if posts.is_fetching() {
        items.push(ListItem::new(loader("Loading more...", theme)));
    } else if let Some(error) = posts.error() {
        items.push(ListItem::new(Line::from(Span::styled(
            format!("  {}", error),
            Style::default().fg(theme.error),
        ))));
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(theme.highlight_bg));
    let mut state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(list, area, &mut state);
}

pub fn render_detail<B>(frame: &mut Frame, app: &App<B>, area: Rect, theme: &ThemeColors)
where
    B: Backend + Clone + 'static,
{
    let Some(detail) = app.detail.as_deref() else {
        return;
    };
    let width = area.width.saturating_sub(BORDER_PADDING) as usize;
    let now = Instant::now();

    let post_height = match detail.post() {
        Some(card) if card.edit_phase() != EditPhase::Viewing => {
            edit_form_height(card).min(area.height / 2 + 4)
        }
        Some(card) => {
            let lines = post_lines(card, false, width, theme, now).len() as u16 + 2;
            lines.min(area.height / 2)
        }
        None => 4,
    };
    let composer_notice = detail.composer.notice.message(now);
    let composer_height = 3 + u16::from(composer_notice.is_some());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(post_height),
            Constraint::Length(composer_height),
            Constraint::Min(3),
        ])
        .split(area);

    render_detail_post(frame, app, detail, chunks[0], width, theme, now);
    render_composer(frame, app, detail, chunks[1], composer_notice, theme);
    render_comments(frame, detail, chunks[2], width, theme);

    let menu_anchor = match detail.focus() {
        Focus::Comment(_) => chunks[2],
        _ => chunks[0],
    };
    render_owner_menu(frame, menu_anchor, &detail.menu, theme);
    render_confirmation_modal(frame, area, &detail.confirm, theme);
}

fn edit_form_height(card: &PostCard) -> u16 {
    let errors = card.editor().errors();
    let error_count = ["title", "content", "image"]
        .iter()
        .map(|field| errors.field(field).len())
        .sum::<usize>()
        + errors.general().len();
    // title + content + image fields, hint line, outer border
    3 + 6 + 3 + 1 + 2 + error_count as u16
}

fn render_detail_post<B>(
    frame: &mut Frame,
    app: &App<B>,
    detail: &PostDetailView,
    area: Rect,
    width: usize,
    theme: &ThemeColors,
    now: Instant,
) where
    B: Backend + Clone + 'static,
{
    let focused = detail.focus() == Focus::Post;
    let Some(card) = detail.post() else {
        let block = bordered(" Post ", focused, theme);
        match detail.load_error() {
            Some(error) => centered_message(
                frame,
                area,
                Line::from(Span::styled(
                    error.to_string(),
                    Style::default().fg(theme.error),
                )),
                block,
            ),
            None => centered_message(frame, area, loader("Loading post...", theme), block),
        }
        return;
    };

    if card.edit_phase() != EditPhase::Viewing {
        render_edit_form(frame, app, card, area, theme);
        return;
    }

    let paragraph = Paragraph::new(post_lines(card, focused, width, theme, now))
        .block(bordered(" Post ", focused, theme));
    frame.render_widget(paragraph, area);
}

fn render_edit_form<B>(
    frame: &mut Frame,
    app: &App<B>,
    card: &PostCard,
    area: Rect,
    theme: &ThemeColors,
) where
    B: Backend + Clone + 'static,
{
    let saving = card.edit_phase() == EditPhase::Saving;
    let outer = bordered(" Edit post ", true, theme);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let errors = card.editor().errors();
    let fields = card.fields();
    let field_height = |field: &str, base: u16| base + errors.field(field).len() as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(field_height("title", 3)),
            Constraint::Length(field_height("content", 6)),
            Constraint::Length(field_height("image", 3)),
            Constraint::Length(errors.general().len() as u16),
            Constraint::Length(1),
        ])
        .split(inner);

    let rows = [
        (InputTarget::PostTitle, "title", fields.title.clone(), chunks[0]),
        (InputTarget::PostContent, "content", fields.content.clone(), chunks[1]),
        (
            InputTarget::PostImage,
            "image",
            if card.image_path().is_empty() {
                fields.image.clone()
            } else {
                card.image_path().to_string()
            },
            chunks[2],
        ),
    ];

    for (target, field, value, rect) in rows {
        let field_errors = errors.field(field);
        let [box_area, error_area] = split_errors(rect, field_errors.len() as u16);
        let active = app.input.target == Some(target);

        let title = if active {
            format!(
                " {} {} ",
                target.label(),
                char_counter(app.input.char_count(), app.input.max_chars)
            )
        } else {
            format!(" {} ", target.label())
        };
        let block = bordered(title, active, theme);

        if active && !saving {
            let textarea_area = block.inner(box_area);
            frame.render_widget(block, box_area);
            frame.render_widget(&app.input.textarea, textarea_area);
        } else {
            let style = if value.is_empty() {
                Style::default().fg(theme.text_dim)
            } else {
                Style::default().fg(theme.text)
            };
            frame.render_widget(
                Paragraph::new(value)
                    .style(style)
                    .wrap(Wrap { trim: false })
                    .block(block),
                box_area,
            );
        }
        frame.render_widget(Paragraph::new(error_lines(field_errors, theme)), error_area);
    }

    let general: Vec<Line> = errors
        .general()
        .into_iter()
        .map(|message| {
            Line::from(Span::styled(
                format!("  ✗ {}", message),
                Style::default().fg(theme.error),
            ))
        })
        .collect();
    frame.render_widget(Paragraph::new(general), chunks[3]);

    let hint = if saving {
        loader("Saving...", theme)
    } else {
        Line::from(Span::styled(
            "  Tab: next field  Enter: save  Esc: cancel",
            Style::default().fg(theme.text_dim),
        ))
    };
    frame.render_widget(Paragraph::new(hint), chunks[4]);
}

fn split_errors(rect: Rect, error_rows: u16) -> [Rect; 2] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(error_rows)])
        .split(rect);
    [chunks[0], chunks[1]]
}

fn render_composer<B>(
    frame: &mut Frame,
    app: &App<B>,
    detail: &PostDetailView,
    area: Rect,
    notice: Option<&str>,
    theme: &ThemeColors,
) where
    B: Backend + Clone + 'static,
{
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let typing_target = match app.input.target {
        Some(target @ (InputTarget::Composer | InputTarget::CommentEdit(_))) => Some(target),
        _ => None,
    };
    let focused = detail.focus() == Focus::Composer || typing_target.is_some();
    let title = format!(
        " {} ",
        typing_target.map_or(InputTarget::Composer.label(), |t| t.label())
    );
    let block = bordered(title, focused, theme);

    if detail.composer.is_posting() {
        let paragraph = Paragraph::new(loader("Posting...", theme)).block(block);
        frame.render_widget(paragraph, chunks[0]);
    } else if typing_target.is_some() {
        let inner = block.inner(chunks[0]);
        frame.render_widget(block, chunks[0]);
        frame.render_widget(&app.input.textarea, inner);
    } else {
        let line = if !app.auth.is_authenticated() {
            Span::styled("Sign in to join the conversation", Style::default().fg(theme.text_dim))
        } else if detail.composer.content().is_empty() {
            Span::styled("Press c to write a comment", Style::default().fg(theme.text_dim))
        } else {
            Span::styled(
                detail.composer.content().to_string(),
                Style::default().fg(theme.text),
            )
        };
        frame.render_widget(Paragraph::new(Line::from(line)).block(block), chunks[0]);
    }

    if let Some(message) = notice {
        frame.render_widget(Paragraph::new(tooltip(message, theme)), chunks[1]);
    }
}

fn render_comments(
    frame: &mut Frame,
    detail: &PostDetailView,
    area: Rect,
    width: usize,
    theme: &ThemeColors,
) {
    let comments = detail.comments();
    let selected = match detail.focus() {
        Focus::Comment(i) => Some(i),
        _ => None,
    };
    let title = format!(" {} ", count_label(comments.len() as i64, "comment"));
    let block = bordered(title, selected.is_some(), theme);

    if !comments.has_loaded() {
        centered_message(frame, area, loader("Loading comments...", theme), block);
        return;
    }
    if comments.is_empty() {
        let line = match comments.error() {
            Some(error) => Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(theme.error),
            )),
            None => Line::from(Span::styled(
                "No comments yet",
                Style::default().fg(theme.text_dim),
            )),
        };
        centered_message(frame, area, line, block);
        return;
    }

    let mut items: Vec<ListItem> = comments
        .items()
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let mut lines = comment_lines(card, selected == Some(i), width, theme);
            lines.push(Line::from(""));
            ListItem::new(lines)
        })
        .collect();

    if comments.is_fetching() {
        items.push(ListItem::new(loader("Loading more...", theme)));
    } else if let Some(error) = comments.error() {
        items.push(ListItem::new(Line::from(Span::styled(
            format!("  {}", error),
            Style::default().fg(theme.error),
        ))));
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(theme.highlight_bg));
    let mut state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(list, area, &mut state);
}

pub fn render_profile<B>(frame: &mut Frame, app: &App<B>, area: Rect, theme: &ThemeColors)
where
    B: Backend + Clone + 'static,
{
    let Some(screen) = app.profile.as_ref() else {
        return;
    };
    let view = &screen.view;
    let block = bordered(" Profile ", true, theme);

    let Some(profile) = view.profile() else {
        let line = match view.error() {
            Some(error) => Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(theme.error),
            )),
            None => loader("Loading profile...", theme),
        };
        centered_message(frame, area, line, block);
        return;
    };

    let width = area.width.saturating_sub(BORDER_PADDING) as usize;
    let display_name = if profile.name.is_empty() {
        profile.owner.as_str()
    } else {
        profile.name.as_str()
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            avatar(&profile.owner, &profile.image, theme),
            Span::styled(
                display_name.to_string(),
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  @{}", profile.owner),
                Style::default().fg(theme.text_dim),
            ),
        ]),
        Line::from(Span::styled(
            format!("  Joined {}", profile.created_at),
            Style::default().fg(theme.text_dim),
        )),
        Line::from(""),
    ];

    if !profile.bio.is_empty() {
        lines.extend(wrap_indented(
            &profile.bio,
            Style::default().fg(theme.text),
            width,
        ));
        lines.push(Line::from(""));
    }

    let stat = |value: i64, label: &str| {
        vec![
            Span::styled(
                format!("  {}", value),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}", label), Style::default().fg(theme.text_dim)),
        ]
    };
    let mut stats = stat(profile.post_count, "posts");
    stats.extend(stat(profile.followers_count, "followers"));
    stats.extend(stat(profile.following_count, "following"));
    lines.push(Line::from(stats));

    if profile.is_owner {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  This is you",
            Style::default().fg(theme.success),
        )));
    } else if profile.following_id.is_some() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  You follow this profile",
            Style::default().fg(theme.secondary),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(paragraph, area);
}
