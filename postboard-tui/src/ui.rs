// UI module - split into cohesive submodules for maintainability
pub mod theme;
mod cards;
mod formatting;
mod help;
mod screens;
pub mod widgets;

// Re-export main render function
pub use self::render_main::render;

// Main render logic
mod render_main {
    use std::time::Instant;

    use ratatui::{
        layout::{Alignment, Constraint, Direction, Layout, Rect},
        style::{Modifier, Style},
        text::{Line, Span},
        widgets::{Block, Borders, Clear, Paragraph},
        Frame,
    };

    use super::help::render_help_modal;
    use super::screens::{render_detail, render_feed, render_profile};
    use super::theme::{get_theme_colors, ThemeColors};
    use crate::api::Backend;
    use crate::app::{App, InputMode, Screen};
    use crate::log_rendering;

    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 20;

    /// Render the UI
    pub fn render<B>(app: &App<B>, frame: &mut Frame)
    where
        B: Backend + Clone + 'static,
    {
        let area = frame.area();

        let theme = get_theme_colors();

        frame.render_widget(Clear, area);

        let background = Block::default().style(Style::default().bg(theme.background));
        frame.render_widget(background, area);

        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            log_rendering!(app.log_config, "Terminal too small: {}x{}", area.width, area.height);
            render_too_small(frame, area, &theme);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        log_rendering!(app.log_config, "Rendering {:?} at {}x{}", app.screen(), area.width, area.height);
        render_header(frame, app, chunks[0], &theme);
        match app.screen() {
            Screen::Feed => render_feed(frame, app, chunks[1], &theme),
            Screen::PostDetail => render_detail(frame, app, chunks[1], &theme),
            Screen::Profile => render_profile(frame, app, chunks[1], &theme),
        }
        render_status_bar(frame, app, chunks[2], &theme);

        if app.show_help {
            render_help_modal(frame, app.screen(), area, &theme);
        }
    }

    fn render_too_small(frame: &mut Frame, area: Rect, theme: &ThemeColors) {
        let warning = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Terminal Too Small",
                Style::default()
                    .fg(theme.error)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("Minimum size: {}x{}", MIN_WIDTH, MIN_HEIGHT),
                Style::default().fg(theme.text),
            )),
            Line::from(Span::styled(
                format!("Current size: {}x{}", area.width, area.height),
                Style::default().fg(theme.warning),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Please resize your terminal window",
                Style::default().fg(theme.text_dim),
            )),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.error)),
        );

        frame.render_widget(warning, area);
    }

    fn render_header<B>(frame: &mut Frame, app: &App<B>, area: Rect, theme: &ThemeColors)
    where
        B: Backend + Clone + 'static,
    {
        let who = match app.auth.user() {
            Some(user) => Span::styled(
                format!("@{}", user.username),
                Style::default().fg(theme.success),
            ),
            None => Span::styled("not signed in", Style::default().fg(theme.text_dim)),
        };
        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                " Postboard ",
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("· ", Style::default().fg(theme.text_dim)),
            who,
        ]));
        frame.render_widget(header, area);
    }

    /// Transient notice if one is showing, otherwise key hints
    fn render_status_bar<B>(frame: &mut Frame, app: &App<B>, area: Rect, theme: &ThemeColors)
    where
        B: Backend + Clone + 'static,
    {
        let line = match app.notice.message(Instant::now()) {
            Some(message) => Line::from(Span::styled(
                format!(" {}", message),
                Style::default()
                    .fg(theme.error)
                    .add_modifier(Modifier::BOLD),
            )),
            None => {
                let hints = match (app.input.mode(), app.screen()) {
                    (InputMode::Typing, _) => " Enter: save  Esc: cancel  Tab: next field",
                    (_, Screen::Feed) => " j/k: move  Enter: open  l: like  p: profile  r: reload  ?: help  q: quit",
                    (_, Screen::PostDetail) => " j/k: move  l: like  c: comment  m: menu  e: edit  d: delete  ?: help  Esc: back",
                    (_, Screen::Profile) => " Esc: back  ?: help",
                };
                Line::from(Span::styled(hints, Style::default().fg(theme.text_dim)))
            }
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::app::App;
    use crate::auth::AuthContext;
    use postboard_types::{Page, Post, PostId, ProfileId};
    use ratatui::{backend::TestBackend, Terminal};

    fn post(id: i64) -> Post {
        Post {
            id: PostId(id),
            owner: "ada".to_string(),
            is_owner: false,
            profile_id: ProfileId(2),
            profile_image: String::new(),
            title: format!("Hello {}", id),
            content: "Some words".to_string(),
            image: String::new(),
            like_id: None,
            likes_count: 3,
            comments_count: 1,
            created_at: "today".to_string(),
            updated_at: "today".to_string(),
        }
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> App<ApiClient> {
        let client = ApiClient::new("http://127.0.0.1:9".to_string());
        App::new(client, AuthContext::anonymous())
    }

    #[tokio::test]
    async fn test_feed_renders_cards() {
        let mut app = app();
        let request = app.feed.reload();
        app.feed
            .apply_page(request.seq, Ok(Page::new(vec![post(1), post(2)], None)));

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Hello 1"));
        assert!(text.contains("3 likes"));
        assert!(text.contains("1 comment"));
        assert!(text.contains("not signed in"));
    }

    #[tokio::test]
    async fn test_small_terminal_shows_warning() {
        let app = app();
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal.draw(|frame| render(&app, frame)).unwrap();
        assert!(screen_text(&terminal).contains("Terminal Too Small"));
    }

    #[tokio::test]
    async fn test_help_overlay_lists_detail_keys() {
        let mut app = app();
        let request = app.feed.reload();
        app.feed
            .apply_page(request.seq, Ok(Page::new(vec![post(1)], None)));
        app.open_selected_post();
        app.show_help = true;

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Keyboard Shortcuts"));
        assert!(text.contains("Write a comment"));
    }
}
