use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tui_textarea::Input;

use crate::api::Backend;
use crate::app::state::{App, InputMode, InputTarget, Screen};
use crate::log_key_event;

impl<B> App<B>
where
    B: Backend + Clone + 'static,
{
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        log_key_event!(
            self.log_config,
            "key {:?} on {:?} ({:?})",
            key.code,
            self.screen(),
            self.input.mode()
        );

        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.running = false;
            return Ok(());
        }

        // Priority 1: Help overlay
        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.toggle_help();
            }
            return Ok(());
        }

        // Priority 2: Text input owns every key
        if self.input.mode() == InputMode::Typing {
            self.handle_typing_keys(key);
            return Ok(());
        }

        // Priority 3: Delete confirmation
        if let Some(detail) = self.detail.as_mut() {
            if detail.confirm.is_open() && self.profile.is_none() {
                match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                        self.confirm_delete()
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                        detail.confirm.dismiss()
                    }
                    _ => {}
                }
                return Ok(());
            }
        }

        if key.code == KeyCode::Char('?') {
            self.toggle_help();
            return Ok(());
        }

        match self.screen() {
            Screen::Feed => self.handle_feed_keys(key),
            Screen::PostDetail => self.handle_detail_keys(key),
            Screen::Profile => self.handle_profile_keys(key),
        }
        Ok(())
    }

    fn handle_typing_keys(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.cancel_input(),
            KeyCode::Enter => self.submit_input(),
            KeyCode::Tab => self.cycle_post_field(),
            _ => {
                // Edits in flight take no more input
                if !self.input_accepts_text() {
                    return;
                }
                if let (KeyCode::Char(_), Some(max)) = (key.code, self.input.max_chars) {
                    if self.input.char_count() >= max {
                        return;
                    }
                }
                self.input.textarea.input(Input::from(Event::Key(key)));
                self.sync_input();
            }
        }
    }

    fn input_accepts_text(&self) -> bool {
        let Some(detail) = self.detail.as_ref() else {
            return false;
        };
        match self.input.target {
            Some(InputTarget::Composer) => !detail.composer.is_posting(),
            Some(InputTarget::CommentEdit(id)) => detail
                .comments()
                .items()
                .iter()
                .find(|card| card.id() == id)
                .is_some_and(|card| card.editor().draft_is_open()),
            Some(_) => detail
                .post()
                .is_some_and(|card| card.editor().draft_is_open()),
            None => false,
        }
    }

    fn handle_feed_keys(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.running = false,
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => {
                if let Some(request) = self.feed.select_next() {
                    self.fetch_feed_page(request);
                }
            }
            KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => self.feed.select_previous(),
            KeyCode::Enter => self.open_selected_post(),
            KeyCode::Char('l') | KeyCode::Char('L') => self.like_focused_post(),
            KeyCode::Char('p') | KeyCode::Char('P') => self.open_focused_profile(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.reload_feed(),
            _ => {}
        }
    }

    fn handle_detail_keys(&mut self, key: KeyEvent) {
        let menu_open = self.detail.as_ref().is_some_and(|d| d.menu.is_open());
        if menu_open {
            let Some(detail) = self.detail.as_mut() else {
                return;
            };
            match key.code {
                KeyCode::Down | KeyCode::Char('j') => detail.menu.next(),
                KeyCode::Up | KeyCode::Char('k') => detail.menu.previous(),
                KeyCode::Enter => self.choose_menu_action(),
                KeyCode::Esc | KeyCode::Char('m') => detail.menu.close(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => self.close_detail(),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => self.detail_focus_next(),
            KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => {
                if let Some(detail) = self.detail.as_mut() {
                    detail.focus_previous();
                }
            }
            KeyCode::Char('l') | KeyCode::Char('L') => self.like_focused_post(),
            KeyCode::Char('c') | KeyCode::Char('C') => self.start_comment(),
            KeyCode::Char('m') | KeyCode::Char('M') => self.toggle_owner_menu(),
            KeyCode::Char('e') | KeyCode::Char('E') => {
                self.begin_edit();
            }
            KeyCode::Char('d') | KeyCode::Char('D') => self.request_delete(),
            KeyCode::Char('p') | KeyCode::Char('P') => self.open_focused_profile(),
            _ => {}
        }
    }

    fn handle_profile_keys(&mut self, key: KeyEvent) {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q')
        ) {
            self.close_profile();
        }
    }
}
