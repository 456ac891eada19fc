#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Edit,
    Delete,
}

impl MenuAction {
    pub const ALL: [MenuAction; 2] = [MenuAction::Edit, MenuAction::Delete];

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::Edit => "Edit",
            MenuAction::Delete => "Delete",
        }
    }
}

/// Edit/delete dropdown shown next to the viewer's own posts and comments
#[derive(Debug, Clone, Default)]
pub struct OwnerMenu {
    open: bool,
    selected: usize,
}

impl OwnerMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only owners get a menu
    pub fn toggle(&mut self, is_owner: bool) -> bool {
        if !is_owner {
            self.open = false;
            return false;
        }
        self.open = !self.open;
        self.selected = 0;
        self.open
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn selected(&self) -> MenuAction {
        MenuAction::ALL[self.selected]
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % MenuAction::ALL.len();
    }

    pub fn previous(&mut self) {
        self.selected = (self.selected + MenuAction::ALL.len() - 1) % MenuAction::ALL.len();
    }

    /// Pick the highlighted action and close
    pub fn choose(&mut self) -> Option<MenuAction> {
        if !self.open {
            return None;
        }
        self.open = false;
        Some(self.selected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_wraps_and_chooses() {
        let mut menu = OwnerMenu::new();
        assert!(menu.toggle(true));
        menu.previous();
        assert_eq!(menu.selected(), MenuAction::Delete);
        menu.next();
        assert_eq!(menu.choose(), Some(MenuAction::Edit));
        assert!(!menu.is_open());
        assert_eq!(menu.choose(), None);
    }

    #[test]
    fn test_non_owner_gets_no_menu() {
        let mut menu = OwnerMenu::new();
        assert!(!menu.toggle(false));
        assert!(!menu.is_open());
    }
}
