use ratatui::{
    style::Style,
    text::{Line, Span},
};

// Layout constants
pub const BORDER_PADDING: u16 = 4; // Total horizontal padding from borders (2 per side)

/// Wrap text to `max_width`, indenting every line by two spaces.
/// Blank source lines are kept so paragraphs stay apart.
pub fn wrap_indented(text: &str, style: Style, max_width: usize) -> Vec<Line<'static>> {
    let wrap_width = max_width.saturating_sub(2).max(1);
    let mut lines = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            lines.push(Line::from(""));
            continue;
        }
        for wrapped in textwrap::wrap(line, wrap_width) {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(wrapped.into_owned(), style),
            ]));
        }
    }

    lines
}

/// "1 like", "2 likes", "0 comments"
pub fn count_label(count: i64, singular: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}s", count, singular)
    }
}

/// Up to two uppercase initials for an avatar placeholder
pub fn initials(name: &str) -> String {
    let mut words = name
        .split(|c: char| c.is_whitespace() || c == '_' || c == '.' || c == '-')
        .filter(|w| !w.is_empty());

    let first = words.next().and_then(|w| w.chars().next());
    let second = words.next().and_then(|w| w.chars().next());

    match (first, second) {
        (Some(a), Some(b)) => format!("{}{}", a, b).to_uppercase(),
        (Some(a), None) => a.to_uppercase().to_string(),
        _ => "?".to_string(),
    }
}

/// Edited marker when the server reports a different update time
pub fn timestamp_label(created_at: &str, updated_at: &str) -> String {
    if updated_at.is_empty() || updated_at == created_at {
        created_at.to_string()
    } else {
        format!("{} (edited {})", created_at, updated_at)
    }
}

/// Remaining-characters hint for capped inputs
pub fn char_counter(used: usize, max: Option<usize>) -> String {
    match max {
        Some(max) => format!("{}/{}", used, max),
        None => used.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_label_pluralizes() {
        assert_eq!(count_label(0, "like"), "0 likes");
        assert_eq!(count_label(1, "like"), "1 like");
        assert_eq!(count_label(12, "comment"), "12 comments");
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("ada lovelace"), "AL");
        assert_eq!(initials("grace_hopper"), "GH");
        assert_eq!(initials("linus"), "L");
        assert_eq!(initials(""), "?");
    }

    #[test]
    fn test_wrap_indented_respects_width() {
        let lines = wrap_indented("one two three four five six", Style::default(), 12);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.width() <= 12, "line too wide: {:?}", line);
        }
    }

    #[test]
    fn test_wrap_keeps_blank_lines() {
        let lines = wrap_indented("first\n\nsecond", Style::default(), 40);
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_timestamp_label_marks_edits() {
        assert_eq!(timestamp_label("Mon", "Mon"), "Mon");
        assert_eq!(timestamp_label("Mon", "Tue"), "Mon (edited Tue)");
    }
}
