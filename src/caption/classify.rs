/// Book and chapter marker that identifies a verse header line.
pub const VERSE_HEADER: &str = "창세기 1장";
/// Single-character suffix that closes the verse number.
pub const VERSE_SUFFIX: &str = "절";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caption {
    /// Bare verse label, e.g. `"3"` for `창세기 1장 3절`.
    pub title: Option<String>,
    pub content: Vec<String>,
}

pub fn is_verse_header(line: &str) -> bool {
    line.contains(VERSE_HEADER) && line.contains(VERSE_SUFFIX)
}

fn strip_verse_header(line: &str) -> String {
    line.replacen(VERSE_HEADER, "", 1)
        .replacen(VERSE_SUFFIX, "", 1)
        .trim()
        .to_string()
}

/// Separates the verse header from body lines. When several lines match the
/// header, the last one wins.
pub fn classify_lines<S: AsRef<str>>(lines: &[S]) -> Caption {
    let mut caption = Caption::default();
    for line in lines {
        let line = line.as_ref();
        if is_verse_header(line) {
            let label = strip_verse_header(line);
            caption.title = (!label.is_empty()).then_some(label);
            continue;
        }
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            caption.content.push(trimmed.to_string());
        }
    }
    caption
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caption::wrap::wrap_section;

    #[test]
    fn extracts_bare_verse_number() {
        let caption = classify_lines(&wrap_section("창세기 1장 3절\n안녕하세요"));
        assert_eq!(caption.title.as_deref(), Some("3"));
        assert_eq!(caption.content, vec!["안녕하세요"]);
    }

    #[test]
    fn missing_header_leaves_title_empty() {
        let caption = classify_lines(&["빛이 있으라", "  "]);
        assert_eq!(caption.title, None);
        assert_eq!(caption.content, vec!["빛이 있으라"]);
    }

    #[test]
    fn header_requires_suffix() {
        let caption = classify_lines(&["창세기 1장 전체"]);
        assert_eq!(caption.title, None);
        assert_eq!(caption.content, vec!["창세기 1장 전체"]);
    }

    #[test]
    fn last_header_wins() {
        let caption = classify_lines(&["창세기 1장 4절", "본문", "창세기 1장 5절"]);
        assert_eq!(caption.title.as_deref(), Some("5"));
        assert_eq!(caption.content, vec!["본문"]);
    }

    #[test]
    fn content_lines_are_trimmed_in_order() {
        let caption = classify_lines(&["  하나 ", "창세기 1장 10절", "둘  ", "셋"]);
        assert_eq!(caption.title.as_deref(), Some("10"));
        assert_eq!(caption.content, vec!["하나", "둘", "셋"]);
    }
}
