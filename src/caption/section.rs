use regex::Regex;
use std::sync::OnceLock;

/// A run of 20 or more hyphens separates two verse blocks.
const DELIMITER_PATTERN: &str = "-{20,}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// 1-based position among the non-blank sections.
    pub index: usize,
    pub text: String,
}

/// Output file name for a 1-based section index: `01.png`, `02.png`, ...
pub fn file_name_for_index(index: usize) -> String {
    format!("{:02}.png", index)
}

fn delimiter() -> &'static Regex {
    static DELIMITER: OnceLock<Regex> = OnceLock::new();
    DELIMITER.get_or_init(|| Regex::new(DELIMITER_PATTERN).expect("delimiter pattern is valid"))
}

pub fn split_sections(raw: &str) -> Vec<Section> {
    delimiter()
        .split(raw)
        .filter(|chunk| !chunk.trim().is_empty())
        .enumerate()
        .map(|(idx, chunk)| Section {
            index: idx + 1,
            text: chunk.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(raw: &str) -> Vec<String> {
        split_sections(raw)
            .into_iter()
            .map(|section| section.text.trim().to_string())
            .collect()
    }

    #[test]
    fn splits_on_twenty_dashes() {
        let raw = format!("a\n{}\nb", "-".repeat(20));
        assert_eq!(texts(&raw), vec!["a", "b"]);
    }

    #[test]
    fn longer_runs_also_split() {
        let raw = format!("a\n{}\nb\n{}\nc", "-".repeat(35), "-".repeat(21));
        assert_eq!(texts(&raw), vec!["a", "b", "c"]);
    }

    #[test]
    fn nineteen_dashes_stay_in_section() {
        let dashes = "-".repeat(19);
        let raw = format!("a\n{}\nb", dashes);
        let sections = split_sections(&raw);
        assert_eq!(sections.len(), 1);
        assert!(sections[0].text.contains(&dashes));
    }

    #[test]
    fn blank_chunks_are_dropped_before_numbering() {
        let sep = "-".repeat(20);
        let raw = format!("\n{sep}\n  \n{sep}\nfirst\n{sep}\n\n{sep}\nsecond\n{sep}\n");
        let sections = split_sections(&raw);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].index, 1);
        assert_eq!(sections[0].text.trim(), "first");
        assert_eq!(sections[1].index, 2);
        assert_eq!(sections[1].text.trim(), "second");
    }

    #[test]
    fn empty_and_whitespace_input_yield_nothing() {
        assert!(split_sections("").is_empty());
        assert!(split_sections(" \n\t\n ").is_empty());
    }

    #[test]
    fn file_names_are_zero_padded() {
        assert_eq!(file_name_for_index(1), "01.png");
        assert_eq!(file_name_for_index(12), "12.png");
        assert_eq!(file_name_for_index(120), "120.png");
    }
}
