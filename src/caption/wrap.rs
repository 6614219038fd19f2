/// Maximum characters per wrapped line. Tuned against the fixed canvas width,
/// independent of the configured font sizes.
pub const MAX_LINE_CHARS: usize = 25;

/// Splits a section into logical lines and wraps each one by character count.
///
/// Counting is per Unicode scalar value and is not word-aware: a word longer
/// than the budget is cut mid-word.
pub fn wrap_section(section: &str) -> Vec<String> {
    section
        .lines()
        .filter(|line| !line.trim().is_empty())
        .flat_map(wrap_line)
        .collect()
}

pub fn wrap_line(line: &str) -> Vec<String> {
    let mut wrapped = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    for ch in line.chars() {
        if current_len + 1 > MAX_LINE_CHARS {
            wrapped.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push(ch);
        current_len += 1;
    }
    if !current.is_empty() {
        wrapped.push(current);
    }
    wrapped
}
