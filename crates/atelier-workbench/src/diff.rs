//! Changed-line heuristic for editor highlights
//!
//! Not an edit script: lines are compared by index only, and a large change in
//! line count marks the whole new document as changed.

/// 1-based line numbers of `new_text` that differ from `old_text`, ascending
///
/// When the line counts differ by more than half the old count, every line of
/// `new_text` is reported. Otherwise line `i` is changed when `old_text` has
/// no line `i` or the two lines differ after trimming surrounding whitespace.
pub fn changed_lines(old_text: &str, new_text: &str) -> Vec<usize> {
    let old_lines: Vec<&str> = old_text.split('\n').collect();
    let new_lines: Vec<&str> = new_text.split('\n').collect();

    let delta = old_lines.len().abs_diff(new_lines.len());
    if delta as f64 > old_lines.len() as f64 * 0.5 {
        return (1..=new_lines.len()).collect();
    }

    new_lines
        .iter()
        .enumerate()
        .filter(|(i, line)| {
            old_lines
                .get(*i)
                .map_or(true, |old| old.trim() != line.trim())
        })
        .map(|(i, _)| i + 1)
        .collect()
}
