/// Greedy word wrap against a pixel budget.
///
/// `measure` returns the rendered width of a candidate line in pixels. Words
/// are packed left to right; a word that would push the current line past
/// `max_width` starts a new line. A single word wider than the budget still
/// gets a line of its own rather than being split mid-word.
///
/// Whitespace runs collapse to single spaces. Empty or whitespace-only input
/// yields one line containing the input unchanged.
pub fn wrap_words(
    text: &str,
    max_width: f64,
    mut measure: impl FnMut(&str) -> f64,
) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current.join(" "), word)
        };

        if measure(&candidate) <= max_width {
            current.push(word);
        } else {
            if !current.is_empty() {
                lines.push(current.join(" "));
            }
            current = vec![word];
        }
    }

    if !current.is_empty() {
        lines.push(current.join(" "));
    }

    if lines.is_empty() {
        vec![text.to_string()]
    } else {
        lines
    }
}
