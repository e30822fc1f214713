use html_escape::decode_html_entities;

/// Drop tags from a feed description and collapse whitespace. Paragraph and
/// line breaks become newlines.
pub fn strip_markup(html: &str) -> String {
    let mut result = String::new();
    let mut tag = String::new();
    let mut in_tag = false;
    let mut last_was_space = false;

    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                if breaks_line(&tag) && !result.is_empty() && !result.ends_with('\n') {
                    let trimmed = result.trim_end().len();
                    result.truncate(trimmed);
                    result.push('\n');
                    last_was_space = true;
                }
            }
            _ if in_tag => tag.push(c),
            _ if c.is_whitespace() => {
                if !last_was_space {
                    result.push(' ');
                    last_was_space = true;
                }
            }
            _ => {
                result.push(c);
                last_was_space = false;
            }
        }
    }

    decode_html_entities(result.trim()).to_string()
}

fn breaks_line(tag: &str) -> bool {
    let name = tag
        .trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();
    name == "p" || name == "br"
}

/// Cut `text` to at most `width` characters, marking the cut with `…`.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('…');
    cut
}
