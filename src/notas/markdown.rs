use pulldown_cmark::{html, Options, Parser};

pub const DEFAULT_SNIPPET_CHARS: usize = 100;

/// Renders CommonMark (plus tables and strikethrough) to HTML.
pub fn render_html(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(text, options);
    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// First `max_chars` characters of the rendered HTML, `...` appended when cut.
pub fn preview_snippet(text: &str, max_chars: usize) -> String {
    let rendered = render_html(text);
    if rendered.chars().count() <= max_chars {
        return rendered;
    }
    let mut snippet: String = rendered.chars().take(max_chars).collect();
    snippet.push_str("...");
    snippet
}
