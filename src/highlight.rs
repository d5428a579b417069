use regex::RegexBuilder;
use std::ops::Range;

pub const HIGHLIGHT_OPEN: &str = r#"<span style="background-color: #FFFF00; color: black; padding: 2px;">"#;
pub const HIGHLIGHT_CLOSE: &str = "</span>";

/// Splits a comma separated keyword list, dropping blank entries.
pub fn parse_keywords(keywords: &str) -> Vec<&str> {
    keywords
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .collect()
}

/// Byte ranges of `text` to highlight, sorted and non-overlapping.
///
/// Keywords are literal and case-insensitive. Every span is found on the
/// original text; a match that overlaps a span claimed by an earlier keyword
/// is dropped, so keyword order decides overlaps.
pub fn find_spans(text: &str, keywords: &str) -> Vec<Range<usize>> {
    let mut spans: Vec<Range<usize>> = Vec::new();

    for keyword in parse_keywords(keywords) {
        let pattern = match RegexBuilder::new(&regex::escape(keyword))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => pattern,
            Err(_) => continue,
        };

        let mut claimed = Vec::new();
        for m in pattern.find_iter(text) {
            let overlaps = spans
                .iter()
                .any(|s| m.start() < s.end && s.start < m.end());
            if !overlaps {
                claimed.push(m.range());
            }
        }
        spans.extend(claimed);
    }

    spans.sort_by_key(|s| s.start);
    spans
}

/// Wraps every keyword occurrence in highlight markup, keeping the casing
/// found in `text`. Returns `text` unchanged when there are no keywords.
pub fn highlight_keywords(text: &str, keywords: &str) -> String {
    render(text, &find_spans(text, keywords), |segment| segment.to_string())
}

/// Same as [`highlight_keywords`] but HTML-escapes the text around and
/// inside the markup, for embedding in a page.
pub fn highlight_keywords_html(text: &str, keywords: &str) -> String {
    render(text, &find_spans(text, keywords), |segment| {
        html_escape::encode_text(segment).into_owned()
    })
}

fn render<F>(text: &str, spans: &[Range<usize>], encode: F) -> String
where
    F: Fn(&str) -> String,
{
    let mut out = String::with_capacity(text.len() + spans.len() * 80);
    let mut cursor = 0;
    for span in spans {
        out.push_str(&encode(&text[cursor..span.start]));
        out.push_str(HIGHLIGHT_OPEN);
        out.push_str(&encode(&text[span.clone()]));
        out.push_str(HIGHLIGHT_CLOSE);
        cursor = span.end;
    }
    out.push_str(&encode(&text[cursor..]));
    out
}
