//! Engine text markup
//!
//! Responses carry a handful of inline tags: `<b>`, `<i>`, `<u>`, `<st>`,
//! `<center>` and `<right>`. Parsing is forgiving in the tag-soup sense:
//! unknown tags vanish but keep their text, stray closing tags are ignored and
//! unclosed tags run to the end. Self-closing tags style nothing and
//! character entities (`&amp;`, `&#233;`, `&#xE9;`) are decoded.

use std::borrow::Cow;

/// Style carried by a span of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Center,
    Right,
}

impl Style {
    fn from_tag(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "b" => Some(Style::Bold),
            "i" => Some(Style::Italic),
            "u" => Some(Style::Underline),
            "st" => Some(Style::Strikethrough),
            "center" => Some(Style::Center),
            "right" => Some(Style::Right),
            _ => None,
        }
    }
}

/// A run of text with the styles active over it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub styles: Vec<Style>,
}

/// Parsed engine output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledText {
    pub spans: Vec<Span>,
}

impl StyledText {
    /// Text without any markup
    pub fn plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// One exchange shown to the player: what they typed and what the game said
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub command: String,
    pub response: StyledText,
}

impl Paragraph {
    pub fn new(command: impl Into<String>, response: &str) -> Self {
        Self {
            command: command.into(),
            response: parse_markup(response),
        }
    }
}

enum Token<'a> {
    Text(&'a str),
    Open(&'a str),
    Close(&'a str),
}

fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = source;

    while !rest.is_empty() {
        let Some(start) = rest.find('<') else {
            tokens.push(Token::Text(rest));
            break;
        };
        if start > 0 {
            tokens.push(Token::Text(&rest[..start]));
        }
        let after = &rest[start + 1..];
        let Some(end) = after.find('>') else {
            // No closing bracket: the rest is literal text
            tokens.push(Token::Text(&rest[start..]));
            break;
        };
        let inner = after[..end].trim();
        if let Some(name) = inner.strip_prefix('/') {
            tokens.push(Token::Close(tag_name(name)));
        } else if is_tag_like(inner) {
            if !inner.ends_with('/') {
                tokens.push(Token::Open(tag_name(inner)));
            }
        } else {
            // "a < b > c" style text, keep the bracket literally
            tokens.push(Token::Text(&rest[start..start + 1]));
            rest = after;
            continue;
        }
        rest = &after[end + 1..];
    }
    tokens
}

fn tag_name(inner: &str) -> &str {
    let inner = inner.trim().trim_end_matches('/');
    inner.split_whitespace().next().unwrap_or("")
}

fn is_tag_like(inner: &str) -> bool {
    inner
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
}

fn entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        }
    }
}

/// Unknown or malformed entities stay as written
fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let decoded = after
            .find(';')
            .and_then(|end| entity(&after[..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &after[end + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Parse engine markup into styled spans
pub fn parse_markup(source: &str) -> StyledText {
    let mut spans: Vec<Span> = Vec::new();
    let mut active: Vec<Style> = Vec::new();

    for token in tokenize(source) {
        match token {
            Token::Text(text) => {
                if text.is_empty() {
                    continue;
                }
                let text = decode_entities(text);
                match spans.last_mut() {
                    Some(last) if last.styles == active => last.text.push_str(&text),
                    _ => spans.push(Span {
                        text: text.into_owned(),
                        styles: active.clone(),
                    }),
                }
            }
            Token::Open(name) => {
                if let Some(style) = Style::from_tag(name) {
                    active.push(style);
                }
            }
            Token::Close(name) => {
                if let Some(style) = Style::from_tag(name) {
                    if let Some(pos) = active.iter().rposition(|s| *s == style) {
                        active.remove(pos);
                    }
                }
            }
        }
    }

    StyledText { spans }
}
