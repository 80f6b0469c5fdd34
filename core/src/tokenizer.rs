use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;

lazy_static! {
    // Cross references first so their brackets never split into words.
    static ref PAGE_RE: Regex =
        Regex::new(r"\[\[[^\[]+?\]\]|[\p{L}\p{N}]+'[\p{L}\p{N}]+|[\p{L}\p{N}]+").expect("valid regex");
    static ref WORD_RE: Regex = Regex::new(r"[\p{L}\p{N}]+'[\p{L}\p{N}]+|[\p{L}\p{N}]+").expect("valid regex");
}

/// A `[[target|display]]` or `[[target]]` reference found in page text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossRef {
    pub target: String,
    /// Text that is indexed as words in place of the bracketed reference.
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTokens {
    pub words: Vec<String>,
    pub links: Vec<CrossRef>,
}

/// The text a page is indexed from: its title, followed by the body if there is one.
pub fn source_text<'a>(title: &'a str, body: &str) -> Cow<'a, str> {
    if body.trim().is_empty() {
        Cow::Borrowed(title)
    } else {
        Cow::Owned(format!("{} {}", title, body.trim()))
    }
}

/// Split a page into raw word tokens and cross references.
///
/// Cross references are pulled out of the word stream; their display text is
/// tokenized again and appended after the plain words, in document order.
pub fn tokenize_page(title: &str, body: &str) -> PageTokens {
    let text = source_text(title, body);
    let mut tokens = PageTokens::default();
    for mat in PAGE_RE.find_iter(&text) {
        match parse_cross_ref(mat.as_str()) {
            Some(link) => tokens.links.push(link),
            None => tokens.words.push(mat.as_str().to_string()),
        }
    }
    for link in &tokens.links {
        tokens.words.extend(tokenize_words(&link.text));
    }
    tokens
}

/// Plain word tokens only. Used for query text.
pub fn tokenize_words(text: &str) -> Vec<String> {
    WORD_RE.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

fn parse_cross_ref(token: &str) -> Option<CrossRef> {
    let inner = token.strip_prefix("[[")?.strip_suffix("]]")?;
    let (target, text) = inner.split_once('|').unwrap_or((inner, inner));
    Some(CrossRef { target: target.trim().to_string(), text: text.to_string() })
}
