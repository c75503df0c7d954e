//! Filler text generator
//!
//! Random words from a small vocabulary, shaped as plain text, HTML paragraphs
//! or dropdown-style JSON items.

use serde::Serialize;

use crate::http::QueryParams;

const WORDS: [&str; 19] = [
    "garbage",
    "junk",
    "nonsense",
    "trash",
    "rubbish",
    "debris",
    "detritus",
    "filth",
    "waste",
    "scrap",
    "sewage",
    "slop",
    "sweepings",
    "bits and pieces",
    "odds and ends",
    "rubble",
    "clippings",
    "muck",
    "stuff",
];

const MAX_WORDS: usize = 10_000;
const MAX_PARAGRAPHS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GarbageFormat {
    Text,
    Html,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GarbageRequest {
    pub words: usize,
    pub paragraphs: usize,
    pub format: GarbageFormat,
}

impl GarbageRequest {
    /// `size` words (default 25) in `paragraphs` (default 1), shaped by `return`
    pub fn from_query(query: &QueryParams) -> Self {
        let format = match query.get("return") {
            Some("html") => GarbageFormat::Html,
            Some("json") => GarbageFormat::Json,
            _ => GarbageFormat::Text,
        };
        Self {
            words: query.get_parsed("size").unwrap_or(25).min(MAX_WORDS),
            paragraphs: query
                .get_parsed("paragraphs")
                .unwrap_or(1)
                .clamp(1, MAX_PARAGRAPHS),
            format,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GarbageItem {
    pub id: usize,
    pub label: String,
    pub value: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Garbage {
    Text(String),
    Html(String),
    Items(Vec<GarbageItem>),
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn pick(rng: &mut fastrand::Rng) -> &'static str {
    WORDS[rng.usize(..WORDS.len())]
}

fn paragraph(rng: &mut fastrand::Rng, words: usize) -> String {
    let mut text = (0..words)
        .map(|i| {
            let word = pick(rng);
            if i == 0 {
                capitalize(word)
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    text.push('.');
    text
}

pub fn generate(request: &GarbageRequest, rng: &mut fastrand::Rng) -> Garbage {
    match request.format {
        GarbageFormat::Json => Garbage::Items(
            (0..request.words)
                .map(|id| {
                    let word = pick(rng);
                    GarbageItem {
                        id,
                        label: capitalize(word),
                        value: format!("{id}-{}", word.replace(' ', "-")),
                        selected: false,
                    }
                })
                .collect(),
        ),
        GarbageFormat::Text => Garbage::Text(
            (0..request.paragraphs)
                .map(|_| paragraph(rng, request.words))
                .collect::<Vec<_>>()
                .join(" "),
        ),
        GarbageFormat::Html => Garbage::Html(
            (0..request.paragraphs)
                .map(|_| format!("<p>{}</p>", paragraph(rng, request.words)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(raw: &str) -> GarbageRequest {
        GarbageRequest::from_query(&QueryParams::parse(Some(raw)))
    }

    #[test]
    fn test_defaults() {
        let req = request("");
        assert_eq!(req.words, 25);
        assert_eq!(req.paragraphs, 1);
        assert_eq!(req.format, GarbageFormat::Text);
    }

    #[test]
    fn test_text() {
        let mut rng = fastrand::Rng::with_seed(7);
        let Garbage::Text(text) = generate(&request("size=4&paragraphs=2"), &mut rng) else {
            panic!("expected text");
        };
        let paragraphs: Vec<&str> = text.split(". ").collect();
        assert_eq!(paragraphs.len(), 2);
        assert!(text.ends_with('.'));
        assert!(text.chars().next().unwrap().is_uppercase());
    }

    #[test]
    fn test_html() {
        let mut rng = fastrand::Rng::with_seed(7);
        let Garbage::Html(html) = generate(&request("size=3&paragraphs=3&return=html"), &mut rng)
        else {
            panic!("expected html");
        };
        assert_eq!(html.matches("<p>").count(), 3);
        assert!(html.ends_with(".</p>"));
    }

    #[test]
    fn test_json_items() {
        let mut rng = fastrand::Rng::with_seed(7);
        let Garbage::Items(items) = generate(&request("size=5&return=json"), &mut rng) else {
            panic!("expected items");
        };
        assert_eq!(items.len(), 5);
        for (i, item) in items.iter().enumerate() {
            assert_eq!(item.id, i);
            assert!(item.value.starts_with(&format!("{i}-")));
            assert!(!item.value.contains(' '));
            assert!(!item.selected);
        }
    }

    #[test]
    fn test_same_seed_same_output() {
        let req = request("size=10");
        let a = generate(&req, &mut fastrand::Rng::with_seed(42));
        let b = generate(&req, &mut fastrand::Rng::with_seed(42));
        assert_eq!(a, b);
    }
}
