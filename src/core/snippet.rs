use crate::domain::model::Review;
use regex::Regex;
use std::sync::OnceLock;

pub const MAX_SNIPPET_CHARS: usize = 200;
const TRUNCATED_CHARS: usize = 197;
const ELLIPSIS: char = '…';

fn whitespace_regex() -> &'static Regex {
    static WS_RE: OnceLock<Regex> = OnceLock::new();
    WS_RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

fn review_text(review: &Review) -> &str {
    review.text.as_deref().unwrap_or("")
}

/// 挑出評分最高、同分時最長的評論，並正規化為摘要
pub fn best_snippet(reviews: &[Review]) -> String {
    let mut best: Option<&Review> = None;
    for review in reviews {
        let better = match best {
            None => true,
            Some(current) => {
                let key = (review.rating, review_text(review).chars().count());
                let current_key = (current.rating, review_text(current).chars().count());
                key > current_key
            }
        };
        if better {
            best = Some(review);
        }
    }

    let Some(review) = best else {
        return String::new();
    };

    let text = whitespace_regex()
        .replace_all(review_text(review).trim(), " ")
        .into_owned();

    if text.chars().count() > MAX_SNIPPET_CHARS {
        let mut truncated: String = text.chars().take(TRUNCATED_CHARS).collect();
        truncated.push(ELLIPSIS);
        truncated
    } else {
        text
    }
}
