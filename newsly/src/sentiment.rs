use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentiment label attached to a news article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Negative => write!(f, "negative"),
            Sentiment::Neutral => write!(f, "neutral"),
        }
    }
}

pub static POSITIVE_WORDS: &[&str] = &[
    "success", "win", "growth", "breakthrough", "innovation",
    "positive", "gain", "rise", "boost", "improve",
];

pub static NEGATIVE_WORDS: &[&str] = &[
    "crisis", "crash", "fail", "loss", "decline",
    "threat", "risk", "concern", "warning", "drop",
];

fn count_matches(text: &str, words: &[&str]) -> usize {
    words.iter().filter(|word| text.contains(*word)).count()
}

/// Score an article from its title and description.
///
/// Both parts are joined with a space and lower-cased; each word list is
/// matched by substring containment and the larger count wins.
pub fn score_sentiment(title: &str, description: &str) -> Sentiment {
    let text = format!("{} {}", title, description).to_lowercase();

    let positive = count_matches(&text, POSITIVE_WORDS);
    let negative = count_matches(&text, NEGATIVE_WORDS);

    if positive > negative {
        Sentiment::Positive
    } else if negative > positive {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}
