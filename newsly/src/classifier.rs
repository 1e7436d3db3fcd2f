use serde::{Deserialize, Serialize};
use std::fmt;

/// Topical category assigned to a piece of news text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Sports,
    Politics,
    Business,
    Technology,
    Health,
    Science,
    Entertainment,
    Education,
    Crime,
    Environment,
    Unknown,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Sports => "sports",
            Category::Politics => "politics",
            Category::Business => "business",
            Category::Technology => "technology",
            Category::Health => "health",
            Category::Science => "science",
            Category::Entertainment => "entertainment",
            Category::Education => "education",
            Category::Crime => "crime",
            Category::Environment => "environment",
            Category::Unknown => "unknown",
        }
    }

    /// Fixed explanatory sentence shown next to a classification.
    pub fn insight(&self) -> &'static str {
        match self {
            Category::Sports => "This news focuses on a sporting event, competition, or performance.",
            Category::Politics => "This news relates to government, leadership, or political processes.",
            Category::Business => "This news discusses economic activity, companies, or financial trends.",
            Category::Technology => "This news highlights advancements or events in technology and innovation.",
            Category::Health => "This news concerns medical, health, or wellness-related topics.",
            Category::Science => "This news is based on scientific research or discoveries.",
            Category::Entertainment => "This news involves movies, music, celebrities, or media.",
            Category::Education => "This news relates to learning, institutions, or academic activities.",
            Category::Crime => "This news reports unlawful activities or legal investigations.",
            Category::Environment => "This news focuses on nature, climate, or environmental issues.",
            Category::Unknown => "This news does not clearly fall into a known category.",
        }
    }

    /// Keywords for this category, empty for `Unknown`.
    pub fn keywords(&self) -> &'static [&'static str] {
        CATEGORIES
            .iter()
            .find(|(category, _)| category == self)
            .map(|(_, keywords)| *keywords)
            .unwrap_or(&[])
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category keyword table. Order matters: on equal match counts the earlier
/// category wins.
pub static CATEGORIES: &[(Category, &[&str])] = &[
    (
        Category::Sports,
        &[
            "cricket", "football", "soccer", "match", "tournament", "goal", "team",
            "series", "final", "ipl", "t20", "odi", "world cup", "player",
            "coach", "stadium", "league", "championship", "score", "won", "defeated",
        ],
    ),
    (
        Category::Politics,
        &[
            "government", "election", "minister", "prime minister", "president",
            "parliament", "policy", "vote", "voting", "bjp", "congress",
            "democracy", "law", "bill", "assembly", "cabinet", "political",
            "campaign", "party", "leader",
        ],
    ),
    (
        Category::Business,
        &[
            "stock", "market", "shares", "company", "revenue", "profit", "loss",
            "startup", "investment", "economy", "economic", "finance", "bank",
            "inflation", "trade", "industry", "corporate", "ceo", "funding",
            "merger", "acquisition",
        ],
    ),
    (
        Category::Technology,
        &[
            "technology", "tech", "ai", "artificial intelligence", "machine learning",
            "google", "apple", "microsoft", "meta", "openai",
            "software", "hardware", "chip", "semiconductor",
            "android", "ios", "app", "application", "robot", "automation",
            "cybersecurity", "cloud", "data",
        ],
    ),
    (
        Category::Health,
        &[
            "health", "hospital", "doctor", "medical", "medicine", "disease",
            "virus", "covid", "pandemic", "vaccine", "mental health",
            "fitness", "nutrition", "treatment", "patient", "surgery",
            "healthcare", "wellness",
        ],
    ),
    (
        Category::Science,
        &[
            "science", "scientist", "research", "experiment", "study",
            "space", "nasa", "isro", "astronomy",
            "physics", "biology", "chemistry", "climate",
            "discovery", "innovation", "laboratory",
        ],
    ),
    (
        Category::Entertainment,
        &[
            "movie", "film", "cinema", "actor", "actress",
            "music", "song", "album", "concert",
            "celebrity", "bollywood", "hollywood",
            "tv", "series", "show", "award", "festival",
        ],
    ),
    (
        Category::Education,
        &[
            "education", "school", "college", "university",
            "student", "teacher", "exam", "examination",
            "result", "syllabus", "degree", "course",
            "admission", "scholarship", "academic",
        ],
    ),
    (
        Category::Crime,
        &[
            "crime", "arrest", "police", "murder", "theft",
            "robbery", "fraud", "scam", "court",
            "investigation", "case", "lawyer",
            "accused", "victim", "illegal",
        ],
    ),
    (
        Category::Environment,
        &[
            "environment", "climate change", "pollution",
            "global warming", "wildlife", "forest",
            "conservation", "carbon", "emission",
            "recycling", "sustainability", "eco",
        ],
    ),
];

const NO_SIGNAL_REASON: &str = "No strong keyword signals detected.";
const INVALID_INPUT_REASON: &str = "No valid text provided for analysis.";
const INVALID_INPUT_INSIGHT: &str = "Unable to analyze the news content.";
const PROCESSING_ERROR_REASON: &str = "Error occurred during news categorization.";
const PROCESSING_ERROR_INSIGHT: &str = "Classification failed due to a processing error.";

/// Result of classifying a piece of text. Field names are part of the JSON
/// contract with the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub category: Category,
    /// 0..=100, 20 points per matched keyword
    pub confidence: u8,
    pub reason: String,
    pub matched_keywords: Vec<String>,
    pub insight: String,
}

impl Classification {
    fn unknown(reason: &str, insight: &str) -> Self {
        Self {
            category: Category::Unknown,
            confidence: 0,
            reason: reason.to_string(),
            matched_keywords: Vec::new(),
            insight: insight.to_string(),
        }
    }

    /// Returned when the caller supplied no usable text.
    pub fn invalid_input() -> Self {
        Self::unknown(INVALID_INPUT_REASON, INVALID_INPUT_INSIGHT)
    }

    /// Returned when the request could not be processed at all.
    pub fn processing_error() -> Self {
        Self::unknown(PROCESSING_ERROR_REASON, PROCESSING_ERROR_INSIGHT)
    }
}

/// Confidence grows by 20 per matched keyword and saturates at 100.
pub fn confidence_for(match_count: usize) -> u8 {
    match_count.saturating_mul(20).min(100) as u8
}

/// Classify free text against the category table.
///
/// Matching is case-insensitive substring containment: "ai" matches inside
/// "against", and multi-word keywords only match when contiguous.
pub fn classify(text: &str) -> Classification {
    let content = text.to_lowercase();

    let mut best: Option<(Category, Vec<&'static str>)> = None;

    for (category, keywords) in CATEGORIES {
        let matches: Vec<&'static str> = keywords
            .iter()
            .copied()
            .filter(|keyword| content.contains(keyword))
            .collect();

        let best_count = best.as_ref().map_or(0, |(_, m)| m.len());
        if matches.len() > best_count {
            best = Some((*category, matches));
        }
    }

    match best {
        Some((category, matches)) => Classification {
            category,
            confidence: confidence_for(matches.len()),
            reason: format!("Detected keywords such as {}", matches.join(", ")),
            matched_keywords: matches.into_iter().map(String::from).collect(),
            insight: category.insight().to_string(),
        },
        None => Classification::unknown(NO_SIGNAL_REASON, Category::Unknown.insight()),
    }
}

/// Classify text coming from an untrusted request body. Absent or empty text
/// yields the invalid-input result without consulting the table.
pub fn classify_input(text: Option<&str>) -> Classification {
    match text {
        Some(t) if !t.is_empty() => classify(t),
        _ => Classification::invalid_input(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn cricket_final_is_sports() {
        let result = classify("India won the cricket world cup final against Australia");
        assert_eq!(result.category, Category::Sports);
        assert_eq!(result.matched_keywords, vec!["cricket", "final", "world cup", "won"]);
        assert_eq!(result.confidence, 80);
        assert_eq!(result.reason, "Detected keywords such as cricket, final, world cup, won");
        assert_eq!(result.insight, Category::Sports.insight());
    }

    #[test]
    fn no_keywords_is_unknown() {
        let result = classify("xyz abc");
        assert_eq!(result.category, Category::Unknown);
        assert_eq!(result.confidence, 0);
        assert!(result.matched_keywords.is_empty());
        assert_eq!(result.reason, "No strong keyword signals detected.");
        assert_eq!(result.insight, "This news does not clearly fall into a known category.");
    }

    #[test]
    fn empty_string_through_core_has_no_signal() {
        let result = classify("");
        assert_eq!(result.category, Category::Unknown);
        assert_eq!(result.reason, NO_SIGNAL_REASON);
    }

    #[test]
    fn missing_or_empty_input_is_invalid() {
        assert_eq!(classify_input(None), Classification::invalid_input());
        assert_eq!(classify_input(Some("")), Classification::invalid_input());

        let invalid = Classification::invalid_input();
        assert_eq!(invalid.reason, "No valid text provided for analysis.");
        assert_eq!(invalid.insight, "Unable to analyze the news content.");
        assert_eq!(invalid.confidence, 0);
    }

    #[test]
    fn fallback_messages_stay_distinct() {
        let invalid = Classification::invalid_input();
        let failed = Classification::processing_error();
        assert_eq!(invalid.category, failed.category);
        assert_ne!(invalid.reason, failed.reason);
        assert_ne!(invalid.insight, failed.insight);
    }

    #[test]
    fn ties_keep_the_earlier_category() {
        // one sports keyword, one politics keyword
        let result = classify("cricket election");
        assert_eq!(result.category, Category::Sports);
        assert_eq!(result.matched_keywords, vec!["cricket"]);
        assert_eq!(result.confidence, 20);

        // input order does not matter
        let result = classify("election cricket");
        assert_eq!(result.category, Category::Sports);
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let result = classify("POLICE ARREST suspect");
        assert_eq!(result.category, Category::Crime);
        assert_eq!(result.matched_keywords, vec!["arrest", "police"]);

        // "ai" inside "against" still counts
        let result = classify("against");
        assert_eq!(result.category, Category::Technology);
        assert_eq!(result.matched_keywords, vec!["ai"]);
    }

    #[test]
    fn phrases_must_be_contiguous() {
        let result = classify("cup of world");
        assert!(!result.matched_keywords.contains(&"world cup".to_string()));
    }

    #[test]
    fn confidence_saturates_at_one_hundred() {
        let result = classify("football match tournament goal team stadium league");
        assert_eq!(result.category, Category::Sports);
        assert!(result.matched_keywords.len() > 5);
        assert_eq!(result.confidence, 100);
    }

    #[test]
    fn confidence_is_bounded_and_stepped() {
        let samples = [
            "",
            "xyz",
            "stock market crash hits bank shares",
            "Hospital doctors warn of new virus as vaccine trial begins",
            "NASA scientists publish research on space physics and climate discovery",
            "India won the cricket world cup final against Australia",
        ];
        for text in samples {
            let c = classify(text).confidence;
            assert!(c <= 100);
            assert!(c % 20 == 0, "confidence {} for {:?}", c, text);
        }
    }

    #[test]
    fn more_matches_never_lower_confidence() {
        let weak = classify("the coach spoke");
        let strong = classify("the coach spoke after the league final at the stadium");
        assert_eq!(weak.category, Category::Sports);
        assert_eq!(strong.category, Category::Sports);
        assert!(strong.matched_keywords.len() > weak.matched_keywords.len());
        assert!(strong.confidence >= weak.confidence);
    }

    #[test]
    fn classify_is_idempotent() {
        let text = "Parliament passes the new education bill";
        assert_eq!(classify(text), classify(text));
    }

    #[test]
    fn table_is_well_formed() {
        let mut seen = HashSet::new();
        for (category, keywords) in CATEGORIES {
            assert!(seen.insert(*category), "duplicate category {}", category);
            assert!(!keywords.is_empty());
            assert_ne!(*category, Category::Unknown);
            for keyword in *keywords {
                assert_eq!(*keyword, keyword.to_lowercase());
            }
        }
        assert_eq!(seen.len(), 10);
        assert!(Category::Unknown.keywords().is_empty());
        assert_eq!(Category::Crime.keywords().first(), Some(&"crime"));
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let json = serde_json::to_value(classify("stock market")).expect("serialize");
        assert_eq!(json["category"], "business");
        assert_eq!(json["confidence"], 40);
        assert_eq!(json["matchedKeywords"], serde_json::json!(["stock", "market"]));
        assert!(json.get("insight").is_some());
    }
}
