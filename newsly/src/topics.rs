use serde::Serialize;

/// Shortcut shown on the dashboard before the first chat message
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TrendingTopic {
    pub name: &'static str,
    /// Search text sent to the chat endpoint when the topic is picked
    pub query: &'static str,
}

pub static TRENDING_TOPICS: &[TrendingTopic] = &[
    TrendingTopic { name: "World News", query: "world" },
    TrendingTopic { name: "AI & Tech", query: "artificial intelligence technology" },
    TrendingTopic { name: "Climate", query: "climate change environment" },
    TrendingTopic { name: "Business", query: "business economy" },
    TrendingTopic { name: "Sports", query: "sports" },
    TrendingTopic { name: "Health", query: "health medical" },
    TrendingTopic { name: "Science", query: "science research" },
];

impl TrendingTopic {
    /// Chat message the dashboard sends for this topic.
    pub fn chat_message(&self) -> String {
        format!("Show me the latest news about {}", self.query)
    }
}
