//! News headline model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::locale::Language;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    /// Headline without a trailing " - Source" suffix
    pub title: String,
    pub url: String,
    pub source: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl NewsArticle {
    /// Publication time as "day month hour:minute", empty when unknown
    #[must_use]
    pub fn display_time(&self) -> String {
        self.published_at
            .map(|ts| ts.format("%d %m %H:%M").to_string())
            .unwrap_or_default()
    }
}

/// Top-headline categories the news provider supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    #[default]
    General,
    Business,
    Entertainment,
    Health,
    Science,
    Sports,
    Technology,
}

const CATEGORIES: [(NewsCategory, &str, &str); 7] = [
    (NewsCategory::General, "general", "загальні"),
    (NewsCategory::Business, "business", "бізнес"),
    (NewsCategory::Entertainment, "entertainment", "розваги"),
    (NewsCategory::Health, "health", "здоров'я"),
    (NewsCategory::Science, "science", "наука"),
    (NewsCategory::Sports, "sports", "спорт"),
    (NewsCategory::Technology, "technology", "технології"),
];

impl NewsCategory {
    /// Accepts the provider identifier or the Ukrainian display name
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_lowercase();
        CATEGORIES
            .iter()
            .find(|(_, en, uk)| *en == value || *uk == value)
            .map(|(category, _, _)| *category)
    }

    /// Identifier used in provider requests
    #[must_use]
    pub fn as_str(self) -> &'static str {
        CATEGORIES
            .iter()
            .find(|(category, _, _)| *category == self)
            .map_or("general", |(_, en, _)| *en)
    }

    #[must_use]
    pub fn display_name(self, language: Language) -> &'static str {
        let Some((_, en, uk)) = CATEGORIES.iter().find(|(category, _, _)| *category == self) else {
            return self.as_str();
        };
        match language {
            Language::En => en,
            Language::Uk => uk,
        }
    }

    pub fn all() -> impl Iterator<Item = NewsCategory> {
        CATEGORIES.iter().map(|(category, _, _)| *category)
    }
}

impl fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case("general", Some(NewsCategory::General))]
    #[case("Sports", Some(NewsCategory::Sports))]
    #[case("наука", Some(NewsCategory::Science))]
    #[case("здоров'я", Some(NewsCategory::Health))]
    #[case("politics", None)]
    fn test_category_parse(#[case] input: &str, #[case] expected: Option<NewsCategory>) {
        assert_eq!(NewsCategory::parse(input), expected);
    }

    #[test]
    fn test_category_names() {
        assert_eq!(NewsCategory::Technology.as_str(), "technology");
        assert_eq!(NewsCategory::Technology.display_name(Language::Uk), "технології");
        assert_eq!(NewsCategory::all().count(), 7);
    }

    #[test]
    fn test_display_time() {
        let article = NewsArticle {
            title: "Headline".to_string(),
            url: "https://example.com".to_string(),
            source: "Reuters".to_string(),
            published_at: Some(Utc.with_ymd_and_hms(2024, 7, 6, 15, 4, 0).unwrap()),
        };
        assert_eq!(article.display_time(), "06 07 15:04");

        let undated = NewsArticle {
            published_at: None,
            ..article
        };
        assert_eq!(undated.display_time(), "");
    }
}
