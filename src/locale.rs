//! Display-language support
//!
//! Everything the aggregation layer hands to the presentation layer is
//! rendered in one of two languages. This module owns the lookup tables for
//! placeholders, calendar names, moon phases and the display names of
//! currencies and news countries.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display language of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Uk,
}

impl Language {
    /// Parse a language code, falling back to English for anything unknown
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "uk" | "ua" => Self::Uk,
            _ => Self::En,
        }
    }

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Uk => "uk",
        }
    }

    /// Value shown in place of a missing upstream field
    #[must_use]
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::En => "N/A",
            Self::Uk => "н/д",
        }
    }

    #[must_use]
    pub fn weekday_name(self, weekday: Weekday) -> &'static str {
        let idx = weekday.num_days_from_monday() as usize;
        match self {
            Self::En => EN_WEEKDAYS[idx],
            Self::Uk => UK_WEEKDAYS[idx],
        }
    }

    /// Month name as used after a day number ("6 липня" in Ukrainian)
    #[must_use]
    pub fn month_name(self, month: u32) -> &'static str {
        let idx = (month.clamp(1, 12) - 1) as usize;
        match self {
            Self::En => EN_MONTHS[idx],
            Self::Uk => UK_MONTHS_GENITIVE[idx],
        }
    }

    /// Localized moon phase; unknown phases are returned unchanged
    #[must_use]
    pub fn moon_phase(self, phase: &str) -> String {
        let Some((_, uk)) = MOON_PHASES
            .iter()
            .find(|(en, _)| en.eq_ignore_ascii_case(phase.trim()))
        else {
            return phase.to_string();
        };
        match self {
            Self::En => phase.trim().to_string(),
            Self::Uk => (*uk).to_string(),
        }
    }

    /// Display name of a currency code, if it is one the portal shows
    #[must_use]
    pub fn currency_name(self, code: &str) -> Option<&'static str> {
        let code = code.to_ascii_uppercase();
        CURRENCY_NAMES
            .iter()
            .find(|(c, _, _)| *c == code)
            .map(|(_, en, uk)| match self {
                Self::En => *en,
                Self::Uk => *uk,
            })
    }

    /// Display name of a supported news country (ISO alpha-2, any case)
    #[must_use]
    pub fn country_name(self, code: &str) -> Option<&'static str> {
        let code = code.to_ascii_lowercase();
        NEWS_COUNTRIES
            .iter()
            .find(|(c, _, _)| *c == code)
            .map(|(_, en, uk)| match self {
                Self::En => *en,
                Self::Uk => *uk,
            })
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Localized label of a forecast day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayLabel {
    pub weekday: String,
    pub day: u32,
    pub month: String,
}

impl DayLabel {
    #[must_use]
    pub fn new(date: NaiveDate, language: Language) -> Self {
        Self {
            weekday: language.weekday_name(date.weekday()).to_string(),
            day: date.day(),
            month: language.month_name(date.month()).to_string(),
        }
    }
}

/// Country codes the news feed can be requested for
#[must_use]
pub fn supported_news_countries() -> impl Iterator<Item = &'static str> {
    NEWS_COUNTRIES.iter().map(|(code, _, _)| *code)
}

const EN_WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const UK_WEEKDAYS: [&str; 7] = [
    "понеділок",
    "вівторок",
    "середа",
    "четвер",
    "п'ятниця",
    "субота",
    "неділя",
];

const EN_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const UK_MONTHS_GENITIVE: [&str; 12] = [
    "січня",
    "лютого",
    "березня",
    "квітня",
    "травня",
    "червня",
    "липня",
    "серпня",
    "вересня",
    "жовтня",
    "листопада",
    "грудня",
];

const MOON_PHASES: [(&str, &str); 8] = [
    ("New Moon", "Новий місяць"),
    ("Waxing Crescent", "Молодий Місяць"),
    ("First Quarter", "Перша чверть"),
    ("Waxing Gibbous", "Прибуваючий Місяць"),
    ("Full Moon", "Повний місяць"),
    ("Waning Gibbous", "Спадаючий Місяць"),
    ("Last Quarter", "Остання чверть"),
    ("Waning Crescent", "Старий Місяць"),
];

const CURRENCY_NAMES: [(&str, &str, &str); 7] = [
    ("USD", "US Dollar", "долар США"),
    ("EUR", "Euro", "євро"),
    ("GBP", "British Pound", "британський фунт"),
    ("PLN", "Polish Zloty", "польський злотий"),
    ("CHF", "Swiss Franc", "швейцарський франк"),
    ("CZK", "Czech Koruna", "чеська крона"),
    ("UAH", "Ukrainian Hryvnia", "українська гривня"),
];

const NEWS_COUNTRIES: [(&str, &str, &str); 6] = [
    ("ua", "Ukraine", "Україна"),
    ("us", "USA", "США"),
    ("gb", "United Kingdom", "Велика Британія"),
    ("fr", "France", "Франція"),
    ("de", "Germany", "Німеччина"),
    ("pl", "Poland", "Польща"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("en", Language::En)]
    #[case("uk", Language::Uk)]
    #[case("UA", Language::Uk)]
    #[case("de", Language::En)]
    #[case("", Language::En)]
    fn test_language_from_code(#[case] code: &str, #[case] expected: Language) {
        assert_eq!(Language::from_code(code), expected);
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(Language::En.placeholder(), "N/A");
        assert_eq!(Language::Uk.placeholder(), "н/д");
    }

    #[test]
    fn test_day_label() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 6).unwrap();
        let en = DayLabel::new(date, Language::En);
        assert_eq!(en.weekday, "Saturday");
        assert_eq!(en.day, 6);
        assert_eq!(en.month, "July");

        let uk = DayLabel::new(date, Language::Uk);
        assert_eq!(uk.weekday, "субота");
        assert_eq!(uk.month, "липня");
    }

    #[test]
    fn test_moon_phase() {
        assert_eq!(Language::Uk.moon_phase("Full Moon"), "Повний місяць");
        assert_eq!(Language::En.moon_phase("Full Moon"), "Full Moon");
        assert_eq!(Language::Uk.moon_phase("Blue Moon"), "Blue Moon");
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Language::Uk.currency_name("usd"), Some("долар США"));
        assert_eq!(Language::En.currency_name("XYZ"), None);
        assert_eq!(Language::En.country_name("GB"), Some("United Kingdom"));
        assert_eq!(supported_news_countries().count(), 6);
    }
}
