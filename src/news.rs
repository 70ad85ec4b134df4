//! News fetcher
//!
//! Top headlines per category and country from NewsAPI, cached for a day. The
//! feed often repeats the source at the end of the title ("Headline - Reuters");
//! that suffix is split off and used as the source.

use crate::cache::{Cache, Ttl, cache_key};
use crate::http::ApiClient;
use crate::models::{NewsArticle, NewsCategory};
use crate::status_map;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

const NEWS_TTL: Ttl = Ttl::Seconds(86_400);

/// Split a trailing `" - Source"` off a headline.
///
/// Returns the trimmed headline and the source when the part after the last
/// `" - "` is non-empty and contains no dash.
#[must_use]
pub fn split_source(title: &str) -> Option<(&str, &str)> {
    let idx = title.rfind(" - ")?;
    let suffix = &title[idx + 3..];
    let source = suffix.trim();
    if source.is_empty() || suffix.contains('-') {
        return None;
    }
    Some((title[..idx].trim_end(), source))
}

#[derive(Clone)]
pub struct NewsFetcher {
    client: ApiClient,
    cache: Cache,
    base_url: String,
    api_key: String,
}

impl NewsFetcher {
    pub fn new(client: ApiClient, cache: Cache, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            cache,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Headlines for one category and country (ISO alpha-2, any case)
    #[instrument(skip(self))]
    pub async fn fetch(&self, category: NewsCategory, country: &str) -> crate::Result<Vec<NewsArticle>> {
        let country = country.trim().to_lowercase();
        let key = cache_key("news", &[category.as_str(), &country]);

        // An empty list is served but not cached, so the next request retries
        let this = self.clone();
        self.cache
            .get_or_try_insert_where(
                &key,
                NEWS_TTL,
                move || async move { this.fetch_uncached(category, &country).await },
                |articles: &Vec<NewsArticle>| !articles.is_empty(),
            )
            .await
    }

    async fn fetch_uncached(&self, category: NewsCategory, country: &str) -> crate::Result<Vec<NewsArticle>> {
        let url = format!(
            "{}/top-headlines?country={}&category={}&apiKey={}",
            self.base_url,
            urlencoding::encode(country),
            category.as_str(),
            urlencoding::encode(&self.api_key)
        );

        let response: newsapi::Response = self.client.get_json(&status_map::NEWS, &url).await?;
        let total = response.articles.len();
        let articles: Vec<NewsArticle> = response
            .articles
            .into_iter()
            .filter_map(newsapi::RawArticle::into_article)
            .collect();

        debug!(total, kept = articles.len(), "Fetched headlines");
        Ok(articles)
    }
}

/// Raw NewsAPI structures
mod newsapi {
    use super::{DateTime, NewsArticle, Utc, split_source};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct Response {
        #[serde(default)]
        pub articles: Vec<RawArticle>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RawArticle {
        pub title: Option<String>,
        pub url: Option<String>,
        pub source: Option<Source>,
        pub published_at: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Source {
        pub name: Option<String>,
    }

    impl RawArticle {
        /// `None` for articles without a title or link
        pub fn into_article(self) -> Option<NewsArticle> {
            let raw_title = self.title.filter(|t| !t.trim().is_empty())?;
            let url = self.url.filter(|u| !u.trim().is_empty())?;
            let feed_source = self.source.and_then(|s| s.name).unwrap_or_default();

            let (title, source) = match split_source(&raw_title) {
                Some((title, source)) if !title.is_empty() => (title.to_string(), source.to_string()),
                _ => (raw_title.clone(), feed_source),
            };

            let published_at = self
                .published_at
                .as_deref()
                .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
                .map(|ts| ts.with_timezone(&Utc));

            Some(NewsArticle {
                title,
                url,
                source,
                published_at,
            })
        }
    }
}
