//! Place-name translation
//!
//! Best-effort lookup of a place's name in another language through the
//! Wikipedia interlanguage links of the English article. The primary name is
//! tried first, then each alternative; when nothing matches the input is
//! returned unchanged. Lookups never fail the caller.

use crate::cache::{Cache, Ttl, cache_key};
use crate::error::{ErrorKind, NexusError, Provider};
use crate::http::ApiClient;
use crate::locale::Language;
use crate::models::{GeoResult, PlaceNames};
use crate::status_map;
use std::fmt;
use std::future::Future;
use tracing::{debug, instrument, warn};

/// What kind of place a name refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationKind {
    City,
    Region,
    Country,
}

impl TranslationKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::City => "city",
            Self::Region => "region",
            Self::Country => "country",
        }
    }
}

impl fmt::Display for TranslationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Try `resolve` on each candidate in order and return the first hit.
///
/// `Ok(None)` means "not found, try the next one". Errors are logged and
/// treated the same way.
pub async fn first_success<C, T, F, Fut>(candidates: impl IntoIterator<Item = C>, mut resolve: F) -> Option<T>
where
    C: fmt::Display,
    F: FnMut(C) -> Fut,
    Fut: Future<Output = crate::Result<Option<T>>>,
{
    for candidate in candidates {
        let label = candidate.to_string();
        match resolve(candidate).await {
            Ok(Some(found)) => return Some(found),
            Ok(None) => debug!(candidate = %label, "No match, trying next candidate"),
            Err(e) => warn!(candidate = %label, "Lookup failed, trying next candidate: {e}"),
        }
    }
    None
}

/// Strip parenthetical qualifiers and trailing comma clauses:
/// `"Київ (місто)"` and `"Київ, Україна"` both become `"Київ"`.
#[must_use]
pub fn clean_title(title: &str) -> String {
    let mut stripped = String::with_capacity(title.len());
    let mut depth = 0usize;
    for ch in title.chars() {
        match ch {
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            _ if depth == 0 => stripped.push(ch),
            _ => {}
        }
    }
    let head = stripped.split(',').next().unwrap_or_default();
    head.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Clone)]
pub struct NameTranslator {
    client: ApiClient,
    cache: Cache,
    base_url: String,
    ttl: Ttl,
}

impl NameTranslator {
    pub fn new(client: ApiClient, cache: Cache, base_url: impl Into<String>, ttl: Ttl) -> Self {
        Self {
            client,
            cache,
            base_url: base_url.into(),
            ttl,
        }
    }

    /// Translate `name` into `language`, falling back to `alternatives` and
    /// finally to `name` itself. Only successful lookups are cached.
    #[instrument(skip(self, alternatives))]
    pub async fn translate(
        &self,
        name: &str,
        alternatives: &[String],
        kind: TranslationKind,
        language: Language,
    ) -> String {
        if language == Language::En || name.trim().is_empty() {
            return name.to_string();
        }

        let key = cache_key("translation", &[kind.as_str(), name, language.code()]);
        let candidates: Vec<String> = std::iter::once(name.to_string())
            .chain(alternatives.iter().cloned())
            .collect();
        let this = self.clone();
        let original = name.to_string();

        let found = self
            .cache
            .get_or_try_insert_with(&key, self.ttl, move || async move {
                let resolve = move |title: String| {
                    let this = this.clone();
                    async move { this.lookup(&title, language).await }
                };
                first_success(candidates, resolve).await.ok_or_else(|| {
                    NexusError::api(
                        Provider::Translation,
                        ErrorKind::NotFound,
                        None,
                        format!("no {language} name for {kind} '{original}'"),
                    )
                })
            })
            .await;

        match found {
            Ok(translated) => translated,
            Err(e) => {
                debug!("Keeping original name: {e}");
                name.to_string()
            }
        }
    }

    /// Localized city, region and country names for a resolved city
    pub async fn place_names(&self, geo: &GeoResult, language: Language) -> PlaceNames {
        let placeholder = language.placeholder();
        if language == Language::En {
            return PlaceNames {
                city: geo.city_en.clone(),
                region: geo.region.clone().unwrap_or_else(|| placeholder.to_string()),
                country: geo.country_name.clone(),
            };
        }

        let mut city_alternatives = Vec::new();
        if let Some(region) = &geo.region {
            city_alternatives.push(format!("{}, {region}", geo.city_en));
        }
        city_alternatives.push(format!("{}, {}", geo.city_en, geo.country_name));
        let city = self
            .translate(&geo.city_en, &city_alternatives, TranslationKind::City, language)
            .await;

        let region = match &geo.region {
            Some(region) => {
                let alternatives = [
                    format!("{region} Oblast"),
                    format!("{region}, {}", geo.country_name),
                ];
                self.translate(region, &alternatives, TranslationKind::Region, language)
                    .await
            }
            None => placeholder.to_string(),
        };

        let country = match language.country_name(&geo.country_code) {
            Some(known) => known.to_string(),
            None => {
                self.translate(&geo.country_name, &[], TranslationKind::Country, language)
                    .await
            }
        };

        PlaceNames { city, region, country }
    }

    async fn lookup(&self, title: &str, language: Language) -> crate::Result<Option<String>> {
        let url = format!(
            "{}/api.php?action=query&titles={}&prop=langlinks&lllang={}&format=json",
            self.base_url,
            urlencoding::encode(title),
            language.code()
        );
        let response: wikipedia::Response = self.client.get_json(&status_map::TRANSLATION, &url).await?;
        Ok(response.langlink(language.code()).map(|t| clean_title(&t)).filter(|t| !t.is_empty()))
    }
}

/// Raw MediaWiki query structures
mod wikipedia {
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Deserialize)]
    pub struct Response {
        pub query: Option<Query>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Query {
        #[serde(default)]
        pub pages: HashMap<String, Page>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Page {
        #[serde(default)]
        pub langlinks: Vec<LangLink>,
    }

    #[derive(Debug, Deserialize)]
    pub struct LangLink {
        pub lang: String,
        #[serde(rename = "*")]
        pub title: String,
    }

    impl Response {
        pub fn langlink(self, lang: &str) -> Option<String> {
            self.query?
                .pages
                .into_values()
                .flat_map(|page| page.langlinks)
                .find(|link| link.lang == lang)
                .map(|link| link.title)
        }
    }
}
