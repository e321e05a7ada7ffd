//! List endpoints answer either a bare array or a `{results, next}` envelope.
//! [`Page`] resolves that once; [`fetch_all`] hides paging from callers.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

use crate::client::{ApiClient, Query};
use crate::response::ApiResponse;

/// Location of the next page, as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(next: impl Into<String>) -> Self {
        Self(next.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Page<T> {
    List(Vec<T>),
    Paged { items: Vec<T>, next: Option<Cursor> },
}

impl<T> Page<T> {
    pub fn into_parts(self) -> (Vec<T>, Option<Cursor>) {
        match self {
            Self::List(items) => (items, None),
            Self::Paged { items, next } => (items, next),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPage<T> {
    List(Vec<T>),
    Paged {
        results: Vec<T>,
        #[serde(default)]
        next: Option<String>,
    },
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Page<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawPage::deserialize(deserializer)? {
            RawPage::List(items) => Page::List(items),
            RawPage::Paged { results, next } => Page::Paged {
                items: results,
                next: next.filter(|n| !n.is_empty()).map(Cursor),
            },
        })
    }
}

/// GET `path` and follow `next` cursors until exhausted.
///
/// Any page failure fails the whole fetch with that page's error. A cursor
/// resolving to a page already fetched, the first one included, ends the loop.
pub async fn fetch_all<T: DeserializeOwned>(
    client: &ApiClient,
    path: &str,
    query: Query<'_>,
) -> ApiResponse<Vec<T>> {
    let mut items = Vec::new();
    let mut seen: Vec<String> = client
        .url_for(path)
        .map(|url| page_key(url, query))
        .into_iter()
        .collect();
    let mut page = client.get::<Page<T>>(path, query).await;

    loop {
        let (batch, next) = match page {
            ApiResponse::Success(page) => page.into_parts(),
            ApiResponse::Failure(message) => return ApiResponse::Failure(message),
        };
        items.extend(batch);

        let Some(cursor) = next else { break };
        let key = match client.url_for(cursor.as_str()) {
            Ok(url) => url,
            Err(e) => return ApiResponse::Failure(e.user_message()),
        };
        if seen.contains(&key) {
            warn!(path, next = cursor.as_str(), "Pagination cursor repeated, stopping");
            break;
        }
        debug!(path, next = cursor.as_str(), "Following pagination cursor");
        page = client.get::<Page<T>>(cursor.as_str(), &[]).await;
        seen.push(key);
    }

    ApiResponse::Success(items)
}

/// The first request's query travels separately; fold it into the URL so a
/// cursor echoing page one compares equal.
fn page_key(mut url: String, query: Query<'_>) -> String {
    for (i, (name, value)) in query.iter().enumerate() {
        url.push(if i == 0 && !url.contains('?') { '?' } else { '&' });
        url.push_str(name);
        url.push('=');
        url.push_str(value);
    }
    url
}
