use crate::core::query::Query;
use crate::domain::model::{parse_timestamp, Item, Label, Record};
use crate::utils::error::{FirehoseError, Result};
use crate::utils::text::strip_tags;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use url::Url;

/// Client for the tabular-query service, merging every collection into
/// one reverse-chronological stream.
pub struct Firehose {
    base_url: Url,
    token: String,
    client: Client,
}

impl Firehose {
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            token: token.to_string(),
            client: Client::new(),
        })
    }

    /// Everything, I mean everything: fetch all collections and merge
    /// them newest-first.
    ///
    /// The fetches run strictly in sequence and there is no partial
    /// result: one failing collection aborts the whole stream.
    pub async fn firehose(&self) -> Result<Vec<Item>> {
        let releases = self
            .fetch_collection("/github/releases.json?_labels=on")
            .await?;
        let bookmarks = self.fetch_collection("/mastodon/bookmarks.json").await?;
        let favorites = self.fetch_collection("/mastodon/favorites.json").await?;

        let mut items: Vec<Item> = map_releases(releases)
            .chain(map_bookmarks(bookmarks))
            .chain(map_favorites(favorites))
            .collect();
        items.sort();
        Ok(items)
    }

    /// Fetch one collection as raw rows. An endpoint that yields no
    /// rows comes back as an empty vec, not an error.
    pub async fn fetch_collection(&self, endpoint: &str) -> Result<Vec<Record>> {
        let url = self.request_url(endpoint)?;
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        parse_rows(&body)
    }

    /// Canonical request URL for an endpoint, forcing array output.
    ///
    /// A path-only endpoint resolves against the configured instance;
    /// a full URL is used verbatim, so another deployment of the same
    /// kind of API can be queried without code changes.
    pub fn request_url(&self, endpoint: &str) -> Result<String> {
        let mut query = Query::parse(endpoint)?;
        query.set_shape("array");
        let url = query.to_url();

        if query.host.is_empty() {
            Ok(self.base_url.join(&url)?.to_string())
        } else {
            Ok(url)
        }
    }
}

fn parse_rows(body: &str) -> Result<Vec<Record>> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    match value {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::Array(rows) => rows
            .into_iter()
            .map(|row| match row {
                serde_json::Value::Object(data) => Ok(Record { data }),
                other => Err(FirehoseError::UnexpectedBody {
                    got: format!("array of {}", json_type(&other)),
                }),
            })
            .collect(),
        other => Err(FirehoseError::UnexpectedBody {
            got: json_type(&other).to_string(),
        }),
    }
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Map code-hosting release rows into items.
pub fn map_releases(records: Vec<Record>) -> impl Iterator<Item = Item> {
    records.into_iter().map(|record| Item {
        title: format!(
            "{} {}",
            record.nested_str("repo", "label").unwrap_or("unknown"),
            record.str_field("tag_name").unwrap_or_default()
        ),
        description: record.str_field("body").unwrap_or_default().to_string(),
        label: Label::Release,
        timestamp: record.str_field("published_at").and_then(parse_timestamp),
        link: record.str_field("html_url").map(String::from),
    })
}

pub fn map_bookmarks(records: Vec<Record>) -> impl Iterator<Item = Item> {
    map_statuses(records, Label::Bookmark)
}

pub fn map_favorites(records: Vec<Record>) -> impl Iterator<Item = Item> {
    map_statuses(records, Label::Favorite)
}

/// Bookmarks and favorites share the status row shape.
fn map_statuses(records: Vec<Record>, label: Label) -> impl Iterator<Item = Item> {
    records.into_iter().map(move |record| {
        let link = record.str_field("url").map(|url| match record.display_field("id") {
            Some(id) => format!("{}/{}", url, id),
            None => url.to_string(),
        });
        Item {
            // TODO: stripping tags loses links in the status body;
            // keep the hrefs around once plain output can render them.
            title: format!("🐘 {}", record.str_field("username").unwrap_or("unknown")),
            description: strip_tags(record.str_field("content").unwrap_or_default()),
            label,
            timestamp: record.str_field("created_at").and_then(parse_timestamp),
            link,
        }
    })
}
