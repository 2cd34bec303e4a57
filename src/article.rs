//! Defines [`ArticleRecord`] and [`Feed`], the in-memory form of the JSON
//! feed dump produced by the RSS fetcher. Decoding is lenient at the article
//! level: a single malformed item never prevents the rest of the feed from
//! being rendered.

use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Used in place of a missing or empty title.
pub const UNTITLED: &str = "Untitled Article";

/// Used in place of a missing or empty link.
pub const NO_LINK: &str = "#";

/// Accepts any JSON value for an optional text field; anything other than a
/// string (a number, an object, `null`) is treated as absent.
fn deserialize_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match JsonValue::deserialize(deserializer)? {
        JsonValue::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// A media attachment on a feed item. Only the URL is of interest.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Enclosure {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub link: Option<String>,
}

impl Enclosure {
    /// Fetchers emit `{}` or `[]` for items without an attachment. Anything
    /// that isn't an object is treated as no enclosure at all.
    fn deserialize_lenient<'de, D>(
        deserializer: D,
    ) -> std::result::Result<Option<Enclosure>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = JsonValue::deserialize(deserializer)?;
        Ok(serde_json::from_value(value).ok())
    }
}

/// One feed entry. Every field is optional; the accessors apply the
/// documented defaults and treat empty strings as absent.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ArticleRecord {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub link: Option<String>,

    #[serde(default, rename = "pubDate", deserialize_with = "deserialize_text")]
    pub pub_date: Option<String>,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub thumbnail: Option<String>,

    #[serde(default, deserialize_with = "Enclosure::deserialize_lenient")]
    pub enclosure: Option<Enclosure>,
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    match field.as_deref() {
        Some("") | None => None,
        Some(s) => Some(s),
    }
}

impl ArticleRecord {
    pub fn title(&self) -> &str {
        non_empty(&self.title).unwrap_or(UNTITLED)
    }

    pub fn link(&self) -> &str {
        non_empty(&self.link).unwrap_or(NO_LINK)
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    pub fn thumbnail(&self) -> Option<&str> {
        non_empty(&self.thumbnail)
    }

    pub fn enclosure_link(&self) -> Option<&str> {
        self.enclosure.as_ref().and_then(|e| non_empty(&e.link))
    }

    /// The title exactly as supplied, or the empty string. Used for keyword
    /// matching, where the "Untitled Article" placeholder must not count.
    pub fn raw_title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }
}

/// The feed dump: an ordered list of articles. Order is rendering order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Feed {
    pub items: Vec<ArticleRecord>,
}

#[derive(Deserialize)]
struct RawFeed {
    #[serde(default)]
    items: Option<Vec<JsonValue>>,
}

impl Feed {
    /// Opens and decodes the feed dump at `path`.
    pub fn from_path(path: &Path) -> Result<Feed> {
        let file = File::open(path).map_err(|err| Error::Open {
            path: path.to_owned(),
            err,
        })?;
        Feed::from_reader(BufReader::new(file))
    }

    /// Decodes a feed dump. A missing or `null` `items` field is an empty
    /// feed. A field of the wrong type is dropped on its own; an item that
    /// isn't an object at all is logged and replaced by an all-defaults
    /// article so that it still occupies its slot.
    pub fn from_reader<R: Read>(reader: R) -> Result<Feed> {
        let raw: RawFeed = serde_json::from_reader(reader)?;
        Ok(Feed::from_raw(raw))
    }

    pub fn from_json(input: &str) -> Result<Feed> {
        let raw: RawFeed = serde_json::from_str(input)?;
        Ok(Feed::from_raw(raw))
    }

    fn from_raw(raw: RawFeed) -> Feed {
        Feed {
            items: raw
                .items
                .unwrap_or_default()
                .into_iter()
                .enumerate()
                .map(|(index, value)| {
                    serde_json::from_value(value).unwrap_or_else(|err| {
                        warn!(index, error = %err, "item is not a valid article; using defaults");
                        ArticleRecord::default()
                    })
                })
                .collect(),
        }
    }
}

/// The result of decoding a [`Feed`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem reading the feed dump as a whole.
#[derive(Debug)]
pub enum Error {
    /// Returned when the feed file can't be opened.
    Open { path: PathBuf, err: std::io::Error },

    /// Returned when the document isn't JSON, or isn't an object with an
    /// `items` array.
    DeserializeJson(serde_json::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Open { path, err } => {
                write!(f, "Opening feed file '{}': {}", path.display(), err)
            }
            Error::DeserializeJson(err) => write!(f, "Decoding feed: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Open { path: _, err } => Some(err),
            Error::DeserializeJson(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for Error {
    /// Converts a [`serde_json::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_json`] deserialization functions.
    fn from(err: serde_json::Error) -> Error {
        Error::DeserializeJson(err)
    }
}
