//! Defines [`Card`], the presentation form of one [`ArticleRecord`]. Building
//! a card never fails: every missing or malformed field has a fallback.

use crate::article::ArticleRecord;
use crate::config::WidgetSettings;
use crate::date::format_pub_date;
use crate::escape::{EscapeHref, EscapeHtml};
use crate::image::{self, Image};
use gtmpl::Value;
use std::collections::HashMap;
use tracing::warn;

/// Appended to descriptions that were cut short.
pub const ELLIPSIS: &str = "...";

pub const READ_MORE: &str = "Read More";
pub const SUBSCRIBE_TO_READ: &str = "Subscribe to Read";
const SUBSCRIBE_ARIA_LABEL: &str = "Subscribe to read premium content";

const ALT_UNAVAILABLE: &str = "Article thumbnail";

/// The shape of the image slot, as a layout class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Aspect {
    Square,
    Video,
}

impl Aspect {
    fn class(self) -> &'static str {
        match self {
            Aspect::Square => "aspect-square",
            Aspect::Video => "aspect-video",
        }
    }
}

/// A rendered-ready article. Fields hold unescaped text; escaping happens on
/// conversion to a template [`Value`].
#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    /// Premium cards show the locked placeholder and link to the upgrade page.
    pub premium: bool,

    /// The picture to show; `None` for premium cards.
    pub image_src: Option<String>,
    pub image_alt: String,
    pub aspect: Aspect,

    pub title: String,

    /// e.g. `Jan 5, 2025`, or empty if the article's date is unusable.
    pub date: String,

    pub description: String,

    pub cta_href: String,
    pub cta_label: &'static str,
    pub cta_aria_label: String,
}

impl Card {
    pub fn new(article: &ArticleRecord, settings: &WidgetSettings) -> Card {
        let title = article.title().to_owned();
        let slot = image::resolve(article, settings);
        let premium = slot.is_premium();
        let (image_src, image_alt, aspect) = match slot {
            Image::Picture(src) => (Some(src.to_owned()), title.clone(), Aspect::Square),
            Image::Locked => (None, String::new(), Aspect::Square),
            Image::Unavailable => (
                Some(settings.fallback_image.clone()),
                ALT_UNAVAILABLE.to_owned(),
                Aspect::Video,
            ),
        };

        let date = match format_pub_date(article.pub_date.as_deref()) {
            Some(date) => date,
            None => {
                if let Some(raw) = &article.pub_date {
                    warn!(
                        pub_date = raw.as_str(),
                        title = title.as_str(),
                        "unparseable pubDate; leaving date blank"
                    );
                }
                String::new()
            }
        };

        let (cta_href, cta_label, cta_aria_label) = match premium {
            true => (
                settings.upgrade_url.clone(),
                SUBSCRIBE_TO_READ,
                SUBSCRIBE_ARIA_LABEL.to_owned(),
            ),
            false => (
                article.link().to_owned(),
                READ_MORE,
                format!("Read full article: {}", title),
            ),
        };

        Card {
            premium,
            image_src,
            image_alt,
            aspect,
            description: truncate(article.description(), settings.description_limit),
            title,
            date,
            cta_href,
            cta_label,
            cta_aria_label,
        }
    }
}

/// Cuts `text` to its first `limit` characters, trims trailing whitespace,
/// and appends [`ELLIPSIS`]. Text within the limit is returned unchanged.
pub fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        None => text.to_owned(),
        Some((end, _)) => {
            let mut out = text[..end].trim_end().to_owned();
            out.push_str(ELLIPSIS);
            out
        }
    }
}

impl From<&Card> for Value {
    /// Converts a [`Card`] into the object the card template renders,
    /// escaping every feed-supplied string on the way.
    fn from(card: &Card) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        let mut insert = |key: &str, value: String| {
            m.insert(key.to_owned(), Value::String(value));
        };
        insert("title", EscapeHtml(&card.title).to_string());
        insert("date", EscapeHtml(&card.date).to_string());
        insert("description", EscapeHtml(&card.description).to_string());
        insert(
            "image_src",
            EscapeHref(card.image_src.as_deref().unwrap_or_default()).to_string(),
        );
        insert("image_alt", EscapeHtml(&card.image_alt).to_string());
        insert("image_aspect", card.aspect.class().to_owned());
        insert("cta_href", EscapeHref(&card.cta_href).to_string());
        insert("cta_label", card.cta_label.to_owned());
        insert("cta_aria_label", EscapeHtml(&card.cta_aria_label).to_string());
        m.insert("premium".to_owned(), Value::Bool(card.premium));
        Value::Object(m)
    }
}
