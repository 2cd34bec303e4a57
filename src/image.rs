//! Decides what goes in the image slot of a card, and with it whether the
//! article is premium. The rules are evaluated in a fixed order and the first
//! match wins:
//!
//! 1. an enclosure link is shown as-is;
//! 2. a thumbnail is shown unless it is the newsletter's generic cover art,
//!    which marks a paywalled post;
//! 3. with no image at all, a premium keyword in the title or description
//!    marks a paywalled post;
//! 4. otherwise the "image not available" fallback is shown.

use crate::article::ArticleRecord;
use crate::config::WidgetSettings;
use tracing::debug;

/// The resolved content of a card's image slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Image<'a> {
    /// A picture taken from the article's own enclosure or thumbnail.
    Picture(&'a str),

    /// The locked "Premium Content" placeholder.
    Locked,

    /// The embedded "Image not available" picture.
    Unavailable,
}

impl Image<'_> {
    pub fn is_premium(&self) -> bool {
        matches!(self, Image::Locked)
    }
}

/// Applies the resolution rules to one article.
pub fn resolve<'a>(article: &'a ArticleRecord, settings: &WidgetSettings) -> Image<'a> {
    if let Some(link) = article.enclosure_link() {
        return Image::Picture(link);
    }

    if let Some(thumbnail) = article.thumbnail() {
        return match is_generic_image(thumbnail, &settings.generic_image_patterns) {
            true => {
                debug!(thumbnail, "generic cover art; treating as premium");
                Image::Locked
            }
            false => Image::Picture(thumbnail),
        };
    }

    match mentions_premium(article, &settings.premium_keywords) {
        true => {
            debug!(title = article.raw_title(), "premium keyword; treating as premium");
            Image::Locked
        }
        false => Image::Unavailable,
    }
}

fn is_generic_image(url: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|p| url.contains(p.as_str()))
}

fn mentions_premium(article: &ArticleRecord, keywords: &[String]) -> bool {
    let title = article.raw_title().to_lowercase();
    let description = article.description().to_lowercase();
    keywords.iter().any(|k| {
        let k = k.to_lowercase();
        title.contains(&k) || description.contains(&k)
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::article::Enclosure;

    const COVER: &str = "https://substackcdn.com/image/fetch/Domingo_Brief_Cover.png";

    fn article() -> ArticleRecord {
        ArticleRecord::default()
    }

    fn enclosure(link: &str) -> Option<Enclosure> {
        Some(Enclosure {
            link: Some(link.to_owned()),
        })
    }

    #[test]
    fn test_enclosure() {
        let a = ArticleRecord {
            enclosure: enclosure("https://x/img.png"),
            ..article()
        };
        let image = resolve(&a, &WidgetSettings::default());
        assert_eq!(Image::Picture("https://x/img.png"), image);
        assert!(!image.is_premium());
    }

    #[test]
    fn test_enclosure_wins_over_generic_thumbnail_and_keywords() {
        let a = ArticleRecord {
            title: Some("Exclusive: premium charts".to_owned()),
            thumbnail: Some(COVER.to_owned()),
            enclosure: enclosure("https://x/img.png"),
            ..article()
        };
        assert_eq!(
            Image::Picture("https://x/img.png"),
            resolve(&a, &WidgetSettings::default())
        );
    }

    #[test]
    fn test_generic_cover_thumbnail_is_locked() {
        let a = ArticleRecord {
            thumbnail: Some(COVER.to_owned()),
            ..article()
        };
        assert_eq!(Image::Locked, resolve(&a, &WidgetSettings::default()));
    }

    #[test]
    fn test_generic_image_path_segment_is_locked() {
        let a = ArticleRecord {
            thumbnail: Some("https://cdn.example.com/p/image.png?w=1200".to_owned()),
            ..article()
        };
        assert_eq!(Image::Locked, resolve(&a, &WidgetSettings::default()));
    }

    #[test]
    fn test_image_png_without_query_is_a_picture() {
        let thumbnail = "https://cdn.example.com/p/image.png";
        let a = ArticleRecord {
            thumbnail: Some(thumbnail.to_owned()),
            ..article()
        };
        assert_eq!(
            Image::Picture(thumbnail),
            resolve(&a, &WidgetSettings::default())
        );
    }

    #[test]
    fn test_plain_thumbnail_ignores_keywords() {
        let a = ArticleRecord {
            title: Some("Premium Insights This Week".to_owned()),
            thumbnail: Some("https://cdn.example.com/chart.png".to_owned()),
            ..article()
        };
        assert_eq!(
            Image::Picture("https://cdn.example.com/chart.png"),
            resolve(&a, &WidgetSettings::default())
        );
    }

    #[test]
    fn test_title_keyword() {
        let a = ArticleRecord {
            title: Some("Premium Insights This Week".to_owned()),
            ..article()
        };
        assert_eq!(Image::Locked, resolve(&a, &WidgetSettings::default()));
    }

    #[test]
    fn test_description_keyword_is_case_insensitive() {
        let a = ArticleRecord {
            title: Some("Weekly charts".to_owned()),
            description: Some("Only for SUBSCRIBERS.".to_owned()),
            ..article()
        };
        assert_eq!(Image::Locked, resolve(&a, &WidgetSettings::default()));
    }

    #[test]
    fn test_fallback() {
        let a = ArticleRecord {
            title: Some("Weekly charts".to_owned()),
            description: Some("Free for everyone.".to_owned()),
            ..article()
        };
        let image = resolve(&a, &WidgetSettings::default());
        assert_eq!(Image::Unavailable, image);
        assert!(!image.is_premium());
    }

    #[test]
    fn test_configured_patterns() {
        let settings = WidgetSettings {
            generic_image_patterns: vec!["placeholder".to_owned()],
            premium_keywords: vec!["Paid".to_owned()],
            ..WidgetSettings::default()
        };
        let cover = ArticleRecord {
            thumbnail: Some(COVER.to_owned()),
            ..article()
        };
        assert_eq!(Image::Picture(COVER), resolve(&cover, &settings));

        let paid = ArticleRecord {
            title: Some("A paid deep dive".to_owned()),
            ..article()
        };
        assert_eq!(Image::Locked, resolve(&paid, &settings));
    }
}
