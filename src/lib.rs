//! The library code for the `rss-widget` generator, which turns a JSON dump of
//! an RSS feed into a static HTML page of article cards. The work breaks down
//! into three steps:
//!
//! 1. Decoding the feed dump into [`article::ArticleRecord`]s
//!    ([`crate::article`])
//! 2. Rendering the first few articles as cards inside the page template
//!    ([`crate::render`])
//! 3. Writing the page to disk ([`crate::build`])
//!
//! The second step is where the presentation rules live. Each article becomes
//! a [`card::Card`], and the interesting part of a card is its image slot
//! ([`crate::image`]): it is either a picture from the feed, the "image not
//! available" fallback, or a locked placeholder for premium (paywalled)
//! posts. Premium cards also send the reader to the subscription page rather
//! than to the article.
//!
//! Rendering never fails because of one bad article. Missing fields fall back
//! to defaults, unparseable dates render blank, and items that don't decode
//! at all render as placeholder cards.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod article;
pub mod build;
pub mod card;
pub mod config;
pub mod date;
pub mod escape;
pub mod image;
pub mod render;
