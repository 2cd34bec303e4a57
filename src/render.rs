//! The article card renderer: turns an ordered list of [`ArticleRecord`]s into
//! the widget's HTML document. Rendering is a pure function of its input;
//! rendering the same articles twice gives byte-identical output.

use crate::article::ArticleRecord;
use crate::card::Card;
use crate::config::{Palette, WidgetSettings};
use crate::escape::EscapeHtml;
use gtmpl::{Template, Value};
use std::collections::HashMap;
use std::fmt;

const PAGE_TEMPLATE: &str = include_str!("../theme/page.html");
const CARD_TEMPLATE: &str = include_str!("../theme/card.html");

/// The page and card templates, in `gtmpl` (Go `text/template`) syntax.
///
/// The page template sees `title`, `palette.*`, and `articles`, the
/// concatenated card markup. The card template sees the fields produced by
/// converting a [`Card`] into a [`Value`].
#[derive(Clone, Debug)]
pub struct Templates {
    page: String,
    card: String,
}

impl Templates {
    /// The templates compiled into the binary.
    pub fn builtin() -> Templates {
        Templates {
            page: PAGE_TEMPLATE.to_owned(),
            card: CARD_TEMPLATE.to_owned(),
        }
    }

    /// Checks that both sources parse before accepting them.
    pub fn new(page: String, card: String) -> Result<Templates> {
        check_template("page", &page)?;
        check_template("card", &card)?;
        Ok(Templates { page, card })
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn card(&self) -> &str {
        &self.card
    }
}

fn check_template(name: &'static str, source: &str) -> Result<()> {
    let mut template = Template::default();
    template
        .parse(source)
        .map_err(|err| Error::ParseTemplate {
            name,
            message: err.to_string(),
        })
}

/// Renders cards and pages from [`WidgetSettings`] and [`Templates`].
#[derive(Clone, Debug)]
pub struct Renderer {
    settings: WidgetSettings,
    templates: Templates,
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new(WidgetSettings::default(), Templates::builtin())
    }
}

impl Renderer {
    pub fn new(settings: WidgetSettings, templates: Templates) -> Renderer {
        Renderer {
            settings,
            templates,
        }
    }

    /// Builds a [`Card`] for each of the first `max_cards` articles, in
    /// input order.
    pub fn cards(&self, items: &[ArticleRecord]) -> Vec<Card> {
        items
            .iter()
            .take(self.settings.max_cards)
            .map(|article| Card::new(article, &self.settings))
            .collect()
    }

    /// Renders the card markup for the first `max_cards` articles,
    /// concatenated in input order.
    pub fn render_cards(&self, items: &[ArticleRecord]) -> Result<String> {
        let mut out = String::new();
        for card in self.cards(items) {
            let html = gtmpl::template(&self.templates.card, Value::from(&card))
                .map_err(|err| Error::Execute {
                    name: "card",
                    message: err.to_string(),
                })?;
            out.push_str(&html);
        }
        Ok(out)
    }

    /// Renders the complete widget document.
    pub fn render(&self, items: &[ArticleRecord]) -> Result<String> {
        let articles = self.render_cards(items)?;
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert(
            "title".to_owned(),
            Value::String(EscapeHtml(&self.settings.title).to_string()),
        );
        m.insert("palette".to_owned(), (&self.settings.palette).into());
        m.insert("articles".to_owned(), Value::String(articles));
        gtmpl::template(&self.templates.page, Value::Object(m)).map_err(|err| Error::Execute {
            name: "page",
            message: err.to_string(),
        })
    }
}

/// Renders `items` with the default settings and built-in templates.
pub fn render(items: &[ArticleRecord]) -> Result<String> {
    Renderer::default().render(items)
}

impl From<&Palette> for Value {
    /// Converts a [`Palette`] into an object keyed by token name.
    fn from(palette: &Palette) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        for (key, colour) in &[
            ("primary", &palette.primary),
            ("secondary", &palette.secondary),
            ("card", &palette.card),
            ("text_primary", &palette.text_primary),
            ("text_secondary", &palette.text_secondary),
            ("background", &palette.background),
            ("text_background", &palette.text_background),
        ] {
            m.insert((*key).to_owned(), Value::String((*colour).clone()));
        }
        Value::Object(m)
    }
}

/// The result of a rendering operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a rendering operation.
#[derive(Debug)]
pub enum Error {
    /// Returned when a template source doesn't parse.
    ParseTemplate { name: &'static str, message: String },

    /// Returned when a template fails while executing.
    Execute { name: &'static str, message: String },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ParseTemplate { name, message } => {
                write!(f, "Parsing {} template: {}", name, message)
            }
            Error::Execute { name, message } => {
                write!(f, "Rendering {} template: {}", name, message)
            }
        }
    }
}

impl std::error::Error for Error {}
