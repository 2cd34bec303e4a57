//! Exports the [`build_widget`] function which stitches together the
//! high-level steps of building the widget: loading the templates, decoding
//! the feed dump ([`crate::article`]), rendering it ([`crate::render`]), and
//! writing the result to disk.

use crate::article::{Error as FeedError, Feed};
use crate::config::{Config, Theme};
use crate::render::{Error as RenderError, Renderer, Templates};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What a successful build produced.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    /// The number of article cards in the widget.
    pub articles: usize,

    /// Where the widget was written.
    pub output: PathBuf,
}

/// Builds the widget from a [`Config`] object. This calls into
/// [`Feed::from_path`] and [`Renderer::render`] which do the heavy-lifting,
/// then writes the page to `config.output`, creating its directory if needed.
pub fn build_widget(config: &Config) -> Result<Summary> {
    let templates = load_templates(&config.theme)?;
    let renderer = Renderer::new(config.widget.clone(), templates);

    info!(input = %config.input.display(), "reading feed");
    let feed = Feed::from_path(&config.input)?;
    debug!(items = feed.items.len(), "decoded feed");

    let html = renderer.render(&feed.items)?;

    if let Some(dir) = config.output.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir).map_err(|err| Error::WriteOutput {
                path: dir.to_owned(),
                err,
            })?;
        }
    }
    std::fs::write(&config.output, html).map_err(|err| Error::WriteOutput {
        path: config.output.clone(),
        err,
    })?;

    Ok(Summary {
        articles: feed.items.len().min(config.widget.max_cards),
        output: config.output.clone(),
    })
}

// Loads any template overrides named by the theme, falling back to the
// built-in template for each one that isn't.
fn load_templates(theme: &Theme) -> Result<Templates> {
    if theme.page_template.is_none() && theme.card_template.is_none() {
        return Ok(Templates::builtin());
    }
    let builtin = Templates::builtin();
    let page = match &theme.page_template {
        Some(path) => read_template(path)?,
        None => builtin.page().to_owned(),
    };
    let card = match &theme.card_template {
        Some(path) => read_template(path)?,
        None => builtin.card().to_owned(),
    };
    Ok(Templates::new(page, card)?)
}

fn read_template(path: &Path) -> Result<String> {
    use std::io::Read;
    let mut contents = String::new();
    File::open(path)
        .and_then(|mut file| file.read_to_string(&mut contents))
        .map_err(|err| Error::OpenTemplateFile {
            path: path.to_owned(),
            err,
        })?;
    Ok(contents)
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building the widget. Errors can be during feed
/// decoding, rendering, reading template files, and writing output.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors reading or decoding the feed dump.
    Feed(FeedError),

    /// Returned for errors parsing or executing templates.
    Render(RenderError),

    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for I/O problems while writing the widget.
    WriteOutput { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Feed(err) => err.fmt(f),
            Error::Render(err) => err.fmt(f),
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::WriteOutput { path, err } => {
                write!(f, "Writing '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Feed(err) => Some(err),
            Error::Render(err) => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::WriteOutput { path: _, err } => Some(err),
        }
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}

impl From<RenderError> for Error {
    /// Converts [`RenderError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: RenderError) -> Error {
        Error::Render(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rss-widget-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).expect("creating scratch dir");
        dir
    }

    fn config(dir: &Path, feed: &str) -> Config {
        let input = dir.join("rss-data.json");
        std::fs::write(&input, feed).expect("writing feed");
        Config {
            input,
            output: dir.join("out").join("widget-static.html"),
            ..Config::default()
        }
    }

    #[test]
    fn test_build_widget() -> Result<()> {
        let dir = scratch_dir("build");
        let items: Vec<String> = (0..9)
            .map(|i| format!(r#"{{"title": "Post {}", "link": "https://example.com/{}"}}"#, i, i))
            .collect();
        let config = config(&dir, &format!(r#"{{"items": [{}]}}"#, items.join(",")));

        let summary = build_widget(&config)?;
        assert_eq!(6, summary.articles);
        assert_eq!(config.output, summary.output);

        let html = std::fs::read_to_string(&config.output).expect("reading widget");
        assert_eq!(6, html.matches(r#"role="article""#).count());
        assert!(html.contains(">Post 5</h3>"));
        assert!(!html.contains(">Post 6</h3>"));

        let _ = std::fs::remove_dir_all(&dir);
        Ok(())
    }

    #[test]
    fn test_missing_items() -> Result<()> {
        let dir = scratch_dir("empty");
        let config = config(&dir, r#"{"status": "ok"}"#);
        assert_eq!(0, build_widget(&config)?.articles);
        let _ = std::fs::remove_dir_all(&dir);
        Ok(())
    }

    #[test]
    fn test_missing_feed_file() {
        let dir = scratch_dir("nofeed");
        let config = Config {
            input: dir.join("absent.json"),
            output: dir.join("widget.html"),
            ..Config::default()
        };
        match build_widget(&config) {
            Err(Error::Feed(FeedError::Open { path, .. })) => assert_eq!(config.input, path),
            other => panic!("wanted a feed open error; found {:?}", other),
        }
        assert!(!config.output.exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_card_template_override() -> Result<()> {
        let dir = scratch_dir("theme");
        let card = dir.join("card.html");
        std::fs::write(&card, "<li>{{.title}}</li>").expect("writing template");
        let mut config = config(&dir, r#"{"items": [{"title": "Only"}]}"#);
        config.theme.card_template = Some(card);

        build_widget(&config)?;
        let html = std::fs::read_to_string(&config.output).expect("reading widget");
        assert!(html.contains("<li>Only</li>"));
        assert!(html.starts_with("<!DOCTYPE html>"));

        let _ = std::fs::remove_dir_all(&dir);
        Ok(())
    }

    #[test]
    fn test_missing_template_file() {
        let dir = scratch_dir("notheme");
        let mut config = config(&dir, r#"{"items": []}"#);
        config.theme.page_template = Some(dir.join("absent.html"));
        match build_widget(&config) {
            Err(Error::OpenTemplateFile { .. }) => {}
            other => panic!("wanted OpenTemplateFile; found {:?}", other),
        }
        let _ = std::fs::remove_dir_all(&dir);
    }
}
