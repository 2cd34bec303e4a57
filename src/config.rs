//! Defines the [`Config`] type and the named constants that every setting
//! defaults to. A project may override any of them with a `widget.yaml` file;
//! without one, the built-in values are used as-is.

use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

/// The name of the project file searched for by [`Config::from_directory`].
pub const CONFIG_FILE_NAME: &str = "widget.yaml";

/// The feed dump read when no input path is configured.
pub const DEFAULT_INPUT: &str = "rss-data.json";

/// The widget file written when no output path is configured.
pub const DEFAULT_OUTPUT: &str = "widget-static.html";

/// The `<title>` of the generated page.
pub const DEFAULT_TITLE: &str = "Latinometrics RSS Widget";

/// The number of cards rendered; items beyond this are dropped.
pub const DEFAULT_MAX_CARDS: usize = 6;

/// Descriptions longer than this many characters are cut and ellipsized.
pub const DEFAULT_DESCRIPTION_LIMIT: usize = 120;

/// Where premium cards send readers instead of the article itself.
pub const DEFAULT_UPGRADE_URL: &str = "https://mail.latinometrics.com/upgrade";

/// Substrings of a thumbnail URL that mark it as the newsletter's generic
/// cover art, which the feed substitutes for paywalled posts.
pub const GENERIC_IMAGE_PATTERNS: &[&str] = &["Domingo_Brief_Cover.png", "/image.png?"];

/// Case-insensitive keywords which, in a title or description, mark an
/// imageless article as premium.
pub const PREMIUM_KEYWORDS: &[&str] = &["premium", "subscriber", "exclusive"];

/// A 320x180 grey "Image not available" SVG.
pub const FALLBACK_IMAGE: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iMzIwIiBoZWlnaHQ9IjE4MCIgdmlld0JveD0iMCAwIDMyMCAxODAiIGZpbGw9Im5vbmUiIHhtbG5zPSJodHRwOi8vd3d3LnczLm9yZy8yMDAwL3N2ZyI+CjxyZWN0IHdpZHRoPSIzMjAiIGhlaWdodD0iMTgwIiBmaWxsPSIjRjVGNUY1Ii8+Cjx0ZXh0IHg9IjE2MCIgeT0iOTAiIGZvbnQtZmFtaWx5PSJBcmlhbCwgc2Fucy1zZXJpZiIgZm9udC1zaXplPSIxNCIgZmlsbD0iIzk5OTk5OSIgdGV4dC1hbmNob3I9Im1pZGRsZSI+SW1hZ2Ugbm90IGF2YWlsYWJsZTwvdGV4dD4KPC9zdmc+";

/// The colour tokens exposed to the page template's styling configuration.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub card: String,
    pub text_primary: String,
    pub text_secondary: String,
    pub background: String,
    pub text_background: String,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            primary: "#384F7F".to_owned(),
            secondary: "#FCF5ED".to_owned(),
            card: "#EFEAE4".to_owned(),
            text_primary: "#FCF5ED".to_owned(),
            text_secondary: "#030712".to_owned(),
            background: "#FCF5ED".to_owned(),
            text_background: "#222222".to_owned(),
        }
    }
}

/// Everything the renderer needs besides its templates.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WidgetSettings {
    pub title: String,
    pub max_cards: usize,
    pub description_limit: usize,
    pub upgrade_url: String,
    pub generic_image_patterns: Vec<String>,
    pub premium_keywords: Vec<String>,
    pub fallback_image: String,
    pub palette: Palette,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        WidgetSettings {
            title: DEFAULT_TITLE.to_owned(),
            max_cards: DEFAULT_MAX_CARDS,
            description_limit: DEFAULT_DESCRIPTION_LIMIT,
            upgrade_url: DEFAULT_UPGRADE_URL.to_owned(),
            generic_image_patterns: GENERIC_IMAGE_PATTERNS
                .iter()
                .map(|p| (*p).to_owned())
                .collect(),
            premium_keywords: PREMIUM_KEYWORDS.iter().map(|k| (*k).to_owned()).collect(),
            fallback_image: FALLBACK_IMAGE.to_owned(),
            palette: Palette::default(),
        }
    }
}

/// Optional template overrides. Missing entries fall back to the templates
/// compiled into the binary.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Theme {
    pub page_template: Option<PathBuf>,
    pub card_template: Option<PathBuf>,
}

/// The resolved configuration for a single widget build.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    /// The JSON feed dump to read.
    pub input: PathBuf,

    /// The HTML file to write.
    pub output: PathBuf,

    pub widget: WidgetSettings,

    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            widget: WidgetSettings::default(),
            theme: Theme::default(),
        }
    }
}

impl Config {
    /// Looks for [`CONFIG_FILE_NAME`] in `dir` and each of its ancestors and
    /// loads the first one found. Returns `Ok(None)` if there is none, in which
    /// case the caller should use [`Config::default`].
    pub fn from_directory(dir: &Path) -> Result<Option<(Config, PathBuf)>> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            return Ok(Some((Config::from_project_file(&path)?, path)));
        }
        match dir.parent() {
            Some(parent) => Config::from_directory(parent),
            None => Ok(None),
        }
    }

    /// Loads a project file. Relative paths inside it are resolved against
    /// the file's own directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = File::open(path).map_err(|err| Error::Open {
            path: path.to_owned(),
            err,
        })?;
        let config: Config = serde_yaml::from_reader(file)?;
        let root = path.parent().unwrap_or_else(|| Path::new(""));
        let config = config.relative_to(root);
        config.validate()?;
        Ok(config)
    }

    /// Checks the settings that can't be enforced by deserialization alone.
    pub fn validate(&self) -> Result<()> {
        match Url::parse(&self.widget.upgrade_url) {
            Ok(_) => Ok(()),
            Err(err) => Err(Error::InvalidUpgradeUrl {
                url: self.widget.upgrade_url.clone(),
                err,
            }),
        }
    }

    fn relative_to(self, root: &Path) -> Config {
        let resolve = |p: PathBuf| match p.is_absolute() {
            true => p,
            false => root.join(p),
        };
        Config {
            input: resolve(self.input),
            output: resolve(self.output),
            widget: self.widget,
            theme: Theme {
                page_template: self.theme.page_template.map(resolve),
                card_template: self.theme.card_template.map(resolve),
            },
        }
    }
}

/// The result of loading a [`Config`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading a [`Config`].
#[derive(Debug)]
pub enum Error {
    /// Returned when the project file can't be opened.
    Open { path: PathBuf, err: std::io::Error },

    /// Returned when the project file isn't valid YAML or has fields of the
    /// wrong type.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when `widget.upgrade_url` isn't an absolute URL.
    InvalidUpgradeUrl { url: String, err: url::ParseError },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Open { path, err } => {
                write!(f, "Opening project file '{}': {}", path.display(), err)
            }
            Error::DeserializeYaml(err) => write!(f, "Loading configuration: {}", err),
            Error::InvalidUpgradeUrl { url, err } => {
                write!(f, "Invalid upgrade URL '{}': {}", url, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Open { path: _, err } => Some(err),
            Error::DeserializeYaml(err) => Some(err),
            Error::InvalidUpgradeUrl { url: _, err } => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(PathBuf::from("rss-data.json"), config.input);
        assert_eq!(6, config.widget.max_cards);
        assert_eq!(120, config.widget.description_limit);
        assert_eq!(
            "https://mail.latinometrics.com/upgrade",
            config.widget.upgrade_url
        );
        assert_eq!("#384F7F", config.widget.palette.primary);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() -> std::result::Result<(), serde_yaml::Error> {
        let config: Config = serde_yaml::from_str(concat!(
            "output: public/widget.html\n",
            "widget:\n",
            "  max_cards: 3\n",
            "  palette:\n",
            "    primary: \"#000000\"\n",
        ))?;
        assert_eq!(PathBuf::from("public/widget.html"), config.output);
        assert_eq!(PathBuf::from(DEFAULT_INPUT), config.input);
        assert_eq!(3, config.widget.max_cards);
        assert_eq!(DEFAULT_DESCRIPTION_LIMIT, config.widget.description_limit);
        assert_eq!("#000000", config.widget.palette.primary);
        assert_eq!("#EFEAE4", config.widget.palette.card);
        assert_eq!(3, config.widget.premium_keywords.len());
        Ok(())
    }

    #[test]
    fn test_relative_paths_resolve_against_project_root() {
        let config = Config {
            theme: Theme {
                page_template: Some(PathBuf::from("theme/page.html")),
                card_template: None,
            },
            output: PathBuf::from("/srv/widget.html"),
            ..Config::default()
        }
        .relative_to(Path::new("/project"));
        assert_eq!(PathBuf::from("/project/rss-data.json"), config.input);
        assert_eq!(PathBuf::from("/srv/widget.html"), config.output);
        assert_eq!(
            Some(PathBuf::from("/project/theme/page.html")),
            config.theme.page_template
        );
    }

    #[test]
    fn test_rejects_relative_upgrade_url() {
        let mut config = Config::default();
        config.widget.upgrade_url = "/upgrade".to_owned();
        match config.validate() {
            Err(Error::InvalidUpgradeUrl { url, .. }) => assert_eq!("/upgrade", url),
            other => panic!("wanted InvalidUpgradeUrl; found {:?}", other),
        }
    }

    #[test]
    fn test_from_directory_searches_ancestors() -> Result<()> {
        let root = std::env::temp_dir()
            .join(format!("rss-widget-ancestors-{}", std::process::id()));
        let nested = root.join("site").join("public");
        let path = root.join(CONFIG_FILE_NAME);
        let io = |err| Error::Open {
            path: path.clone(),
            err,
        };
        std::fs::create_dir_all(&nested).map_err(io)?;
        std::fs::write(&path, "output: out/widget.html\n").map_err(io)?;

        let (config, found) = Config::from_directory(&nested)?.expect("project file");
        assert_eq!(path, found);
        assert_eq!(root.join("out/widget.html"), config.output);

        let _ = std::fs::remove_dir_all(&root);
        Ok(())
    }

    #[test]
    fn test_from_project_file() -> Result<()> {
        let dir = std::env::temp_dir().join(format!("rss-widget-config-{}", std::process::id()));
        let path = dir.join(CONFIG_FILE_NAME);
        let io = |err| Error::Open {
            path: path.clone(),
            err,
        };
        std::fs::create_dir_all(&dir).map_err(io)?;
        std::fs::write(&path, "input: feed.json\nwidget:\n  title: Test\n").map_err(io)?;

        let (config, found) = Config::from_directory(&dir)?.expect("project file");
        assert_eq!(path, found);
        assert_eq!(dir.join("feed.json"), config.input);
        assert_eq!(dir.join(DEFAULT_OUTPUT), config.output);
        assert_eq!("Test", config.widget.title);

        let _ = std::fs::remove_dir_all(&dir);
        Ok(())
    }
}
