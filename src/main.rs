use clap::{crate_version, App, Arg};
use rss_widget::build::build_widget;
use rss_widget::config::Config;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let matches = App::new("rss-widget")
        .version(crate_version!())
        .about("Renders a static HTML widget of article cards from a JSON RSS feed dump")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("Project file to load instead of searching for widget.yaml")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .value_name("FILE")
                .help("JSON feed dump to read")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("FILE")
                .help("HTML file to write")
                .takes_value(true),
        )
        .get_matches();

    if let Err(e) = run(
        matches.value_of("config").map(Path::new),
        matches.value_of("input").map(PathBuf::from),
        matches.value_of("output").map(PathBuf::from),
    ) {
        error!("{}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            error!("  caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}

fn run(
    config_file: Option<&Path>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match config_file {
        Some(path) => {
            info!(config = %path.display(), "loading configuration");
            Config::from_project_file(path)?
        }
        None => match Config::from_directory(&std::env::current_dir()?)? {
            Some((config, path)) => {
                info!(config = %path.display(), "loading configuration");
                config
            }
            None => Config::default(),
        },
    };
    if let Some(input) = input {
        config.input = input;
    }
    if let Some(output) = output {
        config.output = output;
    }

    let summary = build_widget(&config)?;
    info!("static widget generated successfully");
    info!(articles = summary.articles, output = %summary.output.display(), "wrote widget");
    info!(generated_at = %chrono::Utc::now().to_rfc3339(), "done");
    Ok(())
}
