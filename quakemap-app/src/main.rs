use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{error, info, warn};
use quakemap::{
    FetchProfile, HtmlRenderer, MapBuilder, MapSession, QuakeMapConfig, StaticSource,
};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Profile {
    Balanced,
    Patient,
    FailFast,
}

impl From<Profile> for FetchProfile {
    fn from(profile: Profile) -> Self {
        match profile {
            Profile::Balanced => FetchProfile::Balanced,
            Profile::Patient => FetchProfile::Patient,
            Profile::FailFast => FetchProfile::FailFast,
        }
    }
}

/// Fetch the past week's earthquakes and the plate boundaries and write an
/// interactive map page
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// JSON configuration file; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    earthquakes_url: Option<String>,

    #[arg(long)]
    plates_url: Option<String>,

    /// Read earthquakes from a local GeoJSON file instead of the feed
    #[arg(long, conflicts_with = "earthquakes_url")]
    earthquakes_file: Option<PathBuf>,

    /// Read plate boundaries from a local GeoJSON file
    #[arg(long, conflicts_with = "plates_url")]
    plates_file: Option<PathBuf>,

    #[arg(long, short, default_value = "quakemap.html")]
    output: PathBuf,

    /// Mapbox token; OpenStreetMap tiles are used without one
    #[arg(long, env = "MAPBOX_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    #[arg(long, value_enum)]
    profile: Option<Profile>,

    /// Rewrite the page every N seconds until interrupted
    #[arg(long)]
    refresh_secs: Option<u64>,

    /// Log filter in RUST_LOG syntax, e.g. `debug` or `quakemap=trace`
    #[arg(long)]
    log_level: Option<String>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

async fn effective_config(args: &Args) -> Result<QuakeMapConfig> {
    let mut config = match &args.config {
        Some(path) => QuakeMapConfig::load(path)
            .await
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => QuakeMapConfig::default(),
    };

    if let Some(url) = &args.earthquakes_url {
        config.sources.earthquakes_url = url.clone();
    }
    if let Some(url) = &args.plates_url {
        config.sources.plates_url = url.clone();
    }
    if let Some(profile) = args.profile {
        config.fetch = profile.into();
    }
    if let Some(token) = &args.access_token {
        config.tiles.access_token = Some(token.clone());
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

async fn build_session(args: &Args, config: QuakeMapConfig) -> Result<MapSession> {
    let mut builder = MapBuilder::new().with_config(config);

    if let Some(path) = &args.earthquakes_file {
        let source = StaticSource::from_file("Earthquakes", path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        builder = builder.with_earthquake_source(Box::new(source));
    }
    if let Some(path) = &args.plates_file {
        let source = StaticSource::from_file("Tectonic Plates", path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        builder = builder.with_plate_source(Box::new(source));
    }

    builder.build().context("building map session")
}

async fn render_once(session: &mut MapSession, renderer: &HtmlRenderer, output: &Path) -> Result<()> {
    let map = session.refresh().await.context("assembling map")?;
    for message in map.banner_messages() {
        warn!("{}", message);
    }
    renderer
        .write_to(&map, output)
        .await
        .with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(filters) = &args.log_level {
        logger.parse_filters(filters);
    }
    logger.init();

    let config = effective_config(&args).await?;
    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let mut session = build_session(&args, config).await?;
    let renderer = HtmlRenderer::new();

    render_once(&mut session, &renderer, &args.output).await?;

    let Some(secs) = args.refresh_secs.filter(|s| *s > 0) else {
        return Ok(());
    };

    info!("refreshing every {}s, press Ctrl-C to stop", secs);
    let mut interval = tokio::time::interval(Duration::from_secs(secs));
    // The first tick completes immediately
    interval.tick().await;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = render_once(&mut session, &renderer, &args.output).await {
                    error!("refresh {} failed: {:#}", session.refreshes() + 1, e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("stopping after {} refreshes", session.refreshes());
                break;
            }
        }
    }

    Ok(())
}
