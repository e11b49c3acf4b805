//! vibesync - headless VibeSync client
//!
//! Uploads one photo through the proxy, waits for the weather lookup, then
//! prints the result view: title, tag chips, conditions and tracks with
//! their streaming links.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vibesync_client::{
    AnalysisRequestor, CaptureController, Coordinates, FixedLocation, ProxyClient,
    ResultComposer, ResultView, VibeSession, ViewState, WeatherCollector, DEFAULT_PROXY_URL,
};

/// Longest wait for weather once results are on screen
const WEATHER_WAIT: Duration = Duration::from_secs(10);

/// Command-line arguments for vibesync
#[derive(Parser, Debug)]
#[command(name = "vibesync")]
#[command(about = "Match a photo's atmosphere to music")]
#[command(version)]
struct Args {
    /// Photo to analyze
    #[arg(short, long)]
    image: PathBuf,

    /// Proxy base URL
    #[arg(long, env = "VIBESYNC_PROXY_URL", default_value = DEFAULT_PROXY_URL)]
    proxy_url: String,

    /// Latitude for the weather lookup
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    lat: Option<f64>,

    /// Longitude for the weather lookup
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lon: Option<f64>,

    /// Time the analyzing view stays up after tags arrive
    #[arg(long, default_value_t = 2000)]
    reveal_delay_ms: u64,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vibesync_client=info,vibesync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_view(view: &ResultView) {
    println!("{}", view.title);

    let chips: Vec<String> = view
        .chips
        .iter()
        .map(|c| format!("[{:?}] {}", c.style.icon, c.label))
        .collect();
    println!("{}", chips.join("  "));

    if let (Some(location), Some(temp)) = (&view.location_label, view.temperature) {
        println!("{} · {}°C", location, temp);
    }
    println!();

    if view.tracks.is_empty() {
        println!("No tracks found.");
        return;
    }
    for (i, card) in view.tracks.iter().enumerate() {
        println!("{}. {} - {}", i + 1, card.track.track_name, card.track.artist_name);
        if let Some(preview) = &card.track.preview_url {
            println!("   preview:     {}", preview);
        }
        println!("   apple music: {}", card.links.apple_music);
        println!("   spotify:     {}", card.links.spotify);
        println!("   soundcloud:  {}", card.links.soundcloud);
        println!("   audiomack:   {}", card.links.audiomack);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    info!(
        "Starting VibeSync client v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let proxy = Arc::new(ProxyClient::new(&args.proxy_url).context("Failed to create HTTP client")?);
    info!(proxy = %proxy.base_url(), "Using proxy");

    let position = args.lat.zip(args.lon).map(|(lat, lon)| Coordinates::new(lat, lon));
    if position.is_none() {
        info!("No coordinates given, weather will be skipped");
    }
    let (weather, weather_task) =
        WeatherCollector::spawn(Arc::new(FixedLocation(position)), proxy.clone());

    let mut session = VibeSession::new(
        AnalysisRequestor::new(proxy.clone()),
        Arc::new(ResultComposer::new(proxy.clone())),
        weather,
    )
    .with_reveal_delay(Duration::from_millis(args.reveal_delay_ms));

    session.start()?;
    let image = CaptureController::uploads_only()
        .upload_file(&args.image)
        .await
        .with_context(|| format!("Failed to load {}", args.image.display()))?;

    eprintln!("Analyzing your vibe...");
    if session.submit_image(image).await? != ViewState::Result {
        bail!("Could not read the scene, try another photo");
    }

    if session.weather().is_none()
        && !weather_task.is_finished()
        && tokio::time::timeout(WEATHER_WAIT, weather_task).await.is_err()
    {
        warn!("Weather lookup still pending, showing results without it");
    }
    session.refresh_on_weather_change().await;

    print_view(&session.result_view().await);
    Ok(())
}
