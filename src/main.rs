//! facedrive — face-gesture-driven mobility device simulator.
//!
//! Classifies facial-landmark snapshots into discrete gestures, arbitrates
//! them against keyboard input, and drives a simulated device around a 2D
//! arena toward a goal.  Camera capture, landmark detection, and drawing
//! are external collaborators; this binary runs the core loop headless
//! with a scripted or absent landmark source.

mod command;
mod device;
mod driver;
mod face;
mod render;
mod session;
mod source;
mod world;

use clap::Parser;
use tracing::info;

use device::DeviceConfig;
use face::GestureConfig;
use render::LogSink;
use session::Session;
use source::{
    Availability, LandmarkSource, NullInputSource, NullLandmarkSource, ScriptedLandmarkSource,
};
use world::{Arena, World};

#[derive(Parser, Debug)]
#[command(name = "facedrive", about = "Face-gesture-driven mobility simulator")]
struct Cli {
    /// Tick rate in Hz
    #[arg(long, default_value = "60")]
    tick_hz: u32,

    /// Exit after N ticks (headless/CI testing)
    #[arg(long)]
    exit_after: Option<u64>,

    /// Scripted gesture sequence, e.g. "eyebrows:120,left:60,none:30"
    #[arg(long)]
    script: Option<String>,

    /// Log a status line every N ticks
    #[arg(long, default_value = "60")]
    status_every: u64,

    /// Show version and exit
    #[arg(long)]
    version: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("facedrive {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "facedrive=info".into()),
        )
        .init();

    info!("facedrive v{} starting", env!("CARGO_PKG_VERSION"));

    let mut landmarks: Box<dyn LandmarkSource> = match &cli.script {
        Some(script) => match ScriptedLandmarkSource::parse(script) {
            Some(source) => Box::new(source),
            None => {
                eprintln!(
                    "Invalid script: {script}. Use label:ticks pairs, e.g. eyebrows:120,left:60"
                );
                std::process::exit(1);
            }
        },
        None => Box::new(NullLandmarkSource),
    };

    let availability = landmarks.availability();
    info!("landmark source {}", availability.as_str());
    if availability == Availability::Unavailable {
        info!("running keyboard-only; every tick degrades to no-face");
    }

    let mut session = Session::new(
        World::standard(Arena::default()),
        DeviceConfig::default(),
        GestureConfig::default(),
        0.0,
    );

    driver::install_signal_handlers();

    let config = driver::DriverConfig {
        tick_hz: cli.tick_hz,
        exit_after_ticks: cli.exit_after,
    };
    let mut sink = LogSink::new(cli.status_every);
    driver::run(
        &mut session,
        landmarks.as_mut(),
        &mut NullInputSource,
        &mut sink,
        &config,
    )
}
