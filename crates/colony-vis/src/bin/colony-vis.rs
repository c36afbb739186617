//! Colony Playback Viewer
//!
//! Reads a farm and its solved moves (from stdin or a file) and plays them
//! back in the terminal, or as JSON lines with `--headless`.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colony_vis::{
    run_headless, show_error, Playback, PlaybackConfig, TerminalApp, Viewport,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "colony-vis", version, about = "Replay a solved ant farm")]
struct Args {
    /// Read the farm from a file instead of stdin
    #[arg(long)]
    input: Option<PathBuf>,

    /// Frames per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
    fps: u32,

    /// Milliseconds between moves once all ants have settled
    #[arg(long, default_value_t = 1000)]
    move_delay: u64,

    /// Interpolation progress added per frame
    #[arg(long, default_value_t = 0.02, value_parser = parse_step)]
    step: f64,

    /// Start playing immediately
    #[arg(long)]
    autoplay: bool,

    /// Jump to this move before starting
    #[arg(long)]
    seek: Option<usize>,

    /// Print one JSON snapshot per frame instead of opening the viewer
    #[arg(long)]
    headless: bool,

    /// Stop after this many frames (headless only)
    #[arg(long, requires = "headless")]
    frames: Option<usize>,
}

/// Accept a per-frame progress step in `(0, 1]`.
fn parse_step(s: &str) -> Result<f64, String> {
    let step: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if step.is_finite() && step > 0.0 && step <= 1.0 {
        Ok(step)
    } else {
        Err(format!("step must be in (0, 1], got {s}"))
    }
}

fn read_input(args: &Args) -> io::Result<String> {
    match &args.input {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout is the screen.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "colony_vis=info,colony_graph=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let viewport = Viewport::default();
    let input = read_input(&args)?;

    let farm = match colony_graph::parse_with(&input, &viewport) {
        Ok(farm) => farm,
        Err(e) => {
            tracing::error!(kind = ?e.kind(), "cannot play input");
            if !args.headless {
                show_error(&viewport, &e.to_string())?;
            }
            eprintln!("{e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let config = PlaybackConfig {
        move_delay_ms: args.move_delay,
        interpolation_step: args.step,
    };
    let mut playback = Playback::new(farm, config)?;
    if let Some(cursor) = args.seek {
        playback.seek(cursor);
    }
    if args.autoplay {
        playback.toggle_pause();
    }

    if args.headless {
        let frame_ms = (1000 / u64::from(args.fps)).max(1);
        run_headless(&mut playback, io::stdout().lock(), frame_ms, args.frames)?;
    } else {
        TerminalApp::new(playback, viewport, args.fps).run().await?;
    }

    Ok(ExitCode::SUCCESS)
}
