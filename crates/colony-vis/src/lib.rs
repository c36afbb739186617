//! Colony Playback Viewer
//!
//! Steppable animation of a precomputed ant schedule across a farm graph.
//!
//! # Architecture
//!
//! - **Playback**: per-token interpolation, pause/resume, seek by replay
//! - **Snapshot**: read-only frame view handed to renderers
//! - **Draw**: stateless drawing over an abstract [`Surface`]
//! - **Terminal**: ratatui front-end with keyboard controls
//! - **Headless**: JSON-lines frames for scripting and tests
//!
//! # Usage
//!
//! ```ignore
//! let farm = colony_graph::parse(&input)?;
//! let playback = Playback::new(farm, PlaybackConfig::default())?;
//!
//! TerminalApp::new(playback, Viewport::default(), 60).run().await?;
//! ```

mod draw;
mod error;
mod headless;
mod playback;
mod snapshot;
mod terminal;

pub use draw::{draw_error, draw_frame, info_line, Color, Style, Surface};
pub use error::{Error, Result};
pub use headless::run_headless;
pub use playback::{Playback, PlaybackConfig, PlaybackState, PlaybackStatus, Position, Token};
pub use snapshot::{FrameSnapshot, TokenView};
pub use terminal::{show_error, Command, TerminalApp};

pub use colony_graph::Viewport;
