//! Stateless frame drawing over an abstract surface.
//!
//! All coordinates are viewport pixels with y growing downward. A surface
//! only needs lines, circles and text; it owns whatever backing resources
//! it draws into.

use colony_graph::Viewport;

use crate::playback::{PlaybackState, Position};
use crate::snapshot::FrameSnapshot;

/// Palette used by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    White,
    Black,
    Red,
    Green,
    Blue,
}

/// Drawing primitives a renderer must provide.
pub trait Surface {
    fn line(&mut self, from: Position, to: Position, color: Color);

    fn circle(&mut self, center: Position, radius: f64, color: Color);

    /// Draw `text` with its top-left corner at `at`.
    fn text(&mut self, at: Position, text: &str, color: Color);

    /// Width `text` would occupy, in viewport pixels.
    fn text_width(&self, text: &str) -> f64;

    /// Height of one line of text, in viewport pixels.
    fn text_height(&self) -> f64;
}

/// Sizes and colours for a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub room_radius: f64,
    /// Gap between a room's top edge and its label
    pub label_gap: f64,
    pub edge: Color,
    pub room: Color,
    pub start_room: Color,
    pub end_room: Color,
    pub token: Color,
    pub token_label: Color,
    pub text: Color,
    pub error: Color,
    /// Line height for the error overlay
    pub error_line_height: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            room_radius: 20.0,
            label_gap: 20.0,
            edge: Color::Black,
            room: Color::Blue,
            start_room: Color::Green,
            end_room: Color::Red,
            token: Color::Red,
            token_label: Color::White,
            text: Color::Black,
            error: Color::Red,
            error_line_height: 30.0,
        }
    }
}

/// The status line shown in the top-left corner.
pub fn info_line(snapshot: &FrameSnapshot<'_>) -> String {
    let state = match snapshot.status.state {
        PlaybackState::Paused => "PAUSED",
        PlaybackState::Running => "PLAYING",
    };
    format!(
        "Move: {}/{}  {}",
        snapshot.status.cursor, snapshot.status.total_moves, state
    )
}

/// Draw one frame: tunnels, then rooms, then tokens, then the status line.
pub fn draw_frame<S: Surface + ?Sized>(surface: &mut S, snapshot: &FrameSnapshot<'_>, style: &Style) {
    let graph = snapshot.graph;

    for edge in graph.edges() {
        let a = graph.node(edge.a).scaled.into();
        let b = graph.node(edge.b).scaled.into();
        surface.line(a, b, style.edge);
    }

    for node in graph.nodes() {
        let center: Position = node.scaled.into();
        let color = if node.is_start {
            style.start_room
        } else if node.is_end {
            style.end_room
        } else {
            style.room
        };
        surface.circle(center, style.room_radius, color);

        let label = Position {
            x: center.x - surface.text_width(&node.name) / 2.0,
            y: center.y - style.room_radius - style.label_gap,
        };
        surface.text(label, &node.name, style.text);
    }

    for token in &snapshot.tokens {
        surface.circle(token.position, style.room_radius / 2.0, style.token);
        let label = token.id.to_string();
        let at = Position {
            x: token.position.x - surface.text_width(&label) / 2.0,
            y: token.position.y - surface.text_height() / 2.0,
        };
        surface.text(at, &label, style.token_label);
    }

    surface.text(Position { x: 10.0, y: 10.0 }, &info_line(snapshot), style.text);
}

/// Draw an error message centred in the viewport, one line per row.
pub fn draw_error<S: Surface + ?Sized>(
    surface: &mut S,
    viewport: &Viewport,
    message: &str,
    style: &Style,
) {
    let lines: Vec<&str> = message.trim().lines().collect();
    let mut y = viewport.height as f64 / 2.0 - lines.len() as f64 * style.error_line_height / 2.0;
    for line in lines {
        let x = viewport.width as f64 / 2.0 - surface.text_width(line) / 2.0;
        surface.text(Position { x, y }, line, style.error);
        y += style.error_line_height;
    }
}
