//! Terminal front-end.
//!
//! Controls:
//! - Space: Toggle playback
//! - Right: Step forward (paused only)
//! - Left: Step back (paused only)
//! - q / Escape / Ctrl-C: Quit
//!
//! Keys are read from the controlling terminal, so the farm itself can be
//! piped in on stdin.

use std::time::Duration;

use colony_graph::Viewport;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color as TuiColor, Style as TuiStyle};
use ratatui::symbols::Marker;
use ratatui::text::Line;
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine};
use ratatui::widgets::Paragraph;
use ratatui::{DefaultTerminal, Frame};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::draw::{draw_error, draw_frame, Color, Style, Surface};
use crate::error::{Error, Result};
use crate::playback::{Playback, Position};

/// How long the error screen stays up without a key press.
const ERROR_HOLD: Duration = Duration::from_secs(3);

const HELP: &str = "space: play/pause  \u{2190}/\u{2192}: step  q: quit";

/// A user request, decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    StepForward,
    StepBackward,
    Quit,
}

impl Command {
    /// Map a key press to a command, if it is bound.
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        match key.code {
            KeyCode::Char(' ') => Some(Command::TogglePause),
            KeyCode::Right => Some(Command::StepForward),
            KeyCode::Left => Some(Command::StepBackward),
            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Command::Quit)
            }
            _ => None,
        }
    }

    /// Run this command against `playback`. Returns a notice for the status
    /// bar when the request was refused.
    pub fn apply(self, playback: &mut Playback) -> Option<String> {
        let stepped = match self {
            Command::TogglePause => {
                playback.toggle_pause();
                return None;
            }
            Command::Quit => return None,
            Command::StepForward => playback.step_forward(),
            Command::StepBackward => playback.step_backward(),
        };
        match stepped {
            Ok(_) => None,
            Err(Error::NotPaused) => Some("pause playback before stepping".to_string()),
            Err(e) => Some(e.to_string()),
        }
    }
}

/// Draws onto a ratatui canvas, flipping y so viewport y grows downward.
struct CanvasSurface<'a, 'b> {
    ctx: &'a mut Context<'b>,
    height: f64,
    /// Viewport pixels per terminal column
    cell_width: f64,
    /// Viewport pixels per terminal row
    cell_height: f64,
}

fn tui_color(color: Color) -> TuiColor {
    match color {
        Color::White => TuiColor::White,
        Color::Black => TuiColor::Black,
        Color::Red => TuiColor::Red,
        Color::Green => TuiColor::Green,
        Color::Blue => TuiColor::Blue,
    }
}

impl Surface for CanvasSurface<'_, '_> {
    fn line(&mut self, from: Position, to: Position, color: Color) {
        self.ctx.draw(&CanvasLine {
            x1: from.x,
            y1: self.height - from.y,
            x2: to.x,
            y2: self.height - to.y,
            color: tui_color(color),
        });
    }

    fn circle(&mut self, center: Position, radius: f64, color: Color) {
        self.ctx.draw(&Circle {
            x: center.x,
            y: self.height - center.y,
            radius,
            color: tui_color(color),
        });
    }

    fn text(&mut self, at: Position, text: &str, color: Color) {
        let line = Line::styled(text.to_string(), TuiStyle::default().fg(tui_color(color)));
        self.ctx.print(at.x, self.height - at.y, line);
    }

    fn text_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.cell_width
    }

    fn text_height(&self) -> f64 {
        self.cell_height
    }
}

/// Render `paint` onto a white canvas covering `area`.
fn render_canvas<F>(frame: &mut Frame<'_>, area: Rect, viewport: &Viewport, paint: F)
where
    F: Fn(&mut dyn Surface),
{
    let width = viewport.width as f64;
    let height = viewport.height as f64;
    let cell_width = width / area.width.max(1) as f64;
    let cell_height = height / area.height.max(1) as f64;

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .background_color(TuiColor::White)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            let mut surface = CanvasSurface {
                ctx,
                height,
                cell_width,
                cell_height,
            };
            paint(&mut surface);
        });
    frame.render_widget(canvas, area);
}

/// Interactive viewer bound to a terminal.
pub struct TerminalApp {
    playback: Playback,
    viewport: Viewport,
    style: Style,
    fps: u32,
    notice: Option<String>,
}

impl TerminalApp {
    pub fn new(playback: Playback, viewport: Viewport, fps: u32) -> Self {
        Self {
            playback,
            viewport,
            style: Style::default(),
            fps: fps.max(1),
            notice: None,
        }
    }

    /// Take over the terminal until the user quits.
    pub async fn run(mut self) -> Result<()> {
        let mut terminal = ratatui::init();
        let result = self.event_loop(&mut terminal).await;
        ratatui::restore();
        result
    }

    async fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let mut ticker = interval(Duration::from_secs_f64(1.0 / self.fps as f64));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last = ticker.tick().await;

        info!(fps = self.fps, moves = self.playback.total_moves(), "viewer started");
        loop {
            while event::poll(Duration::ZERO)? {
                let Event::Key(key) = event::read()? else {
                    continue;
                };
                match Command::from_key(key) {
                    Some(Command::Quit) => {
                        info!(cursor = self.playback.cursor(), "viewer closed");
                        return Ok(());
                    }
                    Some(cmd) => {
                        debug!(?cmd, "key command");
                        self.notice = cmd.apply(&mut self.playback);
                    }
                    None => {}
                }
            }

            let now = ticker.tick().await;
            let elapsed = now.duration_since(last);
            last = now;

            self.playback.tick(elapsed.as_millis() as u64);
            terminal.draw(|frame| self.render(frame))?;
        }
    }

    fn render(&self, frame: &mut Frame<'_>) {
        let [canvas_area, status_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

        let snapshot = self.playback.snapshot();
        render_canvas(frame, canvas_area, &self.viewport, |surface| {
            draw_frame(surface, &snapshot, &self.style)
        });

        let status = self.notice.as_deref().unwrap_or(HELP);
        frame.render_widget(Paragraph::new(status), status_area);
    }
}

/// Show `message` full-screen until a key is pressed or a few seconds pass.
pub fn show_error(viewport: &Viewport, message: &str) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = hold_error(&mut terminal, viewport, message);
    ratatui::restore();
    result
}

fn hold_error(terminal: &mut DefaultTerminal, viewport: &Viewport, message: &str) -> Result<()> {
    let style = Style::default();
    terminal.draw(|frame| {
        let area = frame.area();
        render_canvas(frame, area, viewport, |surface| {
            draw_error(surface, viewport, message, &style)
        });
    })?;
    if event::poll(ERROR_HOLD)? {
        event::read()?;
    }
    Ok(())
}
