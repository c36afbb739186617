//! Playback engine for a parsed move schedule.
//!
//! Tokens glide from room to room on every frame tick. Between moves the
//! engine waits for all tokens to settle plus a fixed delay. Seeking never
//! undoes anything: it resets every token to the start room and replays the
//! schedule up to the cursor with tokens landing directly on their targets.

use std::sync::Arc;

use colony_graph::{Farm, Graph, Move, MoveSchedule, NodeIdx, Point, TokenId};
use serde::{Deserialize, Serialize};
use tracing::{info, trace};

use crate::error::{Error, Result};

/// Timing knobs for playback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackConfig {
    /// Pause between a settled move and the next one
    pub move_delay_ms: u64,
    /// Progress added to each moving token per tick (0.0 - 1.0)
    pub interpolation_step: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            move_delay_ms: 1000,
            interpolation_step: 0.02,
        }
    }
}

/// Whether ticks advance the animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    Paused,
    Running,
}

/// A viewport position with sub-pixel precision.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Linear blend from `a` (t = 0) to `b` (t = 1).
    pub fn lerp(a: Point, b: Point, t: f64) -> Self {
        Self {
            x: a.x as f64 + (b.x - a.x) as f64 * t,
            y: a.y as f64 + (b.y - a.y) as f64 * t,
        }
    }
}

impl From<Point> for Position {
    fn from(p: Point) -> Self {
        Self {
            x: p.x as f64,
            y: p.y as f64,
        }
    }
}

/// An animated ant.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub id: TokenId,
    /// Room the token is leaving (or sitting in, once settled)
    pub current: NodeIdx,
    /// Room the token is heading to
    pub target: NodeIdx,
    /// 1.0 means settled at `target`
    pub progress: f64,
    pub position: Position,
    /// Every room this token was sent to, in order
    pub history: Vec<NodeIdx>,
}

impl Token {
    fn anchored(id: TokenId, room: NodeIdx, at: Point) -> Self {
        Self {
            id,
            current: room,
            target: room,
            progress: 1.0,
            position: at.into(),
            history: Vec::new(),
        }
    }

    pub fn is_settled(&self) -> bool {
        self.progress >= 1.0
    }
}

/// How a batch lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Landing {
    /// Start at the old target and glide over the following ticks.
    Animate,
    /// Jump straight onto the new target.
    Settle,
}

/// Playback controller for a move schedule.
pub struct Playback {
    graph: Arc<Graph>,
    schedule: Arc<MoveSchedule>,
    start: NodeIdx,
    tokens: Vec<Token>,
    cursor: usize,
    state: PlaybackState,
    elapsed_ms: u64,
    config: PlaybackConfig,
}

impl Playback {
    /// Create a paused playback with every token in the start room.
    pub fn new(farm: Farm, config: PlaybackConfig) -> Result<Self> {
        Self::from_parts(
            Arc::new(farm.graph),
            Arc::new(farm.schedule),
            farm.token_count,
            config,
        )
    }

    /// Create a playback over a shared graph and schedule.
    pub fn from_parts(
        graph: Arc<Graph>,
        schedule: Arc<MoveSchedule>,
        token_count: u32,
        config: PlaybackConfig,
    ) -> Result<Self> {
        let step = config.interpolation_step;
        if !step.is_finite() || step <= 0.0 || step > 1.0 {
            return Err(Error::InvalidConfig(format!(
                "interpolation step must be in (0, 1], got {step}"
            )));
        }
        let start = graph.start().ok_or(colony_graph::Error::MissingStartNode)?;
        validate(&graph, &schedule, token_count)?;

        let at = graph.node(start).scaled;
        let tokens = (1..=token_count)
            .map(|id| Token::anchored(TokenId(id), start, at))
            .collect();

        Ok(Self {
            graph,
            schedule,
            start,
            tokens,
            cursor: 0,
            state: PlaybackState::Paused,
            elapsed_ms: 0,
            config,
        })
    }

    /// Advance the animation by one frame. Does nothing while paused.
    pub fn tick(&mut self, elapsed_ms: u64) {
        if self.state == PlaybackState::Paused {
            return;
        }

        let mut settled = true;
        for token in &mut self.tokens {
            if token.progress < 1.0 {
                settled = false;
                token.progress = (token.progress + self.config.interpolation_step).min(1.0);
                token.position = Position::lerp(
                    self.graph.node(token.current).scaled,
                    self.graph.node(token.target).scaled,
                    token.progress,
                );
            }
        }

        if !settled || self.cursor >= self.schedule.len() {
            return;
        }

        self.elapsed_ms += elapsed_ms;
        if self.elapsed_ms >= self.config.move_delay_ms {
            self.elapsed_ms = 0;
            if let Some(mv) = self.schedule.get(self.cursor) {
                apply(&self.graph, &mut self.tokens, mv, Landing::Animate);
            }
            self.cursor += 1;
            trace!(cursor = self.cursor, "applied move");
        }
    }

    /// Flip between paused and running.
    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            PlaybackState::Paused => PlaybackState::Running,
            PlaybackState::Running => PlaybackState::Paused,
        };
        info!(state = ?self.state, cursor = self.cursor, "playback toggled");
    }

    /// Move the cursor one move forward. Only allowed while paused;
    /// returns `false` if already at the end.
    pub fn step_forward(&mut self) -> Result<bool> {
        self.ensure_paused()?;
        if self.cursor >= self.schedule.len() {
            return Ok(false);
        }
        self.seek(self.cursor + 1);
        Ok(true)
    }

    /// Move the cursor one move back. Only allowed while paused;
    /// returns `false` if already at the start.
    pub fn step_backward(&mut self) -> Result<bool> {
        self.ensure_paused()?;
        if self.cursor == 0 {
            return Ok(false);
        }
        self.seek(self.cursor - 1);
        Ok(true)
    }

    /// Jump to `cursor` (clamped to the schedule) by replaying from the start.
    pub fn seek(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.schedule.len());
        self.elapsed_ms = 0;
        self.replay();
    }

    fn ensure_paused(&self) -> Result<()> {
        match self.state {
            PlaybackState::Paused => Ok(()),
            PlaybackState::Running => Err(Error::NotPaused),
        }
    }

    fn replay(&mut self) {
        let at = self.graph.node(self.start).scaled;
        for token in &mut self.tokens {
            *token = Token::anchored(token.id, self.start, at);
        }
        for mv in self.schedule.prefix(self.cursor) {
            apply(&self.graph, &mut self.tokens, mv, Landing::Settle);
        }
    }

    /// Index of the next move to apply.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of moves in the schedule.
    pub fn total_moves(&self) -> usize {
        self.schedule.len()
    }

    /// Get the current playback state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == PlaybackState::Paused
    }

    /// Every move applied and every token at rest.
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.schedule.len() && self.tokens.iter().all(Token::is_settled)
    }

    /// All tokens, ordered by id.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The farm being played.
    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }

    pub fn schedule(&self) -> &Arc<MoveSchedule> {
        &self.schedule
    }

    /// Get the playback configuration.
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Fraction of the schedule applied (0.0 - 1.0).
    pub fn progress(&self) -> f64 {
        if self.schedule.is_empty() {
            0.0
        } else {
            self.cursor as f64 / self.schedule.len() as f64
        }
    }
}

/// Apply one move as a single batch: every token reads its old target
/// before any token is updated.
fn apply(graph: &Graph, tokens: &mut [Token], mv: &Move, landing: Landing) {
    let batch: Vec<(usize, NodeIdx, NodeIdx)> = mv
        .steps()
        .iter()
        .map(|s| {
            let i = s.token.index();
            (i, tokens[i].target, s.to)
        })
        .collect();

    for (i, from, to) in batch {
        let token = &mut tokens[i];
        token.current = from;
        token.target = to;
        token.history.push(to);
        match landing {
            Landing::Animate => {
                token.progress = 0.0;
                token.position = graph.node(from).scaled.into();
            }
            Landing::Settle => {
                token.progress = 1.0;
                token.position = graph.node(to).scaled.into();
            }
        }
    }
}

fn validate(graph: &Graph, schedule: &MoveSchedule, token_count: u32) -> Result<()> {
    for (turn, mv) in schedule.iter().enumerate() {
        for step in mv.steps() {
            if step.token.0 == 0 || step.token.0 > token_count {
                return Err(Error::InvalidSchedule(format!(
                    "move {turn} names {} but there are {token_count} ants",
                    step.token
                )));
            }
            if step.to.index() >= graph.len() {
                return Err(Error::InvalidSchedule(format!(
                    "move {turn} sends {} to unknown room #{}",
                    step.token,
                    step.to.index()
                )));
            }
        }
    }
    Ok(())
}

/// Playback status for sending to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub cursor: usize,
    pub total_moves: usize,
    pub state: PlaybackState,
    pub progress: f64,
    pub finished: bool,
}

impl From<&Playback> for PlaybackStatus {
    fn from(playback: &Playback) -> Self {
        Self {
            cursor: playback.cursor,
            total_moves: playback.total_moves(),
            state: playback.state,
            progress: playback.progress(),
            finished: playback.is_finished(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colony_graph::parse;
    use proptest::prelude::*;

    const SMALL: &str = "2\n#rooms\n##start\nA 0 0\n##end\nB 10 0\nA-B\nL1-B L2-B\n";

    /// Start room S, a line of rooms, end room E; ants trickle through.
    const CHAIN: &str = "3
##start
S 0 0
a 1 0
b 2 0
c 3 1
##end
E 4 0
S-a
a-b
b-c
c-E
L1-a
L1-b L2-a
L1-c L2-b L3-a
L1-E L2-c L3-b
L2-E L3-c
L3-E
";

    fn playback(input: &str) -> Playback {
        Playback::new(parse(input).unwrap(), PlaybackConfig::default()).unwrap()
    }

    fn room(p: &Playback, name: &str) -> NodeIdx {
        p.graph().lookup(name).unwrap()
    }

    /// (current, target, history) per token.
    fn logical(p: &Playback) -> Vec<(NodeIdx, NodeIdx, Vec<NodeIdx>)> {
        p.tokens()
            .iter()
            .map(|t| (t.current, t.target, t.history.clone()))
            .collect()
    }

    /// Run with ticks until the cursor reaches `n` and everything settles.
    fn play_to(p: &mut Playback, n: usize) {
        p.seek(0);
        p.toggle_pause();
        let delay = p.config().move_delay_ms;
        let mut guard = 0;
        while !(p.cursor() == n && p.tokens().iter().all(Token::is_settled)) {
            p.tick(delay);
            guard += 1;
            assert!(guard < 10_000, "playback did not reach move {n}");
        }
        p.toggle_pause();
    }

    #[test]
    fn starts_paused_at_start_room() {
        let p = playback(SMALL);
        let a = room(&p, "A");
        assert_eq!(p.state(), PlaybackState::Paused);
        assert_eq!(p.cursor(), 0);
        assert_eq!(p.tokens().len(), 2);
        for t in p.tokens() {
            assert_eq!(t.current, a);
            assert_eq!(t.target, a);
            assert_eq!(t.progress, 1.0);
            assert!(t.history.is_empty());
            assert_eq!(t.position, Position { x: 50.0, y: 50.0 });
        }
    }

    #[test]
    fn tick_is_noop_while_paused() {
        let mut p = playback(SMALL);
        let before = logical(&p);
        p.tick(5000);
        assert_eq!(p.cursor(), 0);
        assert_eq!(logical(&p), before);
    }

    #[test]
    fn move_waits_for_delay() {
        let mut p = playback(SMALL);
        p.toggle_pause();

        p.tick(400);
        p.tick(400);
        assert_eq!(p.cursor(), 0);
        p.tick(200);
        assert_eq!(p.cursor(), 1);

        let t = &p.tokens()[0];
        assert_eq!(t.progress, 0.0);
        assert_eq!(t.position, Position { x: 50.0, y: 50.0 });
    }

    #[test]
    fn tokens_glide_then_settle() {
        let mut p = playback(SMALL);
        let (a, b) = (room(&p, "A"), room(&p, "B"));
        p.toggle_pause();
        p.tick(1000);

        p.tick(16);
        let t = &p.tokens()[0];
        assert!((t.progress - 0.02).abs() < 1e-9);
        assert!((t.position.x - 72.0).abs() < 1e-6);
        assert_eq!(t.position.y, 50.0);

        while !p.is_finished() {
            p.tick(16);
        }
        for t in p.tokens() {
            assert_eq!(t.current, a);
            assert_eq!(t.target, b);
            assert_eq!(t.history, vec![b]);
            assert_eq!(t.position, Position { x: 1150.0, y: 50.0 });
        }
        assert_eq!(p.cursor(), 1);

        // Nothing left to apply.
        p.tick(10_000);
        assert_eq!(p.cursor(), 1);
    }

    #[test]
    fn steps_rejected_while_running() {
        let mut p = playback(SMALL);
        p.toggle_pause();
        assert!(matches!(p.step_forward(), Err(Error::NotPaused)));
        assert!(matches!(p.step_backward(), Err(Error::NotPaused)));
        assert_eq!(p.cursor(), 0);
    }

    #[test]
    fn steps_stop_at_bounds() {
        let mut p = playback(SMALL);
        assert!(!p.step_backward().unwrap());
        assert!(p.step_forward().unwrap());
        assert!(!p.step_forward().unwrap());
        assert_eq!(p.cursor(), 1);
        assert!(p.step_backward().unwrap());
        assert_eq!(p.cursor(), 0);
    }

    #[test]
    fn step_lands_on_target() {
        let mut p = playback(SMALL);
        let b = room(&p, "B");
        p.step_forward().unwrap();
        for t in p.tokens() {
            assert_eq!(t.target, b);
            assert_eq!(t.progress, 1.0);
            assert_eq!(t.history, vec![b]);
            assert_eq!(t.position, Position { x: 1150.0, y: 50.0 });
        }
    }

    #[test]
    fn swap_reads_old_targets() {
        let input = "2\n##start\nS 0 0\nA 1 0\nB 2 0\nS-A\nS-B\nA-B\nL1-A L2-B\nL1-B L2-A\n";
        let mut p = playback(input);
        let (a, b) = (room(&p, "A"), room(&p, "B"));

        p.seek(2);
        let t1 = &p.tokens()[0];
        let t2 = &p.tokens()[1];
        assert_eq!((t1.current, t1.target), (a, b));
        assert_eq!((t2.current, t2.target), (b, a));

        play_to(&mut p, 2);
        let t1 = &p.tokens()[0];
        let t2 = &p.tokens()[1];
        assert_eq!((t1.current, t1.target), (a, b));
        assert_eq!((t2.current, t2.target), (b, a));
    }

    #[test]
    fn seek_clamps_and_rebuilds() {
        let mut p = playback(CHAIN);
        p.seek(100);
        assert_eq!(p.cursor(), 6);
        assert!(p.is_finished());
        let e = room(&p, "E");
        assert!(p.tokens().iter().all(|t| t.target == e));
        assert_eq!(p.tokens()[0].history.len(), 4);

        p.seek(0);
        let s = room(&p, "S");
        assert!(p.tokens().iter().all(|t| t.target == s && t.history.is_empty()));
    }

    #[test]
    fn untouched_tokens_keep_their_room() {
        let mut p = playback(CHAIN);
        p.seek(2);
        let s = room(&p, "S");
        let t3 = &p.tokens()[2];
        assert_eq!((t3.current, t3.target), (s, s));
        assert!(t3.history.is_empty());
    }

    #[test]
    fn replay_matches_play_at_every_cursor() {
        let mut played = playback(CHAIN);
        let mut replayed = playback(CHAIN);
        for n in 0..=played.total_moves() {
            play_to(&mut played, n);
            replayed.seek(n);
            assert_eq!(logical(&played), logical(&replayed), "cursor {n}");
        }
    }

    #[test]
    fn status_reflects_engine() {
        let mut p = playback(CHAIN);
        p.seek(3);
        let status = PlaybackStatus::from(&p);
        assert_eq!(status.cursor, 3);
        assert_eq!(status.total_moves, 6);
        assert_eq!(status.state, PlaybackState::Paused);
        assert_eq!(status.progress, 0.5);
        assert!(!status.finished);
    }

    #[test]
    fn empty_schedule_is_safe() {
        let mut p = playback("4\n##start\nA 0 0\n");
        p.toggle_pause();
        for _ in 0..10 {
            p.tick(1000);
        }
        assert_eq!(p.cursor(), 0);
        assert!(p.is_finished());
        assert_eq!(p.progress(), 0.0);
    }

    #[test]
    fn rejects_schedule_beyond_token_count() {
        let mut farm = parse(SMALL).unwrap();
        farm.token_count = 1;
        assert!(matches!(
            Playback::new(farm, PlaybackConfig::default()),
            Err(Error::InvalidSchedule(_))
        ));
    }

    #[test]
    fn rejects_bad_interpolation_step() {
        for step in [0.0, -0.1, 1.5, f64::NAN, f64::INFINITY] {
            let config = PlaybackConfig {
                interpolation_step: step,
                ..PlaybackConfig::default()
            };
            assert!(
                matches!(
                    Playback::new(parse(SMALL).unwrap(), config),
                    Err(Error::InvalidConfig(_))
                ),
                "step {step} accepted"
            );
        }

        let config = PlaybackConfig {
            interpolation_step: 1.0,
            ..PlaybackConfig::default()
        };
        assert!(Playback::new(parse(SMALL).unwrap(), config).is_ok());
    }

    proptest! {
        #[test]
        fn forward_then_back_restores_state(c in 1usize..6) {
            let mut p = playback(CHAIN);
            p.seek(c);
            let expected = logical(&p);

            p.step_forward().unwrap();
            p.step_backward().unwrap();
            prop_assert_eq!(p.cursor(), c);
            prop_assert_eq!(logical(&p), expected);
        }

        #[test]
        fn replay_matches_play(n in 0usize..=6, delay in 1u64..3000) {
            let config = PlaybackConfig { move_delay_ms: delay, interpolation_step: 0.1 };
            let mut played = Playback::new(parse(CHAIN).unwrap(), config).unwrap();
            let mut replayed = Playback::new(parse(CHAIN).unwrap(), config).unwrap();

            play_to(&mut played, n);
            replayed.seek(n);
            prop_assert_eq!(logical(&played), logical(&replayed));
        }
    }
}
