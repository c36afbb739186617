//! Line-oriented reader for farm descriptions and solver output.
//!
//! ```text
//! 2
//! ##start
//! A 0 0
//! ##end
//! B 10 0
//! A-B
//! L1-B L2-B
//! ```
//!
//! The first non-empty line is the token count. Room lines follow until the
//! first line that looks like a link or a move; from then on only links and
//! moves are read.

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::graph::{Graph, Point};
use crate::scale::Viewport;
use crate::schedule::{Move, MoveSchedule, Step, TokenId};

/// Case-insensitive markers that flag the whole input as an upstream failure.
const UPSTREAM_MARKERS: [&str; 2] = ["error", "exit status"];

const START_MARKER: &str = "##start";
const END_MARKER: &str = "##end";

/// Prefix of every token in a move line.
const TOKEN_PREFIX: char = 'L';

/// A fully parsed farm, ready for playback.
#[derive(Debug, Clone)]
pub struct Farm {
    pub graph: Graph,
    pub schedule: MoveSchedule,
    pub token_count: u32,
}

impl Farm {
    /// Ids of every token, in order.
    pub fn tokens(&self) -> impl Iterator<Item = TokenId> {
        (1..=self.token_count).map(TokenId)
    }
}

/// Parse `input` and fit the rooms into the default viewport.
pub fn parse(input: &str) -> Result<Farm> {
    parse_with(input, &Viewport::default())
}

/// Parse `input` and fit the rooms into `viewport`.
pub fn parse_with(input: &str, viewport: &Viewport) -> Result<Farm> {
    if is_upstream_error(input) {
        return Err(Error::Upstream(input.to_string()));
    }

    let mut lines = input
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let (count_line, count_text) = lines
        .next()
        .ok_or_else(|| Error::malformed(0, "empty input"))?;
    let token_count = parse_token_count(count_line, count_text)?;

    let mut parser = Parser::new(token_count);
    for (n, line) in lines {
        parser.line(n, line)?;
    }
    parser.finish(viewport)
}

/// True if the raw text is an error report rather than a farm.
pub fn is_upstream_error(input: &str) -> bool {
    let lower = input.to_lowercase();
    UPSTREAM_MARKERS.iter().any(|m| lower.contains(m))
}

fn parse_token_count(line: usize, text: &str) -> Result<u32> {
    let n: i64 = text
        .parse()
        .map_err(|_| Error::malformed(line, format!("invalid number of ants: {text}")))?;
    if n <= 0 {
        return Err(Error::malformed(line, "ant number must be higher than 0"));
    }
    u32::try_from(n).map_err(|_| Error::malformed(line, format!("too many ants: {n}")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Rooms,
    Links,
}

struct Parser {
    graph: Graph,
    moves: Vec<Move>,
    token_count: u32,
    section: Section,
    pending_start: bool,
    pending_end: bool,
}

impl Parser {
    fn new(token_count: u32) -> Self {
        Self {
            graph: Graph::new(),
            moves: Vec::new(),
            token_count,
            section: Section::Rooms,
            pending_start: false,
            pending_end: false,
        }
    }

    fn line(&mut self, n: usize, line: &str) -> Result<()> {
        if self.section == Section::Rooms {
            if line == START_MARKER {
                self.pending_start = true;
                return Ok(());
            }
            if line == END_MARKER {
                self.pending_end = true;
                return Ok(());
            }
            if line.starts_with('#') {
                return Ok(());
            }

            let is_move = line.starts_with(TOKEN_PREFIX) && line.contains('-');
            let fields: Vec<&str> = line.split_whitespace().collect();
            if !is_move && fields.len() == 3 {
                return self.room(n, &fields);
            }
            if !line.contains('-') {
                return Err(Error::malformed(n, format!("invalid room line: {line}")));
            }

            debug!(line = n, "room section ended");
            self.section = Section::Links;
        }

        if line.starts_with('#') {
            debug!(line = n, "ignoring comment after room section");
            Ok(())
        } else if line.starts_with(TOKEN_PREFIX) {
            self.turn(n, line)
        } else if line.contains('-') {
            self.link(n, line)
        } else {
            debug!(line = n, text = line, "ignoring unrecognised line");
            Ok(())
        }
    }

    fn room(&mut self, n: usize, fields: &[&str]) -> Result<()> {
        let name = fields[0];
        if name.starts_with(TOKEN_PREFIX) {
            return Err(Error::malformed(n, format!("invalid room name: {name}")));
        }
        let coord = |s: &str| {
            s.parse::<i64>()
                .map_err(|_| Error::malformed(n, format!("invalid room coordinate: {s}")))
        };
        let raw = Point::new(coord(fields[1])?, coord(fields[2])?);

        let idx = self
            .graph
            .add_node(name, raw)
            .ok_or_else(|| Error::malformed(n, format!("duplicate room name: {name}")))?;

        if std::mem::take(&mut self.pending_start) {
            self.graph.set_start(idx);
        }
        if std::mem::take(&mut self.pending_end) {
            self.graph.set_end(idx);
        }
        Ok(())
    }

    fn link(&mut self, n: usize, line: &str) -> Result<()> {
        let parts: Vec<&str> = line.split('-').collect();
        let [src, dst] = parts[..] else {
            return Err(Error::malformed(n, format!("invalid link format: {line}")));
        };

        match (self.graph.lookup(src), self.graph.lookup(dst)) {
            (Some(a), Some(b)) => {
                if !self.graph.add_edge(a, b) {
                    debug!(line = n, link = line, "dropping self or duplicate link");
                }
            }
            _ => debug!(line = n, link = line, "dropping link to unknown room"),
        }
        Ok(())
    }

    fn turn(&mut self, n: usize, line: &str) -> Result<()> {
        let mut turn = Move::new();
        for entry in line.split_whitespace() {
            let step = self.step(n, entry)?;
            if !turn.push(step) {
                return Err(Error::malformed(
                    n,
                    format!("{} moves twice in one turn", step.token),
                ));
            }
        }
        self.moves.push(turn);
        Ok(())
    }

    fn step(&self, n: usize, entry: &str) -> Result<Step> {
        let bad = || Error::malformed(n, format!("invalid move: {entry}"));

        let (token, room) = entry
            .strip_prefix(TOKEN_PREFIX)
            .and_then(|rest| rest.split_once('-'))
            .ok_or_else(bad)?;
        if room.contains('-') {
            return Err(bad());
        }

        let id: u32 = token.parse().map_err(|_| bad())?;
        if id == 0 || id > self.token_count {
            return Err(Error::malformed(n, format!("unknown ant: L{token}")));
        }
        let to = self
            .graph
            .lookup(room)
            .ok_or_else(|| Error::malformed(n, format!("unknown room in move: {room}")))?;

        Ok(Step {
            token: TokenId(id),
            to,
        })
    }

    fn finish(mut self, viewport: &Viewport) -> Result<Farm> {
        if self.pending_start || self.pending_end {
            debug!("start/end marker not followed by a room");
        }
        if self.graph.start().is_none() {
            return Err(Error::MissingStartNode);
        }

        self.graph.scale_to(viewport);
        info!(
            rooms = self.graph.len(),
            links = self.graph.edges().len(),
            moves = self.moves.len(),
            ants = self.token_count,
            "parsed farm"
        );

        Ok(Farm {
            graph: self.graph,
            schedule: MoveSchedule::new(self.moves),
            token_count: self.token_count,
        })
    }
}
