//! Colony Farm Model
//!
//! Rooms, tunnels and a precomputed schedule of ant moves, read from the
//! line-oriented text a path solver prints.
//!
//! # Data flow
//!
//! ```text
//! raw text --parse--> Graph + MoveSchedule --Viewport::fit--> scaled rooms
//! ```
//!
//! Rooms are stored in an arena and referenced by [`NodeIdx`]; moves are
//! resolved to indices at parse time so playback never looks names up.
//!
//! # Usage
//!
//! ```
//! let farm = colony_graph::parse("1\n##start\nA 0 0\nB 4 0\nA-B\nL1-B\n").unwrap();
//! assert_eq!(farm.graph.len(), 2);
//! assert_eq!(farm.schedule.len(), 1);
//! ```

mod error;
mod graph;
mod parse;
mod scale;
mod schedule;

pub use error::{Error, ErrorKind, Result};
pub use graph::{Edge, Graph, Node, NodeIdx, Point};
pub use parse::{is_upstream_error, parse, parse_with, Farm};
pub use scale::{Fit, Viewport};
pub use schedule::{Move, MoveSchedule, Step, TokenId};
