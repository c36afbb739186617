//! Farm graph: named rooms on an integer plane, joined by render-only tunnels.
//!
//! Rooms live in a contiguous arena and are addressed by [`NodeIdx`]. The
//! name index is only consulted while parsing; playback works purely on
//! indices.

use std::collections::{HashMap, HashSet};
use std::ops::{Add, Sub};

/// An integer position, either raw (as written in the input) or scaled to
/// the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    /// Origin of the plane.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create a new point.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Point {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Index of a room in its [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeIdx(pub u32);

impl NodeIdx {
    /// Position in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A room.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Unique name as written in the input
    pub name: String,
    /// Coordinates as written in the input
    pub raw: Point,
    /// Viewport coordinates, filled in by [`Graph::scale_to`]
    pub scaled: Point,
    pub is_start: bool,
    pub is_end: bool,
}

/// An undirected tunnel between two rooms. Only ever drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub a: NodeIdx,
    pub b: NodeIdx,
}

impl Edge {
    /// True if this edge joins `x` and `y` in either orientation.
    pub fn joins(&self, x: NodeIdx, y: NodeIdx) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }
}

/// The farm: rooms, tunnels and the designated start/end rooms.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Graph {
    nodes: Vec<Node>,
    #[cfg_attr(feature = "serde", serde(skip))]
    by_name: HashMap<String, NodeIdx>,
    edges: Vec<Edge>,
    /// Stored tunnels as `(min, max)` endpoint pairs
    #[cfg_attr(feature = "serde", serde(skip))]
    edge_keys: HashSet<(NodeIdx, NodeIdx)>,
    start: Option<NodeIdx>,
    end: Option<NodeIdx>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a room. Returns `None` if the name is already taken.
    pub fn add_node(&mut self, name: impl Into<String>, raw: Point) -> Option<NodeIdx> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return None;
        }
        let idx = NodeIdx(self.nodes.len() as u32);
        self.by_name.insert(name.clone(), idx);
        self.nodes.push(Node {
            name,
            raw,
            scaled: Point::ORIGIN,
            is_start: false,
            is_end: false,
        });
        Some(idx)
    }

    /// Designate the start room. A previously flagged room loses its flag.
    pub fn set_start(&mut self, idx: NodeIdx) {
        if let Some(prev) = self.start.replace(idx) {
            self.nodes[prev.index()].is_start = false;
        }
        self.nodes[idx.index()].is_start = true;
    }

    /// Designate the end room. A previously flagged room loses its flag.
    pub fn set_end(&mut self, idx: NodeIdx) {
        if let Some(prev) = self.end.replace(idx) {
            self.nodes[prev.index()].is_end = false;
        }
        self.nodes[idx.index()].is_end = true;
    }

    /// Add a tunnel. Self-loops and duplicates are ignored; returns whether
    /// the edge was stored.
    pub fn add_edge(&mut self, a: NodeIdx, b: NodeIdx) -> bool {
        if a == b || !self.edge_keys.insert((a.min(b), a.max(b))) {
            return false;
        }
        self.edges.push(Edge { a, b });
        true
    }

    /// Look a room up by name.
    pub fn lookup(&self, name: &str) -> Option<NodeIdx> {
        self.by_name.get(name).copied()
    }

    /// Get a room by index.
    ///
    /// Panics if `idx` did not come from this graph.
    pub fn node(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx.index()]
    }

    /// All rooms, in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All tunnels, in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The start room, if one was flagged.
    pub fn start(&self) -> Option<NodeIdx> {
        self.start
    }

    /// The end room, if one was flagged.
    pub fn end(&self) -> Option<NodeIdx> {
        self.end
    }

    /// Number of rooms.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if there are no rooms.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Fit all rooms into `viewport`, updating each room's scaled position.
    pub fn scale_to(&mut self, viewport: &crate::Viewport) {
        let raw: Vec<Point> = self.nodes.iter().map(|n| n.raw).collect();
        for (node, scaled) in self.nodes.iter_mut().zip(viewport.fit(&raw)) {
            node.scaled = scaled;
        }
    }
}
