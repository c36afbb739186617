//! Read-only view of a playback for renderers.

use colony_graph::{Graph, NodeIdx, TokenId};
use serde::Serialize;

use crate::playback::{Playback, PlaybackStatus, Position, Token};

/// Where one token is drawn this frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenView {
    pub id: TokenId,
    pub position: Position,
    pub current: NodeIdx,
    pub target: NodeIdx,
    pub progress: f64,
}

impl From<&Token> for TokenView {
    fn from(token: &Token) -> Self {
        Self {
            id: token.id,
            position: token.position,
            current: token.current,
            target: token.target,
            progress: token.progress,
        }
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot<'a> {
    pub graph: &'a Graph,
    pub tokens: Vec<TokenView>,
    pub status: PlaybackStatus,
}

impl Playback {
    /// Capture the current frame.
    pub fn snapshot(&self) -> FrameSnapshot<'_> {
        FrameSnapshot {
            graph: self.graph(),
            tokens: self.tokens().iter().map(TokenView::from).collect(),
            status: PlaybackStatus::from(self),
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus::from(self)
    }
}
