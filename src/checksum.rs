//! Checksum utilities for emitted schemas
//!
//! Rendering is deterministic, so the SHA256 of the compact text identifies a
//! schema tree: generators can skip rewriting output whose checksum is unchanged.

use sha2::{Digest, Sha256};
use std::fmt;

use crate::arena::{Arena, NodeId};
use crate::config::{OutputFormat, DEFAULT_MAX_DEPTH};
use crate::error::Result;
use crate::render::render;

/// SHA256 checksum of rendered schema text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum(String);

impl Checksum {
    /// Compute checksum from raw bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{:x}", hash))
    }

    /// Compute checksum from rendered schema text
    pub fn of_text(content: &str) -> Self {
        Self::from_bytes(content.as_bytes())
    }

    /// Compute checksum of the canonical compact rendering of `root`
    pub fn of_node(arena: &Arena, root: NodeId) -> Result<Self> {
        let text = render(arena, root, OutputFormat::Compact, DEFAULT_MAX_DEPTH)?;
        Ok(Self::of_text(&text))
    }

    /// Get the hex string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Verify that rendered text matches this checksum
    pub fn verify(&self, content: &str) -> bool {
        *self == Self::of_text(content)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
