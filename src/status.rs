//! Data-quality lifecycle status.
//!
//! A chunk moves through a quality-improvement ordering as pipeline
//! stages clean and verify it:
//!
//! ```text
//! raw → cleaned → verified → validated → reliable
//! ```
//!
//! The remaining states (`new`, `indexed`, `obsolete`, `rejected`,
//! `in_progress`, `needs_review`, `archived`) sit outside that ordering
//! and carry no rank.
//!
//! Transitions are deliberately unrestricted: any status may be assigned
//! over any other by an external pipeline stage. The model only provides
//! the ordering, for filtering chunk sets by quality stage.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Lifecycle stage of a chunk's metadata quality.
///
/// Serialized in snake_case (`"raw"`, `"needs_review"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkStatus {
    New,
    Raw,
    Cleaned,
    Verified,
    Validated,
    Reliable,
    Indexed,
    Obsolete,
    Rejected,
    InProgress,
    NeedsReview,
    Archived,
}

impl ChunkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkStatus::New => "new",
            ChunkStatus::Raw => "raw",
            ChunkStatus::Cleaned => "cleaned",
            ChunkStatus::Verified => "verified",
            ChunkStatus::Validated => "validated",
            ChunkStatus::Reliable => "reliable",
            ChunkStatus::Indexed => "indexed",
            ChunkStatus::Obsolete => "obsolete",
            ChunkStatus::Rejected => "rejected",
            ChunkStatus::InProgress => "in_progress",
            ChunkStatus::NeedsReview => "needs_review",
            ChunkStatus::Archived => "archived",
        }
    }

    /// Parse the string form, attributing failures to `field`.
    pub fn parse(field: &'static str, value: &str) -> Result<Self, ValidationError> {
        match value {
            "new" => Ok(ChunkStatus::New),
            "raw" => Ok(ChunkStatus::Raw),
            "cleaned" => Ok(ChunkStatus::Cleaned),
            "verified" => Ok(ChunkStatus::Verified),
            "validated" => Ok(ChunkStatus::Validated),
            "reliable" => Ok(ChunkStatus::Reliable),
            "indexed" => Ok(ChunkStatus::Indexed),
            "obsolete" => Ok(ChunkStatus::Obsolete),
            "rejected" => Ok(ChunkStatus::Rejected),
            "in_progress" => Ok(ChunkStatus::InProgress),
            "needs_review" => Ok(ChunkStatus::NeedsReview),
            "archived" => Ok(ChunkStatus::Archived),
            other => Err(ValidationError::InvalidEnumValue {
                field,
                value: other.to_string(),
            }),
        }
    }

    /// Position in the quality-improvement ordering, `1` (`raw`) through
    /// `5` (`reliable`). Statuses outside the ordering return `None` and
    /// are excluded from rank-based comparisons.
    pub fn rank(&self) -> Option<u8> {
        match self {
            ChunkStatus::Raw => Some(1),
            ChunkStatus::Cleaned => Some(2),
            ChunkStatus::Verified => Some(3),
            ChunkStatus::Validated => Some(4),
            ChunkStatus::Reliable => Some(5),
            _ => None,
        }
    }

    /// True when both statuses are ranked and `self` sits at or above
    /// `min` in the quality ordering. Unranked statuses never satisfy a
    /// minimum.
    pub fn at_least(&self, min: ChunkStatus) -> bool {
        match (self.rank(), min.rank()) {
            (Some(own), Some(floor)) => own >= floor,
            _ => false,
        }
    }
}
