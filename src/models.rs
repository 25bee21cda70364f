//! Core data models for chunk metadata.
//!
//! [`SemanticChunk`] is the canonical, nested representation of one
//! chunk's metadata as it flows through the segmentation and quality
//! pipeline. Its flattened counterpart for storage backends lives in
//! [`crate::flat`].
//!
//! A chunk owns its [`ChunkMetrics`] (and the metrics own their
//! [`ChunkFeedback`]) outright. `links` and `block_id` are lookup keys
//! into other chunks and blocks, never ownership.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::status::ChunkStatus;
use crate::types::{ChunkRole, ChunkType};

/// User-feedback counters for one chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkFeedback {
    #[serde(default)]
    pub accepted: u32,
    #[serde(default)]
    pub rejected: u32,
    #[serde(default)]
    pub modifications: u32,
}

/// Quality and usage measurements attached to a chunk.
///
/// Normalized scores are constrained to `[0, 1]`; `matches` is a plain
/// count. All fields are optional; a chunk fresh out of segmentation
/// typically has none of them yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetrics {
    pub quality_score: Option<f64>,
    pub coverage: Option<f64>,
    pub cohesion: Option<f64>,
    pub boundary_prev: Option<f64>,
    pub boundary_next: Option<f64>,
    pub matches: Option<u32>,
    pub used_in_generation: Option<bool>,
    pub used_as_input: Option<bool>,
    pub used_as_context: Option<bool>,
    pub feedback: Option<ChunkFeedback>,
}

impl ChunkMetrics {
    /// True when no measurement is present at all.
    pub fn is_empty(&self) -> bool {
        self.quality_score.is_none()
            && self.coverage.is_none()
            && self.cohesion.is_none()
            && self.boundary_prev.is_none()
            && self.boundary_next.is_none()
            && self.matches.is_none()
            && self.used_in_generation.is_none()
            && self.used_as_input.is_none()
            && self.used_as_context.is_none()
            && self.feedback.is_none()
    }
}

/// Canonical, nested representation of one chunk's metadata.
///
/// Instances are produced by [`crate::builder::ChunkBuilder`], which
/// auto-fills `uuid`, `sha256`, and `created_at` and runs the full
/// validation rule set; a `SemanticChunk` is never observable in a
/// partially valid state. Pipeline stages mutate it in place as `status`
/// advances.
///
/// `start` and `end` are offsets of the chunk within its source, in one
/// consistent unit (bytes or characters) chosen by the segmentation
/// pipeline, with `start <= end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticChunk {
    pub uuid: Uuid,
    #[serde(rename = "type")]
    pub chunk_type: ChunkType,
    pub text: String,
    pub language: String,
    /// Hex digest of `text`. Supplied digests are trusted as-is; only
    /// the builder ever computes one, and conversion copies it verbatim.
    pub sha256: String,
    pub start: u64,
    pub end: u64,

    pub source_id: Option<Uuid>,
    pub project: Option<String>,
    pub task_id: Option<String>,
    pub subtask_id: Option<String>,
    pub unit_id: Option<String>,
    pub role: Option<ChunkRole>,
    pub summary: Option<String>,
    pub source_path: Option<String>,
    /// Ordered line numbers in the source file, usually a `[first, last]`
    /// pair.
    pub source_lines: Option<Vec<u32>>,
    pub ordinal: Option<u32>,
    pub created_at: Option<DateTime<FixedOffset>>,
    pub status: Option<ChunkStatus>,
    pub chunking_version: Option<String>,
    pub embedding: Option<Vec<f32>>,
    /// Relations to other chunks, each entry `relation:uuid`.
    pub links: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub metrics: Option<ChunkMetrics>,
    /// The source block this chunk belongs to. Assigned by an integration
    /// layer, never by the segmentation service itself.
    pub block_id: Option<Uuid>,
    pub block_type: Option<ChunkType>,
    pub block_index: Option<u32>,
    pub block_meta: Option<Map<String, Value>>,
}

impl SemanticChunk {
    /// True when the chunk has a ranked status at or above `min` in the
    /// quality ordering. Chunks without a status, or with an unranked
    /// one, never satisfy a minimum.
    pub fn status_at_least(&self, min: ChunkStatus) -> bool {
        self.status.map_or(false, |s| s.at_least(min))
    }
}
