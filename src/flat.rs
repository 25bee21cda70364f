//! Single-level, primitive-typed projection of a chunk.
//!
//! [`FlatChunk`] carries the same semantic fields as
//! [`crate::models::SemanticChunk`] but admits no nesting: every value
//! is a string, number, or boolean, so a record can be persisted
//! directly as one row or document in a key-value or tabular store.
//!
//! The projection rules live in [`crate::convert`]. A `FlatChunk` is a
//! derived artifact: mutate the structured form and re-derive rather
//! than editing a flat record in place, or the two will diverge.

use serde::{Deserialize, Serialize};

/// Flat storage form of one chunk.
///
/// Enum-valued fields hold their string form, UUIDs and timestamps are
/// strings, list fields are comma-joined, `source_lines` is split into a
/// start/end pair, metrics and feedback counters are hoisted to the top
/// level, and `block_meta` is carried as a JSON-encoded string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatChunk {
    pub uuid: String,
    #[serde(rename = "type")]
    pub chunk_type: String,
    pub text: String,
    pub language: String,
    pub sha256: String,
    pub start: u64,
    pub end: u64,

    pub source_id: Option<String>,
    pub project: Option<String>,
    pub task_id: Option<String>,
    pub subtask_id: Option<String>,
    pub unit_id: Option<String>,
    pub role: Option<String>,
    pub summary: Option<String>,
    pub source_path: Option<String>,
    pub source_lines_start: Option<u32>,
    pub source_lines_end: Option<u32>,
    pub ordinal: Option<u32>,
    pub created_at: Option<String>,
    pub status: Option<String>,
    pub chunking_version: Option<String>,
    /// Comma-joined floats.
    pub embedding: Option<String>,
    /// Comma-joined bare UUIDs of `parent` links.
    pub link_parent: Option<String>,
    /// Comma-joined bare UUIDs of all non-parent links.
    pub link_related: Option<String>,
    /// Comma-joined tags.
    pub tags: Option<String>,

    pub quality_score: Option<f64>,
    pub coverage: Option<f64>,
    pub cohesion: Option<f64>,
    pub boundary_prev: Option<f64>,
    pub boundary_next: Option<f64>,
    pub matches: Option<u32>,
    pub used_in_generation: Option<bool>,
    pub used_as_input: Option<bool>,
    pub used_as_context: Option<bool>,
    pub feedback_accepted: Option<u32>,
    pub feedback_rejected: Option<u32>,
    pub feedback_modifications: Option<u32>,

    pub block_id: Option<String>,
    pub block_type: Option<String>,
    pub block_index: Option<u32>,
    /// JSON-encoded object.
    pub block_meta: Option<String>,
}
