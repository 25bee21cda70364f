//! Construction facade for chunk metadata.
//!
//! [`ChunkBuilder`] turns a raw field mapping ([`ChunkInput`]) into a
//! validated [`SemanticChunk`] or [`FlatChunk`]. It auto-generates
//! `uuid`, `sha256`, and `created_at` when they are omitted, applies the
//! project-wide defaults it was constructed with, and runs the full
//! validation rule set before anything is returned, so a caller never
//! sees a partially valid chunk.
//!
//! Failures are reported in aggregate: `build` returns every rule
//! violation found, not just the first.

use chrono::Utc;
use sha2::{Digest, Sha256};
use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::config::BuilderDefaults;
use crate::error::{ValidationError, ValidationErrors};
use crate::flat::FlatChunk;
use crate::models::{ChunkMetrics, SemanticChunk};
use crate::status::ChunkStatus;
use crate::types::{ChunkRole, ChunkType};
use crate::validate;

/// Lowercase hex SHA-256 digest of a text.
pub fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Raw fields for one chunk, as supplied by a caller or a segmentation
/// service.
///
/// Every field is optional at this stage; required-field checks happen
/// in [`ChunkBuilder::build`]. UUIDs, timestamps, and enum values arrive
/// as strings, metrics as a nested mapping. The struct deserializes
/// directly from a JSON document shaped that way.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkInput {
    pub uuid: Option<String>,
    #[serde(rename = "type")]
    pub chunk_type: Option<String>,
    pub text: Option<String>,
    pub language: Option<String>,
    pub sha256: Option<String>,
    pub start: Option<u64>,
    pub end: Option<u64>,
    pub source_id: Option<String>,
    pub project: Option<String>,
    pub task_id: Option<String>,
    pub subtask_id: Option<String>,
    pub unit_id: Option<String>,
    pub role: Option<String>,
    pub summary: Option<String>,
    pub source_path: Option<String>,
    pub source_lines: Option<Vec<u32>>,
    pub ordinal: Option<u32>,
    pub created_at: Option<String>,
    pub status: Option<String>,
    pub chunking_version: Option<String>,
    pub embedding: Option<Vec<f32>>,
    pub links: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub metrics: Option<ChunkMetrics>,
    pub block_id: Option<String>,
    pub block_type: Option<String>,
    pub block_index: Option<u32>,
    pub block_meta: Option<Map<String, Value>>,
}

/// Builds validated chunks from raw fields.
///
/// Defaults are an explicit value handed in at construction, not
/// ambient state; two builders with different defaults can coexist in
/// one process.
#[derive(Debug, Clone, Default)]
pub struct ChunkBuilder {
    defaults: BuilderDefaults,
}

impl ChunkBuilder {
    /// A builder with no project-wide defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: BuilderDefaults) -> Self {
        ChunkBuilder { defaults }
    }

    /// Build a structured chunk, reporting every rule violation found.
    pub fn build(&self, input: ChunkInput) -> Result<SemanticChunk, ValidationErrors> {
        let mut errors = Vec::new();

        let text = match input.text {
            Some(t) => t,
            None => {
                errors.push(ValidationError::MissingRequiredField("text"));
                String::new()
            }
        };

        let chunk_type = match input.chunk_type.as_deref() {
            Some(s) => push_err(&mut errors, ChunkType::parse("type", s)),
            None => {
                errors.push(ValidationError::MissingRequiredField("type"));
                None
            }
        };

        let language = match input.language.or_else(|| self.defaults.language.clone()) {
            Some(l) => Some(l),
            None => {
                errors.push(ValidationError::MissingRequiredField("language"));
                None
            }
        };

        let uuid = match input.uuid.as_deref() {
            Some(s) => push_err(&mut errors, validate::uuid_v4("uuid", s)),
            None => Some(Uuid::new_v4()),
        };
        let source_id = match input.source_id.as_deref() {
            Some(s) => push_err(&mut errors, validate::uuid_v4("source_id", s)),
            None => None,
        };
        let block_id = match input.block_id.as_deref() {
            Some(s) => push_err(&mut errors, validate::uuid_v4("block_id", s)),
            None => None,
        };

        let start = match input.start {
            Some(v) => Some(v),
            None => {
                errors.push(ValidationError::MissingRequiredField("start"));
                None
            }
        };
        let end = match input.end {
            Some(v) => Some(v),
            None => {
                errors.push(ValidationError::MissingRequiredField("end"));
                None
            }
        };
        if let (Some(s), Some(e)) = (start, end) {
            if let Err(err) = validate::offsets(s, e) {
                errors.push(err);
            }
        }

        let role = match input.role.as_deref() {
            Some(s) => push_err(&mut errors, ChunkRole::parse("role", s)),
            None => None,
        };
        let block_type = match input.block_type.as_deref() {
            Some(s) => push_err(&mut errors, ChunkType::parse("block_type", s)),
            None => None,
        };
        let status = match input.status.as_deref() {
            Some(s) => push_err(&mut errors, ChunkStatus::parse("status", s)),
            None => Some(self.defaults.status.unwrap_or(ChunkStatus::Raw)),
        };

        let created_at = match input.created_at.as_deref() {
            Some(s) => push_err(&mut errors, validate::timestamp("created_at", s)),
            None => Some(Utc::now().fixed_offset()),
        };

        let links = normalize_list(input.links);
        if let Some(entries) = &links {
            for entry in entries {
                if let Err(err) = validate::link(entry) {
                    errors.push(err);
                }
            }
        }

        let metrics = match input.metrics {
            Some(m) => {
                validate::collect_metrics(&m, &mut errors);
                // An all-empty block carries no information; drop it so
                // the flat projection round-trips exactly.
                if m.is_empty() {
                    None
                } else {
                    Some(m)
                }
            }
            None => None,
        };

        // A supplied digest is trusted as-is; only an omitted one is
        // computed here.
        let sha256 = input.sha256.unwrap_or_else(|| sha256_hex(&text));

        match (uuid, chunk_type, language, start, end) {
            (Some(uuid), Some(chunk_type), Some(language), Some(start), Some(end))
                if errors.is_empty() =>
            {
                Ok(SemanticChunk {
                    uuid,
                    chunk_type,
                    text,
                    language,
                    sha256,
                    start,
                    end,
                    source_id,
                    project: input.project.or_else(|| self.defaults.project.clone()),
                    task_id: input.task_id,
                    subtask_id: input.subtask_id,
                    unit_id: input.unit_id.or_else(|| self.defaults.unit_id.clone()),
                    role,
                    summary: input.summary,
                    source_path: input.source_path,
                    source_lines: normalize_lines(input.source_lines),
                    ordinal: input.ordinal,
                    created_at,
                    status,
                    chunking_version: input
                        .chunking_version
                        .or_else(|| self.defaults.chunking_version.clone()),
                    embedding: input.embedding,
                    links,
                    tags: input.tags,
                    metrics,
                    block_id,
                    block_type,
                    block_index: input.block_index,
                    block_meta: input.block_meta,
                })
            }
            // Every None above pushed an error, so errors is non-empty
            // here.
            _ => Err(ValidationErrors(errors)),
        }
    }

    /// Build the flat storage form. Same validation as [`build`];
    /// the result always restores to the structured chunk it came from.
    ///
    /// [`build`]: ChunkBuilder::build
    pub fn build_flat(&self, input: ChunkInput) -> Result<FlatChunk, ValidationErrors> {
        self.build(input).map(|chunk| chunk.to_flat())
    }
}

fn push_err<T>(errors: &mut Vec<ValidationError>, result: Result<T, ValidationError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            errors.push(err);
            None
        }
    }
}

/// Empty lists carry no information; the flat form cannot distinguish
/// them from absence, so they are normalized to `None` up front.
fn normalize_list<T>(list: Option<Vec<T>>) -> Option<Vec<T>> {
    list.filter(|v| !v.is_empty())
}

/// Canonicalize source lines: a single value covers one line, which the
/// flat form stores as an equal start/end pair.
fn normalize_lines(lines: Option<Vec<u32>>) -> Option<Vec<u32>> {
    match lines.as_deref() {
        None | Some([]) => None,
        Some([only]) => Some(vec![*only, *only]),
        _ => lines,
    }
}
