//! Conversion between the structured and flat chunk forms.
//!
//! [`SemanticChunk::to_flat`] is total: every valid structured chunk
//! projects to a flat record. [`FlatChunk::to_semantic`] is its inverse
//! and fails only on structurally malformed flat input: a joined list
//! that does not parse, bad `block_meta` JSON, or an unknown enum
//! string.
//!
//! `sha256` is copied verbatim in both directions and never recomputed
//! here; hashing is a builder responsibility.
//!
//! Round-trip guarantee: `to_semantic(to_flat(x))` reproduces `x` for
//! every builder-produced chunk, and `to_flat(to_semantic(y))`
//! reproduces `y` for every `y` that `to_flat` produced. Link relations
//! other than `parent` are normalized to `related` by a round trip,
//! since the flat form partitions links by relation kind and stores
//! bare UUIDs.

use serde_json::{Map, Value};

use crate::error::ConvertError;
use crate::flat::FlatChunk;
use crate::models::{ChunkFeedback, ChunkMetrics, SemanticChunk};
use crate::status::ChunkStatus;
use crate::types::{ChunkRole, ChunkType};
use crate::validate;

impl SemanticChunk {
    /// Project this chunk onto its single-level storage form.
    pub fn to_flat(&self) -> FlatChunk {
        let (link_parent, link_related) = partition_links(self.links.as_deref());
        let (source_lines_start, source_lines_end) =
            split_source_lines(self.source_lines.as_deref());
        let metrics = self.metrics.clone().unwrap_or_default();
        let feedback = metrics.feedback;

        FlatChunk {
            uuid: self.uuid.to_string(),
            chunk_type: self.chunk_type.as_str().to_string(),
            text: self.text.clone(),
            language: self.language.clone(),
            sha256: self.sha256.clone(),
            start: self.start,
            end: self.end,
            source_id: self.source_id.map(|id| id.to_string()),
            project: self.project.clone(),
            task_id: self.task_id.clone(),
            subtask_id: self.subtask_id.clone(),
            unit_id: self.unit_id.clone(),
            role: self.role.map(|r| r.as_str().to_string()),
            summary: self.summary.clone(),
            source_path: self.source_path.clone(),
            source_lines_start,
            source_lines_end,
            ordinal: self.ordinal,
            created_at: self.created_at.map(|dt| dt.to_rfc3339()),
            status: self.status.map(|s| s.as_str().to_string()),
            chunking_version: self.chunking_version.clone(),
            embedding: self.embedding.as_ref().map(|e| join_floats(e)),
            link_parent,
            link_related,
            tags: self.tags.as_ref().map(|t| t.join(",")),
            quality_score: metrics.quality_score,
            coverage: metrics.coverage,
            cohesion: metrics.cohesion,
            boundary_prev: metrics.boundary_prev,
            boundary_next: metrics.boundary_next,
            matches: metrics.matches,
            used_in_generation: metrics.used_in_generation,
            used_as_input: metrics.used_as_input,
            used_as_context: metrics.used_as_context,
            feedback_accepted: feedback.as_ref().map(|f| f.accepted),
            feedback_rejected: feedback.as_ref().map(|f| f.rejected),
            feedback_modifications: feedback.as_ref().map(|f| f.modifications),
            block_id: self.block_id.map(|id| id.to_string()),
            block_type: self.block_type.map(|t| t.as_str().to_string()),
            block_index: self.block_index,
            block_meta: self
                .block_meta
                .as_ref()
                .map(|m| Value::Object(m.clone()).to_string()),
        }
    }
}

impl FlatChunk {
    /// Restore the structured form from this flat record.
    pub fn to_semantic(&self) -> Result<SemanticChunk, ConvertError> {
        let uuid = validate::uuid_v4("uuid", &self.uuid)?;
        let chunk_type = ChunkType::parse("type", &self.chunk_type)?;
        let source_id = match &self.source_id {
            Some(s) => Some(validate::uuid_v4("source_id", s)?),
            None => None,
        };
        let block_id = match &self.block_id {
            Some(s) => Some(validate::uuid_v4("block_id", s)?),
            None => None,
        };
        let role = match &self.role {
            Some(s) => Some(ChunkRole::parse("role", s)?),
            None => None,
        };
        let status = match &self.status {
            Some(s) => Some(ChunkStatus::parse("status", s)?),
            None => None,
        };
        let block_type = match &self.block_type {
            Some(s) => Some(ChunkType::parse("block_type", s)?),
            None => None,
        };
        let created_at = match &self.created_at {
            Some(s) => Some(validate::timestamp("created_at", s)?),
            None => None,
        };
        let embedding = match &self.embedding {
            Some(s) => Some(parse_floats("embedding", s)?),
            None => None,
        };
        let block_meta = match &self.block_meta {
            Some(s) => Some(parse_block_meta(s)?),
            None => None,
        };

        Ok(SemanticChunk {
            uuid,
            chunk_type,
            text: self.text.clone(),
            language: self.language.clone(),
            sha256: self.sha256.clone(),
            start: self.start,
            end: self.end,
            source_id,
            project: self.project.clone(),
            task_id: self.task_id.clone(),
            subtask_id: self.subtask_id.clone(),
            unit_id: self.unit_id.clone(),
            role,
            summary: self.summary.clone(),
            source_path: self.source_path.clone(),
            source_lines: join_source_lines(self.source_lines_start, self.source_lines_end),
            ordinal: self.ordinal,
            created_at,
            status,
            chunking_version: self.chunking_version.clone(),
            embedding,
            links: restore_links(self.link_parent.as_deref(), self.link_related.as_deref())?,
            tags: self.tags.as_ref().map(|s| split_csv(s)),
            metrics: self.restore_metrics(),
            block_id,
            block_type,
            block_index: self.block_index,
            block_meta,
        })
    }

    /// Rebuild the metrics block from the hoisted fields, or `None` when
    /// no hoisted field is present.
    fn restore_metrics(&self) -> Option<ChunkMetrics> {
        let feedback = match (
            self.feedback_accepted,
            self.feedback_rejected,
            self.feedback_modifications,
        ) {
            (None, None, None) => None,
            (accepted, rejected, modifications) => Some(ChunkFeedback {
                accepted: accepted.unwrap_or(0),
                rejected: rejected.unwrap_or(0),
                modifications: modifications.unwrap_or(0),
            }),
        };
        let metrics = ChunkMetrics {
            quality_score: self.quality_score,
            coverage: self.coverage,
            cohesion: self.cohesion,
            boundary_prev: self.boundary_prev,
            boundary_next: self.boundary_next,
            matches: self.matches,
            used_in_generation: self.used_in_generation,
            used_as_input: self.used_as_input,
            used_as_context: self.used_as_context,
            feedback,
        };
        if metrics.is_empty() {
            None
        } else {
            Some(metrics)
        }
    }
}

/// Split `relation:uuid` entries into parent and related UUID lists,
/// comma-joined, dropping the relation prefixes.
fn partition_links(links: Option<&[String]>) -> (Option<String>, Option<String>) {
    let mut parent = Vec::new();
    let mut related = Vec::new();
    for entry in links.unwrap_or_default() {
        match entry.split_once(':') {
            Some(("parent", id)) => parent.push(id.to_string()),
            Some((_, id)) => related.push(id.to_string()),
            None => related.push(entry.clone()),
        }
    }
    (join_nonempty(parent), join_nonempty(related))
}

/// Restore link entries with their relation prefixes. Non-parent
/// relations come back as `related`.
fn restore_links(
    parent: Option<&str>,
    related: Option<&str>,
) -> Result<Option<Vec<String>>, ConvertError> {
    let mut entries = Vec::new();
    for id in parent.map(split_csv).unwrap_or_default() {
        validate::uuid_v4("link_parent", &id)?;
        entries.push(format!("parent:{}", id));
    }
    for id in related.map(split_csv).unwrap_or_default() {
        validate::uuid_v4("link_related", &id)?;
        entries.push(format!("related:{}", id));
    }
    Ok(if entries.is_empty() {
        None
    } else {
        Some(entries)
    })
}

/// First and last line of the list, or the single value twice.
fn split_source_lines(lines: Option<&[u32]>) -> (Option<u32>, Option<u32>) {
    match lines {
        None | Some([]) => (None, None),
        Some([only]) => (Some(*only), Some(*only)),
        Some(list) => (list.first().copied(), list.last().copied()),
    }
}

fn join_source_lines(start: Option<u32>, end: Option<u32>) -> Option<Vec<u32>> {
    match (start, end) {
        (Some(a), Some(b)) => Some(vec![a, b]),
        (Some(a), None) | (None, Some(a)) => Some(vec![a]),
        (None, None) => None,
    }
}

fn join_floats(values: &[f32]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_floats(field: &'static str, joined: &str) -> Result<Vec<f32>, ConvertError> {
    if joined.is_empty() {
        return Ok(Vec::new());
    }
    joined
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .map_err(|_| ConvertError::Malformed {
                    field,
                    expected: "comma-separated floats",
                    value: joined.to_string(),
                })
        })
        .collect()
}

fn parse_block_meta(raw: &str) -> Result<Map<String, Value>, ConvertError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(ConvertError::Malformed {
            field: "block_meta",
            expected: "a JSON object",
            value: raw.to_string(),
        }),
    }
}

fn split_csv(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

fn join_nonempty(parts: Vec<String>) -> Option<String> {
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::sha256_hex;
    use chrono::DateTime;
    use uuid::Uuid;

    fn full_chunk() -> SemanticChunk {
        let mut block_meta = Map::new();
        block_meta.insert("origin".to_string(), Value::String("upload".to_string()));
        block_meta.insert("page".to_string(), Value::from(4));

        SemanticChunk {
            uuid: Uuid::new_v4(),
            chunk_type: ChunkType::CodeBlock,
            text: "fn main() {}".to_string(),
            language: "rust".to_string(),
            sha256: sha256_hex("fn main() {}"),
            start: 120,
            end: 132,
            source_id: Some(Uuid::new_v4()),
            project: Some("harness".to_string()),
            task_id: Some("T-42".to_string()),
            subtask_id: None,
            unit_id: Some("unit-7".to_string()),
            role: Some(ChunkRole::Developer),
            summary: Some("entry point".to_string()),
            source_path: Some("src/main.rs".to_string()),
            source_lines: Some(vec![10, 14]),
            ordinal: Some(3),
            created_at: Some(
                DateTime::parse_from_rfc3339("2024-05-04T10:30:00+02:00").unwrap(),
            ),
            status: Some(ChunkStatus::Cleaned),
            chunking_version: Some("1.0".to_string()),
            embedding: Some(vec![0.25, -1.5, 3.0]),
            links: Some(vec![
                format!("parent:{}", Uuid::new_v4()),
                format!("related:{}", Uuid::new_v4()),
            ]),
            tags: Some(vec!["api".to_string(), "docs".to_string()]),
            metrics: Some(ChunkMetrics {
                quality_score: Some(0.9),
                coverage: Some(0.8),
                matches: Some(12),
                used_as_context: Some(true),
                feedback: Some(ChunkFeedback {
                    accepted: 2,
                    rejected: 1,
                    modifications: 0,
                }),
                ..Default::default()
            }),
            block_id: Some(Uuid::new_v4()),
            block_type: Some(ChunkType::DocBlock),
            block_index: Some(0),
            block_meta: Some(block_meta),
        }
    }

    #[test]
    fn test_round_trip_full_chunk() {
        let chunk = full_chunk();
        let flat = chunk.to_flat();
        let back = flat.to_semantic().unwrap();
        assert_eq!(back, chunk);
    }

    #[test]
    fn test_reverse_round_trip() {
        let flat = full_chunk().to_flat();
        let again = flat.to_semantic().unwrap().to_flat();
        assert_eq!(again, flat);
    }

    #[test]
    fn test_metrics_are_hoisted() {
        let flat = full_chunk().to_flat();
        assert_eq!(flat.quality_score, Some(0.9));
        assert_eq!(flat.coverage, Some(0.8));
        assert_eq!(flat.matches, Some(12));
        assert_eq!(flat.used_as_context, Some(true));
        assert_eq!(flat.feedback_accepted, Some(2));
        assert_eq!(flat.feedback_rejected, Some(1));
        assert_eq!(flat.feedback_modifications, Some(0));
    }

    #[test]
    fn test_links_are_partitioned_by_relation() {
        let parent_id = Uuid::new_v4();
        let related_id = Uuid::new_v4();
        let mut chunk = full_chunk();
        chunk.links = Some(vec![
            format!("parent:{}", parent_id),
            format!("related:{}", related_id),
        ]);

        let flat = chunk.to_flat();
        assert_eq!(flat.link_parent.as_deref(), Some(parent_id.to_string().as_str()));
        assert_eq!(flat.link_related.as_deref(), Some(related_id.to_string().as_str()));

        let back = flat.to_semantic().unwrap();
        assert_eq!(back.links, chunk.links);
    }

    #[test]
    fn test_non_parent_relation_normalizes_to_related() {
        let id = Uuid::new_v4();
        let mut chunk = full_chunk();
        chunk.links = Some(vec![format!("child:{}", id)]);

        let back = chunk.to_flat().to_semantic().unwrap();
        assert_eq!(back.links, Some(vec![format!("related:{}", id)]));
    }

    #[test]
    fn test_tags_join_and_split() {
        let mut chunk = full_chunk();
        chunk.tags = Some(vec!["a".to_string(), "b".to_string(), "c".to_string()]);

        let flat = chunk.to_flat();
        assert_eq!(flat.tags.as_deref(), Some("a,b,c"));

        let back = flat.to_semantic().unwrap();
        assert_eq!(
            back.tags,
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
        assert_eq!(back.to_flat().tags.as_deref(), Some("a,b,c"));
    }

    #[test]
    fn test_single_source_line_flattens_to_equal_pair() {
        let mut chunk = full_chunk();
        chunk.source_lines = Some(vec![42]);
        let flat = chunk.to_flat();
        assert_eq!(flat.source_lines_start, Some(42));
        assert_eq!(flat.source_lines_end, Some(42));
    }

    #[test]
    fn test_sha256_is_copied_verbatim() {
        // A digest that does not match the text must survive both
        // directions untouched.
        let mut chunk = full_chunk();
        chunk.sha256 = "f".repeat(64);
        let flat = chunk.to_flat();
        assert_eq!(flat.sha256, chunk.sha256);
        assert_eq!(flat.to_semantic().unwrap().sha256, chunk.sha256);
    }

    #[test]
    fn test_unknown_enum_string_fails() {
        let mut flat = full_chunk().to_flat();
        flat.status = Some("golden".to_string());
        let err = flat.to_semantic().unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Validation(crate::error::ValidationError::InvalidEnumValue {
                field: "status",
                ..
            })
        ));
    }

    #[test]
    fn test_malformed_embedding_fails() {
        let mut flat = full_chunk().to_flat();
        flat.embedding = Some("0.5,oops,1.0".to_string());
        assert!(matches!(
            flat.to_semantic().unwrap_err(),
            ConvertError::Malformed {
                field: "embedding",
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_block_meta_fails() {
        let mut flat = full_chunk().to_flat();
        flat.block_meta = Some("not json".to_string());
        assert!(matches!(
            flat.to_semantic().unwrap_err(),
            ConvertError::Malformed {
                field: "block_meta",
                ..
            }
        ));
        // A JSON scalar is not an object either.
        let mut flat = full_chunk().to_flat();
        flat.block_meta = Some("7".to_string());
        assert!(flat.to_semantic().is_err());
    }

    #[test]
    fn test_bad_uuid_in_flat_links_fails() {
        let mut flat = full_chunk().to_flat();
        flat.link_parent = Some("not-a-uuid".to_string());
        assert!(flat.to_semantic().is_err());
    }

    #[test]
    fn test_absent_metrics_stay_absent() {
        let mut chunk = full_chunk();
        chunk.metrics = None;
        let flat = chunk.to_flat();
        assert_eq!(flat.quality_score, None);
        assert_eq!(flat.feedback_accepted, None);
        assert_eq!(flat.to_semantic().unwrap().metrics, None);
    }
}
