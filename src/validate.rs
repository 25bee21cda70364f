//! Pure field validators.
//!
//! Every function here is a referentially transparent check over its
//! arguments: no logging, no I/O, no mutation, no shared state. The
//! builder composes these rules at construction time, and
//! [`SemanticChunk::validate`] re-runs them over an existing instance,
//! so validating an already-valid chunk never fails.

use chrono::{DateTime, FixedOffset};
use uuid::{Uuid, Version};

use crate::error::ValidationError;
use crate::models::{ChunkMetrics, SemanticChunk};

/// Parse a string as a version-4 UUID, attributing failures to `field`.
pub fn uuid_v4(field: &'static str, value: &str) -> Result<Uuid, ValidationError> {
    let parsed = Uuid::parse_str(value).map_err(|_| ValidationError::InvalidUuid {
        field,
        value: value.to_string(),
    })?;
    ensure_v4(field, parsed)?;
    Ok(parsed)
}

/// Check that an already-parsed UUID is version 4.
pub fn ensure_v4(field: &'static str, value: Uuid) -> Result<(), ValidationError> {
    if value.get_version() == Some(Version::Random) {
        Ok(())
    } else {
        Err(ValidationError::InvalidUuid {
            field,
            value: value.to_string(),
        })
    }
}

/// Parse a string as an ISO-8601 timestamp with an explicit timezone
/// offset. Naive timestamps are rejected.
pub fn timestamp(field: &'static str, value: &str) -> Result<DateTime<FixedOffset>, ValidationError> {
    DateTime::parse_from_rfc3339(value).map_err(|_| ValidationError::InvalidTimestamp {
        field,
        value: value.to_string(),
    })
}

/// Check one link entry against the `relation:uuid` format. Returns the
/// relation and the parsed UUID. The UUID after the colon must be a
/// valid version 4.
pub fn link(entry: &str) -> Result<(&str, Uuid), ValidationError> {
    let bad = || ValidationError::InvalidLinkFormat(entry.to_string());
    let (relation, id) = entry.split_once(':').ok_or_else(bad)?;
    if relation.is_empty() {
        return Err(bad());
    }
    let parsed = Uuid::parse_str(id).map_err(|_| bad())?;
    if parsed.get_version() != Some(Version::Random) {
        return Err(bad());
    }
    Ok((relation, parsed))
}

/// Check a normalized metric value against `[0, 1]`.
pub fn normalized(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min: 0.0,
            max: 1.0,
        })
    }
}

/// Check that a chunk's offsets are ordered.
pub fn offsets(start: u64, end: u64) -> Result<(), ValidationError> {
    if start > end {
        Err(ValidationError::InvalidOffsetRange { start, end })
    } else {
        Ok(())
    }
}

/// Push every range failure in a metrics block onto `out`.
pub fn collect_metrics(metrics: &ChunkMetrics, out: &mut Vec<ValidationError>) {
    let scored = [
        ("quality_score", metrics.quality_score),
        ("coverage", metrics.coverage),
        ("cohesion", metrics.cohesion),
        ("boundary_prev", metrics.boundary_prev),
        ("boundary_next", metrics.boundary_next),
    ];
    for (field, value) in scored {
        if let Some(v) = value {
            if let Err(e) = normalized(field, v) {
                out.push(e);
            }
        }
    }
}

/// Run the full rule set over an existing chunk and collect every
/// failure, in field order.
pub fn collect(chunk: &SemanticChunk) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Err(e) = ensure_v4("uuid", chunk.uuid) {
        errors.push(e);
    }
    if let Some(id) = chunk.source_id {
        if let Err(e) = ensure_v4("source_id", id) {
            errors.push(e);
        }
    }
    if let Some(id) = chunk.block_id {
        if let Err(e) = ensure_v4("block_id", id) {
            errors.push(e);
        }
    }
    if let Err(e) = offsets(chunk.start, chunk.end) {
        errors.push(e);
    }
    if let Some(links) = &chunk.links {
        for entry in links {
            if let Err(e) = link(entry) {
                errors.push(e);
            }
        }
    }
    if let Some(metrics) = &chunk.metrics {
        collect_metrics(metrics, &mut errors);
    }

    errors
}

impl SemanticChunk {
    /// Re-check every invariant on this instance, reporting the first
    /// failure. Succeeds on every chunk the builder has accepted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match collect(self).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
