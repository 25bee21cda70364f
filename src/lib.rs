//! # Chunk Metadata
//!
//! Structured and flat metadata models for document chunks, with
//! validation and lossless conversion between the two forms.
//!
//! A segmentation pipeline produces text chunks; this crate defines the
//! data contract those chunks travel under. The structured form
//! ([`SemanticChunk`]) is what application logic works with; the flat
//! form ([`FlatChunk`]) is a single-level, primitive-typed projection
//! that storage and retrieval backends persist as one row or document
//! per chunk.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────┐   ┌───────────────┐
//! │ raw fields │──▶│ ChunkBuilder │──▶│ SemanticChunk │
//! │ ChunkInput │   │  (validate)  │   └───────┬───────┘
//! └────────────┘   └──────────────┘    to_flat│ ▲ to_semantic
//!                                             ▼ │
//!                                      ┌───────────┐
//!                                      │ FlatChunk │──▶ storage row
//!                                      └───────────┘
//! ```
//!
//! Everything here is a synchronous, side-effect-free computation over
//! in-memory values: no I/O, no logging, no shared state. Instances may
//! be built, validated, and converted concurrently without coordination.
//!
//! ## Quick Start
//!
//! ```rust
//! use chunk_metadata::{ChunkBuilder, ChunkInput};
//!
//! let builder = ChunkBuilder::new();
//! let chunk = builder
//!     .build(ChunkInput {
//!         text: Some("fn main() {}".into()),
//!         chunk_type: Some("CodeBlock".into()),
//!         language: Some("rust".into()),
//!         start: Some(0),
//!         end: Some(12),
//!         ..Default::default()
//!     })
//!     .unwrap();
//!
//! // uuid, sha256, created_at, and the initial status were filled in.
//! assert_eq!(chunk.sha256.len(), 64);
//!
//! // The flat projection restores to the same chunk.
//! let flat = chunk.to_flat();
//! assert_eq!(flat.to_semantic().unwrap(), chunk);
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | `SemanticChunk`, `ChunkMetrics`, `ChunkFeedback` |
//! | [`flat`] | `FlatChunk`, the single-level storage form |
//! | [`types`] | `ChunkType` / `ChunkRole` vocabularies |
//! | [`status`] | `ChunkStatus` lifecycle and quality ordering |
//! | [`validate`] | Pure field validators |
//! | [`convert`] | Structured ⇄ flat conversion |
//! | [`builder`] | `ChunkBuilder` construction facade |
//! | [`config`] | TOML-loadable builder defaults |
//! | [`error`] | Validation and conversion error taxonomy |

pub mod builder;
pub mod config;
pub mod convert;
pub mod error;
pub mod flat;
pub mod models;
pub mod status;
pub mod types;
pub mod validate;

pub use builder::{ChunkBuilder, ChunkInput};
pub use config::BuilderDefaults;
pub use error::{ConvertError, ValidationError, ValidationErrors};
pub use flat::FlatChunk;
pub use models::{ChunkFeedback, ChunkMetrics, SemanticChunk};
pub use status::ChunkStatus;
pub use types::{ChunkRole, ChunkType};
