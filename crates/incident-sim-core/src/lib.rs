//! # Incident Sim Core
//!
//! Synthetic emergency-call generation for Richmond, VA: categories and
//! their priority rules, age-bucketed vitals, provider notes, projection
//! onto sink record shapes, and the sink abstraction.
//!
//! This crate contains no tokio runtime, sqlx, or filesystem I/O. All
//! randomness and time come from an explicit [`GenerationContext`], so a
//! seeded context reproduces the same incidents.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`category`] | Emergency types and their rule profiles |
//! | [`priority`] | Base priority plus ordered adjustments, clamped to 1–5 |
//! | [`vitals`] | Age buckets and vital-sign sampling |
//! | [`geography`] | Street, area, zip and in-city coordinates |
//! | [`factory`] | Single-incident generation |
//! | [`batch`] | Batches and summary statistics |
//! | [`notes`] | Provider follow-up notes |
//! | [`adapter`] | Structured and document projections |
//! | [`sink`] | Persistence traits |
//! | [`memory`] | In-memory sink |

pub mod adapter;
pub mod batch;
pub mod category;
pub mod context;
pub mod error;
pub mod factory;
pub mod geography;
pub mod memory;
pub mod models;
pub mod notes;
pub mod priority;
pub mod sink;
pub mod vitals;
pub mod vocab;

pub use context::{Clock, GenerationContext};
pub use error::{GenerationError, MappingError, SinkError};
pub use models::{Incident, NoteKind, ProviderNote};
