//! # Incident Sim
//!
//! Synthetic emergency-call generator for Richmond, VA. Incidents are
//! generated by [`incident_sim_core`], projected onto a structured row and a
//! nested document, written to two SQLite stores, and shown on a small
//! read-only dashboard.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌────────────────────┐
//! │  Generation  │──▶│   Adapter   │──▶│ SQLite: incidents  │
//! │ (core crate) │   │ row + doc   │   │ SQLite: details    │
//! └──────────────┘   └─────────────┘   └─────────┬──────────┘
//!                                                │
//!                         ┌──────────────────────┤
//!                         ▼                      ▼
//!                    ┌──────────┐          ┌───────────┐
//!                    │   CLI    │          │ Dashboard │
//!                    │ (incsim) │          │  (HTTP)   │
//!                    └──────────┘          └───────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! incsim init                        # create both stores
//! incsim generate --count 25 --seed 7
//! incsim stats
//! incsim serve                       # dashboard on [server].bind
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |
//! | [`sqlite_store`] | Structured and document sinks |
//! | [`generate`] | Generation pipeline |
//! | [`stats`] | Store statistics |
//! | [`get`] | Incident retrieval |
//! | [`mapping`] | Field mapping table output |
//! | [`server`] | Dashboard HTTP server |

pub mod config;
pub mod db;
pub mod generate;
pub mod get;
pub mod mapping;
pub mod migrate;
pub mod server;
pub mod sqlite_store;
pub mod stats;
