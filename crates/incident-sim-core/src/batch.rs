//! Batch generation and summary statistics.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::category::EmergencyType;
use crate::context::GenerationContext;
use crate::factory::{IncidentFactory, IncidentRequest};
use crate::models::Incident;
use crate::priority::Priority;

/// Aggregate counts over a set of incidents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub by_type: BTreeMap<EmergencyType, usize>,
    /// Always holds all five priorities, zero-filled.
    pub by_priority: BTreeMap<Priority, usize>,
    /// Mean priority, 0.0 for an empty set.
    pub average_priority: f64,
}

impl Stats {
    pub fn empty() -> Self {
        Self {
            total: 0,
            by_type: BTreeMap::new(),
            by_priority: Priority::all().map(|p| (p, 0)).collect(),
            average_priority: 0.0,
        }
    }

    pub fn from_incidents(incidents: &[Incident]) -> Self {
        let mut stats = Self::empty();
        let mut priority_sum: u64 = 0;

        for incident in incidents {
            stats.total += 1;
            *stats.by_type.entry(incident.emergency.kind).or_insert(0) += 1;
            *stats
                .by_priority
                .entry(incident.emergency.priority)
                .or_insert(0) += 1;
            priority_sum += incident.emergency.priority.get() as u64;
        }

        if stats.total > 0 {
            stats.average_priority = priority_sum as f64 / stats.total as f64;
        }
        stats
    }
}

/// Result of a best-effort batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub incidents: Vec<Incident>,
    pub stats: Stats,
    /// Generation calls that failed validation and were dropped.
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchFactory {
    factory: IncidentFactory,
}

impl BatchFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate `n` fully random incidents.
    pub fn generate_batch(&self, ctx: &mut GenerationContext, n: usize) -> (Vec<Incident>, Stats) {
        let outcome = self.generate_batch_with(ctx, n, &IncidentRequest::default());
        (outcome.incidents, outcome.stats)
    }

    /// Generate `n` incidents from a shared request template. Failed calls
    /// are logged and counted, never retried.
    pub fn generate_batch_with(
        &self,
        ctx: &mut GenerationContext,
        n: usize,
        template: &IncidentRequest,
    ) -> BatchOutcome {
        let mut incidents = Vec::with_capacity(initial_capacity(n));
        let mut skipped = 0;

        for i in 0..n {
            match self.factory.generate_from(ctx, template) {
                Ok(incident) => incidents.push(incident),
                Err(e) => {
                    tracing::warn!(index = i, error = %e, "skipping incident");
                    skipped += 1;
                }
            }
        }

        let stats = Stats::from_incidents(&incidents);
        BatchOutcome {
            incidents,
            stats,
            skipped,
        }
    }
}

/// Upper bound on up-front allocation; `n` is caller-controlled.
const MAX_PREALLOCATED: usize = 4096;

fn initial_capacity(n: usize) -> usize {
    n.min(MAX_PREALLOCATED)
}
