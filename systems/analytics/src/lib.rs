#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Segregation statistics derived from city snapshots.
//!
//! The analytics system never touches engine state directly. Every figure is
//! computed from a [`CitySnapshot`], so reports can be produced for any frame
//! an adapter has captured.

mod metrics;

use std::collections::BTreeMap;

use schelling_core::{CitySnapshot, ResidentType};
use serde::Serialize;

pub use metrics::{like_neighbor_share, mean};

/// Summary of a single resident type.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TypeSummary {
    /// Resident type described by this entry.
    pub kind: ResidentType,
    /// Number of residents of this type.
    pub count: usize,
    /// Number of those residents meeting the threshold.
    pub satisfied: usize,
    /// Mean satisfaction across residents of this type.
    pub mean_satisfaction: f64,
}

/// Aggregate statistics describing how segregated a city has become.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SegregationReport {
    /// Relocation pass the snapshot was taken after.
    pub iteration: u64,
    /// Number of occupied cells.
    pub occupied: usize,
    /// Number of empty cells.
    pub vacant: usize,
    /// Number of residents meeting the threshold.
    pub satisfied: usize,
    /// Share of residents meeting the threshold, `0.0` for an empty city.
    pub satisfied_share: f64,
    /// Mean satisfaction across all residents, `0.0` for an empty city.
    pub mean_satisfaction: f64,
    /// Share of orthogonally adjacent resident pairs that share a type.
    pub like_neighbor_share: f64,
    /// Per-type summaries ordered by type.
    pub per_type: Vec<TypeSummary>,
}

#[derive(Default)]
struct Tally {
    count: usize,
    satisfied: usize,
    satisfaction: f64,
}

impl SegregationReport {
    /// Computes the report for `snapshot`.
    ///
    /// Types absent from the snapshot do not appear in [`Self::per_type`].
    #[must_use]
    pub fn from_snapshot(snapshot: &CitySnapshot) -> Self {
        let mut overall = Tally::default();
        let mut by_type: BTreeMap<ResidentType, Tally> = BTreeMap::new();

        for occupant in snapshot.occupants() {
            for tally in [&mut overall, by_type.entry(occupant.kind).or_default()] {
                tally.count += 1;
                tally.satisfaction += occupant.satisfaction;
                if occupant.satisfied {
                    tally.satisfied += 1;
                }
            }
        }

        let per_type = by_type
            .into_iter()
            .map(|(kind, tally)| TypeSummary {
                kind,
                count: tally.count,
                satisfied: tally.satisfied,
                mean_satisfaction: mean(tally.satisfaction, tally.count),
            })
            .collect();

        Self {
            iteration: snapshot.iteration,
            occupied: overall.count,
            vacant: snapshot.cells.len() - overall.count,
            satisfied: overall.satisfied,
            satisfied_share: mean(overall.satisfied as f64, overall.count),
            mean_satisfaction: mean(overall.satisfaction, overall.count),
            like_neighbor_share: like_neighbor_share(snapshot),
            per_type,
        }
    }

    /// Summary for `kind`, if any resident of that type is present.
    #[must_use]
    pub fn type_summary(&self, kind: ResidentType) -> Option<&TypeSummary> {
        self.per_type.iter().find(|summary| summary.kind == kind)
    }
}
