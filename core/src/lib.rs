#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Schelling segregation engine.
//!
//! This crate defines the vocabulary that connects the authoritative city,
//! the simulation engine, pure systems and adapters. The engine mutates the
//! city while executing relocation passes and reports what happened through
//! [`Event`] values. Adapters never touch the city directly; they render and
//! summarise [`CitySnapshot`] values captured between passes.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Iteration cap applied by drivers when the caller does not provide one.
pub const DEFAULT_ITERATION_CAP: u64 = 1_000;

/// Index of a single grid cell laid out in row-major order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellIndex(usize);

impl CellIndex {
    /// Creates a new cell index with the provided numeric value.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Creates the index of the cell at `row` and `column` in a grid `width` cells wide.
    #[must_use]
    pub const fn from_row_column(row: usize, column: usize, width: usize) -> Self {
        Self(row * width + column)
    }

    /// Retrieves the numeric representation of the index.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }

    /// Zero-based row of the cell in a grid `width` cells wide.
    #[must_use]
    pub const fn row(&self, width: usize) -> usize {
        self.0 / width
    }

    /// Zero-based column of the cell in a grid `width` cells wide.
    #[must_use]
    pub const fn column(&self, width: usize) -> usize {
        self.0 % width
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable category assigned to a resident.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResidentType(u32);

impl ResidentType {
    /// Creates a new resident type with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the type.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ResidentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Construction parameters describing the city and its population.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    height: usize,
    width: usize,
    radius: usize,
    population: usize,
    fractions: Vec<f64>,
}

impl Parameters {
    /// Creates a new parameter set.
    ///
    /// `fractions` holds one population share per resident type; its length
    /// defines the number of types. Values are not checked here, see
    /// [`Parameters::validate`].
    #[must_use]
    pub fn new(
        height: usize,
        width: usize,
        radius: usize,
        population: usize,
        fractions: Vec<f64>,
    ) -> Self {
        Self {
            height,
            width,
            radius,
            population,
            fractions,
        }
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Radius of the diamond neighborhood.
    #[must_use]
    pub const fn radius(&self) -> usize {
        self.radius
    }

    /// Total number of residents to place.
    #[must_use]
    pub const fn population(&self) -> usize {
        self.population
    }

    /// Population share assigned to each resident type.
    #[must_use]
    pub fn fractions(&self) -> &[f64] {
        &self.fractions
    }

    /// Number of distinct resident types.
    #[must_use]
    pub fn num_types(&self) -> usize {
        self.fractions.len()
    }

    /// Number of cells in the grid.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.height.saturating_mul(self.width)
    }

    /// Checks the structural parameters.
    ///
    /// Population capacity and the rounded sub-population sum are checked at
    /// placement time instead, so a simulation may be constructed with
    /// parameters that later fail to place.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.height == 0 || self.width == 0 {
            return Err(SimulationError::InvalidDimensions {
                height: self.height,
                width: self.width,
            });
        }

        let limit = max_radius(self.height, self.width);
        if self.radius > limit {
            return Err(SimulationError::InvalidRadius {
                radius: self.radius,
                limit,
            });
        }

        if self.fractions.is_empty() {
            return Err(SimulationError::NoResidentTypes);
        }

        for (kind, &fraction) in self.fractions.iter().enumerate() {
            if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
                return Err(SimulationError::InvalidFraction { kind, fraction });
            }
        }

        Ok(())
    }

    /// Target head count per resident type, rounded to the nearest resident.
    #[must_use]
    pub fn type_breakdown(&self) -> Vec<usize> {
        let population = self.population as f64;
        self.fractions
            .iter()
            .map(|fraction| (fraction * population).round().max(0.0) as usize)
            .collect()
    }
}

/// Largest neighborhood radius accepted for a `height` × `width` grid.
///
/// A diamond of this radius already reaches every cell from every center,
/// so larger radii would describe the same neighborhoods.
#[must_use]
pub const fn max_radius(height: usize, width: usize) -> usize {
    height.saturating_add(width)
}

/// Errors reported by the city and the simulation engine.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SimulationError {
    /// A cell index fell outside the grid.
    #[error("location {location} is outside the grid of {cells} cells")]
    InvalidLocation {
        /// Offending index.
        location: CellIndex,
        /// Number of cells in the grid.
        cells: usize,
    },
    /// The population would leave no open cell.
    #[error("population {population} does not fit a city of {capacity} cells")]
    PopulationOverflow {
        /// Requested population.
        population: usize,
        /// Number of cells in the grid.
        capacity: usize,
    },
    /// The per-type sub-populations do not add up to the population.
    #[error("sub-populations sum to {assigned} but the population is {population}")]
    PopulationMismatch {
        /// Sum of the per-type head counts.
        assigned: usize,
        /// Requested population.
        population: usize,
    },
    /// A missing resident was handed to the city.
    #[error("no resident supplied for location {location}")]
    NullResident {
        /// Cell the resident was meant for.
        location: CellIndex,
    },
    /// A runtime invariant of the city or work-lists does not hold.
    #[error("internal consistency violated: {detail}")]
    InternalConsistency {
        /// Description of the violated invariant.
        detail: String,
    },
    /// The grid has no cells along one of its axes.
    #[error("grid dimensions {height}x{width} must both be positive")]
    InvalidDimensions {
        /// Requested row count.
        height: usize,
        /// Requested column count.
        width: usize,
    },
    /// The neighborhood radius exceeds what the grid can hold.
    #[error("neighborhood radius {radius} exceeds the limit of {limit} for this grid")]
    InvalidRadius {
        /// Requested radius.
        radius: usize,
        /// Largest radius accepted for the grid.
        limit: usize,
    },
    /// No resident types were configured.
    #[error("at least one resident type is required")]
    NoResidentTypes,
    /// A population share is not a finite value in `[0, 1]`.
    #[error("population fraction {fraction} for type {kind} must lie in [0, 1]")]
    InvalidFraction {
        /// Resident type the share belongs to.
        kind: usize,
        /// Offending share.
        fraction: f64,
    },
    /// The satisfaction threshold is not a finite value in `[0, 1]`.
    #[error("satisfaction threshold {threshold} must lie in [0, 1]")]
    InvalidThreshold {
        /// Offending threshold.
        threshold: f64,
    },
    /// A layout referenced a type the simulation was not configured with.
    #[error("resident type {kind} is not one of the {types} configured types")]
    UnknownResidentType {
        /// Offending type.
        kind: ResidentType,
        /// Number of configured types.
        types: usize,
    },
}

impl SimulationError {
    /// Convenience constructor for [`SimulationError::InternalConsistency`].
    #[must_use]
    pub fn consistency(detail: impl Into<String>) -> Self {
        Self::InternalConsistency {
            detail: detail.into(),
        }
    }
}

/// Events reported by the engine while executing a relocation pass.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A resident moved to an open cell that satisfies it.
    ResidentRelocated {
        /// Type of the resident that moved.
        kind: ResidentType,
        /// Cell the resident vacated.
        from: CellIndex,
        /// Cell the resident occupies after the move.
        to: CellIndex,
        /// Satisfaction of the resident at its new cell.
        satisfaction: f64,
    },
    /// A previously satisfied resident dropped below the threshold because a neighbor moved.
    ResidentUnsettled {
        /// Cell holding the resident.
        cell: CellIndex,
        /// Type of the resident.
        kind: ResidentType,
        /// Satisfaction after the neighbor moved.
        satisfaction: f64,
    },
}

/// Immutable view of a single occupied cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OccupantSnapshot {
    /// Type of the resident.
    pub kind: ResidentType,
    /// Current satisfaction score in `[0, 1]`.
    pub satisfaction: f64,
    /// Whether the score meets the threshold in force when the snapshot was taken.
    pub satisfied: bool,
}

/// Immutable copy of the observable simulation state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CitySnapshot {
    /// Number of rows in the grid.
    pub height: usize,
    /// Number of columns in the grid.
    pub width: usize,
    /// Radius of the diamond neighborhood.
    pub radius: usize,
    /// Number of completed relocation passes.
    pub iteration: u64,
    /// Satisfaction threshold in force.
    pub threshold: f64,
    /// Number of entries in the unsatisfied work-list.
    pub unsatisfied: usize,
    /// Number of entries in the open-location work-list.
    pub open_locations: usize,
    /// Occupants in row-major order, `None` for empty cells.
    pub cells: Vec<Option<OccupantSnapshot>>,
}

impl CitySnapshot {
    /// Iterator over the rows of the grid.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<OccupantSnapshot>]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Iterator over the occupied cells only.
    pub fn occupants(&self) -> impl Iterator<Item = &OccupantSnapshot> {
        self.cells.iter().flatten()
    }

    /// Reports whether no resident remains unsatisfied.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.unsatisfied == 0
    }
}
