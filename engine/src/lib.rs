#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Simulation engine driving Schelling relocation passes.
//!
//! A [`Simulation`] owns the [`City`] together with two ordered work-lists:
//! cells believed to hold an unsatisfied resident and cells believed to be
//! open. The engine places the initial population, scores every resident
//! once from scratch, and then executes relocation passes that keep scores
//! current through incremental neighbor updates. When to stop is left to the
//! caller.

mod consistency;
mod relocation;

use schelling_core::{
    CellIndex, CitySnapshot, OccupantSnapshot, Parameters, ResidentType, SimulationError,
};
use schelling_system_placement::{Config as PlacementConfig, Placement};
use schelling_world::{City, Resident};

/// Lifecycle stage of a simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Phase {
    Configured,
    Placed,
    Initialized,
}

/// Authoritative Schelling simulation state.
#[derive(Debug)]
pub struct Simulation {
    city: City,
    population: usize,
    breakdown: Vec<usize>,
    threshold: f64,
    iteration: u64,
    unsatisfied: Vec<CellIndex>,
    open_locations: Vec<CellIndex>,
    placement: Placement,
    phase: Phase,
}

impl Simulation {
    /// Creates an empty simulation whose placement draws from the stream identified by `seed`.
    ///
    /// Only structural parameters are validated here. Whether the population
    /// fits the city is checked when residents are placed.
    pub fn new(parameters: &Parameters, seed: u64) -> Result<Self, SimulationError> {
        parameters.validate()?;
        let city = City::new(parameters.height(), parameters.width(), parameters.radius())?;

        Ok(Self {
            city,
            population: parameters.population(),
            breakdown: parameters.type_breakdown(),
            threshold: 0.0,
            iteration: 0,
            unsatisfied: Vec::new(),
            open_locations: Vec::new(),
            placement: Placement::new(PlacementConfig::new(seed)),
            phase: Phase::Configured,
        })
    }

    /// Fills the city with a freshly drawn random layout.
    ///
    /// Fails with [`SimulationError::PopulationOverflow`] when no cell would
    /// remain open and with [`SimulationError::PopulationMismatch`] when the
    /// per-type head counts do not add up to the population. On failure the
    /// city and work-lists are left untouched.
    pub fn place_residents(&mut self) -> Result<(), SimulationError> {
        let mut layout = Vec::with_capacity(self.city.cell_count());
        self.placement.layout(
            self.population,
            &self.breakdown,
            self.city.cell_count(),
            &mut layout,
        )?;
        self.fill(&layout)
    }

    /// Places a caller-supplied row-major layout.
    ///
    /// Cells beyond the end of a short layout stay empty. The layout must hold
    /// exactly the configured population and only configured types.
    pub fn place_layout(&mut self, layout: &[Option<ResidentType>]) -> Result<(), SimulationError> {
        let cells = self.city.cell_count();
        if layout.len() > cells {
            return Err(SimulationError::InvalidLocation {
                location: CellIndex::new(cells),
                cells,
            });
        }

        let types = self.breakdown.len();
        let mut assigned = 0;
        for kind in layout.iter().flatten() {
            if kind.get() as usize >= types {
                return Err(SimulationError::UnknownResidentType { kind: *kind, types });
            }
            assigned += 1;
        }

        if self.population >= cells {
            return Err(SimulationError::PopulationOverflow {
                population: self.population,
                capacity: cells,
            });
        }
        if assigned != self.population {
            return Err(SimulationError::PopulationMismatch {
                assigned,
                population: self.population,
            });
        }

        self.fill(layout)
    }

    /// Scores every resident from scratch and builds both work-lists.
    ///
    /// Cells are scanned in row-major order, so both lists start out sorted.
    pub fn initialize(&mut self, threshold: f64) -> Result<(), SimulationError> {
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(SimulationError::InvalidThreshold { threshold });
        }

        self.threshold = threshold;
        self.unsatisfied.clear();
        self.open_locations.clear();

        for index in 0..self.city.cell_count() {
            let location = CellIndex::new(index);
            let Some(kind) = self.city.occupant(location)?.map(Resident::kind) else {
                self.open_locations.push(location);
                continue;
            };

            let satisfaction = self.city.compute_satisfaction(location, kind)?;
            if let Some(resident) = self.city.occupant_mut(location)? {
                resident.set_satisfaction(satisfaction);
            }
            if satisfaction < threshold {
                self.unsatisfied.push(location);
            }
        }

        self.phase = Phase::Initialized;
        tracing::info!(
            threshold,
            population = self.population,
            unsatisfied = self.unsatisfied.len(),
            open_locations = self.open_locations.len(),
            "simulation initialized"
        );
        Ok(())
    }

    /// The city being simulated.
    #[must_use]
    pub const fn city(&self) -> &City {
        &self.city
    }

    /// Number of completed relocation passes.
    #[must_use]
    pub const fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Satisfaction threshold in force.
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Configured population.
    #[must_use]
    pub const fn population(&self) -> usize {
        self.population
    }

    /// Target head count per resident type.
    #[must_use]
    pub fn type_breakdown(&self) -> &[usize] {
        &self.breakdown
    }

    /// Seed of the placement stream.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.placement.seed()
    }

    /// Cells holding unsatisfied residents, longest waiting first.
    #[must_use]
    pub fn unsatisfied(&self) -> &[CellIndex] {
        &self.unsatisfied
    }

    /// Open cells in the order they will be offered to movers.
    #[must_use]
    pub fn open_locations(&self) -> &[CellIndex] {
        &self.open_locations
    }

    /// Reports whether no resident remains unsatisfied.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.unsatisfied.is_empty()
    }

    /// Captures the observable state for adapters.
    #[must_use]
    pub fn snapshot(&self) -> CitySnapshot {
        let threshold = self.threshold;
        let cells = self
            .city
            .cells()
            .map(|(_, occupant)| {
                occupant.map(|resident| OccupantSnapshot {
                    kind: resident.kind(),
                    satisfaction: resident.satisfaction(),
                    satisfied: resident.is_satisfied(threshold),
                })
            })
            .collect();

        CitySnapshot {
            height: self.city.height(),
            width: self.city.width(),
            radius: self.city.radius(),
            iteration: self.iteration,
            threshold,
            unsatisfied: self.unsatisfied.len(),
            open_locations: self.open_locations.len(),
            cells,
        }
    }

    fn fill(&mut self, layout: &[Option<ResidentType>]) -> Result<(), SimulationError> {
        self.city.clear();
        self.unsatisfied.clear();
        self.open_locations.clear();
        self.iteration = 0;

        for (index, kind) in layout.iter().enumerate() {
            if let Some(kind) = kind {
                let location = CellIndex::new(index);
                let _ = self
                    .city
                    .place(Some(Resident::new(*kind, location)), location)?;
            }
        }

        self.phase = Phase::Placed;
        tracing::debug!(
            population = self.city.population(),
            cells = self.city.cell_count(),
            "residents placed"
        );
        Ok(())
    }
}
