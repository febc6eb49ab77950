use crate::intersection::build_intersections;
use crate::lookahead::DEFAULT_DEPTH;
use crate::vehicle::Movement;
use crate::{
    Cell, Error, Grid, Intersection, IntersectionSet, LookaheadEngine, Phase, PhaseController,
    Result, Summary, Vehicle, VehicleAttributes, VehicleId, VehicleSet,
};
use std::collections::BTreeMap;

/// The default minimum dwell duration, in ticks.
const DEFAULT_PHASE_DURATION: u64 = 5;

/// A grid traffic simulation under lookahead signal control.
#[derive(Clone, Debug)]
pub struct Simulation {
    /// The street grid.
    grid: Grid,
    /// The intersections, one per open cell.
    intersections: IntersectionSet,
    /// The vehicles being simulated.
    vehicles: VehicleSet,
    /// The signal controller.
    controller: PhaseController,
    /// The number of wait units accrued at each intersection.
    waits: BTreeMap<Cell, u64>,
    /// The current frame of simulation.
    frame: usize,
}

/// The timing attributes of a simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationAttributes {
    /// The minimum time a phase is held, in ticks.
    pub phase_duration: u64,
    /// The number of phases searched ahead at each decision.
    pub lookahead_depth: usize,
}

impl Default for SimulationAttributes {
    fn default() -> Self {
        Self {
            phase_duration: DEFAULT_PHASE_DURATION,
            lookahead_depth: DEFAULT_DEPTH,
        }
    }
}

impl Simulation {
    /// Creates a new simulation on the given grid, with no vehicles.
    pub fn new(grid: Grid, attributes: &SimulationAttributes) -> Result<Self> {
        if attributes.phase_duration == 0 {
            return Err(Error::ZeroPhaseDuration);
        }
        if attributes.lookahead_depth == 0 {
            return Err(Error::ZeroLookaheadDepth);
        }
        let engine = LookaheadEngine::new(attributes.lookahead_depth);
        let intersections = build_intersections(&grid);
        let waits = intersections.keys().map(|cell| (*cell, 0)).collect();
        Ok(Self {
            grid,
            intersections,
            vehicles: VehicleSet::with_key(),
            controller: PhaseController::new(attributes.phase_duration, engine),
            waits,
            frame: 0,
        })
    }

    /// Adds a vehicle at its start cell and routes it to its destination.
    ///
    /// Both cells must be open. An unreachable destination is not an error;
    /// the vehicle will wait at its start cell for the whole run.
    pub fn add_vehicle(&mut self, attributes: &VehicleAttributes) -> Result<VehicleId> {
        self.grid.check_open(attributes.start)?;
        self.grid.check_open(attributes.destination)?;
        let grid = &self.grid;
        Ok(self
            .vehicles
            .insert_with_key(|id| Vehicle::new(id, attributes, grid)))
    }

    /// Advances the simulation by one tick.
    ///
    /// The controller picks and applies the phase, then every vehicle tries
    /// to move one cell.
    pub fn step(&mut self) {
        self.controller
            .update(1, &mut self.intersections, &self.vehicles);
        self.advance_vehicles();
        self.frame += 1;
    }

    /// Steps until every vehicle has arrived or `max_frames` ticks have been simulated.
    /// Returns the number of ticks simulated.
    pub fn run(&mut self, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && !self.all_arrived() {
            self.step();
            frames += 1;
        }
        log::info!(
            "stopped at frame {} with {} of {} vehicles arrived",
            self.frame,
            self.vehicles.values().filter(|v| v.has_arrived()).count(),
            self.vehicles.len()
        );
        frames
    }

    /// Returns every vehicle to its start and the controller, signals and
    /// statistics to their initial state.
    pub fn reset(&mut self) {
        for vehicle in self.vehicles.values_mut() {
            vehicle.reset(&self.grid);
        }
        for intersection in self.intersections.values_mut() {
            intersection.reset();
        }
        for count in self.waits.values_mut() {
            *count = 0;
        }
        self.controller.reset();
        self.frame = 0;
    }

    /// Gets the current simulation frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Gets the phase currently shown.
    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    /// Gets the signal controller.
    pub fn controller(&self) -> &PhaseController {
        &self.controller
    }

    /// Gets the street grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Whether every vehicle has reached its destination.
    pub fn all_arrived(&self) -> bool {
        self.vehicles.values().all(Vehicle::has_arrived)
    }

    /// Gets the intersections, keyed by cell.
    pub fn intersections(&self) -> &IntersectionSet {
        &self.intersections
    }

    /// Gets the vehicles.
    pub fn vehicles(&self) -> &VehicleSet {
        &self.vehicles
    }

    /// Returns an iterator over all the intersections, in row-major order.
    pub fn iter_intersections(&self) -> impl Iterator<Item = &Intersection> {
        self.intersections.values()
    }

    /// Gets the intersection at the given cell, if the cell is open.
    pub fn get_intersection(&self, cell: Cell) -> Option<&Intersection> {
        self.intersections.get(&cell)
    }

    /// Returns an iterator over all the vehicles, in insertion order.
    pub fn iter_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    /// Gets a reference to the vehicle with the given ID.
    pub fn get_vehicle(&self, vehicle_id: VehicleId) -> &Vehicle {
        &self.vehicles[vehicle_id]
    }

    /// Gets the number of wait units accrued at each intersection.
    pub fn intersection_waits(&self) -> &BTreeMap<Cell, u64> {
        &self.waits
    }

    /// Summarises the run so far.
    pub fn summary(&self) -> Summary {
        Summary::new(self.frame, self.vehicles.values(), &self.waits)
    }

    /// Tries to move every vehicle and records travel and wait statistics.
    fn advance_vehicles(&mut self) {
        let phase = self.controller.phase();
        for vehicle in self.vehicles.values_mut() {
            vehicle.record_travel();
            match vehicle.attempt_move(&self.intersections, phase) {
                Movement::Blocked(cell) => {
                    vehicle.record_wait();
                    *self.waits.entry(cell).or_default() += 1;
                }
                Movement::Stranded => vehicle.record_wait(),
                Movement::Advanced(_) | Movement::Arrived => {}
            }
        }
    }
}
