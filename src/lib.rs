pub use controller::PhaseController;
pub use driver::Driver;
pub use error::{Error, Result};
pub use grid::{Cell, Grid};
pub use intersection::Intersection;
pub use lookahead::{Candidate, LookaheadEngine};
pub use scenario::Scenario;
pub use signal::{LightState, Phase};
pub use simulation::{Simulation, SimulationAttributes};
use slotmap::{new_key_type, SlotMap};
pub use slotmap::{Key, KeyData};
pub use summary::{Summary, VehicleSummary};
pub use vehicle::{shortest_route, Movement, Vehicle, VehicleAttributes};

mod controller;
mod driver;
mod error;
mod grid;
mod intersection;
mod lookahead;
mod scenario;
mod signal;
mod simulation;
mod summary;
mod vehicle;

new_key_type! {
    /// Unique ID of a [Vehicle].
    pub struct VehicleId;
}

/// The intersections of a grid, keyed and ordered by their cell.
pub type IntersectionSet = std::collections::BTreeMap<Cell, Intersection>;

/// The vehicles of a simulation.
pub type VehicleSet = SlotMap<VehicleId, Vehicle>;
