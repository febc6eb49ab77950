pub use self::pathfinding::shortest_route;
use crate::{Cell, Grid, IntersectionSet, Phase, VehicleId};
use std::collections::VecDeque;

mod pathfinding;

/// A simulated vehicle travelling cell by cell along its route.
#[derive(Clone, Debug)]
pub struct Vehicle {
    /// The vehicle's ID.
    pub(crate) id: VehicleId,
    /// The cell the vehicle set off from.
    start: Cell,
    /// The cell the vehicle is heading to.
    destination: Cell,
    /// The cell the vehicle currently occupies.
    position: Cell,
    /// The cells still to be visited, next hop first.
    route: VecDeque<Cell>,
    /// The number of ticks the vehicle wanted to move but could not.
    wait_time: u64,
    /// The number of ticks the vehicle has been on the road.
    travel_time: u64,
}

/// The attributes of a simulated vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleAttributes {
    /// The cell the vehicle starts at.
    pub start: Cell,
    /// The cell the vehicle would like to reach.
    pub destination: Cell,
}

/// The outcome of one attempt to move a vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Movement {
    /// The vehicle is already at its destination.
    Arrived,
    /// The vehicle moved onto the given cell.
    Advanced(Cell),
    /// The vehicle was held at the signal of the given cell.
    Blocked(Cell),
    /// The vehicle has no route to its destination.
    Stranded,
}

impl Movement {
    /// Whether the attempt costs the vehicle one unit of waiting.
    pub fn is_wait(self) -> bool {
        matches!(self, Movement::Blocked(_) | Movement::Stranded)
    }
}

impl Vehicle {
    /// Creates a new vehicle at its start cell, routed over the grid.
    pub(crate) fn new(id: VehicleId, attributes: &VehicleAttributes, grid: &Grid) -> Self {
        let mut vehicle = Self {
            id,
            start: attributes.start,
            destination: attributes.destination,
            position: attributes.start,
            route: VecDeque::new(),
            wait_time: 0,
            travel_time: 0,
        };
        vehicle.reset(grid);
        vehicle
    }

    /// Gets the vehicle's ID.
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// The cell the vehicle set off from.
    pub fn start(&self) -> Cell {
        self.start
    }

    /// The cell the vehicle is heading to.
    pub fn destination(&self) -> Cell {
        self.destination
    }

    /// The cell the vehicle currently occupies.
    pub fn position(&self) -> Cell {
        self.position
    }

    /// The cells still to be visited, next hop first.
    pub fn route(&self) -> impl ExactSizeIterator<Item = Cell> + '_ {
        self.route.iter().copied()
    }

    /// The next cell on the route, if any.
    pub fn next_hop(&self) -> Option<Cell> {
        self.route.front().copied()
    }

    /// The number of ticks the vehicle wanted to move but could not.
    pub fn wait_time(&self) -> u64 {
        self.wait_time
    }

    /// The number of ticks the vehicle has been on the road.
    pub fn travel_time(&self) -> u64 {
        self.travel_time
    }

    /// Whether the vehicle has reached its destination.
    pub fn has_arrived(&self) -> bool {
        self.position == self.destination
    }

    /// Whether the vehicle can never reach its destination.
    pub fn is_stranded(&self) -> bool {
        !self.has_arrived() && self.route.is_empty()
    }

    /// Tries to move the vehicle one cell along its route during the given phase.
    ///
    /// The vehicle advances only if the signal at its next hop is green and the
    /// step runs along the phase's orientation. The same rule drives both the live
    /// simulation and the lookahead search.
    pub(crate) fn attempt_move(&mut self, intersections: &IntersectionSet, phase: Phase) -> Movement {
        if self.has_arrived() {
            return Movement::Arrived;
        }
        let Some(next) = self.next_hop() else {
            return Movement::Stranded;
        };

        let green = intersections
            .get(&next)
            .map_or(false, |intersection| intersection.is_green());
        if green && self.position.step_phase(next) == Some(phase) {
            self.advance();
            Movement::Advanced(next)
        } else {
            Movement::Blocked(next)
        }
    }

    /// Moves the vehicle onto the next cell of its route.
    fn advance(&mut self) {
        if let Some(next) = self.route.pop_front() {
            self.position = next;
        }
    }

    /// Counts one tick on the road.
    pub(crate) fn record_travel(&mut self) {
        self.travel_time += 1;
    }

    /// Counts one tick of waiting.
    pub(crate) fn record_wait(&mut self) {
        self.wait_time += 1;
    }

    /// Returns the vehicle to its start cell with a fresh route and zeroed counters.
    pub(crate) fn reset(&mut self, grid: &Grid) {
        self.position = self.start;
        self.route = shortest_route(grid, self.start, self.destination).into();
        self.wait_time = 0;
        self.travel_time = 0;
        if self.is_stranded() {
            log::warn!(
                "no route from {} to {}, vehicle will never arrive",
                self.start,
                self.destination
            );
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::intersection::{apply_phase, build_intersections};

    fn vehicle(grid: &Grid, start: (usize, usize), destination: (usize, usize)) -> Vehicle {
        let attributes = VehicleAttributes {
            start: start.into(),
            destination: destination.into(),
        };
        Vehicle::new(VehicleId::default(), &attributes, grid)
    }

    #[test]
    fn moves_only_along_green_phase() {
        let grid = Grid::open(3, 3);
        let mut intersections = build_intersections(&grid);
        let mut veh = vehicle(&grid, (0, 0), (0, 2));
        assert_eq!(veh.route().len(), 2);

        apply_phase(&mut intersections, Phase::Vertical);
        let outcome = veh.attempt_move(&intersections, Phase::Vertical);
        assert_eq!(outcome, Movement::Blocked(Cell::new(0, 1)));
        assert!(outcome.is_wait());
        assert_eq!(veh.position(), Cell::new(0, 0));

        apply_phase(&mut intersections, Phase::Horizontal);
        let outcome = veh.attempt_move(&intersections, Phase::Horizontal);
        assert_eq!(outcome, Movement::Advanced(Cell::new(0, 1)));
        assert!(!outcome.is_wait());
        veh.attempt_move(&intersections, Phase::Horizontal);
        assert!(veh.has_arrived());
        assert_eq!(
            veh.attempt_move(&intersections, Phase::Horizontal),
            Movement::Arrived
        );
    }

    #[test]
    fn red_signal_blocks_even_in_matching_phase() {
        let grid = Grid::open(1, 3);
        let intersections = build_intersections(&grid);
        let mut veh = vehicle(&grid, (0, 0), (0, 2));
        // Signals start red
        assert!(veh.attempt_move(&intersections, Phase::Horizontal).is_wait());
    }

    #[test]
    fn unreachable_vehicle_is_stranded() {
        let grid = Grid::parse("0 1 0").unwrap();
        let intersections = build_intersections(&grid);
        let mut veh = vehicle(&grid, (0, 0), (0, 2));
        assert!(veh.is_stranded());
        assert_eq!(veh.attempt_move(&intersections, Phase::Horizontal), Movement::Stranded);
        assert_eq!(veh.position(), Cell::new(0, 0));
    }

    #[test]
    fn reset_restores_start() {
        let grid = Grid::open(1, 2);
        let mut intersections = build_intersections(&grid);
        apply_phase(&mut intersections, Phase::Horizontal);
        let mut veh = vehicle(&grid, (0, 0), (0, 1));
        veh.attempt_move(&intersections, Phase::Horizontal);
        veh.record_travel();
        veh.record_wait();
        assert!(veh.has_arrived());

        veh.reset(&grid);
        assert_eq!(veh.position(), Cell::new(0, 0));
        assert_eq!(veh.next_hop(), Some(Cell::new(0, 1)));
        assert_eq!((veh.wait_time(), veh.travel_time()), (0, 0));
    }
}
