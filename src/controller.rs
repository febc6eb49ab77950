use crate::intersection::apply_phase;
use crate::{IntersectionSet, LookaheadEngine, Phase, VehicleSet};

/// A grid-wide signal controller which holds each phase for a minimum dwell
/// duration before asking a [LookaheadEngine] whether to switch.
#[derive(Clone, Debug)]
pub struct PhaseController {
    /// The phase currently shown.
    phase: Phase,
    /// The minimum time a phase is held, in ticks.
    phase_duration: u64,
    /// The time since the last phase change, in ticks.
    since: u64,
    /// The search used to pick the next phase.
    engine: LookaheadEngine,
    /// The number of phase changes so far.
    switches: usize,
}

impl PhaseController {
    /// Creates a controller starting in the vertical phase.
    pub fn new(phase_duration: u64, engine: LookaheadEngine) -> Self {
        Self {
            phase: Phase::Vertical,
            phase_duration,
            since: 0,
            engine,
            switches: 0,
        }
    }

    /// Gets the phase currently shown.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Gets the minimum dwell duration, in ticks.
    pub fn phase_duration(&self) -> u64 {
        self.phase_duration
    }

    /// Gets the time since the last phase change, in ticks.
    pub fn since(&self) -> u64 {
        self.since
    }

    /// Gets the number of phase changes so far.
    pub fn switches(&self) -> usize {
        self.switches
    }

    /// Gets the search used to pick the next phase.
    pub fn engine(&self) -> &LookaheadEngine {
        &self.engine
    }

    /// Advances the controller by `dt` ticks and applies its phase to every signal.
    ///
    /// Once the dwell duration has elapsed the engine is consulted, and the phase
    /// changes only if the engine recommends the other one.
    /// Returns `true` iff the phase changed.
    pub fn update(&mut self, dt: u64, intersections: &mut IntersectionSet, vehicles: &VehicleSet) -> bool {
        self.since += dt;

        let mut switched = false;
        if self.since >= self.phase_duration {
            let next = self
                .engine
                .decide_next_phase(intersections, vehicles, self.phase);
            if next != self.phase {
                log::debug!(
                    "switching phase {} -> {} after {} ticks",
                    self.phase,
                    next,
                    self.since
                );
                self.phase = next;
                self.since = 0;
                self.switches += 1;
                switched = true;
            }
        }

        apply_phase(intersections, self.phase);
        switched
    }

    /// Returns the controller to the vertical phase with a fresh dwell timer.
    pub fn reset(&mut self) {
        self.phase = Phase::Vertical;
        self.since = 0;
        self.switches = 0;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::intersection::build_intersections;
    use crate::{Cell, Grid, Vehicle, VehicleAttributes};

    fn horizontal_world() -> (IntersectionSet, VehicleSet) {
        let grid = Grid::open(3, 6);
        let mut vehicles = VehicleSet::with_key();
        let attributes = VehicleAttributes {
            start: Cell::new(1, 0),
            destination: Cell::new(1, 5),
        };
        vehicles.insert_with_key(|id| Vehicle::new(id, &attributes, &grid));
        (build_intersections(&grid), vehicles)
    }

    #[test]
    fn holds_phase_for_dwell_duration() {
        let (mut intersections, vehicles) = horizontal_world();
        let mut controller = PhaseController::new(3, LookaheadEngine::new(2));

        assert!(!controller.update(1, &mut intersections, &vehicles));
        assert!(!controller.update(1, &mut intersections, &vehicles));
        assert_eq!(controller.phase(), Phase::Vertical);
        assert!(intersections[&Cell::new(0, 0)].is_green());

        assert!(controller.update(1, &mut intersections, &vehicles));
        assert_eq!(controller.phase(), Phase::Horizontal);
        assert_eq!(controller.since(), 0);
        assert_eq!(controller.switches(), 1);
        assert!(intersections[&Cell::new(1, 1)].is_green());
    }

    #[test]
    fn agreeing_engine_keeps_phase() {
        let (mut intersections, vehicles) = horizontal_world();
        let mut controller = PhaseController::new(1, LookaheadEngine::new(1));
        assert!(controller.update(1, &mut intersections, &vehicles));
        for _ in 0..5 {
            assert!(!controller.update(1, &mut intersections, &vehicles));
        }
        assert_eq!(controller.since(), 5);
        assert_eq!(controller.switches(), 1);
    }

    #[test]
    fn reset_returns_to_vertical() {
        let (mut intersections, vehicles) = horizontal_world();
        let mut controller = PhaseController::new(1, LookaheadEngine::new(1));
        controller.update(1, &mut intersections, &vehicles);
        controller.reset();
        assert_eq!(controller.phase(), Phase::Vertical);
        assert_eq!((controller.since(), controller.switches()), (0, 0));
    }
}
