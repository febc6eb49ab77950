//! Lookahead search over future signal phases.
//!
//! Every sequence of `depth` phases is replayed against a private copy of the
//! world, using the same signal and movement rules as the live simulation.
//! Each step in which a vehicle wanted to move but could not costs one unit,
//! and the first phase of the cheapest sequence is chosen.

use crate::intersection::apply_phase;
use crate::{IntersectionSet, Phase, VehicleSet};
use itertools::Itertools;

/// The default number of phases searched ahead.
pub const DEFAULT_DEPTH: usize = 3;

/// Chooses the next signal phase by exhaustively searching phase sequences.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LookaheadEngine {
    /// The number of phases in each searched sequence.
    depth: usize,
}

/// A searched phase sequence and the total wait it produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// The phases, applied one per tick.
    pub sequence: Vec<Phase>,
    /// The total number of wait units across all vehicles and steps.
    pub cost: u64,
}

impl LookaheadEngine {
    /// Creates an engine which searches sequences of `depth` phases.
    pub fn new(depth: usize) -> Self {
        Self { depth }
    }

    /// Gets the number of phases in each searched sequence.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Enumerates all `2^depth` phase sequences in lexicographic order,
    /// from all-vertical to all-horizontal.
    pub fn sequences(&self) -> impl Iterator<Item = Vec<Phase>> {
        let depth = self.depth;
        itertools::repeat_n(Phase::ALL, depth)
            .multi_cartesian_product()
            .filter(move |_| depth > 0)
    }

    /// Costs every phase sequence against the given world, in enumeration order.
    /// The inputs are never modified.
    pub fn evaluate(&self, intersections: &IntersectionSet, vehicles: &VehicleSet) -> Vec<Candidate> {
        let sequences = self.sequences().collect::<Vec<_>>();

        #[cfg(not(feature = "parallel"))]
        let candidates = sequences
            .into_iter()
            .map(|sequence| Candidate::new(sequence, intersections, vehicles))
            .collect::<Vec<_>>();

        #[cfg(feature = "parallel")]
        let candidates = {
            use rayon::prelude::*;
            // An indexed collect keeps enumeration order for the tie-break.
            sequences
                .into_par_iter()
                .map(|sequence| Candidate::new(sequence, intersections, vehicles))
                .collect::<Vec<_>>()
        };

        candidates
    }

    /// Returns the first phase of the cheapest sequence, preferring the earliest
    /// enumerated sequence on ties. Falls back to `current` when nothing was searched.
    pub fn decide_next_phase(
        &self,
        intersections: &IntersectionSet,
        vehicles: &VehicleSet,
        current: Phase,
    ) -> Phase {
        let best = self
            .evaluate(intersections, vehicles)
            .into_iter()
            .min_by_key(|candidate| candidate.cost);

        match best {
            Some(candidate) => {
                log::trace!(
                    "lookahead picked {:?} with cost {}",
                    candidate.sequence,
                    candidate.cost
                );
                candidate.sequence[0]
            }
            None => current,
        }
    }
}

impl Default for LookaheadEngine {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

impl Candidate {
    /// Replays a phase sequence against a copy of the world.
    fn new(sequence: Vec<Phase>, intersections: &IntersectionSet, vehicles: &VehicleSet) -> Self {
        let cost = sequence_cost(&sequence, intersections, vehicles);
        Self { sequence, cost }
    }
}

/// Computes the total wait produced by applying `sequence` to a copy of the world.
pub fn sequence_cost(sequence: &[Phase], intersections: &IntersectionSet, vehicles: &VehicleSet) -> u64 {
    let mut intersections = intersections.clone();
    let mut vehicles = vehicles.clone();
    let mut cost = 0;

    for phase in sequence {
        apply_phase(&mut intersections, *phase);
        for vehicle in vehicles.values_mut() {
            if vehicle.attempt_move(&intersections, *phase).is_wait() {
                cost += 1;
            }
        }
    }

    cost
}
