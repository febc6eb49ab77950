//! End-of-run reporting.

use crate::{Cell, Vehicle, VehicleId};
use std::collections::BTreeMap;
use std::fmt;

/// A summary of a simulation run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Summary {
    /// The number of ticks simulated.
    pub frames: usize,
    /// The outcome for each vehicle, in insertion order.
    pub vehicles: Vec<VehicleSummary>,
    /// The mean wait time over all vehicles, in ticks.
    pub average_wait: f64,
    /// The mean travel time over all vehicles, in ticks.
    pub average_travel: f64,
    /// The intersections at which vehicles waited, with their wait counts.
    pub intersection_waits: Vec<(Cell, u64)>,
}

/// The outcome of a single vehicle's trip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VehicleSummary {
    pub id: VehicleId,
    pub start: Cell,
    pub position: Cell,
    pub destination: Cell,
    pub wait_time: u64,
    pub travel_time: u64,
    pub arrived: bool,
}

impl Summary {
    pub(crate) fn new<'a>(
        frames: usize,
        vehicles: impl Iterator<Item = &'a Vehicle>,
        waits: &BTreeMap<Cell, u64>,
    ) -> Self {
        let vehicles = vehicles
            .map(|vehicle| VehicleSummary {
                id: vehicle.id(),
                start: vehicle.start(),
                position: vehicle.position(),
                destination: vehicle.destination(),
                wait_time: vehicle.wait_time(),
                travel_time: vehicle.travel_time(),
                arrived: vehicle.has_arrived(),
            })
            .collect::<Vec<_>>();

        let mean = |total: u64| {
            if vehicles.is_empty() {
                0.0
            } else {
                total as f64 / vehicles.len() as f64
            }
        };
        let average_wait = mean(vehicles.iter().map(|v| v.wait_time).sum());
        let average_travel = mean(vehicles.iter().map(|v| v.travel_time).sum());

        Self {
            frames,
            average_wait,
            average_travel,
            intersection_waits: waits
                .iter()
                .filter(|(_, count)| **count > 0)
                .map(|(cell, count)| (*cell, *count))
                .collect(),
            vehicles,
        }
    }

    /// Whether every vehicle reached its destination.
    pub fn all_arrived(&self) -> bool {
        self.vehicles.iter().all(|v| v.arrived)
    }

    /// The vehicles which never reached their destination.
    pub fn never_arrived(&self) -> impl Iterator<Item = &VehicleSummary> {
        self.vehicles.iter().filter(|v| !v.arrived)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.all_arrived() {
            writeln!(f, "All vehicles arrived in {} steps.", self.frames)?;
        } else {
            writeln!(
                f,
                "{} of {} vehicles arrived after {} steps.",
                self.vehicles.len() - self.never_arrived().count(),
                self.vehicles.len(),
                self.frames
            )?;
        }
        writeln!(
            f,
            "Avg Wait: {:.2}, Avg Travel: {:.2}",
            self.average_wait, self.average_travel
        )?;

        writeln!(f, "\nVehicles:")?;
        for (idx, v) in self.vehicles.iter().enumerate() {
            let status = if v.arrived { "arrived" } else { "never arrived" };
            writeln!(
                f,
                "  V{}: {} -> {} -> {} ({status}, wait {}, travel {})",
                idx + 1,
                v.start,
                v.position,
                v.destination,
                v.wait_time,
                v.travel_time
            )?;
        }

        writeln!(f, "\nIntersection Waits:")?;
        for (cell, count) in &self.intersection_waits {
            writeln!(f, "  {cell}: {count}")?;
        }
        Ok(())
    }
}
