//! Scenario descriptions: a grid, the vehicle trips and the timing attributes.

use crate::{Grid, Result, Simulation, SimulationAttributes, VehicleAttributes};

/// The number of ticks after which an unfinished run is abandoned.
const DEFAULT_MAX_FRAMES: usize = 100;

/// A complete simulation setup, optionally loaded from JSON.
///
/// ```json
/// {
///     "grid": [[0, 0, 0], [1, 0, 1], [0, 0, 0]],
///     "trips": [{ "start": { "row": 0, "col": 0 }, "destination": { "row": 2, "col": 2 } }],
///     "attributes": { "phase_duration": 2, "lookahead_depth": 3 },
///     "max_frames": 50
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scenario {
    /// Rows of cell markers, 0 for open road and 1 for buildings.
    pub grid: Vec<Vec<u8>>,
    /// One trip per vehicle.
    pub trips: Vec<VehicleAttributes>,
    /// The controller timing.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: SimulationAttributes,
    /// The number of ticks after which an unfinished run is abandoned.
    #[cfg_attr(feature = "serde", serde(default = "default_max_frames"))]
    pub max_frames: usize,
}

#[cfg(feature = "serde")]
fn default_max_frames() -> usize {
    DEFAULT_MAX_FRAMES
}

impl Scenario {
    /// A small city of 5x5 blocks with four crossing trips.
    pub fn demo() -> Self {
        let trips = [
            ((0, 0), (4, 4)),
            ((4, 0), (0, 4)),
            ((2, 0), (2, 4)),
            ((0, 2), (4, 2)),
        ];
        Self {
            grid: vec![
                vec![0, 0, 0, 0, 0],
                vec![1, 1, 0, 1, 0],
                vec![0, 0, 0, 0, 0],
                vec![0, 1, 0, 1, 1],
                vec![0, 0, 0, 0, 0],
            ],
            trips: trips
                .iter()
                .map(|(start, destination)| VehicleAttributes {
                    start: (*start).into(),
                    destination: (*destination).into(),
                })
                .collect(),
            attributes: SimulationAttributes::default(),
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }

    /// Parses a scenario from JSON.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialises the scenario to pretty-printed JSON.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates the scenario and builds a simulation with every trip added.
    pub fn build(&self) -> Result<Simulation> {
        let grid = Grid::from_rows(&self.grid)?;
        let mut sim = Simulation::new(grid, &self.attributes)?;
        for trip in &self.trips {
            sim.add_vehicle(trip)?;
        }
        Ok(sim)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Cell, Error};

    #[test]
    fn demo_builds() {
        let sim = Scenario::demo().build().unwrap();
        assert_eq!(sim.iter_vehicles().count(), 4);
        assert_eq!(sim.iter_intersections().count(), 19);
        assert!(sim.iter_vehicles().all(|v| !v.is_stranded()));
    }

    #[test]
    fn demo_run_finishes() {
        let scenario = Scenario::demo();
        let mut sim = scenario.build().unwrap();
        let frames = sim.run(scenario.max_frames);
        assert!(frames < scenario.max_frames);
        assert!(sim.summary().all_arrived());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_defaults() {
        let scenario = Scenario::from_json(
            r#"{
                "grid": [[0, 0], [0, 1]],
                "trips": [{ "start": { "row": 0, "col": 0 }, "destination": { "row": 1, "col": 0 } }]
            }"#,
        )
        .unwrap();
        assert_eq!(scenario.attributes, SimulationAttributes::default());
        assert_eq!(scenario.max_frames, DEFAULT_MAX_FRAMES);
        assert_eq!(scenario.trips[0].destination, Cell::new(1, 0));

        let demo = Scenario::demo();
        assert_eq!(Scenario::from_json(&demo.to_json().unwrap()).unwrap(), demo);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn malformed_json() {
        assert!(matches!(Scenario::from_json("{\"grid\": 3}"), Err(Error::Json(_))));
    }

    #[test]
    fn invalid_trip_is_rejected() {
        let mut scenario = Scenario::demo();
        scenario.trips[0].destination = Cell::new(1, 0);
        assert!(matches!(scenario.build(), Err(Error::BlockedCell(_))));
    }
}
