use crate::{Cell, Grid, IntersectionSet, LightState, Phase};
use smallvec::SmallVec;

/// A signalised intersection occupying one open cell of the grid.
#[derive(Clone, Debug)]
pub struct Intersection {
    /// The cell the intersection occupies.
    cell: Cell,
    /// The open cells adjacent to this one.
    neighbours: SmallVec<[Cell; 4]>,
    /// Whether a road runs vertically through the intersection.
    vertical: bool,
    /// Whether a road runs horizontally through the intersection.
    horizontal: bool,
    /// The current state of the signal.
    state: LightState,
}

impl Intersection {
    /// Creates the intersection at an open cell of the grid.
    pub(crate) fn new(cell: Cell, grid: &Grid) -> Self {
        debug_assert!(grid.is_open(cell));
        let neighbours = grid.neighbours(cell).collect::<SmallVec<[Cell; 4]>>();
        Self {
            cell,
            vertical: neighbours.iter().any(|n| n.col == cell.col && n.row != cell.row),
            horizontal: neighbours.iter().any(|n| n.row == cell.row && n.col != cell.col),
            neighbours,
            state: LightState::Red,
        }
    }

    /// Gets the cell the intersection occupies.
    pub fn cell(&self) -> Cell {
        self.cell
    }

    /// Gets the open cells adjacent to the intersection.
    pub fn neighbours(&self) -> &[Cell] {
        &self.neighbours
    }

    /// Whether the intersection lies on a vertical road.
    pub fn is_vertical(&self) -> bool {
        self.vertical
    }

    /// Whether the intersection lies on a horizontal road.
    /// A four-way intersection is both vertical and horizontal.
    pub fn is_horizontal(&self) -> bool {
        self.horizontal
    }

    /// Whether the intersection shows green during the given phase.
    pub fn serves(&self, phase: Phase) -> bool {
        match phase {
            Phase::Vertical => self.vertical,
            Phase::Horizontal => self.horizontal,
        }
    }

    /// Gets the current signal state.
    pub fn state(&self) -> LightState {
        self.state
    }

    /// Whether the signal is currently green.
    pub fn is_green(&self) -> bool {
        self.state == LightState::Green
    }

    /// Sets the signal for the given phase.
    pub(crate) fn apply_phase(&mut self, phase: Phase) {
        self.state = if self.serves(phase) {
            LightState::Green
        } else {
            LightState::Red
        };
    }

    /// Turns the signal red.
    pub(crate) fn reset(&mut self) {
        self.state = LightState::Red;
    }
}

/// Creates an intersection for every open cell of the grid.
pub(crate) fn build_intersections(grid: &Grid) -> IntersectionSet {
    grid.open_cells()
        .map(|cell| (cell, Intersection::new(cell, grid)))
        .collect()
}

/// Sets every signal for the given phase.
pub(crate) fn apply_phase(intersections: &mut IntersectionSet, phase: Phase) {
    for intersection in intersections.values_mut() {
        intersection.apply_phase(phase);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn orientation_follows_adjacency() {
        let grid = Grid::parse(
            "0 0 0
             1 0 1
             1 0 1",
        )
        .unwrap();
        let intersections = build_intersections(&grid);
        assert_eq!(intersections.len(), 5);

        // Top row: a T-junction in the middle, dead ends either side
        let corner = &intersections[&Cell::new(0, 0)];
        assert!(corner.is_horizontal() && !corner.is_vertical());
        let tee = &intersections[&Cell::new(0, 1)];
        assert!(tee.is_horizontal() && tee.is_vertical());
        let stem = &intersections[&Cell::new(2, 1)];
        assert!(stem.is_vertical() && !stem.is_horizontal());
        assert_eq!(stem.neighbours(), &[Cell::new(1, 1)]);
    }

    #[test]
    fn phases_switch_signals() {
        let grid = Grid::open(1, 3);
        let mut intersections = build_intersections(&grid);
        assert!(intersections.values().all(|i| i.state() == LightState::Red));

        apply_phase(&mut intersections, Phase::Horizontal);
        assert!(intersections.values().all(Intersection::is_green));

        apply_phase(&mut intersections, Phase::Vertical);
        assert!(intersections.values().all(|i| !i.is_green()));
    }
}
