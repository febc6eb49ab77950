//! The street grid and the cells it is made of.

use crate::{Error, Phase, Result};
use std::fmt;

/// Row and column offsets of the four neighbours of a cell, in exploration order.
const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// A (row, column) coordinate on the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

/// A fixed-size occupancy grid of open road cells and blocked building cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// The number of rows.
    rows: usize,
    /// The number of columns.
    cols: usize,
    /// Row-major flags, `true` for blocked cells.
    blocked: Vec<bool>,
}

impl Cell {
    /// Creates a new cell.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Offsets the cell, returning `None` if it would leave the first quadrant.
    fn offset(self, dr: isize, dc: isize) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add_signed(dr)?,
            col: self.col.checked_add_signed(dc)?,
        })
    }

    /// The phase under which a step from this cell to `next` may proceed:
    /// vertical if only the row changes, horizontal if only the column changes.
    pub fn step_phase(self, next: Cell) -> Option<Phase> {
        match (self.row == next.row, self.col == next.col) {
            (false, true) => Some(Phase::Vertical),
            (true, false) => Some(Phase::Horizontal),
            _ => None,
        }
    }

    /// The Manhattan distance between two cells.
    pub fn manhattan(self, other: Cell) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl Grid {
    /// Creates a grid with every cell open.
    pub fn open(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            blocked: vec![false; rows * cols],
        }
    }

    /// Creates a grid from rows of markers, where 0 is open and 1 is blocked.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |row| row.as_ref().len());
        if cols == 0 {
            return Err(Error::EmptyGrid);
        }

        let mut blocked = Vec::with_capacity(rows.len() * cols);
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(Error::NotRectangular {
                    row: r,
                    expected: cols,
                    got: row.len(),
                });
            }
            for (c, marker) in row.iter().enumerate() {
                match marker {
                    0 => blocked.push(false),
                    1 => blocked.push(true),
                    other => {
                        return Err(Error::InvalidMarker {
                            cell: Cell::new(r, c),
                            marker: other.to_string(),
                        })
                    }
                }
            }
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            blocked,
        })
    }

    /// Parses a grid from whitespace separated markers, one row per line.
    /// Blank lines are ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let rows = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(r, line)| {
                line.split_whitespace()
                    .enumerate()
                    .map(|(c, token)| match token {
                        "0" => Ok(0),
                        "1" => Ok(1),
                        other => Err(Error::InvalidMarker {
                            cell: Cell::new(r, c),
                            marker: other.to_owned(),
                        }),
                    })
                    .collect::<Result<Vec<u8>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_rows(&rows)
    }

    /// Marks a cell as blocked.
    pub fn block(&mut self, cell: Cell) -> Result<()> {
        let idx = self.index(cell).ok_or(Error::OutOfBounds(cell))?;
        self.blocked[idx] = true;
        Ok(())
    }

    /// The number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether the cell lies within the grid.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// Whether the cell lies within the grid and is open road.
    pub fn is_open(&self, cell: Cell) -> bool {
        self.index(cell).map_or(false, |idx| !self.blocked[idx])
    }

    /// Checks that a cell can hold a vehicle.
    pub(crate) fn check_open(&self, cell: Cell) -> Result<()> {
        match self.index(cell) {
            None => Err(Error::OutOfBounds(cell)),
            Some(idx) if self.blocked[idx] => Err(Error::BlockedCell(cell)),
            Some(_) => Ok(()),
        }
    }

    /// Iterates over the open cells in row-major order.
    pub fn open_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.cols).map(move |col| Cell::new(row, col)))
            .filter(|cell| self.is_open(*cell))
    }

    /// Iterates over the open 4-connected neighbours of a cell,
    /// always in the order down, up, right, left.
    pub fn neighbours(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        DIRECTIONS
            .iter()
            .filter_map(move |(dr, dc)| cell.offset(*dr, *dc))
            .filter(|cell| self.is_open(*cell))
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        self.contains(cell).then(|| cell.row * self.cols + cell.col)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_markers() {
        let grid = Grid::parse("0 1 0\n0 0 0\n").unwrap();
        assert_eq!((grid.rows(), grid.cols()), (2, 3));
        assert!(grid.is_open(Cell::new(0, 0)));
        assert!(!grid.is_open(Cell::new(0, 1)));
        assert!(!grid.is_open(Cell::new(2, 0)));
        assert_eq!(grid.open_cells().count(), 5);
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = Grid::from_rows(&[vec![0u8, 0], vec![0]]).unwrap_err();
        assert!(matches!(
            err,
            Error::NotRectangular {
                row: 1,
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn rejects_bad_markers() {
        assert!(matches!(
            Grid::from_rows(&[[0u8, 2]]),
            Err(Error::InvalidMarker { cell: Cell { row: 0, col: 1 }, .. })
        ));
        assert!(matches!(Grid::parse("0 x"), Err(Error::InvalidMarker { .. })));
        assert!(matches!(Grid::parse(""), Err(Error::EmptyGrid)));
    }

    #[test]
    fn neighbour_order_is_fixed() {
        let grid = Grid::open(3, 3);
        let neighbours = grid.neighbours(Cell::new(1, 1)).collect::<Vec<_>>();
        assert_eq!(
            neighbours,
            [(2, 1), (0, 1), (1, 2), (1, 0)].map(Cell::from).to_vec()
        );

        let corner = grid.neighbours(Cell::new(0, 0)).collect::<Vec<_>>();
        assert_eq!(corner, [(1, 0), (0, 1)].map(Cell::from).to_vec());
    }

    #[test]
    fn step_phase() {
        let cell = Cell::new(2, 2);
        assert_eq!(cell.step_phase(Cell::new(3, 2)), Some(Phase::Vertical));
        assert_eq!(cell.step_phase(Cell::new(2, 1)), Some(Phase::Horizontal));
        assert_eq!(cell.step_phase(cell), None);
        assert_eq!(cell.step_phase(Cell::new(3, 3)), None);
    }
}
