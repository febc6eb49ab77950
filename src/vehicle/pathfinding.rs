use crate::{Cell, Grid};
use pathfinding::directed::bfs::bfs;

/// Finds a shortest 4-connected route over open cells from `start` to `destination`.
///
/// The returned route excludes `start` and ends at `destination`. It is empty if
/// the destination is unreachable, or if `start` and `destination` coincide.
/// Ties between equally short routes are broken by the grid's fixed neighbour order,
/// so the same grid always produces the same route.
pub fn shortest_route(grid: &Grid, start: Cell, destination: Cell) -> Vec<Cell> {
    if !grid.is_open(destination) {
        return vec![];
    }
    bfs(
        &start,
        |cell| grid.neighbours(*cell).collect::<Vec<_>>(),
        |cell| *cell == destination,
    )
    .map(|path| path.into_iter().skip(1).collect())
    .unwrap_or_default()
}
