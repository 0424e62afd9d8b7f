use crate::error::GridError;
use crate::particle::{Cell, Flavor};

/// Row-major flat grid. No per-cell objects.
/// Origin is the lower-left corner; `y` grows upward.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    pub data: Vec<T>,
    pub w: usize,
    pub h: usize,
}

impl<T: Copy + Default> Grid<T> {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            data: vec![T::default(); w * h],
            w,
            h,
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.w && y < self.h);
        y * self.w + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: T) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    #[inline]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h
    }

    /// Checked conversion of signed coordinates into an in-bounds position.
    pub fn checked_pos(&self, x: i64, y: i64) -> Result<(usize, usize), GridError> {
        if self.in_bounds(x, y) {
            Ok((x as usize, y as usize))
        } else {
            Err(GridError::OutOfBounds {
                x,
                y,
                w: self.w,
                h: self.h,
            })
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub fn offset(self) -> (i64, i64) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// One side of a cell's neighborhood. Off-grid sides resolve to `Boundary`,
/// which carries no position and so can never be written to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Neighbor {
    Cell { pos: (usize, usize), cell: Cell },
    Boundary,
}

impl Neighbor {
    #[inline]
    pub fn cell(&self) -> Cell {
        match self {
            Neighbor::Cell { cell, .. } => *cell,
            Neighbor::Boundary => Cell::BOUNDARY,
        }
    }

    #[inline]
    pub fn flavor(&self) -> Flavor {
        self.cell().flavor
    }

    #[inline]
    pub fn pos(&self) -> Option<(usize, usize)> {
        match self {
            Neighbor::Cell { pos, .. } => Some(*pos),
            Neighbor::Boundary => None,
        }
    }

    /// Position of this neighbor if it holds an Empty cell.
    #[inline]
    pub fn empty_pos(&self) -> Option<(usize, usize)> {
        match self {
            Neighbor::Cell { pos, cell } if cell.is_empty() => Some(*pos),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Neighbors {
    pub up: Neighbor,
    pub down: Neighbor,
    pub left: Neighbor,
    pub right: Neighbor,
}

impl Neighbors {
    pub fn get(&self, dir: Direction) -> Neighbor {
        match dir {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }
}

impl Grid<Cell> {
    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn cell_at(&self, x: i64, y: i64) -> Result<Cell, GridError> {
        let (x, y) = self.checked_pos(x, y)?;
        Ok(self.get(x, y))
    }

    pub fn neighbor(&self, x: usize, y: usize, dir: Direction) -> Neighbor {
        let (dx, dy) = dir.offset();
        let (nx, ny) = (x as i64 + dx, y as i64 + dy);
        if self.in_bounds(nx, ny) {
            let pos = (nx as usize, ny as usize);
            Neighbor::Cell {
                pos,
                cell: self.get(pos.0, pos.1),
            }
        } else {
            Neighbor::Boundary
        }
    }

    /// Live view of the four orthogonal neighbors of `(x, y)`.
    pub fn neighbors(&self, x: usize, y: usize) -> Neighbors {
        Neighbors {
            up: self.neighbor(x, y, Direction::Up),
            down: self.neighbor(x, y, Direction::Down),
            left: self.neighbor(x, y, Direction::Left),
            right: self.neighbor(x, y, Direction::Right),
        }
    }

    fn require_empty(&self, (x, y): (usize, usize), flavor: Flavor) -> Result<(), GridError> {
        let occupant = self.get(x, y).flavor;
        if occupant == Flavor::Empty {
            Ok(())
        } else {
            Err(GridError::InvalidMove {
                x,
                y,
                flavor,
                occupant,
            })
        }
    }

    /// Relocate the particle at `src` into the Empty cell at `dst`, leaving `src` Empty.
    pub fn move_into(&mut self, src: (usize, usize), dst: (usize, usize)) -> Result<(), GridError> {
        let moving = self.get(src.0, src.1);
        self.require_empty(dst, moving.flavor)?;
        self.set(dst.0, dst.1, moving);
        self.set(src.0, src.1, Cell::EMPTY);
        Ok(())
    }

    /// Create fresh matter in an Empty cell.
    pub fn spawn(&mut self, pos: (usize, usize), flavor: Flavor) -> Result<(), GridError> {
        self.require_empty(pos, flavor)?;
        self.set(pos.0, pos.1, Cell::new(flavor));
        Ok(())
    }

    /// Overwrite whatever is at `pos` with a fresh particle.
    pub fn convert(&mut self, pos: (usize, usize), flavor: Flavor) {
        self.set(pos.0, pos.1, Cell::new(flavor));
    }

    /// External placement: bounds-checked, ignores the occupant.
    pub fn paint(&mut self, x: i64, y: i64, flavor: Flavor) -> Result<(), GridError> {
        let pos = self.checked_pos(x, y)?;
        self.convert(pos, flavor);
        Ok(())
    }

    pub fn count(&self, flavor: Flavor) -> usize {
        self.data.iter().filter(|c| c.flavor == flavor).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_all_empty() {
        let grid = Grid::<Cell>::new(20, 30);
        assert_eq!(grid.width(), 20);
        assert_eq!(grid.height(), 30);
        for x in 0..20 {
            for y in 0..30 {
                assert_eq!(grid.cell_at(x, y), Ok(Cell::EMPTY), "({x}, {y})");
            }
        }
    }

    #[test]
    fn in_bounds_edges() {
        let grid = Grid::<Cell>::new(10, 20);
        assert!(grid.in_bounds(0, 0));
        assert!(grid.in_bounds(9, 19));
        assert!(grid.in_bounds(5, 10));
        assert!(!grid.in_bounds(-1, 0));
        assert!(!grid.in_bounds(0, -1));
        assert!(!grid.in_bounds(10, 0));
        assert!(!grid.in_bounds(0, 20));
        assert!(!grid.in_bounds(100, 100));
    }

    #[test]
    fn off_grid_neighbors_are_boundary() {
        let grid = Grid::<Cell>::new(2, 2);
        let n = grid.neighbors(0, 0);
        assert_eq!(n.down, Neighbor::Boundary);
        assert_eq!(n.left, Neighbor::Boundary);
        assert_eq!(n.down.cell(), Cell::BOUNDARY);
        assert_eq!(n.down.empty_pos(), None);
        assert_eq!(n.up.pos(), Some((0, 1)));
        assert_eq!(n.right.pos(), Some((1, 0)));
        assert_eq!(n.right.flavor(), Flavor::Empty);
    }

    #[test]
    fn neighbors_see_live_state() {
        let mut grid = Grid::<Cell>::new(1, 2);
        grid.paint(0, 0, Flavor::Sand).unwrap();
        assert_eq!(grid.neighbors(0, 1).down.flavor(), Flavor::Sand);
        grid.convert((0, 0), Flavor::Empty);
        assert_eq!(grid.neighbors(0, 1).down.flavor(), Flavor::Empty);
    }

    #[test]
    fn move_into_carries_decay() {
        let mut grid = Grid::<Cell>::new(2, 1);
        grid.set(0, 0, Cell { flavor: Flavor::Fire, decay: 7 });
        grid.move_into((0, 0), (1, 0)).unwrap();
        assert_eq!(grid.get(0, 0), Cell::EMPTY);
        assert_eq!(grid.get(1, 0), Cell { flavor: Flavor::Fire, decay: 7 });
    }

    #[test]
    fn move_into_occupied_fails_without_mutation() {
        let mut grid = Grid::<Cell>::new(2, 1);
        grid.paint(0, 0, Flavor::Sand).unwrap();
        grid.paint(1, 0, Flavor::Barrier).unwrap();
        let before = grid.clone();
        let err = grid.move_into((0, 0), (1, 0)).unwrap_err();
        assert_eq!(
            err,
            GridError::InvalidMove {
                x: 1,
                y: 0,
                flavor: Flavor::Sand,
                occupant: Flavor::Barrier,
            }
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn spawn_requires_empty() {
        let mut grid = Grid::<Cell>::new(1, 1);
        grid.spawn((0, 0), Flavor::Plant).unwrap();
        assert_eq!(grid.get(0, 0), Cell::new(Flavor::Plant));
        assert!(grid.spawn((0, 0), Flavor::Plant).is_err());
    }

    #[test]
    fn convert_and_paint_overwrite() {
        let mut grid = Grid::<Cell>::new(1, 1);
        grid.paint(0, 0, Flavor::Plant).unwrap();
        grid.convert((0, 0), Flavor::Fire);
        assert_eq!(grid.get(0, 0), Cell::new(Flavor::Fire));
        grid.paint(0, 0, Flavor::Water).unwrap();
        assert_eq!(grid.get(0, 0), Cell::new(Flavor::Water));
    }

    #[test]
    fn direct_access_out_of_bounds() {
        let mut grid = Grid::<Cell>::new(3, 3);
        assert_eq!(
            grid.cell_at(3, 0),
            Err(GridError::OutOfBounds { x: 3, y: 0, w: 3, h: 3 })
        );
        assert!(grid.paint(-1, 2, Flavor::Sand).is_err());
        assert_eq!(grid.count(Flavor::Empty), 9);
    }
}
