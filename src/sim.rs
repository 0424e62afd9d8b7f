use serde::Serialize;
use tracing::{debug, warn};

use crate::board;
use crate::config::Params;
use crate::error::{GridError, SimError};
use crate::grid::Grid;
use crate::particle::{Cell, Flavor};
use crate::rng::Rng;
use crate::rules::{self, RuleCtx};

/// What happened during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub moved: usize,
    pub spawned: usize,
    pub ignited: usize,
    pub expired: usize,
}

/// A grid plus the seeded random stream and tick counter that drive it.
///
/// Ticks scan columns left to right and each column bottom to top, acting on
/// whatever occupies a position at the moment it is visited. Particles that
/// move into a position not yet visited act again in the same tick.
#[derive(Clone, Debug)]
pub struct Simulation {
    grid: Grid<Cell>,
    params: Params,
    rng: Rng,
    tick: u64,
    backup: Vec<Cell>,
}

impl Simulation {
    pub fn new(grid: Grid<Cell>, params: Params, seed: u64) -> Result<Self, SimError> {
        params.validate()?;
        Ok(Self {
            grid,
            params,
            rng: Rng::new(seed),
            tick: 0,
            backup: Vec::new(),
        })
    }

    pub fn blank(w: usize, h: usize, params: Params, seed: u64) -> Result<Self, SimError> {
        Self::new(Grid::new(w, h), params, seed)
    }

    pub fn from_board(text: &str, params: Params, seed: u64) -> Result<Self, SimError> {
        Self::new(board::decode(text)?, params, seed)
    }

    pub fn grid(&self) -> &Grid<Cell> {
        &self.grid
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn cell_at(&self, x: i64, y: i64) -> Result<Cell, GridError> {
        self.grid.cell_at(x, y)
    }

    pub fn paint(&mut self, x: i64, y: i64, flavor: Flavor) -> Result<(), GridError> {
        self.grid.paint(x, y, flavor)
    }

    /// Advance exactly one tick. On failure the grid is left as it was before the tick.
    pub fn step(&mut self) -> Result<TickReport, GridError> {
        self.backup.clone_from(&self.grid.data);
        let mut report = TickReport {
            tick: self.tick,
            ..TickReport::default()
        };

        if let Err(err) = self.scan(&mut report) {
            warn!(tick = self.tick, %err, "tick aborted, grid restored");
            self.grid.data.clone_from(&self.backup);
            return Err(err);
        }

        self.tick += 1;
        debug!(
            tick = report.tick,
            moved = report.moved,
            spawned = report.spawned,
            ignited = report.ignited,
            expired = report.expired,
            "tick complete"
        );
        Ok(report)
    }

    /// Advance `ticks` ticks, stopping at the first failure.
    pub fn run(&mut self, ticks: u64) -> Result<Vec<TickReport>, GridError> {
        (0..ticks).map(|_| self.step()).collect()
    }

    fn scan(&mut self, report: &mut TickReport) -> Result<(), GridError> {
        let mut ctx = RuleCtx {
            params: &self.params,
            rng: &mut self.rng,
            tick: self.tick,
            report,
        };
        for x in 0..self.grid.w {
            for y in 0..self.grid.h {
                rules::act(&mut self.grid, (x, y), &mut ctx)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim(text: &str, seed: u64) -> Simulation {
        Simulation::from_board(text, Params::default(), seed).unwrap()
    }

    #[test]
    fn column_cascade() {
        let mut s = Simulation::blank(1, 3, Params::default(), 0).unwrap();
        s.paint(0, 2, Flavor::Sand).unwrap();
        s.paint(0, 1, Flavor::Sand).unwrap();
        s.step().unwrap();
        assert_eq!(s.cell_at(0, 2).unwrap().flavor, Flavor::Empty);
        assert_eq!(s.cell_at(0, 1).unwrap().flavor, Flavor::Sand);
        assert_eq!(s.cell_at(0, 0).unwrap().flavor, Flavor::Sand);
    }

    #[test]
    fn tick_counter_and_report() {
        let mut s = sim("s\n.", 0);
        let report = s.step().unwrap();
        assert_eq!(report, TickReport { tick: 0, moved: 1, ..TickReport::default() });
        assert_eq!(s.tick(), 1);
        let report = s.step().unwrap();
        assert_eq!(report.tick, 1);
        assert_eq!(report.moved, 0);
    }

    #[test]
    fn invalid_params_rejected() {
        let params = Params {
            grow_chance: -0.1,
            ..Params::default()
        };
        assert!(matches!(
            Simulation::blank(2, 2, params, 0),
            Err(SimError::Config(_))
        ));
    }

    #[test]
    fn run_collects_reports() {
        let mut s = sim("...\n...", 0);
        let reports = s.run(5).unwrap();
        assert_eq!(reports.len(), 5);
        assert_eq!(reports[4].tick, 4);
        assert_eq!(s.tick(), 5);
    }

    #[test]
    fn painting_out_of_bounds_fails() {
        let mut s = sim("..", 0);
        assert!(matches!(s.paint(2, 0, Flavor::Sand), Err(GridError::OutOfBounds { .. })));
        assert_eq!(board::encode(s.grid()), "..\n");
    }
}
