use crate::config::Params;
use crate::error::GridError;
use crate::grid::{Direction, Grid, Neighbors};
use crate::particle::{Cell, Flavor};
use crate::rng::Rng;
use crate::sim::TickReport;

/// Order in which plants try to grow. Down is never a growth direction.
const GROW_ORDER: [Direction; 3] = [Direction::Up, Direction::Left, Direction::Right];
const BURN_ORDER: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];
const EMIT_ORDER: [Direction; 4] = [
    Direction::Down,
    Direction::Left,
    Direction::Right,
    Direction::Up,
];

/// Everything a rule may consult besides the grid itself.
pub struct RuleCtx<'a> {
    pub params: &'a Params,
    pub rng: &'a mut Rng,
    pub tick: u64,
    pub report: &'a mut TickReport,
}

/// Run the behavior of whatever currently occupies `pos`.
pub fn act(grid: &mut Grid<Cell>, pos: (usize, usize), ctx: &mut RuleCtx) -> Result<(), GridError> {
    let cell = grid.get(pos.0, pos.1);
    let n = grid.neighbors(pos.0, pos.1);

    match cell.flavor {
        Flavor::Empty | Flavor::Barrier => {}
        Flavor::Sand => {
            fall(grid, pos, &n, ctx)?;
        }
        Flavor::Water => {
            if fall(grid, pos, &n, ctx)?.is_none() {
                flow(grid, pos, &n, ctx)?;
            }
        }
        Flavor::Plant => {
            let at = match fall(grid, pos, &n, ctx)? {
                Some(to) => to,
                None => {
                    grow(grid, &n, ctx)?;
                    pos
                }
            };
            decay(grid, at, ctx);
        }
        Flavor::Flower => decay(grid, pos, ctx),
        Flavor::Fire => {
            burn(grid, &n, ctx);
            decay(grid, pos, ctx);
        }
        Flavor::Fountain => emit(grid, &n, ctx)?,
    }
    Ok(())
}

/// Drop into an Empty cell below. Returns the new position if the particle moved.
pub fn fall(
    grid: &mut Grid<Cell>,
    pos: (usize, usize),
    n: &Neighbors,
    ctx: &mut RuleCtx,
) -> Result<Option<(usize, usize)>, GridError> {
    let Some(below) = n.down.empty_pos() else {
        return Ok(None);
    };
    grid.move_into(pos, below)?;
    ctx.report.moved += 1;
    Ok(Some(below))
}

/// Lateral drift: one three-way draw per call, even when the target is blocked.
pub fn flow(
    grid: &mut Grid<Cell>,
    pos: (usize, usize),
    n: &Neighbors,
    ctx: &mut RuleCtx,
) -> Result<Option<(usize, usize)>, GridError> {
    let side = match ctx.rng.range_usize(3) {
        0 => n.left,
        1 => n.right,
        _ => return Ok(None),
    };
    let Some(to) = side.empty_pos() else {
        return Ok(None);
    };
    grid.move_into(pos, to)?;
    ctx.report.moved += 1;
    Ok(Some(to))
}

/// Spawn at most one new plant, trying Up, Left, Right in turn.
pub fn grow(grid: &mut Grid<Cell>, n: &Neighbors, ctx: &mut RuleCtx) -> Result<bool, GridError> {
    for dir in GROW_ORDER {
        if !ctx.rng.chance(ctx.params.grow_chance) {
            continue;
        }
        if let Some(target) = n.get(dir).empty_pos() {
            grid.spawn(target, Flavor::Plant)?;
            ctx.report.spawned += 1;
            return Ok(true);
        }
    }
    Ok(false)
}

/// Independently ignite each flammable neighbor.
pub fn burn(grid: &mut Grid<Cell>, n: &Neighbors, ctx: &mut RuleCtx) {
    for dir in BURN_ORDER {
        let side = n.get(dir);
        let Some(target) = side.pos() else {
            continue;
        };
        if side.flavor().is_flammable() && ctx.rng.chance(ctx.params.ignite_chance) {
            grid.convert(target, Flavor::Fire);
            ctx.report.ignited += 1;
        }
    }
}

/// Count down a mortal particle; it becomes Empty when the counter hits zero.
pub fn decay(grid: &mut Grid<Cell>, pos: (usize, usize), ctx: &mut RuleCtx) {
    let mut cell = grid.get(pos.0, pos.1);
    if cell.decay < 0 {
        return;
    }
    cell.decay -= 1;
    if cell.decay <= 0 {
        grid.convert(pos, Flavor::Empty);
        ctx.report.expired += 1;
    } else {
        grid.set(pos.0, pos.1, cell);
    }
}

/// Fountains drop water into one random Empty neighbor every `fountain_interval` ticks.
pub fn emit(grid: &mut Grid<Cell>, n: &Neighbors, ctx: &mut RuleCtx) -> Result<(), GridError> {
    if ctx.tick % ctx.params.fountain_interval != 0 {
        return Ok(());
    }
    let mut open = [(0usize, 0usize); 4];
    let mut count = 0;
    for dir in EMIT_ORDER {
        if let Some(pos) = n.get(dir).empty_pos() {
            open[count] = pos;
            count += 1;
        }
    }
    if count == 0 {
        return Ok(());
    }
    let target = open[ctx.rng.range_usize(count)];
    grid.spawn(target, Flavor::Water)?;
    ctx.report.spawned += 1;
    Ok(())
}
