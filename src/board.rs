//! Plain-text board format: one symbol per cell, top row first.
//!
//! ```text
//! s.s
//! ...
//! bbb
//! ```

use std::fmt;

use crate::error::BoardError;
use crate::grid::Grid;
use crate::particle::{Cell, Flavor};

/// Parse board text. Surrounding whitespace and per-line indentation are ignored.
/// Width comes from the first row, height from the row count.
pub fn decode(text: &str) -> Result<Grid<Cell>, BoardError> {
    let rows: Vec<&str> = text.trim().lines().map(str::trim).collect();
    let Some(first) = rows.first().filter(|r| !r.is_empty()) else {
        return Err(BoardError::Empty);
    };
    let w = first.chars().count();
    let h = rows.len();

    let mut grid = Grid::new(w, h);
    for (row, line) in rows.iter().enumerate() {
        let actual = line.chars().count();
        if actual != w {
            return Err(BoardError::RaggedRow {
                row,
                expected: w,
                actual,
            });
        }
        let y = h - 1 - row;
        for (col, symbol) in line.chars().enumerate() {
            let flavor = Flavor::from_symbol(symbol)
                .ok_or(BoardError::UnknownSymbol { symbol, row, col })?;
            grid.set(col, y, Cell::new(flavor));
        }
    }
    Ok(grid)
}

/// Render `h` newline-terminated rows of `w` symbols, top row first.
pub fn encode(grid: &Grid<Cell>) -> String {
    let mut out = String::with_capacity((grid.w + 1) * grid.h);
    for y in (0..grid.h).rev() {
        for x in 0..grid.w {
            out.push(grid.get(x, y).flavor.symbol());
        }
        out.push('\n');
    }
    out
}

impl fmt::Display for Grid<Cell> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}
