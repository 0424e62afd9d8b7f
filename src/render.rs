use rayon::prelude::*;

use crate::grid::Grid;
use crate::particle::{Cell, FIRE_LIFESPAN, FLOWER_LIFESPAN, Flavor, PLANT_LIFESPAN};

const EMBER: [u8; 4] = [90, 20, 0, 255];
const WITHERED: [u8; 4] = [70, 60, 30, 255];

/// Aging plants and flowers fade at most this far toward `WITHERED`.
const MAX_WITHER: f32 = 0.5;

#[inline]
fn lerp_color(a: [u8; 4], b: [u8; 4], t: f32) -> [u8; 4] {
    let t = t.clamp(0.0, 1.0);
    [
        (a[0] as f32 + (b[0] as f32 - a[0] as f32) * t).round() as u8,
        (a[1] as f32 + (b[1] as f32 - a[1] as f32) * t).round() as u8,
        (a[2] as f32 + (b[2] as f32 - a[2] as f32) * t).round() as u8,
        255,
    ]
}

#[inline]
fn life_left(cell: Cell, lifespan: i32) -> f32 {
    cell.decay.max(0) as f32 / lifespan as f32
}

/// Display color of a single cell. Fresh particles use the flavor's base color.
pub fn cell_color(cell: Cell) -> [u8; 4] {
    let base = cell.flavor.color();
    match cell.flavor {
        Flavor::Fire => lerp_color(EMBER, base, life_left(cell, FIRE_LIFESPAN)),
        Flavor::Plant => lerp_color(
            base,
            WITHERED,
            (1.0 - life_left(cell, PLANT_LIFESPAN)) * MAX_WITHER,
        ),
        Flavor::Flower => lerp_color(
            base,
            WITHERED,
            (1.0 - life_left(cell, FLOWER_LIFESPAN)) * MAX_WITHER,
        ),
        _ => base,
    }
}

/// RGBA buffer, one pixel per cell, top row first.
pub fn render_grid(grid: &Grid<Cell>) -> Vec<u8> {
    let w = grid.w;
    let h = grid.h;
    let mut rgba = vec![0u8; w * h * 4];
    if rgba.is_empty() {
        return rgba;
    }

    rgba.par_chunks_mut(w * 4).enumerate().for_each(|(row, out)| {
        let y = h - 1 - row;
        for x in 0..w {
            out[x * 4..x * 4 + 4].copy_from_slice(&cell_color(grid.get(x, y)));
        }
    });

    rgba
}

/// Nearest-neighbor upscale of an RGBA buffer so single cells stay visible.
pub fn upscale_nearest(rgba: &[u8], w: usize, h: usize, scale: usize) -> Vec<u8> {
    let dw = w * scale;
    let dh = h * scale;
    let mut dst = vec![0u8; dw * dh * 4];
    if dst.is_empty() {
        return dst;
    }

    dst.par_chunks_mut(dw * 4).enumerate().for_each(|(dy, row)| {
        let sy = dy / scale;
        for dx in 0..dw {
            let sx = dx / scale;
            let src = (sy * w + sx) * 4;
            row[dx * 4..dx * 4 + 4].copy_from_slice(&rgba[src..src + 4]);
        }
    });

    dst
}
