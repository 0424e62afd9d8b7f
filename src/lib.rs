pub mod board;
pub mod config;
pub mod error;
pub mod grid;
pub mod particle;
pub mod render;
pub mod rng;
pub mod rules;
pub mod sim;

use std::time::Instant;

pub use config::Params;
pub use error::{BoardError, ConfigError, GridError, SimError};
pub use grid::Grid;
pub use particle::{Cell, Flavor};
pub use sim::{Simulation, TickReport};

pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

/// Result of running a simulation for a fixed number of ticks.
pub struct Outcome {
    pub reports: Vec<TickReport>,
    pub rgba: Vec<u8>,
}

/// Advance `sim` by `ticks` ticks and render the final grid.
pub fn simulate(sim: &mut Simulation, ticks: u64) -> Result<(Outcome, Vec<Timing>), GridError> {
    let mut timings = Vec::new();
    let total_start = Instant::now();

    let t = Instant::now();
    let reports = sim.run(ticks)?;
    timings.push(Timing {
        name: "ticks",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    let t = Instant::now();
    let rgba = render::render_grid(sim.grid());
    timings.push(Timing {
        name: "render",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    timings.push(Timing {
        name: "TOTAL",
        ms: total_start.elapsed().as_secs_f64() * 1000.0,
    });

    Ok((Outcome { reports, rgba }, timings))
}
