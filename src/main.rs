use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use sandsim::{Params, Simulation, render};

#[derive(Parser, Debug)]
#[command(name = "sandsim", version, about = "Run a falling-sand simulation")]
struct Cli {
    /// Board text file to start from. Overrides --width/--height.
    #[arg(long)]
    board: Option<PathBuf>,
    #[arg(long, default_value_t = 64)]
    width: usize,
    #[arg(long, default_value_t = 64)]
    height: usize,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value_t = 100)]
    ticks: u64,
    /// JSON file with rule parameters; missing keys keep their defaults.
    #[arg(long)]
    params: Option<PathBuf>,
    /// Directory for PNG output.
    #[arg(long, default_value = "artifacts")]
    out: PathBuf,
    /// Save a frame every N ticks (0 = final frame only).
    #[arg(long, default_value_t = 0)]
    frame_every: u64,
    /// Pixels per cell in saved PNGs.
    #[arg(long, default_value_t = 4)]
    scale: usize,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_params(path: Option<&Path>) -> Result<Params> {
    let Some(path) = path else {
        return Ok(Params::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read params {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid params {}", path.display()))
}

fn save_frame(sim: &Simulation, out_dir: &Path, name: &str, scale: usize) -> Result<()> {
    let (w, h) = (sim.width(), sim.height());
    let rgba = render::upscale_nearest(&render::render_grid(sim.grid()), w, h, scale);
    let path = out_dir.join(name);
    image::save_buffer(
        &path,
        &rgba,
        (w * scale) as u32,
        (h * scale) as u32,
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("failed to save {}", path.display()))?;
    info!(path = %path.display(), "saved frame");
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let params = load_params(cli.params.as_deref())?;
    let scale = cli.scale.max(1);

    let mut sim = match &cli.board {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read board {}", path.display()))?;
            Simulation::from_board(&text, params, cli.seed)?
        }
        None => Simulation::blank(cli.width, cli.height, params, cli.seed)?,
    };

    std::fs::create_dir_all(&cli.out)
        .with_context(|| format!("failed to create {}", cli.out.display()))?;

    info!(
        width = sim.width(),
        height = sim.height(),
        seed = cli.seed,
        ticks = cli.ticks,
        "starting simulation"
    );

    if cli.frame_every > 0 {
        save_frame(&sim, &cli.out, "frame_00000.png", scale)?;
        let mut done = 0;
        while done < cli.ticks {
            let n = cli.frame_every.min(cli.ticks - done);
            sim.run(n)?;
            done += n;
            save_frame(&sim, &cli.out, &format!("frame_{done:05}.png"), scale)?;
        }
    } else {
        let (outcome, timings) = sandsim::simulate(&mut sim, cli.ticks)?;
        for t in &timings {
            info!(phase = t.name, ms = t.ms, "timing");
        }
        let expired: usize = outcome.reports.iter().map(|r| r.expired).sum();
        info!(expired, "run complete");
        save_frame(&sim, &cli.out, "final.png", scale)?;
    }

    print!("{}", sim.grid());
    Ok(())
}
