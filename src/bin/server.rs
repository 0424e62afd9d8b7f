use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use base64::Engine;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{info, warn};

use sandsim::{Flavor, Params, Simulation, TickReport, render};

/// Keeps a single request from pinning a blocking thread indefinitely.
const MAX_TICKS: u64 = 10_000;
const MAX_CELLS: usize = 1_000_000;
const MAX_SCALE: usize = 16;

#[derive(Deserialize)]
struct Paint {
    x: i64,
    y: i64,
    flavor: Flavor,
}

#[derive(Deserialize)]
struct SimulateRequest {
    board: String,
    seed: Option<u64>,
    ticks: Option<u64>,
    scale: Option<usize>,
    #[serde(default)]
    paints: Vec<Paint>,
    grow_chance: Option<f64>,
    ignite_chance: Option<f64>,
    fountain_interval: Option<u64>,
}

#[derive(Serialize)]
struct SimulateResponse {
    board: String,
    width: usize,
    height: usize,
    tick: u64,
    data_url: String,
    reports: Vec<TickReport>,
    timings: Vec<TimingEntry>,
}

#[derive(Serialize)]
struct TimingEntry {
    name: String,
    ms: f64,
}

type ApiError = (StatusCode, String);

fn bad_request(err: impl std::fmt::Display) -> ApiError {
    (StatusCode::BAD_REQUEST, err.to_string())
}

fn encode_png(rgba: &[u8], w: usize, h: usize) -> Result<String, ApiError> {
    let mut buf = Vec::new();
    let encoder = PngEncoder::new(&mut buf);
    encoder
        .write_image(rgba, w as u32, h as u32, image::ExtendedColorType::Rgba8)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let b64 = base64::engine::general_purpose::STANDARD.encode(&buf);
    Ok(format!("data:image/png;base64,{}", b64))
}

fn run_request(req: SimulateRequest) -> Result<SimulateResponse, ApiError> {
    let defaults = Params::default();
    let params = Params {
        grow_chance: req.grow_chance.unwrap_or(defaults.grow_chance),
        ignite_chance: req.ignite_chance.unwrap_or(defaults.ignite_chance),
        fountain_interval: req.fountain_interval.unwrap_or(defaults.fountain_interval),
    };
    let seed = req.seed.unwrap_or(42);
    let ticks = req.ticks.unwrap_or(1).min(MAX_TICKS);
    let scale = req.scale.unwrap_or(4).clamp(1, MAX_SCALE);

    let mut sim = Simulation::from_board(&req.board, params, seed).map_err(bad_request)?;
    if sim.width() * sim.height() > MAX_CELLS {
        return Err(bad_request(format!(
            "board has {} cells, limit is {}",
            sim.width() * sim.height(),
            MAX_CELLS
        )));
    }
    for p in &req.paints {
        sim.paint(p.x, p.y, p.flavor).map_err(bad_request)?;
    }

    let (outcome, timings) = sandsim::simulate(&mut sim, ticks)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let (w, h) = (sim.width(), sim.height());
    let scaled = render::upscale_nearest(&outcome.rgba, w, h, scale);
    let data_url = encode_png(&scaled, w * scale, h * scale)?;

    Ok(SimulateResponse {
        board: sim.grid().to_string(),
        width: w,
        height: h,
        tick: sim.tick(),
        data_url,
        reports: outcome.reports,
        timings: timings
            .iter()
            .map(|t| TimingEntry {
                name: t.name.to_string(),
                ms: t.ms,
            })
            .collect(),
    })
}

async fn simulate_handler(
    Json(req): Json<SimulateRequest>,
) -> Result<Json<SimulateResponse>, ApiError> {
    let response = tokio::task::spawn_blocking(move || run_request(req))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    match response {
        Ok(body) => {
            info!(tick = body.tick, width = body.width, height = body.height, "simulated");
            Ok(Json(body))
        }
        Err(err) => {
            warn!(status = %err.0, message = %err.1, "simulate request rejected");
            Err(err)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let frontend = ServeDir::new("frontend");

    let app = Router::new()
        .route("/api/simulate", post(simulate_handler))
        .fallback_service(frontend)
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("sandsim server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
