use std::time::Instant;

use locosim_core::config::SimConfig;
use locosim_core::objects::ObjectTable;
use locosim_objects::LoadError;
use locosim_sim::Simulation;

use crate::scenes::{self, SceneConfig};

/// Timing data for a single benchmark run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    /// Work items that took effect over the whole run.
    pub items_applied: u64,
    /// Highest number of live effects seen after a tick.
    pub peak_effects: u32,
    pub tick_count: u32,
    pub timings: TimingSeries,
}

/// Runs scenes against a headless simulation.
pub struct BenchmarkRunner {
    objects: ObjectTable,
    config: SimConfig,
    tick_count: u32,
}

impl BenchmarkRunner {
    /// Load the built-in object pack and config.
    pub fn new(tick_count: u32) -> Result<Self, LoadError> {
        let objects = locosim_objects::load_builtin_objects()?;
        let config = locosim_objects::load_builtin_config()?;
        Ok(Self::with_objects(objects, config, tick_count))
    }

    pub fn with_objects(objects: ObjectTable, config: SimConfig, tick_count: u32) -> Self {
        Self {
            objects,
            config,
            tick_count,
        }
    }

    /// Run a single benchmark scene and return timing results.
    pub fn run_scene(&self, config: &SceneConfig) -> BenchmarkResult {
        log::info!(
            "Running scene '{}' ({:?}, {} items per tick)...",
            config.name,
            config.kind,
            config.intensity
        );

        let mut sim = Simulation::headless(self.config.clone(), Box::new(self.objects.clone()));
        let mut state = scenes::populate(&mut sim, config);

        let mut frame_times = Vec::with_capacity(self.tick_count as usize);
        let mut items_applied = 0u64;
        let mut peak_effects = 0u32;

        for tick in 0..self.tick_count {
            let frame_start = Instant::now();
            items_applied += scenes::step(&mut sim, config, &mut state, tick) as u64;
            sim.tick();
            let elapsed = frame_start.elapsed().as_secs_f64() * 1000.0;
            frame_times.push(elapsed);
            peak_effects = peak_effects.max(sim.effect_count() as u32);
        }

        if let Err(e) = sim.entities.validate_lists() {
            log::error!("Scene '{}' left corrupt entity lists: {e}", config.name);
        }

        let timings = compute_timings(&frame_times);
        log::info!(
            "  Done: mean={:.3}ms, p95={:.3}ms, p99={:.3}ms, peak effects={}",
            timings.mean_ms,
            timings.p95_ms,
            timings.p99_ms,
            peak_effects
        );

        BenchmarkResult {
            scene_name: config.name.to_string(),
            items_applied,
            peak_effects,
            tick_count: self.tick_count,
            timings,
        }
    }
}

pub(crate) fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;
    let p99_idx = ((n as f64) * 0.99).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        p99_ms: sorted[p99_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}
