use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use locosim_bench::report;
use locosim_bench::runner::BenchmarkRunner;
use locosim_bench::scenes;

fn usage() {
    eprintln!("Usage: bench-runner [OPTIONS]");
    eprintln!("  --baseline <path>              Load baseline JSON for comparison");
    eprintln!("  --output <path>                Save current results as JSON baseline");
    eprintln!("  --regression-threshold <pct>   Regression threshold percentage (default: 10)");
    eprintln!("  --ticks <n>                    Ticks per scene (default: 120)");
    eprintln!("  --scene <name>                 Run only the named scene");
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i) {
        Some(v) => v,
        None => {
            eprintln!("Missing value for {flag}");
            process::exit(1);
        }
    }
}

fn parse<T: FromStr>(raw: &str, flag: &str) -> T {
    match raw.parse() {
        Ok(v) => v,
        Err(_) => {
            eprintln!("Invalid {flag} value: {raw}");
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut baseline_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut regression_threshold = 10.0f64;
    let mut tick_count = 120u32;
    let mut only_scene: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--baseline" => {
                i += 1;
                baseline_path = Some(PathBuf::from(value(&args, i, flag)));
            }
            "--output" => {
                i += 1;
                output_path = Some(PathBuf::from(value(&args, i, flag)));
            }
            "--regression-threshold" => {
                i += 1;
                regression_threshold = parse(value(&args, i, flag), flag);
            }
            "--ticks" => {
                i += 1;
                tick_count = parse(value(&args, i, flag), flag);
            }
            "--scene" => {
                i += 1;
                only_scene = Some(value(&args, i, flag).to_string());
            }
            "--help" | "-h" => {
                usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    log::info!("Loading built-in objects...");
    let runner = match BenchmarkRunner::new(tick_count) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("ERROR: {e}");
            process::exit(1);
        }
    };

    let scene_configs: Vec<_> = scenes::standard_scenes()
        .into_iter()
        .filter(|s| only_scene.as_deref().map_or(true, |name| s.name == name))
        .collect();
    if scene_configs.is_empty() {
        eprintln!("No scene matches {:?}", only_scene.unwrap_or_default());
        process::exit(1);
    }

    let results: Vec<_> = scene_configs.iter().map(|c| runner.run_scene(c)).collect();

    println!("\n## Benchmark Results\n");
    println!("{}", report::format_markdown(&results));

    if let Some(ref path) = output_path {
        let baseline = report::Baseline {
            timestamp: run_timestamp(),
            results: results.clone(),
        };
        match report::save_baseline(path, &baseline) {
            Ok(()) => log::info!("Saved baseline to {}", path.display()),
            Err(e) => {
                eprintln!("ERROR: failed to save baseline {}: {e}", path.display());
                process::exit(1);
            }
        }
    }

    if let Some(ref path) = baseline_path {
        if let Some(baseline) = report::load_baseline(path) {
            let regressions = report::compare(&results, &baseline, regression_threshold);
            println!(
                "{}",
                report::format_comparison(&regressions, regression_threshold)
            );
            if !regressions.is_empty() {
                eprintln!(
                    "ERROR: {} regressions detected, exiting with code 1",
                    regressions.len()
                );
                process::exit(1);
            }
        } else {
            log::warn!("Baseline file not found: {}", path.display());
        }
    }

    log::info!("Benchmark complete.");
}

/// Seconds since the epoch, tagged so baselines sort by run.
fn run_timestamp() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("bench-{secs}")
}
