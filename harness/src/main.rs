use std::env;
use std::process::ExitCode;
use std::time::Instant;

use cds_engine::{Config, EngineError, Simulation, SimulationMode, Strategy};
use tracing::info;

/// Parsed positional arguments for the benchmark harness CLI (§6):
/// `dimensions alg winSize numParticles numTimesteps seed`.
struct Args {
    dimensions: i64,
    alg: i64,
    win_size: f64,
    num_particles: usize,
    num_timesteps: i64,
    seed: u64,
}

fn parse_args(raw: &[String]) -> Result<Args, String> {
    if raw.len() != 6 {
        return Err(format!(
            "usage: harness <dimensions> <alg> <winSize> <numParticles> <numTimesteps> <seed>, got {} arguments",
            raw.len()
        ));
    }

    let dimensions: i64 = raw[0].parse().map_err(|_| format!("invalid dimensions: {}", raw[0]))?;
    let alg: i64 = raw[1].parse().map_err(|_| format!("invalid alg: {}", raw[1]))?;
    let win_size: f64 = raw[2].parse().map_err(|_| format!("invalid winSize: {}", raw[2]))?;
    let num_particles: usize =
        raw[3].parse().map_err(|_| format!("invalid numParticles: {}", raw[3]))?;
    let num_timesteps: i64 =
        raw[4].parse().map_err(|_| format!("invalid numTimesteps: {}", raw[4]))?;
    let seed: u64 = raw[5].parse().map_err(|_| format!("invalid seed: {}", raw[5]))?;

    if dimensions != 2 && dimensions != 3 {
        return Err(EngineError::InvalidDimensions(dimensions).to_string());
    }
    if Strategy::from_alg_id(alg).is_none() {
        return Err(EngineError::InvalidStrategy(alg).to_string());
    }

    Ok(Args { dimensions, alg, win_size, num_particles, num_timesteps, seed })
}

fn run(args: Args) -> Result<String, EngineError> {
    let strategy = Strategy::from_alg_id(args.alg).expect("alg already validated");
    let mode = if args.dimensions == 2 {
        SimulationMode::Flat2D { width: args.win_size, height: args.win_size }
    } else {
        SimulationMode::Flat3D { width: args.win_size, height: args.win_size, depth: args.win_size }
    };

    let config = Config {
        seed: args.seed,
        timestep_limit: Some(args.num_timesteps),
        lookahead_timesteps: 0,
        ..Config::default()
    };

    info!(?mode, ?strategy, num_particles = args.num_particles, "starting benchmark run");

    let mut simulation = Simulation::new(mode, strategy, args.num_particles, config)?;

    let start = Instant::now();
    simulation.run();
    let elapsed = start.elapsed().as_secs_f64();

    let line = format!(
        "{}, {}, {}, {}",
        args.num_particles,
        elapsed,
        simulation.checks(),
        simulation.collisions().len()
    );
    info!(%line, "benchmark run complete");

    Ok(line)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let raw: Vec<String> = env::args().skip(1).collect();

    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(line) => {
            println!("{line}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args_rejects_wrong_arity() {
        let err = parse_args(&["2".into(), "0".into()]).unwrap_err();
        assert!(err.contains("usage"));
    }

    #[test]
    fn test_parse_args_rejects_bad_dimensions() {
        let raw = vec!["4".into(), "0".into(), "600".into(), "10".into(), "100".into(), "1".into()];
        let err = parse_args(&raw).unwrap_err();
        assert!(err.contains("dimensions"));
    }

    #[test]
    fn test_parse_args_rejects_bad_alg() {
        let raw = vec!["2".into(), "9".into(), "600".into(), "10".into(), "100".into(), "1".into()];
        let err = parse_args(&raw).unwrap_err();
        assert!(err.contains("strategy"));
    }

    #[test]
    fn test_parse_args_accepts_valid_input() {
        let raw = vec!["2".into(), "0".into(), "600".into(), "10".into(), "100".into(), "1".into()];
        let args = parse_args(&raw).unwrap();
        assert_eq!(args.dimensions, 2);
        assert_eq!(args.alg, 0);
        assert_eq!(args.num_particles, 10);
        assert_eq!(args.num_timesteps, 100);
        assert_eq!(args.seed, 1);
    }

    #[test]
    fn test_run_produces_four_field_line() {
        let raw = vec!["2".into(), "0".into(), "600".into(), "10".into(), "50".into(), "1".into()];
        let args = parse_args(&raw).unwrap();
        let line = run(args).unwrap();
        let fields: Vec<&str> = line.split(", ").collect();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0], "10");
    }
}
