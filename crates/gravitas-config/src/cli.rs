//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Gravitas command-line arguments.
///
/// Values given here override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "gravitas", about = "Variable-gravity field simulation")]
pub struct CliArgs {
    /// Gravitational constant.
    #[arg(long)]
    pub gravitational_constant: Option<f32>,

    /// Maximum magnitude of the summed force.
    #[arg(long)]
    pub max_force: Option<f32>,

    /// Number of trajectory steps to predict.
    #[arg(long)]
    pub steps: Option<usize>,

    /// Seconds per trajectory step.
    #[arg(long)]
    pub time_step: Option<f32>,

    /// Mass of the predicted body (may be negative).
    #[arg(long, allow_negative_numbers = true)]
    pub mass: Option<f32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides the platform default).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Baked gravity map (RON) to place in the scene.
    #[arg(long)]
    pub map: Option<PathBuf>,
}

impl Config {
    /// Applies CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(g) = args.gravitational_constant {
            self.field.gravitational_constant = g;
        }
        if let Some(max) = args.max_force {
            self.field.max_force = max;
        }
        if let Some(steps) = args.steps {
            self.predictor.max_steps = steps;
        }
        if let Some(dt) = args.time_step {
            self.predictor.time_step = dt;
        }
        if let Some(mass) = args.mass {
            self.predictor.mass = mass;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            gravitational_constant: Some(1.0),
            steps: Some(250),
            log_level: Some("debug".to_string()),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.field.gravitational_constant, 1.0);
        assert_eq!(config.predictor.max_steps, 250);
        assert_eq!(config.debug.log_level, "debug");
        // Non-overridden fields keep their defaults
        assert_eq!(config.field.max_force, 100_000.0);
        assert_eq!(config.predictor.time_step, 0.1);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::try_parse_from([
            "gravitas",
            "--max-force",
            "50",
            "--mass",
            "-2.5",
            "--time-step",
            "0.02",
            "--map",
            "planet.ron",
        ])
        .unwrap();
        assert_eq!(args.max_force, Some(50.0));
        assert_eq!(args.mass, Some(-2.5));
        assert_eq!(args.time_step, Some(0.02));
        assert_eq!(args.map, Some(PathBuf::from("planet.ron")));
        assert_eq!(args.steps, None);
    }

    #[test]
    fn test_parse_rejects_unknown_flag() {
        assert!(CliArgs::try_parse_from(["gravitas", "--width", "10"]).is_err());
    }
}
