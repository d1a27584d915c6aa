//! CLI command definitions.
//!
//! This module defines the command structure for the score-helm CLI.

use clap::{Parser, Subcommand};

pub mod run;

/// score-helm - Score to Helm translator
#[derive(Parser)]
#[command(name = "score-helm")]
#[command(version, about = "SCORE to Helm translator")]
#[command(long_about = r#"
SCORE is a specification for defining environment agnostic configuration for cloud based workloads.
This tool produces Helm chart values from the SCORE specification.

COMMANDS:
  run   → Translate a SCORE file into a Helm values file

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments or missing input
  3 - Validation failure
  4 - Conversion error

Complete documentation is available at https://score.dev.
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable diagnostic messages (written to STDERR)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate SCORE file into Helm values file
    Run(run::RunArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_defaults() {
        let cli = Cli::try_parse_from(["score-helm", "run"]).unwrap();
        assert!(!cli.verbose);

        let Commands::Run(args) = cli.command;
        assert_eq!(args.file, std::path::PathBuf::from(run::SCORE_FILE_DEFAULT));
        assert_eq!(
            args.overrides,
            std::path::PathBuf::from(run::OVERRIDES_FILE_DEFAULT)
        );
        assert!(args.values.is_none());
        assert!(args.output.is_none());
        assert!(args.properties.is_empty());
        assert!(!args.skip_validation);
    }

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "score-helm",
            "run",
            "-f",
            "app.yaml",
            "--values",
            "vals.yaml",
            "-o",
            "out.yaml",
            "-p",
            "metadata.name=other",
            "--property",
            "containers.main.command",
            "--skip-validation",
            "--verbose",
        ])
        .unwrap();
        assert!(cli.verbose);

        let Commands::Run(args) = cli.command;
        assert_eq!(args.file, std::path::PathBuf::from("app.yaml"));
        assert_eq!(args.values, Some(std::path::PathBuf::from("vals.yaml")));
        assert_eq!(args.output, Some(std::path::PathBuf::from("out.yaml")));
        assert_eq!(
            args.properties,
            vec!["metadata.name=other", "containers.main.command"]
        );
        assert!(args.skip_validation);
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Cli::try_parse_from(["score-helm", "deploy"]).is_err());
    }
}
