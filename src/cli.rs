//! CLI argument parsing.
//!
//! The parser accepts any iterator of strings, not just `std::env::args()`,
//! so argument handling is fully testable.

use std::path::PathBuf;

use crate::config::Distribution;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Launch the dashboard.
    Run {
        /// Optional YAML parameter file.
        config_path: Option<PathBuf>,
        /// Optional seed for reproducible shock streams.
        seed: Option<u64>,
        /// Initial shock count override.
        shock_count: Option<u32>,
        /// Initial volatility override.
        volatility: Option<f64>,
        /// Initial distribution override.
        distribution: Option<Distribution>,
    },
    /// Show help.
    Help,
    /// Show version.
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    /// Internal parsing from a vector of strings; `args[0]` is the binary
    /// name.
    fn parse_from_vec(args: &[String]) -> Self {
        let mut config_path = None;
        let mut seed = None;
        let mut shock_count = None;
        let mut volatility = None;
        let mut distribution = None;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-h" | "--help" | "help" => {
                    return Self {
                        command: Command::Help,
                    }
                }
                "-V" | "--version" | "version" => {
                    return Self {
                        command: Command::Version,
                    }
                }
                "--config" => {
                    if let Some(value) = args.get(i + 1) {
                        config_path = Some(PathBuf::from(value));
                        i += 2;
                    } else {
                        eprintln!("Error: '--config' requires a file path");
                        return Self {
                            command: Command::Help,
                        };
                    }
                }
                "--seed" => match args.get(i + 1).and_then(|v| v.parse().ok()) {
                    Some(value) => {
                        seed = Some(value);
                        i += 2;
                    }
                    None => {
                        eprintln!("Error: '--seed' requires an integer");
                        return Self {
                            command: Command::Help,
                        };
                    }
                },
                "--count" => match args.get(i + 1).and_then(|v| v.parse().ok()) {
                    Some(value) => {
                        shock_count = Some(value);
                        i += 2;
                    }
                    None => {
                        eprintln!("Error: '--count' requires an integer");
                        return Self {
                            command: Command::Help,
                        };
                    }
                },
                "--sigma" => match args.get(i + 1).and_then(|v| v.parse().ok()) {
                    Some(value) => {
                        volatility = Some(value);
                        i += 2;
                    }
                    None => {
                        eprintln!("Error: '--sigma' requires a number");
                        return Self {
                            command: Command::Help,
                        };
                    }
                },
                "--dist" => match args.get(i + 1).and_then(|v| Distribution::from_arg(v)) {
                    Some(value) => {
                        distribution = Some(value);
                        i += 2;
                    }
                    None => {
                        eprintln!("Error: '--dist' must be normal, uniform, or bimodal");
                        return Self {
                            command: Command::Help,
                        };
                    }
                },
                unknown => {
                    eprintln!("Unknown argument: {unknown}");
                    return Self {
                        command: Command::Help,
                    };
                }
            }
        }

        Self {
            command: Command::Run {
                config_path,
                seed,
                shock_count,
                volatility,
                distribution,
            },
        }
    }
}

/// Help text printed for `--help` or on a parse error.
pub const HELP: &str = "\
shocksim - antifragile response curves under random shocks

USAGE:
    shocksim [OPTIONS]

OPTIONS:
    --config <FILE>    Load initial parameters from a YAML file
    --seed <N>         Fix the RNG seed for reproducible shock streams
    --count <N>        Initial number of shocks (1-100, default 10)
    --sigma <X>        Initial shock volatility (0.1-3.0, default 1.0)
    --dist <KIND>      Initial distribution: normal, uniform, bimodal
    -h, --help         Print help
    -V, --version      Print version
";
