//! Command-line interface for the wayfinder utility
//!
//! Routes between waypoints and gives map editors a way to inspect, check
//! and replace the stored graphs.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::debug;

use crate::display::{format_report, format_route, format_waypoints};
use wayfinder::core::logging::init_logging;
use wayfinder::editor::{check_graph, validate_graph_name};
use wayfinder::{Graph, LoadStatus, Navigator, NavigatorConfig, RouteResponse};

/// Wayfinder - Shortest routes across campus and building maps
#[derive(Parser)]
#[command(name = "wayfinder")]
#[command(about = "Find routes between campus waypoints and manage waypoint graphs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the graph documents
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find the shortest route between two waypoints
    Route {
        /// Starting waypoint id
        #[arg(short, long)]
        start: Option<String>,

        /// Destination waypoint id
        #[arg(short, long)]
        end: Option<String>,

        /// Print the JSON payload instead of a summary
        #[arg(long)]
        json: bool,

        /// When to use colors in output
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,
    },

    /// List the routed graphs
    Graphs {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print a graph document
    Show {
        /// Graph name (e.g. campus, building_A)
        #[arg(short, long, default_value = "campus")]
        graph: String,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the waypoints of a graph
    Waypoints {
        /// Graph name (e.g. campus, building_A)
        #[arg(short, long, default_value = "campus")]
        graph: String,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Replace a graph with a document read from a file or stdin
    Save {
        /// Graph name (e.g. campus, building_A)
        #[arg(short, long)]
        graph: String,

        /// Input file containing the graph document (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Report dangling, one-way and negative-weight edges
    Check {
        /// Graph to check; all routed graphs when omitted
        #[arg(short, long)]
        graph: Option<String>,

        /// Show in JSON format
        #[arg(long)]
        json: bool,

        /// When to use colors in output
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,
    },
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if stdout is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Serialize)]
struct GraphSummary {
    name: String,
    nodes: usize,
    edges: usize,
    status: &'static str,
}

fn status_label(status: LoadStatus) -> &'static str {
    match status {
        LoadStatus::Existing => "loaded",
        LoadStatus::Created => "created",
        LoadStatus::Recovered => "recovered",
    }
}

/// Main CLI application
#[derive(Default)]
pub struct WayfinderApp {
    navigator: Option<Navigator>,
}

impl WayfinderApp {
    /// Create a new application instance; graphs are opened on first use
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve configuration: defaults, then file, then environment, then flags
    pub fn build_config(cli: &Cli) -> Result<NavigatorConfig> {
        let config = match &cli.config {
            Some(path) => NavigatorConfig::from_file(path)?,
            None => NavigatorConfig::default(),
        };
        let mut config = config.with_env();
        if let Some(dir) = &cli.data_dir {
            config.data_dir = dir.clone();
        }
        Ok(config)
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over the flag defaults
        let log_level_str = std::env::var("WAYFINDER_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("WAYFINDER_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        let config = Self::build_config(&cli)?;
        if cli.verbose {
            eprintln!("Wayfinder v{}", env!("CARGO_PKG_VERSION"));
            eprintln!("Data directory: {}", config.data_dir.display());
        }
        self.navigator = Some(
            Navigator::open(config).context("Failed to open graph data")?,
        );

        match cli.command {
            Commands::Route {
                start,
                end,
                json,
                color,
            } => self.route_command(start.as_deref(), end.as_deref(), json, color),
            Commands::Graphs { json } => self.graphs_command(json),
            Commands::Show { graph, output } => self.show_command(&graph, output),
            Commands::Waypoints { graph, json } => self.waypoints_command(&graph, json),
            Commands::Save { graph, input } => self.save_command(&graph, input, cli.verbose),
            Commands::Check { graph, json, color } => {
                self.check_command(graph.as_deref(), json, color)
            }
        }
    }

    fn navigator(&self) -> Result<&Navigator> {
        self.navigator
            .as_ref()
            .ok_or_else(|| anyhow!("Graph data not opened"))
    }

    fn navigator_mut(&mut self) -> Result<&mut Navigator> {
        self.navigator
            .as_mut()
            .ok_or_else(|| anyhow!("Graph data not opened"))
    }

    /// Handle the route command
    fn route_command(
        &self,
        start: Option<&str>,
        end: Option<&str>,
        json: bool,
        color: ColorChoice,
    ) -> Result<()> {
        let response = self.navigator()?.answer(start, end);
        debug!(status = response.status_code(), "Route query answered");

        if json {
            println!("{}", serde_json::to_string_pretty(&response)?);
        } else if let RouteResponse::Found(route) = &response {
            print!("{}", format_route(route, Self::should_colorize(color)));
        }

        match response {
            RouteResponse::Found(_) => Ok(()),
            RouteResponse::NotFound(payload) | RouteResponse::BadRequest(payload) => {
                Err(anyhow!(payload.error))
            }
        }
    }

    /// Handle the graphs command
    fn graphs_command(&self, json: bool) -> Result<()> {
        let navigator = self.navigator()?;
        let summaries: Vec<GraphSummary> = navigator
            .load_statuses()
            .iter()
            .map(|(name, status)| {
                let graph = navigator.load_graph(name).unwrap_or_default();
                GraphSummary {
                    name: name.clone(),
                    nodes: graph.node_count(),
                    edges: graph.edge_count(),
                    status: status_label(*status),
                }
            })
            .collect();

        if json {
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        } else {
            for summary in &summaries {
                println!(
                    "{:<16} {:>5} nodes {:>6} edges  ({})",
                    summary.name, summary.nodes, summary.edges, summary.status
                );
            }
        }
        Ok(())
    }

    /// Handle the show command
    fn show_command(&self, graph: &str, output: Option<PathBuf>) -> Result<()> {
        let graph = self.navigator()?.load_graph(graph)?;
        let document = serde_json::to_string_pretty(&graph)?;
        self.write_output(output, &document)
    }

    /// Handle the waypoints command
    fn waypoints_command(&self, graph: &str, json: bool) -> Result<()> {
        let waypoints = self.navigator()?.waypoints(graph)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&waypoints)?);
        } else {
            print!("{}", format_waypoints(&waypoints));
        }
        Ok(())
    }

    /// Handle the save command
    fn save_command(&mut self, graph: &str, input: Option<PathBuf>, verbose: bool) -> Result<()> {
        let name = validate_graph_name(graph)?.to_string();
        let content = self.read_input(input)?;
        let document: Graph =
            serde_json::from_str(&content).context("Input is not a valid graph document")?;

        let report = check_graph(&document);
        if report.has_errors() {
            bail!(
                "Refusing to save '{}': {} edge(s) with negative weight",
                name,
                report.negative_weights.len()
            );
        }
        if verbose && !report.is_clean() {
            eprint!("{}", format_report(&name, &report, false));
        }

        let (nodes, edges) = (document.node_count(), document.edge_count());
        self.navigator_mut()?.save_graph(&name, document)?;
        println!("Saved {} ({} nodes, {} edges)", name, nodes, edges);
        Ok(())
    }

    /// Handle the check command
    fn check_command(&self, graph: Option<&str>, json: bool, color: ColorChoice) -> Result<()> {
        let navigator = self.navigator()?;
        let names = match graph {
            Some(name) => vec![name.to_string()],
            None => navigator.graph_names(),
        };

        let mut reports = Vec::with_capacity(names.len());
        for name in names {
            let report = check_graph(&navigator.load_graph(&name)?);
            reports.push((name, report));
        }

        if json {
            let value: serde_json::Map<String, serde_json::Value> = reports
                .iter()
                .map(|(name, report)| Ok((name.clone(), serde_json::to_value(report)?)))
                .collect::<Result<_>>()?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        } else {
            let color = Self::should_colorize(color);
            for (name, report) in &reports {
                print!("{}", format_report(name, report, color));
            }
        }

        let failing = reports.iter().filter(|(_, r)| r.has_errors()).count();
        if failing > 0 {
            bail!("{} graph(s) have negative edge weights", failing);
        }
        Ok(())
    }

    /// Determine if stdout output should be colorized
    fn should_colorize(color: ColorChoice) -> bool {
        match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                crossterm::tty::IsTty::is_tty(&io::stdout())
            }
        }
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, &content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }

    /// Open graph data directly (for testing)
    #[cfg(test)]
    pub fn open(&mut self, config: NavigatorConfig) -> Result<()> {
        self.navigator = Some(Navigator::open(config)?);
        Ok(())
    }
}
