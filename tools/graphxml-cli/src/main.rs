// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use anyhow::Context;
use clap::{Parser, Subcommand};
use graphxml::{CodecConfig, GraphModel, ModelXmlSerializer};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "graphxml")]
#[command(about = "Validate, normalize and inspect mxGraph model documents")]
#[command(version)]
struct Cli {
    /// Codec settings (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a model document and report problems
    Validate {
        /// Input model XML file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Re-export a model document in canonical form
    Normalize {
        /// Input model XML file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Spaces per nesting level (single line if omitted)
        #[arg(long, value_name = "N")]
        indent: Option<usize>,
    },

    /// Summarize the cells of a model document
    Inspect {
        /// Input model XML file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Serialize, PartialEq)]
struct ModelSummary {
    root: Option<String>,
    cells: usize,
    layers: usize,
    vertices: usize,
    edges: usize,
    max_depth: usize,
}

impl ModelSummary {
    fn of(model: &GraphModel) -> Self {
        let cells = model.cells();
        let mut max_depth = 0;
        let mut depths: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
        for cell in &cells {
            let depth = cell
                .parent
                .as_deref()
                .and_then(|p| depths.get(p))
                .map_or(0, |d| d + 1);
            max_depth = max_depth.max(depth);
            depths.insert(cell.id.as_str(), depth);
        }
        Self {
            root: model.root().map(|c| c.id.clone()),
            cells: cells.len(),
            layers: model.layers().len(),
            vertices: cells.iter().filter(|c| c.vertex).count(),
            edges: cells.iter().filter(|c| c.edge).count(),
            max_depth,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => CodecConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => CodecConfig::default(),
    };

    match cli.command {
        Commands::Validate { input } => cmd_validate(&input, config)?,
        Commands::Normalize {
            input,
            output,
            indent,
        } => {
            let config = match indent {
                Some(n) => config.with_indent(Some(n)),
                None => config,
            };
            cmd_normalize(&input, output.as_deref(), config)?;
        }
        Commands::Inspect { input, json } => cmd_inspect(&input, json, config)?,
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level.to_string()),
    )
    .format_timestamp_millis()
    .try_init();
}

fn load_model(input: &Path, serializer: &ModelXmlSerializer<'_>) -> anyhow::Result<GraphModel> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let mut model = GraphModel::new();
    serializer
        .import(&text, &mut model)
        .with_context(|| format!("Failed to import {}", input.display()))?;
    Ok(model)
}

fn cmd_validate(input: &Path, config: CodecConfig) -> anyhow::Result<()> {
    let serializer = ModelXmlSerializer::with_config(config);
    match load_model(input, &serializer) {
        Ok(model) => {
            let summary = ModelSummary::of(&model);
            println!(
                "[OK] {}: {} cells ({} vertices, {} edges)",
                input.display(),
                summary.cells,
                summary.vertices,
                summary.edges
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("[ERROR] {}: {:#}", input.display(), e);
            anyhow::bail!("Validation failed");
        }
    }
}

fn normalize(input: &Path, config: CodecConfig) -> anyhow::Result<String> {
    let serializer = ModelXmlSerializer::with_config(config);
    let model = load_model(input, &serializer)?;
    let mut text = serializer.export(&model)?;
    text.push('\n');
    Ok(text)
}

fn cmd_normalize(input: &Path, output: Option<&Path>, config: CodecConfig) -> anyhow::Result<()> {
    let text = normalize(input, config)?;
    match output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("[OK] Normalized model written to {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn cmd_inspect(input: &Path, json: bool, config: CodecConfig) -> anyhow::Result<()> {
    let serializer = ModelXmlSerializer::with_config(config);
    let model = load_model(input, &serializer)?;
    let summary = ModelSummary::of(&model);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Model: {}", input.display());
    println!("  root: {}", summary.root.as_deref().unwrap_or("-"));
    println!("  cells: {}", summary.cells);
    println!("  layers: {}", summary.layers);
    println!("  vertices: {}", summary.vertices);
    println!("  edges: {}", summary.edges);
    println!("  max depth: {}", summary.max_depth);
    Ok(())
}
