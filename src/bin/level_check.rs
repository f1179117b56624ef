//! Offline validation of game config, level registry and input bindings.
//!
//! Example:
//!   cargo run --bin level_check -- --config assets/config/game.ron --levels assets/levels
//!
//! Exits non-zero when a file cannot be used at all; warnings only fail with `--strict`.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use rocket_lander::core::components::SurfaceTag;
use rocket_lander::core::config::GameConfig;
use rocket_lander::core::level::embedded_levels::{
    DiskLevelSource, EmbeddedLevelSource, LevelSource,
};
use rocket_lander::core::level::LevelRegistry;
use rocket_lander::interaction::inputmap::parse::parse_input_toml;

#[derive(Parser, Debug)]
#[command(author, version, about = "Validate rocket lander config and levels", long_about = None)]
struct Args {
    #[arg(long, default_value = "assets/config/game.ron")]
    config: PathBuf,
    /// Directory holding registry.ron and the layouts it lists.
    #[arg(long, default_value = "assets/levels")]
    levels: PathBuf,
    #[arg(long, default_value = "assets/config/input.toml")]
    input: PathBuf,
    /// Check the copies compiled into the binary instead of `--levels`.
    #[arg(long)]
    embedded: bool,
    /// Treat warnings as failures.
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut warnings = Vec::new();

    let cfg = GameConfig::load_from_file(&args.config)
        .map_err(|e| anyhow::anyhow!(e))
        .with_context(|| format!("load config {}", args.config.display()))?;
    warnings.extend(cfg.validate().into_iter().map(|w| format!("config: {w}")));
    println!("config ok: {}", args.config.display());

    let source: Box<dyn LevelSource> = if args.embedded {
        Box::new(EmbeddedLevelSource)
    } else {
        Box::new(DiskLevelSource::new(&args.levels))
    };
    let (registry, level_warnings) = LevelRegistry::load(source.as_ref())
        .map_err(|e| anyhow::anyhow!(e))
        .with_context(|| format!("load levels ({:?})", source.mode()))?;
    warnings.extend(level_warnings.into_iter().map(|w| format!("levels: {w}")));
    for (i, level) in registry.levels.iter().enumerate() {
        println!(
            "level {i}: {} '{}' blocks={} finish={} friendly={}",
            level.id,
            level.layout.name,
            level.layout.blocks.len(),
            level.layout.count_tag(SurfaceTag::Finish),
            level.layout.count_tag(SurfaceTag::Friendly)
        );
    }
    if cfg.start_level >= registry.len() {
        warnings.push(format!(
            "config: start_level {} out of range ({} levels)",
            cfg.start_level,
            registry.len()
        ));
    }

    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("read input bindings {}", args.input.display()))?;
    let parsed = parse_input_toml(&raw, true);
    warnings.extend(parsed.errors.into_iter().map(|e| format!("input: {e}")));
    println!(
        "input ok: {} actions, {} bindings",
        parsed.input_map.actions.len(),
        parsed.input_map.bindings.len()
    );

    for w in &warnings {
        eprintln!("warning: {w}");
    }
    if args.strict && !warnings.is_empty() {
        bail!("{} warning(s) with --strict", warnings.len());
    }
    Ok(())
}
