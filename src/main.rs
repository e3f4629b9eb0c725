//! portal-logger - headless replay driver for the portal tracker
//!
//! Plays a JSON script of player states through the tracker module and prints
//! the resulting chat lines and outlines.

mod console;
mod replay;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use console::{ConsoleNotifier, ConsoleRenderer};
use portal_logger_core::SimTick;
use portal_logger_tracker::{
    ModuleRegistry, PortalSettings, PortalTracker, TrackerPaths, MODULE_NAME,
};
use replay::{ReplayScript, ReplayWorld};
use tracing::info;

const DEFAULT_SETTINGS_PATH: &str = "config/portal_logger.toml";

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay a scripted session through the portal tracker", long_about = None)]
struct Args {
    /// JSON replay script
    #[arg(long)]
    script: Option<PathBuf>,

    /// Settings file (TOML); defaults are used when missing
    #[arg(long, default_value = DEFAULT_SETTINGS_PATH)]
    config: PathBuf,

    /// Directory holding the portal catalog and log
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Dispatch a render pass every N ticks (0 disables rendering)
    #[arg(long, default_value_t = 20)]
    render_every: u64,

    /// Write the effective settings to --config and exit
    #[arg(long)]
    write_config: bool,
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let settings = PortalSettings::load_from_path(&args.config);

    if args.write_config {
        settings.save_to_path(&args.config)?;
        println!("Wrote settings to {}", args.config.display());
        return Ok(());
    }

    let Some(script_path) = args.script else {
        anyhow::bail!("--script is required unless --write-config is given");
    };
    let mut script = ReplayScript::from_path(&script_path)?;
    info!(
        script = %script_path.display(),
        last_tick = script.last_tick().0,
        "Starting replay"
    );

    let mut registry = ModuleRegistry::new();
    let handle = registry.register(Box::new(PortalTracker::new(
        settings,
        TrackerPaths::in_dir(&args.data_dir),
    )));
    if let Some(module) = registry.get(handle) {
        info!(
            module = module.name(),
            description = module.description(),
            "Registered module"
        );
    }
    let mut notifier = ConsoleNotifier::default();
    let mut renderer = ConsoleRenderer::default();
    let mut world = ReplayWorld::default();

    registry.activate(handle, &mut notifier);

    let mut tick = SimTick::ZERO;
    while !script.is_finished() || tick <= script.last_tick() {
        for step in script.drain_ready_steps(tick) {
            world.apply(step);
        }
        registry.dispatch_tick(&world, &mut notifier);
        if args.render_every > 0 && tick.0 % args.render_every == 0 {
            renderer.begin_frame(tick);
            registry.dispatch_render(&world, &mut renderer);
        }
        tick = tick.advance(1);
    }

    registry.deactivate_all(&mut notifier);
    info!(
        module = MODULE_NAME,
        ticks = tick.0,
        outlines = renderer.box_count(),
        errors = notifier.error_count(),
        "Replay finished"
    );
    Ok(())
}
