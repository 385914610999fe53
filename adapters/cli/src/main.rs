#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Depthcrawl descent.

mod options;

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use clap::Parser;
use depthcrawl_rendering::{draw_hud, FrameBuffer, FramePresenter, HudOptions, TextPresenter};
use depthcrawl_system_effects::VisualConfig;
use depthcrawl_system_session::{Action, Session, SessionConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::options::{floor_size_arg, parse_script, FloorSize};

/// Command-line arguments accepted by the Depthcrawl adapter.
#[derive(Debug, Parser)]
#[command(name = "depthcrawl", version, about = "Headless first-person descent")]
struct CliArgs {
    /// Seed for floor generation; defaults to the current time.
    #[arg(long)]
    seed: Option<u64>,

    /// Depth to start on.
    #[arg(long, default_value_t = 1)]
    depth: u32,

    /// Number of simulated ticks to run before printing the frame, at least one.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    ticks: u32,

    /// Width of the printed view in characters.
    #[arg(long, default_value_t = 120)]
    width: u32,

    /// Height of the printed view in characters.
    #[arg(long, default_value_t = 40)]
    height: u32,

    /// Floor size as WxH, each edge between 5 and 256.
    #[arg(long, default_value = "32x32", value_parser = floor_size_arg)]
    floor_size: FloorSize,

    /// TOML file overriding the corruption visual tuning.
    #[arg(long, value_name = "PATH")]
    visual_config: Option<PathBuf>,

    /// Keys applied one per tick: w/s move, a/d turn, +/- bias, > descend, v watchers.
    #[arg(long, default_value = "")]
    script: String,

    /// Hide watchers and their exposure.
    #[arg(long)]
    hide_watchers: bool,

    /// Leave the mini-map out of the HUD.
    #[arg(long)]
    no_mini_map: bool,
}

/// Entry point for the Depthcrawl command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();
    run(&args)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &CliArgs) -> Result<()> {
    let actions = parse_script(&args.script).context("invalid --script")?;
    let seed = args.seed.map_or_else(clock_seed, Ok)?;

    let mut session = Session::new(SessionConfig {
        map_width: args.floor_size.width,
        map_height: args.floor_size.height,
        seed,
        screen_width: args.width,
        screen_height: args.height,
        show_watchers: !args.hide_watchers,
    });
    info!(seed, floor_size = %args.floor_size, "starting descent");

    if let Some(path) = &args.visual_config {
        let config = load_visual_config(path)?;
        session.visual_settings_mut().set(config);
    }
    if args.depth > 1 {
        session.apply(Action::TeleportToDepth(args.depth));
    }

    let total_ticks = actions.len().max(args.ticks as usize);
    let mut script = actions.into_iter();
    for _ in 0..total_ticks {
        if let Some(action) = script.next() {
            session.apply(action);
        }
        session.tick();
    }
    debug!(
        depth = session.depth(),
        corruption = session.corruption().level(),
        ticks = total_ticks,
        "simulation finished"
    );

    let mut frame = FrameBuffer::new(args.width, args.height);
    session.render(&mut frame);
    draw_hud(
        &mut frame,
        &session,
        HudOptions {
            show_mini_map: !args.no_mini_map,
        },
    );

    let stdout = io::stdout();
    let mut presenter = TextPresenter::new(stdout.lock());
    presenter.present(&frame).context("failed to print frame")
}

fn load_visual_config(path: &Path) -> Result<VisualConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read visual config {}", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse visual config {}", path.display()))
}

fn clock_seed() -> Result<u64> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the Unix epoch")?;
    Ok(elapsed.as_nanos() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let args = CliArgs::try_parse_from(["depthcrawl"]).expect("defaults parse");
        assert_eq!(args.seed, None);
        assert_eq!(args.depth, 1);
        assert_eq!(args.ticks, 1);
        assert_eq!((args.width, args.height), (120, 40));
        assert_eq!(
            args.floor_size,
            FloorSize {
                width: 32,
                height: 32
            }
        );
        assert!(!args.hide_watchers);
    }

    #[test]
    fn floor_size_flag_is_validated() {
        let args = CliArgs::try_parse_from(["depthcrawl", "--floor-size", "12x20"])
            .expect("valid floor size");
        assert_eq!(args.floor_size.width, 12);
        assert_eq!(args.floor_size.height, 20);

        assert!(CliArgs::try_parse_from(["depthcrawl", "--floor-size", "3x3"]).is_err());
        assert!(CliArgs::try_parse_from(["depthcrawl", "--floor-size", "big"]).is_err());
    }

    #[test]
    fn ticks_flag_requires_at_least_one_tick() {
        assert!(CliArgs::try_parse_from(["depthcrawl", "--ticks", "0"]).is_err());
        let args =
            CliArgs::try_parse_from(["depthcrawl", "--ticks", "5"]).expect("positive ticks");
        assert_eq!(args.ticks, 5);
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;
        CliArgs::command().debug_assert();
    }

    #[test]
    fn visual_config_loads_from_toml() {
        let path = std::env::temp_dir().join(format!(
            "depthcrawl-visual-{}.toml",
            std::process::id()
        ));
        fs::write(&path, "visual_scale = 0.9\nmax_fake_geometry_cells = 12\n")
            .expect("write temp config");
        let config = load_visual_config(&path).expect("config loads");
        let _ = fs::remove_file(&path);

        assert_eq!(config.visual_scale, 0.9);
        assert_eq!(config.max_fake_geometry_cells, 12);
        assert_eq!(config.whisper_window_ticks, VisualConfig::default().whisper_window_ticks);
    }

    #[test]
    fn missing_visual_config_reports_path() {
        let error = load_visual_config(Path::new("/nonexistent/depthcrawl.toml"))
            .expect_err("missing file");
        assert!(error.to_string().contains("/nonexistent/depthcrawl.toml"));
    }
}
