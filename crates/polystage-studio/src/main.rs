use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{info, warn};
use polystage::engine::logging::{LOG_ENV, LoggingConfig, init_logging};
use polystage::prelude::*;
use serde_json::json;

#[derive(Parser, Debug)]
#[command(name = "polystage-studio", about = "Load a scene file and drive a polystage back-end")]
struct Cli {
    /// Back-end identifier: 2d, 3d or xr (aliases: canvas, babylon, aframe, …).
    engine: String,

    /// Scene JSON file.
    scene: PathBuf,

    /// JSON array of assets to load before the scene.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Frames to advance after loading.
    #[arg(long, default_value_t = 1)]
    frames: u32,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Host container id.
    #[arg(long, default_value = "app")]
    container: String,

    /// Enable physics with default gravity before loading the scene.
    #[arg(long)]
    physics: bool,

    /// Print the XR markup tree after the run.
    #[arg(long)]
    dump_markup: bool,

    /// Log filter in env_logger syntax.
    #[arg(long, env = LOG_ENV)]
    log: Option<String>,
}

#[derive(Debug, Default)]
struct Summary {
    live_objects: usize,
    assets_loaded: usize,
    asset_errors: u32,
    frames_advanced: u32,
    render_events: u32,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {what} file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {what} file {}", path.display()))
}

fn counter(engine: &mut dyn Engine, event: &str) -> Rc<Cell<u32>> {
    let count = Rc::new(Cell::new(0));
    let sink = Rc::clone(&count);
    engine.on(event, Rc::new(move |_: &EngineEvent| sink.set(sink.get() + 1)));
    count
}

fn run(engine: &mut dyn Engine, cli: &Cli, scene: &Scene, assets: &[Asset]) -> Result<Summary> {
    let renders = counter(engine, names::RENDER);
    let asset_errors = counter(engine, names::ASSET_ERROR);

    let mount = MountTarget::new(cli.container.as_str()).with_size(cli.width, cli.height);
    pollster::block_on(engine.initialize(mount)).with_context(|| format!("initializing {} engine", cli.engine))?;

    for asset in assets {
        pollster::block_on(engine.load_asset(asset));
    }
    if cli.physics {
        engine.enable_physics(&PhysicsConfig::default());
    }
    engine.load_scene(scene.clone());

    let mut summary = Summary::default();
    for _ in 0..cli.frames {
        if engine.advance_frame() {
            summary.frames_advanced += 1;
        }
    }

    summary.live_objects = scene.objects.iter().filter(|o| engine.contains_object(&o.id)).count();
    summary.assets_loaded = assets.iter().filter(|a| engine.contains_asset(&a.id)).count();
    summary.asset_errors = asset_errors.get();
    summary.render_events = renders.get();
    Ok(summary)
}

fn report(kind: EngineType, scene: &Scene, summary: &Summary) -> Result<()> {
    let out = json!({
        "engine": kind.as_str(),
        "scene": scene.name,
        "objects": scene.objects.len(),
        "liveObjects": summary.live_objects,
        "assetsLoaded": summary.assets_loaded,
        "assetErrors": summary.asset_errors,
        "framesAdvanced": summary.frames_advanced,
        "renderEvents": summary.render_events,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig::default().with_filter(cli.log.clone()));

    if cli.width == 0 || cli.height == 0 {
        bail!("surface must be non-empty, got {}x{}", cli.width, cli.height);
    }

    let kind: EngineType = cli.engine.parse()?;
    let scene: Scene = read_json(&cli.scene, "scene")?;
    let assets: Vec<Asset> = match &cli.assets {
        Some(path) => read_json(path, "asset list")?,
        None => Vec::new(),
    };
    info!("running `{}` on the {kind} back-end", cli.scene.display());

    if kind == EngineType::Xr {
        let mut engine = polystage::xr::XrEngine::new();
        let summary = run(&mut engine, &cli, &scene, &assets)?;
        report(kind, &scene, &summary)?;
        if cli.dump_markup {
            println!("{}", engine.pretty_markup());
        }
        engine.dispose();
        return Ok(());
    }

    if cli.dump_markup {
        warn!("--dump-markup only applies to the xr back-end");
    }
    let mut engine = pollster::block_on(create_engine(&cli.engine))?;
    let summary = run(engine.as_mut(), &cli, &scene, &assets)?;
    report(kind, &scene, &summary)?;
    engine.dispose();
    Ok(())
}
