// scene2png - Run a scene headless and dump a top-down PNG
//
// Drives the same Animator the page uses, against the in-memory Encoder,
// then rasterizes the final frame's records.

mod raster;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use synthwave_engine::color::Rgb;
use synthwave_engine::{Animator, Encoder, Host, Preset, SceneConfig, Tick, Viewport};
use tracing::info;

use crate::raster::Plan;

#[derive(Parser, Debug)]
#[command(name = "scene2png", version)]
struct Args {
    /// Base preset: holographic-floor or synthwave.
    #[arg(long, default_value = "holographic-floor")]
    preset: Preset,

    /// JSON overrides; a `preset` key in the file wins over --preset.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    /// Frames to simulate at 60 fps before the snapshot.
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Output edge length in pixels.
    #[arg(long, default_value_t = 800)]
    size: u32,

    #[arg(long)]
    out: PathBuf,
}

/// Always has the canvas.
struct Headless {
    size: u32,
}

impl Host for Headless {
    fn has_element(&self, _id: &str) -> bool {
        true
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.size, self.size)
    }
}

fn load_config(args: &Args) -> anyhow::Result<SceneConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
            let mut patch: serde_json::Value = serde_json::from_str(&json).context("parse config")?;
            if let Some(obj) = patch.as_object_mut() {
                obj.entry("preset").or_insert(serde_json::to_value(args.preset)?);
            }
            SceneConfig::from_json(&patch.to_string()).with_context(|| format!("load {}", path.display()))?
        }
        None => SceneConfig::preset(args.preset),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let clear = Rgb::from_hex(config.ambient.clear_color);

    let host = Headless { size: args.size };
    let mut animator = Animator::setup(&host, Encoder::new(args.size, args.size), config).context("scene setup")?;

    for _ in 0..args.frames {
        animator.tick(1.0 / 60.0);
    }

    let mut plan = Plan::new(args.size, animator.scene().bounds(), clear);
    plan.draw(animator.backend());
    plan.into_image()
        .save(&args.out)
        .with_context(|| format!("write {}", args.out.display()))?;

    info!(
        out = %args.out.display(),
        frames = args.frames,
        agents = animator.scene().agent_count(),
        "snapshot written"
    );
    Ok(())
}
