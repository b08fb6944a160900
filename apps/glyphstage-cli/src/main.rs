use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glyphstage_assets::load_assets;
use glyphstage_common::Viewport;
use glyphstage_controls::OrbitControls;
use glyphstage_render::{FrameLoop, HeadlessBackend, ViewportHandler};
use glyphstage_scene::{build_scene, PerspectiveCamera};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "glyphstage-cli", about = "Headless glyphstage operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate version info
    Info,
    /// Load and validate a font without building a scene
    Probe {
        /// Font file to inspect
        #[arg(long)]
        font: String,
    },
    /// Build the scene and drive the frame loop without a GPU
    Ticks {
        /// Font file used for the extruded glyphs
        #[arg(long)]
        font: String,
        /// Number of frames to run
        #[arg(short, long, default_value = "60")]
        count: u64,
        /// Inject a draw failure on this frame (1-based)
        #[arg(long)]
        fail_tick: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("glyphstage v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Probe { font } => {
            let assets =
                load_assets(&font).with_context(|| format!("loading font from {font}"))?;
            println!("font:   {}", assets.font.name);
            println!("hash:   {}", assets.font.content_hash());
            println!("glyphs: {}", assets.font.glyph_count());
            println!("upem:   {}", assets.font.units_per_em());
        }
        Commands::Ticks {
            font,
            count,
            fail_tick,
        } => {
            let assets =
                load_assets(&font).with_context(|| format!("loading font from {font}"))?;
            let scene = build_scene(&assets).context("building scene")?;

            let viewport = Viewport::default();
            let mut camera = PerspectiveCamera::new(viewport.aspect_ratio());
            let mut controls = OrbitControls::from_pose(camera.target, camera.eye);
            let mut viewport_handler = ViewportHandler::new(viewport);
            let mut backend = HeadlessBackend::new();
            if let Some(n) = fail_tick {
                backend = backend.fail_on_draw(n);
            }
            let mut frame_loop = FrameLoop::new();

            // A resize mid-run exercises the same path the window drives.
            let halfway = count / 2;
            for tick in 0..count {
                if tick == halfway && count >= 2 {
                    viewport_handler.apply(&mut camera, &mut backend, 1600, 900);
                }
                frame_loop.tick(&mut controls, &mut camera, &scene, &mut backend);
            }
            frame_loop.stop();

            let stats = scene.stats();
            println!("nodes:           {}", stats.node_count);
            println!("triangles:       {}", stats.triangle_count);
            println!("lights:          {}", stats.light_count);
            println!("ticks:           {}", frame_loop.ticks());
            println!("frames rendered: {}", frame_loop.frames_rendered());
            println!("draw errors:     {}", frame_loop.draw_errors());
            println!("final aspect:    {:.4}", camera.aspect);
            println!(
                "final eye:       ({:.2}, {:.2}, {:.2})",
                camera.eye.x, camera.eye.y, camera.eye.z
            );
        }
    }

    Ok(())
}
