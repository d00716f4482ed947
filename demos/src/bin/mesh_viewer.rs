//! # Mesh Viewer
//!
//! Loads OBJ meshes with their MTL materials and textures, then renders a
//! fixed number of frames on the dummy backend. Every GPU call shows up at
//! `RUST_LOG=trace`; per-frame draw counts are logged at `info`.
//!
//! ```text
//! mesh_viewer --assets ./assets --light-model pbr --frames 3 ./assets/floor.obj
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use lumen_demos::{Viewer, ViewerConfig};
use lumen_graphics::{GraphicsDevice, LightModel};

/// Light model selection for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
enum CliLightModel {
    /// Classical ambient/diffuse/specular shading.
    BlinnPhong,
    /// Metallic/roughness shading with normal mapping.
    #[default]
    Pbr,
}

impl From<CliLightModel> for LightModel {
    fn from(value: CliLightModel) -> Self {
        match value {
            CliLightModel::BlinnPhong => LightModel::BlinnPhong,
            CliLightModel::Pbr => LightModel::Pbr,
        }
    }
}

/// Render OBJ meshes on the Lumen dummy backend.
#[derive(Debug, Parser)]
#[command(name = "mesh_viewer", version, about)]
struct Args {
    /// Directory material texture names are resolved against.
    #[arg(long, default_value = "./assets/")]
    assets: PathBuf,

    /// Directory holding shader sources (defaults to the asset directory).
    #[arg(long)]
    shader_dir: Option<PathBuf>,

    /// Shading model.
    #[arg(long, value_enum, default_value_t = CliLightModel::Pbr)]
    light_model: CliLightModel,

    /// Number of frames to render before exiting.
    #[arg(long, default_value_t = 1)]
    frames: u64,

    /// OBJ files to load.
    #[arg(required = true)]
    meshes: Vec<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    lumen_core::profiling::init_profiling();
    lumen_graphics::init();

    let args = Args::parse();
    let config = ViewerConfig {
        asset_dir: args.assets,
        shader_dir: args.shader_dir,
        light_model: args.light_model.into(),
    };

    let mut viewer = match Viewer::new(GraphicsDevice::dummy(), &config) {
        Ok(viewer) => viewer,
        Err(err) => {
            log::error!("Failed to set up the viewer: {err}");
            return ExitCode::FAILURE;
        }
    };

    for path in &args.meshes {
        if let Err(err) = viewer.load(path) {
            log::error!("Failed to load {}: {err}", path.display());
            return ExitCode::FAILURE;
        }
    }

    for frame in 0..args.frames {
        let stats = viewer.render_frame();
        log::info!(
            "Frame {frame}: {} meshes, {}/{} groups drawn",
            stats.meshes,
            stats.groups_drawn,
            stats.groups_total
        );
    }

    log::info!(
        "Rendered {} frames, {} live buffers, {} live textures",
        args.frames,
        viewer.device().live_buffer_count(),
        viewer.device().live_texture_count()
    );
    ExitCode::SUCCESS
}
