/// objview - render a Wavefront OBJ mesh in the terminal
///
/// Controls:
///   - Arrow Keys: Move the object
///   - +/-: Move the object towards/away from the camera
///   - Space: Toggle texture shading
///   - Q/ESC: Quit
use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::info;
use objview_core::{load_obj, prepare_mesh, Camera, NormalizeOptions, UvMode, TARGET_RADIUS};
use objview_terminal::TerminalApp;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "objview")]
#[command(about = "Render a Wavefront OBJ mesh in the terminal")]
struct Cli {
    /// Path to a .obj file
    path: PathBuf,

    /// Camera distance from the origin
    #[arg(long, default_value_t = objview_core::view::DEFAULT_CAMERA_DISTANCE)]
    distance: f32,

    /// Vertical field of view in degrees
    #[arg(long, default_value_t = 45.0)]
    fov: f32,

    /// Bounding radius the mesh is scaled to
    #[arg(long, default_value_t = TARGET_RADIUS)]
    target_radius: f32,

    /// Use texture coordinates from the file instead of a planar projection
    #[arg(long)]
    source_uvs: bool,

    /// Start with texture shading enabled
    #[arg(long)]
    texture: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            eprintln!("{}", Cli::command().render_usage());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let doc = load_obj(&cli.path)
        .with_context(|| format!("failed to load OBJ {}", cli.path.display()))?;

    let options = NormalizeOptions {
        target_radius: cli.target_radius,
        uv_mode: if cli.source_uvs {
            UvMode::Source
        } else {
            UvMode::PlanarXY
        },
    };
    let mesh = prepare_mesh(doc, &options).context("failed to normalize mesh")?;
    info!("prepared {} vertices for display", mesh.vertex_count());

    let camera = Camera::default()
        .with_distance(cli.distance)
        .with_fov(cli.fov.to_radians());

    let mut app = TerminalApp::new(mesh, camera, cli.texture)?;
    app.run()?;
    Ok(())
}
