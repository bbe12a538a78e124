//! # Cairn Editor Demo
//!
//! Opens the editor window on a scene file, or on a small generated scene
//! when the file does not exist yet.
//!
//! The demo uses the headless backend, so the window stays blank: the scene
//! is simulated, picked and saved, and the log shows what happens. Plug a
//! `RenderBackend` into `CairnApp::new` to draw it.
//!
//! ## Usage:
//! ```bash
//! cargo run --example editor [config.json]
//! ```
//!
//! ## Controls:
//! - Hold the right mouse button and move the mouse to look around
//! - WASD to move, Space/Shift to rise and sink
//! - Left click in the viewport to select, Delete to remove the selection
//! - Escape quits

use anyhow::Context;
use cairn::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => EditorConfig::load(&path).with_context(|| format!("reading config {}", path))?,
        None => EditorConfig::load_or_default("cairn.json")?,
    };

    let mut app = CairnApp::headless(config)?;
    let runtime = app.runtime();
    if runtime.config.scene_path.exists() {
        runtime
            .load()
            .with_context(|| format!("loading {}", runtime.config.scene_path.display()))?;
    } else {
        build_demo_scene(runtime)?;
    }

    app.set_ui(|ui, runtime| {
        ui.window("Stats")
            .position([300.0, 10.0], imgui::Condition::FirstUseEver)
            .build(|| {
                ui.text(format!("frames drawn: {}", runtime.backend.frames_drawn()));
                ui.text(format!("live meshes: {}", runtime.backend.live_mesh_count()));
            });
    });

    app.run()
}

/// A spinning checkered cube with a moon, on a floor.
fn build_demo_scene(runtime: &mut Runtime) -> anyhow::Result<()> {
    let camera = runtime.ensure_camera();
    runtime
        .scene
        .update_transform(camera, Transform::from_position(Vec3::new(0.0, 2.0, -6.0)))?;

    let floor = runtime.scene.spawn(
        "Floor",
        Transform::from_position(Vec3::new(0.0, -1.0, 0.0)),
    );
    let planet = runtime
        .scene
        .spawn("Planet", Transform::from_position(Vec3::new(0.0, 0.5, 0.0)));
    let moon = runtime.scene.spawn_child(
        planet,
        "Moon",
        Transform::from_position(Vec3::new(2.0, 0.0, 0.0)).with_scale(Vec3::ONE * 0.3),
    )?;

    for (node, mesh, texture) in [
        (floor, "builtin:plane", "builtin:checker"),
        (planet, "builtin:cube", "builtin:checker"),
        (moon, "builtin:sphere", "builtin:white"),
    ] {
        let render = RenderComponent::loaded(mesh, texture, &mut runtime.backend);
        runtime
            .scene
            .set_render_component(node, Some(render), &mut runtime.backend)?;
    }
    runtime
        .scene
        .attach_behavior(planet, Box::new(Spin::new(Vec3::new(0.0, 0.0, 0.8))))?;
    Ok(())
}
