#![allow(non_snake_case)]

pub mod utils;
pub mod assets;
pub mod editor;
pub mod entities;
pub mod environment;
pub mod event;
pub mod input;
pub mod logging;
pub mod render;

//Re-exports
pub use glam;
pub use log;

use std::path::Path;

use glam::Vec3;

use crate::editor::Editor;
use crate::environment::config::EditorConfiguration;
use crate::environment::error::SceneError;
use crate::render::camera::PerspectiveCamera;
use crate::render::renderer::TraceBackend;

/// Headless session: a three joint arm raised from a straight pose and played forward.
///
/// Returns the editor after the playback finished, with the result drawn once into `backend`.
pub fn demo_session(
    config: EditorConfiguration, backend: &mut TraceBackend,
) -> Result<Editor<PerspectiveCamera>, SceneError> {
    let mut editor = Editor::new(config, PerspectiveCamera::new(Vec3::new(0.0, 0.0, 15.0), Vec3::ZERO));

    let shoulder = editor.create_joint(Vec3::new(0.0, 1.0, 0.0))?;
    editor.select(Some(shoulder));
    let elbow = editor.create_joint(Vec3::new(1.5, 1.0, 0.0))?;
    editor.select(Some(elbow));
    let wrist = editor.create_joint(Vec3::new(3.0, 1.0, 0.0))?;

    for id in [shoulder, elbow, wrist] {
        editor.select(Some(id));
        editor.record_start()?;
    }

    for (id, roll) in [(shoulder, 45.0), (elbow, 30.0)] {
        if let Some(node) = editor.scene_mut().get_mut(id) {
            node.rotation = Vec3::new(0.0, 0.0, roll);
        }
    }

    for id in [shoulder, elbow, wrist] {
        editor.select(Some(id));
        editor.record_end()?;
    }
    editor.select(None);

    editor.play(false);
    let mut frames = 0;
    while editor.is_playing() {
        editor.tick();
        frames += 1;
    }
    log::info!("Demo played {} frames", frames);

    editor.draw(backend);
    Ok(editor)
}

/// Loads `path` into a fresh session. Used by `skeleton inspect`.
pub fn inspect(
    config: EditorConfiguration, path: &Path,
) -> Result<Editor<PerspectiveCamera>, environment::error::HierarchyError> {
    let mut editor = Editor::new(config, PerspectiveCamera::default());
    editor.load(path)?;
    Ok(editor)
}
