#![allow(non_snake_case)]

use std::path::Path;

use RustyBear_Skeleton::assets::model::{GltfLoader, MeshLoader};
use RustyBear_Skeleton::editor::Editor;
use RustyBear_Skeleton::entities::transform::NodeId;
use RustyBear_Skeleton::environment::config::EditorConfiguration;
use RustyBear_Skeleton::environment::error::HierarchyError;
use RustyBear_Skeleton::glam::{Vec2, Vec3};
use RustyBear_Skeleton::render::camera::PerspectiveCamera;
use RustyBear_Skeleton::render::renderer::TraceBackend;

const EPSILON: f32 = 1e-3;

fn approx_eq_vec3(a: Vec3, b: Vec3, epsilon: f32) -> bool {
    (a - b).length() < epsilon
}

fn editor() -> Editor<PerspectiveCamera> {
    Editor::new(EditorConfiguration::default(), PerspectiveCamera::default())
}

//A -> B -> C with some rotation on the way.
fn chain(editor: &mut Editor<PerspectiveCamera>) -> [NodeId; 3] {
    let a = editor.create_joint(Vec3::new(0.0, 1.0, 0.0)).unwrap();
    editor.select(Some(a));
    let b = editor.create_joint(Vec3::new(1.0, 1.5, 0.0)).unwrap();
    editor.select(Some(b));
    let c = editor.create_joint(Vec3::new(2.0, 1.0, 0.5)).unwrap();
    editor.select(None);

    editor.scene_mut().get_mut(a).unwrap().rotation = Vec3::new(0.0, 30.0, 10.0);
    editor.scene_mut().get_mut(b).unwrap().rotation = Vec3::new(-15.0, 0.0, 45.0);
    [a, b, c]
}

#[test]
fn world_matrices_chain_through_parents() {
    let mut editor = editor();
    let [a, b, c] = chain(&mut editor);
    let scene = editor.scene();

    let expected = scene.world_matrix(a).unwrap() * scene.local_matrix(b).unwrap() * scene.local_matrix(c).unwrap();
    assert!(scene.world_matrix(c).unwrap().abs_diff_eq(expected, 1e-4));
}

#[test]
fn keyframes_play_forward_and_back() {
    let mut editor = editor();
    let [a, b, _] = chain(&mut editor);
    let start_a = editor.scene().get(a).unwrap().rotation;
    let start_b = editor.scene().get(b).unwrap().position;

    editor.select(Some(a));
    editor.record_start().unwrap();
    editor.select(Some(b));
    editor.record_start().unwrap();

    editor.scene_mut().get_mut(a).unwrap().rotation = Vec3::new(20.0, -40.0, 90.0);
    editor.scene_mut().get_mut(b).unwrap().position = Vec3::new(0.0, 2.0, 0.0);
    editor.select(Some(a));
    editor.record_end().unwrap();
    editor.select(Some(b));
    editor.record_end().unwrap();

    //Scramble the pose, playback snaps to the start keyframe first.
    editor.scene_mut().get_mut(a).unwrap().rotation = Vec3::ZERO;

    assert!(editor.play(false));
    let mut ticks = 0;
    while editor.is_playing() {
        editor.tick();
        ticks += 1;
    }
    assert_eq!(ticks, 60);
    assert!(approx_eq_vec3(editor.scene().get(a).unwrap().rotation, Vec3::new(20.0, -40.0, 90.0), EPSILON));
    assert!(approx_eq_vec3(editor.scene().get(b).unwrap().position, Vec3::new(0.0, 2.0, 0.0), EPSILON));

    assert!(editor.play(true));
    while editor.is_playing() {
        editor.tick();
    }
    assert!(approx_eq_vec3(editor.scene().get(a).unwrap().rotation, start_a, EPSILON));
    assert!(approx_eq_vec3(editor.scene().get(b).unwrap().position, start_b, EPSILON));
}

#[test]
fn longer_slider_value_plays_more_frames() {
    let config = EditorConfiguration::default().with_playback_duration(3.0);
    let mut editor = Editor::new(config, PerspectiveCamera::default());
    let a = editor.create_joint(Vec3::ZERO).unwrap();
    editor.select(Some(a));
    editor.record_start().unwrap();

    editor.play(false);
    let mut ticks = 0;
    while editor.is_playing() {
        editor.tick();
        ticks += 1;
    }
    //60 fps * 1.5 s, run twice over.
    assert_eq!(ticks, 180);
}

#[test]
fn removing_middle_joint_keeps_grandchild() {
    let mut editor = editor();
    let [a, b, c] = chain(&mut editor);
    let before = editor.scene().world_position(c).unwrap();

    editor.select(Some(b));
    let invalidation = editor.remove_selected().unwrap();

    let scene = editor.scene();
    assert_eq!(invalidation.reparented.as_slice(), &[c]);
    assert!(scene.get(b).is_none());
    assert_eq!(scene.get(c).unwrap().parent(), Some(a));
    assert_eq!(scene.get(a).unwrap().children(), &[c]);
    //The local pose is kept, so the grandchild now hangs off A directly.
    assert!(!approx_eq_vec3(scene.world_position(c).unwrap(), before, EPSILON));
}

#[test]
fn hierarchy_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.txt");

    let mut editor = editor();
    let [a, b, c] = chain(&mut editor);
    editor.scene_mut().get_mut(c).unwrap().rotation = Vec3::new(1.234, 5.678, -9.999);
    assert_eq!(editor.save(&path).unwrap(), 3);

    let saved: Vec<_> = [a, b, c]
        .iter()
        .map(|id| {
            let node = editor.scene().get(*id).unwrap();
            (node.name.clone(), node.position, node.rotation, editor.scene().world_position(*id).unwrap())
        })
        .collect();

    let mut loaded = self::editor();
    assert_eq!(loaded.load(&path).unwrap(), 3);

    for (name, position, rotation, world) in saved {
        let id = loaded.scene().find(&name).unwrap();
        let node = loaded.scene().get(id).unwrap();
        assert!(approx_eq_vec3(node.position, position, 0.01));
        assert!(approx_eq_vec3(node.rotation, rotation, 0.01));
        assert!(approx_eq_vec3(loaded.scene().world_position(id).unwrap(), world, 0.05));
    }

    let scene = loaded.scene();
    let parent_of = |name: &str| {
        let node = scene.get(scene.find(name).unwrap()).unwrap();
        node.parent().map(|p| scene.get(p).unwrap().name.clone())
    };
    assert_eq!(parent_of("joint0"), None);
    assert_eq!(parent_of("joint1").as_deref(), Some("joint0"));
    assert_eq!(parent_of("joint2").as_deref(), Some("joint1"));

    //Numbering continues after the loaded joints.
    assert_eq!(loaded.joint_number(), 3);
    let next = loaded.create_joint(Vec3::ZERO).unwrap();
    assert_eq!(loaded.scene().get(next).unwrap().name, "joint3");
}

#[test]
fn loading_discards_previous_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.txt");
    std::fs::write(
        &path,
        "create -joint hip -rotate <0, 0, 0> -translate <0, 1, 0> -parent ;\n\
         create -joint knee -rotate <10, 0, 0> -translate <0, -1, 0> -parent hip;",
    )
    .unwrap();

    let mut editor = editor();
    let [a, _, _] = chain(&mut editor);
    editor.select(Some(a));
    editor.record_start().unwrap();

    editor.load(&path).unwrap();

    assert_eq!(editor.scene().joints().count(), 2);
    assert!(editor.animator().tracked().next().is_none());
    assert_eq!(editor.selected(), None);
    assert!(editor.scene().find("joint0").is_none());
    let knee = editor.scene().find("knee").unwrap();
    assert!(approx_eq_vec3(editor.scene().world_position(knee).unwrap(), Vec3::ZERO, EPSILON));
}

#[test]
fn malformed_file_leaves_scene_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.txt");
    std::fs::write(
        &path,
        "create -joint a -rotate <0, 0, 0> -translate <0, 1, 0> -parent ;\n\
         create -joint b -rotate <0, 0> -translate <0, -1, 0> -parent a;",
    )
    .unwrap();

    let mut editor = editor();
    chain(&mut editor);

    assert!(matches!(editor.load(&path), Err(HierarchyError::Malformed { line: 2, .. })));
    assert_eq!(editor.scene().joints().count(), 3);
    assert!(matches!(editor.load(&dir.path().join("missing.txt")), Err(HierarchyError::Io(_))));
    assert_eq!(editor.scene().joints().count(), 3);
}

#[test]
fn picking_goes_through_the_camera() {
    let mut editor = editor();
    let near = editor.create_joint(Vec3::new(0.0, 0.0, 2.0)).unwrap();
    let far = editor.create_joint(Vec3::new(0.0, 0.0, -2.0)).unwrap();

    let centre = Vec2::new(640.0, 360.0);
    assert_eq!(editor.select_at(centre), Some(near));

    editor.scene_mut().get_mut(near).unwrap().is_selectable = false;
    assert_eq!(editor.select_at(centre), Some(far));

    //Only the ground plane is under the bottom edge, and it is never selected.
    assert_eq!(editor.select_at(Vec2::new(640.0, 719.0)), None);
}

#[test]
fn demo_session_ends_on_raised_pose() {
    let mut backend = TraceBackend::default();
    let editor = RustyBear_Skeleton::demo_session(EditorConfiguration::default(), &mut backend).unwrap();

    let shoulder = editor.scene().find("joint0").unwrap();
    assert!(approx_eq_vec3(editor.scene().get(shoulder).unwrap().rotation, Vec3::new(0.0, 0.0, 45.0), EPSILON));
    assert!(!editor.is_playing());
    //Ground plane and three joint spheres.
    assert_eq!(backend.primitives(), 4);
}

#[test]
fn gltf_triangle_is_imported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("triangle.gltf");
    std::fs::write(
        &path,
        r#"{
  "asset": { "version": "2.0" },
  "scene": 0,
  "scenes": [ { "nodes": [0] } ],
  "nodes": [ { "mesh": 0 } ],
  "meshes": [ { "primitives": [ { "attributes": { "POSITION": 0 } } ] } ],
  "buffers": [ {
    "byteLength": 36,
    "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAA"
  } ],
  "bufferViews": [ { "buffer": 0, "byteOffset": 0, "byteLength": 36 } ],
  "accessors": [ {
    "bufferView": 0,
    "byteOffset": 0,
    "componentType": 5126,
    "count": 3,
    "type": "VEC3",
    "min": [0.0, 0.0, 0.0],
    "max": [1.0, 1.0, 0.0]
  } ]
}"#,
    )
    .unwrap();

    let model = GltfLoader.load_model(&path).unwrap();

    assert_eq!(model.name, "triangle.gltf");
    assert_eq!(model.positions.len(), 3);
    assert_eq!(model.indices, vec![0, 1, 2]);
    assert_eq!(model.aabb_max, Vec3::new(1.0, 1.0, 0.0));

    let mut editor = editor();
    let joint = editor.create_joint(Vec3::ZERO).unwrap();
    editor.select(Some(joint));
    assert!(editor.bind_model(Path::new(&path)).is_ok());
    assert!(editor.scene().binding_of(joint).is_some());
}
