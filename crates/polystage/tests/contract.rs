//! Behaviour every back-end shares, driven through the selector.

use std::cell::RefCell;
use std::rc::Rc;

use polystage::prelude::*;

fn mounted(kind: EngineType) -> Box<dyn Engine> {
    let mut engine = pollster::block_on(create_engine(kind.as_str())).unwrap();
    pollster::block_on(engine.initialize(MountTarget::default())).unwrap();
    engine
}

fn for_each_engine(mut check: impl FnMut(EngineType, &mut dyn Engine)) {
    for kind in EngineType::ALL {
        let mut engine = mounted(kind);
        check(kind, engine.as_mut());
        engine.dispose();
    }
}

fn sample_scene() -> Scene {
    Scene::from_json(
        r##"{
            "background": "#223344",
            "camera": { "position": { "x": 0, "y": 2, "z": 8 }, "target": { "x": 0, "y": 0, "z": 0 } },
            "objects": [
                { "id": "b", "type": "box", "position": { "x": 1, "y": 2, "z": 3 },
                  "properties": { "width": 2, "height": 3, "depth": 4, "color": "#ff0000" } },
                { "id": "s", "type": "sphere", "position": { "x": 0, "y": 1 },
                  "rotation": { "x": 0, "y": 45, "z": 0 }, "properties": { "radius": 0.5 } },
                { "id": "t", "type": "text", "position": { "x": 10, "y": 10 },
                  "properties": { "text": "Hello", "fontSize": 32 } },
                { "id": "u", "type": "unknown_type", "position": { "x": 0, "y": 0 }, "properties": {} }
            ]
        }"##,
    )
    .unwrap()
}

fn recorder(engine: &mut dyn Engine, event: &str) -> Rc<RefCell<Vec<EngineEvent>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    engine.on(event, Rc::new(move |e: &EngineEvent| sink.borrow_mut().push(e.clone())));
    seen
}

// ── scenes ────────────────────────────────────────────────────────────────

#[test]
fn current_scene_is_the_loaded_scene() {
    for_each_engine(|kind, engine| {
        let scene = sample_scene();
        engine.load_scene(scene.clone());
        assert_eq!(engine.current_scene(), Some(&scene), "{kind}");
    });
}

#[test]
fn every_scene_object_resolves_by_id() {
    for_each_engine(|kind, engine| {
        let scene = sample_scene();
        engine.load_scene(scene.clone());
        for object in &scene.objects {
            assert!(engine.contains_object(&object.id), "{kind}: {}", object.id);
            engine.update_game_object(&object.id, &GameObjectPatch::new().position(Vector3::new(1.0, 1.0)));
            engine.remove_game_object(&object.id);
            assert!(!engine.contains_object(&object.id), "{kind}: {}", object.id);
        }
    });
}

#[test]
fn scene_loaded_carries_the_scene() {
    for_each_engine(|kind, engine| {
        let events = recorder(engine, names::SCENE_LOADED);
        let scene = sample_scene();
        engine.load_scene(scene.clone());
        let events = events.borrow();
        assert_eq!(events.len(), 1, "{kind}");
        assert_eq!(events[0].data, EventData::Scene(Box::new(scene)), "{kind}");
    });
}

#[test]
fn clear_scene_forgets_scene_and_objects() {
    for_each_engine(|kind, engine| {
        let scene = sample_scene();
        engine.load_scene(scene.clone());
        engine.clear_scene();
        assert!(engine.current_scene().is_none(), "{kind}");
        for object in &scene.objects {
            assert!(!engine.contains_object(&object.id), "{kind}: {}", object.id);
        }
        // Objects can be created again afterwards.
        engine.create_game_object(&scene.objects[0]);
        assert!(engine.contains_object("b"), "{kind}");
    });
}

#[test]
fn reloading_replaces_the_previous_scene() {
    for_each_engine(|kind, engine| {
        engine.load_scene(sample_scene());
        let next = Scene::new().with_object(GameObject::new("only", "box", Vector3::new(0.0, 0.0)));
        engine.load_scene(next.clone());
        assert!(!engine.contains_object("b"), "{kind}");
        assert!(engine.contains_object("only"), "{kind}");
        assert_eq!(engine.current_scene(), Some(&next), "{kind}");
    });
}

// ── objects ───────────────────────────────────────────────────────────────

#[test]
fn partial_patches_are_independent() {
    for_each_engine(|kind, engine| {
        engine.create_game_object(&GameObject::new("p", "box", Vector3::new(0.0, 0.0)));
        engine.update_game_object("p", &GameObjectPatch::new().position(Vector3::new(5.0, 5.0)));
        engine.update_game_object("p", &GameObjectPatch::new().rotation(Rotation::new(0.0, 90.0, 0.0)));
        engine.update_game_object("p", &GameObjectPatch::new().property("color", "#00ff00"));
        assert!(engine.contains_object("p"), "{kind}");
    });
}

#[test]
fn unknown_ids_are_silent() {
    for_each_engine(|kind, engine| {
        engine.update_game_object("ghost", &GameObjectPatch::new().scale(Vector3::new(2.0, 2.0)));
        engine.remove_game_object("ghost");
        engine.unload_asset("ghost");
        assert!(!engine.contains_object("ghost"), "{kind}");
    });
}

#[test]
fn removing_twice_is_fine() {
    for_each_engine(|kind, engine| {
        engine.create_game_object(&GameObject::new("r", "sphere", Vector3::new(0.0, 0.0)));
        engine.remove_game_object("r");
        engine.remove_game_object("r");
        assert!(!engine.contains_object("r"), "{kind}");
    });
}

#[test]
fn unknown_type_still_renders_something() {
    for_each_engine(|kind, engine| {
        engine.create_game_object(&GameObject::new("u", "unknown_type", Vector3::new(0.0, 0.0)));
        assert!(engine.contains_object("u"), "{kind}");
    });
}

#[test]
fn game_object_is_not_reconstructed() {
    for_each_engine(|kind, engine| {
        engine.load_scene(sample_scene());
        assert!(engine.game_object("b").is_none(), "{kind}");
    });
}

// ── assets ────────────────────────────────────────────────────────────────

#[test]
fn bad_asset_is_swallowed() {
    for_each_engine(|kind, engine| {
        let errors = recorder(engine, names::ASSET_ERROR);
        pollster::block_on(engine.load_asset(&Asset::new("a1", AssetKind::Image, "bad://nonexistent")));
        assert!(!engine.contains_asset("a1"), "{kind}");
        engine.unload_asset("a1");
        assert_eq!(errors.borrow().len(), 1, "{kind}");
    });
}

#[test]
fn asset_json_shape_is_accepted() {
    let asset: Asset = serde_json::from_str(
        r#"{ "id": "m", "name": "Ship", "type": "3dmodel", "url": "bad://ship.glb", "size": 10, "metadata": { "lod": 2 } }"#,
    )
    .unwrap();
    for_each_engine(|kind, engine| {
        pollster::block_on(engine.load_asset(&asset));
        assert!(!engine.contains_asset("m"), "{kind}");
    });
}

// ── loop, pause, events ───────────────────────────────────────────────────

#[test]
fn pause_gates_the_loop() {
    for_each_engine(|kind, engine| {
        let paused = recorder(engine, names::PAUSED);
        let resumed = recorder(engine, names::RESUMED);

        assert!(engine.advance_frame(), "{kind}");
        engine.pause();
        assert!(engine.is_paused(), "{kind}");
        assert!(!engine.advance_frame(), "{kind}");
        engine.resume();
        assert!(!engine.is_paused(), "{kind}");
        assert!(engine.advance_frame(), "{kind}");

        assert_eq!(paused.borrow().len(), 1, "{kind}");
        assert_eq!(resumed.borrow().len(), 1, "{kind}");
    });
}

#[test]
fn render_always_notifies() {
    for_each_engine(|kind, engine| {
        let renders = recorder(engine, names::RENDER);
        engine.render();
        engine.pause();
        engine.render();
        assert_eq!(renders.borrow().len(), 2, "{kind}");
    });
}

#[test]
fn render_notifies_before_initialize_and_after_dispose() {
    for kind in EngineType::ALL {
        let mut engine = pollster::block_on(create_engine(kind.as_str())).unwrap();
        let renders = recorder(engine.as_mut(), names::RENDER);
        engine.render();
        assert!(!engine.advance_frame(), "{kind}");
        assert_eq!(renders.borrow().len(), 1, "{kind}");

        pollster::block_on(engine.initialize(MountTarget::default())).unwrap();
        engine.dispose();
        let renders = recorder(engine.as_mut(), names::RENDER);
        engine.render();
        assert_eq!(renders.borrow().len(), 1, "{kind}");
    }
}

#[test]
fn off_removes_only_that_handler() {
    for_each_engine(|kind, engine| {
        let hits = Rc::new(RefCell::new(0));
        let a_hits = Rc::clone(&hits);
        let b_hits = Rc::clone(&hits);
        let a: EventHandler = Rc::new(move |_: &EngineEvent| *a_hits.borrow_mut() += 1);
        let b: EventHandler = Rc::new(move |_: &EngineEvent| *b_hits.borrow_mut() += 10);
        engine.on("custom", Rc::clone(&a));
        engine.on("custom", Rc::clone(&b));

        engine.emit("custom", EventData::None);
        engine.off("custom", &a);
        engine.emit("custom", EventData::Json(serde_json::json!({ "n": 1 })));
        assert_eq!(*hits.borrow(), 21, "{kind}");
    });
}

#[test]
fn listeners_are_per_instance() {
    let mut first = mounted(EngineType::Scene3d);
    let mut second = mounted(EngineType::Scene3d);
    let seen = recorder(first.as_mut(), names::SCENE_LOADED);
    second.load_scene(sample_scene());
    assert!(seen.borrow().is_empty());
    first.load_scene(sample_scene());
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn resize_emits_size() {
    for_each_engine(|kind, engine| {
        let sizes = recorder(engine, names::RESIZE);
        engine.resize(640, 480);
        let sizes = sizes.borrow();
        assert_eq!(sizes.len(), 1, "{kind}");
        assert_eq!(sizes[0].data, EventData::Size { width: 640, height: 480 }, "{kind}");
    });
}

// ── camera, background, physics ───────────────────────────────────────────

#[test]
fn camera_background_and_physics_never_fail() {
    for_each_engine(|kind, engine| {
        engine.set_background_color("notacolor");
        engine.set_background_color("#ff0000");
        engine.set_camera_position(1.0, 2.0, None);
        engine.set_camera_position(1.0, 2.0, Some(5.0));
        engine.set_camera_target(0.0, 0.0, Some(0.0));
        engine.enable_physics(&PhysicsConfig::default());
        engine.disable_physics();
        engine.disable_physics();
        assert_eq!(engine.engine_type(), kind);
    });
}

// ── lifecycle ─────────────────────────────────────────────────────────────

#[test]
fn dispose_is_idempotent_and_safe_before_initialize() {
    for kind in EngineType::ALL {
        let mut fresh = pollster::block_on(create_engine(kind.as_str())).unwrap();
        fresh.dispose();
        fresh.dispose();

        let mut engine = mounted(kind);
        let disposed = recorder(engine.as_mut(), names::DISPOSED);
        engine.load_scene(sample_scene());
        engine.dispose();
        engine.dispose();
        assert_eq!(disposed.borrow().len(), 1, "{kind}");
        assert!(!engine.contains_object("b"), "{kind}");
        assert!(engine.current_scene().is_none(), "{kind}");
    }
}

#[test]
fn zero_sized_mount_is_rejected_everywhere() {
    for kind in EngineType::ALL {
        let mut engine = pollster::block_on(create_engine(kind.as_str())).unwrap();
        let res = pollster::block_on(engine.initialize(MountTarget::default().with_size(0, 10)));
        assert!(matches!(res, Err(EngineError::InvalidSurface { .. })), "{kind}");
    }
}

#[test]
fn unknown_engine_identifier_is_rejected() {
    assert!(matches!(
        pollster::block_on(create_engine("unreal")),
        Err(EngineError::UnknownEngineType(ref s)) if s == "unreal"
    ));
}

#[test]
fn canvas_scenario_runs_start_to_finish() {
    let mut engine = mounted(EngineType::Canvas2d);
    engine.load_scene(
        Scene::from_json(
            r##"{ "background": "#112233", "objects": [
                { "id": "p1", "type": "circle", "position": { "x": 100, "y": 100 },
                  "properties": { "radius": 40, "color": "#ff00ff" } } ] }"##,
        )
        .unwrap(),
    );
    engine.update_game_object("p1", &GameObjectPatch::new().position(Vector3::new(200.0, 50.0)));
    engine.remove_game_object("p1");
    engine.clear_scene();
    engine.dispose();
}
