mod common;

use common::{Project, asset_ref, document, frame_ref};
use phaser_canvas_core::factory::{AssetObject, change_texture, create_from_asset};
use phaser_canvas_core::node::{ButtonData, TileSpriteData, TilemapData};
use phaser_canvas_core::{
    AssetKey, AssetKind, CanvasModel, CanvasType, Node, NodeKind, SpriteShape, StateSettings,
};
use serde_json::{Value, json};

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

fn sample_scene(project: &Project) -> CanvasModel {
    let ctx = project.ctx();
    let mut model = CanvasModel::new(CanvasType::State);
    let world = model.world_mut();
    let root = world.root();

    let mut enemies = Node::group();
    enemies.base.editor_name = "enemies".into();
    enemies.base.x = 100.0;
    enemies.base.y = 50.0;
    let enemies = world.add_node(root, enemies).unwrap();
    world.node_mut(enemies).unwrap().as_group_mut().unwrap().physics_group = true;

    let crate_asset = ctx.find_asset(&asset_ref("crate")).unwrap();
    let image = create_from_asset(world, enemies, AssetObject::Asset(crate_asset.clone()))
        .unwrap()
        .unwrap();
    {
        let node = world.node_mut(image).unwrap();
        node.base.x = 10.0;
        node.base.y = 20.0;
        node.base.scale_x = 2.0;
    }

    let walk = ctx.find_asset(&frame_ref("hero", "walk")).unwrap();
    let hero = create_from_asset(world, root, AssetObject::Asset(walk)).unwrap().unwrap();
    world.node_mut(hero).unwrap().base.set_angle(45.0);

    create_from_asset(world, root, AssetObject::Text("Score: 0".into())).unwrap();

    let mut tiles = Node::sprite(SpriteShape::TileSprite(TileSpriteData::new(
        crate_asset.clone(),
        64.0,
        32.0,
    )));
    tiles.base.editor_name = "floor".into();
    world.add_node(root, tiles).unwrap();

    let mut button = ButtonData::new(crate_asset);
    button.over_frame = Some("over".into());
    let mut button = Node::sprite(SpriteShape::Button(button));
    button.base.editor_name = "play".into();
    world.add_node(root, button).unwrap();

    let mut map = TilemapData::new(ctx.find_asset(&asset_ref("map1")).unwrap());
    map.tile_width = 16.0;
    map.tileset_image = ctx.find_asset(&asset_ref("sky"));
    let mut map = Node::sprite(SpriteShape::Tilemap(map));
    map.base.editor_name = "level-map".into();
    world.add_node(root, map).unwrap();

    let digits = ctx.find_asset(&asset_ref("digits")).unwrap();
    let score = create_from_asset(world, root, AssetObject::Asset(digits)).unwrap().unwrap();
    let score = world.node_mut(score).unwrap();
    score.base.editor_name = "score".into();
    if let Some(SpriteShape::BitmapText(text)) = score.as_sprite_mut().map(|sprite| &mut sprite.shape) {
        text.text = "123".into();
        text.size = 48.0;
    }

    model
}

fn tilemap_of(model: &CanvasModel, name: &str) -> TilemapData {
    let world = model.world();
    let id = world.find_by_name(name).unwrap();
    match &world.get(id).unwrap().as_sprite().unwrap().shape {
        SpriteShape::Tilemap(map) => map.clone(),
        other => panic!("unexpected shape {other:?}"),
    }
}

fn bitmap_text_of(model: &CanvasModel, name: &str) -> (String, f64, String) {
    let world = model.world();
    let id = world.find_by_name(name).unwrap();
    match &world.get(id).unwrap().as_sprite().unwrap().shape {
        SpriteShape::BitmapText(text) => (text.text.clone(), text.size, text.font.key().asset.clone()),
        other => panic!("unexpected shape {other:?}"),
    }
}

fn outline(model: &CanvasModel) -> Vec<(String, String, f64, f64, f64)> {
    let world = model.world();
    world
        .descendants(world.root())
        .into_iter()
        .map(|id| {
            let node = world.get(id).unwrap();
            (
                node.type_name().to_owned(),
                node.base.editor_name.clone(),
                node.base.x,
                node.base.y,
                node.base.rotation,
            )
        })
        .collect()
}

#[test]
fn saved_scene_reads_back_identically() {
    let project = Project::new();
    let ctx = project.ctx();
    let mut model = sample_scene(&project);

    let saved = model.to_json(true, &ctx).unwrap();
    let loaded = CanvasModel::from_json(&saved, &ctx).unwrap();

    assert_eq!(outline(&loaded), outline(&model));
    assert_eq!(loaded.doc_type(), CanvasType::State);
    assert!(loaded.validate().is_empty());

    // Both sprites bound to "crate" share one table entry.
    assert_eq!(saved["asset-table"].as_object().unwrap().len(), 5);

    let written_map = &saved["world"]["info"]["children"][5];
    assert_eq!(written_map["type"], "tilemap");
    assert_eq!(written_map["info"]["tileWidth"].as_f64(), Some(16.0));
    assert!(written_map["info"].get("tileHeight").is_none());
    let tileset_id = written_map["info"]["tilesetImage"].as_str().unwrap();
    assert_eq!(saved["asset-table"][tileset_id], asset_ref("sky"));

    let map = tilemap_of(&loaded, "level-map");
    assert_eq!((map.tile_width, map.tile_height), (16.0, 32.0));
    assert_eq!(map.asset.kind(), AssetKind::Tilemap);
    assert_eq!(map.tileset_image.unwrap().key().asset, "sky");

    assert_eq!(bitmap_text_of(&loaded, "score"), ("123".to_owned(), 48.0, "digits".to_owned()));
    assert_eq!(saved["world"]["info"]["children"][6]["type"], "bitmapText");

    let floor = loaded.world().find_by_name("floor").unwrap();
    match &loaded.world().get(floor).unwrap().as_sprite().unwrap().shape {
        SpriteShape::TileSprite(tile) => assert_eq!((tile.width, tile.height), (64.0, 32.0)),
        other => panic!("unexpected shape {other:?}"),
    }

    let play = loaded.world().find_by_name("play").unwrap();
    match &loaded.world().get(play).unwrap().as_sprite().unwrap().shape {
        SpriteShape::Button(button) => assert_eq!(button.over_frame.as_deref(), Some("over")),
        other => panic!("unexpected shape {other:?}"),
    }
}

#[test]
fn snapshot_form_inlines_asset_references() {
    let project = Project::new();
    let ctx = project.ctx();
    let mut model = sample_scene(&project);

    let snapshot = model.to_json(false, &ctx).unwrap();
    let hero = &snapshot["world"]["info"]["children"][1];
    assert_eq!(hero["type"], "atlas");
    assert_eq!(hero["asset-ref"], frame_ref("hero", "walk"));
    assert!(hero.get("asset").is_none());

    let map = &snapshot["world"]["info"]["children"][5];
    assert_eq!(map["asset-ref"], asset_ref("map1"));
    assert_eq!(map["info"]["tilesetImage"], asset_ref("sky"));

    let score = &snapshot["world"]["info"]["children"][6];
    assert_eq!(score["asset-ref"], asset_ref("digits"));
    assert_eq!(score["info"]["text"], "123");
    assert_eq!(score["info"]["size"].as_f64(), Some(48.0));

    let loaded = CanvasModel::from_json(&snapshot, &ctx).unwrap();
    assert_eq!(outline(&loaded), outline(&model));
    assert_eq!(tilemap_of(&loaded, "level-map").tileset_image.unwrap().key().asset, "sky");
    assert_eq!(bitmap_text_of(&loaded, "score").0, "123");
}

#[test]
fn bitmap_text_keeps_content_when_font_changes() {
    let mut project = Project::new();
    project
        .catalog
        .register(AssetKey::new(common::PACK, "level", "bold-digits"), AssetKind::BitmapFont);
    let ctx = project.ctx();
    let mut model = sample_scene(&project);

    let bold = ctx.find_asset(&asset_ref("bold-digits")).unwrap();
    let score = model.world().find_by_name("score").unwrap();
    change_texture(model.world_mut(), score, bold).unwrap();

    assert_eq!(bitmap_text_of(&model, "score"), ("123".to_owned(), 48.0, "bold-digits".to_owned()));
}

#[test]
fn save_and_load_through_vfs() {
    let project = Project::new();
    let mut model = sample_scene(&project);
    assert!(model.is_dirty());

    model.save("scenes/Level.canvas", &project.ctx()).unwrap();
    assert!(!model.is_dirty());
    assert_eq!(project.read_file("scenes/Level.canvas")["canvas-version"], 2);

    let loaded = CanvasModel::load("scenes/Level.canvas", &project.ctx()).unwrap();
    assert!(!loaded.is_dirty());
    assert_eq!(outline(&loaded), outline(&model));
}

// ---------------------------------------------------------------------------
// Old files and missing assets
// ---------------------------------------------------------------------------

#[test]
fn document_without_tables_or_state_settings_loads_cleanly() {
    let project = Project::new();
    let ctx = project.ctx();
    let json = json!({
        "canvas-version": 2,
        "settings": {"sceneWidth": 640},
        "world": {
            "type": "world",
            "info": {"children": [{"type": "text", "info": {"editorName": "title", "text": "Hi"}}]}
        }
    });

    let model = CanvasModel::from_json(&json, &ctx).unwrap();
    assert!(model.validate().iter().all(|problem| !problem.is_error()));
    assert_eq!(model.doc_type(), CanvasType::Group);
    assert_eq!(model.settings().scene_width, 640.0);
    assert_eq!(model.state_settings(), &StateSettings::default());
    assert!(model.world().assets().is_empty());
    assert!(model.world().prefabs().is_empty());
}

fn ghost_document() -> (Value, Value) {
    let ghost = json!({
        "type": "image",
        "id": "a1",
        "asset": "0",
        "info": {"editorName": "ghost", "x": 12, "alpha": 0.5}
    });
    let mut doc = document(
        "group",
        json!([ghost.clone(), {"type": "image", "id": "a2", "asset": "1", "info": {"editorName": "box"}}]),
    );
    doc["asset-table"] = json!({"0": asset_ref("ghost"), "1": asset_ref("crate")});
    (doc, ghost)
}

#[test]
fn missing_asset_keeps_original_json() {
    let project = Project::new();
    let ctx = project.ctx();
    let (doc, ghost) = ghost_document();

    let mut model = CanvasModel::from_json(&doc, &ctx).unwrap();
    let world = model.world();
    let placeholder = world.children(world.root())[0];
    let node = world.get(placeholder).unwrap();
    assert!(matches!(node.kind(), NodeKind::MissingAsset(_)));
    assert_eq!(node.base.editor_name, "ghost");
    assert_eq!(node.base.x, 12.0);

    let problems = model.validate();
    let errors: Vec<_> = problems.iter().filter(|p| p.is_error()).map(|p| p.message.as_str()).collect();
    assert_eq!(errors.len(), 2);
    assert!(errors[0].starts_with("Asset not found"));
    assert!(errors[1].contains("in 'ghost'"));

    let saved = model.to_json(true, &ctx).unwrap();
    let written = &saved["world"]["info"]["children"][0];
    assert_eq!(
        serde_json::to_string(written).unwrap(),
        serde_json::to_string(&ghost).unwrap()
    );
    assert_eq!(saved["world"]["info"]["children"][1]["asset"], "1");
    assert_eq!(saved["asset-table"]["0"], asset_ref("ghost"));
}

#[test]
fn build_repairs_and_loses_assets() {
    let mut project = Project::new();
    let (doc, _) = ghost_document();
    let mut model = CanvasModel::from_json(&doc, &project.ctx()).unwrap();

    project
        .catalog
        .register(AssetKey::new(common::PACK, "level", "ghost"), AssetKind::Image);
    let summary = model.world_mut().build(&project.ctx());
    assert_eq!((summary.repaired, summary.lost), (1, 0));

    let world = model.world();
    let ghost = world.find_by_name("ghost").unwrap();
    assert_eq!(world.index_in_parent(ghost), Some(0));
    let node = world.get(ghost).unwrap();
    assert_eq!(node.type_name(), "image");
    assert_eq!(node.base.id, "a1");
    assert_eq!(node.base.alpha, 0.5);

    project
        .catalog
        .unregister(&AssetKey::new(common::PACK, "level", "crate"));
    let summary = model.world_mut().build(&project.ctx());
    assert_eq!((summary.repaired, summary.lost), (0, 1));

    let world = model.world();
    let lost = world.find_by_name("box").unwrap();
    assert!(world.get(lost).unwrap().is_placeholder());
    assert_eq!(world.index_in_parent(lost), Some(1));
}

#[test]
fn copied_placeholder_gets_its_own_id_on_disk() {
    let project = Project::new();
    let ctx = project.ctx();
    let mut model = CanvasModel::from_json(&ghost_document().0, &ctx).unwrap();

    let world = model.world_mut();
    let ghost = world.find_by_name("ghost").unwrap();
    let copy = world.copy(ghost, false, &ctx).unwrap();
    assert!(world.get(copy).unwrap().is_placeholder());
    let copy_id = world.get(copy).unwrap().base.id.clone();
    assert_ne!(copy_id, "a1");

    let saved = model.to_json(true, &ctx).unwrap();
    let children = saved["world"]["info"]["children"].as_array().unwrap();
    let ids: Vec<&str> = children.iter().map(|child| child["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["a1", "a2", copy_id.as_str()]);

    let reloaded = CanvasModel::from_json(&saved, &ctx).unwrap();
    let world = reloaded.world();
    assert_eq!(world.find_by_id("a1"), Some(world.children(world.root())[0]));
    assert_eq!(world.find_by_id(&copy_id), Some(world.children(world.root())[2]));
}

// ---------------------------------------------------------------------------
// Editing
// ---------------------------------------------------------------------------

#[test]
fn edits_mark_document_dirty() {
    let project = Project::new();
    let ctx = project.ctx();
    let mut model = CanvasModel::from_json(&ghost_document().0, &ctx).unwrap();
    assert!(!model.is_dirty());

    let world = model.world_mut();
    let box_id = world.find_by_name("box").unwrap();
    world.node_mut(box_id).unwrap().base.y = 3.0;
    assert!(model.is_dirty());

    model.world_mut().set_dirty(false);
    assert!(!model.is_dirty());
}

#[test]
fn reparenting_moves_node_between_groups() {
    let project = Project::new();
    let mut model = sample_scene(&project);
    let world = model.world_mut();
    let root = world.root();

    let enemies = world.find_by_name("enemies").unwrap();
    let crate_id = world.find_by_name("crate").unwrap();
    world.add_child(root, 0, crate_id).unwrap();

    assert_eq!(world.parent(crate_id), Some(root));
    assert!(world.children(enemies).is_empty());
    assert_eq!(world.children(root)[0], crate_id);
}

#[test]
fn copy_duplicates_subtree() {
    let project = Project::new();
    let ctx = project.ctx();
    let mut model = sample_scene(&project);
    let world = model.world_mut();

    let enemies = world.find_by_name("enemies").unwrap();
    let original_ids: Vec<String> = world
        .descendants(enemies)
        .into_iter()
        .map(|id| world.get(id).unwrap().base.id.clone())
        .collect();

    let copy = world.copy(enemies, false, &ctx).unwrap();
    assert_eq!(world.parent(copy), world.parent(enemies));
    assert_eq!(world.descendants(copy).len(), 2);
    for id in world.descendants(copy) {
        assert!(!original_ids.contains(&world.get(id).unwrap().base.id));
    }

    let kept = world.copy(enemies, true, &ctx).unwrap();
    assert_eq!(world.get(kept).unwrap().base.id, original_ids[0]);

    let duplicated: Vec<_> = model
        .validate()
        .into_iter()
        .filter(|p| p.message.starts_with("Duplicated name"))
        .map(|p| p.message)
        .collect();
    assert_eq!(duplicated, vec!["Duplicated name 'crate'", "Duplicated name 'enemies'"]);
}
