//! Builder Tests - Preview, Placement and Removal
//!
//! Tests for the placement state machine against a live collision world.

use glam::Vec3;
use parkour_engine::camera::Ray;
use parkour_engine::game::blocks::{BlockType, MeshShape, PREVIEW_OPACITY, REMOVAL_HIGHLIGHT_COLOR, visual_for};
use parkour_engine::game::builder::{PlacementEngine, SceneCommand, ToolMode};
use parkour_engine::game::config::BuilderConfig;
use parkour_engine::game::error::ActionRejected;
use parkour_engine::game::physics::CollisionWorld;

fn engine() -> PlacementEngine {
    PlacementEngine::new(&BuilderConfig::default())
}

/// Straight-down pointer ray over (x, z).
fn down_at(x: f32, z: f32) -> Ray {
    Ray::new(Vec3::new(x, 10.0, z), Vec3::NEG_Y)
}

// ============================================================================
// Preview
// ============================================================================

#[test]
fn test_preview_snaps_every_axis() {
    let mut builder = engine();
    let world = CollisionWorld::default();
    builder.select_block_type(BlockType::Cube);

    // Ground hit at (3.4, 0, 7.8), lifted half a cube
    let preview = builder.update_preview(&down_at(3.4, 7.8), &world);
    assert_eq!(preview, Some(Vec3::new(3.0, 1.0, 8.0)));
    match builder.take_commands().last() {
        Some(SceneCommand::ShowPreview {
            block_type: BlockType::Cube,
            visual,
            ..
        }) => {
            assert_eq!(visual.shape, MeshShape::Box);
            assert_eq!(visual.opacity, PREVIEW_OPACITY);
        }
        other => panic!("Expected a cube preview, got {:?}", other),
    }
}

#[test]
fn test_preview_lifts_by_selected_height() {
    let mut builder = engine();
    let world = CollisionWorld::default();

    builder.select_block_type(BlockType::Pillar);
    assert_eq!(builder.update_preview(&down_at(0.0, 0.0), &world), Some(Vec3::new(0.0, 2.0, 0.0)));
}

#[test]
fn test_preview_hidden_when_pointer_misses() {
    let mut builder = engine();
    let world = CollisionWorld::default();
    builder.update_preview(&down_at(0.0, 0.0), &world);
    builder.take_commands();

    let skyward = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::Y);
    assert_eq!(builder.update_preview(&skyward, &world), None);
    assert_eq!(builder.preview(), None);
    assert_eq!(builder.take_commands(), vec![SceneCommand::HidePreview]);
}

#[test]
fn test_grazing_ray_past_the_grid_hides_preview() {
    let mut builder = engine();
    let mut world = CollisionWorld::default();
    builder.update_preview(&down_at(0.0, 0.0), &world);
    builder.take_commands();

    // Meets the ground billions of metres out
    let grazing = Ray::new(Vec3::new(0.0, 5000.0, 0.0), Vec3::new(1.0, -2.0e-6, 0.0));
    assert_eq!(builder.update_preview(&grazing, &world), None);
    assert_eq!(builder.take_commands(), vec![SceneCommand::HidePreview]);
    assert_eq!(builder.place(&mut world, BlockType::Cube), Err(ActionRejected::NoPreview));
}

#[test]
fn test_no_preview_outside_build_tool() {
    let mut builder = engine();
    let world = CollisionWorld::default();
    builder.set_tool(ToolMode::Camera);
    assert_eq!(builder.update_preview(&down_at(0.0, 0.0), &world), None);
}

// ============================================================================
// Placement
// ============================================================================

#[test]
fn test_place_spawns_and_requests_save() {
    let mut builder = engine();
    let mut world = CollisionWorld::default();
    builder.select_block_type(BlockType::Cube);
    builder.update_preview(&down_at(2.0, 2.0), &world);
    builder.take_commands();

    let id = builder.place_selected(&mut world).unwrap();
    assert_eq!(world.len(), 1);
    assert_eq!(world.get(id).unwrap().position, Vec3::new(2.0, 1.0, 2.0));
    assert_eq!(
        builder.take_commands(),
        vec![SceneCommand::Spawn {
            id,
            block_type: BlockType::Cube,
            position: Vec3::new(2.0, 1.0, 2.0),
            rotation: Vec3::ZERO,
            visual: visual_for(BlockType::Cube),
        }]
    );
    assert!(builder.take_save_request());
    assert!(!builder.take_save_request());
}

#[test]
fn test_spawn_json_carries_visual() {
    let mut builder = engine();
    let mut world = CollisionWorld::default();
    builder.update_preview(&down_at(0.0, 0.0), &world);
    builder.take_commands();
    builder.place(&mut world, BlockType::Finish).unwrap();

    let json = serde_json::to_string(&builder.take_commands()).unwrap();
    assert!(json.contains(r#""op":"spawn""#));
    assert!(json.contains(r#""shape":"pad""#));
    assert!(json.contains(r#""emissive":true"#));
}

#[test]
fn test_stacking_on_a_block() {
    let mut builder = engine();
    let mut world = CollisionWorld::default();
    builder.select_block_type(BlockType::Cube);
    builder.update_preview(&down_at(0.0, 0.0), &world);
    builder.place_selected(&mut world).unwrap();

    // Hits the cube's top at y = 1.5; 1.5 + 0.5 snaps to 2
    let preview = builder.update_preview(&down_at(0.2, -0.1), &world);
    assert_eq!(preview, Some(Vec3::new(0.0, 2.0, 0.0)));
    builder.place_selected(&mut world).unwrap();
    assert_eq!(world.len(), 2);
}

#[test]
fn test_place_requires_preview_and_tool() {
    let mut builder = engine();
    let mut world = CollisionWorld::default();
    assert_eq!(builder.place_selected(&mut world), Err(ActionRejected::NoPreview));

    builder.set_tool(ToolMode::Remove);
    assert!(matches!(
        builder.place_selected(&mut world),
        Err(ActionRejected::WrongTool { expected: "build" })
    ));
    assert!(world.is_empty());
}

#[test]
fn test_second_start_is_rejected() {
    let mut builder = engine();
    let mut world = CollisionWorld::default();

    builder.update_preview(&down_at(0.0, 0.0), &world);
    builder.place(&mut world, BlockType::Start).unwrap();

    builder.update_preview(&down_at(10.0, 10.0), &world);
    assert_eq!(
        builder.place(&mut world, BlockType::Start),
        Err(ActionRejected::DuplicateSpecial(BlockType::Start))
    );
    assert_eq!(world.count_of(BlockType::Start), 1);

    // A finish is still allowed
    assert!(builder.place(&mut world, BlockType::Finish).is_ok());
}

#[test]
fn test_occupied_slot_is_rejected() {
    let mut builder = engine();
    let mut world = CollisionWorld::default();
    builder.select_block_type(BlockType::Cube);
    builder.update_preview(&down_at(4.0, 4.0), &world);
    builder.place_selected(&mut world).unwrap();

    // Same preview, same slot
    assert_eq!(
        builder.place_selected(&mut world),
        Err(ActionRejected::PositionOccupied { x: 4, y: 1, z: 4 })
    );
    assert_eq!(world.len(), 1);
}

#[test]
fn test_block_limit() {
    let mut builder = engine();
    let mut world = CollisionWorld::default();
    builder.select_block_type(BlockType::Cube);

    for i in 0..10 {
        for j in 0..10 {
            builder.update_preview(&down_at(i as f32 * 2.0, j as f32 * 2.0), &world);
            builder.place_selected(&mut world).unwrap();
        }
    }
    assert_eq!(world.len(), 100);

    builder.update_preview(&down_at(40.0, 40.0), &world);
    assert_eq!(
        builder.place_selected(&mut world),
        Err(ActionRejected::BlockLimit { max: 100 })
    );
    assert_eq!(world.len(), 100);
}

// ============================================================================
// Removal
// ============================================================================

#[test]
fn test_remove_requires_remove_tool() {
    let mut builder = engine();
    let mut world = CollisionWorld::default();
    world.insert(BlockType::Cube, Vec3::new(0.0, 0.5, -5.0), Vec3::ZERO);

    let ray = Ray::new(Vec3::new(0.0, 0.5, 0.0), Vec3::NEG_Z);
    assert!(matches!(
        builder.remove(&ray, &mut world),
        Err(ActionRejected::WrongTool { expected: "remove" })
    ));
    assert_eq!(world.len(), 1);
}

#[test]
fn test_removal_range() {
    let mut builder = engine();
    let mut world = CollisionWorld::default();
    let id = world.insert(BlockType::Cube, Vec3::new(0.0, 0.5, -40.0), Vec3::ZERO);
    builder.set_tool(ToolMode::Remove);

    // Face at 39.5, beyond the 30 m reach
    let far = Ray::new(Vec3::new(0.0, 0.5, 0.0), Vec3::NEG_Z);
    assert_eq!(builder.remove(&far, &mut world), Ok(None));
    assert_eq!(world.len(), 1);

    let near = Ray::new(Vec3::new(0.0, 0.5, -20.0), Vec3::NEG_Z);
    let removed = builder.remove(&near, &mut world).unwrap().unwrap();
    assert_eq!(removed.id, id);
    assert!(world.is_empty());
    assert!(builder.take_commands().contains(&SceneCommand::Despawn { id }));
    assert!(builder.take_save_request());
}

#[test]
fn test_remove_ignores_ground() {
    let mut builder = engine();
    let mut world = CollisionWorld::default();
    builder.set_tool(ToolMode::Remove);
    assert_eq!(builder.remove(&down_at(0.0, 0.0), &mut world), Ok(None));
}

#[test]
fn test_highlight_tracks_pointer() {
    let mut builder = engine();
    let mut world = CollisionWorld::default();
    let a = world.insert(BlockType::Cube, Vec3::new(0.0, 0.5, 0.0), Vec3::ZERO);
    builder.set_tool(ToolMode::Remove);
    builder.take_commands();

    assert_eq!(builder.highlight_for_removal(&down_at(0.0, 0.0), &world), Some(a));
    assert_eq!(
        builder.take_commands(),
        vec![
            SceneCommand::ClearHighlights,
            SceneCommand::Highlight {
                id: a,
                color: REMOVAL_HIGHLIGHT_COLOR,
            },
        ]
    );

    // Pointer moves off the block: everything restored
    assert_eq!(builder.highlight_for_removal(&down_at(5.0, 5.0), &world), None);
    assert_eq!(builder.highlighted(), None);
    assert_eq!(builder.take_commands(), vec![SceneCommand::ClearHighlights]);
}

#[test]
fn test_switching_tool_clears_transient_state() {
    let mut builder = engine();
    let world = CollisionWorld::default();
    builder.update_preview(&down_at(0.0, 0.0), &world);
    assert!(builder.preview().is_some());

    builder.set_tool(ToolMode::Remove);
    assert_eq!(builder.preview(), None);
    assert_eq!(builder.tool(), ToolMode::Remove);
}
