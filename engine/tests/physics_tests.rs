//! Physics Tests - Player Stepper Against a Block World
//!
//! Landing, zones, respawn and wall resolution for the heuristic character
//! physics.

use glam::Vec3;
use parkour_engine::game::blocks::BlockType;
use parkour_engine::game::config::PhysicsConfig;
use parkour_engine::game::physics::CollisionWorld;
use parkour_engine::game::player::{DeathCause, PhysicsStepper, PlayerBody, PlayerEvent};
use parkour_engine::input::MovementKeys;

const DT: f32 = 1.0 / 60.0;

fn idle() -> MovementKeys {
    MovementKeys::new()
}

// ============================================================================
// Landing
// ============================================================================

#[test]
fn test_drop_onto_platform_converges() {
    let stepper = PhysicsStepper::default();
    let gravity = stepper.config().fall_gravity;

    for h in [0.5f32, 2.0, 6.0] {
        let mut world = CollisionWorld::new(None);
        // Top face at y = 5.25
        world.insert(BlockType::Platform, Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO);
        let mut body = PlayerBody::new(Vec3::new(0.0, 5.25 + h, 0.0), 0.0);

        let mut ticks = 0;
        while !body.on_ground && ticks < 600 {
            stepper.step(&mut body, &idle(), DT, &world);
            ticks += 1;
        }

        assert!(body.on_ground, "never landed from h = {h}");
        assert!((body.position.y - 5.25).abs() < 1e-4);
        assert_eq!(body.vertical_velocity, 0.0);

        // Discrete integration may land up to one tick early
        let min_time = (2.0 * h / gravity).sqrt();
        assert!((ticks + 1) as f32 * DT >= min_time, "landed too early from h = {h}");

        // And stays there
        for _ in 0..60 {
            stepper.step(&mut body, &idle(), DT, &world);
        }
        assert!(body.on_ground);
        assert!((body.position.y - 5.25).abs() < 1e-4);
    }
}

#[test]
fn test_walks_off_edge_and_falls() {
    let stepper = PhysicsStepper::default();
    let mut world = CollisionWorld::new(None);
    world.insert(BlockType::Platform, Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO);
    let mut body = PlayerBody::new(Vec3::new(0.0, 5.25, 0.0), 0.0);

    let forward = MovementKeys {
        forward: true,
        ..Default::default()
    };
    for _ in 0..60 {
        stepper.step(&mut body, &forward, DT, &world);
    }
    assert!(!body.on_ground);
    assert!(body.position.y < 5.25);
}

// ============================================================================
// Zones
// ============================================================================

#[test]
fn test_finish_fires_once() {
    let stepper = PhysicsStepper::default();
    let mut world = CollisionWorld::default();
    world.insert(BlockType::Finish, Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO);
    let mut body = PlayerBody::new(Vec3::ZERO, 0.0);

    let forward = MovementKeys {
        forward: true,
        ..Default::default()
    };
    let first = stepper.step(&mut body, &forward, DT, &world);
    assert!(first.iter().any(|e| matches!(e, PlayerEvent::LevelComplete { .. })));
    assert!(body.is_level_complete);
    let finished_at = body.position;

    let repeats = (0..120)
        .flat_map(|_| stepper.step(&mut body, &forward, DT, &world))
        .filter(|e| matches!(e, PlayerEvent::LevelComplete { .. }))
        .count();
    assert_eq!(repeats, 0);
    // Frozen once finished
    assert_eq!(body.position, finished_at);
}

#[test]
fn test_finish_wins_over_kill() {
    let stepper = PhysicsStepper::default();
    let mut world = CollisionWorld::default();
    world.insert(BlockType::KillZone, Vec3::new(0.0, 0.25, 0.0), Vec3::ZERO);
    world.insert(BlockType::Finish, Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO);
    let mut body = PlayerBody::new(Vec3::ZERO, 0.0);

    let events = stepper.step(&mut body, &idle(), DT, &world);
    assert!(events.iter().any(|e| matches!(e, PlayerEvent::LevelComplete { .. })));
    assert!(!body.is_dead);
}

#[test]
fn test_kill_zone_respawns_at_respawn_point() {
    let stepper = PhysicsStepper::default();
    let mut world = CollisionWorld::default();
    world.insert(BlockType::KillZone, Vec3::new(0.0, 0.25, 0.0), Vec3::ZERO);

    let spawn = Vec3::new(5.0, 0.0, 0.0);
    let mut body = PlayerBody::new(spawn, 0.0);
    body.position = Vec3::ZERO;
    body.vertical_velocity = -3.0;

    let events = stepper.step(&mut body, &idle(), DT, &world);
    assert!(events.contains(&PlayerEvent::Died(DeathCause::KillZone)));
    assert!(body.is_dead);

    // Input is ignored while dead
    let held = MovementKeys {
        forward: true,
        jump: true,
        ..Default::default()
    };
    let mut respawned = None;
    for _ in 0..60 {
        for event in stepper.step(&mut body, &held, DT, &world) {
            if let PlayerEvent::Respawned { position } = event {
                respawned = Some(position);
            }
        }
        if respawned.is_some() {
            break;
        }
        assert_eq!(body.position, Vec3::ZERO);
    }

    assert_eq!(respawned, Some(spawn));
    assert_eq!(body.position, spawn);
    assert_eq!(body.vertical_velocity, 0.0);
    assert_eq!(body.horizontal_speed, 0.0);
    assert!(!body.is_dead);
}

#[test]
fn test_respawn_waits_for_delay() {
    let stepper = PhysicsStepper::default();
    let world = CollisionWorld::new(None);
    let mut body = PlayerBody::new(Vec3::ZERO, 0.0);
    body.position.y = stepper.config().fall_threshold - 1.0;

    stepper.step(&mut body, &idle(), DT, &world);
    assert!(body.is_dead);

    let ticks_to_respawn = (0..120)
        .position(|_| {
            stepper
                .step(&mut body, &idle(), DT, &world)
                .iter()
                .any(|e| matches!(e, PlayerEvent::Respawned { .. }))
        })
        .unwrap();
    let waited = (ticks_to_respawn + 1) as f32 * DT;
    assert!((waited - stepper.config().respawn_delay).abs() <= DT + 1e-4);
}

// ============================================================================
// Walls
// ============================================================================

/// Knee-high wall whose face toward the origin is at z = -0.5.
fn front_wall(world: &mut CollisionWorld) {
    world.insert(BlockType::Floor, Vec3::new(0.0, 0.5, -5.5), Vec3::ZERO);
}

/// Knee-high wall whose face toward the origin is at x = 0.5.
fn right_wall(world: &mut CollisionWorld) {
    world.insert(BlockType::Floor, Vec3::new(5.5, 0.5, 0.0), Vec3::ZERO);
}

#[test]
fn test_free_motion_is_unchanged() {
    let stepper = PhysicsStepper::default();
    let world = CollisionWorld::new(None);
    let motion = Vec3::new(0.1, 0.0, -0.1);
    assert_eq!(stepper.resolve_horizontal(Vec3::ZERO, motion, &world), motion);
}

#[test]
fn test_diagonal_into_wall_slides() {
    let stepper = PhysicsStepper::default();
    let mut world = CollisionWorld::new(None);
    front_wall(&mut world);

    let moved = stepper.resolve_horizontal(Vec3::ZERO, Vec3::new(0.1, 0.0, -0.1), &world);
    let expected = 0.1 * stepper.config().slide_factor;
    assert!((moved.x - expected).abs() < 1e-5);
    assert!(moved.z.abs() < 1e-6);
}

/// Slab spanning y 0.5..1.5, above the knee and below the head, face at z = -0.5.
fn chest_wall(world: &mut CollisionWorld) {
    world.insert(BlockType::Floor, Vec3::new(0.0, 1.0, -5.5), Vec3::ZERO);
}

#[test]
fn test_diagonal_into_chest_high_wall_slides() {
    let stepper = PhysicsStepper::default();
    let mut world = CollisionWorld::new(None);
    chest_wall(&mut world);

    let moved = stepper.resolve_horizontal(Vec3::ZERO, Vec3::new(0.1, 0.0, -0.1), &world);
    assert!((moved.x - 0.1 * stepper.config().slide_factor).abs() < 1e-5);
    assert!(moved.z.abs() < 1e-6);
}

#[test]
fn test_wall_between_sparse_rays_still_slides() {
    // Only knee and head rays: the chest wall is missed by every ray
    let stepper = PhysicsStepper::new(PhysicsConfig {
        ray_spacing: 10.0,
        ..Default::default()
    });
    let mut world = CollisionWorld::new(None);
    chest_wall(&mut world);

    let moved = stepper.resolve_horizontal(Vec3::ZERO, Vec3::new(0.1, 0.0, -0.2), &world);
    assert!((moved.x - 0.1 * stepper.config().slide_factor).abs() < 1e-5);
    assert_eq!(moved.z, 0.0);

    // Straight into it there is nothing left to slide
    assert_eq!(stepper.resolve_horizontal(Vec3::ZERO, Vec3::new(0.0, 0.0, -0.2), &world), Vec3::ZERO);
}

#[test]
fn test_concave_corner_cancels() {
    let stepper = PhysicsStepper::default();
    let mut world = CollisionWorld::new(None);
    front_wall(&mut world);
    right_wall(&mut world);

    let moved = stepper.resolve_horizontal(Vec3::ZERO, Vec3::new(0.1, 0.0, -0.1), &world);
    assert_eq!(moved, Vec3::ZERO);
}

#[test]
fn test_moving_away_from_wall_is_free() {
    let stepper = PhysicsStepper::default();
    let mut world = CollisionWorld::new(None);
    front_wall(&mut world);

    let motion = Vec3::new(0.05, 0.0, 0.1);
    assert_eq!(stepper.resolve_horizontal(Vec3::ZERO, motion, &world), motion);
}

#[test]
fn test_running_along_wall() {
    let stepper = PhysicsStepper::default();
    let mut world = CollisionWorld::default();
    // Face at z = -3, spanning x 0..10
    world.insert(BlockType::Floor, Vec3::new(5.0, 0.5, -8.0), Vec3::ZERO);

    let mut body = PlayerBody::new(Vec3::new(1.0, 0.0, 0.0), 0.0);
    let diagonal = MovementKeys {
        forward: true,
        strafe_right: true,
        ..Default::default()
    };
    for _ in 0..60 {
        stepper.step(&mut body, &diagonal, DT, &world);
    }

    let radius = stepper.config().player_radius;
    assert!(body.position.z >= -3.0 + radius - 1e-4);
    assert!(body.position.x > 3.5);
    assert!(body.on_ground);
}

#[test]
fn test_high_ledge_blocks() {
    let stepper = PhysicsStepper::default();
    let mut world = CollisionWorld::default();
    // Top at 1.0, well above the step height
    world.insert(BlockType::Cube, Vec3::new(0.0, 0.5, -3.0), Vec3::ZERO);

    let mut body = PlayerBody::new(Vec3::ZERO, 0.0);
    let forward = MovementKeys {
        forward: true,
        ..Default::default()
    };
    for _ in 0..90 {
        stepper.step(&mut body, &forward, DT, &world);
    }
    assert_eq!(body.position.y, 0.0);
    assert!(body.position.z > -2.5);
}
