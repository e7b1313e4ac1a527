//! Physics Stepper
//!
//! Advances a [`PlayerBody`] one frame against a [`CollisionWorld`].
//!
//! # Tick Order
//!
//! 1. Dead bodies only count down to respawn; finished bodies stay put.
//! 2. Turn, jump, then gravity (jump gravity while rising with jump held,
//!    fall gravity otherwise), clamped to terminal speed.
//! 3. Horizontal move along facing/strafe, resolved with a fan of probe rays
//!    and wall sliding.
//! 4. Vertical move: land on a surface within one step, or stop under a
//!    ceiling.
//! 5. Floor fallback, then zone checks on the resolved position, then the
//!    fall-out guard.
//!
//! Large frame times are split into substeps so a slow frame cannot tunnel
//! through thin platforms.

use glam::{Quat, Vec3};

use super::body::PlayerBody;
use crate::game::blocks::{BlockType, Zone};
use crate::game::config::PhysicsConfig;
use crate::game::physics::CollisionWorld;
use crate::input::MovementKeys;
use crate::physics::Aabb;

/// Longest simulated interval per substep (seconds).
pub const MAX_SUBSTEP: f32 = 1.0 / 30.0;

/// Slack for surface contact comparisons (m).
const CONTACT_EPSILON: f32 = 1e-3;

/// Why the body died.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    KillZone,
    FellOutOfWorld,
}

/// Something that happened to the body during a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerEvent {
    Jumped,
    Landed,
    Died(DeathCause),
    Respawned { position: Vec3 },
    /// Fired once per completion
    LevelComplete { position: Vec3 },
}

/// Heuristic character physics.
#[derive(Debug, Clone)]
pub struct PhysicsStepper {
    config: PhysicsConfig,
    /// Probe yaw offsets (radians), center ray first then alternating outward
    probe_offsets: Vec<f32>,
    /// Wall ray heights above the feet, knee first
    ray_heights: Vec<f32>,
}

impl PhysicsStepper {
    pub fn new(config: PhysicsConfig) -> Self {
        let probe_offsets = probe_fan(config.probe_rays, config.probe_spread_degrees.to_radians());
        let knee = config.step_height + CONTACT_EPSILON;
        let head = (config.player_height - CONTACT_EPSILON).max(knee);
        let ray_heights = ray_levels(knee, head, config.ray_spacing);
        Self {
            config,
            probe_offsets,
            ray_heights,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// The body's collision box at its current position.
    pub fn body_box(&self, body: &PlayerBody) -> Aabb {
        body.aabb(self.config.player_radius, self.config.player_height)
    }

    /// Advance `body` by `delta_time` seconds, at most `max_frame_time`.
    pub fn step(
        &self,
        body: &mut PlayerBody,
        input: &MovementKeys,
        delta_time: f32,
        world: &CollisionWorld,
    ) -> Vec<PlayerEvent> {
        let mut events = Vec::new();
        if !delta_time.is_finite() || delta_time <= 0.0 {
            return events;
        }

        let frame = self.frame_time(delta_time);
        let substeps = (frame / MAX_SUBSTEP).ceil().max(1.0) as u32;
        let dt = frame / substeps as f32;
        for _ in 0..substeps {
            self.substep(body, input, dt, world, &mut events);
        }
        events
    }

    /// Simulated length of a frame: stalls (a background tab, a debugger
    /// pause) are cut to `max_frame_time`.
    pub fn frame_time(&self, delta_time: f32) -> f32 {
        if !delta_time.is_finite() || delta_time <= 0.0 {
            return 0.0;
        }
        delta_time.min(self.config.max_frame_time.max(MAX_SUBSTEP))
    }

    fn substep(
        &self,
        body: &mut PlayerBody,
        input: &MovementKeys,
        dt: f32,
        world: &CollisionWorld,
        events: &mut Vec<PlayerEvent>,
    ) {
        if body.is_level_complete {
            body.horizontal_speed = 0.0;
            return;
        }
        if body.is_dead {
            body.respawn_timer -= dt;
            if body.respawn_timer <= 0.0 {
                self.respawn(body);
                events.push(PlayerEvent::Respawned {
                    position: body.position,
                });
            }
            return;
        }

        let cfg = &self.config;

        body.facing += input.turn_axis() as f32 * cfg.turn_rate * dt;

        if input.jump && body.on_ground {
            body.vertical_velocity = cfg.jump_velocity;
            body.on_ground = false;
            body.is_jumping = true;
            events.push(PlayerEvent::Jumped);
        }

        let gravity = if body.vertical_velocity > 0.0 && input.jump && body.is_jumping {
            cfg.jump_gravity
        } else {
            cfg.fall_gravity
        };
        body.vertical_velocity = (body.vertical_velocity - gravity * dt).max(-cfg.terminal_velocity);

        let intent = body.forward() * input.forward_axis() as f32 + body.right() * input.strafe_axis() as f32;
        let intent = intent.normalize_or_zero();
        let speed = if input.is_sprinting() {
            cfg.walk_speed * cfg.sprint_multiplier
        } else {
            cfg.walk_speed
        };
        let moved = self.resolve_horizontal(body.position, intent * speed * dt, world);
        body.position += moved;
        body.horizontal_speed = moved.length() / dt;

        self.resolve_vertical(body, dt, world, events);

        if let Some(floor) = world.ground_height() {
            if body.position.y < floor {
                body.position.y = floor;
                self.land(body, events);
            }
        }

        let zones = world.zones_at(&self.body_box(body));
        if zones.contains(&Zone::Finish) {
            body.is_level_complete = true;
            body.vertical_velocity = 0.0;
            body.horizontal_speed = 0.0;
            log::info!(
                "Level complete at ({:.2}, {:.2}, {:.2})",
                body.position.x,
                body.position.y,
                body.position.z
            );
            events.push(PlayerEvent::LevelComplete {
                position: body.position,
            });
            return;
        }
        if zones.contains(&Zone::Kill) {
            self.kill(body, DeathCause::KillZone, events);
            return;
        }

        if body.position.y < cfg.fall_threshold {
            self.kill(body, DeathCause::FellOutOfWorld, events);
        }
    }

    /// Clip a horizontal move against solid blocks.
    ///
    /// A wall ahead turns the move into a slide along the wall, scaled by the
    /// slide factor. Each slide is re-probed; a move still blocked after the
    /// configured passes (a concave corner) is cancelled. Finally, a move that
    /// would end inside a solid is rejected outright.
    pub fn resolve_horizontal(&self, feet: Vec3, motion: Vec3, world: &CollisionWorld) -> Vec3 {
        let cfg = &self.config;
        let mut motion = Vec3::new(motion.x, 0.0, motion.z);
        if motion.length_squared() < 1e-12 {
            return Vec3::ZERO;
        }

        let mut pass = 0;
        while let Some(normal) = self.probe_walls(feet, motion, world) {
            if pass >= cfg.slide_passes {
                return Vec3::ZERO;
            }
            pass += 1;

            let tangent = motion - normal * motion.dot(normal);
            motion = tangent * cfg.slide_factor;
            if motion.length_squared() < 1e-10 {
                return Vec3::ZERO;
            }
        }

        // Lifted by a step so low ledges are walked onto, not walled off
        let lift = Vec3::Y * cfg.step_height;
        let body_height = (cfg.player_height - cfg.step_height).max(CONTACT_EPSILON);
        let current = Aabb::from_feet(feet + lift, cfg.player_radius, body_height);
        if !world.overlaps_solid(&current.translated(motion)) || world.overlaps_solid(&current) {
            return motion;
        }

        // A solid the probes passed over: slide along the face the box meets
        let Some(normal) = contact_normal(&current, motion, world) else {
            return Vec3::ZERO;
        };
        let slid = (motion - normal * motion.dot(normal)) * cfg.slide_factor;
        if slid.length_squared() < 1e-10 || world.overlaps_solid(&current.translated(slid)) {
            return Vec3::ZERO;
        }
        slid
    }

    /// Nearest wall the move runs into, as a horizontal unit normal.
    ///
    /// Rays are cast from knee height (just above a step) up to the head,
    /// no more than `ray_spacing` apart.
    /// Hits on faces the move does not push into are ignored so the body can
    /// run alongside a wall. Ties go to the center ray, then the left side.
    fn probe_walls(&self, feet: Vec3, motion: Vec3, world: &CollisionWorld) -> Option<Vec3> {
        let cfg = &self.config;
        let direction = motion.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }
        let reach = cfg.player_radius + motion.length() + cfg.probe_skin;
        let triggers = BlockType::trigger_types();

        let mut nearest: Option<(f32, Vec3)> = None;
        for &height in &self.ray_heights {
            let origin = feet + Vec3::Y * height;
            for &offset in &self.probe_offsets {
                let ray = Quat::from_rotation_y(offset) * direction;
                let Some(hit) = world.raycast_blocks(origin, ray, &triggers) else {
                    continue;
                };
                if hit.distance() > reach {
                    continue;
                }
                let normal = Vec3::new(hit.normal().x, 0.0, hit.normal().z).normalize_or_zero();
                if normal == Vec3::ZERO || motion.dot(normal) >= -1e-6 {
                    continue;
                }
                if nearest.is_none_or(|(distance, _)| hit.distance() < distance) {
                    nearest = Some((hit.distance(), normal));
                }
            }
        }
        nearest.map(|(_, normal)| normal)
    }

    fn resolve_vertical(&self, body: &mut PlayerBody, dt: f32, world: &CollisionWorld, events: &mut Vec<PlayerEvent>) {
        let cfg = &self.config;
        let feet = body.position;
        let dy = body.vertical_velocity * dt;
        let r = cfg.player_radius;

        if dy <= 0.0 {
            let reach_top = feet.y + cfg.step_height;
            let sweep = Aabb::new(
                Vec3::new(feet.x - r, feet.y + dy - CONTACT_EPSILON, feet.z - r),
                Vec3::new(feet.x + r, reach_top, feet.z + r),
            );
            let block_top = world
                .box_overlaps(&sweep, &BlockType::trigger_types())
                .into_iter()
                .map(|b| b.aabb().max.y)
                .filter(|top| *top <= reach_top + CONTACT_EPSILON)
                .reduce(f32::max);
            let ground_top = world
                .ground_height()
                .filter(|g| *g >= sweep.min.y && *g <= reach_top);
            let surface = match (block_top, ground_top) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            };

            match surface {
                Some(top) => {
                    body.position.y = top;
                    self.land(body, events);
                }
                None => {
                    body.position.y += dy;
                    body.on_ground = false;
                }
            }
        } else {
            let head = feet.y + cfg.player_height;
            let sweep = Aabb::new(
                Vec3::new(feet.x - r, head - CONTACT_EPSILON, feet.z - r),
                Vec3::new(feet.x + r, head + dy, feet.z + r),
            );
            let ceiling = world
                .box_overlaps(&sweep, &BlockType::trigger_types())
                .into_iter()
                .map(|b| b.aabb().min.y)
                .filter(|bottom| *bottom >= head - CONTACT_EPSILON)
                .reduce(f32::min);

            match ceiling {
                Some(bottom) => {
                    body.position.y = bottom - cfg.player_height;
                    body.vertical_velocity = 0.0;
                }
                None => body.position.y += dy,
            }
            body.on_ground = false;
        }
    }

    fn land(&self, body: &mut PlayerBody, events: &mut Vec<PlayerEvent>) {
        if !body.on_ground {
            events.push(PlayerEvent::Landed);
        }
        body.on_ground = true;
        body.is_jumping = false;
        body.vertical_velocity = 0.0;
    }

    fn kill(&self, body: &mut PlayerBody, cause: DeathCause, events: &mut Vec<PlayerEvent>) {
        log::info!("Player died ({:?})", cause);
        body.is_dead = true;
        body.is_jumping = false;
        body.on_ground = false;
        body.vertical_velocity = 0.0;
        body.horizontal_speed = 0.0;
        body.respawn_timer = self.config.respawn_delay;
        events.push(PlayerEvent::Died(cause));
    }

    fn respawn(&self, body: &mut PlayerBody) {
        body.position = body.respawn_position;
        body.vertical_velocity = 0.0;
        body.horizontal_speed = 0.0;
        body.on_ground = false;
        body.is_jumping = false;
        body.is_dead = false;
        body.respawn_timer = 0.0;
    }
}

impl Default for PhysicsStepper {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

/// Evenly spaced heights from `low` to `high`, at most `spacing` apart.
fn ray_levels(low: f32, high: f32, spacing: f32) -> Vec<f32> {
    let span = high - low;
    if span <= CONTACT_EPSILON {
        return vec![low];
    }
    let gaps = if spacing > 0.0 {
        (span / spacing).ceil().clamp(1.0, 64.0) as usize
    } else {
        1
    };
    (0..=gaps).map(|i| low + span * i as f32 / gaps as f32).collect()
}

/// Outward horizontal normal of the first solid face `body` meets when moved
/// by `motion`. The face is on the axis whose gap closes last.
fn contact_normal(body: &Aabb, motion: Vec3, world: &CollisionWorld) -> Option<Vec3> {
    let target = body.translated(motion);
    let mut first: Option<(f32, Vec3)> = None;

    for block in world.box_overlaps(&target, &BlockType::trigger_types()) {
        let b = block.aabb();
        let mut contact: Option<(f32, Vec3)> = None;
        for (axis, unit) in [(0, Vec3::X), (2, Vec3::Z)] {
            let m = motion[axis];
            let entry = if m > 0.0 && body.max[axis] <= b.min[axis] + CONTACT_EPSILON {
                Some(((b.min[axis] - body.max[axis]) / m, -unit))
            } else if m < 0.0 && body.min[axis] >= b.max[axis] - CONTACT_EPSILON {
                Some(((body.min[axis] - b.max[axis]) / -m, unit))
            } else {
                None
            };
            if let Some((t, normal)) = entry {
                if contact.is_none_or(|(best, _)| t > best) {
                    contact = Some((t, normal));
                }
            }
        }
        if let Some((t, normal)) = contact {
            if first.is_none_or(|(best, _)| t < best) {
                first = Some((t, normal));
            }
        }
    }
    first.map(|(_, normal)| normal)
}

/// Yaw offsets for `count` rays across `spread` radians, center first.
fn probe_fan(count: usize, spread: f32) -> Vec<f32> {
    if count <= 1 {
        return vec![0.0];
    }
    let step = spread / (count - 1) as f32;
    let mut offsets: Vec<f32> = (0..count).map(|i| -spread * 0.5 + step * i as f32).collect();
    offsets.sort_by(|a, b| a.abs().total_cmp(&b.abs()).then(a.total_cmp(b)));
    offsets
}
