//! Game Session
//!
//! Top-level controller that owns every piece of runtime state: the course,
//! its collision world, the builder, the player body and the host bridge.
//! The host drives it one call at a time (messages, input, `tick`), so all
//! mutation happens inside those calls and nothing is shared.
//!
//! # Modes
//!
//! - `Menu`: nothing simulated, waiting for the host
//! - `Builder`: pointer input edits the course, autosave runs
//! - `Play`: the physics stepper drives the body through the course

use glam::Vec3;
use serde_json::Value;

use crate::camera::{FollowCamera, Ray, camera_basis, screen_to_ray};
use crate::game::blocks::{BlockId, BlockType};
use crate::game::bridge::{HostBridge, InboundMessage, OutboundMessage, RequestKind};
use crate::game::builder::{PlacementEngine, SceneCommand, ToolMode, block_type_from_hotkey};
use crate::game::config::GameConfig;
use crate::game::course::store::from_document;
use crate::game::course::{
    AutosaveTimer, Course, CourseBlock, CourseDocument, CourseStateStore, CourseTemplate, LoadedCourse, deserialize,
    serialize, validate_for_export,
};
use crate::game::error::{ActionRejected, BridgeError, CourseError, CourseResult, ExportRejected};
use crate::game::physics::CollisionWorld;
use crate::game::player::{AnimationState, DeathCause, PhysicsStepper, PlayerBody, PlayerEvent};
use crate::input::{KeyCode, KeyboardState};

/// Course id reported for courses the host did not name.
pub const LOCAL_COURSE_ID: &str = "local";

/// Vertical field of view of the builder camera (radians).
pub const BUILDER_FOV: f32 = std::f32::consts::FRAC_PI_3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Menu,
    Builder,
    Play,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Transient message shown to the player.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    /// Seconds left on screen
    pub remaining: f32,
}

pub struct GameSession {
    config: GameConfig,
    mode: SessionMode,
    course: Course,
    course_id: Option<String>,
    world: CollisionWorld,
    placement: PlacementEngine,
    stepper: PhysicsStepper,
    body: Option<PlayerBody>,
    keyboard: KeyboardState,
    camera: FollowCamera,
    store: Option<CourseStateStore>,
    /// Set until the autosave has been offered once or a course was loaded
    restore_pending: bool,
    autosave: AutosaveTimer,
    bridge: HostBridge,
    notices: Vec<Notice>,
    run_time: f32,
}

impl GameSession {
    /// Create a session and queue `webViewReady` for the host.
    pub fn new(config: GameConfig, store: Option<CourseStateStore>) -> Self {
        let ground = config.physics.ground_plane.then_some(config.physics.floor_height);
        let mut bridge = HostBridge::new(&config.bridge);
        bridge.announce_ready();

        Self {
            mode: SessionMode::Menu,
            course: Course::default(),
            course_id: None,
            world: CollisionWorld::new(ground),
            placement: PlacementEngine::new(&config.builder),
            stepper: PhysicsStepper::new(config.physics.clone()),
            body: None,
            keyboard: KeyboardState::new(),
            camera: FollowCamera::new(),
            restore_pending: store.is_some(),
            store,
            autosave: AutosaveTimer::new(config.builder.autosave_interval),
            bridge,
            notices: Vec::new(),
            run_time: 0.0,
            config,
        }
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn world(&self) -> &CollisionWorld {
        &self.world
    }

    pub fn placement(&self) -> &PlacementEngine {
        &self.placement
    }

    pub fn body(&self) -> Option<&PlayerBody> {
        self.body.as_ref()
    }

    pub fn camera(&self) -> &FollowCamera {
        &self.camera
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn course_id(&self) -> Option<&str> {
        self.course_id.as_deref()
    }

    /// Seconds spent in the current run.
    pub fn run_time(&self) -> f32 {
        self.run_time
    }

    /// Current course with its blocks taken from the live world.
    pub fn course(&self) -> Course {
        let mut course = self.course.clone();
        course.blocks = self.world.blocks().iter().map(CourseBlock::from).collect();
        course.selected_tool = self.placement.tool();
        course.selected_block_type = self.placement.selected_block_type();
        course.sync_markers();
        course
    }

    /// Take everything queued for the host.
    pub fn drain_outbox(&mut self) -> Vec<OutboundMessage> {
        self.bridge.drain_outbox()
    }

    /// Take queued renderer commands.
    pub fn drain_scene_commands(&mut self) -> Vec<SceneCommand> {
        self.placement.take_commands()
    }

    // ------------------------------------------------------------------
    // Host messages
    // ------------------------------------------------------------------

    /// Handle one raw host message. Malformed or unknown messages are logged
    /// and dropped.
    pub fn handle_message(&mut self, raw: &str) {
        match InboundMessage::parse(raw) {
            Ok(message) => self.dispatch(message),
            Err(e) => log::warn!("Ignoring host message: {}", e),
        }
    }

    pub fn dispatch(&mut self, message: InboundMessage) {
        log::debug!("Host message: {}", message.kind());
        match message {
            InboundMessage::LoadCourse { course_json, course_id } => {
                if let Err(e) = self.load_course_value(course_json, course_id) {
                    log::warn!("loadCourse failed: {}", e);
                    self.notify(NoticeLevel::Error, format!("Could not load course: {}", e));
                }
            }
            InboundMessage::StartGame => {
                if let Err(e) = self.start_game() {
                    self.notify(NoticeLevel::Warning, e.to_string());
                }
            }
            InboundMessage::StartBuilder { template } => self.start_builder(template),
            InboundMessage::ResetPlayer => self.reset_player(),
            InboundMessage::RequestFailed { request, message } => {
                let err = self.bridge.fail(request, message);
                self.report_bridge_error(err);
            }
            InboundMessage::RequestCompleted { request } => {
                if self.bridge.complete(request) && request == RequestKind::CourseCreated {
                    self.notify(NoticeLevel::Info, "Course published!");
                }
            }
        }
    }

    fn load_course_value(&mut self, course_json: Value, course_id: Option<String>) -> CourseResult<()> {
        let loaded = match course_json {
            Value::String(json) => deserialize(&json)?,
            value => {
                let doc: CourseDocument = serde_json::from_value(value)?;
                from_document(doc)?
            }
        };
        self.course_id = course_id;
        self.restore_pending = false;
        self.install_course(loaded);
        Ok(())
    }

    /// Replace the current course with a parsed one. The prior course is only
    /// dropped once parsing succeeded.
    pub fn load_course_json(&mut self, json: &str, course_id: Option<String>) -> CourseResult<()> {
        let loaded = deserialize(json)?;
        self.course_id = course_id;
        self.restore_pending = false;
        self.install_course(loaded);
        Ok(())
    }

    fn install_course(&mut self, loaded: LoadedCourse) {
        let LoadedCourse { course, warnings } = loaded;
        log::info!("Loaded course '{}' ({} blocks)", course.name, course.blocks.len());
        if !warnings.is_empty() {
            for warning in &warnings {
                log::warn!("Course load: {}", warning);
            }
            self.notify(
                NoticeLevel::Warning,
                format!("Course loaded with {} problem(s)", warnings.len()),
            );
        }

        self.placement.clear_transient();
        self.placement.push_command(SceneCommand::ClearAll);
        self.world
            .rebuild(course.blocks.iter().map(|b| (b.block_type, b.position, b.rotation)));
        for block in self.world.blocks() {
            self.placement.push_command(SceneCommand::spawn(block));
        }
        self.placement
            .restore_selection(course.selected_tool, course.selected_block_type);
        self.course = course;

        if self.mode == SessionMode::Play {
            self.spawn_player();
        }
    }

    /// Restore the builder autosave, if any. Corrupted saves are discarded.
    pub fn restore_autosave(&mut self) -> bool {
        self.restore_pending = false;
        let Some(store) = self.store.as_mut() else {
            return false;
        };
        match store.load() {
            Ok(Some(loaded)) => {
                self.install_course(loaded);
                true
            }
            Ok(None) => false,
            Err(e) => {
                log::warn!("Autosave restore failed: {}", e);
                if matches!(e, CourseError::InvalidCourseData(_)) {
                    self.notify(NoticeLevel::Warning, "Saved course was corrupted and has been reset");
                }
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Mode switches
    // ------------------------------------------------------------------

    /// Enter play mode on the current course.
    pub fn start_game(&mut self) -> Result<(), ExportRejected> {
        let course = self.course();
        validate_for_export(&course)?;

        if self.mode == SessionMode::Builder {
            self.flush_autosave();
        }
        self.placement.clear_transient();
        self.keyboard.reset();
        self.mode = SessionMode::Play;
        self.spawn_player();
        log::info!("Play started on '{}'", course.name);
        Ok(())
    }

    /// Enter the builder. A template starts a fresh course. `None` edits the
    /// current one, which on the first entry of a session is the autosave if
    /// one exists and no course was loaded.
    pub fn start_builder(&mut self, template: Option<CourseTemplate>) {
        self.leave_play();
        match template {
            Some(template) => {
                let course = Course::from_template(template);
                self.course_id = None;
                self.restore_pending = false;
                self.install_course(LoadedCourse {
                    course,
                    warnings: Vec::new(),
                });
            }
            None if self.restore_pending => {
                if self.restore_autosave() {
                    log::info!("Restored builder autosave");
                }
            }
            None => {}
        }
        self.mode = SessionMode::Builder;
        self.autosave.reset();
        log::info!("Builder started ({})", self.course.template);
    }

    /// Explicit reset: back to the spawn point with a fresh run.
    pub fn reset_player(&mut self) {
        if self.mode != SessionMode::Play {
            return;
        }
        self.spawn_player();
    }

    fn spawn_player(&mut self) {
        let course = self.course();
        let spawn = course.spawn_point();
        let to_finish = course.finish_position - spawn;
        let facing = if to_finish.x.abs() + to_finish.z.abs() > 1e-4 {
            to_finish.x.atan2(-to_finish.z)
        } else {
            0.0
        };

        self.body = Some(PlayerBody::new(spawn, facing));
        self.camera.snap_to(spawn, facing);
        self.bridge.reset_position();
        self.keyboard.reset();
        self.run_time = 0.0;
    }

    /// Drop the body and any pending respawn.
    fn leave_play(&mut self) {
        if self.body.take().is_some() {
            log::debug!("Play session ended");
        }
        self.keyboard.reset();
        self.run_time = 0.0;
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Key event using DOM `KeyboardEvent.code` names.
    pub fn key_event(&mut self, code: &str, pressed: bool) {
        let key = KeyCode::from_dom_code(code);
        match self.mode {
            SessionMode::Play => {
                self.keyboard.handle_key(key, pressed);
            }
            SessionMode::Builder => {
                self.keyboard.handle_key(key, pressed);
                if !pressed {
                    return;
                }
                if self.keyboard.ctrl {
                    if let Some(block_type) = block_type_from_hotkey(key) {
                        self.select_block_type(block_type);
                    }
                } else if let Some(tool) = ToolMode::from_hotkey(key) {
                    self.set_tool(tool);
                } else if key == KeyCode::Enter {
                    if let Err(e) = self.publish() {
                        self.notify(NoticeLevel::Warning, e.to_string());
                    }
                }
            }
            SessionMode::Menu => {}
        }
    }

    /// Lose all held keys (focus loss).
    pub fn release_keys(&mut self) {
        self.keyboard.reset();
    }

    pub fn set_tool(&mut self, tool: ToolMode) {
        self.placement.set_tool(tool);
        self.autosave.mark_dirty();
    }

    pub fn select_block_type(&mut self, block_type: BlockType) {
        self.placement.select_block_type(block_type);
        self.autosave.mark_dirty();
    }

    /// Builder camera moved.
    pub fn set_camera_pose(&mut self, position: Vec3, rotation: Vec3) {
        if self.mode != SessionMode::Builder {
            return;
        }
        if self.course.camera.position != position || self.course.camera.rotation != rotation {
            self.course.camera.position = position;
            self.course.camera.rotation = rotation;
            self.autosave.mark_dirty();
        }
    }

    /// World ray under a screen pixel, seen from the builder camera.
    ///
    /// The camera pose stores pitch in `rotation.x` and yaw in `rotation.y`,
    /// both in degrees.
    pub fn pointer_ray(&self, screen_x: f32, screen_y: f32, width: f32, height: f32) -> Ray {
        let pose = self.course.camera;
        let (forward, right) = camera_basis(pose.rotation.y.to_radians(), pose.rotation.x.to_radians());
        screen_to_ray(
            screen_x,
            screen_y,
            width.max(1.0),
            height.max(1.0),
            pose.position,
            forward,
            right,
            BUILDER_FOV,
        )
    }

    /// Pointer moved over the scene (builder only).
    pub fn pointer_move(&mut self, ray: &Ray) {
        if self.mode != SessionMode::Builder {
            return;
        }
        match self.placement.tool() {
            ToolMode::Build => {
                self.placement.update_preview(ray, &self.world);
            }
            ToolMode::Remove => {
                self.placement.highlight_for_removal(ray, &self.world);
            }
            ToolMode::Camera => {}
        }
    }

    /// Pointer clicked (builder only): place or remove depending on the tool.
    pub fn pointer_click(&mut self, ray: &Ray) -> Option<BlockId> {
        if self.mode != SessionMode::Builder {
            return None;
        }
        let result = match self.placement.tool() {
            ToolMode::Build => {
                self.placement.update_preview(ray, &self.world);
                self.placement.place_selected(&mut self.world).map(Some)
            }
            ToolMode::Remove => self
                .placement
                .remove(ray, &mut self.world)
                .map(|removed| removed.map(|b| b.id)),
            ToolMode::Camera => Ok(None),
        };
        match result {
            Ok(id) => id,
            Err(rejected) => {
                self.reject(rejected);
                None
            }
        }
    }

    /// Place the selected block at the current preview.
    pub fn place(&mut self) -> Result<BlockId, ActionRejected> {
        let result = self.placement.place_selected(&mut self.world);
        if let Err(rejected) = &result {
            self.reject(rejected.clone());
        }
        result
    }

    fn reject(&mut self, rejected: ActionRejected) {
        log::info!("Builder action rejected: {}", rejected);
        self.notify(NoticeLevel::Warning, rejected.to_string());
    }

    /// Validate the course and hand it to the host for publishing.
    pub fn publish(&mut self) -> Result<(), ExportRejected> {
        let course = self.course();
        validate_for_export(&course)?;
        let course_json = serialize(&course).map_err(|e| ExportRejected::new(e.to_string()))?;
        let message = OutboundMessage::CourseCreated {
            name: course.name.clone(),
            template: course.template,
            course_json,
        };
        if let Err(e) = self.bridge.request(message) {
            self.report_bridge_error(e);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Frame
    // ------------------------------------------------------------------

    /// Advance one frame.
    pub fn tick(&mut self, delta_time: f32) -> Vec<PlayerEvent> {
        let delta_time = if delta_time.is_finite() { delta_time.max(0.0) } else { 0.0 };

        let events = match self.mode {
            SessionMode::Builder => {
                self.tick_builder(delta_time);
                Vec::new()
            }
            SessionMode::Play => self.tick_play(delta_time),
            SessionMode::Menu => Vec::new(),
        };

        for err in self.bridge.tick(delta_time) {
            self.report_bridge_error(err);
        }
        self.notices.retain_mut(|notice| {
            notice.remaining -= delta_time;
            notice.remaining > 0.0
        });
        events
    }

    fn tick_builder(&mut self, delta_time: f32) {
        if self.placement.take_save_request() {
            self.autosave.request_now();
        }
        if self.autosave.tick(delta_time) {
            self.save_now();
        }
    }

    fn tick_play(&mut self, delta_time: f32) -> Vec<PlayerEvent> {
        let Some(body) = self.body.as_mut() else {
            return Vec::new();
        };
        let input = self.keyboard.movement;
        let was_complete = body.is_level_complete;
        let frame = self.stepper.frame_time(delta_time);
        let events = self.stepper.step(body, &input, frame, &self.world);

        if !body.is_level_complete && !body.is_dead {
            self.run_time += frame;
        }
        self.camera.update(body.position, body.facing, frame);
        let animation = AnimationState::for_body(body, input.is_sprinting());
        self.bridge.send_position(body.position, body.on_ground, animation);

        let mut completed = false;
        for event in &events {
            match event {
                PlayerEvent::LevelComplete { .. } if !was_complete => completed = true,
                PlayerEvent::Died(DeathCause::FellOutOfWorld) => {
                    self.notices.push(Notice {
                        level: NoticeLevel::Info,
                        text: "You fell!".into(),
                        remaining: self.config.builder.notice_duration,
                    });
                }
                _ => {}
            }
        }
        if completed {
            self.complete_level();
        }
        events
    }

    fn complete_level(&mut self) {
        let time = self.run_time;
        log::info!("Course complete in {:.2}s", time);
        self.bridge.send(OutboundMessage::LevelComplete);
        let course_id = self.course_id.clone().unwrap_or_else(|| LOCAL_COURSE_ID.to_string());
        if let Err(e) = self.bridge.request(OutboundMessage::CourseComplete { course_id, time }) {
            self.report_bridge_error(e);
        }
        self.notify(NoticeLevel::Info, format!("Finished in {:.2}s!", time));
    }

    fn flush_autosave(&mut self) {
        if self.placement.take_save_request() {
            self.autosave.request_now();
        }
        if self.autosave.is_dirty() {
            self.save_now();
        }
    }

    fn save_now(&mut self) {
        let course = self.course();
        let Some(store) = self.store.as_mut() else {
            self.autosave.record_success();
            return;
        };
        match store.save(&course) {
            Ok(()) => self.autosave.record_success(),
            Err(e) => {
                self.autosave.record_failure();
                log::warn!(
                    "Autosave failed ({} in a row), retrying next window: {}",
                    self.autosave.consecutive_failures(),
                    e
                );
            }
        }
    }

    fn report_bridge_error(&mut self, err: BridgeError) {
        log::warn!("Host bridge: {}", err);
        let text = match &err {
            BridgeError::Timeout(RequestKind::CourseComplete) | BridgeError::HostFailure {
                request: RequestKind::CourseComplete,
                ..
            } => "Couldn't submit your time. Your run still counts locally.".to_string(),
            BridgeError::Timeout(RequestKind::CourseCreated) | BridgeError::HostFailure {
                request: RequestKind::CourseCreated,
                ..
            } => "Couldn't publish the course. Try again.".to_string(),
            BridgeError::RequestPending(kind) => format!("Still waiting on {}", kind),
            other => other.to_string(),
        };
        self.notify(NoticeLevel::Error, text);
    }

    fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notices.push(Notice {
            level,
            text: text.into(),
            remaining: self.config.builder.notice_duration,
        });
    }
}
