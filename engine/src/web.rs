//! Browser Entry Point
//!
//! Exposes a [`GameSession`] to the host page through `wasm-bindgen`. The page
//! forwards host messages and input, calls `tick` every animation frame and
//! posts whatever `drainOutbox` returns back to the host.
//!
//! The builder autosave goes to the web view's `localStorage`, so it survives
//! reloads. Sandboxes without it fall back to an in-memory store.

use glam::Vec3;
use wasm_bindgen::prelude::*;

use crate::camera::Ray;
use crate::game::blocks::BlockType;
use crate::game::builder::ToolMode;
use crate::game::course::{CourseStateStore, CourseStorage, MemoryStorage};
use crate::game::error::StorageError;
use crate::game::{GameConfig, GameSession};

/// Storage key for the builder autosave.
const AUTOSAVE_KEY: &str = "parkour:builder";

/// `window.localStorage` behind the course storage trait.
pub struct BrowserStorage {
    storage: web_sys::Storage,
}

fn js_error(e: JsValue) -> StorageError {
    StorageError::Unavailable(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

impl BrowserStorage {
    /// `None` when the page has no window or storage is blocked.
    pub fn open() -> Option<Self> {
        let window = web_sys::window()?;
        match window.local_storage() {
            Ok(Some(storage)) => Some(Self { storage }),
            Ok(None) => None,
            Err(e) => {
                log::warn!("localStorage unavailable: {:?}", e);
                None
            }
        }
    }
}

impl CourseStorage for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(js_error)
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key).map_err(js_error)
    }
}

fn autosave_store() -> CourseStateStore {
    let storage: Box<dyn CourseStorage> = match BrowserStorage::open() {
        Some(browser) => Box::new(browser),
        None => {
            log::warn!("Builder autosave will not survive a reload");
            Box::new(MemoryStorage::new())
        }
    };
    CourseStateStore::new(storage, AUTOSAVE_KEY)
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub struct WebGame {
    session: GameSession,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game. `config_json` may override any subset of the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> WebGame {
        let config = match config_json.as_deref().map(GameConfig::from_json_str) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                log::warn!("Ignoring bad config override: {}", e);
                GameConfig::default()
            }
            None => GameConfig::default(),
        };
        WebGame {
            session: GameSession::new(config, Some(autosave_store())),
        }
    }

    #[wasm_bindgen(js_name = handleMessage)]
    pub fn handle_message(&mut self, raw: &str) {
        self.session.handle_message(raw);
    }

    /// Load the builder autosave now. Returns whether one was restored.
    #[wasm_bindgen(js_name = restoreAutosave)]
    pub fn restore_autosave(&mut self) -> bool {
        self.session.restore_autosave()
    }

    pub fn tick(&mut self, delta_time: f32) {
        self.session.tick(delta_time);
    }

    #[wasm_bindgen(js_name = keyEvent)]
    pub fn key_event(&mut self, code: &str, pressed: bool) {
        self.session.key_event(code, pressed);
    }

    #[wasm_bindgen(js_name = releaseKeys)]
    pub fn release_keys(&mut self) {
        self.session.release_keys();
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, ox: f32, oy: f32, oz: f32, dx: f32, dy: f32, dz: f32) {
        let ray = Ray::new(Vec3::new(ox, oy, oz), Vec3::new(dx, dy, dz));
        self.session.pointer_move(&ray);
    }

    #[wasm_bindgen(js_name = pointerClick)]
    pub fn pointer_click(&mut self, ox: f32, oy: f32, oz: f32, dx: f32, dy: f32, dz: f32) {
        let ray = Ray::new(Vec3::new(ox, oy, oz), Vec3::new(dx, dy, dz));
        self.session.pointer_click(&ray);
    }

    /// Pointer moved to a pixel of a `width` x `height` canvas.
    #[wasm_bindgen(js_name = pointerMoveScreen)]
    pub fn pointer_move_screen(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let ray = self.session.pointer_ray(x, y, width, height);
        self.session.pointer_move(&ray);
    }

    #[wasm_bindgen(js_name = pointerClickScreen)]
    pub fn pointer_click_screen(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let ray = self.session.pointer_ray(x, y, width, height);
        self.session.pointer_click(&ray);
    }

    /// Builder camera moved; rotation is Euler degrees (pitch, yaw, roll).
    #[wasm_bindgen(js_name = setCameraPose)]
    pub fn set_camera_pose(&mut self, px: f32, py: f32, pz: f32, pitch: f32, yaw: f32, roll: f32) {
        self.session
            .set_camera_pose(Vec3::new(px, py, pz), Vec3::new(pitch, yaw, roll));
    }

    #[wasm_bindgen(js_name = setTool)]
    pub fn set_tool(&mut self, name: &str) -> bool {
        match ToolMode::from_name(name) {
            Some(tool) => {
                self.session.set_tool(tool);
                true
            }
            None => false,
        }
    }

    #[wasm_bindgen(js_name = selectBlockType)]
    pub fn select_block_type(&mut self, tag: &str) -> bool {
        match BlockType::from_tag(tag) {
            Ok(block_type) => {
                self.session.select_block_type(block_type);
                true
            }
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        }
    }

    /// Play camera as `[px, py, pz, tx, ty, tz]`: eye position, then the
    /// point it looks at. Only moves while a run is in progress.
    #[wasm_bindgen(js_name = cameraPose)]
    pub fn camera_pose(&self) -> Vec<f32> {
        let camera = self.session.camera();
        let (p, t) = (camera.position, camera.target);
        vec![p.x, p.y, p.z, t.x, t.y, t.z]
    }

    /// Outbound host messages as a JSON array.
    #[wasm_bindgen(js_name = drainOutbox)]
    pub fn drain_outbox(&mut self) -> String {
        serde_json::to_string(&self.session.drain_outbox()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Renderer commands as a JSON array.
    #[wasm_bindgen(js_name = drainScene)]
    pub fn drain_scene(&mut self) -> String {
        serde_json::to_string(&self.session.drain_scene_commands()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Texts of the notices currently on screen, as a JSON array.
    pub fn notices(&self) -> String {
        let texts: Vec<&str> = self.session.notices().iter().map(|n| n.text.as_str()).collect();
        serde_json::to_string(&texts).unwrap_or_else(|_| "[]".to_string())
    }
}
