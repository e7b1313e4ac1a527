//! Course Sim - Headless Course Runner
//!
//! Loads a course JSON file, checks it can be published, then plays it
//! through a [`GameSession`] with a scripted runner: hold forward, jump on a
//! fixed beat. Player events are logged and every message the session would
//! post to the host is printed as JSON, one per line.
//!
//! Run with: `cargo run --bin course_sim -- <course.json> [seconds] [config.json]`
//!
//! Set `RUST_LOG=debug` for per-message logging.

use std::fs;
use std::process::ExitCode;

use parkour_engine::game::course::{deserialize, validate_for_export};
use parkour_engine::game::{GameConfig, GameSession, PlayerEvent, SessionMode};

// ============================================================================
// SCRIPT
// ============================================================================

const FRAME_DT: f32 = 1.0 / 60.0;
const DEFAULT_SECONDS: f32 = 20.0;
/// Seconds between scripted jumps
const JUMP_EVERY: f32 = 1.2;
/// Seconds the jump key stays down
const JUMP_HOLD: f32 = 0.1;

struct Args {
    course_path: String,
    seconds: f32,
    config_path: Option<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = std::env::args().skip(1);
    let course_path = args
        .next()
        .ok_or_else(|| "usage: course_sim <course.json> [seconds] [config.json]".to_string())?;
    let seconds = match args.next() {
        Some(s) => s.parse::<f32>().map_err(|e| format!("bad seconds '{}': {}", s, e))?,
        None => DEFAULT_SECONDS,
    };
    Ok(Args {
        course_path,
        seconds,
        config_path: args.next(),
    })
}

fn load_config(path: Option<&str>) -> Result<GameConfig, String> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let json = fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
    GameConfig::from_json_str(&json).map_err(|e| format!("{}: {}", path, e))
}

fn run(args: Args) -> Result<bool, String> {
    let config = load_config(args.config_path.as_deref())?;
    let json = fs::read_to_string(&args.course_path).map_err(|e| format!("{}: {}", args.course_path, e))?;

    let loaded = deserialize(&json).map_err(|e| e.to_string())?;
    for warning in &loaded.warnings {
        log::warn!("{}", warning);
    }
    validate_for_export(&loaded.course).map_err(|e| e.to_string())?;
    log::info!(
        "'{}' ({}, {} blocks)",
        loaded.course.name,
        loaded.course.template,
        loaded.course.blocks.len()
    );

    let mut session = GameSession::new(config, None);
    session.load_course_json(&json, None).map_err(|e| e.to_string())?;
    session.start_game().map_err(|e| e.to_string())?;
    if session.mode() != SessionMode::Play {
        return Err("session did not enter play mode".into());
    }

    session.key_event("KeyW", true);
    let frames = (args.seconds / FRAME_DT).ceil() as u32;
    let mut finished = false;
    let mut jump_down = false;

    for frame in 0..frames {
        let t = frame as f32 * FRAME_DT;
        let want_jump = t % JUMP_EVERY < JUMP_HOLD;
        if want_jump != jump_down {
            session.key_event("Space", want_jump);
            jump_down = want_jump;
        }

        for event in session.tick(FRAME_DT) {
            match event {
                PlayerEvent::LevelComplete { position } => {
                    log::info!("{:6.2}s finish reached at {:?}", t, position);
                    finished = true;
                }
                PlayerEvent::Jumped | PlayerEvent::Landed => log::debug!("{:6.2}s {:?}", t, event),
                other => log::info!("{:6.2}s {:?}", t, other),
            }
        }

        for message in session.drain_outbox() {
            match message.to_json() {
                Ok(line) => println!("{}", line),
                Err(e) => log::warn!("{}", e),
            }
        }

        if finished {
            break;
        }
    }

    for notice in session.notices() {
        log::info!("[{:?}] {}", notice.level, notice.text);
    }
    Ok(finished)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            log::warn!("Runner did not reach the finish");
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::from(2)
        }
    }
}
