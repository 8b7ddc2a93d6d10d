//! Line Jump entry point
//!
//! The browser build is driven from JS through `platform::web::WasmGame`.
//! Natively this runs a headless autopilot session and logs how it went.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use line_jump::Runner;
    use line_jump::consts::REFERENCE_FRAME_DT;
    use line_jump::persistence::MemoryStorage;
    use line_jump::sim::{GameEvent, GamePhase};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(42);
    log::info!("Line Jump (native) starting with seed {}", seed);

    let mut runner = Runner::new(Box::new(MemoryStorage::new()), seed);
    for level in runner.state().catalog.levels() {
        log::info!(
            "Level {} '{}': target {}, {:?}",
            level.id,
            level.name,
            level.target_score,
            level.difficulty
        );
    }
    runner.set_autopilot(true);
    runner.start_level(1);

    // Ten simulated minutes at most
    let max_frames = 60 * 60 * 10;
    let (mut jumps, mut pickups, mut hits) = (0u32, 0u32, 0u32);
    for _ in 0..max_frames {
        runner.step(REFERENCE_FRAME_DT);
        for event in runner.drain_events() {
            match event {
                GameEvent::Jump { .. } => jumps += 1,
                GameEvent::PickupCollected => pickups += 1,
                GameEvent::Hit { .. } => hits += 1,
                GameEvent::LevelComplete { level_id, score, .. } => {
                    log::info!("Cleared level {} with {} points", level_id, score);
                }
                _ => {}
            }
        }

        match runner.state().phase {
            GamePhase::LevelComplete => {
                if !runner.next_level() {
                    break;
                }
            }
            GamePhase::GameOver => break,
            _ => {}
        }
    }

    let state = runner.state();
    log::info!(
        "Finished on level {} ({:?}): score {}, lives {}, {} jumps, {} pickups, {} hits",
        state.level.id,
        state.phase,
        state.run.live_score,
        state.run.lives,
        jumps,
        pickups,
        hits
    );
    log::info!(
        "Best {}, career {}",
        runner.progress().best_score,
        runner.progress().career_score
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
