//! Fixed-timestep game loop scheduler.
//!
//! The loop decouples simulation correctness from frame-rate variance: wall
//! time is accumulated each iteration and consumed in fixed-size update
//! steps, so every update advances logical time by exactly the same interval
//! no matter how fast frames come. Rendering runs once per iteration at
//! whatever cadence the display supports; with vsync off the loop paces
//! itself by sleeping out the remainder of each frame slot in short slices.
//!
//! Window management, input devices, and actual rendering are collaborators
//! behind the [`WindowHost`] and [`GameLogic`] traits; the loop only
//! schedules them.

use crate::clock::Clock;
use crate::components::InputState;
use crate::stats::{LoopStats, Phase};
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Sleep slice used while waiting for the next frame slot.
const PACE_SLEEP: Duration = Duration::from_millis(1);

/// Fatal errors raised by the loop or its collaborators.
///
/// Every variant is fatal: the loop never retries or skips a failed
/// callback, it tears down and propagates.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Initialization failed; the loop never entered its running state.
    #[error("initialization failed: {0}")]
    Init(String),
    /// A fixed update failed mid-iteration.
    #[error("update failed: {0}")]
    Update(String),
    /// A render failed mid-iteration.
    #[error("render failed: {0}")]
    Render(String),
}

/// Game logic driven by the loop.
///
/// `update` must be deterministic given the same state and interval; it is
/// called zero or more times per iteration with a constant interval.
/// `render` is called exactly once per iteration, after all updates.
pub trait GameLogic {
    /// One-time setup. Failure is fatal and prevents the loop from running.
    fn init(&mut self) -> Result<(), EngineError>;

    /// Receive the input collected for this iteration, before any update.
    fn input(&mut self, input: &InputState);

    /// Advance logical time by exactly `interval` seconds.
    fn update(&mut self, interval: f32, input: &InputState) -> Result<(), EngineError>;

    /// Produce a frame from the latest state.
    fn render(&mut self) -> Result<(), EngineError>;

    /// Release resources. Called exactly once, on every exit path.
    fn cleanup(&mut self);
}

/// Windowing collaborator: stop predicate, input collection, and frame
/// presentation. All calls must be non-blocking.
pub trait WindowHost {
    /// True once the loop should terminate (e.g. the window was closed).
    fn should_close(&self) -> bool;

    /// Collect pending input events. Called exactly once per iteration.
    fn poll_input(&mut self) -> InputState;

    /// Present the rendered frame. With vsync this is where the display
    /// paces the loop.
    fn present(&mut self);
}

/// Loop configuration, fixed at construction.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Fixed updates per second of logical time.
    pub target_ups: u32,
    /// Frame pacing rate when `vsync` is false.
    pub target_fps: u32,
    /// When true, pacing is delegated to the display and the loop never
    /// sleeps.
    pub vsync: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_ups: 60,
            target_fps: 60,
            vsync: false,
        }
    }
}

/// The fixed-timestep loop scheduler.
pub struct GameLoop<H: WindowHost, L: GameLogic> {
    config: LoopConfig,
    host: H,
    logic: L,
    clock: Clock,
    // f64 keeps the catch-up count exact for deltas that are whole multiples
    // of the interval; f32 falls one update short at 50 ms / 60 ups.
    accumulator: f64,
    interval: f64,
    stats: LoopStats,
}

impl<H: WindowHost, L: GameLogic> GameLoop<H, L> {
    /// Create a loop over the given collaborators. Zero rates are treated
    /// as 1.
    pub fn new(config: LoopConfig, host: H, logic: L) -> Self {
        let config = LoopConfig {
            target_ups: config.target_ups.max(1),
            target_fps: config.target_fps.max(1),
            vsync: config.vsync,
        };
        let interval = 1.0 / f64::from(config.target_ups);
        Self {
            config,
            host,
            logic,
            clock: Clock::new(),
            accumulator: 0.0,
            interval,
            stats: LoopStats::new(),
        }
    }

    /// Initialize the logic and run the loop until the host requests a stop
    /// or an iteration fails. Cleanup runs exactly once on every exit path;
    /// the first error is propagated to the caller.
    pub fn run(&mut self) -> Result<(), EngineError> {
        log::info!(
            "starting game loop: {} ups, {} fps, vsync {}",
            self.config.target_ups,
            self.config.target_fps,
            self.config.vsync
        );

        let result = self.logic.init().and_then(|()| self.game_loop());
        self.logic.cleanup();

        match &result {
            Ok(()) => log::info!(
                "game loop stopped after {} frames, {} updates",
                self.stats.frames(),
                self.stats.updates()
            ),
            Err(err) => log::error!("game loop failed: {err}"),
        }
        result
    }

    fn game_loop(&mut self) -> Result<(), EngineError> {
        self.clock = Clock::new();
        while !self.host.should_close() {
            let dt = self.clock.elapsed();
            self.step(dt)?;
            if !self.config.vsync {
                self.pace();
            }
        }
        Ok(())
    }

    /// One iteration body without pacing: input once, catch-up updates,
    /// render once. Exposed so tests can drive the loop with injected
    /// deltas instead of a live clock.
    pub fn step(&mut self, dt: f32) -> Result<(), EngineError> {
        self.accumulator += f64::from(dt);

        self.stats.begin(Phase::Input);
        let input = self.host.poll_input();
        self.logic.input(&input);
        self.stats.end();

        self.stats.begin(Phase::Update);
        let mut updates = 0u32;
        while self.accumulator >= self.interval {
            self.logic.update(self.interval as f32, &input)?;
            self.accumulator -= self.interval;
            updates += 1;
        }
        self.stats.end();
        if updates > 1 {
            log::debug!("caught up with {updates} fixed updates in one frame");
        }

        self.stats.begin(Phase::Render);
        self.logic.render()?;
        self.host.present();
        self.stats.end();

        self.stats.record_iteration(updates);
        Ok(())
    }

    /// Block until the current frame slot has elapsed, in short sleep
    /// slices. Trades a little timing jitter for near-zero CPU burn.
    fn pace(&self) {
        let slot = 1.0 / f64::from(self.config.target_fps);
        let end_time = self.clock.last_poll() + slot;
        while self.clock.now() < end_time {
            thread::sleep(PACE_SLEEP);
        }
    }

    /// Unconsumed simulated time, in seconds. Always in
    /// `[0, 1 / target_ups)` between iterations.
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// The fixed update interval, in seconds.
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Timing statistics recorded so far.
    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }

    pub fn logic(&self) -> &L {
        &self.logic
    }

    pub fn logic_mut(&mut self) -> &mut L {
        &mut self.logic
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    /// Host scripted to close after a fixed number of presented frames.
    struct ScriptedHost {
        frames_left: u32,
        polls: u32,
        presents: u32,
        input: InputState,
    }

    impl ScriptedHost {
        fn new(frames: u32) -> Self {
            Self {
                frames_left: frames,
                polls: 0,
                presents: 0,
                input: InputState::default(),
            }
        }
    }

    impl WindowHost for ScriptedHost {
        fn should_close(&self) -> bool {
            self.frames_left == 0
        }

        fn poll_input(&mut self) -> InputState {
            self.polls += 1;
            self.input
        }

        fn present(&mut self) {
            self.presents += 1;
            self.frames_left = self.frames_left.saturating_sub(1);
        }
    }

    #[derive(Default)]
    struct CountingLogic {
        inits: u32,
        inputs: u32,
        updates: u32,
        renders: u32,
        cleanups: u32,
        fail_init: bool,
        fail_update_after: Option<u32>,
    }

    impl GameLogic for CountingLogic {
        fn init(&mut self) -> Result<(), EngineError> {
            self.inits += 1;
            if self.fail_init {
                return Err(EngineError::Init("context creation refused".into()));
            }
            Ok(())
        }

        fn input(&mut self, _input: &InputState) {
            self.inputs += 1;
        }

        fn update(&mut self, _interval: f32, _input: &InputState) -> Result<(), EngineError> {
            if let Some(limit) = self.fail_update_after {
                if self.updates >= limit {
                    return Err(EngineError::Update("scripted failure".into()));
                }
            }
            self.updates += 1;
            Ok(())
        }

        fn render(&mut self) -> Result<(), EngineError> {
            self.renders += 1;
            Ok(())
        }

        fn cleanup(&mut self) {
            self.cleanups += 1;
        }
    }

    fn test_loop(ups: u32, frames: u32) -> GameLoop<ScriptedHost, CountingLogic> {
        let config = LoopConfig {
            target_ups: ups,
            target_fps: 1000,
            vsync: true,
        };
        GameLoop::new(config, ScriptedHost::new(frames), CountingLogic::default())
    }

    #[test]
    fn test_update_cadence_50ms() {
        // 50 ms at 60 ups is exactly 3 fixed updates, remainder carried.
        let mut game_loop = test_loop(60, 10);
        game_loop.step(0.05).unwrap();

        assert_eq!(game_loop.logic().updates, 3);
        assert!(game_loop.accumulator() < game_loop.interval());
        assert!(game_loop.accumulator() >= 0.0);
    }

    #[test]
    fn test_fast_frame_runs_zero_updates() {
        let mut game_loop = test_loop(60, 10);
        game_loop.step(0.001).unwrap();

        // Rendering outran the logical rate: no update, but one render.
        assert_eq!(game_loop.logic().updates, 0);
        assert_eq!(game_loop.logic().renders, 1);
    }

    #[test]
    fn test_accumulator_invariant() {
        let mut game_loop = test_loop(60, 100);
        for dt in [0.0, 0.001, 0.0166, 0.05, 0.2, 0.33, 0.0166, 0.004] {
            game_loop.step(dt).unwrap();
            let acc = game_loop.accumulator();
            assert!(acc >= 0.0, "accumulator negative after dt {dt}");
            assert!(
                acc < game_loop.interval(),
                "accumulator {acc} not consumed after dt {dt}"
            );
        }
    }

    #[test]
    fn test_total_updates_tracks_elapsed_time() {
        let mut game_loop = test_loop(60, 1000);
        let mut total = 0.0f64;
        for i in 0..200 {
            let dt = 0.003 + (i % 7) as f32 * 0.004;
            total += f64::from(dt);
            game_loop.step(dt).unwrap();
        }

        let expected = total / game_loop.interval();
        let actual = game_loop.logic().updates as f64;
        assert!(
            (actual - expected).abs() <= 1.0,
            "updates {actual}, expected about {expected}"
        );
    }

    #[test]
    fn test_input_and_render_once_per_iteration() {
        let mut game_loop = test_loop(60, 10);
        for _ in 0..5 {
            game_loop.step(0.1).unwrap();
        }

        assert_eq!(game_loop.host().polls, 5);
        assert_eq!(game_loop.host().presents, 5);
        assert_eq!(game_loop.logic().inputs, 5);
        assert_eq!(game_loop.logic().renders, 5);
        assert_eq!(game_loop.stats().frames(), 5);
    }

    #[test]
    fn test_run_stops_on_host_close() {
        let mut game_loop = test_loop(240, 8);
        game_loop.run().unwrap();

        assert_eq!(game_loop.logic().inits, 1);
        assert_eq!(game_loop.logic().renders, 8);
        assert_eq!(game_loop.logic().cleanups, 1);
    }

    #[test]
    fn test_init_failure_never_runs() {
        let config = LoopConfig::default();
        let logic = CountingLogic {
            fail_init: true,
            ..Default::default()
        };
        let mut game_loop = GameLoop::new(config, ScriptedHost::new(10), logic);

        let err = game_loop.run().unwrap_err();
        assert!(matches!(err, EngineError::Init(_)));
        assert_eq!(game_loop.logic().updates, 0);
        assert_eq!(game_loop.logic().renders, 0);
        // Teardown still ran, exactly once.
        assert_eq!(game_loop.logic().cleanups, 1);
    }

    #[test]
    fn test_update_failure_is_fatal() {
        let config = LoopConfig {
            target_ups: 1000,
            target_fps: 1000,
            vsync: true,
        };
        let logic = CountingLogic {
            fail_update_after: Some(2),
            ..Default::default()
        };
        let mut game_loop = GameLoop::new(config, ScriptedHost::new(u32::MAX), logic);

        let err = game_loop.run().unwrap_err();
        assert!(matches!(err, EngineError::Update(_)));
        assert_eq!(game_loop.logic().updates, 2);
        assert_eq!(game_loop.logic().cleanups, 1);
    }

    #[test]
    fn test_pacing_fills_frame_slot() {
        // 50 fps slots: 3 frames of trivial work must take at least two
        // full slots of wall time.
        let config = LoopConfig {
            target_ups: 60,
            target_fps: 50,
            vsync: false,
        };
        let mut game_loop =
            GameLoop::new(config, ScriptedHost::new(3), CountingLogic::default());

        let start = Instant::now();
        game_loop.run().unwrap();
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn test_vsync_skips_pacing() {
        // With vsync on the loop never sleeps; 50 frames finish long before
        // 50 frame slots' worth of wall time.
        let config = LoopConfig {
            target_ups: 60,
            target_fps: 10,
            vsync: true,
        };
        let mut game_loop =
            GameLoop::new(config, ScriptedHost::new(50), CountingLogic::default());

        let start = Instant::now();
        game_loop.run().unwrap();
        assert!(start.elapsed() < Duration::from_secs(2));
        assert_eq!(game_loop.stats().frames(), 50);
    }

    #[test]
    fn test_zero_rates_normalized() {
        let config = LoopConfig {
            target_ups: 0,
            target_fps: 0,
            vsync: true,
        };
        let game_loop = GameLoop::new(config, ScriptedHost::new(1), CountingLogic::default());
        assert_eq!(game_loop.interval(), 1.0);
    }
}
