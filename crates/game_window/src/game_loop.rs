//! Blocking single-threaded frame loop

use std::time::Duration;

use glfw::WindowEvent;
use glow::HasContext as _;
use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, ConfigError};
use crate::foundation::time::{FrameTimer, Stopwatch, DEFAULT_MAX_DELTA};
use crate::game::{CloseResponse, Game, GameContext, GameError};
use crate::window::{GameWindow, WindowError, WindowState};

/// Frame loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Upper frame rate; the loop sleeps away the rest of each frame budget
    pub max_fps: Option<u32>,

    /// Largest delta a frame may report, in seconds
    pub max_delta: f32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_fps: None,
            max_delta: DEFAULT_MAX_DELTA,
        }
    }
}

impl LoopConfig {
    /// Reject a zero frame cap and non-positive delta clamps
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_fps == Some(0) {
            return Err(ConfigError::Invalid {
                field: "game_loop.max_fps",
                reason: "must be at least 1 when set".to_string(),
            });
        }
        if !self.max_delta.is_finite() || self.max_delta <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "game_loop.max_delta",
                reason: format!("{} is not a positive number of seconds", self.max_delta),
            });
        }
        Ok(())
    }

    fn frame_budget(&self) -> Option<Duration> {
        self.max_fps
            .filter(|&fps| fps > 0)
            .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps)))
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopStats {
    /// Frames ticked and rendered
    pub frames: u64,
    /// Seconds of game time that passed (clamped deltas)
    pub elapsed: f64,
    /// Seconds the window clock advanced over the same frames
    pub clock_time: f64,
    /// Average frames per second over clock time
    pub average_fps: f32,
}

/// Game loop driving one [`GameWindow`]
///
/// Each frame polls events, consults `closing` when a close was requested,
/// advances the timer from the window clock, then calls `tick`, clears,
/// calls `render` and swaps buffers.
pub struct GameLoop {
    window: GameWindow,
    config: LoopConfig,
    timer: FrameTimer,
}

impl GameLoop {
    /// Wrap an open window
    pub fn new(window: GameWindow, config: LoopConfig) -> Self {
        let timer = FrameTimer::new(window.time(), config.max_delta);
        Self {
            window,
            config,
            timer,
        }
    }

    /// Validate `config`, open its window and wrap it
    pub fn open(config: &AppConfig) -> Result<Self, GameError> {
        config.validate()?;
        let window = GameWindow::open(config.window.clone())?;
        Ok(Self::new(window, config.game_loop.clone()))
    }

    /// The driven window
    pub fn window(&self) -> &GameWindow {
        &self.window
    }

    /// Mutable access to the driven window
    pub fn window_mut(&mut self) -> &mut GameWindow {
        &mut self.window
    }

    /// Give the window back, e.g. to keep it alive past the loop
    pub fn into_window(self) -> GameWindow {
        self.window
    }

    /// Frame timer of the current or last run
    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    /// Run `game` until the window closes
    ///
    /// Blocks the calling thread. A window runs at most once. If a hook fails
    /// the loop stops at once, the window is marked closed, `closed` is not
    /// called, and the error is returned.
    pub fn run<G: Game>(&mut self, game: &mut G) -> Result<LoopStats, GameError> {
        let state = self.window.state();
        if state != WindowState::Created {
            return Err(WindowError::InvalidState {
                expected: WindowState::Created,
                actual: state,
            }
            .into());
        }

        let result = self.run_frames(game);
        if let Err(err) = &result {
            log::error!("Game loop aborted: {err}");
            if self.window.state() != WindowState::Closed {
                self.window.transition(WindowState::Closed)?;
            }
        }
        result
    }

    fn run_frames<G: Game>(&mut self, game: &mut G) -> Result<LoopStats, GameError> {
        log::info!("Loading game...");
        game.load(&mut GameContext::new(&mut self.window, self.timer.frame_time()))?;
        self.window.transition(WindowState::Loaded)?;

        let (width, height) = self.window.framebuffer_size();
        self.set_viewport(width, height);

        game.start(&mut GameContext::new(&mut self.window, self.timer.frame_time()))?;
        self.window.transition(WindowState::Running)?;
        self.timer.reset(self.window.time());

        log::info!("Starting main loop...");
        let budget = self.config.frame_budget();
        let mut frame_watch = Stopwatch::start_new();

        loop {
            frame_watch.restart();

            for (_, event) in self.window.poll_events() {
                self.dispatch_event(game, &event)?;
            }

            if self.window.should_close() {
                self.window.transition(WindowState::Closing)?;
                let mut ctx = GameContext::new(&mut self.window, self.timer.frame_time());
                match game.closing(&mut ctx) {
                    CloseResponse::Allow => break,
                    CloseResponse::Cancel => {
                        log::warn!("Close request cancelled by game");
                        self.window.cancel_close();
                        self.window.transition(WindowState::Running)?;
                    }
                }
            }

            let time = self.timer.update(self.window.time());
            game.tick(&mut GameContext::new(&mut self.window, time), time)?;
            self.clear();
            game.render(&mut GameContext::new(&mut self.window, time), time)?;
            self.window.swap_buffers();

            if let Some(budget) = budget {
                let spent = frame_watch.elapsed();
                if spent < budget {
                    std::thread::sleep(budget - spent);
                }
            }
        }

        game.closed(&mut GameContext::new(&mut self.window, self.timer.frame_time()));
        self.window.transition(WindowState::Closed)?;

        let stats = LoopStats {
            frames: self.timer.frame_count(),
            elapsed: self.timer.total_time(),
            clock_time: self.timer.clock_time(),
            average_fps: self.timer.average_fps(),
        };
        log::info!(
            "Game loop finished: {} frames in {:.2}s ({:.2}s game time, {:.1} fps)",
            stats.frames,
            stats.clock_time,
            stats.elapsed,
            stats.average_fps
        );
        Ok(stats)
    }

    fn dispatch_event<G: Game>(&mut self, game: &mut G, event: &WindowEvent) -> Result<(), GameError> {
        let time = self.timer.frame_time();
        game.event(&mut GameContext::new(&mut self.window, time), event)?;

        match *event {
            WindowEvent::FramebufferSize(width, height) => {
                let (width, height) = (width.max(0) as u32, height.max(0) as u32);
                log::debug!("Framebuffer resized to {width}x{height}");
                self.set_viewport(width, height);
                game.resized(&mut GameContext::new(&mut self.window, time), width, height)?;
            }
            WindowEvent::Key(glfw::Key::Escape, _, glfw::Action::Press, _)
                if self.window.config().close_on_escape =>
            {
                self.window.request_close();
            }
            _ => {}
        }
        Ok(())
    }

    fn set_viewport(&self, width: u32, height: u32) {
        if let Some(gl) = self.window.gl() {
            #[allow(unsafe_code)]
            // SAFETY: the window's context is current on this thread.
            unsafe {
                gl.viewport(0, 0, width as i32, height as i32);
            }
        }
    }

    fn clear(&self) {
        if let (Some(gl), Some([r, g, b, a])) = (self.window.gl(), self.window.config().clear_color) {
            #[allow(unsafe_code)]
            // SAFETY: the window's context is current on this thread.
            unsafe {
                gl.clear_color(r, g, b, a);
                gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::time::FrameTime;
    use crate::window::headless::HeadlessBackend;
    use crate::window::WindowConfig;
    use approx::assert_relative_eq;

    /// Records hook calls and can be told to fail or veto closes
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        ticks: Vec<FrameTime>,
        resizes: Vec<(u32, u32)>,
        cancel_closes: u32,
        close_on_frame: Option<u64>,
        fail_tick_on_frame: Option<u64>,
        fail_load: bool,
    }

    impl Game for Recorder {
        fn load(&mut self, _ctx: &mut GameContext<'_>) -> Result<(), GameError> {
            self.calls.push("load".into());
            if self.fail_load {
                return Err(GameError::Custom("missing asset".into()));
            }
            Ok(())
        }

        fn start(&mut self, ctx: &mut GameContext<'_>) -> Result<(), GameError> {
            assert_eq!(ctx.window().state(), WindowState::Loaded);
            self.calls.push("start".into());
            Ok(())
        }

        fn tick(&mut self, ctx: &mut GameContext<'_>, time: FrameTime) -> Result<(), GameError> {
            assert_eq!(ctx.window().state(), WindowState::Running);
            self.calls.push("tick".into());
            self.ticks.push(time);
            if self.fail_tick_on_frame == Some(time.frame) {
                return Err(GameError::Custom("tick failed".into()));
            }
            if self.close_on_frame == Some(time.frame) {
                ctx.request_close();
            }
            Ok(())
        }

        fn render(&mut self, _ctx: &mut GameContext<'_>, _time: FrameTime) -> Result<(), GameError> {
            self.calls.push("render".into());
            Ok(())
        }

        fn event(&mut self, _ctx: &mut GameContext<'_>, event: &WindowEvent) -> Result<(), GameError> {
            self.calls.push(format!("event:{event:?}"));
            Ok(())
        }

        fn resized(&mut self, _ctx: &mut GameContext<'_>, width: u32, height: u32) -> Result<(), GameError> {
            self.resizes.push((width, height));
            Ok(())
        }

        fn closing(&mut self, ctx: &mut GameContext<'_>) -> CloseResponse {
            assert_eq!(ctx.window().state(), WindowState::Closing);
            self.calls.push("closing".into());
            if self.cancel_closes > 0 {
                self.cancel_closes -= 1;
                CloseResponse::Cancel
            } else {
                CloseResponse::Allow
            }
        }

        fn closed(&mut self, ctx: &mut GameContext<'_>) {
            assert_eq!(ctx.window().state(), WindowState::Closing);
            self.calls.push("closed".into());
        }
    }

    fn game_loop(backend: HeadlessBackend, window: WindowConfig, config: LoopConfig) -> GameLoop {
        GameLoop::new(GameWindow::from_backend(Box::new(backend), window), config)
    }

    #[test]
    fn test_hook_order() {
        let backend = HeadlessBackend::new(640, 480).close_after(3);
        let log = backend.log();
        let mut game_loop = game_loop(backend, WindowConfig::default(), LoopConfig::default());
        let mut game = Recorder::default();

        let stats = game_loop.run(&mut game).unwrap();

        assert_eq!(
            game.calls,
            ["load", "start", "tick", "render", "tick", "render", "closing", "closed"]
        );
        assert_eq!(stats.frames, 2);
        assert_eq!(log.borrow().swaps, 2);
        assert_eq!(log.borrow().polls, 3);
        assert_eq!(game_loop.window().state(), WindowState::Closed);
    }

    #[test]
    fn test_cancelled_close_keeps_running() {
        let backend = HeadlessBackend::new(640, 480).close_after(2);
        let mut game_loop = game_loop(backend, WindowConfig::default(), LoopConfig::default());
        let mut game = Recorder {
            cancel_closes: 1,
            close_on_frame: Some(3),
            ..Recorder::default()
        };

        let stats = game_loop.run(&mut game).unwrap();

        assert_eq!(stats.frames, 3);
        assert_eq!(game.calls.iter().filter(|c| *c == "closing").count(), 2);
        assert_eq!(game.calls.last().map(String::as_str), Some("closed"));
    }

    #[test]
    fn test_delta_and_elapsed_follow_window_clock() {
        let backend = HeadlessBackend::new(640, 480).with_frame_step(0.02).close_after(4);
        let mut game_loop = game_loop(backend, WindowConfig::default(), LoopConfig::default());
        let mut game = Recorder::default();

        let stats = game_loop.run(&mut game).unwrap();

        assert_eq!(game.ticks.len(), 3);
        for (index, time) in game.ticks.iter().enumerate() {
            assert_eq!(time.frame, index as u64 + 1);
            assert_relative_eq!(time.delta, 0.02, epsilon = 1e-5);
            assert_relative_eq!(time.elapsed, 0.02 * (index + 1) as f64, epsilon = 1e-5);
        }
        assert_relative_eq!(stats.elapsed, 0.06, epsilon = 1e-5);
        assert_relative_eq!(stats.clock_time, 0.06, epsilon = 1e-5);
        assert_relative_eq!(stats.average_fps, 50.0, epsilon = 0.01);
    }

    #[test]
    fn test_slow_frames_are_clamped() {
        let backend = HeadlessBackend::new(640, 480).with_frame_step(2.0).close_after(2);
        let config = LoopConfig {
            max_delta: 0.1,
            ..LoopConfig::default()
        };
        let mut game_loop = game_loop(backend, WindowConfig::default(), config);
        let mut game = Recorder::default();

        let stats = game_loop.run(&mut game).unwrap();

        assert_eq!(stats.frames, 1);
        assert_relative_eq!(game.ticks[0].delta, 0.1);
        assert_relative_eq!(game.ticks[0].clock_delta, 2.0);
        assert_relative_eq!(stats.elapsed, 0.1, epsilon = 1e-6);
        assert_relative_eq!(stats.clock_time, 2.0);
        assert_relative_eq!(stats.average_fps, 0.5);
    }

    #[test]
    fn test_titles_set_from_tick_reach_window() {
        struct Retitler;
        impl Game for Retitler {
            fn tick(&mut self, ctx: &mut GameContext<'_>, time: FrameTime) -> Result<(), GameError> {
                ctx.set_title(&format!("frame {}", time.frame));
                Ok(())
            }
        }

        let backend = HeadlessBackend::new(640, 480).close_after(3);
        let log = backend.log();
        let mut game_loop = game_loop(backend, WindowConfig::default(), LoopConfig::default());

        game_loop.run(&mut Retitler).unwrap();

        assert_eq!(log.borrow().titles, ["frame 1", "frame 2"]);
        assert_eq!(game_loop.window().title(), "frame 2");
    }

    #[test]
    fn test_hook_error_stops_loop() {
        let backend = HeadlessBackend::new(640, 480);
        let log = backend.log();
        let mut game_loop = game_loop(backend, WindowConfig::default(), LoopConfig::default());
        let mut game = Recorder {
            fail_tick_on_frame: Some(2),
            ..Recorder::default()
        };

        let err = game_loop.run(&mut game).unwrap_err();

        assert!(matches!(err, GameError::Custom(ref msg) if msg == "tick failed"));
        assert_eq!(game.calls.last().map(String::as_str), Some("tick"));
        assert!(!game.calls.iter().any(|c| c == "closed"));
        assert_eq!(log.borrow().swaps, 1);
        assert_eq!(game_loop.window().state(), WindowState::Closed);
    }

    #[test]
    fn test_load_error_skips_start() {
        let backend = HeadlessBackend::new(640, 480);
        let mut game_loop = game_loop(backend, WindowConfig::default(), LoopConfig::default());
        let mut game = Recorder {
            fail_load: true,
            ..Recorder::default()
        };

        assert!(game_loop.run(&mut game).is_err());
        assert_eq!(game.calls, ["load"]);
        assert_eq!(game_loop.window().state(), WindowState::Closed);
    }

    #[test]
    fn test_window_runs_only_once() {
        let backend = HeadlessBackend::new(640, 480).close_after(1);
        let mut game_loop = game_loop(backend, WindowConfig::default(), LoopConfig::default());

        game_loop.run(&mut Recorder::default()).unwrap();
        let err = game_loop.run(&mut Recorder::default()).unwrap_err();

        assert!(matches!(
            err,
            GameError::Window(WindowError::InvalidState {
                expected: WindowState::Created,
                actual: WindowState::Closed
            })
        ));
    }

    #[test]
    fn test_framebuffer_resize_reaches_hooks() {
        let backend = HeadlessBackend::new(640, 480)
            .with_events(vec![vec![WindowEvent::FramebufferSize(800, 600)]])
            .close_after(2);
        let mut game_loop = game_loop(backend, WindowConfig::default(), LoopConfig::default());
        let mut game = Recorder::default();

        game_loop.run(&mut game).unwrap();

        assert_eq!(game.resizes, [(800, 600)]);
        assert_eq!(game.calls[2], "event:FramebufferSize(800, 600)");
        assert_eq!(game.calls[3], "tick");
    }

    #[test]
    fn test_escape_closes_when_enabled() {
        let escape = WindowEvent::Key(glfw::Key::Escape, 9, glfw::Action::Press, glfw::Modifiers::empty());
        let backend = HeadlessBackend::new(640, 480).with_events(vec![vec![], vec![escape]]);
        let window = WindowConfig {
            close_on_escape: true,
            ..WindowConfig::default()
        };
        let mut game_loop = game_loop(backend, window, LoopConfig::default());
        let mut game = Recorder::default();

        let stats = game_loop.run(&mut game).unwrap();

        assert_eq!(stats.frames, 1);
        assert!(game.calls.iter().any(|c| c == "closing"));
    }

    #[test]
    fn test_escape_ignored_by_default() {
        let escape = WindowEvent::Key(glfw::Key::Escape, 9, glfw::Action::Press, glfw::Modifiers::empty());
        let backend = HeadlessBackend::new(640, 480)
            .with_events(vec![vec![escape]])
            .close_after(3);
        let mut game_loop = game_loop(backend, WindowConfig::default(), LoopConfig::default());

        let stats = game_loop.run(&mut Recorder::default()).unwrap();

        assert_eq!(stats.frames, 2);
    }

    #[test]
    fn test_frame_cap_sleeps() {
        let backend = HeadlessBackend::new(640, 480).close_after(4);
        let config = LoopConfig {
            max_fps: Some(100),
            ..LoopConfig::default()
        };
        let mut game_loop = game_loop(backend, WindowConfig::default(), config);

        let wall = Stopwatch::start_new();
        let stats = game_loop.run(&mut Recorder::default()).unwrap();

        assert_eq!(stats.frames, 3);
        assert!(wall.elapsed() >= Duration::from_millis(25));
    }

    #[test]
    fn test_loop_config_validation() {
        LoopConfig::default().validate().unwrap();

        let zero_fps = LoopConfig {
            max_fps: Some(0),
            ..LoopConfig::default()
        };
        assert!(zero_fps.validate().is_err());

        let negative_clamp = LoopConfig {
            max_delta: -1.0,
            ..LoopConfig::default()
        };
        assert!(negative_clamp.validate().is_err());
    }

    #[test]
    fn test_open_validates_before_creating_window() {
        let mut config = AppConfig::default();
        config.game_loop.max_fps = Some(0);

        assert!(matches!(GameLoop::open(&config), Err(GameError::Config(_))));
    }
}
