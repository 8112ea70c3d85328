//! Session lifecycle
//!
//! A [`Session`] owns one playthrough and the two periodic tasks that drive
//! it: the per-frame tick and the wall-clock pipe spawner. Both start on the
//! first trigger and are cancelled in the same call that ends the game.
//!
//! Frame callbacks are keyed by a [`FrameTicket`]. Tickets carry the epoch of
//! the session that issued them, so a callback scheduled before a restart is
//! rejected instead of touching the new game.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::{ConfigError, GameConfig};
use crate::sim::{self, GameEvent, GamePhase, GameState, autopilot};

static NEXT_EPOCH: AtomicU64 = AtomicU64::new(1);

fn next_epoch() -> u64 {
    NEXT_EPOCH.fetch_add(1, Ordering::Relaxed)
}

/// Repeating timer driven by externally supplied timestamps
#[derive(Debug, Clone)]
pub struct PeriodicTask {
    interval_ms: f64,
    /// None while cancelled
    next_due_ms: Option<f64>,
}

impl PeriodicTask {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            next_due_ms: None,
        }
    }

    /// Arm the timer; first firing is one interval after `now_ms`
    pub fn start(&mut self, now_ms: f64) {
        self.next_due_ms = Some(now_ms + self.interval_ms);
    }

    pub fn cancel(&mut self) {
        self.next_due_ms = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due_ms.is_some()
    }

    /// Number of firings due at or before `now_ms`
    ///
    /// A timer with a non-positive or NaN interval never fires.
    pub fn poll(&mut self, now_ms: f64) -> u32 {
        let Some(mut due) = self.next_due_ms else {
            return 0;
        };
        if self.interval_ms.is_nan() || self.interval_ms <= 0.0 {
            return 0;
        }
        let mut fired = 0;
        while due <= now_ms {
            fired += 1;
            due += self.interval_ms;
        }
        self.next_due_ms = Some(due);
        fired
    }
}

/// Permission to run one frame of a specific session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTicket {
    epoch: u64,
}

/// Result of a jump trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// First trigger: the game started; schedule frames with this ticket
    Started(FrameTicket),
    Jumped,
    /// Game is over
    Ignored,
}

/// Result of a frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Schedule the next frame
    Continue,
    /// This frame ended the game; do not schedule again
    Finished { score: u32 },
    /// Ticket belongs to a cancelled loop or an older session
    Stale,
}

/// One playthrough plus its scheduling
#[derive(Debug)]
pub struct Session {
    state: GameState,
    epoch: u64,
    frame_active: bool,
    spawner: PeriodicTask,
}

impl Session {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let spawner = PeriodicTask::new(config.spawn_interval_ms);
        Ok(Self {
            state: GameState::new(config, seed),
            epoch: next_epoch(),
            frame_active: false,
            spawner,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Take all game events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Ticket for the running frame loop, if any
    pub fn ticket(&self) -> Option<FrameTicket> {
        self.frame_active.then_some(FrameTicket { epoch: self.epoch })
    }

    pub fn spawner_active(&self) -> bool {
        self.spawner.is_active()
    }

    /// Handle the single input: start on the first one, flap while playing
    pub fn trigger(&mut self, now_ms: f64) -> TriggerOutcome {
        match self.state.phase {
            GamePhase::GameOver => TriggerOutcome::Ignored,
            GamePhase::Ready => {
                sim::start(&mut self.state);
                self.frame_active = true;
                self.spawner.start(now_ms);
                sim::jump(&mut self.state);
                TriggerOutcome::Started(FrameTicket { epoch: self.epoch })
            }
            GamePhase::Playing => {
                sim::jump(&mut self.state);
                TriggerOutcome::Jumped
            }
        }
    }

    /// Run one frame: due spawns, then one tick
    pub fn frame(&mut self, ticket: FrameTicket, now_ms: f64) -> FrameOutcome {
        if ticket.epoch != self.epoch || !self.frame_active {
            return FrameOutcome::Stale;
        }

        for _ in 0..self.spawner.poll(now_ms) {
            sim::spawn_pipe(&mut self.state);
        }
        sim::tick(&mut self.state);

        if self.state.is_over() {
            self.cancel_tasks();
            return FrameOutcome::Finished {
                score: self.state.score,
            };
        }
        FrameOutcome::Continue
    }

    fn cancel_tasks(&mut self) {
        self.frame_active = false;
        self.spawner.cancel();
    }

    /// Cancel both tasks and invalidate every ticket handed out so far
    pub fn teardown(&mut self) {
        self.cancel_tasks();
        self.epoch = next_epoch();
    }

    /// Discard this playthrough and start over in the Ready phase
    pub fn restart(&mut self, seed: u64) {
        self.teardown();
        let config = self.state.config.clone();
        self.spawner = PeriodicTask::new(config.spawn_interval_ms);
        self.state = GameState::new(config, seed);
        log::info!("Session restarted with seed {}", seed);
    }
}

/// Summary of a headless run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoReport {
    pub frames: u64,
    pub score: u32,
    pub game_over: bool,
}

/// Frame period of the headless runner (60 Hz)
pub const DEMO_FRAME_MS: f64 = 1000.0 / 60.0;

/// Play a session with the autopilot on virtual 60 Hz time
pub fn run_headless(
    config: GameConfig,
    seed: u64,
    max_frames: u64,
) -> Result<DemoReport, ConfigError> {
    let mut session = Session::new(config, seed)?;
    let mut now = 0.0;
    let TriggerOutcome::Started(ticket) = session.trigger(now) else {
        return Ok(DemoReport {
            frames: 0,
            score: 0,
            game_over: session.state().is_over(),
        });
    };

    let mut frames = 0;
    while frames < max_frames {
        now += DEMO_FRAME_MS;
        if autopilot::should_jump(session.state()) {
            session.trigger(now);
        }
        frames += 1;
        if let FrameOutcome::Finished { score } = session.frame(ticket, now) {
            return Ok(DemoReport {
                frames,
                score,
                game_over: true,
            });
        }
    }

    Ok(DemoReport {
        frames,
        score: session.state().score,
        game_over: false,
    })
}
