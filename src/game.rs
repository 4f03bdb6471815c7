//! Round lifecycle: the Running / GameOver state machine.
//!
//! [`Game`] owns the state, the input latch, the scheduler and the RNG.  The
//! host feeds it wall time through [`Game::advance`]; when an enemy reaches
//! the player the round ends inside that tick, further ticks become no-ops
//! and the host is asked (without blocking) to present the end-of-round
//! choice.  The host later answers through [`Game::resolve`].

use std::time::Duration;

use rand::Rng;

use crate::compute::{create_bullet, create_enemy, init_state, tick};
use crate::config::GameConfig;
use crate::entities::{GameState, GameStatus};
use crate::input::InputLatch;
use crate::scheduler::{ticks_for, FixedStep, Interval};

/// The player's answer to "play again?".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundChoice {
    PlayAgain,
    Quit,
}

/// What the host should do after [`Game::resolve`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Continue,
    Exit,
}

/// Implemented by the host to show the end-of-round question.
pub trait EndOfRound {
    fn present_choice(&mut self, state: &GameState);
}

pub struct Game<R: Rng> {
    config: GameConfig,
    state: GameState,
    input: InputLatch,
    clock: FixedStep,
    fire_poll: Interval,
    spawn: Interval,
    rng: R,
}

impl<R: Rng> Game<R> {
    pub fn new(config: GameConfig, rng: R) -> Self {
        let timing = &config.timing;
        let clock = FixedStep::new(timing.tick_hz);
        let fire_poll = Interval::every(ticks_for(timing.fire_period_ms, timing.tick_hz));
        let spawn = Interval::every(ticks_for(timing.spawn_period_ms, timing.tick_hz));
        log::info!(
            "Round started: fire every {} ticks, spawn every {} ticks at {} Hz",
            fire_poll.period(),
            spawn.period(),
            timing.tick_hz
        );
        Game {
            state: init_state(&config),
            config,
            input: InputLatch::default(),
            clock,
            fire_poll,
            spawn,
            rng,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn input(&self) -> InputLatch {
        self.input
    }

    pub fn set_input(&mut self, input: InputLatch) {
        self.input = input;
    }

    /// Immediate single shot (the on-screen fire button).  Ignored once the
    /// round is over.
    pub fn fire(&mut self) {
        if self.state.status == GameStatus::Running {
            self.state = create_bullet(&self.state);
        }
    }

    /// Run every fixed tick that `elapsed` wall time makes due.  Stops early
    /// if the round ends.  Returns the number of ticks simulated.
    pub fn advance(&mut self, elapsed: Duration, host: &mut impl EndOfRound) -> u32 {
        if self.state.status == GameStatus::GameOver {
            return 0;
        }
        let due = self.clock.consume(elapsed);
        let mut ran = 0;
        for _ in 0..due {
            self.tick(host);
            ran += 1;
            if self.state.status == GameStatus::GameOver {
                break;
            }
        }
        ran
    }

    /// One fixed step: fire poll, spawn, then the simulation.
    pub fn tick(&mut self, host: &mut impl EndOfRound) {
        if self.state.status == GameStatus::GameOver {
            return;
        }

        if self.fire_poll.tick() && self.input.fire {
            self.state = create_bullet(&self.state);
        }
        if self.spawn.tick() {
            self.state = create_enemy(&self.state, &mut self.rng);
        }

        self.state = tick(&self.state, &self.input);

        if self.state.status == GameStatus::GameOver {
            log::info!(
                "Game over after {} ticks ({} enemies on screen)",
                self.state.frame,
                self.state.enemies.len()
            );
            host.present_choice(&self.state);
        }
    }

    /// Apply the host's answer to the end-of-round question.
    pub fn resolve(&mut self, choice: RoundChoice) -> Resolution {
        if self.state.status != GameStatus::GameOver {
            return Resolution::Continue;
        }
        match choice {
            RoundChoice::PlayAgain => {
                self.restart();
                Resolution::Continue
            }
            RoundChoice::Quit => {
                log::info!("Player chose to quit");
                Resolution::Exit
            }
        }
    }

    fn restart(&mut self) {
        log::info!("Restarting round");
        self.state = init_state(&self.config);
        self.input = InputLatch::default();
        self.clock.reset();
        self.fire_poll.reset();
        self.spawn.reset();
    }
}
