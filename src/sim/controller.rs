//! Run controller
//!
//! Owns the run state and reacts to taps, timer firings and contacts. It never
//! touches the world or the HUD directly: side effects are queued as
//! `RunCommand`s for the tick loop to route.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::collision::{Contact, ContactKind};
use super::spawner::spawn_pair;
use super::state::{ObstaclePair, PairId, Player, RunPhase, RunState};
use super::timer::{TimerHandle, Timers};
use crate::settings::Settings;
use crate::text;

/// Timer payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunTimer {
    SpawnObstacle,
    ShowDeathMessage,
}

/// Side effects for the collaborators
#[derive(Debug, Clone, PartialEq)]
pub enum RunCommand {
    /// Register a new pair for scrolling and collision
    SpawnPair(ObstaclePair),
    /// Discard every obstacle
    ClearObstacles,
    /// Global simulation speed (0 = frozen)
    SetTimeScale(f32),
    SetScoreText(String),
    SetStatusText(String),
}

/// The run state machine
#[derive(Debug)]
pub struct RunController {
    settings: Settings,
    state: RunState,
    rng: Pcg32,
    timers: Timers<RunTimer>,
    spawn_timer: Option<TimerHandle>,
    death_timer: Option<TimerHandle>,
    commands: Vec<RunCommand>,
}

impl RunController {
    /// Create a controller set up in `NotStarted`
    pub fn new(settings: Settings, seed: u64) -> Self {
        let settings = settings.sanitized();
        let state = RunState::new(&settings, seed);
        let rng = state.rng_state.to_rng();

        let mut controller = Self {
            settings,
            state,
            rng,
            timers: Timers::new(),
            spawn_timer: None,
            death_timer: None,
            commands: Vec::new(),
        };
        controller.setup();
        controller
    }

    /// Full reset to `NotStarted`
    pub fn setup(&mut self) {
        self.cancel_timers();
        self.state.reset(&self.settings);
        self.commands.push(RunCommand::SetTimeScale(1.0));
        self.commands.push(RunCommand::SetScoreText(self.state.score.to_string()));
        self.commands.push(RunCommand::SetStatusText(text::PROMPT.to_string()));
    }

    /// Handle a tap
    pub fn tap(&mut self) {
        match self.state.phase {
            RunPhase::NotStarted => {
                self.start_run();
                self.flap();
            }
            RunPhase::Running => self.flap(),
            RunPhase::Ended { message_shown: true } => self.restart(),
            RunPhase::Ended { message_shown: false } => {
                log::debug!("Tap absorbed during game-over delay");
            }
        }
    }

    /// Handle a contact-begin notification
    pub fn on_contact(&mut self, contact: Contact) {
        match self.state.phase {
            RunPhase::Running => {}
            RunPhase::NotStarted => {
                log::debug!("Contact {:?} before run start ignored", contact);
                return;
            }
            RunPhase::Ended { .. } => {
                log::debug!("Contact {:?} after game over ignored", contact);
                return;
            }
        }

        let pair = contact.pair();
        if let Some(id) = pair {
            if !self.state.pairs.contains_key(&id) {
                log::debug!("Contact with unknown pair {} ignored", id);
                return;
            }
        }

        match contact.kind() {
            ContactKind::GapPass => self.score_pass(pair),
            ContactKind::SolidHit => self.end_run(),
        }
    }

    /// The collaborator destroyed a pair (scrolled off-screen)
    pub fn on_pair_despawned(&mut self, id: PairId) {
        self.state.pairs.remove(&id);
    }

    /// Advance timers by real (unscaled) time
    pub fn advance(&mut self, dt: f32) {
        for (handle, timer) in self.timers.advance(dt) {
            match timer {
                RunTimer::SpawnObstacle => {
                    if self.spawn_timer == Some(handle) && self.state.phase == RunPhase::Running {
                        self.spawn_obstacle();
                    } else {
                        log::debug!("Stale spawn tick ignored");
                    }
                }
                RunTimer::ShowDeathMessage => {
                    if self.death_timer == Some(handle) {
                        self.death_timer = None;
                        self.show_death_message();
                    }
                }
            }
        }
    }

    /// Take all queued commands
    pub fn drain_commands(&mut self) -> Vec<RunCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn phase(&self) -> RunPhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn is_started(&self) -> bool {
        self.state.is_started()
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn awaiting_restart_ack(&self) -> bool {
        self.state.awaiting_restart_ack()
    }

    pub fn player(&self) -> &Player {
        &self.state.player
    }

    /// Mutable player body, for the physics step
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.state.player
    }

    pub fn spawn_timer_active(&self) -> bool {
        self.spawn_timer.is_some_and(|h| self.timers.is_active(h))
    }

    pub fn death_message_pending(&self) -> bool {
        self.death_timer.is_some_and(|h| self.timers.is_active(h))
    }

    /// Timers currently scheduled
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    fn start_run(&mut self) {
        if let Some(handle) = self.spawn_timer.take() {
            self.timers.cancel(handle);
        }
        self.spawn_timer = Some(self.timers.schedule_repeating(
            self.settings.spawn_interval,
            RunTimer::SpawnObstacle,
            true,
        ));
        self.state.phase = RunPhase::Running;
        self.state.runs += 1;
        self.commands.push(RunCommand::SetStatusText(String::new()));
        log::info!("Run {} started", self.state.runs);
    }

    /// Zero vertical speed, then a fixed upward impulse
    fn flap(&mut self) {
        let player = &mut self.state.player;
        player.dynamic = true;
        player.set_velocity(Vec2::ZERO);
        player.apply_impulse(Vec2::new(0.0, self.settings.flap_impulse));
    }

    fn score_pass(&mut self, pair: Option<PairId>) {
        if let Some(ledger) = pair.and_then(|id| self.state.pairs.get_mut(&id)) {
            if ledger.scored {
                return;
            }
            ledger.scored = true;
        }
        self.state.score += 1;
        self.commands
            .push(RunCommand::SetScoreText(self.state.score.to_string()));
    }

    fn end_run(&mut self) {
        self.commands.push(RunCommand::SetTimeScale(0.0));
        self.state.phase = RunPhase::Ended {
            message_shown: false,
        };
        if let Some(handle) = self.spawn_timer.take() {
            self.timers.cancel(handle);
        }
        self.commands
            .push(RunCommand::SetStatusText(text::final_score(self.state.score)));

        if let Some(handle) = self.death_timer.take() {
            self.timers.cancel(handle);
        }
        self.death_timer = Some(self.timers.schedule_once(
            self.settings.death_message_delay,
            RunTimer::ShowDeathMessage,
        ));
        log::info!("Run {} over, score {}", self.state.runs, self.state.score);
    }

    fn show_death_message(&mut self) {
        if let RunPhase::Ended { message_shown } = &mut self.state.phase {
            *message_shown = true;
            self.commands
                .push(RunCommand::SetStatusText(text::GAME_OVER.to_string()));
        }
    }

    fn restart(&mut self) {
        log::info!("Restarting after score {}", self.state.score);
        self.commands.push(RunCommand::ClearObstacles);
        self.setup();
    }

    fn spawn_obstacle(&mut self) {
        let id = self.state.next_pair_id();
        let pair = spawn_pair(id, &self.settings, &mut self.rng);
        log::debug!("Spawned pair {} (gap offset {:.1})", id, pair.gap_offset);
        self.state.pairs.insert(id, Default::default());
        self.commands.push(RunCommand::SpawnPair(pair));
    }

    fn cancel_timers(&mut self) {
        self.timers.cancel_all();
        self.spawn_timer = None;
        self.death_timer = None;
    }
}
