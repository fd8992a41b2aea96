//! Fixed timestep simulation tick
//!
//! Wires the run controller to the world and the HUD and advances everything
//! by one step.

use super::controller::{RunCommand, RunController};
use super::state::RunPhase;
use super::world::World;
use crate::consts::*;
use crate::hud::Hud;
use crate::settings::Settings;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Tap (click/touch/space)
    pub tap: bool,
    /// Demo mode - autopilot plays the game
    pub autopilot: bool,
}

/// Controller plus the collaborators it drives
#[derive(Debug)]
pub struct Game {
    pub controller: RunController,
    pub world: World,
    pub hud: Hud,
}

impl Game {
    pub fn new(settings: Settings, seed: u64) -> Self {
        let controller = RunController::new(settings, seed);
        let world = World::new(controller.settings());
        let mut game = Self {
            controller,
            world,
            hud: Hud::new(),
        };
        game.dispatch();
        game
    }

    /// Route queued controller commands to the world and HUD
    pub fn dispatch(&mut self) {
        for command in self.controller.drain_commands() {
            match command {
                RunCommand::SpawnPair(pair) => self.world.spawn(pair),
                RunCommand::ClearObstacles => self.world.clear(),
                RunCommand::SetTimeScale(scale) => self.world.set_time_scale(scale),
                RunCommand::SetScoreText(text) => self.hud.set_score(text),
                RunCommand::SetStatusText(text) => self.hud.set_status(text),
            }
        }
    }
}

/// Advance the game by one timestep of `dt` real seconds
pub fn tick(game: &mut Game, input: &TickInput, dt: f32) {
    let tap = input.tap || (input.autopilot && autopilot_wants_tap(game));
    if tap {
        game.controller.tap();
    }

    // Timers run on real time, even while the world is frozen
    game.controller.advance(dt);
    game.dispatch();

    let events = game.world.step(game.controller.player_mut(), dt);
    for id in events.despawned {
        game.controller.on_pair_despawned(id);
    }
    for contact in events.contacts {
        game.controller.on_contact(contact);
    }
    game.dispatch();
}

/// Demo autopilot: start, keep the player near the next gap, restart
fn autopilot_wants_tap(game: &Game) -> bool {
    match game.controller.phase() {
        RunPhase::NotStarted => true,
        RunPhase::Ended { message_shown } => message_shown,
        RunPhase::Running => {
            let player = game.controller.player();
            let settings = game.controller.settings();

            // Next gap the player has not cleared yet
            let target = game
                .world
                .pairs()
                .iter()
                .filter(|p| p.right_edge() >= player.pos.x - player.radius)
                .min_by(|a, b| a.x().total_cmp(&b.x()))
                .map(|p| p.gap.center.y - p.gap_height * 0.2)
                .unwrap_or(settings.playfield_height / 2.0);

            player.pos.y < target && player.vel.y < settings.flap_velocity() * 0.5
        }
    }
}

/// Fixed-timestep accumulator
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for a frame of `frame_dt` seconds; returns how many `SIM_DT`
    /// steps to run
    pub fn frame(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop time we could not catch up on
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text;

    fn tap() -> TickInput {
        TickInput {
            tap: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_game_shows_prompt() {
        let game = Game::new(Settings::default(), 1);
        assert_eq!(game.hud.status, text::PROMPT);
        assert_eq!(game.hud.score, "0");
        assert_eq!(game.world.time_scale(), 1.0);
    }

    #[test]
    fn test_tick_tap_starts_and_spawns() {
        let mut game = Game::new(Settings::default(), 1);
        tick(&mut game, &TickInput::default(), SIM_DT);
        assert_eq!(game.controller.phase(), RunPhase::NotStarted);
        assert!(game.world.pairs().is_empty());

        tick(&mut game, &tap(), SIM_DT);
        assert_eq!(game.controller.phase(), RunPhase::Running);
        assert_eq!(game.world.pairs().len(), 1);
        assert_eq!(game.hud.status, "");
    }

    #[test]
    fn test_falling_to_ground_ends_run() {
        let mut game = Game::new(Settings::default(), 7);
        tick(&mut game, &tap(), SIM_DT);

        let mut ticks = 0;
        while !game.controller.is_game_over() && ticks < 120 * 10 {
            tick(&mut game, &TickInput::default(), SIM_DT);
            ticks += 1;
        }
        assert!(game.controller.is_game_over());
        assert_eq!(game.world.time_scale(), 0.0);
        assert!(game.hud.status.starts_with("Score: "));
    }

    #[test]
    fn test_frozen_world_after_death() {
        let mut game = Game::new(Settings::default(), 7);
        tick(&mut game, &tap(), SIM_DT);
        while !game.controller.is_game_over() {
            tick(&mut game, &TickInput::default(), SIM_DT);
        }

        let pos = game.controller.player().pos;
        let xs: Vec<f32> = game.world.pairs().iter().map(|p| p.x()).collect();
        for _ in 0..60 {
            tick(&mut game, &TickInput::default(), SIM_DT);
        }
        assert_eq!(game.controller.player().pos, pos);
        let after: Vec<f32> = game.world.pairs().iter().map(|p| p.x()).collect();
        assert_eq!(xs, after);
    }

    #[test]
    fn test_autopilot_scores() {
        let mut game = Game::new(Settings::default(), 2024);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut best = 0;
        for _ in 0..(120 * 60) {
            tick(&mut game, &input, SIM_DT);
            best = best.max(game.controller.score());
        }
        assert!(game.controller.state().runs >= 1);
        assert!(best >= 1, "autopilot never cleared a gap");
    }

    #[test]
    fn test_determinism() {
        let mut game1 = Game::new(Settings::default(), 99999);
        let mut game2 = Game::new(Settings::default(), 99999);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..(120 * 20) {
            tick(&mut game1, &input, SIM_DT);
            tick(&mut game2, &input, SIM_DT);
        }
        assert_eq!(game1.controller.score(), game2.controller.score());
        assert_eq!(game1.controller.phase(), game2.controller.phase());
        assert_eq!(game1.world.pairs(), game2.world.pairs());
        assert_eq!(game1.hud, game2.hud);
    }

    #[test]
    fn test_frame_clock_substeps() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.frame(SIM_DT * 2.5), 2);
        assert_eq!(clock.frame(SIM_DT * 0.75), 1);
        // Huge frame is clamped
        assert_eq!(clock.frame(5.0), MAX_SUBSTEPS);
    }
}
