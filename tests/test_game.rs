use std::time::Duration;

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use arcade_shooter::config::GameConfig;
use arcade_shooter::entities::{GameState, GameStatus};
use arcade_shooter::game::{EndOfRound, Game, Resolution, RoundChoice};
use arcade_shooter::input::InputLatch;

/// Records every time the game asks the question.
#[derive(Default)]
struct Recorder {
    asked: usize,
    last_frame: Option<u64>,
}

impl EndOfRound for Recorder {
    fn present_choice(&mut self, state: &GameState) {
        self.asked += 1;
        self.last_frame = Some(state.frame);
    }
}

fn new_game() -> Game<StdRng> {
    Game::new(GameConfig::default(), StdRng::seed_from_u64(7))
}

fn run_ticks(game: &mut Game<StdRng>, host: &mut Recorder, n: usize) {
    for _ in 0..n {
        game.tick(host);
    }
}

const FIRE: InputLatch = InputLatch {
    left: false,
    right: false,
    fire: true,
};

// ── Scheduling ────────────────────────────────────────────────────────────────

#[test]
fn held_fire_shoots_every_sixth_tick() {
    let mut game = new_game();
    let mut host = Recorder::default();
    game.set_input(FIRE);

    run_ticks(&mut game, &mut host, 5);
    assert!(game.state().bullets.is_empty());
    run_ticks(&mut game, &mut host, 1);
    assert_eq!(game.state().bullets.len(), 1);
    run_ticks(&mut game, &mut host, 6);
    assert_eq!(game.state().bullets.len(), 2);
}

#[test]
fn fire_poll_does_nothing_while_fire_released() {
    let mut game = new_game();
    let mut host = Recorder::default();
    run_ticks(&mut game, &mut host, 60);
    assert!(game.state().bullets.is_empty());
}

#[test]
fn enemy_spawns_every_two_seconds() {
    let mut game = new_game();
    let mut host = Recorder::default();

    run_ticks(&mut game, &mut host, 119);
    assert!(game.state().enemies.is_empty());
    run_ticks(&mut game, &mut host, 1);
    assert_eq!(game.state().enemies.len(), 1);
    // Spawned above the canvas, then moved by the same tick's update.
    assert_relative_eq!(game.state().enemies[0].y, -48.0);

    run_ticks(&mut game, &mut host, 120);
    assert_eq!(game.state().enemies.len(), 2);
}

#[test]
fn advance_converts_wall_time_to_ticks() {
    let mut game = new_game();
    let mut host = Recorder::default();
    game.set_input(InputLatch {
        left: false,
        right: true,
        fire: false,
    });

    let ran = game.advance(Duration::from_millis(50), &mut host); // 3 ticks
    assert_eq!(ran, 3);
    assert_eq!(game.state().frame, 3);
    assert_relative_eq!(game.state().player.x, 390.0);
}

#[test]
fn huge_periods_just_never_come_due() {
    let config = GameConfig::from_toml(
        "[timing]\nspawn_period_ms = 1000000000000000000\nfire_period_ms = 1000000000000000000",
    )
    .unwrap();
    let mut game = Game::new(config, StdRng::seed_from_u64(7));
    let mut host = Recorder::default();
    game.set_input(FIRE);

    assert_eq!(game.advance(Duration::from_millis(50), &mut host), 3);
    run_ticks(&mut game, &mut host, 600);
    assert!(game.state().bullets.is_empty());
    assert!(game.state().enemies.is_empty());
}

#[test]
fn fastest_tick_rate_runs() {
    let config = GameConfig::from_toml("[timing]\ntick_hz = 1000").unwrap();
    let mut game = Game::new(config, StdRng::seed_from_u64(7));
    let mut host = Recorder::default();
    assert_eq!(game.advance(Duration::from_millis(3), &mut host), 3);
    assert_eq!(game.state().frame, 3);
}

#[test]
fn click_fire_spawns_a_bullet_immediately() {
    let mut game = new_game();
    game.fire();
    game.fire();
    assert_eq!(game.state().bullets.len(), 2);
}

// ── Round end ─────────────────────────────────────────────────────────────────

/// Enemies as wide as the canvas: the first one always lands on the player.
/// It spawns on tick 120 and overlaps the player on tick 390.
fn doomed_game() -> Game<StdRng> {
    let mut config = GameConfig::default();
    config.enemy.width = config.canvas.width;
    Game::new(config, StdRng::seed_from_u64(7))
}

fn lose_round(game: &mut Game<StdRng>, host: &mut Recorder) {
    for _ in 0..1000 {
        game.tick(host);
        if game.status() == GameStatus::GameOver {
            return;
        }
    }
    panic!("round never ended");
}

#[test]
fn collision_with_player_ends_round_and_asks_once() {
    let mut game = doomed_game();
    let mut host = Recorder::default();
    lose_round(&mut game, &mut host);

    assert_eq!(game.status(), GameStatus::GameOver);
    assert_eq!(game.state().frame, 390);
    assert_eq!(host.asked, 1);
    assert_eq!(host.last_frame, Some(390));
    // The enemy is not removed by the collision.
    assert_eq!(game.state().enemies.len(), 3);
}

#[test]
fn ticks_are_no_ops_after_game_over() {
    let mut game = doomed_game();
    let mut host = Recorder::default();
    lose_round(&mut game, &mut host);

    let frame = game.state().frame;
    let enemies = game.state().enemies.clone();
    game.set_input(FIRE);
    run_ticks(&mut game, &mut host, 500);
    assert_eq!(game.advance(Duration::from_secs(1), &mut host), 0);
    game.fire();

    assert_eq!(game.state().frame, frame);
    assert_eq!(game.state().enemies, enemies);
    assert!(game.state().bullets.is_empty());
    assert_eq!(host.asked, 1);
}

#[test]
fn advance_stops_at_the_losing_tick() {
    let mut game = doomed_game();
    let mut host = Recorder::default();
    run_ticks(&mut game, &mut host, 389);
    assert_eq!(game.status(), GameStatus::Running);

    // A long stall would allow several catch-up ticks; only one runs.
    let ran = game.advance(Duration::from_secs(60), &mut host);
    assert_eq!(ran, 1);
    assert_eq!(game.status(), GameStatus::GameOver);
    assert_eq!(game.state().frame, 390);
}

#[test]
fn play_again_resets_the_round() {
    let mut game = doomed_game();
    let mut host = Recorder::default();
    game.fire();
    lose_round(&mut game, &mut host);

    assert_eq!(game.resolve(RoundChoice::PlayAgain), Resolution::Continue);
    let s = game.state();
    assert_eq!(s.status, GameStatus::Running);
    assert_relative_eq!(s.player.x, 375.0);
    assert_relative_eq!(s.player.y, 540.0);
    assert!(s.bullets.is_empty());
    assert!(s.enemies.is_empty());
    assert_eq!(s.frame, 0);
    assert_eq!(game.input(), InputLatch::default());

    // Timers restart from zero too.
    run_ticks(&mut game, &mut host, 119);
    assert!(game.state().enemies.is_empty());
    run_ticks(&mut game, &mut host, 1);
    assert_eq!(game.state().enemies.len(), 1);
}

#[test]
fn quit_asks_the_host_to_exit() {
    let mut game = doomed_game();
    let mut host = Recorder::default();
    lose_round(&mut game, &mut host);
    assert_eq!(game.resolve(RoundChoice::Quit), Resolution::Exit);
    assert_eq!(game.status(), GameStatus::GameOver);
}

#[test]
fn resolving_while_running_changes_nothing() {
    let mut game = new_game();
    game.fire();
    assert_eq!(game.resolve(RoundChoice::Quit), Resolution::Continue);
    assert_eq!(game.resolve(RoundChoice::PlayAgain), Resolution::Continue);
    assert_eq!(game.state().bullets.len(), 1);
}
