//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (and, where needed, an RNG handle or the input latch) and
//! returns a brand-new `GameState`.  Side effects are limited to the injected
//! RNG.  Entity removal is always a stable filter pass, so survivors keep
//! their relative order.

use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Bounded, Bullet, Enemy, GameState, GameStatus, Player, Rect};
use crate::input::InputLatch;

// ── Constructors ─────────────────────────────────────────────────────────────

/// The player centred horizontally, resting `bottom_margin` above the floor.
pub fn initial_player(config: &GameConfig) -> Player {
    let p = &config.player;
    Player {
        x: config.canvas.width / 2.0 - p.width / 2.0,
        y: config.canvas.height - p.height - p.bottom_margin,
        width: p.width,
        height: p.height,
        speed: p.speed,
    }
}

/// Build the initial game state for a given configuration.
pub fn init_state(config: &GameConfig) -> GameState {
    GameState {
        player: initial_player(config),
        bullets: Vec::new(),
        enemies: Vec::new(),
        status: GameStatus::Running,
        frame: 0,
        width: config.canvas.width,
        height: config.canvas.height,
        config: config.clone(),
    }
}

// ── Spawner ──────────────────────────────────────────────────────────────────

/// Fire one bullet from the player's horizontal midpoint at its top edge.
pub fn create_bullet(state: &GameState) -> GameState {
    let b = &state.config.bullet;
    let p = &state.player;
    let mut bullets = state.bullets.clone();
    bullets.push(Bullet {
        x: p.x + p.width / 2.0 - b.width / 2.0,
        y: p.y,
        width: b.width,
        height: b.height,
        speed: b.speed,
    });
    GameState {
        bullets,
        ..state.clone()
    }
}

/// Drop one enemy in fully above the top edge at a uniformly random column.
pub fn create_enemy(state: &GameState, rng: &mut impl Rng) -> GameState {
    let e = &state.config.enemy;
    let span = (state.width - e.width).max(0.0);
    let x = rng.gen::<f32>() * span;
    log::debug!("Spawning enemy at x={:.1}", x);

    let mut enemies = state.enemies.clone();
    enemies.push(Enemy {
        x,
        y: -e.height,
        width: e.width,
        height: e.height,
        speed: e.speed,
    });
    GameState {
        enemies,
        ..state.clone()
    }
}

// ── Mover ────────────────────────────────────────────────────────────────────

/// Move the player by its speed in the held direction, clamped to the canvas.
/// Holding both directions (or neither) leaves the player where it is.
pub fn update_player(state: &GameState, input: &InputLatch) -> GameState {
    let p = &state.player;
    let max_x = (state.width - p.width).max(0.0);
    let x = match (input.left, input.right) {
        (false, true) => (p.x + p.speed).min(max_x),
        (true, false) => (p.x - p.speed).max(0.0),
        _ => return state.clone(),
    };
    GameState {
        player: Player { x, ..p.clone() },
        ..state.clone()
    }
}

/// Advance every bullet upward; drop those whose top has passed `y = 0`.
pub fn update_bullets(state: &GameState) -> GameState {
    let bullets: Vec<Bullet> = state
        .bullets
        .iter()
        .map(|b| Bullet {
            y: b.y - b.speed,
            ..b.clone()
        })
        .filter(|b| b.y >= 0.0)
        .collect();
    GameState {
        bullets,
        ..state.clone()
    }
}

/// Advance every enemy downward; drop those whose top has passed the bottom.
pub fn update_enemies(state: &GameState) -> GameState {
    let enemies: Vec<Enemy> = state
        .enemies
        .iter()
        .map(|e| Enemy {
            y: e.y + e.speed,
            ..e.clone()
        })
        .filter(|e| e.y <= state.height)
        .collect();
    GameState {
        enemies,
        ..state.clone()
    }
}

// ── Collision ────────────────────────────────────────────────────────────────

/// Strict AABB overlap: boxes that only share an edge do not collide.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Resolve bullet ↔ enemy hits.  Each bullet destroys at most the first live
/// enemy it overlaps, and an enemy destroyed by an earlier bullet is no
/// longer a target for later ones.
pub fn check_collisions(state: &GameState) -> GameState {
    let mut killed_enemies: Vec<usize> = Vec::new();
    let mut used_bullets: Vec<usize> = Vec::new();

    for (bi, bullet) in state.bullets.iter().enumerate() {
        let hit = state.enemies.iter().enumerate().find(|(ei, enemy)| {
            !killed_enemies.contains(ei) && overlaps(&bullet.rect(), &enemy.rect())
        });
        if let Some((ei, _)) = hit {
            killed_enemies.push(ei);
            used_bullets.push(bi);
        }
    }

    if used_bullets.is_empty() {
        return state.clone();
    }

    let enemies: Vec<Enemy> = state
        .enemies
        .iter()
        .enumerate()
        .filter(|(i, _)| !killed_enemies.contains(i))
        .map(|(_, e)| e.clone())
        .collect();

    let bullets: Vec<Bullet> = state
        .bullets
        .iter()
        .enumerate()
        .filter(|(i, _)| !used_bullets.contains(i))
        .map(|(_, b)| b.clone())
        .collect();

    GameState {
        enemies,
        bullets,
        ..state.clone()
    }
}

/// True as soon as any enemy overlaps the player.  Nothing is removed.
pub fn check_player_collisions(state: &GameState) -> bool {
    let player = state.player.rect();
    state.enemies.iter().any(|e| overlaps(&player, &e.rect()))
}

// ── Per-tick simulation ──────────────────────────────────────────────────────

/// Move everything one step and resolve hits.  Ends the round if an enemy
/// reaches the player.  Spawning is driven by the scheduler, not here.
pub fn tick(state: &GameState, input: &InputLatch) -> GameState {
    if state.status == GameStatus::GameOver {
        return state.clone();
    }

    let next = update_player(state, input);
    let next = update_bullets(&next);
    let next = update_enemies(&next);
    let next = check_collisions(&next);

    let status = if check_player_collisions(&next) {
        GameStatus::GameOver
    } else {
        GameStatus::Running
    };

    GameState {
        status,
        frame: state.frame + 1,
        ..next
    }
}
