use arcade_shooter::compute::init_state;
use arcade_shooter::config::GameConfig;
use arcade_shooter::entities::*;

#[test]
fn status_eq() {
    assert_eq!(GameStatus::Running, GameStatus::Running);
    assert_ne!(GameStatus::Running, GameStatus::GameOver);
}

#[test]
fn bounding_boxes_follow_position_and_size() {
    let enemy = Enemy {
        x: 10.0,
        y: -50.0,
        width: 50.0,
        height: 50.0,
        speed: 2.0,
    };
    let r = enemy.rect();
    assert_eq!(r, Rect::new(10.0, -50.0, 50.0, 50.0));
    assert_eq!(r.right(), 60.0);
    assert_eq!(r.bottom(), 0.0);

    let bullet = Bullet {
        x: 397.5,
        y: 540.0,
        width: 5.0,
        height: 10.0,
        speed: 7.0,
    };
    assert_eq!(bullet.rect().right(), 402.5);
    assert_eq!(bullet.rect().bottom(), 550.0);
}

#[test]
fn game_state_clone_is_independent() {
    let original = init_state(&GameConfig::default());
    let mut cloned = original.clone();

    // Mutating the clone must not affect the original
    cloned.player.x = 99.0;
    cloned.frame = 999;
    cloned.enemies.push(Enemy {
        x: 5.0,
        y: 5.0,
        width: 50.0,
        height: 50.0,
        speed: 2.0,
    });

    assert_eq!(original.player.x, 375.0);
    assert_eq!(original.frame, 0);
    assert!(original.enemies.is_empty());
}
