use crate::constants::*;
use crate::types::{Rect, clamp_coordinate};
use log::debug;

/// Closed set of drawable things. Sprites and nominal sizes are looked up by kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Enemy,
    Projectile,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Player, EntityKind::Enemy, EntityKind::Projectile];

    pub fn nominal_size(self) -> (i32, i32) {
        match self {
            EntityKind::Player => (PLAYER_WIDTH, PLAYER_HEIGHT),
            EntityKind::Enemy => (ENEMY_WIDTH, ENEMY_HEIGHT),
            EntityKind::Projectile => (LASER_WIDTH, LASER_HEIGHT),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Player => "player",
            EntityKind::Enemy => "enemy",
            EntityKind::Projectile => "laser",
        }
    }
}

/// Creation-order id for enemies and projectiles.
pub type EntityId = u64;

/// What an entity's per-frame update asks the orchestrator to do with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Alive,
    /// Left the playfield on its own this frame.
    Expired,
    /// Consumed by a collision this frame.
    Destroyed,
}

// --- Player ship ---
#[derive(Clone, Debug)]
pub struct Player {
    pub rect: Rect,
    pub speed: i32,
    pub health: i32,
    pub cooldown: u32, // Frames until the next shot is allowed
}

impl Player {
    pub fn new() -> Self {
        Player {
            rect: Rect::new(PLAYER_START_X, PLAYER_START_Y, PLAYER_WIDTH, PLAYER_HEIGHT),
            speed: PLAYER_SPEED,
            health: PLAYER_MAX_HEALTH,
            cooldown: 0,
        }
    }

    pub fn update(&mut self, move_up: bool, move_down: bool) {
        if move_up {
            self.rect.y -= self.speed;
        }
        if move_down {
            self.rect.y += self.speed;
        }
        self.rect.y = clamp_coordinate(self.rect.y, 0, SCREEN_HEIGHT - self.rect.height);

        self.cooldown = self.cooldown.saturating_sub(1);
    }

    pub fn shoot(&mut self, id: EntityId) -> Option<Projectile> {
        if self.cooldown > 0 {
            return None;
        }
        self.cooldown = SHOT_COOLDOWN_FRAMES;
        debug!("Laser {} fired from y={}", id, self.rect.centery());
        Some(Projectile::new(id, self.rect.right(), self.rect.centery()))
    }

    pub fn take_hit(&mut self, damage: i32) {
        self.health = (self.health - damage).max(0);
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}

impl Default for Player {
    fn default() -> Self {
        Player::new()
    }
}

// --- Enemy ship ---
#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: EntityId,
    pub rect: Rect,
    pub speed: i32,
}

impl Enemy {
    pub fn new(id: EntityId, x: i32, y: i32, speed: i32) -> Self {
        Enemy { id, rect: Rect::new(x, y, ENEMY_WIDTH, ENEMY_HEIGHT), speed }
    }

    pub fn update(&mut self) -> UpdateOutcome {
        self.rect.translate(-self.speed, 0);
        if self.rect.right() < 0 {
            UpdateOutcome::Expired
        } else {
            UpdateOutcome::Alive
        }
    }
}

// --- Laser ---
#[derive(Clone, Debug)]
pub struct Projectile {
    pub id: EntityId,
    pub rect: Rect,
    pub speed: i32,
}

impl Projectile {
    /// `x` is the left edge, `center_y` the vertical centre of the laser.
    pub fn new(id: EntityId, x: i32, center_y: i32) -> Self {
        Projectile {
            id,
            rect: Rect::new(x, center_y - LASER_HEIGHT / 2, LASER_WIDTH, LASER_HEIGHT),
            speed: LASER_SPEED,
        }
    }

    pub fn update(&mut self) -> UpdateOutcome {
        self.rect.translate(self.speed, 0);
        if self.rect.left() > SCREEN_WIDTH {
            UpdateOutcome::Expired
        } else {
            UpdateOutcome::Alive
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_starts_at_spawn_point() {
        let player = Player::new();
        assert_eq!(player.rect, Rect::new(50, 300, 100, 100));
        assert_eq!(player.health, 100);
        assert_eq!(player.cooldown, 0);
    }

    #[test]
    fn test_player_moves_vertically_only() {
        let mut player = Player::new();
        player.update(true, false);
        assert_eq!(player.rect.y, 295);
        assert_eq!(player.rect.x, 50);
        player.update(false, true);
        player.update(false, true);
        assert_eq!(player.rect.y, 305);
        player.update(true, true);
        assert_eq!(player.rect.y, 305);
    }

    #[test]
    fn test_player_is_clamped_to_playfield() {
        let mut player = Player::new();
        for _ in 0..200 {
            player.update(true, false);
            assert!(player.rect.y >= 0);
        }
        assert_eq!(player.rect.y, 0);

        player.speed = 7; // Not a divisor of the travel distance
        for _ in 0..200 {
            player.update(false, true);
            assert!(player.rect.y <= SCREEN_HEIGHT - PLAYER_HEIGHT);
        }
        assert_eq!(player.rect.y, SCREEN_HEIGHT - PLAYER_HEIGHT);
    }

    #[test]
    fn test_shoot_sets_cooldown_and_blocks_until_zero() {
        let mut player = Player::new();
        let laser = player.shoot(1).expect("first shot must fire");
        assert_eq!(player.cooldown, SHOT_COOLDOWN_FRAMES);
        assert_eq!(laser.rect.left(), player.rect.right());
        assert_eq!(laser.rect.centery(), player.rect.centery());

        for _ in 0..14 {
            player.update(false, false);
            assert!(player.shoot(2).is_none());
        }
        player.update(false, false);
        assert_eq!(player.cooldown, 0);
        assert!(player.shoot(2).is_some());
    }

    #[test]
    fn test_cooldown_never_goes_negative() {
        let mut player = Player::new();
        player.update(false, false);
        player.update(false, false);
        assert_eq!(player.cooldown, 0);
    }

    #[test]
    fn test_take_hit_saturates_at_zero() {
        let mut player = Player::new();
        player.take_hit(ENEMY_CONTACT_DAMAGE * 3);
        assert_eq!(player.health, 40);
        assert!(!player.is_dead());
        player.take_hit(ENEMY_CONTACT_DAMAGE * 3);
        assert_eq!(player.health, 0);
        assert!(player.is_dead());
    }

    #[test]
    fn test_enemy_expires_when_right_edge_passes_left_boundary() {
        let mut enemy = Enemy::new(1, 0, 100, 5);
        for _ in 0..16 {
            assert_eq!(enemy.update(), UpdateOutcome::Alive);
        }
        assert_eq!(enemy.rect.right(), 0);
        assert_eq!(enemy.update(), UpdateOutcome::Expired);
        assert_eq!(enemy.rect.y, 100);
    }

    #[test]
    fn test_projectile_expires_when_left_edge_passes_right_boundary() {
        let mut laser = Projectile::new(1, SCREEN_WIDTH - 10, 300);
        assert_eq!(laser.update(), UpdateOutcome::Alive);
        assert_eq!(laser.rect.left(), SCREEN_WIDTH);
        assert_eq!(laser.update(), UpdateOutcome::Expired);
    }

    #[test]
    fn test_nominal_sizes() {
        assert_eq!(EntityKind::Player.nominal_size(), (100, 100));
        assert_eq!(EntityKind::Enemy.nominal_size(), (80, 80));
        assert_eq!(EntityKind::Projectile.nominal_size(), (50, 20));
    }
}
