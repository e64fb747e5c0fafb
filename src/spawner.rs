use crate::constants::*;
use crate::entities::{Enemy, EntityId};
use log::{debug, info};
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnPhase {
    Counting,
    Triggered,
}

/// Frame-counting enemy spawner. The interval only ever shrinks within a session.
#[derive(Clone, Debug)]
pub struct Spawner {
    interval: u32,
    timer: u32,
}

impl Spawner {
    pub fn new() -> Self {
        Spawner { interval: INITIAL_SPAWN_INTERVAL, timer: 0 }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    #[cfg(test)]
    pub fn timer(&self) -> u32 {
        self.timer
    }

    /// Back to the starting interval for a new session. The timer keeps counting.
    pub fn reset_interval(&mut self) {
        self.interval = INITIAL_SPAWN_INTERVAL;
    }

    /// Advances the timer by one frame and reports whether a spawn is due.
    pub fn advance(&mut self) -> SpawnPhase {
        self.timer += 1;
        if self.timer >= self.interval {
            self.timer = 0;
            SpawnPhase::Triggered
        } else {
            SpawnPhase::Counting
        }
    }

    pub fn tick(&mut self, id: EntityId, rng: &mut impl Rng) -> Option<Enemy> {
        match self.advance() {
            SpawnPhase::Counting => None,
            SpawnPhase::Triggered => {
                let enemy = spawn_enemy(id, rng);
                debug!("Enemy {} spawned at y={} speed={}", id, enemy.rect.y, enemy.speed);
                Some(enemy)
            }
        }
    }

    /// Shortens the interval by one step unless it is already at the floor.
    pub fn accelerate(&mut self) -> bool {
        if self.interval > MIN_SPAWN_INTERVAL {
            self.interval = self.interval.saturating_sub(SPAWN_INTERVAL_STEP).max(MIN_SPAWN_INTERVAL);
            info!("Difficulty increased. Spawn interval: {} frames", self.interval);
            true
        } else {
            false
        }
    }
}

impl Default for Spawner {
    fn default() -> Self {
        Spawner::new()
    }
}

pub fn spawn_enemy(id: EntityId, rng: &mut impl Rng) -> Enemy {
    let y = rng.gen_range(0..=SCREEN_HEIGHT - ENEMY_HEIGHT);
    let speed = rng.gen_range(ENEMY_MIN_SPEED..=ENEMY_MAX_SPEED);
    Enemy::new(id, SCREEN_WIDTH, y, speed)
}
