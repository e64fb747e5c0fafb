use crate::constants::*;
use crate::entities::{Enemy, EntityId, Player, Projectile};
use crate::scoring::Scoreboard;
use crate::spawner::Spawner;
use log::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Kill {
    pub enemy: EntityId,
    pub projectile: EntityId,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectileHits {
    pub kills: Vec<Kill>,
    pub spent: Vec<EntityId>, // Every laser removed, in removal order
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub kills: Vec<Kill>,
    pub spent_projectiles: Vec<EntityId>,
    pub rammed_by: Vec<EntityId>, // Enemies that hit the player
    pub difficulty_steps: u32,
}

/// Pairs every enemy with the oldest live laser overlapping it. The enemy and
/// every live laser overlapping it are removed; the kill is credited to the
/// oldest. A laser is spent on at most one enemy.
pub fn resolve_projectile_hits(enemies: &mut Vec<Enemy>, projectiles: &mut Vec<Projectile>) -> ProjectileHits {
    let mut spent = vec![false; projectiles.len()];
    let mut hits = ProjectileHits::default();

    enemies.retain(|enemy| {
        let mut first = None;
        for (i, laser) in projectiles.iter().enumerate() {
            if !spent[i] && laser.rect.intersects(&enemy.rect) {
                spent[i] = true;
                hits.spent.push(laser.id);
                first.get_or_insert(laser.id);
            }
        }
        match first {
            Some(projectile) => {
                hits.kills.push(Kill { enemy: enemy.id, projectile });
                false
            }
            None => true,
        }
    });

    let mut index = 0;
    projectiles.retain(|_| {
        let keep = !spent[index];
        index += 1;
        keep
    });

    hits
}

/// Removes every enemy touching the player, one damage tick per enemy.
pub fn resolve_player_contacts(player: &mut Player, enemies: &mut Vec<Enemy>) -> Vec<EntityId> {
    let mut rammed_by = Vec::new();
    enemies.retain(|enemy| {
        if enemy.rect.intersects(&player.rect) {
            player.take_hit(ENEMY_CONTACT_DAMAGE);
            rammed_by.push(enemy.id);
            false
        } else {
            true
        }
    });
    rammed_by
}

/// Runs the laser pass, scores it kill by kill (each kill re-checks the
/// difficulty milestone), then runs the player contact pass.
pub fn resolve(
    player: &mut Player,
    enemies: &mut Vec<Enemy>,
    projectiles: &mut Vec<Projectile>,
    scoreboard: &mut Scoreboard,
    spawner: &mut Spawner,
) -> CollisionReport {
    let ProjectileHits { kills, spent } = resolve_projectile_hits(enemies, projectiles);
    let mut difficulty_steps = 0;
    for kill in &kills {
        if scoreboard.award_kill(spawner) {
            difficulty_steps += 1;
        }
        info!("Laser {} hit enemy {}. Score: {}", kill.projectile, kill.enemy, scoreboard.score());
    }

    let rammed_by = resolve_player_contacts(player, enemies);
    if !rammed_by.is_empty() {
        info!("Player hit by {} enemies. Health: {}", rammed_by.len(), player.health);
    }

    CollisionReport { kills, spent_projectiles: spent, rammed_by, difficulty_steps }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy_at(id: EntityId, x: i32, y: i32) -> Enemy {
        Enemy::new(id, x, y, 5)
    }

    fn laser_at(id: EntityId, x: i32, center_y: i32) -> Projectile {
        Projectile::new(id, x, center_y)
    }

    #[test]
    fn test_laser_destroys_overlapping_enemy() {
        let mut enemies = vec![enemy_at(1, 400, 100), enemy_at(2, 400, 400)];
        let mut lasers = vec![laser_at(3, 390, 140)];
        let hits = resolve_projectile_hits(&mut enemies, &mut lasers);
        assert_eq!(hits.kills, vec![Kill { enemy: 1, projectile: 3 }]);
        assert_eq!(hits.spent, vec![3]);
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].id, 2);
        assert!(lasers.is_empty());
    }

    #[test]
    fn test_two_lasers_on_one_enemy_score_once() {
        let mut enemies = vec![enemy_at(1, 400, 100)];
        let mut lasers = vec![laser_at(2, 390, 120), laser_at(3, 420, 150)];
        let hits = resolve_projectile_hits(&mut enemies, &mut lasers);
        assert_eq!(hits.kills, vec![Kill { enemy: 1, projectile: 2 }]);
        assert_eq!(hits.spent, vec![2, 3]);
        assert!(enemies.is_empty());
        assert!(lasers.is_empty());
    }

    #[test]
    fn test_lasers_spent_on_one_enemy_cannot_reach_the_next() {
        let mut player = Player::new();
        let mut scoreboard = Scoreboard::new();
        let mut spawner = Spawner::new();
        // Both lasers overlap enemy 1; the second also overlaps enemy 2 behind it.
        let mut enemies = vec![enemy_at(1, 400, 100), enemy_at(2, 470, 100)];
        let mut lasers = vec![laser_at(3, 390, 140), laser_at(4, 440, 140)];
        let report = resolve(&mut player, &mut enemies, &mut lasers, &mut scoreboard, &mut spawner);
        assert_eq!(report.kills, vec![Kill { enemy: 1, projectile: 3 }]);
        assert_eq!(report.spent_projectiles, vec![3, 4]);
        assert_eq!(scoreboard.score(), 10);
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].id, 2);
        assert!(lasers.is_empty());
    }

    #[test]
    fn test_one_laser_on_two_enemies_kills_one() {
        let mut enemies = vec![enemy_at(1, 400, 100), enemy_at(2, 400, 150)];
        let mut lasers = vec![laser_at(3, 380, 170)];
        let hits = resolve_projectile_hits(&mut enemies, &mut lasers);
        assert_eq!(hits.kills, vec![Kill { enemy: 1, projectile: 3 }]);
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].id, 2);
    }

    #[test]
    fn test_each_colliding_enemy_damages_player() {
        let mut player = Player::new();
        let mut enemies = vec![
            enemy_at(1, 60, 300),
            enemy_at(2, 80, 320),
            enemy_at(3, 100, 340),
            enemy_at(4, 600, 300),
        ];
        let rammed = resolve_player_contacts(&mut player, &mut enemies);
        assert_eq!(rammed, vec![1, 2, 3]);
        assert_eq!(player.health, 40);
        assert_eq!(enemies.len(), 1);
    }

    #[test]
    fn test_resolve_scores_kills_before_contacts() {
        let mut player = Player::new();
        let mut scoreboard = Scoreboard::new();
        let mut spawner = Spawner::new();
        // Enemy overlapping both the player and a laser counts as a kill, not a ram.
        let mut enemies = vec![enemy_at(1, 100, 300), enemy_at(2, 120, 330)];
        let mut lasers = vec![laser_at(3, 150, 350)];
        let report = resolve(&mut player, &mut enemies, &mut lasers, &mut scoreboard, &mut spawner);
        assert_eq!(report.kills.len(), 1);
        assert_eq!(report.rammed_by, vec![2]);
        assert_eq!(scoreboard.score(), 10);
        assert_eq!(player.health, 80);
        assert!(enemies.is_empty());
    }

    #[test]
    fn test_multi_kill_frame_ramps_per_milestone_crossed() {
        let mut player = Player::new();
        let mut scoreboard = Scoreboard::new();
        let mut spawner = Spawner::new();
        for _ in 0..9 {
            scoreboard.award_kill(&mut spawner);
        }
        assert_eq!(scoreboard.score(), 90);

        // Eleven kills in one frame: 100 and 200 are both reached.
        let slot = |i: u64| (200 + (i % 6) as i32 * 100, (i / 6) as i32 * 150);
        let mut enemies: Vec<Enemy> = (0..11).map(|i| { let (x, y) = slot(i); enemy_at(i, x, y) }).collect();
        let mut lasers: Vec<Projectile> = (0..11).map(|i| { let (x, y) = slot(i); laser_at(100 + i, x + 10, y + 40) }).collect();
        let report = resolve(&mut player, &mut enemies, &mut lasers, &mut scoreboard, &mut spawner);
        assert_eq!(report.kills.len(), 11);
        assert_eq!(scoreboard.score(), 200);
        assert_eq!(report.difficulty_steps, 2);
        assert_eq!(spawner.interval(), INITIAL_SPAWN_INTERVAL - 2 * SPAWN_INTERVAL_STEP);
    }

    #[test]
    fn test_multi_kill_frame_through_single_milestone_ramps_once() {
        let mut player = Player::new();
        let mut scoreboard = Scoreboard::new();
        let mut spawner = Spawner::new();
        for _ in 0..8 {
            scoreboard.award_kill(&mut spawner);
        }
        let mut enemies = vec![enemy_at(1, 400, 0), enemy_at(2, 400, 200), enemy_at(3, 400, 400)];
        let mut lasers = vec![laser_at(4, 400, 40), laser_at(5, 400, 240), laser_at(6, 400, 440)];
        let report = resolve(&mut player, &mut enemies, &mut lasers, &mut scoreboard, &mut spawner);
        assert_eq!(scoreboard.score(), 110);
        assert_eq!(report.difficulty_steps, 1);
        assert_eq!(spawner.interval(), INITIAL_SPAWN_INTERVAL - SPAWN_INTERVAL_STEP);
    }
}
