use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::collision::{self, Kill};
use crate::entities::{Enemy, EntityId, EntityKind, Player, Projectile, UpdateOutcome};
use crate::scoring::Scoreboard;
use crate::spawner::Spawner;
use crate::terminal_io::FrameInput;
use crate::types::Rect;

/// One entry of the render list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawCommand {
    pub kind: EntityKind,
    pub rect: Rect,
}

/// An enemy or laser leaving play this frame, and why.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Removal {
    pub kind: EntityKind,
    pub id: EntityId,
    pub outcome: UpdateOutcome,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub shot_fired: bool,
    pub spawned: Option<EntityId>,
    pub kills: Vec<Kill>,
    pub escaped: u32,
    pub player_hits: u32,
    pub difficulty_steps: u32,
    pub removals: Vec<Removal>,
    pub game_over: bool,  // The game ended on this frame
    pub restarted: bool,
}

/// Authoritative state of one play session plus the frame pipeline that advances it.
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub spawner: Spawner,
    pub scoreboard: Scoreboard,
    pub game_over: bool,
    pub frame_count: u64,
    next_id: EntityId,
    rng: StdRng,
}

impl GameState {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        GameState {
            player: Player::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            spawner: Spawner::new(),
            scoreboard: Scoreboard::new(),
            game_over: false,
            frame_count: 0,
            next_id: 1,
            rng,
        }
    }

    pub fn score(&self) -> i64 {
        self.scoreboard.score()
    }

    pub fn spawn_interval(&self) -> u32 {
        self.spawner.interval()
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Runs one frame: input, player, spawner, movement, collisions, terminal check.
    pub fn tick(&mut self, input: &FrameInput) -> TickReport {
        let mut report = TickReport::default();

        if self.game_over {
            if input.restart_pressed {
                report.restarted = self.restart();
            }
            return report;
        }

        if input.shoot_pressed {
            let id = self.next_id;
            if let Some(laser) = self.player.shoot(id) {
                self.allocate_id();
                self.projectiles.push(laser);
                report.shot_fired = true;
            }
        }

        self.player.update(input.move_up_held, input.move_down_held);

        let id = self.next_id;
        if let Some(enemy) = self.spawner.tick(id, &mut self.rng) {
            self.allocate_id();
            report.spawned = Some(enemy.id);
            self.enemies.push(enemy);
        }

        self.advance_entities(&mut report);

        let collisions = collision::resolve(
            &mut self.player,
            &mut self.enemies,
            &mut self.projectiles,
            &mut self.scoreboard,
            &mut self.spawner,
        );
        report.player_hits = collisions.rammed_by.len() as u32;
        report.difficulty_steps = collisions.difficulty_steps;
        for kill in &collisions.kills {
            report.removals.push(Removal { kind: EntityKind::Enemy, id: kill.enemy, outcome: UpdateOutcome::Destroyed });
        }
        for &id in &collisions.spent_projectiles {
            report.removals.push(Removal { kind: EntityKind::Projectile, id, outcome: UpdateOutcome::Destroyed });
        }
        for &id in &collisions.rammed_by {
            report.removals.push(Removal { kind: EntityKind::Enemy, id, outcome: UpdateOutcome::Destroyed });
        }
        report.kills = collisions.kills;

        if self.player.is_dead() {
            self.game_over = true;
            report.game_over = true;
            info!("Player destroyed on frame {}. Final score: {}", self.frame_count, self.score());
        }

        self.frame_count += 1;
        report
    }

    fn advance_entities(&mut self, report: &mut TickReport) {
        let scoreboard = &mut self.scoreboard;
        self.enemies.retain_mut(|enemy| match enemy.update() {
            UpdateOutcome::Expired => {
                scoreboard.penalize_escape();
                report.escaped += 1;
                report.removals.push(Removal { kind: EntityKind::Enemy, id: enemy.id, outcome: UpdateOutcome::Expired });
                debug!("Enemy {} escaped. Score: {}", enemy.id, scoreboard.score());
                false
            }
            _ => true,
        });

        self.projectiles.retain_mut(|laser| match laser.update() {
            UpdateOutcome::Expired => {
                report.removals.push(Removal { kind: EntityKind::Projectile, id: laser.id, outcome: UpdateOutcome::Expired });
                false
            }
            _ => true,
        });
    }

    /// Starts a fresh session. Only allowed once the current one is over.
    /// The spawn timer carries over; only the interval goes back to its start.
    pub fn restart(&mut self) -> bool {
        if !self.game_over {
            return false;
        }
        self.player = Player::new();
        self.enemies.clear();
        self.projectiles.clear();
        self.spawner.reset_interval();
        self.scoreboard = Scoreboard::new();
        self.game_over = false;
        info!("Game restarted.");
        true
    }

    /// Player first, then enemies and lasers in creation order.
    pub fn draw_list(&self) -> Vec<DrawCommand> {
        let mut others: Vec<(EntityId, DrawCommand)> = self
            .enemies
            .iter()
            .map(|e| (e.id, DrawCommand { kind: EntityKind::Enemy, rect: e.rect }))
            .chain(
                self.projectiles
                    .iter()
                    .map(|p| (p.id, DrawCommand { kind: EntityKind::Projectile, rect: p.rect })),
            )
            .collect();
        others.sort_by_key(|(id, _)| *id);

        let mut list = Vec::with_capacity(others.len() + 1);
        list.push(DrawCommand { kind: EntityKind::Player, rect: self.player.rect });
        list.extend(others.into_iter().map(|(_, cmd)| cmd));
        list
    }
}
