use crate::constants::*;
use crate::spawner::Spawner;
use log::info;

/// Running score for one session. Kills feed the difficulty ramp; escapes never do.
#[derive(Clone, Debug, Default)]
pub struct Scoreboard {
    score: i64,
}

impl Scoreboard {
    pub fn new() -> Self {
        Scoreboard { score: 0 }
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    /// Awards one kill, then re-checks the milestone rule for this kill alone.
    /// Returns true when the spawner was sped up.
    pub fn award_kill(&mut self, spawner: &mut Spawner) -> bool {
        self.score += SCORE_PER_KILL;
        if self.score > 0 && self.score % DIFFICULTY_MILESTONE == 0 {
            info!("Score milestone reached: {}", self.score);
            return spawner.accelerate();
        }
        false
    }

    pub fn penalize_escape(&mut self) {
        self.score -= ESCAPE_PENALTY;
    }
}
