use std::io;
use std::thread;
use std::time::{Duration, Instant};
use crossterm::style::Color;
use log::{debug, info};

use crate::constants::*;
use crate::game_state::{GameState, TickReport};
use crate::rendering::Renderer;
use crate::terminal_io::InputProvider;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub score: i64,
    pub game_over: bool,
}

/// Drives the fixed-rate loop: poll input, tick the state, render.
pub struct Game<I: InputProvider, R: Renderer> {
    input: I,
    renderer: R,
    state: GameState,
    max_frames: Option<u64>,
    paced: bool,
}

impl<I: InputProvider, R: Renderer> Game<I, R> {
    pub fn new(input: I, renderer: R, state: GameState, max_frames: Option<u64>, paced: bool) -> Self {
        Game { input, renderer, state, max_frames, paced }
    }

    #[cfg(test)]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn run(&mut self) -> io::Result<RunSummary> {
        let frame_duration = Duration::from_secs(1) / FRAMES_PER_SECOND as u32;
        let mut frame_count = 0;

        while self.max_frames.is_none_or(|max| frame_count < max) {
            let frame_start = Instant::now();

            let input = self.input.poll(frame_count)?;
            if input.quit {
                info!("Quit requested on frame {}. Exiting game loop.", frame_count);
                break;
            }
            if let Some((width, height)) = input.resize {
                self.renderer.resize(width, height);
            }

            let report = self.state.tick(&input);
            log_report(frame_count, &report, self.state.spawn_interval());

            self.render()?;
            frame_count += 1;

            if self.paced {
                if let Some(remaining) = frame_duration.checked_sub(frame_start.elapsed()) {
                    thread::sleep(remaining);
                }
            }
        }

        Ok(RunSummary { frames: frame_count, score: self.state.score(), game_over: self.state.game_over })
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.begin_frame();
        self.renderer.draw(&self.state.draw_list());

        self.renderer.draw_text(&format!("Score: {}", self.state.score()), HUD_SCORE_POSITION, Color::White);
        self.renderer.draw_text(&format!("Health: {}", self.state.player.health), HUD_HEALTH_POSITION, Color::White);

        if self.state.game_over {
            self.renderer.draw_text_centered("GAME OVER", SCREEN_HEIGHT / 2, Color::Red);
            self.renderer.draw_text_centered("Press R to restart", SCREEN_HEIGHT / 2 + RESTART_HINT_OFFSET, Color::White);
        }

        self.renderer.present()
    }
}

fn log_report(frame: u64, report: &TickReport, spawn_interval: u32) {
    if report.shot_fired {
        debug!("Frame {}: laser fired", frame);
    }
    if let Some(id) = report.spawned {
        debug!("Frame {}: enemy {} entered", frame, id);
    }
    for removal in &report.removals {
        debug!("Frame {}: {} {} removed ({:?})", frame, removal.kind.name(), removal.id, removal.outcome);
    }
    if !report.kills.is_empty() || report.player_hits > 0 {
        info!("Frame {}: {} kills, {} hits taken", frame, report.kills.len(), report.player_hits);
    }
    if report.difficulty_steps > 0 {
        info!(
            "Frame {}: difficulty raised {} step(s), spawn interval now {}",
            frame, report.difficulty_steps, spawn_interval
        );
    }
    if report.escaped > 0 {
        info!("Frame {}: {} enemies escaped", frame, report.escaped);
    }
    if report.restarted {
        info!("Frame {}: new game started", frame);
    }
    if report.game_over {
        info!("Frame {}: game over", frame);
    }
}
