use std::io;
use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    style::ResetColor,
    terminal::{disable_raw_mode, enable_raw_mode, size, supports_keyboard_enhancement},
};
use log::{error, info};

mod assets;
mod collision;
mod config;
mod constants;
mod entities;
mod game;
mod game_state;
mod rendering;
mod scoring;
mod spawner;
mod terminal_io;
mod types;

use assets::Assets;
use config::{Cli, DEBUG_DEFAULT_FRAMES};
use game::{Game, RunSummary};
use game_state::GameState;
use rendering::{OutputTarget, ScreenBuffer, TerminalRenderer};
use terminal_io::{SimulatedInput, TerminalInput};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    simple_logging::log_to_file(&cli.log_file, cli.log_level())
        .with_context(|| format!("failed to open log file {}", cli.log_file.display()))?;
    info!("Starting space-shooter application.");

    let assets = Assets::load(&cli.assets);
    let state = GameState::new(cli.seed);

    let summary = if cli.debug {
        run_debug(&cli, assets, state)?
    } else {
        run_terminal(&cli, assets, state)?
    };

    info!(
        "Session ended after {} frames. Score: {}{}",
        summary.frames,
        summary.score,
        if summary.game_over { " (game over)" } else { "" }
    );
    Ok(())
}

/// Headless run: scripted input, frames logged from an in-memory screen.
fn run_debug(cli: &Cli, assets: Assets, state: GameState) -> anyhow::Result<RunSummary> {
    info!("Debug mode enabled. Resolution set to {}x{}", cli.width, cli.height);
    let frames = cli.frame_limit().unwrap_or(DEBUG_DEFAULT_FRAMES);
    let target = OutputTarget::ScreenBuffer(ScreenBuffer::new(cli.width, cli.height));
    let renderer = TerminalRenderer::new(target, cli.width, cli.height, assets);
    let mut game = Game::new(SimulatedInput::demo_script(frames), renderer, state, Some(frames), false);
    game.run().context("debug run failed")
}

fn run_terminal(cli: &Cli, assets: Assets, state: GameState) -> anyhow::Result<RunSummary> {
    info!("Attempting to enable raw mode.");
    enable_raw_mode()
        .map_err(|e| { error!("Failed to enable raw mode: {}", e); e })
        .context("failed to enable raw mode")?;

    let enhanced = matches!(supports_keyboard_enhancement(), Ok(true));
    if enhanced {
        // Lets movement keys report releases instead of relying on the hold lapse.
        if let Err(e) = execute!(io::stdout(), PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)) {
            error!("Failed to enable key release reporting: {}", e);
        }
    }

    let result = play(cli, assets, state);

    if enhanced {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    let restored = execute!(io::stdout(), ResetColor, Show)
        .and_then(|_| disable_raw_mode())
        .map_err(|e| { error!("Failed to restore terminal: {}", e); e });

    let summary = result.context("game loop failed")?;
    restored.context("failed to restore terminal")?;
    Ok(summary)
}

fn play(cli: &Cli, assets: Assets, state: GameState) -> io::Result<RunSummary> {
    let (width, height) = size().map_err(|e| { error!("Failed to get terminal size: {}", e); e })?;
    info!("Terminal size: {}x{}", width, height);

    let mut renderer = TerminalRenderer::new(OutputTarget::Stdout(io::stdout()), width, height, assets);
    renderer.clear_screen().map_err(|e| { error!("Failed to clear screen manually: {}", e); e })?;
    execute!(io::stdout(), Hide).map_err(|e| { error!("Failed to hide cursor: {}", e); e })?;

    let mut game = Game::new(TerminalInput::new(), renderer, state, cli.max_frames, true);
    game.run()
}
