use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "space-shooter")]
#[command(about = "Side-scrolling space shooter for the terminal")]
pub struct Cli {
    /// Run headless against a scripted input table, logging every frame
    #[arg(long)]
    pub debug: bool,

    /// Screen width in debug mode
    #[arg(long, default_value_t = 80)]
    pub width: u16,

    /// Screen height in debug mode
    #[arg(long, default_value_t = 24)]
    pub height: u16,

    /// Stop after this many frames
    #[arg(long)]
    pub max_frames: Option<u64>,

    /// Seed for enemy placement; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory holding the sprite art files
    #[arg(long, default_value = "assets")]
    pub assets: PathBuf,

    /// Log file path
    #[arg(long, default_value = "space-shooter.log")]
    pub log_file: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }

    /// Frame budget for the run. Debug mode always terminates.
    pub fn frame_limit(&self) -> Option<u64> {
        match (self.max_frames, self.debug) {
            (Some(frames), _) => Some(frames),
            (None, true) => Some(DEBUG_DEFAULT_FRAMES),
            (None, false) => None,
        }
    }
}

pub const DEBUG_DEFAULT_FRAMES: u64 = 300;
