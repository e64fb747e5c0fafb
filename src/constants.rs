// --- Playfield ---
pub const SCREEN_WIDTH: i32 = 800;
pub const SCREEN_HEIGHT: i32 = 600;
pub const FRAMES_PER_SECOND: u64 = 60;

// --- Player ---
pub const PLAYER_WIDTH: i32 = 100;
pub const PLAYER_HEIGHT: i32 = 100;
pub const PLAYER_START_X: i32 = 50;
pub const PLAYER_START_Y: i32 = SCREEN_HEIGHT / 2;
pub const PLAYER_SPEED: i32 = 5;
pub const PLAYER_MAX_HEALTH: i32 = 100;
pub const SHOT_COOLDOWN_FRAMES: u32 = 15;

// --- Enemies ---
pub const ENEMY_WIDTH: i32 = 80;
pub const ENEMY_HEIGHT: i32 = 80;
pub const ENEMY_MIN_SPEED: i32 = 3;
pub const ENEMY_MAX_SPEED: i32 = 7; // Inclusive
pub const ENEMY_CONTACT_DAMAGE: i32 = 20;

// --- Lasers ---
pub const LASER_WIDTH: i32 = 50;
pub const LASER_HEIGHT: i32 = 20;
pub const LASER_SPEED: i32 = 10;

// --- Scoring & difficulty ---
pub const SCORE_PER_KILL: i64 = 10;
pub const ESCAPE_PENALTY: i64 = 5;
pub const DIFFICULTY_MILESTONE: i64 = 100;
pub const INITIAL_SPAWN_INTERVAL: u32 = 60; // Frames between enemy spawns
pub const MIN_SPAWN_INTERVAL: u32 = 20;
pub const SPAWN_INTERVAL_STEP: u32 = 5;

// --- Input ---
pub const HOLD_FRAMES: u64 = 8; // Movement hold lapse when the terminal never reports key releases

// --- Rendering ---
pub const BACKGROUND_STAR_COUNT: usize = 100;
pub const HUD_SCORE_POSITION: (i32, i32) = (10, 10);
pub const HUD_HEALTH_POSITION: (i32, i32) = (10, 50);
pub const RESTART_HINT_OFFSET: i32 = 50;
