// Playfield
pub const PLAYFIELD_WIDTH: f64 = 576.0;
pub const FLOOR_Y: f64 = 800.0;
pub const FLOOR_WIDTH: f64 = 672.0;
pub const FLOOR_VELOCITY: f64 = 5.0;

// Frame pacing (logical ticks per second)
pub const TICKS_PER_SECOND: u32 = 30;

// Bird
pub const BIRD_START_X: f64 = 230.0;
pub const BIRD_START_Y: f64 = 350.0;
pub const BIRD_WIDTH: u32 = 68;
pub const BIRD_HEIGHT: u32 = 48;
pub const JUMP_VELOCITY: f64 = -10.5;
pub const GRAVITY: f64 = 3.0;
pub const TERMINAL_DISPLACEMENT: f64 = 16.0;
pub const ASCENT_BIAS: f64 = 2.0;
pub const TILT_MAX: f64 = 25.0;
pub const TILT_MIN: f64 = -90.0;
pub const ROTATION_VELOCITY: f64 = 20.0;
pub const TILT_HOLD_THRESHOLD: f64 = 5.0;
pub const WING_ANIMATION_TICKS: u64 = 5;
pub const DIVE_TILT: f64 = -80.0;

// Pipes
pub const PIPE_WIDTH: u32 = 104;
pub const PIPE_HEIGHT: u32 = 640;
pub const PIPE_LIP_HEIGHT: u32 = 24;
pub const PIPE_BODY_INSET: u32 = 4;

// Largest sprite side accepted from a config file
pub const MAX_SPRITE_SIDE: u32 = 4096;
pub const PIPE_GAP: f64 = 200.0;
pub const PIPE_VELOCITY: f64 = 5.0;
pub const PIPE_GAP_MIN: f64 = 50.0;
pub const PIPE_GAP_MAX: f64 = 450.0;
pub const FIRST_PIPE_X: f64 = 700.0;
pub const RESPAWN_PIPE_X: f64 = 600.0;

// Controller decision
pub const JUMP_THRESHOLD: f64 = 0.5;

// Fitness shaping
pub const SURVIVAL_REWARD: f64 = 0.1;
pub const COLLISION_PENALTY: f64 = 1.0;
pub const PASS_BONUS: f64 = 5.0;

// Episode end
pub const TARGET_SCORE: u32 = 35;
