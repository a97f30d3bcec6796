/// Absolute length tolerance used when neither the CLI nor the descriptor supplies one
pub const DEFAULT_ABSOLUTE_TOLERANCE: f64 = 0.001;

/// Points per chunk for parallel bounds reduction
pub const BOUNDS_CHUNK_SIZE: usize = 25_000;

/// Progress bar layout shared by every long-running loop
pub const PROGRESS_TEMPLATE: &str = "[{bar:40.green/blue}] {pos}/{len} rows ({percent}%) {msg}";
pub const PROGRESS_CHARS: &str = "▉▊▋▌▍▎▏ ";
