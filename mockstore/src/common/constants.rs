// field paths
pub const FIELD_SEPARATOR: &str = ".";

// store paths
pub const PATH_SEPARATOR: char = '/';

// auto id
pub const AUTO_ID_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
pub const DEFAULT_AUTO_ID_LENGTH: usize = 20;
pub const MIN_AUTO_ID_LENGTH: usize = 8;
pub const DEFAULT_MAX_ID_ATTEMPTS: u32 = 16;
