//! Fixed byte layout of a 31-sample MOD file

/// Number of sample headers in the file
pub const SAMPLE_COUNT: usize = 31;

/// Size of the position (order) table
pub const POSITION_TABLE_SIZE: usize = 128;

/// Rows in every pattern
pub const ROWS_PER_PATTERN: usize = 64;

/// Bytes per pattern cell
pub const CELL_SIZE: usize = 4;

/// Size of a sample header in bytes
pub const SAMPLE_HEADER_SIZE: usize = 30;

/// Size of the whole header, up to and including the identifier tag
pub const HEADER_SIZE: usize = offset::PATTERN_DATA;

/// File offsets (in bytes)
pub mod offset {
    /// Song title, NUL padded
    pub const TITLE: usize = 0;
    /// First of 31 sample headers
    pub const SAMPLE_HEADERS: usize = 20;
    /// Number of meaningful entries in the position table
    pub const POSITION_COUNT: usize = 950;
    /// Restart position
    pub const LOOP_POINT: usize = 951;
    /// Position table (128 pattern indices)
    pub const POSITIONS: usize = 952;
    /// Four-byte identifier tag ("M.K.", "8CHN", ...)
    pub const IDENTIFIER: usize = 1080;
    /// Start of pattern data
    pub const PATTERN_DATA: usize = 1084;
}

/// Field offsets within a sample header
pub mod sample {
    pub const NAME: usize = 0;
    pub const NAME_SIZE: usize = 22;
    /// Length in 16-bit words, big-endian
    pub const LENGTH: usize = 22;
    /// Low nibble is a two's-complement finetune
    pub const FINETUNE: usize = 24;
    pub const VOLUME: usize = 25;
    /// Repeat offset in words, big-endian
    pub const REPEAT_OFFSET: usize = 26;
    /// Repeat length in words, big-endian
    pub const REPEAT_LENGTH: usize = 28;
}

/// Title field size
pub const TITLE_SIZE: usize = 20;

/// Size of one pattern for the given channel count
pub fn pattern_size(channel_count: usize) -> usize {
    ROWS_PER_PATTERN * channel_count * CELL_SIZE
}
