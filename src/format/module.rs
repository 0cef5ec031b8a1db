//! Decoded module data model

use super::cell::Cell;
use super::layout::ROWS_PER_PATTERN;

/// Sample header plus its signed 8-bit PCM data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sample {
    pub name: String,
    /// Length in bytes (always even)
    pub length: usize,
    /// Two's-complement finetune, -8..=7
    pub finetune: i8,
    /// Default volume as stored (0..=64 in well-formed files)
    pub volume: u8,
    /// Loop start in bytes
    pub repeat_offset: usize,
    /// Loop length in bytes
    pub repeat_length: usize,
    pub pcm: Vec<i8>,
}

impl Sample {
    /// Sign-extend a stored finetune byte (only the low nibble counts)
    pub fn finetune_from_nibble(raw: u8) -> i8 {
        ((raw << 4) as i8) >> 4
    }

    /// Index into the 16 finetune period tables
    pub fn finetune_index(&self) -> u8 {
        (self.finetune as u8) & 0x0F
    }

    /// A sample loops when its repeat length is longer than one word
    pub fn has_loop(&self) -> bool {
        self.repeat_length > 2
    }

    /// Exclusive end of the loop region
    pub fn loop_end(&self) -> usize {
        self.repeat_offset + self.repeat_length
    }
}

/// 64 rows of `channel_count` cells, stored row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    channel_count: usize,
    cells: Vec<Cell>,
}

impl Pattern {
    /// An empty pattern
    pub fn new(channel_count: usize) -> Self {
        Self {
            channel_count,
            cells: vec![Cell::default(); ROWS_PER_PATTERN * channel_count],
        }
    }

    pub fn from_cells(channel_count: usize, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), ROWS_PER_PATTERN * channel_count);
        Self {
            channel_count,
            cells,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    pub fn cell(&self, row: usize, channel: usize) -> Option<&Cell> {
        if channel >= self.channel_count {
            return None;
        }
        self.cells.get(row * self.channel_count + channel)
    }

    pub fn cell_mut(&mut self, row: usize, channel: usize) -> Option<&mut Cell> {
        if channel >= self.channel_count {
            return None;
        }
        self.cells.get_mut(row * self.channel_count + channel)
    }

    /// Cells of one row, one per channel
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = (row * self.channel_count).min(self.cells.len());
        let end = (start + self.channel_count).min(self.cells.len());
        &self.cells[start..end]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// An immutable decoded MOD file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub title: String,
    /// Always 31 entries
    pub samples: Vec<Sample>,
    /// Only the first `position_count` entries are meaningful
    pub positions: [u8; 128],
    pub position_count: u8,
    /// Restart position; may be out of range in the file
    pub position_loop_point: u8,
    pub channel_count: u8,
    /// `max(positions[..position_count]) + 1`
    pub pattern_count: u16,
    pub patterns: Vec<Pattern>,
}

impl Module {
    /// The meaningful part of the position table
    pub fn song_positions(&self) -> &[u8] {
        let count = (self.position_count as usize).min(self.positions.len());
        &self.positions[..count]
    }

    /// Pattern count implied by a position table
    pub fn pattern_count_for(positions: &[u8]) -> u16 {
        positions.iter().copied().max().unwrap_or(0) as u16 + 1
    }

    /// Total PCM bytes declared by the sample headers
    pub fn sample_bytes(&self) -> usize {
        self.samples.iter().map(|s| s.length).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finetune_sign_extension() {
        assert_eq!(Sample::finetune_from_nibble(0x00), 0);
        assert_eq!(Sample::finetune_from_nibble(0x07), 7);
        assert_eq!(Sample::finetune_from_nibble(0x08), -8);
        assert_eq!(Sample::finetune_from_nibble(0x0F), -1);
        assert_eq!(Sample::finetune_from_nibble(0xF3), 3);
    }

    #[test]
    fn test_finetune_index_round_trip() {
        for raw in 0..16u8 {
            let sample = Sample {
                finetune: Sample::finetune_from_nibble(raw),
                ..Default::default()
            };
            assert_eq!(sample.finetune_index(), raw);
        }
    }

    #[test]
    fn test_sample_bytes() {
        let mut samples = vec![Sample::default(); 31];
        samples[0].length = 6;
        samples[30].length = 1024;
        let module = Module {
            title: String::new(),
            samples,
            positions: [0; 128],
            position_count: 1,
            position_loop_point: 0,
            channel_count: 4,
            pattern_count: 1,
            patterns: vec![Pattern::new(4)],
        };
        assert_eq!(module.sample_bytes(), 1030);
    }

    #[test]
    fn test_pattern_count_for() {
        assert_eq!(Module::pattern_count_for(&[0, 3, 1]), 4);
        assert_eq!(Module::pattern_count_for(&[]), 1);
    }

    #[test]
    fn test_pattern_cell_bounds() {
        let pattern = Pattern::new(4);
        assert!(pattern.cell(63, 3).is_some());
        assert!(pattern.cell(64, 0).is_none());
        assert!(pattern.cell(0, 4).is_none());
        assert_eq!(pattern.row(10).len(), 4);
    }
}
