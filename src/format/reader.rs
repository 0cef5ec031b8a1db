//! MOD file reader and decoder

use super::cell::Cell;
use super::layout::{self, offset, CELL_SIZE, HEADER_SIZE, POSITION_TABLE_SIZE, ROWS_PER_PATTERN};
use super::module::{Module, Pattern, Sample};
use super::tags;
use crate::error::DecodeError;

/// Decode a complete MOD file
pub fn decode(data: &[u8]) -> Result<Module, DecodeError> {
    ModReader::new(data).decode()
}

/// Cursor over raw MOD data
pub struct ModReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ModReader<'a> {
    /// Create a new reader from raw MOD data
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Get current position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Seek to a position
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    fn truncated(&self, expected: usize) -> DecodeError {
        DecodeError::Truncated {
            expected,
            actual: self.data.len(),
        }
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let b = *self
            .data
            .get(self.pos)
            .ok_or_else(|| self.truncated(self.pos + 1))?;
        self.pos += 1;
        Ok(b)
    }

    /// Read a 16-bit big-endian value
    pub fn read_u16_be(&mut self) -> Result<u16, DecodeError> {
        let hi = self.read_u8()? as u16;
        let lo = self.read_u8()? as u16;
        Ok((hi << 8) | lo)
    }

    /// Borrow the next `len` bytes
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self.pos + len;
        if end > self.data.len() {
            return Err(self.truncated(end));
        }
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Read a fixed-size NUL-padded string field
    fn read_string(&mut self, len: usize) -> Result<String, DecodeError> {
        let bytes = self.read_bytes(len)?;
        Ok(latin1(bytes).trim_end_matches('\0').to_string())
    }

    fn peek_u8_at(&self, offset: usize) -> Result<u8, DecodeError> {
        self.data
            .get(offset)
            .copied()
            .ok_or_else(|| self.truncated(offset + 1))
    }

    /// Parse the fixed header, patterns and sample data
    pub fn decode(&mut self) -> Result<Module, DecodeError> {
        if self.data.len() < HEADER_SIZE {
            return Err(self.truncated(HEADER_SIZE));
        }

        self.seek(offset::TITLE);
        let title = self.read_string(layout::TITLE_SIZE)?;

        let mut samples = Vec::with_capacity(layout::SAMPLE_COUNT);
        for i in 0..layout::SAMPLE_COUNT {
            self.seek(offset::SAMPLE_HEADERS + i * layout::SAMPLE_HEADER_SIZE);
            samples.push(self.read_sample_header()?);
        }

        let mut position_count = self.peek_u8_at(offset::POSITION_COUNT)?;
        if position_count as usize > POSITION_TABLE_SIZE {
            log::warn!(
                "Position count {} exceeds the position table, clamping to {}",
                position_count,
                POSITION_TABLE_SIZE
            );
            position_count = POSITION_TABLE_SIZE as u8;
        }
        let position_loop_point = self.peek_u8_at(offset::LOOP_POINT)?;

        self.seek(offset::POSITIONS);
        let mut positions = [0u8; POSITION_TABLE_SIZE];
        positions.copy_from_slice(self.read_bytes(POSITION_TABLE_SIZE)?);

        let tag = self.read_bytes(4)?;
        let channel_count = match tags::lookup(tag) {
            Some(count) => count,
            None => {
                log::warn!(
                    "Unrecognized identifier tag {:?}, assuming {} channels",
                    latin1(tag),
                    tags::DEFAULT_CHANNEL_COUNT
                );
                tags::DEFAULT_CHANNEL_COUNT
            }
        };

        let pattern_count = Module::pattern_count_for(&positions[..position_count as usize]);
        let sample_bytes: usize = samples.iter().map(|s| s.length).sum();
        let expected = HEADER_SIZE
            + pattern_count as usize * layout::pattern_size(channel_count as usize)
            + sample_bytes;
        if self.data.len() < expected {
            return Err(self.truncated(expected));
        }

        self.seek(offset::PATTERN_DATA);
        let mut patterns = Vec::with_capacity(pattern_count as usize);
        for _ in 0..pattern_count {
            patterns.push(self.read_pattern(channel_count as usize)?);
        }

        for sample in &mut samples {
            let pcm = self.read_bytes(sample.length)?;
            sample.pcm = pcm.iter().map(|&b| b as i8).collect();
        }

        log::debug!(
            "Decoded '{}': {} channels, {} positions, {} patterns, {} sample bytes",
            title,
            channel_count,
            position_count,
            pattern_count,
            sample_bytes
        );

        Ok(Module {
            title,
            samples,
            positions,
            position_count,
            position_loop_point,
            channel_count,
            pattern_count,
            patterns,
        })
    }

    fn read_sample_header(&mut self) -> Result<Sample, DecodeError> {
        let name = self.read_string(layout::sample::NAME_SIZE)?;
        let length = self.read_u16_be()? as usize * 2;
        let finetune = Sample::finetune_from_nibble(self.read_u8()?);
        let volume = self.read_u8()?;
        let repeat_offset = self.read_u16_be()? as usize * 2;
        let repeat_length = self.read_u16_be()? as usize * 2;

        Ok(Sample {
            name,
            length,
            finetune,
            volume,
            repeat_offset,
            repeat_length,
            pcm: Vec::new(),
        })
    }

    fn read_pattern(&mut self, channel_count: usize) -> Result<Pattern, DecodeError> {
        let bytes = self.read_bytes(layout::pattern_size(channel_count))?;
        let cells = bytes
            .chunks_exact(CELL_SIZE)
            .map(|c| Cell::decode([c[0], c[1], c[2], c[3]]))
            .collect::<Vec<_>>();
        debug_assert_eq!(cells.len(), ROWS_PER_PATTERN * channel_count);
        Ok(Pattern::from_cells(channel_count, cells))
    }
}

/// Bytes to a string, one char per byte
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
