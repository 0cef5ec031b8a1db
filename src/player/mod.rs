//! Tick-accurate MOD playback engine
//!
//! Four nested clocks drive playback: position (order list index), row
//! (0..64 within a pattern), frame (`frames_per_row` subdivisions of a row)
//! and the PAL master clock ticking at 7 093 789.2 Hz. Output samples and
//! frames are both measured in master ticks, so the engine pumps frames and
//! per-channel sample clocks from one accumulator each.

pub mod channel;
pub mod mix;
pub mod period;

pub use channel::Channel;
pub use mix::{PanLaw, PlayerConfig};

use crate::format::layout::ROWS_PER_PATTERN;
use crate::format::{Effect, ExtEffect, Module, Tempo};
use period::NoteLookup;

/// PAL Amiga master clock
pub const TICKS_PER_SECOND: f64 = 7_093_789.2;

/// Tempo at the start of a song
pub const DEFAULT_BPM: u8 = 125;

/// Frames per row at the start of a song
pub const DEFAULT_FRAMES_PER_ROW: u32 = 6;

/// Master ticks per frame at a tempo
pub fn ticks_per_frame(bpm: u8) -> i64 {
    (TICKS_PER_SECOND * 2.5 / bpm.max(1) as f64).round() as i64
}

/// Master ticks per output sample at a sample rate
pub fn ticks_per_output_sample(sample_rate: u32) -> i32 {
    (TICKS_PER_SECOND / sample_rate.max(1) as f64).round() as i32
}

/// Jump requested by `Bxx` / `Dxy`, taken when the row ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingBreak {
    position: usize,
    row: usize,
}

/// Counted loop set up by `E6x`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PatternLoop {
    active: bool,
    start_row: usize,
    end_row: usize,
    count: u8,
}

/// Playback state for one module
///
/// The module is borrowed read-only, so several engines can play the same
/// module independently.
pub struct PlaybackEngine<'m> {
    module: &'m Module,
    config: PlayerConfig,
    notes: NoteLookup,

    ticks_per_frame: i64,
    ticks_per_output_sample: i32,
    ticks_since_start_of_frame: i64,
    bpm: u8,

    frames_per_row: u32,
    frame: u32,
    position: usize,
    row: usize,
    pattern: usize,
    pending_break: Option<PendingBreak>,
    pattern_loop: PatternLoop,
    pattern_delay: u8,

    channels: Vec<Channel>,
}

impl<'m> PlaybackEngine<'m> {
    /// Create an engine with the default configuration
    pub fn new(module: &'m Module, sample_rate: u32) -> Self {
        Self::with_config(module, sample_rate, PlayerConfig::default())
    }

    pub fn with_config(module: &'m Module, sample_rate: u32, config: PlayerConfig) -> Self {
        let mut engine = Self {
            module,
            config,
            notes: NoteLookup::new(),
            ticks_per_frame: ticks_per_frame(DEFAULT_BPM),
            ticks_per_output_sample: ticks_per_output_sample(sample_rate),
            ticks_since_start_of_frame: 0,
            bpm: DEFAULT_BPM,
            frames_per_row: DEFAULT_FRAMES_PER_ROW,
            frame: 0,
            position: 0,
            row: 0,
            pattern: 0,
            pending_break: None,
            pattern_loop: PatternLoop::default(),
            pattern_delay: 0,
            channels: vec![Channel::new(); module.channel_count as usize],
        };

        log::debug!(
            "Playback at {} Hz: {} ticks per output sample, {} ticks per frame",
            sample_rate,
            engine.ticks_per_output_sample,
            engine.ticks_per_frame
        );

        engine.load_position(0, 0);
        engine
    }

    pub fn module(&self) -> &'m Module {
        self.module
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Current order list index
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn row(&self) -> usize {
        self.row
    }

    /// Frame index within the current row
    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn frames_per_row(&self) -> u32 {
        self.frames_per_row
    }

    pub fn bpm(&self) -> u8 {
        self.bpm
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Number of valid order list entries (at least one)
    fn song_length(&self) -> usize {
        (self.module.position_count as usize)
            .min(self.module.positions.len())
            .max(1)
    }

    fn set_bpm(&mut self, bpm: u8) {
        self.bpm = bpm;
        self.ticks_per_frame = ticks_per_frame(bpm);
    }

    fn load_position(&mut self, position: usize, row: usize) {
        let position = if position >= self.song_length() {
            0
        } else {
            position
        };
        self.position = position;
        self.pattern = self.module.positions[position] as usize;
        self.load_row(if row < ROWS_PER_PATTERN { row } else { 0 });
    }

    fn load_row(&mut self, row: usize) {
        self.row = row;
        self.frame = 0;
        self.pending_break = None;

        let module = self.module;
        let pattern = module.patterns.get(self.pattern);
        for index in 0..self.channels.len() {
            let cell = pattern
                .and_then(|p| p.cell(row, index))
                .copied()
                .unwrap_or_default();
            let effect = cell.effect();
            self.channels[index].load_cell(&cell, &effect, module, &self.notes);
            self.apply_global_effect(&effect);
        }
    }

    /// Effects that act on the sequencer rather than a channel
    fn apply_global_effect(&mut self, effect: &Effect) {
        match *effect {
            Effect::PositionJump(position) => {
                self.pending_break = Some(PendingBreak {
                    position: position as usize,
                    row: 0,
                });
            }
            Effect::PatternBreak { row } => {
                self.pending_break = Some(PendingBreak {
                    position: self.position + 1,
                    row: row as usize,
                });
            }
            Effect::SetTempo(Tempo::Speed(frames)) => self.frames_per_row = frames as u32,
            Effect::SetTempo(Tempo::Bpm(bpm)) => self.set_bpm(bpm),
            Effect::Extended(ExtEffect::PatternLoop(0)) => self.pattern_loop.start_row = self.row,
            Effect::Extended(ExtEffect::PatternLoop(count)) => {
                self.pattern_loop.end_row = self.row;
                if !self.pattern_loop.active {
                    self.pattern_loop.active = true;
                    self.pattern_loop.count = count;
                }
            }
            Effect::Extended(ExtEffect::PatternDelay(rows)) => self.pattern_delay = rows,
            _ => {}
        }
    }

    /// Move on after the last frame of a row
    fn next_row(&mut self) {
        if let Some(target) = self.pending_break.take() {
            let position = if target.position >= self.song_length() {
                self.module.position_loop_point as usize
            } else {
                target.position
            };
            self.load_position(position, target.row);
        } else if self.pattern_loop.active && self.row == self.pattern_loop.end_row {
            if self.pattern_loop.count > 0 {
                self.pattern_loop.count -= 1;
                self.load_row(self.pattern_loop.start_row);
            } else {
                self.pattern_loop.active = false;
                self.advance_row();
            }
        } else {
            self.advance_row();
        }
    }

    fn advance_row(&mut self) {
        if self.row + 1 >= ROWS_PER_PATTERN {
            self.next_position();
        } else {
            self.load_row(self.row + 1);
        }
    }

    fn next_position(&mut self) {
        if self.position + 1 >= self.song_length() {
            self.load_position(self.module.position_loop_point as usize, 0);
        } else {
            self.load_position(self.position + 1, 0);
        }
    }

    /// Run one frame of every channel, then the row clock
    fn advance_frame(&mut self) {
        for channel in &mut self.channels {
            channel.advance_frame(self.frame);
        }

        self.frame += 1;
        if self.frame >= self.frames_per_row {
            self.frame = 0;
            if self.pattern_delay > 0 {
                self.pattern_delay -= 1;
            } else {
                self.next_row();
            }
        }
    }

    /// Fill `n` stereo frames into `left` and `right`
    ///
    /// # Panics
    ///
    /// Panics if either buffer is shorter than `n`.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32], n: usize) {
        let scale = (128 * 128 * self.module.channel_count.max(1) as i32) as f32;
        let pan_law = self.config.pan_law;

        for (l, r) in left[..n].iter_mut().zip(right[..n].iter_mut()) {
            self.ticks_since_start_of_frame += self.ticks_per_output_sample as i64;
            while self.ticks_since_start_of_frame >= self.ticks_per_frame {
                self.advance_frame();
                self.ticks_since_start_of_frame -= self.ticks_per_frame;
            }

            let mut left_level = 0i32;
            let mut right_level = 0i32;
            for (index, channel) in self.channels.iter_mut().enumerate() {
                if let Some(value) = channel.next_output(self.module, self.ticks_per_output_sample) {
                    let (dl, dr) = pan_law.mix(index, value, channel.pan);
                    left_level += dl;
                    right_level += dr;
                }
            }

            *l = left_level as f32 / scale;
            *r = right_level as f32 / scale;
        }
    }
}
