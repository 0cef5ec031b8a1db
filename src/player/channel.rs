//! Per-channel playback state

use super::mix::DEFAULT_PAN;
use super::period::{self, NoteLookup};
use crate::format::{Cell, Effect, ExtEffect, Module};

/// Maximum channel volume
pub const MAX_VOLUME: i32 = 64;

/// Bounds for a channel's ticks per sample (period × 2)
pub const MIN_TICKS_PER_SAMPLE: i32 = 96;
pub const MAX_TICKS_PER_SAMPLE: i32 = 4096;

/// Slide direction of a tone portamento
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideDir {
    /// Towards lower periods (higher pitch)
    Up,
    /// Towards higher periods (lower pitch)
    Down,
}

impl SlideDir {
    fn sign(self) -> i32 {
        match self {
            Self::Up => -1,
            Self::Down => 1,
        }
    }
}

/// Tone portamento (3xx / 5xy) state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TonePorta {
    /// Target period
    pub target: i32,
    /// Signed period step per frame
    pub delta: i32,
    /// Step remembered for 5xy
    pub vol_step: i32,
    pub active: bool,
    pub dir: SlideDir,
}

impl Default for TonePorta {
    fn default() -> Self {
        Self {
            target: 0,
            delta: 0,
            vol_step: 0,
            active: false,
            dir: SlideDir::Down,
        }
    }
}

/// Arpeggio (0xy) state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arpeggio {
    pub notes: [u8; 3],
    pub counter: u32,
}

/// Runtime state of one channel
#[derive(Debug, Clone)]
pub struct Channel {
    pub playing: bool,
    /// 0-based index into the module's samples
    pub sample: usize,
    /// Finetune table index (0..=15)
    pub finetune: u8,
    pub volume: i32,
    pub pan: i32,
    pub volume_delta: i32,
    pub period_delta: i32,
    pub fine_volume_delta: i32,
    pub fine_period_delta: i32,
    pub tone_porta: TonePorta,
    /// Frame from which the note is silenced
    pub cut: Option<u8>,
    /// Frame until which the note is held back
    pub delay: Option<u8>,
    /// Restart the sample every N frames
    pub retrigger: Option<u8>,
    pub arpeggio: Option<Arpeggio>,
    pub note_number: Option<u8>,
    pub ticks_per_sample: i32,
    pub sample_position: usize,
    pub ticks_since_start_of_sample: i32,
    /// Period of the last cell that carried one
    pub prev_period: Option<u16>,
    /// Held back by a note delay that has not elapsed yet
    delayed: bool,
}

impl Default for Channel {
    fn default() -> Self {
        Self {
            playing: false,
            sample: 0,
            finetune: 0,
            volume: 0,
            pan: DEFAULT_PAN,
            volume_delta: 0,
            period_delta: 0,
            fine_volume_delta: 0,
            fine_period_delta: 0,
            tone_porta: TonePorta::default(),
            cut: None,
            delay: None,
            retrigger: None,
            arpeggio: None,
            note_number: None,
            ticks_per_sample: MAX_TICKS_PER_SAMPLE,
            sample_position: 0,
            ticks_since_start_of_sample: 0,
            prev_period: None,
            delayed: false,
        }
    }
}

impl Channel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Volume actually applied to the output
    pub fn effective_volume(&self) -> i32 {
        if self.delayed {
            0
        } else {
            self.volume
        }
    }

    fn restart_sample(&mut self) {
        self.sample_position = 0;
        self.ticks_since_start_of_sample = 0;
    }

    /// Set pitch from a note number, keeping the old pitch if it is off-table
    fn set_note(&mut self, note: u8) {
        self.note_number = Some(note);
        if let Some(p) = period::period(self.finetune, note) {
            self.ticks_per_sample = p as i32 * 2;
        }
    }

    /// Apply a new row's cell
    ///
    /// Global effects (jumps, loops, pattern delay, tempo) are left to the
    /// engine.
    pub fn load_cell(&mut self, cell: &Cell, effect: &Effect, module: &Module, notes: &NoteLookup) {
        if self.delayed {
            // the delay never elapsed in the previous row
            self.playing = false;
            self.delayed = false;
        }

        if cell.period != 0 || cell.sample != 0 {
            self.playing = true;
            self.restart_sample();

            if cell.sample != 0 {
                let index = cell.sample as usize - 1;
                if let Some(sample) = module.samples.get(index) {
                    self.sample = index;
                    self.volume = (sample.volume as i32).min(MAX_VOLUME);
                    self.finetune = sample.finetune_index();
                }
            }

            if cell.period != 0 {
                // a tone portamento keeps sounding the previous note
                let pitch_period = if effect.is_tone_porta() {
                    self.prev_period
                } else {
                    Some(cell.period)
                };
                if let Some(note) = pitch_period.and_then(|p| notes.note_number(p)) {
                    self.set_note(note);
                }
            }
        }

        self.fine_period_delta = 0;
        self.fine_volume_delta = 0;
        self.cut = None;
        self.delay = None;
        self.retrigger = None;
        self.tone_porta.active = false;

        if *effect != Effect::None {
            self.volume_delta = 0;
            self.period_delta = 0;
            self.arpeggio = None;
            self.apply_effect(cell, effect);
        }

        if cell.period != 0 {
            self.prev_period = Some(cell.period);
        }

        if !self.tone_porta.active {
            self.tone_porta.target = 0;
            self.tone_porta.delta = 0;
            self.tone_porta.vol_step = 0;
        }
    }

    fn apply_effect(&mut self, cell: &Cell, effect: &Effect) {
        match *effect {
            Effect::Arpeggio { first, second } => {
                if let Some(n) = self.note_number {
                    self.arpeggio = Some(Arpeggio {
                        notes: [n, n.saturating_add(first), n.saturating_add(second)],
                        counter: 0,
                    });
                }
            }
            Effect::PortaUp(x) => self.period_delta = -(x as i32),
            Effect::PortaDown(x) => self.period_delta = x as i32,
            Effect::TonePorta(x) => {
                let porta = &mut self.tone_porta;
                porta.active = true;
                if cell.period != 0 {
                    porta.target = cell.period as i32;
                }
                let prev = self.prev_period.unwrap_or(0) as i32;
                porta.dir = if porta.target < prev {
                    SlideDir::Up
                } else {
                    SlideDir::Down
                };
                porta.delta = x as i32 * porta.dir.sign();
                porta.vol_step = porta.delta;
            }
            Effect::TonePortaVolumeSlide(slide) => {
                self.tone_porta.active = true;
                self.tone_porta.delta = self.tone_porta.vol_step;
                self.volume_delta = slide.delta();
            }
            Effect::SampleOffset(x) => self.sample_position = 256 * x as usize,
            Effect::VolumeSlide(slide) => self.volume_delta = slide.delta(),
            Effect::SetVolume(x) => self.volume = (x as i32).min(MAX_VOLUME),
            Effect::Extended(ext) => self.apply_ext_effect(ext),
            Effect::PositionJump(_)
            | Effect::PatternBreak { .. }
            | Effect::SetTempo(_)
            | Effect::None => {}
            // not implemented by this player
            Effect::Vibrato { .. }
            | Effect::VibratoVolumeSlide(_)
            | Effect::Tremolo { .. }
            | Effect::SetPanning(_) => {}
        }
    }

    fn apply_ext_effect(&mut self, ext: ExtEffect) {
        match ext {
            ExtEffect::FinePortaUp(x) => self.fine_period_delta = -(x as i32),
            ExtEffect::FinePortaDown(x) => self.fine_period_delta = x as i32,
            ExtEffect::SetFinetune(x) => self.finetune = x & 0x0F,
            ExtEffect::Retrigger(x) => self.retrigger = Some(x),
            ExtEffect::FineVolumeUp(x) => self.fine_volume_delta = x as i32,
            ExtEffect::FineVolumeDown(x) => self.fine_volume_delta = -(x as i32),
            ExtEffect::NoteCut(x) => self.cut = Some(x),
            ExtEffect::NoteDelay(x) => {
                self.delay = Some(x);
                self.delayed = x > 0;
            }
            ExtEffect::PatternLoop(_) | ExtEffect::PatternDelay(_) => {}
            ExtEffect::SetFilter(_)
            | ExtEffect::GlissandoControl(_)
            | ExtEffect::VibratoWaveform(_)
            | ExtEffect::TremoloWaveform(_)
            | ExtEffect::Unused(_)
            | ExtEffect::InvertLoop(_) => {}
        }
    }

    /// Per-frame envelope update; `frame` is the index within the row
    pub fn advance_frame(&mut self, frame: u32) {
        self.volume += self.volume_delta;
        self.ticks_per_sample += self.period_delta * 2;
        if frame == 0 {
            self.volume += self.fine_volume_delta;
            self.ticks_per_sample += self.fine_period_delta * 2;
        }
        self.volume = self.volume.clamp(0, MAX_VOLUME);

        if self.cut.is_some_and(|cut| frame >= cut as u32) {
            self.volume = 0;
        }

        if let Some(delay) = self.delay {
            if frame < delay as u32 {
                self.delayed = true;
            } else if self.delayed {
                self.delayed = false;
                self.playing = true;
                self.restart_sample();
            }
        }

        if let Some(every) = self.retrigger {
            if every == 0 || frame % every as u32 == 0 {
                self.sample_position = 0;
            }
        }

        if self.tone_porta.active {
            let porta = self.tone_porta;
            let target = porta.target * 2;
            self.ticks_per_sample += porta.delta * 2;
            // never slide past the target
            match porta.dir {
                SlideDir::Down if self.ticks_per_sample > target => self.ticks_per_sample = target,
                SlideDir::Up if self.ticks_per_sample < target => self.ticks_per_sample = target,
                _ => {}
            }
        }

        if let Some(arp) = self.arpeggio.as_mut() {
            arp.counter += 1;
            let note = arp.notes[(arp.counter % 3) as usize];
            if let Some(p) = period::period(self.finetune, note) {
                self.ticks_per_sample = p as i32 * 2;
            }
        }

        self.ticks_per_sample = self
            .ticks_per_sample
            .clamp(MIN_TICKS_PER_SAMPLE, MAX_TICKS_PER_SAMPLE);
    }

    /// Advance the sample clock by one output sample and return the
    /// volume-scaled PCM value, or `None` when the channel is silent
    #[inline]
    pub fn next_output(&mut self, module: &Module, ticks_per_output_sample: i32) -> Option<i32> {
        if !self.playing {
            return None;
        }
        let Some(sample) = module.samples.get(self.sample) else {
            self.playing = false;
            return None;
        };

        self.ticks_since_start_of_sample += ticks_per_output_sample;
        while self.ticks_since_start_of_sample >= self.ticks_per_sample {
            self.ticks_since_start_of_sample -= self.ticks_per_sample;
            self.sample_position += 1;
            if sample.has_loop() && self.sample_position >= sample.loop_end() {
                self.sample_position = sample.repeat_offset;
            } else if self.sample_position >= sample.length {
                self.playing = false;
                return None;
            }
        }

        match sample.pcm.get(self.sample_position) {
            Some(&value) => Some(value as i32 * self.effective_volume()),
            None => {
                self.playing = false;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{Pattern, Sample};

    fn module() -> Module {
        let mut samples = vec![Sample::default(); 31];
        samples[0] = Sample {
            name: "square".into(),
            length: 8,
            finetune: 0,
            volume: 40,
            repeat_offset: 0,
            repeat_length: 0,
            pcm: vec![64, 64, 64, 64, -64, -64, -64, -64],
        };
        Module {
            title: String::new(),
            samples,
            positions: [0; 128],
            position_count: 1,
            position_loop_point: 0,
            channel_count: 1,
            pattern_count: 1,
            patterns: vec![Pattern::new(1)],
        }
    }

    fn load(channel: &mut Channel, cell: Cell) {
        let module = module();
        let notes = NoteLookup::new();
        channel.load_cell(&cell, &cell.effect(), &module, &notes);
    }

    #[test]
    fn test_trigger_sets_pitch_and_volume() {
        let mut ch = Channel::new();
        load(&mut ch, Cell::new(1, 428, 0, 0));
        assert!(ch.playing);
        assert_eq!(ch.volume, 40);
        assert_eq!(ch.note_number, Some(24));
        assert_eq!(ch.ticks_per_sample, 856);
    }

    #[test]
    fn test_unknown_period_keeps_pitch() {
        let mut ch = Channel::new();
        load(&mut ch, Cell::new(1, 428, 0, 0));
        load(&mut ch, Cell::new(0, 429, 0, 0));
        assert_eq!(ch.ticks_per_sample, 856);
        assert_eq!(ch.note_number, Some(24));
    }

    #[test]
    fn test_out_of_range_sample_index_is_ignored() {
        let mut ch = Channel::new();
        load(&mut ch, Cell::new(0xF0, 428, 0, 0));
        assert_eq!(ch.sample, 0);
        assert_eq!(ch.volume, 0);
    }

    #[test]
    fn test_volume_stays_in_range() {
        let mut ch = Channel::new();
        load(&mut ch, Cell::new(1, 428, 0x0A, 0xF0));
        for frame in 0..20 {
            ch.advance_frame(frame % 6);
            assert!((0..=MAX_VOLUME).contains(&ch.volume));
        }
        assert_eq!(ch.volume, MAX_VOLUME);

        load(&mut ch, Cell::new(0, 0, 0x0E, 0xBF));
        load(&mut ch, Cell::new(0, 0, 0x0A, 0x0F));
        for frame in 0..20 {
            ch.advance_frame(frame % 6);
            assert!((0..=MAX_VOLUME).contains(&ch.volume));
        }
        assert_eq!(ch.volume, 0);

        load(&mut ch, Cell::new(0, 0, 0x0C, 0xFF));
        assert_eq!(ch.volume, MAX_VOLUME);
    }

    #[test]
    fn test_tone_porta_never_overshoots() {
        for &(from, to) in &[(856u16, 428u16), (428, 856), (214, 226), (226, 214)] {
            for step in [1u8, 7, 64, 255] {
                let mut ch = Channel::new();
                load(&mut ch, Cell::new(1, from, 0, 0));
                load(&mut ch, Cell::new(0, to, 0x03, step));
                assert!(ch.tone_porta.active);
                let target = to as i32 * 2;
                for frame in 0..600 {
                    let before = ch.ticks_per_sample;
                    ch.advance_frame(frame % 6);
                    if from > to {
                        assert!(ch.ticks_per_sample >= target, "overshot {} -> {}", from, to);
                        assert!(ch.ticks_per_sample <= before);
                    } else {
                        assert!(ch.ticks_per_sample <= target, "overshot {} -> {}", from, to);
                        assert!(ch.ticks_per_sample >= before);
                    }
                }
                assert_eq!(ch.ticks_per_sample, target);
            }
        }
    }

    #[test]
    fn test_tone_porta_keeps_previous_pitch_on_row_load() {
        let mut ch = Channel::new();
        load(&mut ch, Cell::new(1, 856, 0, 0));
        load(&mut ch, Cell::new(0, 428, 0x03, 4));
        assert_eq!(ch.ticks_per_sample, 1712);
        assert_eq!(ch.tone_porta.target, 428);
        assert_eq!(ch.tone_porta.dir, SlideDir::Up);
        assert_eq!(ch.tone_porta.delta, -4);
    }

    #[test]
    fn test_porta_volume_slide_reuses_step() {
        let mut ch = Channel::new();
        load(&mut ch, Cell::new(1, 856, 0, 0));
        load(&mut ch, Cell::new(0, 428, 0x03, 8));
        load(&mut ch, Cell::new(0, 0, 0x05, 0x02));
        assert!(ch.tone_porta.active);
        assert_eq!(ch.tone_porta.delta, -8);
        assert_eq!(ch.volume_delta, -2);
    }

    #[test]
    fn test_arpeggio_cycles_three_notes() {
        let mut ch = Channel::new();
        load(&mut ch, Cell::new(1, 428, 0x00, 0x47));
        let seen: Vec<i32> = (0..6)
            .map(|frame| {
                ch.advance_frame(frame);
                ch.ticks_per_sample
            })
            .collect();
        let p = |n: u8| period::period(0, n).unwrap() as i32 * 2;
        assert_eq!(seen, vec![p(28), p(31), p(24), p(28), p(31), p(24)]);
    }

    #[test]
    fn test_fine_slide_only_on_first_frame() {
        let mut ch = Channel::new();
        load(&mut ch, Cell::new(1, 428, 0x0E, 0x13));
        ch.advance_frame(0);
        assert_eq!(ch.ticks_per_sample, 850);
        ch.advance_frame(1);
        ch.advance_frame(2);
        assert_eq!(ch.ticks_per_sample, 850);
    }

    #[test]
    fn test_porta_slides_step_every_frame() {
        let mut ch = Channel::new();
        load(&mut ch, Cell::new(1, 428, 0x01, 0x03));
        ch.advance_frame(0);
        assert_eq!(ch.ticks_per_sample, 850);
        ch.advance_frame(1);
        assert_eq!(ch.ticks_per_sample, 844);

        load(&mut ch, Cell::new(0, 0, 0x02, 0x05));
        ch.advance_frame(0);
        assert_eq!(ch.ticks_per_sample, 854);
        ch.advance_frame(1);
        assert_eq!(ch.ticks_per_sample, 864);
    }

    #[test]
    fn test_volume_slide_steps_every_frame() {
        let mut ch = Channel::new();
        load(&mut ch, Cell::new(1, 428, 0x0A, 0x30));
        ch.advance_frame(0);
        assert_eq!(ch.volume, 43);
        ch.advance_frame(1);
        assert_eq!(ch.volume, 46);

        load(&mut ch, Cell::new(0, 0, 0x0A, 0x04));
        ch.advance_frame(0);
        assert_eq!(ch.volume, 42);
        ch.advance_frame(1);
        assert_eq!(ch.volume, 38);
    }

    #[test]
    fn test_sample_offset() {
        let mut ch = Channel::new();
        load(&mut ch, Cell::new(1, 428, 0x09, 0x02));
        assert_eq!(ch.sample_position, 512);
        assert!(ch.playing);
    }

    #[test]
    fn test_set_finetune_applies_to_next_note() {
        let mut ch = Channel::new();
        load(&mut ch, Cell::new(1, 428, 0x0E, 0x53));
        assert_eq!(ch.finetune, 3);
        assert_eq!(ch.ticks_per_sample, 856);

        load(&mut ch, Cell::new(0, 428, 0, 0));
        let expected = period::period(3, 24).unwrap() as i32 * 2;
        assert_ne!(expected, 856);
        assert_eq!(ch.ticks_per_sample, expected);
    }

    #[test]
    fn test_retrigger_every_frame() {
        let mut ch = Channel::new();
        load(&mut ch, Cell::new(1, 428, 0x0E, 0x90));
        for frame in 0..6 {
            ch.sample_position = 7;
            ch.advance_frame(frame);
            assert_eq!(ch.sample_position, 0, "frame {}", frame);
        }
    }

    #[test]
    fn test_retrigger_every_third_frame() {
        let mut ch = Channel::new();
        load(&mut ch, Cell::new(1, 428, 0x0E, 0x93));
        let reset: Vec<bool> = (0..6)
            .map(|frame| {
                ch.sample_position = 7;
                ch.advance_frame(frame);
                ch.sample_position == 0
            })
            .collect();
        assert_eq!(reset, vec![true, false, false, true, false, false]);
    }

    #[test]
    fn test_note_cut() {
        let mut ch = Channel::new();
        load(&mut ch, Cell::new(1, 428, 0x0E, 0xC2));
        ch.advance_frame(0);
        ch.advance_frame(1);
        assert_eq!(ch.volume, 40);
        ch.advance_frame(2);
        assert_eq!(ch.volume, 0);
    }

    #[test]
    fn test_note_delay_holds_then_retriggers() {
        let mut ch = Channel::new();
        load(&mut ch, Cell::new(1, 428, 0x0E, 0xD2));
        assert_eq!(ch.effective_volume(), 0);
        ch.advance_frame(0);
        ch.sample_position = 5;
        ch.advance_frame(1);
        assert_eq!(ch.effective_volume(), 0);
        ch.advance_frame(2);
        assert_eq!(ch.effective_volume(), 40);
        assert_eq!(ch.sample_position, 0);
    }

    #[test]
    fn test_ticks_per_sample_clamped() {
        let mut ch = Channel::new();
        load(&mut ch, Cell::new(1, 113, 0x01, 0xFF));
        ch.advance_frame(0);
        assert_eq!(ch.ticks_per_sample, MIN_TICKS_PER_SAMPLE);
        load(&mut ch, Cell::new(0, 0, 0x02, 0xFF));
        for frame in 0..10 {
            ch.advance_frame(frame);
        }
        assert_eq!(ch.ticks_per_sample, MAX_TICKS_PER_SAMPLE);
    }

    #[test]
    fn test_one_shot_sample_stops_at_end() {
        let module = module();
        let mut ch = Channel::new();
        load(&mut ch, Cell::new(1, 428, 0, 0));
        let out: Vec<Option<i32>> = (0..9).map(|_| ch.next_output(&module, 856)).collect();
        assert_eq!(out[0], Some(64 * 40));
        assert_eq!(out[3], Some(-64 * 40));
        assert_eq!(out[6], Some(-64 * 40));
        assert_eq!(out[7], None);
        assert!(!ch.playing);
    }
}
