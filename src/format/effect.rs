//! Typed effect commands
//!
//! The effect column is a 4-bit code plus a parameter byte. Code `0xE`
//! carries a second 4-bit code in the parameter's high nibble; both levels
//! are decoded here so the engine can match on them exhaustively.

use super::cell::Cell;

/// Volume slide direction and amount
///
/// A non-zero high nibble slides up by that amount, otherwise the low
/// nibble slides down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeSlide {
    Up(u8),
    Down(u8),
}

impl VolumeSlide {
    pub fn from_parameter(param: u8) -> Self {
        if param & 0xF0 != 0 {
            Self::Up(param >> 4)
        } else {
            Self::Down(param & 0x0F)
        }
    }

    /// Signed per-frame volume change
    pub fn delta(self) -> i32 {
        match self {
            Self::Up(amount) => amount as i32,
            Self::Down(amount) => -(amount as i32),
        }
    }
}

/// Argument of the `Fxx` command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tempo {
    /// Frames per row (1..=32)
    Speed(u8),
    /// Beats per minute (33..=255)
    Bpm(u8),
}

impl Tempo {
    pub fn from_parameter(param: u8) -> Self {
        let value = param.max(1);
        if value <= 32 {
            Self::Speed(value)
        } else {
            Self::Bpm(value)
        }
    }
}

/// Primary effect commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// No effect column (code 0 with parameter 0)
    None,
    /// 0xy
    Arpeggio { first: u8, second: u8 },
    /// 1xx
    PortaUp(u8),
    /// 2xx
    PortaDown(u8),
    /// 3xx
    TonePorta(u8),
    /// 4xy
    Vibrato { speed: u8, depth: u8 },
    /// 5xy
    TonePortaVolumeSlide(VolumeSlide),
    /// 6xy
    VibratoVolumeSlide(VolumeSlide),
    /// 7xy
    Tremolo { speed: u8, depth: u8 },
    /// 8xx
    SetPanning(u8),
    /// 9xx
    SampleOffset(u8),
    /// Axy
    VolumeSlide(VolumeSlide),
    /// Bxx
    PositionJump(u8),
    /// Cxx
    SetVolume(u8),
    /// Dxy, row given as two decimal digits
    PatternBreak { row: u8 },
    /// Exy
    Extended(ExtEffect),
    /// Fxx
    SetTempo(Tempo),
}

/// Sub-commands of the `0xE` effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtEffect {
    /// E0x
    SetFilter(u8),
    /// E1x
    FinePortaUp(u8),
    /// E2x
    FinePortaDown(u8),
    /// E3x
    GlissandoControl(u8),
    /// E4x
    VibratoWaveform(u8),
    /// E5x
    SetFinetune(u8),
    /// E6x
    PatternLoop(u8),
    /// E7x
    TremoloWaveform(u8),
    /// E8x
    Unused(u8),
    /// E9x
    Retrigger(u8),
    /// EAx
    FineVolumeUp(u8),
    /// EBx
    FineVolumeDown(u8),
    /// ECx
    NoteCut(u8),
    /// EDx
    NoteDelay(u8),
    /// EEx
    PatternDelay(u8),
    /// EFx
    InvertLoop(u8),
}

impl ExtEffect {
    pub fn from_nibbles(command: u8, x: u8) -> Self {
        match command & 0x0F {
            0x0 => Self::SetFilter(x),
            0x1 => Self::FinePortaUp(x),
            0x2 => Self::FinePortaDown(x),
            0x3 => Self::GlissandoControl(x),
            0x4 => Self::VibratoWaveform(x),
            0x5 => Self::SetFinetune(x),
            0x6 => Self::PatternLoop(x),
            0x7 => Self::TremoloWaveform(x),
            0x8 => Self::Unused(x),
            0x9 => Self::Retrigger(x),
            0xA => Self::FineVolumeUp(x),
            0xB => Self::FineVolumeDown(x),
            0xC => Self::NoteCut(x),
            0xD => Self::NoteDelay(x),
            0xE => Self::PatternDelay(x),
            _ => Self::InvertLoop(x),
        }
    }
}

impl Effect {
    pub fn from_cell(cell: &Cell) -> Self {
        Self::from_code(cell.effect, cell.effect_parameter)
    }

    pub fn from_code(code: u8, param: u8) -> Self {
        if code == 0 && param == 0 {
            return Self::None;
        }

        let hi = param >> 4;
        let lo = param & 0x0F;
        match code & 0x0F {
            0x0 => Self::Arpeggio {
                first: hi,
                second: lo,
            },
            0x1 => Self::PortaUp(param),
            0x2 => Self::PortaDown(param),
            0x3 => Self::TonePorta(param),
            0x4 => Self::Vibrato {
                speed: hi,
                depth: lo,
            },
            0x5 => Self::TonePortaVolumeSlide(VolumeSlide::from_parameter(param)),
            0x6 => Self::VibratoVolumeSlide(VolumeSlide::from_parameter(param)),
            0x7 => Self::Tremolo {
                speed: hi,
                depth: lo,
            },
            0x8 => Self::SetPanning(param),
            0x9 => Self::SampleOffset(param),
            0xA => Self::VolumeSlide(VolumeSlide::from_parameter(param)),
            0xB => Self::PositionJump(param),
            0xC => Self::SetVolume(param),
            0xD => Self::PatternBreak {
                row: hi * 10 + lo,
            },
            0xE => Self::Extended(ExtEffect::from_nibbles(hi, lo)),
            _ => Self::SetTempo(Tempo::from_parameter(param)),
        }
    }

    pub fn is_tone_porta(&self) -> bool {
        matches!(self, Self::TonePorta(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_only_for_zero_zero() {
        assert_eq!(Effect::from_code(0, 0), Effect::None);
        assert_eq!(
            Effect::from_code(0, 0x37),
            Effect::Arpeggio {
                first: 3,
                second: 7
            }
        );
    }

    #[test]
    fn test_pattern_break_is_decimal() {
        assert_eq!(Effect::from_code(0xD, 0x12), Effect::PatternBreak { row: 12 });
        assert_eq!(Effect::from_code(0xD, 0x63), Effect::PatternBreak { row: 63 });
    }

    #[test]
    fn test_volume_slide_prefers_high_nibble() {
        assert_eq!(VolumeSlide::from_parameter(0x32), VolumeSlide::Up(3));
        assert_eq!(VolumeSlide::from_parameter(0x05), VolumeSlide::Down(5));
        assert_eq!(VolumeSlide::Down(5).delta(), -5);
    }

    #[test]
    fn test_tempo_split() {
        assert_eq!(Tempo::from_parameter(0), Tempo::Speed(1));
        assert_eq!(Tempo::from_parameter(32), Tempo::Speed(32));
        assert_eq!(Tempo::from_parameter(33), Tempo::Bpm(33));
        assert_eq!(Tempo::from_parameter(125), Tempo::Bpm(125));
    }

    #[test]
    fn test_extended_sub_commands() {
        assert_eq!(
            Effect::from_code(0xE, 0x64),
            Effect::Extended(ExtEffect::PatternLoop(4))
        );
        assert_eq!(
            Effect::from_code(0xE, 0xD2),
            Effect::Extended(ExtEffect::NoteDelay(2))
        );
        assert_eq!(
            Effect::from_code(0xE, 0x00),
            Effect::Extended(ExtEffect::SetFilter(0))
        );
    }
}
