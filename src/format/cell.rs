//! Pattern cell definition and its 4-byte encoding

use super::effect::Effect;
use serde::Serialize;

/// Effect code that carries a sub-command in the parameter's high nibble
pub const EXTENDED_EFFECT: u8 = 0x0E;

/// One channel-row entry of a pattern
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Cell {
    /// 1-based sample index, 0 for none
    pub sample: u8,
    /// Amiga period, 0 for none
    pub period: u16,
    pub effect: u8,
    pub effect_parameter: u8,
    /// Sub-command, only present when `effect == 0x0E`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext_effect: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext_effect_parameter: Option<u8>,
}

impl Cell {
    /// Decode a cell from its four raw bytes
    pub fn decode(bytes: [u8; 4]) -> Self {
        let [b0, b1, b2, b3] = bytes;
        let effect = b2 & 0x0F;
        let (ext_effect, ext_effect_parameter) = if effect == EXTENDED_EFFECT {
            (Some((b3 & 0xF0) >> 4), Some(b3 & 0x0F))
        } else {
            (None, None)
        };

        Self {
            sample: (b0 & 0xF0) | (b2 >> 4),
            period: (((b0 & 0x0F) as u16) << 8) | b1 as u16,
            effect,
            effect_parameter: b3,
            ext_effect,
            ext_effect_parameter,
        }
    }

    /// Encode the cell back into four bytes
    ///
    /// Only the low 12 bits of the period and the low nibble of the effect
    /// are representable; the extended fields are implied by the parameter.
    pub fn encode(&self) -> [u8; 4] {
        [
            (self.sample & 0xF0) | ((self.period >> 8) as u8 & 0x0F),
            (self.period & 0xFF) as u8,
            ((self.sample & 0x0F) << 4) | (self.effect & 0x0F),
            self.effect_parameter,
        ]
    }

    /// Build a cell from its primary fields, deriving the extended ones
    pub fn new(sample: u8, period: u16, effect: u8, effect_parameter: u8) -> Self {
        Self::decode(
            Self {
                sample,
                period,
                effect,
                effect_parameter,
                ext_effect: None,
                ext_effect_parameter: None,
            }
            .encode(),
        )
    }

    /// True when the cell triggers nothing and carries no effect
    pub fn is_empty(&self) -> bool {
        self.sample == 0 && self.period == 0 && self.effect == 0 && self.effect_parameter == 0
    }

    /// Typed view of the effect column
    pub fn effect(&self) -> Effect {
        Effect::from_cell(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_fields() {
        // sample 0x1F, period 0x1AC (428), effect C, parameter 0x40
        let cell = Cell::decode([0x11, 0xAC, 0xFC, 0x40]);
        assert_eq!(cell.sample, 0x1F);
        assert_eq!(cell.period, 428);
        assert_eq!(cell.effect, 0x0C);
        assert_eq!(cell.effect_parameter, 0x40);
        assert_eq!(cell.ext_effect, None);
        assert_eq!(cell.ext_effect_parameter, None);
    }

    #[test]
    fn test_decode_extended() {
        let cell = Cell::decode([0x00, 0x00, 0x0E, 0xC3]);
        assert_eq!(cell.effect, 0x0E);
        assert_eq!(cell.ext_effect, Some(0x0C));
        assert_eq!(cell.ext_effect_parameter, Some(0x03));
    }

    #[test]
    fn test_encode_matches_raw_bytes() {
        let raw = [0x21, 0x40, 0x5E, 0x64];
        assert_eq!(Cell::decode(raw).encode(), raw);
    }

    #[test]
    fn test_new_derives_extended_fields() {
        let cell = Cell::new(3, 856, 0x0E, 0x62);
        assert_eq!(cell.ext_effect, Some(6));
        assert_eq!(cell.ext_effect_parameter, Some(2));
        assert_eq!(Cell::decode(cell.encode()), cell);
    }

    #[test]
    fn test_is_empty() {
        assert!(Cell::default().is_empty());
        assert!(!Cell::new(0, 0, 0, 1).is_empty());
    }
}
