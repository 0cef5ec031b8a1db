//! Channel panning and player configuration

use serde::{Deserialize, Serialize};

/// Initial channel pan value
pub const DEFAULT_PAN: i32 = 0x7F;

/// How a channel's scaled sample is split between the two outputs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanLaw {
    /// Single-branch mix: every channel weights the left side ×3 and biases
    /// both sides by the pan value. Players of this lineage actually
    /// alternate the ×3 side between odd and even channels; that split is
    /// not reproduced here.
    #[default]
    Legacy,
    /// Hard Amiga panning: channels 0 and 3 of every group of four go left,
    /// 1 and 2 go right.
    Amiga,
}

impl PanLaw {
    /// Left/right contributions of one channel
    ///
    /// `value` is the signed sample already scaled by the channel volume.
    #[inline]
    pub fn mix(self, channel: usize, value: i32, pan: i32) -> (i32, i32) {
        match self {
            Self::Legacy => ((value + pan) * 3, value + 0xFF - pan),
            Self::Amiga => {
                if matches!(channel & 3, 0 | 3) {
                    (value * 2, 0)
                } else {
                    (0, value * 2)
                }
            }
        }
    }
}

/// Playback options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default)]
    pub pan_law: PanLaw,
}

impl PlayerConfig {
    pub fn pan_law(mut self, pan_law: PanLaw) -> Self {
        self.pan_law = pan_law;
        self
    }
}
