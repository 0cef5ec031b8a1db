pub mod error;
pub mod export;
pub mod format;
pub mod player;

pub use error::{DecodeError, Error};
pub use format::{decode, Cell, Module, Pattern, Sample};
pub use player::{PanLaw, PlaybackEngine, PlayerConfig};
