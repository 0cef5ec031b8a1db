//! MOD file format: layout, decoding and encoding

pub mod cell;
pub mod effect;
pub mod json;
pub mod layout;
pub mod module;
pub mod reader;
pub mod tags;
pub mod writer;

pub use cell::Cell;
pub use effect::{Effect, ExtEffect, Tempo, VolumeSlide};
pub use json::ModuleJson;
pub use module::{Module, Pattern, Sample};
pub use reader::{decode, ModReader};
pub use writer::encode;

use crate::error::Result;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

/// Read a MOD file, decompressing it if it is gzipped
pub fn read_mod_file(path: &Path) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    File::open(path)?.read_to_end(&mut data)?;

    let is_gzip = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
        || (data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b);

    if is_gzip {
        let mut decoder = GzDecoder::new(Cursor::new(data));
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed)?;
        Ok(decompressed)
    } else {
        Ok(data)
    }
}

/// Read and decode a MOD file
pub fn load_file(path: &Path) -> Result<Module> {
    let data = read_mod_file(path)?;
    Ok(decode(&data)?)
}
