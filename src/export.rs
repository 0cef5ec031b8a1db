//! Offline rendering to WAV files

use crate::error::Result;
use crate::format::Module;
use crate::player::{PlaybackEngine, PlayerConfig};
use std::path::Path;

/// Frames rendered per `render` call
const BLOCK_SIZE: usize = 1024;

/// Export configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportConfig {
    pub sample_rate: u32,
    /// Length of the rendered audio in seconds
    pub duration: f32,
    pub player: PlayerConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            duration: 60.0,
            player: PlayerConfig::default(),
        }
    }
}

impl ExportConfig {
    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn duration(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    pub fn player(mut self, player: PlayerConfig) -> Self {
        self.player = player;
        self
    }

    /// Number of stereo frames to render
    pub fn total_frames(&self) -> usize {
        (self.duration.max(0.0) as f64 * self.sample_rate as f64).round() as usize
    }
}

/// Render a module into interleaved stereo samples
pub fn render_interleaved(module: &Module, config: &ExportConfig) -> Vec<f32> {
    let mut engine = PlaybackEngine::with_config(module, config.sample_rate, config.player);
    let total = config.total_frames();
    let mut left = vec![0.0f32; BLOCK_SIZE];
    let mut right = vec![0.0f32; BLOCK_SIZE];
    let mut out = Vec::with_capacity(total * 2);

    let mut remaining = total;
    while remaining > 0 {
        let n = remaining.min(BLOCK_SIZE);
        engine.render(&mut left, &mut right, n);
        for (&l, &r) in left[..n].iter().zip(&right[..n]) {
            out.push(l);
            out.push(r);
        }
        remaining -= n;
    }

    out
}

/// Render a module to a 16-bit stereo WAV file
pub fn export_to_wav<P: AsRef<Path>>(module: &Module, output_path: P, config: ExportConfig) -> Result<()> {
    log::info!(
        "Rendering '{}': {:.1}s at {} Hz",
        module.title,
        config.duration,
        config.sample_rate
    );
    let samples = render_interleaved(module, &config);

    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: config.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(output_path.as_ref(), spec)?;
    for &sample in &samples {
        writer.write_sample(to_i16(sample))?;
    }
    writer.finalize()?;

    log::info!("Wrote {}", output_path.as_ref().display());
    Ok(())
}

fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_frames() {
        let config = ExportConfig::default().sample_rate(8000).duration(0.5);
        assert_eq!(config.total_frames(), 4000);
        assert_eq!(ExportConfig::default().duration(-1.0).total_frames(), 0);
    }

    #[test]
    fn test_to_i16_clamps() {
        assert_eq!(to_i16(0.0), 0);
        assert_eq!(to_i16(2.0), i16::MAX);
        assert_eq!(to_i16(-2.0), -i16::MAX);
    }
}
