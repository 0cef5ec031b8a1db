//! JSON serialization types for decoded modules

use super::cell::Cell;
use super::module::{Module, Sample};
use serde::Serialize;

/// Top-level JSON structure for a module
#[derive(Debug, Clone, Serialize)]
pub struct ModuleJson {
    pub title: String,
    pub channel_count: u8,
    pub position_count: u8,
    pub position_loop_point: u8,
    /// Meaningful part of the position table
    pub positions: Vec<u8>,
    pub pattern_count: u16,
    /// Samples that have a name or data
    pub samples: Vec<SampleJson>,
    /// Non-empty cells of every pattern, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<PatternJson>>,
}

/// JSON representation of a sample header
#[derive(Debug, Clone, Serialize)]
pub struct SampleJson {
    /// 1-based index as referenced by pattern cells
    pub index: usize,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub length: usize,
    pub finetune: i8,
    pub volume: u8,
    #[serde(skip_serializing_if = "is_zero")]
    pub repeat_offset: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub repeat_length: usize,
}

fn is_zero(v: &usize) -> bool {
    *v == 0
}

/// A pattern's non-empty cells
#[derive(Debug, Clone, Serialize)]
pub struct PatternJson {
    pub index: usize,
    pub cells: Vec<CellJson>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CellJson {
    pub row: usize,
    pub channel: usize,
    #[serde(flatten)]
    pub cell: Cell,
}

impl ModuleJson {
    /// Create a ModuleJson from a decoded module
    pub fn new(module: &Module, include_patterns: bool) -> Self {
        let samples = module
            .samples
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.name.is_empty() || s.length > 0)
            .map(|(i, s)| SampleJson::new(i + 1, s))
            .collect();

        let patterns = include_patterns.then(|| {
            module
                .patterns
                .iter()
                .enumerate()
                .map(|(index, pattern)| PatternJson {
                    index,
                    cells: pattern
                        .cells()
                        .iter()
                        .enumerate()
                        .filter(|(_, cell)| !cell.is_empty())
                        .map(|(i, cell)| CellJson {
                            row: i / pattern.channel_count(),
                            channel: i % pattern.channel_count(),
                            cell: *cell,
                        })
                        .collect(),
                })
                .collect()
        });

        Self {
            title: module.title.clone(),
            channel_count: module.channel_count,
            position_count: module.position_count,
            position_loop_point: module.position_loop_point,
            positions: module.song_positions().to_vec(),
            pattern_count: module.pattern_count,
            samples,
            patterns,
        }
    }
}

impl SampleJson {
    fn new(index: usize, sample: &Sample) -> Self {
        Self {
            index,
            name: sample.name.clone(),
            length: sample.length,
            finetune: sample.finetune,
            volume: sample.volume,
            repeat_offset: sample.repeat_offset,
            repeat_length: sample.repeat_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Pattern;

    fn module() -> Module {
        let mut samples = vec![Sample::default(); 31];
        samples[2].name = "snare".into();
        samples[2].length = 2;
        samples[2].pcm = vec![0, 0];
        let mut pattern = Pattern::new(4);
        *pattern.cell_mut(3, 2).unwrap() = Cell::new(3, 428, 0x0C, 0x20);
        Module {
            title: "json".into(),
            samples,
            positions: [0; 128],
            position_count: 1,
            position_loop_point: 0,
            channel_count: 4,
            pattern_count: 1,
            patterns: vec![pattern],
        }
    }

    #[test]
    fn test_summary_skips_empty_samples() {
        let json = ModuleJson::new(&module(), false);
        assert_eq!(json.samples.len(), 1);
        assert_eq!(json.samples[0].index, 3);
        assert!(json.patterns.is_none());

        let text = serde_json::to_string(&json).unwrap();
        assert!(text.contains("\"title\":\"json\""));
        assert!(!text.contains("patterns"));
    }

    #[test]
    fn test_patterns_list_non_empty_cells() {
        let json = ModuleJson::new(&module(), true);
        let patterns = json.patterns.unwrap();
        assert_eq!(patterns[0].cells.len(), 1);
        assert_eq!(patterns[0].cells[0].row, 3);
        assert_eq!(patterns[0].cells[0].channel, 2);
        assert_eq!(patterns[0].cells[0].cell.period, 428);
    }
}
