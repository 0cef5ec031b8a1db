//! MOD file writer

use super::layout::{self, offset, HEADER_SIZE};
use super::module::{Module, Sample};
use super::tags;

/// Encode a module into the fixed 31-sample layout
///
/// Lengths and repeat points are halved into words, so odd byte values lose
/// their last byte. Patterns beyond `pattern_count` are not written.
pub fn encode(module: &Module) -> Vec<u8> {
    let channel_count = module.channel_count as usize;
    let pattern_count = module.pattern_count as usize;
    let mut data = vec![0u8; HEADER_SIZE];

    write_string(&mut data, offset::TITLE, layout::TITLE_SIZE, &module.title);

    for (i, sample) in module.samples.iter().take(layout::SAMPLE_COUNT).enumerate() {
        write_sample_header(&mut data, offset::SAMPLE_HEADERS + i * layout::SAMPLE_HEADER_SIZE, sample);
    }

    data[offset::POSITION_COUNT] = module.position_count;
    data[offset::LOOP_POINT] = module.position_loop_point;
    data[offset::POSITIONS..offset::POSITIONS + layout::POSITION_TABLE_SIZE]
        .copy_from_slice(&module.positions);
    data[offset::IDENTIFIER..offset::IDENTIFIER + 4]
        .copy_from_slice(&tags::tag_for(module.channel_count));

    for index in 0..pattern_count {
        match module.patterns.get(index) {
            Some(pattern) => {
                for cell in pattern.cells() {
                    data.extend_from_slice(&cell.encode());
                }
            }
            None => data.resize(data.len() + layout::pattern_size(channel_count), 0),
        }
    }

    for sample in module.samples.iter().take(layout::SAMPLE_COUNT) {
        let length = sample.length & !1;
        let start = data.len();
        data.extend(sample.pcm.iter().take(length).map(|&v| v as u8));
        data.resize(start + length, 0);
    }

    data
}

fn write_string(data: &mut [u8], at: usize, size: usize, text: &str) {
    for (dst, ch) in data[at..at + size].iter_mut().zip(text.chars()) {
        *dst = u32::from(ch).min(0xFF) as u8;
    }
}

fn write_u16_be(data: &mut [u8], at: usize, value: u16) {
    data[at..at + 2].copy_from_slice(&value.to_be_bytes());
}

fn words(bytes: usize) -> u16 {
    (bytes / 2).min(u16::MAX as usize) as u16
}

fn write_sample_header(data: &mut [u8], at: usize, sample: &Sample) {
    use layout::sample as field;

    write_string(data, at + field::NAME, field::NAME_SIZE, &sample.name);
    write_u16_be(data, at + field::LENGTH, words(sample.length));
    data[at + field::FINETUNE] = sample.finetune_index();
    data[at + field::VOLUME] = sample.volume;
    write_u16_be(data, at + field::REPEAT_OFFSET, words(sample.repeat_offset));
    write_u16_be(data, at + field::REPEAT_LENGTH, words(sample.repeat_length));
}
