//! Identifier tags and the channel counts they imply

/// Channel count used when the identifier tag is not recognized
pub const DEFAULT_CHANNEL_COUNT: u8 = 4;

/// Known ProTracker / StarTrekker / TakeTracker identifier tags
pub const CHANNEL_TAGS: &[(&[u8; 4], u8)] = &[
    (b"TDZ1", 1),
    (b"1CHN", 1),
    (b"TDZ2", 2),
    (b"2CHN", 2),
    (b"TDZ3", 3),
    (b"3CHN", 3),
    (b"M.K.", 4),
    (b"FLT4", 4),
    (b"M!K!", 4),
    (b"4CHN", 4),
    (b"TDZ4", 4),
    (b"5CHN", 5),
    (b"TDZ5", 5),
    (b"6CHN", 6),
    (b"TDZ6", 6),
    (b"7CHN", 7),
    (b"TDZ7", 7),
    (b"8CHN", 8),
    (b"TDZ8", 8),
    (b"OCTA", 8),
    (b"CD81", 8),
    (b"9CHN", 9),
    (b"TDZ9", 9),
    (b"10CH", 10),
    (b"11CH", 11),
    (b"12CH", 12),
    (b"13CH", 13),
    (b"14CH", 14),
    (b"15CH", 15),
    (b"16CH", 16),
    (b"17CH", 17),
    (b"18CH", 18),
    (b"19CH", 19),
    (b"20CH", 20),
    (b"21CH", 21),
    (b"22CH", 22),
    (b"23CH", 23),
    (b"24CH", 24),
    (b"25CH", 25),
    (b"26CH", 26),
    (b"27CH", 27),
    (b"28CH", 28),
    (b"29CH", 29),
    (b"30CH", 30),
    (b"31CH", 31),
    (b"32CH", 32),
];

/// Look up the channel count for an identifier tag
pub fn lookup(tag: &[u8]) -> Option<u8> {
    CHANNEL_TAGS
        .iter()
        .find(|(known, _)| known.as_slice() == tag)
        .map(|&(_, count)| count)
}

/// Channel count for an identifier tag, falling back to 4 for unknown tags
pub fn channel_count(tag: &[u8]) -> u8 {
    lookup(tag).unwrap_or(DEFAULT_CHANNEL_COUNT)
}

/// Canonical tag to write for a channel count
///
/// `M.K.` for four channels, `NCHN` below ten and `NNCH` up to 32.
pub fn tag_for(channel_count: u8) -> [u8; 4] {
    match channel_count {
        1..=3 | 5..=9 => [b'0' + channel_count, b'C', b'H', b'N'],
        10..=32 => [
            b'0' + channel_count / 10,
            b'0' + channel_count % 10,
            b'C',
            b'H',
        ],
        _ => *b"M.K.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags() {
        for &(tag, count) in CHANNEL_TAGS {
            assert_eq!(channel_count(tag), count, "tag {:?}", tag);
        }
        assert_eq!(channel_count(b"M.K."), 4);
        assert_eq!(channel_count(b"OCTA"), 8);
        assert_eq!(channel_count(b"32CH"), 32);
    }

    #[test]
    fn test_unknown_tag_defaults_to_four() {
        assert_eq!(lookup(b"ABCD"), None);
        assert_eq!(channel_count(b"ABCD"), 4);
        assert_eq!(channel_count(&[0, 0, 0, 0]), 4);
        assert_eq!(channel_count(b"33CH"), 4);
    }

    #[test]
    fn test_tag_for_round_trips() {
        for count in 1..=32u8 {
            assert_eq!(channel_count(&tag_for(count)), count);
        }
        assert_eq!(&tag_for(4), b"M.K.");
        assert_eq!(&tag_for(2), b"2CHN");
        assert_eq!(&tag_for(8), b"8CHN");
        assert_eq!(&tag_for(12), b"12CH");
        assert_eq!(&tag_for(32), b"32CH");
        assert_eq!(&tag_for(0), b"M.K.");
    }
}
