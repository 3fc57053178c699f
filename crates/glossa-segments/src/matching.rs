//! Segment lookup against a stream position, and greedy segmentation.

use glossa_core::SegmentMatch;

use crate::buffer::SegmentBuffer;
use crate::vocabulary::SegmentVocabulary;

/// Every segment aligned with `buffer` ending at `position`.
///
/// A segment is aligned when the stream's last `m` characters equal its first
/// `m` characters. Overlapping segments and multiple alignments of the same
/// segment are all kept. Ordered by segment length, then alignment length
/// (both descending), then content.
pub fn segments_at(
    vocab: &SegmentVocabulary,
    buffer: &SegmentBuffer,
    position: u64,
) -> Vec<SegmentMatch> {
    let Some(end) = buffer.retained_before(position) else {
        return Vec::new();
    };
    let longest = end.min(vocab.config().max_segment_len);

    let mut matches = Vec::new();
    for matched in 1..=longest {
        let suffix = buffer.slice(end, matched);
        for id in vocab.with_prefix(&suffix) {
            if let Some(segment) = vocab.get(*id) {
                matches.push(SegmentMatch {
                    id: *id,
                    content: segment.content().to_string(),
                    matched,
                    len: segment.len(),
                    confidence: segment.confidence,
                    occurrences: segment.occurrences,
                });
            }
        }
    }

    matches.sort_by(|a, b| {
        b.len
            .cmp(&a.len)
            .then(b.matched.cmp(&a.matched))
            .then_with(|| a.content.cmp(&b.content))
    });
    matches
}

/// Split `text` into the longest known segments, left to right, falling back
/// to single characters where nothing matches.
pub fn segment_text(vocab: &SegmentVocabulary, text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let config = vocab.config();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let remaining = chars.len() - i;
        let longest = remaining.min(config.max_segment_len);
        let found = (config.min_segment_len..=longest).rev().find_map(|len| {
            let candidate: String = chars[i..i + len].iter().collect();
            vocab.contains(&candidate).then_some((candidate, len))
        });
        match found {
            Some((token, len)) => {
                tokens.push(token);
                i += len;
            }
            None => {
                tokens.push(chars[i].to_string());
                i += 1;
            }
        }
    }
    tokens
}
