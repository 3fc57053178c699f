use glossa_core::config::SegmentConfig;
use glossa_core::traits::ISegmentProvider;
use glossa_segments::SegmentDiscoverer;
use proptest::prelude::*;

fn arb_config() -> impl Strategy<Value = SegmentConfig> {
    (1u32..4, 4usize..16, 2usize..6).prop_map(|(merge_threshold, vocabulary_cap, max_len)| {
        SegmentConfig {
            merge_threshold,
            vocabulary_cap,
            max_segment_len: max_len,
            pair_table_cap: 32,
            buffer_len: 16,
            archive_cap: 4,
            ..SegmentConfig::default()
        }
    })
}

proptest! {
    #[test]
    fn vocabulary_never_exceeds_cap(text in "[abc ]{0,300}", config in arb_config()) {
        let cap = config.vocabulary_cap;
        let pair_cap = config.pair_table_cap;
        let mut discoverer = SegmentDiscoverer::new(config);
        for ch in text.chars() {
            discoverer.observe(ch);
            prop_assert!(discoverer.vocabulary().len() <= cap);
            prop_assert!(discoverer.vocabulary().pairs().len() <= pair_cap);
            prop_assert!(discoverer.vocabulary().archive().len() <= 4);
        }
    }

    #[test]
    fn archived_content_is_never_live(text in "[abc ]{0,300}", config in arb_config()) {
        let mut discoverer = SegmentDiscoverer::new(config);
        discoverer.observe_str(&text);
        let vocab = discoverer.vocabulary();
        for entry in vocab.archive().iter() {
            prop_assert!(!vocab.contains(entry.segment.content()));
        }
    }

    #[test]
    fn every_match_is_aligned_with_the_stream(text in "[ab]{1,120}", config in arb_config()) {
        let mut discoverer = SegmentDiscoverer::new(config);
        discoverer.observe_str(&text);
        let chars: Vec<char> = text.chars().collect();
        let matches = discoverer.segments_at(discoverer.position());
        for m in &matches {
            prop_assert!(m.matched >= 1 && m.matched <= m.len);
            let prefix: String = m.content.chars().take(m.matched).collect();
            let suffix: String = chars[chars.len() - m.matched..].iter().collect();
            prop_assert_eq!(prefix, suffix);
        }
        for pair in matches.windows(2) {
            prop_assert!(pair[0].len >= pair[1].len);
        }
    }

    #[test]
    fn segment_text_reassembles_input(text in "[abc]{0,80}") {
        let mut discoverer = SegmentDiscoverer::default();
        for _ in 0..3 {
            discoverer.observe_str(&text);
        }
        let tokens = discoverer.segment_text(&text);
        prop_assert_eq!(tokens.concat(), text);
    }
}
