use glossa_chars::CharacterModel;
use glossa_core::config::CharModelConfig;
use glossa_core::traits::ICharPredictor;
use proptest::prelude::*;

fn arb_config() -> impl Strategy<Value = CharModelConfig> {
    (1usize..6, 16usize..128).prop_map(|(max_context_len, max_contexts)| CharModelConfig {
        max_context_len,
        max_contexts,
    })
}

proptest! {
    #[test]
    fn distribution_always_sums_to_one(text in "[a-e ]{0,200}", config in arb_config()) {
        let mut model = CharacterModel::new(config);
        model.observe_str(&text);
        let dist = model.predict_next();
        prop_assert!(!dist.is_empty());
        prop_assert!((dist.total() - 1.0).abs() < 1e-9);
        for (_, p) in dist.entries() {
            prop_assert!(*p > 0.0 && *p <= 1.0);
        }
    }

    #[test]
    fn context_table_never_exceeds_cap(text in "[a-z]{0,400}", config in arb_config()) {
        let cap = config.max_contexts;
        let mut model = CharacterModel::new(config);
        for ch in text.chars() {
            model.observe(ch);
            prop_assert!(model.table().len() <= cap);
        }
    }

    #[test]
    fn cold_start_only_without_observations(text in "[a-z]{0,20}") {
        let mut model = CharacterModel::default();
        model.observe_str(&text);
        prop_assert_eq!(model.predict_next().cold_start, text.is_empty());
    }
}
