//! Character model front ends: an owning single-stream model and a borrowed
//! view used when the table is shared between streams.

use glossa_core::config::CharModelConfig;
use glossa_core::traits::ICharPredictor;
use glossa_core::CharDistribution;

use crate::blend;
use crate::history::CharHistory;
use crate::table::ContextTable;

/// A self-contained character model for a single stream.
#[derive(Debug, Clone)]
pub struct CharacterModel {
    table: ContextTable,
    history: CharHistory,
}

impl CharacterModel {
    pub fn new(config: CharModelConfig) -> Self {
        let history = CharHistory::new(config.max_context_len);
        Self {
            table: ContextTable::new(config),
            history,
        }
    }

    /// Update context statistics with `ch`, then advance the history.
    pub fn observe(&mut self, ch: char) {
        self.table.observe(&self.history, ch);
        self.history.push(ch);
    }

    pub fn observe_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.observe(ch);
        }
    }

    pub fn table(&self) -> &ContextTable {
        &self.table
    }

    pub fn history(&self) -> &CharHistory {
        &self.history
    }

    pub fn view(&self) -> CharView<'_> {
        CharView::new(&self.table, &self.history)
    }
}

impl Default for CharacterModel {
    fn default() -> Self {
        Self::new(CharModelConfig::default())
    }
}

impl ICharPredictor for CharacterModel {
    fn predict_next(&self) -> CharDistribution {
        blend::blend(&self.table, &self.history)
    }
}

/// Read-only pairing of a shared table with one stream's history.
#[derive(Debug, Clone, Copy)]
pub struct CharView<'a> {
    table: &'a ContextTable,
    history: &'a CharHistory,
}

impl<'a> CharView<'a> {
    pub fn new(table: &'a ContextTable, history: &'a CharHistory) -> Self {
        Self { table, history }
    }
}

impl ICharPredictor for CharView<'_> {
    fn predict_next(&self) -> CharDistribution {
        blend::blend(self.table, self.history)
    }
}
