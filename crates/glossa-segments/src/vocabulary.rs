//! Shared segment vocabulary: a generational arena with content and prefix
//! indexes, the pair table that drives merging, and eviction.

use glossa_core::config::SegmentConfig;
use glossa_core::traits::ISegmentFeedback;
use glossa_core::SegmentId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::archive::{ArchivedSegment, EvictionReason, SegmentArchive};
use crate::buffer::SegmentBuffer;
use crate::pairs::PairTable;
use crate::segment::Segment;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Slot {
    generation: u32,
    segment: Option<Segment>,
}

/// What one observed character did to the vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObserveOutcome {
    /// Segment created by a merge on this character.
    pub merged: Option<SegmentId>,
    /// Segments removed by cap or floor eviction.
    pub evicted: SmallVec<[SegmentId; 2]>,
    /// Complete matches that ended at the new position.
    pub completed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct VocabularyRepr {
    config: SegmentConfig,
    slots: Vec<Slot>,
    free: Vec<u32>,
    pairs: PairTable,
    #[serde(default)]
    archive: SegmentArchive,
    tick: u64,
    merges: u64,
    evictions: u64,
}

/// Segments shared by every stream.
///
/// Ids are `(slot, generation)` handles. A slot freed by eviction is reused
/// with a bumped generation, so a stale handle never resolves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "VocabularyRepr", from = "VocabularyRepr")]
pub struct SegmentVocabulary {
    config: SegmentConfig,
    slots: Vec<Slot>,
    free: Vec<u32>,
    index: FxHashMap<String, SegmentId>,
    /// Every prefix (1..=len chars) of every live segment.
    prefixes: FxHashMap<String, SmallVec<[SegmentId; 4]>>,
    pairs: PairTable,
    archive: SegmentArchive,
    live: usize,
    tick: u64,
    pub(crate) merges: u64,
    pub(crate) evictions: u64,
}

impl SegmentVocabulary {
    pub fn new(config: SegmentConfig) -> Self {
        let pairs = PairTable::new(config.pair_table_cap);
        let archive = SegmentArchive::new(config.archive_cap);
        Self {
            config,
            slots: Vec::new(),
            free: Vec::new(),
            index: FxHashMap::default(),
            prefixes: FxHashMap::default(),
            pairs,
            archive,
            live: 0,
            tick: 0,
            merges: 0,
            evictions: 0,
        }
    }

    pub fn config(&self) -> &SegmentConfig {
        &self.config
    }

    /// Adopt new tunables, enforcing the (possibly smaller) caps immediately.
    pub fn reconfigure(&mut self, config: SegmentConfig) -> SmallVec<[SegmentId; 2]> {
        self.pairs.set_cap(config.pair_table_cap);
        self.archive.set_cap(config.archive_cap);
        self.config = config;
        let mut evicted = SmallVec::new();
        self.enforce_cap(None, &mut evicted);
        evicted
    }

    /// A fresh buffer sized for this vocabulary.
    pub fn new_buffer(&self) -> SegmentBuffer {
        SegmentBuffer::new(self.config.buffer_len)
    }

    /// Feed one character of the stream owning `buffer`.
    ///
    /// Extends the stream's open token while the extension is a known
    /// segment; otherwise closes it, counts the adjacent pair, and merges the
    /// pair into a new segment once it has co-occurred `merge_threshold`
    /// times. Pairs below the threshold never enter the vocabulary.
    pub fn observe(&mut self, buffer: &mut SegmentBuffer, ch: char) -> ObserveOutcome {
        self.tick += 1;
        let mut outcome = ObserveOutcome::default();

        buffer.push(ch);
        if buffer.open.is_empty() {
            buffer.open.push(ch);
        } else {
            let mut extended = buffer.open.clone();
            extended.push(ch);
            if self.index.contains_key(&extended) {
                buffer.open = extended;
            } else {
                let closed = std::mem::replace(&mut buffer.open, ch.to_string());
                if let Some(previous) = buffer.previous.take() {
                    outcome.merged = self.count_pair(&previous, &closed, &mut outcome.evicted);
                }
                buffer.previous = Some(closed);
            }
        }

        outcome.completed = self.bump_complete_matches(buffer);

        if self.tick % self.config.sweep_interval.max(1) == 0 {
            self.sweep(&mut outcome.evicted);
        }
        outcome
    }

    fn count_pair(
        &mut self,
        left: &str,
        right: &str,
        evicted: &mut SmallVec<[SegmentId; 2]>,
    ) -> Option<SegmentId> {
        let count = self.pairs.increment(left, right);
        if count < self.config.merge_threshold {
            return None;
        }
        let len = left.chars().count() + right.chars().count();
        if len > self.config.max_segment_len || len < self.config.min_segment_len {
            return None;
        }
        let content = format!("{left}{right}");
        if self.index.contains_key(&content) {
            return None;
        }
        self.pairs.remove(left, right);
        let id = self.insert(content, u64::from(count));
        self.merges += 1;
        debug!(
            segment = %id,
            left,
            right,
            count,
            live = self.live,
            "segment merged"
        );
        self.enforce_cap(Some(id), evicted);
        Some(id)
    }

    fn bump_complete_matches(&mut self, buffer: &SegmentBuffer) -> usize {
        let available = buffer.len().min(self.config.max_segment_len);
        let tick = self.tick;
        let mut completed = 0;
        for len in self.config.min_segment_len..=available {
            let text = buffer.slice(buffer.len(), len);
            let Some(id) = self.index.get(&text).copied() else {
                continue;
            };
            if let Some(segment) = self.get_mut(id) {
                segment.occurrences += 1;
                segment.last_seen = tick;
                completed += 1;
            }
        }
        completed
    }

    /// Insert a segment directly, bypassing the merge rule.
    ///
    /// Returns the existing id if the content is already known. Enforces the
    /// vocabulary cap without evicting the inserted segment.
    pub fn insert_segment(&mut self, content: &str) -> (SegmentId, SmallVec<[SegmentId; 2]>) {
        let mut evicted = SmallVec::new();
        if let Some(id) = self.index.get(content) {
            return (*id, evicted);
        }
        let id = self.insert(content.to_string(), 1);
        self.enforce_cap(Some(id), &mut evicted);
        (id, evicted)
    }

    fn insert(&mut self, content: String, occurrences: u64) -> SegmentId {
        let segment = Segment::new(
            content,
            occurrences,
            self.tick,
            self.config.initial_confidence,
        );
        self.place(segment)
    }

    /// Put a segment into a free slot and index it. A segment that starts
    /// below the confidence floor starts its grace period now.
    fn place(&mut self, mut segment: Segment) -> SegmentId {
        segment.track_floor(self.config.confidence_floor, self.tick);
        let content = segment.content().to_string();
        self.archive.discard(&content);
        let id = match self.free.pop() {
            Some(slot) => {
                let entry = &mut self.slots[slot as usize];
                entry.segment = Some(segment);
                SegmentId::new(slot, entry.generation)
            }
            None => {
                let slot = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    segment: Some(segment),
                });
                SegmentId::new(slot, 0)
            }
        };
        self.index_segment(id, &content);
        self.live += 1;
        id
    }

    fn index_segment(&mut self, id: SegmentId, content: &str) {
        self.index.insert(content.to_string(), id);
        for (end, _) in content
            .char_indices()
            .skip(1)
            .chain(std::iter::once((content.len(), ' ')))
        {
            self.prefixes
                .entry(content[..end].to_string())
                .or_default()
                .push(id);
        }
    }

    fn remove(&mut self, id: SegmentId) -> Option<Segment> {
        let entry = self.slots.get_mut(id.slot as usize)?;
        if entry.generation != id.generation {
            return None;
        }
        let segment = entry.segment.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(id.slot);
        self.live -= 1;
        self.evictions += 1;

        self.index.remove(segment.content());
        let content = segment.content();
        for (end, _) in content
            .char_indices()
            .skip(1)
            .chain(std::iter::once((content.len(), ' ')))
        {
            let prefix = &content[..end];
            if let Some(ids) = self.prefixes.get_mut(prefix) {
                ids.retain(|other| *other != id);
                if ids.is_empty() {
                    self.prefixes.remove(prefix);
                }
            }
        }
        Some(segment)
    }

    fn evict(&mut self, id: SegmentId, reason: EvictionReason) -> Option<&ArchivedSegment> {
        let segment = self.remove(id)?;
        let content = segment.content().to_string();
        self.archive.push(ArchivedSegment {
            segment,
            reason,
            evicted_at: self.tick,
        });
        self.archive.get(&content)
    }

    /// Evict lowest confidence, then oldest first-seen, then lowest id,
    /// never touching `keep`.
    fn enforce_cap(&mut self, keep: Option<SegmentId>, evicted: &mut SmallVec<[SegmentId; 2]>) {
        while self.live > self.config.vocabulary_cap {
            let victim = self
                .iter()
                .filter(|(id, _)| Some(*id) != keep)
                .min_by(|(a_id, a), (b_id, b)| {
                    a.confidence
                        .total_cmp(&b.confidence)
                        .then(a.first_seen.cmp(&b.first_seen))
                        .then(a_id.cmp(b_id))
                })
                .map(|(id, _)| id);
            let Some(victim) = victim else { break };
            let cap = self.config.vocabulary_cap;
            match self.evict(victim, EvictionReason::Capacity) {
                Some(entry) => debug!(
                    segment = %victim,
                    content = entry.segment.content(),
                    confidence = entry.segment.confidence,
                    cap,
                    "vocabulary full, segment evicted"
                ),
                None => debug!(segment = %victim, cap, "vocabulary full, segment evicted"),
            }
            evicted.push(victim);
        }
    }

    /// Evict segments that have stayed below the confidence floor for longer
    /// than the grace period.
    fn sweep(&mut self, evicted: &mut SmallVec<[SegmentId; 2]>) {
        let tick = self.tick;
        let grace = self.config.grace_period;
        let expired: Vec<SegmentId> = self
            .iter()
            .filter(|(_, segment)| segment.is_expired(tick, grace))
            .map(|(id, _)| id)
            .collect();
        for id in expired {
            let Some(confidence) = self.get(id).map(|segment| segment.confidence) else {
                continue;
            };
            self.evict(id, EvictionReason::Floor);
            debug!(
                segment = %id,
                confidence,
                "segment below confidence floor past grace period, evicted"
            );
            evicted.push(id);
        }
    }

    /// Live segments in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SegmentId, &Segment)> + '_ {
        self.slots.iter().enumerate().filter_map(|(slot, entry)| {
            entry
                .segment
                .as_ref()
                .map(|segment| (SegmentId::new(slot as u32, entry.generation), segment))
        })
    }

    pub fn get(&self, id: SegmentId) -> Option<&Segment> {
        let entry = self.slots.get(id.slot as usize)?;
        if entry.generation != id.generation {
            return None;
        }
        entry.segment.as_ref()
    }

    fn get_mut(&mut self, id: SegmentId) -> Option<&mut Segment> {
        let entry = self.slots.get_mut(id.slot as usize)?;
        if entry.generation != id.generation {
            return None;
        }
        entry.segment.as_mut()
    }

    pub fn lookup(&self, content: &str) -> Option<SegmentId> {
        self.index.get(content).copied()
    }

    pub fn contains(&self, content: &str) -> bool {
        self.index.contains_key(content)
    }

    /// Segment ids whose first `prefix.chars().count()` characters are `prefix`.
    pub(crate) fn with_prefix(&self, prefix: &str) -> &[SegmentId] {
        self.prefixes.get(prefix).map_or(&[], |ids| ids.as_slice())
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn pairs(&self) -> &PairTable {
        &self.pairs
    }

    /// Share of counted adjacent pairs that were `left` followed by `right`.
    pub fn pair_strength(&self, left: &str, right: &str) -> f64 {
        self.pairs.strength(left, right)
    }

    pub fn archive(&self) -> &SegmentArchive {
        &self.archive
    }

    /// Bring an archived segment back with the statistics it was evicted
    /// with. Returns `None` when `content` is not archived or is live again.
    /// The floor grace period restarts at the current tick.
    pub fn restore_from_archive(
        &mut self,
        content: &str,
    ) -> Option<(SegmentId, SmallVec<[SegmentId; 2]>)> {
        if self.index.contains_key(content) {
            return None;
        }
        let entry = self.archive.take(content)?;
        let mut segment = entry.segment;
        segment.below_floor_since = None;
        segment.last_seen = self.tick;
        let id = self.place(segment);
        debug!(
            segment = %id,
            content,
            evicted_at = entry.evicted_at,
            "segment restored from archive"
        );
        let mut evicted = SmallVec::new();
        self.enforce_cap(Some(id), &mut evicted);
        Some((id, evicted))
    }

    /// Observations processed across all streams.
    pub fn tick(&self) -> u64 {
        self.tick
    }
}

impl ISegmentFeedback for SegmentVocabulary {
    fn record_signal(&mut self, id: SegmentId, useful: bool) -> bool {
        let rate = self.config.confidence_decay;
        let floor = self.config.confidence_floor;
        let tick = self.tick;
        match self.get_mut(id) {
            Some(segment) => {
                segment.apply_signal(useful, rate, floor, tick);
                true
            }
            None => {
                debug!(segment = %id, "signal for evicted segment ignored");
                false
            }
        }
    }
}

// Indexes are derived from the arena, so equality ignores them.
impl PartialEq for SegmentVocabulary {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
            && self.slots == other.slots
            && self.free == other.free
            && self.pairs == other.pairs
            && self.archive == other.archive
            && self.tick == other.tick
            && self.merges == other.merges
            && self.evictions == other.evictions
    }
}

impl From<SegmentVocabulary> for VocabularyRepr {
    fn from(vocab: SegmentVocabulary) -> Self {
        Self {
            config: vocab.config,
            slots: vocab.slots,
            free: vocab.free,
            pairs: vocab.pairs,
            archive: vocab.archive,
            tick: vocab.tick,
            merges: vocab.merges,
            evictions: vocab.evictions,
        }
    }
}

impl From<VocabularyRepr> for SegmentVocabulary {
    fn from(repr: VocabularyRepr) -> Self {
        let mut vocab = Self {
            config: repr.config,
            slots: repr.slots,
            free: repr.free,
            index: FxHashMap::default(),
            prefixes: FxHashMap::default(),
            pairs: repr.pairs,
            archive: repr.archive,
            live: 0,
            tick: repr.tick,
            merges: repr.merges,
            evictions: repr.evictions,
        };
        let live: Vec<(SegmentId, String)> = vocab
            .iter()
            .map(|(id, segment)| (id, segment.content().to_string()))
            .collect();
        vocab.live = live.len();
        for (id, content) in live {
            vocab.index_segment(id, &content);
        }
        vocab
    }
}
