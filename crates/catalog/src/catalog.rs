use crate::record::{CuisineType, PriceTier, Record};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};

/// Cuisine/price inclusion rule shared by the recommendation and the
/// management list. An empty set on either axis accepts everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Filter {
    #[serde(default)]
    pub cuisines: BTreeSet<CuisineType>,
    #[serde(default)]
    pub prices: BTreeSet<PriceTier>,
}

impl Filter {
    pub fn new(
        cuisines: impl IntoIterator<Item = CuisineType>,
        prices: impl IntoIterator<Item = PriceTier>,
    ) -> Self {
        Self {
            cuisines: cuisines.into_iter().collect(),
            prices: prices.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cuisines.is_empty() && self.prices.is_empty()
    }

    pub fn matches(&self, record: &Record) -> bool {
        (self.cuisines.is_empty() || self.cuisines.contains(&record.cuisine))
            && (self.prices.is_empty() || self.prices.contains(&record.price))
    }
}

/// Counts reported by [`Catalog::merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub uploaded: usize,
    /// Existing rows superseded by a later row with the same name.
    pub replaced: usize,
    pub dropped_unnamed: usize,
    pub total: usize,
}

/// In-memory ordered table of restaurant records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    records: Vec<Record>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn find(&self, name: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn add(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Replaces every row named `name` with `record`. Returns how many rows changed.
    pub fn update(&mut self, name: &str, record: &Record) -> usize {
        let mut replaced = 0;
        for slot in self.records.iter_mut().filter(|r| r.name == name) {
            *slot = record.clone();
            replaced += 1;
        }
        replaced
    }

    /// Removes every row named `name`. Returns how many rows were removed.
    pub fn delete(&mut self, name: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.name != name);
        before - self.records.len()
    }

    /// Case-sensitive substring match against name or menu.
    pub fn search(&self, query: &str) -> Vec<&Record> {
        if query.is_empty() {
            return self.records.iter().collect();
        }
        self.records
            .iter()
            .filter(|r| r.name.contains(query) || r.menu.contains(query))
            .collect()
    }

    pub fn filter(&self, filter: &Filter) -> Vec<&Record> {
        self.records.iter().filter(|r| filter.matches(r)).collect()
    }

    /// Management view: search first, then the cuisine/price filter.
    pub fn query(&self, query: &str, filter: &Filter) -> Vec<&Record> {
        self.search(query)
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect()
    }

    /// Appends `uploaded` and collapses duplicate names, keeping the last
    /// occurrence at its own position. Unnamed rows are dropped afterwards.
    pub fn merge(&mut self, uploaded: Vec<(Option<String>, Record)>) -> MergeStats {
        let existing = self.records.len();
        let uploaded_len = uploaded.len();

        let combined: Vec<(Option<String>, Record)> = std::mem::take(&mut self.records)
            .into_iter()
            .map(|r| (Some(r.name.clone()), r))
            .chain(uploaded)
            .collect();

        let mut last_seen: HashMap<Option<&str>, usize> = HashMap::new();
        for (idx, (key, _)) in combined.iter().enumerate() {
            last_seen.insert(key.as_deref(), idx);
        }
        let keep: Vec<bool> = combined
            .iter()
            .enumerate()
            .map(|(idx, (key, _))| last_seen.get(&key.as_deref()) == Some(&idx))
            .collect();
        drop(last_seen);

        let mut stats = MergeStats {
            uploaded: uploaded_len,
            ..MergeStats::default()
        };
        for (idx, ((key, record), kept)) in combined.into_iter().zip(keep).enumerate() {
            if key.is_none() {
                stats.dropped_unnamed += 1;
                continue;
            }
            if !kept {
                if idx < existing {
                    stats.replaced += 1;
                }
                continue;
            }
            self.records.push(record);
        }
        stats.total = self.records.len();
        stats
    }
}
