use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::metrics::{MetricHandle, MetricKind, MetricSeriesSummary, MetricStorage};
use crate::tags::TagSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MetricId(u32);

#[derive(Debug)]
struct MetricDef {
    name: Arc<str>,
    kind: MetricKind,
}

/// Process-wide metric store shared by every virtual user.
///
/// Metrics are registered once by name; each distinct [`TagSet`] gets its own series,
/// created lazily on first write.
#[derive(Debug, Default)]
pub struct Registry {
    defs: RwLock<Vec<MetricDef>>,
    storage: DashMap<MetricId, DashMap<TagSet, MetricStorage>>,
}

impl Registry {
    /// Registers `name` or returns the id it was registered under.
    ///
    /// The kind of the first registration wins.
    pub fn register(&self, name: &str, kind: MetricKind) -> MetricId {
        let mut defs = self.defs.write();
        if let Some(idx) = defs.iter().position(|d| d.name.as_ref() == name) {
            return MetricId(idx as u32);
        }

        let id = MetricId(defs.len() as u32);
        defs.push(MetricDef {
            name: Arc::from(name),
            kind,
        });
        self.storage.insert(id, DashMap::new());
        id
    }

    pub fn get_handle(&self, metric: MetricId, tags: TagSet) -> Option<MetricHandle> {
        let series_map = self.storage.get(&metric)?;

        if let Some(storage) = series_map.get(&tags) {
            return Some(storage.handle());
        }

        let kind = self.defs.read().get(metric.0 as usize)?.kind;
        let handle = series_map
            .entry(tags)
            .or_insert_with(|| MetricStorage::new(kind))
            .handle();
        Some(handle)
    }

    pub fn handle(&self, metric: MetricId, tags: &[(&str, &str)]) -> Option<MetricHandle> {
        self.get_handle(metric, TagSet::from_pairs(tags))
    }

    /// Sum of every series of a counter, optionally restricted to series carrying `tag`.
    pub fn counter_total(&self, metric: MetricId, tag: Option<(&str, &str)>) -> u64 {
        let Some(series_map) = self.storage.get(&metric) else {
            return 0;
        };

        series_map
            .iter()
            .filter(|s| tag.is_none_or(|(k, v)| s.key().get(k) == Some(v)))
            .map(|s| s.value().handle().counter())
            .sum()
    }

    pub fn summarize(&self) -> Vec<MetricSeriesSummary> {
        let defs = self.defs.read();
        let mut out = Vec::new();

        for entry in self.storage.iter() {
            let Some(def) = defs.get(entry.key().0 as usize) else {
                continue;
            };

            for series in entry.value().iter() {
                out.push(MetricSeriesSummary {
                    name: def.name.to_string(),
                    kind: def.kind,
                    tags: series.key().to_owned_pairs(),
                    values: series.value().value(),
                });
            }
        }

        out.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.tags.cmp(&b.tags)));
        out
    }
}
