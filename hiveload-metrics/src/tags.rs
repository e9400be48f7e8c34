use smallvec::SmallVec;
use std::sync::Arc;

/// Sorted, de-duplicated `key=value` pairs identifying one series of a metric.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TagSet {
    // Series rarely carry more than a couple of tags (`status`, `name`).
    tags: SmallVec<[(Arc<str>, Arc<str>); 4]>,
}

impl TagSet {
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut tags: SmallVec<[(Arc<str>, Arc<str>); 4]> = pairs
            .iter()
            .map(|(k, v)| (Arc::<str>::from(*k), Arc::<str>::from(*v)))
            .collect();
        tags.sort_unstable();
        tags.dedup_by(|a, b| a.0 == b.0);
        Self { tags }
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let idx = self.tags.partition_point(|(k, _)| k.as_ref() < key);
        self.tags
            .get(idx)
            .and_then(|(k, v)| (k.as_ref() == key).then_some(v.as_ref()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.tags.iter().map(|(k, v)| (k.as_ref(), v.as_ref()))
    }

    pub fn to_owned_pairs(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagset_is_order_independent() {
        let a = TagSet::from_pairs(&[("status", "success"), ("name", "x")]);
        let b = TagSet::from_pairs(&[("name", "x"), ("status", "success")]);
        assert_eq!(a, b);
        assert_eq!(a.get("status"), Some("success"));
        assert_eq!(a.get("missing"), None);
    }

    #[test]
    fn tagset_duplicate_keys_keep_one_entry() {
        let set = TagSet::from_pairs(&[("status", "failure"), ("status", "success")]);
        assert_eq!(set.len(), 1);
        assert!(set.get("status").is_some());
    }
}
