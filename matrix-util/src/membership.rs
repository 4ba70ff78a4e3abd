//! Node → group membership tables (e.g., module assignments).
//!
//! A membership file has two columns, the key (node name) and its
//! group label. Tab, comma, or whitespace separated; optionally
//! gzipped. Lines starting with `#` are skipped.

use crate::common_io::{read_lines_of_words_delim, ReadLinesOut};
use fnv::FnvHashMap as HashMap;
use log::{info, warn};

/// An ordered key → group mapping.
///
/// The order of first appearance is kept, since downstream code
/// enumerates the members of each group in file order.
#[derive(Debug, Clone, Default)]
pub struct Membership {
    pairs: Vec<(Box<str>, Box<str>)>,
    position: HashMap<Box<str>, usize>,
}

impl Membership {
    /// Create membership from key-value pairs. A repeated key keeps
    /// its first group.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Box<str>, Box<str>)>) -> Self {
        let mut ret = Self::default();
        for (key, value) in pairs {
            if ret.position.contains_key(&key) {
                warn!("duplicate key {}: keeping its first group", key);
                continue;
            }
            ret.position.insert(key.clone(), ret.pairs.len());
            ret.pairs.push((key, value));
        }
        ret
    }

    /// Load membership from file
    ///
    /// # Arguments
    /// * `file_path` - Path to membership file
    /// * `key_col` - Column index for keys (0-based)
    /// * `value_col` - Column index for values (0-based)
    pub fn from_file(file_path: &str, key_col: usize, value_col: usize) -> anyhow::Result<Self> {
        let ReadLinesOut { lines, header: _ } =
            read_lines_of_words_delim(file_path, &['\t', ',', ' '], -1)?;

        if lines.is_empty() {
            anyhow::bail!("Membership file is empty: {}", file_path);
        }

        let max_col = key_col.max(value_col);
        let mut pairs = Vec::with_capacity(lines.len());

        for line in lines {
            let words: Vec<Box<str>> = line.into_iter().filter(|w| !w.is_empty()).collect();
            if words.len() <= max_col {
                warn!("Skipping malformed line with {} columns", words.len());
                continue;
            }
            pairs.push((words[key_col].clone(), words[value_col].clone()));
        }

        let ret = Self::from_pairs(pairs);
        info!("Loaded {} entries from {}", ret.len(), file_path);
        Ok(ret)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.position
            .get(key)
            .map(|&i| self.pairs[i].1.as_ref())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// All pairs in order of first appearance
    pub fn pairs(&self) -> &[(Box<str>, Box<str>)] {
        &self.pairs
    }

    /// Distinct group labels in order of first appearance
    pub fn groups(&self) -> Vec<Box<str>> {
        let mut seen = std::collections::HashSet::new();
        self.pairs
            .iter()
            .filter(|(_, g)| seen.insert(g.clone()))
            .map(|(_, g)| g.clone())
            .collect()
    }

    /// Keep only the keys satisfying `keep`
    pub fn filter_keys(&self, keep: impl Fn(&str) -> bool) -> Self {
        Self::from_pairs(self.pairs.iter().filter(|(k, _)| keep(k)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> Membership {
        Membership::from_pairs(
            [("a", "m1"), ("b", "m2"), ("c", "m1"), ("a", "m2")]
                .into_iter()
                .map(|(k, v)| (Box::from(k), Box::from(v))),
        )
    }

    #[test]
    fn first_assignment_wins() {
        let mm = toy();
        assert_eq!(mm.len(), 3);
        assert_eq!(mm.get("a"), Some("m1"));
        assert_eq!(mm.get("z"), None);
    }

    #[test]
    fn groups_in_order() {
        let groups = toy().groups();
        assert_eq!(groups, vec![Box::from("m1"), Box::from("m2")]);
    }

    #[test]
    fn filter_drops_keys() {
        let mm = toy().filter_keys(|k| k != "b");
        assert_eq!(mm.len(), 2);
        assert!(mm.get("b").is_none());
    }
}
