//! Name → index lookup tables.
//!
//! Nodes are identified by name; each dataset orders them
//! differently, so every matrix access goes through one of these
//! tables. Names missing from a table are skipped, never an error:
//! module membership may reach beyond a dataset's node set.

use crate::common::*;

/// node (or module) name → 0-based position
pub type IndexMap = HashMap<Box<str>, usize>;

/// Positions of `names` in their given order
pub fn make_index_map<S: AsRef<str>>(names: &[S]) -> IndexMap {
    names
        .iter()
        .enumerate()
        .map(|(i, x)| (Box::from(x.as_ref()), i))
        .collect()
}

/// Output row of every requested module; a label listed twice keeps
/// its first row
pub fn module_row_map(modules: &[Box<str>]) -> IndexMap {
    let mut ret = IndexMap::default();
    for (r, m) in modules.iter().enumerate() {
        ret.entry(m.clone()).or_insert(r);
    }
    ret
}

/// Module label → member node names, each list in assignment order
#[derive(Debug, Clone, Default)]
pub struct ModuleMap {
    members: HashMap<Box<str>, Vec<Box<str>>>,
    modules: Vec<Box<str>>,
}

impl ModuleMap {
    /// Build from `(node, module)` pairs
    pub fn from_assignment<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut ret = Self::default();
        for (node, module) in pairs {
            ret.push(node, module);
        }
        ret
    }

    fn push(&mut self, node: &str, module: &str) {
        if let Some(nodes) = self.members.get_mut(module) {
            nodes.push(node.into());
        } else {
            self.modules.push(module.into());
            self.members.insert(module.into(), vec![node.into()]);
        }
    }

    /// Keep only member nodes that appear in `present`. Modules left
    /// without members stay known, with an empty member list.
    pub fn restrict_to(&self, present: &IndexMap) -> Self {
        let members = self
            .members
            .iter()
            .map(|(m, nodes)| {
                let kept = nodes
                    .iter()
                    .filter(|x| present.contains_key(*x))
                    .cloned()
                    .collect();
                (m.clone(), kept)
            })
            .collect();
        Self {
            members,
            modules: self.modules.clone(),
        }
    }

    /// Member names; an unknown module has none
    pub fn members(&self, module: &str) -> &[Box<str>] {
        self.members.get(module).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Indices (in `index_map`) of the members present there, in
    /// member order
    pub fn node_indices(&self, module: &str, index_map: &IndexMap) -> Vec<usize> {
        self.members(module)
            .iter()
            .filter_map(|x| index_map.get(x).copied())
            .collect()
    }

    /// Module labels in order of first appearance
    pub fn modules(&self) -> &[Box<str>] {
        &self.modules
    }

    /// Every assigned node, module by module
    pub fn nodes(&self) -> impl Iterator<Item = &Box<str>> + '_ {
        self.modules
            .iter()
            .flat_map(move |m| self.members(m).iter())
    }
}

/// The pool of test-dataset node indices reshuffled by every
/// permutation, plus where each node name sits in that pool.
#[derive(Debug, Clone)]
pub struct NullPool {
    pool: Vec<usize>,
    position: IndexMap,
}

impl NullPool {
    /// Nodes of `names` found in `test_index`, first occurrence only
    fn from_names<'a, I>(names: I, test_index: &IndexMap) -> Self
    where
        I: IntoIterator<Item = &'a Box<str>>,
    {
        let mut pool = vec![];
        let mut position = IndexMap::default();
        for x in names {
            if position.contains_key(x) {
                continue;
            }
            if let Some(&i) = test_index.get(x) {
                position.insert(x.clone(), pool.len());
                pool.push(i);
            }
        }
        Self { pool, position }
    }

    /// Pool of assigned nodes that exist in the test dataset
    pub fn overlap(assignment: &ModuleMap, test_index: &IndexMap) -> Self {
        Self::from_names(assignment.nodes(), test_index)
    }

    /// Pool of every node in the test dataset
    pub fn all(test_names: &[Box<str>], test_index: &IndexMap) -> Self {
        Self::from_names(test_names.iter(), test_index)
    }

    pub fn indices(&self) -> &[usize] {
        &self.pool
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Test indices a module takes under the permuted order
    /// `shuffled` (a permutation of `self.indices()`): each member
    /// keeps its pool slot but gets whatever node now sits there.
    pub fn draw(&self, shuffled: &[usize], members: &[Box<str>]) -> Vec<usize> {
        members
            .iter()
            .filter_map(|x| self.position.get(x).map(|&p| shuffled[p]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(xs: &[&str]) -> Vec<Box<str>> {
        xs.iter().map(|&x| Box::from(x)).collect()
    }

    fn toy_modules() -> ModuleMap {
        ModuleMap::from_assignment([
            ("A", "M1"),
            ("B", "M1"),
            ("X", "M2"),
            ("C", "M1"),
            ("D", "M2"),
        ])
    }

    #[test]
    fn index_map_follows_order() {
        let map = make_index_map(&names(&["z", "y", "x"]));
        assert_eq!(map["z"], 0);
        assert_eq!(map["x"], 2);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn module_rows_keep_first_position() {
        let rows = module_row_map(&names(&["M2", "M1", "M2"]));
        assert_eq!(rows["M2"], 0);
        assert_eq!(rows["M1"], 1);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn members_and_indices() {
        let mods = toy_modules();
        assert_eq!(mods.modules(), &names(&["M1", "M2"])[..]);
        assert_eq!(mods.members("M1"), &names(&["A", "B", "C"])[..]);
        assert!(mods.members("M9").is_empty());

        let test_index = make_index_map(&names(&["D", "C", "B", "A"]));
        assert_eq!(mods.node_indices("M1", &test_index), vec![3, 2, 1]);
        // X is absent from the test dataset
        assert_eq!(mods.node_indices("M2", &test_index), vec![0]);
    }

    #[test]
    fn restriction_keeps_empty_modules() {
        let present = make_index_map(&names(&["A", "C"]));
        let restricted = toy_modules().restrict_to(&present);
        assert_eq!(restricted.members("M1"), &names(&["A", "C"])[..]);
        assert!(restricted.members("M2").is_empty());
        assert_eq!(restricted.modules().len(), 2);
    }

    #[test]
    fn overlap_pool_only_has_assigned_test_nodes() {
        let test_names = names(&["A", "B", "C", "D", "E"]);
        let test_index = make_index_map(&test_names);
        let pool = NullPool::overlap(&toy_modules(), &test_index);
        assert_eq!(pool.indices(), &[0, 1, 2, 3]);

        let pool = NullPool::all(&test_names, &test_index);
        assert_eq!(pool.len(), 5);
    }

    #[test]
    fn identity_draw_recovers_real_indices() {
        let test_names = names(&["E", "D", "C", "B", "A"]);
        let test_index = make_index_map(&test_names);
        let mods = toy_modules();
        let pool = NullPool::all(&test_names, &test_index);
        let drawn = pool.draw(pool.indices(), mods.members("M1"));
        assert_eq!(drawn, mods.node_indices("M1", &test_index));
    }

    #[test]
    fn draw_follows_the_shuffle() {
        let test_names = names(&["A", "B", "C", "D"]);
        let test_index = make_index_map(&test_names);
        let pool = NullPool::all(&test_names, &test_index);
        let shuffled = vec![3, 2, 1, 0];
        assert_eq!(pool.draw(&shuffled, &names(&["A", "B"])), vec![3, 2]);
    }
}
