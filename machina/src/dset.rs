//! # Disjoint-set forest
//! Union-find over an arbitrary finite element set, with path compression
//! and union by rank. Used by DFA minimisation to merge the unmarked pairs
//! of the distinguishability table into equivalence classes.

use std::collections::HashMap;
use std::hash::Hash;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DisjointSetError {
    #[error("element is not a member of this disjoint-set forest")]
    NotAMember,
}

/// A disjoint-set forest. Every element starts out as its own singleton
/// class with rank 1; classes are merged with [DisjointSet::union] and the
/// partition is read back with [DisjointSet::classes].
#[derive(Debug, Clone)]
pub struct DisjointSet<T> {
    elements: Vec<T>,
    index: HashMap<T, usize>,
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl<T: Eq + Hash + Clone> DisjointSet<T> {
    /// Creates a forest of singletons from the given elements. Duplicate
    /// elements are ignored.
    pub fn new(elements: impl IntoIterator<Item = T>) -> Self {
        let mut set = Self {
            elements: Vec::new(),
            index: HashMap::new(),
            parent: Vec::new(),
            rank: Vec::new(),
        };
        for elem in elements {
            if !set.index.contains_key(&elem) {
                let idx = set.elements.len();
                set.index.insert(elem.clone(), idx);
                set.elements.push(elem);
                set.parent.push(idx);
                set.rank.push(1);
            }
        }
        set
    }

    /// Finds the representative of the class containing `elem`, collapsing
    /// the path from `elem` to the root.
    pub fn find(&mut self, elem: &T) -> Result<T, DisjointSetError> {
        let idx = *self.index.get(elem).ok_or(DisjointSetError::NotAMember)?;
        let root = self.find_idx(idx);
        Ok(self.elements[root].clone())
    }

    /// Merges the classes of `a` and `b` by rank. The root of higher rank
    /// absorbs the other; on equal ranks the first argument's root wins and
    /// its rank is incremented.
    pub fn union(&mut self, a: &T, b: &T) -> Result<(), DisjointSetError> {
        let a = *self.index.get(a).ok_or(DisjointSetError::NotAMember)?;
        let b = *self.index.get(b).ok_or(DisjointSetError::NotAMember)?;
        let root_a = self.find_idx(a);
        let root_b = self.find_idx(b);
        if root_a != root_b {
            if self.rank[root_a] >= self.rank[root_b] {
                self.parent[root_b] = root_a;
                if self.rank[root_a] == self.rank[root_b] {
                    self.rank[root_a] += 1;
                }
            } else {
                self.parent[root_a] = root_b;
            }
        }
        Ok(())
    }

    /// Gives the partition as a list of classes. Classes are ordered by the
    /// first inserted element belonging to them, and elements within a
    /// class keep their insertion order, so the enumeration is
    /// deterministic.
    pub fn classes(&mut self) -> Vec<Vec<T>> {
        let mut class_of_root: HashMap<usize, usize> = HashMap::new();
        let mut classes: Vec<Vec<T>> = Vec::new();
        for idx in 0..self.elements.len() {
            let root = self.find_idx(idx);
            let class = *class_of_root.entry(root).or_insert_with(|| {
                classes.push(Vec::new());
                classes.len() - 1
            });
            classes[class].push(self.elements[idx].clone());
        }
        classes
    }

    /// Checks if `elem` is a member of this forest
    pub fn contains(&self, elem: &T) -> bool {
        self.index.contains_key(elem)
    }

    fn find_idx(&mut self, mut idx: usize) -> usize {
        let mut root = idx;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while idx != root {
            let next = self.parent[idx];
            self.parent[idx] = root;
            idx = next;
        }
        root
    }
}
