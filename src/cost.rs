// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module defines `CostVector`, the fixed-arity vector of non-negative
//! reals that every vertex carries and every cost table entry holds. Every
//! vector remembers the set of vertex ids ("provenance") whose individual
//! costs were summed to produce it; that provenance is what lets two
//! overlapping mini-bucket sums be added back together without double
//! counting (see `ParetoSet::add` and `CostTable::add`).

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::ops::Div;

use crate::graph::{Graph, VertexId};

/// An immutable tuple of `D` non-negative reals plus the set of vertex ids
/// that contributed to it.
///
/// Equality and ordering only ever look at the numeric components — two
/// vectors with identical values but different provenance compare equal.
/// Provenance only affects `Hash`, which combines the tuple hash with a
/// hash of the *sorted* provenance (`includes` is a `BTreeSet`, so
/// iteration order is already sorted) so that `ParetoSet` deduplication is
/// deterministic regardless of the order vectors were produced in (§4.A,
/// §9).
#[derive(Debug, Clone)]
pub struct CostVector {
    values: Vec<f64>,
    includes: BTreeSet<VertexId>,
}

impl CostVector {
    /// Builds a cost vector with no provenance (e.g. the all-zero vector
    /// for an empty cover).
    pub fn zero(dimensions: usize) -> Self {
        CostVector {
            values: vec![0.0; dimensions],
            includes: BTreeSet::new(),
        }
    }

    /// Builds a cost vector from explicit components and provenance.
    pub fn new(values: Vec<f64>, includes: BTreeSet<VertexId>) -> Self {
        CostVector { values, includes }
    }

    /// The all-infinite vector used to encode an infeasible assignment
    /// (e.g. both endpoints of an edge left uncovered).
    pub fn infinite(dimensions: usize) -> Self {
        CostVector {
            values: vec![f64::INFINITY; dimensions],
            includes: BTreeSet::new(),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn includes(&self) -> &BTreeSet<VertexId> {
        &self.includes
    }

    pub fn is_infinite(&self) -> bool {
        self.values.iter().any(|v| v.is_infinite())
    }

    /// Componentwise `<=`.
    pub fn le(&self, other: &CostVector) -> bool {
        debug_assert_eq!(self.dimensions(), other.dimensions());
        self.values.iter().zip(&other.values).all(|(a, b)| a <= b)
    }

    /// Strict dominance: `self <= other` and `self != other`.
    pub fn dominates(&self, other: &CostVector) -> bool {
        self.le(other) && self.values != other.values
    }

    /// Sums a collection of (vertex id, vertex cost) pairs, deduplicating
    /// by provenance: a vertex id that shows up more than once in `parts`
    /// contributes its cost exactly once. This is the building block used
    /// by `CostTable::create` (sum an arbitrary subset of a scope) and by
    /// `add` below (sum over the union of two operands' provenance).
    pub fn sum_vertices<'a>(
        dimensions: usize,
        parts: impl Iterator<Item = (VertexId, &'a CostVector)>,
    ) -> Self {
        let mut includes = BTreeSet::new();
        let mut values = vec![0.0; dimensions];
        for (id, cost) in parts {
            if includes.insert(id) {
                for (acc, v) in values.iter_mut().zip(cost.values()) {
                    *acc += v;
                }
            }
        }
        CostVector { values, includes }
    }

    /// Provenance-aware addition (§3, §4.A): the result is the sum, over
    /// the *union* of `self` and `other`'s provenance, of each contributing
    /// vertex's current cost in `graph` — NOT the naive componentwise sum
    /// of `self.values()` and `other.values()`. This is what makes
    /// addition idempotent when provenance coincides (`a.add(&a, g) == a`),
    /// which is essential when summing cost tables whose scopes overlap
    /// across mini-buckets: a vertex split across several mini-buckets
    /// must only be billed once in the combined heuristic.
    ///
    /// If either operand is all-infinite, the result is all-infinite with
    /// empty provenance, per spec.
    pub fn add(&self, other: &CostVector, graph: &Graph) -> CostVector {
        if self.is_infinite() || other.is_infinite() {
            return CostVector::infinite(self.dimensions());
        }
        let ids = self.includes.union(&other.includes).copied();
        CostVector::sum_vertices(
            self.dimensions(),
            ids.map(|id| (id, graph.vertex_cost(id))),
        )
    }
}

impl Div<f64> for &CostVector {
    type Output = CostVector;

    /// Divides each component by `scalar`; preserves provenance. Used only
    /// by `Vertex::split`, which does not need provenance-aware addition
    /// semantics since it scales a single vector rather than summing two.
    fn div(self, scalar: f64) -> CostVector {
        CostVector {
            values: self.values.iter().map(|v| v / scalar).collect(),
            includes: self.includes.clone(),
        }
    }
}

impl PartialEq for CostVector {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl PartialOrd for CostVector {
    /// Componentwise partial order. Two vectors that are incomparable
    /// (neither `<=` the other) return `None`, so this is a genuine partial
    /// order, not a total one — callers that need dominance specifically
    /// should use `dominates`/`le` rather than relying on `Ordering`.
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        debug_assert_eq!(self.dimensions(), other.dimensions());
        use std::cmp::Ordering::*;
        let mut seen_less = false;
        let mut seen_greater = false;
        for (a, b) in self.values.iter().zip(&other.values) {
            match a.partial_cmp(b)? {
                Less => seen_less = true,
                Greater => seen_greater = true,
                Equal => {}
            }
        }
        match (seen_less, seen_greater) {
            (true, true) => None,
            (true, false) => Some(Less),
            (false, true) => Some(Greater),
            (false, false) => Some(Equal),
        }
    }
}

impl Hash for CostVector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for v in &self.values {
            v.to_bits().hash(state);
        }
        for id in &self.includes {
            id.hash(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    fn graph_with(costs: &[(&str, &[f64])]) -> (Graph, Vec<VertexId>) {
        let mut g = Graph::new(costs[0].1.len());
        let ids = costs
            .iter()
            .map(|(name, cost)| g.add_vertex(name, cost.to_vec()).unwrap())
            .collect();
        (g, ids)
    }

    #[test]
    fn dominance_is_strict_and_componentwise() {
        let a = CostVector::new(vec![1.0, 1.0], BTreeSet::new());
        let b = CostVector::new(vec![1.0, 2.0], BTreeSet::new());
        let c = CostVector::new(vec![1.0, 1.0], BTreeSet::new());

        assert!(a.dominates(&b));
        assert!(!b.dominates(&a));
        assert!(!a.dominates(&c)); // equal values: not a strict dominance
        assert!(a.le(&c));
    }

    #[test]
    fn infinite_vector_has_infinite_components() {
        let inf = CostVector::infinite(2);
        assert!(inf.is_infinite());
        assert_eq!(inf.values(), &[f64::INFINITY, f64::INFINITY]);
    }

    #[test]
    fn addition_is_idempotent_on_shared_provenance() {
        let (graph, ids) = graph_with(&[("a", &[3.0, 1.0]), ("b", &[1.0, 3.0])]);
        let a = graph.vertex_cost(ids[0]).clone();
        let summed = a.add(&a, &graph);
        assert_eq!(summed.values(), a.values());
        assert_eq!(summed.includes(), a.includes());
    }

    #[test]
    fn addition_sums_disjoint_provenance_from_current_vertex_costs() {
        let (graph, ids) = graph_with(&[("a", &[3.0, 1.0]), ("b", &[1.0, 3.0])]);
        let a = graph.vertex_cost(ids[0]).clone();
        let b = graph.vertex_cost(ids[1]).clone();
        let summed = a.add(&b, &graph);
        assert_eq!(summed.values(), &[4.0, 4.0]);
        assert_eq!(summed.includes().len(), 2);
    }

    #[test]
    fn addition_with_infinite_operand_is_infinite() {
        let (graph, ids) = graph_with(&[("a", &[3.0, 1.0])]);
        let a = graph.vertex_cost(ids[0]).clone();
        let inf = CostVector::infinite(2);
        let summed = a.add(&inf, &graph);
        assert!(summed.is_infinite());
        assert!(summed.includes().is_empty());
    }

    #[test]
    fn division_preserves_provenance() {
        let mut ids = BTreeSet::new();
        ids.insert(VertexId(5));
        let a = CostVector::new(vec![4.0, 2.0], ids);
        let halved = &a / 2.0;
        assert_eq!(halved.values(), &[2.0, 1.0]);
        assert_eq!(halved.includes(), a.includes());
    }

    #[test]
    fn equal_values_with_different_provenance_are_still_eq() {
        let a = CostVector::new(vec![1.0, 1.0], BTreeSet::new());
        let mut ids = BTreeSet::new();
        ids.insert(VertexId(1));
        ids.insert(VertexId(2));
        let b = CostVector::new(vec![1.0, 1.0], ids);
        assert_eq!(a, b);
    }
}
