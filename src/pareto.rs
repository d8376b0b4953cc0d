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

//! `ParetoSet`, an unordered collection of non-dominated `CostVector`s (§3,
//! §4.B). Two additive operations are kept distinct on purpose: `add` is the
//! unfiltered Minkowski sum used while tables are still being accumulated,
//! `union` is the dominance-filtered union used at eliminations and at the
//! final incumbent update. Merging them into a single method with a flag
//! would hide a real performance contract: filtering on every intermediate
//! sum is wasteful when a table addition chains many terms together.

use crate::cost::CostVector;
use crate::graph::Graph;

/// A dominance-free (when constructed via `union`/`singleton`) set of cost
/// vectors.
#[derive(Debug, Clone, Default)]
pub struct ParetoSet {
    points: Vec<CostVector>,
}

impl ParetoSet {
    pub fn empty() -> Self {
        ParetoSet { points: Vec::new() }
    }

    pub fn singleton(point: CostVector) -> Self {
        ParetoSet {
            points: vec![point],
        }
    }

    pub fn points(&self) -> &[CostVector] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when every point in this set is the all-infinite vector, i.e.
    /// the set describes an infeasible partial assignment. An empty set is
    /// not considered infinite (there is nothing to be infeasible about).
    pub fn is_all_infinite(&self) -> bool {
        !self.points.is_empty() && self.points.iter().all(CostVector::is_infinite)
    }

    /// Minkowski sum `{ p + q : p in self, q in other }`. Does not filter
    /// dominated points — the caller decides when filtering is worth the
    /// cost (§4.B).
    pub fn add(&self, other: &ParetoSet, graph: &Graph) -> ParetoSet {
        let mut points = Vec::with_capacity(self.points.len() * other.points.len().max(1));
        for p in &self.points {
            for q in &other.points {
                points.push(p.add(q, graph));
            }
        }
        if points.is_empty() {
            points = self.points.clone();
            points.extend(other.points.iter().cloned());
        }
        ParetoSet { points }
    }

    /// Dominance-filtered union: every point from both sets, with every
    /// point strictly dominated by another removed. On ties (equal
    /// vectors) exactly one representative survives, chosen deterministically
    /// regardless of input order (§4.B, §9).
    pub fn union(&self, other: &ParetoSet) -> ParetoSet {
        let mut points = self.points.clone();
        points.extend(other.points.iter().cloned());
        ParetoSet {
            points: remove_dominated(points),
        }
    }

    /// The conservative "all versus all" order used only by B&B pruning
    /// (§3): `self <= other` iff every point of `self` is componentwise
    /// `<=` every point of `other`. Vacuously true if either set is empty.
    pub fn le(&self, other: &ParetoSet) -> bool {
        self.points
            .iter()
            .all(|p| other.points.iter().all(|q| p.le(q)))
    }

    /// Strict version of `le`: `le` holds and the two sets are not the same
    /// collection of points.
    pub fn lt(&self, other: &ParetoSet) -> bool {
        self.le(other) && !self.set_eq(other)
    }

    fn set_eq(&self, other: &ParetoSet) -> bool {
        if self.points.len() != other.points.len() {
            return false;
        }
        self.points
            .iter()
            .all(|p| other.points.iter().any(|q| p == q))
    }
}

/// Two-pass dominance sweep (§4.B, §9): pass one marks every point that is
/// strictly dominated by some other point, pass two retains the rest. Never
/// mutates the vector while scanning it, so there is no risk of a
/// concurrent-modification bug masking a dominated point that should have
/// been removed.
///
/// Points are sorted first (by value, then by provenance) so that which
/// representative of a tie survives does not depend on the order `points`
/// arrived in — only on the vectors' own content.
fn remove_dominated(mut points: Vec<CostVector>) -> Vec<CostVector> {
    points.sort_by(|a, b| {
        a.values()
            .iter()
            .map(|v| v.to_bits())
            .collect::<Vec<_>>()
            .cmp(&b.values().iter().map(|v| v.to_bits()).collect::<Vec<_>>())
            .then_with(|| a.includes().cmp(b.includes()))
    });

    let n = points.len();
    let mut dominated = vec![false; n];
    for i in 0..n {
        if dominated[i] {
            continue;
        }
        for j in (i + 1)..n {
            if dominated[j] {
                continue;
            }
            if points[i] == points[j] {
                // Tie: keep the earlier (lower sort key) representative.
                dominated[j] = true;
            } else if points[i].dominates(&points[j]) {
                dominated[j] = true;
            } else if points[j].dominates(&points[i]) {
                dominated[i] = true;
                break;
            }
        }
    }

    points
        .into_iter()
        .zip(dominated)
        .filter_map(|(p, d)| if d { None } else { Some(p) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Graph, VertexId};
    use std::collections::BTreeSet;

    fn graph_with(costs: &[(&str, &[f64])]) -> Graph {
        let mut g = Graph::new(costs[0].1.len());
        for (name, cost) in costs {
            g.add_vertex(name, cost.to_vec()).unwrap();
        }
        g
    }

    fn vec_of(values: &[f64], ids: &[usize]) -> CostVector {
        CostVector::new(values.to_vec(), ids.iter().copied().map(VertexId).collect())
    }

    #[test]
    fn union_removes_dominated_points() {
        let a = ParetoSet::singleton(vec_of(&[1.0, 5.0], &[]));
        let b = ParetoSet::singleton(vec_of(&[2.0, 6.0], &[]));
        let u = a.union(&b);
        assert_eq!(u.len(), 1);
        assert_eq!(u.points()[0].values(), &[1.0, 5.0]);
    }

    #[test]
    fn union_keeps_incomparable_points() {
        let a = ParetoSet::singleton(vec_of(&[1.0, 5.0], &[]));
        let b = ParetoSet::singleton(vec_of(&[5.0, 1.0], &[]));
        let u = a.union(&b);
        assert_eq!(u.len(), 2);
    }

    #[test]
    fn union_keeps_exactly_one_of_equal_points() {
        let a = ParetoSet::singleton(vec_of(&[1.0, 1.0], &[1]));
        let b = ParetoSet::singleton(vec_of(&[1.0, 1.0], &[2]));
        let u = a.union(&b);
        assert_eq!(u.len(), 1);
    }

    #[test]
    fn add_is_unfiltered_minkowski_sum() {
        let g = graph_with(&[("a", &[1.0]), ("b", &[2.0])]);
        let a_id = g.id_of("a").unwrap();
        let b_id = g.id_of("b").unwrap();
        let a = ParetoSet::singleton(CostVector::new(vec![1.0], BTreeSet::from([a_id])));
        let b = ParetoSet::singleton(CostVector::new(vec![2.0], BTreeSet::from([b_id])));
        let summed = a.add(&b, &g);
        assert_eq!(summed.len(), 1);
        assert_eq!(summed.points()[0].values(), &[3.0]);
    }

    #[test]
    fn all_versus_all_order_is_conservative() {
        let a = ParetoSet::singleton(vec_of(&[1.0, 1.0], &[]));
        let b = ParetoSet::singleton(vec_of(&[2.0, 2.0], &[]));
        assert!(a.lt(&b));
        assert!(!b.lt(&a));

        let mixed = {
            let mut p = a.clone();
            p.points.push(vec_of(&[3.0, 0.0], &[]));
            p
        };
        // mixed contains a point (3,0) that is NOT <= every point of b, so
        // the all-versus-all order must not hold in either direction.
        assert!(!mixed.le(&b));
        assert!(!b.le(&mixed));
    }

    #[test]
    fn is_all_infinite_detects_infeasibility() {
        let inf = ParetoSet::singleton(CostVector::infinite(2));
        assert!(inf.is_all_infinite());
        let feasible = ParetoSet::singleton(vec_of(&[0.0, 0.0], &[]));
        assert!(!feasible.is_all_infinite());
        assert!(!ParetoSet::empty().is_all_infinite());
    }
}
