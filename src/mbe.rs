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

//! The Mini-Bucket Elimination engine (§4.F), the largest component of this
//! crate. `Engine::build` compiles a graph and elimination order into a
//! chain of per-vertex buckets; `compute_cost` and `get_best_next` are the
//! two query entry points branch-and-bound and the (external) genetic
//! solver use to read heuristic lower bounds back out of that chain.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::num::NonZeroUsize;

use fxhash::FxHashMap;
use lru::LruCache;

use crate::cost::CostVector;
use crate::error::Result;
use crate::graph::{Graph, VertexId};
use crate::pareto::ParetoSet;
use crate::table::CostTable;

/// Per-vertex record holding the cost tables whose earliest surviving
/// member (under the elimination order) is this vertex (§3).
#[derive(Debug, Clone, Default)]
pub struct Bucket {
    pub costs: Vec<CostTable>,
    pub heuristics: Vec<CostTable>,
}

impl Bucket {
    fn dependencies(&self) -> Vec<CostTable> {
        self.costs
            .iter()
            .cloned()
            .chain(self.heuristics.iter().cloned())
            .collect()
    }
}

/// The compiled mini-bucket chain for one graph, ordering, and width bound.
/// Holds both graphs described in §3: `original` (read-only, used by full
/// assignment evaluation) and `working` (vertex costs scaled by `split`
/// during construction).
pub struct Engine {
    order: Vec<VertexId>,
    reverse_order: Vec<VertexId>,
    position: FxHashMap<VertexId, usize>,
    max_variables: usize,
    dimensions: usize,
    working: Graph,
    original: Graph,
    buckets: FxHashMap<VertexId, Bucket>,
    cost_cache: RefCell<LruCache<Vec<u8>, (ParetoSet, Option<u8>)>>,
    next_cache: RefCell<LruCache<Vec<u8>, u8>>,
}

impl Engine {
    /// Compiles buckets for `graph` under `order`, bounding every
    /// intermediate table to `max_variables` scope variables (§4.F).
    /// `cache_capacity` bounds the LRU memoization caches used by
    /// `compute_cost`/`get_best_next` (§5, §9).
    pub fn build(
        working: Graph,
        original: Graph,
        order: Vec<VertexId>,
        max_variables: usize,
        cache_capacity: usize,
    ) -> Result<Engine> {
        let dimensions = working.dimensions();
        let position: FxHashMap<VertexId, usize> =
            order.iter().enumerate().map(|(i, &v)| (v, i)).collect();
        let reverse_order: Vec<VertexId> = order.iter().rev().copied().collect();
        let buckets: FxHashMap<VertexId, Bucket> =
            order.iter().map(|&v| (v, Bucket::default())).collect();

        let cap = NonZeroUsize::new(cache_capacity.max(1)).unwrap();
        let mut engine = Engine {
            order,
            reverse_order,
            position,
            max_variables,
            dimensions,
            working,
            original,
            buckets,
            cost_cache: RefCell::new(LruCache::new(cap)),
            next_cache: RefCell::new(LruCache::new(cap)),
        };
        engine.compute_buckets();
        engine.compute_heuristics()?;
        Ok(engine)
    }

    pub fn order(&self) -> &[VertexId] {
        &self.order
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// The largest scope size among every table built during construction.
    /// Used by tests to assert the width bound (§8, property 6).
    pub fn max_table_width(&self) -> usize {
        self.buckets
            .values()
            .flat_map(|b| b.costs.iter().chain(b.heuristics.iter()))
            .map(|t| t.scope.len())
            .max()
            .unwrap_or(0)
    }

    /// One pass over the reverse elimination order: every edge becomes an
    /// elementary cost table attached to the bucket of whichever endpoint
    /// comes later in the reverse order (§4.F `compute_buckets`, invariant
    /// 1 in §3).
    fn compute_buckets(&mut self) {
        let mut processed: BTreeSet<VertexId> = BTreeSet::new();
        for &node in &self.reverse_order {
            let unprocessed_neighbors: Vec<VertexId> = self
                .working
                .neighbors(node)
                .iter()
                .copied()
                .filter(|n| !processed.contains(n))
                .collect();
            for neighbor in unprocessed_neighbors {
                let table = CostTable::elementary(node, neighbor, &self.working);
                self.buckets.get_mut(&node).unwrap().costs.push(table);
            }
            processed.insert(node);
        }
    }

    /// Second pass: for each vertex in reverse order, partition its
    /// dependencies into width-bounded mini-buckets, eliminate the vertex
    /// out of each, and deposit the reduced heuristic tables downstream
    /// (§4.F `compute_heuristics`).
    fn compute_heuristics(&mut self) -> Result<()> {
        let reverse_order = self.reverse_order.clone();
        for (node_count, &x) in reverse_order.iter().enumerate() {
            let dependencies = self.buckets[&x].dependencies();
            if dependencies.is_empty() {
                // An isolated vertex (no edges, no inherited heuristics) has
                // nothing to eliminate into; splitting by zero would be
                // meaningless, so it is skipped entirely (§3, "Disconnected
                // pair" scenario in §8).
                continue;
            }

            let minibuckets = partition_into_minibuckets(dependencies, self.max_variables);
            self.working.split(x, minibuckets.len());

            let mut ordered: Vec<(usize, Vec<CostTable>)> = minibuckets
                .into_iter()
                .filter_map(|members| {
                    let union_scope: BTreeSet<VertexId> = members
                        .iter()
                        .flat_map(|t| t.scope.iter().copied())
                        .collect();
                    let offset = reverse_order[node_count + 1..]
                        .iter()
                        .position(|v| union_scope.contains(v));
                    offset.map(|o| (o, members))
                })
                .collect();
            ordered.sort_by_key(|(offset, _)| *offset);

            for (offset, members) in ordered {
                let mut union_scope: Vec<VertexId> = members
                    .iter()
                    .flat_map(|t| t.scope.iter().copied())
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect();
                if union_scope.len() <= 1 {
                    // Degenerate minibucket carrying only x itself: nothing
                    // to eliminate into, so there is no new heuristic to
                    // deposit (§4.E edge case).
                    continue;
                }
                union_scope.sort_by_key(|v| self.position[v]);

                let mut full_table = CostTable::create(union_scope, &self.working);
                for member in &members {
                    full_table.add(member, &self.working);
                }
                let reduced = full_table.eliminate(x)?;

                let target = reverse_order[node_count + 1 + offset];
                self.buckets.get_mut(&target).unwrap().heuristics.push(reduced);
            }
        }
        Ok(())
    }

    /// Evaluates `assignment`, a prefix of the forward order. A full-length
    /// assignment is checked exactly against the *original* graph; a
    /// shorter prefix returns a lower-bound `ParetoSet` together with a
    /// recommended value for the next variable (§4.F `compute_cost`).
    /// Memoized over the assignment (§5, §9).
    pub fn compute_cost(&self, assignment: &[u8]) -> (ParetoSet, Option<u8>) {
        if assignment.len() == self.order.len() {
            return (self.compute_cost_full(assignment), None);
        }
        if let Some(hit) = self.cost_cache.borrow_mut().get(assignment) {
            return hit.clone();
        }
        let result = self.compute_cost_partial(assignment);
        self.cost_cache
            .borrow_mut()
            .put(assignment.to_vec(), result.clone());
        result
    }

    fn compute_cost_full(&self, assignment: &[u8]) -> ParetoSet {
        let n = self.order.len();
        debug_assert_eq!(assignment.len(), n);

        for i in 0..n {
            if assignment[i] != 0 {
                continue;
            }
            for j in (i + 1)..n {
                if assignment[j] == 0
                    && self
                        .original
                        .neighbors(self.order[i])
                        .contains(&self.order[j])
                {
                    return ParetoSet::singleton(CostVector::infinite(self.dimensions));
                }
            }
        }

        let included = (0..n).filter(|&i| assignment[i] != 0).map(|i| self.order[i]);
        let parts = included.map(|id| (id, self.original.vertex_cost(id)));
        ParetoSet::singleton(CostVector::sum_vertices(self.dimensions, parts))
    }

    fn compute_cost_partial(&self, assignment: &[u8]) -> (ParetoSet, Option<u8>) {
        let l = assignment.len();
        let full_set: BTreeSet<VertexId> = self.order[0..=l].iter().copied().collect();

        let mut possible = ParetoSet::empty();
        for v in 0u8..=1 {
            let mut extended = assignment.to_vec();
            extended.push(v);
            let contribution = self.sum_bucket_range(&extended, &full_set);
            possible = if possible.is_empty() {
                contribution
            } else {
                possible.union(&contribution)
            };
        }

        let next_node = self.order[l];
        let recommend = if possible
            .points()
            .iter()
            .any(|p| p.includes().contains(&next_node))
        {
            1
        } else {
            0
        };
        (possible, Some(recommend))
    }

    /// Sums, for each vertex at position `0..assignment.len()`, every cost
    /// table in its bucket whose `from` tag (if any) is not itself among
    /// the positions in `full_set` — excluding those avoids double-counting
    /// a vertex whose own bucket contribution will also be summed here.
    fn sum_bucket_range(&self, assignment: &[u8], full_set: &BTreeSet<VertexId>) -> ParetoSet {
        let mut result: Option<ParetoSet> = None;
        'outer: for &node in &self.order[0..assignment.len()] {
            let bucket = &self.buckets[&node];
            for table in bucket.costs.iter().chain(bucket.heuristics.iter()) {
                if let Some(from) = table.from {
                    if full_set.contains(&from) {
                        continue;
                    }
                }
                let key = self.assignment_table_key(assignment, &table.scope);
                let contribution = &table.body[key];
                result = Some(match result.take() {
                    None => contribution.clone(),
                    Some(acc) => acc.add(contribution, &self.working),
                });
                if result.as_ref().unwrap().is_all_infinite() {
                    break 'outer;
                }
            }
        }
        result.unwrap_or_else(ParetoSet::empty)
    }

    fn assignment_table_key(&self, assignment: &[u8], scope: &[VertexId]) -> usize {
        let mut key = 0usize;
        for (i, &v) in scope.iter().enumerate() {
            let pos = self.position[&v];
            if pos < assignment.len() && assignment[pos] != 0 {
                key |= 1 << i;
            }
        }
        key
    }

    /// Independent next-value oracle (§4.F `get_best_next`): sums only the
    /// *current* bucket's contribution for each of the two extensions and
    /// majority-votes which value contributes more than half of the
    /// dominance-filtered union. Used by the (external) genetic solver, not
    /// by branch-and-bound.
    pub fn get_best_next(&self, assignment: &[u8]) -> Option<u8> {
        if assignment.len() == self.order.len() {
            return None;
        }
        if let Some(hit) = self.next_cache.borrow_mut().get(assignment) {
            return Some(*hit);
        }

        let l = assignment.len();
        let node = self.order[l];
        let bucket = &self.buckets[&node];

        let mut per_value = Vec::with_capacity(2);
        for v in 0u8..=1 {
            let mut extended = assignment.to_vec();
            extended.push(v);
            let mut result: Option<ParetoSet> = None;
            for table in bucket.costs.iter().chain(bucket.heuristics.iter()) {
                let key = self.assignment_table_key(&extended, &table.scope);
                let contribution = &table.body[key];
                result = Some(match result.take() {
                    None => contribution.clone(),
                    Some(acc) => acc.add(contribution, &self.working),
                });
            }
            per_value.push(result.unwrap_or_else(ParetoSet::empty));
        }

        let union = per_value[0].union(&per_value[1]);
        let total = union.len();
        let best = if total == 0 {
            0
        } else {
            let votes_for_one = union
                .points()
                .iter()
                .filter(|p| per_value[1].points().contains(p))
                .count();
            u8::from(votes_for_one * 2 > total)
        };
        self.next_cache.borrow_mut().put(assignment.to_vec(), best);
        Some(best)
    }
}

/// Partitions `tables` into width-`max_variables`-bounded groups (§4.F):
/// seed each group with the smallest-scope remaining table, then greedily
/// admit whichever remaining table shares the most variables with the
/// group per new variable introduced — a table contributing zero new
/// variables is always admitted regardless of the width budget.
fn partition_into_minibuckets(
    mut tables: Vec<CostTable>,
    max_variables: usize,
) -> Vec<Vec<CostTable>> {
    let mut minibuckets = Vec::new();
    while !tables.is_empty() {
        let seed_idx = tables
            .iter()
            .enumerate()
            .min_by_key(|(_, t)| t.scope.len())
            .map(|(i, _)| i)
            .unwrap();
        let seed = tables.remove(seed_idx);
        let mut variables: BTreeSet<VertexId> = seed.scope.iter().copied().collect();
        let mut minibucket = vec![seed];

        let mut remaining = max_variables as i64 - variables.len() as i64;
        while remaining >= 0 && !tables.is_empty() {
            match choose_next(&variables, &tables, remaining) {
                Some(idx) => {
                    let t = tables.remove(idx);
                    variables.extend(t.scope.iter().copied());
                    minibucket.push(t);
                    remaining = max_variables as i64 - variables.len() as i64;
                }
                None => break,
            }
        }
        minibuckets.push(minibucket);
    }
    minibuckets
}

fn choose_next(variables: &BTreeSet<VertexId>, candidates: &[CostTable], remaining: i64) -> Option<usize> {
    let mut best_idx = None;
    let mut best_ratio = f64::NEG_INFINITY;
    for (i, t) in candidates.iter().enumerate() {
        let scope_set: BTreeSet<VertexId> = t.scope.iter().copied().collect();
        let common = scope_set.intersection(variables).count();
        let new_vars = scope_set.difference(variables).count();
        if new_vars == 0 {
            return Some(i);
        }
        if new_vars as i64 > remaining {
            continue;
        }
        let ratio = common as f64 / new_vars as f64;
        if ratio > best_ratio {
            best_ratio = ratio;
            best_idx = Some(i);
        }
    }
    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::ordering::{self, OrderingStrategy};

    fn build_engine(
        edges: &[(&str, &str)],
        costs: &[(&str, f64)],
        max_variables: usize,
    ) -> Engine {
        let mut working = Graph::new(1);
        let mut original = Graph::new(1);
        for (name, cost) in costs {
            working.add_vertex(name, vec![*cost]).unwrap();
            original.add_vertex(name, vec![*cost]).unwrap();
        }
        for (a, b) in edges {
            let wa = working.id_of(a).unwrap();
            let wb = working.id_of(b).unwrap();
            working.add_edge(wa, wb);
            let oa = original.id_of(a).unwrap();
            let ob = original.id_of(b).unwrap();
            original.add_edge(oa, ob);
        }
        let order = ordering::build(&working, &OrderingStrategy::MinNeighbors).unwrap();
        Engine::build(working, original, order, max_variables, 1024).unwrap()
    }

    #[test]
    fn triangle_full_assignment_is_checked_against_original_graph() {
        let engine = build_engine(
            &[("a", "b"), ("b", "c"), ("a", "c")],
            &[("a", 1.0), ("b", 1.0), ("c", 1.0)],
            2,
        );
        let n = engine.order().len();
        assert_eq!(n, 3);

        // all-zero assignment leaves every edge uncovered -> infeasible.
        let (cost, next) = engine.compute_cost(&vec![0u8; n]);
        assert!(next.is_none());
        assert!(cost.is_all_infinite());
    }

    #[test]
    fn width_bound_is_respected() {
        let engine = build_engine(
            &[("a", "b"), ("b", "c"), ("a", "c")],
            &[("a", 1.0), ("b", 1.0), ("c", 1.0)],
            2,
        );
        assert!(engine.max_table_width() <= 2);
    }

    #[test]
    fn disconnected_pair_has_empty_cover_with_no_provenance() {
        let engine = build_engine(&[], &[("a", 5.0), ("b", 5.0)], 2);
        let n = engine.order().len();
        let (cost, _) = engine.compute_cost(&vec![0u8; n]);
        assert_eq!(cost.len(), 1);
        assert_eq!(cost.points()[0].values(), &[0.0]);
        assert!(cost.points()[0].includes().is_empty());
    }

    #[test]
    fn lower_bound_at_root_never_exceeds_leaf_cost() {
        let engine = build_engine(
            &[("a", "b"), ("b", "c"), ("c", "d")],
            &[("a", 1.0), ("b", 1.0), ("c", 1.0), ("d", 1.0)],
            2,
        );
        let n = engine.order().len();
        let (root_bound, _) = engine.compute_cost(&[]);
        let leaf_assignment = vec![1u8; n];
        let (leaf_cost, _) = engine.compute_cost(&leaf_assignment);
        // leaf is not dominated by the root lower bound in the strict
        // all-versus-all order (the bound must not be worse than reality).
        assert!(!leaf_cost.lt(&root_bound));
    }
}
