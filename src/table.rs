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

//! `CostTable`: a mapping from a subset-mask over an ordered scope of
//! vertices to a `ParetoSet` (§3, §4.E). Per the re-architecture in §9's
//! DESIGN NOTES, the body is a dense `Vec<ParetoSet>` indexed by the
//! integer key directly rather than a map keyed by a mix of sentinels and
//! integers.

use crate::cost::CostVector;
use crate::error::{Error, Result};
use crate::graph::{Graph, VertexId};
use crate::pareto::ParetoSet;

/// A cost function over a bounded scope of vertices. Bit `i` of a body key
/// encodes whether `scope[i]` is included in the cover (§3). `from` is set
/// only on tables produced by `eliminate`, naming the vertex that was
/// marginalized out.
#[derive(Debug, Clone)]
pub struct CostTable {
    pub scope: Vec<VertexId>,
    pub from: Option<VertexId>,
    pub body: Vec<ParetoSet>,
}

impl CostTable {
    /// Builds a fresh table over `scope` whose entry at key `k` is the
    /// singleton set `{ sum of cost(v) for v in scope where bit set }`
    /// (§4.E `create`).
    pub fn create(scope: Vec<VertexId>, graph: &Graph) -> CostTable {
        let dims = graph.dimensions();
        let size = 1usize << scope.len();
        let mut body = Vec::with_capacity(size);
        for key in 0..size {
            let parts = scope
                .iter()
                .enumerate()
                .filter(|(i, _)| key & (1 << i) != 0)
                .map(|(_, &v)| (v, graph.vertex_cost(v)));
            body.push(ParetoSet::singleton(CostVector::sum_vertices(dims, parts)));
        }
        CostTable {
            scope,
            from: None,
            body,
        }
    }

    /// The elementary edge constraint between `u` and `v` (§3): both
    /// uncovered is infeasible, otherwise the cost is whichever endpoints
    /// are included.
    pub fn elementary(u: VertexId, v: VertexId, graph: &Graph) -> CostTable {
        let mut table = CostTable::create(vec![u, v], graph);
        table.body[0] = ParetoSet::singleton(CostVector::infinite(graph.dimensions()));
        table
    }

    /// In-place Minkowski merge (§4.E `add`): every entry of `small` is
    /// added (unfiltered) into every entry of `self` whose key agrees with
    /// `small`'s key on the positions the two scopes share. `small.scope`
    /// must be a subset of `self.scope`.
    pub fn add(&mut self, small: &CostTable, graph: &Graph) {
        for (small_key, small_set) in small.body.iter().enumerate() {
            let (index, mask) = index_mask(&small.scope, &self.scope, small_key);
            for big_key in 0..self.body.len() {
                if big_key & mask == index {
                    self.body[big_key] = self.body[big_key].add(small_set, graph);
                }
            }
        }
    }

    /// Eliminates `x` from `self`'s scope (§4.E `eliminate`): for every
    /// reduced key, the dominance-filtered union over every full key that
    /// agrees with it on the surviving positions — min-marginalization in
    /// the Pareto lattice.
    pub fn eliminate(&self, x: VertexId) -> Result<CostTable> {
        if self.scope.len() <= 1 {
            return Err(Error::EliminateSingleton);
        }
        let reduced_scope: Vec<VertexId> =
            self.scope.iter().copied().filter(|&v| v != x).collect();
        let mut body = vec![ParetoSet::empty(); 1usize << reduced_scope.len()];
        for (h, slot) in body.iter_mut().enumerate() {
            let (index, mask) = index_mask(&reduced_scope, &self.scope, h);
            let mut acc: Option<ParetoSet> = None;
            for (f, full_set) in self.body.iter().enumerate() {
                if f & mask == index {
                    acc = Some(match acc {
                        None => full_set.clone(),
                        Some(a) => a.union(full_set),
                    });
                }
            }
            *slot = acc.expect("every reduced key has at least one agreeing full key");
        }
        Ok(CostTable {
            scope: reduced_scope,
            from: Some(x),
            body,
        })
    }
}

/// For a key expressed against `old_scope`, returns the `(index, mask)`
/// pair such that, for any key `k` expressed against `new_scope`,
/// `k & mask == index` holds exactly when `k` agrees with the original key
/// on every position the two scopes share (§4.E, §9: "dynamic table
/// keying"). `old_scope` must be a subset of `new_scope`.
fn index_mask(old_scope: &[VertexId], new_scope: &[VertexId], key: usize) -> (usize, usize) {
    let mut index = 0usize;
    let mut mask = 0usize;
    for (old_pos, &v) in old_scope.iter().enumerate() {
        let is_set = key & (1 << old_pos) != 0;
        let new_pos = new_scope
            .iter()
            .position(|&w| w == v)
            .expect("old_scope must be a subset of new_scope");
        mask |= 1 << new_pos;
        if is_set {
            index |= 1 << new_pos;
        }
    }
    (index, mask)
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
    fn elementary_edge_constraint_matches_spec_table() {
        let (g, ids) = graph_with(&[("u", &[2.0]), ("v", &[3.0])]);
        let table = CostTable::elementary(ids[0], ids[1], &g);
        assert!(table.body[0].points()[0].is_infinite());
        assert_eq!(table.body[1].points()[0].values(), &[2.0]);
        assert_eq!(table.body[2].points()[0].values(), &[3.0]);
        assert_eq!(table.body[3].points()[0].values(), &[5.0]);
    }

    #[test]
    fn add_merges_small_scope_into_big_scope() {
        let (g, ids) = graph_with(&[("a", &[1.0]), ("b", &[2.0]), ("c", &[4.0])]);
        let mut big = CostTable::create(vec![ids[0], ids[1], ids[2]], &g);
        let small = CostTable::elementary(ids[0], ids[1], &g);
        big.add(&small, &g);
        // key 0b000: a,b both excluded -> small contributes infinite.
        assert!(big.body[0].points()[0].is_infinite());
        // key 0b001 (a included only): small's matching entry already has
        // the same provenance {a}, so the provenance-union add is
        // idempotent rather than double-counting a's cost.
        assert_eq!(big.body[1].points()[0].values(), &[1.0]);
        // key 0b011 (a and b both included): same idempotence, now over {a,b}.
        assert_eq!(big.body[3].points()[0].values(), &[3.0]);
    }

    #[test]
    fn eliminate_reduces_scope_and_drops_dominated_entries() {
        let (g, ids) = graph_with(&[("a", &[1.0]), ("b", &[2.0])]);
        let table = CostTable::elementary(ids[0], ids[1], &g);
        let reduced = table.eliminate(ids[0]).unwrap();
        assert_eq!(reduced.scope, vec![ids[1]]);
        assert_eq!(reduced.from, Some(ids[0]));
        // key 0 (b excluded): join over full keys with b's bit == 0 -> {00: inf, 01 (a=1,b=0): a.cost}
        // the infinite point is dominated by a.cost, so only a.cost survives.
        assert_eq!(reduced.body[0].len(), 1);
        assert_eq!(reduced.body[0].points()[0].values(), &[1.0]);
    }

    #[test]
    fn eliminate_singleton_scope_is_an_error() {
        let (g, ids) = graph_with(&[("a", &[1.0])]);
        let table = CostTable::create(vec![ids[0]], &g);
        assert!(matches!(
            table.eliminate(ids[0]),
            Err(Error::EliminateSingleton)
        ));
    }
}
