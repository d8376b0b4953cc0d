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

//! Produces the elimination order MBE walks in reverse (§4.D). Only the
//! decreasing-degree heuristic and a user-supplied permutation are
//! implemented; a min-fill ordering is not, since nothing upstream ever
//! exercises it.

use crate::error::{Error, Result};
use crate::graph::{Graph, VertexId};

#[derive(Debug, Clone)]
pub enum OrderingStrategy {
    /// Sort vertices by decreasing neighbor count. The default.
    MinNeighbors,
    /// A user-supplied permutation, given as the original textual vertex
    /// ids, one per vertex.
    Custom(Vec<String>),
}

impl Default for OrderingStrategy {
    fn default() -> Self {
        OrderingStrategy::MinNeighbors
    }
}

/// Builds the forward elimination order for `graph` under `strategy`. MBE
/// eliminates in the *reverse* of this order (§4.D): the last vertex here is
/// eliminated first.
pub fn build(graph: &Graph, strategy: &OrderingStrategy) -> Result<Vec<VertexId>> {
    match strategy {
        OrderingStrategy::MinNeighbors => {
            let mut ids: Vec<VertexId> = graph.ids().collect();
            ids.sort_by_key(|&id| std::cmp::Reverse(graph.neighbors(id).len()));
            Ok(ids)
        }
        OrderingStrategy::Custom(names) => {
            if names.len() != graph.len() {
                return Err(Error::ConfigInvalid(format!(
                    "custom ordering names {} vertices but the graph has {}",
                    names.len(),
                    graph.len()
                )));
            }
            let mut ids = Vec::with_capacity(names.len());
            for name in names {
                let id = graph.id_of(name).ok_or_else(|| {
                    Error::ConfigInvalid(format!("ordering references unknown vertex '{name}'"))
                })?;
                ids.push(id);
            }
            Ok(ids)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Graph {
        let mut g = Graph::new(1);
        let a = g.add_vertex("a", vec![1.0]).unwrap();
        let b = g.add_vertex("b", vec![1.0]).unwrap();
        let c = g.add_vertex("c", vec![1.0]).unwrap();
        g.add_edge(a, b);
        g.add_edge(b, c);
        g
    }

    #[test]
    fn min_neighbors_sorts_by_decreasing_degree() {
        let g = triangle();
        let order = build(&g, &OrderingStrategy::MinNeighbors).unwrap();
        // b has degree 2, a and c have degree 1.
        assert_eq!(order[0], g.id_of("b").unwrap());
    }

    #[test]
    fn custom_ordering_rejects_unknown_vertex() {
        let g = triangle();
        let strategy = OrderingStrategy::Custom(vec!["a".into(), "b".into(), "zzz".into()]);
        assert!(matches!(
            build(&g, &strategy),
            Err(Error::ConfigInvalid(_))
        ));
    }

    #[test]
    fn custom_ordering_rejects_wrong_length() {
        let g = triangle();
        let strategy = OrderingStrategy::Custom(vec!["a".into(), "b".into()]);
        assert!(matches!(
            build(&g, &strategy),
            Err(Error::ConfigInvalid(_))
        ));
    }
}
