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

//! Vertices and the undirected graph container, plus the instance-file
//! parser (§6). A vertex is identified with a small integer `VertexId`
//! rather than by its textual id, so that provenance sets inside
//! `CostVector` stay cheap `Copy` keys instead of cloned strings.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use fxhash::FxHashMap;

use crate::cost::CostVector;
use crate::error::{Error, Result};

/// Identifies a vertex by its position in `Graph::vertices`. Cheap to copy,
/// hash, and order — used directly as provenance inside `CostVector` and as
/// the index type for `CostTable` scopes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct VertexId(pub usize);

impl VertexId {
    #[inline]
    pub fn id(self) -> usize {
        self.0
    }
}

/// A single vertex: its original textual id, its (possibly `split`-scaled)
/// cost vector, and the set of its neighbors.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub name: String,
    cost: CostVector,
    neighbors: BTreeSet<VertexId>,
}

impl Vertex {
    /// Rescales this vertex's cost in place by dividing it by `pieces`, the
    /// number of mini-buckets its bucket was partitioned into. Invoked at
    /// most once per vertex per MBE build (§3 invariant 4) so that a
    /// vertex's weight is not inflated when its contribution is summed
    /// once per mini-bucket downstream.
    pub fn split(&mut self, pieces: usize) {
        debug_assert!(pieces > 0);
        self.cost = &self.cost / pieces as f64;
    }

    pub fn cost(&self) -> &CostVector {
        &self.cost
    }

    pub fn neighbors(&self) -> &BTreeSet<VertexId> {
        &self.neighbors
    }
}

/// An id-keyed undirected graph. Per §3, the engine keeps two independent
/// `Graph` instances built from the same instance file: an `original`
/// (never mutated, used to check full-assignment feasibility) and a
/// `working` copy whose vertex costs `split` scales down during MBE
/// construction.
#[derive(Debug, Clone)]
pub struct Graph {
    dimensions: usize,
    vertices: Vec<Vertex>,
    by_name: FxHashMap<String, VertexId>,
}

impl Graph {
    pub fn new(dimensions: usize) -> Self {
        Graph {
            dimensions,
            vertices: Vec::new(),
            by_name: FxHashMap::default(),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Adds a vertex if its name hasn't been seen before (duplicate `n`
    /// lines are idempotent, per §4.C), returning its id either way.
    pub fn add_vertex(&mut self, name: &str, cost: Vec<f64>) -> Result<VertexId> {
        if let Some(&id) = self.by_name.get(name) {
            if self.vertices[id.0].cost.dimensions() != cost.len() {
                return Err(Error::InstanceParse {
                    line: 0,
                    message: format!("vertex {name} redeclared with a different dimension"),
                });
            }
            return Ok(id);
        }
        if cost.len() != self.dimensions {
            return Err(Error::InstanceParse {
                line: 0,
                message: format!(
                    "vertex {name} has {} cost components, expected {}",
                    cost.len(),
                    self.dimensions
                ),
            });
        }
        let id = VertexId(self.vertices.len());
        self.vertices.push(Vertex {
            name: name.to_string(),
            cost: CostVector::new(cost, BTreeSet::from([id])),
            neighbors: BTreeSet::new(),
        });
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn add_edge(&mut self, a: VertexId, b: VertexId) {
        self.vertices[a.0].neighbors.insert(b);
        self.vertices[b.0].neighbors.insert(a);
    }

    pub fn id_of(&self, name: &str) -> Option<VertexId> {
        self.by_name.get(name).copied()
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }

    pub fn vertex_cost(&self, id: VertexId) -> &CostVector {
        &self.vertices[id.0].cost
    }

    pub fn neighbors(&self, id: VertexId) -> &BTreeSet<VertexId> {
        &self.vertices[id.0].neighbors
    }

    pub fn split(&mut self, id: VertexId, pieces: usize) {
        self.vertices[id.0].split(pieces);
    }

    pub fn ids(&self) -> impl Iterator<Item = VertexId> {
        (0..self.vertices.len()).map(VertexId)
    }
}

/// Parses an instance file per §6's line-oriented grammar and returns the
/// `(working, original)` pair described in §3: two structurally identical
/// graphs (same `VertexId` assignment, since both are populated from the
/// same stream of `n`/`e` records) that the engine will subsequently
/// diverge by mutating only the working copy's vertex costs via `split`.
pub fn parse_instance<P: AsRef<Path>>(path: P) -> Result<(Graph, Graph)> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut working: Option<Graph> = None;
    let mut original: Option<Graph> = None;

    for (line_no, line) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.split_whitespace();
        let record = parts.next().unwrap_or("");

        match record {
            "n" => {
                let name = parts.next().ok_or_else(|| Error::InstanceParse {
                    line: line_no,
                    message: "missing vertex id in 'n' record".to_string(),
                })?;
                let cost: Vec<f64> = parts
                    .map(|tok| {
                        tok.parse::<f64>().map_err(|_| Error::InstanceParse {
                            line: line_no,
                            message: format!("'{tok}' is not a valid cost component"),
                        })
                    })
                    .collect::<Result<_>>()?;
                if cost.iter().any(|v| *v < 0.0) {
                    return Err(Error::InstanceParse {
                        line: line_no,
                        message: "vertex costs must be non-negative".to_string(),
                    });
                }
                let dims = cost.len();
                let working = working.get_or_insert_with(|| Graph::new(dims));
                let original = original.get_or_insert_with(|| Graph::new(dims));
                working
                    .add_vertex(name, cost.clone())
                    .map_err(|e| reline(e, line_no))?;
                original
                    .add_vertex(name, cost)
                    .map_err(|e| reline(e, line_no))?;
            }
            "e" => {
                let a = parts.next().ok_or_else(|| Error::InstanceParse {
                    line: line_no,
                    message: "missing first endpoint in 'e' record".to_string(),
                })?;
                let b = parts.next().ok_or_else(|| Error::InstanceParse {
                    line: line_no,
                    message: "missing second endpoint in 'e' record".to_string(),
                })?;
                let (working, original) = match (working.as_mut(), original.as_mut()) {
                    (Some(w), Some(o)) => (w, o),
                    _ => {
                        return Err(Error::InstanceParse {
                            line: line_no,
                            message: "edge declared before any vertex".to_string(),
                        })
                    }
                };
                let wa = working.id_of(a).ok_or_else(|| Error::InstanceParse {
                    line: line_no,
                    message: format!("edge references undeclared vertex '{a}'"),
                })?;
                let wb = working.id_of(b).ok_or_else(|| Error::InstanceParse {
                    line: line_no,
                    message: format!("edge references undeclared vertex '{b}'"),
                })?;
                working.add_edge(wa, wb);
                original.add_edge(wa, wb);
            }
            "g" => {
                // optional summary record; readers may ignore it.
            }
            other => {
                return Err(Error::InstanceParse {
                    line: line_no,
                    message: format!("unknown record kind '{other}'"),
                });
            }
        }
    }

    let working = working.ok_or_else(|| Error::InstanceParse {
        line: 0,
        message: "instance file declares no vertices".to_string(),
    })?;
    let original = original.ok_or_else(|| Error::InstanceParse {
        line: 0,
        message: "instance file declares no vertices".to_string(),
    })?;
    Ok((working, original))
}

fn reline(err: Error, line: usize) -> Error {
    match err {
        Error::InstanceParse { message, .. } => Error::InstanceParse { line, message },
        other => other,
    }
}
