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

//! # mbecover
//!
//! A Mini-Bucket Elimination (MBE) heuristic engine paired with a
//! branch-and-bound (B&B) Pareto search for multi-objective minimum-weight
//! vertex cover.
//!
//! Given an undirected graph whose vertices carry vector-valued costs, this
//! crate searches for the Pareto front of vertex covers minimizing the
//! vector sum of included vertex costs. `mbe::Engine` compiles a
//! width-bounded chain of mini-buckets along a variable elimination order
//! (`ordering`), producing monotone lower bounds that `bnb::BranchAndBound`
//! uses to prune a depth-first search over the 0/1 assignment tree.
//!
//! ## Quick example
//!
//! ```
//! use mbecover::bnb::{BranchAndBound, NoCutoff};
//! use mbecover::graph::Graph;
//! use mbecover::mbe::Engine;
//! use mbecover::ordering::{self, OrderingStrategy};
//!
//! let mut working = Graph::new(1);
//! let mut original = Graph::new(1);
//! for g in [&mut working, &mut original] {
//!     g.add_vertex("a", vec![1.0]).unwrap();
//!     g.add_vertex("b", vec![1.0]).unwrap();
//!     g.add_vertex("c", vec![1.0]).unwrap();
//! }
//! let (a, b, c) = (
//!     working.id_of("a").unwrap(),
//!     working.id_of("b").unwrap(),
//!     working.id_of("c").unwrap(),
//! );
//! working.add_edge(a, b);
//! working.add_edge(b, c);
//! original.add_edge(a, b);
//! original.add_edge(b, c);
//!
//! let order = ordering::build(&working, &OrderingStrategy::MinNeighbors).unwrap();
//! let engine = Engine::build(working, original, order, 2, 1024).unwrap();
//!
//! let cutoff = NoCutoff;
//! let front = BranchAndBound::new(&engine, &cutoff).run();
//! assert_eq!(front.points()[0].values(), &[1.0]);
//! ```

pub mod bnb;
pub mod config;
pub mod cost;
pub mod error;
pub mod graph;
pub mod mbe;
pub mod ordering;
pub mod pareto;
pub mod result;
pub mod table;

pub use error::{Error, Result};
