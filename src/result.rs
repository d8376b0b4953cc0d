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

//! The JSON shape a solve produces (§6): a Pareto front of numeric vectors,
//! a human-readable rendering of that front, and the wall-clock time the
//! search took.

use std::time::Duration;

use serde::Serialize;

use crate::pareto::ParetoSet;

#[derive(Debug, Serialize)]
pub struct SolveResult {
    pub pareto_front: Vec<Vec<f64>>,
    pub data: String,
    pub time: f64,
}

impl SolveResult {
    pub fn new(front: &ParetoSet, elapsed: Duration) -> Self {
        let pareto_front: Vec<Vec<f64>> = front
            .points()
            .iter()
            .map(|p| p.values().to_vec())
            .collect();
        let data = render(&pareto_front);
        SolveResult {
            pareto_front,
            data,
            time: elapsed.as_secs_f64(),
        }
    }
}

fn render(points: &[Vec<f64>]) -> String {
    let rendered: Vec<String> = points
        .iter()
        .map(|p| {
            let joined = p
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("({joined})")
        })
        .collect();
    format!("{{{}}}", rendered.join(", "))
}
