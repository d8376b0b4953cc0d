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

//! Engine configuration (§6) and the instance-filename convention helper
//! used to default the number of cost dimensions when it is not passed
//! explicitly on the command line.

use regex::Regex;

use crate::error::{Error, Result};
use crate::ordering::OrderingStrategy;

/// Which search procedure to run against a built `Engine`. `NsgaII` is
/// recognized but not implemented here (§6): the genetic solver is an
/// external collaborator, out of scope for this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMethod {
    BranchAndBound,
    NsgaII,
}

/// Tunables for building an `Engine` (§5, §6).
#[derive(Debug, Clone, derive_builder::Builder)]
#[builder(setter(into))]
pub struct EngineConfig {
    /// Maximum scope width ("bucket width") any cost table may have before
    /// its vertex's dependencies must be split across several mini-buckets.
    #[builder(default = "4")]
    pub max_variables: usize,
    /// Elimination order strategy.
    #[builder(default)]
    pub ordering: OrderingStrategy,
    /// Expected number of cost dimensions, used only to cross-check against
    /// the parsed instance; `None` skips the check.
    #[builder(default)]
    pub dimensions: Option<usize>,
    /// Capacity of the LRU memoization caches (§5).
    #[builder(default = "300_000")]
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_variables: 4,
            ordering: OrderingStrategy::default(),
            dimensions: None,
            cache_capacity: 300_000,
        }
    }
}

/// Checks the invariants `EngineConfig` must satisfy before an `Engine`
/// can be built from it: a bucket of width less than 2 could never host an
/// elementary edge constraint, and zero dimensions describes no objective
/// at all.
pub fn validate_config(config: &EngineConfig) -> Result<()> {
    if config.max_variables < 2 {
        return Err(Error::ConfigInvalid(
            "max_variables must be at least 2".to_string(),
        ));
    }
    if let Some(dims) = config.dimensions {
        if dims < 1 {
            return Err(Error::ConfigInvalid(
                "dimensions must be at least 1".to_string(),
            ));
        }
    }
    Ok(())
}

/// Parses the `n<N>_ep<P>_d<D>` instance-naming convention (§6) and returns
/// the declared dimension count `D`, if the filename matches. Any other
/// filename shape returns `None` rather than an error: this is a default,
/// not a requirement, the CLI falls back to sniffing the file itself when
/// it returns nothing.
pub fn dimensions_from_filename(path: &str) -> Option<usize> {
    let re = Regex::new(r"n\d+_ep\d+_d(\d+)").ok()?;
    let file_name = std::path::Path::new(path).file_name()?.to_str()?;
    let caps = re.captures(file_name)?;
    caps.get(1)?.as_str().parse().ok()
}
