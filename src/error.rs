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

//! This module defines the error type shared by every fallible operation in
//! this crate: instance parsing, configuration validation, and the handful
//! of internal invariants that must never be violated by a correctly built
//! engine.

/// The kinds of errors that can arise while parsing an instance, validating
/// a configuration, or (in debug builds) while catching an internal
/// programming mistake in the mini-bucket engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A line of the instance file could not be interpreted: unknown record
    /// kind, a forward reference to an undeclared vertex, or a cost vector
    /// whose dimension disagrees with a previously declared vertex.
    #[error("parse error at line {line}: {message}")]
    InstanceParse {
        /// 1-indexed line number in the instance file.
        line: usize,
        message: String,
    },
    /// A configuration option is out of range or refers to something that
    /// does not exist (e.g. `max_variables < 2`, an ordering permutation
    /// naming an unknown vertex).
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),
    /// Internal error: an attempt was made to eliminate a variable from a
    /// table whose scope has only one member. This should never happen;
    /// its presence indicates a bug in the mini-bucket partitioning logic.
    #[error("internal error: attempted to eliminate from a singleton scope")]
    EliminateSingleton,
    /// Internal error: a cost arithmetic operation was attempted on
    /// incompatible operands (e.g. adding cost vectors of different
    /// dimension).
    #[error("internal error: type mismatch in cost arithmetic")]
    TypeMismatch,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
