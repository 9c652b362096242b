/*
 * Copyright (c) 2022 Frank Fischer <frank-fischer@shadow-soft.de>
 *
 * This program is free software: you can redistribute it and/or
 * modify it under the terms of the GNU General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful, but
 * WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
 * General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see  <http://www.gnu.org/licenses/>
 */

//! Errors of the transportation solver.

use thiserror::Error;

/// Error raised by the transportation solver.
///
/// Non-convergence is not an error, see
/// [`SolutionState::DidNotConverge`](crate::SolutionState::DidNotConverge).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The input data is malformed (empty, negative values, dimension mismatch, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Total supply and total demand differ.
    #[error("unbalanced problem: total supply {supply} differs from total demand {demand}")]
    Imbalance { supply: String, demand: String },

    /// A structural invariant of the basis has been violated.
    ///
    /// This should never happen for a valid basis and is not recoverable.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
}

impl Error {
    pub(crate) fn invalid<S: Into<String>>(msg: S) -> Self {
        Error::InvalidInput(msg.into())
    }

    pub(crate) fn internal<S: Into<String>>(msg: S) -> Self {
        Error::InternalInvariant(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
