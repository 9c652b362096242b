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

//! The transportation simplex method.
//!
//! Each iteration computes the dual potentials of the current basis,
//! the reduced costs of all cells and, if some reduced cost is
//! negative, pushes flow around the stepping-stone cycle closed by the
//! most negative cell.

use crate::plan::TransportPlan;
use crate::Quantity;
use nalgebra::DMatrix;

pub mod cycle;
pub mod northwest;
pub mod potentials;
pub mod reallocate;
pub mod reduced;
pub mod simplex;

pub use self::cycle::find_cycle;
pub use self::northwest::{northwest_corner as build_initial_plan, northwest_corner_with_tolerance};
pub use self::potentials::Potentials;
pub use self::reallocate::{Pivot, Sign};
pub use self::simplex::{solve, transport_simplex, TransportSimplex};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum SolutionState {
    /// Unknown state, the problem has not been solved, yet
    Unknown,
    /// The problem has been solved to optimality
    Optimal,
    /// The iteration limit has been reached before optimality could be proven
    DidNotConverge,
}

/// Diagnostic record of a single iteration.
#[derive(Clone, Debug)]
pub struct Step<F: Quantity> {
    /// The iteration number, starting at 0 for the initial plan.
    pub iteration: usize,
    /// The plan at the beginning of the iteration.
    pub plan: TransportPlan<F>,
    /// The reduced costs w.r.t. `plan`.
    pub reduced_costs: DMatrix<F>,
    /// The total cost of `plan`.
    pub cost: F,
    /// The pivot performed in this iteration, `None` for the final one.
    pub pivot: Option<Pivot<F>>,
}

/// The result of a solver run.
#[derive(Clone, Debug)]
pub struct Solution<F: Quantity> {
    /// Whether `plan` is optimal.
    pub state: SolutionState,
    /// The final plan, the best plan found if the solver did not converge.
    pub plan: TransportPlan<F>,
    /// The total cost of `plan`.
    pub cost: F,
    /// The number of pivots performed.
    pub iterations: usize,
    /// The iteration trace, empty unless requested.
    pub trace: Vec<Step<F>>,
}

impl<F: Quantity> Solution<F> {
    pub fn is_optimal(&self) -> bool {
        self.state == SolutionState::Optimal
    }
}
