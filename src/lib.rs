// Copyright (c) 2015-2022 Frank Fischer <frank-fischer@shadow-soft.de>
//
// This program is free software: you can redistribute it and/or
// modify it under the terms of the GNU General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see  <http://www.gnu.org/licenses/>
//

#![forbid(unsafe_code)]

//! A solver for the balanced transportation problem.
//!
//! Given the supplies of `m` producers, the demands of `n` consumers
//! and a `m × n` matrix of per-unit shipping costs, the solver
//! computes a flow plan satisfying all supplies and demands with
//! minimal total cost. The method is the classical transportation
//! simplex: an initial basic solution by the northwest-corner rule,
//! the optimality test by dual potentials ("MODI") and pivots along
//! stepping-stone cycles.
//!
//! # Example
//!
//! ```
//! use nalgebra::DMatrix;
//! use transport_simplex::{transport_simplex, SolutionState};
//!
//! let supplies: [f64; 3] = [11.0, 11.0, 8.0];
//! let demands = [5.0, 9.0, 9.0, 7.0];
//! let costs = DMatrix::from_row_slice(3, 4, &[
//!     7.0, 8.0, 5.0, 3.0,
//!     2.0, 4.0, 5.0, 9.0,
//!     6.0, 3.0, 1.0, 2.0,
//! ]);
//!
//! let solution = transport_simplex(&supplies, &demands, &costs).unwrap();
//! assert_eq!(solution.state, SolutionState::Optimal);
//! assert!((solution.cost - 89.0).abs() < 1e-9);
//! ```

#[cfg(feature = "serialize")]
#[macro_use]
extern crate serde_derive;

mod num {
    pub use nalgebra::RealField;
    pub use num_traits as traits;
}

use std::fmt::{Debug, Display};

/// The numeric type of supplies, demands, flows and costs.
///
/// This is automatically implemented for all real scalars supported
/// by `nalgebra`, i.e. `f32` and `f64`.
pub trait Quantity:
    num::RealField + Copy + num::traits::NumAssign + num::traits::Zero + num::traits::One + PartialOrd + Debug + Display
{
}

impl<T> Quantity for T where
    T: num::RealField
        + Copy
        + num::traits::NumAssign
        + num::traits::Zero
        + num::traits::One
        + PartialOrd
        + Debug
        + Display
{
}

/// The default tolerance for values to be considered zero.
pub fn default_tolerance<F: Quantity>() -> F {
    nalgebra::convert(1e-9f64)
}

pub mod error;
pub use self::error::{Error, Result};

pub mod plan;
pub use self::plan::{Basis, Cell, TransportPlan};

// # Algorithms

pub mod transport;
pub use self::transport::{
    build_initial_plan, solve, transport_simplex, Solution, SolutionState, Step, TransportSimplex,
};
