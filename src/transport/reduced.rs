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

//! Reduced costs and the optimality test.

use super::potentials::Potentials;
use crate::plan::{Basis, Cell};
use crate::Quantity;
use nalgebra::DMatrix;
use num_traits::{One, Zero};

/// Compute the matrix of reduced costs `c_ij - (v_j - u_i)`.
pub fn reduced_costs<F: Quantity>(costs: &DMatrix<F>, pots: &Potentials<F>) -> DMatrix<F> {
    DMatrix::from_fn(costs.nrows(), costs.ncols(), |i, j| {
        costs[(i, j)] - (pots.v[j] - pots.u[i])
    })
}

/// Return `true` if no reduced cost is below `-tolerance`.
pub fn is_optimal<F: Quantity>(reduced: &DMatrix<F>, tolerance: F) -> bool {
    reduced.iter().all(|&c| c >= -tolerance)
}

/// Return the non-basic cell with the most negative reduced cost.
///
/// Only entries below `-tolerance` are considered, so `None` means
/// the plan is optimal. Basic cells never enter, whatever rounding
/// left in their entries. Ties are broken by the first cell in
/// row-major order.
pub fn entering_cell<F: Quantity>(reduced: &DMatrix<F>, basis: &Basis, tolerance: F) -> Option<Cell> {
    let mut min_cost = -tolerance;
    let mut min_cell = None;
    for i in 0..reduced.nrows() {
        for j in 0..reduced.ncols() {
            let cell = Cell::new(i, j);
            if basis.contains(cell) {
                continue;
            }
            let c = reduced[(i, j)];
            if c < min_cost {
                min_cost = c;
                min_cell = Some(cell);
            }
        }
    }
    min_cell
}

/// Return the pricing tolerance for `costs`.
///
/// This is `zero` scaled by the largest absolute cost (but at least
/// `zero` itself), so the optimality test does not depend on the unit
/// of the costs.
pub fn pricing_tolerance<F: Quantity>(costs: &DMatrix<F>, zero: F) -> F {
    let scale = costs.iter().fold(F::one(), |acc, &c| {
        let c = if c < F::zero() { -c } else { c };
        if c > acc {
            c
        } else {
            acc
        }
    });
    zero * scale
}
