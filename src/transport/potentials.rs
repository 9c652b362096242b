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

//! Dual potentials of a basis.
//!
//! The potentials `u_i` (rows) and `v_j` (columns) satisfy
//!
//! ```text
//!   u_0 = 0,
//!   v_j - u_i = c_ij   for every basic cell (i,j).
//! ```
//!
//! These are `m + n` equations in `m + n` unknowns, solved by an LU
//! decomposition.

use crate::error::{Error, Result};
use crate::plan::{Cell, TransportPlan};
use crate::Quantity;
use log::{debug, trace};
use nalgebra::{DMatrix, DVector};
use num_traits::{One, Zero};

/// Row and column potentials.
#[derive(Clone, PartialEq, Debug)]
pub struct Potentials<F> {
    /// The row (producer) potentials, `u[0] == 0`.
    pub u: Vec<F>,
    /// The column (consumer) potentials.
    pub v: Vec<F>,
}

impl<F: Quantity> Potentials<F> {
    /// The reduced cost `c_ij - (v_j - u_i)` of a cell.
    pub fn reduced_cost(&self, cell: Cell, costs: &DMatrix<F>) -> F {
        costs[(cell.row, cell.col)] - (self.v[cell.col] - self.u[cell.row])
    }
}

/// Return the basic cells that define the potential system.
///
/// This is the basis itself if it has `m + n - 1` cells. If the basis
/// has surplus cells, zero-flow cells are dropped, highest row index
/// first, but the zero cell with the lowest row index is always
/// retained. Flows are not modified.
pub fn constraint_cells<F: Quantity>(plan: &TransportPlan<F>) -> Result<Vec<Cell>> {
    let needed = plan.num_rows() + plan.num_cols() - 1;
    let mut cells: Vec<Cell> = plan.basis().iter().cloned().collect();
    if cells.len() <= needed {
        return Ok(cells);
    }

    let mut surplus = cells.len() - needed;
    let dropped = surplus;
    let zeros: Vec<Cell> = plan
        .basic_cells()
        .filter(|&(_, x)| x.is_zero())
        .map(|(cell, _)| cell)
        .collect();

    // zeros[0] is the lowest-row zero cell (row-major order) and is kept
    for &cell in zeros.iter().skip(1).rev() {
        if surplus == 0 {
            break;
        }
        cells.retain(|&c| c != cell);
        surplus -= 1;
    }

    if surplus > 0 {
        return Err(Error::internal(format!(
            "basis has {} cells but only {} may remain",
            cells.len(),
            needed
        )));
    }

    debug!("Dropped {} surplus zero cells from the potential system", dropped);

    Ok(cells)
}

/// Compute the potentials of the plan's basis w.r.t. `costs`.
pub fn potentials<F: Quantity>(plan: &TransportPlan<F>, costs: &DMatrix<F>) -> Result<Potentials<F>> {
    let m = plan.num_rows();
    let n = plan.num_cols();
    let cells = constraint_cells(plan)?;
    if cells.len() + 1 != m + n {
        return Err(Error::internal(format!(
            "potential system needs {} basic cells, basis has {}",
            m + n - 1,
            cells.len()
        )));
    }

    let mut a = DMatrix::<F>::zeros(m + n, m + n);
    let mut b = DVector::<F>::zeros(m + n);

    // gauge: u_0 = 0
    a[(0, 0)] = F::one();

    for (k, cell) in cells.iter().enumerate() {
        a[(k + 1, cell.row)] = -F::one();
        a[(k + 1, m + cell.col)] = F::one();
        b[k + 1] = costs[(cell.row, cell.col)];
    }

    let x = a
        .lu()
        .solve(&b)
        .ok_or_else(|| Error::internal("singular potential system, basis is not a spanning tree"))?;

    if x.iter().any(|p| !p.is_finite()) {
        return Err(Error::internal("potential system has no finite solution"));
    }

    let pots = Potentials {
        u: x.iter().take(m).cloned().collect(),
        v: x.iter().skip(m).cloned().collect(),
    };
    trace!("Potentials u={:?} v={:?}", pots.u, pots.v);

    Ok(pots)
}

#[cfg(test)]
mod tests {
    use super::{constraint_cells, potentials};
    use crate::error::Error;
    use crate::plan::{Basis, Cell, TransportPlan};
    use crate::transport::northwest::northwest_corner;
    use approx::assert_abs_diff_eq;
    use nalgebra::DMatrix;

    fn costs() -> DMatrix<f64> {
        DMatrix::from_row_slice(3, 4, &[7.0, 8.0, 5.0, 3.0, 2.0, 4.0, 5.0, 9.0, 6.0, 3.0, 1.0, 2.0])
    }

    #[test]
    fn test_potentials_staircase() {
        let plan = northwest_corner(&[11.0, 11.0, 8.0], &[5.0, 9.0, 9.0, 7.0]).unwrap();
        let pots = potentials(&plan, &costs()).unwrap();

        for (x, y) in pots.u.iter().zip(&[0.0, 4.0, 8.0]) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-9);
        }
        for (x, y) in pots.v.iter().zip(&[7.0, 8.0, 9.0, 10.0]) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-9);
        }

        // basic cells have zero reduced cost
        for (cell, _) in plan.basic_cells() {
            assert_abs_diff_eq!(pots.reduced_cost(cell, &costs()), 0.0, epsilon = 1e-9);
        }
        assert_abs_diff_eq!(pots.reduced_cost(Cell::new(0, 3), &costs()), -7.0, epsilon = 1e-9);
    }

    #[test]
    fn test_constraint_cells_drop_surplus_zeros() {
        // A 2x2 tree (0,0),(0,1),(1,1) plus surplus zero cell (1,0).
        let flows = DMatrix::from_row_slice(2, 2, &[5.0, 0.0, 0.0, 5.0]);
        let basis: Basis = vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 0), Cell::new(1, 1)]
            .into_iter()
            .collect();
        let plan = TransportPlan::new(flows, basis);

        // (0,1) is the lowest-row zero cell and must be retained
        let cells = constraint_cells(&plan).unwrap();
        assert_eq!(cells, vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 1)]);

        let costs = DMatrix::from_row_slice(2, 2, &[5.0, 1.0, 1.0, 5.0]);
        let pots = potentials(&plan, &costs).unwrap();
        assert_abs_diff_eq!(pots.u[1], -4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pots.v[0], 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_potentials_wrong_basis_size() {
        // two cells in the same row leave row 1 unconnected
        let flows = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 0.0, 0.0]);
        let basis: Basis = vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 0)].into_iter().collect();
        let plan = TransportPlan::new(flows, basis);
        assert!(matches!(
            potentials(&plan, &DMatrix::from_element(2, 2, 1.0)),
            Err(Error::InternalInvariant(_))
        ));
    }
}
