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

//! Initial basic solutions by the northwest-corner rule.

use crate::error::{Error, Result};
use crate::plan::{Basis, Cell, TransportPlan};
use crate::{default_tolerance, Quantity};
use log::debug;
use nalgebra::DMatrix;
use num_traits::{One, Zero};

/// Compute an initial basic solution with the northwest-corner rule.
///
/// Starting at the top-left cell, each step ships as much as possible
/// on the current cell and then moves down if the producer is
/// exhausted or right otherwise. The result has exactly `m + n - 1`
/// basic cells (some of them possibly with zero flow).
///
/// The totals of `supplies` and `demands` must agree up to the
/// default tolerance.
///
/// # Example
///
/// ```
/// use transport_simplex::build_initial_plan;
///
/// let plan = build_initial_plan(&[11.0, 11.0, 8.0], &[5.0, 9.0, 9.0, 7.0]).unwrap();
/// assert_eq!(plan.flows().row(0).iter().cloned().collect::<Vec<_>>(), vec![5.0, 6.0, 0.0, 0.0]);
/// assert_eq!(plan.basis().len(), 6);
/// ```
pub fn northwest_corner<F: Quantity>(supplies: &[F], demands: &[F]) -> Result<TransportPlan<F>> {
    northwest_corner_with_tolerance(supplies, demands, default_tolerance())
}

/// Same as [`northwest_corner`] with an explicit tolerance for the
/// balance check.
pub fn northwest_corner_with_tolerance<F: Quantity>(
    supplies: &[F],
    demands: &[F],
    tolerance: F,
) -> Result<TransportPlan<F>> {
    check_quantities("supplies", supplies)?;
    check_quantities("demands", demands)?;
    check_balance(supplies, demands, tolerance)?;

    let m = supplies.len();
    let n = demands.len();

    let mut supply = supplies.to_vec();
    let mut demand = demands.to_vec();
    let mut flows = DMatrix::zeros(m, n);
    let mut basis = Basis::new();

    let mut i = 0;
    let mut j = 0;
    for _ in 0..m + n - 1 {
        let amount = if supply[i] < demand[j] { supply[i] } else { demand[j] };
        let down = supply[i] < demand[j];

        flows[(i, j)] = amount;
        basis.insert(Cell::new(i, j));
        supply[i] -= amount;
        demand[j] -= amount;

        // Stay inside the grid: the final row can only move right and
        // the final column can only move down.
        if i + 1 == m || (j + 1 < n && !down) {
            j += 1;
        } else {
            i += 1;
        }
    }

    debug!("Northwest-corner plan with {} basic cells for {}x{} problem", basis.len(), m, n);

    Ok(TransportPlan::new(flows, basis))
}

/// Check that the values are non-empty, finite and non-negative.
pub(crate) fn check_quantities<F: Quantity>(name: &str, values: &[F]) -> Result<()> {
    if values.is_empty() {
        return Err(Error::invalid(format!("{} must not be empty", name)));
    }
    for (k, &x) in values.iter().enumerate() {
        if !x.is_finite() {
            return Err(Error::invalid(format!("{}[{}] is not finite", name, k)));
        }
        if x < F::zero() {
            return Err(Error::invalid(format!("{}[{}] = {} is negative", name, k, x)));
        }
    }
    Ok(())
}

/// Check that total supply equals total demand (relative to `tolerance`).
pub(crate) fn check_balance<F: Quantity>(supplies: &[F], demands: &[F], tolerance: F) -> Result<()> {
    let supply = supplies.iter().fold(F::zero(), |acc, &x| acc + x);
    let demand = demands.iter().fold(F::zero(), |acc, &x| acc + x);
    if !supply.is_finite() || !demand.is_finite() {
        return Err(Error::invalid(format!(
            "total supply {} or total demand {} is not finite",
            supply, demand
        )));
    }
    let diff = if supply > demand { supply - demand } else { demand - supply };
    let scale = if supply > F::one() { supply } else { F::one() };
    if diff > tolerance * scale {
        return Err(Error::Imbalance {
            supply: supply.to_string(),
            demand: demand.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::northwest_corner;
    use crate::error::Error;
    use crate::plan::Cell;
    use nalgebra::DMatrix;

    #[test]
    fn test_northwest_staircase() {
        let plan = northwest_corner(&[11.0, 11.0, 8.0], &[5.0, 9.0, 9.0, 7.0]).unwrap();
        let expected = DMatrix::from_row_slice(3, 4, &[5.0, 6.0, 0.0, 0.0, 0.0, 3.0, 8.0, 0.0, 0.0, 0.0, 1.0, 7.0]);
        assert_eq!(plan.flows(), &expected);
        assert_eq!(
            plan.basis().iter().cloned().collect::<Vec<_>>(),
            vec![
                Cell::new(0, 0),
                Cell::new(0, 1),
                Cell::new(1, 1),
                Cell::new(1, 2),
                Cell::new(2, 2),
                Cell::new(2, 3)
            ]
        );
        assert!(plan.basis().is_spanning_tree(3, 4));
    }

    #[test]
    fn test_northwest_simultaneous_exhaustion() {
        // supply and demand run out together in (0,0): the column moves,
        // leaving a zero basic cell in (0,1)
        let plan = northwest_corner(&[5.0, 5.0], &[5.0, 5.0]).unwrap();
        assert_eq!(plan.flows(), &DMatrix::from_row_slice(2, 2, &[5.0, 0.0, 0.0, 5.0]));
        assert!(plan.is_basic(Cell::new(0, 1)));
        assert!(!plan.is_basic(Cell::new(1, 0)));
        assert_eq!(plan.flow(Cell::new(0, 1)), 0.0);
        assert!(plan.basis().is_spanning_tree(2, 2));
    }

    #[test]
    fn test_northwest_zero_rows() {
        let plan = northwest_corner(&[5.0, 0.0, 0.0], &[5.0]).unwrap();
        assert_eq!(plan.basis().len(), 3);
        assert!(plan.basis().is_spanning_tree(3, 1));
        assert_eq!(plan.column_sums(), vec![5.0]);

        let plan = northwest_corner(&[4.0], &[0.0, 4.0, 0.0]).unwrap();
        assert!(plan.basis().is_spanning_tree(1, 3));
        assert_eq!(plan.row_sums(), vec![4.0]);
    }

    #[test]
    fn test_northwest_deterministic() {
        let a = northwest_corner(&[3.0, 7.0, 2.0], &[4.0, 4.0, 4.0]).unwrap();
        let b = northwest_corner(&[3.0, 7.0, 2.0], &[4.0, 4.0, 4.0]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_northwest_invalid() {
        assert!(matches!(
            northwest_corner(&[11.0, 11.0, 8.0, 4.0], &[5.0, 9.0, 9.0, 7.0]),
            Err(Error::Imbalance { .. })
        ));
        assert!(matches!(
            northwest_corner::<f64>(&[], &[1.0]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            northwest_corner(&[-1.0, 2.0], &[1.0]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            northwest_corner(&[f64::NAN], &[1.0]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_northwest_overflowing_totals() {
        // the supply total overflows while the demand total does not
        assert!(matches!(
            northwest_corner(&[f64::MAX, f64::MAX], &[f64::MAX, 1.0]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            northwest_corner(&[f64::MAX, f64::MAX], &[f64::MAX, f64::MAX]),
            Err(Error::InvalidInput(_))
        ));
    }
}
