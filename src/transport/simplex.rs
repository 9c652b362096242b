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

//! The transportation simplex driver.

use super::cycle::find_cycle;
use super::northwest::northwest_corner;
use super::potentials::{constraint_cells, potentials};
use super::reallocate::reallocate;
use super::reduced::{entering_cell, pricing_tolerance, reduced_costs};
use super::{Solution, SolutionState, Step};
use crate::error::{Error, Result};
use crate::plan::{Basis, TransportPlan};
use crate::{default_tolerance, Quantity};
use log::{debug, warn};
use nalgebra::DMatrix;
use num_traits::Zero;

/// The default iteration limit is `ITERATION_FACTOR * m * n`.
pub const ITERATION_FACTOR: usize = 10;

/// A primal transportation simplex algorithm.
///
/// # Example
///
/// ```
/// use nalgebra::DMatrix;
/// use transport_simplex::{build_initial_plan, SolutionState, TransportSimplex};
///
/// let costs = DMatrix::from_row_slice(2, 2, &[5.0, 1.0, 1.0, 5.0]);
/// let plan = build_initial_plan(&[5.0, 5.0], &[5.0, 5.0]).unwrap();
///
/// let mut spx = TransportSimplex::new(&costs);
/// spx.record_trace = true;
/// let solution = spx.solve(plan).unwrap();
///
/// assert_eq!(solution.state, SolutionState::Optimal);
/// assert_eq!(solution.cost, 10.0);
/// assert_eq!(spx.num_iterations(), 1);
/// assert_eq!(solution.trace.len(), 2);
/// ```
pub struct TransportSimplex<'a, F: Quantity> {
    costs: &'a DMatrix<F>,

    /// The value to be considered zero. Defaults to `1e-9`.
    ///
    /// Reduced costs above `-zero * max(1, max |c_ij|)` count as
    /// non-negative and non-basic cells may carry at most `zero` flow.
    pub zero: F,
    /// The maximal number of pivots.
    ///
    /// If `None` (the default) the limit is `ITERATION_FACTOR * m * n`.
    pub max_iterations: Option<usize>,
    /// Whether to record a [`Step`] for each iteration. Defaults to `false`.
    pub record_trace: bool,

    niter: usize,
    solution_state: SolutionState,
}

impl<'a, F: Quantity> TransportSimplex<'a, F> {
    pub fn new(costs: &'a DMatrix<F>) -> Self {
        TransportSimplex {
            costs,
            zero: default_tolerance(),
            max_iterations: None,
            record_trace: false,
            niter: 0,
            solution_state: SolutionState::Unknown,
        }
    }

    /// Return the number of pivots of the latest run.
    pub fn num_iterations(&self) -> usize {
        self.niter
    }

    /// Return the solution state of the latest run.
    pub fn solution_state(&self) -> SolutionState {
        self.solution_state
    }

    /// Return the effective iteration limit.
    pub fn iteration_limit(&self) -> usize {
        self.max_iterations
            .unwrap_or_else(|| (ITERATION_FACTOR * self.costs.nrows() * self.costs.ncols()).max(ITERATION_FACTOR))
    }

    /// Solve the transportation problem starting from `plan`.
    ///
    /// The plan must be a basic solution w.r.t. the cost matrix, e.g.
    /// one returned by [`northwest_corner`]. If the iteration limit
    /// is reached the returned solution has state
    /// [`SolutionState::DidNotConverge`] and contains the best plan found.
    pub fn solve(&mut self, plan: TransportPlan<F>) -> Result<Solution<F>> {
        self.niter = 0;
        self.solution_state = SolutionState::Unknown;

        let mut plan = plan;
        self.prepare_plan(&mut plan)?;

        let limit = self.iteration_limit();
        let tolerance = pricing_tolerance(self.costs, self.zero);
        let mut trace = Vec::new();

        loop {
            let pots = potentials(&plan, self.costs)?;
            let reduced = reduced_costs(self.costs, &pots);
            let cost = plan.cost(self.costs);

            let entering = match entering_cell(&reduced, plan.basis(), tolerance) {
                Some(cell) if self.niter < limit => cell,
                Some(_) => {
                    warn!("Iteration limit {} reached with cost {}", limit, cost);
                    self.solution_state = SolutionState::DidNotConverge;
                    self.record(&mut trace, &plan, reduced, cost, None);
                    break;
                }
                None => {
                    debug!("Optimal after {} iterations with cost {}", self.niter, cost);
                    self.solution_state = SolutionState::Optimal;
                    self.record(&mut trace, &plan, reduced, cost, None);
                    break;
                }
            };

            let cycle = find_cycle(&plan, entering)?;
            let before = if self.record_trace { Some(plan.clone()) } else { None };
            let pivot = reallocate(&mut plan, &cycle)?;

            debug!(
                "Iteration {}: cost {}, entering {:?} (reduced cost {}), leaving {:?}, moved {}",
                self.niter,
                cost,
                entering,
                reduced[(entering.row, entering.col)],
                pivot.leaving,
                pivot.amount
            );

            if let Some(before) = before {
                self.record(&mut trace, &before, reduced, cost, Some(pivot));
            }
            self.niter += 1;
        }

        Ok(Solution {
            state: self.solution_state,
            cost: plan.cost(self.costs),
            plan,
            iterations: self.niter,
            trace,
        })
    }

    fn record(
        &self,
        trace: &mut Vec<Step<F>>,
        plan: &TransportPlan<F>,
        reduced_costs: DMatrix<F>,
        cost: F,
        pivot: Option<super::Pivot<F>>,
    ) {
        if self.record_trace {
            trace.push(Step {
                iteration: self.niter,
                plan: plan.clone(),
                reduced_costs,
                cost,
                pivot,
            });
        }
    }

    /// Check the plan against the cost matrix.
    ///
    /// Surplus zero cells in the basis are dropped (see
    /// [`constraint_cells`]), everything else must already be a valid
    /// basic solution.
    fn prepare_plan(&self, plan: &mut TransportPlan<F>) -> Result<()> {
        let (m, n) = self.costs.shape();
        if m == 0 || n == 0 {
            return Err(Error::invalid("cost matrix must not be empty"));
        }
        if plan.num_rows() != m || plan.num_cols() != n {
            return Err(Error::invalid(format!(
                "plan is {}x{} but cost matrix is {}x{}",
                plan.num_rows(),
                plan.num_cols(),
                m,
                n
            )));
        }
        if self.costs.iter().any(|c| !c.is_finite()) {
            return Err(Error::invalid("cost matrix contains non-finite values"));
        }

        for i in 0..m {
            for j in 0..n {
                let x = plan.flows()[(i, j)];
                if !x.is_finite() || x < F::zero() {
                    return Err(Error::invalid(format!("flow {} on ({}, {}) is invalid", x, i, j)));
                }
            }
        }

        if let Some(cell) = plan.basis().iter().find(|c| c.row >= m || c.col >= n) {
            return Err(Error::invalid(format!("basic cell {:?} is outside the plan", cell)));
        }

        if plan.basis().len() + 1 > m + n {
            let cells = constraint_cells(plan).map_err(|_| {
                Error::invalid(format!(
                    "basis has {} cells, expected {}",
                    plan.basis().len(),
                    m + n - 1
                ))
            })?;
            *plan.basis_mut() = cells.into_iter().collect::<Basis>();
        }

        if !plan.basis().is_spanning_tree(m, n) {
            return Err(Error::invalid(format!(
                "basis with {} cells is not a spanning tree of the {}x{} plan",
                plan.basis().len(),
                m,
                n
            )));
        }

        for i in 0..m {
            for j in 0..n {
                let cell = (i, j).into();
                if !plan.is_basic(cell) && plan.flow(cell) > self.zero {
                    return Err(Error::invalid(format!("non-basic cell ({}, {}) carries flow", i, j)));
                }
            }
        }

        Ok(())
    }
}

/// Solve the transportation problem starting from `plan` with the
/// default settings.
pub fn solve<F: Quantity>(plan: TransportPlan<F>, costs: &DMatrix<F>) -> Result<Solution<F>> {
    TransportSimplex::new(costs).solve(plan)
}

/// Solve a transportation problem.
///
/// The initial plan is computed by the northwest-corner rule. The
/// cost matrix must have one row per supply and one column per demand.
pub fn transport_simplex<F: Quantity>(supplies: &[F], demands: &[F], costs: &DMatrix<F>) -> Result<Solution<F>> {
    if costs.nrows() != supplies.len() || costs.ncols() != demands.len() {
        return Err(Error::invalid(format!(
            "cost matrix is {}x{} but there are {} supplies and {} demands",
            costs.nrows(),
            costs.ncols(),
            supplies.len(),
            demands.len()
        )));
    }
    let plan = northwest_corner(supplies, demands)?;
    solve(plan, costs)
}
