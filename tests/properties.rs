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

use nalgebra::DMatrix;
use proptest::collection::vec;
use proptest::prelude::*;
use transport_simplex::transport::potentials::potentials;
use transport_simplex::transport::reduced::{pricing_tolerance, reduced_costs};
use transport_simplex::{build_initial_plan, solve, SolutionState, TransportSimplex};

const EPS: f64 = 1e-6;

/// A random balanced instance.
///
/// The supplies and demands are the row and column sums of a random
/// integral flow matrix, which is returned as well as a known feasible
/// solution.
#[derive(Debug, Clone)]
struct Instance {
    supplies: Vec<f64>,
    demands: Vec<f64>,
    costs: DMatrix<f64>,
    feasible: DMatrix<f64>,
}

fn instance() -> impl Strategy<Value = Instance> {
    (1usize..6, 1usize..6).prop_flat_map(|(m, n)| {
        (vec(0u32..10, m * n), vec(0u32..20, m * n)).prop_map(move |(flows, costs)| {
            let feasible = DMatrix::from_row_iterator(m, n, flows.into_iter().map(f64::from));
            let costs = DMatrix::from_row_iterator(m, n, costs.into_iter().map(f64::from));
            let supplies = (0..m).map(|i| feasible.row(i).sum()).collect();
            let demands = (0..n).map(|j| feasible.column(j).sum()).collect();
            Instance {
                supplies,
                demands,
                costs,
                feasible,
            }
        })
    })
}

/// A random balanced instance with real-valued costs in `[0, scale)`
/// for a scale between `1` and `1e9`.
fn real_instance() -> impl Strategy<Value = Instance> {
    (1usize..9, 1usize..10, prop::sample::select(vec![1.0, 1e3, 1e6, 1e9])).prop_flat_map(|(m, n, scale)| {
        (vec(0u32..10, m * n), vec(0.0..1.0f64, m * n)).prop_map(move |(flows, costs)| {
            let feasible = DMatrix::from_row_iterator(m, n, flows.into_iter().map(f64::from));
            let costs = DMatrix::from_row_iterator(m, n, costs.into_iter().map(|c| c * scale));
            let supplies = (0..m).map(|i| feasible.row(i).sum()).collect();
            let demands = (0..n).map(|j| feasible.column(j).sum()).collect();
            Instance {
                supplies,
                demands,
                costs,
                feasible,
            }
        })
    })
}

fn cost(flows: &DMatrix<f64>, costs: &DMatrix<f64>) -> f64 {
    flows.component_mul(costs).sum()
}

proptest! {
    #[test]
    fn prop_initial_plan_is_basic_and_feasible(inst in instance()) {
        let m = inst.supplies.len();
        let n = inst.demands.len();
        let plan = build_initial_plan(&inst.supplies, &inst.demands).unwrap();

        prop_assert!(plan.basis().is_spanning_tree(m, n));
        for (x, y) in plan.row_sums().iter().zip(&inst.supplies) {
            prop_assert!((x - y).abs() < EPS);
        }
        for (x, y) in plan.column_sums().iter().zip(&inst.demands) {
            prop_assert!((x - y).abs() < EPS);
        }

        let again = build_initial_plan(&inst.supplies, &inst.demands).unwrap();
        prop_assert_eq!(plan, again);
    }

    #[test]
    fn prop_solution_is_feasible_and_not_worse(inst in instance()) {
        let initial = build_initial_plan(&inst.supplies, &inst.demands).unwrap();
        let initial_cost = initial.cost(&inst.costs);

        let mut spx = TransportSimplex::new(&inst.costs);
        spx.record_trace = true;
        let solution = spx.solve(initial).unwrap();

        prop_assert!(solution.cost <= initial_cost + EPS);
        prop_assert!(solution.plan.flows().iter().all(|&x| x >= 0.0));
        for (x, y) in solution.plan.row_sums().iter().zip(&inst.supplies) {
            prop_assert!((x - y).abs() < EPS);
        }
        for (x, y) in solution.plan.column_sums().iter().zip(&inst.demands) {
            prop_assert!((x - y).abs() < EPS);
        }

        for w in solution.trace.windows(2) {
            prop_assert!(w[1].cost <= w[0].cost + EPS);
            if let Some(pivot) = w[0].pivot {
                if !pivot.degenerate {
                    prop_assert!(w[1].cost < w[0].cost);
                }
            }
        }
    }

    #[test]
    fn prop_optimal_solution(inst in instance()) {
        let initial = build_initial_plan(&inst.supplies, &inst.demands).unwrap();
        let solution = solve(initial, &inst.costs).unwrap();

        if solution.state == SolutionState::Optimal {
            // the generating flow is feasible, so it cannot be better
            prop_assert!(solution.cost <= cost(&inst.feasible, &inst.costs) + EPS);

            let pots = potentials(&solution.plan, &inst.costs).unwrap();
            let reduced = reduced_costs(&inst.costs, &pots);
            prop_assert!(reduced.iter().all(|&c| c >= -EPS));

            let again = solve(solution.plan.clone(), &inst.costs).unwrap();
            prop_assert_eq!(again.iterations, 0);
            prop_assert_eq!(again.plan, solution.plan);
        }
    }

    #[test]
    fn prop_real_valued_costs(inst in real_instance()) {
        let initial = build_initial_plan(&inst.supplies, &inst.demands).unwrap();
        let initial_cost = initial.cost(&inst.costs);
        let solution = solve(initial, &inst.costs).unwrap();

        prop_assert!(solution.cost <= initial_cost + 1e-9 * (initial_cost.abs() + 1.0));
        for (x, y) in solution.plan.row_sums().iter().zip(&inst.supplies) {
            prop_assert!((x - y).abs() < EPS);
        }
        for (x, y) in solution.plan.column_sums().iter().zip(&inst.demands) {
            prop_assert!((x - y).abs() < EPS);
        }

        if solution.state == SolutionState::Optimal {
            // optimal up to the pricing tolerance on every unit shipped
            let tol = pricing_tolerance(&inst.costs, 1e-9);
            let total: f64 = inst.supplies.iter().sum();
            let feasible = cost(&inst.feasible, &inst.costs);
            prop_assert!(solution.cost <= feasible + 2.0 * tol * total + 1e-9 * (feasible.abs() + 1.0));
        }
    }
}
