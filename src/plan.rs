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

//! Transportation plans and their bases.
//!
//! A plan assigns a flow to every producer/consumer pair. The basis
//! is a set of `m + n - 1` cells forming a spanning tree of the
//! bipartite graph whose nodes are the producers (rows) and the
//! consumers (columns). Only basic cells may carry non-zero flow.

use crate::Quantity;
use nalgebra::DMatrix;
use num_traits::Zero;
use std::collections::btree_set;
use std::collections::BTreeSet;
use std::iter::FromIterator;

/// A cell of the plan, i.e. a producer/consumer pair.
///
/// Cells are ordered row-major.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Cell {
    /// The producer.
    pub row: usize,
    /// The consumer.
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Cell { row, col }
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Cell { row, col }
    }
}

/// The set of basic cells.
///
/// Membership is decided by the coordinates of a cell only.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Basis {
    cells: BTreeSet<Cell>,
}

impl Basis {
    pub fn new() -> Self {
        Basis { cells: BTreeSet::new() }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Add a cell to the basis. Returns `false` if it was already basic.
    pub fn insert(&mut self, cell: Cell) -> bool {
        self.cells.insert(cell)
    }

    /// Remove a cell from the basis. Returns `false` if it was not basic.
    pub fn remove(&mut self, cell: Cell) -> bool {
        self.cells.remove(&cell)
    }

    /// Iterate over all basic cells in row-major order.
    pub fn iter(&self) -> btree_set::Iter<Cell> {
        self.cells.iter()
    }

    /// Return whether the basis is a spanning tree of the bipartite
    /// graph with `m` rows and `n` columns.
    ///
    /// All cells must be inside the `m × n` grid.
    pub fn is_spanning_tree(&self, m: usize, n: usize) -> bool {
        if m == 0 || n == 0 || self.len() + 1 != m + n {
            return false;
        }

        // union-find over rows `0..m` and columns `m..m+n`
        let mut parent: Vec<usize> = (0..m + n).collect();
        fn find(parent: &mut [usize], mut u: usize) -> usize {
            while parent[u] != u {
                parent[u] = parent[parent[u]];
                u = parent[u];
            }
            u
        }

        for cell in self.iter() {
            if cell.row >= m || cell.col >= n {
                return false;
            }
            let r = find(&mut parent, cell.row);
            let c = find(&mut parent, m + cell.col);
            if r == c {
                return false;
            }
            parent[r] = c;
        }

        // m + n - 1 edges without a cycle connect all nodes
        true
    }
}

impl FromIterator<Cell> for Basis {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Basis {
            cells: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Basis {
    type Item = &'a Cell;
    type IntoIter = btree_set::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// A flow plan together with its basis.
#[derive(Clone, PartialEq, Debug)]
pub struct TransportPlan<F: Quantity> {
    flows: DMatrix<F>,
    basis: Basis,
}

impl<F: Quantity> TransportPlan<F> {
    /// Create a plan from a flow matrix and a basis.
    ///
    /// The plan is not checked here, this happens when it is handed to
    /// the solver.
    pub fn new(flows: DMatrix<F>, basis: Basis) -> Self {
        TransportPlan { flows, basis }
    }

    /// Return the number of producers.
    pub fn num_rows(&self) -> usize {
        self.flows.nrows()
    }

    /// Return the number of consumers.
    pub fn num_cols(&self) -> usize {
        self.flows.ncols()
    }

    /// The flow matrix.
    pub fn flows(&self) -> &DMatrix<F> {
        &self.flows
    }

    /// The flow on a single cell.
    pub fn flow(&self, cell: Cell) -> F {
        self.flows[(cell.row, cell.col)]
    }

    pub(crate) fn set_flow(&mut self, cell: Cell, value: F) {
        self.flows[(cell.row, cell.col)] = value;
    }

    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    pub(crate) fn basis_mut(&mut self) -> &mut Basis {
        &mut self.basis
    }

    pub fn is_basic(&self, cell: Cell) -> bool {
        self.basis.contains(cell)
    }

    /// Iterate over the basic cells with their current flow, row-major.
    pub fn basic_cells<'b>(&'b self) -> impl Iterator<Item = (Cell, F)> + 'b {
        self.basis.iter().map(move |&cell| (cell, self.flow(cell)))
    }

    /// Return the total cost `Σ c_ij · x_ij` of the plan.
    ///
    /// The cost matrix must have the same shape as the plan.
    pub fn cost(&self, costs: &DMatrix<F>) -> F {
        self.flows
            .iter()
            .zip(costs.iter())
            .fold(F::zero(), |acc, (&x, &c)| acc + x * c)
    }

    /// Return the total outflow of every producer.
    pub fn row_sums(&self) -> Vec<F> {
        (0..self.num_rows())
            .map(|i| self.flows.row(i).iter().fold(F::zero(), |acc, &x| acc + x))
            .collect()
    }

    /// Return the total inflow of every consumer.
    pub fn column_sums(&self) -> Vec<F> {
        (0..self.num_cols())
            .map(|j| self.flows.column(j).iter().fold(F::zero(), |acc, &x| acc + x))
            .collect()
    }

    pub fn into_parts(self) -> (DMatrix<F>, Basis) {
        (self.flows, self.basis)
    }
}
