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

//! Stepping-stone cycles.
//!
//! Adding a non-basic cell to a basis (a spanning tree of the
//! bipartite row/column graph) closes exactly one cycle. The cycle is
//! found in two phases:
//!
//! 1. *Scratch-out*: rows and columns containing less than two member
//!    cells (basic cells plus the entering cell) among the remaining
//!    active lines are removed repeatedly. This strips the tree down to
//!    the cycle.
//! 2. *Walk*: starting at the entering cell, move alternately along
//!    the current row and the current column to the other member in an
//!    active line until the entering cell is reached again.

use crate::error::{Error, Result};
use crate::plan::{Cell, TransportPlan};
use crate::Quantity;
use log::trace;
use std::collections::BTreeSet;
use std::iter::once;

/// The rows and columns that survived the scratch-out rule.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ActiveLines {
    pub rows: Vec<bool>,
    pub cols: Vec<bool>,
}

impl ActiveLines {
    pub fn num_rows(&self) -> usize {
        self.rows.iter().filter(|&&a| a).count()
    }

    pub fn num_cols(&self) -> usize {
        self.cols.iter().filter(|&&a| a).count()
    }
}

/// Member cells indexed by row and by column, both in ascending order.
struct Members {
    by_row: Vec<Vec<usize>>,
    by_col: Vec<Vec<usize>>,
}

impl Members {
    fn new<F: Quantity>(plan: &TransportPlan<F>, entering: Cell) -> Self {
        let cells: BTreeSet<Cell> = plan.basis().iter().cloned().chain(once(entering)).collect();
        let mut by_row = vec![vec![]; plan.num_rows()];
        let mut by_col = vec![vec![]; plan.num_cols()];
        for cell in cells {
            by_row[cell.row].push(cell.col);
            by_col[cell.col].push(cell.row);
        }
        Members { by_row, by_col }
    }
}

fn check_entering<F: Quantity>(plan: &TransportPlan<F>, entering: Cell) -> Result<()> {
    if entering.row >= plan.num_rows() || entering.col >= plan.num_cols() {
        return Err(Error::internal(format!("entering cell {:?} is outside the plan", entering)));
    }
    if plan.is_basic(entering) {
        return Err(Error::internal(format!("entering cell {:?} is already basic", entering)));
    }
    Ok(())
}

fn eliminate(members: &Members) -> ActiveLines {
    let mut rows = vec![true; members.by_row.len()];
    let mut cols = vec![true; members.by_col.len()];

    loop {
        let mut changed = false;
        for (i, row) in members.by_row.iter().enumerate() {
            if rows[i] && row.iter().filter(|&&j| cols[j]).count() < 2 {
                rows[i] = false;
                changed = true;
            }
        }
        for (j, col) in members.by_col.iter().enumerate() {
            if cols[j] && col.iter().filter(|&&i| rows[i]).count() < 2 {
                cols[j] = false;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    ActiveLines { rows, cols }
}

/// Apply the scratch-out rule to the basis of `plan` extended by `entering`.
///
/// The returned lines are exactly those of the cycle closed by
/// `entering`.
pub fn scratch_out<F: Quantity>(plan: &TransportPlan<F>, entering: Cell) -> Result<ActiveLines> {
    check_entering(plan, entering)?;
    Ok(eliminate(&Members::new(plan, entering)))
}

/// Find the stepping-stone cycle closed by the non-basic cell `entering`.
///
/// The cycle starts with `entering`, the second cell is in the same
/// row, the third in the same column as the second and so on. Hence
/// cells at even positions receive flow, those at odd positions give
/// flow.
///
/// # Example
///
/// ```
/// use transport_simplex::{build_initial_plan, Cell};
/// use transport_simplex::transport::find_cycle;
///
/// let plan = build_initial_plan(&[11.0, 11.0, 8.0], &[5.0, 9.0, 9.0, 7.0]).unwrap();
/// let cycle = find_cycle(&plan, Cell::new(0, 3)).unwrap();
/// assert_eq!(cycle, vec![
///     Cell::new(0, 3), Cell::new(0, 1), Cell::new(1, 1),
///     Cell::new(1, 2), Cell::new(2, 2), Cell::new(2, 3),
/// ]);
/// ```
pub fn find_cycle<F: Quantity>(plan: &TransportPlan<F>, entering: Cell) -> Result<Vec<Cell>> {
    check_entering(plan, entering)?;

    let members = Members::new(plan, entering);
    let active = eliminate(&members);

    if !active.rows[entering.row] || !active.cols[entering.col] {
        return Err(Error::internal(format!(
            "no cycle through {:?}, {} rows and {} columns remain after elimination",
            entering,
            active.num_rows(),
            active.num_cols()
        )));
    }

    let max_len = plan.num_rows() + plan.num_cols();
    let mut cycle = vec![entering];
    let mut cur = entering;
    let mut along_row = true;
    loop {
        let next = if along_row {
            members.by_row[cur.row]
                .iter()
                .find(|&&j| j != cur.col && active.cols[j])
                .map(|&j| Cell::new(cur.row, j))
        } else {
            members.by_col[cur.col]
                .iter()
                .find(|&&i| i != cur.row && active.rows[i])
                .map(|&i| Cell::new(i, cur.col))
        };

        let next = next.ok_or_else(|| Error::internal(format!("cycle walk got stuck at {:?}", cur)))?;
        if next == entering {
            break;
        }
        if cycle.len() >= max_len {
            return Err(Error::internal(format!("cycle walk from {:?} does not close", entering)));
        }

        cycle.push(next);
        cur = next;
        along_row = !along_row;
    }

    trace!("Cycle {:?}", cycle);

    Ok(cycle)
}
