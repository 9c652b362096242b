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

//! Flow reallocation along a stepping-stone cycle.

use crate::error::{Error, Result};
use crate::plan::{Cell, TransportPlan};
use crate::Quantity;
use log::debug;
use num_traits::Zero;

/// The direction of the flow change of a cycle cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Sign {
    /// The cell receives flow.
    Plus,
    /// The cell gives flow.
    Minus,
}

impl Sign {
    /// The sign of the cell at `position` in a cycle starting at the
    /// entering cell.
    pub fn at(position: usize) -> Sign {
        if position % 2 == 0 {
            Sign::Plus
        } else {
            Sign::Minus
        }
    }
}

/// A basis exchange.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Pivot<F> {
    /// The cell that entered the basis.
    pub entering: Cell,
    /// The cell that left the basis.
    pub leaving: Cell,
    /// The amount of flow moved around the cycle.
    pub amount: F,
    /// Whether no flow was moved or several cells dropped to zero.
    pub degenerate: bool,
}

/// Move the maximal amount of flow around `cycle` and update the basis.
///
/// `cycle[0]` must be the non-basic entering cell, all other cells
/// must be basic. The amount is the smallest flow on a `Minus` cell
/// (the first one in cycle order on ties). Among the `Minus` cells
/// that drop to zero, the one with the lowest row index leaves the
/// basis; the others stay basic with zero flow.
pub fn reallocate<F: Quantity>(plan: &mut TransportPlan<F>, cycle: &[Cell]) -> Result<Pivot<F>> {
    if cycle.len() < 4 || cycle.len() % 2 != 0 {
        return Err(Error::internal(format!("invalid cycle of length {}", cycle.len())));
    }
    let entering = cycle[0];
    if plan.is_basic(entering) {
        return Err(Error::internal(format!("entering cell {:?} is already basic", entering)));
    }
    if let Some(cell) = cycle[1..].iter().find(|&&c| !plan.is_basic(c)) {
        return Err(Error::internal(format!("cycle cell {:?} is not basic", cell)));
    }

    let mut amount = plan.flow(cycle[1]);
    for &cell in cycle.iter().skip(3).step_by(2) {
        let x = plan.flow(cell);
        if x < amount {
            amount = x;
        }
    }

    for (k, &cell) in cycle.iter().enumerate() {
        let x = plan.flow(cell);
        match Sign::at(k) {
            Sign::Plus => plan.set_flow(cell, x + amount),
            Sign::Minus => plan.set_flow(cell, x - amount),
        }
    }

    let zeros: Vec<Cell> = cycle
        .iter()
        .skip(1)
        .step_by(2)
        .cloned()
        .filter(|&c| plan.flow(c).is_zero())
        .collect();
    let leaving = zeros
        .iter()
        .cloned()
        .min()
        .ok_or_else(|| Error::internal("no cycle cell dropped to zero"))?;

    let basis = plan.basis_mut();
    basis.remove(leaving);
    basis.insert(entering);

    let degenerate = amount.is_zero() || zeros.len() > 1;
    if degenerate {
        debug!(
            "Degenerate pivot {:?} -> {:?}, {} cells at zero",
            entering,
            leaving,
            zeros.len()
        );
    }

    Ok(Pivot {
        entering,
        leaving,
        amount,
        degenerate,
    })
}
