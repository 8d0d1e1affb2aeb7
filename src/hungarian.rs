use crate::grid::{Mark, SquareGrid};
use crate::solution::{AssignmentSolution, UnsignedInt};
use crate::solver::AssignmentSolver;
use anyhow;
use anyhow::{ensure, Result};
use num_iter;
use tracing::trace;

const NONE: usize = usize::MAX;

/// Dense assignment solver based on the Hungarian algorithm.
///
/// The caller-supplied matrix is padded with zero-cost cells to a square
/// working matrix of side `max(num_rows, num_cols)`. A solve pass reduces the
/// working matrix until its zero cells admit a perfect matching: rows and
/// columns are normalized so each contains a zero, zeros are covered with a
/// minimum set of row and column lines, and while fewer than `side` lines
/// suffice the uncovered minimum is shifted to manufacture new zeros. The
/// final assignment is read off the zero cells by a backtracking search.
#[derive(Clone)]
pub struct HungarianSolver<I: UnsignedInt> {
    maximize: bool,
    configured: bool,
    num_rows: I,
    num_cols: I,
    // side of the square working grids: max(num_rows, num_cols)
    side: usize,

    originals: SquareGrid<f64>,
    costs: SquareGrid<f64>,
    marks: SquareGrid<Mark>,

    // provisional matching, rebuilt by every cover pass
    row_to_column: Vec<usize>,
    column_to_row: Vec<usize>,
    // rows whose marks still have to be propagated
    pending_rows: Vec<usize>,
    column_visited: Vec<bool>,

    // backtracking state of the extraction phase
    matched_column: Vec<usize>,
    column_claimed: Vec<bool>,

    /// number of cover passes of the last solve
    pub nits: u32,
}

impl<I: UnsignedInt> AssignmentSolver<I> for HungarianSolver<I> {
    fn new(row_capacity: usize, column_capacity: usize) -> (Self, AssignmentSolution<I>) {
        let side_capacity = row_capacity.max(column_capacity);
        (
            Self {
                maximize: false,
                configured: false,
                num_rows: I::zero(),
                num_cols: I::zero(),
                side: 0,

                originals: SquareGrid::with_capacity(side_capacity),
                costs: SquareGrid::with_capacity(side_capacity),
                marks: SquareGrid::with_capacity(side_capacity),

                row_to_column: Vec::with_capacity(side_capacity),
                column_to_row: Vec::with_capacity(side_capacity),
                pending_rows: Vec::with_capacity(side_capacity),
                column_visited: Vec::with_capacity(side_capacity),

                matched_column: Vec::with_capacity(side_capacity),
                column_claimed: Vec::with_capacity(side_capacity),

                nits: 0,
            },
            AssignmentSolution::<I>::new(row_capacity, column_capacity),
        )
    }

    fn num_rows(&self) -> I {
        self.num_rows
    }

    fn num_cols(&self) -> I {
        self.num_cols
    }

    fn original_values(&self) -> &SquareGrid<f64> {
        &self.originals
    }

    fn init(&mut self, num_rows: I, num_cols: I) -> Result<(), anyhow::Error> {
        let side = std::cmp::max(num_rows, num_cols);
        ensure!(
            side < I::max_value(),
            "a side of {} collides with the unassigned sentinel of the index type",
            side
        );
        let side_usize: usize = side.as_();
        ensure!(
            side_usize.checked_mul(side_usize).is_some(),
            "a matrix of side {} does not fit in memory",
            side
        );
        self.num_rows = num_rows;
        self.num_cols = num_cols;
        self.side = side_usize;
        self.originals.reset(side_usize);
        self.costs.reset(side_usize);
        self.configured = true;
        Ok(())
    }

    fn set_value(&mut self, row: I, column: I, value: f64) -> Result<(), anyhow::Error> {
        ensure!(self.configured, "set_value called before init");
        ensure!(
            row < self.num_rows && column < self.num_cols,
            "cell ({}, {}) is outside the configured {}x{} matrix",
            row,
            column,
            self.num_rows,
            self.num_cols
        );
        ensure!(
            value.is_finite(),
            "cost of cell ({}, {}) must be finite, got {}",
            row,
            column,
            value
        );
        let row_usize: usize = row.as_();
        let column_usize: usize = column.as_();
        self.originals[(row_usize, column_usize)] = value;
        self.costs[(row_usize, column_usize)] = if self.maximize { -value } else { value };
        Ok(())
    }

    fn solve(&mut self, solution: &mut AssignmentSolution<I>) -> Result<(), anyhow::Error> {
        ensure!(self.configured, "solve called before init");

        solution.row_to_column.clear();
        solution.column_to_row.clear();
        solution.num_unassigned = I::zero();
        if self.num_rows == I::zero() {
            return Ok(());
        }

        self.reset_working_values();
        self.reduce();

        self.nits = 0;
        let max_passes = (self.side as u64 + 1).saturating_mul(self.side as u64 + 1);
        let mut lines = self.cover_zeros();
        trace!("covering lines: {} of {}", lines, self.side);
        while lines < self.side {
            ensure!(
                u64::from(self.nits) < max_passes,
                "cover loop failed to converge after {} passes",
                self.nits
            );
            self.create_zeros()?;
            let covered = self.cover_zeros();
            debug_assert!(covered >= lines);
            lines = covered;
            trace!("covering lines: {} of {}", lines, self.side);
        }
        self.extract_matching()?;

        let num_cols_usize: usize = self.num_cols.as_();
        solution
            .column_to_row
            .resize(num_cols_usize, I::max_value());
        let mut num_unassigned = I::zero();
        for row_i in num_iter::range(I::zero(), self.num_rows) {
            let row: usize = row_i.as_();
            let column = self.matched_column[row];
            solution
                .row_to_column
                .push(I::from_usize(column).unwrap());
            if column < num_cols_usize {
                solution.column_to_row[column] = row_i;
            } else {
                num_unassigned += I::one();
            }
        }
        solution.num_unassigned = num_unassigned;

        trace!("OBJECTIVE: {}", self.get_objective(solution));
        Ok(())
    }
}

impl<I: UnsignedInt> HungarianSolver<I> {
    /// Creates a solver that maximizes the total value instead of minimizing
    /// it. Costs are sign-flipped on entry; reported objectives keep the
    /// caller's sign.
    pub fn maximizing(
        row_capacity: usize,
        column_capacity: usize,
    ) -> (Self, AssignmentSolution<I>) {
        let (mut solver, solution) = Self::new(row_capacity, column_capacity);
        solver.maximize = true;
        (solver, solution)
    }

    fn reset_working_values(&mut self) {
        let sign = if self.maximize { -1. } else { 1. };
        for (cost, original) in self
            .costs
            .as_mut_slice()
            .iter_mut()
            .zip(self.originals.as_slice())
        {
            *cost = sign * *original;
        }
    }

    /// Subtracts each row's minimum, then each column's minimum, so every row
    /// and column holds at least one exact zero. Shifting a full row or
    /// column changes the objective only by a constant, never the identity of
    /// the optimal assignment. The fixed row-before-column order keeps the
    /// zero pattern reproducible; later phases compare against 0.0 exactly.
    fn reduce(&mut self) {
        for row in 0..self.side {
            let cells = self.costs.row_mut(row);
            let mut min = f64::INFINITY;
            for value in cells.iter() {
                if *value < min {
                    min = *value;
                }
            }
            for value in cells.iter_mut() {
                *value -= min;
            }
        }
        for column in 0..self.side {
            let mut min = f64::INFINITY;
            for row in 0..self.side {
                let value = self.costs[(row, column)];
                if value < min {
                    min = value;
                }
            }
            for row in 0..self.side {
                self.costs[(row, column)] -= min;
            }
        }
    }

    /// Builds a maximum matching over the zero cells, then derives a minimum
    /// covering line set from it and returns the number of lines.
    ///
    /// Rows left unmatched are marked; a marked row marks the column of every
    /// zero it holds and a marked column marks the row currently matched to
    /// it. When the propagation settles, the unmarked rows together with the
    /// marked columns cover every zero with as few lines as a maximum
    /// matching has edges. Flipping the row component of every cell turns
    /// the grid into its covered form, where the diagonal samples both line
    /// sets at once and the clear/both cells are exactly the uncovered and
    /// doubly covered ones.
    fn cover_zeros(&mut self) -> usize {
        self.nits += 1;
        self.seed_matching();
        self.marks.reset(self.side);

        self.pending_rows.clear();
        for row in 0..self.side {
            if self.row_to_column[row] == NONE {
                self.pending_rows.push(row);
            }
        }
        while let Some(row) = self.pending_rows.pop() {
            if self.marks[(row, 0)].has_row() {
                continue;
            }
            for column in 0..self.side {
                self.marks[(row, column)] = self.marks[(row, column)].with_row();
            }
            for column in 0..self.side {
                if self.costs[(row, column)] == 0.0 && !self.marks[(0, column)].has_column() {
                    self.mark_column(column);
                }
            }
        }

        for row in 0..self.side {
            for column in 0..self.side {
                self.marks[(row, column)] = self.marks[(row, column)].toggle_row();
            }
        }
        let mut lines = 0;
        for diagonal in 0..self.side {
            lines += self.marks[(diagonal, diagonal)].cover_weight();
        }
        lines
    }

    fn mark_column(&mut self, column: usize) {
        for row in 0..self.side {
            self.marks[(row, column)] = self.marks[(row, column)].with_column();
        }
        let owner = self.column_to_row[column];
        if owner != NONE && !self.marks[(owner, 0)].has_row() {
            self.pending_rows.push(owner);
        }
    }

    /// Matches rows to zero cells, most constrained rows first: the candidate
    /// window starts at one open zero per row and widens until every row had
    /// its chance. The window ordering only shapes tie-breaking; augmenting
    /// paths then grow the matching to maximum, which the line cover derived
    /// from it relies on.
    fn seed_matching(&mut self) {
        self.row_to_column.clear();
        self.row_to_column.resize(self.side, NONE);
        self.column_to_row.clear();
        self.column_to_row.resize(self.side, NONE);

        for window in 1..=self.side {
            for row in 0..self.side {
                if self.row_to_column[row] != NONE {
                    continue;
                }
                let mut candidates = 0;
                let mut first_open = NONE;
                for column in 0..self.side {
                    if self.costs[(row, column)] == 0.0 && self.column_to_row[column] == NONE {
                        candidates += 1;
                        if first_open == NONE {
                            first_open = column;
                        }
                    }
                }
                if candidates > 0 && candidates <= window {
                    self.row_to_column[row] = first_open;
                    self.column_to_row[first_open] = row;
                }
            }
        }

        let mut visited = std::mem::take(&mut self.column_visited);
        for row in 0..self.side {
            if self.row_to_column[row] == NONE {
                visited.clear();
                visited.resize(self.side, false);
                self.try_augment(row, &mut visited);
            }
        }
        self.column_visited = visited;
    }

    fn try_augment(&mut self, row: usize, visited: &mut [bool]) -> bool {
        for column in 0..self.side {
            if self.costs[(row, column)] == 0.0 && !visited[column] {
                visited[column] = true;
                let owner = self.column_to_row[column];
                if owner == NONE || self.try_augment(owner, visited) {
                    self.row_to_column[row] = column;
                    self.column_to_row[column] = row;
                    return true;
                }
            }
        }
        false
    }

    /// Moves the minimum over uncovered cells out of the uncovered region and
    /// onto the doubly covered one, manufacturing at least one new zero
    /// outside the covering lines while every covered zero survives.
    fn create_zeros(&mut self) -> Result<(), anyhow::Error> {
        let mut min = f64::INFINITY;
        for row in 0..self.side {
            for column in 0..self.side {
                if self.marks[(row, column)] == Mark::Clear {
                    let value = self.costs[(row, column)];
                    if value < min {
                        min = value;
                    }
                }
            }
        }
        ensure!(
            min.is_finite() && min > 0.0,
            "cover left an uncovered minimum of {}, the line count must be wrong",
            min
        );
        trace!("uncovered minimum: {}", min);
        for row in 0..self.side {
            for column in 0..self.side {
                match self.marks[(row, column)] {
                    Mark::Clear => self.costs[(row, column)] -= min,
                    Mark::Both => self.costs[(row, column)] += min,
                    Mark::Row | Mark::Column => {}
                }
            }
        }
        Ok(())
    }

    /// Depth-first search for a perfect matching over the zero cells, with
    /// the frame stack held in `matched_column`. The line count invariant
    /// guarantees such a matching exists, so running out of candidates on the
    /// first row signals a defect in the phases before it.
    fn extract_matching(&mut self) -> Result<(), anyhow::Error> {
        self.matched_column.clear();
        self.matched_column.resize(self.side, NONE);
        self.column_claimed.clear();
        self.column_claimed.resize(self.side, false);

        let mut row = 0;
        let mut column = 0;
        while row < self.side {
            while column < self.side
                && !(self.costs[(row, column)] == 0.0 && !self.column_claimed[column])
            {
                column += 1;
            }
            if column < self.side {
                self.matched_column[row] = column;
                self.column_claimed[column] = true;
                row += 1;
                column = 0;
            } else {
                ensure!(
                    row > 0,
                    "no zero-cost perfect matching despite a complete line cover"
                );
                row -= 1;
                let claimed = self.matched_column[row];
                debug_assert!(claimed != NONE);
                self.column_claimed[claimed] = false;
                self.matched_column[row] = NONE;
                column = claimed + 1;
            }
        }
        Ok(())
    }
}
