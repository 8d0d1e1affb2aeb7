use crate::grid::SquareGrid;
use crate::solution::{AssignmentSolution, UnsignedInt};
use anyhow;
use anyhow::Result;

/// Common surface of dense assignment solvers.
///
/// A solver is configured once with `init`, populated cell by cell with
/// `set_value` and run with `solve`. The instance keeps its buffers between
/// calls, so reconfiguring it for a new problem reuses memory instead of
/// allocating.
pub trait AssignmentSolver<I: UnsignedInt> {
    /// Creates a solver together with a reusable solution sized for problems
    /// of up to `row_capacity` × `column_capacity`.
    fn new(row_capacity: usize, column_capacity: usize) -> (Self, AssignmentSolution<I>)
    where
        Self: Sized;

    fn num_rows(&self) -> I;
    fn num_cols(&self) -> I;

    /// Caller-supplied costs, zero-padded to a square grid.
    fn original_values(&self) -> &SquareGrid<f64>;

    /// Declares the problem dimensions. Must precede `set_value` and `solve`;
    /// clears the internal buffers without shrinking them.
    fn init(&mut self, num_rows: I, num_cols: I) -> Result<(), anyhow::Error>;

    /// Stores the cost of assigning `row` to `column`. Rejects cells outside
    /// the configured dimensions and non-finite costs.
    fn set_value(&mut self, row: I, column: I, value: f64) -> Result<(), anyhow::Error>;

    /// Runs the solver to completion and writes the assignment into
    /// `solution`. Deterministic: solving the same populated instance twice
    /// yields the same assignment.
    fn solve(&mut self, solution: &mut AssignmentSolution<I>) -> Result<(), anyhow::Error>;

    /// Total cost of `solution` in terms of the caller-supplied values.
    /// Rows parked on padding columns contribute nothing. Returns 0 for an
    /// empty problem.
    fn get_objective(&self, solution: &AssignmentSolution<I>) -> f64 {
        let originals = self.original_values();
        let mut objective = 0.;
        for (row, column_ref) in solution.row_to_column.iter().enumerate() {
            let column: usize = (*column_ref).as_();
            objective += originals[(row, column)];
        }
        objective
    }

    /// Objective averaged over the configured rows; 0 for an empty problem.
    fn get_average_objective(&self, solution: &AssignmentSolution<I>) -> f64 {
        if solution.row_to_column.is_empty() {
            return 0.;
        }
        self.get_objective(solution) / solution.row_to_column.len() as f64
    }
}
