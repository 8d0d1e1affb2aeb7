//! Solver for the dense linear assignment problem based on the Hungarian
//! algorithm.
//!
//! Given an n×m cost matrix the solver finds a one-to-one assignment of rows
//! to distinct columns with minimal (or, optionally, maximal) total cost.
//! Rectangular problems are padded internally with zero-cost cells; rows
//! parked on padding columns count as unassigned.
//!
//! A solver instance owns its working buffers and reuses them across calls,
//! so it can be reconfigured for a stream of problems without allocating.
//! Instances are not thread-safe; use one per thread.
//!
//! ```
//! use dense_linear_assignment::{AssignmentSolver, HungarianSolver};
//!
//! # fn main() -> Result<(), anyhow::Error> {
//! let costs = [[1., 2., 3.], [5., 1., 7.], [1., 1., 0.]];
//! let (mut solver, mut solution) = HungarianSolver::<u32>::new(3, 3);
//! solver.init(3, 3)?;
//! for (row, row_costs) in costs.iter().enumerate() {
//!     for (column, value) in row_costs.iter().enumerate() {
//!         solver.set_value(row as u32, column as u32, *value)?;
//!     }
//! }
//! solver.solve(&mut solution)?;
//! assert_eq!(solution.row_to_column, vec![0, 1, 2]);
//! assert_eq!(solver.get_objective(&solution), 2.0);
//! # Ok(())
//! # }
//! ```

pub mod grid;
pub mod hungarian;
pub mod solution;
pub mod solver;

pub use crate::hungarian::HungarianSolver;
pub use crate::solution::{AssignmentSolution, UnsignedInt};
pub use crate::solver::AssignmentSolver;
