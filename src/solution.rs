use num_traits::{AsPrimitive, FromPrimitive, NumAssign, PrimInt, Unsigned};
use std::fmt::{Debug, Display};

pub trait UnsignedInt:
    PrimInt
    + Unsigned
    + Display
    + Debug
    + AsPrimitive<usize>
    + AsPrimitive<f64>
    + FromPrimitive
    + NumAssign
{
}

impl<I> UnsignedInt for I where
    I: PrimInt
        + Unsigned
        + Display
        + Debug
        + AsPrimitive<usize>
        + AsPrimitive<f64>
        + FromPrimitive
        + NumAssign
{
}

///
/// Solution of the dense linear assignment problem
///
#[derive(Debug, Clone)]
pub struct AssignmentSolution<I>
where
    I: UnsignedInt,
{
    /// index r gives the column assigned to row r, one entry per configured row
    ///
    /// When the problem has fewer columns than rows, a row may be parked on a
    /// padding column (an index at or beyond the configured column count);
    /// callers treat such a row as unassigned.
    pub row_to_column: Vec<I>,
    /// index c gives the row that claimed column c, over the configured columns
    ///
    /// Unclaimed columns are marked by the MAX value of the index type
    /// (u32::MAX for u32)
    pub column_to_row: Vec<I>,
    /// number of rows parked on padding columns
    pub num_unassigned: I,
}

impl<I> AssignmentSolution<I>
where
    I: UnsignedInt,
{
    pub fn new(row_capacity: usize, column_capacity: usize) -> AssignmentSolution<I> {
        AssignmentSolution::<I> {
            row_to_column: Vec::with_capacity(row_capacity),
            column_to_row: Vec::with_capacity(column_capacity),
            num_unassigned: I::max_value(),
        }
    }
}
