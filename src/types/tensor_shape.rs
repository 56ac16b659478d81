//! The logical arrangement of tensor samples within one pixel.
//!
//! Ported from the teacher's `LayoutOrder` enum (`types/tensor.rs`), which
//! distinguishes row-major from column-major layout for its 2-D tensors;
//! generalized here to the full set of pixel-tensor shapes a forged image
//! can carry (spec §3.1).

use crate::error::PfError;

/// Logical arrangement of the `t` tensor samples making up one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorShape {
    Scalar,
    ColumnVector,
    RowVector,
    Matrix { rows: usize, cols: usize },
    Diagonal { side: usize },
    SymmetricPacked { side: usize },
    UpperTriangular { side: usize },
    LowerTriangular { side: usize },
}

impl TensorShape {
    /// Number of stored tensor elements `t` implied by this shape.
    pub fn element_count(&self) -> usize {
        match *self {
            TensorShape::Scalar => 1,
            TensorShape::ColumnVector | TensorShape::RowVector => 0, // caller supplies length separately
            TensorShape::Matrix { rows, cols } => rows * cols,
            TensorShape::Diagonal { side } => side,
            TensorShape::SymmetricPacked { side } => side * (side + 1) / 2,
            TensorShape::UpperTriangular { side } | TensorShape::LowerTriangular { side } => {
                side * (side + 1) / 2
            }
        }
    }

    /// Vector shapes carry their length externally (as `t`); this computes
    /// the element count given that length, erroring for shapes where `t`
    /// must instead match the shape-implied count exactly.
    pub fn element_count_for(&self, t: usize) -> Result<usize, PfError> {
        match *self {
            TensorShape::ColumnVector | TensorShape::RowVector => Ok(t),
            other => {
                let expected = other.element_count();
                if expected == t {
                    Ok(t)
                } else {
                    Err(PfError::WrongDataType(format!(
                        "tensor shape {other:?} implies {expected} elements, got t={t}"
                    )))
                }
            }
        }
    }

    pub fn rows_cols(&self, t: usize) -> (usize, usize) {
        match *self {
            TensorShape::Scalar => (1, 1),
            TensorShape::ColumnVector => (t, 1),
            TensorShape::RowVector => (1, t),
            TensorShape::Matrix { rows, cols } => (rows, cols),
            TensorShape::Diagonal { side }
            | TensorShape::SymmetricPacked { side }
            | TensorShape::UpperTriangular { side }
            | TensorShape::LowerTriangular { side } => (side, side),
        }
    }

    /// True for shapes whose packed storage differs from plain row-major
    /// full-matrix storage; these must go through `expand_tensor` before
    /// generic matrix arithmetic can address them element-by-element.
    pub fn is_packed(&self) -> bool {
        matches!(
            self,
            TensorShape::Diagonal { .. }
                | TensorShape::SymmetricPacked { .. }
                | TensorShape::UpperTriangular { .. }
                | TensorShape::LowerTriangular { .. }
        )
    }

    /// Maps a packed-tensor stored index back to a `(row, col)` position in
    /// the logical full matrix, used by `expand_tensor`.
    pub fn packed_index_to_rc(&self, stored_index: usize) -> (usize, usize) {
        match *self {
            TensorShape::Diagonal { .. } => (stored_index, stored_index),
            TensorShape::SymmetricPacked { side } | TensorShape::UpperTriangular { side } => {
                // Column-wise packing of the upper triangle (matches DIPlib's
                // symmetric tensor storage order: diagonal first, then
                // above-diagonal elements column by column).
                let mut remaining = stored_index;
                if remaining < side {
                    return (remaining, remaining);
                }
                remaining -= side;
                let mut col = 1usize;
                loop {
                    if remaining < col {
                        let row = remaining;
                        return (row, col);
                    }
                    remaining -= col;
                    col += 1;
                }
            }
            TensorShape::LowerTriangular { side } => {
                let (r, c) = TensorShape::UpperTriangular { side }.packed_index_to_rc(stored_index);
                (c, r)
            }
            _ => (0, 0),
        }
    }
}
