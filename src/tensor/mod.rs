//! Tensor views over raw detector output buffers.
//!
//! `TensorView` is a borrowed 2D view into a contiguous row-major f32
//! buffer: element `(i, j)` lives at `i * dim1 + j`. Construction
//! validates the buffer length against the shape so that decode loops
//! never index past the buffer. A rank-3 shape is accepted by dropping
//! the leading dimension (the batch axis of a batched export); only the
//! first batch is ever decoded.

use crate::util::{YoloParseError, YoloParseResult};

/// Borrowed 2D view into a row-major f32 buffer.
#[derive(Copy, Clone)]
pub struct TensorView<'a> {
    data: &'a [f32],
    dim0: usize,
    dim1: usize,
}

impl<'a> TensorView<'a> {
    /// Creates a view from a buffer and a rank-2 or rank-3 shape.
    pub fn from_dims(data: &'a [f32], dims: &[usize]) -> YoloParseResult<Self> {
        let (dim0, dim1) = match *dims {
            [dim0, dim1] => (dim0, dim1),
            [_, dim0, dim1] => (dim0, dim1),
            _ => return Err(YoloParseError::UnsupportedRank { rank: dims.len() }),
        };
        Self::new(data, dim0, dim1)
    }

    /// Creates a rank-2 view.
    pub fn new(data: &'a [f32], dim0: usize, dim1: usize) -> YoloParseResult<Self> {
        let needed = dim0.saturating_mul(dim1);
        if data.len() < needed {
            return Err(YoloParseError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self { data, dim0, dim1 })
    }

    /// Returns the leading dimension.
    pub fn dim0(&self) -> usize {
        self.dim0
    }

    /// Returns the trailing dimension.
    pub fn dim1(&self) -> usize {
        self.dim1
    }

    /// Returns the element at `(i, j)`.
    #[inline]
    pub fn at(&self, i: usize, j: usize) -> f32 {
        debug_assert!(i < self.dim0 && j < self.dim1);
        self.data[i * self.dim1 + j]
    }

    /// Returns the contiguous row `i` with length `dim1`.
    #[inline]
    pub fn row(&self, i: usize) -> &'a [f32] {
        debug_assert!(i < self.dim0);
        &self.data[i * self.dim1..(i + 1) * self.dim1]
    }

    /// Materializes the transposed tensor into an owned buffer.
    ///
    /// The result is the scratch storage for the transposed-layout
    /// fallback; it lives for one call and is never cached.
    pub fn transposed(&self) -> Vec<f32> {
        let mut out = vec![0.0f32; self.dim0 * self.dim1];
        for i in 0..self.dim0 {
            for j in 0..self.dim1 {
                out[j * self.dim0 + i] = self.at(i, j);
            }
        }
        out
    }
}
