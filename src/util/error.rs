//! Error types for yoloparse.

use thiserror::Error;

/// Result alias for yoloparse operations.
pub type YoloParseResult<T> = std::result::Result<T, YoloParseError>;

/// Errors that can occur while parsing a detector output tensor.
///
/// Every failure is a pure function of the call inputs: the pipeline
/// holds no state, so retrying with the same tensor yields the same
/// error. An `Err` never carries partial output.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum YoloParseError {
    /// The caller supplied no output layers.
    #[error("no output layers provided")]
    EmptyInput,
    /// The tensor rank is neither 2 nor 3.
    #[error("unsupported tensor rank {rank}, expected 2 or 3")]
    UnsupportedRank { rank: usize },
    /// The buffer is shorter than the shape implies.
    #[error("tensor buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// With a configured class count, neither expected shape matched.
    #[error(
        "tensor shape [{dim0}, {dim1}] matches no supported layout for {num_classes} classes"
    )]
    ShapeMismatch {
        dim0: usize,
        dim1: usize,
        num_classes: usize,
    },
    /// The shape yields no plausible class count under either layout.
    #[error("cannot resolve layout of tensor shape [{dim0}, {dim1}]: no plausible class count")]
    LayoutResolution { dim0: usize, dim1: usize },
}
