//! Output tensor layout detection.
//!
//! Detection classifies the two trailing dimensions of the output tensor
//! and never reads the data buffer. With a configured class count the
//! expected channel widths (`4 + classes` channel-major, `5 + classes`
//! row-major) are matched exactly, with a transposed channel-major
//! fallback for prediction-first exports without an objectness term.
//! Without a configured count the layout and class count are inferred
//! from the shape alone.
//!
//! The heuristic is an approximation, not a guaranteed-correct
//! algorithm: a prediction axis shorter than the 500-element channel
//! threshold (very low-resolution exports) or a head wider than 1004
//! channels can defeat it. Callers with such models should configure the
//! class count and take the deterministic path instead.

use crate::tensor::TensorView;
use crate::trace::trace_event;
use crate::util::{YoloParseError, YoloParseResult};

/// Dimension threshold separating channel axes from prediction axes.
///
/// Heads rarely exceed a few hundred channels while prediction counts
/// scale with input resolution into the thousands.
const CHANNEL_THRESHOLD: usize = 500;

/// Largest class count considered plausible when inferred from shape.
const MAX_PLAUSIBLE_CLASSES: usize = 1000;

/// Resolved layout of a detector output tensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TensorLayout {
    /// `[4 + classes, predictions]`: box and class channels are parallel
    /// strided arrays; confidence is the best class score.
    ChannelMajor { num_classes: usize },
    /// `[predictions, 5 + classes]`: each prediction is a contiguous row
    /// with an objectness term at index 4.
    RowMajor { num_classes: usize },
    /// `[predictions, 4 + classes]`: channel-major data stored
    /// prediction-first; decoded channel-major after a transpose.
    TransposedChannelMajor { num_classes: usize },
}

impl TensorLayout {
    /// Number of classes implied by the layout.
    pub fn num_classes(&self) -> usize {
        match *self {
            TensorLayout::ChannelMajor { num_classes }
            | TensorLayout::RowMajor { num_classes }
            | TensorLayout::TransposedChannelMajor { num_classes } => num_classes,
        }
    }
}

/// Determines the layout of `view` from its shape.
///
/// `num_classes` switches between deterministic matching (count known
/// from configuration) and shape-only inference.
pub fn detect_layout(
    view: &TensorView<'_>,
    num_classes: Option<usize>,
) -> YoloParseResult<TensorLayout> {
    let (dim0, dim1) = (view.dim0(), view.dim1());
    let layout = match num_classes {
        Some(classes) => detect_known(dim0, dim1, classes)?,
        None => detect_heuristic(dim0, dim1)?,
    };
    trace_event!(
        "layout_resolved",
        dim0 = dim0,
        dim1 = dim1,
        classes = layout.num_classes()
    );
    Ok(layout)
}

fn detect_known(dim0: usize, dim1: usize, classes: usize) -> YoloParseResult<TensorLayout> {
    if dim0 == 4 + classes {
        Ok(TensorLayout::ChannelMajor {
            num_classes: classes,
        })
    } else if dim1 == 5 + classes {
        Ok(TensorLayout::RowMajor {
            num_classes: classes,
        })
    } else if dim1 == 4 + classes {
        Ok(TensorLayout::TransposedChannelMajor {
            num_classes: classes,
        })
    } else {
        Err(YoloParseError::ShapeMismatch {
            dim0,
            dim1,
            num_classes: classes,
        })
    }
}

/// Class count implied by a channel axis, if plausible.
fn plausible_classes(channels: usize, box_terms: usize) -> Option<usize> {
    channels
        .checked_sub(box_terms)
        .filter(|classes| (1..=MAX_PLAUSIBLE_CLASSES).contains(classes))
}

fn detect_heuristic(dim0: usize, dim1: usize) -> YoloParseResult<TensorLayout> {
    let dim0_small = dim0 < CHANNEL_THRESHOLD;
    let dim1_small = dim1 < CHANNEL_THRESHOLD;

    // When exactly one dimension is below the threshold it is the
    // channel axis; otherwise the smaller dimension is assumed to be
    // channels.
    let channels_first = match (dim0_small, dim1_small) {
        (true, false) => true,
        (false, true) => false,
        _ => dim0 <= dim1,
    };

    // Validate the implied class count; flip to the other layout once if
    // it is implausible.
    if channels_first {
        if let Some(num_classes) = plausible_classes(dim0, 4) {
            return Ok(TensorLayout::ChannelMajor { num_classes });
        }
        if let Some(num_classes) = plausible_classes(dim1, 5) {
            return Ok(TensorLayout::RowMajor { num_classes });
        }
    } else {
        if let Some(num_classes) = plausible_classes(dim1, 5) {
            return Ok(TensorLayout::RowMajor { num_classes });
        }
        if let Some(num_classes) = plausible_classes(dim0, 4) {
            return Ok(TensorLayout::ChannelMajor { num_classes });
        }
    }

    Err(YoloParseError::LayoutResolution { dim0, dim1 })
}
