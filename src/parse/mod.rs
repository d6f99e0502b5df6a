//! Entry points and the host call contract.
//!
//! A parse call is a straight line through the pipeline: resolve the
//! tensor layout, decode candidates above the confidence threshold,
//! suppress same-class overlaps, and emit clamped corner-format boxes.
//! The call consumes exactly the first supplied output layer; additional
//! layers are ignored, and an empty layer slice fails immediately.
//!
//! [`parse_yolo`] detects the layout from the tensor shape. Callers that
//! already know their model's export format can pin it with
//! [`parse_yolov5`] (row-major with objectness) or [`parse_yolov8`]
//! (channel-major); [`parse_yolo11`] is an alias of the latter since
//! that export revision shares the same tensor layout.

use crate::candidate::nms::nms_class_aware;
use crate::candidate::Candidate;
use crate::decode::{decode_candidates, ChannelMajor, RowMajor};
use crate::layout::{detect_layout, TensorLayout};
use crate::output::{finalize_boxes, NetworkDims, OutputBox};
use crate::tensor::TensorView;
use crate::trace::{trace_event, trace_span};
use crate::util::{YoloParseError, YoloParseResult};

/// Detection thresholds and bounds.
///
/// Defaults live here and nowhere else.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectionParams {
    /// Minimum confidence for a candidate to survive decoding.
    pub confidence_threshold: f32,
    /// IoU above which a lower-confidence same-class candidate is
    /// suppressed.
    pub iou_threshold: f32,
    /// Upper bound on the number of output boxes.
    pub max_detections: usize,
    /// Configured class count. When present, layout detection matches
    /// the expected channel widths exactly; when absent, layout and
    /// class count are inferred from the tensor shape.
    pub num_classes: Option<usize>,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.25,
            iou_threshold: 0.45,
            max_detections: 300,
            num_classes: None,
        }
    }
}

/// One named output tensor produced by the inference engine.
///
/// The buffer is borrowed for the duration of a single parse call and
/// never retained.
#[derive(Clone, Copy, Debug)]
pub struct OutputLayer<'a> {
    /// Layer name, used for diagnostics only.
    pub name: &'a str,
    /// Contiguous row-major f32 buffer.
    pub data: &'a [f32],
    /// Shape descriptor of rank 2 or 3.
    pub dims: &'a [usize],
}

/// Parses the first output layer, detecting the tensor layout from its
/// shape.
pub fn parse_yolo(
    layers: &[OutputLayer<'_>],
    network: NetworkDims,
    params: &DetectionParams,
) -> YoloParseResult<Vec<OutputBox>> {
    let layer = layers.first().ok_or(YoloParseError::EmptyInput)?;
    let _span = trace_span!("parse_yolo", layer = layer.name).entered();

    let view = TensorView::from_dims(layer.data, layer.dims)?;
    let layout = detect_layout(&view, params.num_classes)?;

    let candidates = match layout {
        TensorLayout::ChannelMajor { num_classes } => decode_candidates(
            &ChannelMajor::new(view, num_classes),
            params.confidence_threshold,
        ),
        TensorLayout::RowMajor { num_classes } => decode_candidates(
            &RowMajor::new(view, num_classes),
            params.confidence_threshold,
        ),
        TensorLayout::TransposedChannelMajor { num_classes } => {
            // Scratch copy lives for this call only.
            let scratch = view.transposed();
            let transposed = TensorView::new(&scratch, view.dim1(), view.dim0())?;
            decode_candidates(
                &ChannelMajor::new(transposed, num_classes),
                params.confidence_threshold,
            )
        }
    };

    suppress_and_finalize(candidates, network, params)
}

/// Parses the first layer as a row-major `[predictions, 5 + classes]`
/// tensor (exports with an explicit objectness term).
///
/// The class count is taken from the tensor shape, so any head width
/// works regardless of the configured count.
pub fn parse_yolov5(
    layers: &[OutputLayer<'_>],
    network: NetworkDims,
    params: &DetectionParams,
) -> YoloParseResult<Vec<OutputBox>> {
    let layer = layers.first().ok_or(YoloParseError::EmptyInput)?;
    let _span = trace_span!("parse_yolov5", layer = layer.name).entered();

    let view = TensorView::from_dims(layer.data, layer.dims)?;
    let num_classes = view.dim1().checked_sub(5).filter(|&classes| classes > 0).ok_or(
        YoloParseError::LayoutResolution {
            dim0: view.dim0(),
            dim1: view.dim1(),
        },
    )?;

    let candidates = decode_candidates(
        &RowMajor::new(view, num_classes),
        params.confidence_threshold,
    );
    suppress_and_finalize(candidates, network, params)
}

/// Parses the first layer as a channel-major `[4 + classes, predictions]`
/// tensor (exports without an objectness term).
///
/// The class count is taken from the tensor shape, so any head width
/// works regardless of the configured count.
pub fn parse_yolov8(
    layers: &[OutputLayer<'_>],
    network: NetworkDims,
    params: &DetectionParams,
) -> YoloParseResult<Vec<OutputBox>> {
    let layer = layers.first().ok_or(YoloParseError::EmptyInput)?;
    let _span = trace_span!("parse_yolov8", layer = layer.name).entered();

    let view = TensorView::from_dims(layer.data, layer.dims)?;
    let num_classes = view.dim0().checked_sub(4).filter(|&classes| classes > 0).ok_or(
        YoloParseError::LayoutResolution {
            dim0: view.dim0(),
            dim1: view.dim1(),
        },
    )?;

    let candidates = decode_candidates(
        &ChannelMajor::new(view, num_classes),
        params.confidence_threshold,
    );
    suppress_and_finalize(candidates, network, params)
}

/// Alias of [`parse_yolov8`]: the newer export revision shares the same
/// channel-major tensor layout.
pub fn parse_yolo11(
    layers: &[OutputLayer<'_>],
    network: NetworkDims,
    params: &DetectionParams,
) -> YoloParseResult<Vec<OutputBox>> {
    parse_yolov8(layers, network, params)
}

fn suppress_and_finalize(
    mut candidates: Vec<Candidate>,
    network: NetworkDims,
    params: &DetectionParams,
) -> YoloParseResult<Vec<OutputBox>> {
    trace_event!("candidates_decoded", count = candidates.len());
    let kept = nms_class_aware(&mut candidates, params.iou_threshold, params.max_detections);
    trace_event!("candidates_kept", count = kept.len());
    Ok(finalize_boxes(&kept, network))
}
