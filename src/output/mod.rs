//! Final output boxes in clamped corner form.

use crate::candidate::Candidate;

/// Network input resolution in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetworkDims {
    /// Input width in pixels.
    pub width: u32,
    /// Input height in pixels.
    pub height: u32,
}

/// Detection record emitted across the output boundary.
///
/// The box is corner-format and clamped to the network frame: `left` and
/// `top` lie in `[0, net − 1]`, `width` and `height` are at least one
/// pixel and never reach past the frame edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutputBox {
    /// Left edge in pixels.
    pub left: f32,
    /// Top edge in pixels.
    pub top: f32,
    /// Box width in pixels.
    pub width: f32,
    /// Box height in pixels.
    pub height: f32,
    /// Confidence carried over from the candidate.
    pub confidence: f32,
    /// Class index carried over from the candidate.
    pub class_id: usize,
}

// min-then-max: the lower bound wins when the range is empty.
fn clamp(value: f32, lo: f32, hi: f32) -> f32 {
    value.min(hi).max(lo)
}

/// Converts surviving candidates to clamped corner-format boxes.
pub fn finalize_boxes(candidates: &[Candidate], network: NetworkDims) -> Vec<OutputBox> {
    let net_width = network.width as f32;
    let net_height = network.height as f32;

    candidates
        .iter()
        .map(|candidate| {
            let left = clamp(candidate.cx - candidate.width / 2.0, 0.0, net_width - 1.0);
            let top = clamp(candidate.cy - candidate.height / 2.0, 0.0, net_height - 1.0);
            OutputBox {
                left,
                top,
                width: clamp(candidate.width, 1.0, net_width - left),
                height: clamp(candidate.height, 1.0, net_height - top),
                confidence: candidate.confidence,
                class_id: candidate.class_id,
            }
        })
        .collect()
}
