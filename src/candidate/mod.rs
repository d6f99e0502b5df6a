//! Detection candidates and overlap scoring.
//!
//! Candidates carry center-size boxes in network-input pixel space;
//! conversion to corner form happens in the finalizer, after
//! suppression.

pub mod nms;

/// Candidate detection produced by the decoder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Box center x in pixels.
    pub cx: f32,
    /// Box center y in pixels.
    pub cy: f32,
    /// Box width in pixels.
    pub width: f32,
    /// Box height in pixels.
    pub height: f32,
    /// Final confidence in `[0, 1]`.
    pub confidence: f32,
    /// Class index in `[0, num_classes)`.
    pub class_id: usize,
}

impl Candidate {
    /// Corner coordinates `(left, top, right, bottom)`.
    fn corners(&self) -> (f32, f32, f32, f32) {
        (
            self.cx - self.width / 2.0,
            self.cy - self.height / 2.0,
            self.cx + self.width / 2.0,
            self.cy + self.height / 2.0,
        )
    }
}

/// Intersection-over-union of two candidates.
///
/// Defined as 0 when the union area is not positive.
pub fn iou(a: &Candidate, b: &Candidate) -> f32 {
    let (a_left, a_top, a_right, a_bottom) = a.corners();
    let (b_left, b_top, b_right, b_bottom) = b.corners();

    let inter_width = (a_right.min(b_right) - a_left.max(b_left)).max(0.0);
    let inter_height = (a_bottom.min(b_bottom) - a_top.max(b_top)).max(0.0);
    let inter_area = inter_width * inter_height;

    let union_area = a.width * a.height + b.width * b.height - inter_area;
    if union_area > 0.0 {
        inter_area / union_area
    } else {
        0.0
    }
}

/// Stable sort by descending confidence.
///
/// Equal confidences keep their decode order, which makes suppression
/// priority deterministic.
pub(crate) fn sort_candidates_desc(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
}

#[cfg(test)]
mod tests {
    use super::{iou, Candidate};

    fn candidate(cx: f32, cy: f32, width: f32, height: f32) -> Candidate {
        Candidate {
            cx,
            cy,
            width,
            height,
            confidence: 1.0,
            class_id: 0,
        }
    }

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let a = candidate(100.0, 100.0, 50.0, 50.0);
        assert!((iou(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        let a = candidate(50.0, 50.0, 20.0, 20.0);
        let b = candidate(200.0, 200.0, 20.0, 20.0);
        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn iou_of_zero_area_boxes_is_zero() {
        let a = candidate(50.0, 50.0, 0.0, 0.0);
        assert_eq!(iou(&a, &a), 0.0);
    }

    #[test]
    fn iou_matches_hand_computed_overlap() {
        // (75..125)² and (80..130)×(75..125): inter 45×50, union 2750.
        let a = candidate(100.0, 100.0, 50.0, 50.0);
        let b = candidate(105.0, 100.0, 50.0, 50.0);
        assert!((iou(&a, &b) - 2250.0 / 2750.0).abs() < 1e-6);
    }
}
