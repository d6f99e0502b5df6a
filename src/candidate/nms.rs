//! Class-aware non-maximum suppression.

use crate::candidate::{iou, sort_candidates_desc, Candidate};

/// Applies greedy class-aware NMS bounded by `max_detections`.
///
/// Candidates are stable-sorted by descending confidence and accepted
/// greedily; each accepted candidate suppresses later candidates of the
/// same class whose IoU with it exceeds `iou_threshold`. The result
/// preserves the descending order and holds at most `max_detections`
/// entries.
pub fn nms_class_aware(
    candidates: &mut [Candidate],
    iou_threshold: f32,
    max_detections: usize,
) -> Vec<Candidate> {
    sort_candidates_desc(candidates);

    let mut kept = Vec::with_capacity(max_detections.min(candidates.len()));
    let mut suppressed = vec![false; candidates.len()];

    for i in 0..candidates.len() {
        if kept.len() >= max_detections {
            break;
        }
        if suppressed[i] {
            continue;
        }
        kept.push(candidates[i]);

        for j in (i + 1)..candidates.len() {
            if suppressed[j] || candidates[j].class_id != candidates[i].class_id {
                continue;
            }
            if iou(&candidates[i], &candidates[j]) > iou_threshold {
                suppressed[j] = true;
            }
        }
    }

    kept
}
