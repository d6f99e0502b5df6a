//! Candidate decoding from raw output tensors.
//!
//! Both supported layouts decode through one loop over a
//! `PredictionSource`: the accessor hides strided-channel versus
//! contiguous-row addressing, and the presence of an objectness term
//! selects the confidence composition: objectness × best class score
//! when present, the best class score alone when not.

use crate::candidate::Candidate;
use crate::tensor::TensorView;

/// Candidate storage reserved ahead of the decode loop.
const CANDIDATE_RESERVE: usize = 1000;

/// Uniform access to per-prediction box and score terms.
pub(crate) trait PredictionSource {
    fn num_predictions(&self) -> usize;

    fn num_classes(&self) -> usize;

    /// Box center and size `[cx, cy, w, h]` in network-input pixels.
    fn bbox(&self, p: usize) -> [f32; 4];

    /// Objectness term, when the layout carries one.
    fn objectness(&self, p: usize) -> Option<f32>;

    fn class_score(&self, p: usize, class: usize) -> f32;
}

/// Channel-major accessor: channel `c` of prediction `p` is at `(c, p)`.
///
/// Channels 0..3 are the box terms, channels 4.. are per-class scores;
/// there is no objectness term.
pub(crate) struct ChannelMajor<'a> {
    view: TensorView<'a>,
    num_classes: usize,
}

impl<'a> ChannelMajor<'a> {
    pub(crate) fn new(view: TensorView<'a>, num_classes: usize) -> Self {
        Self { view, num_classes }
    }
}

impl PredictionSource for ChannelMajor<'_> {
    fn num_predictions(&self) -> usize {
        self.view.dim1()
    }

    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn bbox(&self, p: usize) -> [f32; 4] {
        [
            self.view.at(0, p),
            self.view.at(1, p),
            self.view.at(2, p),
            self.view.at(3, p),
        ]
    }

    fn objectness(&self, _p: usize) -> Option<f32> {
        None
    }

    fn class_score(&self, p: usize, class: usize) -> f32 {
        self.view.at(4 + class, p)
    }
}

/// Row-major accessor: prediction `p` is the contiguous row
/// `[cx, cy, w, h, objectness, class scores...]`.
pub(crate) struct RowMajor<'a> {
    view: TensorView<'a>,
    num_classes: usize,
}

impl<'a> RowMajor<'a> {
    pub(crate) fn new(view: TensorView<'a>, num_classes: usize) -> Self {
        Self { view, num_classes }
    }
}

impl PredictionSource for RowMajor<'_> {
    fn num_predictions(&self) -> usize {
        self.view.dim0()
    }

    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn bbox(&self, p: usize) -> [f32; 4] {
        let row = self.view.row(p);
        [row[0], row[1], row[2], row[3]]
    }

    fn objectness(&self, p: usize) -> Option<f32> {
        Some(self.view.row(p)[4])
    }

    fn class_score(&self, p: usize, class: usize) -> f32 {
        self.view.row(p)[5 + class]
    }
}

/// Decodes every prediction whose confidence reaches `confidence_threshold`.
pub(crate) fn decode_candidates<S: PredictionSource>(
    source: &S,
    confidence_threshold: f32,
) -> Vec<Candidate> {
    let mut candidates = Vec::with_capacity(CANDIDATE_RESERVE.min(source.num_predictions()));

    for p in 0..source.num_predictions() {
        let objectness = source.objectness(p);
        // A low objectness rejects the prediction before the class scan.
        if matches!(objectness, Some(o) if o < confidence_threshold) {
            continue;
        }

        let mut best_score = 0.0f32;
        let mut best_class = 0usize;
        for class in 0..source.num_classes() {
            let score = source.class_score(p, class);
            if score > best_score {
                best_score = score;
                best_class = class;
            }
        }

        let confidence = match objectness {
            Some(objectness) => objectness * best_score,
            None => best_score,
        };
        if confidence < confidence_threshold {
            continue;
        }

        let [cx, cy, width, height] = source.bbox(p);
        candidates.push(Candidate {
            cx,
            cy,
            width,
            height,
            confidence,
            class_id: best_class,
        });
    }

    candidates
}
