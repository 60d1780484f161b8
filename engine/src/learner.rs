//! Base learner capability
//!
//! The tournament never scores anything itself. Every internal node owns an
//! independent binary classifier slot inside a shared base learner, addressed
//! by the node id (the "offset").

use std::cell::{Cell, RefCell};

use cascade_tree::{NodeId, Side};

/// Binary training label handed to a node's classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryLabel {
    /// Prefer the left subtree (-1)
    Left,
    /// Prefer the right subtree (+1)
    Right,
}

impl BinaryLabel {
    /// Numeric label: -1 for left, +1 for right
    pub fn value(self) -> f32 {
        match self {
            BinaryLabel::Left => -1.0,
            BinaryLabel::Right => 1.0,
        }
    }

    /// Branch selected by a raw score: negative goes left, everything else right
    pub fn from_score(score: f32) -> Self {
        if score < 0.0 {
            BinaryLabel::Left
        } else {
            BinaryLabel::Right
        }
    }
}

impl From<Side> for BinaryLabel {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => BinaryLabel::Left,
            Side::Right => BinaryLabel::Right,
        }
    }
}

impl From<BinaryLabel> for Side {
    fn from(label: BinaryLabel) -> Self {
        match label {
            BinaryLabel::Left => Side::Left,
            BinaryLabel::Right => Side::Right,
        }
    }
}

/// Trainable binary scorer with one independent slot per node id
///
/// `predict` takes `&self`: the tournament never changes learner state while
/// predicting. Failures (panics) are not caught by the tournament.
pub trait BaseLearner<E: ?Sized> {
    /// Score `example` with the classifier at `offset`; `< 0` means left
    fn predict(&self, example: &E, offset: NodeId) -> f32;

    /// Train the classifier at `offset` with an importance-weighted label
    fn learn(&mut self, example: &E, label: BinaryLabel, weight: f32, offset: NodeId);
}

/// One recorded `learn` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearnCall {
    pub offset: NodeId,
    pub label: BinaryLabel,
    pub weight: f32,
}

/// Learner that replays a fixed score sequence and records every call.
///
/// Scores are handed out in order regardless of offset or example. Asking
/// for more scores than were scripted panics, so surplus predictions show up
/// immediately in tests.
#[derive(Debug, Default)]
pub struct ScriptedLearner {
    scores: Vec<f32>,
    cursor: Cell<usize>,
    predicted: RefCell<Vec<NodeId>>,
    learned: Vec<LearnCall>,
}

impl ScriptedLearner {
    pub fn new(scores: Vec<f32>) -> Self {
        ScriptedLearner {
            scores,
            ..Default::default()
        }
    }

    /// Offsets passed to `predict`, in call order
    pub fn predicted_offsets(&self) -> Vec<NodeId> {
        self.predicted.borrow().clone()
    }

    /// Every `learn` call, in call order
    pub fn learned(&self) -> &[LearnCall] {
        &self.learned
    }

    pub fn learned_offsets(&self) -> Vec<NodeId> {
        self.learned.iter().map(|c| c.offset).collect()
    }

    pub fn learned_labels(&self) -> Vec<f32> {
        self.learned.iter().map(|c| c.label.value()).collect()
    }

    pub fn learned_weights(&self) -> Vec<f32> {
        self.learned.iter().map(|c| c.weight).collect()
    }

    /// Scores not consumed yet
    pub fn remaining(&self) -> usize {
        self.scores.len() - self.cursor.get()
    }
}

impl<E: ?Sized> BaseLearner<E> for ScriptedLearner {
    fn predict(&self, _example: &E, offset: NodeId) -> f32 {
        let idx = self.cursor.get();
        let score = *self
            .scores
            .get(idx)
            .unwrap_or_else(|| panic!("scripted learner ran out of scores at offset {}", offset));
        self.cursor.set(idx + 1);
        self.predicted.borrow_mut().push(offset);
        score
    }

    fn learn(&mut self, _example: &E, label: BinaryLabel, weight: f32, offset: NodeId) {
        self.learned.push(LearnCall { offset, label, weight });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_values() {
        assert_eq!(BinaryLabel::Left.value(), -1.0);
        assert_eq!(BinaryLabel::Right.value(), 1.0);
    }

    #[test]
    fn test_from_score_zero_routes_right() {
        assert_eq!(BinaryLabel::from_score(-0.25), BinaryLabel::Left);
        assert_eq!(BinaryLabel::from_score(0.0), BinaryLabel::Right);
        assert_eq!(BinaryLabel::from_score(3.0), BinaryLabel::Right);
    }

    #[test]
    fn test_side_round_trip() {
        for side in [Side::Left, Side::Right] {
            assert_eq!(Side::from(BinaryLabel::from(side)), side);
        }
    }

    #[test]
    fn test_scripted_learner_replays_in_order() {
        let mut learner = ScriptedLearner::new(vec![1.0, -1.0]);
        assert_eq!(BaseLearner::<()>::predict(&learner, &(), 4), 1.0);
        assert_eq!(BaseLearner::<()>::predict(&learner, &(), 0), -1.0);
        assert_eq!(learner.remaining(), 0);
        assert_eq!(learner.predicted_offsets(), vec![4, 0]);

        BaseLearner::<()>::learn(&mut learner, &(), BinaryLabel::Left, 2.0, 1);
        assert_eq!(learner.learned_offsets(), vec![1]);
        assert_eq!(learner.learned_labels(), vec![-1.0]);
        assert_eq!(learner.learned_weights(), vec![2.0]);
    }

    #[test]
    #[should_panic(expected = "ran out of scores")]
    fn test_scripted_learner_panics_when_exhausted() {
        let learner = ScriptedLearner::new(Vec::new());
        BaseLearner::<()>::predict(&learner, &(), 0);
    }
}
