//! Classifier hand-off seam.
//!
//! The digit classifier itself is an external collaborator: a
//! pre-trained model loaded from a persisted artifact. This module
//! defines the boundary only: the input is the flattened 784-length
//! vector produced by the normalizer, the output a single digit label.

use crate::normalize::{NormalizedBitmap, VECTOR_LEN};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors at the classifier boundary.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The model artifact is missing. A startup precondition, checked
    /// before the control loop is entered rather than asserted inside
    /// it.
    #[error("model file does not exist: {0}")]
    ModelMissing(PathBuf),
    #[error("inference failed: {0}")]
    Inference(String),
}

/// Trait for digit classifiers.
///
/// Implementations receive the row-major flattened bitmap and return
/// the predicted digit label.
pub trait Classifier {
    /// Predicts the digit on a normalized bitmap.
    fn predict(&self, input: &[u8; VECTOR_LEN]) -> Result<u8, ClassifyError>;

    /// Convenience wrapper taking the bitmap directly.
    fn predict_bitmap(&self, bitmap: &NormalizedBitmap) -> Result<u8, ClassifyError> {
        self.predict(bitmap.as_vector())
    }
}

/// Verifies the model artifact exists before the control loop starts.
pub fn model_preconditions(path: impl AsRef<Path>) -> Result<(), ClassifyError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ClassifyError::ModelMissing(path.to_path_buf()));
    }
    Ok(())
}

/// Test double that always predicts a fixed label.
#[derive(Debug, Clone)]
pub struct FixedClassifier {
    label: u8,
}

impl FixedClassifier {
    /// Creates a classifier that always answers `label`.
    pub fn new(label: u8) -> Self {
        Self { label }
    }
}

impl Classifier for FixedClassifier {
    fn predict(&self, _input: &[u8; VECTOR_LEN]) -> Result<u8, ClassifyError> {
        Ok(self.label)
    }
}

/// Test double that replays a scripted sequence of labels.
#[derive(Debug)]
pub struct ScriptedClassifier {
    labels: std::cell::RefCell<std::collections::VecDeque<u8>>,
}

impl ScriptedClassifier {
    /// Creates a classifier that answers the given labels in order.
    pub fn new(labels: impl IntoIterator<Item = u8>) -> Self {
        Self {
            labels: std::cell::RefCell::new(labels.into_iter().collect()),
        }
    }
}

impl Classifier for ScriptedClassifier {
    fn predict(&self, _input: &[u8; VECTOR_LEN]) -> Result<u8, ClassifyError> {
        self.labels
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| ClassifyError::Inference("script exhausted".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model() {
        let err = model_preconditions("/definitely/not/a/model.bin").unwrap_err();
        assert!(matches!(err, ClassifyError::ModelMissing(_)));
    }

    #[test]
    fn test_existing_model_passes() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(model_preconditions(file.path()).is_ok());
    }

    #[test]
    fn test_fixed_classifier() {
        let clf = FixedClassifier::new(7);
        assert_eq!(clf.predict(&[0; VECTOR_LEN]).unwrap(), 7);
    }

    #[test]
    fn test_scripted_classifier_exhausts() {
        let clf = ScriptedClassifier::new([1, 2]);
        assert_eq!(clf.predict(&[0; VECTOR_LEN]).unwrap(), 1);
        assert_eq!(clf.predict(&[0; VECTOR_LEN]).unwrap(), 2);
        assert!(clf.predict(&[0; VECTOR_LEN]).is_err());
    }
}
