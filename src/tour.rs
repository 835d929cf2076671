//! Tour control scaffold.
//!
//! Ties perception to navigation: photograph the poster at the current
//! stop, classify its digit, and head to the waypoint recorded under
//! that label. Label 0 is the terminal: the robot returns to the start
//! pose and the tour ends.
//!
//! The policy here is deliberately minimal, a scaffold for
//! experimentation: unknown labels and perception misses simply retry,
//! with a bounded number of attempts per stop.

use crate::capture::Camera;
use crate::classify::{Classifier, ClassifyError};
use crate::motion::{drive_to_pose, turn_to_theta, MotionError, MotionParams, RobotDriver};
use crate::pipeline::{Pipeline, PipelineError};
use crate::waypoint::Waypoint;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Maximum pipeline attempts at one stop before giving up on the tour.
const MAX_ATTEMPTS_PER_STOP: u32 = 50;

/// Errors that end a tour.
#[derive(Debug, Error)]
pub enum TourError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Classify(#[from] ClassifyError),
    #[error(transparent)]
    Motion(#[from] MotionError),
    #[error("no readable poster after {0} attempts at this stop")]
    NoPoster(u32),
    #[error("tour cancelled")]
    Cancelled,
}

/// How one stop concluded.
#[derive(Debug, PartialEq, Eq)]
enum StopOutcome {
    /// Head to the waypoint recorded under this label.
    Next(usize),
    /// Label 0 read: return home and finish.
    Finish,
}

/// Runs the tour loop until label 0 is read or cancellation.
///
/// At each stop the pipeline is polled until it yields a bitmap, the
/// classifier names the digit, and the robot drives to the waypoint
/// recorded under that label (position first, then heading). Unknown
/// labels are logged and retried: a misread must not send the robot
/// off the course.
pub fn run_tour(
    pipeline: &mut Pipeline,
    camera: &mut dyn Camera,
    driver: &mut dyn RobotDriver,
    classifier: &dyn Classifier,
    labels: &[i32],
    waypoints: &[Waypoint],
    params: &MotionParams,
    cancel: &AtomicBool,
) -> Result<(), TourError> {
    tracing::info!(stops = labels.len(), "starting tour");
    loop {
        match read_stop(pipeline, camera, classifier, labels, cancel)? {
            StopOutcome::Finish => {
                tracing::info!("label 0 read, returning home");
                drive_to_pose(driver, 0.0, 0.0, params, cancel)?;
                turn_to_theta(driver, 0.0, params, cancel)?;
                driver.stop()?;
                tracing::info!("tour complete");
                return Ok(());
            }
            StopOutcome::Next(index) => {
                let wp = waypoints[index];
                drive_to_pose(driver, wp.x, wp.y, params, cancel)?;
                turn_to_theta(driver, wp.theta, params, cancel)?;
            }
        }
        if cancel.load(Ordering::Relaxed) {
            driver.stop()?;
            return Err(TourError::Cancelled);
        }
    }
}

/// Polls the pipeline and classifier at the current stop.
fn read_stop(
    pipeline: &mut Pipeline,
    camera: &mut dyn Camera,
    classifier: &dyn Classifier,
    labels: &[i32],
    cancel: &AtomicBool,
) -> Result<StopOutcome, TourError> {
    for attempt in 0..MAX_ATTEMPTS_PER_STOP {
        if cancel.load(Ordering::Relaxed) {
            return Err(TourError::Cancelled);
        }
        let Some(bitmap) = pipeline.process(camera)? else {
            continue;
        };
        let digit = classifier.predict_bitmap(&bitmap)?;
        if digit == 0 {
            return Ok(StopOutcome::Finish);
        }
        match labels.iter().position(|&l| l == i32::from(digit)) {
            Some(index) => {
                tracing::info!(digit, attempt, "poster read");
                return Ok(StopOutcome::Next(index));
            }
            None => {
                // Not part of the course: most likely a misread.
                tracing::warn!(digit, "label not on course, retrying");
            }
        }
    }
    Err(TourError::NoPoster(MAX_ATTEMPTS_PER_STOP))
}
