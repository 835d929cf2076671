//! Poster Vision Library
//!
//! Perception and navigation scaffold for a waypoint tour-guide robot.
//! The robot drives between recorded waypoints, photographs a printed
//! square poster at each stop, preprocesses it into a classifier-ready
//! bitmap, and decides its next destination from the digit read.
//!
//! # Architecture
//!
//! The preprocessing pipeline is four ordered stages with strictly
//! forward data flow:
//!
//! ```text
//! capture → detect → rectify → normalize → (external classifier)
//!                                  ↓
//!                       debug artifacts (output/)
//! ```
//!
//! # Design Principles
//!
//! - **Perception misses are not errors**: a frame without a readable
//!   poster yields an absent result, and the caller retries
//! - **No hidden state between frames**: the detected quadrilateral is
//!   threaded through the pipeline call, never stored
//! - **External collaborators behind traits**: camera hardware, the
//!   digit classifier, and the drive stack are trait seams with mock
//!   implementations
//! - **Cooperative shutdown**: long-running loops observe a shared
//!   cancellation flag and always stop the drivetrain on exit
//!
//! # Example
//!
//! ```no_run
//! use poster_vision::{
//!     capture::{Camera, CaptureConfig, MockCamera},
//!     pipeline::Pipeline,
//! };
//!
//! let mut camera = MockCamera::new();
//! camera.open(&CaptureConfig::default()).unwrap();
//!
//! let mut pipeline = Pipeline::new(Default::default());
//!
//! // Poll until a poster is readable.
//! for _ in 0..10 {
//!     if let Some(bitmap) = pipeline.process(&mut camera).unwrap() {
//!         println!("got {} foreground pixels",
//!             bitmap.as_vector().iter().filter(|&&v| v == 255).count());
//!         break;
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod capture;
pub mod classify;
pub mod debug;
pub mod detect;
pub mod motion;
pub mod normalize;
pub mod pipeline;
pub mod rectify;
pub mod tour;
pub mod waypoint;

// Re-export commonly used types at crate root
pub use capture::{Camera, CaptureConfig, DetectConfig, Frame, MockCamera};
pub use classify::Classifier;
pub use debug::DebugSink;
pub use detect::{PosterDetector, Quad};
pub use motion::{MotionParams, Pose, RobotDriver};
pub use normalize::NormalizedBitmap;
pub use pipeline::{Pipeline, PipelineError};
pub use rectify::Bitmap28;
pub use waypoint::Waypoint;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
