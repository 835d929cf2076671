//! Motion primitives over the robot driver.
//!
//! Thin proportional-control helpers layered on an external drive
//! stack: turn to a heading, wait out a planned drive to a position.
//! The driver itself (pose estimation, path planning, wheel control)
//! is a collaborator behind the [`RobotDriver`] trait.
//!
//! All helpers observe a cooperative cancellation flag between control
//! ticks and stop the drivetrain on every exit path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;

/// Proportional gain for the turn controller.
pub const TURN_KP: f64 = 5.0;
/// Angular speed clamp in rad/s.
pub const MAX_TURN_SPEED: f64 = 1.5;
/// Heading tolerance in radians.
pub const TURN_ERROR: f64 = 0.03;
/// Position tolerance in meters.
pub const POSE_ERROR: f64 = 0.03;

/// Robot pose in map frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// X position in meters.
    pub x: f64,
    /// Y position in meters.
    pub y: f64,
    /// Heading in radians.
    pub theta: f64,
}

/// Errors from the underlying drive stack.
#[derive(Debug, Error)]
pub enum MotionError {
    #[error("robot driver failure: {0}")]
    Driver(String),
}

/// Trait for the external drive stack.
pub trait RobotDriver {
    /// Reads the current pose estimate.
    fn pose(&mut self) -> Result<Pose, MotionError>;

    /// Commands body-frame velocities (vx, vy in m/s, omega in rad/s).
    fn drive(&mut self, vx: f64, vy: f64, omega: f64) -> Result<(), MotionError>;

    /// Stops all motion.
    fn stop(&mut self) -> Result<(), MotionError>;

    /// Kicks off a planned drive toward (x, y). Returns immediately;
    /// progress is observed through `pose`.
    fn navigate_to(&mut self, x: f64, y: f64) -> Result<(), MotionError>;
}

/// Timing knobs for the control helpers.
#[derive(Debug, Clone)]
pub struct MotionParams {
    /// Control tick period.
    pub tick: Duration,
    /// Settle wait after the position loop releases, letting the
    /// low-level controller finish the final approach.
    pub settle: Duration,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(100),
            settle: Duration::from_secs(2),
        }
    }
}

/// Wraps an angle into (-pi, pi].
pub fn wrap_angle(mut angle: f64) -> f64 {
    use std::f64::consts::PI;
    while angle > PI {
        angle -= 2.0 * PI;
    }
    while angle <= -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Turns in place to the heading `theta` using proportional control.
///
/// The commanded angular speed is the clamped gain times the wrapped
/// heading error. Returns once the error is within [`TURN_ERROR`] or
/// cancellation is requested; the drivetrain is stopped either way.
pub fn turn_to_theta(
    driver: &mut dyn RobotDriver,
    theta: f64,
    params: &MotionParams,
    cancel: &AtomicBool,
) -> Result<(), MotionError> {
    tracing::info!(theta, "turning to heading");
    loop {
        if cancel.load(Ordering::Relaxed) {
            break;
        }
        let pose = driver.pose()?;
        let error = wrap_angle(theta - pose.theta);
        if error.abs() <= TURN_ERROR {
            break;
        }
        let omega = (TURN_KP * error).clamp(-MAX_TURN_SPEED, MAX_TURN_SPEED);
        driver.drive(0.0, 0.0, omega)?;
        std::thread::sleep(params.tick);
    }
    driver.stop()?;
    tracing::info!("finished turning");
    Ok(())
}

/// Drives to the goal position (x, y) and waits for arrival.
///
/// Starts a planned drive via [`RobotDriver::navigate_to`], then polls
/// the pose until within [`POSE_ERROR`] of the goal, waits out the
/// settle period, and stops. Cancellation exits early with the
/// drivetrain stopped.
pub fn drive_to_pose(
    driver: &mut dyn RobotDriver,
    x: f64,
    y: f64,
    params: &MotionParams,
    cancel: &AtomicBool,
) -> Result<(), MotionError> {
    tracing::info!(x, y, "driving to position");
    driver.navigate_to(x, y)?;
    loop {
        if cancel.load(Ordering::Relaxed) {
            driver.stop()?;
            return Ok(());
        }
        let pose = driver.pose()?;
        let dist = ((pose.x - x).powi(2) + (pose.y - y).powi(2)).sqrt();
        if dist <= POSE_ERROR {
            break;
        }
        std::thread::sleep(params.tick);
    }
    std::thread::sleep(params.settle);
    driver.stop()?;
    tracing::info!("finished driving");
    Ok(())
}

/// Converging simulator for tests and demos.
///
/// `pose` reads step the simulated robot a fixed fraction toward the
/// navigation target; `drive` integrates commanded velocities over one
/// tick.
#[derive(Debug)]
pub struct MockDriver {
    pose: Pose,
    target: Option<(f64, f64)>,
    /// Integration step for one drive command, in seconds.
    dt: f64,
    /// Commands issued, for assertions.
    pub stop_count: u32,
}

impl MockDriver {
    /// Creates a simulator at the origin.
    pub fn new() -> Self {
        Self {
            pose: Pose {
                x: 0.0,
                y: 0.0,
                theta: 0.0,
            },
            target: None,
            dt: 0.1,
            stop_count: 0,
        }
    }
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl RobotDriver for MockDriver {
    fn pose(&mut self) -> Result<Pose, MotionError> {
        if let Some((tx, ty)) = self.target {
            self.pose.x += 0.3 * (tx - self.pose.x);
            self.pose.y += 0.3 * (ty - self.pose.y);
        }
        Ok(self.pose)
    }

    fn drive(&mut self, vx: f64, vy: f64, omega: f64) -> Result<(), MotionError> {
        self.pose.x += vx * self.dt;
        self.pose.y += vy * self.dt;
        self.pose.theta = wrap_angle(self.pose.theta + omega * self.dt);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), MotionError> {
        self.target = None;
        self.stop_count += 1;
        Ok(())
    }

    fn navigate_to(&mut self, x: f64, y: f64) -> Result<(), MotionError> {
        self.target = Some((x, y));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn fast_params() -> MotionParams {
        MotionParams {
            tick: Duration::ZERO,
            settle: Duration::ZERO,
        }
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-12);
        assert!((wrap_angle(-3.0 * PI) - PI).abs() < 1e-12);
        assert_eq!(wrap_angle(0.5), 0.5);
        // -pi wraps up to +pi (exclusive lower bound).
        assert!((wrap_angle(-PI) - PI).abs() < 1e-12);
    }

    #[test]
    fn test_turn_converges_and_stops() {
        let mut driver = MockDriver::new();
        let cancel = AtomicBool::new(false);
        turn_to_theta(&mut driver, 1.0, &fast_params(), &cancel).unwrap();

        let pose = driver.pose().unwrap();
        assert!((wrap_angle(1.0 - pose.theta)).abs() <= TURN_ERROR);
        assert_eq!(driver.stop_count, 1);
    }

    #[test]
    fn test_turn_takes_short_way_around() {
        let mut driver = MockDriver::new();
        driver.pose.theta = 3.0;
        let cancel = AtomicBool::new(false);
        turn_to_theta(&mut driver, -3.0, &fast_params(), &cancel).unwrap();

        let pose = driver.pose().unwrap();
        assert!((wrap_angle(-3.0 - pose.theta)).abs() <= TURN_ERROR);
    }

    #[test]
    fn test_drive_reaches_goal() {
        let mut driver = MockDriver::new();
        let cancel = AtomicBool::new(false);
        drive_to_pose(&mut driver, 2.0, -1.0, &fast_params(), &cancel).unwrap();

        assert!((driver.pose.x - 2.0).abs() <= 2.0 * POSE_ERROR);
        assert!((driver.pose.y + 1.0).abs() <= 2.0 * POSE_ERROR);
        assert_eq!(driver.stop_count, 1);
    }

    #[test]
    fn test_cancel_stops_drivetrain() {
        let mut driver = MockDriver::new();
        let cancel = AtomicBool::new(true);
        turn_to_theta(&mut driver, 2.0, &fast_params(), &cancel).unwrap();
        assert_eq!(driver.stop_count, 1);
        // Never moved.
        assert_eq!(driver.pose.theta, 0.0);

        drive_to_pose(&mut driver, 5.0, 5.0, &fast_params(), &cancel).unwrap();
        assert_eq!(driver.stop_count, 2);
    }
}
