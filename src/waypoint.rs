//! Waypoint file I/O.
//!
//! The tour course is a flat whitespace-delimited list of numbers in
//! groups of four: `label x y theta`. The reader consumes tokens in
//! strides of four regardless of newline placement, so a file edited
//! by hand onto one long line parses the same as the writer's
//! one-group-per-line layout.

use std::path::Path;
use thiserror::Error;

/// A pose the robot should reach, in map frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// X position in meters.
    pub x: f64,
    /// Y position in meters.
    pub y: f64,
    /// Heading in radians.
    pub theta: f64,
}

impl Waypoint {
    /// Creates a waypoint.
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }
}

/// Errors that can occur reading or writing waypoint files.
#[derive(Debug, Error)]
pub enum WaypointError {
    #[error("waypoint file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("non-numeric token in waypoint file: {0:?}")]
    Parse(String),
    #[error("waypoint file ends mid-record ({0} trailing tokens, expected groups of 4)")]
    TruncatedRecord(usize),
}

/// Reads parallel label and waypoint lists from `path`.
///
/// A missing file is not an error: the recorder bootstraps from empty
/// lists. Labels are parsed as floats and truncated, so a hand-edited
/// `3.0` reads as label 3.
pub fn read_labels_and_waypoints(
    path: impl AsRef<Path>,
) -> Result<(Vec<i32>, Vec<Waypoint>), WaypointError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok((Vec::new(), Vec::new()));
    }
    let content = std::fs::read_to_string(path)?;

    let values: Vec<f64> = content
        .split_whitespace()
        .map(|tok| tok.parse::<f64>().map_err(|_| WaypointError::Parse(tok.to_string())))
        .collect::<Result<_, _>>()?;
    if values.len() % 4 != 0 {
        return Err(WaypointError::TruncatedRecord(values.len() % 4));
    }

    let mut labels = Vec::with_capacity(values.len() / 4);
    let mut waypoints = Vec::with_capacity(values.len() / 4);
    for group in values.chunks_exact(4) {
        labels.push(group[0] as i32);
        waypoints.push(Waypoint::new(group[1], group[2], group[3]));
    }
    Ok((labels, waypoints))
}

/// Writes parallel label and waypoint lists to `path`.
///
/// One `label x y theta` line per waypoint, space separated, no
/// trailing newline. The write goes through a temporary file renamed
/// into place, so an interrupt mid-write never leaves a half-written
/// course file.
pub fn write_labels_and_waypoints(
    path: impl AsRef<Path>,
    labels: &[i32],
    waypoints: &[Waypoint],
) -> Result<(), WaypointError> {
    let lines: Vec<String> = labels
        .iter()
        .zip(waypoints)
        .map(|(label, wp)| format!("{} {} {} {}", label, wp.x, wp.y, wp.theta))
        .collect();

    let path = path.as_ref();
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, lines.join("\n"))?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Records a waypoint under `label`: replaces the entry if the label
/// already exists, appends otherwise.
pub fn upsert(labels: &mut Vec<i32>, waypoints: &mut Vec<Waypoint>, label: i32, wp: Waypoint) {
    match labels.iter().position(|&l| l == label) {
        Some(i) => {
            waypoints[i] = wp;
            tracing::info!(label, "updated waypoint");
        }
        None => {
            labels.push(label);
            waypoints.push(wp);
            tracing::info!(label, "added new waypoint");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waypoints.txt");

        let labels = vec![0, 1, 2];
        let waypoints = vec![
            Waypoint::new(0.0, 0.0, 0.0),
            Waypoint::new(9.0, 2.0, 8.0),
            Waypoint::new(3.0, 6.0, 4.0),
        ];
        write_labels_and_waypoints(&path, &labels, &waypoints).unwrap();
        let (got_labels, got_waypoints) = read_labels_and_waypoints(&path).unwrap();

        assert_eq!(got_labels, labels);
        assert_eq!(got_waypoints, waypoints);
    }

    #[test]
    fn test_written_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waypoints.txt");
        write_labels_and_waypoints(
            &path,
            &[5],
            &[Waypoint::new(1.5, -2.25, 0.5)],
        )
        .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "5 1.5 -2.25 0.5");
    }

    #[test]
    fn test_newline_placement_irrelevant() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waypoints.txt");
        std::fs::write(&path, "0 1 2 3 4\n5\n6 7").unwrap();
        let (labels, waypoints) = read_labels_and_waypoints(&path).unwrap();
        assert_eq!(labels, vec![0, 4]);
        assert_eq!(waypoints[1], Waypoint::new(5.0, 6.0, 7.0));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let (labels, waypoints) =
            read_labels_and_waypoints(dir.path().join("nope.txt")).unwrap();
        assert!(labels.is_empty());
        assert!(waypoints.is_empty());
    }

    #[test]
    fn test_truncated_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waypoints.txt");
        std::fs::write(&path, "0 1 2 3 4 5").unwrap();
        assert!(matches!(
            read_labels_and_waypoints(&path),
            Err(WaypointError::TruncatedRecord(2))
        ));
    }

    #[test]
    fn test_bad_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waypoints.txt");
        std::fs::write(&path, "0 1 foo 3").unwrap();
        assert!(matches!(
            read_labels_and_waypoints(&path),
            Err(WaypointError::Parse(t)) if t == "foo"
        ));
    }

    #[test]
    fn test_upsert_replaces_and_appends() {
        let mut labels = vec![1, 2];
        let mut waypoints = vec![Waypoint::new(0.0, 0.0, 0.0), Waypoint::new(1.0, 1.0, 0.0)];

        upsert(&mut labels, &mut waypoints, 2, Waypoint::new(5.0, 5.0, 1.0));
        assert_eq!(labels, vec![1, 2]);
        assert_eq!(waypoints[1], Waypoint::new(5.0, 5.0, 1.0));

        upsert(&mut labels, &mut waypoints, 7, Waypoint::new(2.0, 3.0, 0.5));
        assert_eq!(labels, vec![1, 2, 7]);
        assert_eq!(waypoints.len(), 3);
    }
}
