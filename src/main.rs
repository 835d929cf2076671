//! Poster Vision CLI
//!
//! Command-line interface for the tour-guide scaffold: run the tour
//! loop, record waypoints interactively, or take a single processed
//! photo. Hardware backends are external collaborators; this binary
//! demonstrates the full flow with mock camera and drive stacks.

use clap::{Parser, Subcommand};
use poster_vision::{
    capture::{Camera, FileConfig, MockCamera},
    classify::{self, Classifier, FixedClassifier},
    debug::DebugSink,
    motion::{MockDriver, MotionParams, RobotDriver},
    pipeline::Pipeline,
    tour::run_tour,
    waypoint::{self, Waypoint},
};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "poster-vision", version, about)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the tour loop until a poster with label 0 is read.
    Run {
        /// Path to the persisted classifier model artifact.
        #[arg(long, default_value = "model.bin")]
        model: PathBuf,
        /// Path to the waypoint course file.
        #[arg(long, default_value = "waypoints.txt")]
        waypoints: PathBuf,
    },
    /// Interactively record waypoints for the current map.
    Record {
        /// Path to the waypoint course file.
        #[arg(long, default_value = "waypoints.txt")]
        waypoints: PathBuf,
    },
    /// Capture one frame, run the full preprocessing chain, and save
    /// every stage artifact.
    Snap,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Poster Vision v{}", poster_vision::VERSION);

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };

    // Cooperative shutdown: the interrupt handler only flips a flag;
    // loops observe it between stages and clean up on their own exit
    // paths.
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            println!("Stopping...");
            cancel.store(true, Ordering::Relaxed);
        }) {
            warn!("failed to install interrupt handler: {e}");
        }
    }

    let result = match cli.command {
        Command::Run { model, waypoints } => cmd_run(&config, &model, &waypoints, &cancel),
        Command::Record { waypoints } => cmd_record(&config, &waypoints, &cancel),
        Command::Snap => cmd_snap(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn open_camera(config: &FileConfig) -> Result<MockCamera, Box<dyn std::error::Error>> {
    let mut camera = MockCamera::new();
    camera.open(&config.capture)?;
    Ok(camera)
}

fn build_pipeline(config: &FileConfig, force_debug: bool) -> std::io::Result<Pipeline> {
    let pipeline = Pipeline::new(config.detect.clone());
    if config.output.save_stages || force_debug {
        let sink = DebugSink::new(&config.output.out_dir)?;
        Ok(pipeline.with_debug_sink(sink))
    } else {
        Ok(pipeline)
    }
}

fn cmd_run(
    config: &FileConfig,
    model: &PathBuf,
    waypoint_path: &PathBuf,
    cancel: &AtomicBool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Preconditions before any motion: a missing model or course file
    // must fail with a diagnostic, not mid-tour.
    classify::model_preconditions(model)?;
    let (labels, waypoints) = waypoint::read_labels_and_waypoints(waypoint_path)?;
    if labels.is_empty() {
        return Err(format!("no waypoints recorded in {}", waypoint_path.display()).into());
    }

    let mut camera = open_camera(config)?;
    let mut pipeline = build_pipeline(config, false)?;
    let mut driver = MockDriver::new();
    // Stand-in inference until a real model backend is wired up; the
    // fixed label 0 sends the robot straight home.
    let classifier: Box<dyn Classifier> = Box::new(FixedClassifier::new(0));

    let outcome = run_tour(
        &mut pipeline,
        &mut camera,
        &mut driver,
        classifier.as_ref(),
        &labels,
        &waypoints,
        &MotionParams::default(),
        cancel,
    );

    // Orderly shutdown regardless of how the tour ended.
    driver.stop()?;
    camera.close();
    outcome?;
    Ok(())
}

fn cmd_record(
    config: &FileConfig,
    waypoint_path: &PathBuf,
    cancel: &AtomicBool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut camera = open_camera(config)?;
    let mut pipeline = build_pipeline(config, true)?;
    let mut driver = MockDriver::new();
    let (mut labels, mut waypoints) = waypoint::read_labels_and_waypoints(waypoint_path)?;

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if cancel.load(Ordering::Relaxed) {
            break;
        }
        print!("\nm to save waypoint\np to take a photo\nq to end\n: ");
        std::io::stdout().flush()?;
        let Some(answer) = lines.next().transpose()? else {
            break;
        };
        match answer.trim() {
            "m" => {
                let pose = driver.pose()?;
                println!("\nwaypoint: [{}, {}, {}]", pose.x, pose.y, pose.theta);
                print!("\nenter label for recorded coordinates: ");
                std::io::stdout().flush()?;
                let Some(entry) = lines.next().transpose()? else {
                    break;
                };
                match entry.trim().parse::<i32>() {
                    Ok(label) => waypoint::upsert(
                        &mut labels,
                        &mut waypoints,
                        label,
                        Waypoint::new(pose.x, pose.y, pose.theta),
                    ),
                    Err(_) => println!("not a label, ignored"),
                }
            }
            "p" => {
                pipeline.process(&mut camera)?;
                println!(
                    "\nview photo at {}/01_raw_frame_X.jpg\n",
                    config.output.out_dir.display()
                );
            }
            "q" => break,
            other => println!("unknown command {other:?}"),
        }
    }

    waypoint::write_labels_and_waypoints(waypoint_path, &labels, &waypoints)?;
    println!(
        "\nwrote waypoints and labels to {}\n",
        waypoint_path.display()
    );
    camera.close();
    Ok(())
}

fn cmd_snap(config: &FileConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut camera = open_camera(config)?;
    let mut pipeline = build_pipeline(config, true)?;

    match pipeline.process(&mut camera)? {
        Some(bitmap) => {
            let foreground = bitmap.as_vector().iter().filter(|&&v| v == 255).count();
            info!(foreground, "poster preprocessed, artifacts saved");
        }
        None => warn!("no poster detected in this frame"),
    }
    camera.close();
    Ok(())
}
