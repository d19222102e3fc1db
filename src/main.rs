// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use cosmic_camera_capture::app::{AppModel, CaptureFlags, PhotoCapturedCallback};
use cosmic_camera_capture::constants::ui;
use cosmic_camera_capture::i18n;
use cosmic_camera_capture::session::get_backend;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "cosmic-camera-capture")]
#[command(about = "Photo capture view for the COSMIC desktop")]
#[command(version = env!("GIT_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available camera device
    List,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=cosmic_camera_capture=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List) => list_cameras(),
        None => run_gui(),
    }
}

fn list_cameras() -> Result<(), Box<dyn std::error::Error>> {
    let backend = get_backend();
    match backend.default_device() {
        Some(device) => println!("{}", device.name),
        None => println!("No camera available"),
    }
    Ok(())
}

fn run_gui() -> Result<(), Box<dyn std::error::Error>> {
    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();

    // Enable localizations to be applied.
    i18n::init(&requested_languages);

    // Settings for configuring the application window and iced runtime.
    let settings = cosmic::app::Settings::default().size_limits(
        cosmic::iced::Limits::NONE
            .min_width(ui::MIN_WINDOW_WIDTH)
            .min_height(ui::MIN_WINDOW_HEIGHT),
    );

    // When run standalone there is no host view to hand the photo to, so
    // just log what was accepted
    let on_photo_captured: PhotoCapturedCallback = Arc::new(|image| {
        info!(
            width = image.width,
            height = image.height,
            "Photo accepted"
        );
    });

    let flags = CaptureFlags {
        labels: Default::default(),
        on_photo_captured: Some(on_photo_captured),
    };

    cosmic::app::run::<AppModel>(settings, flags)?;

    Ok(())
}
