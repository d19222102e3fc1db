// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use cosmic_camera_capture::Config;
use cosmic_camera_capture::config::AppTheme;

#[test]
fn test_config_default() {
    // Test that default config can be created
    let config = Config::default();

    // Check sensible defaults
    assert_eq!(
        config.mirror_preview, true,
        "Mirror preview should be enabled by default"
    );
    assert_eq!(
        config.app_theme,
        AppTheme::System,
        "Theme should follow the system by default"
    );
}

#[test]
fn test_app_theme_palettes() {
    // The explicit theme choices must resolve to the matching palettes
    assert!(
        AppTheme::Dark.theme().cosmic().is_dark,
        "Dark preference should produce a dark palette"
    );
    assert!(
        !AppTheme::Light.theme().cosmic().is_dark,
        "Light preference should produce a light palette"
    );
}
