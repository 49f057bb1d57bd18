//! Shared fixtures and helper functions for config tests.

use std::sync::Arc;

use ortho_config::MergeComposer;
use ortho_config::serde_json::json;
use rstest::fixture;

use crate::config::HarnessConfig;

/// Fixture providing a `HarnessConfig` parsed from a full TOML example.
#[fixture]
pub fn config_from_full_toml() -> Result<HarnessConfig, toml::de::Error> {
    toml::from_str(
        r#"
        engine_socket = "tcp://swarm-manager:2375"
        image = "nginx:alpine"

        [poll]
        interval_ms = 250
        timeout_secs = 120
    "#,
    )
}

/// Creates a `MergeComposer` with the defaults layer pushed.
pub fn composer_with_defaults() -> Result<MergeComposer, serde_json::Error> {
    let mut composer = MergeComposer::new();
    composer.push_defaults(ortho_config::serde_json::to_value(
        HarnessConfig::default(),
    )?);
    Ok(composer)
}

/// Creates a composer with defaults, a file layer and an environment layer.
pub fn composer_with_file_and_env() -> Result<MergeComposer, serde_json::Error> {
    let mut composer = composer_with_defaults()?;
    composer.push_file(
        json!({
            "engine_socket": "unix:///from/file.sock",
            "image": "file-image:latest",
            "poll": { "interval_ms": 1000, "timeout_secs": 300 }
        }),
        None,
    );
    composer.push_environment(json!({
        "engine_socket": "unix:///from/env.sock",
        "poll": { "interval_ms": 200 }
    }));
    Ok(composer)
}

/// Merges the composer's layers into a `HarnessConfig`.
pub fn merge_config(
    composer: MergeComposer,
) -> Result<HarnessConfig, Arc<ortho_config::OrthoError>> {
    HarnessConfig::merge_from_layers(composer.layers())
}
