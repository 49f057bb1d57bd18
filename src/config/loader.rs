//! Layered configuration loading.
//!
//! Layers are merged lowest to highest: built-in defaults, the configuration
//! file, `SWARM_E2E_*` environment variables, then command-line flags.
//!
//! # Composing layers by hand
//!
//! `HarnessConfig` derives `OrthoConfig`, but its generated `load()` is not
//! used here. Instead each layer is pushed onto a `MergeComposer`:
//!
//! - **Subcommands.** `Cli` owns clap dispatch (`clean`, `tasks`, `wait`),
//!   while `HarnessConfig` only holds values. The `wait` flags are translated
//!   into `poll.*` overrides in the CLI layer.
//! - **Typed environment values.** A generated environment layer drops values
//!   it cannot parse. This loader reports them as
//!   `ConfigError::InvalidValue` so a typo never silently becomes a default.
//! - **Explicit file path.** `--config` is honoured before discovery. A
//!   named file that does not exist falls through to the discovered
//!   candidates.
//!
//! # Environment variables
//!
//! Every variable the loader reads is listed once in `ENV_VAR_SPECS`.
//! `SWARM_E2E_POLL_INTERVAL_MS=fast` is an error. String variables such as
//! `SWARM_E2E_ENGINE_SOCKET` are always accepted.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use ortho_config::discovery::ConfigDiscovery;
use ortho_config::serde_json::{self, Map, Value};
use ortho_config::{MergeComposer, toml};
use tracing::debug;

use super::{Cli, Commands, HarnessConfig};
use crate::error::{ConfigError, Result};

/// How an environment variable's raw text is turned into a JSON value.
#[derive(Clone, Copy)]
enum EnvVarType {
    /// Taken verbatim.
    String,
    /// Parsed as `u64`; anything else is rejected.
    U64,
}

/// One environment variable and where it lands in the merged document.
struct EnvVarSpec {
    /// Variable name, e.g. `SWARM_E2E_IMAGE`.
    env_var: &'static str,
    /// Object path inside the merged document, e.g. `["poll", "interval_ms"]`.
    path: &'static [&'static str],
    /// Expected value type.
    var_type: EnvVarType,
}

/// Every environment variable the loader reads, in no particular order.
const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    EnvVarSpec {
        env_var: "SWARM_E2E_ENGINE_SOCKET",
        path: &["engine_socket"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "SWARM_E2E_IMAGE",
        path: &["image"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "SWARM_E2E_POLL_INTERVAL_MS",
        path: &["poll", "interval_ms"],
        var_type: EnvVarType::U64,
    },
    EnvVarSpec {
        env_var: "SWARM_E2E_POLL_TIMEOUT_SECS",
        path: &["poll", "timeout_secs"],
        var_type: EnvVarType::U64,
    },
];

/// Return every environment variable the loader reads.
///
/// Tests use this to clear the environment before loading.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS.iter().map(|spec| spec.env_var).collect()
}

/// Load configuration: defaults, then file, then environment, then `cli`.
///
/// The file is `cli.config` when it exists, otherwise the first candidate
/// found by discovery (`SWARM_E2E_CONFIG_PATH`, `.swarm-e2e.toml`,
/// `~/.config/swarm-e2e/config.toml`).
///
/// # Errors
///
/// Returns `ConfigError::ParseError` for unreadable or malformed files,
/// `ConfigError::InvalidValue` for unparseable numeric environment values,
/// and `ConfigError::OrthoConfig` when the merged layers do not deserialise.
pub fn load_config(cli: &Cli) -> Result<HarnessConfig> {
    let mut composer = MergeComposer::new();

    let defaults =
        serde_json::to_value(HarnessConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    if let Some(path) = config_file_path(cli) {
        debug!(%path, "loading configuration file");
        load_config_file(&path, &mut composer)?;
    }

    let env_values = collect_env_vars()?;
    if !env_values.is_null() {
        composer.push_environment(env_values);
    }

    let cli_overrides = build_cli_overrides(cli);
    if !cli_overrides.is_null() {
        composer.push_cli(cli_overrides);
    }

    let config =
        HarnessConfig::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;
    Ok(config)
}

/// Pick the configuration file: an existing `--config` path first, then the
/// first existing discovery candidate.
fn config_file_path(cli: &Cli) -> Option<Utf8PathBuf> {
    cli.config.clone().filter(|p| p.exists()).or_else(|| {
        ConfigDiscovery::builder("swarm-e2e")
            .env_var("SWARM_E2E_CONFIG_PATH")
            .config_file_name("config.toml")
            .dotfile_name(".swarm-e2e.toml")
            .build()
            .candidates()
            .into_iter()
            .filter(|p| p.exists())
            .find_map(|p| Utf8PathBuf::try_from(p).ok())
    })
}

/// Read a TOML file through `cap_std` and push it as the file layer.
fn load_config_file(path: &Utf8Path, composer: &mut MergeComposer) -> Result<()> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().unwrap_or(path.as_str());

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|e| {
        ConfigError::ParseError {
            message: format!("failed to open directory {parent}: {e}"),
        }
    })?;

    let content = dir
        .read_to_string(file_name)
        .map_err(|e| ConfigError::ParseError {
            message: format!("failed to read {path}: {e}"),
        })?;

    let value = toml::from_str::<Value>(&content).map_err(|e| ConfigError::ParseError {
        message: format!("failed to parse {path}: {e}"),
    })?;

    composer.push_file(value, Some(path.to_path_buf()));
    Ok(())
}

/// Read every variable in `ENV_VAR_SPECS` into one JSON object.
///
/// Returns `Value::Null` when none are set so that no empty layer is pushed.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` naming the variable when a `U64`
/// variable does not parse.
fn collect_env_vars() -> Result<Value> {
    let mut root = Map::new();

    for spec in ENV_VAR_SPECS {
        let Ok(raw_value) = std::env::var(spec.env_var) else {
            continue;
        };

        let json_value = match spec.var_type {
            EnvVarType::String => Value::String(raw_value),
            EnvVarType::U64 => {
                let parsed =
                    raw_value
                        .trim()
                        .parse::<u64>()
                        .map_err(|_| ConfigError::InvalidValue {
                            field: spec.env_var.to_owned(),
                            reason: format!("expected unsigned integer, got '{raw_value}'"),
                        })?;
                Value::Number(parsed.into())
            }
        };

        insert_at_path(&mut root, spec.path, json_value);
    }

    if root.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(root))
    }
}

/// Set `value` at `path`, creating intermediate objects as needed.
///
/// A non-object value already sitting on the path leaves `root` untouched.
fn insert_at_path(root: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((&field, parents)) = path.split_last() else {
        return;
    };

    let mut current = root;
    for &segment in parents {
        let entry = current
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(obj) = entry.as_object_mut() else {
            return;
        };
        current = obj;
    }

    current.insert(field.to_owned(), value);
}

/// Collect flag values that override configuration.
///
/// `wait --interval-ms` and `wait --timeout-secs` override the `[poll]`
/// table for that invocation.
fn build_cli_overrides(cli: &Cli) -> Value {
    let mut overrides = Map::new();

    if let Some(ref socket) = cli.engine_socket {
        overrides.insert("engine_socket".to_owned(), Value::String(socket.clone()));
    }

    if let Commands::Wait(ref args) = cli.command {
        if let Some(interval_ms) = args.interval_ms {
            insert_at_path(
                &mut overrides,
                &["poll", "interval_ms"],
                Value::Number(interval_ms.into()),
            );
        }
        if let Some(timeout_secs) = args.timeout_secs {
            insert_at_path(
                &mut overrides,
                &["poll", "timeout_secs"],
                Value::Number(timeout_secs.into()),
            );
        }
    }

    if overrides.is_empty() {
        Value::Null
    } else {
        Value::Object(overrides)
    }
}

#[cfg(test)]
mod tests {
    use ortho_config::serde_json::json;
    use rstest::rstest;

    use super::*;
    use crate::config::WaitArgs;

    fn wait_cli(interval_ms: Option<u64>, timeout_secs: Option<u64>) -> Cli {
        Cli {
            command: Commands::Wait(WaitArgs {
                service: String::from("web"),
                replicas: 3,
                timeout_secs,
                interval_ms,
            }),
            config: None,
            engine_socket: None,
        }
    }

    #[rstest]
    fn insert_at_path_creates_intermediate_tables() {
        let mut root = Map::new();
        insert_at_path(&mut root, &["poll", "interval_ms"], json!(250));
        insert_at_path(&mut root, &["poll", "timeout_secs"], json!(30));

        assert_eq!(
            Value::Object(root),
            json!({ "poll": { "interval_ms": 250, "timeout_secs": 30 } })
        );
    }

    #[rstest]
    fn cli_overrides_empty_for_clean() {
        let cli = Cli {
            command: Commands::Clean,
            config: None,
            engine_socket: None,
        };
        assert!(build_cli_overrides(&cli).is_null());
    }

    #[rstest]
    fn cli_overrides_include_engine_socket() {
        let cli = Cli {
            command: Commands::Clean,
            config: None,
            engine_socket: Some(String::from("tcp://manager:2375")),
        };
        assert_eq!(
            build_cli_overrides(&cli),
            json!({ "engine_socket": "tcp://manager:2375" })
        );
    }

    #[rstest]
    #[case::both(Some(100), Some(20), json!({ "poll": { "interval_ms": 100, "timeout_secs": 20 } }))]
    #[case::interval_only(Some(100), None, json!({ "poll": { "interval_ms": 100 } }))]
    #[case::timeout_only(None, Some(20), json!({ "poll": { "timeout_secs": 20 } }))]
    #[case::neither(None, None, Value::Null)]
    fn wait_flags_override_poll_table(
        #[case] interval_ms: Option<u64>,
        #[case] timeout_secs: Option<u64>,
        #[case] expected: Value,
    ) {
        assert_eq!(
            build_cli_overrides(&wait_cli(interval_ms, timeout_secs)),
            expected
        );
    }
}
