//! # Inspector Options CLI
//!
//! Headless front end for the options panel. Every invocation builds one
//! `SettingsModel` over a JSON store, runs a single command, flushes pending
//! writes and exits.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       inspector-options <command>                       │
//! │                                                                         │
//! │  1. Load OptionsConfig ──── defaults → options.toml → INSPECTOR_* env  │
//! │     (logged through a scoped subscriber with the default filter)       │
//! │  2. Apply --host / --store, then validate                              │
//! │  3. Initialize logging  ─── RUST_LOG, else [logging] filter (stderr)   │
//! │  4. Open JsonFileStore                                                  │
//! │  5. SettingsModel::from_config                                         │
//! │  6. Run command ──────────► stdout                                      │
//! │  7. shutdown() ───────────► pending debounced writes persisted         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use inspector_core::SettingKey;
use inspector_options::{OptionsConfig, SettingsModel, WriteMode};
use inspector_store::JsonFileStore;
use tracing::{debug, error, info};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "inspector-options")]
#[command(about = "View and edit Inspector options without the panel")]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: platform config dir)
    #[arg(long, global = true, env = "INSPECTOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Org host the panel is opened for
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// JSON store file (default: platform data dir)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print every setting plus org context as JSON
    Show,

    /// Print one setting's value
    Get {
        /// arrow-orientation, arrow-position, api-version or api-key
        setting: SettingKey,
    },

    /// Change one setting
    #[command(after_help = "\
Examples:
  inspector-options set arrow-position 45
  inspector-options set api-version 61 --immediate
  inspector-options --host acme.my.salesforce.com set api-key 3MVG9...")]
    Set {
        setting: SettingKey,

        value: String,

        /// Skip the debounce window
        #[arg(long)]
        immediate: bool,
    },

    /// List setting names and the store keys they use
    Keys,

    /// Write the default configuration file
    InitConfig,
}

// =============================================================================
// Entry Points
// =============================================================================

/// Runs one CLI invocation and maps the outcome to an exit code.
pub async fn run(cli: Cli) -> ExitCode {
    let config = match &cli.command {
        Command::InitConfig => Ok(OptionsConfig::default()),
        _ => load_config_logged(&cli, std::io::stderr),
    };

    let filter = config
        .as_ref()
        .map(|c| c.logging.filter.clone())
        .unwrap_or_else(|_| OptionsConfig::default().logging.filter);
    init_tracing(&filter);

    let outcome = match config {
        Ok(config) => execute(cli, config).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(code = ?e.code, "{}", e.message);
            eprintln!("{}", e.to_json());
            ExitCode::from(e.exit_code())
        }
    }
}

/// Loads the configuration and applies `--host` / `--store`.
///
/// Validation runs after the flags are applied, so a valid `--host`
/// overrides a bad host from the file or `INSPECTOR_HOST`.
pub fn load_config(cli: &Cli) -> Result<OptionsConfig, CliError> {
    let mut config = OptionsConfig::load_unvalidated(cli.config.clone())?;

    if let Some(host) = &cli.host {
        config.panel.host = host.clone();
    }
    if let Some(store) = &cli.store {
        config.storage.path = Some(store.clone());
    }

    config.validate()?;
    Ok(config)
}

/// [`load_config`] under a scoped subscriber writing to `writer`.
///
/// The global subscriber needs the configured filter, so it cannot exist
/// yet while the configuration itself is being loaded.
pub fn load_config_logged<W>(cli: &Cli, writer: W) -> Result<OptionsConfig, CliError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(log_filter(&OptionsConfig::default().logging.filter))
        .with_writer(writer)
        .finish();

    tracing::subscriber::with_default(bootstrap, || load_config(cli))
}

/// Runs the command against a freshly built model and returns stdout.
pub async fn execute(cli: Cli, config: OptionsConfig) -> Result<String, CliError> {
    if let Command::InitConfig = cli.command {
        let path = config.save(cli.config)?;
        return Ok(format!("Wrote {}", path.display()));
    }

    let store = match &config.storage.path {
        Some(path) => JsonFileStore::open(path)?,
        None => JsonFileStore::open_default()?,
    };
    info!(path = ?store.path(), host = %config.host(), "Store opened");

    let model = SettingsModel::from_config(&config, Arc::new(store))?;
    model.set_render_callback(|done| {
        debug!("Render requested");
        if let Some(done) = done {
            done();
        }
    });

    let output = match cli.command {
        Command::Show => serde_json::to_string_pretty(&model.snapshot())?,
        Command::Get { setting } => model.get(setting)?,
        Command::Set {
            setting,
            value,
            immediate,
        } => {
            let mode = if immediate {
                WriteMode::Immediate
            } else {
                WriteMode::Debounced
            };
            model.set_with_mode(setting, &value, mode)?;
            format!("{} = {}", setting, model.get(setting)?)
        }
        Command::Keys => model
            .keys()
            .into_iter()
            .map(|key| {
                let store_key = model.store_key(key).unwrap_or_default();
                format!("{:<18} {:<40} {}", key.name(), store_key, key.label())
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Command::InitConfig => String::new(),
    };

    let flushed = model.shutdown()?;
    debug!(flushed, "Pending writes flushed");

    Ok(output)
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` wins over the configured filter. Output goes to stderr.
fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(default_filter))
        .with_writer(std::io::stderr)
        .try_init();
}

fn log_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use inspector_store::KeyValueStore;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("inspector-cli-{}", uuid::Uuid::new_v4()))
    }

    fn cli(dir: &PathBuf, args: &[&str]) -> Cli {
        let config = dir.join("options.toml");
        let store = dir.join("options.json");
        let mut argv = vec![
            "inspector-options".to_string(),
            "--config".to_string(),
            config.display().to_string(),
            "--store".to_string(),
            store.display().to_string(),
            "--host".to_string(),
            "acme.my.salesforce.com".to_string(),
        ];
        argv.extend(args.iter().map(|a| a.to_string()));
        Cli::try_parse_from(argv).unwrap()
    }

    async fn run_args(dir: &PathBuf, args: &[&str]) -> Result<String, CliError> {
        let cli = cli(dir, args);
        let config = load_config(&cli)?;
        execute(cli, config).await
    }

    #[test]
    fn test_unknown_setting_is_rejected_by_parser() {
        let result = Cli::try_parse_from(["inspector-options", "get", "arow-position"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_setting_names_accept_underscores() {
        let cli = Cli::try_parse_from(["inspector-options", "get", "api_version"]).unwrap();
        assert!(matches!(cli.command, Command::Get { setting: SettingKey::ApiVersion }));
    }

    #[tokio::test]
    async fn test_show_prints_defaults() {
        let dir = temp_dir();
        let output = run_args(&dir, &["show"]).await.unwrap();

        let snapshot: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(snapshot["orgLink"], "https://acme.my.salesforce.com");
        assert_eq!(snapshot["apiVersion"], "61");
        assert_eq!(snapshot["userInfo"], "...");
        assert_eq!(snapshot["isBusy"], false);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_debounced_set_is_flushed_before_exit() {
        let dir = temp_dir();
        let output = run_args(&dir, &["set", "arrow-position", "45"]).await.unwrap();
        assert_eq!(output, "arrow-position = 45");

        let store = JsonFileStore::open(dir.join("options.json")).unwrap();
        assert_eq!(store.get("popupArrowPosition").as_deref(), Some("45"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_api_key_is_stored_per_host() {
        let dir = temp_dir();
        run_args(&dir, &["set", "api-key", "3MVG9abc", "--immediate"]).await.unwrap();

        let output = run_args(&dir, &["get", "api-key"]).await.unwrap();
        assert_eq!(output, "3MVG9abc");

        let store = JsonFileStore::open(dir.join("options.json")).unwrap();
        assert_eq!(store.get("acme.my.salesforce.com_clientId").as_deref(), Some("3MVG9abc"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_invalid_value_is_validation_error() {
        let dir = temp_dir();
        let err = run_args(&dir, &["set", "api-version", "latest"]).await.unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(!dir.join("options.json").exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_host_flag_overrides_invalid_file_host() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("options.toml"), "[panel]\nhost = \"\"\n").unwrap();

        let config = load_config(&cli(&dir, &["show"])).unwrap();
        assert_eq!(config.host(), "acme.my.salesforce.com");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_host_without_flag_is_rejected() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("options.toml"), "[panel]\nhost = \"\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "inspector-options".to_string(),
            "--config".to_string(),
            dir.join("options.toml").display().to_string(),
            "show".to_string(),
        ])
        .unwrap();
        let err = load_config(&cli).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_config_loading_is_logged() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("options.toml"), "[preferences]\narrow_position_debounce_ms = 500\n").unwrap();

        let logs = CapturedLogs::default();
        let config = load_config_logged(&cli(&dir, &["show"]), logs.clone()).unwrap();

        assert_eq!(config.preferences.arrow_position_debounce_ms, 500);
        assert!(logs.contents().contains("Loading options config from file"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_init_config_writes_file() {
        let dir = temp_dir();
        let output = run_args(&dir, &["init-config"]).await.unwrap();
        assert!(output.starts_with("Wrote "));

        let contents = std::fs::read_to_string(dir.join("options.toml")).unwrap();
        assert!(contents.contains("arrow_position_debounce_ms = 1000"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_keys_lists_store_keys() {
        let dir = temp_dir();
        let output = run_args(&dir, &["keys"]).await.unwrap();
        assert_eq!(output.lines().count(), 4);
        assert!(output.contains("acme.my.salesforce.com_clientId"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
