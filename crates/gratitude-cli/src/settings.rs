//! Layered settings: TOML file, then `GRATITUDE_*` environment variables.
//! Command-line flags are applied on top by `main`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gratitude_core::store::DEFAULT_SLOT;
use serde::Deserialize;

const APP_DIR: &str = "gratitude";

/// Runtime settings, deserialised from `config.toml` and the environment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// SQLite database holding the diary slot.
  pub store_path: PathBuf,
  /// Name of the slot inside the database.
  pub slot:       String,
  /// Where exported documents are written.
  pub export_dir: PathBuf,
  /// Shown in the header as "Diario di <name>".
  pub name:       Option<String>,
  /// Log destination while the terminal UI is running.
  pub log_file:   PathBuf,
}

impl Default for Settings {
  fn default() -> Self {
    let data = data_dir();
    Self {
      store_path: data.join("diary.db"),
      slot:       DEFAULT_SLOT.to_owned(),
      export_dir: dirs::document_dir().unwrap_or_else(|| PathBuf::from(".")),
      name:       None,
      log_file:   data.join("gratitude.log"),
    }
  }
}

fn data_dir() -> PathBuf {
  dirs::data_dir()
    .unwrap_or_else(|| PathBuf::from("."))
    .join(APP_DIR)
}

/// `<config dir>/gratitude/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
  dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

/// Load settings. An explicitly given `path` must exist; the default one is
/// optional.
pub fn load(path: Option<&Path>) -> Result<Settings> {
  let (file, required) = match path {
    Some(p) => (Some(p.to_path_buf()), true),
    None => (default_config_path(), false),
  };

  let mut builder = config::Config::builder();
  if let Some(file) = file {
    builder = builder.add_source(config::File::from(file).required(required));
  }
  let mut settings: Settings = builder
    .add_source(config::Environment::with_prefix("GRATITUDE"))
    .build()
    .context("failed to read config")?
    .try_deserialize()
    .context("failed to deserialise settings")?;

  settings.store_path = expand_tilde(&settings.store_path);
  settings.export_dir = expand_tilde(&settings.export_dir);
  settings.log_file = expand_tilde(&settings.log_file);
  Ok(settings)
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}
