//! Runtime configuration, layered from an optional TOML file and
//! `ROLODEX_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  #[serde(default = "default_database_path")]
  pub database_path: PathBuf,
  #[serde(default)]
  pub generate:      GenerateSettings,
}

/// How many people of each sex a seeding run inserts, drawn uniformly from
/// `min_per_sex..=max_per_sex`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GenerateSettings {
  #[serde(default = "default_min_per_sex")]
  pub min_per_sex: usize,
  #[serde(default = "default_max_per_sex")]
  pub max_per_sex: usize,
}

impl Default for GenerateSettings {
  fn default() -> Self {
    Self {
      min_per_sex: default_min_per_sex(),
      max_per_sex: default_max_per_sex(),
    }
  }
}

fn default_database_path() -> PathBuf { PathBuf::from("rolodex.db") }

fn default_min_per_sex() -> usize { 3 }

fn default_max_per_sex() -> usize { 10 }

impl Settings {
  /// Read `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("ROLODEX")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()
      .context("failed to read config file")?;

    let mut settings: Settings = settings
      .try_deserialize()
      .context("failed to deserialise Settings")?;

    if settings.generate.min_per_sex > settings.generate.max_per_sex {
      anyhow::bail!(
        "generate.min_per_sex ({}) is larger than generate.max_per_sex ({})",
        settings.generate.min_per_sex,
        settings.generate.max_per_sex
      );
    }
    settings.database_path = expand_tilde(&settings.database_path);
    Ok(settings)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_without_file() {
    let settings = Settings::load(Path::new("does-not-exist.toml")).unwrap();
    assert_eq!(settings.generate.min_per_sex, 3);
    assert_eq!(settings.generate.max_per_sex, 10);
  }

  #[test]
  fn database_path_from_environment() {
    // SAFETY: no other test here sets this variable or asserts on `database_path`.
    unsafe { std::env::set_var("ROLODEX_DATABASE_PATH", "/tmp/rolodex-env.db") };
    let settings = Settings::load(Path::new("does-not-exist.toml"));
    unsafe { std::env::remove_var("ROLODEX_DATABASE_PATH") };
    assert_eq!(settings.unwrap().database_path, PathBuf::from("/tmp/rolodex-env.db"));
  }

  #[test]
  fn absolute_paths_untouched() {
    assert_eq!(expand_tilde(Path::new("/var/db/r.db")), PathBuf::from("/var/db/r.db"));
    assert_eq!(expand_tilde(Path::new("r.db")), PathBuf::from("r.db"));
  }
}
