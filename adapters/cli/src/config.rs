use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::Deserialize;
use sokobot_rendering::GlyphTheme;
use sokobot_session::SessionConfig;

const DEFAULT_STORE_PATH: &str = "config/levels.json";
const DEFAULT_FLUSH_INTERVAL_SECS: u64 = 20 * 60;

/// Settings read from the optional TOML configuration file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct CliConfig {
    pub(crate) session: SessionConfig,
    pub(crate) glyphs: HashMap<String, String>,
    pub(crate) store: StoreConfig,
}

/// Location and flush cadence of the saved level store.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct StoreConfig {
    pub(crate) path: PathBuf,
    pub(crate) flush_interval_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORE_PATH),
            flush_interval_secs: DEFAULT_FLUSH_INTERVAL_SECS,
        }
    }
}

impl StoreConfig {
    pub(crate) fn flush_interval(&self) -> Duration {
        Duration::from_secs(self.flush_interval_secs)
    }
}

impl CliConfig {
    /// Reads the configuration file, falling back to defaults when none is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration at {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid configuration at {}", path.display()))
    }

    fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse configuration toml contents")
    }

    /// Builds the glyph theme from an optional manifest plus the `[glyphs]` table.
    pub(crate) fn theme(&self, manifest: Option<&Path>) -> Result<GlyphTheme> {
        let base = match manifest {
            Some(path) => GlyphTheme::from_manifest_path(path)?,
            None => GlyphTheme::default(),
        };
        base.with_overrides(&self.glyphs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sokobot_core::Tile;

    #[test]
    fn empty_file_uses_defaults() {
        let config = CliConfig::from_toml_str("").expect("empty configuration parses");

        assert_eq!(config, CliConfig::default());
        assert_eq!(config.session.max_move_budget, 100);
        assert_eq!(config.store.flush_interval(), Duration::from_secs(1200));
        assert_eq!(config.store.path, PathBuf::from("config/levels.json"));
    }

    #[test]
    fn sections_override_selected_values() {
        let config = CliConfig::from_toml_str(
            r#"
                [session]
                max_move_budget = 40

                [session.generator]
                max_boxes = 6

                [glyphs]
                player = "@"

                [store]
                flush_interval_secs = 5
            "#,
        )
        .expect("configuration parses");

        assert_eq!(config.session.max_move_budget, 40);
        assert_eq!(config.session.generator.max_boxes, 6);
        assert_eq!(config.session.generator.max_width, 10);
        assert_eq!(config.store.flush_interval(), Duration::from_secs(5));

        let theme = config.theme(None).expect("theme builds");
        assert_eq!(theme.glyph(Tile::Player), "@");
    }

    #[test]
    fn unknown_glyph_keys_are_rejected() {
        let config = CliConfig::from_toml_str("[glyphs]\nladder = \"H\"").expect("toml parses");

        assert!(config.theme(None).is_err());
    }
}
