use std::{collections::HashMap, fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use sokobot_core::Tile;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;
const BORDER_KEY: &str = "border";
const DEFAULT_BORDER: &str = "🟥";
const DEFAULT_GLYPHS: [(Tile, &str); 7] = [
    (Tile::Player, "🔵"),
    (Tile::Empty, "⬛"),
    (Tile::Box, "🟫"),
    (Tile::CompletedBox, "❎"),
    (Tile::Wall, "🟥"),
    (Tile::Goal, "🔸"),
    (Tile::Enemy, "🔴"),
];

/// Mapping from tiles to the symbols used to draw them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphTheme {
    glyphs: [String; 7],
    border: String,
}

impl Default for GlyphTheme {
    fn default() -> Self {
        Self {
            glyphs: DEFAULT_GLYPHS.map(|(_, glyph)| glyph.to_owned()),
            border: DEFAULT_BORDER.to_owned(),
        }
    }
}

impl GlyphTheme {
    /// Loads a theme from the glyph manifest located at the provided path.
    pub fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read glyph manifest at {}", path.display()))?;
        Self::from_manifest_str(&contents)
    }

    /// Parses a glyph manifest.
    ///
    /// ```toml
    /// version = 1
    ///
    /// [glyphs]
    /// player = "@"
    /// border = "#"
    /// ```
    ///
    /// Tiles missing from the manifest keep their default glyph.
    pub fn from_manifest_str(contents: &str) -> Result<Self> {
        let manifest: Manifest =
            toml::from_str(contents).context("failed to parse glyph manifest toml contents")?;
        if manifest.version != SUPPORTED_MANIFEST_VERSION {
            bail!(
                "unsupported glyph manifest version {}; expected {}",
                manifest.version,
                SUPPORTED_MANIFEST_VERSION
            );
        }
        Self::default().with_overrides(manifest.glyphs)
    }

    /// Replaces glyphs keyed by tile token, or by `border` for the frame.
    pub fn with_overrides<I, K, V>(mut self, overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (name, glyph) in overrides {
            let name = name.as_ref();
            let glyph = glyph.into();
            if glyph.is_empty() {
                bail!("glyph for `{name}` must not be empty");
            }
            if name == BORDER_KEY {
                self.border = glyph;
                continue;
            }
            let tile = Tile::from_token(name)
                .with_context(|| format!("unknown glyph key `{name}` in theme"))?;
            self.glyphs[slot(tile)] = glyph;
        }
        self.ensure_distinct()?;
        Ok(self)
    }

    // Tiles must be told apart when a drawn board is read back.
    fn ensure_distinct(&self) -> Result<()> {
        let mut owners: HashMap<&str, Tile> = HashMap::new();
        for tile in Tile::ALL {
            let glyph = self.glyph(tile);
            if let Some(previous) = owners.insert(glyph, tile) {
                bail!("glyph `{glyph}` is used for both {previous} and {tile}");
            }
        }
        Ok(())
    }

    /// Glyph drawn for the tile.
    #[must_use]
    pub fn glyph(&self, tile: Tile) -> &str {
        &self.glyphs[slot(tile)]
    }

    /// Glyph drawn for the player piece, honouring a per-session override.
    ///
    /// An override that matches the glyph of another tile is rejected, since
    /// the player could no longer be told apart from that tile.
    pub fn player_glyph<'a>(&'a self, appearance: Option<&'a str>) -> Result<&'a str> {
        let Some(glyph) = appearance else {
            return Ok(self.glyph(Tile::Player));
        };
        if glyph.is_empty() {
            bail!("player glyph must not be empty");
        }
        match self.tile_for(glyph) {
            Some(tile) if tile != Tile::Player => {
                bail!("player glyph `{glyph}` is already used for {tile}")
            }
            _ => Ok(glyph),
        }
    }

    /// Glyph drawn around the board.
    #[must_use]
    pub fn border(&self) -> &str {
        &self.border
    }

    /// Tile drawn with the glyph, if any.
    #[must_use]
    pub fn tile_for(&self, glyph: &str) -> Option<Tile> {
        Tile::ALL
            .into_iter()
            .find(|tile| self.glyph(*tile) == glyph)
    }
}

fn slot(tile: Tile) -> usize {
    match tile {
        Tile::Player => 0,
        Tile::Empty => 1,
        Tile::Box => 2,
        Tile::CompletedBox => 3,
        Tile::Wall => 4,
        Tile::Goal => 5,
        Tile::Enemy => 6,
    }
}

#[derive(Debug, Deserialize)]
struct Manifest {
    version: u32,
    #[serde(default)]
    glyphs: HashMap<String, String>,
}
