use std::{
    collections::HashMap,
    fs, io,
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use log::info;
use sokobot_core::PlayerId;
use sokobot_session::SaveRequest;

/// Saved custom levels keyed by the id of the player that saved them.
///
/// The whole map is read at startup and written back in one piece.
#[derive(Debug)]
pub(crate) struct LevelStore {
    path: PathBuf,
    levels: HashMap<String, String>,
    flush_interval: Duration,
    last_flush: Instant,
}

impl LevelStore {
    /// Loads the store at `path`. A missing file is an empty store.
    pub(crate) fn load(path: impl Into<PathBuf>, flush_interval: Duration) -> Result<Self> {
        let path = path.into();
        let levels = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .with_context(|| format!("failed to parse level store at {}", path.display()))?,
            Err(error) if error.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("failed to read level store at {}", path.display()))
            }
        };
        info!("Loaded {} saved levels from {}", levels.len(), path.display());

        Ok(Self {
            path,
            levels,
            flush_interval,
            last_flush: Instant::now(),
        })
    }

    /// Level saved by the player, if any.
    pub(crate) fn get(&self, owner: PlayerId) -> Option<&str> {
        self.levels.get(&owner.to_string()).map(String::as_str)
    }

    /// Number of saved levels.
    pub(crate) fn len(&self) -> usize {
        self.levels.len()
    }

    /// Stores the level in the player's slot, replacing any previous level.
    pub(crate) fn save(&mut self, request: SaveRequest) {
        info!("[{}] Saved custom level", request.player);
        let _ = self
            .levels
            .insert(request.player.to_string(), request.board_text);
    }

    /// Writes every saved level to disk.
    pub(crate) fn flush(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string(&self.levels).context("failed to encode level store")?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write level store at {}", self.path.display()))?;
        self.last_flush = Instant::now();
        info!("Saving custom levels json");
        Ok(())
    }

    /// Flushes when the interval has passed since the last flush.
    pub(crate) fn flush_if_due(&mut self, now: Instant) -> Result<bool> {
        if now.duration_since(self.last_flush) < self.flush_interval {
            return Ok(false);
        }
        self.flush()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sokobot-store-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir.join("levels.json")
    }

    #[test]
    fn missing_file_is_an_empty_store() {
        let store = LevelStore::load(scratch("missing"), Duration::from_secs(60))
            .expect("missing store loads");

        assert_eq!(store.len(), 0);
        assert_eq!(store.get(PlayerId::new(1)), None);
    }

    #[test]
    fn each_player_keeps_a_single_slot() {
        let mut store =
            LevelStore::load(scratch("slots"), Duration::from_secs(60)).expect("store loads");
        let player = PlayerId::new(42);

        store.save(SaveRequest {
            player,
            board_text: "player box goal".to_owned(),
        });
        store.save(SaveRequest {
            player,
            board_text: "goal box player".to_owned(),
        });

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(player), Some("goal box player"));
    }

    #[test]
    fn flushed_levels_survive_a_reload() {
        let path = scratch("reload");
        let mut store = LevelStore::load(&path, Duration::from_secs(60)).expect("store loads");
        store.save(SaveRequest {
            player: PlayerId::new(7),
            board_text: "player box goal\nmoves: 4".to_owned(),
        });
        store.flush().expect("store flushes");

        let contents = fs::read_to_string(&path).expect("store file exists");
        assert_eq!(contents, r#"{"7":"player box goal\nmoves: 4"}"#);

        let reloaded = LevelStore::load(&path, Duration::from_secs(60)).expect("store reloads");
        assert_eq!(reloaded.get(PlayerId::new(7)), Some("player box goal\nmoves: 4"));
    }

    #[test]
    fn flushes_wait_for_the_interval() {
        let mut store =
            LevelStore::load(scratch("interval"), Duration::from_secs(600)).expect("store loads");
        let start = store.last_flush;

        assert!(!store.flush_if_due(start).expect("nothing to flush"));
        assert!(store
            .flush_if_due(start + Duration::from_secs(601))
            .expect("store flushes"));
    }
}
