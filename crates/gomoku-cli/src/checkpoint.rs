//! Model snapshots written during a training run.
//!
//! Each snapshot is a pair of files in the checkpoint directory: `<n>-train.json`, the
//! network after `n` games, and `<n>-train.meta.json`, describing the run at that point.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use gomoku_brain::Brain;
use gomoku_training::trainer::TrainingStats;
use serde::{Deserialize, Serialize};

use crate::util;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointMeta {
    pub saved_at: DateTime<Utc>,
    /// Games played since the network was created, across resumed runs.
    pub games_played: usize,
    pub seed: u64,
    /// Counters of the run that wrote this snapshot.
    pub stats: TrainingStats,
}

pub fn model_path(dir: &Path, games_played: usize) -> PathBuf {
    dir.join(format!("{games_played}-train.json"))
}

pub fn meta_path(model_path: &Path) -> PathBuf {
    model_path.with_extension("meta.json")
}

/// Writes the network and its metadata, returning the model path.
pub fn save(dir: &Path, brain: &Brain, meta: &CheckpointMeta) -> anyhow::Result<PathBuf> {
    let path = model_path(dir, meta.games_played);
    brain
        .save(&path)
        .with_context(|| format!("Failed to save checkpoint {}", path.display()))?;
    util::write_json_file(&meta_path(&path), meta)?;
    log::info!(
        "saved checkpoint after {} games to {}",
        meta.games_played,
        path.display()
    );
    Ok(path)
}

/// Reads the metadata stored next to `model_path`, if there is any.
pub fn read_meta(model_path: &Path) -> anyhow::Result<Option<CheckpointMeta>> {
    let path = meta_path(model_path);
    if !path.exists() {
        return Ok(None);
    }
    util::read_json_file("checkpoint metadata", path).map(Some)
}

#[cfg(test)]
mod tests {
    use gomoku_brain::BrainParams;

    use super::*;

    #[test]
    fn test_paths() {
        let model = model_path(Path::new("models"), 3000);
        assert_eq!(model, PathBuf::from("models/3000-train.json"));
        assert_eq!(
            meta_path(&model),
            PathBuf::from("models/3000-train.meta.json")
        );
    }

    #[test]
    fn test_save_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let params = BrainParams {
            hidden_layers: 1,
            hidden_neurons: 4,
            ..BrainParams::default()
        };
        let brain = Brain::filled(3, 3, &params, 0.5);
        let meta = CheckpointMeta {
            saved_at: Utc::now(),
            games_played: 12,
            seed: 5,
            stats: TrainingStats {
                games: 12,
                draws: 12,
                ..TrainingStats::default()
            },
        };

        let path = save(dir.path(), &brain, &meta).unwrap();
        assert_eq!(path, dir.path().join("12-train.json"));
        assert_eq!(Brain::load(&path).unwrap(), brain);
        assert_eq!(read_meta(&path).unwrap(), Some(meta));
    }

    #[test]
    fn test_missing_meta_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_meta(&dir.path().join("1-train.json")).unwrap(), None);
    }
}
