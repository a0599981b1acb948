use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::AudioError;

/// Directory of generated clips, one uniquely named file per request.
#[derive(Clone, Debug)]
pub struct AudioStore {
    dir: PathBuf,
}

impl AudioStore {
    pub async fn new(dir: impl AsRef<Path>) -> Result<Self, AudioError> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes a clip and returns its file name.
    pub async fn save(&self, audio: &[u8]) -> Result<String, AudioError> {
        let filename = format!("prediction_{}.mp3", Uuid::new_v4().simple());
        let final_path = self.dir.join(&filename);
        // readers never see a partially written clip
        let tmp_path = self.dir.join(format!(".{}.part", filename));

        tokio::fs::write(&tmp_path, audio).await?;
        tokio::fs::rename(&tmp_path, &final_path).await?;

        tracing::debug!(file = %filename, bytes = audio.len(), "Stored audio clip");
        Ok(filename)
    }

    pub async fn read(&self, filename: &str) -> Result<Vec<u8>, AudioError> {
        if !is_plain_name(filename) {
            return Err(AudioError::InvalidName(filename.to_string()));
        }
        Ok(tokio::fs::read(self.dir.join(filename)).await?)
    }
}

/// A single visible path component: no separators, no `..`, no dotfiles.
fn is_plain_name(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.starts_with('.')
        && !filename.contains(['/', '\\'])
        && !filename.contains("..")
}
