use crate::model::Team;
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait Storage {
    /// Charge une équipe depuis un support.
    fn load(&self) -> anyhow::Result<Team>;
    /// Sauvegarde de manière atomique.
    fn save(&self, team: &Team) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self { path: path.as_ref().to_path_buf() })
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Team> {
        let data = fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let team: Team = serde_json::from_slice(&data).with_context(|| "parsing team.json")?;
        team.validate()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("validating {}", self.path.display()))?;
        Ok(team)
    }

    fn save(&self, team: &Team) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(team)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}
