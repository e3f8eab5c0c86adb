//! medsync configuration.
//!
//! Stored as TOML, by default `medsync.toml` in the working directory
//! (override with `--config` or `$MEDSYNC_CONFIG`). A missing file means
//! defaults. `GIRDER_API_URL`, `GIRDER_TOKEN` and `GIRDER_ROOT_FOLDER_ID`
//! override the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use medsync_girder::ClientConfig;
use medsync_protocol::CHUNK_SIZE;
use medsync_sync::SyncConfig;
use medsync_transfer::UploadOptions;
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "MEDSYNC_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "medsync.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub girder: GirderSection,
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub folders: FolderSection,
    #[serde(default)]
    pub upload: UploadSection,
    #[serde(default)]
    pub archive: ArchiveSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GirderSection {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub token: String,
    /// Folder the `CHU_*` center folders are created under.
    #[serde(default)]
    pub root_folder_id: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSection {
    #[serde(default = "default_database")]
    pub database: PathBuf,
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderSection {
    #[serde(default = "default_true")]
    pub public: bool,
    /// Lets `sync` and `sync-one` create missing folders. `schema`,
    /// `patient` and `upload` always create.
    #[serde(default)]
    pub create_missing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadSection {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,
    #[serde(default = "default_finalize_wait_ms")]
    pub finalize_wait_ms: u64,
    #[serde(default)]
    pub strict_size: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchiveSection {
    /// Only upload `.dcm`/`.dicom` entries when expanding ZIPs.
    #[serde(default)]
    pub dicom_only: bool,
}

fn default_api_url() -> String {
    "http://localhost:8080/api/v1".into()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_database() -> PathBuf {
    PathBuf::from("redcap_mimic.db")
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_true() -> bool {
    true
}

fn default_chunk_size() -> usize {
    CHUNK_SIZE
}

fn default_pacing_ms() -> u64 {
    100
}

fn default_finalize_wait_ms() -> u64 {
    500
}

impl Default for GirderSection {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: String::new(),
            root_folder_id: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            database: default_database(),
            uploads_dir: default_uploads_dir(),
        }
    }
}

impl Default for FolderSection {
    fn default() -> Self {
        Self {
            public: true,
            create_missing: false,
        }
    }
}

impl Default for UploadSection {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            pacing_ms: default_pacing_ms(),
            finalize_wait_ms: default_finalize_wait_ms(),
            strict_size: false,
        }
    }
}

impl Config {
    /// Loads `path` (defaults if it does not exist) and applies environment
    /// overrides.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str::<Config>(&content).with_context(|| format!("parsing {}", path.display()))?
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Config::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(url) = non_empty("GIRDER_API_URL") {
            self.girder.api_url = url;
        }
        if let Some(token) = non_empty("GIRDER_TOKEN") {
            self.girder.token = token;
        }
        if let Some(root) = non_empty("GIRDER_ROOT_FOLDER_ID") {
            self.girder.root_folder_id = root;
        }
    }

    /// HTTP client settings; fails if no token is configured.
    pub fn client_config(&self) -> anyhow::Result<ClientConfig> {
        if self.girder.token.is_empty() {
            bail!("no Girder token configured (set girder.token or GIRDER_TOKEN)");
        }
        Ok(
            ClientConfig::new(&self.girder.api_url, &self.girder.token)
                .with_timeout(Duration::from_secs(self.girder.timeout_secs)),
        )
    }

    /// Sync settings; fails if no root folder is configured.
    pub fn sync_config(&self) -> anyhow::Result<SyncConfig> {
        if self.girder.root_folder_id.is_empty() {
            bail!("no root folder configured (set girder.root_folder_id or GIRDER_ROOT_FOLDER_ID)");
        }
        Ok(SyncConfig {
            root_folder_id: self.girder.root_folder_id.clone(),
            public: self.folders.public,
            create_missing: self.folders.create_missing,
            upload: UploadOptions {
                chunk_size: self.upload.chunk_size,
                pacing: Duration::from_millis(self.upload.pacing_ms),
                finalize_wait: Duration::from_millis(self.upload.finalize_wait_ms),
                strict_size: self.upload.strict_size,
            },
            dicom_only: self.archive.dicom_only,
        })
    }
}

/// Config file path: the CLI flag, then `$MEDSYNC_CONFIG`, then
/// `medsync.toml`.
pub fn config_path(cli: Option<PathBuf>) -> PathBuf {
    cli.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}
