//! Profile persistence.
//!
//! Profiles are JSON files under the platform config directory
//! (`~/.config/plotkit` on Linux), one file per profile named
//! `<name>.json`, plus `last_used.json` holding the profile that was
//! active when the application last exited.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::profile::MachineProfile;
use plotkit_core::{ConfigError, Error, Result};

const LAST_USED_FILE: &str = "last_used.json";

/// Loads and saves machine profiles under a root directory.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    root: PathBuf,
}

impl ProfileStore {
    /// Store under the platform config directory.
    pub fn new() -> Result<Self> {
        let root = dirs::config_dir()
            .ok_or_else(|| Error::other("no config directory on this platform"))?
            .join("plotkit");
        Ok(Self { root })
    }

    /// Store under an explicit root (tests, portable installs).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn profile_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }

    fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| {
            ConfigError::Io {
                name: self.root.display().to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    fn write_json(&self, path: &Path, profile: &MachineProfile) -> Result<()> {
        self.ensure_root()?;
        let json = serde_json::to_string_pretty(profile).map_err(|e| ConfigError::Malformed {
            name: profile.name.clone(),
            reason: e.to_string(),
        })?;
        fs::write(path, json).map_err(|e| ConfigError::Io {
            name: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    fn read_json(&self, path: &Path, name: &str) -> Result<MachineProfile> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        let profile: MachineProfile =
            serde_json::from_str(&text).map_err(|e| ConfigError::Malformed {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        profile.validate()?;
        Ok(profile)
    }

    /// Saves a profile under its own name.
    pub fn save_profile(&self, profile: &MachineProfile) -> Result<()> {
        profile.validate()?;
        let path = self.profile_path(&profile.name);
        self.write_json(&path, profile)?;
        info!(name = %profile.name, path = %path.display(), "profile saved");
        Ok(())
    }

    /// Loads a profile by name.
    pub fn load_profile(&self, name: &str) -> Result<MachineProfile> {
        self.read_json(&self.profile_path(name), name)
    }

    /// Names of all stored profiles, sorted.
    pub fn list_profiles(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ConfigError::Io {
                    name: self.root.display().to_string(),
                    reason: e.to_string(),
                }
                .into())
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if path.extension()? != "json" {
                    return None;
                }
                let stem = path.file_stem()?.to_str()?.to_string();
                (stem != "last_used").then_some(stem)
            })
            .collect();
        names.sort();
        Ok(names)
    }

    /// Deletes a profile file.
    pub fn delete_profile(&self, name: &str) -> Result<()> {
        fs::remove_file(self.profile_path(name)).map_err(|e| {
            ConfigError::Io {
                name: name.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Records the profile active at shutdown.
    pub fn save_last_used(&self, profile: &MachineProfile) -> Result<()> {
        self.write_json(&self.root.join(LAST_USED_FILE), profile)
    }

    /// Loads the profile active at the last shutdown.
    pub fn load_last_used(&self) -> Result<MachineProfile> {
        self.read_json(&self.root.join(LAST_USED_FILE), "last_used")
    }

    /// Loads the last-used profile, falling back to defaults on any
    /// failure. Malformed files are logged, not fatal.
    pub fn load_last_used_or_default(&self) -> MachineProfile {
        match self.load_last_used() {
            Ok(profile) => profile,
            Err(e) => {
                warn!(error = %e, "falling back to the default profile");
                MachineProfile::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, ProfileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::with_root(dir.path());
        (dir, store)
    }

    #[test]
    fn save_and_load_round_trip() {
        let (_dir, store) = store();
        let profile = MachineProfile {
            name: "laser-a3".to_string(),
            bed_width: 410.0,
            bed_height: 297.0,
            laser_power: 500,
            ..MachineProfile::default()
        };
        store.save_profile(&profile).unwrap();
        let loaded = store.load_profile("laser-a3").unwrap();
        assert_eq!(loaded, profile);
    }

    #[test]
    fn list_excludes_the_last_used_marker() {
        let (_dir, store) = store();
        let mut a = MachineProfile::default();
        a.name = "alpha".to_string();
        let mut b = MachineProfile::default();
        b.name = "beta".to_string();
        store.save_profile(&a).unwrap();
        store.save_profile(&b).unwrap();
        store.save_last_used(&a).unwrap();

        assert_eq!(store.list_profiles().unwrap(), vec!["alpha", "beta"]);
    }

    #[test]
    fn last_used_round_trips() {
        let (_dir, store) = store();
        let mut profile = MachineProfile::default();
        profile.name = "workhorse".to_string();
        profile.port = Some("/dev/ttyUSB0".to_string());
        store.save_last_used(&profile).unwrap();
        assert_eq!(store.load_last_used().unwrap(), profile);
    }

    #[test]
    fn malformed_file_falls_back_to_default() {
        let (_dir, store) = store();
        fs::create_dir_all(store.root()).unwrap();
        fs::write(store.root().join(LAST_USED_FILE), "{not json").unwrap();
        let profile = store.load_last_used_or_default();
        assert_eq!(profile, MachineProfile::default());
    }

    #[test]
    fn missing_store_lists_nothing() {
        let (_dir, store) = store();
        assert!(store.list_profiles().unwrap().is_empty());
        assert!(store.load_profile("nope").is_err());
    }

    #[test]
    fn invalid_profile_is_rejected_on_save_and_load() {
        let (_dir, store) = store();
        let bad = MachineProfile {
            bed_width: -5.0,
            ..MachineProfile::default()
        };
        assert!(store.save_profile(&bad).is_err());

        // A hand-edited file with bad values fails validation on load.
        fs::create_dir_all(store.root()).unwrap();
        fs::write(
            store.root().join("broken.json"),
            r#"{"name":"broken","stream_ceiling":0}"#,
        )
        .unwrap();
        assert!(store.load_profile("broken").is_err());
    }
}
