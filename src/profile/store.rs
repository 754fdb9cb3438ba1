//! The persisted collection of profiles

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::defaults;
use super::error::ConfigError;
use super::merge::deep_merge;
use super::types::Profile;

/// Environment variable overriding the location of the configuration file.
pub const CONFIG_VARIABLE: &str = "MARKSHOW_CONFIG";

/// Named profiles plus a pointer to the one used when none is requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationStore {
    pub default_profile: String,
    pub profiles: BTreeMap<String, Profile>,
}

impl ConfigurationStore {
    /// Find the named profile, or the default profile if no name (or an
    /// empty name) was given.
    pub fn resolve(&self, name: Option<&str>) -> Result<&Profile, ConfigError> {
        let name = match name {
            Some(name) if !name.trim().is_empty() => name.trim(),
            _ => self.default_profile.as_str(),
        };

        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::NotFound {
                name: name.to_string(),
                available: self.names(),
            })
    }

    pub fn names(&self) -> Vec<String> {
        self.profiles
            .keys()
            .cloned()
            .collect()
    }

    /// Check the invariants every store must satisfy before it is used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |details: String| Err(ConfigError::Invalid { details });

        if !self
            .profiles
            .contains_key(&self.default_profile)
        {
            return invalid(format!(
                "default profile '{}' does not exist",
                self.default_profile
            ));
        }

        for (key, profile) in &self.profiles {
            if profile
                .name
                .is_empty()
            {
                return invalid(format!("profile '{}' has an empty name", key));
            }
            if &profile.name != key {
                return invalid(format!(
                    "profile '{}' is stored under the key '{}'",
                    profile.name, key
                ));
            }
            if !(profile.image.width_percent > 0.0 && profile.image.width_percent <= 1.0) {
                return invalid(format!(
                    "profile '{}': image width_percent must be in (0, 1], not {}",
                    key, profile.image.width_percent
                ));
            }
            if !(profile.table.width_percent > 0.0 && profile.table.width_percent <= 1.0) {
                return invalid(format!(
                    "profile '{}': table width_percent must be in (0, 1], not {}",
                    key, profile.table.width_percent
                ));
            }
            if let Some(terminal) = &profile.terminal {
                let threshold = terminal
                    .transparency
                    .threshold;
                if !(0.0..=1.0).contains(&threshold) {
                    return invalid(format!(
                        "profile '{}': transparency threshold must be in [0, 1], not {}",
                        key, threshold
                    ));
                }
                if terminal.pixels_per_column == 0 {
                    return invalid(format!("profile '{}': pixels_per_column must be positive", key));
                }
            }
            for dpi in [profile.image.dpi, profile.diagram.dpi]
                .into_iter()
                .flatten()
            {
                if dpi == 0 {
                    return invalid(format!("profile '{}': dpi must be positive", key));
                }
            }
        }

        Ok(())
    }
}

/// Where the configuration lives for this user.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_VARIABLE) {
        return PathBuf::from(path);
    }

    let directory = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    directory
        .join("markshow")
        .join("profiles.json")
}

/// Load the store from the user's configuration file.
pub fn load() -> Result<ConfigurationStore, ConfigError> {
    load_from(&config_path())
}

/// Load the store from the given file. A missing file is not an error: the
/// built-in defaults are written out and returned. A file that is present but
/// unparseable is reported, not repaired.
pub fn load_from(path: &Path) -> Result<ConfigurationStore, ConfigError> {
    info!("Config path: {}", path.display());

    if !path.exists() {
        let store = defaults::builtin();
        if let Err(error) = save_to(&store, path) {
            warn!("Unable to write default configuration: {}", error);
        }
        return Ok(store);
    }

    let content = fs::read_to_string(path).map_err(|error| ConfigError::Io {
        path: path.to_path_buf(),
        details: error
            .kind()
            .to_string(),
    })?;

    parse(path, &content)
}

/// Parse an override document and apply it on top of the built-in defaults.
pub fn parse(path: &Path, content: &str) -> Result<ConfigurationStore, ConfigError> {
    let corrupt = |details: String| ConfigError::Corrupt {
        path: path.to_path_buf(),
        details,
    };

    let overlay: Value = serde_json::from_str(content).map_err(|e| corrupt(e.to_string()))?;
    if !overlay.is_object() {
        return Err(corrupt("expected a JSON object at the top level".to_string()));
    }

    let document = overlay_onto_defaults(overlay).map_err(|e| corrupt(e.to_string()))?;
    let store: ConfigurationStore =
        serde_json::from_value(document).map_err(|e| corrupt(e.to_string()))?;

    store.validate()?;

    debug!("Loaded {} profiles", store.profiles.len());
    Ok(store)
}

// Profiles that exist in the defaults are deep-merged key by key. Profiles
// only present in the override are seeded from the built-in profile for the
// same target, so they too only need to state what differs.
fn overlay_onto_defaults(mut overlay: Value) -> Result<Value, serde_json::Error> {
    let builtin = defaults::builtin();
    let mut base = serde_json::to_value(&builtin)?;

    if let Some(Value::Object(profiles)) = overlay.get_mut("profiles") {
        for (name, profile) in profiles.iter_mut() {
            if builtin
                .profiles
                .contains_key(name)
            {
                continue;
            }

            let seed = match profile.get("target") {
                Some(target) => builtin
                    .profiles
                    .values()
                    .find(|p| serde_json::to_value(p.target).ok().as_ref() == Some(target)),
                None => None,
            }
            .or_else(|| {
                builtin
                    .profiles
                    .get(defaults::DEFAULT_PROFILE)
            });

            if let Some(seed) = seed {
                let mut seeded = serde_json::to_value(seed)?;
                if let Value::Object(fields) = &mut seeded {
                    fields.insert("name".to_string(), Value::String(name.clone()));
                }
                deep_merge(&mut seeded, profile.take());
                *profile = seeded;
            }
        }
    }

    deep_merge(&mut base, overlay);
    Ok(base)
}

/// Write the store to the given file, replacing it atomically.
pub fn save_to(store: &ConfigurationStore, path: &Path) -> Result<(), ConfigError> {
    let io = |error: std::io::Error| ConfigError::Io {
        path: path.to_path_buf(),
        details: error
            .kind()
            .to_string(),
    };

    if let Some(parent) = path.parent() {
        if !parent
            .as_os_str()
            .is_empty()
        {
            fs::create_dir_all(parent).map_err(io)?;
        }
    }

    let content = serde_json::to_string_pretty(store).map_err(|e| ConfigError::Invalid {
        details: e.to_string(),
    })?;

    let temporary = path.with_extension("json.tmp");
    fs::write(&temporary, content + "\n").map_err(io)?;
    fs::rename(&temporary, path).map_err(io)?;

    debug!("Wrote configuration to {}", path.display());
    Ok(())
}

/// Write the store to the user's configuration file.
pub fn save(store: &ConfigurationStore) -> Result<(), ConfigError> {
    save_to(store, &config_path())
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn resolve_default_when_unnamed() {
        let store = defaults::builtin();

        let profile = store
            .resolve(None)
            .unwrap();
        assert_eq!(profile.name, store.default_profile);

        let profile = store
            .resolve(Some(""))
            .unwrap();
        assert_eq!(profile.name, store.default_profile);
    }

    #[test]
    fn resolve_unknown_lists_available() {
        let store = defaults::builtin();

        let error = store
            .resolve(Some("nonexistent"))
            .unwrap_err();
        match &error {
            ConfigError::NotFound { name, available } => {
                assert_eq!(name, "nonexistent");
                assert_eq!(available, &store.names());
            }
            other => panic!("unexpected error {:?}", other),
        }

        let message = error.to_string();
        for name in store.names() {
            assert!(message.contains(&name), "{} missing from {}", name, message);
        }
    }

    #[test]
    fn builtin_store_is_valid() {
        defaults::builtin()
            .validate()
            .unwrap();
    }

    #[test]
    fn partial_override_inherits_defaults() {
        let content = r#"{"profiles": {"terminal": {"image": {"width_percent": 0.5}}}}"#;
        let store = parse(Path::new("test.json"), content).unwrap();

        let profile = store
            .resolve(Some("terminal"))
            .unwrap();
        assert_eq!(profile.image.width_percent, 0.5);
        assert_eq!(profile.image.alignment, defaults::terminal().image.alignment);
        assert_eq!(profile.diagram, defaults::terminal().diagram);
    }

    #[test]
    fn new_profile_seeded_from_target() {
        let content = r#"{"profiles": {"slides": {"target": "paginated-document", "theme": "dark"}}}"#;
        let store = parse(Path::new("test.json"), content).unwrap();

        let profile = store
            .resolve(Some("slides"))
            .unwrap();
        assert_eq!(profile.name, "slides");
        assert!(profile
            .document
            .is_some());
    }

    #[test]
    fn unparseable_is_corrupt() {
        let result = parse(Path::new("test.json"), "{ not json");
        assert!(matches!(result, Err(ConfigError::Corrupt { .. })));

        let result = parse(Path::new("test.json"), r#"{"profiles": {"terminal": {"theme": 7}}}"#);
        assert!(matches!(result, Err(ConfigError::Corrupt { .. })));
    }

    #[test]
    fn invariants_enforced() {
        let content = r#"{"profiles": {"terminal": {"image": {"width_percent": 1.5}}}}"#;
        assert!(matches!(
            parse(Path::new("test.json"), content),
            Err(ConfigError::Invalid { .. })
        ));

        let content = r#"{"default_profile": "missing"}"#;
        assert!(matches!(
            parse(Path::new("test.json"), content),
            Err(ConfigError::Invalid { .. })
        ));

        let content = r#"{"profiles": {"pdf": {"name": "other"}}}"#;
        assert!(matches!(
            parse(Path::new("test.json"), content),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
