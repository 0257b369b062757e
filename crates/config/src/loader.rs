//! Locate and read the settings file.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::{Error, Result, Settings};

/// `$HOME/.config/launchpick/config.json`.
pub fn default_path() -> Result<PathBuf> {
    let home = env::var_os("HOME").ok_or(Error::NoHome)?;
    Ok(PathBuf::from(home).join(".config/launchpick/config.json"))
}

/// Read and parse settings from `path`.
pub fn load(path: &Path) -> Result<Settings> {
    let text = fs::read_to_string(path).map_err(|e| Error::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| Error::from_json(Some(path.to_path_buf()), &e))
}

/// Read settings from `path`, falling back to defaults on any error.
///
/// A missing file is expected on first run and logged at debug; anything
/// else is logged as a warning.
pub fn load_or_default(path: &Path) -> Settings {
    if !path.exists() {
        debug!(path = %path.display(), "config_missing_using_defaults");
        return Settings::default();
    }
    match load(path) {
        Ok(s) => {
            debug!(path = %path.display(), "config_loaded");
            s
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "config_load_failed_using_defaults");
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::process;

    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("launchpick-config-{}", process::id()));
        fs::create_dir_all(&dir).unwrap();
        let p = dir.join(name);
        fs::write(&p, contents).unwrap();
        p
    }

    #[test]
    fn default_path_is_under_home() {
        if env::var_os("HOME").is_some() {
            let p = default_path().unwrap();
            assert!(p.ends_with(".config/launchpick/config.json"));
        }
    }

    #[test]
    fn load_reads_file() {
        let p = temp_file("ok.json", r#"{"columns": 6}"#);
        let s = load(&p).unwrap();
        assert_eq!(s.columns, 6);
    }

    #[test]
    fn load_or_default_falls_back() {
        let bad = temp_file("bad.json", "not json");
        assert!(matches!(load(&bad), Err(Error::Parse { path: Some(_), .. })));
        assert_eq!(load_or_default(&bad), Settings::default());

        let missing = env::temp_dir().join("launchpick-definitely-missing.json");
        assert!(matches!(load(&missing), Err(Error::Read { .. })));
        assert_eq!(load_or_default(&missing), Settings::default());
    }
}
