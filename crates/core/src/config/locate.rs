//! Finds the config file: the legacy `~/.projectM` location first, then the
//! XDG config directory, creating a commented default there if needed.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use super::{ActorConfig, ConfigFile, DEFAULT_CONFIG_TEMPLATE};
use crate::{ActorError, Result};

/// Location used by projectM releases before 4.0, relative to `$HOME`.
pub const LEGACY_CONFIG: &str = ".projectM/config.inp";

/// Directory created below the XDG config home.
pub const CONFIG_DIR_NAME: &str = "libvisual-projectm";

pub const CONFIG_FILE_NAME: &str = "config.inp";

/// Where the settings were (or were not) found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `~/.projectM/config.inp`.
    Legacy(PathBuf),
    /// An existing file in the XDG config directory.
    Xdg(PathBuf),
    /// No file existed; a commented default was just written.
    Created(PathBuf),
    /// No usable file; built-in defaults apply.
    Unavailable,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Legacy(path) | Self::Xdg(path) | Self::Created(path) => Some(path),
            Self::Unavailable => None,
        }
    }
}

/// Resolves the config file from `HOME` and `XDG_CONFIG_HOME`.
///
/// Empty variables are treated as unset. Without a home directory no file is
/// looked up at all, even when `XDG_CONFIG_HOME` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLocator {
    home: Option<PathBuf>,
    xdg_config_home: Option<PathBuf>,
}

impl ConfigLocator {
    pub fn new(home: Option<PathBuf>, xdg_config_home: Option<PathBuf>) -> Self {
        Self {
            home: home.filter(|path| !path.as_os_str().is_empty()),
            xdg_config_home: xdg_config_home.filter(|path| !path.as_os_str().is_empty()),
        }
    }

    /// Reads `HOME` and `XDG_CONFIG_HOME` from the process environment.
    pub fn from_env() -> Self {
        Self::new(
            env::var_os("HOME").map(PathBuf::from),
            env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        )
    }

    pub fn legacy_path(&self) -> Option<PathBuf> {
        self.home.as_ref().map(|home| home.join(LEGACY_CONFIG))
    }

    /// `$XDG_CONFIG_HOME/libvisual-projectm`, or `~/.config/libvisual-projectm`.
    pub fn config_dir(&self) -> Option<PathBuf> {
        let home = self.home.as_ref()?;
        let base = match &self.xdg_config_home {
            Some(xdg) => xdg.clone(),
            None => home.join(".config"),
        };
        Some(base.join(CONFIG_DIR_NAME))
    }

    pub fn xdg_path(&self) -> Option<PathBuf> {
        self.config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
    }

    /// Looks for an existing file without touching the filesystem otherwise.
    pub fn find(&self) -> ConfigSource {
        if let Some(legacy) = self.legacy_path().filter(|path| is_readable_file(path)) {
            return ConfigSource::Legacy(legacy);
        }

        match self.xdg_path().filter(|path| is_readable_file(path)) {
            Some(path) => ConfigSource::Xdg(path),
            None => ConfigSource::Unavailable,
        }
    }

    /// Like [`ConfigLocator::find`], but writes the default file to the XDG
    /// location when nothing exists yet. Failures are logged, never returned.
    pub fn locate_or_create(&self) -> ConfigSource {
        let Some(xdg) = self.xdg_path() else {
            tracing::info!("HOME is not set, using default settings");
            return ConfigSource::Unavailable;
        };

        match self.find() {
            ConfigSource::Unavailable => {}
            found => {
                if let Some(path) = found.path() {
                    tracing::info!(path = %path.display(), "reading config file");
                }
                return found;
            }
        }

        match write_template(&xdg).and_then(|()| ensure_readable(&xdg)) {
            Ok(()) => {
                tracing::info!(path = %xdg.display(), "created default config file");
                ConfigSource::Created(xdg)
            }
            Err(err) => {
                tracing::warn!(
                    path = %xdg.display(),
                    error = %err,
                    "cannot create config file, using default settings"
                );
                ConfigSource::Unavailable
            }
        }
    }

    /// Writes the default template to the XDG location and returns its path.
    /// An existing file is only replaced when `force` is set.
    pub fn write_default(&self, force: bool) -> Result<PathBuf> {
        let path = self
            .xdg_path()
            .ok_or_else(|| ActorError::msg("HOME is not set, cannot place a config file"))?;

        if !force && path.exists() {
            return Err(ActorError::msg(format!(
                "`{}` already exists, pass --force to overwrite it",
                path.display()
            )));
        }

        write_template(&path)?;
        Ok(path)
    }

    /// Resolves and parses the settings, falling back to defaults whenever
    /// the file is missing or unreadable.
    pub fn load(&self) -> ActorConfig {
        let source = self.locate_or_create();
        let Some(path) = source.path() else {
            return ActorConfig::default();
        };

        match ConfigFile::load(path) {
            Ok(file) => ActorConfig::from_file(&file),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "cannot read config file, using default settings"
                );
                ActorConfig::default()
            }
        }
    }
}

fn write_template(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if let Err(err) = fs::create_dir_all(dir) {
            tracing::warn!(dir = %dir.display(), error = %err, "cannot create config directory");
        }
    }
    fs::write(path, DEFAULT_CONFIG_TEMPLATE)?;
    Ok(())
}

fn ensure_readable(path: &Path) -> Result<()> {
    if is_readable_file(path) {
        Ok(())
    } else {
        Err(ActorError::msg("written config file cannot be read back"))
    }
}

fn is_readable_file(path: &Path) -> bool {
    fs::File::open(path)
        .and_then(|file| file.metadata())
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn locator(home: &TempDir, xdg: Option<&Path>) -> ConfigLocator {
        ConfigLocator::new(Some(home.path().to_path_buf()), xdg.map(Path::to_path_buf))
    }

    #[test]
    fn prefers_the_legacy_location() {
        let home = TempDir::new().unwrap();
        let legacy = home.path().join(LEGACY_CONFIG);
        fs::create_dir_all(legacy.parent().unwrap()).unwrap();
        fs::write(&legacy, "FPS = 25\n").unwrap();

        let xdg = home.path().join(".config").join(CONFIG_DIR_NAME);
        fs::create_dir_all(&xdg).unwrap();
        fs::write(xdg.join(CONFIG_FILE_NAME), "FPS = 50\n").unwrap();

        let locator = locator(&home, None);
        assert_eq!(locator.locate_or_create(), ConfigSource::Legacy(legacy));
        assert_eq!(locator.load().fps, 25);
    }

    #[test]
    fn falls_back_to_home_dot_config_without_xdg() {
        let home = TempDir::new().unwrap();
        let locator = locator(&home, None);

        assert_eq!(
            locator.xdg_path(),
            Some(home.path().join(".config/libvisual-projectm/config.inp"))
        );
    }

    #[test]
    fn empty_xdg_variable_counts_as_unset() {
        let home = TempDir::new().unwrap();
        let locator = ConfigLocator::new(Some(home.path().to_path_buf()), Some(PathBuf::new()));

        assert_eq!(
            locator.config_dir(),
            Some(home.path().join(".config").join(CONFIG_DIR_NAME))
        );
    }

    #[test]
    fn reads_existing_xdg_file() {
        let home = TempDir::new().unwrap();
        let xdg = TempDir::new().unwrap();
        let dir = xdg.path().join(CONFIG_DIR_NAME);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE_NAME), "Mesh X = 64\n").unwrap();

        let locator = locator(&home, Some(xdg.path()));
        assert_eq!(
            locator.locate_or_create(),
            ConfigSource::Xdg(dir.join(CONFIG_FILE_NAME))
        );
        assert_eq!(locator.load().mesh_width, 64);
    }

    #[test]
    fn creates_commented_default_when_missing() {
        let home = TempDir::new().unwrap();
        let xdg = TempDir::new().unwrap();
        let locator = locator(&home, Some(xdg.path()));

        assert_eq!(locator.find(), ConfigSource::Unavailable);

        let expected = xdg.path().join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
        assert_eq!(locator.locate_or_create(), ConfigSource::Created(expected.clone()));

        let written = fs::read_to_string(&expected).unwrap();
        assert_eq!(written, DEFAULT_CONFIG_TEMPLATE);
        assert_eq!(locator.find(), ConfigSource::Xdg(expected));
    }

    #[test]
    fn without_home_nothing_is_looked_up() {
        let xdg = TempDir::new().unwrap();
        let locator = ConfigLocator::new(None, Some(xdg.path().to_path_buf()));

        assert_eq!(locator.locate_or_create(), ConfigSource::Unavailable);
        assert_eq!(locator.load(), ActorConfig::default());
        assert!(fs::read_dir(xdg.path()).unwrap().next().is_none());
    }

    #[test]
    fn unwritable_location_falls_back_to_defaults() {
        let home = TempDir::new().unwrap();
        let blocker = home.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let locator = locator(&home, Some(&blocker));
        assert_eq!(locator.locate_or_create(), ConfigSource::Unavailable);
        assert_eq!(locator.load(), ActorConfig::default());
    }

    #[test]
    fn write_default_refuses_to_overwrite_without_force() {
        let home = TempDir::new().unwrap();
        let locator = locator(&home, None);

        let path = locator.write_default(false).unwrap();
        fs::write(&path, "FPS = 12\n").unwrap();

        assert!(locator.write_default(false).is_err());
        locator.write_default(true).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), DEFAULT_CONFIG_TEMPLATE);
    }
}
