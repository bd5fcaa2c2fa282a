use std::path::PathBuf;

use crate::error::{Error, Result};

/// Environment variable naming the sheet JSON to load.
pub const DATA_ENV: &str = "CYCLETIME_DATA";

/// Where the dashboard reads its table from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_path: PathBuf,
}

impl Config {
    /// Resolve the data path: explicit flag, then `CYCLETIME_DATA`, then `~/.cycletime/sheet.json`.
    pub fn resolve(flag: Option<&str>) -> Result<Self> {
        let env = std::env::var(DATA_ENV).ok();
        Self::resolve_with(flag, env.as_deref(), dirs::home_dir())
    }

    fn resolve_with(
        flag: Option<&str>,
        env: Option<&str>,
        home: Option<PathBuf>,
    ) -> Result<Self> {
        if let Some(path) = flag.or(env).filter(|p| !p.trim().is_empty()) {
            return Ok(Self {
                data_path: PathBuf::from(path),
            });
        }
        let home = home.ok_or_else(|| {
            Error::Config(format!(
                "cannot determine home directory; pass --data or set {DATA_ENV}"
            ))
        })?;
        Ok(Self {
            data_path: home.join(".cycletime").join("sheet.json"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins() {
        let c = Config::resolve_with(Some("a.json"), Some("b.json"), Some("/home/x".into())).unwrap();
        assert_eq!(c.data_path, PathBuf::from("a.json"));
    }

    #[test]
    fn test_env_before_default() {
        let c = Config::resolve_with(None, Some("b.json"), Some("/home/x".into())).unwrap();
        assert_eq!(c.data_path, PathBuf::from("b.json"));
    }

    #[test]
    fn test_default_under_home() {
        let c = Config::resolve_with(None, None, Some("/home/x".into())).unwrap();
        assert_eq!(c.data_path, PathBuf::from("/home/x/.cycletime/sheet.json"));
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let c = Config::resolve_with(None, Some("  "), Some("/home/x".into())).unwrap();
        assert_eq!(c.data_path, PathBuf::from("/home/x/.cycletime/sheet.json"));
    }

    #[test]
    fn test_no_home() {
        assert!(matches!(
            Config::resolve_with(None, None, None),
            Err(Error::Config(_))
        ));
    }
}
