//! Service configuration.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Config file used when none is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "conf.toml";

/// Listen address used when the config has none.
pub const DEFAULT_LISTEN: &str = "0.0.0.0:8081";

/// Configuration for one managed host.
///
/// Keys are snake_case; the PascalCase keys of the older JSON format
/// (`File`, `BackupDir`, ...) are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Zone fragment file that holds the host's records.
    #[serde(alias = "File")]
    pub file: PathBuf,

    /// Owner name of the managed A/AAAA lines.
    #[serde(alias = "Host")]
    pub host: String,

    /// Zone name, shown on the page only.
    #[serde(alias = "Domain", default)]
    pub domain: String,

    /// Directory that receives a timestamped copy before each rewrite.
    #[serde(alias = "BackupDir")]
    pub backup_dir: PathBuf,

    /// Shell command that reloads the DNS daemon (run with `sh -c`).
    /// Empty means no reload.
    #[serde(alias = "Command", default)]
    pub command: String,

    /// HTTP listen addresses. `:port` binds all IPv4 interfaces.
    #[serde(alias = "Addresses", default = "default_addresses")]
    pub addresses: Vec<String>,

    /// Stop before touching the zone file if the backup cannot be written.
    #[serde(alias = "AbortOnBackupFailure", default)]
    pub abort_on_backup_failure: bool,

    /// Terminate the kept content with a newline before appending records
    /// when the zone file does not end with one.
    #[serde(alias = "EnsureTrailingNewline", default)]
    pub ensure_trailing_newline: bool,
}

fn default_addresses() -> Vec<String> {
    vec![String::from(DEFAULT_LISTEN)]
}

impl Config {
    /// Load and validate a config file.
    ///
    /// `.json` files are parsed as JSON, everything else as TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed: Result<Self, String> = if is_json {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else {
            toml::from_str(&content).map_err(|e| e.to_string())
        };
        let config = parsed.map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Check field values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("file must not be empty".into()));
        }
        if self.file.file_name().is_none() {
            return Err(ConfigError::Invalid(format!(
                "file {} has no file name",
                self.file.display()
            )));
        }
        if self.host.is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".into()));
        }
        if self.host.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid(format!(
                "host {:?} must not contain whitespace",
                self.host
            )));
        }
        if self.addresses.is_empty() {
            return Err(ConfigError::Invalid("no addresses to listen on".into()));
        }
        self.listen_addrs()?;
        Ok(())
    }

    /// Parsed listen addresses.
    pub fn listen_addrs(&self) -> Result<Vec<SocketAddr>, ConfigError> {
        self.addresses
            .iter()
            .map(|addr| parse_listen_addr(addr))
            .collect()
    }
}

fn parse_listen_addr(addr: &str) -> Result<SocketAddr, ConfigError> {
    let addr = addr.trim();
    let full = if addr.starts_with(':') {
        format!("0.0.0.0{addr}")
    } else {
        addr.to_owned()
    };
    full.parse()
        .map_err(|e| ConfigError::Invalid(format!("listen address {addr:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample() -> Config {
        Config {
            file: PathBuf::from("/etc/bind/db.example.inc"),
            host: "www".into(),
            domain: "example.com".into(),
            backup_dir: PathBuf::from("/var/backups/zonepin"),
            command: "rndc reload".into(),
            addresses: default_addresses(),
            abort_on_backup_failure: false,
            ensure_trailing_newline: false,
        }
    }

    #[test]
    fn test_load_toml() {
        let mut tmpfile = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            tmpfile,
            r#"
file = "/etc/bind/db.example.inc"
host = "www"
domain = "example.com"
backup_dir = "/var/backups/zonepin"
command = "rndc reload"
"#
        )
        .unwrap();

        let config = Config::load(tmpfile.path()).unwrap();
        assert_eq!(config, sample());
        assert_eq!(config.listen_addrs().unwrap()[0].port(), 8081);
    }

    #[test]
    fn test_load_json_with_legacy_keys() {
        let mut tmpfile = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            tmpfile,
            r#"{{
                "File": "/etc/bind/db.example.inc",
                "Domain": "example.com",
                "Host": "www",
                "Command": "rndc reload",
                "BackupDir": "/var/backups/zonepin",
                "Addresses": [":8081", "[::1]:8082"]
            }}"#
        )
        .unwrap();

        let config = Config::load(tmpfile.path()).unwrap();
        assert_eq!(config.host, "www");
        assert!(!config.abort_on_backup_failure);
        assert!(!config.ensure_trailing_newline);
        let addrs = config.listen_addrs().unwrap();
        assert_eq!(addrs[0], "0.0.0.0:8081".parse().unwrap());
        assert_eq!(addrs[1], "[::1]:8082".parse().unwrap());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/zonepin.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_missing_required_field() {
        let mut tmpfile = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(tmpfile, "host = \"www\"").unwrap();
        let err = Config::load(tmpfile.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_validate_rejects_bad_host() {
        let mut config = sample();
        config.host = String::new();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.host = "www example".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_empty_listen_list() {
        let mut config = sample();
        config.addresses.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_bad_listen_addr() {
        let mut config = sample();
        config.addresses = vec!["localhost".into()];
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
