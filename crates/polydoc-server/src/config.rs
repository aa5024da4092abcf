use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use polydoc_codec::{Codec, Encoding, SequenceSchema};
use polydoc_store::FileStore;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Which HTTP surface the server mounts over the document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Generic CRUD over root-level collections.
    #[default]
    Collections,
    /// Projections over the nested book-batch document.
    Library,
}

impl Mode {
    /// Sequence positions the codec normalizes for this document shape.
    pub fn schema(self) -> SequenceSchema {
        match self {
            Self::Collections => SequenceSchema::collections(),
            Self::Library => polydoc_library::sequence_schema(),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Collections => "collections",
            Self::Library => "library",
        })
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "collections" => Ok(Self::Collections),
            "library" => Ok(Self::Library),
            other => Err(format!("unknown mode `{other}` (expected collections or library)")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Document file; the extension selects the encoding.
    pub data_file: PathBuf,
    pub mode: Mode,
    /// Root element name for XML documents.
    pub xml_root: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_file: PathBuf::from("db_files/db.json"),
            mode: Mode::default(),
            xml_root: polydoc_codec::xml::DEFAULT_ROOT.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// The file store this configuration describes.
    pub fn open_store(&self) -> ServerResult<FileStore> {
        let encoding = Encoding::from_path(&self.data_file).map_err(|e| ServerError::Config(e.to_string()))?;
        let codec = Codec::new(encoding)
            .with_schema(self.mode.schema())
            .with_xml_root(self.xml_root.clone());
        Ok(FileStore::with_codec(&self.data_file, codec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polydoc_store::DocumentStore;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(c.data_file, PathBuf::from("db_files/db.json"));
        assert_eq!(c.mode, Mode::Collections);
        assert_eq!(c.xml_root, "database");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = ServerConfig::from_toml("mode = \"library\"\ndata_file = \"data/db.yml\"\n").unwrap();
        assert_eq!(c.mode, Mode::Library);
        assert_eq!(c.data_file, PathBuf::from("data/db.yml"));
        assert_eq!(c.bind_addr.port(), 3000);
    }

    #[test]
    fn bad_toml_is_config_error() {
        let err = ServerConfig::from_toml("mode = \"ledger\"").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn mode_parses() {
        assert_eq!("library".parse::<Mode>().unwrap(), Mode::Library);
        assert_eq!(Mode::Collections.to_string(), "collections");
        assert!("graph".parse::<Mode>().is_err());
    }

    #[test]
    fn store_follows_extension() {
        let c = ServerConfig { data_file: "db.xml".into(), ..ServerConfig::default() };
        assert_eq!(c.open_store().unwrap().encoding(), Encoding::Xml);

        let c = ServerConfig { data_file: "db.csv".into(), ..ServerConfig::default() };
        assert!(matches!(c.open_store(), Err(ServerError::Config(_))));
    }
}
