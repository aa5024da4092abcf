use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};

/// On-disk encodings a document can be stored in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Json,
    Yaml,
    Xml,
}

impl Encoding {
    /// Resolve an encoding tag (`json`, `yaml`/`yml`, `xml`), ignoring case.
    pub fn from_tag(tag: &str) -> CodecResult<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "xml" => Ok(Self::Xml),
            _ => Err(CodecError::UnsupportedFormat(tag.to_string())),
        }
    }

    /// Resolve the encoding from a file extension.
    pub fn from_path(path: &Path) -> CodecResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| CodecError::UnsupportedFormat(path.display().to_string()))?;
        Self::from_tag(ext).map_err(|_| CodecError::UnsupportedFormat(format!(".{ext}")))
    }

    /// Canonical tag, also the preferred file extension.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Xml => "xml",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn tags_resolve() {
        assert_eq!(Encoding::from_tag("json").unwrap(), Encoding::Json);
        assert_eq!(Encoding::from_tag("YML").unwrap(), Encoding::Yaml);
        assert_eq!(Encoding::from_tag("yaml").unwrap(), Encoding::Yaml);
        assert_eq!(Encoding::from_tag("xml").unwrap(), Encoding::Xml);
    }

    #[test]
    fn unknown_tag_rejected() {
        let err = Encoding::from_tag("toml").unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedFormat(t) if t == "toml"));
    }

    #[test]
    fn extension_selects_encoding() {
        assert_eq!(Encoding::from_path(&PathBuf::from("db_files/db.json")).unwrap(), Encoding::Json);
        assert_eq!(Encoding::from_path(&PathBuf::from("db.yml")).unwrap(), Encoding::Yaml);
        assert_eq!(Encoding::from_path(&PathBuf::from("db.yaml")).unwrap(), Encoding::Yaml);
        assert_eq!(Encoding::from_path(&PathBuf::from("/tmp/db.xml")).unwrap(), Encoding::Xml);
    }

    #[test]
    fn missing_or_unknown_extension_rejected() {
        assert!(matches!(
            Encoding::from_path(&PathBuf::from("db")),
            Err(CodecError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            Encoding::from_path(&PathBuf::from("db.csv")),
            Err(CodecError::UnsupportedFormat(e)) if e == ".csv"
        ));
    }

    #[test]
    fn display_is_tag() {
        assert_eq!(Encoding::Yaml.to_string(), "yaml");
    }
}
