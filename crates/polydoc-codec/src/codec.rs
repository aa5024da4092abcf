use tracing::debug;

use crate::encoding::Encoding;
use crate::error::{CodecError, CodecResult};
use crate::schema::SequenceSchema;
use crate::{xml, Tree};

/// Converts between one on-disk encoding and the canonical tree.
///
/// JSON and YAML map onto the tree one to one and are decoded as written.
/// XML cannot tell a one-element sequence from a single value, so XML
/// decoding finishes with [`SequenceSchema::normalize`].
#[derive(Clone, Debug)]
pub struct Codec {
    encoding: Encoding,
    schema: SequenceSchema,
    xml_root: String,
}

impl Codec {
    pub fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            schema: SequenceSchema::none(),
            xml_root: xml::DEFAULT_ROOT.to_string(),
        }
    }

    pub fn with_schema(mut self, schema: SequenceSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Name of the XML root element written on encode.
    pub fn with_xml_root(mut self, root: impl Into<String>) -> Self {
        self.xml_root = root.into();
        self
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn schema(&self) -> &SequenceSchema {
        &self.schema
    }

    pub fn decode(&self, bytes: &[u8]) -> CodecResult<Tree> {
        let tree: Tree = match self.encoding {
            Encoding::Json => {
                serde_json::from_slice(bytes).map_err(|e| CodecError::parse(Encoding::Json, e))?
            }
            Encoding::Yaml => {
                serde_yaml::from_slice(bytes).map_err(|e| CodecError::parse(Encoding::Yaml, e))?
            }
            Encoding::Xml => {
                let mut tree = xml::decode(bytes)?;
                self.schema.normalize(&mut tree);
                tree
            }
        };
        debug!(encoding = %self.encoding, bytes = bytes.len(), "decoded document");
        Ok(tree)
    }

    pub fn encode(&self, tree: &Tree) -> CodecResult<Vec<u8>> {
        let bytes = match self.encoding {
            Encoding::Json => {
                serde_json::to_vec_pretty(tree).map_err(|e| CodecError::encode(Encoding::Json, e))?
            }
            Encoding::Yaml => serde_yaml::to_string(tree)
                .map_err(|e| CodecError::encode(Encoding::Yaml, e))?
                .into_bytes(),
            Encoding::Xml => xml::encode(tree, &self.xml_root)?,
        };
        debug!(encoding = %self.encoding, bytes = bytes.len(), "encoded document");
        Ok(bytes)
    }
}

/// Decode with no known sequence positions.
pub fn decode(bytes: &[u8], encoding: Encoding) -> CodecResult<Tree> {
    Codec::new(encoding).decode(bytes)
}

/// Encode with the default XML root element.
pub fn encode(tree: &Tree, encoding: Encoding) -> CodecResult<Vec<u8>> {
    Codec::new(encoding).encode(tree)
}
