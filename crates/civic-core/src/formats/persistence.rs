//! # Graph Snapshot Format
//!
//! Header (5 bytes) followed by a postcard-encoded [`SerializableGraph`].
//! - 4 bytes: magic (`CIVG`)
//! - 1 byte: version
//!
//! Size and header are validated before the payload is decoded.

use crate::graph::{Graph, SerializableGraph};
use crate::{CivicError, primitives};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::hash::Hash;

/// Largest accepted snapshot, header included.
pub const MAX_PERSISTENCE_PAYLOAD_SIZE: usize = 64 * 1024 * 1024;

// =============================================================================
// HEADER
// =============================================================================

/// Header preceding every graph snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistenceHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl PersistenceHeader {
    /// Header for the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    pub fn validate(&self) -> Result<(), CivicError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(CivicError::Deserialization("invalid magic bytes".to_string()));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(CivicError::Deserialization(format!(
                "unsupported version: {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; primitives::HEADER_LEN] {
        let mut bytes = [0u8; primitives::HEADER_LEN];
        bytes[..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CivicError> {
        let Some(header) = bytes.get(..primitives::HEADER_LEN) else {
            return Err(CivicError::Deserialization("header too short".to_string()));
        };
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&header[..4]);
        Ok(Self {
            magic,
            version: header[4],
        })
    }
}

impl Default for PersistenceHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ENCODE / DECODE
// =============================================================================

/// Encode a graph as header + payload. No file I/O.
pub fn graph_to_bytes<V>(graph: &Graph<V>) -> Result<Vec<u8>, CivicError>
where
    V: Hash + Eq + Clone + Serialize,
{
    let payload = postcard::to_stdvec(&SerializableGraph::from(graph))
        .map_err(|e| CivicError::Serialization(e.to_string()))?;

    let mut bytes = Vec::with_capacity(primitives::HEADER_LEN + payload.len());
    bytes.extend_from_slice(&PersistenceHeader::new().to_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Decode a graph produced by [`graph_to_bytes`]. No file I/O.
pub fn graph_from_bytes<V>(bytes: &[u8]) -> Result<Graph<V>, CivicError>
where
    V: Hash + Eq + Clone + DeserializeOwned,
{
    if bytes.len() > MAX_PERSISTENCE_PAYLOAD_SIZE {
        return Err(CivicError::Deserialization(format!(
            "data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_PERSISTENCE_PAYLOAD_SIZE
        )));
    }

    let header = PersistenceHeader::from_bytes(bytes)?;
    header.validate()?;

    let payload = &bytes[primitives::HEADER_LEN..];
    let serializable: SerializableGraph<V> = postcard::from_bytes(payload)
        .map_err(|e| CivicError::Deserialization(format!("failed to decode graph: {}", e)))?;
    Graph::try_from(serializable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeKind;

    fn sample() -> Graph<String> {
        let mut graph = Graph::new();
        for (from, to, weight) in [("cbd", "hatfield", 8.2), ("hatfield", "menlyn", 11.3), ("cbd", "arcadia", 8.9)] {
            graph
                .add_edge(from.to_string(), to.to_string(), weight, EdgeKind::Undirected)
                .expect("edge");
        }
        graph
    }

    #[test]
    fn header_roundtrip() {
        let header = PersistenceHeader::new();
        let restored = PersistenceHeader::from_bytes(&header.to_bytes()).expect("parse header");
        assert_eq!(restored, header);
        restored.validate().expect("valid");
    }

    #[test]
    fn bytes_roundtrip_bit_exact() {
        let graph = sample();
        let first = graph_to_bytes(&graph).expect("encode");
        let restored: Graph<String> = graph_from_bytes(&first).expect("decode");
        let second = graph_to_bytes(&restored).expect("re-encode");
        assert_eq!(first, second);
        assert_eq!(
            restored.bfs_path(&"arcadia".to_string(), &"menlyn".to_string()),
            graph.bfs_path(&"arcadia".to_string(), &"menlyn".to_string())
        );
    }

    #[test]
    fn invalid_magic_rejected() {
        let mut bytes = graph_to_bytes(&sample()).expect("encode");
        bytes[..4].copy_from_slice(b"XXXX");
        assert!(matches!(
            graph_from_bytes::<String>(&bytes),
            Err(CivicError::Deserialization(_))
        ));
    }

    #[test]
    fn future_version_rejected() {
        let mut bytes = graph_to_bytes(&sample()).expect("encode");
        bytes[4] = primitives::FORMAT_VERSION + 1;
        assert!(graph_from_bytes::<String>(&bytes).is_err());
    }

    #[test]
    fn truncated_input_rejected() {
        assert!(graph_from_bytes::<String>(b"CIV").is_err());
        let bytes = graph_to_bytes(&sample()).expect("encode");
        assert!(graph_from_bytes::<String>(&bytes[..bytes.len() - 3]).is_err());
    }
}
