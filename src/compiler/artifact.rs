use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};

use super::splitter::SubChain;
use crate::error::ArtifactError;

/// The persistable result of splitting one workflow: the main expression plus
/// every sub-chain, keyed by the workflow id the chain ids were derived from.
///
/// Recompilation is only needed when the definition changes, so callers
/// typically cache this per `(workflowId, definitionVersion)`; the bincode
/// form below is the cache/deployment format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledWorkflow {
    pub workflow_id: String,
    pub main_expression: String,
    pub sub_chains: Vec<SubChain>,
    /// Every language-model node in the workflow, including ones compiled
    /// inline because they have no successors.
    pub llm_node_ids: Vec<String>,
}

impl CompiledWorkflow {
    /// Looks up the chain to resume when the given language-model node paused.
    pub fn sub_chain_for(&self, llm_node_id: &str) -> Option<&SubChain> {
        self.sub_chains
            .iter()
            .find(|chain| chain.llm_node_id == llm_node_id)
    }

    /// Saves the compiled workflow to a file using the bincode format.
    pub fn save(&self, path: &str) -> Result<(), ArtifactError> {
        let bytes =
            encode_to_vec(self, standard()).map_err(|e| ArtifactError::Encode(e.to_string()))?;
        let mut file = fs::File::create(path).map_err(|e| ArtifactError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        file.write_all(&bytes).map_err(|e| ArtifactError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Loads a compiled workflow from a file.
    pub fn from_file(path: &str) -> Result<Self, ArtifactError> {
        let mut file = fs::File::open(path).map_err(|e| ArtifactError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| ArtifactError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_bytes(&bytes)
    }

    /// Deserializes a compiled workflow from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        decode_from_slice(bytes, standard())
            .map(|(artifact, _)| artifact) // bincode 2 returns a tuple (data, bytes_read)
            .map_err(|e| ArtifactError::Decode(e.to_string()))
    }
}
