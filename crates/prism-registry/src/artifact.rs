//! Artifact decoding.
//!
//! Model and feature-transform artifacts are serialized descriptions of fitted
//! estimators. Two encodings are accepted and detected by content, not by file
//! extension:
//!
//! - **pickle** (protocol 2 and later, first byte `0x80`): a Python
//!   `pickle.dump` / `joblib.dump` of plain dicts, lists, numbers and strings.
//! - **JSON**: the same document written with `json.dump`.
//!
//! Zlib-compressed joblib files are rejected with a clear error rather than
//! being misread as JSON.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::ArtifactError;
use crate::model::ModelArtifact;
use crate::transform::FeatureArtifact;

/// Pickle `PROTO` opcode, the first byte of every protocol 2+ stream.
const PICKLE_PROTO: u8 = 0x80;

/// First byte of a zlib stream at default compression (joblib `compress=True`).
const ZLIB_HEADER: u8 = 0x78;

/// Detected artifact encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Pickle,
    Json,
}

/// Sniff the encoding from the leading bytes.
///
/// # Errors
///
/// Returns [`ArtifactError::Empty`] for an empty payload and
/// [`ArtifactError::Unsupported`] for compressed joblib payloads.
pub fn sniff(bytes: &[u8]) -> Result<Encoding, ArtifactError> {
    match bytes.first() {
        None => Err(ArtifactError::Empty),
        Some(&PICKLE_PROTO) => Ok(Encoding::Pickle),
        Some(&ZLIB_HEADER) => Err(ArtifactError::Unsupported(
            "zlib-compressed joblib; re-export with compress=0".into(),
        )),
        Some(_) => Ok(Encoding::Json),
    }
}

/// Decode an artifact payload of either encoding.
///
/// # Errors
///
/// Returns the sniffing errors of [`sniff`], or the decoder's error.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ArtifactError> {
    match sniff(bytes)? {
        Encoding::Pickle => Ok(serde_pickle::from_slice(
            bytes,
            serde_pickle::DeOptions::new(),
        )?),
        Encoding::Json => Ok(serde_json::from_slice(bytes)?),
    }
}

/// Read, decode, and validate a model artifact.
///
/// # Errors
///
/// Returns [`ArtifactError`] if the file cannot be read, decoded, or
/// describes an invalid estimator.
pub fn load_model(path: &Path) -> Result<ModelArtifact, ArtifactError> {
    let bytes = std::fs::read(path)?;
    let model: ModelArtifact = decode(&bytes)?;
    model.validate().map_err(ArtifactError::Invalid)?;
    Ok(model)
}

/// Read, decode, and validate a feature-transform artifact.
///
/// # Errors
///
/// Returns [`ArtifactError`] if the file cannot be read, decoded, or
/// describes an invalid pipeline.
pub fn load_features(path: &Path) -> Result<FeatureArtifact, ArtifactError> {
    let bytes = std::fs::read(path)?;
    let features: FeatureArtifact = decode(&bytes)?;
    features.validate().map_err(ArtifactError::Invalid)?;
    Ok(features)
}
