//! Working-session save and load
//!
//! Persists the whole Stage (platforms, edge queue, start position,
//! accumulated screens, id allocator watermark) so an editing session can be
//! resumed. Uses RON for human-readable session files.
//! - Reading: auto-detects plain RON vs brotli by checking for a RON start
//! - Writing: always compresses with brotli

use std::fs;
use std::io::Cursor;
use std::path::Path;
use super::level::{is_valid_coord, limits, validate_screens, LevelError};
use super::stage::Stage;

/// Validate a loaded stage against the same limits as level files
fn validate_stage(stage: &Stage) -> Result<(), LevelError> {
    if stage.platforms().len() > limits::MAX_PLATFORMS {
        return Err(LevelError::ValidationError(format!(
            "too many platforms ({} > {})", stage.platforms().len(), limits::MAX_PLATFORMS
        )));
    }
    for (i, platform) in stage.platforms().iter().enumerate() {
        if platform.vertices().is_empty() {
            return Err(LevelError::ValidationError(format!(
                "platform[{}]: empty vertex list", i
            )));
        }
        if platform.vertices().len() > limits::MAX_VERTICES {
            return Err(LevelError::ValidationError(format!(
                "platform[{}]: too many vertices ({} > {})",
                i, platform.vertices().len(), limits::MAX_VERTICES
            )));
        }
        for (j, v) in platform.vertices().iter().enumerate() {
            if !is_valid_coord(v.x as f32) || !is_valid_coord(v.y as f32) {
                return Err(LevelError::ValidationError(format!(
                    "platform[{}] vertex[{}]: coordinates out of range ({}, {})",
                    i, j, v.x, v.y
                )));
            }
        }
    }
    if stage.edge_queue().len() > limits::MAX_VERTICES {
        return Err(LevelError::ValidationError(format!(
            "edge queue too long ({} > {})", stage.edge_queue().len(), limits::MAX_VERTICES
        )));
    }
    validate_screens(stage.screens())
}

/// Serialize a stage to compressed session bytes
pub fn session_to_bytes(stage: &Stage) -> Result<Vec<u8>, LevelError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    let ron_string = ron::ser::to_string_pretty(stage, config)?;

    let mut compressed = Vec::new();
    brotli::BrotliCompress(&mut Cursor::new(ron_string.as_bytes()), &mut compressed, &brotli::enc::BrotliEncoderParams {
        quality: 6,
        lgwin: 22,
        ..Default::default()
    }).map_err(|e| LevelError::IoError(std::io::Error::new(
        std::io::ErrorKind::Other,
        format!("brotli compression failed: {}", e)
    )))?;

    Ok(compressed)
}

/// Deserialize a stage from session bytes (plain RON or brotli-compressed)
pub fn session_from_bytes(bytes: &[u8]) -> Result<Stage, LevelError> {
    // RON files start with '(' or whitespace, brotli is binary
    let is_plain_ron = bytes.first()
        .map(|&b| b == b'(' || b == b' ' || b == b'\n' || b == b'\r' || b == b'\t')
        .unwrap_or(false);

    let contents = if is_plain_ron {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| LevelError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid UTF-8: {}", e)
            )))?
    } else {
        let mut decompressed = Vec::new();
        brotli::BrotliDecompress(&mut Cursor::new(bytes), &mut decompressed)
            .map_err(|e| LevelError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("brotli decompression failed: {}", e)
            )))?;
        String::from_utf8(decompressed)
            .map_err(|e| LevelError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid UTF-8 after decompression: {}", e)
            )))?
    };

    let stage: Stage = ron::from_str(&contents)?;
    validate_stage(&stage)?;
    Ok(stage)
}

/// Save the working session to a file
pub fn save_session<P: AsRef<Path>>(stage: &Stage, path: P) -> Result<(), LevelError> {
    let bytes = session_to_bytes(stage)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Load a working session from a file
pub fn load_session<P: AsRef<Path>>(path: P) -> Result<Stage, LevelError> {
    let bytes = fs::read(path)?;
    session_from_bytes(&bytes)
}
