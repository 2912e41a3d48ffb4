//! Binary level file encode/decode
//!
//! Fixed-layout little-endian format consumed by the game runtime:
//!
//! ```text
//! u32 screen_count
//! repeat screen_count times:
//!   f32 start_x, f32 start_y
//!   u32 platform_count
//!   repeat platform_count times:
//!     u32 vertex_count
//!     repeat vertex_count times: f32 x, f32 y
//!     u32 type_tag      // 0 = Static, 1 = Anchor
//!     u32 material_tag  // 0..=3
//! ```
//!
//! No padding, no versioning. Every inner buffer is sized only after its
//! count field has been read, and counts are checked against both the
//! remaining byte length and hard limits before allocation.

use std::fs;
use std::path::Path;
use super::geometry::Vec2;
use super::platform::{Material, PlatformKind};
use super::screen::{ExportPlatform, Screen};

/// Validation limits to prevent resource exhaustion from malicious files
pub mod limits {
    /// Maximum number of screens in a level file
    pub const MAX_SCREENS: usize = 1024;
    /// Maximum platforms per screen
    pub const MAX_PLATFORMS: usize = 4096;
    /// Maximum vertices per platform
    pub const MAX_VERTICES: usize = 4096;
    /// Maximum coordinate magnitude (prevents overflow issues)
    pub const MAX_COORD: f32 = 1_000_000.0;
}

/// Error type for level and session I/O
#[derive(Debug)]
pub enum LevelError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
    MalformedError(String),
    ValidationError(String),
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for LevelError {
    fn from(e: ron::error::SpannedError) -> Self {
        LevelError::ParseError(e)
    }
}

impl From<ron::Error> for LevelError {
    fn from(e: ron::Error) -> Self {
        LevelError::SerializeError(e)
    }
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::IoError(e) => write!(f, "IO error: {}", e),
            LevelError::ParseError(e) => write!(f, "Parse error: {}", e),
            LevelError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            LevelError::MalformedError(e) => write!(f, "Malformed file: {}", e),
            LevelError::ValidationError(e) => write!(f, "Validation error: {}", e),
        }
    }
}

/// Check if a coordinate is valid (finite and within range)
pub fn is_valid_coord(f: f32) -> bool {
    f.is_finite() && f.abs() <= limits::MAX_COORD
}

/// Validate a screen list against the hard limits
pub fn validate_screens(screens: &[Screen]) -> Result<(), LevelError> {
    if screens.len() > limits::MAX_SCREENS {
        return Err(LevelError::ValidationError(format!(
            "too many screens ({} > {})", screens.len(), limits::MAX_SCREENS
        )));
    }
    for (i, screen) in screens.iter().enumerate() {
        if !is_valid_coord(screen.start_position.x) || !is_valid_coord(screen.start_position.y) {
            return Err(LevelError::ValidationError(format!(
                "screen[{}]: invalid start position ({}, {})",
                i, screen.start_position.x, screen.start_position.y
            )));
        }
        if screen.platforms.len() > limits::MAX_PLATFORMS {
            return Err(LevelError::ValidationError(format!(
                "screen[{}]: too many platforms ({} > {})",
                i, screen.platforms.len(), limits::MAX_PLATFORMS
            )));
        }
        for (j, platform) in screen.platforms.iter().enumerate() {
            if platform.vertices.is_empty() {
                return Err(LevelError::ValidationError(format!(
                    "screen[{}] platform[{}]: empty vertex list", i, j
                )));
            }
            if platform.vertices.len() > limits::MAX_VERTICES {
                return Err(LevelError::ValidationError(format!(
                    "screen[{}] platform[{}]: too many vertices ({} > {})",
                    i, j, platform.vertices.len(), limits::MAX_VERTICES
                )));
            }
            for (k, v) in platform.vertices.iter().enumerate() {
                if !is_valid_coord(v.x) || !is_valid_coord(v.y) {
                    return Err(LevelError::ValidationError(format!(
                        "screen[{}] platform[{}] vertex[{}]: invalid coordinates ({}, {})",
                        i, j, k, v.x, v.y
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Serialize a screen list to the binary layout
pub fn encode_screens(screens: &[Screen]) -> Vec<u8> {
    let mut buffer = Vec::new();

    buffer.extend_from_slice(&(screens.len() as u32).to_le_bytes());
    for screen in screens {
        buffer.extend_from_slice(&screen.start_position.x.to_le_bytes());
        buffer.extend_from_slice(&screen.start_position.y.to_le_bytes());
        buffer.extend_from_slice(&(screen.platforms.len() as u32).to_le_bytes());
        for platform in &screen.platforms {
            buffer.extend_from_slice(&(platform.vertices.len() as u32).to_le_bytes());
            for v in &platform.vertices {
                buffer.extend_from_slice(&v.x.to_le_bytes());
                buffer.extend_from_slice(&v.y.to_le_bytes());
            }
            buffer.extend_from_slice(&platform.kind_tag.to_le_bytes());
            buffer.extend_from_slice(&platform.material_tag.to_le_bytes());
        }
    }

    buffer
}

/// Bounds-checked forward reader over the raw file bytes
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], LevelError> {
        if self.pos + n > self.bytes.len() {
            return Err(LevelError::MalformedError(format!(
                "unexpected end of data at byte {} (wanted {} more, {} left)",
                self.pos, n, self.bytes.len() - self.pos
            )));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u32(&mut self) -> Result<u32, LevelError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_f32(&mut self) -> Result<f32, LevelError> {
        let bytes = self.take(4)?;
        Ok(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }
}

/// Read a count field and check it against a hard limit
fn read_count(reader: &mut Reader, limit: usize, what: &str) -> Result<usize, LevelError> {
    let count = reader.read_u32()? as usize;
    if count > limit {
        return Err(LevelError::MalformedError(format!(
            "{} count {} exceeds limit {}", what, count, limit
        )));
    }
    Ok(count)
}

/// Deserialize a screen list from the binary layout.
/// The exact inverse of [`encode_screens`]; a truncated or count-inconsistent
/// buffer yields `MalformedError`, never an overrun.
pub fn decode_screens(bytes: &[u8]) -> Result<Vec<Screen>, LevelError> {
    let mut reader = Reader::new(bytes);

    let screen_count = read_count(&mut reader, limits::MAX_SCREENS, "screen")?;
    let mut screens = Vec::with_capacity(screen_count);
    for _ in 0..screen_count {
        let start_x = reader.read_f32()?;
        let start_y = reader.read_f32()?;

        let platform_count = read_count(&mut reader, limits::MAX_PLATFORMS, "platform")?;
        let mut platforms = Vec::with_capacity(platform_count);
        for _ in 0..platform_count {
            let vertex_count = read_count(&mut reader, limits::MAX_VERTICES, "vertex")?;
            let mut vertices = Vec::with_capacity(vertex_count);
            for _ in 0..vertex_count {
                let x = reader.read_f32()?;
                let y = reader.read_f32()?;
                vertices.push(Vec2::new(x, y));
            }

            let kind_tag = reader.read_u32()?;
            if PlatformKind::from_tag(kind_tag).is_none() {
                return Err(LevelError::ValidationError(format!(
                    "unknown platform type tag {}", kind_tag
                )));
            }
            let material_tag = reader.read_u32()?;
            if Material::from_ordinal(material_tag).is_none() {
                return Err(LevelError::ValidationError(format!(
                    "unknown material tag {}", material_tag
                )));
            }

            platforms.push(ExportPlatform { vertices, kind_tag, material_tag });
        }

        screens.push(Screen {
            start_position: Vec2::new(start_x, start_y),
            platforms,
        });
    }

    if reader.remaining() != 0 {
        return Err(LevelError::MalformedError(format!(
            "{} trailing bytes after last screen", reader.remaining()
        )));
    }

    validate_screens(&screens)?;
    Ok(screens)
}

/// Write a screen list to a binary level file
pub fn save_screens<P: AsRef<Path>>(path: P, screens: &[Screen]) -> Result<(), LevelError> {
    validate_screens(screens)?;
    fs::write(path, encode_screens(screens))?;
    Ok(())
}

/// Load a screen list from a binary level file
pub fn load_screens<P: AsRef<Path>>(path: P) -> Result<Vec<Screen>, LevelError> {
    let bytes = fs::read(path)?;
    decode_screens(&bytes)
}
