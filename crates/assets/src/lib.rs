//! Asset loading: the synchronous phase that must finish before any scene
//! is built.
//!
//! Loading and scene construction are two separate phases. `load_assets`
//! reads and validates everything up front and either yields a complete
//! [`Assets`] bundle or a typed error; scene construction then runs
//! synchronously against validated data and cannot fail on I/O.
//!
//! # Invariants
//! - A `FontAsset` always holds bytes that parse as a valid font face.
//! - Asset identity is content-addressed (hash of the bytes, not the path).

use sha2::{Digest, Sha256};
use std::path::Path;
use ttf_parser::Face;

/// Errors from asset loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid font in {path}: {reason}")]
    InvalidFont { path: String, reason: String },
}

/// A validated font: raw bytes plus metadata extracted at load time.
#[derive(Debug, Clone)]
pub struct FontAsset {
    pub name: String,
    data: Vec<u8>,
    units_per_em: u16,
    glyph_count: u16,
}

impl FontAsset {
    /// Validate raw font bytes. The face is parsed once here so later
    /// consumers can parse without handling malformed data.
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Result<Self, AssetError> {
        let name = name.into();
        let face = Face::parse(&data, 0).map_err(|e| AssetError::InvalidFont {
            path: name.clone(),
            reason: e.to_string(),
        })?;
        let units_per_em = face.units_per_em();
        let glyph_count = face.number_of_glyphs();
        Ok(Self {
            name,
            data,
            units_per_em,
            glyph_count,
        })
    }

    /// Borrow a parsed face. Parsing cannot fail past construction.
    pub fn face(&self) -> Face<'_> {
        Face::parse(&self.data, 0).expect("font bytes validated at load time")
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    pub fn glyph_count(&self) -> u16 {
        self.glyph_count
    }

    /// Content hash of the font bytes, hex-encoded and truncated for logs.
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.data);
        let digest = hasher.finalize();
        digest[..8].iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// Everything scene construction needs, fully loaded and validated.
#[derive(Debug, Clone)]
pub struct Assets {
    pub font: FontAsset,
}

/// Load and validate all assets from disk.
///
/// This is the only fallible, I/O-bound step of startup. If it fails the
/// scene is never built.
pub fn load_assets(font_path: impl AsRef<Path>) -> Result<Assets, AssetError> {
    let path = font_path.as_ref();
    let data = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let font = FontAsset::from_bytes(name, data).map_err(|e| match e {
        AssetError::InvalidFont { reason, .. } => AssetError::InvalidFont {
            path: path.display().to_string(),
            reason,
        },
        other => other,
    })?;
    tracing::info!(
        font = %font.name,
        hash = %font.content_hash(),
        glyphs = font.glyph_count(),
        "assets loaded"
    );
    Ok(Assets { font })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_io_error() {
        let err = load_assets("/nonexistent/font.ttf").unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"this is not a font").unwrap();
        let err = load_assets(tmp.path()).unwrap_err();
        assert!(matches!(err, AssetError::InvalidFont { .. }));
    }

    #[test]
    fn from_bytes_rejects_empty_data() {
        let err = FontAsset::from_bytes("empty", Vec::new()).unwrap_err();
        assert!(matches!(err, AssetError::InvalidFont { .. }));
    }

    #[test]
    fn invalid_font_error_names_the_path() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&[0u8; 64]).unwrap();
        let err = load_assets(tmp.path()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains(&tmp.path().display().to_string()));
    }
}
