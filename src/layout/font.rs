use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::error::{CueburnError, CueburnResult};

/// Font bytes resolved for one render pass, reused by every cue of the item.
#[derive(Clone)]
pub struct ResolvedFont {
    pub bytes: Arc<Vec<u8>>,
    /// Where the bytes came from, for diagnostics.
    pub origin: String,
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("bytes_len", &self.bytes.len())
            .field("origin", &self.origin)
            .finish()
    }
}

const PLATFORM_CANDIDATES: &[&str] = &[
    "C:/Windows/Fonts/arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
];

/// Resolve usable font bytes for caption rendering.
///
/// Candidates are tried in order and failures fall through silently: the
/// configured path (if any), then the platform default list, then any face the
/// system font database knows about. Only a machine with no fonts at all makes
/// this return an error.
pub fn resolve_font(font_path: Option<&Path>) -> CueburnResult<ResolvedFont> {
    if let Some(path) = font_path {
        match load_font_file(path) {
            Some(font) => return Ok(font),
            None => {
                tracing::warn!(path = %path.display(), "configured font did not load, falling back");
            }
        }
    }

    for candidate in PLATFORM_CANDIDATES {
        if let Some(font) = load_font_file(Path::new(candidate)) {
            return Ok(font);
        }
    }

    system_fallback_font()
}

fn load_font_file(path: &Path) -> Option<ResolvedFont> {
    if !path.is_file() {
        return None;
    }
    let bytes = std::fs::read(path).ok()?;
    if !font_bytes_load(&bytes) {
        return None;
    }
    Some(ResolvedFont {
        bytes: Arc::new(bytes),
        origin: path.display().to_string(),
    })
}

/// A candidate "loads" when the font database can extract at least one face.
fn font_bytes_load(bytes: &[u8]) -> bool {
    let mut db = fontdb::Database::new();
    db.load_font_data(bytes.to_vec());
    db.faces().next().is_some()
}

fn system_fallback_font() -> CueburnResult<ResolvedFont> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();

    let query = fontdb::Query {
        families: &[fontdb::Family::SansSerif],
        weight: fontdb::Weight::NORMAL,
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    };
    let id = db
        .query(&query)
        .or_else(|| db.faces().next().map(|f| f.id))
        .ok_or_else(|| CueburnError::render("no usable font found on this system"))?;

    let (source, _face_index) = db
        .face_source(id)
        .ok_or_else(|| CueburnError::render("system font face has no source"))?;

    let (bytes, origin): (Vec<u8>, PathBuf) = match source {
        fontdb::Source::Binary(data) => ((*data).as_ref().to_vec(), PathBuf::from("memory")),
        fontdb::Source::File(path) => {
            let bytes = std::fs::read(&path)
                .map_err(|e| CueburnError::render(format!("read system font: {e}")))?;
            (bytes, path)
        }
        fontdb::Source::SharedFile(path, data) => ((*data).as_ref().to_vec(), path),
    };

    Ok(ResolvedFont {
        bytes: Arc::new(bytes),
        origin: origin.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_configured_path_falls_through() {
        // Must not error out just because the configured font does not exist;
        // the result depends on what the host has installed, so only the
        // fall-through behavior itself is asserted.
        let missing = Path::new("/definitely/not/a/font.ttf");
        match resolve_font(Some(missing)) {
            Ok(font) => assert_ne!(font.origin, missing.display().to_string()),
            Err(CueburnError::Render(_)) => {} // fontless host
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn garbage_bytes_do_not_count_as_a_loadable_font() {
        assert!(!font_bytes_load(b"not a font at all"));
    }
}
