use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use ttf_parser::Face;
use ttf_parser::name_id;
use usvg::fontdb;

use super::error::{RenderError, RenderResult};

/// Family names tried, in order, when no font is configured. They all cover Hangul.
#[cfg(target_os = "macos")]
pub fn caption_fallback_fonts() -> &'static [&'static str] {
    &["Apple SD Gothic Neo", "Noto Sans CJK KR", "NanumGothic", "sans-serif"]
}

#[cfg(target_os = "windows")]
pub fn caption_fallback_fonts() -> &'static [&'static str] {
    &["Malgun Gothic", "Noto Sans CJK KR", "NanumGothic", "sans-serif"]
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub fn caption_fallback_fonts() -> &'static [&'static str] {
    &["Noto Sans CJK KR", "Noto Sans KR", "NanumGothic", "sans-serif"]
}

/// Font database plus the family every caption is drawn with.
#[derive(Clone)]
pub struct CaptionFont {
    db: Arc<fontdb::Database>,
    family: String,
}

impl CaptionFont {
    /// Family emitted as `font-family`; always installed in the database.
    pub fn family(&self) -> &str {
        &self.family
    }

    pub(crate) fn database(&self) -> Arc<fontdb::Database> {
        self.db.clone()
    }

    /// System fonts resolved through the platform fallback list.
    pub fn system() -> RenderResult<Self> {
        resolve_caption_font(None, None, caption_fallback_fonts())
    }

    #[cfg(test)]
    pub(crate) fn named(family: &str) -> Self {
        Self {
            db: Arc::new(fontdb::Database::new()),
            family: family.to_string(),
        }
    }
}

/// Resolves the caption typeface from an explicit font file, an explicit
/// family, the platform fallback list, or the first installed face, in that
/// order.
pub fn resolve_caption_font(
    font_path: Option<&Path>,
    font_family: Option<&str>,
    fallback: &[&str],
) -> RenderResult<CaptionFont> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    resolve_in_database(db, font_path, font_family, fallback)
}

pub(crate) fn resolve_in_database(
    mut db: fontdb::Database,
    font_path: Option<&Path>,
    font_family: Option<&str>,
    fallback: &[&str],
) -> RenderResult<CaptionFont> {
    if let Some(path) = font_path {
        let data = std::fs::read(path).map_err(|err| {
            RenderError::Font(format!("failed to read font {}: {}", path.display(), err))
        })?;
        let family = family_from_data(&data).ok_or_else(|| {
            RenderError::Font(format!("failed to parse font: {}", path.display()))
        })?;
        db.load_font_data(data);
        info!("caption font: {} ({})", family, path.display());
        return Ok(CaptionFont {
            db: Arc::new(db),
            family,
        });
    }

    if let Some(family) = font_family.map(str::trim).filter(|name| !name.is_empty()) {
        if let Some(installed) = installed_family(&db, family) {
            info!("caption font: {}", installed);
            return Ok(CaptionFont {
                db: Arc::new(db),
                family: installed,
            });
        }
        warn!("font family '{}' not found; trying fallbacks", family);
    }

    for candidate in fallback {
        if let Some(installed) = installed_family(&db, candidate) {
            info!("caption font: {} (fallback {})", installed, candidate);
            return Ok(CaptionFont {
                db: Arc::new(db),
                family: installed,
            });
        }
    }

    let first = db
        .faces()
        .find_map(|face| face.families.first().map(|(name, _)| name.clone()));
    match first {
        Some(family) => {
            warn!("no caption font matched; using installed family {}", family);
            Ok(CaptionFont {
                db: Arc::new(db),
                family,
            })
        }
        None => Err(RenderError::Font("no fonts installed".to_string())),
    }
}

/// Name of the installed family that answers `family`. Generic `sans-serif`
/// maps to whichever face fontdb picks for it, which may not exist.
fn installed_family(db: &fontdb::Database, family: &str) -> Option<String> {
    let families = if family.eq_ignore_ascii_case("sans-serif") {
        vec![fontdb::Family::SansSerif]
    } else {
        vec![fontdb::Family::Name(family)]
    };
    let query = fontdb::Query {
        families: &families,
        ..Default::default()
    };
    let id = db.query(&query)?;
    db.face(id)
        .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
}

fn family_from_data(data: &[u8]) -> Option<String> {
    let count = ttf_parser::fonts_in_collection(data).unwrap_or(1);
    (0..count)
        .filter_map(|index| Face::parse(data, index).ok())
        .find_map(|face| extract_family_name(&face))
}

fn extract_family_name(face: &Face<'_>) -> Option<String> {
    let mut fallback = None;
    for name in face.names() {
        if name.name_id == name_id::TYPOGRAPHIC_FAMILY {
            if let Some(value) = name.to_string() {
                return Some(value);
            }
        } else if name.name_id == name_id::FAMILY && fallback.is_none() {
            fallback = name.to_string();
        }
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_font_file_is_a_font_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing.ttf");
        let err = resolve_caption_font(Some(&path), None, &[]).err();
        assert!(matches!(err, Some(RenderError::Font(_))));
    }

    #[test]
    fn garbage_font_file_is_a_font_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"not a font").expect("write");
        let err = resolve_caption_font(Some(&path), None, &[]).err();
        assert!(matches!(err, Some(RenderError::Font(_))));
    }

    #[test]
    fn empty_database_is_a_font_error() {
        let db = fontdb::Database::new();
        let err = resolve_in_database(db, None, Some("Anything"), &["sans-serif"]).err();
        assert!(matches!(err, Some(RenderError::Font(_))));
    }

    #[test]
    fn unknown_family_falls_back_to_an_installed_face() {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        if db.is_empty() {
            return;
        }
        let font = resolve_in_database(db, None, Some("No Such Family 12345"), &["sans-serif"])
            .expect("installed face");
        assert_ne!(font.family(), "No Such Family 12345");
        let db = font.database();
        let families = [fontdb::Family::Name(font.family())];
        let query = fontdb::Query {
            families: &families,
            ..Default::default()
        };
        assert!(db.query(&query).is_some());
    }

    #[test]
    fn system_font_names_an_installed_family() {
        let Ok(font) = CaptionFont::system() else {
            return;
        };
        assert!(!font.family().is_empty());
        assert!(installed_family(&font.database(), font.family()).is_some());
    }
}
