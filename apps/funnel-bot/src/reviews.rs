//! Review carousel: captions from a line-oriented text file paired with
//! numbered media assets. Loaded once at startup and never mutated; the
//! per-chat cursor lives in the session.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Probe order for media assets. First hit wins.
const MEDIA_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "gif", "mp4", "mov", "webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
}

fn media_kind_for(ext: &str) -> MediaKind {
    match ext {
        "mp4" | "mov" => MediaKind::Video,
        _ => MediaKind::Photo,
    }
}

#[derive(Debug, Clone)]
pub struct ReviewEntry {
    pub caption: String,
    pub path: PathBuf,
    pub kind: MediaKind,
}

#[derive(Debug, Default)]
pub struct ReviewCarousel {
    entries: Vec<ReviewEntry>,
}

impl ReviewCarousel {
    pub fn from_entries(entries: Vec<ReviewEntry>) -> Self {
        Self { entries }
    }

    /// Reads the reviews file and pairs line `i` (1-based, after dropping
    /// blank lines) with `<media_dir>/<i>.<ext>`. Lines without a media
    /// asset are skipped. A missing reviews file degrades to an empty
    /// carousel; the bot keeps running without reviews.
    pub fn load(reviews_file: &Path, media_dir: &Path) -> Self {
        let raw = match fs::read_to_string(reviews_file) {
            Ok(s) => s,
            Err(e) => {
                warn!("Could not read reviews file {:?}: {}", reviews_file, e);
                return Self::default();
            }
        };

        let mut entries = Vec::new();
        let lines: Vec<&str> = raw.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        for (i, line) in lines.iter().enumerate() {
            let base = (i + 1).to_string();
            let found = MEDIA_EXTENSIONS.iter().find_map(|ext| {
                let candidate = media_dir.join(format!("{}.{}", base, ext));
                candidate.exists().then_some((candidate, *ext))
            });
            let Some((path, ext)) = found else {
                continue;
            };
            entries.push(ReviewEntry {
                caption: decode_escapes(line),
                path,
                kind: media_kind_for(ext),
            });
        }

        info!("Loaded {} reviews from {:?}", entries.len(), reviews_file);
        Self { entries }
    }

    /// Entry at `cursor mod len`, or `None` when no reviews are loaded.
    pub fn get(&self, cursor: usize) -> Option<&ReviewEntry> {
        if self.entries.is_empty() {
            return None;
        }
        self.entries.get(cursor % self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reviews may span multiple display lines; the source file keeps one
/// review per physical line with literal `\n` sequences inside.
fn decode_escapes(line: &str) -> String {
    line.replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn entry(caption: &str) -> ReviewEntry {
        ReviewEntry {
            caption: caption.to_string(),
            path: PathBuf::from("x.jpg"),
            kind: MediaKind::Photo,
        }
    }

    #[test]
    fn cursor_wraps_modulo_length() {
        let c = ReviewCarousel::from_entries(vec![entry("a"), entry("b"), entry("c")]);
        for n in 0..10 {
            assert_eq!(c.get(n).unwrap().caption, ["a", "b", "c"][n % 3]);
        }
    }

    #[test]
    fn empty_carousel_never_panics() {
        let c = ReviewCarousel::default();
        assert!(c.get(0).is_none());
        assert!(c.get(100).is_none());
        assert!(c.is_empty());
    }

    #[test]
    fn escaped_newlines_are_decoded() {
        assert_eq!(decode_escapes(r"line one\nline two"), "line one\nline two");
        assert_eq!(decode_escapes("plain"), "plain");
    }

    #[test]
    fn video_extensions_map_to_video() {
        assert_eq!(media_kind_for("mp4"), MediaKind::Video);
        assert_eq!(media_kind_for("mov"), MediaKind::Video);
        assert_eq!(media_kind_for("jpg"), MediaKind::Photo);
        assert_eq!(media_kind_for("webp"), MediaKind::Photo);
    }

    #[test]
    fn loader_skips_lines_without_media() {
        let dir = std::env::temp_dir().join(format!("funnel_reviews_{}", std::process::id()));
        let media = dir.join("reviews");
        fs::create_dir_all(&media).unwrap();

        let file = dir.join("reviews.txt");
        fs::write(&file, "first\\nreview\n\nsecond\nthird\n").unwrap();
        // Blank line dropped before numbering: "second" is line 2, "third" line 3.
        fs::write(media.join("1.jpg"), b"x").unwrap();
        fs::write(media.join("3.mp4"), b"x").unwrap();

        let c = ReviewCarousel::load(&file, &media);
        assert_eq!(c.len(), 2);
        assert_eq!(c.get(0).unwrap().caption, "first\nreview");
        assert_eq!(c.get(0).unwrap().kind, MediaKind::Photo);
        assert_eq!(c.get(1).unwrap().caption, "third");
        assert_eq!(c.get(1).unwrap().kind, MediaKind::Video);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_degrades_to_empty() {
        let c = ReviewCarousel::load(Path::new("/nonexistent/reviews.txt"), Path::new("/nonexistent"));
        assert!(c.is_empty());
    }
}
