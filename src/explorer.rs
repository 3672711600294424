use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];
/// Containment matches need at least this many normalized characters on
/// the shorter side.
pub const MIN_CONTAINED_LEN: usize = 3;

/// How a file was matched to a name, strongest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchKind {
    Exact,
    Normalized,
    Contained,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageMatch {
    pub path: PathBuf,
    pub kind: MatchKind,
}

/// Lowercases, turns separators into spaces, drops quotes and ellipses,
/// and collapses whitespace.
pub fn normalize(text: &str) -> String {
    let replaced: String = text
        .chars()
        .filter_map(|c| match c {
            '/' | ':' | '-' | '_' => Some(' '),
            '"' | '\'' | '…' | '’' | '.' | ',' | '!' | '?' => None,
            c => Some(c),
        })
        .collect();
    replaced
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// ASCII slug for stored file names: accents folded, anything else that is
/// not alphanumeric becomes a single hyphen.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        let c = fold_accent(c);
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if (c.is_whitespace() || c == '-' || c == '_') && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        'ý' | 'ÿ' => 'y',
        c => c,
    }
}

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Supported image files directly inside `dir`, in file-name order.
pub fn list_images(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() && is_supported(&entry.path()) {
            images.push(entry.path());
        }
    }
    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}

/// Finds the image for `name` across `dirs`. Every directory is tried for an
/// exact `<name>.<ext>` file before any normalized match, and for a
/// normalized match before any containment match. Names with path
/// separators skip the exact step so they never leave the directory.
pub fn find_image(dirs: &[PathBuf], name: &str) -> io::Result<Option<ImageMatch>> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(None);
    }
    if !name.contains(['/', '\\']) {
        if let Some(found) = find_exact(dirs, name) {
            return Ok(Some(found));
        }
    }

    let wanted = normalize(name);
    if wanted.is_empty() {
        return Ok(None);
    }
    let mut best: Option<ImageMatch> = None;
    for dir in dirs {
        if !dir.is_dir() {
            warn!("Image directory {} does not exist", dir.display());
            continue;
        }
        for path in list_images(dir)? {
            let Some(kind) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| compare(&wanted, &normalize(stem)))
            else {
                continue;
            };
            if kind == MatchKind::Normalized {
                debug!("{} matches {}", path.display(), name);
                return Ok(Some(ImageMatch { path, kind }));
            }
            if best.is_none() {
                best = Some(ImageMatch { path, kind });
            }
        }
    }
    Ok(best)
}

fn find_exact(dirs: &[PathBuf], name: &str) -> Option<ImageMatch> {
    dirs.iter()
        .flat_map(|dir| {
            SUPPORTED_EXTENSIONS
                .iter()
                .map(move |ext| dir.join(format!("{}.{}", name, ext)))
        })
        .find(|candidate| candidate.is_file())
        .map(|path| ImageMatch {
            path,
            kind: MatchKind::Exact,
        })
}

fn compare(wanted: &str, stem: &str) -> Option<MatchKind> {
    if stem.is_empty() {
        return None;
    }
    if wanted == stem {
        return Some(MatchKind::Normalized);
    }
    let shorter = wanted.chars().count().min(stem.chars().count());
    if shorter >= MIN_CONTAINED_LEN && (wanted.contains(stem) || stem.contains(wanted)) {
        return Some(MatchKind::Contained);
    }
    None
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use tempfile::TempDir;

    use super::*;

    fn touch(dir: &TempDir, name: &str) {
        File::create(dir.path().join(name)).unwrap();
    }

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize("AC/DC"), "ac dc");
        assert_eq!(normalize("  Guns N' Roses "), "guns n roses");
        assert_eq!(normalize("Live: At Pompeii"), "live at pompeii");
    }

    #[test]
    fn slugify_folds_accents() {
        assert_eq!(slugify("Björk"), "bjork");
        assert_eq!(slugify("Sigur Rós - Ágætis byrjun"), "sigur-ros-agtis-byrjun");
        assert_eq!(slugify("AC/DC"), "acdc");
    }

    #[test]
    fn exact_file_wins_over_containment() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "Pink Floyd Live.jpg");
        touch(&dir, "Pink Floyd.png");
        let found = find_image(&[dir.path().to_path_buf()], "Pink Floyd")
            .unwrap()
            .unwrap();
        assert_eq!(found.kind, MatchKind::Exact);
        assert_eq!(found.path.file_name().unwrap(), "Pink Floyd.png");
    }

    #[test]
    fn normalized_stem_wins_over_containment() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "ac dc live.jpg");
        touch(&dir, "ac-dc.JPG");
        let found = find_image(&[dir.path().to_path_buf()], "AC/DC").unwrap().unwrap();
        assert_eq!(found.kind, MatchKind::Normalized);
        assert_eq!(found.path.file_name().unwrap(), "ac-dc.JPG");
    }

    #[test]
    fn containment_needs_three_characters() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "u2 the joshua tree.jpg");
        touch(&dir, "Madonna - Greatest Hits.png");
        let dirs = [dir.path().to_path_buf()];
        assert_eq!(find_image(&dirs, "U2").unwrap(), None);
        let found = find_image(&dirs, "Madonna").unwrap().unwrap();
        assert_eq!(found.kind, MatchKind::Contained);
    }

    #[test]
    fn names_with_separators_stay_inside_the_directory() {
        let root = TempDir::new().unwrap();
        let images = root.path().join("images");
        fs::create_dir_all(images.join("AC")).unwrap();
        File::create(images.join("AC").join("DC.png")).unwrap();
        File::create(images.join("ac dc.jpg")).unwrap();
        File::create(root.path().join("secret.png")).unwrap();
        let dirs = [images.clone()];

        let found = find_image(&dirs, "AC/DC").unwrap().unwrap();
        assert_eq!(found.kind, MatchKind::Normalized);
        assert_eq!(found.path, images.join("ac dc.jpg"));
        assert_eq!(find_image(&dirs, "../secret").unwrap(), None);
    }

    #[test]
    fn unsupported_files_are_ignored() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "Nirvana.txt");
        assert_eq!(find_image(&[dir.path().to_path_buf()], "Nirvana").unwrap(), None);
    }
}
