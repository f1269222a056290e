//! MSVC discovery by walking known Visual Studio layouts
//!
//! There is no vswhere round-trip here: cl.exe is located by expanding glob
//! patterns under the Program Files roots. When several toolsets match, the
//! most recently created cl.exe wins.

use super::types::HostOs;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Default install roots searched for Visual Studio
pub const PROGRAM_FILES_ROOTS: &[&str] = &["C:/Program Files", "C:/Program Files (x86)"];

/// Visual Studio editions, in preference order
const EDITIONS: &[&str] = &["Community", "Professional", "Enterprise"];

/// Where the x64-hosted, x64-targeting cl.exe lives inside an edition folder
fn cl_pattern(edition: &str) -> String {
    format!(
        "Microsoft Visual Studio/*/{}/VC/Tools/MSVC/*/bin/Hostx64/x64/cl.exe",
        edition
    )
}

/// Search patterns in order: every root for Community, then Professional, then Enterprise.
pub fn msvc_patterns(roots: &[PathBuf]) -> Vec<(PathBuf, String)> {
    EDITIONS
        .iter()
        .flat_map(|edition| {
            roots
                .iter()
                .map(move |root| (root.clone(), cl_pattern(edition)))
        })
        .collect()
}

/// Locate cl.exe. Always `None` when the host is not Windows.
pub fn find_msvc(os: HostOs, roots: &[PathBuf]) -> Option<String> {
    if os != HostOs::Windows {
        return None;
    }

    for (root, pattern) in msvc_patterns(roots) {
        let matches = expand_glob(&root, &pattern);
        if let Some(newest) = newest_by_creation(matches) {
            return Some(newest.to_string_lossy().replace('\\', "/"));
        }
    }
    None
}

/// Default roots as paths
pub fn default_roots() -> Vec<PathBuf> {
    PROGRAM_FILES_ROOTS.iter().map(PathBuf::from).collect()
}

fn creation_time(path: &Path) -> Option<SystemTime> {
    let meta = fs::metadata(path).ok()?;
    // Not every filesystem records birth time
    meta.created().or_else(|_| meta.modified()).ok()
}

/// Pick the most recently created path; ties go to the last in sorted order.
fn newest_by_creation(mut paths: Vec<PathBuf>) -> Option<PathBuf> {
    paths.sort();
    paths.into_iter().max_by_key(|p| creation_time(p))
}

/// Translate one path segment containing `*`/`?` into an anchored regex.
fn segment_regex(segment: &str) -> Option<Regex> {
    let mut re = String::from("^");
    for c in segment.chars() {
        match c {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            _ => re.push_str(&regex::escape(&c.to_string())),
        }
    }
    re.push('$');
    Regex::new(&re).ok()
}

fn has_wildcard(segment: &str) -> bool {
    segment.contains('*') || segment.contains('?')
}

/// Expand a `/`-separated pattern relative to `base`.
///
/// Wildcards match within a single path segment. Only existing paths are
/// returned; unreadable directories simply contribute nothing.
pub fn expand_glob(base: &Path, pattern: &str) -> Vec<PathBuf> {
    let mut current = vec![base.to_path_buf()];

    for segment in pattern.split('/').filter(|s| !s.is_empty()) {
        let mut next = Vec::new();

        if has_wildcard(segment) {
            let Some(re) = segment_regex(segment) else {
                return Vec::new();
            };
            for dir in &current {
                let Ok(entries) = fs::read_dir(dir) else {
                    continue;
                };
                for entry in entries.filter_map(|e| e.ok()) {
                    let name = entry.file_name();
                    if re.is_match(&name.to_string_lossy()) {
                        next.push(entry.path());
                    }
                }
            }
        } else {
            for dir in &current {
                let candidate = dir.join(segment);
                if candidate.exists() {
                    next.push(candidate);
                }
            }
        }

        if next.is_empty() {
            return Vec::new();
        }
        current = next;
    }

    current.sort();
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_cl(root: &Path, year: &str, edition: &str, toolset: &str) -> PathBuf {
        let dir = root
            .join("Microsoft Visual Studio")
            .join(year)
            .join(edition)
            .join("VC")
            .join("Tools")
            .join("MSVC")
            .join(toolset)
            .join("bin")
            .join("Hostx64")
            .join("x64");
        fs::create_dir_all(&dir).unwrap();
        let cl = dir.join("cl.exe");
        fs::write(&cl, b"").unwrap();
        cl
    }

    #[test]
    fn test_patterns_are_edition_major() {
        let roots = vec![PathBuf::from("A"), PathBuf::from("B")];
        let patterns = msvc_patterns(&roots);
        assert_eq!(patterns.len(), 6);
        assert_eq!(patterns[0].0, PathBuf::from("A"));
        assert!(patterns[0].1.contains("/Community/"));
        assert_eq!(patterns[1].0, PathBuf::from("B"));
        assert!(patterns[1].1.contains("/Community/"));
        assert!(patterns[2].1.contains("/Professional/"));
        assert!(patterns[5].1.contains("/Enterprise/"));
    }

    #[test]
    fn test_expand_glob_matches_wildcards() {
        let tmp = tempfile::tempdir().unwrap();
        fake_cl(tmp.path(), "2022", "Community", "14.38.33130");
        fake_cl(tmp.path(), "2019", "Community", "14.29.30133");
        fake_cl(tmp.path(), "2022", "Enterprise", "14.38.33130");

        let matches = expand_glob(tmp.path(), &cl_pattern("Community"));
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|p| p.ends_with("cl.exe")));
    }

    #[test]
    fn test_expand_glob_no_match() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(expand_glob(tmp.path(), &cl_pattern("Community")).is_empty());
    }

    #[test]
    fn test_question_mark_matches_one_char() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("v1")).unwrap();
        fs::create_dir_all(tmp.path().join("v10")).unwrap();
        let matches = expand_glob(tmp.path(), "v?");
        assert_eq!(matches, vec![tmp.path().join("v1")]);
    }

    #[test]
    fn test_find_msvc_on_windows_host() {
        let tmp = tempfile::tempdir().unwrap();
        fake_cl(tmp.path(), "2022", "Professional", "14.38.33130");

        let found = find_msvc(HostOs::Windows, &[tmp.path().to_path_buf()]).unwrap();
        assert!(found.ends_with("bin/Hostx64/x64/cl.exe"));
        assert!(found.contains("/Professional/"));
        assert!(!found.contains('\\'));
    }

    #[test]
    fn test_find_msvc_prefers_earlier_edition() {
        let tmp = tempfile::tempdir().unwrap();
        fake_cl(tmp.path(), "2022", "Enterprise", "14.38.33130");
        fake_cl(tmp.path(), "2019", "Community", "14.29.30133");

        let found = find_msvc(HostOs::Windows, &[tmp.path().to_path_buf()]).unwrap();
        assert!(found.contains("/Community/"));
    }

    #[test]
    fn test_find_msvc_picks_one_of_several_toolsets() {
        let tmp = tempfile::tempdir().unwrap();
        let a = fake_cl(tmp.path(), "2022", "Community", "14.36.32532");
        let b = fake_cl(tmp.path(), "2022", "Community", "14.38.33130");

        let found = find_msvc(HostOs::Windows, &[tmp.path().to_path_buf()]).unwrap();
        let a = a.to_string_lossy().replace('\\', "/");
        let b = b.to_string_lossy().replace('\\', "/");
        assert!(found == a || found == b);
    }

    #[test]
    fn test_find_msvc_ignored_off_windows() {
        let tmp = tempfile::tempdir().unwrap();
        fake_cl(tmp.path(), "2022", "Community", "14.38.33130");
        let roots = [tmp.path().to_path_buf()];

        assert_eq!(find_msvc(HostOs::Linux, &roots), None);
        assert_eq!(find_msvc(HostOs::MacOs, &roots), None);
    }
}
