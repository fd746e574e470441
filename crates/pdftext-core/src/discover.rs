use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Extensions scanned for, in order. Each is matched case-sensitively and
/// independently, so `report.Pdf` is not picked up.
pub const PDF_EXTENSIONS: [&str; 2] = ["pdf", "PDF"];

/// Returns true if the file name of `path` is `<stem>.<ext>` with a
/// non-empty stem. Compares raw `OsStr`s, so names that are not valid UTF-8
/// still match.
pub fn matches_pattern(path: &Path, ext: &str) -> bool {
    path.extension() == Some(OsStr::new(ext))
        && path.file_stem().is_some_and(|stem| !stem.is_empty())
}

/// List the PDF files directly inside `dir`.
///
/// All `*.pdf` matches come first, followed by all `*.PDF` matches. With
/// `sort` each group is ordered by file name; otherwise directory order is
/// kept. Subdirectories are not descended into.
pub fn discover_pdfs(dir: &Path, sort: bool) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        // `Path::is_file` follows symlinks, unlike `DirEntry::file_type`
        let path = entry?.path();
        if path.is_file() {
            entries.push(path);
        }
    }

    let mut pdfs = Vec::new();
    for ext in PDF_EXTENSIONS {
        let mut group: Vec<PathBuf> = entries
            .iter()
            .filter(|p| matches_pattern(p, ext))
            .cloned()
            .collect();
        if sort {
            group.sort();
        }
        pdfs.extend(group);
    }
    Ok(pdfs)
}

/// Path of the `.txt` file written for `pdf_path`: the file stem with its
/// PDF extension stripped, `.txt` appended, inside `txt_dir`.
pub fn output_path_for(pdf_path: &Path, txt_dir: &Path) -> PathBuf {
    let mut name = pdf_path.file_stem().unwrap_or_default().to_os_string();
    name.push(".txt");
    txt_dir.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_is_case_sensitive() {
        assert!(matches_pattern(Path::new("paper.pdf"), "pdf"));
        assert!(matches_pattern(Path::new("PAPER.PDF"), "PDF"));
        assert!(!matches_pattern(Path::new("paper.pdf"), "PDF"));
        assert!(!matches_pattern(Path::new("paper.Pdf"), "pdf"));
        assert!(!matches_pattern(Path::new("paper.Pdf"), "PDF"));
    }

    #[test]
    fn pattern_rejects_other_extensions() {
        assert!(!matches_pattern(Path::new("notes.txt"), "pdf"));
        assert!(!matches_pattern(Path::new("archive.pdf.gz"), "pdf"));
        assert!(!matches_pattern(Path::new("pdf"), "pdf"));
        assert!(!matches_pattern(Path::new("/in/.pdf"), "pdf"));
    }

    #[test]
    fn pattern_uses_last_extension() {
        assert!(matches_pattern(Path::new("/in/report.v2.pdf"), "pdf"));
    }

    #[test]
    fn output_path_strips_extension() {
        let txt_dir = Path::new("/out");
        assert_eq!(
            output_path_for(Path::new("/in/sample.pdf"), txt_dir),
            PathBuf::from("/out/sample.txt")
        );
        assert_eq!(
            output_path_for(Path::new("/in/SAMPLE.PDF"), txt_dir),
            PathBuf::from("/out/SAMPLE.txt")
        );
        assert_eq!(
            output_path_for(Path::new("/in/report.v2.pdf"), txt_dir),
            PathBuf::from("/out/report.v2.txt")
        );
    }

    #[test]
    fn discover_groups_lowercase_before_uppercase() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "A.PDF", "a.pdf", "notes.txt", "c.Pdf"] {
            std::fs::write(dir.path().join(name), b"%PDF-1.4").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let found = discover_pdfs(dir.path(), true).unwrap();
        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf", "A.PDF"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn discover_keeps_non_utf8_names() {
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let name = OsStr::from_bytes(b"r\xe9sum\xe9.pdf");
        std::fs::write(dir.path().join(name), b"%PDF-1.4").unwrap();

        let found = discover_pdfs(dir.path(), true).unwrap();
        assert_eq!(found, vec![dir.path().join(name)]);
        assert_eq!(
            output_path_for(&found[0], Path::new("/out")),
            Path::new("/out").join(OsStr::from_bytes(b"r\xe9sum\xe9.txt"))
        );
    }

    #[test]
    fn discover_missing_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_pdfs(&dir.path().join("missing"), true).is_err());
    }
}
