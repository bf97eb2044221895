//! Filename correspondence checks for dataset exports.

use std::path::Path;

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Checks that parallel file lists line up with a list of base files.
///
/// Every file name in `file_lists` must start with the stem of the base file
/// at the same position, which allows suffixes such as `_MASK` or `.bin`.
/// Directories are ignored. Returns `(true, None)` on success, otherwise
/// `(false, Some(message))` describing the first problem found.
///
/// # Example
///
/// ```
/// # use pixel_dataset::utils::match_filenames;
/// let masks = ["masks/page_01_MASK.png"];
/// assert_eq!(match_filenames(&["images/page_01.png"], &[&masks[..]]), (true, None));
/// ```
pub fn match_filenames<B, L>(base_files: &[B], file_lists: &[&[L]]) -> (bool, Option<String>)
where
    B: AsRef<Path>,
    L: AsRef<Path>,
{
    if file_lists.iter().any(|list| list.len() != base_files.len()) {
        return (false, Some("List length doesn't match".to_string()));
    }

    for (i, base) in base_files.iter().enumerate() {
        let base_name = file_name(base.as_ref());
        let base_stem = file_stem(base.as_ref());
        for list in file_lists {
            let other = file_name(list[i].as_ref());
            if !other.starts_with(&base_stem) {
                return (
                    false,
                    Some(format!("filename mismatch ({base_name} ≠ {other})")),
                );
            }
        }
    }
    (true, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_filenames_accepts_suffixes() {
        let masks = ["a_MASK.png"];
        assert_eq!(match_filenames(&["a.png"], &[&masks[..]]), (true, None));
    }

    #[test]
    fn test_match_filenames_reports_first_mismatch() {
        let masks = ["b_MASK.png"];
        let (ok, message) = match_filenames(&["a.png"], &[&masks[..]]);
        assert!(!ok);
        let message = message.unwrap();
        assert!(message.contains("a.png"));
        assert!(message.contains("b_MASK.png"));
    }

    #[test]
    fn test_match_filenames_ignores_directories() {
        let binary = ["/data/binary_images/0001.bin.png", "/data/binary_images/0002.bin.png"];
        let masks = ["/data/masks/0001_MASK.png", "/data/masks/0002_MASK.png"];
        let base = ["/data/images/0001.jpg", "/data/images/0002.jpg"];
        assert_eq!(
            match_filenames(&base, &[&binary[..], &masks[..]]),
            (true, None)
        );
    }

    #[test]
    fn test_match_filenames_checks_every_list() {
        let binary = ["0001.bin.png", "0002.bin.png"];
        let masks = ["0001_MASK.png", "0003_MASK.png"];
        let base = ["0001.png", "0002.png"];
        let (ok, message) = match_filenames(&base, &[&binary[..], &masks[..]]);
        assert!(!ok);
        assert_eq!(message.unwrap(), "filename mismatch (0002.png ≠ 0003_MASK.png)");
    }

    #[test]
    fn test_match_filenames_length_mismatch() {
        let masks = ["a_MASK.png", "b_MASK.png"];
        let (ok, message) = match_filenames(&["a.png"], &[&masks[..]]);
        assert!(!ok);
        assert_eq!(message.as_deref(), Some("List length doesn't match"));
    }

    #[test]
    fn test_match_filenames_empty_lists() {
        let empty: [&str; 0] = [];
        assert_eq!(match_filenames(&empty, &[&empty[..]]), (true, None));
    }
}
