use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::Path;
use tracing::trace;
use walkdir::WalkDir;

/// Recursively copies `source` into `destination`.
///
/// Entries whose file name satisfies `exclude` are skipped along with their
/// whole subtree, at any depth. Regular files overwrite same-named files in
/// `destination`; files that only exist in `destination` are left alone.
/// Symbolic links are followed and their targets copied as plain content.
///
/// Returns the number of files copied.
pub fn copy_tree<F>(source: &Path, destination: &Path, exclude: F) -> io::Result<u64>
where
    F: Fn(&OsStr) -> bool,
{
    fs::create_dir_all(destination)?;

    let walker = WalkDir::new(source)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !exclude(entry.file_name()));

    let mut copied = 0;
    for entry in walker {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(io::Error::other)?;
        let target = destination.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
        } else if file_type.is_file() {
            trace!("Copying {:?} -> {:?}", entry.path(), target);
            fs::copy(entry.path(), &target)?;
            copied += 1;
        } else {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("unsupported file type: {}", entry.path().display()),
            ));
        }
    }

    Ok(copied)
}
