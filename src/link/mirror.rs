use crate::error::MirrorError;
use crate::link::mirror_options::MirrorOptions;
use crate::link::resolve::resolve;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Outcome of mirroring one or more requested paths.
#[derive(Debug, Default)]
pub struct MirrorReport {
    /// Destinations where a symlink was created, in creation order
    pub linked: Vec<PathBuf>,
    /// Links that could not be created
    pub failed: Vec<MirrorError>,
}

impl MirrorReport {
    fn record(&mut self, result: Result<PathBuf, MirrorError>) {
        match result {
            Ok(dest) => self.linked.push(dest),
            Err(err) => self.failed.push(err),
        }
    }

    /// Appends another report's outcomes to this one.
    pub fn merge(&mut self, other: MirrorReport) {
        self.linked.extend(other.linked);
        self.failed.extend(other.failed);
    }
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

/// Puts a symlink to the resolved `src` at `dest`, replacing whatever is there.
fn replace_with_symlink(src: &Path, dest: &Path) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    // symlink_metadata also sees dangling links
    if fs::symlink_metadata(dest).is_ok() {
        fs::remove_file(dest)?;
        tracing::debug!(dest = %dest.display(), "Removed existing entry");
    }

    let target = resolve(src)?;
    symlink(&target, dest)
}

/// Creates a symbolic link at `dest` pointing to the resolved `src`.
///
/// Missing parent directories of `dest` are created and any existing entry
/// at `dest` is removed first. The outcome is reported on stdout or stderr;
/// a failure is returned so callers can record it, but never needs to stop
/// them.
///
/// # Arguments
///
/// * `src` - The path the link should point to; it does not have to exist
/// * `dest` - The path where the link should be created
///
/// # Returns
///
/// * `Result<PathBuf, MirrorError>` - The path of the created link
pub fn create_link(src: &Path, dest: &Path) -> Result<PathBuf, MirrorError> {
    match replace_with_symlink(src, dest) {
        Ok(()) => {
            println!(
                "[INFO] Created symlink: {} -> {}",
                dest.display(),
                src.display()
            );
            Ok(dest.to_path_buf())
        }
        Err(source) => {
            let err = MirrorError::Link {
                src: src.to_path_buf(),
                dest: dest.to_path_buf(),
                source,
            };
            eprintln!("[ERROR] {}", err);
            Err(err)
        }
    }
}

/// Mirrors one path, given relative to `source_root`, into `build_root`.
///
/// With `opts.recursive` set and a directory at the source, every regular
/// file beneath it gets its own link at the same relative position under
/// `build_root`. Anything else is linked as a single entry, whether or not
/// it exists.
///
/// # Arguments
///
/// * `source_root` - The resolved source root
/// * `build_root` - The resolved build root
/// * `rel_path` - The requested path, relative to `source_root`
/// * `opts` - Options for the whole run
///
/// # Returns
///
/// * `MirrorReport` - The links created and the failures seen
pub fn mirror_path(
    source_root: &Path,
    build_root: &Path,
    rel_path: &Path,
    opts: &MirrorOptions,
) -> MirrorReport {
    let src = source_root.join(rel_path);
    let mut report = MirrorReport::default();

    if !(opts.recursive && src.is_dir()) {
        report.record(create_link(&src, &build_root.join(rel_path)));
        return report;
    }

    for entry in WalkDir::new(&src)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "Skipping unreadable entry");
                continue;
            }
        };
        let child = entry.path();

        // Follows symlinks, so linked files count as files.
        if !child.is_file() {
            continue;
        }

        let rel_child = match child.strip_prefix(source_root) {
            Ok(rel_child) => rel_child,
            Err(_) => {
                tracing::warn!(
                    path = %child.display(),
                    root = %source_root.display(),
                    "Skipping entry outside the source root"
                );
                continue;
            }
        };

        report.record(create_link(child, &build_root.join(rel_child)));
    }

    report
}

/// Mirrors every requested path in order.
///
/// Each entry is independent: a failure in one never stops the others and
/// nothing is rolled back.
pub fn mirror_all<P: AsRef<Path>>(
    source_root: &Path,
    build_root: &Path,
    rel_paths: &[P],
    opts: &MirrorOptions,
) -> MirrorReport {
    let mut report = MirrorReport::default();
    for rel_path in rel_paths {
        report.merge(mirror_path(
            source_root,
            build_root,
            rel_path.as_ref(),
            opts,
        ));
    }
    report
}
