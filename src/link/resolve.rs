use std::env;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Resolves a path to an absolute form with every symlink followed.
///
/// Unlike `fs::canonicalize`, the path does not have to exist: the deepest
/// existing ancestor is canonicalized and the missing tail is appended
/// lexically. Relative paths are taken against the current directory.
///
/// # Arguments
///
/// * `path` - The path to resolve
///
/// # Returns
///
/// * `io::Result<PathBuf>` - The resolved absolute path
pub fn resolve(path: &Path) -> io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()?.join(path)
    };

    match fs::canonicalize(&absolute) {
        Ok(canonical) => return Ok(canonical),
        Err(e) if is_missing(&e) => {}
        Err(e) => return Err(e),
    }

    let mut resolved = PathBuf::new();
    let mut exists = true;

    for component in absolute.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
                // `..` may lead back out of the missing part of the path.
                if !exists && let Ok(canonical) = fs::canonicalize(&resolved) {
                    resolved = canonical;
                    exists = true;
                }
            }
            Component::Normal(name) => {
                let candidate = resolved.join(name);
                if !exists {
                    resolved = candidate;
                    continue;
                }
                match fs::canonicalize(&candidate) {
                    Ok(canonical) => resolved = canonical,
                    Err(e) if is_missing(&e) => {
                        exists = false;
                        resolved = candidate;
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    }

    Ok(resolved)
}

/// A path that runs through a regular file is as missing as one that stops short.
fn is_missing(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_existing_path_is_canonical() -> io::Result<()> {
        let tmp = tempdir()?;
        let dir = tmp.path().join("a");
        fs::create_dir_all(&dir)?;

        assert_eq!(resolve(&dir)?, fs::canonicalize(&dir)?);
        Ok(())
    }

    #[test]
    fn test_resolve_missing_tail_is_appended() -> io::Result<()> {
        let tmp = tempdir()?;
        let base = fs::canonicalize(tmp.path())?;

        let resolved = resolve(&tmp.path().join("missing/./deeper/../leaf.txt"))?;

        assert_eq!(resolved, base.join("missing/leaf.txt"));
        Ok(())
    }

    #[test]
    fn test_resolve_through_regular_file() -> io::Result<()> {
        let tmp = tempdir()?;
        let file = tmp.path().join("plain.txt");
        fs::write(&file, b"content")?;

        let resolved = resolve(&file.join("inner/leaf.txt"))?;

        assert_eq!(resolved, fs::canonicalize(&file)?.join("inner/leaf.txt"));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_parent_dir_reenters_existing_tree() -> io::Result<()> {
        let tmp = tempdir()?;
        let real = tmp.path().join("real");
        fs::create_dir_all(&real)?;
        std::os::unix::fs::symlink(&real, tmp.path().join("alias"))?;

        let resolved = resolve(&tmp.path().join("missing/../alias/leaf.txt"))?;

        assert_eq!(resolved, fs::canonicalize(&real)?.join("leaf.txt"));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_follows_symlinked_ancestor() -> io::Result<()> {
        let tmp = tempdir()?;
        let real = tmp.path().join("real");
        fs::create_dir_all(&real)?;
        std::os::unix::fs::symlink(&real, tmp.path().join("alias"))?;

        let resolved = resolve(&tmp.path().join("alias/not-there.txt"))?;

        assert_eq!(resolved, fs::canonicalize(&real)?.join("not-there.txt"));
        Ok(())
    }
}
