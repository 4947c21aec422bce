use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while mirroring paths into the build root.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error(
        "Failed to create symlink: {} -> {}: {source}",
        .dest.display(),
        .src.display()
    )]
    Link {
        src: PathBuf,
        dest: PathBuf,
        source: io::Error,
    },
}

/// Failures raised while reading the command line.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Usage: {program} <source_root> <build_root> [--recursive] <relative_paths...>")]
    Usage { program: String },
}
