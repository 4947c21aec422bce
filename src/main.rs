use link_mirror::cli::{self, Invocation};
use link_mirror::link::mirror::mirror_all;
use std::env;
use std::process;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "LINK_MIRROR_LOG";

fn main() {
    setup_logging();

    let invocation = match cli::parse_args(env::args_os()) {
        Ok(invocation) => invocation,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };

    let Invocation {
        source_root,
        build_root,
        rel_paths,
        options,
    } = invocation.resolve_roots();

    tracing::debug!(
        source_root = %source_root.display(),
        build_root = %build_root.display(),
        recursive = options.recursive,
        "Mirroring {} path(s)",
        rel_paths.len()
    );

    let report = mirror_all(&source_root, &build_root, &rel_paths, &options);

    tracing::debug!(
        linked = report.linked.len(),
        failed = report.failed.len(),
        "Finished"
    );
}

fn setup_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
