use crate::error::CliError;
use crate::link::mirror_options::MirrorOptions;
use crate::link::resolve::resolve;
use clap::{Arg, ArgAction, Command, value_parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Token that switches the whole run to recursive mode when it follows the roots.
pub const RECURSIVE_FLAG: &str = "--recursive";

const MIN_ARGS: usize = 3;

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub source_root: PathBuf,
    pub build_root: PathBuf,
    /// Requested paths relative to `source_root`, in argument order
    pub rel_paths: Vec<PathBuf>,
    pub options: MirrorOptions,
}

impl Invocation {
    /// Resolves both roots to absolute form. The build root may not exist yet.
    ///
    /// A root that cannot be resolved is kept as given, so the usage check
    /// stays the only fatal error.
    pub fn resolve_roots(self) -> Self {
        Self {
            source_root: resolve_root(self.source_root),
            build_root: resolve_root(self.build_root),
            ..self
        }
    }
}

fn resolve_root(root: PathBuf) -> PathBuf {
    match resolve(&root) {
        Ok(resolved) => resolved,
        Err(err) => {
            tracing::warn!(root = %root.display(), error = %err, "Using unresolved root");
            root
        }
    }
}

pub fn command() -> Command {
    Command::new("link-mirror")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Mirror files from a source tree into a build tree as symbolic links")
        .override_usage("link-mirror <SOURCE_ROOT> <BUILD_ROOT> [--recursive] <RELATIVE_PATH>...")
        // Every token is a value, including ones that look like flags.
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("args")
                .num_args(0..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .value_name("ARG")
                .value_parser(value_parser!(OsString))
                .action(ArgAction::Append),
        )
}

/// Parses the process arguments, program name included.
///
/// The first two tokens are always the source and build roots. Among the
/// rest, an exact `--recursive` switches the whole run to recursive mode and
/// everything else is a relative path. Fewer than three tokens after the
/// program name is the only usage error.
pub fn parse_args<I, T>(args: I) -> Result<Invocation, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let program_os = args.next().unwrap_or_else(|| OsString::from("link-mirror"));
    let program = program_os.to_string_lossy().into_owned();
    let tokens: Vec<OsString> = args.collect();

    if tokens.len() < MIN_ARGS {
        return Err(CliError::Usage { program });
    }

    // The leading `--` makes clap hand back every token verbatim, `--` included.
    let argv = [program_os, OsString::from("--")].into_iter().chain(tokens);
    let matches = command().try_get_matches_from(argv).map_err(|e| {
        tracing::debug!(error = %e, "Rejected command line");
        CliError::Usage {
            program: program.clone(),
        }
    })?;

    let mut values = matches.get_many::<OsString>("args").into_iter().flatten();
    let (Some(source_root), Some(build_root)) = (values.next(), values.next()) else {
        return Err(CliError::Usage { program });
    };

    let mut recursive = false;
    let mut rel_paths = Vec::new();
    for token in values {
        if token.as_os_str() == RECURSIVE_FLAG {
            recursive = true;
        } else {
            rel_paths.push(PathBuf::from(token));
        }
    }

    Ok(Invocation {
        source_root: PathBuf::from(source_root),
        build_root: PathBuf::from(build_root),
        rel_paths,
        options: MirrorOptions { recursive },
    })
}
