//! Command implementations.

use std::path::{Path, PathBuf};

use thiserror::Error;
use vg_codegen::{build, parse_build_options, Build, BuildError, BuildOptions, OptionsError};
use vg_language::{language, LanguageId};

use crate::nodes::demo_graph;

/// Environment variable holding default generation flags, applied under
/// the command line.
pub const OPTIONS_ENV: &str = "VGC_OPTIONS";

/// Exit status when generation succeeded but placeholder markers survived.
pub const EXIT_UNRESOLVED: i32 = 2;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Options(#[from] OptionsError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Flags from [`OPTIONS_ENV`], if set.
pub fn env_options() -> Result<BuildOptions, OptionsError> {
    match std::env::var(OPTIONS_ENV) {
        Ok(value) => {
            let args: Vec<String> = value.split_whitespace().map(str::to_string).collect();
            parse_build_options(&args)
        }
        Err(_) => Ok(BuildOptions::default()),
    }
}

/// Generate the demonstration pipeline, writing it to `output` or stdout.
pub fn generate(options: &BuildOptions, output: Option<&Path>) -> Result<Build, CommandError> {
    let nodes = demo_graph(options);
    let build = build(options, &nodes)?;

    match output {
        Some(path) => std::fs::write(path, &build.source).map_err(|source| CommandError::Write {
            path: path.to_path_buf(),
            source,
        })?,
        None => print!("{}", build.source),
    }

    if build.had_unresolved_markers() {
        eprintln!(
            "warning: {} placeholder marker(s) left in the generated source",
            build.unresolved.len()
        );
    }
    Ok(build)
}

/// Process exit status for the outcome of [`generate`].
pub fn exit_status(result: &Result<Build, CommandError>) -> i32 {
    match result {
        Ok(build) if build.had_unresolved_markers() => EXIT_UNRESOLVED,
        Ok(_) => 0,
        Err(_) => 1,
    }
}

pub fn list_languages() {
    println!("Supported languages:");
    for id in LanguageId::ALL {
        println!("  {id:<8} .{}", language(id).source_extension());
    }
}
