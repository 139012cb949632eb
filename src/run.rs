// gridprep: Prepare per-sample run directories and array job submissions for SGE grids.
//
// Copyright 2025 Tommi Mäklin [tommi@maklin.fi].
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//

//! Materialize a single run directory.
//!
//! Each run gets its own directory `{out_root}/{run_id}` containing an
//! instantiated execution script and run configuration. The instantiated
//! submission command is returned in [Run] for the manifest and is not
//! written to disk.

use crate::config::Config;
use crate::reads::ReadPair;
use crate::templates::TemplateSet;

use std::path::Path;
use std::path::PathBuf;

type E = Box<dyn std::error::Error>;

/// A prepared run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Run {
    pub run_id: usize,
    pub out_dir: PathBuf,
    pub reads: ReadPair,
    pub script_path: PathBuf,
    pub run_config_path: PathBuf,
    pub submit_command: String,
}

/// Create `path` and any missing parents.
///
/// Succeeds if `path` already is a directory. Fails if `path` or one of its
/// parents exists as something other than a directory.
pub fn make_directory(
    path: &Path,
) -> Result<(), std::io::Error> {
    std::fs::create_dir_all(path)
}

/// Directory of run `run_id` under `out_root`.
pub fn run_dir(
    out_root: &Path,
    run_id: usize,
) -> PathBuf {
    out_root.join(run_id.to_string())
}

/// Write the files of run `run_id` for `reads` under `out_root`.
///
/// ## Errors
///
/// Returns the underlying I/O error if the directory cannot be created or a
/// file cannot be written. Files written before the error are left in place.
///
pub fn materialize_run(
    run_id: usize,
    reads: &ReadPair,
    out_root: &Path,
    templates: &TemplateSet,
    config: &Config,
) -> Result<Run, E> {
    let out_dir = run_dir(out_root, run_id);
    make_directory(&out_dir)?;

    let script_path = config.script_path(&out_dir);
    let run_config_path = config.run_config_path(&out_dir);

    let script = templates.render_script(&out_dir, config);
    let run_config = templates.render_run_config(reads);
    let submit_command = templates.render_submit(&out_dir, config);

    std::fs::write(&script_path, script)?;
    std::fs::write(&run_config_path, run_config)?;

    log::info!("Prepared run {} in {}", run_id, out_dir.display());

    Ok(Run {
        run_id,
        out_dir,
        reads: reads.clone(),
        script_path,
        run_config_path,
        submit_command,
    })
}
