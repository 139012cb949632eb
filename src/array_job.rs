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

//! Combine all runs of a batch into one SGE array job submission.
//!
//! The submission template is resolved against the output root, so the
//! submitted script is the master script whose paths use the task index.
//! The task range and the concurrency cap are inserted before the last
//! token of the command, which must be the script path:
//!
//! ```text
//! qsub -P proj -o /out/cwl.out -e /out/cwl.err -t 1-20 -tc 15 /out/cwl.sh
//! ```

use crate::config::Config;
use crate::templates::TemplateSet;

use std::path::Path;

type E = Box<dyn std::error::Error>;

#[derive(Debug, Clone)]
pub struct EmptySubmitCommand;

impl std::fmt::Display for EmptySubmitCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "submission command is empty, cannot find the script to submit")
    }
}

impl std::error::Error for EmptySubmitCommand {}

/// Task range and concurrency arguments, eg. `-t 1-20 -tc 15`.
pub fn task_args(
    n_runs: usize,
    max_concurrent: usize,
) -> String {
    format!("-t 1-{} -tc {}", n_runs, max_concurrent)
}

/// Insert the array arguments before the final token of `submit_command`.
///
/// Tokens are split on whitespace and rejoined with single spaces.
pub fn insert_task_args(
    submit_command: &str,
    n_runs: usize,
    max_concurrent: usize,
) -> Result<String, E> {
    let mut tokens: Vec<&str> = submit_command.split_whitespace().collect();
    let script = tokens.pop().ok_or(EmptySubmitCommand)?;
    let args = task_args(n_runs, max_concurrent);

    let mut parts: Vec<&str> = tokens;
    parts.push(&args);
    parts.push(script);

    Ok(parts.join(" "))
}

/// Array job command covering runs `1..=n_runs` under `out_root`.
pub fn array_job_command(
    templates: &TemplateSet,
    out_root: &Path,
    n_runs: usize,
    config: &Config,
) -> Result<String, E> {
    let submit = templates.render_submit(out_root, config);
    insert_task_args(&submit, n_runs, config.max_concurrent)
}
