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

//! Template documents and the per-document substitution rules.
//!
//! A batch uses three templates which are loaded once and never modified:
//!
//!   - the execution script (`cwl.sh`), filled with the run directory and
//!     the path to the run configuration.
//!   - the submission command (`qsub`), filled with the script path and the
//!     stdout and stderr log paths.
//!   - the run configuration (`targeted_assembly.yml`), filled with the two
//!     read files.
//!
//! Rendering always returns a new String.
//!
//! The submission command must be a single shell line. Lines ending in a
//! backslash are joined with the next one when the set is built, and
//! [TemplateSet::validate] rejects a command that is empty or still spans
//! several lines.

use crate::array_job::EmptySubmitCommand;
use crate::config::Config;
use crate::placeholder::scan_tokens;
use crate::placeholder::substitute;
use crate::placeholder::Placeholder;
use crate::placeholder::Substitutions;
use crate::reads::ReadPair;

use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

type E = Box<dyn std::error::Error>;

#[derive(Debug)]
pub struct TemplateError {
    pub path: PathBuf,
    pub source: std::io::Error,
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "could not read template {}: {}", self.path.display(), self.source)
    }
}

#[derive(Debug, Clone)]
pub struct MultiLineSubmitCommand {
    pub n_lines: usize,
}

impl std::fmt::Display for MultiLineSubmitCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "submission command spans {} lines, expected a single line (end lines with '\\' to continue them)", self.n_lines)
    }
}

impl std::error::Error for MultiLineSubmitCommand {}

impl std::error::Error for TemplateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Lossy conversion used when a path is written into a document.
pub fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// An immutable template document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    text: String,
}

impl Template {
    pub fn new<N: Into<String>, T: Into<String>>(
        name: N,
        text: T,
    ) -> Self {
        Template { name: name.into(), text: text.into() }
    }

    pub fn from_file(
        path: &Path,
    ) -> Result<Self, TemplateError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| TemplateError { path: path.to_path_buf(), source })?;
        let name = path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path_to_string(path));
        log::debug!("Loaded template {} ({} bytes)", path.display(), text.len());
        Ok(Template { name, text })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn render(&self, subs: &Substitutions) -> String {
        substitute(&self.text, subs)
    }

    /// Placeholder tokens present in the document.
    pub fn tokens(&self) -> Vec<String> {
        scan_tokens(&self.text)
    }

    /// Placeholder-shaped tokens that gridprep does not fill in.
    pub fn unknown_tokens(&self) -> Vec<String> {
        self.tokens().into_iter()
            .filter(|token| Placeholder::from_str(token).is_err())
            .collect()
    }

    /// Trims the text and joins lines ending in `\` with the next line.
    fn joined(self) -> Self {
        let mut text = String::with_capacity(self.text.len());
        let mut continued = false;
        for line in self.text.trim().lines() {
            let line = if continued { line.trim_start() } else { line };
            match line.trim_end().strip_suffix('\\') {
                Some(head) => {
                    text.push_str(head.trim_end());
                    text.push(' ');
                    continued = true;
                },
                None => {
                    text.push_str(line);
                    text.push('\n');
                    continued = false;
                },
            }
        }
        let text = text.trim().to_string();
        Template { name: self.name, text }
    }
}

/// The three templates that make up a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    pub script: Template,
    pub submit: Template,
    pub run_config: Template,
}

impl TemplateSet {
    /// Build a set from in-memory documents.
    ///
    /// The submission command is trimmed of surrounding whitespace and its
    /// continuation lines are joined.
    pub fn new(
        script: Template,
        submit: Template,
        run_config: Template,
    ) -> Self {
        TemplateSet { script, submit: submit.joined(), run_config }
    }

    /// Check that the submission command is a single non-empty line.
    ///
    /// ## Errors
    ///
    /// Returns [EmptySubmitCommand] or [MultiLineSubmitCommand].
    ///
    pub fn validate(&self) -> Result<(), E> {
        let submit = self.submit.text();
        if submit.split_whitespace().next().is_none() {
            return Err(Box::new(EmptySubmitCommand));
        }
        let n_lines = submit.lines().count();
        if n_lines > 1 {
            return Err(Box::new(MultiLineSubmitCommand { n_lines }));
        }
        Ok(())
    }

    /// Read the templates named in `config` from `dir`.
    pub fn load(
        dir: &Path,
        config: &Config,
    ) -> Result<Self, E> {
        let script = Template::from_file(&dir.join(&config.script_filename))?;
        let submit = Template::from_file(&dir.join(&config.submit_filename))?;
        let run_config = Template::from_file(&dir.join(&config.run_config_filename))?;

        let templates = TemplateSet::new(script, submit, run_config);
        templates.validate()?;
        templates.iter().for_each(|template| {
            template.unknown_tokens().iter().for_each(|token| {
                log::warn!("Template {} contains {} which will not be replaced", template.name(), token);
            });
        });

        Ok(templates)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        [&self.script, &self.submit, &self.run_config].into_iter()
    }

    /// Execution script for a run writing to `out_dir`.
    pub fn render_script(
        &self,
        out_dir: &Path,
        config: &Config,
    ) -> String {
        let subs = Substitutions::new()
            .with(Placeholder::OutDir, path_to_string(out_dir))
            .with(Placeholder::Yml, path_to_string(&config.run_config_path(out_dir)));
        self.script.render(&subs)
    }

    /// Execution script under the output root, resolved by each array task.
    pub fn render_master_script(
        &self,
        out_root: &Path,
        config: &Config,
    ) -> String {
        let script = self.render_script(&config.task_dir(out_root), config);
        format!("{}\n{}", config.shebang, script)
    }

    /// Run configuration for one pair of read files.
    pub fn render_run_config(
        &self,
        reads: &ReadPair,
    ) -> String {
        let subs = Substitutions::new()
            .with(Placeholder::Reads1, reads.reads1.as_str())
            .with(Placeholder::Reads2, reads.reads2.as_str());
        self.run_config.render(&subs)
    }

    /// Submission command for the script in `dir`, logging to `dir`.
    pub fn render_submit(
        &self,
        dir: &Path,
        config: &Config,
    ) -> String {
        let subs = Substitutions::new()
            .with(Placeholder::CwlSh, path_to_string(&config.script_path(dir)))
            .with(Placeholder::CwlOut, path_to_string(&config.stdout_path(dir)))
            .with(Placeholder::CwlErr, path_to_string(&config.stderr_path(dir)));
        self.submit.render(&subs)
    }
}
