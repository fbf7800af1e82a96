//! taskflow init command implementation
//!
//! Writes a config file holding every default, ready for editing.

use std::path::PathBuf;

use crate::config::{Config, CONFIG_FILE};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};

#[derive(serde::Serialize)]
struct InitReport {
    path: PathBuf,
    overwritten: bool,
}

pub fn run(path: Option<PathBuf>, force: bool, json: bool, quiet: bool) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => std::env::current_dir()?.join(CONFIG_FILE),
    };

    let exists = path.exists();
    if exists && !force {
        return Err(Error::ConfigExists(path));
    }

    Config::default().save(&path)?;

    let report = InitReport {
        path: path.clone(),
        overwritten: exists,
    };

    let mut human = HumanOutput::new("taskflow init: config written");
    human.push_summary("path", path.display().to_string());
    if exists {
        human.push_warning("existing config was overwritten");
    }

    emit_success(OutputOptions { json, quiet }, "init", &report, Some(&human))
}
