//! This module provides the `AutomatonLoader` struct, responsible for building automata
//! from JSON creation payloads stored in files, strings, or whole directories.

use crate::definition::{Automaton, AutomatonSpec};
use crate::types::AutomatonError;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

const PAYLOAD_EXTENSION: &str = "json";

/// `AutomatonLoader` reads creation payloads (`{"kind": ..., ...}`) and builds validated
/// automata from them. NPDA payloads go through the transition normalizer on the way.
pub struct AutomatonLoader;

impl AutomatonLoader {
    /// Loads a single automaton from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Automaton)` if the file is read, decoded and validated.
    /// * `Err(AutomatonError::FileError)` if the file cannot be read.
    /// * `Err(AutomatonError::ParseError)` if the content is not a creation payload.
    /// * Any normalization or validation error produced while building.
    pub fn load_automaton(path: &Path) -> Result<Automaton, AutomatonError> {
        let content = fs::read_to_string(path).map_err(|e| {
            AutomatonError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        debug!("Loading automaton from {}", path.display());
        Self::load_automaton_from_string(&content)
    }

    /// Loads a single automaton from a JSON creation payload held in memory.
    pub fn load_automaton_from_string(content: &str) -> Result<Automaton, AutomatonError> {
        let spec: AutomatonSpec = serde_json::from_str(content)?;
        spec.build()
    }

    /// Loads every `.json` payload in a directory. Subdirectories and other files are
    /// skipped; each loaded file yields its own result, so one bad file does not hide the
    /// others.
    pub fn load_automatons(directory: &Path) -> Vec<Result<(PathBuf, Automaton), AutomatonError>> {
        if !directory.exists() {
            return vec![Err(AutomatonError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(AutomatonError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut paths = Vec::new();
        let mut results = Vec::new();

        for entry in entries {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file()
                        && path.extension().is_some_and(|ext| ext == PAYLOAD_EXTENSION)
                    {
                        paths.push(path);
                    }
                }
                Err(e) => results.push(Err(AutomatonError::FileError(format!(
                    "Failed to read directory entry: {}",
                    e
                )))),
            }
        }

        // Directory order is platform dependent.
        paths.sort();

        results.extend(paths.into_iter().map(|path| {
            Self::load_automaton(&path)
                .map(|automaton| (path.clone(), automaton))
                .map_err(|e| {
                    AutomatonError::FileError(format!(
                        "Failed to load automaton from {}: {}",
                        path.display(),
                        e
                    ))
                })
        }));

        results
    }
}
