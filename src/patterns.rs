//! Source and object suffixes, loaded from the embedded patterns.toml.

use crate::error::Result;
use crate::matcher::has_extension;
use serde::Deserialize;

/// What a directory entry is, judged by its name alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Source,
    Object,
}

#[derive(Debug, Deserialize)]
struct PatternsConfig {
    sources: SuffixConfig,
    objects: SuffixConfig,
}

#[derive(Debug, Deserialize)]
struct SuffixConfig {
    extensions: Vec<String>,
}

// Embed the TOML file directly in the binary at compile time
const PATTERNS_TOML: &str = include_str!("../patterns.toml");

/// Extensions that classify directory entries
#[derive(Debug, Clone)]
pub struct Patterns {
    pub sources: Vec<String>,
    pub objects: Vec<String>,
}

impl Patterns {
    /// Parse the embedded patterns table
    pub fn load() -> Result<Self> {
        Self::from_toml(PATTERNS_TOML)
    }

    fn from_toml(text: &str) -> Result<Self> {
        let config: PatternsConfig = toml::from_str(text)?;
        Ok(Patterns {
            sources: config.sources.extensions,
            objects: config.objects.extensions,
        })
    }

    /// Classify a file name by its final extension; sources take precedence
    pub fn classify(&self, name: &str) -> Option<FileKind> {
        if self.sources.iter().any(|ext| has_extension(name, ext)) {
            Some(FileKind::Source)
        } else if self.objects.iter().any(|ext| has_extension(name, ext)) {
            Some(FileKind::Object)
        } else {
            None
        }
    }
}
