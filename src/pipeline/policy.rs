/// Behavioural policy sent as the system message of every completion.
///
/// The policy is an external, versioned document: the copy shipped in
/// `policy/sistema.md` is the default and a deployment can point
/// `policy_path` at its own revision.
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

const DEFAULT_POLICY: &str = include_str!("../../policy/sistema.md");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    text: String,
}

impl Policy {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Read a policy document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read policy: {}", path.display()))?;
        anyhow::ensure!(
            !text.trim().is_empty(),
            "policy file is empty: {}",
            path.display()
        );
        info!("Loaded policy from {}", path.display());
        Ok(Self { text })
    }

    /// Load from `path` when given, otherwise use the bundled default.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) if !p.is_empty() => Self::load(Path::new(p)),
            _ => Ok(Self::default()),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::new(DEFAULT_POLICY)
    }
}
