use anyhow::Context;
use std::fs;
use std::path::Path;

const BUILTIN: &[&str] = &[r"  __ ", r"<(o )", r" ( ._>", r"  `--'"];

/// Text art drawn inside the target's box
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSprite {
    pub rows: Vec<String>,
}

impl Default for TargetSprite {
    fn default() -> Self {
        Self {
            rows: BUILTIN.iter().map(|r| r.to_string()).collect(),
        }
    }
}

impl TargetSprite {
    /// Read a sprite from a text file, falling back to the built-in art
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading target sprite {}", path.display()))?;
        let rows: Vec<String> = text
            .lines()
            .map(|l| l.trim_end().to_string())
            .skip_while(|l| l.is_empty())
            .collect();
        if rows.iter().all(|r| r.is_empty()) {
            anyhow::bail!("target sprite {} is empty", path.display());
        }
        Ok(Self { rows })
    }
}
