//! Per-source-file definition contexts.

use lattice_identity::FileId;
use rustc_hash::FxHashSet;

use crate::metadata::Metadata;

/// Warning categories that `suppress-warning` file metadata can silence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCategory {
    All,
    Deprecated,
    InvalidMetadata,
}

impl WarningCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            WarningCategory::All => "all",
            WarningCategory::Deprecated => "deprecated",
            WarningCategory::InvalidMetadata => "invalid-metadata",
        }
    }

    pub fn from_str(s: &str) -> Option<WarningCategory> {
        match s {
            "all" => Some(WarningCategory::All),
            "deprecated" => Some(WarningCategory::Deprecated),
            "invalid-metadata" => Some(WarningCategory::InvalidMetadata),
            _ => None,
        }
    }
}

/// State tracked per opened source file: file-level metadata and the set of
/// suppressed warning categories.
#[derive(Debug, Clone)]
pub struct DefinitionContext {
    pub file: FileId,
    /// True when the file was pulled in by an include rather than named on
    /// the command line.
    pub included: bool,
    pub metadata: Vec<Metadata>,
    suppressed: FxHashSet<WarningCategory>,
}

impl DefinitionContext {
    pub fn new(file: FileId, included: bool) -> Self {
        Self {
            file,
            included,
            metadata: Vec::new(),
            suppressed: FxHashSet::default(),
        }
    }

    pub fn suppress(&mut self, category: WarningCategory) {
        self.suppressed.insert(category);
    }

    pub fn suppresses(&self, category: WarningCategory) -> bool {
        self.suppressed.contains(&WarningCategory::All) || self.suppressed.contains(&category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suppress_all_covers_every_category() {
        let mut ctx = DefinitionContext::new(FileId::new(0), false);
        assert!(!ctx.suppresses(WarningCategory::Deprecated));
        ctx.suppress(WarningCategory::All);
        assert!(ctx.suppresses(WarningCategory::Deprecated));
        assert!(ctx.suppresses(WarningCategory::InvalidMetadata));
    }
}
