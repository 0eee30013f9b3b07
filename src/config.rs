use crate::error::{EmailError, EmailResult};

/// Maximum tree depth before rendering aborts.
pub const DEFAULT_MAX_DEPTH: usize = 64;
/// Maximum number of nodes visited in a single render.
pub const DEFAULT_MAX_NODES: usize = 10_000;
/// Email content width that `%` paddings are resolved against, in px.
pub const DEFAULT_PADDING_REFERENCE_WIDTH: f64 = 600.0;
/// Largest `mso-font-width` Outlook honours, as a ratio (500%).
pub const DEFAULT_MSO_MAX_FONT_WIDTH: f64 = 5.0;
/// Longest hair-space run emitted for one side of a button.
pub const DEFAULT_MAX_MSO_SPACE_COUNT: usize = 1_000;

/// Render-wide settings. Everything the engine treats as convention rather
/// than something derivable from the input lives here.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub max_depth: usize,
    pub max_nodes: usize,
    pub padding_reference_width: f64,
    pub mso_max_font_width: f64,
    pub max_mso_space_count: usize,
    /// `lang` attribute of the assembled document.
    pub lang: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
            padding_reference_width: DEFAULT_PADDING_REFERENCE_WIDTH,
            mso_max_font_width: DEFAULT_MSO_MAX_FONT_WIDTH,
            max_mso_space_count: DEFAULT_MAX_MSO_SPACE_COUNT,
            lang: "en".to_string(),
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Depth and node limits for one walk over a tree.
#[derive(Debug)]
pub(crate) struct Budget {
    max_depth: usize,
    max_nodes: usize,
    visited: usize,
}

impl Budget {
    pub(crate) fn new(options: &RenderOptions) -> Self {
        Self {
            max_depth: options.max_depth,
            max_nodes: options.max_nodes,
            visited: 0,
        }
    }

    /// Count one node at `depth` (the root is depth 0).
    pub(crate) fn enter(&mut self, depth: usize) -> EmailResult<()> {
        if depth >= self.max_depth {
            return Err(self.too_deep());
        }
        self.visited += 1;
        if self.visited > self.max_nodes {
            return Err(EmailError::RenderOverflow {
                limit: self.max_nodes,
                reason: "tree has too many nodes".to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn too_deep(&self) -> EmailError {
        EmailError::RenderOverflow {
            limit: self.max_depth,
            reason: "tree is nested too deeply".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_depth_limit() {
        let options = RenderOptions {
            max_depth: 2,
            ..RenderOptions::default()
        };
        let mut budget = Budget::new(&options);
        assert!(budget.enter(0).is_ok());
        assert!(budget.enter(1).is_ok());
        assert!(matches!(
            budget.enter(2),
            Err(EmailError::RenderOverflow { limit: 2, .. })
        ));
    }

    #[test]
    fn test_budget_node_limit() {
        let options = RenderOptions {
            max_nodes: 3,
            ..RenderOptions::default()
        };
        let mut budget = Budget::new(&options);
        for _ in 0..3 {
            budget.enter(1).unwrap();
        }
        assert!(matches!(
            budget.enter(1),
            Err(EmailError::RenderOverflow { limit: 3, .. })
        ));
    }
}
