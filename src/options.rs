//! Audit options and configuration.

use std::time::Duration;

/// Options shared by both auditors and the metadata resolver.
///
/// The resolution threshold and the tool names are injected configuration,
/// not module constants, so deployments can point the engine at alternative
/// binaries or stricter print requirements.
#[derive(Debug, Clone)]
pub struct AuditOptions {
    /// Minimum print resolution on each axis, in pixels per inch.
    /// The threshold is inclusive: an image at exactly this value is good.
    pub min_ppi: u32,

    /// Image-listing tool, invoked as `<tool> -list <path>`.
    pub image_tool: String,

    /// Text-extraction tool, invoked as `<tool> <path> -f <first> -l <last> -`.
    pub text_tool: String,

    /// Upper bound on a single tool invocation. Expiry kills the child and
    /// is treated as a recoverable per-document failure.
    pub tool_timeout: Duration,

    /// Whether documents are audited in parallel.
    pub parallel: bool,

    /// Name of the container holding the canonical metadata record.
    pub metadata_container: String,

    /// Language passed to the localizer for derived month names.
    pub language: String,
}

impl AuditOptions {
    /// Create new audit options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum per-axis print resolution in ppi.
    pub fn with_min_ppi(mut self, ppi: u32) -> Self {
        self.min_ppi = ppi;
        self
    }

    /// Set the image-listing tool.
    pub fn with_image_tool(mut self, tool: impl Into<String>) -> Self {
        self.image_tool = tool.into();
        self
    }

    /// Set the text-extraction tool.
    pub fn with_text_tool(mut self, tool: impl Into<String>) -> Self {
        self.text_tool = tool.into();
        self
    }

    /// Set the per-invocation tool timeout.
    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    /// Enable or disable parallel document audits.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Audit documents one at a time.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the name of the metadata container to look for.
    pub fn with_metadata_container(mut self, name: impl Into<String>) -> Self {
        self.metadata_container = name.into();
        self
    }

    /// Set the localization language for derived month names.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            min_ppi: 300,
            image_tool: "pdfimages".into(),
            text_tool: "pdftotext".into(),
            tool_timeout: Duration::from_secs(30),
            parallel: true,
            metadata_container: "XML".into(),
            language: "it".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_options_builder() {
        let options = AuditOptions::new()
            .with_min_ppi(600)
            .with_image_tool("/opt/poppler/bin/pdfimages")
            .with_tool_timeout(Duration::from_secs(5))
            .sequential();

        assert_eq!(options.min_ppi, 600);
        assert_eq!(options.image_tool, "/opt/poppler/bin/pdfimages");
        assert_eq!(options.tool_timeout, Duration::from_secs(5));
        assert!(!options.parallel);
    }

    #[test]
    fn test_default_options() {
        let options = AuditOptions::default();
        assert_eq!(options.min_ppi, 300);
        assert_eq!(options.image_tool, "pdfimages");
        assert_eq!(options.text_tool, "pdftotext");
        assert_eq!(options.metadata_container, "XML");
        assert!(options.parallel);
    }
}
