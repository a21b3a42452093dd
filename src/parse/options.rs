use crate::Vocabulary;

/// Newest rule file format version this parser understands.
pub const SUPPORTED_VERSION: u32 = 20200610;

/// Knobs for a single parse.
///
/// ```
/// use drl::ParseOptions;
///
/// let options = ParseOptions::new()
///     .source_name("board.drl")
///     .supported_version(20200610);
/// # let _ = options;
/// ```
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub(crate) supported_version: u32,
    pub(crate) source_name: Option<String>,
    pub(crate) vocabulary: Vocabulary,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            supported_version: SUPPORTED_VERSION,
            source_name: None,
            vocabulary: Vocabulary::standard(),
        }
    }
}

impl ParseOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Files declaring a newer version still parse, but are flagged as too
    /// recent.
    #[must_use]
    pub fn supported_version(mut self, version: u32) -> Self {
        self.supported_version = version;
        self
    }

    /// Name reported in error messages, usually the file path.
    #[must_use]
    pub fn source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Replace the attribute and constraint tables.
    #[must_use]
    pub fn vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }
}
