/// Configuration options for comment extraction.
///
/// # Examples
///
/// ```rust
/// use litchi_comments::ExtractOptions;
///
/// // Create with defaults
/// let options = ExtractOptions::default();
/// assert_eq!(options.page_size, 25);
///
/// // Or customize
/// let options = ExtractOptions::new()
///     .with_page_size(40)
///     .with_max_propagation_passes(32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Paragraphs per estimated page. The container stores no pagination,
    /// so `page = ceil(line / page_size)`.
    pub page_size: usize,
    /// Upper bound on reply propagation passes in the thread builder.
    ///
    /// Reply chains deeper than this are promoted to standalone threads.
    pub max_propagation_passes: usize,
}

/// Default paragraphs per page.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Default bound on reply propagation passes.
pub const DEFAULT_MAX_PROPAGATION_PASSES: usize = 10;

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_propagation_passes: DEFAULT_MAX_PROPAGATION_PASSES,
        }
    }
}

impl ExtractOptions {
    /// Create a new `ExtractOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of paragraphs per estimated page.
    ///
    /// A value of zero is clamped to one.
    #[inline]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Set the bound on reply propagation passes.
    #[inline]
    pub fn with_max_propagation_passes(mut self, passes: usize) -> Self {
        self.max_propagation_passes = passes;
        self
    }
}
