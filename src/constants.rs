//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Pipeline constants
pub mod pipeline {
    /// Number of questions requested from the model
    pub const DEFAULT_QUESTION_COUNT: usize = 10;

    /// Target answer length (words), lower bound
    pub const ANSWER_MIN_WORDS: usize = 400;

    /// Target answer length (words), upper bound
    pub const ANSWER_MAX_WORDS: usize = 500;

    /// Heading placed between a model answer and the looked-up summary
    pub const WEB_CONTEXT_MARKER: &str = "Additional Context from Web";

    /// Stage names, in execution order
    pub mod stage {
        pub const QUESTIONS: &str = "question generation";
        pub const ANSWERS: &str = "answer generation";
        pub const ENRICHMENT: &str = "web enrichment";
        pub const REFINEMENT: &str = "refinement";
        pub const ASSEMBLY: &str = "document assembly";

        /// Total number of stages
        pub const COUNT: u8 = 5;
    }
}

/// Summary lookup constants
pub mod lookup {
    /// Wikipedia REST API base
    pub const DEFAULT_API_BASE: &str = "https://en.wikipedia.org/api/rest_v1";

    /// Request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

    /// Text reported when no summary is available
    pub const NOT_FOUND_SENTINEL: &str = "No summary found.";

    /// User-Agent sent with lookup requests
    pub const USER_AGENT: &str = concat!("doclearn/", env!("CARGO_PKG_VERSION"));
}

/// HTTP/Network constants
pub mod network {
    /// Default LLM request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
}

/// PDF layout constants (A4, lengths in millimetres)
pub mod pdf {
    pub const PAGE_WIDTH_MM: f32 = 210.0;
    pub const PAGE_HEIGHT_MM: f32 = 297.0;
    /// 36pt margin
    pub const MARGIN_MM: f32 = 12.7;

    pub const BODY_FONT_SIZE: f32 = 10.0;
    pub const HEADING1_FONT_SIZE: f32 = 18.0;
    pub const HEADING2_FONT_SIZE: f32 = 14.0;

    /// Baseline-to-baseline distance for body text (14pt leading)
    pub const BODY_LEADING_MM: f32 = 4.94;
    /// Vertical gap inserted for a blank line (12pt spacer)
    pub const SPACER_MM: f32 = 4.23;
}
