use std::time::Duration;

use crate::browser::FormSession;
use crate::error::Result;

/// Confidence a match must strictly exceed before its value is written.
pub const DEFAULT_THRESHOLD: f32 = 0.45;

/// Label used when no heuristic finds any text for a field.
pub const UNKNOWN_LABEL: &str = "Unknown";

pub struct BrowserConfig {
    pub headless: bool,
    pub start_maximized: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub chrome_path: Option<String>,
    /// Default timeout for operations like `wait_for_selector` (default: 30s).
    pub default_timeout: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: false,
            start_maximized: true,
            viewport_width: 1920,
            viewport_height: 1080,
            chrome_path: None,
            default_timeout: Duration::from_secs(30),
        }
    }
}

pub struct BrowserBuilder {
    config: BrowserConfig,
}

impl BrowserBuilder {
    pub fn new() -> Self {
        Self {
            config: BrowserConfig::default(),
        }
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    pub fn start_maximized(mut self, maximized: bool) -> Self {
        self.config.start_maximized = maximized;
        self
    }

    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.config.viewport_width = width;
        self.config.viewport_height = height;
        self
    }

    pub fn chrome_path(mut self, path: impl Into<String>) -> Self {
        self.config.chrome_path = Some(path.into());
        self
    }

    /// Set the default timeout for operations like `wait_for_selector`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.default_timeout = timeout;
        self
    }

    pub fn build_config(self) -> BrowserConfig {
        self.config
    }

    pub async fn build(self) -> Result<FormSession> {
        FormSession::launch(self.build_config()).await
    }
}

impl Default for BrowserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Knobs for a single fill run.
///
/// The defaults target Google Forms markup: questions carry a
/// `role="heading"` title and sit inside a `Qr7Oae` container.
#[derive(Debug, Clone)]
pub struct FillConfig {
    /// A value is written only when confidence is strictly greater than this.
    pub threshold: f32,
    /// Selector whose presence marks the page as ready to scan.
    pub ready_selector: String,
    pub ready_timeout: Duration,
    /// Pause between scrolling a field into view and writing to it.
    pub pre_write_delay: Duration,
    pub candidate_selector: String,
    /// Class fragment identifying a question block ancestor.
    pub question_block_marker: String,
    pub unknown_label: String,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            ready_selector: "form".into(),
            ready_timeout: Duration::from_secs(15),
            pre_write_delay: Duration::from_millis(200),
            candidate_selector: r#"div[role="textbox"], input, textarea"#.into(),
            question_block_marker: "Qr7Oae".into(),
            unknown_label: UNKNOWN_LABEL.into(),
        }
    }
}

impl FillConfig {
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn ready_selector(mut self, selector: impl Into<String>) -> Self {
        self.ready_selector = selector.into();
        self
    }

    pub fn ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }

    pub fn pre_write_delay(mut self, delay: Duration) -> Self {
        self.pre_write_delay = delay;
        self
    }

    pub fn candidate_selector(mut self, selector: impl Into<String>) -> Self {
        self.candidate_selector = selector.into();
        self
    }

    pub fn question_block_marker(mut self, marker: impl Into<String>) -> Self {
        self.question_block_marker = marker.into();
        self
    }

    /// Whether a score clears the threshold.
    pub fn accepts(&self, confidence: f32) -> bool {
        confidence > self.threshold
    }
}
