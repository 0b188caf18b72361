//! Export kind → route, upstream endpoint and response decoding.

use std::fmt;
use std::str::FromStr;

/// How the upstream response body is handed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Body passed through verbatim, whatever its shape.
    Structured,
    /// Body returned as `image/png` bytes.
    Binary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKind {
    PlainText,
    Html,
    Pdf,
    Image,
}

impl ExportKind {
    pub const ALL: [ExportKind; 4] = [
        ExportKind::PlainText,
        ExportKind::Html,
        ExportKind::Pdf,
        ExportKind::Image,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlainText => "plain-text",
            Self::Html => "html",
            Self::Pdf => "pdf",
            Self::Image => "image",
        }
    }

    /// Path this kind is served on by the relay.
    pub fn route(self) -> &'static str {
        match self {
            Self::PlainText => "/v1/message/plain-text",
            Self::Html => "/v1/message/html",
            Self::Pdf => "/v1/message/pdf",
            Self::Image => "/v1/message/image",
        }
    }

    /// Upstream endpoint for this kind under `base_url`.
    pub fn endpoint(self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.route())
    }

    pub fn response_mode(self) -> ResponseMode {
        match self {
            Self::Image => ResponseMode::Binary,
            Self::PlainText | Self::Html | Self::Pdf => ResponseMode::Structured,
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown export kind: {0}")]
pub struct UnknownExportKind(String);

impl FromStr for ExportKind {
    type Err = UnknownExportKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownExportKind(s.to_string()))
    }
}
