//! Recorded media artifact value object

use std::fmt;

/// Container formats a capture sink can be tagged with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VideoContainer {
    #[default]
    Mp4,
    Webm,
}

impl VideoContainer {
    /// Get the MIME type string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mp4 => "video/mp4",
            Self::Webm => "video/webm",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Webm => "webm",
        }
    }

    /// FFmpeg muxer name for this container
    pub const fn muxer(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Webm => "webm",
        }
    }
}

impl fmt::Display for VideoContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A finalized recording: the chunks of one sink run joined in arrival order.
///
/// Never empty; the capture manager refuses to build one from zero bytes.
#[derive(Debug, Clone)]
pub struct MediaArtifact {
    data: Vec<u8>,
    container: VideoContainer,
}

impl MediaArtifact {
    /// Join chunks in order into a single artifact.
    /// Returns `None` when the chunks hold no bytes at all.
    pub fn from_chunks<I>(chunks: I, container: VideoContainer) -> Option<Self>
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        let mut data = Vec::new();
        for chunk in chunks {
            data.extend_from_slice(&chunk);
        }
        if data.is_empty() {
            None
        } else {
            Some(Self { data, container })
        }
    }

    /// Get the raw bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the raw bytes
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Get the container tag
    pub fn container(&self) -> VideoContainer {
        self.container
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}
