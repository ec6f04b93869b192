use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// A short, transient message for the user. Creating one also logs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        let message = message.into();
        log::info!("{message}");
        Self {
            level: NoticeLevel::Info,
            message,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        let message = message.into();
        log::warn!("{message}");
        Self {
            level: NoticeLevel::Warning,
            message,
        }
    }

    pub fn is_warning(&self) -> bool {
        self.level == NoticeLevel::Warning
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NoticeLevel::Info => write!(formatter, "info: {}", self.message),
            NoticeLevel::Warning => write!(formatter, "warning: {}", self.message),
        }
    }
}
