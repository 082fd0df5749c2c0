use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque token correlating a "started" notification with its terminal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationToken(pub Uuid);

impl NotificationToken {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NotificationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User-facing progress events emitted by mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    Started {
        token: NotificationToken,
        description: String,
    },
    Succeeded {
        token: NotificationToken,
        message: String,
    },
    Failed {
        token: NotificationToken,
        message: String,
    },
}

impl Notification {
    pub const fn token(&self) -> NotificationToken {
        match self {
            Self::Started { token, .. } | Self::Succeeded { token, .. } | Self::Failed { token, .. } => {
                *token
            }
        }
    }

    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Started { .. })
    }
}
