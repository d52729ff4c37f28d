use serde::Serialize;

/// Status of a tracked task. Any status can move to any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Done,
    InProgress,
    #[default]
    Pending,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Done, Self::InProgress, Self::Pending];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::InProgress => "in-progress",
            Self::Pending => "pending",
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = crate::error::TrackerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "done" => Ok(Self::Done),
            "in-progress" => Ok(Self::InProgress),
            "pending" => Ok(Self::Pending),
            _ => Err(crate::error::TrackerError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of entry an operation referred to. Used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Product,
    Task,
    User,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Task => "task",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Digest used by the authenticator. Neither is suitable for real credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    Md5,
    Sha256,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha256 => "sha256",
        }
    }
}

impl std::str::FromStr for HashAlgorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            _ => Err(anyhow::anyhow!("unknown hash algorithm: '{s}'")),
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
