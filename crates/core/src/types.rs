use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OsStatus {
    Active,
    Extended,
    #[serde(rename = "EOL")]
    Eol,
    /// The OS string matched nothing in the lifecycle table.
    Unknown,
}

impl OsStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OsStatus::Active => "Active",
            OsStatus::Extended => "Extended",
            OsStatus::Eol => "EOL",
            OsStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for OsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Migration strategy assigned by the classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strategy {
    Rehost,
    Replatform,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Rehost => "Rehost",
            Strategy::Replatform => "Replatform",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering is significant: `Critical` sorts before `High`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Critical,
    High,
}

impl Priority {
    pub fn for_status(status: OsStatus) -> Option<Self> {
        match status {
            OsStatus::Eol => Some(Priority::Critical),
            OsStatus::Extended => Some(Priority::High),
            OsStatus::Active | OsStatus::Unknown => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Critical => f.write_str("Critical"),
            Priority::High => f.write_str("High"),
        }
    }
}

pub const DEFAULT_CPU: u32 = 2;
pub const DEFAULT_MEMORY_GIB: u32 = 4;
pub const DEFAULT_STORAGE_GIB: u32 = 100;

/// One inventory row after column aliases and numeric fallbacks are resolved.
///
/// `environment` and `database` keep track of whether the source row actually
/// carried a value: classification only looks at what was provided, while
/// reports show `Production` / `None` for absent cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub name: String,
    pub os: String,
    pub cpu: u32,
    pub memory: u32,
    pub storage: u32,
    pub datacenter: String,
    #[serde(serialize_with = "environment_or_default")]
    pub environment: Option<String>,
    #[serde(serialize_with = "database_or_default")]
    pub database: Option<String>,
}

impl InventoryRecord {
    pub fn is_production(&self) -> bool {
        self.environment
            .as_deref()
            .is_some_and(|env| env.to_lowercase().contains("prod"))
    }

    pub fn has_database(&self) -> bool {
        self.database
            .as_deref()
            .is_some_and(|db| db.to_lowercase() != "none")
    }

    pub fn environment_label(&self) -> &str {
        self.environment.as_deref().unwrap_or("Production")
    }

    pub fn database_label(&self) -> &str {
        self.database.as_deref().unwrap_or("None")
    }
}

fn environment_or_default<S: Serializer>(v: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(v.as_deref().unwrap_or("Production"))
}

fn database_or_default<S: Serializer>(v: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(v.as_deref().unwrap_or("None"))
}

/// An [`InventoryRecord`] with its lifecycle data and strategy captured at
/// classification time. Later lifecycle table edits do not touch it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedVm {
    #[serde(flatten)]
    pub record: InventoryRecord,
    #[serde(rename = "normalizedOS")]
    pub normalized_os: String,
    #[serde(rename = "osStatus")]
    pub os_status: OsStatus,
    pub eol: String,
    #[serde(rename = "upgradePath")]
    pub upgrade_path: String,
    pub color: String,
    pub strategy: Strategy,
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalServer {
    #[serde(flatten)]
    pub vm: ClassifiedVm,
    pub priority: Priority,
}
