use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Platform id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformId(pub Uuid);

impl PlatformId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
    pub fn value(&self) -> Uuid {
        self.0
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(PlatformId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

impl std::fmt::Display for PlatformId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Marketplace where models are sold (Cults3D, Pixup, CGTrader, ...).
///
/// Reference data: loaded once per session from the `platforms` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: PlatformId,
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Platform {
    /// Two-letter badge shown in the platform list ("Cults3D" -> "CU")
    pub fn initials(&self) -> String {
        self.name.chars().take(2).collect::<String>().to_uppercase()
    }

    /// Accent colour used by the analytics charts
    pub fn color(name: &str) -> &'static str {
        match name {
            "Cults3D" => "#6366f1",
            "Pixup" => "#10b981",
            "CGTrader" => "#f59e0b",
            "3DExport" => "#ec4899",
            _ => "#6366f1",
        }
    }
}

/// Embedded `platforms(name)` relation returned together with a sale row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformRef {
    pub name: String,
}
