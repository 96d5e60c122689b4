use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A quota-bounded resource an account owns. Storage is counted in MiB.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Flyers,
    Products,
    Customers,
    Integrations,
    Campaigns,
    Storage,
}

impl ResourceType {
    pub const ALL: [ResourceType; 6] = [
        ResourceType::Flyers,
        ResourceType::Products,
        ResourceType::Customers,
        ResourceType::Integrations,
        ResourceType::Campaigns,
        ResourceType::Storage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Flyers => "flyers",
            ResourceType::Products => "products",
            ResourceType::Customers => "customers",
            ResourceType::Integrations => "integrations",
            ResourceType::Campaigns => "campaigns",
            ResourceType::Storage => "storage",
        }
    }

    /// Accepts the canonical key and the legacy Portuguese keys still found in
    /// older limit tables.
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "flyers" | "encartes" => Some(ResourceType::Flyers),
            "products" | "produtos" => Some(ResourceType::Products),
            "customers" | "clientes" => Some(ResourceType::Customers),
            "integrations" | "integracoes" | "integrações" => Some(ResourceType::Integrations),
            "campaigns" | "campanhas" => Some(ResourceType::Campaigns),
            "storage" | "armazenamento" => Some(ResourceType::Storage),
            _ => None,
        }
    }
}

impl Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
