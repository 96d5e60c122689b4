use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A gated product capability. The set is closed: new keys must also be
/// placed in the feature matrix.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FeatureKey {
    Showcase,
    Flyers,
    HotPromos,
    Products,
    Sales,
    AiAssistant,
    Notifications,
    ProximityCustomers,
    VisualSignage,
    PrioritySupport,
    Analytics,
    Campaigns,
    CustomerCrm,
    Integrations,
}

impl FeatureKey {
    pub const ALL: [FeatureKey; 14] = [
        FeatureKey::Showcase,
        FeatureKey::Flyers,
        FeatureKey::HotPromos,
        FeatureKey::Products,
        FeatureKey::Sales,
        FeatureKey::AiAssistant,
        FeatureKey::Notifications,
        FeatureKey::ProximityCustomers,
        FeatureKey::VisualSignage,
        FeatureKey::PrioritySupport,
        FeatureKey::Analytics,
        FeatureKey::Campaigns,
        FeatureKey::CustomerCrm,
        FeatureKey::Integrations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKey::Showcase => "showcase",
            FeatureKey::Flyers => "flyers",
            FeatureKey::HotPromos => "hotPromos",
            FeatureKey::Products => "products",
            FeatureKey::Sales => "sales",
            FeatureKey::AiAssistant => "aiAssistant",
            FeatureKey::Notifications => "notifications",
            FeatureKey::ProximityCustomers => "proximityCustomers",
            FeatureKey::VisualSignage => "visualSignage",
            FeatureKey::PrioritySupport => "prioritySupport",
            FeatureKey::Analytics => "analytics",
            FeatureKey::Campaigns => "campaigns",
            FeatureKey::CustomerCrm => "customerCrm",
            FeatureKey::Integrations => "integrations",
        }
    }

    /// Parses the wire name. Unknown names yield `None` so callers fail closed.
    pub fn from_str(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(value))
    }
}

impl Display for FeatureKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
