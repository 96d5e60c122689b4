pub mod entitlements;
pub mod plan_catalog;
