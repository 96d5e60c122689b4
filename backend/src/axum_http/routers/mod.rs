pub mod admin_plans;
pub mod entitlements;
pub mod plans;
