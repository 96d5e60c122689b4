pub mod entitlements;
pub mod enums;
pub mod feature_matrix;
pub mod plan_resolver;
pub mod plans;
pub mod usage;
