pub mod feature_keys;
pub mod plan_levels;
pub mod resource_types;
