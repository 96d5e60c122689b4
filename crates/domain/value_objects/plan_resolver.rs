use tracing::debug;

use crate::domain::{entities::plans::PlanEntity, value_objects::enums::plan_levels::PlanLevel};

/// Canonical slugs plus the legacy and localized names still stored on older
/// accounts. Keys are lowercase.
const PLAN_ALIASES: &[(&str, PlanLevel)] = &[
    ("free", PlanLevel::Free),
    ("gratis", PlanLevel::Free),
    ("grátis", PlanLevel::Free),
    ("gratuito", PlanLevel::Free),
    ("gratuita", PlanLevel::Free),
    ("start", PlanLevel::Start),
    ("starter", PlanLevel::Start),
    ("basico", PlanLevel::Start),
    ("básico", PlanLevel::Start),
    ("inicial", PlanLevel::Start),
    ("pro", PlanLevel::Pro),
    ("profissional", PlanLevel::Pro),
    ("professional", PlanLevel::Pro),
    ("business", PlanLevel::Business),
    ("negocios", PlanLevel::Business),
    ("negócios", PlanLevel::Business),
    ("enterprise", PlanLevel::Enterprise),
    ("empresarial", PlanLevel::Enterprise),
    ("premium", PlanLevel::Premium),
];

fn lookup_alias(raw: &str) -> Option<PlanLevel> {
    let key = raw.trim().to_lowercase();
    if key.is_empty() {
        return None;
    }
    PLAN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, level)| *level)
}

/// Normalizes any plan identifier to a level. Absent, blank or unknown
/// identifiers resolve to the lowest level.
pub fn resolve_level(raw: Option<&str>) -> PlanLevel {
    match raw.and_then(lookup_alias) {
        Some(level) => level,
        None => {
            debug!(raw_plan = ?raw, "plan_resolver: unresolvable identifier, using free");
            PlanLevel::Free
        }
    }
}

/// Level implied by a catalog entry: its slug, then its name, then its rank.
pub fn level_for_plan(plan: &PlanEntity) -> PlanLevel {
    plan.slug
        .as_deref()
        .and_then(lookup_alias)
        .or_else(|| lookup_alias(&plan.name))
        .unwrap_or_else(|| PlanLevel::from_rank(plan.rank))
}

/// Like [`resolve_level`], but identifiers missing from the alias table may
/// still be resolved through the catalog entry they were looked up by.
pub fn resolve_level_with_plan(raw: Option<&str>, plan: Option<&PlanEntity>) -> PlanLevel {
    if let Some(level) = raw.and_then(lookup_alias) {
        return level;
    }
    match plan {
        Some(plan) => {
            let level = level_for_plan(plan);
            debug!(plan_id = %plan.id, %level, "plan_resolver: resolved through catalog entry");
            level
        }
        None => resolve_level(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::plans::ResourceLimits;
    use chrono::Utc;
    use uuid::Uuid;

    fn catalog_plan(name: &str, slug: Option<&str>, rank: i32) -> PlanEntity {
        PlanEntity {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.map(str::to_string),
            price_minor: 0,
            rank,
            is_active: true,
            limits: ResourceLimits::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn blank_absent_and_free_spellings_resolve_identically() {
        let inputs = [None, Some(""), Some("   "), Some("free"), Some("Free"), Some("FREE")];
        for input in inputs {
            assert_eq!(resolve_level(input), PlanLevel::Free, "input {input:?}");
        }
    }

    #[test]
    fn unknown_identifiers_never_grant_more_than_free() {
        for input in ["platinum", "pro-plus", "enterprise!", "0", "admin"] {
            assert_eq!(resolve_level(Some(input)), PlanLevel::Free, "input {input}");
        }
    }

    #[test]
    fn legacy_aliases_resolve_to_canonical_levels() {
        assert_eq!(resolve_level(Some("basico")), PlanLevel::Start);
        assert_eq!(resolve_level(Some("  Profissional ")), PlanLevel::Pro);
        assert_eq!(resolve_level(Some("EMPRESARIAL")), PlanLevel::Enterprise);
        assert_eq!(resolve_level(Some("Básico")), PlanLevel::Start);
    }

    #[test]
    fn every_canonical_slug_round_trips() {
        for level in PlanLevel::ALL {
            assert_eq!(resolve_level(Some(level.as_str())), level);
        }
    }

    #[test]
    fn catalog_entry_resolves_unaliased_names() {
        let gold = catalog_plan("Gold", None, 3);
        assert_eq!(resolve_level_with_plan(Some("Gold"), Some(&gold)), PlanLevel::Business);

        let by_slug = catalog_plan("Plano Loja", Some("pro"), 0);
        assert_eq!(resolve_level_with_plan(Some("Plano Loja"), Some(&by_slug)), PlanLevel::Pro);
    }

    #[test]
    fn alias_wins_over_catalog_rank() {
        let odd = catalog_plan("pro", None, 5);
        assert_eq!(resolve_level_with_plan(Some("pro"), Some(&odd)), PlanLevel::Pro);
    }

    #[test]
    fn no_catalog_entry_falls_back_to_alias_table() {
        assert_eq!(resolve_level_with_plan(Some("mystery"), None), PlanLevel::Free);
    }
}
