//! Layered provider resolution.

use crate::tool_registry::domain::ProviderMap;

/// Merges project, agent, and skill provider maps into one effective map.
///
/// Precedence is fixed: skill overrides agent overrides project. A
/// higher-precedence entry replaces a lower one entirely; fields are never
/// merged. Providers whose winning entry is disabled are removed. The
/// result depends only on the three inputs, never on iteration order.
#[must_use]
pub fn resolve(project: &ProviderMap, agent: &ProviderMap, skill: &ProviderMap) -> ProviderMap {
    let mut merged = project.clone();
    for layer in [agent, skill] {
        merged.extend(
            layer
                .iter()
                .map(|(name, spec)| (name.clone(), spec.clone())),
        );
    }
    merged.retain(|_, spec| !spec.is_disabled());
    merged
}
