//! Loads configuration sources and resolves the effective provider map.

use super::resolve;
use crate::tool_registry::{
    domain::{AgentId, ProviderMap, ProviderScope, SkillId},
    ports::{ProjectProviderSource, ProviderRecordRepository},
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Identifies which agent and skill layers apply to a resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Agent whose provider records apply, if any.
    pub agent: Option<AgentId>,
    /// Skill whose provider records apply, if any.
    pub skill: Option<SkillId>,
}

impl ExecutionContext {
    /// Context with only the project layer.
    #[must_use]
    pub const fn project() -> Self {
        Self {
            agent: None,
            skill: None,
        }
    }

    /// Context for an agent, without a skill.
    #[must_use]
    pub const fn for_agent(agent: AgentId) -> Self {
        Self {
            agent: Some(agent),
            skill: None,
        }
    }

    /// Adds a skill layer.
    #[must_use]
    pub const fn with_skill(mut self, skill: SkillId) -> Self {
        self.skill = Some(skill);
        self
    }
}

/// Resolves providers for an execution context.
///
/// A source that fails to load is logged and treated as empty, so one broken
/// layer never hides the others.
pub struct ProviderResolutionService<P, R>
where
    P: ProjectProviderSource,
    R: ProviderRecordRepository,
{
    project: Arc<P>,
    records: Arc<R>,
}

impl<P, R> ProviderResolutionService<P, R>
where
    P: ProjectProviderSource,
    R: ProviderRecordRepository,
{
    /// Creates a resolution service.
    #[must_use]
    pub const fn new(project: Arc<P>, records: Arc<R>) -> Self {
        Self { project, records }
    }

    /// Returns the effective, enabled providers for `context`.
    pub async fn resolve_for(&self, context: ExecutionContext) -> ProviderMap {
        let project = self.project.load_providers().await.unwrap_or_else(|err| {
            warn!(error = %err, "project provider source unavailable; treating as empty");
            ProviderMap::new()
        });
        let agent = match context.agent {
            Some(agent) => self.load_scope(ProviderScope::Agent(agent)).await,
            None => ProviderMap::new(),
        };
        let skill = match context.skill {
            Some(skill) => self.load_scope(ProviderScope::Skill(skill)).await,
            None => ProviderMap::new(),
        };

        let resolved = resolve(&project, &agent, &skill);
        debug!(
            project = project.len(),
            agent = agent.len(),
            skill = skill.len(),
            resolved = resolved.len(),
            "resolved providers"
        );
        resolved
    }

    async fn load_scope(&self, scope: ProviderScope) -> ProviderMap {
        self.records
            .list_providers(scope)
            .await
            .unwrap_or_else(|err| {
                warn!(scope = %scope, error = %err, "provider records unavailable; treating as empty");
                ProviderMap::new()
            })
    }
}
