use crate::catalog::LessonCatalog;
use crate::content::{normalize_track, Lesson, Profile, Step};
use crate::error::ResolveError;
use crate::registry::OverrideRegistry;
use crate::render::EffectiveStep;
use crate::resolver::{resolve, resolve_step};
use std::sync::Arc;
use tracing::debug;

/// Step at a 1-based position.
pub fn step_at(lesson: &Lesson, position: usize) -> Result<&Step, ResolveError> {
    position
        .checked_sub(1)
        .and_then(|idx| lesson.steps.get(idx))
        .ok_or(ResolveError::StepNotFound {
            position,
            total: lesson.steps.len(),
        })
}

/// Lesson-level merge, step selection and field-level resolution for an
/// already loaded base lesson.
pub fn effective_step(
    base: &Lesson,
    registry: &OverrideRegistry,
    profile: Profile,
    position: usize,
) -> Result<EffectiveStep, ResolveError> {
    let bundle = registry.select_bundle(&base.track, base.lesson_id, profile);
    let merged = resolve(base, bundle);
    let raw = step_at(&merged, position)?;
    Ok(EffectiveStep::from(resolve_step(raw, profile)))
}

/// Ties the catalog and the override registry together for lesson views.
#[derive(Clone)]
pub struct LessonPipeline {
    catalog: Arc<LessonCatalog>,
    registry: Arc<OverrideRegistry>,
}

impl LessonPipeline {
    pub fn new(catalog: Arc<LessonCatalog>, registry: Arc<OverrideRegistry>) -> Self {
        Self { catalog, registry }
    }

    pub fn catalog(&self) -> &LessonCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &OverrideRegistry {
        &self.registry
    }

    /// The whole lesson as a learner with `profile` sees it, before
    /// field-level variants are collapsed.
    pub async fn merged_lesson(
        &self,
        track: &str,
        lesson_id: u32,
        profile: Profile,
    ) -> Result<Lesson, ResolveError> {
        let track = normalize_track(track);
        let base = self.catalog.lesson(&track, lesson_id).await?;
        let bundle = self.registry.select_bundle(&track, lesson_id, profile);
        debug!(track = %track, lesson_id, %profile, overridden = bundle.is_some(), "Resolving lesson");
        Ok(resolve(&base, bundle).into_owned())
    }

    pub async fn effective_step(
        &self,
        track: &str,
        lesson_id: u32,
        profile: Profile,
        position: usize,
    ) -> Result<EffectiveStep, ResolveError> {
        let base = self.catalog.lesson(&normalize_track(track), lesson_id).await?;
        debug!(track = %base.track, lesson_id, %profile, position, "Resolving step");
        effective_step(&base, &self.registry, profile, position)
    }
}
