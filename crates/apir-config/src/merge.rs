//! # Configuration API Merge
//!
//! Folds one contributor's [`ConfigurationApi`] into the aggregate being
//! assembled. The merge is all-or-nothing: any duplicate description or
//! broken addition aborts it and the caller keeps no partial aggregate.
//!
//! ## Region and mode reconciliation
//!
//! | Merge kind | differing regions                       | mode          |
//! |------------|-----------------------------------------|---------------|
//! | Initial    | adopt source region                     | adopt source  |
//! | Prototype  | adopt source region if it is set        | lower level   |
//! | Ordinary   | GLOBAL                                  | lower level   |
//!
//! Every merge except a prototype merge records the source contributor's
//! region in the region cache and absorbs the source's own cache.

use tracing::{debug, warn};

use apir_core::{ArtifactId, Mode, Region};

use crate::api::ConfigurationApi;
use crate::error::{ConfigApiError, ConfigApiResult, DescriptionKind};

/// How the source relates to the aggregate it is merged into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeKind {
    /// The first merge into a freshly created aggregate.
    Initial,
    /// The source is a template the aggregate derives from.
    Prototype,
    /// The source is an independent sibling contributor.
    Ordinary,
}

/// Merge `source`, contributed by `source_id`, into `target`.
///
/// An absent target means `source` is the first contributor: it becomes the
/// aggregate as is, with its own region recorded in the cache.
pub fn merge(
    target: Option<ConfigurationApi>,
    source: ConfigurationApi,
    source_id: &ArtifactId,
    kind: MergeKind,
) -> ConfigApiResult<ConfigurationApi> {
    let Some(mut target) = target else {
        let mut api = source;
        let region = api.detect_region();
        debug!(source = %source_id, %region, "first contributor becomes the aggregate");
        api.region_cache.insert(source_id.clone(), region);
        return Ok(api);
    };

    reconcile_region_and_mode(&mut target, &source, kind);

    for (pid, description) in &source.configurations {
        if target.configurations.contains_key(pid) {
            return Err(duplicate(DescriptionKind::Configuration, pid));
        }
        target.configurations.insert(pid.clone(), description.clone());
    }
    for (pid, description) in &source.factories {
        if target.factories.contains_key(pid) {
            return Err(duplicate(DescriptionKind::FactoryConfiguration, pid));
        }
        target.factories.insert(pid.clone(), description.clone());
    }
    for (name, description) in &source.framework_properties {
        if target.framework_properties.contains_key(name) {
            return Err(duplicate(DescriptionKind::FrameworkProperty, name));
        }
        target.framework_properties.insert(name.clone(), description.clone());
    }

    union_into(&mut target.internal_configurations, &source.internal_configurations);
    union_into(&mut target.internal_factories, &source.internal_factories);
    union_into(
        &mut target.internal_framework_properties,
        &source.internal_framework_properties,
    );

    if kind != MergeKind::Prototype {
        target
            .region_cache
            .insert(source_id.clone(), source.detect_region());
        for (id, region) in &source.region_cache {
            target.region_cache.insert(id.clone(), *region);
        }
        debug!(
            source = %source_id,
            entries = target.region_cache.len(),
            "region cache updated"
        );
    }

    apply_own_additions(&mut target)?;
    apply_source_additions(&mut target, &source)?;

    Ok(target)
}

fn reconcile_region_and_mode(target: &mut ConfigurationApi, source: &ConfigurationApi, kind: MergeKind) {
    match kind {
        MergeKind::Initial => {
            target.region = source.region;
            target.mode = source.mode;
        }
        MergeKind::Prototype | MergeKind::Ordinary => {
            if source.region != target.region {
                let region = match kind {
                    MergeKind::Prototype => source.region.or(target.region),
                    _ => Some(Region::Global),
                };
                debug!(
                    from = ?target.region,
                    to = ?region,
                    ?kind,
                    "reconciling aggregate region"
                );
                target.region = region;
            }
            target.mode = Mode::merge(target.mode, source.mode);
        }
    }
}

fn duplicate(kind: DescriptionKind, key: &str) -> ConfigApiError {
    ConfigApiError::DuplicateDescription {
        kind,
        key: key.to_string(),
    }
}

fn union_into(target: &mut Vec<String>, source: &[String]) {
    for name in source {
        if !target.contains(name) {
            target.push(name.clone());
        }
    }
}

/// Apply the aggregate's pending additions whose base has now arrived.
/// Applied additions are consumed; the rest stay pending.
fn apply_own_additions(target: &mut ConfigurationApi) -> ConfigApiResult<()> {
    let pending = std::mem::take(&mut target.configuration_additions);
    for (pid, addition) in pending {
        match target.configurations.get_mut(&pid) {
            Some(description) => {
                addition.apply_to(&mut description.0, DescriptionKind::Configuration, &pid)?;
                debug!(%pid, "applied pending configuration addition");
            }
            None => {
                target.configuration_additions.insert(pid, addition);
            }
        }
    }

    let pending = std::mem::take(&mut target.factory_configuration_additions);
    for (pid, addition) in pending {
        match target.factories.get_mut(&pid) {
            Some(description) => {
                addition.apply_to(description, &pid)?;
                debug!(%pid, "applied pending factory configuration addition");
            }
            None => {
                target.factory_configuration_additions.insert(pid, addition);
            }
        }
    }
    Ok(())
}

/// Apply the source's additions, deferring those whose base is missing.
fn apply_source_additions(target: &mut ConfigurationApi, source: &ConfigurationApi) -> ConfigApiResult<()> {
    for (pid, addition) in &source.configuration_additions {
        match target.configurations.get_mut(pid) {
            Some(description) => {
                addition.apply_to(&mut description.0, DescriptionKind::Configuration, pid)?;
            }
            None if target.configuration_additions.contains_key(pid) => {
                return Err(ConfigApiError::DuplicateAddition {
                    kind: DescriptionKind::Configuration,
                    key: pid.clone(),
                });
            }
            None => {
                warn!(%pid, "configuration addition has no base description yet; deferring");
                target
                    .configuration_additions
                    .insert(pid.clone(), addition.clone());
            }
        }
    }

    for (pid, addition) in &source.factory_configuration_additions {
        match target.factories.get_mut(pid) {
            Some(description) => addition.apply_to(description, pid)?,
            None if target.factory_configuration_additions.contains_key(pid) => {
                return Err(ConfigApiError::DuplicateAddition {
                    kind: DescriptionKind::FactoryConfiguration,
                    key: pid.clone(),
                });
            }
            None => {
                warn!(%pid, "factory configuration addition has no base description yet; deferring");
                target
                    .factory_configuration_additions
                    .insert(pid.clone(), addition.clone());
            }
        }
    }
    Ok(())
}

/// Merge a whole chain of contributors in order.
///
/// The first contributor becomes the aggregate and every later one is
/// merged as [`MergeKind::Ordinary`]. Additions still pending at the end
/// are fatal.
pub fn merge_all<I>(contributors: I) -> ConfigApiResult<Option<ConfigurationApi>>
where
    I: IntoIterator<Item = (ArtifactId, ConfigurationApi)>,
{
    let mut aggregate: Option<ConfigurationApi> = None;
    for (id, api) in contributors {
        aggregate = Some(merge(aggregate, api, &id, MergeKind::Ordinary)?);
    }
    if let Some(api) = &aggregate {
        api.ensure_no_pending_additions()?;
    }
    Ok(aggregate)
}
