use std::collections::{HashMap, HashSet, VecDeque};
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::config::StandardizingConfig;
use crate::correction::{ChangeRecord, Rule, rules};
use crate::error::{Result, TsukuroiError};
use crate::model::{
    Entity, EntityRef, EntityType, Episode, Release, Season, Shared, Subtitle, SubtitleRelease,
};

type NestedAccessor = Arc<dyn Fn(&EntityRef) -> Vec<EntityRef> + Send + Sync>;

#[derive(Clone, Default)]
struct Registry {
    rules: Vec<(&'static EntityType, Arc<dyn Rule>)>,
    nested: HashMap<&'static str, NestedAccessor>,
}

/// Applies registered rules to every entity reachable from a root.
///
/// Rules are registered per entity type and apply to that type and all its
/// subtypes. Nested accessors, registered per concrete type, tell the walker
/// which entities an entity contains. Each walk works on a snapshot of the
/// registry, so registering or unregistering during a walk does not affect it.
pub struct CorrectionService {
    registry: RwLock<Arc<Registry>>,
}

impl CorrectionService {
    /// An empty service: no rules, no nested accessors.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(Arc::new(Registry::default())),
        }
    }

    /// A service with the nested accessors of the shipped entity types and the
    /// rules described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured rule is invalid.
    pub fn standard(config: &StandardizingConfig) -> Result<Self> {
        let service = Self::new();
        service.register_standard_nested();
        rules::register_standard(&service, config)?;
        Ok(service)
    }

    /// Registers `rule` for `entity_type` and its subtypes, after every rule
    /// registered so far.
    pub fn register_rule(&self, entity_type: &'static EntityType, rule: Arc<dyn Rule>) {
        debug!(%entity_type, rule = rule.name(), "registering rule");
        let mut registry = self.registry.write();
        Arc::make_mut(&mut registry).rules.push((entity_type, rule));
    }

    /// Registers `rule` for `T` and returns the handle needed to unregister it.
    pub fn register<T: Entity>(&self, rule: impl Rule + 'static) -> Arc<dyn Rule> {
        let rule: Arc<dyn Rule> = Arc::new(rule);
        self.register_rule(T::TYPE, rule.clone());
        rule
    }

    /// Removes every registration of `rule`, compared by identity.
    /// Returns `true` if anything was removed.
    pub fn unregister_rule(&self, rule: &Arc<dyn Rule>) -> bool {
        let mut registry = self.registry.write();
        let before = registry.rules.len();
        let has_rule = registry.rules.iter().any(|(_, r)| Arc::ptr_eq(r, rule));
        if has_rule {
            Arc::make_mut(&mut registry)
                .rules
                .retain(|(_, r)| !Arc::ptr_eq(r, rule));
        }
        debug!(
            rule = rule.name(),
            removed = before - registry.rules.len(),
            "unregistered rule"
        );
        has_rule
    }

    /// Registers how to find the entities nested in a `T`, replacing any
    /// accessor registered for `T` before.
    pub fn register_nested<T, F>(&self, accessor: F)
    where
        T: Entity,
        F: Fn(&T) -> Vec<EntityRef> + Send + Sync + 'static,
    {
        let accessor: NestedAccessor = Arc::new(move |entity: &EntityRef| {
            entity
                .downcast::<T>()
                .map(|handle| accessor(&*handle.read()))
                .unwrap_or_default()
        });
        let mut registry = self.registry.write();
        Arc::make_mut(&mut registry)
            .nested
            .insert(T::TYPE.name(), accessor);
    }

    /// Rules that apply to `entity_type`, in application order.
    #[must_use]
    pub fn rules_for(&self, entity_type: &EntityType) -> Vec<Arc<dyn Rule>> {
        self.snapshot()
            .rules
            .iter()
            .filter(|(ty, _)| entity_type.is_a(ty))
            .map(|(_, rule)| rule.clone())
            .collect()
    }

    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.snapshot().rules.len()
    }

    /// Applies the rules to `root` and everything reachable from it.
    ///
    /// Entities are visited breadth-first, each at most once (by identity, so
    /// cycles terminate). For each entity, every rule registered for its type
    /// or a supertype runs in registration order. Returns the changes in the
    /// order they were made.
    ///
    /// # Errors
    ///
    /// Returns `TsukuroiError::RuleFailed` for the first failing rule. The
    /// walk stops there; changes already made are kept and carried by the
    /// error.
    pub fn process(&self, root: &EntityRef) -> Result<Vec<ChangeRecord>> {
        let registry = self.snapshot();
        let mut changes = Vec::new();

        walk(&registry, root, |entity| {
            let entity_type = entity.entity_type();
            for (_, rule) in registry.rules.iter().filter(|(ty, _)| entity_type.is_a(ty)) {
                let before = changes.len();
                if let Err(source) = rule.apply(entity, &mut changes) {
                    return Err(TsukuroiError::RuleFailed {
                        rule: rule.name().to_string(),
                        entity_type: entity_type.name(),
                        source: Box::new(source),
                        changes: std::mem::take(&mut changes),
                    });
                }
                for change in &changes[before..] {
                    trace!(%change, "recorded change");
                }
            }
            Ok(())
        })?;

        debug!(root = %root.id(), changes = changes.len(), "processed entity graph");
        Ok(changes)
    }

    /// [`CorrectionService::process`] for a typed handle.
    ///
    /// # Errors
    ///
    /// See [`CorrectionService::process`].
    pub fn process_shared<T: Entity>(&self, root: &Shared<T>) -> Result<Vec<ChangeRecord>> {
        self.process(&EntityRef::new(root))
    }

    /// Every entity a walk from `root` visits, in visiting order.
    #[must_use]
    pub fn reachable(&self, root: &EntityRef) -> Vec<EntityRef> {
        let registry = self.snapshot();
        let mut visited = Vec::new();
        let Ok(()) = walk::<Infallible, _>(&registry, root, |entity| {
            visited.push(entity.clone());
            Ok(())
        });
        visited
    }

    fn snapshot(&self) -> Arc<Registry> {
        self.registry.read().clone()
    }

    fn register_standard_nested(&self) {
        self.register_nested::<Season, _>(|season| {
            season.series.iter().map(EntityRef::new).collect()
        });
        self.register_nested::<Episode, _>(|episode| {
            let series = episode.series.iter().map(EntityRef::new);
            let season = episode.season.iter().map(EntityRef::new);
            series.chain(season).collect()
        });
        self.register_nested::<Release, _>(|release| {
            release.media.iter().map(|m| m.entity()).collect()
        });
        self.register_nested::<Subtitle, _>(|subtitle| {
            subtitle.media.iter().map(|m| m.entity()).collect()
        });
        self.register_nested::<SubtitleRelease, _>(|file| {
            let subtitles = file.subtitles.iter().map(EntityRef::new);
            let releases = file.matching_releases.iter().map(EntityRef::new);
            subtitles.chain(releases).collect()
        });
    }
}

/// Breadth-first walk visiting every reachable entity once, by identity.
fn walk<E, F>(registry: &Registry, root: &EntityRef, mut visit: F) -> std::result::Result<(), E>
where
    F: FnMut(&EntityRef) -> std::result::Result<(), E>,
{
    let mut visited = HashSet::new();
    let mut queue = VecDeque::from([root.clone()]);

    while let Some(entity) = queue.pop_front() {
        if !visited.insert(entity.id()) {
            continue;
        }
        debug!(entity_type = %entity.entity_type(), id = %entity.id(), "visiting entity");
        visit(&entity)?;

        if let Some(nested) = registry.nested.get(entity.entity_type().name()) {
            queue.extend(
                nested(&entity)
                    .into_iter()
                    .filter(|child| !visited.contains(&child.id())),
            );
        }
    }
    Ok(())
}

impl Default for CorrectionService {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CorrectionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.snapshot();
        f.debug_struct("CorrectionService")
            .field(
                "rules",
                &registry
                    .rules
                    .iter()
                    .map(|(ty, rule)| format!("{ty}: {}", rule.name()))
                    .collect::<Vec<_>>(),
            )
            .field("nested", &registry.nested.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::correction::{FnRule, PropertyRule, TagSequenceReplacer};
    use crate::model::{
        EPISODE, MEDIA, Media, RELEASE, SERIES, Series, Tag, Value, shared,
    };

    /// Counts how often it is applied, optionally failing.
    struct Counting {
        name: String,
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl Counting {
        fn new(name: &str) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let rule = Self {
                name: name.to_string(),
                calls: calls.clone(),
                fail: false,
            };
            (rule, calls)
        }
    }

    impl Rule for Counting {
        fn name(&self) -> &str {
            &self.name
        }

        fn apply(&self, _: &EntityRef, _: &mut Vec<ChangeRecord>) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(TsukuroiError::EmptyTagQuery);
            }
            Ok(())
        }
    }

    /// Two entity kinds that contain each other.
    #[derive(Debug, Default)]
    struct Node {
        label: String,
        next: Option<Shared<Node>>,
    }

    const NODE: EntityType = EntityType::root("Node");

    static NODE_PROPERTIES: &[crate::model::Property<Node>] = &[crate::model::Property::new(
        "label",
        |n| Value::from(n.label.clone()),
        |n, v| {
            n.label = crate::model::FromValue::from_value(v)?;
            Ok(())
        },
    )];

    impl Entity for Node {
        const TYPE: &'static EntityType = &NODE;

        fn properties() -> &'static [crate::model::Property<Self>] {
            NODE_PROPERTIES
        }
    }

    fn h264_rule() -> PropertyRule<Vec<Tag>> {
        PropertyRule::new(
            "H.264",
            "tags",
            TagSequenceReplacer::from_names(&["H", "264"], &["H.264"]).unwrap(),
        )
    }

    #[test]
    fn h264_scenario_records_one_change() {
        let service = CorrectionService::new();
        service.register::<Release>(h264_rule());

        let release = shared(Release {
            tags: Tag::list(["WEB", "H", "264", "x265"]),
            ..Release::default()
        });
        let changes = service.process_shared(&release).unwrap();

        assert_eq!(release.read().tags, Tag::list(["WEB", "H.264", "x265"]));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].property, "tags");
        assert_eq!(
            changes[0].old_value,
            Value::from(Tag::list(["WEB", "H", "264", "x265"]))
        );
        assert_eq!(
            changes[0].new_value,
            Value::from(Tag::list(["WEB", "H.264", "x265"]))
        );
    }

    #[test]
    fn cycles_visit_each_entity_once() {
        let service = CorrectionService::new();
        service.register_nested::<Node, _>(|node| node.next.iter().map(EntityRef::new).collect());
        let (rule, calls) = Counting::new("count");
        service.register::<Node>(rule);

        let a = shared(Node {
            label: "a".into(),
            next: None,
        });
        let b = shared(Node {
            label: "b".into(),
            next: Some(a.clone()),
        });
        a.write().next = Some(b.clone());

        service.process_shared(&a).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(service.reachable(&EntityRef::new(&a)).len(), 2);

        // Break the cycle so the test does not leak.
        a.write().next = None;
    }

    #[test]
    fn supertype_rules_apply_in_registration_order() {
        let service = CorrectionService::new();
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let log = order.clone();
        service.register_rule(
            &MEDIA,
            Arc::new(FnRule::<Series>::new("media", move |_, _| {
                log.lock().push("media");
                Ok(())
            })),
        );
        let log = order.clone();
        service.register::<Series>(FnRule::<Series>::new("series", move |_, _| {
            log.lock().push("series");
            Ok(())
        }));

        service.process_shared(&shared(Series::named("Psych"))).unwrap();
        assert_eq!(*order.lock(), vec!["media", "series"]);
        assert_eq!(service.rules_for(&SERIES).len(), 2);
        assert_eq!(service.rules_for(&RELEASE).len(), 0);
    }

    #[test]
    fn walks_into_nested_media() {
        let service = CorrectionService::standard(&StandardizingConfig::empty()).unwrap();
        let series = shared(Series::named("Psych"));
        let season = shared(Season {
            series: Some(series.clone()),
            number: Some(1),
            title: None,
        });
        let episode = shared(Episode {
            series: Some(series.clone()),
            season: Some(season.clone()),
            ..Episode::default()
        });
        let release = shared(Release {
            media: vec![Media::Episode(episode)],
            ..Release::default()
        });

        let visited = service.reachable(&EntityRef::new(&release));
        let types: Vec<_> = visited.iter().map(|e| e.entity_type().name()).collect();
        assert_eq!(types, vec!["Release", "Episode", "Series", "Season"]);
        assert!(visited[1].is_a(&EPISODE));
    }

    #[test]
    fn unregister_by_identity() {
        let service = CorrectionService::new();
        let (rule, calls) = Counting::new("count");
        let handle = service.register::<Release>(rule);
        let (other, _) = Counting::new("count");
        let other: Arc<dyn Rule> = Arc::new(other);

        assert!(!service.unregister_rule(&other));
        assert!(service.unregister_rule(&handle));
        assert!(!service.unregister_rule(&handle));

        service.process_shared(&shared(Release::default())).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failing_rule_carries_recorded_changes() {
        let service = CorrectionService::new();
        service.register::<Release>(h264_rule());
        let (mut failing, _) = Counting::new("broken");
        failing.fail = true;
        service.register::<Release>(failing);

        let release = shared(Release {
            tags: Tag::list(["H", "264"]),
            ..Release::default()
        });
        let err = service.process_shared(&release).unwrap_err();

        match err {
            TsukuroiError::RuleFailed {
                rule,
                entity_type,
                changes,
                ..
            } => {
                assert_eq!(rule, "broken");
                assert_eq!(entity_type, "Release");
                assert_eq!(changes.len(), 1);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(release.read().tags, Tag::list(["H.264"]));
    }

    #[test]
    fn snapshot_isolates_in_flight_walks() {
        let service = Arc::new(CorrectionService::new());
        let (late, late_calls) = Counting::new("late");
        let late: Arc<dyn Rule> = Arc::new(late);

        let registrar = service.clone();
        let late_handle = late.clone();
        service.register::<Release>(FnRule::<Release>::new("registers", move |_, _| {
            registrar.register_rule(&RELEASE, late_handle.clone());
            Ok(())
        }));

        service.process_shared(&shared(Release::default())).unwrap();
        assert_eq!(late_calls.load(Ordering::SeqCst), 0);
        assert_eq!(service.rule_count(), 2);
    }
}
