//! End-to-end transition scenarios against a small article workflow.

use statefield::builder::HookResolverBuilder;
use statefield::core::{Entity, PersistenceError, Transitionable, TransitionRegistry};
use statefield::engine::{DenialReason, TransitionEngine, TransitionError};
use statefield::events::{self, RecordingNotifier, STATE_TRANSITIONED};
use statefield::hooks::{FnHook, HookCatalog, HookError, HookStage, TransitionHook};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct Article {
    status: String,
    premium: bool,
    saves: Vec<String>,
    log: Arc<Mutex<Vec<String>>>,
}

impl Article {
    fn draft() -> Self {
        Self::at("draft")
    }

    fn at(status: &str) -> Self {
        Self {
            status: status.to_string(),
            premium: false,
            saves: Vec::new(),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl Entity for Article {
    type State = String;

    fn entity_type(&self) -> &str {
        "Article"
    }

    fn get_attribute(&self, field: &str) -> Option<String> {
        match field {
            "status" => Some(self.status.clone()),
            _ => None,
        }
    }

    fn set_attribute(&mut self, _field: &str, value: String) {
        self.status = value;
    }

    fn persist(&mut self) -> Result<(), PersistenceError> {
        self.log.lock().unwrap().push("persist".to_string());
        self.saves.push(self.status.clone());
        Ok(())
    }
}

impl Transitionable for Article {
    fn register_transitions(&self, registry: &mut TransitionRegistry<Self>) {
        registry
            .register("status", s("draft"), s("published"))
            .register_when("status", s("published"), s("archived"), |_| true)
            .register_when("status", s("archived"), s("draft"), |_| false);
        if self.premium {
            registry.register("status", s("draft"), s("featured"));
        }
    }
}

fn s(value: &str) -> String {
    value.to_string()
}

/// Hook that appends `{label}.before` / `{label}.after` to the article log.
struct Tracer(&'static str);

impl TransitionHook<Article> for Tracer {
    fn before(&self, article: &mut Article, _from: &String, _to: &String) -> Result<(), HookError> {
        article.log.lock().unwrap().push(format!("{}.before", self.0));
        Ok(())
    }

    fn after(&self, article: &mut Article, _from: &String, _to: &String) -> Result<(), HookError> {
        article.log.lock().unwrap().push(format!("{}.after", self.0));
        Ok(())
    }
}

#[test]
fn publishing_a_draft_notifies_once() {
    let notifier = Arc::new(RecordingNotifier::<String>::new());
    let mut article = Article::draft();

    TransitionEngine::new(&mut article)
        .with_shared_notifier(notifier.clone())
        .transition_to("status", s("published"))
        .unwrap();

    assert_eq!(article.status, "published");
    assert_eq!(article.saves, vec!["published"]);

    let records = notifier.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].from, "draft");
    assert_eq!(records[0].to, "published");
    assert_eq!(notifier.topics(), vec![STATE_TRANSITIONED]);
}

#[test]
fn passing_guard_allows_archiving() {
    let mut article = Article::at("published");

    TransitionEngine::new(&mut article)
        .transition("archived".to_string())
        .unwrap();

    assert_eq!(article.status, "archived");
}

#[test]
fn failing_guard_denies_and_leaves_field_alone() {
    let mut article = Article::at("archived");

    let err = TransitionEngine::new(&mut article)
        .transition_to("status", s("draft"))
        .unwrap_err();

    match err {
        TransitionError::TransitionDenied {
            field,
            from,
            to,
            reason,
            ..
        } => {
            assert_eq!(field, "status");
            assert_eq!(from, "archived");
            assert_eq!(to, "draft");
            assert_eq!(reason, DenialReason::GuardRejected);
        }
        other => panic!("expected denial, got {other:?}"),
    }
    assert_eq!(article.status, "archived");
    assert!(article.saves.is_empty());
}

#[test]
fn can_transition_only_follows_direct_edges() {
    let mut article = Article::draft();
    let mut engine = TransitionEngine::new(&mut article);

    assert!(engine.can_transition("status", &s("published")));
    assert!(!engine.can_transition("status", &s("archived")));
}

#[test]
fn can_transition_on_missing_field_is_false() {
    let mut article = Article::draft();
    let mut engine = TransitionEngine::new(&mut article);

    assert!(!engine.can_transition("nonexistent", &s("x")));
}

#[test]
fn raising_before_hook_prevents_persist() {
    let hooks = HookResolverBuilder::new()
        .specific(
            "status",
            &s("draft"),
            &s("published"),
            FnHook::<Article>::new().on_before(|_, _, _| Err(HookError::new("missing summary"))),
        )
        .build()
        .unwrap();
    let mut article = Article::draft();

    let err = TransitionEngine::new(&mut article)
        .with_hooks(Arc::new(hooks))
        .transition_to("status", s("published"))
        .unwrap_err();

    assert!(matches!(
        err,
        TransitionError::Hook {
            stage: HookStage::Before,
            ..
        }
    ));
    assert_eq!(err.to_string(), "specific before hook on field 'status' failed: missing summary");
    assert_eq!(article.status, "draft");
    assert!(article.calls().is_empty());
}

#[test]
fn common_hook_wraps_specific_hook() {
    let hooks = HookResolverBuilder::new()
        .common("status", Tracer("common"))
        .specific("status", &s("draft"), &s("published"), Tracer("specific"))
        .build()
        .unwrap();
    let mut article = Article::draft();

    TransitionEngine::new(&mut article)
        .with_hooks(Arc::new(hooks))
        .transition_to("status", s("published"))
        .unwrap();

    assert_eq!(
        article.calls(),
        vec![
            "common.before",
            "specific.before",
            "persist",
            "specific.after",
            "common.after",
        ]
    );
}

#[test]
fn one_resolver_serves_many_entities() {
    let hooks = Arc::new(
        HookResolverBuilder::new()
            .common("status", Tracer("common"))
            .build()
            .unwrap(),
    );

    let mut first = Article::draft();
    let mut second = Article::at("published");

    TransitionEngine::new(&mut first)
        .with_hooks(Arc::clone(&hooks))
        .transition(s("published"))
        .unwrap();
    TransitionEngine::new(&mut second)
        .with_hooks(Arc::clone(&hooks))
        .transition(s("archived"))
        .unwrap();

    assert_eq!(first.calls(), vec!["common.before", "persist", "common.after"]);
    assert_eq!(second.calls(), vec!["common.before", "persist", "common.after"]);
}

#[test]
fn catalog_hooks_resolve_by_convention() {
    let mut catalog = HookCatalog::new();
    let identifier = catalog.specific_identifier("Article", "status", "DraftToPublished");
    assert_eq!(identifier, "hooks::Article::ArticleStatusDraftToPublished");
    catalog.bind::<Article, _>(identifier, Tracer("catalog"));

    let hooks = HookResolverBuilder::new()
        .common("status", Tracer("common"))
        .catalog(catalog)
        .build()
        .unwrap();
    let mut article = Article::draft();

    TransitionEngine::new(&mut article)
        .with_hooks(Arc::new(hooks))
        .transition_to("status", s("published"))
        .unwrap();

    assert_eq!(
        article.calls(),
        vec![
            "common.before",
            "catalog.before",
            "persist",
            "catalog.after",
            "common.after",
        ]
    );
}

#[test]
fn catalog_entry_that_is_not_a_hook_is_rejected() {
    let mut catalog = HookCatalog::with_namespace("app::hooks");
    let identifier = catalog.specific_identifier("Article", "status", "DraftToPublished");
    catalog.insert_value(identifier.clone(), 42_u32);

    let hooks = HookResolverBuilder::<Article>::new()
        .catalog(catalog)
        .build()
        .unwrap();
    let mut article = Article::draft();

    let err = TransitionEngine::new(&mut article)
        .with_hooks(Arc::new(hooks))
        .transition_to("status", s("published"))
        .unwrap_err();

    match err {
        TransitionError::InvalidHookBinding(binding) => {
            assert_eq!(binding.identifier, identifier);
            assert_eq!(binding.entity_type, "Article");
        }
        other => panic!("expected invalid binding, got {other:?}"),
    }
    assert_eq!(article.status, "draft");
}

#[test]
fn after_hook_failure_is_reported_as_committed() {
    let hooks = HookResolverBuilder::new()
        .common(
            "status",
            FnHook::<Article>::new().on_after(|_, _, _| Err(HookError::new("search index offline"))),
        )
        .build()
        .unwrap();
    let notifier = Arc::new(RecordingNotifier::<String>::new());
    let mut article = Article::draft();

    let err = TransitionEngine::new(&mut article)
        .with_hooks(Arc::new(hooks))
        .with_shared_notifier(notifier.clone())
        .transition_to("status", s("published"))
        .unwrap_err();

    assert!(err.is_committed());
    assert_eq!(article.status, "published");
    assert_eq!(article.saves, vec!["published"]);
    assert_eq!(notifier.len(), 1);
}

#[test]
fn closure_notifier_sees_entity_after_persist() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let notifier = events::from_fn::<Article, _>(move |topic, event| {
        sink.lock().unwrap().push(format!(
            "{topic} {} {}->{} saved={}",
            event.field(),
            event.from(),
            event.to(),
            event.entity.saves.len()
        ));
    });
    let mut article = Article::draft();

    TransitionEngine::new(&mut article)
        .with_notifier(notifier)
        .transition_to("status", s("published"))
        .unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec!["state.transitioned status draft->published saved=1"]
    );
}

#[test]
fn inspection_reports_reachable_targets() {
    let mut article = Article::at("published");
    let mut engine = TransitionEngine::new(&mut article);

    let inspection = engine.inspect("status").unwrap();

    assert_eq!(inspection.reachable, vec![s("archived")]);
    let text = inspection.to_string();
    assert!(text.starts_with("Entity: Article\nCurrent state [status]: published\n"));
    assert!(text.contains("Possible transitions from [published]: archived"));
    assert!(text.contains(" - archived \u{2192} draft (guarded)"));

    assert!(matches!(
        engine.inspect("title"),
        Err(TransitionError::UnknownField { .. })
    ));
}

#[test]
fn registry_kept_beside_entity_is_built_once() {
    let mut article = Article::draft();
    let mut registry = TransitionRegistry::new();

    let before = TransitionEngine::with_registry(&mut article, &mut registry)
        .can_transition("status", &s("featured"));
    article.premium = true;
    let after = TransitionEngine::with_registry(&mut article, &mut registry)
        .can_transition("status", &s("featured"));

    assert!(!before);
    assert!(!after);
    assert_eq!(registry.rules("status").len(), 3);
}

#[test]
fn closure_hook_bound_in_catalog_runs() {
    let mut catalog = HookCatalog::new();
    let identifier = catalog.common_identifier("Article", "status");
    catalog.bind::<Article, _>(
        identifier,
        FnHook::<Article>::new().on_after(|article, _, to| {
            article.log.lock().unwrap().push(format!("indexed {to}"));
            Ok(())
        }),
    );
    let hooks = HookResolverBuilder::<Article>::new()
        .catalog(catalog)
        .build()
        .unwrap();
    let mut article = Article::draft();

    TransitionEngine::new(&mut article)
        .with_hooks(Arc::new(hooks))
        .transition_to("status", s("published"))
        .unwrap();

    assert_eq!(article.calls(), vec!["persist", "indexed published"]);
}
