//! Integration tests for the orchestrator, driven by scripted providers

use vantage_domain::{
    Entity, EntityType, Investigation, InvestigationStatus, Metadata, Provider, ProviderError,
};
use vantage_engine::{Engine, EngineError, InvestigationReport, ProviderRegistry, ValidationError};

#[derive(Clone, Copy)]
enum Behavior {
    /// Add one username entity linked to the seed
    Succeed,
    /// Add one entity, then fail
    FailAfterWrite,
    /// Add one entity, then panic
    PanicAfterWrite,
}

struct Scripted {
    name: &'static str,
    behavior: Behavior,
}

impl Scripted {
    fn boxed(name: &'static str, behavior: Behavior) -> Box<dyn Provider> {
        Box::new(Self { name, behavior })
    }
}

impl Provider for Scripted {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "scripted test provider"
    }

    fn supported_types(&self) -> &[EntityType] {
        &[EntityType::Email, EntityType::Username]
    }

    fn execute(
        &self,
        seed: &Entity,
        graph: &mut Investigation,
    ) -> Result<Vec<Entity>, ProviderError> {
        let found = graph
            .add_entity(Entity::new(
                EntityType::Username,
                format!("found-by-{}", self.name),
                self.name,
            ))
            .clone();
        graph.add_relationship(seed.id, found.id, "scripted_link", 0.5, Metadata::new());

        match self.behavior {
            Behavior::Succeed => Ok(vec![found]),
            Behavior::FailAfterWrite => Err(ProviderError::Unavailable(format!(
                "{} is down",
                self.name
            ))),
            Behavior::PanicAfterWrite => panic!("{} exploded", self.name),
        }
    }
}

/// Records the seed metadata it sees, then annotates the seed
struct Annotator {
    name: &'static str,
}

impl Provider for Annotator {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "annotates the seed"
    }

    fn supported_types(&self) -> &[EntityType] {
        &[EntityType::Email]
    }

    fn execute(
        &self,
        seed: &Entity,
        graph: &mut Investigation,
    ) -> Result<Vec<Entity>, ProviderError> {
        let mut meta = Metadata::new();
        meta.insert(
            format!("seen_by_{}", self.name),
            (seed.metadata.len() as i64).into(),
        );
        graph.merge_metadata(seed.id, meta);
        Ok(Vec::new())
    }
}

fn engine(providers: Vec<Box<dyn Provider>>) -> Engine {
    Engine::new(ProviderRegistry::from_providers(providers))
}

#[test]
fn test_failure_isolation() {
    let engine = engine(vec![
        Scripted::boxed("p1", Behavior::Succeed),
        Scripted::boxed("p2", Behavior::FailAfterWrite),
        Scripted::boxed("p3", Behavior::Succeed),
    ]);

    let inv = engine.investigate("alice@example.com", None, None).unwrap();

    assert_eq!(inv.status(), InvestigationStatus::Completed);
    assert_eq!(inv.providers_run(), vec!["p1", "p2 (FAILED)", "p3"]);
    assert!(inv.find_entity(EntityType::Username, "found-by-p1").is_some());
    assert!(inv.find_entity(EntityType::Username, "found-by-p3").is_some());
    // Partial writes from the failing provider are kept
    assert!(inv.find_entity(EntityType::Username, "found-by-p2").is_some());
    assert_eq!(inv.relationships().len(), 3);

    let run = &inv.provider_runs()[1];
    assert!(run.is_failure());
}

#[test]
fn test_panic_isolation() {
    let engine = engine(vec![
        Scripted::boxed("p1", Behavior::PanicAfterWrite),
        Scripted::boxed("p2", Behavior::Succeed),
    ]);

    let inv = engine.investigate("alice@example.com", None, None).unwrap();

    assert_eq!(inv.status(), InvestigationStatus::Completed);
    assert_eq!(inv.providers_run(), vec!["p1 (FAILED)", "p2"]);
    assert!(inv.find_entity(EntityType::Username, "found-by-p1").is_some());
    assert!(inv.find_entity(EntityType::Username, "found-by-p2").is_some());
}

#[test]
fn test_filter_to_unknown_provider() {
    let engine = engine(vec![Scripted::boxed("p1", Behavior::Succeed)]);
    let filter = vec!["nonexistent".to_string()];

    let inv = engine
        .investigate("alice@example.com", None, Some(&filter))
        .unwrap();

    assert_eq!(inv.entities().len(), 1);
    assert!(inv.relationships().is_empty());
    assert!(inv.providers_run().is_empty());
    assert_eq!(inv.status(), InvestigationStatus::Completed);
}

#[test]
fn test_filter_keeps_registry_order() {
    let engine = engine(vec![
        Scripted::boxed("p1", Behavior::Succeed),
        Scripted::boxed("p2", Behavior::Succeed),
        Scripted::boxed("p3", Behavior::Succeed),
    ]);
    let filter = vec!["p3".to_string(), "p1".to_string()];

    let inv = engine
        .investigate("alice@example.com", None, Some(&filter))
        .unwrap();

    assert_eq!(inv.providers_run(), vec!["p1", "p3"]);
}

#[test]
fn test_empty_filter_runs_every_provider() {
    let engine = engine(vec![
        Scripted::boxed("p1", Behavior::Succeed),
        Scripted::boxed("p2", Behavior::Succeed),
    ]);

    let inv = engine
        .investigate("alice@example.com", None, Some(&[]))
        .unwrap();

    assert_eq!(inv.providers_run(), vec!["p1", "p2"]);
}

#[test]
fn test_no_matching_provider_completes_with_seed() {
    let engine = engine(vec![Scripted::boxed("p1", Behavior::Succeed)]);

    let inv = engine.investigate("8.8.8.8", None, None).unwrap();

    assert_eq!(inv.initial_type(), EntityType::IpAddress);
    assert_eq!(inv.entities().len(), 1);
    assert_eq!(inv.entities()[0].source_provider, "user_input");
    assert_eq!(inv.entities()[0].confidence, 1.0);
    assert_eq!(inv.status(), InvestigationStatus::Completed);
}

#[test]
fn test_undetectable_query() {
    let engine = engine(vec![Scripted::boxed("p1", Behavior::Succeed)]);

    let err = engine.investigate("!!!", None, None).unwrap_err();

    match err {
        EngineError::Validation(ValidationError::UndetectedType(query)) => {
            assert_eq!(query, "!!!")
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unknown_explicit_type() {
    let engine = engine(Vec::new());

    let err = engine
        .investigate("alice@example.com", Some("EMAIL_ADDR"), None)
        .unwrap_err();

    assert!(matches!(
        err,
        EngineError::Validation(ValidationError::UnknownType(_))
    ));
}

#[test]
fn test_terminal_state_for_every_outcome_mix() {
    let behaviors = [
        Behavior::Succeed,
        Behavior::FailAfterWrite,
        Behavior::PanicAfterWrite,
    ];
    let names = ["p1", "p2", "p3"];

    for a in behaviors {
        for b in behaviors {
            for c in behaviors {
                let providers = [a, b, c]
                    .iter()
                    .zip(names)
                    .map(|(behavior, name)| Scripted::boxed(name, *behavior))
                    .collect();
                let inv = engine(providers)
                    .investigate("bob_smith99", None, None)
                    .unwrap();

                assert!(inv.status().is_terminal());
                let completed_at = inv.completed_at().expect("completed_at set");
                assert!(completed_at >= inv.created_at());
                assert_eq!(inv.providers_run().len(), 3);
            }
        }
    }
}

#[test]
fn test_finished_investigation_rejects_second_transition() {
    let engine = engine(vec![Scripted::boxed("p1", Behavior::Succeed)]);
    let mut inv = engine.investigate("alice@example.com", None, None).unwrap();
    let completed_at = inv.completed_at();

    assert!(inv.fail("late failure").is_err());
    assert_eq!(inv.status(), InvestigationStatus::Completed);
    assert_eq!(inv.completed_at(), completed_at);
}

#[test]
fn test_each_provider_sees_current_seed() {
    let engine = engine(vec![
        Box::new(Annotator { name: "first" }),
        Box::new(Annotator { name: "second" }),
    ]);

    let inv = engine.investigate("alice@example.com", None, None).unwrap();

    let seed = &inv.entities()[0];
    assert_eq!(seed.metadata["seen_by_first"].as_f64(), Some(0.0));
    assert_eq!(seed.metadata["seen_by_second"].as_f64(), Some(1.0));
}

#[test]
fn test_builtin_email_investigation_report() {
    let engine = Engine::new(ProviderRegistry::builtin(&Default::default()));

    let inv = engine.investigate("alice@mailinator.com", None, None).unwrap();
    let report = InvestigationReport::from_investigation(&inv);

    assert_eq!(report.total_entities, 3);
    assert_eq!(report.entity_counts["domain"], 1);
    assert_eq!(report.providers_run, vec!["Email Enrichment"]);
    assert_eq!(
        inv.entities()[0].metadata["is_disposable"].as_bool(),
        Some(true)
    );
}
