//! Article Publishing Workflow
//!
//! This example walks an article through a guarded editorial workflow.
//!
//! Key concepts:
//! - Rules declared by the entity itself (Draft -> Review -> Published -> Archived)
//! - A guard that reads the entity (an article needs a reviewer to publish)
//! - A common hook around every status change and a specific one for publishing
//! - Notifications after each persisted change
//! - Inspecting reachable states without transitioning
//!
//! Run with: cargo run --example article_workflow

use statefield::builder::HookResolverBuilder;
use statefield::core::{Entity, PersistenceError, Transitionable, TransitionRegistry};
use statefield::engine::TransitionEngine;
use statefield::events::{self, STATE_TRANSITIONED};
use statefield::hooks::{FnHook, HookError};
use statefield::state_enum;
use std::sync::Arc;

state_enum! {
    pub enum Status {
        Draft as "draft",
        InReview as "in_review",
        Published as "published",
        Archived as "archived",
    }
}

struct Article {
    id: u64,
    title: String,
    status: Status,
    reviewer: Option<String>,
    revision: u32,
}

impl Entity for Article {
    type State = Status;

    fn entity_type(&self) -> &str {
        "Article"
    }

    fn get_attribute(&self, field: &str) -> Option<Status> {
        match field {
            "status" => Some(self.status.clone()),
            _ => None,
        }
    }

    fn set_attribute(&mut self, _field: &str, value: Status) {
        self.status = value;
    }

    fn persist(&mut self) -> Result<(), PersistenceError> {
        self.revision += 1;
        println!("  [Store] article {} saved (revision {})", self.id, self.revision);
        Ok(())
    }
}

impl Transitionable for Article {
    fn register_transitions(&self, registry: &mut TransitionRegistry<Self>) {
        registry
            .register("status", Status::Draft, Status::InReview)
            .register("status", Status::InReview, Status::Draft)
            .register_when("status", Status::InReview, Status::Published, has_reviewer)
            .register("status", Status::Published, Status::Archived);
    }
}

// Guard: publishing requires a named reviewer
fn has_reviewer(article: &Article) -> bool {
    article.reviewer.is_some()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Article Publishing Workflow ===\n");

    let hooks = HookResolverBuilder::new()
        .common(
            "status",
            FnHook::<Article>::new()
                .on_before(|article, from, to| {
                    println!("  [Audit] '{}': {:?} -> {:?}", article.title, from, to);
                    Ok(())
                })
                .on_after(|article, _, to| {
                    println!("  [Audit] '{}' is now {:?}", article.title, to);
                    Ok(())
                }),
        )
        .specific(
            "status",
            &Status::InReview,
            &Status::Published,
            FnHook::<Article>::new().on_before(|article, _, _| {
                if article.title.trim().is_empty() {
                    return Err(HookError::new("cannot publish an untitled article"));
                }
                Ok(())
            }),
        )
        .build()?;
    let hooks = Arc::new(hooks);

    let notifier = events::from_fn::<Article, _>(|topic, event| {
        println!(
            "  [Event] {topic}: {} {:?} -> {:?} ({})",
            event.field(),
            event.from(),
            event.to(),
            event.record.id
        );
    });

    let mut article = Article {
        id: 7,
        title: "Borrowing without tears".to_string(),
        status: Status::Draft,
        reviewer: None,
        revision: 0,
    };

    let mut engine = TransitionEngine::new(&mut article)
        .with_hooks(Arc::clone(&hooks))
        .with_notifier(notifier);

    println!("1. Submitting for review");
    engine.transition(Status::InReview)?;

    println!("\n2. Trying to publish without a reviewer");
    println!(
        "  can publish? {}",
        engine.can_transition_default(&Status::Published)
    );
    if let Err(err) = engine.transition(Status::Published) {
        println!("  Denied: {err}");
    }

    println!("\n3. Assigning a reviewer and publishing");
    engine.entity_mut().reviewer = Some("ana".to_string());
    let record = engine.transition(Status::Published)?;
    println!(
        "  Committed {:?} -> {:?} at {} on '{}'",
        record.from, record.to, record.occurred_at, STATE_TRANSITIONED
    );

    println!("\n4. Inspecting the registry");
    println!("{}", engine.inspect("status")?);
    println!("\nSnapshot as JSON:\n{}", engine.snapshot().to_json()?);

    println!("\n5. Archiving");
    engine.transition(Status::Archived)?;

    println!(
        "\nFinal status: {:?} after {} saves",
        article.status, article.revision
    );

    Ok(())
}
