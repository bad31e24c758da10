//! End-to-End Scenarios
//!
//! Whole screen flows against the scripted transport: read, edit, submit,
//! invalidate, navigate.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;

use crate::cache::{CacheKey, CacheStatus, QueryCache};
use crate::error::TransportError;
use crate::form::FormBinder;
use crate::kind::ResourceKind;
use crate::models::{Recipes, Tasks};
use crate::mutation::{MutationStatus, SubmitOutcome};
use crate::navigation::Navigation;
use crate::resource::{Resource, ResourceSync};
use crate::testing::{local_spawner, run_local, MockTransport};
use crate::transport::Method;

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Status(MutationStatus),
    Navigated(Navigation),
}

fn cache_with(transport: &Rc<MockTransport>) -> QueryCache {
    QueryCache::new(transport.clone(), local_spawner())
}

fn affirm(_: &str) -> bool {
    true
}

fn decline(_: &str) -> bool {
    false
}

#[tokio::test]
async fn scenario_create_task() {
    run_local(async {
        let transport = Rc::new(MockTransport::new());
        let tasks = ResourceSync::<Tasks>::new(cache_with(&transport));
        transport.respond(Method::Get, "/todos", json!({"todos": []}));
        transport.respond(
            Method::Post,
            "/todos/add",
            json!({"id": 255, "todo": "buy milk", "completed": false, "userId": 3}),
        );
        tasks.fetch_list().await;

        let coordinator = tasks.coordinator();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        coordinator.watch(move |state| sink.borrow_mut().push(Event::Status(state.status)));
        let sink = events.clone();
        let cache = tasks.cache().clone();
        coordinator.on_success(move |target| {
            assert_eq!(cache.peek(CacheKey::collection(ResourceKind::Task)).status, CacheStatus::Stale);
            sink.borrow_mut().push(Event::Navigated(target));
        });

        let mut binder = FormBinder::<Tasks>::new_create();
        binder.set("todo", "buy milk");
        binder.set("userId", "3");
        assert_eq!(coordinator.status(), MutationStatus::Idle);
        let outcome = tasks
            .submit_form(&mut binder, &coordinator, &decline)
            .await
            .expect("valid task");

        assert!(matches!(outcome, SubmitOutcome::Succeeded(_)));
        assert_eq!(
            transport.last_body(Method::Post),
            Some(json!({"todo": "buy milk", "completed": false, "userId": 3}))
        );
        assert_eq!(
            *events.borrow(),
            vec![
                Event::Status(MutationStatus::Pending),
                Event::Status(MutationStatus::Success),
                Event::Navigated(Navigation::CanonicalList(ResourceKind::Task)),
            ]
        );
        assert_eq!(binder.state(), crate::form::FormState::Done);
    })
    .await;
}

#[tokio::test]
async fn scenario_edit_recipe_ingredients() {
    run_local(async {
        let transport = Rc::new(MockTransport::new());
        let recipes = ResourceSync::<Recipes>::new(cache_with(&transport));
        transport.respond(
            Method::Get,
            "/recipes/1",
            json!({
                "id": 1,
                "name": "Pancakes",
                "ingredients": ["egg", "flour"],
                "instructions": ["Mix", "Fry"],
                "prepTimeMinutes": 10,
                "cookTimeMinutes": 15,
                "servings": 4,
                "difficulty": "Easy",
                "cuisine": "American",
                "caloriesPerServing": 250,
                "tags": ["Breakfast"],
                "userId": 7,
                "image": "https://cdn.example/pancakes.webp",
                "rating": 4.5,
                "mealType": ["Breakfast"]
            }),
        );
        transport.respond(Method::Put, "/recipes/1", json!({"id": 1}));

        let recipe = recipes.fetch_detail(1).await.data.expect("recipe loaded");
        let mut binder = FormBinder::<Recipes>::new_edit(1);
        binder.populate(&recipe);
        assert_eq!(binder.field("ingredients"), "egg\nflour");

        binder.set("ingredients", "egg\nflour\nsugar");
        let coordinator = recipes.coordinator();
        let outcome = recipes
            .submit_form(&mut binder, &coordinator, &affirm)
            .await
            .expect("valid recipe");

        assert!(matches!(outcome, SubmitOutcome::Succeeded(_)));
        let body = transport.last_body(Method::Put).expect("update body");
        assert_eq!(body["ingredients"], json!(["egg", "flour", "sugar"]));
        assert_eq!(body["instructions"], json!(["Mix", "Fry"]));
    })
    .await;
}

#[tokio::test]
async fn scenario_declined_delete_keeps_cache() {
    run_local(async {
        let transport = Rc::new(MockTransport::new());
        let tasks = ResourceSync::<Tasks>::new(cache_with(&transport));
        let original = json!({"id": 5, "todo": "Keep me", "completed": false, "userId": 1});
        transport.respond(Method::Get, "/todos/5", original.clone());
        tasks.fetch_detail(5).await;

        let coordinator = tasks.coordinator();
        let outcome = tasks.delete(5, &coordinator, &decline).await;

        assert_eq!(outcome, SubmitOutcome::Declined);
        assert_eq!(transport.call_count(Method::Delete, "/todos/5"), 0);
        assert_eq!(coordinator.status(), MutationStatus::Idle);
        let entry = tasks.cache().peek(tasks.detail_key(5));
        assert_eq!(entry.status, CacheStatus::Ready);
        assert_eq!(entry.data, Some(original));
    })
    .await;
}

#[tokio::test]
async fn scenario_update_invalidates_before_navigation() {
    run_local(async {
        let transport = Rc::new(MockTransport::new());
        let tasks = ResourceSync::<Tasks>::new(cache_with(&transport));
        transport.respond(Method::Get, "/todos", json!({"todos": []}));
        transport.respond(Method::Get, "/todos/2", json!({"id": 2, "todo": "Old", "userId": 1}));
        transport.respond(Method::Put, "/todos/2", json!({"id": 2, "todo": "New", "userId": 1}));
        tasks.fetch_list().await;
        tasks.fetch_detail(2).await;

        let coordinator = tasks.coordinator();
        let observed = Rc::new(RefCell::new(Vec::new()));
        let sink = observed.clone();
        let cache = tasks.cache().clone();
        let recorder = transport.clone();
        coordinator.on_success(move |_| {
            for key in [CacheKey::detail(ResourceKind::Task, 2), CacheKey::collection(ResourceKind::Task)] {
                let before = cache.peek(key).status;
                let calls_before = recorder.call_count(Method::Get, &key.path());
                cache.get(key);
                let refetched = recorder.call_count(Method::Get, &key.path()) > calls_before || cache.is_fetching(key);
                sink.borrow_mut().push((key, before, refetched));
            }
        });

        let mut binder = FormBinder::<Tasks>::new_edit(2);
        let current = tasks.fetch_detail(2).await.data.expect("task loaded");
        binder.populate(&current);
        binder.set("todo", "New");
        tasks
            .submit_form(&mut binder, &coordinator, &affirm)
            .await
            .expect("valid task");

        let observed = observed.borrow();
        assert_eq!(observed.len(), 2);
        for (key, before, refetched) in observed.iter() {
            assert_eq!(*before, CacheStatus::Stale, "{} not stale at navigation", key);
            assert!(*refetched, "{} not refetched", key);
        }
    })
    .await;
}

#[tokio::test]
async fn scenario_double_submit_sends_once() {
    run_local(async {
        let transport = Rc::new(MockTransport::new());
        let recipes = ResourceSync::<Recipes>::new(cache_with(&transport));
        transport.respond(Method::Delete, "/recipes/9", json!({"id": 9, "isDeleted": true}));
        transport.hold();
        let coordinator = recipes.coordinator();

        let (first, second) = futures::join!(recipes.delete(9, &coordinator, &affirm), async {
            let second = recipes.delete(9, &coordinator, &affirm).await;
            transport.release();
            second
        });

        assert!(matches!(first, SubmitOutcome::Succeeded(_)));
        assert_eq!(second, SubmitOutcome::Rejected);
        assert_eq!(transport.call_count(Method::Delete, "/recipes/9"), 1);
    })
    .await;
}

#[tokio::test]
async fn scenario_failed_refresh_keeps_last_good_list() {
    run_local(async {
        let transport = Rc::new(MockTransport::new());
        let tasks = ResourceSync::<Tasks>::new(cache_with(&transport));
        transport.respond(
            Method::Get,
            "/todos",
            json!({"todos": [{"id": 1, "todo": "Walk", "completed": false, "userId": 3}]}),
        );
        assert!(tasks.fetch_list().await.last_good.is_none());

        tasks.cache().invalidate(tasks.list_key());
        transport.fail(Method::Get, "/todos", TransportError::Network("offline".into()));
        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        let _sub = tasks.subscribe_list(move |entry| *sink.borrow_mut() = Some(entry));
        let failed = tasks.fetch_list().await;

        assert_eq!(failed.status, CacheStatus::Error);
        assert!(failed.data.is_none());
        assert_eq!(failed.error_message().as_deref(), Some("network error: offline"));
        let kept = failed.last_good.expect("last good list");
        assert_eq!(kept.len(), 1);
        assert_eq!(Tasks::title(&kept[0]), "Walk");

        let pushed = seen.borrow().clone().expect("listener ran");
        assert_eq!(pushed.last_good, Some(kept));

        transport.respond(Method::Get, "/todos", json!({"todos": []}));
        let recovered = tasks.fetch_list().await;
        assert_eq!(recovered.data, Some(Vec::new()));
        assert!(recovered.last_good.is_none());
    })
    .await;
}
