
use chrono::{Duration, Utc};
use nutri_domain::{DomainError, FatSecretServing, FoodSource};
use nutri_persistence::{FatSecretCache, NewCachedFood, PersistenceError};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use test_support::provider;
use uuid::Uuid;

fn unique_food_id() -> String {
    format!("test-{}", Uuid::new_v4())
}

fn row(food_id: &str, serving_id: &str, age: Duration) -> NewCachedFood {
    NewCachedFood { fatsecret_food_id: food_id.to_string(),
                    food_name: "Greek Yogurt".into(),
                    brand_name: Some("Test Dairy".into()),
                    serving_id: Some(serving_id.to_string()),
                    serving_description: Some("1 container".into()),
                    metric_serving_amount: Some(170.0),
                    metric_serving_unit: Some("g".into()),
                    calories: Some(100.0),
                    fat_g: Some(0.0),
                    protein_g: Some(18.0),
                    carbs_g: Some(6.0),
                    sugar_g: Some(4.0),
                    fiber_g: Some(0.0),
                    sodium_mg: Some(65.0),
                    retrieved_at: Utc::now() - age }
}

#[test]
fn row_21h_old_is_returned_23h_old_is_not() {
    let Some(provider) = provider() else {
        eprintln!("skip (no DATABASE_URL)");
        return;
    };
    let cache = FatSecretCache::new(provider);
    let id = unique_food_id();
    cache.insert(&[row(&id, "fresh", Duration::hours(21)), row(&id, "stale", Duration::hours(23))])
         .expect("insert");
    let hits = cache.lookup(&id).expect("lookup");
    assert_eq!(hits.len(), 1, "sólo la fila de 21h está dentro de la ventana");
    assert_eq!(hits[0].serving_id.as_deref(), Some("fresh"));
}

#[test]
fn insert_returns_every_row_with_generated_id() {
    let Some(provider) = provider() else {
        eprintln!("skip (no DATABASE_URL)");
        return;
    };
    let cache = FatSecretCache::new(provider);
    let id = unique_food_id();
    let rows: Vec<NewCachedFood> = (0..3).map(|i| row(&id, &format!("s{i}"), Duration::minutes(1))).collect();
    let inserted = cache.insert(&rows).expect("insert");
    assert_eq!(inserted.len(), 3);
    let ids: HashSet<i32> = inserted.iter().map(|r| r.id).collect();
    assert_eq!(ids.len(), 3, "cada fila recibe un id propio");
    assert!(inserted.iter().all(|r| r.fatsecret_food_id == id && r.protein_g == Some(18.0)));

    let looked_up: HashSet<i32> = cache.lookup(&id).expect("lookup").iter().map(|r| r.id).collect();
    assert_eq!(looked_up, ids);
}

#[test]
fn inserting_same_record_twice_keeps_both_rows() {
    let Some(provider) = provider() else {
        eprintln!("skip (no DATABASE_URL)");
        return;
    };
    let cache = FatSecretCache::new(provider);
    let id = unique_food_id();
    let same = row(&id, "1", Duration::minutes(5));
    let first = cache.insert(std::slice::from_ref(&same)).expect("first insert");
    let second = cache.insert(std::slice::from_ref(&same)).expect("second insert");
    assert_ne!(first[0].id, second[0].id);
    assert_eq!(cache.lookup(&id).expect("lookup").len(), 2, "append-only: se esperan duplicados");
}

#[test]
fn lookup_orders_newest_first() {
    let Some(provider) = provider() else {
        eprintln!("skip (no DATABASE_URL)");
        return;
    };
    let cache = FatSecretCache::new(provider);
    let id = unique_food_id();
    cache.insert(&[row(&id, "older", Duration::hours(5)), row(&id, "newer", Duration::hours(1))])
         .expect("insert");
    let hits = cache.lookup(&id).expect("lookup");
    let order: Vec<&str> = hits.iter().filter_map(|r| r.serving_id.as_deref()).collect();
    assert_eq!(order, vec!["newer", "older"]);
}

#[test]
fn unknown_id_and_empty_insert() {
    let Some(provider) = provider() else {
        eprintln!("skip (no DATABASE_URL)");
        return;
    };
    let cache = FatSecretCache::new(provider);
    assert!(cache.lookup(&unique_food_id()).expect("lookup").is_empty());
    assert!(cache.insert(&[]).expect("empty insert").is_empty());
}

#[test]
fn narrower_window_hides_older_rows() {
    let Some(provider) = provider() else {
        eprintln!("skip (no DATABASE_URL)");
        return;
    };
    let cache = FatSecretCache::with_window(provider, Duration::hours(1));
    assert_eq!(cache.window(), Duration::hours(1));
    let id = unique_food_id();
    cache.insert(&[row(&id, "two-hours", Duration::hours(2))]).expect("insert");
    assert!(cache.lookup(&id).expect("lookup").is_empty());
    let earlier = Utc::now() - Duration::minutes(90);
    assert_eq!(cache.lookup_at(&id, earlier).expect("lookup_at").len(), 1);
}

struct CountingSource {
    calls: AtomicUsize,
    fail: bool,
}

impl FoodSource for CountingSource {
    fn fetch_servings(&self, fatsecret_food_id: &str) -> Result<Vec<FatSecretServing>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DomainError::Upstream("rate limited".into()));
        }
        // El proveedor puede devolver el id con otro formato; el cache usa el pedido.
        let serving = |sid: &str, kcal: f32| FatSecretServing { food_id: format!(" {fatsecret_food_id} "),
                                                                food_name: "Banana".into(),
                                                                brand_name: None,
                                                                serving_id: Some(sid.into()),
                                                                serving_description: None,
                                                                metric_serving_amount: None,
                                                                metric_serving_unit: None,
                                                                calories: Some(kcal),
                                                                fat: None,
                                                                protein: None,
                                                                carbohydrate: None,
                                                                sugar: None,
                                                                fiber: None,
                                                                sodium: None };
        Ok(vec![serving("small", 90.0), serving("large", 121.0)])
    }
}

#[test]
fn servings_or_fetch_fetches_once_then_hits_cache() {
    let Some(provider) = provider() else {
        eprintln!("skip (no DATABASE_URL)");
        return;
    };
    let cache = FatSecretCache::new(provider);
    let source = CountingSource { calls: AtomicUsize::new(0), fail: false };
    let id = unique_food_id();

    let first = cache.servings_or_fetch(&id, &source).expect("miss");
    assert_eq!(first.len(), 2);
    assert!(first.iter().all(|r| r.fatsecret_food_id == id));
    assert_eq!(first[0].retrieved_at, first[1].retrieved_at, "mismo sello para todo el lote");
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);

    let second = cache.servings_or_fetch(&id, &source).expect("hit");
    assert_eq!(source.calls.load(Ordering::SeqCst), 1, "un hit no consulta al proveedor");
    let a: HashSet<i32> = first.iter().map(|r| r.id).collect();
    let b: HashSet<i32> = second.iter().map(|r| r.id).collect();
    assert_eq!(a, b);
}

#[test]
fn upstream_failure_propagates_and_caches_nothing() {
    let Some(provider) = provider() else {
        eprintln!("skip (no DATABASE_URL)");
        return;
    };
    let cache = FatSecretCache::new(provider);
    let source = CountingSource { calls: AtomicUsize::new(0), fail: true };
    let id = unique_food_id();
    match cache.servings_or_fetch(&id, &source) {
        Err(PersistenceError::Upstream(DomainError::Upstream(msg))) => assert_eq!(msg, "rate limited"),
        other => panic!("se esperaba Upstream, got {other:?}"),
    }
    assert!(cache.lookup(&id).expect("lookup").is_empty());
}
