//! Integration tests for the list query: filters, sorting, pagination, and
//! full-text search.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use maistor_core::pagination::PageInfo;
use maistor_core::query::{TaskListParams, TaskQuery};
use maistor_db::models::task::NewTask;
use maistor_db::repositories::{ApplicationRepo, CustomerRepo, TaskRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_task(customer_id: Uuid, title: &str, city: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: "Описание на задачата".to_string(),
        requirements: None,
        location_notes: None,
        source_language: "bg".to_string(),
        category: "renovation".to_string(),
        subcategory: None,
        city: city.to_string(),
        neighborhood: None,
        budget_min: None,
        budget_max: None,
        budget_type: "unclear".to_string(),
        deadline: None,
        is_urgent: false,
        status: "open".to_string(),
        customer_id,
        images: vec![],
    }
}

async fn customer(pool: &PgPool) -> Uuid {
    CustomerRepo::create(pool, "Иван Петров", None)
        .await
        .expect("customer create should succeed")
        .id
}

/// Force a specific creation time so ordering tests do not depend on insert
/// timing.
async fn backdate(pool: &PgPool, id: Uuid, hours_ago: i64) {
    sqlx::query("UPDATE tasks SET created_at = NOW() - make_interval(hours => $2) WHERE id = $1")
        .bind(id)
        .bind(hours_ago as i32)
        .execute(pool)
        .await
        .unwrap();
}

fn parse(params: TaskListParams) -> TaskQuery {
    TaskQuery::from_params(&params, None).expect("params should parse")
}

// ---------------------------------------------------------------------------
// End-to-end browse scenario
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_browse_sofia_budget_low(pool: PgPool) {
    let owner = customer(&pool).await;

    for (title, budget, status) in [
        ("Задача А", 40, "open"),
        ("Задача Б", 90, "open"),
        ("Задача В", 200, "completed"),
    ] {
        let mut input = new_task(owner, title, "София");
        input.budget_type = "fixed".to_string();
        input.budget_min = Some(Decimal::new(budget, 0));
        input.budget_max = Some(Decimal::new(budget + 50, 0));
        input.status = status.to_string();
        TaskRepo::create(&pool, &input).await.unwrap();
    }
    // A task in another city must not appear.
    TaskRepo::create(&pool, &new_task(owner, "Задача Г", "Пловдив"))
        .await
        .unwrap();

    let query = parse(TaskListParams {
        city: Some("София".into()),
        mode: Some("browse".into()),
        sort_by: Some("budget_low".into()),
        page: Some("1".into()),
        limit: Some("2".into()),
        // Browse must override any caller-supplied status.
        status: Some("completed".into()),
        ..Default::default()
    });

    let (items, total) = TaskRepo::search(&pool, &query).await.unwrap();
    assert_eq!(total, 2);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].budget_min, Some(Decimal::new(40, 0)));
    assert_eq!(items[1].budget_min, Some(Decimal::new(90, 0)));
    assert!(items.iter().all(|t| t.status == "open"));

    let info = PageInfo::new(query.page, query.limit, total);
    assert_eq!(info.total_pages, 1);
    assert!(!info.has_next);
    assert!(!info.has_previous);
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_budget_high_sorts_non_increasing_nulls_last(pool: PgPool) {
    let owner = customer(&pool).await;

    let mut cheap = new_task(owner, "Евтина", "София");
    cheap.budget_type = "fixed".to_string();
    cheap.budget_min = Some(Decimal::new(50, 0));
    cheap.budget_max = Some(Decimal::new(100, 0));
    TaskRepo::create(&pool, &cheap).await.unwrap();

    let mut dear = new_task(owner, "Скъпа", "София");
    dear.budget_type = "fixed".to_string();
    dear.budget_min = Some(Decimal::new(200, 0));
    dear.budget_max = Some(Decimal::new(300, 0));
    TaskRepo::create(&pool, &dear).await.unwrap();

    // No budget at all.
    TaskRepo::create(&pool, &new_task(owner, "Без бюджет", "София"))
        .await
        .unwrap();

    let query = parse(TaskListParams {
        sort_by: Some("budget_high".into()),
        ..Default::default()
    });
    let (items, _) = TaskRepo::search(&pool, &query).await.unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].budget_max, Some(Decimal::new(300, 0)));
    assert_eq!(items[1].budget_max, Some(Decimal::new(100, 0)));
    assert_eq!(items[2].budget_max, None, "null budgets sort last");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_deadline_sorts_soonest_first_nulls_last(pool: PgPool) {
    let owner = customer(&pool).await;
    let now = Utc::now();

    let mut soon = new_task(owner, "Скоро", "София");
    soon.deadline = Some(now + Duration::days(1));
    let soon = TaskRepo::create(&pool, &soon).await.unwrap();

    let mut later = new_task(owner, "По-късно", "София");
    later.deadline = Some(now + Duration::days(7));
    let later = TaskRepo::create(&pool, &later).await.unwrap();

    let never = TaskRepo::create(&pool, &new_task(owner, "Без срок", "София"))
        .await
        .unwrap();

    let query = parse(TaskListParams {
        sort_by: Some("deadline".into()),
        ..Default::default()
    });
    let (items, _) = TaskRepo::search(&pool, &query).await.unwrap();

    let ids: Vec<Uuid> = items.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![soon.id, later.id, never.id]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_urgent_sort_with_created_at_tiebreak(pool: PgPool) {
    let owner = customer(&pool).await;

    let mut urgent_old = new_task(owner, "Спешна стара", "София");
    urgent_old.is_urgent = true;
    let urgent_old = TaskRepo::create(&pool, &urgent_old).await.unwrap();
    backdate(&pool, urgent_old.id, 5).await;

    let mut urgent_new = new_task(owner, "Спешна нова", "София");
    urgent_new.is_urgent = true;
    let urgent_new = TaskRepo::create(&pool, &urgent_new).await.unwrap();
    backdate(&pool, urgent_new.id, 1).await;

    let calm = TaskRepo::create(&pool, &new_task(owner, "Спокойна", "София"))
        .await
        .unwrap();
    backdate(&pool, calm.id, 2).await;

    let query = parse(TaskListParams {
        sort_by: Some("urgent".into()),
        ..Default::default()
    });
    let (items, _) = TaskRepo::search(&pool, &query).await.unwrap();

    let ids: Vec<Uuid> = items.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![urgent_new.id, urgent_old.id, calm.id]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_newest_and_oldest_sorts(pool: PgPool) {
    let owner = customer(&pool).await;

    let first = TaskRepo::create(&pool, &new_task(owner, "Първа", "София")).await.unwrap();
    backdate(&pool, first.id, 3).await;
    let second = TaskRepo::create(&pool, &new_task(owner, "Втора", "София")).await.unwrap();
    backdate(&pool, second.id, 2).await;
    let third = TaskRepo::create(&pool, &new_task(owner, "Трета", "София")).await.unwrap();
    backdate(&pool, third.id, 1).await;

    let newest = parse(TaskListParams::default());
    let (items, _) = TaskRepo::search(&pool, &newest).await.unwrap();
    let ids: Vec<Uuid> = items.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);

    let oldest = parse(TaskListParams {
        sort_by: Some("oldest".into()),
        ..Default::default()
    });
    let (items, _) = TaskRepo::search(&pool, &oldest).await.unwrap();
    let ids: Vec<Uuid> = items.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![first.id, second.id, third.id]);
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_status_set_membership(pool: PgPool) {
    let owner = customer(&pool).await;
    for status in ["open", "completed", "cancelled"] {
        let mut input = new_task(owner, &format!("Задача {status}"), "София");
        input.status = status.to_string();
        TaskRepo::create(&pool, &input).await.unwrap();
    }

    let query = parse(TaskListParams {
        status: Some("open,completed".into()),
        ..Default::default()
    });
    let (items, total) = TaskRepo::search(&pool, &query).await.unwrap();
    assert_eq!(total, 2);
    assert!(items.iter().all(|t| t.status == "open" || t.status == "completed"));

    // An entirely invalid status list degrades to no filter.
    let query = parse(TaskListParams {
        status: Some("bogus".into()),
        ..Default::default()
    });
    let (_, total) = TaskRepo::search(&pool, &query).await.unwrap();
    assert_eq!(total, 3);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_posted_mode_filters_by_owner(pool: PgPool) {
    let alice = customer(&pool).await;
    let bob = customer(&pool).await;

    TaskRepo::create(&pool, &new_task(alice, "На Алис", "София")).await.unwrap();
    TaskRepo::create(&pool, &new_task(bob, "На Боб", "София")).await.unwrap();

    let query = TaskQuery::from_params(
        &TaskListParams {
            mode: Some("posted".into()),
            ..Default::default()
        },
        Some(alice),
    )
    .unwrap();
    let (items, total) = TaskRepo::search(&pool, &query).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].customer_id, alice);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_applications_mode_joins_on_applicant(pool: PgPool) {
    let owner = customer(&pool).await;
    let professional = Uuid::new_v4();

    let applied = TaskRepo::create(&pool, &new_task(owner, "С кандидатура", "София"))
        .await
        .unwrap();
    TaskRepo::create(&pool, &new_task(owner, "Без кандидатура", "София"))
        .await
        .unwrap();
    ApplicationRepo::create(&pool, applied.id, professional, None)
        .await
        .unwrap();

    let query = TaskQuery::from_params(
        &TaskListParams {
            mode: Some("applications".into()),
            ..Default::default()
        },
        Some(professional),
    )
    .unwrap();
    let (items, total) = TaskRepo::search(&pool, &query).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, applied.id);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_urgency_and_neighborhood_filters(pool: PgPool) {
    let owner = customer(&pool).await;

    let mut urgent = new_task(owner, "Спешна", "София");
    urgent.is_urgent = true;
    urgent.neighborhood = Some("Лозенец".to_string());
    let urgent = TaskRepo::create(&pool, &urgent).await.unwrap();

    TaskRepo::create(&pool, &new_task(owner, "Спокойна", "София")).await.unwrap();

    let query = parse(TaskListParams {
        is_urgent: Some("true".into()),
        neighborhood: Some("Лозенец".into()),
        ..Default::default()
    });
    let (items, total) = TaskRepo::search(&pool, &query).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, urgent.id);
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_pagination_slices_and_total(pool: PgPool) {
    let owner = customer(&pool).await;
    for i in 0..5 {
        let task = TaskRepo::create(&pool, &new_task(owner, &format!("Задача {i}"), "София"))
            .await
            .unwrap();
        backdate(&pool, task.id, 10 - i).await;
    }

    let page2 = parse(TaskListParams {
        page: Some("2".into()),
        limit: Some("2".into()),
        ..Default::default()
    });
    let (items, total) = TaskRepo::search(&pool, &page2).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(total, 5, "total is unaffected by limit/offset");

    let info = PageInfo::new(page2.page, page2.limit, total);
    assert_eq!(info.total_pages, 3);
    assert!(info.has_next);
    assert!(info.has_previous);

    let page3 = parse(TaskListParams {
        page: Some("3".into()),
        limit: Some("2".into()),
        ..Default::default()
    });
    let (items, _) = TaskRepo::search(&pool, &page3).await.unwrap();
    assert_eq!(items.len(), 1);
}

// ---------------------------------------------------------------------------
// Full-text search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_fulltext_search_ranks_matches(pool: PgPool) {
    let owner = customer(&pool).await;
    TaskRepo::create(&pool, &new_task(owner, "Ремонт на баня", "София"))
        .await
        .unwrap();
    TaskRepo::create(&pool, &new_task(owner, "Почистване на апартамент", "София"))
        .await
        .unwrap();

    let rows = TaskRepo::search_fulltext(&pool, "ремонт", None, None, None, None)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Ремонт на баня");
    assert!(rows[0].rank > 0.0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_fulltext_search_respects_filters(pool: PgPool) {
    let owner = customer(&pool).await;
    TaskRepo::create(&pool, &new_task(owner, "Ремонт на баня", "София"))
        .await
        .unwrap();
    let mut varna = new_task(owner, "Ремонт на кухня", "Варна");
    varna.status = "completed".to_string();
    TaskRepo::create(&pool, &varna).await.unwrap();

    let rows = TaskRepo::search_fulltext(&pool, "ремонт", Some("open"), Some("София"), None, None)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].city, "София");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_fulltext_search_empty_query_is_empty(pool: PgPool) {
    let rows = TaskRepo::search_fulltext(&pool, "   ", None, None, None, None)
        .await
        .unwrap();
    assert!(rows.is_empty());
}
