mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use engine::{Category, CategoryFilter, Expense, ExpenseDraft, Filter, Money};
use spedilo_client::{AppContext, ClientError, ExpenseStore, View};
use tempfile::TempDir;

use common::MockApi;

async fn logged_in() -> (AppContext, Arc<MockApi>, TempDir) {
    let (base_url, api) = common::spawn().await;
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = AppContext::new(common::config(&base_url, &dir)).unwrap();
    ctx.start().await;
    ctx.login(common::credentials()).await.unwrap();
    (ctx, api, dir)
}

fn draft(category: &str, amount: &str, date: &str) -> ExpenseDraft {
    ExpenseDraft {
        category: category.to_string(),
        amount: amount.to_string(),
        date: date.to_string(),
        description: String::new(),
    }
}

#[tokio::test]
async fn create_is_followed_by_a_refetch() {
    let (mut ctx, api, _dir) = logged_in().await;
    let before = api.requests();

    ctx.add_expense(&draft("Food", "100", "2024-01-05"))
        .await
        .unwrap();

    // POST then GET.
    assert_eq!(api.requests(), before + 2);
    let items = ctx.expenses().items();
    assert_eq!(items.len(), 1);
    assert!(items[0].id.is_some());
    assert_eq!(items[0].category, Category::Food);
    assert_eq!(items[0].amount, Money::new(100_00));
    assert_eq!(
        items[0].date,
        Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn zero_amount_is_rejected_before_any_request() {
    let (mut ctx, api, _dir) = logged_in().await;
    let before = api.requests();

    let err = ctx
        .add_expense(&draft("Food", "0", "2024-01-05"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(api.requests(), before);
    assert!(api.stored().is_empty());
}

#[tokio::test]
async fn update_and_delete_resynchronize_the_cache() {
    let (mut ctx, api, _dir) = logged_in().await;
    let id = api.seed("Travel", 50.0, "2024-01-20T00:00:00.000Z");
    ctx.refresh().await.unwrap();
    assert_eq!(ctx.expenses().items().len(), 1);

    ctx.update_expense(&id, &draft("Shopping", "75.5", "2024-01-21"))
        .await
        .unwrap();
    let items = ctx.expenses().items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id.as_deref(), Some(id.as_str()));
    assert_eq!(items[0].category, Category::Shopping);
    assert_eq!(items[0].amount, Money::new(75_50));

    ctx.delete_expense(&id).await.unwrap();
    assert!(ctx.expenses().items().is_empty());
}

#[tokio::test]
async fn clearing_the_description_reaches_the_server() {
    let (mut ctx, api, _dir) = logged_in().await;
    let mut lunch = draft("Food", "120", "2024-01-05");
    lunch.description = "Lunch".to_string();
    ctx.add_expense(&lunch).await.unwrap();
    let id = ctx.expenses().items()[0].id.clone().unwrap();

    lunch.description = "   ".to_string();
    ctx.update_expense(&id, &lunch).await.unwrap();

    assert_eq!(api.stored()[0]["description"], "");
    assert_eq!(ctx.expenses().items()[0].description, None);
}

#[tokio::test]
async fn failed_mutation_keeps_the_last_good_list() {
    let (mut ctx, api, _dir) = logged_in().await;
    api.seed("Food", 10.0, "2024-01-05T00:00:00.000Z");
    ctx.refresh().await.unwrap();

    api.fail_next_write(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable");
    let err = ctx
        .add_expense(&draft("Food", "20", "2024-01-06"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Server(ref m) if m == "database unavailable"));
    assert_eq!(ctx.expenses().items().len(), 1);
    assert_eq!(ctx.expenses().error(), Some("database unavailable"));
    assert_eq!(ctx.view(), View::Dashboard);
}

#[tokio::test]
async fn missing_expense_uses_the_fallback_message() {
    let (mut ctx, _api, _dir) = logged_in().await;

    let err = ctx.delete_expense("nope").await.unwrap_err();

    assert!(matches!(err, ClientError::NotFound));
    assert_eq!(ctx.expenses().error(), Some("Failed to delete expense"));
}

#[tokio::test]
async fn unauthorized_response_logs_out_and_redirects() {
    let (mut ctx, api, dir) = logged_in().await;
    api.seed("Food", 10.0, "2024-01-05T00:00:00.000Z");
    ctx.refresh().await.unwrap();
    assert_eq!(ctx.navigate(View::Analytics), View::Analytics);

    api.revoke_tokens();
    let err = ctx.refresh().await.unwrap_err();

    assert!(matches!(err, ClientError::Unauthorized));
    assert_eq!(ctx.view(), View::Login);
    assert_eq!(ctx.session().token(), None);
    assert!(ctx.expenses().items().is_empty());
    assert!(!dir.path().join("state.json").exists());
}

#[tokio::test]
async fn unauthorized_on_auth_page_does_not_redirect() {
    let (mut ctx, api, dir) = logged_in().await;
    assert_eq!(ctx.navigate(View::Register), View::Register);

    api.revoke_tokens();
    let err = ctx.refresh().await.unwrap_err();

    assert!(matches!(err, ClientError::Unauthorized));
    assert_eq!(ctx.view(), View::Register);
    assert!(ctx.session().token().is_some());
    assert!(dir.path().join("state.json").exists());
}

#[tokio::test]
async fn update_without_id_fails_locally() {
    let (ctx, api, _dir) = logged_in().await;
    let before = api.requests();
    let api_client =
        spedilo_client::ApiClient::new(&ctx.config().base_url, Default::default()).unwrap();
    let mut store = ExpenseStore::new(api_client);

    let unsaved = Expense::new(
        Category::Food,
        Money::new(100),
        Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap(),
    )
    .unwrap();
    let err = store.update(ctx.session(), &unsaved).await.unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(store.error(), Some("expense has no id"));
    assert_eq!(api.requests(), before);
}

#[tokio::test]
async fn report_is_derived_from_the_fetched_list() {
    let (mut ctx, api, _dir) = logged_in().await;
    api.seed("Food", 100.0, "2024-01-05T00:00:00.000Z");
    api.seed("Travel", 50.0, "2024-01-20T00:00:00.000Z");
    api.seed("Food", 30.0, "2024-02-01T00:00:00.000Z");
    ctx.refresh().await.unwrap();

    let only_food = Filter {
        category: CategoryFilter::Only(Category::Food),
        ..Filter::default()
    };
    let report = ctx.report(&only_food);
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.summary.total, Money::new(130_00));
    assert_eq!(report.monthly.len(), 2);
    assert_eq!(report.categories, vec![Category::Food, Category::Travel]);

    let all = ctx.report(&Filter::default());
    let labels: Vec<_> = all
        .by_category
        .iter()
        .map(|t| (t.category.label().to_string(), t.total))
        .collect();
    assert_eq!(
        labels,
        vec![
            ("Food".to_string(), Money::new(130_00)),
            ("Travel".to_string(), Money::new(50_00)),
        ]
    );
}
