//! API Integration Tests
//!
//! Run against the in-process backends; no external services needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use axum::http::{Method, StatusCode};
use integration_tests::{
    build_request, dispatch, fixtures::*, test_config, wired_router, TestApp, TestResponse,
};
use serde_json::json;
use streak_core::traits::LeaderboardIndex;
use tower::ServiceExt;

async fn register(app: &TestApp, req: RegisterUser) -> UserRecordBody {
    app.post("/api/v1/users", &req)
        .await
        .unwrap()
        .json(StatusCode::CREATED)
        .unwrap()
}

async fn checkin(app: &TestApp, username: &str) -> TestResponse {
    app.post_empty(&format!("/api/v1/checkins/{username}"))
        .await
        .unwrap()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().unwrap();
    let response = app.get("/health").await.unwrap();
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "status": "ok" }));
    assert!(response.request_id.is_some());
}

#[tokio::test]
async fn test_production_wiring_in_memory_mode() {
    let router = wired_router().await.unwrap();
    let request = axum::http::Request::builder()
        .uri("/health")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn test_register_user() {
    let app = TestApp::new().unwrap();
    let user = register(&app, RegisterUser::named("alice").with_xp(40)).await;

    assert_eq!(user.username, "alice");
    assert_eq!(user.xp, 40);
    assert_eq!(user.streak, 0);
    assert!(user.last_checkin.is_none());
    assert_eq!(app.stream.len(), 1);
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = TestApp::new().unwrap();
    register(&app, RegisterUser::named("alice")).await;

    let response = app
        .post("/api/v1/users", &RegisterUser::named("alice"))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), Some("DUPLICATE_USERNAME"));
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new().unwrap();

    let response = app.post("/api/v1/users", &RegisterUser::named("")).await.unwrap();
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some("VALIDATION_ERROR"));
    assert!(response.body["error"]["details"]["username"].is_array());

    let response = app
        .post("/api/v1/users", &RegisterUser::unique().with_xp(-5))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app.post_raw("/api/v1/users", "{not json").await.unwrap();
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some("INVALID_BODY"));
}

#[tokio::test]
async fn test_get_update_delete_user() {
    let app = TestApp::new().unwrap();
    let user = register(&app, RegisterUser::unique()).await;
    let path = format!("/api/v1/users/{}", user.id);

    let fetched: UserRecordBody = app.get(&path).await.unwrap().json(StatusCode::OK).unwrap();
    assert_eq!(fetched.username, user.username);

    let sync = SyncUser {
        xp: Some(300),
        streak: Some(4),
        ..Default::default()
    };
    let updated: UserRecordBody = app.put(&path, &sync).await.unwrap().json(StatusCode::OK).unwrap();
    assert_eq!((updated.xp, updated.streak, updated.max_streak), (300, 4, 4));

    let removed: UserRecordBody = app.delete(&path).await.unwrap().json(StatusCode::OK).unwrap();
    assert_eq!(removed.id, user.id);

    let response = app.get(&path).await.unwrap();
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), Some("UNKNOWN_USER"));
}

#[tokio::test]
async fn test_update_user_rejects_negative_counters() {
    let app = TestApp::new().unwrap();
    let user = register(&app, RegisterUser::unique()).await;

    let sync = SyncUser {
        frozen_days: Some(-1),
        ..Default::default()
    };
    let response = app
        .put(&format!("/api/v1/users/{}", user.id), &sync)
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_user_id_path() {
    let app = TestApp::new().unwrap();
    let response = app.get("/api/v1/users/not-a-number").await.unwrap();
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some("INVALID_PATH_PARAMETER"));
}

#[tokio::test]
async fn test_seed_users() {
    let app = TestApp::new().unwrap();

    let users: Vec<UserRecordBody> = app
        .post_empty("/api/v1/users/seed/5")
        .await
        .unwrap()
        .json(StatusCode::CREATED)
        .unwrap();
    assert_eq!(users.len(), 5);
    assert!(users.iter().all(|u| u.xp >= 10 && u.xp <= 1000 && u.xp % 10 == 0));

    // Existing usernames are skipped on a second run
    let again: Vec<UserRecordBody> = app
        .post_empty("/api/v1/users/seed/6")
        .await
        .unwrap()
        .json(StatusCode::CREATED)
        .unwrap();
    assert_eq!(again.len(), 1);
    assert_eq!(again[0].username, "user6");

    let response = app.post_empty("/api/v1/users/seed/0").await.unwrap();
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Check-ins
// ============================================================================

#[tokio::test]
async fn test_checkin_streak_progression() {
    let app = TestApp::new().unwrap();
    register(&app, RegisterUser::named("alice")).await;

    let first: UserRecordBody = checkin(&app, "alice").await.json(StatusCode::OK).unwrap();
    assert_eq!((first.xp, first.streak), (10, 1));
    assert_eq!(first.last_checkin, Some(day(1)));

    app.clock.set_today(day(2));
    let second: UserRecordBody = checkin(&app, "alice").await.json(StatusCode::OK).unwrap();
    assert_eq!((second.xp, second.streak, second.max_streak), (20, 2, 2));

    let repeat = checkin(&app, "alice").await;
    assert_eq!(repeat.status, StatusCode::CONFLICT);
    assert_eq!(repeat.error_code(), Some("ALREADY_CHECKED_IN"));
}

#[tokio::test]
async fn test_checkin_frozen_days_and_reset() {
    let app = TestApp::new().unwrap();
    register(&app, RegisterUser::named("bob").with_frozen_days(2)).await;
    register(&app, RegisterUser::named("carol")).await;

    checkin(&app, "bob").await.json::<UserRecordBody>(StatusCode::OK).unwrap();
    checkin(&app, "carol").await.json::<UserRecordBody>(StatusCode::OK).unwrap();

    app.clock.set_today(day(4));
    let bob: UserRecordBody = checkin(&app, "bob").await.json(StatusCode::OK).unwrap();
    assert_eq!((bob.streak, bob.frozen_days), (2, 0));

    let carol: UserRecordBody = checkin(&app, "carol").await.json(StatusCode::OK).unwrap();
    assert_eq!((carol.streak, carol.max_streak, carol.xp), (1, 1, 20));
}

#[tokio::test]
async fn test_checkin_rejections() {
    let app = TestApp::new().unwrap();

    let unknown = checkin(&app, "ghost").await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown.error_code(), Some("UNKNOWN_USER"));

    register(&app, RegisterUser::named("dave")).await;
    app.clock.set_today(day(10));
    checkin(&app, "dave").await.json::<UserRecordBody>(StatusCode::OK).unwrap();

    app.clock.set_today(day(9));
    let backdated = checkin(&app, "dave").await;
    assert_eq!(backdated.status, StatusCode::BAD_REQUEST);
    assert_eq!(backdated.error_code(), Some("INVALID_DATE"));
}

#[tokio::test]
async fn test_concurrent_checkins_accept_exactly_one() {
    let app = TestApp::new().unwrap();
    let user = register(&app, RegisterUser::named("erin")).await;

    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let router = app.router.clone();
            tokio::spawn(async move {
                let request =
                    build_request(Method::POST, "/api/v1/checkins/erin", None::<&()>).unwrap();
                dispatch(router, request).await.unwrap()
            })
        })
        .collect();

    let mut accepted = 0;
    let mut conflicts = 0;
    for task in tasks {
        let response = task.await.unwrap();
        match response.status {
            StatusCode::OK => accepted += 1,
            StatusCode::CONFLICT => {
                assert_eq!(response.error_code(), Some("ALREADY_CHECKED_IN"));
                conflicts += 1;
            }
            other => panic!("unexpected status {other}: {}", response.body),
        }
    }
    assert_eq!((accepted, conflicts), (1, 9));

    let stored: UserRecordBody = app
        .get(&format!("/api/v1/users/{}", user.id))
        .await
        .unwrap()
        .json(StatusCode::OK)
        .unwrap();
    assert_eq!((stored.xp, stored.streak), (10, 1));
    assert_eq!(app.stream.len(), 2);
}

// ============================================================================
// Leaderboard
// ============================================================================

#[tokio::test]
async fn test_leaderboard_empty() {
    let app = TestApp::new().unwrap();
    let response = app.get("/api/v1/leaderboard").await.unwrap();
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), Some("EMPTY_LEADERBOARD"));
}

#[tokio::test]
async fn test_leaderboard_top_and_rank() {
    let app = TestApp::new().unwrap();
    let low = register(&app, RegisterUser::named("low").with_xp(50)).await;
    let high = register(&app, RegisterUser::named("high").with_xp(100)).await;
    register(&app, RegisterUser::named("mid").with_xp(70)).await;

    let rows: Vec<LeaderboardRow> = app
        .get("/api/v1/leaderboard?limit=2")
        .await
        .unwrap()
        .json(StatusCode::OK)
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!((rows[0].rank, rows[0].user_id, rows[0].xp), (1, high.id, 100));
    assert_eq!((rows[1].rank, rows[1].xp), (2, 70));

    let by_id: RankBody = app
        .get(&format!("/api/v1/leaderboard/users/{}", low.id))
        .await
        .unwrap()
        .json(StatusCode::OK)
        .unwrap();
    assert_eq!((by_id.rank, by_id.xp), (3, 50));

    let by_name: RankBody = app
        .get("/api/v1/leaderboard/usernames/high")
        .await
        .unwrap()
        .json(StatusCode::OK)
        .unwrap();
    assert_eq!((by_name.user_id, by_name.rank), (high.id, 1));
}

#[tokio::test]
async fn test_leaderboard_rank_misses() {
    let app = TestApp::new().unwrap();
    register(&app, RegisterUser::unique()).await;

    let response = app.get("/api/v1/leaderboard/users/999").await.unwrap();
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), Some("UNKNOWN_MEMBER"));

    let response = app.get("/api/v1/leaderboard/usernames/nobody").await.unwrap();
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), Some("UNKNOWN_USER"));
}

#[tokio::test]
async fn test_leaderboard_limit_handling() {
    let config = test_config(&[
        ("LEADERBOARD_DEFAULT_LIMIT", "2"),
        ("LEADERBOARD_MAX_LIMIT", "3"),
    ])
    .unwrap();
    let app = TestApp::with_config(config).unwrap();
    for _ in 0..5 {
        register(&app, RegisterUser::unique().with_xp(10)).await;
    }

    let rows: Vec<LeaderboardRow> = app.get("/api/v1/leaderboard").await.unwrap().json(StatusCode::OK).unwrap();
    assert_eq!(rows.len(), 2);

    let rows: Vec<LeaderboardRow> = app
        .get("/api/v1/leaderboard?limit=50")
        .await
        .unwrap()
        .json(StatusCode::OK)
        .unwrap();
    assert_eq!(rows.len(), 3);

    let response = app.get("/api/v1/leaderboard?limit=0").await.unwrap();
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app.get("/api/v1/leaderboard?limit=lots").await.unwrap();
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some("INVALID_QUERY_PARAMETER"));
}

#[tokio::test]
async fn test_checkin_moves_rank() {
    let app = TestApp::new().unwrap();
    let leader = register(&app, RegisterUser::named("leader").with_xp(15)).await;
    let chaser = register(&app, RegisterUser::named("chaser").with_xp(10)).await;

    checkin(&app, "chaser").await.json::<UserRecordBody>(StatusCode::OK).unwrap();

    let rows: Vec<LeaderboardRow> = app.get("/api/v1/leaderboard").await.unwrap().json(StatusCode::OK).unwrap();
    assert_eq!(rows[0].user_id, chaser.id);
    assert_eq!(rows[0].xp, 20);
    assert_eq!(rows[1].user_id, leader.id);
}

#[tokio::test]
async fn test_sync_rebuild_and_replay_repair_drift() {
    let app = TestApp::new().unwrap();
    let alice = register(&app, RegisterUser::named("alice").with_xp(30)).await;
    let bob = register(&app, RegisterUser::named("bob")).await;
    checkin(&app, "bob").await.json::<UserRecordBody>(StatusCode::OK).unwrap();

    // Sync re-projects every record
    app.index.clear().await.unwrap();
    let synced = app.post_empty("/api/v1/users/sync").await.unwrap();
    assert_eq!(synced.status, StatusCode::OK);
    assert_eq!(synced.body, json!({ "synced": 2 }));
    assert_eq!(app.index.len().await.unwrap(), 2);

    // Rebuild reloads from the record store
    app.index.upsert(streak_core::UserId::new(alice.id), 9999).await.unwrap();
    let rebuilt = app.post_empty("/api/v1/leaderboard/rebuild").await.unwrap();
    assert_eq!(rebuilt.body, json!({ "rebuilt": 2 }));
    let rank: RankBody = app
        .get(&format!("/api/v1/leaderboard/users/{}", alice.id))
        .await
        .unwrap()
        .json(StatusCode::OK)
        .unwrap();
    assert_eq!(rank.xp, 30);

    // Replay folds the stream, last event per member wins
    app.index.clear().await.unwrap();
    let replayed = app.post_empty("/api/v1/leaderboard/replay").await.unwrap();
    assert_eq!(replayed.status, StatusCode::OK);
    assert_eq!(replayed.body["members"], 2);
    assert_eq!(replayed.body["events"], app.stream.len());
    let rank: RankBody = app
        .get(&format!("/api/v1/leaderboard/users/{}", bob.id))
        .await
        .unwrap()
        .json(StatusCode::OK)
        .unwrap();
    assert_eq!(rank.xp, 10);
}

#[tokio::test]
async fn test_delete_removes_from_leaderboard() {
    let app = TestApp::new().unwrap();
    let user = register(&app, RegisterUser::unique().with_xp(80)).await;
    register(&app, RegisterUser::unique().with_xp(20)).await;

    app.delete(&format!("/api/v1/users/{}", user.id))
        .await
        .unwrap()
        .json::<UserRecordBody>(StatusCode::OK)
        .unwrap();

    let response = app
        .get(&format!("/api/v1/leaderboard/users/{}", user.id))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_replay_does_not_restore_deleted_user() {
    let app = TestApp::new().unwrap();
    let gone = register(&app, RegisterUser::unique().with_xp(80)).await;
    let kept = register(&app, RegisterUser::unique().with_xp(20)).await;

    let response = app.delete(&format!("/api/v1/users/{}", gone.id)).await.unwrap();
    assert_eq!(response.status, StatusCode::OK);

    let replayed = app.post_empty("/api/v1/leaderboard/replay").await.unwrap();
    assert_eq!(replayed.status, StatusCode::OK);
    assert_eq!(replayed.body["events"], 2);
    assert_eq!(replayed.body["members"], 1);

    let response = app
        .get(&format!("/api/v1/leaderboard/users/{}", gone.id))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    let rank: RankBody = app
        .get(&format!("/api/v1/leaderboard/users/{}", kept.id))
        .await
        .unwrap()
        .json(StatusCode::OK)
        .unwrap();
    assert_eq!(rank.rank, 1);
}
