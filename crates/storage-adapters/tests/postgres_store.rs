//! `PgThreadRepository` against a real PostgreSQL.
//!
//! Uses `DATABASE_URL` when set, otherwise starts a throwaway container.
//! Both need outside infrastructure, so the tests are ignored by default:
//! `cargo test -p storage-adapters --features db-postgres -- --ignored`

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use domains::{Reply, ReplyPatch, Thread, ThreadRepository, DELETED_TEXT};
use storage_adapters::PgThreadRepository;
use testcontainers_modules::postgres::Postgres;
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use testcontainers_modules::testcontainers::ContainerAsync;
use uuid::Uuid;

struct PgStore {
    repo: Arc<PgThreadRepository>,
    _node: Option<ContainerAsync<Postgres>>,
}

async fn store() -> PgStore {
    let (url, node) = match std::env::var("DATABASE_URL") {
        Ok(url) => (url, None),
        Err(_) => {
            let node = Postgres::default().start().await.expect("postgres container");
            let host = node.get_host().await.expect("container host");
            let port = node.get_host_port_ipv4(5432).await.expect("container port");
            let url = format!("postgres://postgres:postgres@{host}:{port}/postgres");
            (url, Some(node))
        }
    };
    let repo = PgThreadRepository::connect(&url, 5).await.expect("connect");
    repo.migrate().await.expect("migrate");
    PgStore {
        repo: Arc::new(repo),
        _node: node,
    }
}

/// A board no other run touches, so a shared database needs no cleanup.
fn fresh_board() -> String {
    format!("test-{}", Uuid::new_v4().simple())
}

fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

async fn seeded_thread(repo: &PgThreadRepository, board: &str, age_secs: i64) -> Thread {
    let thread = Thread::new(board, "op".into(), "pw".into(), now() - Duration::seconds(age_secs));
    repo.insert_thread(&thread).await.unwrap();
    thread
}

async fn append_texts(repo: &PgThreadRepository, board: &str, id: Uuid, count: usize) -> Thread {
    let start = now();
    let mut last = None;
    for i in 0..count {
        let at = start + Duration::milliseconds(i as i64);
        let reply = Reply::new(format!("r{i}"), "rpw".into(), at);
        last = repo.append_reply(board, id, &reply).await.unwrap();
    }
    last.expect("thread exists")
}

#[tokio::test]
#[ignore = "needs Docker or DATABASE_URL"]
async fn append_keeps_order_and_bumps() {
    let pg = store().await;
    let board = fresh_board();
    let thread = seeded_thread(&pg.repo, &board, 60).await;

    let updated = append_texts(&pg.repo, &board, thread.id, 5).await;
    let texts: Vec<&str> = updated.replies.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, ["r0", "r1", "r2", "r3", "r4"]);
    assert_eq!(updated.created_on, thread.created_on);
    assert_eq!(updated.bumped_on, updated.replies[4].created_on);

    let stored = pg.repo.find_thread(&board, thread.id).await.unwrap().unwrap();
    assert_eq!(stored.replies.len(), 5);
    assert_eq!(stored.bumped_on, updated.bumped_on);
    assert_eq!(stored.replies[0].delete_password, "rpw");
}

#[tokio::test]
#[ignore = "needs Docker or DATABASE_URL"]
async fn patch_touches_only_the_named_reply() {
    let pg = store().await;
    let board = fresh_board();
    let thread = seeded_thread(&pg.repo, &board, 0).await;
    let updated = append_texts(&pg.repo, &board, thread.id, 5).await;
    let redact = updated.replies[2].id;
    let report = updated.replies[3].id;

    assert!(pg.repo.patch_reply(&board, thread.id, redact, ReplyPatch::Redact).await.unwrap());
    for _ in 0..2 {
        assert!(pg.repo.patch_reply(&board, thread.id, report, ReplyPatch::Report).await.unwrap());
    }
    assert!(!pg.repo.patch_reply(&board, thread.id, Uuid::new_v4(), ReplyPatch::Redact).await.unwrap());
    assert!(!pg.repo.patch_reply("elsewhere", thread.id, redact, ReplyPatch::Report).await.unwrap());

    let stored = pg.repo.find_thread(&board, thread.id).await.unwrap().unwrap();
    let texts: Vec<&str> = stored.replies.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, ["r0", "r1", DELETED_TEXT, "r3", "r4"]);
    let reported: Vec<bool> = stored.replies.iter().map(|r| r.reported).collect();
    assert_eq!(reported, [false, false, false, true, false]);
    assert_eq!(stored.bumped_on, updated.bumped_on);
}

#[tokio::test]
#[ignore = "needs Docker or DATABASE_URL"]
async fn every_operation_is_scoped_to_its_board() {
    let pg = store().await;
    let board = fresh_board();
    let other = fresh_board();
    let thread = seeded_thread(&pg.repo, &board, 0).await;
    let reply = Reply::new("hi".into(), "rpw".into(), now());

    assert!(pg.repo.find_thread(&other, thread.id).await.unwrap().is_none());
    assert!(pg.repo.list_threads(&other, 10).await.unwrap().is_empty());
    assert!(!pg.repo.mark_thread_reported(&other, thread.id).await.unwrap());
    assert!(pg.repo.append_reply(&other, thread.id, &reply).await.unwrap().is_none());
    assert!(!pg.repo.delete_thread(&other, thread.id).await.unwrap());

    assert!(pg.repo.mark_thread_reported(&board, thread.id).await.unwrap());
    assert!(pg.repo.mark_thread_reported(&board, thread.id).await.unwrap());
    let stored = pg.repo.find_thread(&board, thread.id).await.unwrap().unwrap();
    assert!(stored.reported);
    assert!(stored.replies.is_empty());

    assert!(pg.repo.delete_thread(&board, thread.id).await.unwrap());
    assert!(!pg.repo.delete_thread(&board, thread.id).await.unwrap());
    assert!(pg.repo.find_thread(&board, thread.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "needs Docker or DATABASE_URL"]
async fn list_orders_by_bump_and_caps() {
    let pg = store().await;
    let board = fresh_board();
    let mut oldest = None;
    for age in 0..12 {
        oldest = Some(seeded_thread(&pg.repo, &board, age * 10).await);
    }
    let oldest = oldest.unwrap();

    let listed = pg.repo.list_threads(&board, 10).await.unwrap();
    assert_eq!(listed.len(), 10);
    assert!(listed.windows(2).all(|w| w[0].bumped_on >= w[1].bumped_on));
    assert!(listed.iter().all(|t| t.id != oldest.id));

    append_texts(&pg.repo, &board, oldest.id, 1).await;
    let listed = pg.repo.list_threads(&board, 10).await.unwrap();
    assert_eq!(listed[0].id, oldest.id);
}

#[tokio::test]
#[ignore = "needs Docker or DATABASE_URL"]
async fn concurrent_appends_are_all_kept() {
    let pg = store().await;
    let board = fresh_board();
    let thread = seeded_thread(&pg.repo, &board, 0).await;

    let mut handles = Vec::new();
    for i in 0..30 {
        let repo = pg.repo.clone();
        let board = board.clone();
        let id = thread.id;
        handles.push(tokio::spawn(async move {
            let reply = Reply::new(format!("r{i}"), "rpw".into(), now());
            repo.append_reply(&board, id, &reply).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let stored = pg.repo.find_thread(&board, thread.id).await.unwrap().unwrap();
    assert_eq!(stored.replies.len(), 30);
    let ids: HashSet<Uuid> = stored.replies.iter().map(|r| r.id).collect();
    assert_eq!(ids.len(), 30);
}
