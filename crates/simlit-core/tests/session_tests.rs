//! Session lifecycle and notification polling.

use chrono::{Duration as ChronoDuration, Utc};
use simlit_core::test_harness::standard_cast;
use simlit_core::{AuthToken, ResearchGateway, Session, WorkflowClient};
use simlit_model::ProposalDraft;
use std::sync::Arc;
use std::time::Duration;

fn fresh_token() -> AuthToken {
    AuthToken::new("opaque-bearer", Utc::now() + ChronoDuration::hours(8))
}

#[tokio::test]
async fn poller_refreshes_the_feed_and_teardown_stops_it() {
    let cast = standard_cast();
    let client = WorkflowClient::new(Arc::clone(&cast.service));

    let mut session = Session::new(fresh_token(), cast.dosen_member.clone()).unwrap();
    session
        .start_polling(Arc::clone(&cast.service), Duration::from_millis(10))
        .await;

    // A proposal invitation lands in the member's feed.
    let draft = ProposalDraft {
        title: "Pengolahan Sampah Organik".into(),
        chief_researcher_id: Some(cast.chief.id),
        dosen_member_ids: vec![cast.dosen_member.id],
        student_member_ids: Vec::new(),
        execution_period: chrono::NaiveDate::from_ymd_opt(2026, 4, 1),
        funding_source: "Internal".into(),
        requested_amount: Some(8_000_000.0),
        research_outcome: "Laporan".into(),
        ..ProposalDraft::default()
    };
    client.create_proposal(&cast.chief, &draft).await.unwrap();

    // Give the poller a few ticks to observe it.
    let mut summary = session.notification_summary();
    for _ in 0..50 {
        if summary.total_unread > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        summary = session.notification_summary();
    }
    assert_eq!(summary.total_unread, 1);

    session.teardown().await;
    assert!(session.notifications().is_empty());

    // After teardown no tick can repopulate the feed.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(session.notifications().is_empty());
}

#[tokio::test]
async fn mark_read_is_confirmed_then_mirrored() {
    let cast = standard_cast();
    let client = WorkflowClient::new(Arc::clone(&cast.service));

    let draft = ProposalDraft {
        title: "Kajian Transportasi Publik".into(),
        chief_researcher_id: Some(cast.chief.id),
        dosen_member_ids: vec![cast.dosen_member.id],
        student_member_ids: Vec::new(),
        execution_period: chrono::NaiveDate::from_ymd_opt(2026, 4, 1),
        funding_source: "Internal".into(),
        requested_amount: Some(5_000_000.0),
        research_outcome: "Laporan".into(),
        ..ProposalDraft::default()
    };
    client.create_proposal(&cast.chief, &draft).await.unwrap();

    let feed = cast
        .service
        .fetch_notifications(cast.dosen_member.id)
        .await
        .unwrap();
    assert_eq!(feed.len(), 1);
    assert!(!feed[0].read);

    client.mark_notification_read(&feed[0]).await.unwrap();

    let feed = cast
        .service
        .fetch_notifications(cast.dosen_member.id)
        .await
        .unwrap();
    assert!(feed[0].read);
}

#[tokio::test]
async fn replacing_the_poller_stops_the_previous_one() {
    let cast = standard_cast();
    let mut session = Session::new(fresh_token(), cast.chief.clone()).unwrap();

    session
        .start_polling(Arc::clone(&cast.service), Duration::from_millis(10))
        .await;
    // Restart with a different period; the first loop must be gone.
    session
        .start_polling(Arc::clone(&cast.service), Duration::from_millis(20))
        .await;

    session.teardown().await;
}
