// SPDX-License-Identifier: MIT OR Apache-2.0

mod common;

use std::collections::BTreeSet;

use catsearch::config::SearchSettings;
use catsearch::errors::CatalogError;
use catsearch::model::{ContentType, FilterCriteria, ListingSort, SortMode};
use catsearch::search::filters::FilterField;
use catsearch::search::keyboard::NavKey;
use catsearch::search::{NoticeLevel, ResultView, SearchPage};
use common::{Call, FakeCatalog};

fn page_with(fake: &std::sync::Arc<FakeCatalog>, page_size: u32) -> SearchPage {
    let settings = SearchSettings {
        page_size,
        ..SearchSettings::default()
    };
    SearchPage::new(fake.clone(), settings)
}

fn ready_titles(view: &ResultView) -> Vec<String> {
    match view {
        ResultView::Ready(result) => result.entries.iter().map(|e| e.title.clone()).collect(),
        other => panic!("expected results, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_session_lists_newest_first() {
    let fake = FakeCatalog::seeded();
    let mut page = page_with(&fake, 20);

    page.refresh().await;

    assert_eq!(page.session().sort(), SortMode::Relevance);
    match fake.last_dispatch() {
        Some(Call::List(request)) => {
            assert_eq!(request.sort, ListingSort::Newest);
            assert_eq!(request.page, 1);
            assert_eq!(request.limit, 20);
        }
        other => panic!("expected listing request, got {other:?}"),
    }
    assert_eq!(ready_titles(page.view())[0], "Tokio internals");
}

#[tokio::test]
async fn committed_query_switches_to_search_with_scores() {
    let fake = FakeCatalog::seeded();
    let mut page = page_with(&fake, 20);

    page.commit_query("rust async").await;

    match fake.last_dispatch() {
        Some(Call::Search(request)) => {
            assert_eq!(request.q, "rust async");
            assert_eq!(request.filters, None);
            assert_eq!(request.sort, SortMode::Relevance);
        }
        other => panic!("expected search request, got {other:?}"),
    }
    match page.view() {
        ResultView::Ready(result) => {
            assert_eq!(result.entries.len(), 1);
            assert!(result.relevance_for("e1").is_some());
        }
        other => panic!("expected results, got {other:?}"),
    }
}

#[tokio::test]
async fn loading_saved_filter_replaces_active_criteria() {
    let fake = FakeCatalog::seeded();
    let saved_id = fake.insert_saved(
        "tag x",
        FilterCriteria {
            tags: BTreeSet::from(["x".to_string()]),
            ..Default::default()
        },
    );
    let mut page = page_with(&fake, 20);
    page.toggle_content_type(ContentType::Link).await;
    page.load_saved_filters().await.expect("list saved");

    page.load_saved_filter(&saved_id).await.expect("load saved");

    let expected = FilterCriteria {
        tags: BTreeSet::from(["x".to_string()]),
        ..Default::default()
    };
    assert_eq!(page.filters().criteria(), &expected);
    assert_eq!(page.session().filters(), &expected);
    let notices = page.take_notices();
    assert_eq!(notices.last().map(|n| n.level), Some(NoticeLevel::Success));
    assert_eq!(notices.last().map(|n| n.message.as_str()), Some("Loaded filter: tag x"));
}

#[tokio::test]
async fn filter_change_resets_page_but_page_change_keeps_filters() {
    let fake = FakeCatalog::seeded();
    let mut page = page_with(&fake, 1);
    page.toggle_content_type(ContentType::Link).await;

    page.goto_page(3).await;
    assert_eq!(page.session().page(), 3);
    assert_eq!(page.filters().criteria().content_type, Some(ContentType::Link));
    assert_eq!(page.session().filters().content_type, Some(ContentType::Link));

    page.toggle_has_url().await;
    assert_eq!(page.session().page(), 1);

    page.goto_page(2).await;
    page.set_sort(SortMode::Oldest).await;
    assert_eq!(page.session().page(), 1);

    page.goto_page(2).await;
    page.commit_query("go").await;
    assert_eq!(page.session().page(), 1);
}

#[tokio::test]
async fn unchanged_state_is_not_dispatched_again() {
    let fake = FakeCatalog::seeded();
    let mut page = page_with(&fake, 20);
    page.commit_query("rust").await;
    fake.clear_calls();

    page.commit_query("rust").await;
    page.set_filter(FilterField::HasSummary(false)).await;
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn next_page_is_ignored_on_last_page() {
    let fake = FakeCatalog::seeded();
    let mut page = page_with(&fake, 2);
    page.refresh().await;
    assert_eq!(page.pagination_controls(), (false, true));

    page.next_page().await;
    page.next_page().await;
    assert_eq!(page.session().page(), 3);
    assert_eq!(page.pagination_controls(), (true, false));

    page.next_page().await;
    assert_eq!(page.session().page(), 3);

    page.previous_page().await;
    assert_eq!(page.session().page(), 2);
}

#[tokio::test]
async fn clearing_history_empties_list_and_refetch_returns_nothing() {
    let fake = FakeCatalog::seeded();
    let mut page = page_with(&fake, 20);
    page.commit_query("rust").await;
    page.commit_query("go").await;

    page.load_history().await.expect("history");
    let queries: Vec<&str> = page.history().records().iter().map(|r| r.query.as_str()).collect();
    assert_eq!(queries, vec!["go", "rust"]);

    page.clear_history().await.expect("clear");
    assert!(page.history().records().is_empty());

    page.load_history().await.expect("history");
    assert!(page.history().records().is_empty());
    assert_eq!(fake.history_len(), 0);
}

#[tokio::test]
async fn failed_history_clear_keeps_local_records() {
    let fake = FakeCatalog::seeded();
    let mut page = page_with(&fake, 20);
    page.commit_query("rust").await;
    page.load_history().await.expect("history");

    fake.fail("clear_search_history");
    assert!(page.clear_history().await.is_err());
    assert_eq!(page.history().records().len(), 1);
    let notices = page.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
}

#[tokio::test]
async fn replaying_history_restores_query_only() {
    let fake = FakeCatalog::seeded();
    let mut page = page_with(&fake, 20);
    page.commit_query("tokio").await;
    page.load_history().await.expect("history");

    page.clear_query().await;
    page.toggle_content_type(ContentType::Note).await;
    page.set_sort(SortMode::Oldest).await;

    let replayed = page.replay_history(0).await;
    assert_eq!(replayed.as_deref(), Some("tokio"));
    assert_eq!(page.session().query(), "tokio");
    assert_eq!(page.bar().query().raw, "tokio");
    assert_eq!(page.session().filters().content_type, Some(ContentType::Note));
    assert_eq!(page.session().sort(), SortMode::Oldest);

    assert_eq!(page.replay_history(5).await, None);
}

#[tokio::test]
async fn blank_filter_name_is_rejected_before_any_request() {
    let fake = FakeCatalog::seeded();
    let mut page = page_with(&fake, 20);
    page.toggle_tag("t1").await;
    fake.clear_calls();

    let err = page.save_filters("   ").await.expect_err("blank name");
    assert!(matches!(err, CatalogError::Validation(_)));
    assert!(fake.calls().is_empty());
    assert!(page.saved().filters().is_empty());
    assert_eq!(page.take_notices()[0].message, "Please enter a filter name");
}

#[tokio::test]
async fn saved_filter_snapshot_is_not_affected_by_later_edits() {
    let fake = FakeCatalog::seeded();
    let mut page = page_with(&fake, 20);
    page.toggle_tag("t1").await;

    let created = page.save_filters("  Tagged  ").await.expect("save");
    assert_eq!(created.name, "Tagged");
    assert_eq!(page.saved().filters().len(), 1);

    page.toggle_tag("t2").await;
    page.toggle_has_summary().await;

    assert_eq!(
        page.saved().filters()[0].criteria.tags,
        BTreeSet::from(["t1".to_string()])
    );
    assert!(!page.saved().filters()[0].criteria.has_summary);
}

#[tokio::test]
async fn failed_save_and_delete_leave_registry_unchanged() {
    let fake = FakeCatalog::seeded();
    fake.insert_saved("existing", FilterCriteria::default());
    let mut page = page_with(&fake, 20);
    page.load_saved_filters().await.expect("list");
    let before = page.saved().filters().to_vec();

    fake.fail("create_saved_filter");
    let err = page.save_filters("new").await.expect_err("server failure");
    assert!(matches!(err, CatalogError::Network { .. }));
    assert_eq!(page.saved().filters(), before.as_slice());
    assert_eq!(fake.saved_len(), 1);

    fake.fail("delete_saved_filter");
    assert!(page.delete_saved_filter(&before[0].id).await.is_err());
    assert_eq!(page.saved().filters(), before.as_slice());

    let levels: Vec<NoticeLevel> = page.take_notices().iter().map(|n| n.level).collect();
    assert_eq!(levels, vec![NoticeLevel::Error, NoticeLevel::Error]);
}

#[tokio::test]
async fn deleting_missing_filter_reports_not_found() {
    let fake = FakeCatalog::seeded();
    let mut page = page_with(&fake, 20);
    let err = page.delete_saved_filter("gone").await.expect_err("missing");
    assert!(matches!(err, CatalogError::NotFound { .. }));
}

#[tokio::test]
async fn dispatch_failure_is_distinct_from_empty_results() {
    let fake = FakeCatalog::seeded();
    let mut page = page_with(&fake, 20);

    page.commit_query("nothing matches this").await;
    match page.view() {
        ResultView::Ready(result) => assert!(result.entries.is_empty()),
        other => panic!("expected empty results, got {other:?}"),
    }

    fake.fail("search_entries");
    page.commit_query("rust").await;
    assert!(matches!(page.view(), ResultView::Failed(_)));
}

#[tokio::test]
async fn enter_commits_raw_text_and_clear_returns_to_listing() {
    let fake = FakeCatalog::seeded();
    let mut page = page_with(&fake, 20);

    page.bar_mut().input("  go  ");
    assert_eq!(page.key(NavKey::Enter).await.as_deref(), Some("go"));
    assert!(matches!(fake.last_dispatch(), Some(Call::Search(_))));
    assert_eq!(ready_titles(page.view()), vec!["Go Concurrency"]);

    page.clear_query().await;
    assert_eq!(page.bar().query().raw, "");
    assert!(matches!(fake.last_dispatch(), Some(Call::List(_))));
}

#[tokio::test]
async fn clear_all_resets_everything() {
    let fake = FakeCatalog::seeded();
    let mut page = page_with(&fake, 1);
    page.commit_query("rust").await;
    page.toggle_content_type(ContentType::Repo).await;
    page.set_sort(SortMode::Newest).await;

    page.clear_all().await;
    assert_eq!(page.session().query(), "");
    assert!(page.session().filters().is_empty());
    assert_eq!(page.session().sort(), SortMode::Relevance);
    assert_eq!(page.session().page(), 1);
    assert!(!page.filters().has_active());
}

#[tokio::test]
async fn same_query_is_dispatched_again_after_a_failure() {
    let fake = FakeCatalog::seeded();
    let mut page = page_with(&fake, 20);

    fake.fail("search_entries");
    page.commit_query("rust").await;
    assert!(matches!(page.view(), ResultView::Failed(_)));

    fake.recover("search_entries");
    fake.clear_calls();
    page.bar_mut().input("rust");
    assert_eq!(page.key(NavKey::Enter).await.as_deref(), Some("rust"));

    assert!(matches!(fake.last_dispatch(), Some(Call::Search(_))));
    assert_eq!(
        ready_titles(page.view()),
        vec!["Notes on async rust", "rust-lang/rust", "Rust Async Runtime"]
    );

    fake.clear_calls();
    page.commit_query("rust").await;
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn refresh_retries_after_failure_without_state_change() {
    let fake = FakeCatalog::seeded();
    let mut page = page_with(&fake, 20);

    fake.fail("list_entries");
    page.refresh().await;
    assert!(matches!(page.view(), ResultView::Failed(_)));

    fake.recover("list_entries");
    page.set_sort(SortMode::Relevance).await;
    assert!(matches!(page.view(), ResultView::Ready(_)));
}

#[tokio::test]
async fn unmount_resets_page_to_idle() {
    let fake = FakeCatalog::seeded();
    let mut page = page_with(&fake, 20);
    page.commit_query("rust").await;
    page.toggle_has_url().await;

    page.unmount();
    assert_eq!(page.view(), &ResultView::Idle);
    assert_eq!(page.session().query(), "");
    assert!(!page.filters().has_active());
}
