use std::path::PathBuf;

use pretty_assertions::assert_eq;

use readroom::{
    domain::reading::{Group, Notification, Room, RoomStatus},
    infrastructure::fixture::FixtureFetcher,
    presentation::ListView,
    Identified, ListError, LoadKind, PageSize, PaginatedList,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn ids<T: Identified<Id = String>>(items: &[T]) -> Vec<String> {
    items.iter().map(Identified::id).collect()
}

#[tokio::test]
async fn test_rooms_page_through_to_the_end() {
    let fetcher = FixtureFetcher::<Room>::from_file(&fixture("rooms.json")).expect("fixture loads");
    let list = PaginatedList::new(fetcher, PageSize::DEFAULT);

    list.refresh().await.expect("refresh task");
    while list.state().has_more() {
        list.load_more().await.expect("load_more task");
    }

    let state = list.state();
    assert_eq!(ids(state.items()), vec!["r1", "r2", "r3", "r4"]);
    assert_eq!(state.error(), None);
    assert_eq!(state.items()[3].status, RoomStatus::Finished);
    assert_eq!(
        ListView::new().view(&state),
        vec![
            "Middlemarch (active)",
            "The Left Hand of Darkness (active)",
            "Piranesi (upcoming)",
            "Beloved (finished)",
            "End of list",
        ]
    );
}

#[tokio::test]
async fn test_filtered_fixture_is_a_single_page() {
    let fetcher = FixtureFetcher::<Room>::from_file(&fixture("rooms.upcoming.json"))
        .expect("fixture loads");
    let list = PaginatedList::new(fetcher, PageSize::DEFAULT);

    list.refresh().await.expect("refresh task");

    let state = list.state();
    assert_eq!(ids(state.items()), vec!["r3"]);
    assert!(state.is_exhausted());
}

#[tokio::test]
async fn test_scripted_network_failure_shows_retry_row() {
    let fetcher = FixtureFetcher::<Notification>::from_file(&fixture("notifications.json"))
        .expect("fixture loads");
    let list = PaginatedList::new(fetcher, PageSize::DEFAULT);

    list.refresh().await.expect("refresh task");
    list.load_more().await.expect("load_more task");

    let state = list.state();
    assert_eq!(ids(state.items()), vec!["n1", "n2"]);
    let error = state.error().expect("load-more failed");
    assert_eq!(error.kind, LoadKind::LoadMore);
    assert_eq!(
        error.cause,
        ListError::Network {
            reason: "connection reset".to_string()
        }
    );

    let lines = ListView::new().view(&state);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2], "network error: connection reset [retry]");
}

#[tokio::test]
async fn test_unknown_cursor_is_a_server_error() {
    let fetcher =
        FixtureFetcher::<Group>::from_file(&fixture("groups.json")).expect("fixture loads");
    let list = PaginatedList::new(fetcher, PageSize::DEFAULT);

    list.refresh().await.expect("refresh task");
    list.load_more().await.expect("load_more task");

    let state = list.state();
    assert_eq!(ids(state.items()), vec!["g1"]);
    assert!(matches!(
        state.error().map(|e| &e.cause),
        Some(ListError::Server {
            status: Some(404),
            ..
        })
    ));
    assert!(state.has_more());
}

#[test]
fn test_missing_fixture_file_is_reported() {
    let err = FixtureFetcher::<Room>::from_file(&fixture("missing.json"))
        .expect_err("file does not exist");
    assert!(format!("{err:?}").contains("missing.json"));
}
