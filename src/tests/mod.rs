use crate::auth::{authenticate, DemoCredentials, Role};
use crate::filter::{FilterCriteria, FilterError, RecordView, RECORDS_PER_PAGE};
use crate::policy;
use crate::records::repository::{RecordSource, Repository, RECORDS_KEY};
use crate::records::{RawRecord, Record, Status};
use crate::session::{Session, SessionStore};
use crate::store::KvStore;

fn temp_store(name: &str) -> KvStore {
    let dir = std::env::temp_dir().join(format!("merisadak-scenario-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    KvStore::open(dir).unwrap()
}

fn record(id: i64, state: &str, status: &str) -> Record {
    Record::normalize(RawRecord {
        id,
        title: format!("record {id}"),
        state: Some(state.to_string()),
        status: Some(status.to_string()),
        date: Some("2024-01-01".to_string()),
        ..Default::default()
    })
}

fn login_as(sessions: &SessionStore, email: &str, password: &str) -> Session {
    let credential = authenticate(&DemoCredentials, email, password).unwrap();
    let session = Session::start(email, &credential);
    sessions.persist(&session).unwrap();
    session
}

#[test]
fn state_officer_never_sees_foreign_records_end_to_end() {
    let sessions = SessionStore::new(temp_store("state-officer"));
    login_as(&sessions, "state@rms.com", "state123");
    let session = sessions.restore().unwrap().unwrap();
    assert_eq!(session.role, Role::StateGovernment);

    let records = vec![
        record(1, "rajasthan", "open"),
        record(2, "gujarat", "open"),
        record(3, "rajasthan", "closed"),
        record(4, "gujarat", "closed"),
    ];

    // no facet, a matching facet, and a facet that asks for the foreign
    // state all yield only bound-state records
    for state_facet in [None, Some("rajasthan"), Some("gujarat")] {
        let mut view = RecordView::default();
        view.set_criteria(FilterCriteria {
            state: state_facet.map(|s| s.to_string()),
            ..Default::default()
        });
        let page = view.render(Some(&session), &records).unwrap();
        assert!(page.items.iter().all(|r| r.state == "rajasthan"));
        if state_facet == Some("gujarat") {
            assert_eq!(page.visible_count, 0);
        }
    }
}

#[test]
fn unauthenticated_viewer_is_redirected_with_nothing_rendered() {
    let records = vec![record(1, "goa", "open")];
    let mut view = RecordView::default();
    let err = view.render(None, &records).unwrap_err();
    assert_eq!(err, FilterError::AuthenticationRequired);
}

#[test]
fn public_demo_account_sees_every_state() {
    let sessions = SessionStore::new(temp_store("public"));
    let session = login_as(&sessions, "user@rms.com", "user123");
    assert_eq!(session.role, Role::User);
    assert_eq!(session.state, None);
    for state in ["rajasthan", "gujarat", "kerala", "ladakh"] {
        assert!(policy::can_see_state(Some(&session), state));
    }
    assert!(!policy::allows(Some(&session), policy::Capability::UploadData));
}

#[test]
fn switching_status_filter_back_to_all_resets_the_page() {
    let sessions = SessionStore::new(temp_store("page-reset"));
    let session = login_as(&sessions, "central@rms.com", "central123");

    let mut records: Vec<Record> = (1..=30).map(|id| record(id, "goa", "closed")).collect();
    records.extend((31..=40).map(|id| record(id, "goa", "open")));

    let mut view = RecordView::default();
    view.set_criteria(FilterCriteria {
        status: Some(Status::Closed),
        ..Default::default()
    });
    view.set_page(3);
    let page = view.render(Some(&session), &records).unwrap();
    assert_eq!(page.current_page, 3);
    assert_eq!(page.visible_count, 30);

    view.set_criteria(FilterCriteria::default());
    let page = view.render(Some(&session), &records).unwrap();
    assert_eq!(page.current_page, 1);
    assert_eq!(page.visible_count, 40);
    assert_eq!(page.total_pages, 5);
}

#[test]
fn all_pages_cover_the_visible_set_exactly_once() {
    let sessions = SessionStore::new(temp_store("coverage"));
    let session = login_as(&sessions, "central@rms.com", "central123");
    let records: Vec<Record> = (1..=31).map(|id| record(id, "goa", "open")).collect();

    let mut view = RecordView::default();
    let first = view.render(Some(&session), &records).unwrap();
    assert_eq!(first.total_pages, 4);

    let mut seen: Vec<i64> = Vec::new();
    for page_number in 1..=first.total_pages {
        view.set_page(page_number);
        let page = view.render(Some(&session), &records).unwrap();
        assert!(page.items.len() <= RECORDS_PER_PAGE);
        seen.extend(page.items.iter().map(|r| r.id));
    }
    assert_eq!(seen, (1..=31).collect::<Vec<i64>>());
}

#[test]
fn logout_destroys_the_durable_session() {
    let store = temp_store("logout");
    let sessions = SessionStore::new(store.clone());
    login_as(&sessions, "central@rms.com", "central123");
    assert!(sessions.restore().unwrap().is_some());
    sessions.clear().unwrap();
    assert!(sessions.restore().unwrap().is_none());
    assert_eq!(store.get("user").unwrap(), None);
    assert_eq!(store.get("role").unwrap(), None);
}

#[tokio::test]
async fn repository_serves_imported_records_from_the_cache() {
    let store = temp_store("repository-import");
    let repository = Repository::new(store.clone(), None);

    let path = std::env::temp_dir().join(format!(
        "merisadak-scenario-import-{}.json",
        std::process::id()
    ));
    std::fs::write(
        &path,
        r#"[
            {"id":1,"title":"Pothole cluster","state":"rajasthan","district":"jaipur","status":"open","priority":"high","date":"2024-03-01","type":"road-damage"},
            {"id":2,"title":"Bridge survey","state":"gujarat","district":"surat","status":"closed"}
        ]"#,
    )
    .unwrap();

    let imported = repository
        .replace_from_file(&path.to_string_lossy())
        .unwrap();
    assert_eq!(imported.len(), 2);

    let loaded = repository.load().await.unwrap();
    assert_eq!(loaded.source, RecordSource::Cache);
    assert_eq!(loaded.records, imported);

    // wholesale replacement, not a merge
    std::fs::write(&path, r#"[{"id":3,"title":"Resurfacing","state":"goa"}]"#).unwrap();
    let imported = repository
        .replace_from_file(&path.to_string_lossy())
        .unwrap();
    assert_eq!(imported.len(), 1);
    let loaded = repository.load().await.unwrap();
    assert_eq!(loaded.records.len(), 1);
    assert_eq!(loaded.records[0].id, 3);
}

#[tokio::test]
async fn corrupt_cache_is_dropped_rather_than_served() {
    let store = temp_store("repository-corrupt");
    store.set(RECORDS_KEY, "not json at all").unwrap();
    let repository = Repository::new(store.clone(), None);
    assert!(repository.load().await.is_err());
    assert_eq!(store.get(RECORDS_KEY).unwrap(), None);
}
