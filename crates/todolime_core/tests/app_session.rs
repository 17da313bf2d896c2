use todolime_core::{
    AppSession, AppView, AuthMode, FilterMode, IdentityGate, KeyValueStore, LocalIdentityGate,
    MemoryKeyValueStore, Priority,
};

fn new_session() -> (
    MemoryKeyValueStore,
    AppSession<LocalIdentityGate, MemoryKeyValueStore>,
) {
    let kv = MemoryKeyValueStore::new();
    let session = AppSession::new(LocalIdentityGate::new(), kv.clone());
    (kv, session)
}

#[test]
fn walks_landing_auth_tasks_and_back() {
    let (_kv, mut session) = new_session();
    assert_eq!(session.view(), AppView::Landing);
    assert!(session.tasks().is_none());

    session.start();
    assert_eq!(session.view(), AppView::Auth);

    session.set_auth_mode(AuthMode::Register);
    session.submit_auth("ada@example.com", "secret1").unwrap();
    assert_eq!(session.view(), AppView::Tasks);
    assert!(session.tasks().is_some());

    session.sign_out().unwrap();
    assert_eq!(session.view(), AppView::Auth);
    assert!(session.tasks().is_none());
    assert!(session.visible_tasks().is_empty());
}

#[test]
fn auth_failure_is_returned_verbatim_and_changes_nothing() {
    let (_kv, mut session) = new_session();
    session.start();

    let err = session.submit_auth("ada@example.com", "secret1").unwrap_err();
    assert_eq!(err.code, "auth/user-not-found");
    assert_eq!(
        err.message,
        "There is no user record corresponding to this identifier."
    );
    assert_eq!(session.view(), AppView::Auth);
    assert_eq!(session.auth_mode(), AuthMode::SignIn);
}

#[test]
fn reset_request_returns_to_sign_in_form() {
    let (_kv, mut session) = new_session();
    session.start();
    session.set_auth_mode(AuthMode::Register);
    session.submit_auth("ada@example.com", "secret1").unwrap();
    session.sign_out().unwrap();

    session.set_auth_mode(AuthMode::ResetPassword);
    session.submit_auth("ada@example.com", "").unwrap();
    assert_eq!(session.auth_mode(), AuthMode::SignIn);
    assert_eq!(session.view(), AppView::Auth);
    assert_eq!(session.gate().reset_requests().len(), 1);
}

#[test]
fn tasks_are_scoped_per_user() {
    let (kv, mut session) = new_session();
    session.start();

    session.set_auth_mode(AuthMode::Register);
    session.submit_auth("ada@example.com", "secret1").unwrap();
    let ada_uid = session.current_user().unwrap().uid.clone();
    session
        .tasks_mut()
        .unwrap()
        .add("ada's task", Priority::High)
        .unwrap();
    session.sign_out().unwrap();

    session.submit_auth("bob@example.com", "secret2").unwrap();
    assert!(session.tasks().unwrap().is_empty());
    session.sign_out().unwrap();

    session.set_auth_mode(AuthMode::SignIn);
    session.submit_auth("ada@example.com", "secret1").unwrap();
    let tasks = session.tasks().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks.tasks()[0].text, "ada's task");

    assert!(kv
        .get(&format!("todolime-tasks:{ada_uid}"))
        .unwrap()
        .is_some());
    assert!(kv.get("todolime-tasks").unwrap().is_none());
}

#[test]
fn picks_up_sign_in_made_directly_on_the_gate() {
    let gate = LocalIdentityGate::new();
    gate.register("ada@example.com", "secret1").unwrap();
    let session = AppSession::new(gate, MemoryKeyValueStore::new());

    assert_eq!(session.view(), AppView::Tasks);
    assert_eq!(session.current_user().unwrap().email, "ada@example.com");
}

#[test]
fn sync_reports_changes_from_external_sign_out() {
    let (_kv, mut session) = new_session();
    session.start();
    session.set_auth_mode(AuthMode::Register);
    session.submit_auth("ada@example.com", "secret1").unwrap();

    session.gate().sign_out().unwrap();
    assert_eq!(session.view(), AppView::Tasks);
    assert!(session.sync_auth_state());
    assert_eq!(session.view(), AppView::Auth);
    assert!(!session.sync_auth_state());
}

#[test]
fn visible_tasks_follow_the_selected_filter() {
    let (_kv, mut session) = new_session();
    session.start();
    session.set_auth_mode(AuthMode::Register);
    session.submit_auth("ada@example.com", "secret1").unwrap();

    let store = session.tasks_mut().unwrap();
    let milk = store.add("Buy milk", Priority::Low).unwrap();
    store.add("Call mom", Priority::High).unwrap();
    store.toggle_done(milk);

    session.set_filter(FilterMode::Done);
    let visible: Vec<&str> = session
        .visible_tasks()
        .into_iter()
        .map(|task| task.text.as_str())
        .collect();
    assert_eq!(visible, vec!["Buy milk"]);

    session.set_filter(FilterMode::Todo);
    assert_eq!(session.visible_tasks()[0].text, "Call mom");
}
