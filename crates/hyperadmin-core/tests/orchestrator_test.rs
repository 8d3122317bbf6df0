// Scenario tests for the selection cascade and user/message operations,
// driven through a scripted in-memory transport.
#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::future::Future;
use std::io::Write;
use std::sync::{Arc, Mutex, OnceLock};

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tokio::sync::{Notify, watch};
use url::Url;

use hyperadmin_api::{ApiRequest, ApiResponse, Error, Method, Transport};
use hyperadmin_core::{
    AdminClient, ClientConfig, CoreError, FormAction, FormModel, FormSlot, ListEntry, MessageList,
    Notice, Presenter, SelectionState, UnregisteredPolicy,
};

const COLLECTION_JSON: &str = "application/vnd.collection+json";
const HAL_JSON: &str = "application/hal+json";

// ── Helpers ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct Route {
    status: u16,
    content_type: &'static str,
    body: String,
    location: Option<String>,
}

/// Blocks a URL's response until released.
#[derive(Default)]
struct Gate {
    arrived: Notify,
    release: Notify,
}

#[derive(Default)]
struct Script {
    routes: Mutex<HashMap<(&'static str, String), Route>>,
    gates: Mutex<HashMap<String, Arc<Gate>>>,
    log: Mutex<Vec<(&'static str, String)>>,
}

#[derive(Clone, Default)]
struct ScriptedTransport(Arc<Script>);

impl ScriptedTransport {
    fn route(&self, method: Method, url: &str, status: u16, content_type: &'static str, body: &Value) {
        self.0.routes.lock().unwrap().insert(
            (method.as_str(), url.to_owned()),
            Route {
                status,
                content_type,
                body: body.to_string(),
                location: None,
            },
        );
    }

    fn hal(&self, url: &str, body: &Value) {
        self.route(Method::Get, url, 200, HAL_JSON, body);
    }

    fn collection(&self, url: &str, body: &Value) {
        self.route(Method::Get, url, 200, COLLECTION_JSON, body);
    }

    fn fail(&self, method: Method, url: &str, status: u16, message: &str) {
        self.route(
            method,
            url,
            status,
            "application/json",
            &json!({"title": "Error", "message": message, "resource_url": url}),
        );
    }

    fn created(&self, url: &str, location: &str) {
        self.0.routes.lock().unwrap().insert(
            (Method::Post.as_str(), url.to_owned()),
            Route {
                status: 201,
                content_type: "",
                body: String::new(),
                location: Some(location.to_owned()),
            },
        );
    }

    fn no_content(&self, method: Method, url: &str) {
        self.0.routes.lock().unwrap().insert(
            (method.as_str(), url.to_owned()),
            Route {
                status: 204,
                content_type: "",
                body: String::new(),
                location: None,
            },
        );
    }

    fn gate(&self, url: &str) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        self.0
            .gates
            .lock()
            .unwrap()
            .insert(url.to_owned(), Arc::clone(&gate));
        gate
    }

    fn requests(&self) -> Vec<(&'static str, String)> {
        self.0.log.lock().unwrap().clone()
    }

    fn requested(&self, method: Method, url: &str) -> bool {
        self.requests()
            .iter()
            .any(|(m, u)| *m == method.as_str() && u == url)
    }
}

impl Transport for ScriptedTransport {
    fn request(&self, request: ApiRequest) -> impl Future<Output = Result<ApiResponse, Error>> + Send {
        let script = Arc::clone(&self.0);
        async move {
            let key = (request.method.as_str(), request.url.clone());
            script.log.lock().unwrap().push(key.clone());

            let gate = script.gates.lock().unwrap().get(&request.url).cloned();
            if let Some(gate) = gate {
                gate.arrived.notify_one();
                gate.release.notified().await;
            }

            let route = script.routes.lock().unwrap().get(&key).cloned();
            let Some(route) = route else {
                return Err(Error::Status {
                    url: request.url,
                    status: 404,
                    message: Some("Resource not found".into()),
                });
            };
            if route.status >= 400 {
                let message = serde_json::from_str::<Value>(&route.body)
                    .ok()
                    .and_then(|v| v["message"].as_str().map(str::to_owned));
                return Err(Error::Status {
                    url: request.url,
                    status: route.status,
                    message,
                });
            }
            Ok(ApiResponse {
                url: request.url,
                status: route.status,
                location: route.location,
                content_type: (!route.content_type.is_empty()).then(|| route.content_type.to_owned()),
                body: route.body,
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Rendered {
    List(Vec<ListEntry>),
    Form(FormSlot, FormModel),
    Messages(MessageList),
    Notice(Notice),
    Cleared,
}

#[derive(Default)]
struct RecordingPresenter {
    events: Mutex<Vec<Rendered>>,
    /// When set, the selection state is recorded alongside every notice.
    states: OnceLock<watch::Receiver<SelectionState>>,
    notice_states: Mutex<Vec<&'static str>>,
}

impl RecordingPresenter {
    fn observe(&self, states: watch::Receiver<SelectionState>) {
        self.states.set(states).unwrap();
    }

    fn events(&self) -> Vec<Rendered> {
        self.events.lock().unwrap().clone()
    }

    fn notice_states(&self) -> Vec<&'static str> {
        self.notice_states.lock().unwrap().clone()
    }

    fn notices(&self) -> Vec<Notice> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Rendered::Notice(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    fn last_list(&self) -> Option<Vec<ListEntry>> {
        self.events().into_iter().rev().find_map(|e| match e {
            Rendered::List(list) => Some(list),
            _ => None,
        })
    }

    fn last_form(&self, slot: FormSlot) -> Option<FormModel> {
        self.events().into_iter().rev().find_map(|e| match e {
            Rendered::Form(s, form) if s == slot => Some(form),
            _ => None,
        })
    }
}

impl Presenter for RecordingPresenter {
    fn render_list(&self, entries: &[ListEntry]) {
        self.events.lock().unwrap().push(Rendered::List(entries.to_vec()));
    }

    fn render_form(&self, form: &FormModel, slot: FormSlot) {
        self.events
            .lock()
            .unwrap()
            .push(Rendered::Form(slot, form.clone()));
    }

    fn render_messages(&self, messages: &MessageList) {
        self.events
            .lock()
            .unwrap()
            .push(Rendered::Messages(messages.clone()));
    }

    fn notify(&self, notice: Notice) {
        if let Some(states) = self.states.get() {
            let label = states.borrow().label();
            self.notice_states.lock().unwrap().push(label);
        }
        self.events.lock().unwrap().push(Rendered::Notice(notice));
    }

    fn clear_selection_ui(&self) {
        self.events.lock().unwrap().push(Rendered::Cleared);
    }
}

fn setup() -> (
    AdminClient<ScriptedTransport>,
    ScriptedTransport,
    Arc<RecordingPresenter>,
) {
    let transport = ScriptedTransport::default();
    let presenter = Arc::new(RecordingPresenter::default());
    let mut config = ClientConfig::new(Url::parse("http://localhost:5000").unwrap());
    config.unregistered_relations = UnregisteredPolicy::Fatal;
    let client =
        AdminClient::with_transport(config, transport.clone(), presenter.clone()).unwrap();
    (client, transport, presenter)
}

/// Records every state a subscriber observes until the selection is idle
/// again. `watch` coalesces, so intermediate states may be skipped.
async fn record_until_idle(mut states: watch::Receiver<SelectionState>) -> Vec<&'static str> {
    let mut seen = Vec::new();
    while states.changed().await.is_ok() {
        let label = states.borrow_and_update().label();
        seen.push(label);
        if label == "Idle" {
            break;
        }
    }
    seen
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogBuffer {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

const USERS: &str = "http://localhost:5000/forum/api/users/";

fn user_url(nickname: &str) -> String {
    format!("/forum/api/users/{nickname}/")
}

fn restricted_url(nickname: &str) -> String {
    format!("/forum/api/users/{nickname}/restricted_profile/")
}

fn history_url(nickname: &str) -> String {
    format!("/forum/api/users/{nickname}/history/")
}

fn user_body(nickname: &str, with_history: bool) -> Value {
    let mut links = json!({
        "curies": [{"name": "user", "href": "/profiles/user-profile/{rels}", "templated": true}],
        "self": {"href": user_url(nickname)},
        "collection": {"href": "/forum/api/users/"},
        "user:public-data": {"href": format!("/forum/api/users/{nickname}/public_profile/")},
        "user:restricted-data": {"href": restricted_url(nickname)},
        "user:delete": {"href": user_url(nickname)}
    });
    if with_history {
        links["user:messages"] = json!({"href": history_url(nickname)});
    }
    json!({
        "_links": links,
        "nickname": nickname,
        "registrationdate": 1_362_015_937
    })
}

fn restricted_body(nickname: &str, editable: bool) -> Value {
    let mut links = json!({
        "self": {"href": restricted_url(nickname)},
        "user:parent": {"href": user_url(nickname)},
        "user:messages": {"href": history_url(nickname)}
    });
    if editable {
        links["user:edit"] = json!({"href": restricted_url(nickname)});
    }
    json!({
        "_links": links,
        "nickname": nickname,
        "firstname": format!("{nickname}-first"),
        "address": "Oulu, Finland",
        "email": format!("{nickname}@forum.com"),
        "template": {"data": [
            {"name": "firstname", "value": "", "prompt": "First name", "required": true},
            {"name": "address", "object": {}, "prompt": "Address"},
            {"name": "email", "value": "", "required": true}
        ]}
    })
}

fn history_body(nickname: &str, messages: &[&str]) -> Value {
    let items: Vec<Value> = messages
        .iter()
        .map(|id| json!({"href": format!("/forum/api/messages/{id}/"), "data": []}))
        .collect();
    json!({"collection": {"href": history_url(nickname), "items": items}})
}

fn message_body(id: &str, headline: &str) -> Value {
    json!({
        "_links": {
            "self": {"href": format!("/forum/api/messages/{id}/")},
            "msg:delete": {"href": format!("/forum/api/messages/{id}/")},
            "atom-thread:in-reply-to": {"href": null}
        },
        "headline": headline,
        "articleBody": format!("body of {id}")
    })
}

fn script_user(transport: &ScriptedTransport, nickname: &str, messages: &[&str]) {
    transport.hal(&user_url(nickname), &user_body(nickname, true));
    transport.hal(&restricted_url(nickname), &restricted_body(nickname, true));
    transport.collection(&history_url(nickname), &history_body(nickname, messages));
    for id in messages {
        transport.hal(
            &format!("/forum/api/messages/{id}/"),
            &message_body(id, &format!("headline {id}")),
        );
    }
}

fn active(client: &AdminClient<ScriptedTransport>) -> hyperadmin_core::selection::ActiveSelection {
    match client.selection() {
        SelectionState::Active(active) => *active,
        other => panic!("expected Active, got {other:?}"),
    }
}

// ── Users collection ────────────────────────────────────────────────

#[tokio::test]
async fn test_load_users_renders_list_and_new_user_form() {
    let (client, transport, presenter) = setup();
    transport.collection(
        USERS,
        &json!({"collection": {
            "href": "/forum/api/users/",
            "template": {"data": [
                {"name": "nickname", "value": "", "prompt": "Insert nickname", "required": true},
                {"name": "address", "object": {}, "prompt": "Insert user address"}
            ]},
            "items": [
                {"href": "/forum/api/users/Mystery/", "data": [{"name": "nickname", "value": "Mystery"}]},
                {"href": "/forum/api/users/AxelW/", "data": [{"name": "nickname", "value": "AxelW"}]}
            ]
        }}),
    );

    client.load_users(None).await.unwrap();

    assert_eq!(
        presenter.last_list().unwrap(),
        vec![
            ListEntry::new("/forum/api/users/Mystery/", "Mystery"),
            ListEntry::new("/forum/api/users/AxelW/", "AxelW"),
        ]
    );
    let form = presenter.last_form(FormSlot::NewUser).unwrap();
    assert_eq!(form.action_url.as_deref(), Some("/forum/api/users/"));
    assert_eq!(form.actions, vec![FormAction::Create]);
    assert_eq!(form.len(), 2);
    assert_eq!(client.new_user_form(), Some(form));
    assert!(client.selection().is_idle());
}

#[tokio::test]
async fn test_load_users_failure_notifies() {
    let (client, transport, presenter) = setup();
    transport.fail(Method::Get, USERS, 500, "Database down");

    let err = client.load_users(None).await.unwrap_err();

    assert!(matches!(err, CoreError::TransportFailure { status: Some(500), .. }));
    assert_eq!(presenter.last_list(), Some(Vec::new()));
    assert!(presenter.notices()[0].is_error());
}

// ── Selection cascade ───────────────────────────────────────────────

#[tokio::test]
async fn test_full_cascade_reaches_active() {
    let (client, transport, presenter) = setup();
    script_user(&transport, "Mystery", &["msg-1", "msg-2"]);

    client.select(&user_url("Mystery")).await.unwrap();

    let active = active(&client);
    assert_eq!(active.url, user_url("Mystery"));
    assert_eq!(
        active.primary.field("registrationdate").unwrap().value,
        "28.2.2013 at 1:45:37"
    );
    assert_eq!(active.primary.actions, vec![FormAction::Delete]);

    let restricted = active.restricted.unwrap();
    assert!(restricted.field("nickname").is_none());
    assert!(restricted.field("email").unwrap().editable);
    assert_eq!(restricted.field("address").unwrap().value, "Oulu, Finland");
    assert_eq!(restricted.action_url, Some(restricted_url("Mystery")));

    assert_eq!(active.messages.count, Some(2));
    let headlines: Vec<&str> = active
        .messages
        .items
        .iter()
        .map(|m| m.headline.as_str())
        .collect();
    assert_eq!(headlines, vec!["headline msg-1", "headline msg-2"]);
    assert!(presenter.notices().is_empty());
}

#[tokio::test]
async fn test_restricted_only_cascade_skips_history() {
    let (client, transport, presenter) = setup();
    transport.hal(&user_url("Quiet"), &user_body("Quiet", false));
    transport.hal(&restricted_url("Quiet"), &restricted_body("Quiet", true));

    client.select(&user_url("Quiet")).await.unwrap();

    let active = active(&client);
    assert!(active.restricted.is_some());
    assert_eq!(active.messages, MessageList::empty());
    assert!(!transport.requested(Method::Get, &history_url("Quiet")));
    assert!(presenter
        .events()
        .contains(&Rendered::Messages(MessageList::empty())));
}

#[tokio::test]
async fn test_history_not_found_means_zero_messages() {
    let (client, transport, presenter) = setup();
    transport.hal(&user_url("Newbie"), &user_body("Newbie", true));
    transport.hal(&restricted_url("Newbie"), &restricted_body("Newbie", true));
    transport.fail(Method::Get, &history_url("Newbie"), 404, "There is no messages for this user");

    client.select(&user_url("Newbie")).await.unwrap();

    let active = active(&client);
    assert_eq!(active.messages.count, Some(0));
    assert!(active.messages.items.is_empty());
    assert!(presenter.notices().is_empty());
}

#[tokio::test]
async fn test_stale_selection_is_discarded() {
    let (client, transport, _presenter) = setup();
    script_user(&transport, "Mystery", &["msg-1"]);
    script_user(&transport, "AxelW", &[]);
    let gate = transport.gate(&restricted_url("Mystery"));

    let mystery = user_url("Mystery");
    let axel = user_url("AxelW");

    let first = client.select(&mystery);
    let second = async {
        gate.arrived.notified().await;
        client.select(&axel).await.unwrap();
        gate.release.notify_one();
    };
    let (first, ()) = tokio::join!(first, second);
    first.unwrap();

    let active = active(&client);
    assert_eq!(active.url, user_url("AxelW"));
    let restricted = active.restricted.unwrap();
    assert_eq!(restricted.field("firstname").unwrap().value, "AxelW-first");
    assert!(active.messages.items.is_empty());
}

#[tokio::test]
async fn test_edit_without_delete_surfaces_only_edit() {
    let (client, transport, _presenter) = setup();
    transport.hal(
        &user_url("Editor"),
        &json!({
            "_links": {
                "self": {"href": user_url("Editor")},
                "user:edit": {"href": "/forum/api/users/Editor/public_profile/"}
            },
            "nickname": "Editor"
        }),
    );

    client.select(&user_url("Editor")).await.unwrap();

    let primary = active(&client).primary;
    assert_eq!(
        primary.action_url.as_deref(),
        Some("/forum/api/users/Editor/public_profile/")
    );
    assert!(primary.has_action(FormAction::Edit));
    assert!(!primary.has_action(FormAction::Delete));
}

#[tokio::test]
async fn test_primary_failure_deselects() {
    let (client, transport, presenter) = setup();
    transport.fail(Method::Get, &user_url("Broken"), 500, "boom");
    let mut states = client.subscribe();

    let err = client.select(&user_url("Broken")).await.unwrap_err();

    assert!(matches!(err, CoreError::TransportFailure { .. }));
    assert!(states.borrow_and_update().is_idle());
    assert_eq!(presenter.notices().len(), 1);
    assert!(!transport.requested(Method::Get, &restricted_url("Broken")));
}

#[tokio::test]
async fn test_restricted_failure_deselects() {
    let (client, transport, presenter) = setup();
    transport.hal(&user_url("Secret"), &user_body("Secret", true));
    transport.fail(Method::Get, &restricted_url("Secret"), 500, "boom");
    transport.collection(&history_url("Secret"), &history_body("Secret", &[]));

    let err = client.select(&user_url("Secret")).await.unwrap_err();

    assert!(matches!(err, CoreError::TransportFailure { .. }));
    assert!(client.selection().is_idle());
    assert_eq!(
        presenter.notices(),
        vec![Notice::error(
            "Cannot extract all the information about this user from the server"
        )]
    );
}

#[tokio::test]
async fn test_history_failure_deselects() {
    let (client, transport, _presenter) = setup();
    transport.hal(&user_url("Chatty"), &user_body("Chatty", true));
    transport.hal(&restricted_url("Chatty"), &restricted_body("Chatty", false));
    transport.fail(Method::Get, &history_url("Chatty"), 500, "boom");

    assert!(client.select(&user_url("Chatty")).await.is_err());
    assert!(client.selection().is_idle());
}

#[tokio::test]
async fn test_restricted_failure_goes_through_failed_never_active() {
    let (client, transport, presenter) = setup();
    presenter.observe(client.subscribe());
    transport.hal(&user_url("Secret"), &user_body("Secret", true));
    transport.fail(Method::Get, &restricted_url("Secret"), 500, "boom");
    transport.collection(&history_url("Secret"), &history_body("Secret", &[]));
    let gate = transport.gate(&restricted_url("Secret"));
    let url = user_url("Secret");

    let recorder = record_until_idle(client.subscribe());
    let pending = async {
        gate.arrived.notified().await;
        let state = client.selection();
        gate.release.notify_one();
        state
    };
    let (result, pending, seen) = tokio::join!(client.select(&url), pending, recorder);

    assert!(result.is_err());
    // Primary and history have settled, the mandatory branch has not.
    assert!(pending.is_loading(), "expected Loading, got {pending:?}");
    let staged = pending.details().unwrap();
    assert_eq!(staged.url, url);
    assert_eq!(staged.messages.count, Some(0));
    assert!(staged.restricted.is_none());

    assert!(!seen.contains(&"Active"), "observed {seen:?}");
    assert_eq!(seen.last(), Some(&"Idle"));
    assert_eq!(presenter.notice_states(), vec!["Failed"]);
    assert!(client.selection().is_idle());
}

#[tokio::test]
async fn test_history_failure_goes_through_failed_never_active() {
    let (client, transport, presenter) = setup();
    presenter.observe(client.subscribe());
    transport.hal(&user_url("Chatty"), &user_body("Chatty", true));
    transport.hal(&restricted_url("Chatty"), &restricted_body("Chatty", true));
    transport.fail(Method::Get, &history_url("Chatty"), 500, "boom");
    let gate = transport.gate(&history_url("Chatty"));
    let url = user_url("Chatty");

    let recorder = record_until_idle(client.subscribe());
    let pending = async {
        gate.arrived.notified().await;
        let state = client.selection();
        gate.release.notify_one();
        state
    };
    let (result, pending, seen) = tokio::join!(client.select(&url), pending, recorder);

    assert!(result.is_err());
    assert!(pending.is_loading(), "expected Loading, got {pending:?}");
    assert!(pending.details().unwrap().restricted.is_some());

    assert!(!seen.contains(&"Active"), "observed {seen:?}");
    assert_eq!(seen.last(), Some(&"Idle"));
    assert_eq!(presenter.notice_states(), vec!["Failed"]);
    assert_eq!(
        presenter.notices(),
        vec![Notice::error("Cannot retrieve the messages for the user")]
    );
}

#[tokio::test]
async fn test_message_item_failure_keeps_selection() {
    let (client, transport, presenter) = setup();
    script_user(&transport, "Mystery", &["msg-1", "msg-2", "msg-3"]);
    transport.fail(Method::Get, "/forum/api/messages/msg-2/", 500, "boom");

    client.select(&user_url("Mystery")).await.unwrap();

    let active = active(&client);
    assert_eq!(active.messages.count, Some(3));
    let urls: Vec<&str> = active.messages.items.iter().map(|m| m.url.as_str()).collect();
    assert_eq!(urls, vec!["/forum/api/messages/msg-1/", "/forum/api/messages/msg-3/"]);
    assert_eq!(
        presenter.notices(),
        vec![Notice::error(
            "Cannot get information from message: /forum/api/messages/msg-2/"
        )]
    );
}

#[tokio::test]
async fn test_read_only_restricted_profile_has_no_template_fields() {
    let (client, transport, _presenter) = setup();
    transport.hal(&user_url("Viewer"), &user_body("Viewer", false));
    transport.hal(&restricted_url("Viewer"), &restricted_body("Viewer", false));

    client.select(&user_url("Viewer")).await.unwrap();

    let restricted = active(&client).restricted.unwrap();
    assert!(restricted.fields().iter().all(|f| !f.editable));
    assert!(restricted.action_url.is_none());
}

#[tokio::test]
async fn test_unregistered_relation_is_fatal_in_strict_mode() {
    let (client, transport, _presenter) = setup();
    transport.hal(
        &user_url("Odd"),
        &json!({
            "_links": {"self": {"href": user_url("Odd")}, "user:avatar": {"href": "/a/"}},
            "nickname": "Odd"
        }),
    );

    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(logs.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let err = client.select(&user_url("Odd")).await.unwrap_err();
    assert!(matches!(err, CoreError::UnregisteredRelation { ref rel } if rel == "user:avatar"));
    assert!(client.selection().is_idle());

    let logs = logs.contents();
    assert!(logs.contains("ERROR"), "{logs}");
    assert!(logs.contains("unregistered relation"), "{logs}");
    assert!(logs.contains("user:avatar"), "{logs}");
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_edit_puts_serialized_form() {
    let (client, transport, presenter) = setup();
    script_user(&transport, "Mystery", &[]);
    transport.no_content(Method::Put, &restricted_url("Mystery"));

    client.select(&user_url("Mystery")).await.unwrap();
    let mut form = active(&client).restricted.unwrap();
    form.set_value("email", "new@forum.com").unwrap();
    client.edit(&form).await.unwrap();

    assert!(transport.requested(Method::Put, &restricted_url("Mystery")));
    assert_eq!(
        presenter.notices(),
        vec![Notice::info("User information have been modified successfully")]
    );
}

#[tokio::test]
async fn test_edit_requires_edit_action() {
    let (client, _transport, _presenter) = setup();
    let err = client.edit(&FormModel::default()).await.unwrap_err();
    assert!(matches!(err, CoreError::MissingAction));
}

#[tokio::test]
async fn test_create_user_follows_location() {
    let (client, transport, presenter) = setup();
    transport.collection(
        USERS,
        &json!({"collection": {
            "href": "/forum/api/users/",
            "template": {"data": [{"name": "nickname", "value": "", "required": true}]},
            "items": []
        }}),
    );
    transport.created("/forum/api/users/", &user_url("Newbie"));
    transport.hal(&user_url("Newbie"), &user_body("Newbie", false));
    transport.hal(&restricted_url("Newbie"), &restricted_body("Newbie", true));

    client.load_users(None).await.unwrap();
    let mut form = client.new_user_form().unwrap();
    form.set_value("nickname", "Newbie").unwrap();
    client.create_user(&form).await.unwrap();

    assert_eq!(
        presenter.last_list().unwrap(),
        vec![ListEntry::new(user_url("Newbie"), "Newbie")]
    );
    assert_eq!(active(&client).url, user_url("Newbie"));
    assert_eq!(presenter.notices()[0], Notice::info("User successfully added"));
}

#[tokio::test]
async fn test_create_user_conflict_reports_server_message() {
    let (client, transport, presenter) = setup();
    transport.fail(Method::Post, "/forum/api/users/", 409, "Nickname already in use");

    let mut form = FormModel::default();
    form.action_url = Some("/forum/api/users/".into());
    let err = client.create_user(&form).await.unwrap_err();

    assert!(matches!(err, CoreError::TransportFailure { status: Some(409), .. }));
    assert_eq!(
        presenter.notices(),
        vec![Notice::error("Could not create new user: Nickname already in use")]
    );
}

#[tokio::test]
async fn test_delete_user_reloads_list() {
    let (client, transport, presenter) = setup();
    transport.no_content(Method::Delete, &user_url("Gone"));
    transport.collection(
        USERS,
        &json!({"collection": {"href": "/forum/api/users/", "items": []}}),
    );

    client.delete_user(&user_url("Gone")).await.unwrap();

    assert!(transport.requested(Method::Get, USERS));
    assert_eq!(presenter.last_list(), Some(Vec::new()));
    assert!(client.new_user_form().is_none());
}

#[tokio::test]
async fn test_delete_message_reloads_selection() {
    let (client, transport, _presenter) = setup();
    script_user(&transport, "Mystery", &["msg-1"]);
    transport.no_content(Method::Delete, "/forum/api/messages/msg-1/");

    client.select(&user_url("Mystery")).await.unwrap();
    transport.fail(Method::Get, &history_url("Mystery"), 404, "Empty list");
    client
        .delete_message("/forum/api/messages/msg-1/")
        .await
        .unwrap();

    let history_fetches = transport
        .requests()
        .iter()
        .filter(|(m, u)| *m == "GET" && *u == history_url("Mystery"))
        .count();
    assert_eq!(history_fetches, 2);
    assert_eq!(active(&client).messages, MessageList::empty());
}

#[tokio::test]
async fn test_reload_without_selection_fails() {
    let (client, _transport, _presenter) = setup();
    assert!(matches!(client.reload().await, Err(CoreError::NoSelection)));
}
