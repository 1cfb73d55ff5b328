//! End-to-end tests against the live mock service.
//!
//! Starts `mock-api` on a random port, then drives the gate and session state
//! machines over real HTTP using ureq — the same executor shape the terminal
//! frontend uses. Validates request building, response parsing, and the
//! effect/completion loop working together against an actual server.

use taskpad_core::{
    ApiError, CredentialGate, Credentials, CrudClient, Effect, GateState, Method, Request,
    Response, Session, INVALID_CREDENTIALS,
};

const API_KEY: &str = "integration-key";

/// Execute a core-built `Request` using ureq.
///
/// Disables ureq's status-code-as-error behavior so 4xx/5xx responses come
/// back as data and status interpretation stays with the core client.
fn execute(req: &Request) -> Result<Response, ApiError> {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let result = match (req.method, req.body.as_deref()) {
        (Method::Get, _) => {
            let mut call = agent.get(&req.url);
            for (name, value) in &req.headers {
                call = call.header(name.as_str(), value.as_str());
            }
            call.call()
        }
        (Method::Delete, _) => {
            let mut call = agent.delete(&req.url);
            for (name, value) in &req.headers {
                call = call.header(name.as_str(), value.as_str());
            }
            call.call()
        }
        (Method::Post, body) => {
            let mut call = agent.post(&req.url);
            for (name, value) in &req.headers {
                call = call.header(name.as_str(), value.as_str());
            }
            call.send(body.unwrap_or_default().as_bytes())
        }
        (Method::Put, body) => {
            let mut call = agent.put(&req.url);
            for (name, value) in &req.headers {
                call = call.header(name.as_str(), value.as_str());
            }
            call.send(body.unwrap_or_default().as_bytes())
        }
    };

    let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;
    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();
    Ok(Response { status, body })
}

/// Run one session effect to completion, chasing the follow-up read a
/// successful mutation produces. Mirrors the frontend's driver loop.
fn drive(client: &CrudClient, session: &mut Session, mut effect: Effect) {
    loop {
        let next = match effect {
            Effect::Read { token } => {
                let result = execute(&client.build_read()).and_then(|r| client.parse_read(r));
                session.complete_read(token, result);
                None
            }
            Effect::Create { token, ref input } => {
                let result = client
                    .build_create(input)
                    .and_then(|req| execute(&req))
                    .and_then(|r| client.parse_create(r));
                session.complete_write(token, result)
            }
            Effect::Update {
                token,
                id,
                ref input,
            } => {
                let result = client
                    .build_update(id, input)
                    .and_then(|req| execute(&req))
                    .and_then(|r| client.parse_update(r));
                session.complete_write(token, result)
            }
            Effect::Delete { token, id } => {
                let result =
                    execute(&client.build_delete(id)).and_then(|r| client.parse_delete(r));
                session.complete_write(token, result)
            }
        };
        match next {
            Some(follow_up) => effect = follow_up,
            None => break,
        }
    }
}

/// Start a mock service on a random port and return its base URI.
fn spawn_service(router: mock_api::ServiceRouter) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_api::serve(listener, router).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn credentials(api_uri: &str) -> Credentials {
    Credentials {
        api_key: API_KEY.to_string(),
        api_uri: api_uri.to_string(),
    }
}

#[test]
fn gate_and_session_full_lifecycle() {
    let api_uri = spawn_service(mock_api::app(API_KEY));

    // Validate credentials through the gate's probe read.
    let mut gate = CredentialGate::new(credentials(&api_uri));
    let probe = gate.submit().expect("probe client");
    let result = execute(&probe.build_read()).and_then(|r| probe.parse_read(r));
    let client = gate.resolve_probe(result).expect("adopted client");
    assert_eq!(*gate.state(), GateState::Ready);

    // Initial fetch — empty collection.
    let mut session = Session::new();
    let effect = session.refresh();
    drive(&client, &mut session, effect);
    assert!(session.todos().is_empty());

    // Add "Buy milk": one create, one re-fetch, one row shown.
    session.set_input("Buy milk");
    let effect = session.submit().expect("create effect");
    drive(&client, &mut session, effect);
    assert_eq!(session.input(), "");
    assert_eq!(session.todos().len(), 1);
    assert_eq!(session.todos()[0].value, "Buy milk");
    let id = session.todos()[0].id;

    // Edit it to "Buy bread": update, not create.
    assert!(session.begin_edit(id));
    assert_eq!(session.input(), "Buy milk");
    session.set_input("Buy bread");
    let effect = session.submit().expect("update effect");
    assert!(matches!(effect, Effect::Update { .. }));
    drive(&client, &mut session, effect);
    assert_eq!(session.todos().len(), 1);
    assert_eq!(session.todos()[0].value, "Buy bread");
    assert_eq!(session.todos()[0].id, id);
    assert_eq!(session.editing(), None);

    // Delete it; the follow-up fetch shows an empty list again.
    let effect = session.remove(id);
    drive(&client, &mut session, effect);
    assert!(session.todos().is_empty());
    assert!(session.notice().is_none());
    assert!(!session.credits_exhausted());

    // Deleting again: the service answers 404, surfaced as a notice, and no
    // re-fetch happens.
    let effect = session.remove(id);
    drive(&client, &mut session, effect);
    assert_eq!(session.notice(), Some("Delete failed: HTTP 404: no such item"));
}

#[test]
fn probe_with_wrong_key_fails_validation() {
    let api_uri = spawn_service(mock_api::app(API_KEY));

    let mut gate = CredentialGate::new(Credentials {
        api_key: "wrong-key".to_string(),
        api_uri,
    });
    let probe = gate.submit().unwrap();
    let result = execute(&probe.build_read()).and_then(|r| probe.parse_read(r));
    assert_eq!(result, Err(ApiError::Unauthorized));

    assert!(gate.resolve_probe(result).is_none());
    assert_eq!(
        *gate.state(),
        GateState::Failed(INVALID_CREDENTIALS.to_string())
    );
}

#[test]
fn probe_against_unreachable_host_fails_validation() {
    // Nothing listens here; the connect error must land in the same Failed
    // state as a rejected key.
    let mut gate = CredentialGate::new(Credentials {
        api_key: API_KEY.to_string(),
        api_uri: "http://127.0.0.1:1".to_string(),
    });
    let probe = gate.submit().unwrap();
    let result = execute(&probe.build_read()).and_then(|r| probe.parse_read(r));
    assert!(matches!(result, Err(ApiError::Transport(_))));

    gate.resolve_probe(result);
    assert_eq!(
        *gate.state(),
        GateState::Failed(INVALID_CREDENTIALS.to_string())
    );
}

#[test]
fn exhausted_credits_raise_the_sticky_banner() {
    // Probe (1) + empty fetch (2) + create (3) fit the budget; the follow-up
    // fetch after the create is the first 402.
    let api_uri = spawn_service(mock_api::app_with_credits(API_KEY, 3));

    let mut gate = CredentialGate::new(credentials(&api_uri));
    let probe = gate.submit().unwrap();
    let result = execute(&probe.build_read()).and_then(|r| probe.parse_read(r));
    let client = gate.resolve_probe(result).expect("adopted client");

    let mut session = Session::new();
    let effect = session.refresh();
    drive(&client, &mut session, effect);

    session.set_input("last one");
    let effect = session.submit().unwrap();
    drive(&client, &mut session, effect);

    assert!(session.credits_exhausted());
    // The banner is a dedicated signal, not a notice.
    assert!(session.notice().is_none());

    // Deletes share the same classification path.
    let id = uuid::Uuid::new_v4();
    let effect = session.remove(id);
    drive(&client, &mut session, effect);
    assert!(session.credits_exhausted());
}
