//! List-screen state machine.
//!
//! # Design
//! `Session` owns everything the list screen displays: the cached collection,
//! the input line, the edit target, the sticky credits banner, and the last
//! error notice. It performs no I/O. User intents (`submit`, `remove`,
//! `refresh`) return an [`Effect`] describing one network call; the host
//! executes it through `CrudClient` and reports back via `complete_read` /
//! `complete_write`. Successful mutations yield a follow-up read effect so the
//! cached collection always resynchronizes from the server.
//!
//! Every effect carries a monotonically increasing [`RequestToken`]. Only the
//! latest-issued read is applied on completion; a slower, earlier read that
//! lands after a newer one is dropped instead of overwriting fresher state.

use uuid::Uuid;

use crate::error::ApiError;
use crate::types::{CreateTodo, Todo, UpdateTodo};

/// Identifies one issued request. Ordered by issue time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// A network call the host must execute on the session's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Read {
        token: RequestToken,
    },
    Create {
        token: RequestToken,
        input: CreateTodo,
    },
    Update {
        token: RequestToken,
        id: Uuid,
        input: UpdateTodo,
    },
    Delete {
        token: RequestToken,
        id: Uuid,
    },
}

impl Effect {
    pub fn token(&self) -> RequestToken {
        match self {
            Effect::Read { token }
            | Effect::Create { token, .. }
            | Effect::Update { token, .. }
            | Effect::Delete { token, .. } => *token,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingKind {
    Read,
    Submit,
    Remove,
}

#[derive(Debug, Default)]
pub struct Session {
    todos: Vec<Todo>,
    input: String,
    editing: Option<Uuid>,
    credits_exhausted: bool,
    notice: Option<String>,
    pending: Vec<(RequestToken, PendingKind)>,
    latest_read: Option<RequestToken>,
    next_token: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection as of the last applied read, in server order.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Id of the item being edited, if the input line holds an edit.
    pub fn editing(&self) -> Option<Uuid> {
        self.editing
    }

    /// Sticky: once set by any 402 it stays set for the session's lifetime.
    pub fn credits_exhausted(&self) -> bool {
        self.credits_exhausted
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// True while any request is in flight. The host disables submit on it.
    pub fn is_busy(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace_input(&mut self) {
        self.input.pop();
    }

    /// Copy `id`'s current value into the input line and mark it as the edit
    /// target. Pure local transition; no effect is produced. Returns false if
    /// the id is not in the cached collection.
    pub fn begin_edit(&mut self, id: Uuid) -> bool {
        let Some(todo) = self.todos.iter().find(|t| t.id == id) else {
            return false;
        };
        self.input = todo.value.clone();
        self.editing = Some(id);
        true
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.input.clear();
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Request a full re-fetch of the collection.
    pub fn refresh(&mut self) -> Effect {
        let token = self.issue(PendingKind::Read);
        self.latest_read = Some(token);
        Effect::Read { token }
    }

    /// Add or update, depending on whether an edit is in progress.
    ///
    /// Returns `None` when the trimmed input is empty, or while another
    /// request is in flight (the submit action is disabled during loading;
    /// `remove` deliberately is not).
    pub fn submit(&mut self) -> Option<Effect> {
        if self.input.trim().is_empty() || self.is_busy() {
            return None;
        }
        let token = self.issue(PendingKind::Submit);
        let effect = match self.editing {
            Some(id) => Effect::Update {
                token,
                id,
                input: UpdateTodo {
                    value: self.input.clone(),
                },
            },
            None => Effect::Create {
                token,
                input: CreateTodo {
                    value: self.input.clone(),
                },
            },
        };
        Some(effect)
    }

    /// Delete `id`. Not gated on `is_busy`.
    pub fn remove(&mut self, id: Uuid) -> Effect {
        let token = self.issue(PendingKind::Remove);
        Effect::Delete { token, id }
    }

    /// Apply a completed read. Stale reads (a newer one has been issued
    /// since) are dropped so they cannot overwrite fresher state.
    pub fn complete_read(&mut self, token: RequestToken, result: Result<Vec<Todo>, ApiError>) {
        if !self.settle(token, PendingKind::Read) {
            return;
        }
        match result {
            Ok(todos) => {
                if self.latest_read == Some(token) {
                    self.todos = todos;
                }
            }
            Err(err) => self.fail("Refresh failed", err),
        }
    }

    /// Apply a completed create/update/delete. On success the input line and
    /// edit target are cleared (submit only) and a follow-up read effect is
    /// returned for the host to execute. On failure nothing is re-fetched and
    /// prior state stays intact.
    pub fn complete_write(
        &mut self,
        token: RequestToken,
        result: Result<(), ApiError>,
    ) -> Option<Effect> {
        let kind = self.pending.iter().find(|(t, _)| *t == token).map(|(_, k)| *k)?;
        if kind == PendingKind::Read || !self.settle(token, kind) {
            return None;
        }
        match result {
            Ok(()) => {
                if kind == PendingKind::Submit {
                    self.input.clear();
                    self.editing = None;
                }
                Some(self.refresh())
            }
            Err(err) => {
                let context = match kind {
                    PendingKind::Submit => "Error",
                    _ => "Delete failed",
                };
                self.fail(context, err);
                None
            }
        }
    }

    fn issue(&mut self, kind: PendingKind) -> RequestToken {
        let token = RequestToken(self.next_token);
        self.next_token += 1;
        self.pending.push((token, kind));
        token
    }

    /// Remove the pending entry for `token` if it matches `kind`. Unknown or
    /// mismatched tokens are ignored.
    fn settle(&mut self, token: RequestToken, kind: PendingKind) -> bool {
        let Some(pos) = self
            .pending
            .iter()
            .position(|(t, k)| *t == token && *k == kind)
        else {
            return false;
        };
        self.pending.remove(pos);
        true
    }

    /// One classification path for every failed operation: 402 raises the
    /// sticky banner, everything else becomes a user-visible notice and a log
    /// line. Nothing is swallowed silently.
    fn fail(&mut self, context: &str, err: ApiError) {
        tracing::warn!(%err, context, "todo operation failed");
        match err {
            ApiError::CreditsExhausted => self.credits_exhausted = true,
            other => self.notice = Some(format!("{context}: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(n: u128, value: &str) -> Todo {
        Todo {
            id: Uuid::from_u128(n),
            value: value.to_string(),
        }
    }

    fn session_with(todos: Vec<Todo>) -> Session {
        let mut session = Session::new();
        let effect = session.refresh();
        session.complete_read(effect.token(), Ok(todos));
        session
    }

    #[test]
    fn blank_input_does_not_submit() {
        let mut session = Session::new();
        assert!(session.submit().is_none());
        session.set_input("   ");
        assert!(session.submit().is_none());
    }

    #[test]
    fn submit_creates_when_not_editing() {
        let mut session = Session::new();
        session.set_input("Buy milk");
        let effect = session.submit().expect("effect");
        assert!(matches!(
            effect,
            Effect::Create { ref input, .. } if input.value == "Buy milk"
        ));
    }

    #[test]
    fn successful_submit_clears_input_and_refetches() {
        let mut session = Session::new();
        session.set_input("Buy milk");
        let effect = session.submit().unwrap();

        let follow_up = session.complete_write(effect.token(), Ok(())).expect("read");
        assert_eq!(session.input(), "");
        assert_eq!(session.editing(), None);
        assert!(matches!(follow_up, Effect::Read { .. }));

        session.complete_read(follow_up.token(), Ok(vec![todo(1, "Buy milk")]));
        assert_eq!(session.todos().len(), 1);
        assert_eq!(session.todos()[0].value, "Buy milk");
        assert!(!session.is_busy());
    }

    #[test]
    fn begin_edit_copies_value_without_network() {
        let mut session = session_with(vec![todo(3, "Buy milk")]);
        assert!(session.begin_edit(Uuid::from_u128(3)));
        assert_eq!(session.input(), "Buy milk");
        assert_eq!(session.editing(), Some(Uuid::from_u128(3)));
        assert!(!session.is_busy());
    }

    #[test]
    fn submit_updates_when_editing() {
        let mut session = session_with(vec![todo(3, "Buy milk")]);
        session.begin_edit(Uuid::from_u128(3));
        session.set_input("Buy bread");
        let effect = session.submit().unwrap();
        assert!(matches!(
            effect,
            Effect::Update { id, ref input, .. }
                if id == Uuid::from_u128(3) && input.value == "Buy bread"
        ));
    }

    #[test]
    fn begin_edit_unknown_id_is_refused() {
        let mut session = session_with(vec![todo(1, "a")]);
        assert!(!session.begin_edit(Uuid::from_u128(9)));
        assert_eq!(session.editing(), None);
    }

    #[test]
    fn submit_is_disabled_while_busy() {
        let mut session = Session::new();
        session.set_input("first");
        let _in_flight = session.submit().unwrap();
        session.set_input("second");
        assert!(session.submit().is_none());
    }

    #[test]
    fn remove_is_allowed_while_busy() {
        let mut session = session_with(vec![todo(1, "a")]);
        let _read = session.refresh();
        let effect = session.remove(Uuid::from_u128(1));
        assert!(matches!(effect, Effect::Delete { .. }));
    }

    #[test]
    fn credits_exhaustion_is_sticky_across_success() {
        let mut session = Session::new();
        let read = session.refresh();
        session.complete_read(read.token(), Err(ApiError::CreditsExhausted));
        assert!(session.credits_exhausted());
        assert!(session.notice().is_none());

        // A later successful cycle must not clear the banner.
        session.set_input("still here");
        let effect = session.submit().unwrap();
        let follow_up = session.complete_write(effect.token(), Ok(())).unwrap();
        session.complete_read(follow_up.token(), Ok(vec![todo(1, "still here")]));
        assert!(session.credits_exhausted());
    }

    #[test]
    fn delete_hits_the_same_credit_path() {
        let mut session = session_with(vec![todo(1, "a")]);
        let effect = session.remove(Uuid::from_u128(1));
        let follow_up = session.complete_write(effect.token(), Err(ApiError::CreditsExhausted));
        assert!(follow_up.is_none());
        assert!(session.credits_exhausted());
    }

    #[test]
    fn failed_delete_sets_notice_and_keeps_list() {
        let mut session = session_with(vec![todo(5, "keep me")]);
        let effect = session.remove(Uuid::from_u128(5));
        let follow_up = session.complete_write(
            effect.token(),
            Err(ApiError::Transport("Network error".to_string())),
        );
        assert!(follow_up.is_none(), "no re-fetch on failure");
        assert_eq!(session.notice(), Some("Delete failed: Network error"));
        assert_eq!(session.todos().len(), 1);
    }

    #[test]
    fn failed_submit_keeps_input_for_retry() {
        let mut session = Session::new();
        session.set_input("Buy milk");
        let effect = session.submit().unwrap();
        session.complete_write(
            effect.token(),
            Err(ApiError::Http {
                status: 500,
                body: "boom".to_string(),
            }),
        );
        assert_eq!(session.input(), "Buy milk");
        assert_eq!(session.notice(), Some("Error: HTTP 500: boom"));
    }

    #[test]
    fn failed_refresh_is_surfaced_not_swallowed() {
        let mut session = Session::new();
        let read = session.refresh();
        session.complete_read(read.token(), Err(ApiError::Transport("timed out".to_string())));
        assert_eq!(session.notice(), Some("Refresh failed: timed out"));
    }

    #[test]
    fn stale_read_cannot_overwrite_newer_one() {
        let mut session = Session::new();
        let first = session.refresh();
        let second = session.refresh();

        session.complete_read(second.token(), Ok(vec![todo(2, "newer")]));
        session.complete_read(first.token(), Ok(vec![]));

        assert_eq!(session.todos().len(), 1);
        assert_eq!(session.todos()[0].value, "newer");
        assert!(!session.is_busy());
    }

    #[test]
    fn unknown_token_is_ignored() {
        let mut session = session_with(vec![todo(1, "a")]);
        let effect = session.refresh();
        session.complete_read(effect.token(), Ok(vec![]));
        // Completing the same token twice must be a no-op.
        session.complete_read(effect.token(), Ok(vec![todo(2, "ghost")]));
        assert!(session.todos().is_empty());
    }

    #[test]
    fn dismiss_clears_notice() {
        let mut session = Session::new();
        let read = session.refresh();
        session.complete_read(read.token(), Err(ApiError::Transport("x".to_string())));
        assert!(session.notice().is_some());
        session.dismiss_notice();
        assert!(session.notice().is_none());
    }
}
