//! Application shell: owns the event loop, decides which screen is shown,
//! and executes the effects the core state machines produce.
//!
//! The credential screen is shown until the gate reaches `Ready`; only then
//! does the list screen exist at all. In direct mode (`--direct`) the gate is
//! skipped: the client is built straight from configuration and the initial
//! fetch runs before the first frame.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::DefaultTerminal;

use taskpad_core::{ApiError, CredentialGate, CrudClient, Effect, Session, Todo};

use crate::config::Config;
use crate::net::Executor;
use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Uri,
    Key,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFocus {
    /// Keystrokes edit the input line.
    Input,
    /// Keystrokes navigate and act on rows.
    Rows,
}

pub enum Screen {
    Login {
        gate: CredentialGate,
        focus: LoginField,
    },
    List {
        client: CrudClient,
        session: Session,
        focus: ListFocus,
        selected: usize,
    },
}

pub struct App {
    pub screen: Screen,
    executor: Executor,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, direct: bool) -> Self {
        let executor = Executor::new();
        let screen = if direct {
            let client = CrudClient::new(&config.credentials);
            let mut session = Session::new();
            let effect = session.refresh();
            drive(&executor, &client, &mut session, effect);
            Screen::List {
                client,
                session,
                focus: ListFocus::Input,
                selected: 0,
            }
        } else {
            Screen::Login {
                gate: CredentialGate::new(config.credentials),
                focus: LoginField::Uri,
            }
        };
        Self {
            screen,
            executor,
            should_quit: false,
        }
    }

    pub fn run(mut self) -> Result<()> {
        let mut terminal = ratatui::init();
        let result = self.event_loop(&mut terminal);
        ratatui::restore();
        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            terminal.draw(|frame| ui::render(frame, self))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    // Windows compatibility: only handle Press events
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match &mut self.screen {
            Screen::Login { gate, focus } => match key.code {
                KeyCode::Esc => self.should_quit = true,
                KeyCode::Tab | KeyCode::Up | KeyCode::Down => {
                    *focus = match focus {
                        LoginField::Uri => LoginField::Key,
                        LoginField::Key => LoginField::Uri,
                    };
                }
                KeyCode::Char(c) => {
                    let mut text = match focus {
                        LoginField::Uri => gate.api_uri().to_string(),
                        LoginField::Key => gate.api_key().to_string(),
                    };
                    text.push(c);
                    match focus {
                        LoginField::Uri => gate.set_api_uri(text),
                        LoginField::Key => gate.set_api_key(text),
                    }
                }
                KeyCode::Backspace => {
                    let mut text = match focus {
                        LoginField::Uri => gate.api_uri().to_string(),
                        LoginField::Key => gate.api_key().to_string(),
                    };
                    text.pop();
                    match focus {
                        LoginField::Uri => gate.set_api_uri(text),
                        LoginField::Key => gate.set_api_key(text),
                    }
                }
                KeyCode::Enter => {
                    if let Some(probe) = gate.submit() {
                        let result = perform_read(&self.executor, &probe);
                        if let Some(client) = gate.resolve_probe(result) {
                            let mut session = Session::new();
                            let effect = session.refresh();
                            drive(&self.executor, &client, &mut session, effect);
                            self.screen = Screen::List {
                                client,
                                session,
                                focus: ListFocus::Input,
                                selected: 0,
                            };
                        }
                    }
                }
                _ => {}
            },
            Screen::List {
                client,
                session,
                focus,
                selected,
            } => match focus {
                ListFocus::Input => match key.code {
                    KeyCode::Tab => *focus = ListFocus::Rows,
                    KeyCode::Esc => {
                        if session.notice().is_some() {
                            session.dismiss_notice();
                        } else if session.editing().is_some() {
                            session.cancel_edit();
                        } else {
                            *focus = ListFocus::Rows;
                        }
                    }
                    KeyCode::Enter => {
                        if let Some(effect) = session.submit() {
                            drive(&self.executor, client, session, effect);
                            *selected = clamp_selection(*selected, session.todos().len());
                        }
                    }
                    KeyCode::Backspace => session.backspace_input(),
                    KeyCode::Char(c) => session.push_input(c),
                    _ => {}
                },
                ListFocus::Rows => match key.code {
                    KeyCode::Tab | KeyCode::Char('a') => *focus = ListFocus::Input,
                    KeyCode::Up => *selected = selected.saturating_sub(1),
                    KeyCode::Down => {
                        if *selected + 1 < session.todos().len() {
                            *selected += 1;
                        }
                    }
                    KeyCode::Enter | KeyCode::Char('e') => {
                        if let Some(todo) = session.todos().get(*selected) {
                            let id = todo.id;
                            if session.begin_edit(id) {
                                *focus = ListFocus::Input;
                            }
                        }
                    }
                    KeyCode::Char('d') => {
                        if let Some(todo) = session.todos().get(*selected) {
                            let id = todo.id;
                            let effect = session.remove(id);
                            drive(&self.executor, client, session, effect);
                            *selected = clamp_selection(*selected, session.todos().len());
                        }
                    }
                    KeyCode::Char('r') => {
                        let effect = session.refresh();
                        drive(&self.executor, client, session, effect);
                        *selected = clamp_selection(*selected, session.todos().len());
                    }
                    KeyCode::Esc => {
                        if session.notice().is_some() {
                            session.dismiss_notice();
                        } else if session.editing().is_some() {
                            session.cancel_edit();
                        } else {
                            self.should_quit = true;
                        }
                    }
                    KeyCode::Char('q') => self.should_quit = true,
                    _ => {}
                },
            },
        }
    }
}

/// Keep the row cursor inside the collection after it changes size.
fn clamp_selection(selected: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        selected.min(len - 1)
    }
}

fn perform_read(executor: &Executor, client: &CrudClient) -> Result<Vec<Todo>, ApiError> {
    executor
        .execute(&client.build_read())
        .and_then(|r| client.parse_read(r))
}

/// Run one session effect to completion, chasing the follow-up read a
/// successful mutation produces. Requests execute sequentially, so each
/// action's refresh reflects its own mutation.
fn drive(executor: &Executor, client: &CrudClient, session: &mut Session, mut effect: Effect) {
    loop {
        let next = match effect {
            Effect::Read { token } => {
                let result = perform_read(executor, client);
                session.complete_read(token, result);
                None
            }
            Effect::Create { token, ref input } => {
                let result = client
                    .build_create(input)
                    .and_then(|req| executor.execute(&req))
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
                    .and_then(|req| executor.execute(&req))
                    .and_then(|r| client.parse_update(r));
                session.complete_write(token, result)
            }
            Effect::Delete { token, id } => {
                let result = executor
                    .execute(&client.build_delete(id))
                    .and_then(|r| client.parse_delete(r));
                session.complete_write(token, result)
            }
        };
        match next {
            Some(follow_up) => effect = follow_up,
            None => break,
        }
    }
}
