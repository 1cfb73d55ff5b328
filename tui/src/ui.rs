//! Rendering for the two screens. Pure: reads the state machines, draws, and
//! never mutates anything.

use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use taskpad_core::{CredentialGate, GateState, Session};

use crate::app::{App, ListFocus, LoginField, Screen};

/// Where to refill usage credits; shown in the sticky banner.
const BILLING_URL: &str = "https://your-crud-platform.com";

pub fn render(frame: &mut Frame, app: &App) {
    match &app.screen {
        Screen::Login { gate, focus } => render_login(frame, gate, *focus),
        Screen::List {
            session,
            focus,
            selected,
            ..
        } => render_list(frame, session, *focus, *selected),
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    area
}

fn render_login(frame: &mut Frame, gate: &CredentialGate, focus: LoginField) {
    let dim = Style::default().fg(Color::DarkGray);
    let highlight = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let field = |label: &str, value: &str, active: bool| -> Line<'static> {
        let indicator = if active { ">" } else { " " };
        let style = if active { highlight } else { Style::default() };
        Line::from(vec![
            Span::styled(format!("{indicator} {label}  "), style),
            Span::raw(value.to_string()),
        ])
    };

    let mut lines = vec![
        Line::from(Span::styled(
            "taskpad",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field("API URI", gate.api_uri(), focus == LoginField::Uri),
        field("API Key", gate.api_key(), focus == LoginField::Key),
        Line::from(""),
    ];

    match gate.state() {
        GateState::Validating => {
            lines.push(Line::from(Span::styled("Validating...", dim)));
        }
        GateState::Failed(message) => {
            lines.push(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            )));
        }
        _ => lines.push(Line::from("")),
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Tab", highlight),
        Span::styled(" switch field  ", dim),
        Span::styled("Enter", highlight),
        Span::styled(" validate  ", dim),
        Span::styled("Esc", highlight),
        Span::styled(" quit", dim),
    ]));

    let area = centered(frame.area(), 64, lines.len() as u16 + 2);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn render_list(frame: &mut Frame, session: &Session, focus: ListFocus, selected: usize) {
    let dim = Style::default().fg(Color::DarkGray);
    let highlight = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let mut constraints = vec![Constraint::Length(1)];
    if session.credits_exhausted() {
        constraints.push(Constraint::Length(2));
    }
    if session.notice().is_some() {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(3));
    constraints.push(Constraint::Min(1));
    constraints.push(Constraint::Length(1));

    let areas = Layout::vertical(constraints).split(frame.area());
    let mut next = areas.iter();

    // Title, with a pending marker while a request is in flight.
    let mut title = vec![Span::styled(
        "Todo List",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if session.is_busy() {
        title.push(Span::styled("  (working...)", dim));
    }
    frame.render_widget(Paragraph::new(Line::from(title)), *next.next().unwrap());

    // Sticky credits banner; never cleared once shown.
    if session.credits_exhausted() {
        let banner = vec![
            Line::from(Span::styled(
                "Credits exhausted!",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("Refill at {BILLING_URL} to continue using the app."),
                Style::default().fg(Color::Red),
            )),
        ];
        frame.render_widget(Paragraph::new(banner), *next.next().unwrap());
    }

    if let Some(notice) = session.notice() {
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(notice.to_string(), Style::default().fg(Color::Yellow)),
                Span::styled("  (Esc to dismiss)", dim),
            ])),
            *next.next().unwrap(),
        );
    }

    // Input line; the border title doubles as the action label.
    let action = if session.editing().is_some() {
        "Update"
    } else {
        "Add"
    };
    let input_style = if focus == ListFocus::Input {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    frame.render_widget(
        Paragraph::new(session.input().to_string()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(input_style)
                .title(action),
        ),
        *next.next().unwrap(),
    );

    // Rows, in server order, keyed by the cursor only in the UI.
    let rows: Vec<Line> = if session.todos().is_empty() {
        vec![Line::from(Span::styled("Nothing to do.", dim))]
    } else {
        session
            .todos()
            .iter()
            .enumerate()
            .map(|(i, todo)| {
                let active = focus == ListFocus::Rows && i == selected;
                let indicator = if active { ">" } else { " " };
                let style = if active { highlight } else { Style::default() };
                Line::from(Span::styled(format!("{indicator} {}", todo.value), style))
            })
            .collect()
    };
    frame.render_widget(Paragraph::new(rows), *next.next().unwrap());

    let hints = match focus {
        ListFocus::Input => Line::from(vec![
            Span::styled("Enter", highlight),
            Span::styled(format!(" {}  ", action.to_lowercase()), dim),
            Span::styled("Tab", highlight),
            Span::styled(" rows  ", dim),
            Span::styled("Esc", highlight),
            Span::styled(" dismiss/cancel/back", dim),
        ]),
        ListFocus::Rows => Line::from(vec![
            Span::styled("Up/Down", highlight),
            Span::styled(" select  ", dim),
            Span::styled("e", highlight),
            Span::styled(" edit  ", dim),
            Span::styled("d", highlight),
            Span::styled(" delete  ", dim),
            Span::styled("r", highlight),
            Span::styled(" refresh  ", dim),
            Span::styled("Tab", highlight),
            Span::styled(" input  ", dim),
            Span::styled("q", highlight),
            Span::styled(" quit", dim),
        ]),
    };
    frame.render_widget(Paragraph::new(hints), *next.next().unwrap());
}
