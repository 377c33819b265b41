use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let height = (app.topics().len() as u16).saturating_add(9).min(area.height);
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .split(area);
    let column = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(48),
        Constraint::Fill(1),
    ])
    .split(chunks[1]);

    let mut content = vec![
        Line::from(Span::styled(
            "TOPIC QUIZ",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from("Pick the topics to be quizzed on".fg(Color::DarkGray)),
        Line::from(""),
    ];

    if app.topics().is_empty() {
        content.push(Line::from("No topic files found".fg(Color::Red)));
    }

    for (index, topic) in app.topics().iter().enumerate() {
        let is_cursor = index == app.menu_cursor();
        let checkbox = if app.is_topic_selected(index) { "[x]" } else { "[ ]" };
        let style = if is_cursor {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_cursor { ">" } else { " " };

        content.push(Line::from(vec![
            Span::styled(format!("{} {} ", marker, checkbox), style),
            Span::styled(topic.as_str(), style),
        ]));
    }

    content.push(Line::from(""));
    if let Some(message) = app.menu_message() {
        content.push(Line::from(message.fg(Color::Red)));
    } else {
        content.push(Line::from(""));
    }
    content.push(Line::from(vec![
        Span::styled("ENTER", Style::default().fg(Color::Green).bold()),
        Span::styled(" start  ·  space toggle  ·  q quit", Style::default().fg(Color::DarkGray)),
    ]));

    let widget = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(2)),
    );

    frame.render_widget(widget, column[1]);
}
