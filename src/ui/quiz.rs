use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap},
};

use crate::app::{App, Reveal};
use crate::models::Question;
use crate::timer::TimerUrgency;

const OPTION_LABELS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(question) = app.current_question() else {
        return;
    };
    let code = app.is_code_visible().then(|| question.code()).flatten();
    let chunks = create_layout(area, code.is_some());

    render_progress(frame, chunks[0], app, question);
    render_countdown(frame, chunks[1], app);
    render_question_text(frame, chunks[2], question);

    let options_chunk = match code {
        Some(code) => {
            render_code_block(frame, chunks[3], code);
            chunks[4]
        }
        None => chunks[3],
    };

    render_options(frame, options_chunk, app, question);

    let controls_chunk = chunks[chunks.len() - 1];
    render_controls(frame, controls_chunk, question.code().is_some());
}

fn create_layout(area: Rect, has_code: bool) -> std::rc::Rc<[Rect]> {
    if has_code {
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(12),
            Constraint::Length(1),
        ])
        .margin(1)
        .split(area)
    } else {
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .margin(2)
        .split(area)
    }
}

fn render_progress(frame: &mut Frame, area: Rect, app: &App, question: &Question) {
    let chunks = Layout::horizontal([Constraint::Fill(1), Constraint::Length(12)]).split(area);

    let topic = Paragraph::new(format!("{}  ·  #{}", question.topic(), question.position()))
        .fg(Color::DarkGray);
    frame.render_widget(topic, chunks[0]);

    let progress = format!(
        "{}/{}",
        app.current_question_number(),
        app.total_questions()
    );
    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, chunks[1]);
}

fn render_countdown(frame: &mut Frame, area: Rect, app: &App) {
    let snapshot = app.timer_snapshot();
    let color = match app.timer_urgency() {
        TimerUrgency::Calm => Color::Green,
        TimerUrgency::Warning => Color::Yellow,
        TimerUrgency::Critical => Color::Red,
    };

    let widget = Gauge::default()
        .gauge_style(Style::default().fg(color))
        .ratio(snapshot.progress.clamp(0.0, 1.0))
        .label(format!("Time: {}s", snapshot.seconds_remaining));
    frame.render_widget(widget, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, question: &Question) {
    let widget = Paragraph::new(question.text())
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_code_block(frame: &mut Frame, area: Rect, code: &str) {
    let code_lines: Vec<Line> = code
        .lines()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(Color::Yellow))))
        .collect();

    let widget = Paragraph::new(code_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .title(" code ")
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn option_style(index: usize, option: &str, app: &App, question: &Question) -> Style {
    match app.reveal() {
        Some(Reveal { chosen, is_correct }) => {
            if option == question.correct_answer() {
                Style::default().fg(Color::Green).bold()
            } else if index == chosen && !is_correct {
                Style::default().fg(Color::Red).bold()
            } else {
                Style::default().fg(Color::DarkGray)
            }
        }
        None if index == app.selected_option() => Style::default().fg(Color::Cyan).bold(),
        None => Style::default().fg(Color::Gray),
    }
}

fn render_options(frame: &mut Frame, area: Rect, app: &App, question: &Question) {
    let options = app.options();
    let mut lines: Vec<Line> = Vec::with_capacity(options.len() * 2);

    for (index, option) in options.iter().enumerate() {
        let style = option_style(index, option, app, question);
        let marker = if index == app.selected_option() { ">" } else { " " };
        let label = OPTION_LABELS.get(index).copied().unwrap_or('-');

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", label), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    if app.session().is_current_question_answered() && app.reveal().is_none() {
        lines.push(Line::from(Span::styled(
            " already answered",
            Style::default().fg(Color::DarkGray).italic(),
        )));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_controls(frame: &mut Frame, area: Rect, has_code: bool) {
    let text = if has_code {
        "j/k move · enter answer · n/p next/prev · s shuffle · c code · f finish · m menu · q quit"
    } else {
        "j/k move · enter answer · n/p next/prev · s shuffle · f finish · m menu · q quit"
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
