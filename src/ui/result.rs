use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Padding, Paragraph, Row, Table},
};

use crate::app::App;
use crate::results::{ResultReport, ScoreBand};

const BAR_WIDTH: u16 = 3;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let report = app.report();
    let grade_color = get_grade_color(report.band);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(8),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], &report, grade_color);

    let breakdown =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(chunks[2]);
    render_topic_table(frame, breakdown[0], &report, app.result_scroll());
    render_topic_chart(frame, breakdown[1], &report);

    render_controls(frame, chunks[3]);
}

fn get_grade_color(band: ScoreBand) -> Color {
    match band {
        ScoreBand::Excellent => Color::Green,
        ScoreBand::Good => Color::Cyan,
        ScoreBand::Fair => Color::Yellow,
        ScoreBand::Poor => Color::Red,
    }
}

fn render_score_summary(frame: &mut Frame, area: Rect, report: &ResultReport, grade_color: Color) {
    let content = vec![
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{}  ({:.0}%)", report.score_text, report.score * 100.0),
            Style::default().fg(grade_color).bold(),
        )),
        Line::from(Span::styled(report.feedback, Style::default().fg(Color::White))),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("Correct: {}", report.correct),
                Style::default().fg(Color::Green),
            ),
            Span::raw("   "),
            Span::styled(
                format!("Wrong: {} ({:.0}%)", report.wrong, report.wrong_ratio() * 100.0),
                Style::default().fg(Color::Red),
            ),
        ]),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_topic_table(frame: &mut Frame, area: Rect, report: &ResultReport, scroll: usize) {
    let rows: Vec<Row> = report
        .topics
        .iter()
        .skip(scroll)
        .map(|row| {
            Row::new(vec![
                Line::from(row.topic.as_str()).fg(Color::Gray),
                Line::from(row.correct.to_string()).fg(Color::Green),
                Line::from(row.wrong.to_string()).fg(Color::Red),
            ])
        })
        .collect();

    let header = Row::new(vec!["Topic", "Correct", "Wrong"])
        .style(Style::default().fg(Color::DarkGray).bold());

    let widget = Table::new(
        rows,
        [
            Constraint::Fill(1),
            Constraint::Length(8),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(Block::default().padding(Padding::horizontal(1)));
    frame.render_widget(widget, area);
}

fn render_topic_chart(frame: &mut Frame, area: Rect, report: &ResultReport) {
    let mut chart = BarChart::default()
        .bar_width(BAR_WIDTH)
        .bar_gap(0)
        .group_gap(2)
        .block(
            Block::default()
                .borders(Borders::LEFT)
                .border_style(Color::DarkGray)
                .padding(Padding::horizontal(1)),
        );

    for row in &report.topics {
        let bars = [
            Bar::default()
                .value(row.correct as u64)
                .style(Style::default().fg(Color::Green)),
            Bar::default()
                .value(row.wrong as u64)
                .style(Style::default().fg(Color::Red)),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(row.topic.as_str()))
                .bars(&bars),
        );
    }

    frame.render_widget(chart, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  r menu  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
