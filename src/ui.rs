pub mod charting;

use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
    Frame,
};
use time_humanize::{Accuracy, HumanTime, Tense};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, View};
use crate::engine::{CharState, EnginePhase};
use crate::history::{Change, HistoryEntry, HistorySummary};
use crate::timer::Clock;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const RECENT_CHART_LEN: usize = 20;
const RECENT_LIST_LEN: usize = 8;

pub fn draw<C: Clock + Clone>(app: &App<C>, f: &mut Frame) {
    f.render_widget(app, f.area());
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_bold() -> Style {
    bold().add_modifier(Modifier::DIM)
}

fn italic() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

fn format_change(change: Option<Change>) -> String {
    match change {
        Some(change) => format!(" ({}{})", change.trend, change.magnitude),
        None => String::new(),
    }
}

impl<C: Clock + Clone> Widget for &App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.view {
            View::Typing => render_typing(self, area, buf),
            View::History => render_history(self, area, buf),
        }
    }
}

fn render_typing<C: Clock + Clone>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let engine = &app.engine;

    if engine.phase() == EnginePhase::Idle {
        Paragraph::new(Span::styled(
            "No texts loaded",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, buf);
        return;
    }

    let text = engine.current_text().unwrap_or_default();
    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let text_lines = if text.width() <= max_chars_per_line as usize {
        1
    } else {
        ((text.width() as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16
    };
    let stats_lines = if app.settings().show_stats { 2 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(stats_lines),
            Constraint::Min(1),
            Constraint::Length(text_lines),
            Constraint::Min(1),
            Constraint::Length(1), // status
            Constraint::Length(1), // settings
            Constraint::Length(2), // legend
        ])
        .split(area);

    if app.settings().show_stats {
        render_stats_bar(app, chunks[0], buf);
    }

    let green_bold = bold().fg(Color::Green);
    let red_bold = bold().fg(Color::Red);
    let underlined_dim_bold = dim_bold().add_modifier(Modifier::UNDERLINED);

    let spans = engine
        .char_states()
        .into_iter()
        .map(|(c, state)| match state {
            CharState::Correct => Span::styled(c.to_string(), green_bold),
            CharState::Incorrect => Span::styled(
                match c {
                    ' ' => "·".to_owned(),
                    c => c.to_string(),
                },
                red_bold,
            ),
            CharState::Current => Span::styled(c.to_string(), underlined_dim_bold),
            CharState::Pending => Span::styled(c.to_string(), dim_bold()),
        })
        .collect::<Vec<Span>>();

    Paragraph::new(Line::from(spans))
        .alignment(if text_lines == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true })
        .render(chunks[2], buf);

    let status_style = if engine.is_transitioning() {
        bold().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };
    Paragraph::new(Span::styled(app.status_line(), status_style))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

    let settings = app.settings();
    Paragraph::new(Span::styled(
        format!(
            "auto-advance {} ({:.2}s)   sound {}",
            on_off(settings.auto_advance),
            settings.advance_delay_ms as f64 / 1000.0,
            on_off(settings.sound_enabled),
        ),
        Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);

    let mut legend = String::from("tab skip  ^r reset  ^a auto  ^s sound  ^t stats  ^h history");
    if app.texts.has_custom() {
        legend.push_str("  ^o texts");
    }
    legend.push_str("  esc quit");
    Paragraph::new(Span::styled(legend, italic()))
        .wrap(Wrap { trim: true })
        .render(chunks[6], buf);
}

fn render_stats_bar<C: Clock + Clone>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let engine = &app.engine;
    let mut lines = vec![Line::from(Span::styled(
        format!(
            "{} wpm   {}% acc   {} errors",
            engine.live_wpm(),
            engine.live_accuracy(),
            engine.error_positions().len()
        ),
        bold(),
    ))];

    if let Some(summary) = engine.history().summary() {
        let last = engine.history().last().map(|e| (e.wpm, e.accuracy));
        let (last_wpm, last_accuracy) = last.unwrap_or_default();
        lines.push(Line::from(Span::styled(
            format!(
                "last {} wpm{}  {}%{}   best {} wpm  {}%   {} done",
                last_wpm,
                format_change(summary.wpm_change),
                last_accuracy,
                format_change(summary.accuracy_change),
                summary.best_wpm,
                summary.best_accuracy,
                summary.completed
            ),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
        )));
    }

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_history<C: Clock + Clone>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let history = app.engine.history();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(3), // summary
            Constraint::Min(4),    // chart
            Constraint::Length(RECENT_LIST_LEN as u16),
            Constraint::Length(1), // legend
        ])
        .split(area);

    let legend = Paragraph::new(Span::styled("^h back  ^r reset  esc quit", italic()));

    let Some(summary) = history.summary() else {
        Paragraph::new(Span::styled("No completed texts yet", dim_bold()))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);
        legend.render(chunks[3], buf);
        return;
    };

    let per_round = HistorySummary::per_round(history.entries())
        .into_iter()
        .map(|(round, count)| format!("round {round}: {count}"))
        .collect::<Vec<_>>()
        .join("   ");
    Paragraph::new(vec![
        Line::from(Span::styled(
            format!(
                "{} texts   avg {} wpm   avg {}% acc   {} errors   {:.0}s typing",
                summary.completed,
                summary.average_wpm,
                summary.average_accuracy,
                summary.total_errors,
                summary.total_secs
            ),
            bold(),
        )),
        Line::from(Span::styled(
            format!(
                "best {} wpm   best {}% acc   fewest {} errors   fastest {:.1}s",
                summary.best_wpm, summary.best_accuracy, summary.fewest_errors, summary.fastest_secs
            ),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(Span::styled(per_round, italic())),
    ])
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    let recent = history.recent_wpm(RECENT_CHART_LEN);
    let (overall, highest_wpm) = charting::compute_chart_params(&recent);
    let points = charting::wpm_points(&recent);
    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(Style::default().fg(Color::Magenta))
        .graph_type(GraphType::Line)
        .data(&points)];

    if chunks[1].height > 2 && chunks[1].width > 10 {
        render_chart(datasets, overall, highest_wpm, chunks[1], buf);
    }

    let rows = history
        .entries()
        .iter()
        .rev()
        .take(RECENT_LIST_LEN)
        .map(|entry| Line::from(Span::raw(format_entry(entry))))
        .collect::<Vec<_>>();
    Paragraph::new(rows).render(chunks[2], buf);

    legend.render(chunks[3], buf);
}

fn render_chart(datasets: Vec<Dataset>, overall: f64, highest_wpm: f64, area: Rect, buf: &mut Buffer) {
    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("text")
                .bounds([0.0, overall])
                .labels(vec![
                    Span::styled("0", bold()),
                    Span::styled(charting::format_label(overall), bold()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .bounds([0.0, highest_wpm])
                .labels(vec![
                    Span::styled("0", bold()),
                    Span::styled(charting::format_label(highest_wpm), bold()),
                ]),
        )
        .render(area, buf);
}

fn format_entry(entry: &HistoryEntry) -> String {
    let age = (Local::now() - entry.completed_at)
        .to_std()
        .unwrap_or_default();
    format!(
        "round {:<3} text {:<4} {:>4} wpm {:>4}% {:>3} errors {:>6.1}s   {}",
        entry.round,
        entry.text_index + 1,
        entry.wpm,
        entry.accuracy,
        entry.errors,
        entry.elapsed_secs,
        HumanTime::from(age).to_text_en(Accuracy::Rough, Tense::Past)
    )
}
