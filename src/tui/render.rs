//! Widget construction for the dashboard.
//!
//! Everything is rebuilt from the current [`App`] state on every frame; no
//! chart state persists between cycles.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap},
    Frame,
};

use crate::response::TraceColor;
use crate::tui::app::{App, Focus, InputMode};

/// Map a trace color onto a terminal color.
fn terminal_color(color: TraceColor) -> Color {
    match color {
        TraceColor::Red => Color::Red,
        TraceColor::Gray => Color::Gray,
        TraceColor::Green => Color::Green,
        TraceColor::Blue => Color::Blue,
        TraceColor::Magenta => Color::Magenta,
        TraceColor::Cyan => Color::Cyan,
        TraceColor::Yellow => Color::Yellow,
        TraceColor::LightBlue => Color::LightBlue,
    }
}

/// Render the full dashboard.
pub fn ui(f: &mut Frame, app: &App) {
    let mut constraints = vec![Constraint::Length(3), Constraint::Min(12)];
    if app.show_log {
        constraints.push(Constraint::Length(9));
    }
    constraints.push(Constraint::Length(3));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    render_title(f, chunks[0], app);
    render_body(f, chunks[1], app);
    if app.show_log {
        render_log(f, chunks[2], app);
    }
    render_status(f, chunks[chunks.len() - 1], app);
}

fn render_body(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(38), Constraint::Min(40)])
        .split(area);

    render_sidebar(f, chunks[0], app);

    let charts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[1]);

    render_function_chart(f, charts[0], app);
    render_cumulative_bars(f, charts[1], app);
}

fn render_title(f: &mut Frame, area: Rect, app: &App) {
    let seed_info = app.params.seed.map_or_else(
        || "seedless".to_string(),
        |seed| format!("seed {seed}"),
    );
    let title = Paragraph::new(vec![Line::from(vec![
        Span::styled(
            " ANTIFRAGILE SHOCK DASHBOARD ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(
            app.params.distribution.to_string(),
            Style::default().fg(Color::White),
        ),
        Span::raw(" | "),
        Span::styled(
            format!("cycle {} ({seed_info})", app.cycle_count),
            Style::default().fg(Color::DarkGray),
        ),
    ])])
    .block(
        Block::default().borders(Borders::ALL).title(
            "Controls: [Tab] Focus  [←/→] Adjust  [D] Distribution  [E] Edit  [A] Apply  [R] Resample  [L] Log  [Q] Quit",
        ),
    );
    f.render_widget(title, area);
}

fn render_sidebar(f: &mut Frame, area: Rect, app: &App) {
    let editing = app.input_mode == InputMode::Editing;

    let control = |focus: Focus, label: String| -> Line<'static> {
        let focused = app.focus == focus;
        let marker = if focused { "▸ " } else { "  " };
        let mut style = Style::default().fg(Color::White);
        if focused {
            style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
        }
        let mut spans = vec![Span::raw(marker), Span::styled(label, style)];
        if focused && editing && focus.is_text() {
            spans.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
        }
        Line::from(spans)
    };

    let lines = vec![
        Line::from(Span::styled(
            "Simulation Parameters",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        control(
            Focus::ShockCount,
            format!("Number of shocks: {}", app.params.shock_count),
        ),
        control(
            Focus::Volatility,
            format!("Shock volatility σ: {:.1}", app.params.volatility),
        ),
        control(
            Focus::Distribution,
            format!("Distribution: {}", app.params.distribution),
        ),
        Line::raw(""),
        Line::from(Span::styled(
            "Custom Function",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        control(
            Focus::Expression,
            format!("f(x) = {}", app.expression_input),
        ),
        control(Focus::Label, format!("Label: {}", app.label_input)),
        Line::raw(""),
        Line::from(Span::styled(
            format!(
                "{} function(s), {} custom",
                app.functions.len(),
                app.functions.custom_count()
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let sidebar = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Parameters"));
    f.render_widget(sidebar, area);
}

fn render_function_chart(f: &mut Frame, area: Rect, app: &App) {
    let report = &app.report;
    let mut datasets = Vec::with_capacity(report.functions.len() * 2);

    for function in &report.functions {
        datasets.push(
            Dataset::default()
                .name(function.label.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(terminal_color(function.color)))
                .data(&function.curve),
        );
    }
    // Shock markers drawn after the curves so they sit on top
    for function in &report.functions {
        datasets.push(
            Dataset::default()
                .name(format!("{} shocks", function.label))
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(terminal_color(function.color)))
                .data(&function.shock_points),
        );
    }

    let (x_lo, x_hi) = report.x_range;
    let (y_lo, y_hi) = report.y_range();

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Functions and Shock Points"),
        )
        .x_axis(
            Axis::default()
                .title("Shock intensity (x)")
                .style(Style::default().fg(Color::Gray))
                .bounds([x_lo, x_hi])
                .labels([
                    format!("{x_lo:.1}"),
                    format!("{:.1}", (x_lo + x_hi) / 2.0),
                    format!("{x_hi:.1}"),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("Gain / Loss f(x)")
                .style(Style::default().fg(Color::Gray))
                .bounds([y_lo, y_hi])
                .labels([
                    format!("{y_lo:.1}"),
                    format!("{:.1}", (y_lo + y_hi) / 2.0),
                    format!("{y_hi:.1}"),
                ]),
        );
    f.render_widget(chart, area);
}

fn render_cumulative_bars(f: &mut Frame, area: Rect, app: &App) {
    let report = &app.report;

    // Bars can't show negative heights directly, so shift everything above
    // zero and print the signed total on each bar.
    let lo = report
        .functions
        .iter()
        .map(|f| f.cumulative)
        .fold(0.0f64, f64::min);
    let hi = report
        .functions
        .iter()
        .map(|f| f.cumulative)
        .fold(0.0f64, f64::max);
    let span = (hi - lo).max(1e-9);

    let bars: Vec<Bar> = report
        .functions
        .iter()
        .map(|function| {
            let scaled = ((function.cumulative - lo) / span * 100.0).round() as u64;
            Bar::default()
                .label(Line::from(truncate(&function.label, 12)))
                .value(scaled)
                .text_value(format!("{:+.2}", function.cumulative))
                .style(Style::default().fg(terminal_color(function.color)))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Cumulative Gain after Shocks"),
        )
        .bar_width(13)
        .bar_gap(2)
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, area);
}

fn render_log(f: &mut Frame, area: Rect, app: &App) {
    let report = &app.report;

    let shocks: Vec<String> = report
        .shocks
        .iter()
        .map(|v| format!("{v:+.3}"))
        .collect();

    let mut lines = vec![Line::from(vec![
        Span::styled("shocks: ", Style::default().fg(Color::Gray)),
        Span::raw(format!("[{}]", shocks.join(", "))),
    ])];

    for function in &report.functions {
        let mut spans = vec![
            Span::styled(
                format!("{}: ", function.label),
                Style::default().fg(terminal_color(function.color)),
            ),
            Span::raw(format!("cumulative {:+.4}", function.cumulative)),
        ];
        if function.skipped > 0 {
            spans.push(Span::styled(
                format!("  ({} point(s) skipped)", function.skipped),
                Style::default().fg(Color::Yellow),
            ));
        }
        if let Some(reason) = &function.failed {
            spans.push(Span::styled(
                format!("  FAILED: {reason}"),
                Style::default().fg(Color::Red),
            ));
        }
        lines.push(Line::from(spans));
    }

    let log = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Shock Log"));
    f.render_widget(log, area);
}

fn render_status(f: &mut Frame, area: Rect, app: &App) {
    let line = app.status.as_ref().map_or_else(
        || {
            Line::from(Span::styled(
                "Tab to a field and press E to define f(x), then A to apply",
                Style::default().fg(Color::DarkGray),
            ))
        },
        |status| {
            let (prefix, color) = if status.error {
                ("✗ ", Color::Red)
            } else {
                ("✓ ", Color::Green)
            };
            Line::from(vec![
                Span::styled(prefix, Style::default().fg(color)),
                Span::styled(status.message.clone(), Style::default().fg(color)),
            ])
        },
    );

    let status = Paragraph::new(vec![line]).block(Block::default().borders(Borders::ALL));
    f.render_widget(status, area);
}

/// Truncate a label to fit a bar.
fn truncate(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        label.to_string()
    } else {
        let cut: String = label.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
