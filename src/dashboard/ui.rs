use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, Padding, Paragraph};
use ratatui::Frame;

use super::snapshot::Header;
use super::App;
use crate::api::{FrequencyTable, Summary};
use crate::rank;

/// Panels don't grow past this, the rest of the terminal stays empty.
const MAX_WIDTH: u16 = 82;

pub fn summary_rows(s: &Summary) -> Vec<(&'static str, String)> {
    vec![
        ("Status", s.status.clone()),
        ("Blocked Domains", s.ads_blocked_today.clone()),
        ("Blocked Percentage", format!("{}%", s.ads_percentage_today)),
        ("DNS Queries Today", s.dns_queries_today.clone()),
        ("Domains Being Blocked", s.domains_being_blocked.clone()),
        ("Queries Cached", s.queries_cached.clone()),
        ("Queries Forwarded", s.queries_forwarded.clone()),
        ("Clients Ever Seen", s.clients_ever_seen.clone()),
        ("Unique Clients", s.unique_clients.clone()),
        ("Unique Domains", s.unique_domains.clone()),
    ]
}

/// `(count, label)` with the count right aligned.
pub fn top_rows(table: &FrequencyTable, n: usize) -> Vec<(String, String)> {
    rank::top(table, n)
        .into_iter()
        .map(|(label, count)| (format!("{:>5}", count), label.to_string()))
        .collect()
}

pub fn api_line(header: &Header) -> String {
    format!("{:.1} {}", header.version.version, header.kind.kind)
}

fn value_style() -> Style {
    Style::default().fg(Color::Blue)
}

fn panel<'a>(title: &'a str, lines: Vec<Line<'a>>) -> List<'a> {
    List::new(lines)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::bordered().title(title).padding(Padding::left(1)))
}

fn summary_panel(s: &Summary) -> List<'_> {
    let lines = summary_rows(s)
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::raw(format!("{}: ", label)),
                Span::styled(value, value_style()),
            ])
        })
        .collect();
    panel("Summary", lines)
}

fn top_panel<'a>(title: &'a str, table: &FrequencyTable, n: usize) -> List<'a> {
    let lines = top_rows(table, n)
        .into_iter()
        .map(|(count, label)| {
            Line::from(vec![
                Span::styled(count, value_style()),
                Span::raw(": "),
                Span::raw(label),
            ])
        })
        .collect();
    panel(title, lines)
}

/// Layout is derived from the frame size on every draw.
pub fn draw(frame: &mut Frame, app: &App) {
    let [area] = Layout::horizontal([Constraint::Max(MAX_WIDTH)])
        .flex(Flex::Center)
        .areas(frame.area());

    let [title, api, recent, grid, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let [upper, lower] = Layout::vertical([Constraint::Percentage(50); 2]).areas(grid);
    let [summary, blocked] = halves(upper);
    let [clients, queries] = halves(lower);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            "Pi-hole Dashboard ".green(),
            format!("http://{}/admin/index.php", app.host).blue(),
        ]))
        .centered(),
        title,
    );
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            "API: ".yellow(),
            api_line(&app.header).blue(),
        ]))
        .centered(),
        api,
    );
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            "Last Blocked: ".yellow(),
            app.snapshot.recent_blocked.trim().blue(),
        ]))
        .block(Block::bordered().padding(Padding::left(1))),
        recent,
    );

    let n = app.count as usize;
    frame.render_widget(summary_panel(&app.snapshot.summary), summary);
    frame.render_widget(top_panel("Top Blocked", &app.snapshot.top.blocked, n), blocked);
    frame.render_widget(top_panel("Top Clients", &app.snapshot.clients.clients, n), clients);
    frame.render_widget(top_panel("Top Queries", &app.snapshot.top.queries, n), queries);

    let status_line = match app.error.as_deref() {
        Some(err) => Line::from(vec!["refresh failed: ".red(), err.red()]),
        None => Line::from(
            format!("updated {}, press q to quit", app.updated.format("%H:%M:%S")).dark_gray(),
        ),
    };
    frame.render_widget(Paragraph::new(status_line).centered(), status);
}

fn halves(area: Rect) -> [Rect; 2] {
    Layout::horizontal([Constraint::Percentage(50); 2]).areas(area)
}
