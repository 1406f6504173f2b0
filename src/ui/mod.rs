use crate::app_state::{App, FocusArea, InputMode, ViewMode};
use crate::report::{Report, RoStatus};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Cell, Chart, Dataset as ChartSeries, GraphType, List, ListItem,
        Paragraph, Row, Table,
    },
    Frame,
};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(10),
        ])
        .split(f.size());

    render_top_bar(f, chunks[0], app);

    let middle_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(0)])
        .split(chunks[1]);

    render_left_menu(f, middle_chunks[0], app);
    render_main_view(f, middle_chunks[1], app);
    render_bottom_bar(f, chunks[2], app);
}

fn focus_style(app: &App, area: FocusArea) -> Style {
    if app.focus_area == area {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    }
}

fn header_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// `1234567` -> `1,234,567`
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn render_top_bar(f: &mut Frame, area: Rect, app: &App) {
    let status = if app.pending_refresh {
        Span::styled(" [updating…]", Style::default().fg(Color::Yellow))
    } else {
        Span::raw("")
    };
    let title_text = Line::from(vec![
        Span::styled(
            " RO vs Non-RO Dashboard (Corporate) ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" - Repeat Order Analysis"),
        status,
    ]);

    let paragraph = Paragraph::new(title_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        )
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

fn render_left_menu(f: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = ViewMode::MENU
        .iter()
        .enumerate()
        .map(|(i, view)| {
            let is_selected = i == app.menu_selected_index;
            let is_active = *view == app.view_mode;
            let style = if is_selected {
                if app.focus_area == FocusArea::Menu {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Magenta)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD)
                }
            } else if is_active {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            let prefix = if is_active { "● " } else { "○ " };
            ListItem::new(format!("{}{}", prefix, view.title())).style(style)
        })
        .collect();

    let title = if app.focus_area == FocusArea::Menu {
        "Menu (Enter)"
    } else {
        "Menu (← focus)"
    };
    let menu = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(focus_style(app, FocusArea::Menu)),
    );
    f.render_widget(menu, area);
}

fn view_block(app: &App, title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(focus_style(app, FocusArea::MainView))
}

fn render_main_view(f: &mut Frame, area: Rect, app: &App) {
    if app.view_mode == ViewMode::Filters {
        render_filters(f, area, app);
        return;
    }
    let Some(report) = app.report.as_ref() else {
        let block = view_block(app, app.view_mode.title().to_string());
        f.render_widget(Paragraph::new("Computing report…").block(block), area);
        return;
    };

    match app.view_mode {
        ViewMode::Overview => render_overview(f, area, app, report),
        ViewMode::Trend => render_trend(f, area, app, report),
        ViewMode::Segments => {
            let rows = report.segments.iter().map(|s| {
                Row::new(vec![
                    Cell::from(s.segment.clone()),
                    Cell::from(s.non_ro.to_string()),
                    Cell::from(s.ro.to_string()),
                ])
            });
            render_table(
                f,
                area,
                app,
                &["Product", "Non-RO", "RO"],
                &[
                    Constraint::Percentage(40),
                    Constraint::Percentage(30),
                    Constraint::Percentage(30),
                ],
                rows.collect(),
            );
        }
        ViewMode::TopAccounts => {
            let rows = report.top_accounts.iter().map(|a| {
                Row::new(vec![
                    Cell::from(a.account_name.clone()),
                    Cell::from(a.product_count.to_string()),
                    Cell::from(a.total_ro_transactions.to_string()),
                    Cell::from(a.detail.clone()),
                ])
            });
            render_table(
                f,
                area,
                app,
                &["Account", "RO Products", "RO Transactions", "Products & Transactions"],
                &[
                    Constraint::Percentage(30),
                    Constraint::Length(12),
                    Constraint::Length(16),
                    Constraint::Min(20),
                ],
                rows.collect(),
            );
        }
        ViewMode::MultiUnitDaily => {
            let rows = report.multi_unit_daily.iter().map(|m| {
                Row::new(vec![
                    Cell::from(m.key.format("%Y-%m-%d").to_string()),
                    Cell::from(m.account_name.clone()),
                    Cell::from(m.product_count.to_string()),
                    Cell::from(m.realization_count.to_string()),
                    Cell::from(m.products.clone()),
                ])
            });
            render_table(
                f,
                area,
                app,
                &["Date", "Account", "Products", "Realizations", "Segments"],
                &multi_unit_widths(),
                rows.collect(),
            );
        }
        ViewMode::MultiUnitMonthly => {
            let rows = report.multi_unit_monthly.iter().map(|m| {
                Row::new(vec![
                    Cell::from(m.key.clone()),
                    Cell::from(m.account_name.clone()),
                    Cell::from(m.product_count.to_string()),
                    Cell::from(m.realization_count.to_string()),
                    Cell::from(m.products.clone()),
                ])
            });
            render_table(
                f,
                area,
                app,
                &["Period", "Account", "Products", "Realizations", "Segments"],
                &multi_unit_widths(),
                rows.collect(),
            );
        }
        ViewMode::Records => {
            let rows = report.records.iter().map(|r| {
                let status_color = match r.ro_status() {
                    RoStatus::Ro => Color::Green,
                    RoStatus::NonRo => Color::Gray,
                };
                Row::new(vec![
                    Cell::from(r.txn.customer_id.as_str().to_string()),
                    Cell::from(r.txn.account_name.clone().unwrap_or_default()),
                    Cell::from(r.txn.segment.clone()),
                    Cell::from(r.txn.no_contract.clone()),
                    Cell::from(r.txn.realisasi_date.format("%Y-%m-%d").to_string()),
                    Cell::from(r.txn.month_name),
                    Cell::from(r.order_index.to_string()),
                    Cell::from(r.ro_status().label()).style(Style::default().fg(status_color)),
                ])
            });
            render_table(
                f,
                area,
                app,
                &[
                    "Customer", "Account", "Segment", "Contract", "Date", "Month", "Trx #",
                    "Status",
                ],
                &[
                    Constraint::Length(10),
                    Constraint::Min(16),
                    Constraint::Length(14),
                    Constraint::Length(14),
                    Constraint::Length(10),
                    Constraint::Length(9),
                    Constraint::Length(5),
                    Constraint::Length(6),
                ],
                rows.collect(),
            );
        }
        ViewMode::Filters => {}
    }
}

fn multi_unit_widths() -> [Constraint; 5] {
    [
        Constraint::Length(10),
        Constraint::Percentage(35),
        Constraint::Length(9),
        Constraint::Length(12),
        Constraint::Min(12),
    ]
}

fn render_table(
    f: &mut Frame,
    area: Rect,
    app: &App,
    headers: &[&str],
    widths: &[Constraint],
    rows: Vec<Row>,
) {
    let total = rows.len();
    let visible: Vec<Row> = rows.into_iter().skip(app.scroll).collect();
    let header = Row::new(headers.iter().map(|h| Cell::from(h.to_string()))).style(header_style());
    let title = if app.focus_area == FocusArea::MainView {
        format!(
            "{} [{} rows, from {}] (↑↓ PgUp/PgDn scroll, ← menu)",
            app.view_mode.title(),
            total,
            if total == 0 { 0 } else { app.scroll + 1 }
        )
    } else {
        format!("{} [{} rows]", app.view_mode.title(), total)
    };
    let table = Table::new(visible, widths.to_vec())
        .header(header)
        .block(view_block(app, title));
    f.render_widget(table, area);
}

fn render_overview(f: &mut Frame, area: Rect, app: &App, report: &Report) {
    let m = &report.metrics;
    let metric = |label: &str, value: String, color: Color| {
        Line::from(vec![
            Span::raw(format!("  {:<18}: ", label)),
            Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ])
    };
    let sel = &report.selection;
    let search = if sel.account_search.is_empty() {
        "-".to_string()
    } else {
        format!("\"{}\"", sel.account_search)
    };
    let lines = vec![
        Line::from(Span::styled("--- Key Metrics ---", header_style())),
        Line::from(""),
        metric("Total Customer", thousands(m.total_customers as u64), Color::White),
        metric("Total Produk", thousands(m.total_products as u64), Color::White),
        metric("RO Produk", thousands(m.ro_products as u64), Color::Green),
        metric("Non-RO Produk", thousands(m.non_ro_products as u64), Color::Gray),
        metric("RO Rate", format!("{:.1}%", m.ro_rate), Color::Cyan),
        metric("Customer RO", thousands(m.ro_customers as u64), Color::Green),
        metric("Customer Non-RO", thousands(m.non_ro_customers as u64), Color::Gray),
        Line::from(""),
        Line::from(Span::styled("--- Selection ---", header_style())),
        Line::from(format!(
            "  Years: {}   Months: {}/12   Segments: {}   Search: {}",
            sel.years
                .iter()
                .map(|y| y.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            sel.months.len(),
            sel.segments.len(),
            search
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Customer RO / Non-RO are counted per customer; a customer with any RO row is RO only.",
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];
    let title = app.view_mode.title().to_string();
    f.render_widget(Paragraph::new(lines).block(view_block(app, title)), area);
}

fn render_trend(f: &mut Frame, area: Rect, app: &App, report: &Report) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(65), Constraint::Min(4)])
        .split(area);

    let ro: Vec<(f64, f64)> = report
        .trend
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.ro as f64))
        .collect();
    let non_ro: Vec<(f64, f64)> = report
        .trend
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.non_ro as f64))
        .collect();
    let max_y = report
        .trend
        .iter()
        .map(|p| p.ro.max(p.non_ro))
        .max()
        .unwrap_or(0)
        .max(1) as f64;
    let max_x = report.trend.len().saturating_sub(1).max(1) as f64;

    let x_labels: Vec<Span> = match (report.trend.first(), report.trend.last()) {
        (Some(first), Some(last)) => vec![
            Span::raw(first.period.clone()),
            Span::raw(last.period.clone()),
        ],
        _ => vec![Span::raw("-")],
    };

    let series = vec![
        ChartSeries::default()
            .name("RO")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(&ro),
        ChartSeries::default()
            .name("Non-RO")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Magenta))
            .data(&non_ro),
    ];
    let chart = Chart::new(series)
        .block(view_block(app, "Tren RO vs Non-RO".to_string()))
        .x_axis(
            Axis::default()
                .title("Period")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, max_x])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("Rows")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, max_y])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format!("{}", (max_y / 2.0).round())),
                    Span::raw(format!("{}", max_y)),
                ]),
        );
    f.render_widget(chart, chunks[0]);

    let rows = report.trend.iter().map(|p| {
        Row::new(vec![
            Cell::from(p.period.clone()),
            Cell::from(p.non_ro.to_string()),
            Cell::from(p.ro.to_string()),
        ])
    });
    render_table(
        f,
        chunks[1],
        app,
        &["Period", "Non-RO", "RO"],
        &[
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
        rows.collect(),
    );
}

fn render_filters(f: &mut Frame, area: Rect, app: &App) {
    let entries = app.filter_entries();
    let height = area.height.saturating_sub(2) as usize;
    let skip = app.filter_cursor.saturating_sub(height.saturating_sub(1));

    let items: Vec<ListItem> = entries
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(i, entry)| {
            let mark = if app.is_selected(entry) { "[x] " } else { "[ ] " };
            let style = if i == app.filter_cursor && app.focus_area == FocusArea::MainView {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else if app.is_selected(entry) {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Gray)
            };
            ListItem::new(format!("{}{}", mark, entry.label())).style(style)
        })
        .collect();

    let search = if app.selection.account_search.is_empty() {
        "none".to_string()
    } else {
        format!("\"{}\"", app.selection.account_search)
    };
    let title = if app.focus_area == FocusArea::MainView {
        format!(
            "Filters [search: {}] (Space toggle, r reset, /search <text>)",
            search
        )
    } else {
        format!("Filters [search: {}]", search)
    };
    f.render_widget(List::new(items).block(view_block(app, title)), area);
}

fn render_bottom_bar(f: &mut Frame, area: Rect, app: &App) {
    let bottom_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let command_prompt = if app.input_mode == InputMode::Command {
        let mut spans = vec![Span::styled(
            "Command: ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )];
        let cur = app.command_cursor.min(app.command_input.len());
        let (left, right) = app.command_input.split_at(cur);
        spans.push(Span::raw(left));
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(right));
        if let Some(hint) = app.get_completion_hint() {
            spans.push(Span::styled(hint, Style::default().fg(Color::DarkGray)));
        }
        vec![
            Line::from(spans),
            Line::from("Enter run  Esc cancel  Tab complete  ←→ cursor  ↑↓ history"),
        ]
    } else {
        vec![
            Line::from(vec![
                Span::styled("Command: ", Style::default().fg(Color::Yellow)),
                Span::raw("(press / for command mode)"),
            ]),
            Line::from("/ command  ←→ focus  ↑↓ navigate  Enter select  Space toggle  r reset  ? help  q quit"),
        ]
    };
    let command_paragraph = Paragraph::new(command_prompt).block(
        Block::default()
            .borders(Borders::ALL)
            .title(if app.input_mode == InputMode::Command {
                "Command mode"
            } else {
                "Command"
            })
            .style(if app.input_mode == InputMode::Command {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            }),
    );
    f.render_widget(command_paragraph, bottom_chunks[0]);

    let log_items: Vec<ListItem> = app
        .log_messages
        .iter()
        .rev()
        .take(20)
        .map(|msg| {
            let style = if msg.starts_with('✓') {
                Style::default().fg(Color::Green)
            } else if msg.starts_with('✗') {
                Style::default().fg(Color::Red)
            } else if msg.starts_with('⚠') {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(msg.as_str()).style(style)
        })
        .collect();

    let log = List::new(log_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Log ({} entries)", app.log_messages.len()))
            .style(Style::default().fg(Color::White)),
    );
    f.render_widget(log, bottom_chunks[1]);
}
