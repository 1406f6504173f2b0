use crate::commands::{AppCommand, Choice, HELP_TEXT};
use crate::dataset::temporal::month_name;
use crate::dataset::Dataset;
use crate::report::{Report, Selection};
use crossterm::event::KeyCode;
use std::collections::BTreeSet;
use std::str::FromStr;
use tokio::sync::mpsc;

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum ViewMode {
    Overview,
    Trend,
    Segments,
    TopAccounts,
    MultiUnitDaily,
    MultiUnitMonthly,
    Records,
    Filters,
}

impl ViewMode {
    pub const MENU: [ViewMode; 8] = [
        ViewMode::Overview,
        ViewMode::Trend,
        ViewMode::Segments,
        ViewMode::TopAccounts,
        ViewMode::MultiUnitDaily,
        ViewMode::MultiUnitMonthly,
        ViewMode::Records,
        ViewMode::Filters,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ViewMode::Overview => "Overview",
            ViewMode::Trend => "RO Trend",
            ViewMode::Segments => "Per Segment",
            ViewMode::TopAccounts => "Top RO Accounts",
            ViewMode::MultiUnitDaily => "Multi-Unit / Date",
            ViewMode::MultiUnitMonthly => "Multi-Unit / Month",
            ViewMode::Records => "Detail Data",
            ViewMode::Filters => "Filters",
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub enum InputMode {
    Normal,
    Command,
}

#[derive(PartialEq, Debug, Clone)]
pub enum FocusArea {
    Menu,
    MainView,
}

/// One checkbox line in the Filters view.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEntry {
    Year(i32),
    Month(u32),
    Segment(String),
}

impl FilterEntry {
    pub fn label(&self) -> String {
        match self {
            FilterEntry::Year(y) => format!("Year     {}", y),
            FilterEntry::Month(m) => format!("Month    {}", month_name(*m)),
            FilterEntry::Segment(s) => format!("Segment  {}", s),
        }
    }
}

#[derive(Debug)]
pub enum AppEvent {
    Message(String),
    Error(String),
    Report(Box<Report>),
}

pub struct App {
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub focus_area: FocusArea,
    pub menu_selected_index: usize,
    pub available_years: BTreeSet<i32>,
    pub available_segments: BTreeSet<String>,
    pub selection: Selection,
    pub report: Option<Report>,
    pub pending_refresh: bool,
    pub scroll: usize,
    pub filter_cursor: usize,
    pub command_input: String,
    pub command_cursor: usize,
    pub command_history: Vec<String>,
    pub command_history_index: Option<usize>,
    pub log_messages: Vec<String>,
    pub cmd_tx: mpsc::UnboundedSender<AppCommand>,
    pub evt_rx: Option<mpsc::UnboundedReceiver<AppEvent>>,
}

impl App {
    pub fn new(
        dataset: &Dataset,
        startup_info: Vec<String>,
        cmd_tx: mpsc::UnboundedSender<AppCommand>,
        evt_rx: mpsc::UnboundedReceiver<AppEvent>,
    ) -> App {
        let mut log_messages = vec!["Dashboard started".to_string()];
        log_messages.extend(startup_info);

        App {
            view_mode: ViewMode::Overview,
            input_mode: InputMode::Normal,
            focus_area: FocusArea::Menu,
            menu_selected_index: 0,
            available_years: dataset.years(),
            available_segments: dataset.segments(),
            selection: Selection::all_of(dataset),
            report: None,
            pending_refresh: false,
            scroll: 0,
            filter_cursor: 0,
            command_input: String::new(),
            command_cursor: 0,
            command_history: Vec::new(),
            command_history_index: None,
            log_messages,
            cmd_tx,
            evt_rx: Some(evt_rx),
        }
    }

    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
    }

    /// Ghost text for the command line.
    pub fn get_completion_hint(&self) -> Option<String> {
        let commands = ["year", "month", "segment", "search", "reset", "help", "quit"];
        let input = self.command_input.trim_start();
        if input.is_empty() {
            return None;
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.len() == 1 && !input.ends_with(' ') {
            return commands
                .iter()
                .find(|c| c.starts_with(parts[0]) && **c != parts[0])
                .map(|c| c[parts[0].len()..].to_string());
        }
        if parts.len() == 2 && matches!(parts[0], "year" | "month" | "segment") {
            let cur = parts[1];
            for s in ["all", "none"] {
                if s.starts_with(cur) && s != cur {
                    return Some(s[cur.len()..].to_string());
                }
            }
        }
        None
    }

    pub fn request_report(&mut self) {
        self.pending_refresh = true;
        let _ = self.cmd_tx.send(AppCommand::Refresh {
            selection: self.selection.clone(),
        });
    }

    pub fn set_report(&mut self, report: Report) {
        // A newer request may already be queued behind this one.
        if report.selection == self.selection {
            self.pending_refresh = false;
        }
        self.report = Some(report);
        self.clamp_scroll();
    }

    pub fn reset_selection(&mut self) {
        self.selection = Selection {
            years: self.available_years.clone(),
            months: (1..=12).collect(),
            segments: self.available_segments.clone(),
            account_search: String::new(),
        };
    }

    /// Applies a parsed command. Returns `true` when the app should exit.
    pub fn apply_command(&mut self, cmd: AppCommand) -> bool {
        match cmd {
            AppCommand::Years(choice) => {
                self.selection.years = match choice {
                    Choice::All => self.available_years.clone(),
                    Choice::Nothing => BTreeSet::new(),
                    Choice::Only(years) => {
                        for y in years.iter().filter(|y| !self.available_years.contains(*y)) {
                            self.log_messages.push(format!("⚠ no data for year {}", y));
                        }
                        years.into_iter().collect()
                    }
                };
                self.request_report();
            }
            AppCommand::Months(choice) => {
                self.selection.months = match choice {
                    Choice::All => (1..=12).collect(),
                    Choice::Nothing => BTreeSet::new(),
                    Choice::Only(months) => months.into_iter().collect(),
                };
                self.request_report();
            }
            AppCommand::Segments(choice) => {
                self.selection.segments = match choice {
                    Choice::All => self.available_segments.clone(),
                    Choice::Nothing => BTreeSet::new(),
                    Choice::Only(names) => {
                        let mut picked = BTreeSet::new();
                        for name in names {
                            match self
                                .available_segments
                                .iter()
                                .find(|s| s.eq_ignore_ascii_case(&name))
                            {
                                Some(s) => {
                                    picked.insert(s.clone());
                                }
                                None => self
                                    .log_messages
                                    .push(format!("⚠ unknown segment: {}", name)),
                            }
                        }
                        picked
                    }
                };
                self.request_report();
            }
            AppCommand::Search(text) => {
                self.selection.account_search = text;
                self.request_report();
            }
            AppCommand::Reset => {
                self.reset_selection();
                self.request_report();
            }
            AppCommand::Quit => return true,
            other => {
                let _ = self.cmd_tx.send(other);
            }
        }
        false
    }

    pub fn filter_entries(&self) -> Vec<FilterEntry> {
        self.available_years
            .iter()
            .map(|y| FilterEntry::Year(*y))
            .chain((1..=12).map(FilterEntry::Month))
            .chain(
                self.available_segments
                    .iter()
                    .map(|s| FilterEntry::Segment(s.clone())),
            )
            .collect()
    }

    pub fn is_selected(&self, entry: &FilterEntry) -> bool {
        match entry {
            FilterEntry::Year(y) => self.selection.years.contains(y),
            FilterEntry::Month(m) => self.selection.months.contains(m),
            FilterEntry::Segment(s) => self.selection.segments.contains(s),
        }
    }

    pub fn toggle_filter_entry(&mut self, idx: usize) {
        let Some(entry) = self.filter_entries().into_iter().nth(idx) else {
            return;
        };
        match entry {
            FilterEntry::Year(y) => {
                if !self.selection.years.remove(&y) {
                    self.selection.years.insert(y);
                }
            }
            FilterEntry::Month(m) => {
                if !self.selection.months.remove(&m) {
                    self.selection.months.insert(m);
                }
            }
            FilterEntry::Segment(s) => {
                if !self.selection.segments.remove(&s) {
                    self.selection.segments.insert(s);
                }
            }
        }
        self.request_report();
    }

    /// Number of scrollable rows in the current view.
    pub fn row_count(&self) -> usize {
        if self.view_mode == ViewMode::Filters {
            return self.filter_entries().len();
        }
        let Some(report) = &self.report else {
            return 0;
        };
        match self.view_mode {
            ViewMode::Overview => 0,
            ViewMode::Trend => report.trend.len(),
            ViewMode::Segments => report.segments.len(),
            ViewMode::TopAccounts => report.top_accounts.len(),
            ViewMode::MultiUnitDaily => report.multi_unit_daily.len(),
            ViewMode::MultiUnitMonthly => report.multi_unit_monthly.len(),
            ViewMode::Records => report.records.len(),
            ViewMode::Filters => 0,
        }
    }

    fn clamp_scroll(&mut self) {
        let max = self.row_count().saturating_sub(1);
        if self.scroll > max {
            self.scroll = max;
        }
        if self.view_mode == ViewMode::Filters && self.filter_cursor > max {
            self.filter_cursor = max;
        }
    }

    fn move_down(&mut self, step: usize) {
        let max = self.row_count().saturating_sub(1);
        if self.view_mode == ViewMode::Filters {
            self.filter_cursor = (self.filter_cursor + step).min(max);
        } else {
            self.scroll = (self.scroll + step).min(max);
        }
    }

    fn move_up(&mut self, step: usize) {
        if self.view_mode == ViewMode::Filters {
            self.filter_cursor = self.filter_cursor.saturating_sub(step);
        } else {
            self.scroll = self.scroll.saturating_sub(step);
        }
    }

    fn finish_command(&mut self) {
        self.command_history_index = None;
        self.command_input.clear();
        self.command_cursor = 0;
        self.input_mode = InputMode::Normal;
    }

    pub fn handle_key_event(&mut self, key: KeyCode) -> bool {
        if self.input_mode == InputMode::Command {
            match key {
                KeyCode::Enter => {
                    let cmd_owned = self.command_input.trim().to_string();
                    if cmd_owned.is_empty() {
                        self.finish_command();
                        return false;
                    }
                    let app_cmd = AppCommand::from_str(&cmd_owned)
                        .unwrap_or_else(|_| AppCommand::Unknown(cmd_owned.clone()));
                    self.command_history.push(cmd_owned);
                    self.finish_command();
                    return self.apply_command(app_cmd);
                }
                KeyCode::Esc => {
                    self.finish_command();
                    return false;
                }
                KeyCode::Tab => {
                    if let Some(hint) = self.get_completion_hint() {
                        let insert = format!("{} ", hint);
                        self.command_input.insert_str(self.command_cursor, &insert);
                        self.command_cursor += insert.len();
                    }
                    return false;
                }
                KeyCode::Up => {
                    if self.command_history.is_empty() {
                        return false;
                    }
                    let next = match self.command_history_index {
                        None => self.command_history.len().saturating_sub(1),
                        Some(i) => i.saturating_sub(1),
                    };
                    self.command_history_index = Some(next);
                    if let Some(cmd) = self.command_history.get(next) {
                        self.command_input = cmd.clone();
                        self.command_cursor = self.command_input.len();
                    }
                    return false;
                }
                KeyCode::Down => {
                    let next = match self.command_history_index {
                        None => return false,
                        Some(i) => {
                            let n = i + 1;
                            if n >= self.command_history.len() {
                                self.command_history_index = None;
                                self.command_input.clear();
                                self.command_cursor = 0;
                                return false;
                            }
                            n
                        }
                    };
                    self.command_history_index = Some(next);
                    if let Some(cmd) = self.command_history.get(next) {
                        self.command_input = cmd.clone();
                        self.command_cursor = self.command_input.len();
                    }
                    return false;
                }
                KeyCode::Backspace => {
                    if self.command_cursor > 0 {
                        let prev = prev_char_boundary(&self.command_input, self.command_cursor);
                        self.command_input.remove(prev);
                        self.command_cursor = prev;
                    }
                    return false;
                }
                KeyCode::Delete => {
                    if self.command_cursor < self.command_input.len() {
                        self.command_input.remove(self.command_cursor);
                    }
                    return false;
                }
                KeyCode::Left => {
                    if self.command_cursor > 0 {
                        self.command_cursor =
                            prev_char_boundary(&self.command_input, self.command_cursor);
                    }
                    return false;
                }
                KeyCode::Right => {
                    if let Some(c) = self.command_input[self.command_cursor..].chars().next() {
                        self.command_cursor += c.len_utf8();
                    }
                    return false;
                }
                KeyCode::Home => {
                    self.command_cursor = 0;
                    return false;
                }
                KeyCode::End => {
                    self.command_cursor = self.command_input.len();
                    return false;
                }
                KeyCode::Char(c) => {
                    self.command_input.insert(self.command_cursor, c);
                    self.command_cursor += c.len_utf8();
                    return false;
                }
                _ => return false,
            }
        }

        match key {
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Command;
                self.command_input.clear();
                self.command_cursor = 0;
                false
            }
            KeyCode::Char('q') => true,
            KeyCode::Char('?') => {
                self.add_log(HELP_TEXT.to_string());
                false
            }
            KeyCode::Char('r') => {
                self.reset_selection();
                self.request_report();
                false
            }
            KeyCode::Left => {
                self.focus_area = FocusArea::Menu;
                false
            }
            KeyCode::Right => {
                self.focus_area = FocusArea::MainView;
                false
            }
            KeyCode::Up => {
                if self.focus_area == FocusArea::Menu {
                    self.menu_selected_index = self.menu_selected_index.saturating_sub(1);
                } else {
                    self.move_up(1);
                }
                false
            }
            KeyCode::Down => {
                if self.focus_area == FocusArea::Menu {
                    if self.menu_selected_index < ViewMode::MENU.len() - 1 {
                        self.menu_selected_index += 1;
                    }
                } else {
                    self.move_down(1);
                }
                false
            }
            KeyCode::PageUp => {
                self.move_up(10);
                false
            }
            KeyCode::PageDown => {
                self.move_down(10);
                false
            }
            KeyCode::Enter | KeyCode::Char('c') | KeyCode::Char(' ') => {
                if self.focus_area == FocusArea::Menu {
                    if let Some(view) = ViewMode::MENU.get(self.menu_selected_index) {
                        if *view != self.view_mode {
                            self.view_mode = *view;
                            self.scroll = 0;
                        }
                    }
                    self.focus_area = FocusArea::MainView;
                } else if self.view_mode == ViewMode::Filters {
                    self.toggle_filter_entry(self.filter_cursor);
                }
                false
            }
            _ => false,
        }
    }
}

fn prev_char_boundary(s: &str, idx: usize) -> usize {
    s[..idx]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}
