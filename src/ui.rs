use anyhow::Result;
use care_finder::catalog::ProviderSource;
use care_finder::notify::{ToastLevel, ToastLog};
use care_finder::provider::{
    cycle_option, distance_label, specialty_label, DISTANCE_OPTIONS, SPECIALTY_OPTIONS,
};
use care_finder::records::{display_date, recent_visits, test_results, ResultStatus};
use care_finder::render::{compose_view, star_rating, ProviderCard, ResultView};
use care_finder::search::{CatalogStatus, SearchController};
use care_finder::support::{SupportRequest, SupportTicket, SUPPORT_HOURS};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    FindDoctor,
    Visits,
    TestResults,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::FindDoctor => Page::Visits,
            Page::Visits => Page::TestResults,
            Page::TestResults => Page::FindDoctor,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::FindDoctor => Page::TestResults,
            Page::Visits => Page::FindDoctor,
            Page::TestResults => Page::Visits,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::FindDoctor => "Find a Doctor",
            Page::Visits => "Visits & Procedures",
            Page::TestResults => "Test Results",
        }
    }
}

/// Where keystrokes go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Support,
}

pub struct App {
    pub controller: SearchController,
    source: Box<dyn ProviderSource>,
    pub state: TableState,
    pub current_page: Page,
    pub show_detail: bool,
    pub input_mode: InputMode,
    /// Some while the Contact Support dialog is open
    pub support: Option<SupportRequest>,
    pub toasts: ToastLog,
    /// Ticket from the last accepted support request
    pub last_ticket: Option<SupportTicket>,
    seen_generation: u64,
}

impl App {
    pub fn new(source: Box<dyn ProviderSource>) -> Self {
        let controller = SearchController::mount(source.as_ref());

        let mut app = Self {
            seen_generation: controller.generation(),
            controller,
            source,
            state: TableState::default(),
            current_page: Page::FindDoctor,
            show_detail: false,
            input_mode: InputMode::Normal,
            support: None,
            toasts: ToastLog::new(),
            last_ticket: None,
        };
        app.reset_selection();
        app
    }

    fn reset_selection(&mut self) {
        if self.controller.results().is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    /// Recompute-then-redraw step: after any controller mutation the
    /// selection is reset against the new result list.
    pub fn sync(&mut self) {
        let generation = self.controller.generation();
        if generation != self.seen_generation {
            self.seen_generation = generation;
            self.reset_selection();
        }
    }

    pub fn selected_card(&self) -> Option<ProviderCard> {
        self.state
            .selected()
            .and_then(|i| self.controller.results().get(i))
            .map(ProviderCard::from)
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    pub fn cycle_specialty(&mut self) {
        let next = cycle_option(SPECIALTY_OPTIONS, &self.controller.query().specialty_filter);
        self.controller.set_specialty_filter(next);
    }

    pub fn cycle_distance(&mut self) {
        let next = cycle_option(DISTANCE_OPTIONS, &self.controller.query().distance_filter);
        self.controller.set_distance_filter(next);
    }

    pub fn retry(&mut self) {
        if matches!(self.controller.status(), CatalogStatus::Unavailable(_)) {
            self.controller.retry(self.source.as_ref());
        }
    }

    pub fn open_support(&mut self) {
        self.support = Some(SupportRequest::default());
        self.input_mode = InputMode::Support;
    }

    pub fn close_support(&mut self) {
        self.support = None;
        self.input_mode = InputMode::Normal;
    }

    fn submit_support(&mut self) {
        let request = match &self.support {
            Some(r) => r.clone(),
            None => return,
        };

        let mut closed = false;
        match request.submit(&mut self.toasts, || closed = true) {
            Ok(ticket) => {
                tracing::debug!(ticket = %ticket.id, "Support dialog submitted");
                self.last_ticket = Some(ticket);
            }
            // Already shown as an error toast; the dialog stays open
            Err(err) => tracing::debug!(error = %err, "Support dialog rejected"),
        }
        if closed {
            self.close_support();
        }
    }

    pub fn next(&mut self) {
        let len = self.controller.results().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.controller.results().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    /// Returns false when the user asked to quit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.input_mode {
            InputMode::Normal => return self.handle_normal_key(key),
            InputMode::Search => self.handle_search_key(key),
            InputMode::Support => self.handle_support_key(key),
        }
        self.sync();
        true
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Tab => self.next_page(),
            KeyCode::BackTab => self.previous_page(),
            KeyCode::Enter => self.toggle_detail(),
            KeyCode::Char('/') => {
                self.current_page = Page::FindDoctor;
                self.input_mode = InputMode::Search;
            }
            KeyCode::Char('f') => self.cycle_specialty(),
            KeyCode::Char('d') => self.cycle_distance(),
            KeyCode::Char('c') => {
                self.controller.clear_filters();
                self.current_page = Page::FindDoctor;
            }
            KeyCode::Char('r') => self.retry(),
            KeyCode::Char('s') => self.open_support(),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Home => {
                if !self.controller.results().is_empty() {
                    self.state.select(Some(0));
                }
            }
            KeyCode::End => {
                let len = self.controller.results().len();
                if len > 0 {
                    self.state.select(Some(len - 1));
                }
            }
            _ => {}
        }
        self.sync();
        true
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.controller.submit_search();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Backspace => {
                let mut term = self.controller.query().search_term.clone();
                term.pop();
                self.controller.set_search_term(&term);
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let mut term = self.controller.query().search_term.clone();
                term.push(c);
                self.controller.set_search_term(&term);
            }
            _ => {}
        }
    }

    fn handle_support_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.close_support(),
            KeyCode::Enter => self.submit_support(),
            KeyCode::Tab => {
                if let Some(request) = self.support.as_mut() {
                    request.topic = request.topic.next();
                }
            }
            KeyCode::Backspace => {
                if let Some(request) = self.support.as_mut() {
                    request.message.pop();
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(request) = self.support.as_mut() {
                    request.message.push(c);
                }
            }
            _ => {}
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "UI loop failed");
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::FindDoctor => render_finder(f, chunks[1], app),
        Page::Visits => render_visits(f, chunks[1]),
        Page::TestResults => render_test_results(f, chunks[1]),
    }

    render_status_bar(f, chunks[2], app);

    if app.support.is_some() {
        render_support_dialog(f, app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::FindDoctor, Page::Visits, Page::TestResults];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Providers: {}", app.controller.catalog_len()),
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_finder(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search form
            Constraint::Min(0),    // Results
        ])
        .split(area);

    render_search_form(f, chunks[0], app);

    if app.show_detail {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(60), // Result list
                Constraint::Percentage(40), // Detail panel
            ])
            .split(chunks[1]);

        render_results(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        render_results(f, chunks[1], app);
    }
}

fn render_search_form(f: &mut Frame, area: Rect, app: &App) {
    let query = app.controller.query();
    let editing = app.input_mode == InputMode::Search;

    let term_style = if editing {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let term = if query.search_term.is_empty() && !editing {
        Span::styled(
            "Search by doctor name or specialty...",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )
    } else if editing {
        Span::styled(format!("{}▏", query.search_term), term_style)
    } else {
        Span::styled(query.search_term.clone(), term_style)
    };

    let line = Line::from(vec![
        Span::styled(" 🔍 ", Style::default().fg(Color::Cyan)),
        term,
        Span::raw("   "),
        Span::styled("f", Style::default().fg(Color::Yellow)),
        Span::raw(format!(" {}", specialty_label(&query.specialty_filter))),
        Span::raw("   "),
        Span::styled("d", Style::default().fg(Color::Yellow)),
        Span::raw(format!(" {}", distance_label(&query.distance_filter))),
    ]);

    let form = Paragraph::new(vec![line]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if editing { Color::Yellow } else { Color::White }))
            .title(" Find a Doctor "),
    );

    f.render_widget(form, area);
}

fn render_results(f: &mut Frame, area: Rect, app: &mut App) {
    match compose_view(&app.controller) {
        ResultView::Populated { heading, cards } => render_cards(f, area, app, &heading, &cards),
        ResultView::Empty { heading, title, hint } => {
            let content = vec![
                Line::from(""),
                Line::from(Span::styled(
                    title,
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
            ];

            let empty = Paragraph::new(content)
                .alignment(ratatui::layout::Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::White))
                        .title(format!(" {} ", heading)),
                );
            f.render_widget(empty, area);
        }
        ResultView::Unavailable { message, retry_label } => {
            let content = vec![
                Line::from(""),
                Line::from(Span::styled(message, Style::default().fg(Color::Red))),
                Line::from(""),
                Line::from(vec![
                    Span::raw("Press "),
                    Span::styled("r", Style::default().fg(Color::Yellow)),
                    Span::raw(format!(" to {}", retry_label.to_lowercase())),
                ]),
            ];

            let unavailable = Paragraph::new(content)
                .alignment(ratatui::layout::Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red))
                        .title(" Providers unavailable "),
                );
            f.render_widget(unavailable, area);
        }
    }
}

fn render_cards(f: &mut Frame, area: Rect, app: &mut App, heading: &str, cards: &[ProviderCard]) {
    let header_cells = ["Doctor", "Specialty", "Rating", "Distance", "Next Available", "Status"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = cards.iter().map(|card| {
        let stars = star_rating(card.rating);
        let status_color = if card.accepting_new_patients {
            Color::Green
        } else {
            Color::DarkGray
        };

        let cells = vec![
            Cell::from(truncate(&card.name, 24)),
            Cell::from(truncate(&card.specialty, 16)),
            Cell::from(Line::from(vec![
                Span::styled(stars.glyphs(), Style::default().fg(Color::Yellow)),
                Span::raw(" "),
                Span::raw(card.rating_label.clone()),
            ])),
            Cell::from(card.distance_label.clone()),
            Cell::from(truncate(&card.visible_slots.join(" · "), 60)),
            Cell::from(card.availability_label.clone()).style(Style::default().fg(status_color)),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(26),
            Constraint::Length(18),
            Constraint::Length(11),
            Constraint::Length(11),
            Constraint::Min(20),
            Constraint::Length(24),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" {} ", heading)),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let card = match app.selected_card() {
        Some(c) => c,
        None => {
            let no_selection = Paragraph::new("No doctor selected").block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(" Doctor Profile "),
            );
            f.render_widget(no_selection, area);
            return;
        }
    };

    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", card.name),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("  ♥ {}", card.specialty)),
        Line::from(""),
        Line::from(vec![Span::styled("  Location: ", label), Span::raw(card.location.clone())]),
        Line::from(vec![Span::styled("  Distance: ", label), Span::raw(card.distance_label.clone())]),
        Line::from(vec![
            Span::styled("  Rating: ", label),
            Span::styled(
                star_rating(card.rating).glyphs(),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(format!(" {}", card.rating_label)),
        ]),
        Line::from(vec![
            Span::styled("  Status: ", label),
            Span::styled(
                card.availability_label.clone(),
                Style::default().fg(if card.accepting_new_patients { Color::Green } else { Color::Red }),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  NEXT AVAILABLE",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )),
        Line::from(""),
    ];

    if card.visible_slots.is_empty() {
        content.push(Line::from(Span::styled(
            "  No open slots",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }
    for slot in &card.visible_slots {
        content.push(Line::from(format!("  • {}", slot)));
    }

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "  Press Enter to close",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )));

    let detail_panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Doctor Profile "),
    );

    f.render_widget(detail_panel, area);
}

fn render_visits(f: &mut Frame, area: Rect) {
    let mut content = vec![Line::from("")];

    for visit in recent_visits() {
        content.push(Line::from(vec![
            Span::styled(
                format!("  {}", visit.visit_type),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(display_date(visit.date), Style::default().fg(Color::Cyan)),
        ]));
        content.push(Line::from(Span::styled(
            format!("  {}", visit.provider),
            Style::default().fg(Color::DarkGray),
        )));
        content.push(Line::from(format!("  {}", visit.notes)));
        content.push(Line::from(""));
    }

    let paragraph = Paragraph::new(content).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Recent Visits "),
    );

    f.render_widget(paragraph, area);
}

fn render_test_results(f: &mut Frame, area: Rect) {
    let header_cells = ["Date", "Test", "Result", "Details"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = test_results().into_iter().map(|result| {
        let color = match result.status {
            ResultStatus::Normal => Color::Green,
            ResultStatus::Abnormal => Color::Yellow,
        };

        Row::new(vec![
            Cell::from(display_date(result.date)),
            Cell::from(result.test),
            Cell::from(result.status.as_str()).style(Style::default().fg(color)),
            Cell::from(result.details),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Length(28),
            Constraint::Length(10),
            Constraint::Min(20),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Test Results "),
    );

    f.render_widget(table, area);
}

fn render_support_dialog(f: &mut Frame, app: &App) {
    let request = match &app.support {
        Some(r) => r,
        None => return,
    };

    let area = centered_rect(60, 50, f.size());
    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  How can we help you?",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if let Some(notice) = request.reference_notice() {
        content.push(Line::from(Span::styled(
            format!("  {}", notice),
            Style::default().fg(Color::DarkGray),
        )));
        content.push(Line::from(""));
    }

    content.push(Line::from(vec![
        Span::styled("  Topic: ", label),
        Span::raw(request.topic.label()),
        Span::styled("  (Tab to change)", Style::default().fg(Color::DarkGray)),
    ]));
    content.push(Line::from(""));
    content.push(Line::from(Span::styled("  Message:", label)));
    content.push(Line::from(format!("  {}▏", request.message)));
    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        format!("  {}", SUPPORT_HOURS),
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    )));
    content.push(Line::from(""));
    content.push(Line::from(vec![
        Span::styled("  Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Submit | "),
        Span::styled("Esc", Style::default().fg(Color::Red)),
        Span::raw(" Cancel"),
    ]));

    let dialog = Paragraph::new(content).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Contact Support "),
    );

    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.controller.results().len();

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    if let Some(toast) = app.toasts.latest() {
        let color = match toast.level {
            ToastLevel::Success => Color::Green,
            ToastLevel::Error => Color::Red,
        };
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(toast.message.clone(), Style::default().fg(color)));
    }

    let hints: &[(&str, &str)] = match app.input_mode {
        InputMode::Search => &[("Enter", "Search"), ("Esc", "Done")],
        InputMode::Support => &[("Enter", "Submit"), ("Tab", "Topic"), ("Esc", "Cancel")],
        InputMode::Normal => &[
            ("/", "Search"),
            ("f", "Specialty"),
            ("d", "Distance"),
            ("c", "Clear"),
            ("Enter", "Profile"),
            ("s", "Support"),
            ("Tab", "Page"),
            ("q", "Quit"),
        ],
    };

    for (key, action) in hints {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(format!(" {}", action)));
    }

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use care_finder::catalog::{CatalogError, StaticCatalog};
    use care_finder::provider::ProviderRecord;
    use care_finder::search::QueryState;
    use ratatui::backend::TestBackend;
    use std::cell::Cell as StdCell;

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn fixture_app() -> App {
        App::new(Box::new(StaticCatalog::fixture()))
    }

    fn screen(app: &mut App) -> String {
        let backend = TestBackend::new(140, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Fails the first fetch, succeeds afterwards
    struct FlakySource {
        calls: StdCell<usize>,
    }

    impl ProviderSource for FlakySource {
        fn fetch_providers(&self, query: &QueryState) -> Result<Vec<ProviderRecord>, CatalogError> {
            let calls = self.calls.get();
            self.calls.set(calls + 1);
            if calls == 0 {
                Err(CatalogError::Unavailable("service down".to_string()))
            } else {
                StaticCatalog::fixture().fetch_providers(query)
            }
        }
    }

    #[test]
    fn test_page_cycle() {
        assert_eq!(Page::FindDoctor.next(), Page::Visits);
        assert_eq!(Page::FindDoctor.previous(), Page::TestResults);
        assert_eq!(Page::TestResults.next(), Page::FindDoctor);
    }

    #[test]
    fn test_typing_filters_live() {
        let mut app = fixture_app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Search);

        type_text(&mut app, "chen");
        assert_eq!(app.controller.results().len(), 1);
        assert_eq!(app.state.selected(), Some(0));

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.controller.query().search_term, "che");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_no_match_clears_selection_and_shows_empty_state() {
        let mut app = fixture_app();
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "xyz-no-match");
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.state.selected(), None);

        let text = screen(&mut app);
        assert!(text.contains("No doctors found"));
        assert!(text.contains("Try adjusting your search criteria"));
        assert!(!text.contains("Dr. Sarah Johnson"));
    }

    #[test]
    fn test_populated_screen_lists_cards() {
        let mut app = fixture_app();
        let text = screen(&mut app);

        assert!(text.contains("4 doctors available"));
        assert!(text.contains("Dr. James Wilson"));
        assert!(text.contains("Not Accepting Patients"));
        assert!(!text.contains("No doctors found"));
    }

    #[test]
    fn test_specialty_cycle_narrows_results() {
        let mut app = fixture_app();
        press(&mut app, KeyCode::Char('f'));

        assert_eq!(app.controller.query().specialty_filter, "cardiologist");
        assert_eq!(app.controller.results().len(), 2);
        assert!(screen(&mut app).contains("2 cardiologist doctors available"));

        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.controller.results().len(), 4);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = fixture_app();
        press(&mut app, KeyCode::Up);
        assert_eq!(app.state.selected(), Some(3));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.state.selected(), Some(0));
        assert_eq!(app.selected_card().map(|c| c.id), Some("1".to_string()));
    }

    #[test]
    fn test_retry_after_unavailable() {
        let mut app = App::new(Box::new(FlakySource { calls: StdCell::new(0) }));
        assert!(matches!(app.controller.status(), CatalogStatus::Unavailable(_)));
        assert!(screen(&mut app).contains("service down"));

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.controller.status(), &CatalogStatus::Ready);
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_support_dialog_flow() {
        let mut app = fixture_app();
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.input_mode, InputMode::Support);
        assert!(screen(&mut app).contains("Contact Support"));

        // Empty submit keeps the dialog open with an error toast
        press(&mut app, KeyCode::Enter);
        assert!(app.support.is_some());
        assert!(app.last_ticket.is_none());
        assert_eq!(app.toasts.latest().map(|t| t.level), Some(ToastLevel::Error));

        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Double charge");
        press(&mut app, KeyCode::Enter);

        assert!(app.support.is_none());
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.toasts.latest().map(|t| t.level), Some(ToastLevel::Success));
        let ticket = app.last_ticket.as_ref().map(|t| t.message.as_str());
        assert_eq!(ticket, Some("Double charge"));
        // Typing in the dialog never touched the search
        assert_eq!(app.controller.query().search_term, "");
    }

    #[test]
    fn test_quit() {
        let mut app = fixture_app();
        assert!(!press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_records_pages_render() {
        let mut app = fixture_app();
        press(&mut app, KeyCode::Tab);
        assert!(screen(&mut app).contains("Annual Physical"));

        press(&mut app, KeyCode::Tab);
        let text = screen(&mut app);
        assert!(text.contains("Lipid Panel"));
        assert!(text.contains("Abnormal"));
    }
}
