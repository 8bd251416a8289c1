// 📺 Family Education Dashboard (terminal UI)
// Read-only views over loaded family data. Every derived number on
// screen comes from the projection module; nothing is re-derived here.

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

use crate::api::{load_family_education_data, ApiClient, FamilyEducationData};
use crate::projection::{project, PlanProjection, ProjectedStatus, ProjectionInput, SavingsStatus};

// ============================================================================
// PAGES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    FamilyMembers,
    EducationPlans,
    Summary,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::FamilyMembers => Page::EducationPlans,
            Page::EducationPlans => Page::Summary,
            Page::Summary => Page::FamilyMembers,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::FamilyMembers => Page::Summary,
            Page::EducationPlans => Page::FamilyMembers,
            Page::Summary => Page::EducationPlans,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::FamilyMembers => "Family Members",
            Page::EducationPlans => "Education Plans",
            Page::Summary => "Summary",
        }
    }
}

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub data: FamilyEducationData,

    /// One projection per plan, same order as data.education_plans
    pub projections: Vec<PlanProjection>,

    pub current_page: Page,
    pub members_state: TableState,
    pub plans_state: TableState,

    /// Dismissible inline error; prior data stays on screen
    pub error: Option<String>,

    /// Captured once at load so every projection sees the same "now"
    pub today: NaiveDate,
    pub current_year: i32,

    pub family_profile_id: i64,
}

impl App {
    pub fn new(data: FamilyEducationData, family_profile_id: i64, today: NaiveDate) -> Self {
        let mut members_state = TableState::default();
        if !data.children.is_empty() {
            members_state.select(Some(0));
        }

        let mut plans_state = TableState::default();
        if !data.education_plans.is_empty() {
            plans_state.select(Some(0));
        }

        let mut app = App {
            data,
            projections: Vec::new(),
            current_page: Page::EducationPlans,
            members_state,
            plans_state,
            error: None,
            today,
            current_year: today.year(),
            family_profile_id,
        };
        app.recompute_projections();
        app
    }

    pub fn recompute_projections(&mut self) {
        self.projections = self
            .data
            .education_plans
            .iter()
            .map(|plan| project(&ProjectionInput::from_plan(plan, self.current_year)))
            .collect();
    }

    pub fn selected_plan_index(&self) -> Option<usize> {
        self.plans_state.selected()
    }

    pub fn next_row(&mut self) {
        let (state, len) = self.active_table();
        select_next(state, len);
    }

    pub fn previous_row(&mut self) {
        let (state, len) = self.active_table();
        select_previous(state, len);
    }

    fn active_table(&mut self) -> (&mut TableState, usize) {
        match self.current_page {
            Page::FamilyMembers => (&mut self.members_state, self.data.children.len()),
            _ => (&mut self.plans_state, self.data.education_plans.len()),
        }
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Reload everything from the backend. On failure the error banner
    /// is set and the previously loaded data stays untouched.
    pub fn reload(&mut self, client: &ApiClient) {
        match load_family_education_data(client, self.family_profile_id) {
            Ok(data) => {
                self.data = data;
                self.recompute_projections();
                self.error = None;

                if self.members_state.selected().is_none() && !self.data.children.is_empty() {
                    self.members_state.select(Some(0));
                }
                clamp_selection(&mut self.members_state, self.data.children.len());
                clamp_selection(&mut self.plans_state, self.data.education_plans.len());

                // Fire-and-forget; a failed prediction run never blocks the UI
                let _ = client.generate_predictions(self.family_profile_id);
            }
            Err(e) => {
                self.error = Some(e.user_message());
            }
        }
    }

    /// Name shown for a plan's family member
    pub fn child_name(&self, child_id: i64) -> &str {
        self.data
            .children
            .iter()
            .find(|child| child.id == Some(child_id))
            .map(|child| child.name.as_str())
            .unwrap_or("Unknown Child")
    }

    pub fn plans_for_child(&self, child_id: Option<i64>) -> usize {
        match child_id {
            Some(id) => self
                .data
                .education_plans
                .iter()
                .filter(|plan| plan.child_id == id)
                .count(),
            None => 0,
        }
    }
}

fn select_next(state: &mut TableState, len: usize) {
    if len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(i) => {
            if i >= len - 1 {
                0
            } else {
                i + 1
            }
        }
        None => 0,
    };
    state.select(Some(i));
}

fn select_previous(state: &mut TableState, len: usize) {
    if len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(i) => {
            if i == 0 {
                len - 1
            } else {
                i - 1
            }
        }
        None => 0,
    };
    state.select(Some(i));
}

fn clamp_selection(state: &mut TableState, len: usize) {
    if len == 0 {
        state.select(None);
    } else if let Some(i) = state.selected() {
        if i >= len {
            state.select(Some(len - 1));
        }
    }
}

// ============================================================================
// CURRENCY FORMATTING
// ============================================================================

/// Amounts on the dashboard are shown in lakhs, e.g. "₹6.08L"
pub fn format_lakhs(amount: f64) -> String {
    format!("₹{:.2}L", amount / 100_000.0)
}

/// Whole-rupee display with thousands separators, e.g. "₹8,000"
pub fn format_whole(amount: f64) -> String {
    let rounded = amount.round().abs() as u64;
    let digits = rounded.to_string();

    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        let remaining = digits.len() - i;
        if i > 0 && remaining % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if amount < -0.5 {
        format!("-₹{}", grouped)
    } else {
        format!("₹{}", grouped)
    }
}

fn savings_color(status: SavingsStatus) -> Color {
    match status {
        SavingsStatus::Excellent => Color::Green,
        SavingsStatus::Good => Color::Blue,
        SavingsStatus::Fair => Color::Yellow,
        SavingsStatus::NeedsAttention => Color::Red,
    }
}

fn projected_color(status: ProjectedStatus) -> Color {
    match status {
        ProjectedStatus::OnTrack => Color::Green,
        ProjectedStatus::GoodPace => Color::Blue,
        ProjectedStatus::Moderate => Color::Yellow,
        ProjectedStatus::BehindTarget => Color::Red,
    }
}

// ============================================================================
// EVENT LOOP
// ============================================================================

pub fn run_ui(app: &mut App, client: &ApiClient) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app, client);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    client: &ApiClient,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab => app.next_page(),
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Down | KeyCode::Char('j') => app.next_row(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_row(),
                KeyCode::Char('r') => app.reload(client),
                KeyCode::Char('d') => app.dismiss_error(),
                _ => {}
            }
        }
    }
}

// ============================================================================
// RENDERING
// ============================================================================

fn ui(f: &mut Frame, app: &mut App) {
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
        Page::FamilyMembers => render_members(f, chunks[1], app),
        Page::EducationPlans => render_plans(f, chunks[1], app),
        Page::Summary => render_summary(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::FamilyMembers, Page::EducationPlans, Page::Summary];

    let mut tab_spans = vec![Span::styled(
        "🎓 FinWise",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    tab_spans.push(Span::raw("  |  "));

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

        tab_spans.push(Span::styled(page.title(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!(
            "{} members, {} plans",
            app.data.summary.total_children, app.data.summary.total_plans
        ),
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_members(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Name", "Age", "Current Level", "Plans"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows: Vec<Row> = app
        .data
        .children
        .iter()
        .map(|child| {
            Row::new(vec![
                Cell::from(child.name.clone()),
                Cell::from(child.age_on(app.today).to_string()),
                Cell::from(child.current_education_level.as_str()),
                Cell::from(app.plans_for_child(child.id).to_string()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(10),
            Constraint::Percentage(35),
            Constraint::Percentage(15),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("Family Members"))
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    f.render_stateful_widget(table, area, &mut app.members_state);
}

fn render_plans(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),     // Plan table
            Constraint::Length(11), // Selected plan detail
        ])
        .split(area);

    render_plan_table(f, chunks[0], app);
    render_plan_detail(f, chunks[1], app);
}

fn render_plan_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Plan", "Member", "Years", "Cost", "Saved", "Monthly", "Projected"]
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

    let rows: Vec<Row> = app
        .data
        .education_plans
        .iter()
        .zip(&app.projections)
        .map(|(plan, projection)| {
            let color = projected_color(projection.projected_status());

            Row::new(vec![
                Cell::from(plan.plan_name.clone()),
                Cell::from(app.child_name(plan.child_id).to_string()),
                Cell::from(format!(
                    "{} - {}",
                    plan.estimated_start_year, plan.estimated_end_year
                )),
                Cell::from(format_lakhs(plan.estimated_total_cost)),
                Cell::from(format_lakhs(plan.savings())),
                Cell::from(format_whole(plan.contribution())),
                Cell::from(format!("{:.1}%", projection.progress_projected))
                    .style(Style::default().fg(color)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(26),
            Constraint::Percentage(16),
            Constraint::Percentage(12),
            Constraint::Percentage(12),
            Constraint::Percentage(12),
            Constraint::Percentage(11),
            Constraint::Percentage(11),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("Education Plans"))
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    f.render_stateful_widget(table, area, &mut app.plans_state);
}

fn render_plan_detail(f: &mut Frame, area: Rect, app: &App) {
    let Some(index) = app.selected_plan_index() else {
        let empty = Paragraph::new("No education plans yet. Create one with `finwise add-plan`.")
            .block(Block::default().borders(Borders::ALL).title("Plan Detail"));
        f.render_widget(empty, area);
        return;
    };
    let (Some(plan), Some(projection)) = (
        app.data.education_plans.get(index),
        app.projections.get(index),
    ) else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Savings-only gauge
            Constraint::Length(3), // Projected gauge
            Constraint::Min(3),    // Shortfall / top-up
        ])
        .split(area);

    let savings_status = projection.savings_status();
    let savings_gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Current Savings Progress - {} ({} / {})",
            savings_status.label(),
            format_lakhs(plan.savings()),
            format_lakhs(projection.inflated_target_cost),
        )))
        .gauge_style(Style::default().fg(savings_color(savings_status)))
        .label(format!("{:.1}%", projection.progress_savings_only))
        .ratio((projection.progress_savings_only / 100.0).clamp(0.0, 1.0));
    f.render_widget(savings_gauge, chunks[0]);

    let projected_status = projection.projected_status();
    let projected_gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Projected Progress (with future savings) - {} ({} / {})",
            projected_status.label(),
            format_lakhs(projection.total_future_value),
            format_lakhs(projection.inflated_target_cost),
        )))
        .gauge_style(Style::default().fg(projected_color(projected_status)))
        .label(format!("{:.1}%", projection.progress_projected))
        .ratio((projection.progress_projected / 100.0).clamp(0.0, 1.0));
    f.render_widget(projected_gauge, chunks[1]);

    let mut lines = vec![Line::from(vec![
        Span::styled("Member: ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.child_name(plan.child_id).to_string()),
        Span::raw("   "),
        Span::styled("Level: ", Style::default().fg(Color::DarkGray)),
        Span::raw(plan.education_level.as_str()),
        Span::raw("   "),
        Span::styled("Institution: ", Style::default().fg(Color::DarkGray)),
        Span::raw(plan.institution_type.as_str()),
        Span::raw("   "),
        Span::styled("Years remaining: ", Style::default().fg(Color::DarkGray)),
        Span::raw(projection.years_to_goal.to_string()),
    ])];

    if projection.shortfall > 0.0 {
        let mut shortfall_spans = vec![Span::styled(
            format!("Shortfall: {}", format_lakhs(projection.shortfall)),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )];

        if let Some(top_up) = projection.suggested_top_up() {
            shortfall_spans.push(Span::styled(
                format!(
                    "  -  consider increasing monthly contribution by {}",
                    format_whole(top_up)
                ),
                Style::default().fg(Color::Red),
            ));
        }

        lines.push(Line::from(shortfall_spans));
    } else {
        lines.push(Line::from(Span::styled(
            "Fully funded at the projected pace.",
            Style::default().fg(Color::Green),
        )));
    }

    if let Some(notes) = &plan.notes {
        lines.push(Line::from(vec![
            Span::styled("Notes: ", Style::default().fg(Color::DarkGray)),
            Span::raw(notes.clone()),
        ]));
    }

    let detail = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Plan Detail"));
    f.render_widget(detail, chunks[2]);
}

fn render_summary(f: &mut Frame, area: Rect, app: &App) {
    let summary = &app.data.summary;
    let profile = &app.data.family_profile;

    let mut lines = vec![
        Line::from(Span::styled(
            "Family Education Summary",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(
            "Total Family Savings:          {}",
            format_lakhs(summary.total_current_savings)
        )),
        Line::from(format!(
            "Monthly Family Contribution:   {}",
            format_whole(summary.total_monthly_contribution)
        )),
        Line::from(format!(
            "Total Education Investment:    {}",
            format_lakhs(summary.total_estimated_cost)
        )),
        Line::from(format!(
            "Active Education Plans:        {} (for {} family members)",
            summary.total_plans, summary.total_children
        )),
        Line::from(""),
        Line::from(format!(
            "Household:                     {} people in {}, {} risk",
            profile.family_size,
            profile.location,
            profile.risk_tolerance.label()
        )),
        Line::from(format!(
            "Monthly Surplus:               {}",
            format_whole(profile.monthly_surplus())
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Members by education level:",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let mut levels: Vec<_> = summary.children_by_level.iter().collect();
    levels.sort_by_key(|(level, _)| level.as_str());
    for (level, count) in levels {
        lines.push(Line::from(format!("  {} - {}", level.as_str(), count)));
    }

    let summary_widget =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Summary"));
    f.render_widget(summary_widget, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let line = match &app.error {
        Some(message) => Line::from(vec![
            Span::styled(
                format!("❌ {}", message),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  (d to dismiss)", Style::default().fg(Color::DarkGray)),
        ]),
        None => Line::from(Span::styled(
            "Tab/Shift-Tab pages  ↑/↓ select  r reload  q quit",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let status = Paragraph::new(vec![line]).block(Block::default().borders(Borders::ALL));
    f.render_widget(status, area);
}

// ============================================================================
// TESTS
// ============================================================================
