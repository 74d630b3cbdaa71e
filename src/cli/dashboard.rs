//! Interactive attrition dashboard using ratatui
//!
//! Shows the overview metrics, the attrition factor charts, the model's risk
//! predictions and the recommendations. Filter changes recompute the view
//! from the already-loaded records and model.

use std::io::{self, stdout};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use polars::prelude::DataFrame;
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap},
};

use crate::pipeline::columns::{DEPARTMENT, JOB_ROLE};
use crate::pipeline::{filter_options, AttritionModel, FilterSelection, RiskCategory, ALL_FILTER};
use crate::report::{
    model_description, DashboardView, FactorBreakdown, PredictionView, ScoredView, TableData,
    RECOMMENDATIONS, RECOMMENDATIONS_INTRO,
};
use crate::utils::print_warning;

/// Dashboard tabs, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardTab {
    Factors,
    Predictions,
    Recommendations,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 3] = [
        DashboardTab::Factors,
        DashboardTab::Predictions,
        DashboardTab::Recommendations,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            DashboardTab::Factors => "Attrition Factors",
            DashboardTab::Predictions => "ML Predictions",
            DashboardTab::Recommendations => "Recommendations",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Filter options, current selection and the view computed for it
pub struct DashboardState<'a> {
    records: &'a DataFrame,
    model: Option<&'a dyn AttritionModel>,
    departments: Vec<String>,
    job_roles: Vec<String>,
    department_idx: usize,
    job_role_idx: usize,
    pub tab: DashboardTab,
    /// Initial filter values that were not offered and fell back to "All"
    pub unmatched: Vec<String>,
    /// The computed view, or the message explaining why it failed
    pub view: std::result::Result<DashboardView, String>,
}

impl<'a> DashboardState<'a> {
    pub fn new(
        records: &'a DataFrame,
        model: Option<&'a dyn AttritionModel>,
        initial: &FilterSelection,
    ) -> Self {
        let departments =
            filter_options(records, DEPARTMENT).unwrap_or_else(|_| vec![ALL_FILTER.to_string()]);
        let job_roles =
            filter_options(records, JOB_ROLE).unwrap_or_else(|_| vec![ALL_FILTER.to_string()]);

        let mut unmatched = Vec::new();
        let department_idx =
            initial_index(&departments, &initial.department, "Department", &mut unmatched);
        let job_role_idx = initial_index(&job_roles, &initial.job_role, "Job role", &mut unmatched);

        let mut state = Self {
            records,
            model,
            departments,
            job_roles,
            department_idx,
            job_role_idx,
            tab: DashboardTab::Factors,
            unmatched,
            view: Err(String::new()),
        };
        state.refresh();
        state
    }

    pub fn selection(&self) -> FilterSelection {
        FilterSelection::new(
            self.departments[self.department_idx].clone(),
            self.job_roles[self.job_role_idx].clone(),
        )
    }

    fn refresh(&mut self) {
        self.view = DashboardView::build(self.records, self.model, &self.selection())
            .map_err(|e| e.to_string());
    }

    pub fn cycle_department(&mut self, forward: bool) {
        self.department_idx = step(self.department_idx, self.departments.len(), forward);
        self.refresh();
    }

    pub fn cycle_job_role(&mut self, forward: bool) {
        self.job_role_idx = step(self.job_role_idx, self.job_roles.len(), forward);
        self.refresh();
    }

    /// Apply a key press; returns `true` when the dashboard should close
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('d') => self.cycle_department(true),
            KeyCode::Char('D') => self.cycle_department(false),
            KeyCode::Char('r') => self.cycle_job_role(true),
            KeyCode::Char('R') => self.cycle_job_role(false),
            KeyCode::Tab | KeyCode::Right => self.tab = self.tab.next(),
            KeyCode::BackTab | KeyCode::Left => self.tab = self.tab.previous(),
            _ => {}
        }
        false
    }
}

fn initial_index(
    options: &[String],
    value: &str,
    label: &str,
    unmatched: &mut Vec<String>,
) -> usize {
    match options.iter().position(|o| o == value) {
        Some(idx) => idx,
        None => {
            unmatched.push(format!(
                "{} '{}' is not in the data; showing {}",
                label, value, ALL_FILTER
            ));
            0
        }
    }
}

fn step(idx: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (idx + 1) % len
    } else {
        (idx + len - 1) % len
    }
}

/// Run the interactive dashboard until the user quits
pub fn run_dashboard(
    records: &DataFrame,
    model: Option<&dyn AttritionModel>,
    initial: &FilterSelection,
) -> Result<()> {
    let mut state = DashboardState::new(records, model, initial);
    for message in &state.unmatched {
        print_warning(message);
    }

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_dashboard_loop(&mut terminal, &mut state);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_dashboard_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut DashboardState,
) -> Result<()> {
    loop {
        terminal.draw(|frame| draw_ui(frame, state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if state.handle_key(key.code) {
                return Ok(());
            }
        }
    }
}

fn draw_ui(frame: &mut Frame, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let title = Paragraph::new(Line::from(vec![
        Span::styled("AttriLens ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            "Employee Attrition Dashboard",
            Style::default().fg(Color::White).bold(),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    draw_header(frame, chunks[1], state);

    let tabs = Tabs::new(DashboardTab::ALL.iter().map(|t| t.title()))
        .select(state.tab.index())
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().fg(Color::Yellow).bold());
    frame.render_widget(tabs, chunks[2]);

    match &state.view {
        Err(message) => {
            let error = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title(" Error "));
            frame.render_widget(error, chunks[3]);
        }
        Ok(view) => match state.tab {
            DashboardTab::Factors => draw_factors(frame, chunks[3], view),
            DashboardTab::Predictions => draw_predictions(frame, chunks[3], &view.predictions),
            DashboardTab::Recommendations => draw_recommendations(frame, chunks[3]),
        },
    }

    let help = Paragraph::new(Line::from(vec![
        Span::styled("[d/D]", Style::default().fg(Color::Cyan)),
        Span::raw(" department  "),
        Span::styled("[r/R]", Style::default().fg(Color::Cyan)),
        Span::raw(" job role  "),
        Span::styled("[Tab/←/→]", Style::default().fg(Color::Cyan)),
        Span::raw(" switch tab  "),
        Span::styled("[q]", Style::default().fg(Color::Cyan)),
        Span::raw(" quit"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[4]);
}

fn draw_header(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let selection = state.selection();
    let mut spans = vec![
        Span::styled("Department: ", Style::default().fg(Color::DarkGray)),
        Span::styled(selection.department, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled("Job Role: ", Style::default().fg(Color::DarkGray)),
        Span::styled(selection.job_role, Style::default().fg(Color::Yellow)),
        Span::raw("   │   "),
    ];

    if let Ok(view) = &state.view {
        let overview = view.overview;
        let rate_style = if overview.attrition_delta().is_some() {
            Style::default().fg(Color::Red).bold()
        } else {
            Style::default().fg(Color::Green).bold()
        };
        spans.extend([
            Span::raw("Employees: "),
            Span::styled(
                overview.total_employees.to_string(),
                Style::default().fg(Color::White).bold(),
            ),
            Span::raw("  Attrition: "),
            Span::styled(format!("{:.1}%", overview.attrition_rate), rate_style),
        ]);
        if let Some(delta) = overview.attrition_delta() {
            spans.push(Span::styled(
                format!(" (+{:.1}%)", delta),
                Style::default().fg(Color::Red),
            ));
        }
        spans.extend([
            Span::raw("  Overtime: "),
            Span::styled(
                format!("{:.1}%", overview.overtime_pct),
                Style::default().fg(Color::White).bold(),
            ),
        ]);
    }

    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Overview "));
    frame.render_widget(header, area);
}

fn draw_factors(frame: &mut Frame, area: Rect, view: &DashboardView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let cells: Vec<Rect> = rows
        .iter()
        .flat_map(|row| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(*row)
                .to_vec()
        })
        .collect();

    for (factor, cell) in view.factors.iter().zip(cells) {
        draw_factor_chart(frame, cell, factor);
    }
}

fn draw_factor_chart(frame: &mut Frame, area: Rect, factor: &FactorBreakdown) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", factor.title));

    if let Some(error) = &factor.error {
        let message = Paragraph::new(error.as_str())
            .style(Style::default().fg(Color::Yellow))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(message, area);
        return;
    }
    if factor.summaries.is_empty() {
        let message = Paragraph::new("No data for the selected filters")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(message, area);
        return;
    }

    // Rates are scaled by 10 to keep one decimal in integer bars
    let bars: Vec<Bar> = factor
        .summaries
        .iter()
        .map(|s| {
            Bar::default()
                .value((s.attrition_rate * 10.0).round() as u64)
                .text_value(format!("{:.1}%", s.attrition_rate))
                .label(Line::from(s.label().to_string()))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width(area.width, bars.len()))
        .bar_gap(1)
        .max(1000)
        .bar_style(Style::default().fg(Color::Blue))
        .value_style(Style::default().fg(Color::Black).bg(Color::Blue));
    frame.render_widget(chart, area);
}

fn bar_width(available: u16, bars: usize) -> u16 {
    let inner = available.saturating_sub(2) as usize;
    let per_bar = inner / bars.max(1);
    per_bar.saturating_sub(1).clamp(3, 12) as u16
}

fn draw_predictions(frame: &mut Frame, area: Rect, predictions: &PredictionView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Machine Learning Predictions ");

    let scored = match predictions {
        PredictionView::Disabled => {
            let message = Paragraph::new(
                "Machine learning model could not be loaded. Please check the model file path.",
            )
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(block);
            frame.render_widget(message, area);
            return;
        }
        PredictionView::NoEmployees => {
            let message = Paragraph::new("No employees match the selected filters.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(message, area);
            return;
        }
        PredictionView::Scored(scored) => scored,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(40),
            Constraint::Min(5),
        ])
        .split(area);

    let mut info = vec![Line::from(model_description(scored))];
    if let Some(failure) = &scored.failure {
        info.push(Line::from(Span::styled(
            failure.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    frame.render_widget(
        Paragraph::new(info).wrap(Wrap { trim: true }),
        chunks[0],
    );

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);
    draw_risk_distribution(frame, charts[0], scored);
    draw_histogram(frame, charts[1], scored);
    draw_high_risk_table(frame, chunks[2], scored);
}

fn risk_color(category: RiskCategory) -> Color {
    match category {
        RiskCategory::Low => Color::Green,
        RiskCategory::Medium => Color::Yellow,
        RiskCategory::High => Color::Red,
        RiskCategory::Error => Color::DarkGray,
    }
}

fn draw_risk_distribution(frame: &mut Frame, area: Rect, scored: &ScoredView) {
    let bars: Vec<Bar> = scored
        .distribution
        .iter()
        .map(|(category, count)| {
            Bar::default()
                .value(*count as u64)
                .label(Line::from(category.label()))
                .style(Style::default().fg(risk_color(*category)))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Employee Attrition Risk Distribution "),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width(area.width, bars.len()))
        .bar_gap(1);
    frame.render_widget(chart, area);
}

fn draw_histogram(frame: &mut Frame, area: Rect, scored: &ScoredView) {
    let bars: Vec<Bar> = scored
        .histogram
        .iter()
        .map(|bin| {
            Bar::default()
                .value(bin.count as u64)
                .label(Line::from(format!("{:.0}", bin.lower * 100.0)))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Distribution of Attrition Probabilities (%) "),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(2)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Blue));
    frame.render_widget(chart, area);
}

fn draw_high_risk_table(frame: &mut Frame, area: Rect, scored: &ScoredView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" High-Risk Employees ");

    let data = match TableData::from_frame(&scored.high_risk) {
        Ok(data) if !data.rows.is_empty() => data,
        Ok(_) => {
            let message = Paragraph::new(
                "No employees are currently at high risk of attrition in the selected filters.",
            )
            .style(Style::default().fg(Color::Green))
            .block(block);
            frame.render_widget(message, area);
            return;
        }
        Err(e) => {
            let message = Paragraph::new(e.to_string())
                .style(Style::default().fg(Color::Red))
                .block(block);
            frame.render_widget(message, area);
            return;
        }
    };

    let header = Row::new(
        data.headers
            .iter()
            .map(|h| Cell::from(h.clone()).style(Style::default().fg(Color::Cyan).bold())),
    );
    let widths: Vec<Constraint> = data
        .headers
        .iter()
        .map(|_| Constraint::Ratio(1, data.headers.len().max(1) as u32))
        .collect();
    let rows: Vec<Row> = data.rows.into_iter().map(Row::new).collect();

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

fn draw_recommendations(frame: &mut Frame, area: Rect) {
    let mut lines = vec![Line::from(RECOMMENDATIONS_INTRO), Line::from("")];
    for (i, rec) in RECOMMENDATIONS.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}. {}: ", i + 1, rec.title),
                Style::default().fg(Color::White).bold(),
            ),
            Span::raw(rec.detail),
        ]));
    }

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Recommendations "));
    frame.render_widget(panel, area);
}
