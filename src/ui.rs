pub mod grid;

use flashgrid::{
    clock::Clock,
    effects::Effects,
    sinks::{AudioSink, DisplaySink, Position},
    stats::{format_ms, RoundSummary, NO_DATA},
    Phase,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

const PARTICLE_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::LightBlue,
    Color::LightMagenta,
];

/// What the screen shows, as pushed by the round controller.
#[derive(Debug)]
pub struct Board {
    pub lit: Option<usize>,
    pub score: u32,
    pub time_left: u32,
    pub summary: Option<RoundSummary>,
    pub effects: Effects,
    pub effects_enabled: bool,
}

impl Board {
    pub fn new(effects_enabled: bool) -> Self {
        Self {
            lit: None,
            score: 0,
            time_left: flashgrid::round::ROUND_SECS,
            summary: None,
            effects: Effects::new(),
            effects_enabled,
        }
    }
}

impl DisplaySink for Board {
    fn highlight(&mut self, panel: usize) {
        self.lit = Some(panel);
    }

    fn clear(&mut self, panel: usize) {
        if self.lit == Some(panel) {
            self.lit = None;
        }
    }

    fn render_score(&mut self, score: u32) {
        self.score = score;
    }

    fn render_time_left(&mut self, secs: u32) {
        self.time_left = secs;
    }

    fn show_summary(&mut self, summary: &RoundSummary) {
        self.summary = Some(summary.clone());
    }

    fn hide_summary(&mut self) {
        self.summary = None;
    }

    fn spawn_effect(&mut self, at: Position) {
        if self.effects_enabled {
            self.effects.spawn_burst(at);
        }
    }
}

pub fn ui<A: AudioSink, C: Clock>(app: &mut App<A, C>, f: &mut Frame) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // score / time
            Constraint::Length(1),
            Constraint::Min(3), // panels
            Constraint::Length(1), // hints
        ])
        .split(area);

    let phase = app.controller.phase();
    app.grid = grid::panel_rects(chunks[2], app.controller.panels().len());
    app.controller
        .display_mut()
        .effects
        .set_bounds(area.width, area.height);

    let board = app.controller.display();
    let buf = f.buffer_mut();

    render_header(board, phase, chunks[0], buf);
    render_panels(board, phase, &app.grid, buf);
    render_hints(phase, chunks[3], buf);
    if let Some(summary) = &board.summary {
        render_summary(summary, chunks[2], buf);
    }
    render_particles(&board.effects, area, buf);
}

fn render_header(board: &Board, phase: Phase, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let time_style = if phase == Phase::Running && board.time_left <= 10 {
        bold.fg(Color::Red)
    } else {
        bold
    };

    let line = Line::from(vec![
        Span::styled("score ", Style::default().add_modifier(Modifier::DIM)),
        Span::styled(board.score.to_string(), bold.fg(Color::Green)),
        Span::raw("   "),
        Span::styled("time ", Style::default().add_modifier(Modifier::DIM)),
        Span::styled(format!("{}s", board.time_left), time_style),
        Span::raw("   "),
        Span::styled(
            phase.to_string().to_lowercase(),
            Style::default().fg(Color::Magenta),
        ),
    ]);
    Paragraph::new(line).render(area, buf);
}

fn render_panels(board: &Board, phase: Phase, rects: &[Rect], buf: &mut Buffer) {
    for (i, rect) in rects.iter().enumerate() {
        let style = match (board.lit == Some(i), phase) {
            (true, _) => Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            (false, Phase::Running) => Style::default().fg(Color::Gray),
            (false, _) => Style::default().add_modifier(Modifier::DIM),
        };

        Paragraph::new((i + 1).to_string())
            .alignment(Alignment::Center)
            .style(style)
            .block(Block::default().borders(Borders::ALL).style(style))
            .render(*rect, buf);
    }
}

fn render_hints(phase: Phase, area: Rect, buf: &mut Buffer) {
    let hint = match phase {
        Phase::Idle => "(enter) start   (q) quit",
        Phase::Running => "click the lit panel, or press its number   (esc) quit",
        Phase::Finished => "(enter) continue   (q) quit",
    };
    Paragraph::new(Span::styled(
        hint,
        Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
    ))
    .alignment(Alignment::Center)
    .render(area, buf);
}

pub fn summary_lines(summary: &RoundSummary) -> Vec<String> {
    let consistency = summary
        .std_dev_ms
        .map_or_else(|| NO_DATA.to_string(), |sd| format!("±{:.0} ms", sd));

    vec![
        format!("score        {}", summary.score),
        format!("fastest      {}", format_ms(summary.fastest_ms)),
        format!("slowest      {}", format_ms(summary.slowest_ms)),
        format!("average      {}", format_ms(summary.average_ms)),
        format!("consistency  {}", consistency),
        format!("missed       {}", summary.expired),
    ]
}

fn render_summary(summary: &RoundSummary, area: Rect, buf: &mut Buffer) {
    let lines = summary_lines(summary);
    let width = lines.iter().map(|l| l.width()).max().unwrap_or(0) as u16 + 4;
    let height = lines.len() as u16 + 2;
    let popup = centered(area, width, height);

    Clear.render(popup, buf);
    Paragraph::new(lines.into_iter().map(Line::from).collect::<Vec<_>>())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" round over ")
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .render(popup, buf);
}

fn render_particles(effects: &Effects, area: Rect, buf: &mut Buffer) {
    for p in &effects.particles {
        let (x, y) = (p.x.round(), p.y.round());
        if x < area.x as f64
            || y < area.y as f64
            || x >= (area.x + area.width) as f64
            || y >= (area.y + area.height) as f64
        {
            continue;
        }
        let color = PARTICLE_COLORS[p.color_index % PARTICLE_COLORS.len()];
        buf.set_string(
            x as u16,
            y as u16,
            p.symbol.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        );
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
