use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Mode};
use crate::form::{SessionForm, FORM_FIELDS};
use crate::session::{DAYS, TIME_SLOTS};
use crate::view_model::{CellViewModel, GridViewModel};

const TIME_COL_WIDTH: u16 = 12;
const CELL_HEIGHT: u16 = 5;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let vm = self.view_model();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),                                 // week header
                Constraint::Length(CELL_HEIGHT * TIME_SLOTS.len() as u16 + 3), // grid
                Constraint::Length(4),                                 // summary cards
                Constraint::Min(1),                                    // status / hints
            ])
            .split(area);

        render_week_header(&vm, chunks[0], buf);
        render_grid(self, &vm, chunks[1], buf);
        render_summary(&vm, chunks[2], buf);
        render_footer(self, chunks[3], buf);

        if self.mode == Mode::Editing {
            if let Some(form) = &self.form {
                render_form_modal(form, area, buf);
            }
        }
    }
}

fn render_week_header(vm: &GridViewModel, area: Rect, buf: &mut Buffer) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled("◀ [  ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            vm.week_label.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ] ▶", Style::default().fg(Color::DarkGray)),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("mentorgrid"));
    header.render(area, buf);
}

fn render_grid(app: &App, vm: &GridViewModel, area: Rect, buf: &mut Buffer) {
    let day_width = area
        .width
        .saturating_sub(TIME_COL_WIDTH + 2)
        .checked_div(DAYS.len() as u16)
        .unwrap_or(0);

    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(DAYS.iter().map(|day| Cell::from(*day)))
            .collect::<Vec<_>>(),
    )
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = TIME_SLOTS
        .iter()
        .enumerate()
        .map(|(slot, label)| {
            let mut cells = vec![Cell::from(*label).style(Style::default().fg(Color::DarkGray))];
            for day in 0..DAYS.len() {
                let selected = app.selected_slot == slot && app.selected_day == day;
                cells.push(grid_cell(vm.cell(slot, day), selected, day_width));
            }
            Row::new(cells).height(CELL_HEIGHT)
        })
        .collect();

    let mut widths = vec![Constraint::Length(TIME_COL_WIDTH)];
    widths.extend(std::iter::repeat(Constraint::Length(day_width)).take(DAYS.len()));

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Weekly Grid"));
    Widget::render(table, area, buf);
}

fn grid_cell(cell: Option<&CellViewModel>, selected: bool, width: u16) -> Cell<'static> {
    let base = if selected {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default()
    };
    match cell {
        Some(vm) => {
            let text = Text::from(vec![
                Line::from(Span::styled(
                    fit(&vm.language, width),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(fit(&format!("Mentor: {}", vm.mentor), width)),
                Line::from(fit(&format!("Mentee: {}", vm.mentee), width)),
                Line::from(Span::styled(
                    fit(&format!("Topic: {}", vm.topic), width),
                    Style::default().add_modifier(Modifier::ITALIC),
                )),
            ]);
            Cell::from(text).style(base)
        }
        None => Cell::from(Text::from(Line::from(Span::styled(
            "+",
            Style::default().fg(Color::DarkGray),
        ))))
        .style(base),
    }
}

/// Truncates to the cell's column width so neighbouring cells stay aligned.
fn fit(text: &str, width: u16) -> String {
    let max = width.saturating_sub(1) as usize;
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    for c in text.chars() {
        if out.width() + 1 >= max {
            break;
        }
        out.push(c);
    }
    out.push('…');
    out
}

fn render_summary(vm: &GridViewModel, area: Rect, buf: &mut Buffer) {
    let cards = [
        (vm.summary.session_count.to_string(), "Total Sessions"),
        (vm.summary.distinct_languages.to_string(), "Languages Covered"),
        (vm.summary.distinct_mentors.to_string(), "Active Mentors"),
        (vm.summary.minutes_total.to_string(), "Minutes Tutored"),
    ];

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((value, label), chunk) in cards.into_iter().zip(chunks.iter()) {
        let card = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(label));
        card.render(*chunk, buf);
    }
}

fn render_footer(app: &App, area: Rect, buf: &mut Buffer) {
    let line = match &app.status {
        Some(status) => Line::from(Span::styled(
            status.text.clone(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            "arrows/hjkl move · [ ] change week · enter log/edit · q quit",
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )),
    };
    Paragraph::new(line).alignment(Alignment::Center).render(area, buf);
}

fn render_form_modal(form: &SessionForm, area: Rect, buf: &mut Buffer) {
    let popup = centered_rect(50, FORM_FIELDS.len() as u16 + 4, area);
    Clear.render(popup, buf);

    let mut lines: Vec<Line> = FORM_FIELDS
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let focused = idx == form.focus;
            let label = format!("{:<18}", field.to_string());
            let value = form.value(*field);
            let value_span = if focused {
                Span::styled(
                    format!("{}▏", value),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::raw(value.to_string())
            };
            Line::from(vec![
                Span::styled(label, Style::default().fg(Color::Cyan)),
                value_span,
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "tab next · enter save · ctrl-d delete · esc cancel",
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC),
    )));

    let modal = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(form.title())
            .style(Style::default()),
    );
    modal.render(popup, buf);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}
