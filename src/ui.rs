//! Terminal UI rendering with ratatui

use blockfall::board::{COLUMNS, ROWS};
use blockfall::input::{Button, PadAction};
use blockfall::piece::Piece;
use blockfall::{Snapshot, ViewCell};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use std::rc::Rc;

const EMPTY: &str = "  ";
const BLOCK: &str = "██";

/// Board width in terminal columns: two per cell plus borders
const BOARD_WIDTH: u16 = COLUMNS as u16 * 2 + 2;
const BOARD_HEIGHT: u16 = ROWS as u16 + 2;
const SIDE_WIDTH: u16 = 20;
const NEXT_HEIGHT: u16 = 6;
const CONTROL_HEIGHT: u16 = 3;

const GAME_WIDTH: u16 = BOARD_WIDTH + SIDE_WIDTH;
const GAME_HEIGHT: u16 = BOARD_HEIGHT + CONTROL_HEIGHT;

/// A clickable button in the control strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Pad(PadAction),
    Pause,
    Restart,
}

/// Control strip contents, left to right
const CONTROLS: [(Control, &str); 7] = [
    (Control::Pad(PadAction::Hold(Button::Left)), "←"),
    (Control::Pad(PadAction::Hold(Button::Rotate)), "↻"),
    (Control::Pad(PadAction::Hold(Button::Down)), "↓"),
    (Control::Pad(PadAction::Hold(Button::Right)), "→"),
    (Control::Pad(PadAction::HardDrop), "DROP"),
    (Control::Pause, "II"),
    (Control::Restart, "NEW"),
];

struct GameLayout {
    board: Rect,
    next: Rect,
    stats: Rect,
    controls: Rect,
}

fn game_layout(area: Rect) -> GameLayout {
    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(BOARD_HEIGHT),
            Constraint::Length(CONTROL_HEIGHT),
        ])
        .split(game_area);

    // board | next + stats
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(BOARD_WIDTH), Constraint::Length(SIDE_WIDTH)])
        .split(rows[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(NEXT_HEIGHT), Constraint::Min(6)])
        .split(columns[1]);

    GameLayout {
        board: columns[0],
        next: side[0],
        stats: side[1],
        controls: rows[1],
    }
}

fn control_rects(strip: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, CONTROLS.len() as u32); CONTROLS.len()])
        .split(strip)
}

/// Which control, if any, sits under the given terminal cell
pub fn control_at(area: Rect, column: u16, row: u16) -> Option<Control> {
    let strip = game_layout(area).controls;
    control_rects(strip)
        .iter()
        .zip(CONTROLS)
        .find(|(rect, _)| rect.contains(Position::new(column, row)))
        .map(|(_, (control, _))| control)
}

/// Render the entire game UI. `held` highlights the control under the mouse.
pub fn render_game(frame: &mut Frame, snapshot: &Snapshot, held: Option<Control>) {
    let area = frame.area();
    let layout = game_layout(area);

    render_board(frame, layout.board, snapshot);
    render_next(frame, layout.next, snapshot.next);
    render_stats(frame, layout.stats, snapshot);
    render_controls(frame, layout.controls, held);

    if snapshot.game_over {
        render_overlay(frame, layout.board, "GAME OVER", "Press Enter to restart");
    } else if snapshot.paused {
        render_overlay(frame, layout.board, "PAUSED", "Press P to resume");
    }
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the game board
fn render_board(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let block = Block::default()
        .title(" BLOCKFALL ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = (0..ROWS as i32)
        .map(|y| {
            let spans: Vec<Span> = (0..COLUMNS as i32)
                .map(|x| match snapshot.cell(x, y) {
                    ViewCell::Empty => Span::raw(EMPTY),
                    ViewCell::Locked(color) | ViewCell::Active(color) => {
                        Span::styled(BLOCK, Style::default().fg(color))
                    }
                    // Rows waiting to be removed flash white
                    ViewCell::Clearing(_) => Span::styled(BLOCK, Style::default().fg(Color::White)),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the next piece preview
fn render_next(frame: &mut Frame, area: Rect, next: &Piece) {
    let block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 1 || inner.width < 4 {
        return;
    }

    let lines: Vec<Line> = (0..next.shape.rows())
        .map(|row| {
            let spans: Vec<Span> = (0..next.shape.cols())
                .map(|col| {
                    if next.shape.is_filled(row, col) {
                        Span::styled(BLOCK, Style::default().fg(next.color))
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, center_rect(inner, inner.width, next.shape.rows() as u16));
}

/// Render stats panel
fn render_stats(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label = |text: &'static str| Line::from(Span::styled(text, Style::default().fg(Color::Gray)));
    let lines = vec![
        label("SCORE"),
        Line::from(Span::styled(
            snapshot.score.to_string(),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::raw(""),
        label("LINES"),
        Line::from(Span::styled(
            snapshot.lines.to_string(),
            Style::default().fg(Color::Green),
        )),
        Line::raw(""),
        label("FALL"),
        Line::from(Span::styled(
            format!("{:.0} ms", snapshot.fall_interval_ms),
            Style::default().fg(Color::Cyan),
        )),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the clickable control strip
fn render_controls(frame: &mut Frame, area: Rect, held: Option<Control>) {
    for (rect, (control, text)) in control_rects(area).iter().zip(CONTROLS) {
        let color = if held == Some(control) {
            Color::Yellow
        } else {
            Color::Gray
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        let paragraph = Paragraph::new(Line::styled(text, Style::default().fg(color).bold()))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, *rect);
    }
}

/// Render an overlay (for pause/game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_area = center_rect(area, BOARD_WIDTH, 5);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle, Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}
