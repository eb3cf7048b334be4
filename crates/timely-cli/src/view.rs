//! Rendering of the session.
//!
//! Layout, top to bottom: summary line, input field, entry list, progress gauge.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Gauge, List, ListItem, ListState, Paragraph};

use timely_core::{format_duration, format_time};

use crate::app::App;

const INPUT_PROMPT: &str = "> ";
const PLACEHOLDER: &str = "--:--";

const REACHED: Style = Style::new().fg(Color::Indexed(34)).add_modifier(Modifier::BOLD);
const UNREACHED: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);
const HELPER: Style = Style::new().fg(Color::Rgb(0x62, 0x62, 0x62));
const SELECTED: Style = Style::new().fg(Color::Indexed(170));
const GAUGE: Style = Style::new()
    .fg(Color::Rgb(0xFF, 0x7C, 0xCB))
    .bg(Color::Rgb(0x3A, 0x3A, 0x3A));

/// Draws the whole session into `frame`.
pub fn render(frame: &mut Frame, app: &App) {
    let [header_area, input_area, list_area, gauge_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(Paragraph::new(summary_line(app)), header_area);

    frame.render_widget(
        Paragraph::new(format!("{INPUT_PROMPT}{}", app.input())),
        input_area,
    );
    let cursor_offset = u16::try_from(INPUT_PROMPT.len() + app.input().len()).unwrap_or(u16::MAX);
    frame.set_cursor_position((
        input_area.x.saturating_add(cursor_offset),
        input_area.y,
    ));

    let items: Vec<ListItem> = app
        .ledger()
        .render_strings()
        .into_iter()
        .map(ListItem::new)
        .collect();
    let mut state =
        ListState::default().with_selected((!app.ledger().is_empty()).then_some(app.selected()));
    let list = List::new(items)
        .highlight_style(SELECTED)
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, list_area, &mut state);

    frame.render_widget(
        Gauge::default()
            .gauge_style(GAUGE)
            .ratio(app.summary().progress),
        gauge_area,
    );
}

/// Builds `total / target • provisional • start • exit • overtime`.
fn summary_line(app: &App) -> Line<'static> {
    let summary = app.summary();
    let total_style = if summary.target_reached() {
        REACHED
    } else {
        UNREACHED
    };
    let start = app
        .startup()
        .map_or_else(|| PLACEHOLDER.to_string(), |t| format_time(&t));
    let exit = summary
        .planned_finish
        .map_or_else(|| PLACEHOLDER.to_string(), |t| format_time(&t));

    Line::from(vec![
        Span::styled(format_duration(summary.total), total_style),
        Span::styled(format!(" / {}", format_duration(app.target())), HELPER),
        Span::styled(" • provisional ", HELPER),
        Span::styled(format_duration(summary.provisional), REACHED),
        Span::styled(" • start ", HELPER),
        Span::styled(start, REACHED),
        Span::styled(" • exit ", HELPER),
        Span::styled(exit, REACHED),
        Span::styled(" • overtime ", HELPER),
        Span::styled(format_duration(summary.overtime), REACHED),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use insta::assert_snapshot;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    use crate::app::KeyAction;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    /// One string per buffer row, trailing whitespace removed.
    fn buffer_lines(buffer: &Buffer) -> Vec<String> {
        let area = buffer.area();
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    fn draw(app: &App) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(100, 10)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        buffer_lines(terminal.backend().buffer())
    }

    #[test]
    fn empty_session() {
        let app = App::new(Duration::hours(8), at(9, 0));
        let lines = draw(&app);

        assert_snapshot!(
            lines[0],
            @"00:00 / 08:00 • provisional 00:00 • start --:-- • exit --:-- • overtime -08:00"
        );
        assert_eq!(lines[1], ">");
        assert_eq!(lines[2], "");
        assert!(lines[9].contains("0%"));
    }

    #[test]
    fn session_with_entries() {
        let mut app = App::new(Duration::hours(8), at(9, 0));
        app.receive_startup(at(8, 0), at(9, 0));
        for text in ["1200", "13"] {
            for c in text.chars() {
                app.apply(KeyAction::InsertChar(c), at(9, 0));
            }
            app.apply(KeyAction::Submit, at(9, 0));
        }
        app.apply(KeyAction::InsertChar('1'), at(15, 0));
        app.refresh(at(15, 0));

        let lines = draw(&app);

        assert_snapshot!(
            lines[0],
            @"04:00 / 08:00 • provisional 06:00 • start 08:00 • exit 17:00 • overtime -04:00"
        );
        assert_eq!(lines[1], "> 1");
        assert_eq!(&lines[2..5], ["> 08:00", "  12:00", "  13:00"]);
        assert!(lines[9].contains("50%"));
    }

    #[test]
    fn total_style_follows_target() {
        let mut app = App::new(Duration::zero(), at(9, 0));
        assert_eq!(summary_line(&app).spans[0].style, REACHED);

        app = App::new(Duration::hours(1), at(9, 0));
        assert_eq!(summary_line(&app).spans[0].style, UNREACHED);
    }
}
