pub mod playfield;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use swat::game::LoopState;
use swat::pose::FeedStatus;

use crate::{ui::playfield::Playfield, App};

const HORIZONTAL_MARGIN: u16 = 1;

/// Header (timer + score), playfield, footer (feed status + keys)
pub fn split(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);
    (chunks[0], chunks[1], chunks[2])
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let game = &self.game;
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        match game.state() {
            LoopState::AwaitingResources | LoopState::Running => {
                let (header, field, footer) = split(area);

                let timer = Line::from(vec![
                    Span::styled("time ", dim_bold_style),
                    Span::styled(format!("{:.1}", game.remaining_secs()), bold_style),
                    Span::raw("    "),
                    Span::styled("score ", dim_bold_style),
                    Span::styled(
                        game.score().to_string(),
                        Style::default().patch(bold_style).fg(Color::Green),
                    ),
                ]);
                Paragraph::new(timer)
                    .alignment(Alignment::Center)
                    .render(header, buf);

                Playfield {
                    overlay: &self.overlay,
                    sprite: &self.sprite,
                    play: self.play_area,
                }
                .render(field, buf);

                let status = game.feed_status();
                let status_style = match status {
                    FeedStatus::Live => Style::default().fg(Color::Green),
                    FeedStatus::Connecting => Style::default().fg(Color::Yellow),
                    FeedStatus::Unavailable(_) | FeedStatus::Ended => {
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                    }
                };
                let mut spans = vec![Span::styled(status.to_string(), status_style)];
                if game.state() == LoopState::AwaitingResources {
                    spans.push(Span::styled("  (waiting to start)", italic_style));
                }
                spans.push(Span::styled("   (esc)ape", italic_style));
                Paragraph::new(Line::from(spans)).render(footer, buf);
            }
            LoopState::Stopped => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Percentage(40),
                        Constraint::Length(1),
                        Constraint::Length(1),
                        Constraint::Length(1),
                        Constraint::Length(1),
                        Constraint::Min(0),
                    ])
                    .split(area);

                Paragraph::new(Span::styled(
                    "time's up",
                    Style::default().patch(bold_style).fg(Color::Yellow),
                ))
                .alignment(Alignment::Center)
                .render(chunks[1], buf);

                Paragraph::new(Span::styled(
                    format!("score {}   hits {}", game.score(), game.hits()),
                    bold_style,
                ))
                .alignment(Alignment::Center)
                .render(chunks[2], buf);

                Paragraph::new(Span::styled("(esc)ape / (q)uit", italic_style))
                    .alignment(Alignment::Center)
                    .render(chunks[4], buf);
            }
        }
    }
}
