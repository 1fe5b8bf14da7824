use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Circle, Rectangle},
        Block, Borders, Widget,
    },
};

use swat::config::PlayArea;
use swat::geometry::Point;
use swat::sprite::TargetSprite;
use swat::surface::Overlay;

const HAND_RADIUS: f64 = 20.0;

/// Area inside the playfield border, where play-area pixels are mapped
pub fn inner_area(field: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(field)
}

/// Map a terminal cell to play-area pixels, using the cell's center
pub fn cell_to_play(column: u16, row: u16, field: Rect, play: PlayArea) -> Option<Point> {
    let inner = inner_area(field);
    if inner.width == 0 || inner.height == 0 {
        return None;
    }
    let inside = column >= inner.x
        && column < inner.x + inner.width
        && row >= inner.y
        && row < inner.y + inner.height;
    if !inside {
        return None;
    }
    let fx = (f64::from(column - inner.x) + 0.5) / f64::from(inner.width);
    let fy = (f64::from(row - inner.y) + 0.5) / f64::from(inner.height);
    Some(Point::new(fx * play.width, fy * play.height))
}

/// Canvas view of the overlay: target box with its sprite, plus hand markers
pub struct Playfield<'a> {
    pub overlay: &'a Overlay,
    pub sprite: &'a TargetSprite,
    pub play: PlayArea,
}

impl Widget for Playfield<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let play = self.play;
        let inner_rows = inner_area(area).height.max(1);
        let row_height = play.height / f64::from(inner_rows);
        // canvas y grows upward, play-area y grows downward
        let flip = |y: f64| play.height - y;

        Canvas::default()
            .block(Block::default().borders(Borders::ALL).title(" swat "))
            .marker(Marker::Braille)
            .x_bounds([0.0, play.width])
            .y_bounds([0.0, play.height])
            .paint(|ctx| {
                if let Some(target) = self.overlay.target {
                    ctx.draw(&Rectangle {
                        x: target.at.x,
                        y: flip(target.at.y + target.size),
                        width: target.size,
                        height: target.size,
                        color: Color::Yellow,
                    });
                    for (i, row) in self.sprite.rows.iter().enumerate() {
                        let y = target.at.y + row_height * (i as f64 + 1.0);
                        if y > target.at.y + target.size {
                            break;
                        }
                        ctx.print(target.at.x + 4.0, flip(y), row.clone());
                    }
                }
                let hands = self.overlay.hands;
                for hand in [hands.left, hands.right].into_iter().flatten() {
                    ctx.draw(&Circle {
                        x: hand.x,
                        y: flip(hand.y),
                        radius: HAND_RADIUS,
                        color: Color::Cyan,
                    });
                }
            })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_play_maps_corners() {
        let field = Rect::new(0, 0, 102, 77); // inner 100x75
        let play = PlayArea::default();
        let close = |a: Point, b: Point| (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9;
        let tl = cell_to_play(1, 1, field, play).unwrap();
        assert!(close(tl, Point::new(5.0, 5.0)), "{tl:?}");
        let br = cell_to_play(100, 75, field, play).unwrap();
        assert!(close(br, Point::new(995.0, 745.0)), "{br:?}");
    }

    #[test]
    fn test_cell_to_play_outside_is_none() {
        let field = Rect::new(0, 0, 102, 77);
        let play = PlayArea::default();
        // on the border
        assert_eq!(cell_to_play(0, 10, field, play), None);
        assert_eq!(cell_to_play(101, 10, field, play), None);
        assert_eq!(cell_to_play(10, 80, field, play), None);
    }

    #[test]
    fn test_playfield_renders_target_sprite() {
        let mut overlay = Overlay::default();
        overlay.target = Some(swat::surface::DrawnTarget {
            at: Point::new(100.0, 100.0),
            size: 300.0,
        });
        let sprite = TargetSprite {
            rows: vec!["XYZ".to_string()],
        };
        let area = Rect::new(0, 0, 60, 30);
        let mut buf = Buffer::empty(area);
        Playfield {
            overlay: &overlay,
            sprite: &sprite,
            play: PlayArea::default(),
        }
        .render(area, &mut buf);
        let content: String = buf.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("XYZ"));
        assert!(content.contains("swat"));
    }
}
