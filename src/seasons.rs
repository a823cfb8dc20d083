// Season picker box printed by `f1term seasons`.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Block, Padding, Paragraph, Widget};
use std::ops::RangeInclusive;

pub const DEFAULT_SEASONS: RangeInclusive<i32> = 2022..=2023;

const TITLE: &str = " Select your seasons ";

/// Draws `years` one per line inside a bordered block, title on the bottom-right border.
pub fn render_season_box<I>(years: I) -> String
where
    I: IntoIterator<Item = i32>,
{
    let lines: Vec<Line> = years
        .into_iter()
        .map(|y| Line::from(y.to_string()))
        .collect();
    let content_width = lines.iter().map(Line::width).max().unwrap_or(0);
    // Borders + one column of padding each side; at least one dash left of the title.
    let width = (content_width + 4).max(TITLE.len() + 3) as u16;
    let height = lines.len() as u16 + 2;

    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    let block = Block::bordered()
        .padding(Padding::horizontal(1))
        .title_bottom(Line::from(TITLE).right_aligned());
    Paragraph::new(lines).block(block).render(area, &mut buf);

    buffer_to_string(&buf)
}

fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell((x, y)) {
                out.push_str(cell.symbol());
            }
        }
        out.push('\n');
    }
    out
}

pub fn print_seasons() {
    print!("{}", render_season_box(DEFAULT_SEASONS));
}
