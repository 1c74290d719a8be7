use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

#[derive(Debug, Clone)]
pub enum StatRow {
    Empty,
    LabelValue(&'static str, String),
}

/// A column of right-aligned `LABEL: value` rows.
#[derive(Debug)]
pub struct StatsDisplay<'a> {
    rows: Vec<StatRow>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(rows: Vec<StatRow>) -> Self {
        Self { rows, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        22 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(self.rows.len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;
        let layout = Layout::vertical((0..self.rows.len()).map(|_| Constraint::Length(1)));
        let row_areas = area.layout_vec(&layout);

        for (row, area) in iter::zip(self.rows, row_areas) {
            match row {
                StatRow::Empty => {}
                StatRow::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value, style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_render_label_and_value() {
        let display = StatsDisplay::new(vec![
            StatRow::LabelValue("SCORE:", "7".to_owned()),
            StatRow::Empty,
        ]);
        assert_eq!(display.height(), 2);
        assert_eq!(display.width(), 22);

        let area = Rect::new(0, 0, 22, 2);
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);

        let first_row: String = (0..22).map(|x| buf[(x, 0)].symbol()).collect();
        assert!(first_row.starts_with("SCORE:"));
        assert!(first_row.ends_with('7'));
    }
}
