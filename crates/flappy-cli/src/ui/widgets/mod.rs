use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{key_binding_display::*, stats_display::*, world_display::*};

mod key_binding_display;
mod stats_display;
mod world_display;

pub mod color {
    use ratatui::style::Color;

    pub const SKY: Color = Color::Rgb(112, 197, 206);
    pub const PIPE: Color = Color::Rgb(115, 191, 46);
    pub const BIRD: Color = Color::Rgb(250, 205, 40);
    pub const BEAK: Color = Color::Rgb(245, 110, 50);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use ratatui::style::{Color, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
