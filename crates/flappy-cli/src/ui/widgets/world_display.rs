use flappy_engine::{AgentBody, Obstacle, WorldConfig};
use ratatui::{
    prelude::{Buffer, Rect},
    symbols::Marker,
    widgets::{
        Block as BlockWidget, Widget,
        canvas::{Canvas, Context, Line as CanvasLine, Rectangle},
    },
};

use crate::ui::widgets::color;

/// World units between the vertical strokes that fill an obstacle.
const PIPE_STROKE: f64 = 2.0;

/// Draws the world: obstacles, and one bird per body with its beak tilted by the
/// body's rotation hint.
///
/// World `y` grows downwards; the canvas is flipped so the ceiling is at the top.
#[derive(Debug)]
pub struct WorldDisplay<'a> {
    world: &'a WorldConfig,
    obstacles: &'a [Obstacle],
    bodies: Vec<AgentBody>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> WorldDisplay<'a> {
    pub fn new(world: &'a WorldConfig, obstacles: &'a [Obstacle]) -> Self {
        Self {
            world,
            obstacles,
            bodies: vec![],
            block: None,
        }
    }

    pub fn bodies<I>(self, bodies: I) -> Self
    where
        I: IntoIterator<Item = AgentBody>,
    {
        Self {
            bodies: bodies.into_iter().collect(),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    /// Columns needed to show the world undistorted in `height` rows.
    ///
    /// Terminal cells are about twice as tall as they are wide.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn width_for_height(&self, height: u16) -> u16 {
        let margin = super::block_vertical_margin(self.block.as_ref());
        let inner = f64::from(height.saturating_sub(margin));
        let aspect = f64::from(self.world.width) / f64::from(self.world.height);
        (inner * aspect * 2.0).round() as u16 + super::block_horizontal_margin(self.block.as_ref())
    }
}

fn fill_column(ctx: &mut Context<'_>, x: f64, width: f64, y_range: (f64, f64)) {
    let (bottom, top) = y_range;
    if top <= bottom {
        return;
    }
    let mut stroke = x;
    while stroke <= x + width {
        ctx.draw(&CanvasLine::new(stroke, bottom, stroke, top, color::PIPE));
        stroke += PIPE_STROKE;
    }
}

fn draw_bird(ctx: &mut Context<'_>, body: &AgentBody, world_height: f64) {
    let x = f64::from(body.x());
    let y = world_height - f64::from(body.bottom());
    let width = f64::from(body.width());
    let height = f64::from(body.height());
    ctx.draw(&Rectangle {
        x,
        y,
        width,
        height,
        color: color::BIRD,
    });

    // Positive velocity falls, so the beak tilts below the horizon.
    let angle = -f64::from(body.rotation());
    let (cx, cy) = (x + width / 2.0, y + height / 2.0);
    let reach = width * 0.75;
    ctx.draw(&CanvasLine::new(
        cx,
        cy,
        cx + reach * angle.cos(),
        cy + reach * angle.sin(),
        color::BEAK,
    ));
}

impl Widget for WorldDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Self {
            world,
            obstacles,
            bodies,
            block,
        } = self;
        let world_width = f64::from(world.width);
        let world_height = f64::from(world.height);

        let canvas = Canvas::default()
            .marker(Marker::HalfBlock)
            .background_color(color::SKY)
            .x_bounds([0.0, world_width])
            .y_bounds([0.0, world_height])
            .paint(|ctx| {
                for obstacle in obstacles {
                    let x = f64::from(obstacle.x());
                    let width = f64::from(obstacle.width());
                    let gap_top = f64::from(obstacle.gap_top());
                    let gap_bottom = f64::from(obstacle.gap_bottom());
                    fill_column(ctx, x, width, (world_height - gap_top, world_height));
                    fill_column(ctx, x, width, (0.0, world_height - gap_bottom));
                }
                ctx.layer();
                for body in &bodies {
                    draw_bird(ctx, body, world_height);
                }
            });

        match block {
            Some(block) => canvas.block(block).render(area, buf),
            None => canvas.render(area, buf),
        }
    }
}
