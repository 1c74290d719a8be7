use super::body::AgentBody;

/// A scrolling barrier with one passable vertical gap.
///
/// Obstacles are owned by [`ObstacleField`](crate::ObstacleField); agents only ever see
/// them through shared references.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    x: f32,
    width: f32,
    gap_top: f32,
    gap_height: f32,
    scored: bool,
}

impl Obstacle {
    #[must_use]
    pub fn new(x: f32, width: f32, gap_top: f32, gap_height: f32) -> Self {
        Self {
            x,
            width,
            gap_top,
            gap_height,
            scored: false,
        }
    }

    /// Left edge.
    #[must_use]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Right (trailing) edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[must_use]
    pub fn gap_top(&self) -> f32 {
        self.gap_top
    }

    #[must_use]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_top + self.gap_height
    }

    #[must_use]
    pub fn gap_center(&self) -> f32 {
        self.gap_top + self.gap_height / 2.0
    }

    #[must_use]
    pub fn gap_height(&self) -> f32 {
        self.gap_height
    }

    /// Whether the obstacle has already been passed by the agents.
    #[must_use]
    pub fn is_scored(&self) -> bool {
        self.scored
    }

    pub(crate) fn scroll(&mut self, distance: f32) {
        self.x -= distance;
    }

    /// Marks the obstacle as passed. Returns `false` if it already was.
    pub(crate) fn mark_scored(&mut self) -> bool {
        !std::mem::replace(&mut self.scored, true)
    }

    /// Returns `true` if the body overlaps the obstacle horizontally while any part of
    /// it is outside the gap.
    ///
    /// Edges touching exactly do not count as an overlap.
    #[must_use]
    pub fn collides_with(&self, body: &AgentBody) -> bool {
        let overlaps_x = body.x() < self.right() && body.right() > self.x;
        let outside_gap = body.y() < self.gap_top || body.bottom() > self.gap_bottom();
        overlaps_x && outside_gap
    }
}

/// Returns `true` if the body collides with any obstacle.
#[must_use]
pub fn collides_with_any(obstacles: &[Obstacle], body: &AgentBody) -> bool {
    obstacles.iter().any(|o| o.collides_with(body))
}
