/// Score bookkeeping for a run of obstacles.
///
/// - **Score**: obstacles cleared since the last reset
/// - **High score**: best score seen by this tracker; survives [`reset`](Self::reset)
///
/// # Example
///
/// ```
/// use flappy_engine::FlightStats;
///
/// let mut stats = FlightStats::new();
/// stats.add_cleared(3);
/// stats.reset();
/// stats.add_cleared(1);
///
/// assert_eq!(stats.score(), 1);
/// assert_eq!(stats.high_score(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FlightStats {
    score: usize,
    high_score: usize,
}

impl FlightStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            high_score: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn high_score(&self) -> usize {
        self.high_score
    }

    /// Adds cleared obstacles to the score, raising the high score if needed.
    pub fn add_cleared(&mut self, cleared: usize) {
        self.score += cleared;
        self.high_score = self.high_score.max(self.score);
    }

    /// Starts a new run: the score goes back to zero, the high score is kept.
    pub const fn reset(&mut self) {
        self.score = 0;
    }
}
