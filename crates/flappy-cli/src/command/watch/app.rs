use crossterm::event::{Event, KeyCode};
use flappy_training::{
    config::ConfigError, evolution::EvolutionController, network::FeedForwardNetwork,
    population::Population,
};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    widgets::Block as BlockWidget,
};

use crate::{
    tui::App,
    ui::widgets::{KeyBinding, KeyBindingDisplay, StatRow, StatsDisplay, WorldDisplay},
};

const MAX_SPEED: u32 = 64;

const KEY_BINDINGS: &[KeyBinding] = &[
    (&["+", "-"], "Speed"),
    (&["P"], "Pause"),
    (&["Q"], "Quit"),
];

/// Shows a population evolving, one generation after another.
///
/// Each frame advances the simulation `speed` ticks. When a generation dies out it is
/// concluded, evolved and respawned in place.
#[derive(Debug)]
pub struct WatchApp {
    controller: EvolutionController,
    population: Option<Population<FeedForwardNetwork>>,
    speed: u32,
    is_paused: bool,
    is_exiting: bool,
    error: Option<ConfigError>,
}

impl WatchApp {
    pub fn new(
        mut controller: EvolutionController,
        policies: Vec<FeedForwardNetwork>,
    ) -> Result<Self, ConfigError> {
        let population = controller.spawn(policies)?;
        Ok(Self {
            controller,
            population: Some(population),
            speed: 1,
            is_paused: false,
            is_exiting: false,
            error: None,
        })
    }

    /// Completed generations and the best score seen so far.
    pub fn progress(&self) -> (u64, usize) {
        let score = self.population.as_ref().map_or(0, Population::score);
        (
            self.controller.generation(),
            self.controller.high_score().max(score),
        )
    }

    pub fn into_result(self) -> anyhow::Result<()> {
        match self.error {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    fn next_generation(&mut self) {
        let Some(population) = self.population.take() else {
            return;
        };
        let scored = self.controller.conclude(population);
        let next = self
            .controller
            .evolve(scored.policies)
            .and_then(|policies| self.controller.spawn(policies));
        match next {
            Ok(population) => self.population = Some(population),
            Err(err) => {
                self.error = Some(err);
                self.is_exiting = true;
            }
        }
    }

    fn step(&mut self) {
        let Some(population) = &mut self.population else {
            return;
        };
        // `tick` only fails once the population is extinct, which is handled below.
        let _ = population.tick();
        if population.is_extinct() {
            self.next_generation();
        }
    }

    fn stat_rows(&self) -> Vec<StatRow> {
        let (generation, high_score) = self.progress();
        let mut rows = vec![
            StatRow::LabelValue("GENERATION:", generation.to_string()),
            StatRow::LabelValue("HIGH SCORE:", high_score.to_string()),
        ];
        if let Some(population) = &self.population {
            rows.extend([
                StatRow::LabelValue("SCORE:", population.score().to_string()),
                StatRow::LabelValue(
                    "ALIVE:",
                    format!("{}/{}", population.alive_count(), population.agents().len()),
                ),
                StatRow::LabelValue("TICK:", population.ticks().to_string()),
            ]);
        }
        rows.push(StatRow::Empty);
        if let Some(report) = self.controller.last_report() {
            rows.extend([
                StatRow::LabelValue("LAST BEST:", format!("{:.0}", report.best_fitness)),
                StatRow::LabelValue("LAST MEAN:", format!("{:.0}", report.mean_fitness)),
                StatRow::Empty,
            ]);
        }
        let status = if self.is_paused { "PAUSED" } else { "RUNNING" };
        rows.extend([
            StatRow::LabelValue("SPEED:", format!("x{}", self.speed)),
            StatRow::LabelValue("STATUS:", status.to_owned()),
        ]);
        rows
    }
}

impl App for WatchApp {
    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, event: Event) {
        if let Some(event) = event.as_key_event() {
            match event.code {
                KeyCode::Char('+' | '=') => self.speed = (self.speed * 2).min(MAX_SPEED),
                KeyCode::Char('-') => self.speed = (self.speed / 2).max(1),
                KeyCode::Char('p') => self.is_paused = !self.is_paused,
                KeyCode::Char('q') => self.is_exiting = true,
                _ => {}
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let Some(population) = &self.population else {
            return;
        };
        let bodies = population
            .agents()
            .iter()
            .filter(|agent| agent.is_alive())
            .map(|agent| *agent.body());
        let world_display = WorldDisplay::new(population.world(), population.obstacles())
            .bodies(bodies)
            .block(BlockWidget::bordered());
        let stats_display = StatsDisplay::new(self.stat_rows()).block(BlockWidget::bordered());

        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        let world_width = world_display.width_for_height(main_area.height);
        let [world_area, stats_area] = Layout::horizontal([
            Constraint::Length(world_width),
            Constraint::Length(stats_display.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(main_area);
        let [stats_area] = Layout::vertical([Constraint::Length(stats_display.height())])
            .areas(stats_area);

        frame.render_widget(world_display, world_area);
        frame.render_widget(stats_display, stats_area);
        frame.render_widget(KeyBindingDisplay::new(KEY_BINDINGS), help_area);
    }

    fn update(&mut self) {
        if self.is_paused {
            return;
        }
        for _ in 0..self.speed {
            if self.is_exiting {
                break;
            }
            self.step();
        }
    }
}
