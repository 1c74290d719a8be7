use crossterm::event::{Event, KeyCode};
use flappy_engine::{FlightSession, SessionState};
use flappy_training::{network::FeedForwardNetwork, policy};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    widgets::Block as BlockWidget,
};

use crate::{
    schema::model::NetworkModel,
    tui::App,
    ui::widgets::{KeyBinding, KeyBindingDisplay, StatRow, StatsDisplay, WorldDisplay},
};

const MANUAL_BINDINGS: &[KeyBinding] = &[
    (&["Space"], "Flap"),
    (&["R"], "Restart"),
    (&["P"], "Pause"),
    (&["Q"], "Quit"),
];
const AUTO_BINDINGS: &[KeyBinding] = &[(&["R"], "Restart"), (&["P"], "Pause"), (&["Q"], "Quit")];
const PAUSED_BINDINGS: &[KeyBinding] = &[(&["P"], "Resume"), (&["Q"], "Quit")];
const GAME_OVER_BINDINGS: &[KeyBinding] = &[(&["R"], "Restart"), (&["Q"], "Quit")];

#[derive(Debug)]
struct Autopilot {
    name: String,
    network: FeedForwardNetwork,
}

/// A single flight, steered by the keyboard or by a trained network.
#[derive(Debug)]
pub struct PlayApp {
    session: FlightSession,
    autopilot: Option<Autopilot>,
    is_exiting: bool,
}

impl PlayApp {
    pub fn manual(session: FlightSession) -> Self {
        Self {
            session,
            autopilot: None,
            is_exiting: false,
        }
    }

    pub fn auto(session: FlightSession, model: NetworkModel) -> Self {
        Self {
            session,
            autopilot: Some(Autopilot {
                name: model.name,
                network: model.network,
            }),
            is_exiting: false,
        }
    }

    pub fn high_score(&self) -> usize {
        self.session.stats().high_score()
    }

    fn key_bindings(&self) -> &'static [KeyBinding<'static>] {
        match self.session.session_state() {
            SessionState::Playing if self.autopilot.is_none() => MANUAL_BINDINGS,
            SessionState::Playing => AUTO_BINDINGS,
            SessionState::Paused => PAUSED_BINDINGS,
            SessionState::GameOver => GAME_OVER_BINDINGS,
        }
    }

    fn stat_rows(&self) -> Vec<StatRow> {
        let stats = self.session.stats();
        let status = match self.session.session_state() {
            SessionState::Playing => "FLYING",
            SessionState::Paused => "PAUSED",
            SessionState::GameOver => "GAME OVER",
        };
        let pilot = self
            .autopilot
            .as_ref()
            .map_or_else(|| "you".to_owned(), |autopilot| autopilot.name.clone());
        vec![
            StatRow::LabelValue("SCORE:", stats.score().to_string()),
            StatRow::LabelValue("HIGH SCORE:", stats.high_score().to_string()),
            StatRow::Empty,
            StatRow::LabelValue("FRAME:", self.session.frame().to_string()),
            StatRow::LabelValue("PILOT:", pilot),
            StatRow::Empty,
            StatRow::LabelValue("STATUS:", status.to_owned()),
        ]
    }
}

impl App for PlayApp {
    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, event: Event) {
        let state = self.session.session_state();
        let can_flap = state.is_playing() && self.autopilot.is_none();
        let can_toggle_pause = !state.is_game_over();

        if let Some(event) = event.as_key_event() {
            match event.code {
                KeyCode::Char(' ') if can_flap => self.session.flap(),
                KeyCode::Char('r') => self.session.restart(),
                KeyCode::Char('p') if can_toggle_pause => self.session.toggle_pause(),
                KeyCode::Char('q') => self.is_exiting = true,
                _ => {}
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let world_display = WorldDisplay::new(self.session.world(), self.session.obstacles())
            .bodies([*self.session.body()])
            .block(BlockWidget::bordered());
        let stats_display = StatsDisplay::new(self.stat_rows()).block(BlockWidget::bordered());
        let help = KeyBindingDisplay::new(self.key_bindings());

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
        frame.render_widget(help, help_area);
    }

    fn update(&mut self) {
        if let Some(autopilot) = &self.autopilot
            && policy::decide(&autopilot.network, self.session.observe().as_ref()).is_flap()
        {
            self.session.flap();
        }
        self.session.increment_frame();
    }
}
