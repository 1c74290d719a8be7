use crossterm::event::Event;
use ratatui::Frame;

/// A screen driven by [`run`](super::run).
pub trait App {
    fn should_exit(&self) -> bool;

    /// Reacts to a terminal event received between frames.
    fn handle_event(&mut self, event: Event);

    /// Advances the app by one frame. Called before every [`draw`](App::draw).
    fn update(&mut self);

    fn draw(&self, frame: &mut Frame);
}
