//! Fixed-rate terminal UI runtime.
//!
//! [`run`] drives an [`App`] one frame at a time: every frame advances the app once
//! and redraws it, and key presses are handled between frames as they arrive.

use std::time::Instant;

use crossterm::event;

use self::clock::FrameClock;
pub use self::app::App;

mod app;
mod clock;

/// Frames per second for every screen. One frame is one simulation step.
pub const FRAME_RATE: u32 = 60;

/// Takes over the terminal until `app.should_exit()` returns true.
///
/// Each due frame calls `app.update()` then `app.draw()`. Terminal events that arrive
/// in between go to `app.handle_event()`.
pub fn run<A>(app: &mut A) -> anyhow::Result<()>
where
    A: App,
{
    let mut clock = FrameClock::new(FRAME_RATE, Instant::now());
    ratatui::run(|terminal| {
        while !app.should_exit() {
            let now = Instant::now();
            if clock.try_advance(now) {
                app.update();
                terminal.draw(|frame| app.draw(frame))?;
            } else if event::poll(clock.until_next_frame(now))? {
                app.handle_event(event::read()?);
            }
        }
        Ok(())
    })
}
