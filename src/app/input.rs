use crate::app::state::App;
use mycora_data::Heading;

/// Driver verbs. Parsed from single keys or words, so a line-oriented
/// console and scripted tests drive the app the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Advance one tick. Only honoured while paused.
    Tick,
    /// Advance `n` ticks in a burst.
    Run(u64),
    TogglePause,
    SelectNext,
    SelectPrevious,
    Scroll(Heading),
    /// Only honoured while running unpaused.
    ToggleMinimal,
    Quit,
}

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        let mut words = input.split_whitespace();
        let head = words.next()?;
        let cmd = match head {
            "c" | "tick" => Command::Tick,
            "p" | "pause" => Command::TogglePause,
            "d" | "next" => Command::SelectNext,
            "a" | "prev" => Command::SelectPrevious,
            "m" | "minimal" => Command::ToggleMinimal,
            "q" | "quit" => Command::Quit,
            "up" | "k" => Command::Scroll(Heading::Up),
            "down" | "j" => Command::Scroll(Heading::Down),
            "left" | "h" => Command::Scroll(Heading::Left),
            "right" | "l" => Command::Scroll(Heading::Right),
            "run" => Command::Run(words.next().and_then(|n| n.parse().ok()).unwrap_or(100)),
            _ => return None,
        };
        Some(cmd)
    }
}

impl App {
    /// Applies one command. Commands that make no sense in the current
    /// mode are ignored, as are selections on an empty population.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Tick if self.paused => {
                self.sim.tick();
            }
            Command::Tick => {}
            Command::Run(n) => {
                self.sim.run(n);
            }
            Command::TogglePause => self.paused = !self.paused,
            Command::SelectNext if !self.minimal => self.sim.select_next(),
            Command::SelectPrevious if !self.minimal => self.sim.select_previous(),
            Command::Scroll(heading) if !self.minimal => self.scroll(heading),
            Command::ToggleMinimal if !self.paused => self.minimal = !self.minimal,
            Command::Quit => self.running = false,
            Command::SelectNext
            | Command::SelectPrevious
            | Command::Scroll(_)
            | Command::ToggleMinimal => {}
        }
    }
}
