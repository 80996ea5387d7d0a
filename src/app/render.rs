use crate::app::state::App;
use mycora_data::Coord;
use std::fmt::Write as _;

impl App {
    /// Text for the info panel.
    ///
    /// Full mode shows the tick, viewport position, population and the
    /// selected organism; minimal mode shows only the run state, tick and
    /// population.
    #[must_use]
    pub fn info_text(&self) -> String {
        let mut out = String::new();
        let tick = self.sim.tick_count();
        let total = self.sim.queue().len();

        if self.minimal {
            let state = if self.paused { "[Paused]" } else { "[Running]" };
            let _ = writeln!(out, "Minimal mode {state}");
            let _ = writeln!(out, "Cycle      : {tick}");
            let _ = write!(out, "Total      : {total}");
            return out;
        }

        let _ = writeln!(out, "Cycle      : {tick}");
        let _ = writeln!(out, "Position   : {}", self.position);
        let _ = writeln!(out, "Total      : {total}");
        let _ = writeln!(out, "Occupancy  : {:.3}", self.sim.arena().occupancy_ratio());
        match self.sim.selected_info() {
            Ok(info) => {
                let _ = writeln!(out, "Organism   : {}", self.sim.queue().index());
                out.push_str(&info);
            }
            Err(e) => {
                let _ = write!(out, "Organism   : none ({e})");
            }
        }
        out
    }

    /// The visible window, one line per row. Cells of the selected
    /// organism are upper-cased where that changes them, and its
    /// instruction pointer is drawn as `*`.
    #[must_use]
    pub fn viewport_text(&self) -> String {
        let viewport = self.sim.viewport(self.position, self.view);
        let selected = self.sim.queue().get_organism().ok();
        let arena = self.sim.arena();

        let mut out = String::with_capacity(viewport.rows.len() * (usize::from(self.view.width) + 1));
        for (dy, row) in viewport.rows.iter().enumerate() {
            for (dx, (symbol, owner)) in row.iter().enumerate() {
                let here = arena.wrap(viewport.origin + Coord::new(dx as i32, dy as i32));
                let ch = match selected {
                    Some(org) if org.ip == here => '*',
                    Some(org) if *owner == Some(org.id) => symbol.to_ascii_uppercase(),
                    _ => *symbol,
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}
