//! Human-readable one-line-per-entity dumps.
//!
//! ```text
//! Car #0 'car1' 0----40%--->1 (speed: max: 100.00, current: 100.00)
//! Traffic light #2 ON  [3] 12%/50% (waited: 4.00)
//! ```
//!
//! Percentages are truncated toward zero.  The format is for people and for
//! byte-for-byte determinism checks; nothing parses it.

use std::io::{self, Write};

use crate::SimView;

impl SimView<'_> {
    /// One line per active vehicle, in processing order.
    pub fn dump_cars<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        for (i, car) in self.vehicles.iter().enumerate() {
            let Some((from, to)) = car.current_edge() else {
                continue;
            };
            write!(out, "Car #{i} ")?;
            if !car.label().is_empty() {
                write!(out, "'{}' ", car.label())?;
            }
            writeln!(
                out,
                "{from}----{pct}%--->{to} (speed: max: {max:.2}, current: {cur:.2})",
                pct = (car.progress_fraction() * 100.0) as u32,
                max = car.max_speed(),
                cur = car.speed(),
            )?;
        }
        Ok(())
    }

    /// One line per light, ascending by vertex.
    pub fn dump_traffic_lights<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        for (at, light) in self.lights.iter() {
            let edges: Vec<String> = light.controlled().iter().map(ToString::to_string).collect();
            writeln!(
                out,
                "Traffic light #{at} {state:<3} [{edges}] {phase}%/{duty}% (waited: {waited:.2})",
                state = light.state(),
                edges = edges.join(", "),
                phase = (light.phase_fraction() * 100.0) as u32,
                duty = (light.duty_cycle() * 100.0).round() as u32,
                waited = light.waited_secs(),
            )?;
        }
        Ok(())
    }
}
