//! Fire-and-forget sound triggers.

use rand::{Rng, RngCore};
use tracing::debug;

/// Sink for sound events raised by entity behavior.
pub trait Audio {
    fn play_effect(&mut self, name: &str);
    fn play_loop(&mut self, name: &str);
}

/// Reports sounds through `tracing` instead of playing them.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingAudio;

impl Audio for TracingAudio {
    fn play_effect(&mut self, name: &str) {
        debug!(sound = name, "effect");
    }

    fn play_loop(&mut self, name: &str) {
        debug!(sound = name, "loop");
    }
}

/// Records every request, in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AudioLog {
    pub effects: Vec<String>,
    pub loops: Vec<String>,
}

impl AudioLog {
    pub fn count(&self, prefix: &str) -> usize {
        self.effects.iter().filter(|e| e.starts_with(prefix)).count()
    }
}

impl Audio for AudioLog {
    fn play_effect(&mut self, name: &str) {
        self.effects.push(name.to_string());
    }

    fn play_loop(&mut self, name: &str) {
        self.loops.push(name.to_string());
    }
}

/// Pick one of `count` recorded takes of a sound: the first take has no
/// suffix, later ones are numbered (`SLURP`, `SLURP2`, `SLURP3`).
pub fn variant(rng: &mut dyn RngCore, base: &str, count: u32) -> String {
    let n = rng.gen_range(1..=count.max(1));
    if n == 1 {
        base.to_string()
    } else {
        format!("{base}{n}")
    }
}
