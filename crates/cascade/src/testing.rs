//! Deterministic random source for refill tests.

use std::collections::VecDeque;

use rand::RngCore;

/// Replays a fixed sequence of colors through `Rng::gen_range(0..palette)`.
///
/// Each `next_u32` returns the smallest value that the `u8` range sampler maps
/// to the next scripted color. Drawing past the end of the script panics, so a
/// test that refills more cells than it planned for fails instead of looping.
#[derive(Debug)]
pub(crate) struct ScriptedColors {
    palette: u64,
    colors: VecDeque<u8>,
}

impl ScriptedColors {
    pub(crate) fn new(palette: u8, colors: &[u8]) -> Self {
        Self {
            palette: u64::from(palette),
            colors: colors.iter().copied().collect(),
        }
    }
}

impl RngCore for ScriptedColors {
    fn next_u32(&mut self) -> u32 {
        let Some(color) = self.colors.pop_front() else {
            panic!("scripted colors exhausted");
        };
        let color = u64::from(color);
        (color << 32).div_ceil(self.palette) as u32
    }

    fn next_u64(&mut self) -> u64 {
        u64::from(self.next_u32())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn replays_script_through_gen_range() {
        let mut rng = ScriptedColors::new(5, &[4, 0, 3, 1, 2]);
        let drawn: Vec<u8> = (0..5).map(|_| rng.gen_range(0..5u8)).collect();
        assert_eq!(drawn, [4, 0, 3, 1, 2]);
    }

    #[test]
    #[should_panic(expected = "scripted colors exhausted")]
    fn running_past_the_script_panics() {
        let mut rng = ScriptedColors::new(3, &[1]);
        assert_eq!(rng.gen_range(0..3u8), 1);
        rng.gen_range(0..3u8);
    }
}
