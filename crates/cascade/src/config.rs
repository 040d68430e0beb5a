//! Session tuning loaded from code or TOML.

use serde::Deserialize;

use crate::{Error, Result, MAX_CELLS};

/// Board size, palette and move budget for one game.
///
/// Missing TOML keys fall back to [`SessionConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub width: usize,
    pub height: usize,
    /// Number of distinct block colors. Must be at least 2 so chains end.
    pub palette_size: u8,
    pub initial_moves: i32,
    /// Upper bound on chain steps per click. `None` keeps chaining until the
    /// anchor stops matching.
    pub max_chain_steps: Option<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 5,
            height: 6,
            palette_size: 4,
            initial_moves: 5,
            max_chain_steps: None,
        }
    }
}

impl SessionConfig {
    /// # Errors
    ///
    /// [`Error::Config`] if the TOML is malformed, otherwise whatever
    /// [`SessionConfig::validate`] reports.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|err| Error::Config(err.message().to_owned()))?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] for a zero dimension, a board of more
    /// than [`MAX_CELLS`] cells, a palette with fewer than two colors, or a
    /// non-positive move budget.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::invalid_configuration(format!(
                "grid must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if self
            .width
            .checked_mul(self.height)
            .filter(|&cells| cells <= MAX_CELLS)
            .is_none()
        {
            return Err(Error::invalid_configuration(format!(
                "grid {}x{} exceeds {MAX_CELLS} cells",
                self.width, self.height
            )));
        }
        if self.palette_size < 2 {
            return Err(Error::invalid_configuration(format!(
                "palette_size must be at least 2, got {}",
                self.palette_size
            )));
        }
        if self.initial_moves <= 0 {
            return Err(Error::invalid_configuration(format!(
                "initial_moves must be positive, got {}",
                self.initial_moves
            )));
        }
        Ok(())
    }
}
