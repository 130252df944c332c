/// User settings stored under the "settings" key
use crate::error::{Result, StashError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BATCH_SIZE: u32 = 40;
pub const DEFAULT_BUMP: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Number of Stash entries opened per batch
    pub batch_size: u32,
    /// Amount used by the bump shortcut and prefilled in the popup
    pub default_bump: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            batch_size: DEFAULT_BATCH_SIZE,
            default_bump: DEFAULT_BUMP,
        }
    }
}

impl Settings {
    pub fn set_batch_size(&mut self, batch_size: i64) -> Result<()> {
        if batch_size < 1 || batch_size > u32::MAX as i64 {
            return Err(StashError::InvalidInput(format!(
                "batch size must be a positive number, got {}",
                batch_size
            )));
        }
        self.batch_size = batch_size as u32;
        Ok(())
    }

    pub fn set_default_bump(&mut self, default_bump: i64) -> Result<()> {
        if default_bump == 0 {
            return Err(StashError::InvalidInput(
                "default bump amount must not be zero".to_string(),
            ));
        }
        self.default_bump = default_bump;
        Ok(())
    }
}

/// Parse a bump amount typed into the popup
pub fn parse_bump_amount(input: &str) -> Result<i64> {
    input
        .trim()
        .parse()
        .map_err(|_| StashError::InvalidInput(format!("invalid bump amount provided: {:?}", input)))
}
