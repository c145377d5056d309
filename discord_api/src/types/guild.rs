use serde::{Deserialize, Serialize};

use super::Snowflake;

/// Guild summary returned by `GET /users/@me/guilds` (requires the `guilds` scope).
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PartialGuild {
    pub id: Snowflake,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub owner: bool,
    /// Permission bitset of the user in this guild, as a decimal string.
    #[serde(default)]
    pub permissions: Option<String>,
}

impl PartialGuild {
    const ADMINISTRATOR: u64 = 1 << 3;

    pub fn is_admin(&self) -> bool {
        self.owner
            || self
                .permissions
                .as_deref()
                .and_then(|p| p.parse::<u64>().ok())
                .is_some_and(|bits| bits & Self::ADMINISTRATOR != 0)
    }
}
