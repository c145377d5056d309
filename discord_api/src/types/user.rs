use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds between the Unix epoch and the Discord epoch (2015-01-01).
const DISCORD_EPOCH_MS: u64 = 1_420_070_400_000;

const CDN_BASE_URL: &str = "https://cdn.discordapp.com";

/// A Discord snowflake ID, transmitted as a decimal string.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Snowflake(#[serde(with = "snowflake_string")] pub u64);

impl Snowflake {
    /// The creation time encoded in the upper 42 bits.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let ms = (self.0 >> 22) + DISCORD_EPOCH_MS;
        DateTime::from_timestamp_millis(i64::try_from(ms).ok()?)
    }
}

impl std::fmt::Display for Snowflake {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

mod snowflake_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&id.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// The user behind an OAuth2 access token (`GET /users/@me`).
///
/// `email` and `verified` are only present with the `email` scope.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    pub discriminator: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub verified: Option<bool>,
}

impl User {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.id.created_at()
    }

    /// Name shown in the client: the global display name when set.
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }

    /// CDN URL of the avatar, falling back to the default avatar.
    pub fn avatar_url(&self) -> String {
        match &self.avatar {
            Some(hash) => {
                let ext = if hash.starts_with("a_") { "gif" } else { "png" };
                format!("{}/avatars/{}/{}.{}", CDN_BASE_URL, self.id, hash, ext)
            }
            None => {
                // Legacy tags index by discriminator, migrated users by ID.
                let index = match self.discriminator.parse::<u64>() {
                    Ok(d) if d != 0 => d % 5,
                    _ => (self.id.0 >> 22) % 6,
                };
                format!("{}/embed/avatars/{}.png", CDN_BASE_URL, index)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(avatar: Option<&str>, discriminator: &str) -> User {
        User {
            id: Snowflake(80351110224678912),
            username: "nelly".to_string(),
            global_name: None,
            discriminator: discriminator.to_string(),
            avatar: avatar.map(str::to_string),
            email: None,
            verified: None,
        }
    }

    #[test]
    fn snowflake_creation_time() {
        let created = Snowflake(175928847299117063).created_at().unwrap();
        assert_eq!(created.timestamp_millis(), 1_462_015_105_796);
    }

    #[test]
    fn avatar_url_uses_hash_and_animation() {
        let u = user(Some("8342729096ea3675442027381ff50dfe"), "1337");
        assert_eq!(
            u.avatar_url(),
            "https://cdn.discordapp.com/avatars/80351110224678912/8342729096ea3675442027381ff50dfe.png"
        );
        let animated = user(Some("a_1269e74af4df7417b13759eae50c83dc"), "1337");
        assert!(animated.avatar_url().ends_with(".gif"));
    }

    #[test]
    fn default_avatar_index() {
        assert_eq!(
            user(None, "1337").avatar_url(),
            "https://cdn.discordapp.com/embed/avatars/2.png"
        );
        let expected = (80351110224678912u64 >> 22) % 6;
        assert_eq!(
            user(None, "0").avatar_url(),
            format!("https://cdn.discordapp.com/embed/avatars/{}.png", expected)
        );
    }

    #[test]
    fn display_name_prefers_global_name() {
        let mut u = user(None, "0");
        assert_eq!(u.display_name(), "nelly");
        u.global_name = Some("Nelly".to_string());
        assert_eq!(u.display_name(), "Nelly");
    }
}
