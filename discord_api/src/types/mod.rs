mod guild;
pub use self::guild::PartialGuild;

mod user;
pub use self::user::{Snowflake, User};
