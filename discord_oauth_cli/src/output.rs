use discord_api::types::{PartialGuild, User};
use discord_api::AuthorizationCallback;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct GuildRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Admin")]
    admin: String,
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn build_user_rows(user: &User) -> Vec<FieldRow> {
    vec![
        FieldRow {
            field: "ID",
            value: user.id.to_string(),
        },
        FieldRow {
            field: "Username",
            value: user.username.clone(),
        },
        FieldRow {
            field: "Display name",
            value: user.display_name().to_string(),
        },
        FieldRow {
            field: "Email",
            value: or_dash(user.email.as_deref()),
        },
        FieldRow {
            field: "Verified",
            value: user.verified.map(yes_no).unwrap_or_else(|| "-".to_string()),
        },
        FieldRow {
            field: "Created",
            value: user
                .created_at()
                .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| "-".to_string()),
        },
        FieldRow {
            field: "Avatar",
            value: user.avatar_url(),
        },
    ]
}

fn build_guild_rows(guilds: &[PartialGuild]) -> Vec<GuildRow> {
    guilds
        .iter()
        .map(|g| GuildRow {
            id: g.id.to_string(),
            name: g.name.clone(),
            owner: yes_no(g.owner),
            admin: yes_no(g.is_admin()),
        })
        .collect()
}

fn build_callback_rows(callback: &AuthorizationCallback) -> Vec<FieldRow> {
    vec![
        FieldRow {
            field: "Code",
            value: callback.code.clone(),
        },
        FieldRow {
            field: "State",
            value: or_dash(callback.state.as_deref()),
        },
    ]
}

pub fn print_user_table(user: &User) {
    let mut table = Table::new(build_user_rows(user));
    table.with(Style::rounded());
    println!("{}", table);
}

fn guilds_table(guilds: &[PartialGuild]) -> Table {
    let mut table = Table::new(build_guild_rows(guilds));
    table.with(Style::rounded());
    table
}

pub fn print_guilds_table(guilds: &[PartialGuild]) {
    println!("{}", guilds_table(guilds));
}

pub fn print_callback_table(callback: &AuthorizationCallback) {
    let mut table = Table::new(build_callback_rows(callback));
    table.with(Style::rounded());
    println!("{}", table);
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_user_fixture() -> User {
        let json_str = include_str!("../../discord_api/tests/fixtures/user.json");
        serde_json::from_str(json_str).unwrap()
    }

    fn load_guilds_fixture() -> Vec<PartialGuild> {
        let json_str = include_str!("../../discord_api/tests/fixtures/guilds.json");
        serde_json::from_str(json_str).unwrap()
    }

    #[test]
    fn user_rows_cover_profile() {
        let rows = build_user_rows(&load_user_fixture());
        let fields: Vec<_> = rows.iter().map(|r| r.field).collect();
        assert_eq!(
            fields,
            ["ID", "Username", "Display name", "Email", "Verified", "Created", "Avatar"]
        );
        assert_eq!(rows[0].value, "80351110224678912");
        assert_eq!(rows[2].value, "Nelly");
        assert_eq!(rows[4].value, "yes");
        assert_eq!(rows[5].value, "2015-08-10 17:26 UTC");
    }

    #[test]
    fn user_rows_without_email_scope() {
        let mut user = load_user_fixture();
        user.email = None;
        user.verified = None;
        let rows = build_user_rows(&user);
        assert_eq!(rows[3].value, "-");
        assert_eq!(rows[4].value, "-");
    }

    #[test]
    fn guild_rows() {
        let rows = build_guild_rows(&load_guilds_fixture());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].owner, "yes");
        assert_eq!(rows[0].admin, "yes");
        assert_eq!(rows[1].admin, "no");
    }

    #[test]
    fn guild_table_has_headers() {
        let table = guilds_table(&load_guilds_fixture()).to_string();
        assert!(table.starts_with('╭'));
        let header = table.lines().nth(1).unwrap();
        assert!(header.contains("Name"));
        assert!(header.contains("Admin"));
        assert!(table.contains("Discord Testers"));
    }

    #[test]
    fn callback_rows() {
        let callback = AuthorizationCallback::from_query("code=abc").unwrap();
        let rows = build_callback_rows(&callback);
        assert_eq!(rows[0].value, "abc");
        assert_eq!(rows[1].value, "-");
    }
}
