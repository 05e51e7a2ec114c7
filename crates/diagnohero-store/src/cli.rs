//! CLI module for diagnohero-store.
//!
//! Command-line administration of the SQL user store. It can be used either
//! as a standalone binary or as the `admin` subcommand of the main
//! `diagnohero` CLI.
//!
//! # Usage
//!
//! ```bash
//! # Initialize database schema
//! diagnohero-admin init -d sqlite:diagnohero.db
//!
//! # Add a user
//! diagnohero-admin add -d sqlite:diagnohero.db -u student-1
//!
//! # List all users
//! diagnohero-admin list -d sqlite:diagnohero.db --format json
//!
//! # Toggle premium
//! diagnohero-admin premium -d sqlite:diagnohero.db -u student-1 --enable
//!
//! # Refill hearts of one user (or "all")
//! diagnohero-admin refill -d sqlite:diagnohero.db -u all
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use diagnohero_core::defaults::{DEFAULT_MAX_HEARTS, DEFAULT_SECONDS_PER_HEART};
use diagnohero_core::now_unix;
use diagnohero_hearts::{HeartPolicy, regenerate, time_until_next_heart};
use serde::Serialize;
use tabled::{Table, Tabled};

use crate::UserStore;
use crate::record::UserRecord;
use crate::service::HeartService;
use crate::sql::{SqlStore, SqlStoreConfig};

/// DiagnoHero store management CLI arguments.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "diagnohero-admin",
    version,
    about = "Manage DiagnoHero users and hearts"
)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommands,
}

/// Heart policy used to display and refill counters.
#[derive(Args, Debug, Clone, Copy)]
pub struct PolicyArgs {
    /// Maximum hearts per user.
    #[arg(long, default_value_t = DEFAULT_MAX_HEARTS)]
    pub max_hearts: u32,

    /// Seconds needed to regenerate one heart.
    #[arg(long, default_value_t = DEFAULT_SECONDS_PER_HEART)]
    pub seconds_per_heart: u64,
}

impl PolicyArgs {
    fn policy(&self) -> HeartPolicy {
        HeartPolicy::new(self.max_hearts, self.seconds_per_heart)
    }
}

/// Output format for `list`.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

/// Admin CLI subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum AdminCommands {
    /// Initialize database schema.
    Init {
        /// Database connection URL.
        #[arg(short, long, env = "DATABASE_URL")]
        database: String,
    },

    /// Add a new user with a full heart counter.
    Add {
        /// Database connection URL.
        #[arg(short, long, env = "DATABASE_URL")]
        database: String,

        /// User ID.
        #[arg(short, long)]
        user_id: String,

        /// Create the user as premium.
        #[arg(long)]
        premium: bool,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// List all users.
    List {
        /// Database connection URL.
        #[arg(short, long, env = "DATABASE_URL")]
        database: String,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Enable or disable premium for a user.
    Premium {
        /// Database connection URL.
        #[arg(short, long, env = "DATABASE_URL")]
        database: String,

        /// User ID to update.
        #[arg(short, long)]
        user_id: String,

        /// Enable premium.
        #[arg(long, conflicts_with = "disable")]
        enable: bool,

        /// Disable premium.
        #[arg(long)]
        disable: bool,
    },

    /// Reset hearts to the maximum.
    Refill {
        /// Database connection URL.
        #[arg(short, long, env = "DATABASE_URL")]
        database: String,

        /// User ID to refill (or "all" for all users).
        #[arg(short, long)]
        user_id: String,

        #[command(flatten)]
        policy: PolicyArgs,
    },
}

/// User row for display.
#[derive(Tabled, Serialize)]
struct UserDisplay {
    #[tabled(rename = "User ID")]
    user_id: String,
    #[tabled(rename = "Hearts")]
    hearts: String,
    #[tabled(rename = "Next Heart")]
    next_heart: String,
    #[tabled(rename = "Premium")]
    premium: String,
    #[tabled(rename = "Created")]
    created_at: i64,
}

impl UserDisplay {
    /// Row as it would be served now; nothing is written back.
    fn from_record(record: &UserRecord, policy: &HeartPolicy, now: i64) -> Self {
        let (hearts, next_heart) = if record.premium {
            ("unlimited".to_string(), "-".to_string())
        } else {
            let state = regenerate(policy, record.life_state(policy), now).state;
            let next = time_until_next_heart(policy, state, now)
                .map(format_duration)
                .unwrap_or_else(|| "-".to_string());
            (format!("{}/{}", state.hearts, policy.max_hearts), next)
        };

        Self {
            user_id: record.user_id.clone(),
            hearts,
            next_heart,
            premium: if record.premium { "Yes" } else { "No" }.to_string(),
            created_at: record.created_at,
        }
    }
}

/// Run the admin CLI with the given arguments.
///
/// This is the main entry point for the admin CLI, used by both the
/// standalone binary and the unified diagnohero CLI.
pub async fn run(args: AdminArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        AdminCommands::Init { database } => {
            let store = connect(&database).await?;
            store.init_schema().await?;
            println!("Database schema initialized successfully.");
            Ok(())
        }
        AdminCommands::Add {
            database,
            user_id,
            premium,
            policy,
        } => add_user(&database, &user_id, premium, policy.policy()).await,
        AdminCommands::List {
            database,
            format,
            policy,
        } => list_users(&database, format, policy.policy()).await,
        AdminCommands::Premium {
            database,
            user_id,
            enable,
            disable,
        } => set_premium(&database, &user_id, enable, disable).await,
        AdminCommands::Refill {
            database,
            user_id,
            policy,
        } => refill(&database, &user_id, policy.policy()).await,
    }
}

/// Connect with a single connection.
async fn connect(url: &str) -> Result<SqlStore, Box<dyn std::error::Error>> {
    let store = SqlStore::connect(SqlStoreConfig::new(url).max_connections(1)).await?;
    Ok(store)
}

async fn add_user(
    url: &str,
    user_id: &str,
    premium: bool,
    policy: HeartPolicy,
) -> Result<(), Box<dyn std::error::Error>> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err("user id must not be empty".into());
    }

    let store = connect(url).await?;
    let now = now_unix();
    store.create_user(user_id, policy.full(now), now).await?;
    if premium {
        store.set_premium(user_id, true).await?;
    }

    println!("User added successfully.");
    println!("  User ID: {}", user_id);
    println!("  Hearts: {}/{}", policy.max_hearts, policy.max_hearts);
    println!("  Premium: {}", if premium { "Yes" } else { "No" });
    Ok(())
}

async fn list_users(
    url: &str,
    format: OutputFormat,
    policy: HeartPolicy,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = connect(url).await?;
    let records = store.list_users().await?;

    if records.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    let now = now_unix();
    let users: Vec<UserDisplay> = records
        .iter()
        .map(|r| UserDisplay::from_record(r, &policy, now))
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&users)?),
        OutputFormat::Csv => {
            println!("user_id,hearts,next_heart,premium,created_at");
            for user in users {
                println!(
                    "{},{},{},{},{}",
                    user.user_id, user.hearts, user.next_heart, user.premium, user.created_at
                );
            }
        }
        OutputFormat::Table => println!("{}", Table::new(users)),
    }

    Ok(())
}

async fn set_premium(
    url: &str,
    user_id: &str,
    enable: bool,
    disable: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if enable == disable {
        return Err("specify exactly one of --enable or --disable".into());
    }

    let store = connect(url).await?;
    if !store.set_premium(user_id, enable).await? {
        return Err(format!("user not found: {}", user_id).into());
    }

    println!(
        "Premium {} for {}.",
        if enable { "enabled" } else { "disabled" },
        user_id
    );
    Ok(())
}

async fn refill(
    url: &str,
    user_id: &str,
    policy: HeartPolicy,
) -> Result<(), Box<dyn std::error::Error>> {
    let service = HeartService::new(connect(url).await?, policy);
    let now = now_unix();

    let targets: Vec<String> = if user_id == "all" {
        service
            .store()
            .list_users()
            .await?
            .into_iter()
            .map(|u| u.user_id)
            .collect()
    } else {
        vec![user_id.to_string()]
    };

    for target in &targets {
        service.refill(target, now).await?;
    }

    println!("Refilled hearts for {} user(s).", targets.len());
    Ok(())
}

/// Format seconds as `1h 05m 09s`, dropping leading zero units.
fn format_duration(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}h {m:02}m {s:02}s")
    } else if m > 0 {
        format!("{m}m {s:02}s")
    } else {
        format!("{s}s")
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        AdminArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_list_format() {
        let args = AdminArgs::try_parse_from([
            "diagnohero-admin",
            "list",
            "-d",
            "sqlite::memory:",
            "--format",
            "csv",
            "--max-hearts",
            "3",
        ])
        .unwrap();
        match args.command {
            AdminCommands::List { format, policy, .. } => {
                assert_eq!(format, OutputFormat::Csv);
                assert_eq!(policy.max_hearts, 3);
                assert_eq!(policy.seconds_per_heart, DEFAULT_SECONDS_PER_HEART);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_premium_flags_conflict() {
        let res = AdminArgs::try_parse_from([
            "diagnohero-admin",
            "premium",
            "-d",
            "sqlite::memory:",
            "-u",
            "u1",
            "--enable",
            "--disable",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(9), "9s");
        assert_eq!(format_duration(125), "2m 05s");
        assert_eq!(format_duration(3600 + 5 * 60 + 9), "1h 05m 09s");
    }

    #[test]
    fn test_display_regenerates_without_writing() {
        let policy = HeartPolicy::default();
        let record = UserRecord {
            user_id: "u1".into(),
            hearts: 2,
            last_refill_at: 1_000,
            premium: false,
            created_at: 1_000,
        };
        let row = UserDisplay::from_record(&record, &policy, 1_000 + 3600 + 60);
        assert_eq!(row.hearts, "3/5");
        assert_eq!(row.next_heart, "59m 00s");

        let premium = UserRecord {
            premium: true,
            ..record
        };
        let row = UserDisplay::from_record(&premium, &policy, 1_000);
        assert_eq!(row.hearts, "unlimited");
    }
}
