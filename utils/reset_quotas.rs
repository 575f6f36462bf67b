use clap::Parser;
use sea_orm::Database;
use std::env;
use std::io::{self, Write};

use estate_photo_kit::services::quota;

/// Zeroes monthly edit counters, for all workspaces or a single one.
/// Run from cron at the start of each billing month.
#[derive(Parser)]
#[command(name = "reset_quotas")]
struct Args {
    /// Only reset the workspace with this slug
    #[arg(long)]
    slug: Option<String>,

    /// Skip the confirmation prompt
    #[arg(long)]
    yes: bool,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    if !args.yes {
        let scope = match &args.slug {
            Some(slug) => format!(" for workspace '{}'", slug),
            None => " for ALL workspaces".to_string(),
        };
        print!("Reset monthly edit counters{}? [y/N] ", scope);
        io::stdout().flush().unwrap();

        let mut answer = String::new();
        io::stdin().read_line(&mut answer).unwrap();
        if !answer.trim().eq_ignore_ascii_case("y") {
            println!("Aborted");
            return;
        }
    }

    let db = Database::connect(database_url)
        .await
        .expect("Failed to connect to database");

    let affected = quota::reset_month(&db, args.slug.as_deref())
        .await
        .expect("Failed to reset quotas");

    println!("Reset monthly edit counters for {} workspace(s)", affected);
}
