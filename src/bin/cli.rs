use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use quiz_admin::db::queries::categories::create_category;
use quiz_admin::db::queries::users::{create_user, NewUser};
use quiz_admin::db::{self, Role};
use quiz_admin::telemetry::init_tracing;
use uuid::Uuid;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Database path
    db_path: PathBuf,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending migrations
    Migrate,
    /// Create a user and print its api token
    AddUser {
        #[clap(long)]
        name: String,
        /// 'admin' or 'user'
        #[clap(long, default_value = "user")]
        role: Role,
        #[clap(long)]
        grade_level: Option<i64>,
        #[clap(long)]
        school: Option<String>,
        #[clap(long)]
        coach_name: Option<String>,
    },
    /// Create a question category
    AddCategory {
        #[clap(long)]
        name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let db_path = cli.db_path.display().to_string();
    let pool = db::establish_connection(&db_path)
        .await
        .context("Cannot connect to DB")?;
    db::run_migrations(&pool).await?;

    match cli.command {
        Commands::Migrate => tracing::info!("Migrations applied"),
        Commands::AddUser {
            name,
            role,
            grade_level,
            school,
            coach_name,
        } => {
            let api_token = Uuid::new_v4().simple().to_string();
            let id = create_user(
                &pool,
                NewUser {
                    name: &name,
                    role,
                    api_token: &api_token,
                    grade_level,
                    school: school.as_deref(),
                    coach_name: coach_name.as_deref(),
                },
            )
            .await
            .context("Cannot create user")?;
            tracing::info!(user_id = id, %role, "User created");
            println!("{api_token}");
        }
        Commands::AddCategory { name } => {
            let id = create_category(&pool, &name)
                .await
                .context("Cannot create category")?;
            println!("{id}");
        }
    }
    Ok(())
}
