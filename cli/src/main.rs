use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use gyanforge::Config;
use gyanforge::model::entity::{LearningModule, UserEntity, UserEntityCreate};
use gyanforge::model::{CrudRepository, DbConnection, ModelManager};
use gyanforge::web::{AuthenticatedUser, UserRole};

#[derive(Parser, Debug)]
#[command(about = "Admin tool for the GyanForge database", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Inspect generated modules
    Module {
        #[command(subcommand)]
        action: ModuleCommands,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum RoleArg {
    User,
    Admin,
}

impl From<RoleArg> for UserRole {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::User => UserRole::User,
            RoleArg::Admin => UserRole::Admin,
        }
    }
}

/// User management
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    Add {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long, value_enum, default_value = "user")]
        role: RoleArg,
    },
    /// Deletes the user with all of their modules and progress
    Delete {
        #[arg(long)]
        email: String,
    },
    List {
        #[arg(long, default_value_t = 50)]
        limit: i64,
        #[arg(long, default_value_t = 0)]
        offset: i64,
    },
}

/// Module management
#[derive(Subcommand, Debug)]
pub enum ModuleCommands {
    List {
        /// Owner of the modules
        #[arg(long)]
        email: String,
        #[arg(long, default_value_t = 50)]
        limit: i64,
    },
}

async fn find_user(mm: &ModelManager, email: &str) -> gyanforge::error::AppResult<Option<UserEntity>> {
    let found = UserEntity::find_by_email(mm, &AuthenticatedUser::admin(), email).await?;
    if found.is_none() {
        eprintln!("No user with email {email}");
    }
    Ok(found)
}

#[tokio::main]
async fn main() -> gyanforge::error::AppResult<ExitCode> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    let config = Config::get_or_init(cfg!(debug_assertions)).await;
    let db_con = DbConnection::connect(config.app().database_uri())?;
    let mm = ModelManager::new(db_con);
    let admin = AuthenticatedUser::admin();

    match args.command {
        Commands::User { action } => match action {
            UserCommands::Add {
                email,
                password,
                full_name,
                role,
            } => {
                let user = UserEntity::create(
                    &mm,
                    &admin,
                    UserEntityCreate {
                        email,
                        password_hash: gyanforge::auth::hash_password(&password)?,
                        full_name,
                        role: role.into(),
                    },
                )
                .await?;
                println!("User created: {} ({}, {})", user.email(), user.id(), user.role());
            }
            UserCommands::Delete { email } => {
                let Some(user) = find_user(&mm, &email).await? else {
                    return Ok(ExitCode::FAILURE);
                };
                let id = user.id();
                user.delete(&mm, &admin).await?;
                println!("User deleted: {email} ({id})");
            }
            UserCommands::List { limit, offset } => {
                let total = UserEntity::count(&mm, &admin).await?;
                for user in UserEntity::list(&mm, &admin, limit, offset).await? {
                    let status = if user.is_active() { "active" } else { "inactive" };
                    println!(
                        "{}\t{}\t{}\t{}\t{}",
                        user.id(),
                        user.email(),
                        user.role(),
                        status,
                        user.created_at().format("%Y-%m-%d %H:%M")
                    );
                }
                println!("{total} user(s) in total");
            }
        },

        Commands::Module { action } => match action {
            ModuleCommands::List { email, limit } => {
                let Some(user) = find_user(&mm, &email).await? else {
                    return Ok(ExitCode::FAILURE);
                };
                let owner = AuthenticatedUser::new(user.id(), user.role());
                for module in LearningModule::list(&mm, &owner, limit, 0).await? {
                    println!(
                        "{}\t{}\t{}\t{} min\t{} question(s)",
                        module.id(),
                        module.title(),
                        module.difficulty(),
                        module.duration_minutes(),
                        module.quiz_questions().len()
                    );
                }
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}
