use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use dialoguer::Password;
use dotenvy::dotenv;

use bastion::bastion_config::{AuthConfig, DatabaseConfig};
use bastion::bastion_core::PasswordHasher;
use bastion::bastion_db::{NewUser, PgPool, PgUserStore, UserStore, init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "bastion-cli")]
#[command(about = "Bastion CLI - Administrative tools for the Bastion API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Create a user account
    CreateUser {
        /// Display name
        #[arg(short = 'n', long)]
        name: String,

        /// Email address
        #[arg(short = 'e', long)]
        email: String,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Revoke a user's refresh token so every session has to log in again
    RevokeSessions {
        /// Email address
        #[arg(short = 'e', long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let database = DatabaseConfig::from_env().context("invalid database configuration")?;
    let pool = init_db_pool(&database).await?;

    match cli.command {
        Commands::Migrate => {
            run_migrations(&pool).await?;
            println!("Migrations applied");
        }
        Commands::CreateUser {
            name,
            email,
            password,
        } => handle_create_user(pool, name, email, password).await?,
        Commands::RevokeSessions { email } => handle_revoke_sessions(pool, email).await?,
    }

    Ok(())
}

async fn handle_create_user(
    pool: PgPool,
    name: String,
    email: String,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("failed to read password")?,
    };

    if name.chars().count() < 3 {
        bail!("name must be at least 3 characters");
    }
    if password.chars().count() < 8 {
        bail!("password must be at least 8 characters");
    }

    let auth = AuthConfig::from_env().context("invalid auth configuration")?;
    let hasher = PasswordHasher::new(auth.bcrypt_cost);
    let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .context("password hashing task failed")??;

    let store = PgUserStore::new(pool);
    let user = store
        .insert_user(NewUser {
            name: &name,
            email: &email,
            password_hash: &password_hash,
        })
        .await?;

    match user {
        Some(user) => {
            println!("User created");
            println!("   ID: {}", user.id);
            println!("   Email: {}", user.email);
            Ok(())
        }
        None => bail!("a user with email {email} already exists"),
    }
}

async fn handle_revoke_sessions(pool: PgPool, email: String) -> anyhow::Result<()> {
    let store = PgUserStore::new(pool);
    let Some(user) = store.find_by_email(&email).await? else {
        bail!("no active user with email {email}");
    };

    store.clear_refresh_token(user.id).await?;
    println!("Sessions revoked for {email}");
    Ok(())
}
