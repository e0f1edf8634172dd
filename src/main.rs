use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;

/// foodgram - share recipes, plan the shopping
#[derive(Parser)]
#[command(name = "foodgram")]
#[command(about = "Recipe sharing REST backend", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Manage tags
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },
    /// Manage ingredients
    Ingredient {
        #[command(subcommand)]
        command: IngredientCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Register a new user
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        #[arg(long)]
        password: String,
    },
    /// Print an API token for a user
    Token {
        #[arg(long)]
        email: String,
    },
}

#[derive(Subcommand)]
enum TagCommands {
    Create {
        #[arg(long)]
        name: String,
        /// Hex color like #49B64E
        #[arg(long)]
        color: String,
        #[arg(long)]
        slug: String,
    },
}

#[derive(Subcommand)]
enum IngredientCommands {
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        measurement_unit: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = foodgram::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    foodgram::observability::init_observability(
        "foodgram",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Serve { host, port } => cli::server::serve(config, host, port).await,
        Commands::Migrate => cli::migrate::migrate(&config).await,
        Commands::Reset => cli::migrate::reset(&config).await,
        Commands::User { command } => match command {
            UserCommands::Create {
                email,
                username,
                first_name,
                last_name,
                password,
            } => {
                let input = foodgram_user::RegisterInput {
                    email,
                    username,
                    first_name,
                    last_name,
                    password,
                };
                cli::user::create(config, input).await
            }
            UserCommands::Token { email } => cli::user::token(config, email).await,
        },
        Commands::Tag {
            command: TagCommands::Create { name, color, slug },
        } => {
            let input = foodgram_recipe::tag::CreateInput { name, color, slug };
            cli::catalog::create_tag(config, input).await
        }
        Commands::Ingredient {
            command:
                IngredientCommands::Create {
                    name,
                    measurement_unit,
                },
        } => {
            let input = foodgram_recipe::ingredient::CreateInput {
                name,
                measurement_unit,
            };
            cli::catalog::create_ingredient(config, input).await
        }
    }
}
