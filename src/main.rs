use clap::{Parser, Subcommand};
use protonpass::detail::render_markdown;
use protonpass::password::{penalty_label, MAX_WORD_COUNT, MIN_WORD_COUNT};
use protonpass::{
    actions_for_item, ActionType, Backend, Config, ErrorKind, Item, ItemCategory, PassError,
    PassphraseOptions, ProtonPassBackend, RandomPasswordOptions, Separator,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "protonpass")]
#[command(about = "Browse and copy secrets from Proton Pass through pass-cli.")]
struct CommandLine {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show whether pass-cli is installed and logged in
    Status,
    /// List vaults
    Vaults {
        #[arg(long)]
        json: bool,
    },
    /// List active items, favorites first
    #[command(alias = "ls")]
    Items {
        /// Only list this vault
        #[arg(long)]
        vault: Option<String>,
        /// Only list this category
        #[arg(long)]
        category: Option<ItemCategory>,
        #[arg(long)]
        json: bool,
    },
    /// Render an item's details as markdown
    Show { item_id: String },
    /// Print an item's password
    Password { share_id: String, item_id: String },
    /// Print an item's current TOTP code
    Totp { share_id: String, item_id: String },
    /// Print one field of an item
    Field {
        share_id: String,
        item_id: String,
        field: String,
    },
    /// Generate a password or passphrase
    #[command(subcommand)]
    Generate(Generate),
    /// Score the strength of a password
    Score { value: String },
    /// List the actions available for an item
    Actions { item_id: String },
    /// Print the value an action would copy, paste or open
    Copy { item_id: String, action: ActionType },
}

#[derive(Subcommand)]
enum Generate {
    /// Random characters
    Random {
        #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u16).range(8..=64))]
        length: u16,
        #[arg(long)]
        no_numbers: bool,
        #[arg(long)]
        no_uppercase: bool,
        #[arg(long)]
        no_symbols: bool,
    },
    /// Dictionary words
    Passphrase {
        #[arg(long, default_value_t = 5)]
        words: usize,
        #[arg(long, default_value = "hyphens")]
        separator: Separator,
        #[arg(long)]
        no_capitalize: bool,
        #[arg(long)]
        no_numbers: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let commands = CommandLine::parse();
    if let Err(err) = run(commands.command).await {
        report(&err);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: Commands) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let backend = ProtonPassBackend::new(config.clone());

    match command {
        Commands::Status => {
            let path = backend.binary_path()?;
            println!("pass-cli: {}", path.display());
            match backend.status().await? {
                Some(user) => println!("logged in as {}", user.email),
                None => println!("logged in"),
            }
        }
        Commands::Vaults { json } => {
            let vaults = backend.list_vaults().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&vaults)?);
            } else {
                for vault in &vaults {
                    println!("{}\t{}", vault.share_id, vault.name);
                }
            }
        }
        Commands::Items {
            vault,
            category,
            json,
        } => {
            let mut items = match vault {
                Some(name) => backend.list_items(&name).await?,
                None => {
                    let all = backend.list_all_items().await?;
                    for failure in &all.failures {
                        eprintln!("warning: could not list {}: {}", failure.vault, failure.error);
                    }
                    all.items
                }
            };
            if let Some(category) = category {
                items.retain(|item| item.category() == category);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                for item in &items {
                    print_item_row(item);
                }
            }
        }
        Commands::Show { item_id } => {
            let item = find_item(&backend, &item_id).await?;
            println!("{}", render_markdown(&item));
        }
        Commands::Password { share_id, item_id } => {
            println!("{}", backend.get_password(&share_id, &item_id).await?);
        }
        Commands::Totp { share_id, item_id } => match backend.get_totp(&share_id, &item_id).await? {
            Some(code) => println!("{}", code),
            None => anyhow::bail!("item has no TOTP configured"),
        },
        Commands::Field {
            share_id,
            item_id,
            field,
        } => {
            println!("{}", backend.get_field(&share_id, &item_id, &field).await?);
        }
        Commands::Generate(Generate::Random {
            length,
            no_numbers,
            no_uppercase,
            no_symbols,
        }) => {
            let options = RandomPasswordOptions {
                length: usize::from(length),
                numbers: !no_numbers,
                uppercase: !no_uppercase,
                symbols: !no_symbols,
            };
            println!("{}", backend.generate_password(&options).await?);
        }
        Commands::Generate(Generate::Passphrase {
            words,
            separator,
            no_capitalize,
            no_numbers,
        }) => {
            if !(MIN_WORD_COUNT..=MAX_WORD_COUNT).contains(&words) {
                anyhow::bail!(
                    "word count must be between {} and {}",
                    MIN_WORD_COUNT,
                    MAX_WORD_COUNT
                );
            }
            let options = PassphraseOptions {
                words,
                separator,
                capitalize: !no_capitalize,
                numbers: !no_numbers,
            };
            println!("{}", backend.generate_passphrase(&options).await?);
        }
        Commands::Score { value } => {
            let score = backend.score_password(&value).await?;
            println!("{} ({:.0}%)", score.password_score, score.numeric_score);
            for penalty in &score.penalties {
                println!("  - {}", penalty_label(penalty));
            }
        }
        Commands::Actions { item_id } => {
            let item = find_item(&backend, &item_id).await?;
            for action in actions_for_item(&item, &config) {
                println!("{}", action);
            }
        }
        Commands::Copy { item_id, action } => {
            let item = find_item(&backend, &item_id).await?;
            let label = action.field().map_or("URL", |f| f.title());
            let Some(value) = backend.action_value(&item, action).await? else {
                anyhow::bail!("No {} found", label.to_lowercase());
            };
            println!("{}", value);

            // Staying open means offering the item's other actions.
            if !action.closes_window(&config) {
                let others: Vec<String> = actions_for_item(&item, &config)
                    .into_iter()
                    .filter(|a| *a != action)
                    .map(|a| a.to_string())
                    .collect();
                if !others.is_empty() {
                    eprintln!("More actions: {}", others.join(", "));
                }
            }
        }
    }

    Ok(())
}

async fn find_item(backend: &ProtonPassBackend, item_id: &str) -> anyhow::Result<Item> {
    let all = backend.list_all_items().await?;
    all.items
        .into_iter()
        .find(|item| item.id == item_id)
        .ok_or_else(|| anyhow::anyhow!("item not found: {}", item_id))
}

fn print_item_row(item: &Item) {
    let star = if item.favorite { "*" } else { " " };
    let subtitle = item.username_or_email().unwrap_or("");
    println!(
        "{} {}\t{}\t{}\t{}\t{}",
        star,
        item.id,
        item.share_id,
        item.category().display_name(),
        item.name,
        subtitle
    );
}

fn report(err: &anyhow::Error) {
    for line in error_lines(err) {
        eprintln!("{}", line);
    }
}

fn error_lines(err: &anyhow::Error) -> Vec<String> {
    let Some(pass_err) = err.downcast_ref::<PassError>() else {
        return vec![format!("Error: {:#}", err)];
    };

    let mut lines = vec![format!("{}: {}", pass_err.title(), pass_err)];
    match pass_err.kind() {
        ErrorKind::BinaryNotFound => lines.push(
            "Install the Proton Pass CLI or set PASS_CLI_PATH to its location.".to_string(),
        ),
        ErrorKind::AuthenticationRequired => {
            lines.push("Run 'pass-cli login' in your terminal, then try again.".to_string())
        }
        ErrorKind::Failure => {}
    }
    lines
}
