use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use starcast_core::config::{ENV_API_KEY, ENV_API_SECRET, ENV_URL};
use starcast_core::{ControllerConfig, EnvFile, RoomController};

#[derive(Parser, Debug)]
#[command(name = "starcast")]
#[command(about = "Room and access-token management for Starcast broadcast rooms", long_about = None)]
struct Args {
    /// Room service URL
    #[arg(long, env = "LIVEKIT_URL")]
    url: Option<String>,

    /// API key
    #[arg(long, env = "LIVEKIT_API_KEY")]
    api_key: Option<String>,

    /// API secret
    #[arg(long, env = "LIVEKIT_API_SECRET", hide_env_values = true)]
    api_secret: Option<String>,

    /// Read connection settings from a KEY=VALUE env file
    #[arg(long)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a room
    CreateRoom { name: String },
    /// List room names
    ListRooms,
    /// Delete a room
    DeleteRoom { name: String },
    /// List participant identities in a room
    ListParticipants { room: String },
    /// Forcibly disconnect a participant
    Kick { room: String, identity: String },
    /// Mint a token for the publishing source
    PublisherToken { display_name: String, room: String },
    /// Mint a hidden-viewer token
    SubscriberToken {
        identity: String,
        display_name: String,
        room: String,
    },
}

/// Resolve credentials: explicit flag (or its process-env fallback, which
/// clap applies first), then the env file, then the built-in defaults.
fn build_config(args: &Args) -> Result<ControllerConfig> {
    let file = match &args.env_file {
        Some(path) => Some(EnvFile::load(path)?),
        None => None,
    };
    let pick = |flag: &Option<String>, key: &str, default: String| {
        flag.clone()
            .or_else(|| {
                file.as_ref()
                    .and_then(|env| env.get(key))
                    .map(str::to_owned)
            })
            .unwrap_or(default)
    };

    let defaults = ControllerConfig::default();
    Ok(ControllerConfig {
        url: pick(&args.url, ENV_URL, defaults.url),
        api_key: pick(&args.api_key, ENV_API_KEY, defaults.api_key),
        api_secret: pick(&args.api_secret, ENV_API_SECRET, defaults.api_secret),
    })
}

async fn run(controller: &RoomController, command: Command) -> Result<()> {
    match command {
        Command::CreateRoom { name } => {
            let room = controller.create_room(&name).await?;
            println!("created room {} (sid {})", room.name, room.sid);
        }
        Command::ListRooms => {
            for name in controller.list_rooms().await? {
                println!("{name}");
            }
        }
        Command::DeleteRoom { name } => {
            controller.delete_room(&name).await?;
            println!("deleted room {name}");
        }
        Command::ListParticipants { room } => {
            for identity in controller.list_participants(&room).await? {
                println!("{identity}");
            }
        }
        Command::Kick { room, identity } => {
            controller.remove_participant(&room, &identity).await?;
            println!("removed {identity} from {room}");
        }
        Command::PublisherToken { display_name, room } => {
            println!("{}", controller.issue_publisher_token(&display_name, &room)?);
        }
        Command::SubscriberToken {
            identity,
            display_name,
            room,
        } => {
            println!(
                "{}",
                controller.issue_subscriber_token(&identity, &display_name, &room)?
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;
    debug!(?config, "constructing controller");

    let controller = RoomController::new(config);
    let result = run(&controller, args.command).await;
    controller.close();
    result
}
