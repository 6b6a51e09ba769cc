use std::sync::Arc;
use std::time::Duration;

use camdash::api::{ApiClient, ApiError};
use camdash::channel::{ChannelObserver, ChannelState, SendError};
use camdash::config::{ConfigError, DashboardConfig};
use camdash::layout::{LayoutEngine, RegistryError, builtin_registry};
use camdash::provider::{ChannelContext, ChannelProvider, UsageError};
use camdash::router::CameraRouter;
use camdash::shell;
use clap::{Args, Parser, Subcommand};
use frames::{DEFAULT_CODEC, DEFAULT_DEVICE, DEFAULT_FEED, PreviewSettings};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("tool registry is invalid: {0}")]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Usage(#[from] UsageError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("command not sent: {0}")]
    Send(#[from] SendError),
    #[error("channel did not open (state: {0})")]
    NotOpen(ChannelState),
    #[error("frame encode failed: {0}")]
    Encode(#[from] frames::CodecError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "camdash", about = "Camera capture dashboard client")]
struct Cli {
    #[arg(long, env = "CAMDASH_WS_URL")]
    ws_url: Option<String>,

    #[arg(long, env = "CAMDASH_API_BASE_URL")]
    api_base_url: Option<String>,

    #[arg(long, env = "CAMDASH_OPEN_TIMEOUT_SECS")]
    open_timeout_secs: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the grouped tool dashboard.
    Dashboard {
        /// Tool id to focus; unknown ids are accepted.
        #[arg(long)]
        focus: Option<String>,
    },
    Camera(CameraArgs),
    Api(ApiCommand),
    Ping,
}

#[derive(Args, Debug)]
struct CameraArgs {
    /// Seconds to keep listening after sending; 0 waits for ctrl-c.
    #[arg(long, default_value_t = 3)]
    listen_secs: u64,

    /// Print the outgoing frame instead of connecting.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    #[command(subcommand)]
    command: CameraSubcommand,
}

#[derive(Subcommand, Debug)]
enum CameraSubcommand {
    /// Connect and print camera traffic without sending anything.
    Watch,
    ListDevices,
    Capture {
        #[arg(long, default_value = DEFAULT_DEVICE)]
        device: String,
    },
    Record(RecordCommand),
    SelectStream {
        #[arg(long, default_value = DEFAULT_FEED)]
        feed: String,
        #[arg(long)]
        device: String,
    },
    Preview {
        #[arg(long, default_value_t = PreviewSettings::default().width)]
        width: u32,
        #[arg(long, default_value_t = PreviewSettings::default().height)]
        height: u32,
        #[arg(long, default_value_t = PreviewSettings::default().fps)]
        fps: u32,
    },
    Overlay {
        name: String,
        #[arg(long, default_value_t = false)]
        off: bool,
    },
    /// Send an arbitrary JSON document.
    Send {
        #[arg(long)]
        data: String,
    },
}

#[derive(Args, Debug)]
struct RecordCommand {
    #[command(subcommand)]
    command: RecordSubcommand,
}

#[derive(Subcommand, Debug)]
enum RecordSubcommand {
    Start {
        #[arg(long, default_value = DEFAULT_FEED)]
        feed: String,
        #[arg(long, default_value = DEFAULT_DEVICE)]
        device: String,
        #[arg(long, default_value = DEFAULT_CODEC)]
        codec: String,
        #[arg(long)]
        filename: Option<String>,
        #[arg(long)]
        timecode: Option<String>,
    },
    Stop {
        #[arg(long, default_value = DEFAULT_FEED)]
        feed: String,
    },
}

#[derive(Args, Debug)]
struct ApiCommand {
    #[command(subcommand)]
    command: ApiSubcommand,
}

#[derive(Subcommand, Debug)]
enum ApiSubcommand {
    /// GET a dashboard path through the rewrite table.
    Get { path: String },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = DashboardConfig::from_values(
        cli.ws_url.as_deref(),
        cli.api_base_url.as_deref(),
        cli.open_timeout_secs.as_deref(),
    )?;

    match cli.command {
        Command::Dashboard { focus } => run_dashboard(focus),
        Command::Camera(args) => run_camera(&config, args).await,
        Command::Api(api) => run_api(&config, api).await,
        Command::Ping => run_ping(&config).await,
    }
}

fn run_dashboard(focus: Option<String>) -> Result<(), CliError> {
    let mut engine = LayoutEngine::new(builtin_registry()?);
    if let Some(focus) = focus {
        engine.set_focused_tool(focus);
    }
    print!("{}", shell::render_dashboard(&engine));
    Ok(())
}

enum Outgoing {
    Nothing,
    Command(frames::Command),
    Raw(Value),
}

fn outgoing(command: CameraSubcommand) -> Result<Outgoing, CliError> {
    let command = match command {
        CameraSubcommand::Watch => return Ok(Outgoing::Nothing),
        CameraSubcommand::Send { data } => return Ok(Outgoing::Raw(serde_json::from_str(&data)?)),
        CameraSubcommand::ListDevices => frames::Command::ListDevices,
        CameraSubcommand::Capture { device } => frames::Command::capture_frame(device),
        CameraSubcommand::Record(record) => match record.command {
            RecordSubcommand::Start { feed, device, codec, filename, timecode } => {
                frames::Command::StartRecord { feed, device, codec, filename, timecode }
            }
            RecordSubcommand::Stop { feed } => frames::Command::stop_record(feed),
        },
        CameraSubcommand::SelectStream { feed, device } => frames::Command::SelectStream { feed, device },
        CameraSubcommand::Preview { width, height, fps } => {
            frames::Command::SetPreview(PreviewSettings { width, height, fps })
        }
        CameraSubcommand::Overlay { name, off } => frames::Command::ToggleOverlay { overlay: name, enabled: !off },
    };
    Ok(Outgoing::Command(command))
}

async fn run_camera(config: &DashboardConfig, args: CameraArgs) -> Result<(), CliError> {
    let outgoing = outgoing(args.command)?;

    if args.dry_run {
        match &outgoing {
            Outgoing::Nothing => {}
            Outgoing::Command(command) => println!("{}", frames::encode_command(command)?),
            Outgoing::Raw(value) => println!("{value}"),
        }
        return Ok(());
    }

    let ctx = ChannelContext::new();
    let router = CameraRouter::new();
    let provider = ChannelProvider::mount(&ctx, &config.ws_url, vec![Arc::new(router.clone()) as Arc<dyn ChannelObserver>])?;

    if let Err(state) = provider.wait_open(config.open_timeout).await {
        provider.unmount().await;
        return Err(CliError::NotOpen(state));
    }

    let sender = ctx.use_channel()?;
    match &outgoing {
        Outgoing::Nothing => {}
        Outgoing::Command(command) => {
            tracing::info!(action = command.action(), "sending camera command");
            sender.send_json(command)?;
        }
        Outgoing::Raw(value) => sender.send_json(value)?,
    }

    let listen = async {
        if args.listen_secs == 0 {
            std::future::pending::<()>().await;
        }
        tokio::time::sleep(Duration::from_secs(args.listen_secs)).await;
    };
    tokio::select! {
        () = listen => {}
        () = provider.closed() => tracing::warn!("camera channel closed by the server"),
        _ = tokio::signal::ctrl_c() => {}
    }

    provider.unmount().await;
    print!("{}", shell::render_camera_view(&router.snapshot()));
    Ok(())
}

async fn run_api(config: &DashboardConfig, api: ApiCommand) -> Result<(), CliError> {
    let client = ApiClient::new(&config.api_base_url);
    match api.command {
        ApiSubcommand::Get { path } => {
            let json = client.get_json(&path).await?;
            println!("{}", serde_json::to_string_pretty(&json)?);
            Ok(())
        }
    }
}

async fn run_ping(config: &DashboardConfig) -> Result<(), CliError> {
    ApiClient::new(&config.api_base_url).ping().await?;
    println!("ok");
    Ok(())
}
