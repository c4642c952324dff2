//! Command-line caller for the framekit core.
//!
//! # Responsibility
//! - Whitelist arguments per command and hand them to core services.
//! - Render results and errors as JSON on stdout.

use clap::{Args, Parser, Subcommand};
use framekit_core::db::open_db;
use framekit_core::{
    default_log_level, init_logging, CircleFilter, CircleParams, CirclePatch, CircleService,
    FrameParams, FramePatch, FrameService, ServiceError, SqliteRegionStore,
};
use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "framekit")]
#[command(about = "Manage frames and the circles placed inside them", long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "FRAMEKIT_DB", default_value = "framekit.sqlite3", global = true)]
    db: PathBuf,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "FRAMEKIT_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Directory for rolling log files; logging stays off without it
    #[arg(long, env = "FRAMEKIT_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Frame operations
    #[command(subcommand)]
    Frame(FrameCommand),
    /// Circle operations
    #[command(subcommand)]
    Circle(CircleCommand),
    /// Print the core version
    Version,
}

#[derive(Subcommand)]
enum FrameCommand {
    /// Create a frame
    Create(FrameFields),
    /// Change some attributes of a frame
    Update {
        id: Uuid,
        #[command(flatten)]
        fields: FrameFields,
    },
    /// Delete a frame that owns no circles
    Delete { id: Uuid },
    /// Show a frame with its circle projections
    Show { id: Uuid },
    /// List every frame
    List,
}

#[derive(Subcommand)]
enum CircleCommand {
    /// Place a circle inside a frame
    Create {
        #[arg(long)]
        frame_id: Uuid,
        #[command(flatten)]
        fields: CircleFields,
    },
    /// Change the geometry of a circle
    Update {
        id: Uuid,
        #[command(flatten)]
        fields: CircleFields,
    },
    /// Delete a circle
    Delete { id: Uuid },
    /// Show a circle
    Show { id: Uuid },
    /// List circles, optionally by frame and/or inside an area
    List(CircleQuery),
}

#[derive(Args)]
struct FrameFields {
    #[arg(long, allow_hyphen_values = true)]
    center_x: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    center_y: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    width: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    height: Option<String>,
}

#[derive(Args)]
struct CircleFields {
    #[arg(long, allow_hyphen_values = true)]
    center_x: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    center_y: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    radius: Option<String>,
}

#[derive(Args)]
struct CircleQuery {
    #[arg(long)]
    frame_id: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    center_x: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    center_y: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    radius: Option<String>,
}

impl CircleQuery {
    fn into_filter(self) -> Result<CircleFilter, ServiceError> {
        let pairs = [
            ("frame_id", self.frame_id),
            ("center_x", self.center_x),
            ("center_y", self.center_y),
            ("radius", self.radius),
        ];
        let present = pairs
            .into_iter()
            .filter_map(|(key, value)| value.map(|value| (key, value)));
        Ok(CircleFilter::from_pairs(present)?)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

impl ErrorBody {
    fn from_service(err: &ServiceError) -> Self {
        let (error, message, errors) = match err {
            ServiceError::Rejected(rejection) => {
                ("Record Invalid", rejection.message(), rejection.messages())
            }
            ServiceError::FrameNotFound(_) | ServiceError::CircleNotFound(_) => {
                ("Record Not Found", err.to_string(), Vec::new())
            }
            ServiceError::FrameInUse(_) => ("Deletion Failed", err.to_string(), Vec::new()),
            ServiceError::Usage(_) => ("Invalid Query", err.to_string(), Vec::new()),
            ServiceError::Repo(_) => ("Storage Error", err.to_string(), Vec::new()),
        };
        Self {
            error,
            message,
            errors,
        }
    }

    fn storage(message: String) -> Self {
        Self {
            error: "Storage Error",
            message,
            errors: Vec::new(),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        if let Err(err) = start_logging(cli.log_level.as_deref(), log_dir) {
            eprintln!("Error: {err}");
            process::exit(2);
        }
    }

    if let Command::Version = cli.command {
        println!("framekit {}", framekit_core::core_version());
        return;
    }

    let conn = match open_db(&cli.db) {
        Ok(conn) => conn,
        Err(err) => fail(&ErrorBody::storage(err.to_string())),
    };
    let store = match SqliteRegionStore::try_new(&conn) {
        Ok(store) => store,
        Err(err) => fail(&ErrorBody::storage(err.to_string())),
    };

    match run(store, cli.command) {
        Ok(output) => println!("{output}"),
        Err(err) => fail(&ErrorBody::from_service(&err)),
    }
}

fn start_logging(level: Option<&str>, log_dir: &Path) -> Result<(), String> {
    let log_dir = if log_dir.is_absolute() {
        log_dir.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|err| err.to_string())?
            .join(log_dir)
    };
    let level = level.unwrap_or_else(|| default_log_level());
    init_logging(level, &log_dir.to_string_lossy()).map_err(|err| err.to_string())
}

fn run(store: SqliteRegionStore<'_>, command: Command) -> Result<String, ServiceError> {
    let frames = FrameService::new(store);
    let circles = CircleService::new(store);

    let output = match command {
        Command::Frame(command) => match command {
            FrameCommand::Create(fields) => render(&frames.admit_frame(&FrameParams {
                center_x: fields.center_x,
                center_y: fields.center_y,
                width: fields.width,
                height: fields.height,
            })?),
            FrameCommand::Update { id, fields } => render(&frames.update_frame(
                id,
                &FramePatch {
                    center_x: fields.center_x,
                    center_y: fields.center_y,
                    width: fields.width,
                    height: fields.height,
                },
            )?),
            FrameCommand::Delete { id } => {
                frames.delete_frame(id)?;
                render(&serde_json::json!({ "deleted": id }))
            }
            FrameCommand::Show { id } => render(&frames.get_frame(id)?),
            FrameCommand::List => render(&frames.list_frames()?),
        },
        Command::Circle(command) => match command {
            CircleCommand::Create { frame_id, fields } => {
                render(&circles.admit_circle_create(
                    frame_id,
                    &CircleParams {
                        center_x: fields.center_x,
                        center_y: fields.center_y,
                        radius: fields.radius,
                    },
                )?)
            }
            CircleCommand::Update { id, fields } => render(&circles.admit_circle_update(
                id,
                &CirclePatch {
                    center_x: fields.center_x,
                    center_y: fields.center_y,
                    radius: fields.radius,
                },
            )?),
            CircleCommand::Delete { id } => {
                circles.delete_circle(id)?;
                render(&serde_json::json!({ "deleted": id }))
            }
            CircleCommand::Show { id } => render(&circles.get_circle(id)?),
            CircleCommand::List(query) => {
                let filter = query.into_filter()?;
                render(&circles.filter_circles(&filter)?)
            }
        },
        Command::Version => framekit_core::core_version().to_string(),
    };

    info!("event=cli_command module=cli status=ok");
    Ok(output)
}

fn render<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|err| err.to_string())
}

fn fail(body: &ErrorBody) -> ! {
    println!("{}", render(body));
    process::exit(1);
}
