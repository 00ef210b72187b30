use std::{io, process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use client_core::{AdminApi, AdminClient, ClientConfig, PageSize, TeacherForm};
use shared::domain::Degree;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod render;

use config::load_settings;

#[derive(Parser, Debug)]
#[command(name = "console", about = "Admin console for teachers and their positions")]
struct Cli {
    /// Backend base URL; overrides console.toml and API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(subcommand)]
    Positions(PositionsCommand),
    #[command(subcommand)]
    Teachers(TeachersCommand),
}

#[derive(Subcommand, Debug)]
enum PositionsCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value = "")]
        search: String,
    },
    Create {
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        inactive: bool,
    },
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct PageArgs {
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// 10, 20, 50, 100 or all.
    #[arg(long)]
    limit: Option<PageSize>,
    #[arg(long, default_value = "")]
    search: String,
}

#[derive(Subcommand, Debug)]
enum TeachersCommand {
    List(PageArgs),
    Create {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long)]
        inactive: bool,
        /// bachelor, master or doctor.
        #[arg(long)]
        degree: Option<Degree>,
        #[arg(long, default_value = "")]
        major: String,
        /// Position id; repeat for several.
        #[arg(long = "position")]
        positions: Vec<String>,
    },
    Delete {
        id: String,
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        yes: bool,
    },
    PositionOptions {
        #[arg(long, default_value = "")]
        filter: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings().context("failed to load console settings")?;
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }

    let client = AdminClient::new(ClientConfig::new(&settings.api_url)?)?;
    info!("console: api_url={}", client.config().base_url());
    let api: Arc<dyn AdminApi> = Arc::new(client);

    let succeeded = match cli.command {
        Command::Positions(PositionsCommand::List { page, search }) => {
            commands::list_positions(api, page, search).await
        }
        Command::Positions(PositionsCommand::Create {
            code,
            name,
            description,
            inactive,
        }) => commands::create_position(api, code, name, description, !inactive).await,
        Command::Positions(PositionsCommand::Delete { id, yes }) => {
            commands::delete_position(api, id.into(), yes).await?
        }
        Command::Teachers(TeachersCommand::List(args)) => {
            let page_size = args.limit.unwrap_or(settings.page_size);
            commands::list_teachers(api, args.page, page_size, args.search).await
        }
        Command::Teachers(TeachersCommand::Create {
            username,
            email,
            phone,
            address,
            inactive,
            degree,
            major,
            positions,
        }) => {
            let form = TeacherForm {
                username,
                email,
                phone,
                address,
                active: !inactive,
                degree,
                major,
                position_ids: positions.into_iter().map(Into::into).collect(),
            };
            commands::create_teacher(api, settings.page_size, form).await
        }
        Command::Teachers(TeachersCommand::Delete { id, page, yes }) => {
            let page_size = page.limit.unwrap_or(settings.page_size);
            commands::delete_teacher(api, id.into(), page.page, page_size, page.search, yes).await?
        }
        Command::Teachers(TeachersCommand::PositionOptions { filter }) => {
            commands::position_options(api, &filter).await
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
