//! devlink: command-line client for the DevLink outreach backend.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod context;
mod handlers;
mod io;
mod print;


use std::process;

use clap::Parser;
use devlink::application::error::AppError;
use devlink::config;
use devlink::infra::error::InfraError;
use devlink::infra::telemetry;
use tracing::{Dispatch, Level, dispatcher, error};
use tracing_subscriber::fmt as tracing_fmt;

use args::{Cli, Commands};
use context::Ctx;
use handlers::{ai, analytics, auth, businesses, campaigns, email, gmail, profile, templates};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "command failed");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "command failed");
    });
}

async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let settings = config::load(cli.config_file.as_deref(), &cli.overrides)
        .map_err(|err| InfraError::configuration(err.to_string()))?;

    telemetry::init(&settings.logging)?;

    let mut ctx = Ctx::new(&settings)?;
    let outcome = dispatch(&mut ctx, cli.command).await;
    let finished = ctx.finish();

    // An expiry outranks the failure that revealed it.
    finished.and(outcome)
}

pub(crate) async fn dispatch(ctx: &mut Ctx, command: Commands) -> Result<(), AppError> {
    match command {
        Commands::Auth(cmd) => auth::handle(ctx, cmd.action).await,
        Commands::Profile(cmd) => profile::handle(ctx, cmd.action).await,
        Commands::Businesses(cmd) => businesses::handle(ctx, cmd.action).await,
        Commands::Email(cmd) => email::handle(ctx, cmd.action).await,
        Commands::Templates(cmd) => templates::handle(ctx, cmd.action).await,
        Commands::Campaigns(cmd) => campaigns::handle(ctx, cmd.action).await,
        Commands::Analytics(args) => analytics::handle(ctx, args).await,
        Commands::Ai(cmd) => ai::handle(ctx, cmd.action).await,
        Commands::Gmail(cmd) => gmail::handle(ctx, cmd.action).await,
    }
}
