//! Command-line surface for `devlink`.

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use devlink::application::analytics::{ANALYTICS_WINDOWS, DEFAULT_ANALYTICS_DAYS};
use devlink::application::history::DEFAULT_PAGE_SIZE;
use devlink::config::ClientOverrides;
use devlink::domain::search::SearchFilters;

#[derive(Parser, Debug)]
#[command(name = "devlink", version, about = "DevLink outreach client", long_about = None)]
pub struct Cli {
    /// Explicit configuration file layered above `config/default` and `devlink`.
    #[arg(long = "config-file", env = "DEVLINK_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ClientOverrides,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in, sign up, sign out and session status
    Auth(AuthArgs),
    /// Account details, avatar, password and usage stats
    Profile(ProfileArgs),
    /// Business discovery, directory and bulk campaign creation
    Businesses(BusinessesArgs),
    /// Send email and browse the send history
    Email(EmailArgs),
    /// Email template management
    Templates(TemplatesArgs),
    /// Email campaign management
    Campaigns(CampaignsArgs),
    /// Sending analytics over a day window
    Analytics(AnalyticsArgs),
    /// AI email generation
    Ai(AiArgs),
    /// Gmail sending integration
    Gmail(GmailArgs),
}

#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub action: AuthCmd,
}

#[derive(Subcommand, Debug)]
pub enum AuthCmd {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        username: String,
        /// Password from env (flag disabled to keep it out of shell history)
        #[arg(hide = true, env = "DEVLINK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// File containing the password
        #[arg(long)]
        password_file: Option<PathBuf>,
    },
    /// Create an account, then log in
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(hide = true, env = "DEVLINK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        #[arg(long)]
        password_file: Option<PathBuf>,
    },
    /// Forget the stored session token
    Logout,
    /// Validate the stored session and show the current user
    Whoami,
}

#[derive(Parser, Debug)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileCmd,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCmd {
    /// Show the full profile
    Show,
    /// Update account fields and/or upload a work image
    Update {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        /// Image sent as the `work_image` upload
        #[arg(long, value_name = "PATH")]
        work_image: Option<PathBuf>,
    },
    /// Change the account password
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
    /// Usage statistics
    Stats,
}

#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    /// Category slug, see `businesses categories`
    #[arg(long)]
    pub category: Option<String>,
    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,
}

impl From<FilterArgs> for SearchFilters {
    fn from(args: FilterArgs) -> Self {
        Self {
            country: args.country.unwrap_or_default(),
            city: args.city.unwrap_or_default(),
            category: args.category.unwrap_or_default(),
            search: args.search.unwrap_or_default(),
        }
    }
}

#[derive(Parser, Debug)]
pub struct BusinessesArgs {
    #[command(subcommand)]
    pub action: BusinessesCmd,
}

#[derive(Subcommand, Debug)]
pub enum BusinessesCmd {
    /// Discover businesses; optionally turn a selection into a campaign
    Search {
        #[command(flatten)]
        filters: FilterArgs,
        /// Toggle these result ids into the selection
        #[arg(long = "select", value_name = "ID")]
        select: Vec<i64>,
        /// Toggle every result (clears when all are already selected)
        #[arg(long, default_value_t = false)]
        select_all: bool,
        /// Create a draft campaign from the selection
        #[arg(long, default_value_t = false)]
        create_campaign: bool,
        #[arg(long)]
        campaign_name: Option<String>,
    },
    /// List saved businesses
    List {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Add a business to the directory
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        country: String,
        #[arg(long, default_value = "")]
        city: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        website: String,
        #[arg(long, default_value = "")]
        address: String,
    },
    /// Category slugs accepted by the directory
    Categories,
}

#[derive(Parser, Debug)]
pub struct EmailArgs {
    #[command(subcommand)]
    pub action: EmailCmd,
}

#[derive(Subcommand, Debug)]
pub enum EmailCmd {
    /// Send one email to comma separated recipients
    Send {
        /// Recipients, e.g. "a@x.com, b@y.com"
        #[arg(long)]
        to: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        body: Option<String>,
        #[arg(long)]
        body_file: Option<PathBuf>,
    },
    /// Page through sent emails
    History {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u32,
    },
}

#[derive(Parser, Debug)]
pub struct TemplatesArgs {
    #[command(subcommand)]
    pub action: TemplatesCmd,
}

#[derive(Subcommand, Debug)]
pub enum TemplatesCmd {
    /// List templates
    List,
    /// Create a template
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        body: Option<String>,
        #[arg(long)]
        body_file: Option<PathBuf>,
        #[arg(long, default_value = "general")]
        category: String,
        #[arg(long, default_value_t = false)]
        default: bool,
    },
    /// Update a template; omitted fields keep their current value
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        body: Option<String>,
        #[arg(long)]
        body_file: Option<PathBuf>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        default: Option<bool>,
    },
    /// Delete a template
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// Print a template's subject and body for use in a message
    Use {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Parser, Debug)]
pub struct CampaignsArgs {
    #[command(subcommand)]
    pub action: CampaignsCmd,
}

#[derive(Subcommand, Debug)]
pub enum CampaignsCmd {
    /// List campaigns with progress
    List,
    /// Create a draft campaign
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        body: Option<String>,
        #[arg(long)]
        body_file: Option<PathBuf>,
        /// Recipient address, repeatable
        #[arg(long = "recipient", value_name = "EMAIL")]
        recipients: Vec<String>,
        #[arg(long)]
        template: Option<i64>,
    },
    /// Update a draft campaign; omitted fields keep their current value
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        body: Option<String>,
        #[arg(long)]
        body_file: Option<PathBuf>,
    },
    /// Delete a draft campaign
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// Start sending a draft campaign
    Send {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Parser, Debug)]
pub struct AnalyticsArgs {
    /// Day window (7, 30 or 90)
    #[arg(long, default_value_t = DEFAULT_ANALYTICS_DAYS, value_parser = parse_window)]
    pub days: u32,
    /// Recompute today's figures before loading
    #[arg(long, default_value_t = false)]
    pub refresh: bool,
}

fn parse_window(value: &str) -> Result<u32, String> {
    let days = value
        .parse::<u32>()
        .map_err(|err| format!("invalid day count: {err}"))?;
    if ANALYTICS_WINDOWS.contains(&days) {
        Ok(days)
    } else {
        Err(format!("days must be one of {ANALYTICS_WINDOWS:?}"))
    }
}

#[derive(Parser, Debug)]
pub struct AiArgs {
    #[command(subcommand)]
    pub action: AiCmd,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DeveloperArgs {
    #[arg(long)]
    pub developer_name: Option<String>,
    #[arg(long)]
    pub developer_services: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum AiCmd {
    /// Draft a personalised email for one business
    Email {
        #[arg(long)]
        business_name: String,
        #[arg(long)]
        business_category: String,
        #[command(flatten)]
        developer: DeveloperArgs,
        /// Send the draft right away to these comma separated recipients
        #[arg(long)]
        send_to: Option<String>,
    },
    /// Draft a generic email for a whole category
    BulkEmail {
        #[arg(long)]
        category: String,
        #[command(flatten)]
        developer: DeveloperArgs,
    },
}

#[derive(Parser, Debug)]
pub struct GmailArgs {
    #[command(subcommand)]
    pub action: GmailCmd,
}

#[derive(Subcommand, Debug)]
pub enum GmailCmd {
    /// Connection status
    Status,
    /// Print the authorization URL to open in a browser
    Connect,
    /// Revoke the stored Gmail credentials
    Disconnect,
    /// Send a test message through Gmail
    Test {
        #[arg(long)]
        to: Option<String>,
    },
}
