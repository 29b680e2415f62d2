use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::debug;
use security_lake_tools_core::{
    render_listing, validate_code, ProvisionOptions, ProvisionRequest, SecurityLakeToolsService,
    Session, SessionOptions, ToolError,
};
use std::io::{self, Write};
use std::process::ExitCode;

/// Region used by create-source when neither the flag nor the profile names one.
const DEFAULT_CREATE_REGION: &str = "us-east-1";

#[derive(Parser)]
#[command(name = "security-lake-tools")]
#[command(about = "Inspect Amazon Security Lake and register OCSF custom log sources", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show data lakes, recent exceptions, log sources and subscribers for a region
    Status {
        /// AWS region to query
        #[arg(long)]
        region: Option<String>,

        /// AWS profile to use
        #[arg(long, env = "AWS_PROFILE")]
        profile: Option<String>,
    },

    /// Create a custom log source for an OCSF event class
    CreateSource(CreateSourceArgs),
}

#[derive(Args)]
struct CreateSourceArgs {
    /// OCSF class UID, e.g. 1001 for FILE_ACTIVITY
    #[arg(required_unless_present = "list")]
    class_uid: Option<String>,

    /// AWS region (defaults to the profile region, then us-east-1)
    #[arg(long)]
    region: Option<String>,

    /// AWS account ID of the log provider (detected from the caller identity when omitted)
    #[arg(long)]
    account_id: Option<String>,

    /// External ID the provider presents when assuming the crawler role
    #[arg(long, required_unless_present = "list")]
    external_id: Option<String>,

    /// Glue crawler role ARN (defaults to AWSGlueServiceRole-SecurityLake in the account)
    #[arg(long, visible_alias = "glue-role-arn")]
    role_arn: Option<String>,

    /// AWS profile to use
    #[arg(long, env = "AWS_PROFILE")]
    profile: Option<String>,

    /// Do not check whether the Glue role exists
    #[arg(long)]
    skip_role_check: bool,

    /// Fail instead of creating the Glue role when it is missing
    #[arg(long)]
    no_create_role: bool,

    /// List the supported OCSF class UIDs and exit
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Status { region, profile } => status(region, profile).await,
        Commands::CreateSource(args) => create_source(args).await,
    }
}

async fn status(region: Option<String>, profile: Option<String>) -> Result<()> {
    let session = Session::load(&SessionOptions {
        region,
        profile,
        fallback_region: None,
    })
    .await?;
    let service = SecurityLakeToolsService::new(&session);

    let mut out = io::stdout();
    service.report(&mut out).await?;
    out.flush()?;
    Ok(())
}

async fn create_source(args: CreateSourceArgs) -> Result<()> {
    let mut out = io::stdout();
    if args.list {
        write!(out, "{}", render_listing())?;
        return Ok(());
    }

    // clap enforces both when --list is absent
    let class_uid = args.class_uid.unwrap_or_default();
    let external_id = args.external_id.unwrap_or_default();

    validate_code(&class_uid)?;

    let session = Session::load(&SessionOptions {
        region: args.region,
        profile: args.profile,
        fallback_region: Some(DEFAULT_CREATE_REGION.to_string()),
    })
    .await?;
    debug!("Using region {}", session.region);
    let service = SecurityLakeToolsService::new(&session);

    let request = ProvisionRequest {
        class_uid,
        region: session.region.clone(),
        account_id: args.account_id,
        external_id,
        role_arn: args.role_arn,
    };
    let options = ProvisionOptions {
        skip_role_check: args.skip_role_check,
        create_role_if_missing: !args.no_create_role,
        ..ProvisionOptions::default()
    };

    service.provision(&request, &options, &mut out).await?;
    out.flush()?;
    Ok(())
}

fn report_error(err: &anyhow::Error) {
    match err.downcast_ref::<ToolError>() {
        // the provisioner has already printed the diagnostic
        Some(ToolError::Registration(_)) => {}
        Some(tool_err) => {
            eprintln!("\u{2717} {tool_err}");
            if let Some(hint) = tool_err.remediation() {
                eprintln!("\n{hint}");
            }
        }
        None => eprintln!("\u{2717} Error: {err:#}"),
    }
}
