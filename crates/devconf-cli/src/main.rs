//! Command-line interface for device attribute configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use devconf_core::config::{self, ApiConfig};
use devconf_core::{
    add_gateway, delete_gateway, list_devices, list_gateways, read_device, ApiClient,
    AttributeOption, CaseFormat, Collaborators, ConfigDraft, ConfigureSession, DeviceKind,
    FunctionCatalogSource,
};

/// devconf - Reconcile device attributes and assign processing functions.
#[derive(Parser, Debug)]
#[command(name = "devconf")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to perform.
    #[command(subcommand)]
    command: Command,

    /// Backend base URL (overrides DEVCONF_API_* variables).
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Request timeout in seconds (overrides DEVCONF_HTTP_TIMEOUT_SECS).
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// Print machine-readable JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// List configured devices.
    List {
        /// Only devices of this type (zigbee, lora).
        #[arg(short = 't', long = "type")]
        kind: Option<DeviceKind>,
    },
    /// Show live readings of a device.
    Read {
        device_id: String,
        /// Device type (zigbee, lora).
        #[arg(short = 't', long = "type")]
        kind: DeviceKind,
    },
    /// Show the merged configuration draft of a device.
    Show {
        device_id: String,
        /// Device type (zigbee, lora).
        #[arg(short = 't', long = "type")]
        kind: DeviceKind,
    },
    /// List the processing-function catalog.
    Functions,
    /// Rank processing functions for a device's attributes.
    Recommend {
        device_id: String,
        /// Device type (zigbee, lora).
        #[arg(short = 't', long = "type")]
        kind: DeviceKind,
        /// Only this attribute.
        #[arg(short, long)]
        attribute: Option<String>,
    },
    /// Edit a device configuration and save it.
    Edit {
        device_id: String,
        /// Device type (zigbee, lora).
        #[arg(short = 't', long = "type")]
        kind: DeviceKind,
        /// Clear every option, rename and function first.
        #[arg(long)]
        reset: bool,
        /// Set every option from the attribute's type.
        #[arg(long)]
        type_defaults: bool,
        /// Ask the suggestion service for renames.
        #[arg(long)]
        suggest: bool,
        /// Naming convention for suggestions (camel, snake, pascal, kebab).
        #[arg(long, default_value = "camel")]
        case: CaseFormat,
        /// Set an option: ATTRIBUTE=tag|field|ignore.
        #[arg(long = "option", value_name = "ATTRIBUTE=OPTION", value_parser = parse_assignment)]
        options: Vec<(String, String)>,
        /// Set a custom label: ATTRIBUTE=LABEL (empty label clears it).
        #[arg(long = "rename", value_name = "ATTRIBUTE=LABEL", value_parser = parse_assignment)]
        renames: Vec<(String, String)>,
        /// Assign a processing function: ATTRIBUTE=FUNCTION (empty for none).
        #[arg(long = "proc", value_name = "ATTRIBUTE=FUNCTION", value_parser = parse_assignment)]
        procs: Vec<(String, String)>,
        /// New device name.
        #[arg(long)]
        name: Option<String>,
        /// Print the result without saving.
        #[arg(long)]
        dry_run: bool,
        /// Save even though the stored configuration could not be loaded.
        #[arg(long)]
        force: bool,
    },
    /// Delete a device and its saved configuration.
    Delete {
        device_id: String,
        /// Device type (zigbee, lora).
        #[arg(short = 't', long = "type")]
        kind: DeviceKind,
    },
    /// Manage LoRa gateways.
    Gateway {
        #[command(subcommand)]
        action: GatewayCommand,
    },
}

/// Gateway actions.
#[derive(Subcommand, Debug)]
enum GatewayCommand {
    /// List registered gateways.
    List,
    /// Register a gateway.
    Add {
        /// Gateway EUI, 16 hex digits (separators and 0x are accepted).
        gateway_id: String,
        /// Display name.
        #[arg(long)]
        name: String,
    },
    /// Remove a gateway.
    Delete {
        /// Gateway EUI as listed.
        gateway_id: String,
    },
}

/// Parse `KEY=VALUE`; the value may be empty.
fn parse_assignment(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected ATTRIBUTE=VALUE, got '{}'", s)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut api_config = match &args.api_base {
        Some(base) => ApiConfig::new(base.clone()),
        None => ApiConfig::from_env(),
    };
    if let Some(secs) = args.timeout {
        api_config = api_config.with_timeout(Duration::from_secs(secs));
    }
    let client = Arc::new(ApiClient::new(api_config)?);
    tracing::debug!(base_url = %client.config().base_url(), "Using backend");

    match args.command {
        Command::List { kind } => run_list(&client, kind, args.json).await,
        Command::Read { device_id, kind } => run_read(&client, &device_id, kind).await,
        Command::Show { device_id, kind } => {
            let session = open_session(&client, &device_id, kind).await?;
            print_draft(session.draft(), args.json)
        }
        Command::Functions => run_functions(&client, args.json).await,
        Command::Recommend {
            device_id,
            kind,
            attribute,
        } => {
            let session = open_session(&client, &device_id, kind).await?;
            print_recommendations(&session, attribute.as_deref(), args.json)
        }
        Command::Edit {
            device_id,
            kind,
            reset,
            type_defaults,
            suggest,
            case,
            options,
            renames,
            procs,
            name,
            dry_run,
            force,
        } => {
            let mut session = open_session(&client, &device_id, kind).await?;
            if session.saved_config_unknown() && !dry_run && !force {
                bail!(
                    "The stored configuration of {} could not be loaded; saving would replace it \
                     with an uncustomized draft. Retry, use --dry-run, or pass --force",
                    device_id
                );
            }
            if reset {
                session.reset_all();
            }
            if type_defaults {
                session.apply_type_defaults();
            }
            if suggest {
                session.set_case_format(case);
                session.suggest_names().await?;
            }
            for (attribute, option) in options {
                let option: AttributeOption = option.parse().map_err(anyhow::Error::msg)?;
                session.set_option(&attribute, option);
            }
            for (attribute, label) in renames {
                session.set_rename(&attribute, label);
            }
            for (attribute, function) in procs {
                let function = (!function.trim().is_empty()).then_some(function);
                session.set_processing_function(&attribute, function);
            }
            if let Some(name) = name {
                session.set_device_name(&name)?;
            }
            if !dry_run {
                session.save().await?;
                eprintln!("Saved configuration for {}", device_id);
            }
            print_draft(session.draft(), args.json)
        }
        Command::Delete { device_id, kind } => {
            let mut session = open_session(&client, &device_id, kind).await?;
            session.delete_device().await?;
            println!("Deleted device {}", device_id);
            Ok(())
        }
        Command::Gateway { action } => run_gateway(&client, action, args.json).await,
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "devconf=debug" } else { "devconf=info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    if config::log_json() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

async fn open_session(
    client: &Arc<ApiClient>,
    device_id: &str,
    kind: DeviceKind,
) -> Result<ConfigureSession> {
    let mut session = ConfigureSession::new(Collaborators::shared(client.clone()));
    session
        .init(device_id, kind)
        .await
        .with_context(|| format!("Failed to load configuration for {}", device_id))?;
    Ok(session)
}

async fn run_list(client: &ApiClient, kind: Option<DeviceKind>, json: bool) -> Result<()> {
    let devices = list_devices(client, kind).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&devices)?);
        return Ok(());
    }
    if devices.is_empty() {
        println!("No configured devices.");
        return Ok(());
    }
    println!("{:<24} {:<8} {:<28} CONFIG", "DEVICE", "TYPE", "NAME");
    for device in devices {
        let kind = device.kind.map(|k| k.as_str()).unwrap_or("?");
        println!(
            "{:<24} {:<8} {:<28} {}",
            device.id, kind, device.name, device.config_id
        );
    }
    Ok(())
}

async fn run_gateway(client: &ApiClient, action: GatewayCommand, json: bool) -> Result<()> {
    match action {
        GatewayCommand::List => {
            let gateways = list_gateways(client).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&gateways)?);
            } else if gateways.is_empty() {
                println!("No gateways registered.");
            } else {
                for gateway in gateways {
                    println!("{}", gateway.gateway_id);
                }
            }
        }
        GatewayCommand::Add { gateway_id, name } => {
            let gateway = add_gateway(client, &gateway_id, &name).await?;
            println!("Added gateway {}", gateway.gateway_id);
        }
        GatewayCommand::Delete { gateway_id } => {
            delete_gateway(client, &gateway_id).await?;
            println!("Deleted gateway {}", gateway_id);
        }
    }
    Ok(())
}

async fn run_read(client: &ApiClient, device_id: &str, kind: DeviceKind) -> Result<()> {
    let readings = read_device(client, device_id, kind).await?;
    println!("{}", serde_json::to_string_pretty(&readings)?);
    Ok(())
}

async fn run_functions(client: &ApiClient, json: bool) -> Result<()> {
    let functions = client.fetch_functions().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&functions)?);
        return Ok(());
    }
    println!("{:<20} {:<10} {:<28} TAGS", "NAME", "VALUE", "DISPLAY NAME");
    for function in functions {
        let value_type = serde_json::to_value(function.value_type)?;
        println!(
            "{:<20} {:<10} {:<28} {}",
            function.name,
            value_type.as_str().unwrap_or_default(),
            function.display_name,
            function.tags.join(", ")
        );
    }
    Ok(())
}

fn print_draft(draft: &ConfigDraft, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(draft)?);
        return Ok(());
    }
    println!(
        "{} ({} {}){}",
        draft.name,
        draft.device_type,
        draft.device_id,
        draft
            .id
            .as_deref()
            .map(|id| format!(" config {}", id))
            .unwrap_or_default()
    );
    if draft.attributes().is_empty() {
        println!("No attributes available for device.");
        return Ok(());
    }
    println!(
        "{:<24} {:<16} {:<10} {:<7} {:<20} PROC",
        "ATTRIBUTE", "VALUE", "TYPE", "OPTION", "RENAME"
    );
    for attr in draft.attributes() {
        let value = attr
            .value
            .clone()
            .map(|v| serde_json::Value::from(v).to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<24} {:<16} {:<10} {:<7} {:<20} {}",
            attr.name,
            value,
            attr.attr_type.map(|t| t.as_str()).unwrap_or("-"),
            attr.option.as_str(),
            attr.rename.as_deref().unwrap_or("-"),
            attr.proc.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

fn print_recommendations(
    session: &ConfigureSession,
    attribute: Option<&str>,
    json: bool,
) -> Result<()> {
    let ranked = match attribute {
        Some(name) => {
            let attr = session
                .draft()
                .attribute(name)
                .with_context(|| format!("Attribute not found: {}", name))?;
            vec![(attr, session.recommendations_for(name)?)]
        }
        None => session.recommendations(),
    };

    if json {
        let body: Vec<_> = ranked
            .iter()
            .map(|(attr, recs)| {
                serde_json::json!({
                    "attribute": attr.name,
                    "options": recs
                        .iter()
                        .map(|r| serde_json::json!({
                            "value": r.function.name,
                            "label": r.label(),
                            "weight": r.ranking.weight,
                        }))
                        .collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    for (attr, recs) in ranked {
        let attr_type = attr.attr_type.map(|t| t.as_str()).unwrap_or("-");
        println!("{} [{}]", attr.display_name(), attr_type);
        for rec in recs {
            let marker = if attr.proc.as_deref() == Some(rec.function.name.as_str()) {
                "*"
            } else {
                " "
            };
            println!("  {} {}", marker, rec.label());
        }
    }
    Ok(())
}
