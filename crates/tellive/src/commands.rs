//! Command handlers.
//!
//! Every device/sensor command refreshes once and then works through the
//! view layer, so what gets printed is exactly what the cache holds.

use std::time::Duration;

use dialoguer::{Input, Select};
use owo_colors::OwoColorize as _;
use serde::Serialize;
use tabled::Tabled;

use tellive_api::{Client, DataItem, Device, Methods, Sensor, TransportConfig, UNNAMED};
use tellive_config::Profile;

use crate::cli::{Command, ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Dispatch ────────────────────────────────────────────────────────

pub async fn dispatch(command: Command, global: &GlobalOpts) -> Result<(), CliError> {
    tracing::debug!(command = ?command, "dispatching command");
    match command {
        // Config commands don't need a remote session
        Command::Config(args) => config_handle(args),

        Command::User => {
            let client = build_client(global)?;
            user(&client, global).await
        }

        // Everything else works against a freshly refreshed cache
        other => {
            let client = build_client(global)?;
            client.refresh().await?;
            connected(other, &client, global).await
        }
    }
}

/// Build a `Client` from the config file, profile, and CLI overrides.
fn build_client(global: &GlobalOpts) -> Result<Client, CliError> {
    let config = tellive_config::load_config_or_default();
    let profile_name = tellive_config::active_profile_name(&config, global.profile.as_deref());
    let profile = tellive_config::profile(&config, &profile_name)?;
    let credentials = tellive_config::resolve_credentials(profile, &profile_name)?;

    let transport = global.timeout.map_or_else(
        || tellive_config::profile_transport(profile),
        |secs| TransportConfig::with_timeout(Duration::from_secs(secs)),
    );

    Client::with_transport(credentials, &transport).map_err(CliError::from)
}

async fn connected(
    command: Command,
    client: &Client,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match command {
        Command::Dump => {
            dump(client, global);
            Ok(())
        }
        Command::Devices => devices(client, global),
        Command::Sensors => sensors(client, global),
        Command::Data => data(client, global),

        Command::On(args) => {
            let device = device_by_id(client, &args.id)?;
            confirm(device.turn_on().await, &device, "turnOn", global)
        }
        Command::Off(args) => {
            let device = device_by_id(client, &args.id)?;
            confirm(device.turn_off().await, &device, "turnOff", global)
        }
        Command::Dim(args) => {
            let device = device_by_id(client, &args.id)?;
            confirm(device.dim(args.level).await, &device, "dim", global)
        }
        Command::Up(args) => {
            let device = device_by_id(client, &args.id)?;
            confirm(device.up().await, &device, "up", global)
        }
        Command::Down(args) => {
            let device = device_by_id(client, &args.id)?;
            confirm(device.down().await, &device, "down", global)
        }
        Command::Stop(args) => {
            let device = device_by_id(client, &args.id)?;
            confirm(device.stop().await, &device, "stop", global)
        }

        Command::User | Command::Config(_) => unreachable!("handled in dispatch"),
    }
}

fn device_by_id<'a>(client: &'a Client, id: &str) -> Result<Device<'a>, CliError> {
    client
        .devices()
        .find(|d| d.id().as_str() == id)
        .ok_or_else(|| CliError::NotFound {
            resource: "device",
            identifier: id.to_owned(),
            list_command: "devices",
        })
}

fn confirm(
    confirmed: bool,
    device: &Device<'_>,
    verb: &'static str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if confirmed {
        output::print_output(&device.to_string(), global.quiet);
        return Ok(());
    }
    Err(CliError::Rejected {
        verb,
        device: device.id().to_string(),
    })
}

// ── Dump (devices + sensors + data items) ───────────────────────────

fn dump(client: &Client, global: &GlobalOpts) {
    if global.quiet {
        return;
    }

    println!("{}", "Devices".bold());
    println!("-------");
    for device in client.devices() {
        println!("{device}");
    }

    println!();
    println!("{}", "Sensors".bold());
    println!("-------");
    for sensor in client.sensors() {
        println!("{sensor}");
    }

    println!();
    println!("{}", "Data items".bold());
    println!("----------");
    for item in client.sensor_data_items() {
        println!("{item}");
    }
}

// ── List commands ───────────────────────────────────────────────────

#[derive(Serialize, Tabled)]
struct DeviceRow {
    id: String,
    name: String,
    state: String,
    statevalue: String,
    methods: String,
}

fn device_row(device: &Device<'_>) -> Result<DeviceRow, CliError> {
    Ok(DeviceRow {
        id: device.id().to_string(),
        name: device.name()?.unwrap_or_else(|| UNNAMED.to_owned()),
        state: Methods::new(device.state()?).to_string(),
        statevalue: device.statevalue()?.unwrap_or_default(),
        methods: device.methods()?.to_string(),
    })
}

fn devices(client: &Client, global: &GlobalOpts) -> Result<(), CliError> {
    let rows = client
        .devices()
        .map(|d| device_row(&d))
        .collect::<Result<Vec<_>, _>>()?;
    let rendered = output::render_list(&global.output, &rows, |r| r.id.clone());
    output::print_output(&rendered, global.quiet);
    Ok(())
}

#[derive(Serialize, Tabled)]
struct SensorRow {
    id: String,
    name: String,
    data: String,
}

fn sensor_row(sensor: &Sensor<'_>) -> Result<SensorRow, CliError> {
    let data = sensor
        .data()?
        .iter()
        .map(|d| format!("{}={}", d.name, d.value))
        .collect::<Vec<_>>()
        .join(" ");
    Ok(SensorRow {
        id: sensor.id().to_string(),
        name: sensor.name()?.unwrap_or_else(|| UNNAMED.to_owned()),
        data,
    })
}

fn sensors(client: &Client, global: &GlobalOpts) -> Result<(), CliError> {
    let rows = client
        .sensors()
        .map(|s| sensor_row(&s))
        .collect::<Result<Vec<_>, _>>()?;
    let rendered = output::render_list(&global.output, &rows, |r| r.id.clone());
    output::print_output(&rendered, global.quiet);
    Ok(())
}

#[derive(Serialize, Tabled)]
struct DataRow {
    sensor: String,
    name: String,
    scale: String,
    value: String,
}

fn data_row(item: &DataItem<'_>) -> Result<DataRow, CliError> {
    Ok(DataRow {
        sensor: item.sensor_id().to_string(),
        name: item.name().to_owned(),
        scale: item.scale().to_owned(),
        value: item.value()?.unwrap_or_else(|| "-".to_owned()),
    })
}

fn data(client: &Client, global: &GlobalOpts) -> Result<(), CliError> {
    let items = client.sensor_data_items();
    let rows = items
        .iter()
        .map(data_row)
        .collect::<Result<Vec<_>, _>>()?;
    let rendered = output::render_list(&global.output, &rows, |r| {
        format!("{}/{}/{}", r.sensor, r.name, r.scale)
    });
    output::print_output(&rendered, global.quiet);
    Ok(())
}

// ── User ────────────────────────────────────────────────────────────

async fn user(client: &Client, global: &GlobalOpts) -> Result<(), CliError> {
    let profile = client
        .user_profile()
        .await?
        .ok_or_else(|| CliError::Connection {
            path: "user/profile".to_owned(),
        })?;

    let rendered = match global.output {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&profile).expect("serialization should not fail")
        }
        OutputFormat::Table | OutputFormat::Plain => {
            let name = [profile.firstname.as_deref(), profile.lastname.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
            match profile.email.as_deref() {
                Some(email) => format!("{name} <{email}>"),
                None => name,
            }
        }
    };
    output::print_output(&rendered, global.quiet);
    Ok(())
}

// ── Config ──────────────────────────────────────────────────────────

fn config_handle(args: ConfigArgs) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            println!("{}", tellive_config::config_path().display());
            Ok(())
        }
        ConfigCommand::Init => config_init(),
    }
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn store_keyring(profile_name: &str, suffix: &str, secret: &str) -> Result<(), CliError> {
    let entry = keyring::Entry::new("tellive", &format!("{profile_name}/{suffix}")).map_err(
        |e| CliError::Validation {
            field: "keyring".into(),
            reason: format!("failed to access keyring: {e}"),
        },
    )?;
    entry.set_password(secret).map_err(|e| CliError::Validation {
        field: "keyring".into(),
        reason: format!("failed to store secret in keyring: {e}"),
    })
}

fn config_init() -> Result<(), CliError> {
    let config_path = tellive_config::config_path();
    eprintln!("tellive — credential wizard");
    eprintln!("   Config path: {}\n", config_path.display());
    eprintln!("   The four values come from https://api.telldus.com/keys\n");

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let public_key: String = Input::new()
        .with_prompt("Public key")
        .interact_text()
        .map_err(prompt_err)?;

    let token: String = Input::new()
        .with_prompt("Token")
        .interact_text()
        .map_err(prompt_err)?;

    let private_key = rpassword::prompt_password("Private key: ").map_err(prompt_err)?;
    let token_secret = rpassword::prompt_password("Token secret: ").map_err(prompt_err)?;

    if public_key.is_empty() || token.is_empty() || private_key.is_empty() || token_secret.is_empty()
    {
        return Err(CliError::Validation {
            field: "credentials".into(),
            reason: "all four credential parts are required".into(),
        });
    }

    let store_choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let store_selection = Select::new()
        .with_prompt("Where to store the secrets?")
        .items(store_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let (private_key_field, token_secret_field) = if store_selection == 0 {
        store_keyring(&profile_name, "private-key", &private_key)?;
        store_keyring(&profile_name, "token-secret", &token_secret)?;
        eprintln!("   ✓ secrets stored in system keyring");
        (None, None)
    } else {
        (Some(private_key), Some(token_secret))
    };

    let mut config = tellive_config::load_config_or_default();
    if config.default_profile.is_none() {
        config.default_profile = Some(profile_name.clone());
    }
    config.profiles.insert(
        profile_name,
        Profile {
            public_key,
            token,
            private_key: private_key_field,
            token_secret: token_secret_field,
            ..Profile::default()
        },
    );
    tellive_config::save_config(&config)?;
    eprintln!("   ✓ saved {}", config_path.display());
    Ok(())
}
