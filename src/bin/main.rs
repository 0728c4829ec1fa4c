//! MSS REST client CLI
//!
//! Command-line front end for authenticating mobile users, listing their
//! certificates and signing files through an MSSP.

use clap::{Parser, Subcommand};
use miette::{Context, IntoDiagnostic, Result};
use mss_rest_client::{
    ClientConfiguration, ConfigManager, DigestSink, Identity, MssClient, SignatureFormat,
    SignatureProfile,
};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mss-client")]
#[command(about = "Mobile Signature Service REST client")]
#[command(long_about = "
MSS Client - authenticate and sign with a mobile signature

EXAMPLES:
    # Create a configuration file, then edit it
    mss-client config init

    # Authenticate a mobile user
    mss-client authenticate +35847001001 -m \"Log in to example.com\"

    # List the user's certificates by signature profile
    mss-client certificates +35847001001

    # Sign the SHA-256 digest of a file
    mss-client sign +35847001001 contract.pdf -o contract.p7s

IDENTITIES:
    +35847001001    MSISDN
    uid:<value>     MSSP user identifier

ENVIRONMENT VARIABLES:
    MSS_API_KEY     API key (overrides the configuration file)
    MSS_PASSWORD    AP password for basic authentication
    RUST_LOG        Logging level (debug, info, warn, error)
")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authenticate a mobile user
    Authenticate {
        /// MSISDN or uid:<identifier>
        identity: String,

        /// Text shown on the phone
        #[arg(short, long)]
        message: Option<String>,

        /// Signature profile URI
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// List a mobile user's certificates by signature profile
    Certificates {
        /// MSISDN or uid:<identifier>
        identity: String,
    },

    /// Sign the SHA-256 digest of a file
    Sign {
        /// MSISDN or uid:<identifier>
        identity: String,

        /// File to sign
        #[arg(value_name = "INPUT_FILE")]
        input_file: PathBuf,

        /// Output file (defaults to INPUT_FILE.p7s, or .sig with --pkcs1)
        #[arg(short, long, value_name = "OUTPUT_FILE")]
        output: Option<PathBuf>,

        /// Text shown on the phone
        #[arg(short, long)]
        message: Option<String>,

        /// Signature profile URI
        #[arg(short, long)]
        profile: Option<String>,

        /// Request a bare PKCS#1 signature instead of CMS
        #[arg(long)]
        pkcs1: bool,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Create default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };

    match cli.command {
        Commands::Authenticate {
            identity,
            message,
            profile,
        } => handle_authenticate_command(&manager, &identity, message, profile).await?,

        Commands::Certificates { identity } => {
            handle_certificates_command(&manager, &identity).await?;
        }

        Commands::Sign {
            identity,
            input_file,
            output,
            message,
            profile,
            pkcs1,
        } => {
            let format = if pkcs1 {
                SignatureFormat::Pkcs1
            } else {
                SignatureFormat::Cms
            };
            let args = SignCommandArgs {
                identity,
                input_file,
                output,
                message,
                profile,
                format,
            };
            handle_sign_command(&manager, args).await?;
        }

        Commands::Config(config_cmd) => handle_config_command(&manager, config_cmd)?,
    }

    Ok(())
}

/// Parameters for the sign command
struct SignCommandArgs {
    identity: String,
    input_file: PathBuf,
    output: Option<PathBuf>,
    message: Option<String>,
    profile: Option<String>,
    format: SignatureFormat,
}

fn load_configuration(manager: &ConfigManager) -> Result<ClientConfiguration> {
    let config = manager
        .load()
        .wrap_err_with(|| {
            format!(
                "Cannot load {} (run `mss-client config init` first)",
                manager.config_path().display()
            )
        })?
        .with_secret_overrides(
            std::env::var("MSS_API_KEY").ok(),
            std::env::var("MSS_PASSWORD").ok(),
        );
    Ok(config)
}

fn build_client(config: &ClientConfiguration) -> Result<MssClient> {
    let client_config = config.to_client_config()?;
    Ok(MssClient::new(client_config)?)
}

fn resolve_profile(config: &ClientConfiguration, profile: Option<String>) -> SignatureProfile {
    profile.map_or_else(|| config.signature_profile(), SignatureProfile::new)
}

async fn handle_authenticate_command(
    manager: &ConfigManager,
    identity: &str,
    message: Option<String>,
    profile: Option<String>,
) -> Result<()> {
    let config = load_configuration(manager)?;
    let client = build_client(&config)?;
    let identity: Identity = identity.parse()?;
    let profile = match profile {
        Some(uri) => SignatureProfile::new(uri),
        None => SignatureProfile::authentication(),
    };
    let message = message
        .or_else(|| config.message.clone())
        .unwrap_or_else(|| "Authentication request".to_string());

    println!("📱 Sending authentication request to {identity}...");
    let response = client.authenticate(&identity, &message, &profile).await?;

    println!("✅ Authenticated");
    if let Some(code) = response.status_code() {
        println!("  Status: {code}");
    }
    let certificate = response.signer_certificate()?;
    println!("  Subject: {}", certificate.subject());
    println!("  Issuer: {}", certificate.issuer());
    println!("  Serial: {}", certificate.serial_hex());
    if let Some(serial_number) = response.subject_attribute("SERIALNUMBER")? {
        println!("  Serial number: {serial_number}");
    }
    Ok(())
}

async fn handle_certificates_command(manager: &ConfigManager, identity: &str) -> Result<()> {
    let config = load_configuration(manager)?;
    let client = build_client(&config)?;
    let identity: Identity = identity.parse()?;

    let certificates = client.list_certificates(&identity).await?;
    if certificates.is_empty() {
        println!("❌ No active certificates found for {identity}");
        return Ok(());
    }

    println!("🔍 Certificates for {identity}:");
    for (profile, bundle) in &certificates {
        println!("  {profile}");
        for (index, certificate) in bundle.chain().iter().enumerate() {
            let role = if index == 0 { "end-entity" } else { "issuer" };
            println!("    [{role}] {}", certificate.subject());
        }
    }
    Ok(())
}

async fn handle_sign_command(manager: &ConfigManager, args: SignCommandArgs) -> Result<()> {
    let config = load_configuration(manager)?;
    let client = build_client(&config)?;
    let identity: Identity = args.identity.parse()?;
    let profile = resolve_profile(&config, args.profile);
    let message = args
        .message
        .or_else(|| config.message.clone())
        .unwrap_or_else(|| format!("Sign {}", args.input_file.display()));

    let output_path = args.output.unwrap_or_else(|| {
        let extension = match args.format {
            SignatureFormat::Cms => "p7s",
            SignatureFormat::Pkcs1 => "sig",
        };
        let mut name = args.input_file.clone().into_os_string();
        name.push(".");
        name.push(extension);
        PathBuf::from(name)
    });

    let file = File::open(&args.input_file)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to open {}", args.input_file.display()))?;
    let mut reader = BufReader::new(file);
    let mut sink = DigestSink::new(&client, identity.clone(), message, profile, args.format);
    std::io::copy(&mut reader, &mut sink)
        .into_diagnostic()
        .wrap_err("Failed to hash input file")?;

    println!(
        "📱 Sending signature request to {identity} ({} bytes hashed)...",
        sink.bytes_written()
    );
    let signature = sink.finalize_and_sign().await?;

    std::fs::write(&output_path, &signature)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to write {}", output_path.display()))?;
    println!("✅ Signature written to {}", output_path.display());
    Ok(())
}

fn handle_config_command(manager: &ConfigManager, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let config = manager.load()?;
            println!("📋 Configuration ({})", manager.config_path().display());
            println!("  REST URL: {}", config.rest_url);
            if let Some(secondary) = &config.secondary_rest_url {
                println!("  Secondary REST URL: {secondary}");
            }
            println!("  AP_ID: {}", config.ap_id);
            println!("  Authentication: {:?}", config.auth);
            println!("  Timeout: {}s", config.timeout_seconds);
            println!("  Verify TLS: {}", config.verify_tls);
            println!("  Signature profile: {}", config.signature_profile());
        }

        ConfigCommands::Init { force } => {
            if manager.config_path().exists() && !force {
                println!(
                    "⚠️  {} already exists (use --force to overwrite)",
                    manager.config_path().display()
                );
                return Ok(());
            }
            manager.save(&ClientConfiguration::default())?;
            println!(
                "✅ Default configuration written to {}",
                manager.config_path().display()
            );
        }
    }
    Ok(())
}
