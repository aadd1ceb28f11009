use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use colored::*;
use sattm::commands::{tm, CmdStatus, CommandContext};
use sattm::config::TmConfig;
use sattm::frame::DestinationEnvelope;
use sattm::registry::CommandRegistry;
use sattm::store::MemoryStore;
use sattm::transport::{Transport, TransportError};
use tracing::Level;

const DEFAULT_SIM_TIME_S: &str = "36000";
const DEFAULT_SIM_SAMPLES: &str = "8";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = App::new("tmcmd")
        .version("0.1.0")
        .author("Space Systems Engineering Team")
        .about("🛰️  Telemetry command console - run TM commands against a simulated data store")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("JSON configuration file")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::with_name("format")
                .short("f")
                .long("format")
                .value_name("FORMAT")
                .help("How transmitted frames are shown")
                .takes_value(true)
                .possible_values(&["hex", "json"])
                .default_value("hex")
                .global(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Enable debug logging")
                .global(true),
        )
        .arg(
            Arg::with_name("time")
                .long("time")
                .value_name("SECONDS")
                .help("Simulated spacecraft time")
                .takes_value(true)
                .default_value(DEFAULT_SIM_TIME_S)
                .global(true)
                .validator(|v| match v.parse::<u32>() {
                    Ok(_) => Ok(()),
                    Err(_) => Err("Time must be a valid number of seconds".into()),
                }),
        )
        .arg(
            Arg::with_name("samples")
                .long("samples")
                .value_name("COUNT")
                .help("Simulated samples per payload kind (0 leaves the history empty)")
                .takes_value(true)
                .default_value(DEFAULT_SIM_SAMPLES)
                .global(true)
                .validator(|v| match v.parse::<usize>() {
                    Ok(_) => Ok(()),
                    Err(_) => Err("Sample count must be a valid number".into()),
                }),
        )
        .subcommand(
            SubCommand::with_name("run")
                .about("📡 Run a telemetry command")
                .arg(
                    Arg::with_name("command")
                        .help("Command name (see `tmcmd list`)")
                        .required(true),
                )
                .arg(
                    Arg::with_name("params")
                        .help("Parameter string, e.g. \"7 0\" for send_payload")
                        .required(false),
                )
                .arg(
                    Arg::with_name("hex")
                        .long("hex")
                        .help("Treat PARAMS as hex-encoded raw bytes (for tm_parse_status)"),
                ),
        )
        .subcommand(SubCommand::with_name("list").about("📋 List registered commands"))
        .get_matches();

    let verbose = matches.is_present("verbose")
        || matches.subcommand().1.map_or(false, |sub| sub.is_present("verbose"));
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config_path = matches
        .value_of("config")
        .or_else(|| matches.subcommand().1.and_then(|sub| sub.value_of("config")));
    let config = match config_path {
        Some(path) => TmConfig::load(path)?,
        None => TmConfig::default(),
    };

    let mut registry = CommandRegistry::new();
    tm::tm_init(&mut registry)?;
    registry.activate();

    match matches.subcommand() {
        ("list", _) => list_commands(&registry),
        ("run", Some(sub_matches)) => run_command(sub_matches, &registry, &config)?,
        _ => unreachable!("clap requires a subcommand"),
    }

    Ok(())
}

fn list_commands(registry: &CommandRegistry) {
    println!("{}", "Registered commands".bright_blue().bold());
    for entry in registry.iter() {
        println!(
            "  {:<20} {:<10} {}",
            entry.name.as_str().bright_cyan(),
            format!("\"{}\"", entry.schema),
            format!("{} args", entry.expected_args).dimmed()
        );
    }
}

// Global options are read from the subcommand matches, where clap propagates them.
fn run_command(
    sub_matches: &ArgMatches<'_>,
    registry: &CommandRegistry,
    config: &TmConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let now_s = sub_matches.value_of("time").unwrap_or(DEFAULT_SIM_TIME_S).parse::<u32>()?;
    let samples = sub_matches.value_of("samples").unwrap_or(DEFAULT_SIM_SAMPLES).parse::<usize>()?;
    let store = MemoryStore::simulated(now_s, samples);

    let name = sub_matches.value_of("command").unwrap_or_default();
    let params = match sub_matches.value_of("params") {
        Some(text) => Some(raw_params(text, sub_matches.is_present("hex"))?),
        None => None,
    };

    let mut transport = ConsoleTransport {
        json: sub_matches.value_of("format") == Some("json"),
    };
    let mut console = String::new();
    let status = {
        let mut ctx = CommandContext::new(config, &store, &mut transport, &mut console);
        registry.execute(name, params.as_deref(), &mut ctx)?
    };

    if !console.is_empty() {
        print!("{console}");
    }

    let label = match status {
        CmdStatus::Ok => status.to_string().bright_green(),
        CmdStatus::Fail => status.to_string().yellow(),
        CmdStatus::Error => status.to_string().bright_red(),
    };
    println!("{} {} ({})", name.bright_white(), label, status.code());

    Ok(())
}

/// Prints every envelope it is asked to transmit.
struct ConsoleTransport {
    json: bool,
}

impl Transport for ConsoleTransport {
    fn send(&mut self, channel: &str, frame: &[u8], flags: u32) -> Result<(), TransportError> {
        let envelope = DestinationEnvelope::decode(frame).map_err(|_| TransportError::Rejected(frame.len()))?;

        if self.json {
            let value = serde_json::json!({
                "channel": channel,
                "flags": flags,
                "node": envelope.node,
                "sequence": envelope.frame.sequence,
                "type": envelope.frame.kind.type_code(),
                "payload": hex::encode(envelope.frame.payload),
            });
            println!("{value}");
        } else {
            println!(
                "{} node={} seq={} kind={} channel={:?} flags={}",
                "TX".bright_green().bold(),
                envelope.node,
                envelope.frame.sequence,
                envelope.frame.kind,
                channel,
                flags
            );
            println!("{} {}", "payload:".dimmed(), hex::encode(envelope.frame.payload));
        }

        Ok(())
    }
}

/// Raw parameter bytes for a command, hex-decoded when `--hex` is given.
/// Whitespace between hex digits is ignored.
fn raw_params(text: &str, is_hex: bool) -> Result<Vec<u8>, hex::FromHexError> {
    if is_hex {
        hex::decode(text.split_whitespace().collect::<String>())
    } else {
        Ok(text.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_params_ignore_whitespace() {
        assert_eq!(raw_params("01 02\tff", true).unwrap(), vec![0x01, 0x02, 0xFF]);
        assert_eq!(raw_params("7 0", false).unwrap(), b"7 0".to_vec());
    }

    #[test]
    fn test_bad_hex_params_rejected() {
        assert!(raw_params("abc", true).is_err());
        assert!(raw_params("zz", true).is_err());
    }
}
