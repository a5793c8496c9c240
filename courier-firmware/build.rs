//! Build script for courier-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates board.toml and generates the board constants

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use courier_core::config::{
    validate_baudrate, validate_interval, validate_message, ConfigError, SerialSettings,
};
use courier_hal::{UsartId, UsartPins};

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    setup_linker(&out_dir);
    let board = validate_config();
    generate_board_config(&out_dir, &board);
}

/// Set up linker search paths for memory.x
fn setup_linker(out_dir: &Path) {
    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validated contents of board.toml
struct Board {
    pins: UsartPins,
    baudrate: u32,
    greeting: String,
    status: String,
    interval_ms: u32,
}

/// Validate board.toml configuration at compile time
fn validate_config() -> Board {
    // Re-run if board.toml changes
    println!("cargo:rerun-if-changed=board.toml");

    let config_path = Path::new("board.toml");

    // Check if config file exists
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: board.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a board.toml configuration file.          ║\n\
            ║  Please create one in the courier-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    // Read the config file
    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read board.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in board.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    let serial = validate_serial(&config, &mut errors);
    let beacon = validate_beacon(&config, &mut errors);

    match (serial, beacon) {
        (Some((pins, baudrate)), Some((greeting, status, interval_ms))) if errors.is_empty() => {
            println!("cargo:warning=board.toml validated successfully");
            Board {
                pins,
                baudrate,
                greeting,
                status,
                interval_ms,
            }
        }
        _ => report_errors("Invalid board configuration", &errors),
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = match line.char_indices().nth(61) {
                Some((cut, _)) if line.chars().count() > 64 => format!("{}...", &line[..cut]),
                _ => line.to_string(),
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Abort the build with a list of problems
fn report_errors(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

fn describe(section: &str, e: ConfigError) -> String {
    format!("[{}] {}", section, e)
}

/// Validate the [serial] section
fn validate_serial(config: &toml::Value, errors: &mut Vec<String>) -> Option<(UsartPins, u32)> {
    let serial = match config.get("serial") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[serial] must be a table".to_string());
            return None;
        }
        None => {
            errors.push("Missing [serial] section".to_string());
            return None;
        }
    };

    let baudrate = match serial.get("baudrate") {
        Some(toml::Value::Integer(baud)) => match u32::try_from(*baud) {
            Ok(baud) => match validate_baudrate(baud) {
                Ok(()) => Some(baud),
                Err(e) => {
                    errors.push(describe("serial", e));
                    None
                }
            },
            Err(_) => {
                errors.push(format!("[serial] baudrate {} out of range", baud));
                None
            }
        },
        Some(_) => {
            errors.push("[serial] baudrate must be an integer".to_string());
            None
        }
        None => {
            errors.push("[serial] missing 'baudrate'".to_string());
            None
        }
    };

    let tx = pin_field(serial, "tx_pin", errors);
    let rx = pin_field(serial, "rx_pin", errors);
    let pins = match (tx, rx) {
        (Some(tx), Some(rx)) => match UsartPins::parse(&tx, &rx) {
            Some(pins) => {
                let settings = SerialSettings {
                    pins,
                    ..SerialSettings::default()
                };
                match settings.validate() {
                    Ok(()) => Some(pins),
                    Err(ConfigError::InvalidPins(_)) => {
                        errors.push(format!(
                            "[serial] {}/{} cannot be routed to {} (use PA9/PA10 or PB6/PB7)",
                            tx,
                            rx,
                            UsartId::Usart1.name()
                        ));
                        None
                    }
                    Err(e) => {
                        errors.push(describe("serial", e));
                        None
                    }
                }
            }
            None => {
                errors.push(format!("[serial] invalid pin name in {}/{}", tx, rx));
                None
            }
        },
        _ => None,
    };

    Some((pins?, baudrate?))
}

fn pin_field(table: &toml::Table, key: &str, errors: &mut Vec<String>) -> Option<String> {
    match table.get(key) {
        Some(toml::Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(format!("[serial] {} must be a string", key));
            None
        }
        None => {
            errors.push(format!("[serial] missing '{}'", key));
            None
        }
    }
}

/// Validate the [beacon] section
fn validate_beacon(
    config: &toml::Value,
    errors: &mut Vec<String>,
) -> Option<(String, String, u32)> {
    let beacon = match config.get("beacon") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[beacon] must be a table".to_string());
            return None;
        }
        None => {
            errors.push("Missing [beacon] section".to_string());
            return None;
        }
    };

    let mut message = |key: &str| match beacon.get(key) {
        Some(toml::Value::String(text)) => match validate_message(text) {
            Ok(()) => Some(text.clone()),
            Err(e) => {
                errors.push(format!("[beacon] {}: {}", key, e));
                None
            }
        },
        Some(_) => {
            errors.push(format!("[beacon] {} must be a string", key));
            None
        }
        None => {
            errors.push(format!("[beacon] missing '{}'", key));
            None
        }
    };
    let greeting = message("greeting");
    let status = message("status");

    let interval_ms = match beacon.get("interval_ms") {
        Some(toml::Value::Integer(ms)) => match u32::try_from(*ms) {
            Ok(ms) => match validate_interval(ms) {
                Ok(()) => Some(ms),
                Err(e) => {
                    errors.push(describe("beacon", e));
                    None
                }
            },
            Err(_) => {
                errors.push(format!("[beacon] interval_ms {} out of range", ms));
                None
            }
        },
        Some(_) => {
            errors.push("[beacon] interval_ms must be an integer".to_string());
            None
        }
        None => {
            errors.push("[beacon] missing 'interval_ms'".to_string());
            None
        }
    };

    Some((greeting?, status?, interval_ms?))
}

/// Write board_config.rs for `include!` from main.rs
fn generate_board_config(out_dir: &Path, board: &Board) {
    let pin = |p: courier_hal::PinId| {
        format!("PinId {{ port: Port::{:?}, pin: {} }}", p.port, p.pin)
    };

    let source = format!(
        "// Generated by build.rs from board.toml - do not edit\n\
         \n\
         use courier_core::config::{{BeaconConfig, SerialSettings}};\n\
         use courier_hal::gpio::{{PinId, Port}};\n\
         use courier_hal::{{UsartId, UsartPins}};\n\
         \n\
         pub const SERIAL: SerialSettings = SerialSettings {{\n    \
             instance: UsartId::Usart1,\n    \
             pins: UsartPins::new({}, {}),\n    \
             baudrate: {},\n\
         }};\n\
         \n\
         pub const BEACON: BeaconConfig = BeaconConfig {{\n    \
             greeting: {:?},\n    \
             status: {:?},\n    \
             interval_ms: {},\n\
         }};\n",
        pin(board.pins.tx),
        pin(board.pins.rx),
        board.baudrate,
        board.greeting,
        board.status,
        board.interval_ms,
    );

    fs::write(out_dir.join("board_config.rs"), source).unwrap();
}
