use std::path::Path;
use std::{env, fs};

use const_gen::*;
use rmk_subrate_config::{SubrateTomlConfig, SubrateTomlFile, validate_config};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SUBRATE_TOML_PATH");

    // Read the config file if it's present, an unset path means all defaults
    let user_toml = match env::var("SUBRATE_TOML_PATH") {
        Ok(toml_path) => {
            println!("cargo:rerun-if-changed={toml_path}");
            SubrateTomlFile::load(&toml_path).unwrap_or_else(|e| panic!("❌ {e}"))
        }
        Err(_) => SubrateTomlFile::default(),
    };

    // Invalid tier parameters must never reach the firmware
    if let Err(e) = validate_config(&user_toml.subrate) {
        panic!("❌ Invalid [subrate] config: {e}");
    }

    let constants = get_constants_str(&user_toml.subrate);

    // Write to constants.rs file
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("constants.rs");
    fs::write(&dest_path, constants).expect("Failed to write constants.rs file");
}

fn get_constants_str(config: &SubrateTomlConfig) -> String {
    let host_dormant = config.host_dormant.clone().unwrap_or_else(|| (0, 0, 0, 0).into());
    let host_active = config.host_active_or_default();
    let constant_strs = vec![
        const_declaration!(pub(crate) SUBRATE_TIMEOUT = config.supervision_timeout),
        const_declaration!(pub(crate) SUBRATE_DORMANT_DELAY_MS = config.dormant_delay_ms),
        const_declaration!(pub(crate) PERIPHERAL_FAST_ACTIVE = config.peripheral_fast_active),
        // ACTIVE tier
        const_declaration!(pub(crate) SUBRATE_ACTIVE_MIN = config.active.min),
        const_declaration!(pub(crate) SUBRATE_ACTIVE_MAX = config.active.max),
        const_declaration!(pub(crate) SUBRATE_ACTIVE_MAX_LATENCY = config.active.max_latency),
        const_declaration!(pub(crate) SUBRATE_ACTIVE_CN = config.active.continuation_number),
        // IDLE tier
        const_declaration!(pub(crate) SUBRATE_IDLE_MIN = config.idle.min),
        const_declaration!(pub(crate) SUBRATE_IDLE_MAX = config.idle.max),
        const_declaration!(pub(crate) SUBRATE_IDLE_MAX_LATENCY = config.idle.max_latency),
        const_declaration!(pub(crate) SUBRATE_IDLE_CN = config.idle.continuation_number),
        // DORMANT tier
        const_declaration!(pub(crate) SUBRATE_DORMANT_MIN = config.dormant.min),
        const_declaration!(pub(crate) SUBRATE_DORMANT_MAX = config.dormant.max),
        const_declaration!(pub(crate) SUBRATE_DORMANT_MAX_LATENCY = config.dormant.max_latency),
        const_declaration!(pub(crate) SUBRATE_DORMANT_CN = config.dormant.continuation_number),
        // Host connection parameters
        const_declaration!(pub(crate) HOST_CONN_PARAM_DORMANT = config.host_dormant.is_some()),
        const_declaration!(pub(crate) HOST_DORMANT_INT_MIN = host_dormant.interval_min),
        const_declaration!(pub(crate) HOST_DORMANT_INT_MAX = host_dormant.interval_max),
        const_declaration!(pub(crate) HOST_DORMANT_LATENCY = host_dormant.latency),
        const_declaration!(pub(crate) HOST_DORMANT_TIMEOUT = host_dormant.timeout),
        const_declaration!(pub(crate) HOST_ACTIVE_INT_MIN = host_active.interval_min),
        const_declaration!(pub(crate) HOST_ACTIVE_INT_MAX = host_active.interval_max),
        const_declaration!(pub(crate) HOST_ACTIVE_LATENCY = host_active.latency),
        const_declaration!(pub(crate) HOST_ACTIVE_TIMEOUT = host_active.timeout),
    ];

    constant_strs
        .into_iter()
        .map(|s| "#[allow(clippy::redundant_static_lifetimes)]\n".to_owned() + s.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
