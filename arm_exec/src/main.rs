//! Main arm executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session, logging and parameters
//!     - Connect to the arm, retrying a limited number of times
//!     - Either:
//!         - Execute the telecommands of a script at their scheduled times, or
//!         - With no script, move the arm home and report the joint angles
//!     - Disconnect from the arm

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use std::env;
use std::thread;
use std::time::Duration;

// Internal
use arm_lib::{
    arm_client::ArmClient,
    params::ArmExecParams,
    tc_processor::{self, TcOutput},
};
use comms_if::net::UdpTransport;
use util::{
    logger::{logger_init, LevelFilter},
    script_interpreter::{PendingTcs, ScriptInterpreter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Period at which the script is polled for pending TCs.
const CYCLE_PERIOD_S: f64 = 0.01;

/// Time between two connection attempts.
const CONNECT_RETRY_PERIOD_S: f64 = 1.0;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("arm_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Arm Control Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let params: ArmExecParams =
        util::params::load("arm_exec.toml").wrap_err("Could not load arm_exec params")?;

    if params.num_joints == 0 {
        return Err(eyre!("The arm must have at least one joint"));
    }

    info!("Exec parameters loaded");

    // ---- LOAD SCRIPT ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    let script = match args.len() {
        2 => {
            info!("Loading script from \"{}\"", &args[1]);

            let si = ScriptInterpreter::new(&args[1]).wrap_err("Failed to load script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} TCs\n",
                si.get_duration(),
                si.get_num_tcs()
            );

            Some(si)
        }
        1 => {
            info!("No script provided, the arm will be moved home\n");
            None
        }
        _ => {
            return Err(eyre!(
                "Expected either zero or one argument, found {}",
                args.len() - 1
            ))
        }
    };

    // ---- CONNECT ----

    let mut client = ArmClient::from_params(&params);

    connect_with_retries(&mut client, &params)?;

    // ---- MAIN PROCESSING ----

    let result = match script {
        Some(si) => run_script(&mut client, &params, si),
        None => client
            .move_to_home()
            .wrap_err("Failed to move the arm home")
            .map(|_| info!("Joint angles: {:?}", client.get_all_joint_angles())),
    };

    // ---- SHUTDOWN ----

    client.disconnect();
    info!("End of execution");

    result
}

/// Connect to the arm, trying up to `connect_attempts` times.
fn connect_with_retries(
    client: &mut ArmClient<UdpTransport>,
    params: &ArmExecParams,
) -> Result<(), Report> {
    let attempts = params.connect_attempts.max(1);

    for attempt in 1..=attempts {
        info!(
            "Connecting to {}:{} (attempt {} of {})",
            params.net.peer_address, params.net.peer_port, attempt, attempts
        );

        match tc_processor::connect(client, params) {
            Ok(()) => {
                info!("Joint angles: {:?}", client.joint_table().current_angles());
                return Ok(());
            }
            Err(e) => {
                warn!("Connection attempt {} failed: {}", attempt, e);

                // A bad joint configuration will not fix itself
                if client.is_connected() {
                    return Err(e).wrap_err("Could not configure the joints");
                }
            }
        }

        if attempt < attempts {
            thread::sleep(Duration::from_secs_f64(CONNECT_RETRY_PERIOD_S));
        }
    }

    Err(eyre!("Could not connect to the arm after {} attempts", attempts))
}

/// Execute the script's TCs as they become due. A failed TC is logged and the script continues.
fn run_script(
    client: &mut ArmClient<UdpTransport>,
    params: &ArmExecParams,
    mut si: ScriptInterpreter,
) -> Result<(), Report> {
    info!("Starting script execution");

    loop {
        match si.get_pending_tcs() {
            PendingTcs::None => thread::sleep(Duration::from_secs_f64(CYCLE_PERIOD_S)),
            PendingTcs::Some(tcs) => {
                for tc in tcs {
                    match tc_processor::exec(client, &tc, params) {
                        Ok(TcOutput::None) => (),
                        Ok(output) => info!("{}", output),
                        Err(e) => warn!("TC {:?} failed: {}", tc, e),
                    }
                }
            }
            PendingTcs::EndOfScript => {
                info!("End of script reached");
                break;
            }
        }
    }

    Ok(())
}
