//! # Mechanisms Simulator Executable
//!
//! Serves a simulated arm over UDP until killed. Point the arm executable's `net` parameters at
//! this executable's bind address to run without hardware.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Result};
use log::info;
use std::sync::atomic::AtomicBool;

// Internal
use mech_sim::{SimParams, SimServer};
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("mech_sim", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Mechanisms Simulator Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let params: SimParams =
        util::params::load("mech_sim.toml").wrap_err("Could not load mech_sim params")?;

    info!(
        "Parameters loaded: {} joint(s), max angle {:.2} deg",
        params.num_joints, params.max_angle_deg
    );
    if params.drop_every > 0 {
        info!("Dropping every {} request(s)", params.drop_every);
    }

    // ---- SERVER INITIALISATION ----

    let mut server = SimServer::new(&params).wrap_err("Failed to initialise server")?;

    // ---- MAIN LOOP ----

    let stop = AtomicBool::new(false);

    server.run(&stop).wrap_err("Simulator server failed")
}
