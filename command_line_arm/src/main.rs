//! # Command line arm
//!
//! Interactive operator for the arm. Each line is parsed as an arm telecommand and executed on a
//! client owned by this executable, e.g.:
//!
//! ```text
//! arm $ connect
//! arm $ limits 0 0 180
//! arm $ joint 0 45 --step 0.5
//! arm $ get
//! ```
//!
//! `exit`, Ctrl-C or Ctrl-D disconnect from the arm and quit.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use color_eyre::{eyre::WrapErr, Result};
use log::info;
use rustyline::{error::ReadlineError, DefaultEditor};
use std::{fs, path::Path};
use structopt::StructOpt;

use arm_lib::{
    arm_client::ArmClient,
    params::ArmExecParams,
    tc_processor::{self, TcOutput},
};
use comms_if::tc::ArmCmd;
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

const PROMPT: &str = "arm $ ";
const HISTORY_PATH: &str = "data/history.txt";

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    color_eyre::install()?;

    let session =
        Session::new("command_line_arm", "sessions").wrap_err("Failed to create the session")?;
    logger_init(LevelFilter::Info, &session).wrap_err("Failed to initialise logging")?;

    let params: ArmExecParams =
        util::params::load("arm_exec.toml").wrap_err("Could not load arm_exec params")?;

    info!(
        "Arm at {}:{}, type `connect` to begin",
        params.net.peer_address, params.net.peer_port
    );

    let mut client = ArmClient::from_params(&params);

    let mut rl = DefaultEditor::new().wrap_err("Could not start the line editor")?;
    if rl.load_history(HISTORY_PATH).is_err() {
        println!("No history detected");
    }

    loop {
        let readline = rl.readline(PROMPT);
        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line).ok();

                if line == "exit" {
                    break;
                }

                match parse(line) {
                    Ok(cmd) => match tc_processor::exec(&mut client, &cmd, &params) {
                        Ok(TcOutput::None) => println!("OK"),
                        Ok(output) => println!("{}", output),
                        Err(e) => println!("Error: {}", e),
                    },
                    Err(e) => println!("{}", e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Unhandled Error: {:?}", err);
                break;
            }
        }
    }

    shutdown(&mut client);

    if let Some(dir) = Path::new(HISTORY_PATH).parent() {
        fs::create_dir_all(dir).ok();
    }
    rl.save_history(HISTORY_PATH)
        .wrap_err("Could not save the history")
}

/// Parse a line as an arm telecommand.
fn parse(line: &str) -> std::result::Result<ArmCmd, structopt::clap::Error> {
    ArmCmd::from_iter_safe(std::iter::once("arm").chain(line.split_whitespace()))
}

fn shutdown<T: comms_if::net::Transport>(client: &mut ArmClient<T>) {
    println!("Exiting...");
    client.disconnect();
}
