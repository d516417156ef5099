use std::process::ExitCode;

use dmgboy::{exit, Options};

fn main() -> ExitCode {
    env_logger::init();

    let options = match Options::from_env() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("error: {err:#}\n\n{}", dmgboy::USAGE);
            return ExitCode::from(exit::USAGE);
        }
    };

    let (mut gb, config) = match dmgboy::load(&options) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::from(exit::LOAD_FAILED);
        }
    };

    match dmgboy::run(&mut gb, &config) {
        Ok(outcome) => {
            if outcome == dmgboy_core::RunOutcome::Locked {
                eprintln!("CPU locked at ${:04X}", gb.cpu.regs.pc);
            }
            ExitCode::from(dmgboy::exit_code(outcome))
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
