use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use dmgboy_core::{EmulatorConfig, GameBoy, RunMode, RunOutcome};

pub const USAGE: &str = "usage: dmgboy <rom.gb>\n\
\n\
environment:\n  \
FASTMODE=1            run unpaced\n  \
DMGBOY_FRAMES=<n>     stop after n frames\n  \
DMGBOY_BOOT_ROM=<path> start from a 256-byte DMG boot ROM\n  \
RUST_LOG=<level>      log verbosity";

/// Process exit status for each way a run can end.
pub mod exit {
    pub const OK: u8 = 0;
    pub const LOAD_FAILED: u8 = 1;
    pub const USAGE: u8 = 2;
    pub const LOCKED: u8 = 3;
}

/// Everything the command line and environment decide about a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    pub rom: PathBuf,
    pub boot_rom: Option<PathBuf>,
    pub frames: Option<u64>,
    pub run_mode: RunMode,
}

impl Options {
    pub fn from_env() -> Result<Self> {
        Self::parse(
            std::env::args().skip(1),
            RunMode::from_env(),
            std::env::var("DMGBOY_FRAMES").ok().as_deref(),
            std::env::var_os("DMGBOY_BOOT_ROM").map(PathBuf::from),
        )
    }

    fn parse<I>(
        mut args: I,
        run_mode: RunMode,
        frames: Option<&str>,
        boot_rom: Option<PathBuf>,
    ) -> Result<Self>
    where
        I: Iterator<Item = String>,
    {
        let Some(rom) = args.next() else {
            bail!("missing ROM path");
        };
        if let Some(extra) = args.next() {
            bail!("unexpected argument '{extra}'");
        }
        let frames = frames
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("DMGBOY_FRAMES must be a frame count, got '{value}'"))
            })
            .transpose()?;

        Ok(Self {
            rom: PathBuf::from(rom),
            boot_rom: boot_rom.filter(|path| !path.as_os_str().is_empty()),
            frames,
            run_mode,
        })
    }
}

/// Read the ROM (and boot ROM, if any) and build a machine ready to run.
pub fn load(options: &Options) -> Result<(GameBoy, EmulatorConfig)> {
    let mut config = EmulatorConfig::builder().run_mode(options.run_mode).build();
    config.frame_limit = options.frames;
    if let Some(path) = options.boot_rom.as_deref() {
        config.boot_rom = Some(read_file(path, "boot ROM")?);
    }

    let mut gb = GameBoy::with_config(&config).context("invalid boot ROM")?;
    let rom = read_file(&options.rom, "ROM")?;
    let header = gb
        .load_rom(&rom)
        .with_context(|| format!("failed to load cartridge '{}'", options.rom.display()))?;
    log::info!("playing '{}' ({})", header.title, header.mapper_name());

    Ok((gb, config))
}

fn read_file(path: &Path, what: &str) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {what} '{}'", path.display()))
}

/// Run until the machine stops, echoing serial output to stdout.
///
/// A Blargg-style "Passed"/"Failed" line on the serial port ends the run.
pub fn run(gb: &mut GameBoy, config: &EmulatorConfig) -> Result<RunOutcome> {
    let mut stdout = std::io::stdout().lock();
    run_to(gb, config, &mut stdout)
}

fn run_to(gb: &mut GameBoy, config: &EmulatorConfig, out: &mut impl Write) -> Result<RunOutcome> {
    let mut echo = SerialEcho::default();
    let mut io_result = Ok(());

    let outcome = gb.run_with(config, |gb| {
        if let Err(err) = echo.forward(&mut *out, &gb.take_serial_output()) {
            io_result = Err(err);
            gb.stop();
        } else if echo.finished {
            log::info!("test ROM reported a result");
            gb.stop();
        }
    });
    io_result?;
    echo.forward(out, &gb.take_serial_output())?;

    Ok(outcome)
}

const VERDICTS: [&[u8; 6]; 2] = [b"Passed", b"Failed"];

/// Copies serial bytes to a writer and watches for a test ROM verdict.
#[derive(Default)]
struct SerialEcho {
    /// The last six bytes seen.
    window: [u8; 6],
    /// A verdict word has been seen on the current line.
    verdict: bool,
    /// The line holding a verdict has ended.
    finished: bool,
}

impl SerialEcho {
    fn forward(&mut self, out: &mut impl Write, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        for &byte in bytes {
            self.observe(byte);
        }
        out.write_all(bytes)
            .and_then(|()| out.flush())
            .context("failed to write serial output")
    }

    fn observe(&mut self, byte: u8) {
        if byte == b'\n' {
            self.finished |= self.verdict;
            self.verdict = false;
        }
        self.window.rotate_left(1);
        self.window[5] = byte;
        self.verdict |= VERDICTS.iter().any(|&word| *word == self.window);
    }
}

pub fn exit_code(outcome: RunOutcome) -> u8 {
    match outcome {
        RunOutcome::Locked => exit::LOCKED,
        RunOutcome::Stopped | RunOutcome::FrameLimit => exit::OK,
    }
}
