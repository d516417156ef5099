use typed_builder::TypedBuilder;

/// How fast the run loop lets the machine go.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum RunMode {
    /// One frame per 70224 T-cycles of wall time (~59.73 Hz).
    #[default]
    Paced,
    /// As fast as the host allows.
    FreeRun,
}

impl RunMode {
    /// `FASTMODE=1` (or `true`) selects [`RunMode::FreeRun`].
    pub fn from_env() -> Self {
        Self::from_fastmode(std::env::var("FASTMODE").ok().as_deref())
    }

    fn from_fastmode(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => RunMode::FreeRun,
            _ => RunMode::Paced,
        }
    }
}

#[derive(Clone, Debug, TypedBuilder)]
pub struct EmulatorConfig {
    #[builder(default)]
    pub run_mode: RunMode,
    /// Stop after this many frames.
    #[builder(default, setter(strip_option))]
    pub frame_limit: Option<u64>,
    /// 256-byte DMG boot image to run from $0000.
    #[builder(default, setter(strip_option))]
    pub boot_rom: Option<Vec<u8>>,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
