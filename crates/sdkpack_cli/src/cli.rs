//! Command-line definition for `sdkpack`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use sdkpack_io_fs::EnumSdkPreset;

#[derive(Parser, Debug)]
#[command(name = "sdkpack")]
#[command(about = "Stage a native library SDK: reset, build layout, copy headers and libraries")]
#[command(version)]
pub struct Cli {
    /// Source root containing `<library>/`.
    #[arg(value_name = "SOURCE_ROOT")]
    pub source_root: PathBuf,

    /// Destination root that receives `<library>/`.
    #[arg(value_name = "DEST_ROOT")]
    pub dest_root: PathBuf,

    /// Built-in library configuration.
    #[arg(long, value_enum, default_value_t = PresetArg::V8)]
    pub preset: PresetArg,

    /// TOML library configuration (overrides --preset).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print what would be done without touching the filesystem.
    #[arg(long)]
    pub dry_run: bool,

    /// Stop after a failed reset or layout build instead of continuing.
    #[arg(long)]
    pub fail_fast: bool,

    /// Trace scanned and unmatched entries too.
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only report warnings and errors.
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PresetArg {
    V8,
    #[value(name = "gfx_lib")]
    GfxLib,
}

impl From<PresetArg> for EnumSdkPreset {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::V8 => EnumSdkPreset::V8,
            PresetArg::GfxLib => EnumSdkPreset::GfxLib,
        }
    }
}

impl Cli {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}
