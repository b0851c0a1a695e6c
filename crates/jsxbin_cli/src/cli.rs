use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, builder::{Styles, styling::{AnsiColor, Effects}}, crate_description, crate_name, crate_version};
use clap_complete::Shell;
use jsxbin_lib::{DEFAULT_MAX_DEPTH, DecompileMode, DecompileOptions, DecompileVersion};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Reconstructed script
    Source,
    /// Decoded node tree
    Tree,
}

impl From<ModeArg> for DecompileMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Source => DecompileMode::Source,
            ModeArg::Tree => DecompileMode::Tree,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VersionArg {
    Auto,
    V1,
    V2,
}

impl From<VersionArg> for DecompileVersion {
    fn from(version: VersionArg) -> Self {
        match version {
            VersionArg::Auto => DecompileVersion::Auto,
            VersionArg::V1 => DecompileVersion::V1,
            VersionArg::V2 => DecompileVersion::V2,
        }
    }
}

#[derive(Parser)]
#[command(name = crate_name!(),
    version = crate_version!(),
    about = crate_description!(),
    styles = Styles::styled()
        .header(AnsiColor::BrightGreen.on_default() | Effects::BOLD | Effects::UNDERLINE)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightCyan.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Cyan.on_default()))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<TopLevel>,
}

#[derive(Subcommand)]
pub enum TopLevel {
    /// Turn JSXBIN back into script source
    Decompile {
        #[command(subcommand)]
        source: Input,
    },
    /// Generate shell completion
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum Input {
    /// Read the JSXBIN text from a file
    File {
        path: PathBuf,
        #[command(flatten)]
        args: DecompileArgs,
    },
    /// Read the JSXBIN text from standard input
    Stdin {
        #[command(flatten)]
        args: DecompileArgs,
    },
}

#[derive(Args, Debug)]
pub struct DecompileArgs {
    #[arg(long, value_enum, default_value_t = ModeArg::Source)]
    pub mode: ModeArg,

    /// Format version; `auto` reads it from the header
    #[arg(long, value_enum, default_value_t = VersionArg::Auto)]
    pub version: VersionArg,

    /// Nodes nested deeper than this are dropped
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Write here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl DecompileArgs {
    pub fn options(&self) -> DecompileOptions {
        DecompileOptions {
            mode: self.mode.into(),
            version: self.version.into(),
            max_depth: self.max_depth,
        }
    }
}
