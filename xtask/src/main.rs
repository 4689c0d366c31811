//! xtask - Development automation for vocab-builder
//!
//! Usage: cargo xtask <command>

use anyhow::Result;
use clap::{Parser, Subcommand};
use xshell::{cmd, Shell};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "vocab-builder development automation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Format code
    Fmt {
        /// Check only, don't modify
        #[arg(long)]
        check: bool,
    },

    /// Run clippy across the workspace
    Clippy {
        /// Fix warnings automatically
        #[arg(long)]
        fix: bool,
    },

    /// Run tests
    Test {
        /// Filter test name
        #[arg(long)]
        filter: Option<String>,
    },

    /// Generate the sample model into target/demo
    Demo,

    /// Full CI pipeline (fmt, clippy, test)
    Ci,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;

    match cli.command {
        Command::Fmt { check } => fmt(&sh, check),
        Command::Clippy { fix } => clippy(&sh, fix),
        Command::Test { filter } => test(&sh, filter),
        Command::Demo => demo(&sh),
        Command::Ci => ci(&sh),
    }
}

fn fmt(sh: &Shell, check: bool) -> Result<()> {
    if check {
        cmd!(sh, "cargo fmt --all -- --check").run()?;
    } else {
        cmd!(sh, "cargo fmt --all").run()?;
    }
    Ok(())
}

fn clippy(sh: &Shell, fix: bool) -> Result<()> {
    if fix {
        cmd!(sh, "cargo clippy --workspace --all-targets --fix --allow-dirty").run()?;
    } else {
        cmd!(sh, "cargo clippy --workspace --all-targets -- -D warnings").run()?;
    }
    Ok(())
}

fn test(sh: &Shell, filter: Option<String>) -> Result<()> {
    match filter {
        Some(filter) => cmd!(sh, "cargo test --workspace {filter}").run()?,
        None => cmd!(sh, "cargo test --workspace").run()?,
    }
    Ok(())
}

fn demo(sh: &Shell) -> Result<()> {
    sh.create_dir("target/demo")?;
    cmd!(
        sh,
        "cargo run -p vocab-cli -- generate --file demos/sample_model.json --output target/demo"
    )
    .run()?;
    Ok(())
}

fn ci(sh: &Shell) -> Result<()> {
    fmt(sh, true)?;
    clippy(sh, false)?;
    test(sh, None)?;
    println!("CI pipeline passed");
    Ok(())
}
