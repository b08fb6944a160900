use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for glyphstage")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full gate: fmt, clippy, tests, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            cargo_step("cargo fmt --check", &["fmt", "--all", "--", "--check"])?;
            cargo_step(
                "cargo clippy",
                &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
            )?;
            cargo_step("cargo test", &["test", "--workspace"])?;
            cargo_step("cargo doc", &["doc", "--workspace", "--no-deps"])?;
        }
        Commands::Fmt => cargo_step("cargo fmt --check", &["fmt", "--all", "--", "--check"])?,
        Commands::Clippy => cargo_step(
            "cargo clippy",
            &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        )?,
        Commands::Test => cargo_step("cargo test", &["test", "--workspace"])?,
        Commands::Doc => cargo_step("cargo doc", &["doc", "--workspace", "--no-deps"])?,
        Commands::Build => cargo_step("cargo build", &["build", "--workspace"])?,
    }

    Ok(())
}

fn cargo_step(label: &str, args: &[&str]) -> Result<()> {
    println!("==> Running {label}");
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{label} failed");
    }
    Ok(())
}
