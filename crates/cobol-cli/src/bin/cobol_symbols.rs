use anyhow::{Context, Result};
use clap::Parser;
use cobol_cli::args::CliArgs;
use cobol_cli::{driver, tracing_config};

fn main() -> Result<()> {
    // Opt-in through COBOL_LS_LOG / RUST_LOG; see tracing_config.rs.
    tracing_config::init_tracing();

    let args = CliArgs::parse();
    let output = driver::run(&args)?;
    let rendered = serde_json::to_string_pretty(&output).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}
