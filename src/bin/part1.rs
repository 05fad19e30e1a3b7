use anyhow::{Context, Result};
use clap::Parser;
use guard_patrol::CLIArgs;

fn main() -> Result<()> {
    let args = CLIArgs::parse();
    let lab = guard_patrol::read_lab(&args.input_path).with_context(|| {
        format!(
            "Failed to read laboratory from given file({}).",
            args.input_path.display()
        )
    })?;

    let patrol = lab.patrol(None);
    if patrol.is_loop() {
        eprintln!("The guard is trapped in a loop and never leaves given laboratory.");
    }

    println!(
        "The guard will visit {} distinct position(s) before leaving given laboratory.",
        patrol.positions().len()
    );

    Ok(())
}
