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

    let loop_n = lab.loop_obstruction_count();
    println!(
        "There is(are) {} location(s) which can make guard loops in given laboratory.",
        loop_n
    );

    Ok(())
}
