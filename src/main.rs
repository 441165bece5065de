use guard_patrol::{part1, part2};
use miette::{Context, IntoDiagnostic};

#[tracing::instrument]
fn main() -> miette::Result<()> {
    tracing_subscriber::fmt::init();

    let input = std::fs::read_to_string("input.txt")
        .into_diagnostic()
        .context("read input.txt")?;

    println!("Part 1: {}", part1::process(&input).context("process part 1")?);
    println!("Part 2: {}", part2::process(&input).context("process part 2")?);
    Ok(())
}
