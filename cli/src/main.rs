use clap::Parser;

fn main() -> anyhow::Result<()> {
    geode_lib::run(geode_lib::Cli::parse())
}
