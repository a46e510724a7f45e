use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = launchbat::cli::Cli::parse();
    launchbat::cli::run(cli)
}
