use clap::Parser;

use goravel_release::{
    Result,
    cli::{Args, Command},
    command,
};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("goravel_release")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli_args = Args::parse();

    initialize_logger(cli_args.debug)?;

    let config = command::common::load_config(&cli_args)?;
    let orchestrator = command::common::build_orchestrator(
        &cli_args,
        config,
        cli_args.command.real(),
    )?;

    match &cli_args.command {
        Command::Major { .. } => {
            let options = cli_args.command.major_options().unwrap_or_default();
            command::major::execute(&orchestrator, options).await
        }
        Command::Patch { tag, .. } => {
            command::patch::execute(&orchestrator, tag).await
        }
        Command::Preview { tag, packages } => {
            command::preview::execute(&orchestrator, tag, *packages).await
        }
    }
}
