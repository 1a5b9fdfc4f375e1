use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use courier::agent::{build_email_agent, process_email};
use courier::cli::{Cli, Command, RunArgs, run_config_command};
use courier::config::Config;
use courier::llm::create_llm_provider;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "courier=debug" } else { "courier=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Run(args) => {
            let config = resolve_config(&args)?;
            run_email(config, args).await
        }
        Command::Config(cmd) => {
            let config = Config::from_env()?;
            run_config_command(&config, cmd)
        }
    }
}

/// Environment first, then flags on top.
fn resolve_config(args: &RunArgs) -> anyhow::Result<Config> {
    let mut config = if args.offline {
        Config::offline_from_env()?
    } else {
        Config::from_env()?
    };

    if let Some(model) = &args.model {
        config.llm.model = model.clone();
    }
    if let Some(max) = args.max_iterations {
        config.agent.max_iterations = max;
    }
    config.validate()?;
    Ok(config)
}

async fn run_email(config: Config, args: RunArgs) -> anyhow::Result<()> {
    let llm = create_llm_provider(&config.llm)?;
    let agent = build_email_agent(llm, &config.agent)?;

    let instruction = args.instruction.as_deref();
    println!(
        "🤖 Courier starting\n📝 Instruction: {}\n{}",
        instruction.unwrap_or(courier::agent::DEFAULT_INSTRUCTION),
        "=".repeat(60)
    );

    let report = process_email(&agent, instruction).await?;

    println!("{}", report.format(args.show_files));
    if let Some(answer) = report.final_answer() {
        println!("\n💬 {}", answer);
    }

    if let Some(path) = &args.export {
        report.export_to_path(path)?;
        println!("✓ Results exported to {}", path.display());
    }
    Ok(())
}
