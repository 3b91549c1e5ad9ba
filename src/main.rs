//! PR Review Harness CLI
//!
//! Bootstraps the action environment from a fixture payload and runs
//! the review action entrypoint against it.

use std::path::PathBuf;

use review_harness::{Bootstrapper, BootstrapConfig, CommandEntrypoint, Scenario};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Parse args (basic for now - will add clap in later phase)
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <pr-number | scenario.yaml> [entrypoint...]", args[0]);
        eprintln!("\nBootstraps the action environment from a fixture payload and");
        eprintln!("invokes the review action entrypoint (default: node lib/src/main.js).");
        eprintln!("\nEnvironment variables:");
        eprintln!("  GITHUB_TOKEN / INPUT_GITHUB_TOKEN  Auth token (primary wins)");
        eprintln!("  OPENAI_API_KEY                     AI API key");
        std::process::exit(1);
    }

    let workspace = std::env::current_dir().expect("failed to get current directory");
    let config = BootstrapConfig::new(workspace);
    let bootstrapper = Bootstrapper::new(config);

    let entrypoint = if args.len() > 2 {
        CommandEntrypoint::new(args[2].clone()).with_args(args[3..].iter().cloned())
    } else {
        CommandEntrypoint::node_main()
    };

    let result = if let Ok(number) = args[1].parse::<u64>() {
        bootstrapper.run(number, &entrypoint).await
    } else {
        let scenario = match Scenario::load(PathBuf::from(&args[1])) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Failed to load scenario: {}", e);
                std::process::exit(1);
            }
        };
        bootstrapper.run_scenario(&scenario, &entrypoint).await
    };

    match result {
        Ok(result) => {
            println!("\n{}", "=".repeat(60));
            println!("Bootstrap Complete: {}", result.run_id);
            println!("{}", "=".repeat(60));
            println!();
            if let Some(number) = result.pr_number {
                println!("PR: #{}", number);
            }
            println!("Repository: {}", result.env.repository);
            println!("Event path: {}", result.env.event_path.display());
            println!("Entrypoint exit: {:?}", result.entrypoint.exit_code);
            println!("Output lines: {}", result.entrypoint.output_lines);
        }
        Err(e) => {
            eprintln!("Bootstrap failed: {}", e);
            std::process::exit(1);
        }
    }
}
