use anyhow::Context;
use clap::Parser;
use groupctl::utils::error::{ControllerError, ErrorCategory};
use groupctl::utils::{logger, validation::Validate};
use groupctl::{load_group, CliConfig, Controller, HttpFleetClient, LocalFileSystem, UnitStatus, Verb};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting groupctl");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        fail(&e);
    }

    let settings = match config.settings() {
        Ok(settings) => settings,
        Err(e) => fail(&e),
    };
    tracing::debug!("Effective settings: {:?}", settings);

    let fleet = HttpFleetClient::new(&settings.fleet_settings())
        .with_context(|| format!("cannot create fleet client for {}", settings.fleet_endpoint))?;
    let controller = Controller::new(fleet);
    let fs = LocalFileSystem::new(settings.groups_dir.clone());

    let verb = config.command.verb();
    let request = match load_group(&fs, &config.command.request()).await {
        Ok(request) => request,
        Err(e) => fail(&e),
    };
    tracing::info!(
        "Loaded {} units from group '{}'",
        request.units.len(),
        request.group
    );

    match controller.run(verb, &request).await {
        Ok(statuses) if verb == Verb::GetStatus => print_statuses(&statuses),
        Ok(_) => println!("✅ {} finished for group '{}'", verb, request.group),
        Err(e) => fail(&e),
    }

    Ok(())
}

fn print_statuses(statuses: &[UnitStatus]) {
    println!("{:<32} {:<10} {:<10} MACHINE", "UNIT", "CURRENT", "DESIRED");
    for status in statuses {
        println!(
            "{:<32} {:<10} {:<10} {}",
            status.name, status.current_state, status.desired_state, status.machine_id
        );
        for machine in &status.machines {
            let marker = if machine.is_running() { "●" } else { "○" };
            println!(
                "  └ {} {} {}/{}/{}",
                marker,
                machine.machine_id,
                machine.load_state,
                machine.active_state,
                machine.sub_state
            );
        }
    }
}

fn fail(e: &ControllerError) -> ! {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.category() {
        ErrorCategory::Scheduler => 1,
        ErrorCategory::Configuration => 2,
        ErrorCategory::FileSystem => 3,
    };
    std::process::exit(exit_code);
}
