use board_cycle::config::{BoardConfig, Cli, Command};
use board_cycle::utils::error::{BoardError, ErrorSeverity};
use board_cycle::utils::{logger, validation::Validate};
use board_cycle::{BoardAutomator, BoardRepository, TimerPlan};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match BoardConfig::from_file(&cli.config).and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(cli.verbose);
            tracing::error!("Configuration validation failed: {}", e);
            tracing::error!("Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    logger::init_logger(config.log_format(), cli.verbose);
    tracing::info!("Starting board-cycle");
    if cli.verbose {
        tracing::debug!("CLI arguments: {:?}", cli);
    }

    if let Err(e) = run(&cli, &config).await {
        tracing::error!(
            "board-cycle failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(cli: &Cli, config: &BoardConfig) -> Result<(), BoardError> {
    let automator = BoardAutomator::new(config.connect()?, config.schedule()?);

    match &cli.command {
        Command::Resolve { card_id, dry_run } => {
            if *dry_run {
                let card = automator.board().card(card_id).await?;
                for action in automator.plan(&card).await? {
                    println!("{}", serde_json::to_string(&action)?);
                }
            } else {
                let summary = automator.resolve_card_by_id(card_id).await?;
                println!(
                    "✅ Resolved {}: {} items completed, {} moves, {} clones",
                    card_id,
                    summary.completed_items,
                    summary.moves,
                    summary.clones.len()
                );
            }
        }
        Command::ResolveTicked { slot } => {
            let summaries = automator.resolve_ticked_in(*slot).await?;
            println!("✅ Resolved {} ticked cards", summaries.len());
        }
        Command::Rotate => {
            let report = automator.rotate_day().await?;
            println!(
                "✅ Shifted {} lists, pulled {} cards from the future, split {} night cards",
                report.shifted_slots, report.pulled_from_future, report.separated_night
            );
        }
        Command::Rewind => {
            let shifted = automator.rewind_day().await?;
            println!("✅ Shifted {} lists back", shifted);
        }
        Command::MergeNight => {
            automator.merge_night().await?;
            println!("✅ Merged tonight into today");
        }
        Command::MoveFromFuture => {
            let moved = automator.move_from_future().await?;
            println!("✅ Moved {} cards out of the future list", moved);
        }
        Command::SeparateNight => {
            let moved = automator.separate_night().await?;
            println!("✅ Moved {} night cards", moved);
        }
        Command::Locate { date } => {
            let slot = automator.locate_slot(*date).await?;
            println!("{} ({})", slot.name, slot.id);
        }
        Command::Slots => {
            let cycle = automator.cycle().await?;
            for (index, slot) in cycle.slots().iter().enumerate() {
                println!("{:>3}  {:<24} {}", index, slot.name, cycle.role_of(index));
            }
        }
        Command::Webhook { payload, method } => {
            let body = std::fs::read_to_string(payload)?;
            let verdict = automator.handle_webhook(method, &body).await?;
            println!("{:?}", verdict);
        }
        Command::Watch => {
            let plan = TimerPlan {
                offset: automator.schedule().offset,
                merge_night_at: config.merge_night_at()?,
                transition_at: config.transition_at()?,
            };
            board_cycle::app::timers::watch(&automator, plan, config.timers_enabled()).await?;
        }
    }

    Ok(())
}
