use colored::Colorize;
use digger::commands::command_argument_builder;
use digger::handlers::{handle_init, handle_run, init_tracing, print_banner};

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    init_tracing();

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    let result = match chosen_command.subcommand() {
        Some(("init", primary_command)) => handle_init(primary_command, quiet),
        Some(("run", primary_command)) => handle_run(primary_command, quiet).await,
        _ => {
            let _ = command_argument_builder().print_help();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
