use clap::Parser;
use std::io::{self, BufRead, Write};
use std::process;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use lumo::api::GeminiClient;
use lumo::cli::Args;
use lumo::config::Config;
use lumo::error::LumoError;
use lumo::orchestrator::Orchestrator;
use lumo::tools::{builtin_registry, ToolRegistry};
use lumo::ui;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_directive = if args.verbose { "lumo=debug" } else { "lumo=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            ui::display_error(&e);
            process::exit(1);
        }
    };

    let user_message = if args.message.is_empty() {
        match read_message_from_stdin() {
            Ok(message) => message,
            Err(e) => {
                ui::display_error(&format!("Failed to read input: {}", e));
                process::exit(1);
            }
        }
    } else {
        args.message.join(" ")
    };

    let tools = if config.tools_enabled {
        match builtin_registry(&config.tools) {
            Ok(registry) => registry,
            Err(e) => {
                ui::display_error(&e.to_string());
                process::exit(1);
            }
        }
    } else {
        ToolRegistry::new()
    };

    if config.verbose && !tools.is_empty() {
        let names: Vec<&str> = tools.list().iter().map(|t| t.name.as_str()).collect();
        ui::display_notice(&format!("[lumo] Available tools: {}", names.join(", ")));
    }

    let transport = match GeminiClient::new(
        &config.api_key,
        &config.api_endpoint,
        &config.model,
        config.request_timeout,
    ) {
        Ok(client) => client,
        Err(e) => {
            ui::display_error(&e.to_string());
            process::exit(1);
        }
    };

    if config.verbose {
        ui::display_notice(&format!("[lumo] Using model: {}", config.model));
    }

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    let orchestrator =
        Orchestrator::new(Arc::new(transport)).with_max_rounds(config.max_rounds);

    let result = orchestrator
        .send_chat_message(&cancel, &config.system_prompt, &[], &user_message, &tools)
        .await;

    match result {
        Ok(output) => {
            for answer in &output.answers {
                ui::display_answer(answer);
            }
        }
        Err(e) => {
            if let Some(partial) = e.partial_output() {
                ui::display_partial_answers(&partial.answers);
            }
            ui::display_error(&e.to_string());
            process::exit(1);
        }
    }
}

fn read_message_from_stdin() -> io::Result<String> {
    eprint!("You: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
