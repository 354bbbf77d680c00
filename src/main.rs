use decision_console::config::Config;
use decision_console::decision_client::DecisionClient;
use decision_console::models::ProfileField;
use decision_console::render::{render_dashboard, render_profile};
use decision_console::session::SessionController;
use decision_console::tabs::{ActiveTab, SliderRange};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "\
Commands:
  set <field> <value>     edit a profile field (no range checks)
  slide <field> <value>   edit loan_amnt / person_income within the simulator range
  tab <name>              insight | whatif | trust | governance
  submit                  request a decision now
  show                    redraw the active panel
  profile                 list profile fields
  health                  probe the decision service
  help                    this text
  quit                    leave";

/// A parsed console command.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Set(ProfileField, String),
    Slide(ProfileField, f64),
    Tab(ActiveTab),
    Submit,
    Show,
    Profile,
    Health,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(None);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "set" => {
            let field = parts
                .next()
                .ok_or("usage: set <field> <value>")?
                .parse::<ProfileField>()
                .map_err(|e| e.to_string())?;
            let value = parts.collect::<Vec<_>>().join(" ");
            Command::Set(field, value)
        }
        "slide" => {
            let field = parts
                .next()
                .ok_or("usage: slide <field> <value>")?
                .parse::<ProfileField>()
                .map_err(|e| e.to_string())?;
            let range = SliderRange::for_field(field)
                .ok_or_else(|| format!("{} has no simulator slider", field))?;
            let value = parts
                .next()
                .and_then(|raw| raw.parse::<f64>().ok())
                .ok_or("usage: slide <field> <number>")?;
            Command::Slide(field, range.snap(value))
        }
        "tab" => Command::Tab(
            parts
                .next()
                .ok_or("usage: tab <name>")?
                .parse::<ActiveTab>()
                .map_err(|e| e.to_string())?,
        ),
        "submit" | "scan" => Command::Submit,
        "show" => Command::Show,
        "profile" => Command::Profile,
        "health" => Command::Health,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {} (try `help`)", other)),
    };
    Ok(Some(command))
}

/// Main entry point for the console.
///
/// Loads configuration, builds the decision client and drives the session
/// controller from stdin commands and background events on one task.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so panels on stdout stay readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "decision_console=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    let client = DecisionClient::from_config(&config)?;
    tracing::info!("✓ Decision client initialized: {}", client.base_url());

    let mut session = SessionController::from_config(client, &config);
    let redraw = |session: &SessionController<DecisionClient>| {
        println!(
            "{}",
            render_dashboard(
                session.state(),
                session.active_tab(),
                session.profile(),
                config.audit_filler_rows,
            )
        );
    };

    println!("DECIDE-X command center. Type `help` for commands.");
    redraw(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = match parse_command(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(message) => {
                        eprintln!("{}", message);
                        continue;
                    }
                };

                match command {
                    Command::Set(field, value) => {
                        if session.set_field(field, &value) {
                            println!("simulation scheduled in {:?}", config.debounce);
                        }
                    }
                    Command::Slide(field, value) => {
                        if session.set_field(field, &value.to_string()) {
                            println!("simulation scheduled in {:?}", config.debounce);
                        }
                    }
                    Command::Tab(tab) => {
                        session.set_tab(tab);
                        redraw(&session);
                    }
                    Command::Submit => {
                        session.submit();
                        redraw(&session);
                    }
                    Command::Show => redraw(&session),
                    Command::Profile => print!("{}", render_profile(session.profile())),
                    Command::Health => match session.service().health().await {
                        Ok(status) => println!(
                            "service {} ({})",
                            status.status,
                            status.model.as_deref().unwrap_or("unknown model")
                        ),
                        Err(err) => println!("{}", err.user_message()),
                    },
                    Command::Help => println!("{}", HELP),
                    Command::Quit => break,
                }
            }
            event = session.next_event() => {
                let Some(event) = event else { break };
                if session.handle(event) {
                    redraw(&session);
                }
            }
        }
    }

    tracing::info!("Session {} closed", session.session_id());
    Ok(())
}
