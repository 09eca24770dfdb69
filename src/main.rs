use clima_lab::configuration::get_configuration;
use clima_lab::console::{autocomplete, Client, Command};
use clima_lab::gateway::HttpGateway;
use clima_lab::render::{TerminalSink, CATEGORY_PLACEHOLDER};
use futures::stream::{self, StreamExt};
use log::{error, info};
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let _start_connection = Instant::now();
    let configuration = get_configuration()?;
    let gateway = HttpGateway::new(&configuration.api)?;
    let mut client = Client::new(gateway, TerminalSink::stdout(), configuration.display);

    // History goes in before any command is read.
    client.start().await;
    info!(
        "Connected to {} in {:?}",
        configuration.api.base_url(),
        _start_connection.elapsed()
    );
    println!("Comandos: clasificar <temp> | buscar <ciudad> | sugerir <prefijo> | historial | salir");

    let lines = BufReader::new(tokio::io::stdin()).lines();
    let mut commands = Box::pin(stream::unfold(lines, |mut lines| async move {
        match lines.next_line().await {
            Ok(Some(line)) => Some((Command::parse(&line), lines)),
            Ok(None) => None,
            Err(e) => {
                error!("Error reading input: {}", e);
                None
            }
        }
    }));

    while let Some(command) = commands.next().await {
        match command {
            Command::Classify(input) => match client.classify_manual(&input) {
                Ok(panel) => println!(
                    "{} °C -> {} [{:.0}%]",
                    panel.temperature, panel.category, panel.gauge_percent
                ),
                Err(e) => println!("{}", e),
            },
            Command::Search(input) => match client.search_city(&input).await {
                Ok(_) => {
                    if let Some(panel) = client.city_panel() {
                        let category = panel
                            .category
                            .map(|c| c.label())
                            .unwrap_or(CATEGORY_PLACEHOLDER);
                        println!("{} °C ({})", panel.temperature, category);
                        for line in panel.detail.lines() {
                            println!("  {}", line);
                        }
                    }
                }
                Err(e) => println!("{}", e),
            },
            Command::Suggest(prefix) => println!("{}", autocomplete(&prefix).join(", ")),
            Command::History => {
                for entry in client.searched_cities() {
                    println!("{}", entry);
                }
            }
            Command::Quit => break,
            Command::Unknown(line) if line.is_empty() => {}
            Command::Unknown(line) => println!("Comando desconocido: {}", line),
        }
    }

    info!("Session finished");
    Ok(())
}
