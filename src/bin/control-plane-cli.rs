use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "control-plane-cli")]
#[command(about = "Management CLI for the proxy control plane", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:18000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check control-plane health
    Status,
    /// List nodes with a published snapshot
    Nodes,
    /// Dump the current snapshot for a node
    Snapshot { node_id: String },
    /// Fetch one resource type for a node (clusters, routes, listeners)
    Resources { node_id: String, kind: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Status => {
            let res = client.get(format!("{}/healthz", cli.url)).send().await?;
            println!("{} {}", res.status(), res.text().await?);
        }
        Commands::Nodes => {
            let res = client
                .get(format!("{}/v3/discovery/nodes", cli.url))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Snapshot { node_id } => {
            let res = client
                .get(format!("{}/v3/discovery/nodes/{}", cli.url, node_id))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Resources { node_id, kind } => {
            let res = client
                .get(format!(
                    "{}/v3/discovery/nodes/{}/{}",
                    cli.url, node_id, kind
                ))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let body: Value = res.json().await?;
    if !status.is_success() {
        eprintln!("Request failed: {}", status);
    }
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
