use clap::{Parser, Subcommand};
use reqwest::{Method, StatusCode};
use serde_json::{json, Map, Value};

#[derive(Parser)]
#[command(name = "video-cli")]
#[command(about = "Command-line client for the video API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5001")]
    url: String,

    /// Version prefix to talk to.
    #[arg(short, long, default_value = "/hometask_01/api")]
    prefix: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all videos
    List,
    /// Show one video
    Get { id: u64 },
    /// Create a video
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        /// Resolution such as P720; repeat for several
        #[arg(long = "resolution")]
        resolutions: Vec<String>,
    },
    /// Replace the fields of a video
    Update {
        id: u64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long = "resolution")]
        resolutions: Vec<String>,
        #[arg(long)]
        can_be_downloaded: Option<bool>,
        /// Age restriction; pass "none" to clear it
        #[arg(long)]
        min_age: Option<String>,
        #[arg(long)]
        publication_date: Option<String>,
    },
    /// Delete a video
    Delete { id: u64 },
    /// Remove every video and reset ids
    Reset,
    /// Check server health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let api = format!("{}{}", cli.url.trim_end_matches('/'), cli.prefix);

    let (method, url, body) = match cli.command {
        Commands::List => (Method::GET, format!("{}/videos", api), None),
        Commands::Get { id } => (Method::GET, format!("{}/videos/{}", api, id), None),
        Commands::Create { title, author, resolutions } => (
            Method::POST,
            format!("{}/videos", api),
            Some(json!({
                "title": title,
                "author": author,
                "availableResolutions": resolutions,
            })),
        ),
        Commands::Update {
            id,
            title,
            author,
            resolutions,
            can_be_downloaded,
            min_age,
            publication_date,
        } => {
            let mut body = Map::new();
            body.insert("title".into(), json!(title));
            body.insert("author".into(), json!(author));
            body.insert("availableResolutions".into(), json!(resolutions));
            if let Some(flag) = can_be_downloaded {
                body.insert("canBeDownloaded".into(), json!(flag));
            }
            if let Some(age) = min_age {
                let value = match age.as_str() {
                    "none" | "null" => Value::Null,
                    raw => json!(raw.parse::<u64>()?),
                };
                body.insert("minAgeRestriction".into(), value);
            }
            if let Some(date) = publication_date {
                body.insert("publicationDate".into(), json!(date));
            }
            (Method::PUT, format!("{}/videos/{}", api, id), Some(Value::Object(body)))
        }
        Commands::Delete { id } => (Method::DELETE, format!("{}/videos/{}", api, id), None),
        Commands::Reset => (Method::DELETE, format!("{}/testing/all-data", api), None),
        Commands::Health => (
            Method::GET,
            format!("{}/health", cli.url.trim_end_matches('/')),
            None,
        ),
    };

    let mut request = client.request(method, url);
    if let Some(body) = body {
        request = request.json(&body);
    }
    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    if status == StatusCode::NO_CONTENT || text.is_empty() {
        println!("{}", status);
        return Ok(());
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
