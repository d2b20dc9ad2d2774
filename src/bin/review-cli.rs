use clap::{Args, Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "review-cli")]
#[command(about = "Command-line client for the review service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Sent as the `clientId` header.
    #[arg(short, long)]
    client_id: Option<String>,

    /// Client secret, sent as a bearer token on delete requests.
    #[arg(short, long)]
    secret: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ReviewFields {
    #[arg(long)]
    product: String,
    #[arg(long)]
    rate_code: i32,
    #[arg(long, default_value = "")]
    first_name: String,
    #[arg(long, default_value = "")]
    last_name: String,
    #[arg(long, default_value = "")]
    zip_code: String,
    #[arg(long, default_value = "")]
    comments: String,
}

impl ReviewFields {
    fn to_json(&self) -> Value {
        json!({
            "productName": self.product,
            "firstName": self.first_name,
            "lastName": self.last_name,
            "zipCode": self.zip_code,
            "rateCode": self.rate_code,
            "comments": self.comments,
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List reviews from every collection
    List,
    /// List reviews of one collection
    Collection { name: String },
    /// Show the first N reviews by id
    Latest {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// List reviews with a given rate code
    ByRate { rate_code: i32 },
    /// Submit a review
    Insert(ReviewFields),
    /// Update a review; the previous version goes to its history
    Update {
        id: String,
        #[command(flatten)]
        fields: ReviewFields,
    },
    /// Delete one review (needs --client-id and --secret)
    Delete { id: String },
    /// Delete every review of --client-id (needs --secret)
    DeleteClient,
    /// Provision a client; a blank secret is generated server-side
    NewClient {
        #[arg(default_value = "")]
        secret: String,
    },
    /// Create a collection (the configured one when omitted)
    CreateCollection { name: Option<String> },
    /// Drop a collection
    DropCollection { name: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = format!("{}/reviews", cli.url.trim_end_matches('/'));

    let mut headers = HeaderMap::new();
    if let Some(id) = &cli.client_id {
        headers.insert("clientid", HeaderValue::from_str(id)?);
    }
    if let Some(secret) = &cli.secret {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", secret))?,
        );
    }

    let request = match &cli.command {
        Commands::List => client.get(format!("{}/viewAllReviews", base)),
        Commands::Collection { name } => client.get(format!("{}/viewReviews/{}", base, name)),
        Commands::Latest { limit } => client
            .get(format!("{}/viewLatestReviews", base))
            .query(&[("limit", limit)]),
        Commands::ByRate { rate_code } => client
            .get(format!("{}/viewByRateCode", base))
            .query(&[("rateCode", rate_code)]),
        Commands::Insert(fields) => client
            .post(format!("{}/insertReview", base))
            .json(&fields.to_json()),
        Commands::Update { id, fields } => client
            .put(format!("{}/updateReview/{}", base, id))
            .json(&fields.to_json()),
        Commands::Delete { id } => client.delete(format!("{}/deleteReview/{}", base, id)),
        Commands::DeleteClient => client.delete(format!("{}/deleteReview", base)),
        Commands::NewClient { secret } => client
            .post(format!("{}/newClient", base))
            .body(secret.clone()),
        Commands::CreateCollection { name } => {
            let req = client.post(format!("{}/createCollection", base));
            match name {
                Some(name) => req.query(&[("collectionName", name)]),
                None => req,
            }
        }
        Commands::DropCollection { name } => {
            client.delete(format!("{}/deleteCollection/{}", base, name))
        }
    };

    let res = request.headers(headers).send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        return Err(format!("review service returned status {}", status).into());
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &'static str) -> reqwest::Response {
        axum::http::Response::builder()
            .status(status)
            .body(body)
            .unwrap()
            .into()
    }

    #[tokio::test]
    async fn test_failed_request_is_an_error() {
        let err = print_response(response(404, "No reviews found"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_success_prints_body() {
        assert!(print_response(response(200, "[]")).await.is_ok());
    }
}
