use clap::Parser;
use licensing::adapter::to_display;

mod client;

use client::VerifyClient;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Free-text license query, e.g. "OCM-001" or a business name
    query: String,

    #[arg(long, default_value = "http://localhost:1111")]
    url: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let verifier = VerifyClient::new(args.url);

    match verifier.verify(&args.query).await {
        Ok(Some(result)) => match to_display(&result) {
            Some(license) => {
                println!("License:  {}", license.license_number);
                println!("Company:  {}", license.company_name);
                println!("Holder:   {}", license.license_holder);
                println!("Type:     {}", license.license_type);
                println!("City:     {}, {}", license.city, license.state);
                println!("Address:  {}", license.address);
            }
            None => {
                println!("Not found.");

                if let Some(suggestion) = result.suggestion {
                    println!("Suggestion: {suggestion}");
                }
            }
        },
        Ok(None) => println!("Superseded by a newer lookup."),
        Err(e) => println!("{e}"),
    }
}
