#[tokio::main]
async fn main() {
    licensing::start_server().await;
}
