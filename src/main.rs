#[tokio::main]
async fn main() {
    if let Err(e) = paper_submission_lib::run().await {
        eprintln!("paper-submission: {e}");
        std::process::exit(1);
    }
}
