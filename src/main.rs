use library_desk::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("library desk error: {err}");
        std::process::exit(1);
    }
}
