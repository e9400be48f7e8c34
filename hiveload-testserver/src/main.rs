use std::net::SocketAddr;

use tokio::net::TcpListener;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let mut bind_addr: SocketAddr = "127.0.0.1:8080".parse()?;
    let mut max_user_id = hiveload_testserver::DEFAULT_MAX_USER_ID;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--bind" => {
                let addr = args.next().ok_or_else(|| {
                    anyhow::anyhow!("--bind requires an address, e.g. 127.0.0.1:8080")
                })?;
                bind_addr = addr.parse()?;
            }
            "--max-user-id" => {
                let raw = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--max-user-id requires a number"))?;
                max_user_id = raw.parse()?;
            }
            "-h" | "--help" => {
                eprintln!(
                    "hiveload-testserver\n\nUSAGE:\n  hiveload-testserver [--bind 127.0.0.1:8080] [--max-user-id 1000000]\n\nOUTPUT:\n  Prints HTTP_URL=<url> to stdout once ready."
                );
                return Ok(());
            }
            other => {
                return Err(anyhow::anyhow!("unknown argument: {other}"));
            }
        }
    }

    let listener = TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;

    let stats = hiveload_testserver::TestServerStats::default();
    let app = hiveload_testserver::router(stats, max_user_id);

    println!("HTTP_URL=http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
