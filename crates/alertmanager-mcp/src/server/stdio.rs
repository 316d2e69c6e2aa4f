//! Newline-delimited JSON-RPC over stdin/stdout.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::McpServer;

/// Serve on the process stdin/stdout until EOF or cancellation.
pub async fn serve_stdio(server: Arc<McpServer>, shutdown: CancellationToken) -> std::io::Result<()> {
    serve(server, tokio::io::stdin(), tokio::io::stdout(), shutdown).await
}

/// Serve over any line-oriented reader/writer pair.
///
/// Each request runs on its own task; a single writer task serializes the
/// responses so output lines never interleave. In-flight requests finish
/// before this returns. The loop also stops if the writer fails, returning
/// its error.
pub async fn serve<R, W>(
    server: Arc<McpServer>,
    reader: R,
    mut writer: W,
    shutdown: CancellationToken,
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let mut writer_task = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
        Ok::<_, std::io::Error>(())
    });

    let mut lines = BufReader::new(reader).lines();
    let mut writer_exit = None;
    info!("Serving MCP over stdio");

    loop {
        let line = tokio::select! {
            () = shutdown.cancelled() => {
                debug!("Shutdown requested, closing stdio loop");
                break;
            }
            exit = &mut writer_task => {
                error!("Stdout writer stopped, closing stdio loop");
                writer_exit = Some(exit);
                break;
            }
            line = lines.next_line() => line,
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("Stdin closed");
                break;
            }
            Err(e) => {
                error!(error = %e, "Failed reading stdin");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let server = Arc::clone(&server);
        let tx = tx.clone();
        tokio::spawn(async move {
            let Some(response) = server.handle_payload(&line).await else {
                return;
            };
            match serde_json::to_string(&response) {
                Ok(encoded) => {
                    if tx.send(encoded).is_err() {
                        warn!("Response dropped: stdout writer has stopped");
                    }
                }
                Err(e) => error!(error = %e, "Failed to encode response"),
            }
        });
    }

    // writer drains once every request task has dropped its sender
    drop(tx);
    let exit = match writer_exit {
        Some(exit) => exit,
        None => writer_task.await,
    };
    exit.map_err(std::io::Error::other)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::AlertmanagerClient;
    use crate::tools::ToolRegistry;
    use crate::transport::ReqwestTransport;
    use serde_json::Value;
    use tokio::io::{duplex, AsyncReadExt};

    fn server() -> Arc<McpServer> {
        let transport = ReqwestTransport::new("http://127.0.0.1:9").unwrap();
        Arc::new(McpServer::new(ToolRegistry::new(
            AlertmanagerClient::from_transport(Arc::new(transport)),
        )))
    }

    #[tokio::test]
    async fn answers_requests_and_skips_notifications() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#,
            "\n",
        );
        let (out_writer, mut out_reader) = duplex(64 * 1024);

        serve(server(), input.as_bytes(), out_writer, CancellationToken::new())
            .await
            .unwrap();

        let mut output = String::new();
        out_reader.read_to_string(&mut output).await.unwrap();

        let mut ids: Vec<i64> = output
            .lines()
            .map(|line| serde_json::from_str::<Value>(line).unwrap()["id"].as_i64().unwrap())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn writer_failure_stops_the_loop() {
        let (mut client_end, reader) = duplex(1024);
        let (out_writer, out_reader) = duplex(1024);
        drop(out_reader);

        client_end
            .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n")
            .await
            .unwrap();

        let result = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            serve(server(), reader, out_writer, CancellationToken::new()),
        )
        .await
        .expect("loop kept reading after stdout closed");

        assert!(result.is_err());
        drop(client_end);
    }

    #[tokio::test]
    async fn cancellation_stops_the_loop() {
        let (_client_end, reader) = duplex(1024);
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        serve(server(), reader, tokio::io::sink(), shutdown).await.unwrap();
    }
}
