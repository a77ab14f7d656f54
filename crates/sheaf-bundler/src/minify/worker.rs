//! Worker side of the minify protocol.
//!
//! `sheaf minify-worker` calls [`serve_stdio`]. The loop reads one
//! [`WorkerRequest`] per line, runs it, and answers with one
//! [`WorkerResponse`]. It exits cleanly when stdin closes.

use super::inline::execute;
use super::protocol::{WorkerRequest, WorkerResponse};
use crate::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

/// Serve requests from `reader` until EOF, writing responses to `writer`.
///
/// Returns the number of requests handled. A request that fails to execute
/// is answered with [`WorkerResponse::Failed`] and the loop continues; only
/// I/O on the channel itself ends the loop with an error.
pub async fn serve<R, W>(reader: R, mut writer: W) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<WorkerRequest>(&line) {
            Ok(request) => {
                debug!(request = %request.describe(), "Worker request");
                let result = tokio::task::spawn_blocking(move || execute(&request))
                    .await
                    .map_err(crate::Error::from_join)
                    .and_then(|r| r);
                match result {
                    Ok(()) => WorkerResponse::Done,
                    Err(e) => WorkerResponse::Failed {
                        message: e.to_string(),
                    },
                }
            }
            Err(e) => {
                warn!(error = %e, "Malformed worker request");
                WorkerResponse::Failed {
                    message: format!("malformed request: {}", e),
                }
            }
        };

        let mut encoded = serde_json::to_string(&response)
            .map_err(|e| crate::Error::Worker(format!("cannot encode response: {}", e)))?;
        encoded.push('\n');
        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
        handled += 1;
    }

    Ok(handled)
}

/// Serve on the process's stdin and stdout.
pub async fn serve_stdio() -> Result<usize> {
    serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}
