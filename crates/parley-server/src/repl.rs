//! Line-at-a-time interactive loop over any async reader/writer.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use parley_engine::Relay;

/// Returns true for the words that end a session.
pub fn is_exit_command(line: &str) -> bool {
    let word = line.trim();
    word.eq_ignore_ascii_case("exit") || word.eq_ignore_ascii_case("quit")
}

/// Reads lines from `reader`, relays each, and writes replies to `writer`.
///
/// Ends on `exit`, `quit`, or end of input. Relay errors are printed inline
/// and the loop continues; only I/O errors abort it.
pub async fn run<R, W>(relay: &Relay, mut reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let banner = format!(
        "{} CLI is ready! Type 'exit' to quit.\n\n",
        relay.persona().name
    );
    writer.write_all(banner.as_bytes()).await?;

    let mut line = String::new();
    loop {
        writer.write_all(b"You: ").await?;
        writer.flush().await?;

        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            debug!("End of input");
            writer.write_all(b"\n").await?;
            break;
        }

        let query = line.trim_end_matches(['\r', '\n']);
        if query.trim().is_empty() {
            continue;
        }
        if is_exit_command(query) {
            break;
        }

        let output = match relay.run(query).await {
            Ok(reply) => format!("Agent: {}\n\n", reply.content),
            Err(e) => format!("Error: {}\n\n", e),
        };
        writer.write_all(output.as_bytes()).await?;
    }

    writer.write_all(b"Goodbye!\n").await?;
    writer.flush().await
}
