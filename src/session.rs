//! Line-oriented message loop. Each input line is parsed as JSON and
//! forwarded to the catalog; exactly one JSON line is written per request.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, instrument, warn};

use crate::catalog::Catalog;
use crate::protocol::{ClientMessage, ServerMessage};

/// Serves requests until EOF. Only transport errors end the loop early.
#[instrument(level = "info", skip_all)]
pub async fn run_session<R, W>(mut reader: R, mut writer: W, catalog: &Catalog) -> std::io::Result<()>
where
  R: AsyncBufRead + Unpin,
  W: AsyncWrite + Unpin,
{
  info!(target: "pattern_atlas", "Session started");
  while let Some(incoming) = read_capped_line(&mut reader).await? {
    let reply = match incoming {
      Incoming::Line(line) => {
        let line = line.trim();
        if line.is_empty() {
          continue;
        }
        match serde_json::from_str::<ClientMessage>(line) {
          Ok(msg) => {
            debug!(target: "pattern_atlas", "Session received: {:?}", &msg);
            handle_message(msg, catalog).await
          }
          Err(e) => ServerMessage::Error { message: format!("Invalid JSON: {}", e) },
        }
      }
      Incoming::TooLong(len) => {
        warn!(target: "pattern_atlas", len, "Dropping oversized request line");
        ServerMessage::Error { message: format!("Line too long: {} bytes (max {})", len, MAX_LINE_BYTES) }
      }
    };

    let mut out = serde_json::to_string(&reply).unwrap_or_else(|e| {
      serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
    });
    out.push('\n');

    if let Err(e) = writer.write_all(out.as_bytes()).await {
      error!(target: "pattern_atlas", error = %e, "Session write error");
      return Err(e);
    }
    writer.flush().await?;
  }
  info!(target: "pattern_atlas", "Session ended");
  Ok(())
}

/// Longest request line kept in memory. Anything past it is drained up to the
/// next newline and answered with an error.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

enum Incoming {
  Line(String),
  TooLong(usize),
}

/// Reads one newline-terminated line, buffering at most `MAX_LINE_BYTES + 1`
/// bytes of it. Returns `None` at EOF.
async fn read_capped_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> std::io::Result<Option<Incoming>> {
  let mut buf: Vec<u8> = Vec::new();
  let mut len = 0usize;
  let mut terminated = false;
  loop {
    let chunk = reader.fill_buf().await?;
    if chunk.is_empty() {
      break;
    }
    let (take, done) = match chunk.iter().position(|b| *b == b'\n') {
      Some(i) => (i + 1, true),
      None => (chunk.len(), false),
    };
    let room = (MAX_LINE_BYTES + 1).saturating_sub(buf.len());
    buf.extend_from_slice(&chunk[..take.min(room)]);
    len += take;
    reader.consume(take);
    if done {
      terminated = true;
      break;
    }
  }

  if len == 0 {
    return Ok(None);
  }
  if terminated {
    len -= 1;
  }
  if len > MAX_LINE_BYTES {
    return Ok(Some(Incoming::TooLong(len)));
  }
  buf.truncate(len);
  Ok(Some(Incoming::Line(String::from_utf8_lossy(&buf).into_owned())))
}

#[instrument(level = "debug", skip(catalog))]
async fn handle_message(msg: ClientMessage, catalog: &Catalog) -> ServerMessage {
  match msg {
    ClientMessage::Ping => ServerMessage::Pong,

    ClientMessage::Meta => {
      let info = catalog.snapshot().await.info();
      ServerMessage::Meta {
        source: info.source,
        last_refreshed: info.last_refreshed,
        generation: info.generation,
        problem_count: info.problem_count,
      }
    }

    ClientMessage::Problems => ServerMessage::Problems { problems: catalog.snapshot().await.problems.clone() },

    ClientMessage::Categories => ServerMessage::Categories { categories: catalog.snapshot().await.categories.clone() },

    ClientMessage::Patterns => ServerMessage::Patterns { patterns: catalog.snapshot().await.patterns.clone() },

    ClientMessage::Tutorial => ServerMessage::Tutorial { tutorial: catalog.snapshot().await.tutorial.clone() },

    ClientMessage::Ask { question } => {
      let a = catalog.answer(&question).await;
      info!(target: "catalog", question_len = question.len(), related = a.related_problems.len(), "Question answered");
      ServerMessage::Answer {
        answer: a.answer,
        related_problems: a.related_problems,
        topic_hits: a.topic_hits,
        pattern_hits: a.pattern_hits,
      }
    }

    ClientMessage::Refresh => match catalog.refresh().await {
      Ok(info) => ServerMessage::Refreshed {
        status: "ok",
        source: info.source,
        last_refreshed: info.last_refreshed,
        generation: info.generation,
      },
      Err(e) => {
        warn!(target: "catalog", error = %e, "Refresh failed; keeping previous aggregate");
        ServerMessage::Error { message: format!("Refresh failed: {}", e) }
      }
    },
  }
}
