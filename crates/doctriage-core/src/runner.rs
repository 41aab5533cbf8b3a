//! Build execution and live log capture.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Instant;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::info;

use crate::config::RunConfig;
use crate::error::{DoctriageError, Result};

/// Outcome of one build invocation.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// Path of the captured log.
    pub log_path: PathBuf,

    /// Exit code reported by the build command (-1 when killed by signal).
    /// Recorded for the run summary only; failure classification never
    /// consults it, because the wrapped tool exits 0 even when individual
    /// notebook executions failed.
    pub exit_code: i32,

    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Runs the documentation build and tees its output.
pub struct BuildRunner;

impl BuildRunner {
    /// Invoke `<make-binary> <book-dir>` with stdout and stderr piped,
    /// streaming every line to the console and appending it to
    /// `<book-dir>/build.log`.
    ///
    /// The log file is created (truncating any previous run) before the
    /// child is spawned, so it exists even when the spawn fails or the
    /// build produces no output.
    pub async fn run(config: &RunConfig) -> Result<BuildOutcome> {
        let start = Instant::now();
        let log_path = config.log_path();

        let log_file = tokio::fs::File::create(&log_path).await?;
        let log = Arc::new(Mutex::new(log_file));

        info!(
            event = "build.started",
            binary = %config.make_binary,
            target = %config.book_dir,
            log = %log_path.display(),
        );

        let mut child = Command::new(&config.make_binary)
            .arg(&config.book_dir)
            .current_dir(&config.repo_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| DoctriageError::BuildSpawn {
                command: config.make_binary.clone(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io_other("build stdout was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| io_other("build stderr was not captured"))?;

        let out_task = tokio::spawn(tee_stream(stdout, Arc::clone(&log), false));
        let err_task = tokio::spawn(tee_stream(stderr, Arc::clone(&log), true));

        let status = child.wait().await?;
        out_task.await.map_err(|e| io_other(&e.to_string()))??;
        err_task.await.map_err(|e| io_other(&e.to_string()))??;
        log.lock().await.flush().await?;

        let exit_code = status.code().unwrap_or(-1);
        let duration_ms = start.elapsed().as_millis() as u64;

        info!(
            event = "build.finished",
            exit_code = exit_code,
            duration_ms = duration_ms,
        );

        Ok(BuildOutcome {
            log_path,
            exit_code,
            duration_ms,
        })
    }
}

fn io_other(message: &str) -> DoctriageError {
    DoctriageError::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        message.to_string(),
    ))
}

/// Copy one child stream line-by-line to the console and the shared log.
async fn tee_stream<R>(
    stream: R,
    log: Arc<Mutex<tokio::fs::File>>,
    to_stderr: bool,
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(stream).lines();
    while let Some(line) = lines.next_line().await? {
        if to_stderr {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
        let mut file = log.lock().await;
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
    }
    Ok(())
}
