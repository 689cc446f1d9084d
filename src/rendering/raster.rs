//! `wkhtmltoimage`-backed renderer

use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use super::Renderer;
use crate::{Error, RenderSettings, Result};

/// Renders documents by piping them through the `wkhtmltoimage` binary.
///
/// The child process is killed if it does not finish within the timeout.
#[derive(Debug, Clone)]
pub struct WkhtmlRenderer {
    binary: PathBuf,
    timeout_ms: u64,
}

impl WkhtmlRenderer {
    pub fn new(binary: impl Into<PathBuf>, timeout_ms: u64) -> Self {
        Self {
            binary: binary.into(),
            timeout_ms,
        }
    }

    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self::new(settings.binary.clone(), settings.timeout_ms)
    }

    fn command(&self, width: u32) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args([
            "--format",
            "png",
            "--transparent",
            "--enable-local-file-access",
            "--quiet",
            "--width",
        ])
        .arg(width.to_string())
        .args(["-", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
        cmd
    }
}

impl Default for WkhtmlRenderer {
    fn default() -> Self {
        Self::from_settings(&RenderSettings::default())
    }
}

impl Renderer for WkhtmlRenderer {
    fn render_png(&self, html: &str, width: u32) -> Result<Vec<u8>> {
        let mut child = self.command(width).spawn().map_err(|e| {
            Error::RenderError(format!("Failed to launch {}: {}", self.binary.display(), e))
        })?;

        let missing = |name: &str| Error::RenderError(format!("renderer {} not captured", name));
        let mut stdin = child.stdin.take().ok_or_else(|| missing("stdin"))?;
        let mut stdout = child.stdout.take().ok_or_else(|| missing("stdout"))?;
        let mut stderr = child.stderr.take().ok_or_else(|| missing("stderr"))?;

        // Feed and drain on separate threads so a full pipe never deadlocks us.
        let input = html.as_bytes().to_vec();
        let writer = thread::spawn(move || {
            // The renderer may exit before reading everything; its status tells us why.
            let _ = stdin.write_all(&input);
        });
        let reader = thread::spawn(move || {
            let mut buf = Vec::new();
            stdout.read_to_end(&mut buf).map(|_| buf)
        });
        let err_reader = thread::spawn(move || {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf);
            buf
        });

        let deadline = Instant::now() + Duration::from_millis(self.timeout_ms);
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::Timeout(self.timeout_ms));
            }
            thread::sleep(Duration::from_millis(10));
        };

        let _ = writer.join();
        let png = reader
            .join()
            .map_err(|_| Error::RenderError("stdout reader panicked".to_string()))??;
        let diagnostics = err_reader.join().unwrap_or_default();

        if !status.success() {
            return Err(Error::RenderError(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                status,
                diagnostics.trim()
            )));
        }
        if png.is_empty() {
            return Err(Error::RenderError("renderer produced no output".to_string()));
        }

        debug!("rendered {} byte document into {} byte PNG", html.len(), png.len());
        Ok(png)
    }
}
