//! Scoped ownership of one provider subprocess.

use std::collections::{BTreeMap, VecDeque};
use std::io;
use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::tool_registry::domain::StdioTransportConfig;

/// A running provider process and its standard streams.
///
/// On unix the provider leads its own process group, and termination signals
/// go to the whole group so anything it forked goes down with it. The group
/// is killed when the guard is dropped without an explicit
/// [`shutdown`](Self::shutdown) or [`kill`](Self::kill), so no subprocess
/// outlives the call that launched it.
pub(super) struct ProviderProcess {
    child: Child,
    #[cfg(unix)]
    group: Option<i32>,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    stderr: StderrCapture,
    finished: bool,
}

impl ProviderProcess {
    /// Launches the configured command with an already expanded environment.
    pub(super) fn spawn(
        config: &StdioTransportConfig,
        env: &BTreeMap<String, String>,
        stderr_capacity: usize,
    ) -> io::Result<Self> {
        let mut command = Command::new(config.command());
        command
            .args(config.args())
            .envs(env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);
        if let Some(directory) = config.working_directory() {
            command.current_dir(directory);
        }

        let mut child = command.spawn()?;
        #[cfg(unix)]
        let group = child.id().and_then(|raw| i32::try_from(raw).ok());
        let stdin = child.stdin.take();
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("provider stdout not captured"))?;
        let stderr = StderrCapture::start(child.stderr.take(), stderr_capacity);

        Ok(Self {
            child,
            #[cfg(unix)]
            group,
            stdin,
            stdout: BufReader::new(stdout),
            stderr,
            finished: false,
        })
    }

    /// Returns the operating-system process id, if still known.
    pub(super) fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Writes one newline-terminated message and flushes it.
    pub(super) async fn write_line(&mut self, line: &str) -> io::Result<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "provider stdin closed"))?;
        stdin.write_all(line.as_bytes()).await?;
        stdin.write_all(b"\n").await?;
        stdin.flush().await
    }

    /// Reads the next raw output line without its terminator, or `None` at
    /// end of stream. Bytes are not required to be UTF-8.
    pub(super) async fn next_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        if self.stdout.read_until(b'\n', &mut line).await? == 0 {
            return Ok(None);
        }
        if line.last() == Some(&b'\n') {
            line.pop();
        }
        Ok(Some(line))
    }

    /// Returns the most recent error-stream output, lossily decoded.
    pub(super) fn stderr_tail(&self) -> String {
        self.stderr.snapshot()
    }

    /// Gives the error-stream drain up to `limit` to reach end of stream.
    pub(super) async fn settle_stderr(&mut self, limit: Duration) {
        self.stderr.settle(limit).await;
    }

    /// Waits up to `limit` for the process to exit on its own.
    pub(super) async fn exit_status_within(&mut self, limit: Duration) -> Option<ExitStatus> {
        match tokio::time::timeout(limit, self.child.wait()).await {
            Ok(Ok(status)) => Some(status),
            Ok(Err(err)) => {
                debug!(error = %err, "failed to wait for provider exit");
                None
            }
            Err(_) => None,
        }
    }

    /// Closes stdin, asks the process group to terminate, and kills it after
    /// `grace`. Group members left behind by an exited provider are killed.
    pub(super) async fn shutdown(mut self, grace: Duration) {
        drop(self.stdin.take());
        if !matches!(self.child.try_wait(), Ok(Some(_))) {
            self.signal_group(GroupSignal::Terminate);
            if self.exit_status_within(grace).await.is_none() {
                warn!(pid = ?self.id(), "provider ignored termination request; killing");
                self.kill_in_place().await;
            }
        }
        self.signal_group(GroupSignal::Kill);
        self.finish();
    }

    /// Kills the process immediately and reaps it.
    pub(super) async fn kill(mut self) {
        drop(self.stdin.take());
        self.kill_in_place().await;
        self.finish();
    }

    async fn kill_in_place(&mut self) {
        self.signal_group(GroupSignal::Kill);
        if matches!(self.child.try_wait(), Ok(Some(_))) {
            return;
        }
        if let Err(err) = self.child.kill().await {
            debug!(error = %err, "failed to kill provider process");
        }
    }

    #[cfg(unix)]
    fn signal_group(&self, signal: GroupSignal) {
        use nix::errno::Errno;
        use nix::sys::signal::{Signal, killpg};
        use nix::unistd::Pid;

        let Some(group) = self.group else {
            return;
        };
        let signal = match signal {
            GroupSignal::Terminate => Signal::SIGTERM,
            GroupSignal::Kill => Signal::SIGKILL,
        };
        match killpg(Pid::from_raw(group), signal) {
            Ok(()) | Err(Errno::ESRCH) => {}
            Err(err) => debug!(
                group,
                signal = signal.as_str(),
                error = %err,
                "failed to signal provider process group"
            ),
        }
    }

    #[cfg(not(unix))]
    const fn signal_group(&self, _signal: GroupSignal) {}

    fn finish(&mut self) {
        self.finished = true;
        self.stderr.stop();
    }
}

impl Drop for ProviderProcess {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.signal_group(GroupSignal::Kill);
        if let Err(err) = self.child.start_kill() {
            debug!(error = %err, "provider process already gone on drop");
        }
        self.stderr.stop();
    }
}

#[derive(Debug, Clone, Copy)]
enum GroupSignal {
    Terminate,
    Kill,
}

/// Background drain of the error stream into a bounded buffer.
///
/// Draining keeps a chatty provider from blocking on a full pipe; only the
/// most recent `capacity` bytes are retained.
struct StderrCapture {
    buffer: Arc<Mutex<VecDeque<u8>>>,
    task: Option<JoinHandle<()>>,
}

impl StderrCapture {
    fn start(stream: Option<ChildStderr>, capacity: usize) -> Self {
        let buffer = Arc::new(Mutex::new(VecDeque::with_capacity(capacity)));
        let task = stream.map(|mut stderr| {
            let sink = Arc::clone(&buffer);
            tokio::spawn(async move {
                let mut chunk = [0_u8; 1024];
                loop {
                    match stderr.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(read) => {
                            let mut retained = sink.lock().unwrap_or_else(PoisonError::into_inner);
                            retained.extend(chunk.iter().take(read));
                            while retained.len() > capacity {
                                retained.pop_front();
                            }
                        }
                    }
                }
            })
        });
        Self { buffer, task }
    }

    fn snapshot(&self) -> String {
        let retained = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        let bytes: Vec<u8> = retained.iter().copied().collect();
        String::from_utf8_lossy(&bytes).trim().to_owned()
    }

    async fn settle(&mut self, limit: Duration) {
        let Some(task) = self.task.as_mut() else {
            return;
        };
        if tokio::time::timeout(limit, task).await.is_ok() {
            self.task = None;
        }
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
