// std imports
use std::io::{Error as IoError, ErrorKind, Result as IoResult};
use std::process::Stdio;

// 3rd party imports
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Stream a line of process output was read from
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// One line of process output without the line break
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub stream: OutputStream,
    pub line: String,
}

/// A started process.
///
/// `output` yields the output lines while the process is running and closes
/// once all output is read. `exit` resolves to the exit code.
///
pub struct LaunchedProcess {
    pub output: UnboundedReceiver<OutputLine>,
    pub exit: JoinHandle<IoResult<i32>>,
}

/// Starts external processes for the pipeline runner
///
pub trait ProcessLauncher {
    /// Starts the process, `argv[0]` is the executable
    ///
    /// # Arguments
    /// * `argv` - Command line
    ///
    fn launch(&self, argv: &[String]) -> IoResult<LaunchedProcess>;
}

/// Launches processes with tokio.
/// Stdout and stderr are piped and drained on their own tasks while a third
/// task waits for the process, so a process writing lots of output never blocks
/// on a full pipe.
/// Must be called within a tokio runtime.
///
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessLauncher;

impl ProcessLauncher for SystemProcessLauncher {
    fn launch(&self, argv: &[String]) -> IoResult<LaunchedProcess> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| IoError::new(ErrorKind::InvalidInput, "empty command line"))?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        debug!("Spawned `{}` (pid {:?})", program, child.id());

        let (sender, receiver) = unbounded_channel();
        let stdout_drain = child
            .stdout
            .take()
            .map(|stdout| tokio::spawn(drain(stdout, OutputStream::Stdout, sender.clone())));
        let stderr_drain = child
            .stderr
            .take()
            .map(|stderr| tokio::spawn(drain(stderr, OutputStream::Stderr, sender.clone())));
        drop(sender);

        let exit = tokio::spawn(async move {
            let status = child.wait().await?;
            for drain in [stdout_drain, stderr_drain].into_iter().flatten() {
                if let Err(err) = drain.await {
                    warn!("Output drain task failed: {}", err);
                }
            }
            // killed by a signal
            Ok(status.code().unwrap_or(-1))
        });

        Ok(LaunchedProcess {
            output: receiver,
            exit,
        })
    }
}

/// Reads the stream line by line until EOF and forwards each line.
/// Keeps reading if nobody listens anymore so the process never blocks on the pipe.
///
/// # Arguments
/// * `reader` - Piped stdout or stderr
/// * `stream` - Which stream is read
/// * `sender` - Line sink
///
async fn drain<R>(reader: R, stream: OutputStream, sender: UnboundedSender<OutputLine>)
where
    R: AsyncRead + Unpin,
{
    let mut segments = BufReader::new(reader).split(b'\n');
    loop {
        match segments.next_segment().await {
            Ok(Some(segment)) => {
                let line = String::from_utf8_lossy(&segment)
                    .trim_end_matches('\r')
                    .to_string();
                let _ = sender.send(OutputLine { stream, line });
            }
            Ok(None) => break,
            Err(err) => {
                warn!("Unable to read process output: {}", err);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_launcher_collects_both_streams() {
        let argv: Vec<String> = vec![
            "sh".into(),
            "-c".into(),
            "echo searching; echo 'warning: few spectra' 1>&2; exit 3".into(),
        ];
        let mut process = SystemProcessLauncher.launch(&argv).unwrap();

        let mut lines = Vec::new();
        while let Some(line) = process.output.recv().await {
            lines.push(line);
        }
        let exit_code = process.exit.await.unwrap().unwrap();

        assert_eq!(exit_code, 3);
        assert!(lines.contains(&OutputLine {
            stream: OutputStream::Stdout,
            line: "searching".to_string()
        }));
        assert!(lines.contains(&OutputLine {
            stream: OutputStream::Stderr,
            line: "warning: few spectra".to_string()
        }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_launcher_drains_large_output() {
        let argv: Vec<String> = vec![
            "sh".into(),
            "-c".into(),
            "i=0; while [ $i -lt 20000 ]; do echo line $i 1>&2; i=$((i+1)); done".into(),
        ];
        let mut process = SystemProcessLauncher.launch(&argv).unwrap();
        let exit_code = process.exit.await.unwrap().unwrap();
        assert_eq!(exit_code, 0);

        let mut count = 0;
        while process.output.recv().await.is_some() {
            count += 1;
        }
        assert_eq!(count, 20000);
    }

    #[tokio::test]
    async fn test_launch_failures() {
        assert!(SystemProcessLauncher.launch(&[]).is_err());
        let argv = vec!["/this/tool/does/not/exist".to_string()];
        assert!(SystemProcessLauncher.launch(&argv).is_err());
    }
}
