//! Collaborators backed by the network, the filesystem and child processes.

use avrosynth::{CollaboratorError, FileSource, IdlCompiler, SchemaSource};
use std::io::Write;
use std::process::{Command, Stdio};

/// Fetches `http://` and `https://` locations over HTTP, anything else from
/// the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationSource;

impl LocationSource {
    /// Returns true if `location` is fetched over HTTP.
    #[must_use]
    pub fn is_remote(location: &str) -> bool {
        location.starts_with("http://") || location.starts_with("https://")
    }
}

impl SchemaSource for LocationSource {
    fn fetch(&self, location: &str) -> Result<String, CollaboratorError> {
        if !Self::is_remote(location) {
            return FileSource.fetch(location);
        }
        tracing::debug!("Fetching {}", location);
        let response = ureq::get(location)
            .call()
            .map_err(|e| CollaboratorError::unavailable(location, e))?;
        response
            .into_string()
            .map_err(|e| CollaboratorError::unavailable(location, e))
    }
}

/// Runs an external program with the IDL on stdin and reads the protocol
/// JSON from its stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandIdlCompiler {
    program: String,
    args: Vec<String>,
}

impl CommandIdlCompiler {
    /// Creates a compiler invoking `program` with `args`.
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl IdlCompiler for CommandIdlCompiler {
    fn compile(&self, idl: &str) -> Result<String, CollaboratorError> {
        tracing::debug!("Running {} {}", self.program, self.args.join(" "));
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CollaboratorError::compilation(format!("cannot run {}: {}", self.program, e)))?;

        // The child may fill stdout before it drains stdin.
        let writer = child.stdin.take().map(|mut stdin| {
            let idl = idl.to_owned();
            std::thread::spawn(move || stdin.write_all(idl.as_bytes()))
        });

        let output = child
            .wait_with_output()
            .map_err(|e| CollaboratorError::compilation(format!("{} failed: {}", self.program, e)))?;
        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                // A compiler that exits without reading all input reports its
                // own error below.
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Ok(Err(e)) => {
                    return Err(CollaboratorError::compilation(format!(
                        "writing to {}: {}",
                        self.program, e
                    )));
                }
                Err(_) => {
                    return Err(CollaboratorError::compilation("stdin writer panicked"));
                }
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CollaboratorError::compilation(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        String::from_utf8(output.stdout)
            .map_err(|e| CollaboratorError::compilation(format!("output is not UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_is_remote() {
        assert!(LocationSource::is_remote("https://example.com/a.avpr"));
        assert!(LocationSource::is_remote("http://localhost:8080/s"));
        assert!(!LocationSource::is_remote("schemas/http.avsc"));
    }

    #[test]
    fn test_local_location_reads_file() {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(br#""long""#).expect("Failed to write");
        let path = file.path().to_string_lossy().into_owned();
        assert_eq!(LocationSource.fetch(&path).expect("Failed to fetch"), r#""long""#);
    }

    #[test]
    fn test_missing_local_location() {
        assert!(matches!(
            LocationSource.fetch("/nonexistent/avrosynth/schema.avsc"),
            Err(CollaboratorError::Unavailable { .. })
        ));
    }

    #[test]
    fn test_missing_program() {
        let compiler = CommandIdlCompiler::new("avrosynth-no-such-idl-compiler", Vec::new());
        assert!(matches!(
            compiler.compile("protocol P {}"),
            Err(CollaboratorError::Compilation { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_program_output_is_protocol() {
        let compiler = CommandIdlCompiler::new("cat", Vec::new());
        let text = r#"{"protocol":"P","types":[]}"#;
        assert_eq!(compiler.compile(text).expect("Failed to compile"), text);
    }

    #[cfg(unix)]
    #[test]
    fn test_program_failure() {
        let compiler = CommandIdlCompiler::new("sh", vec!["-c".into(), "echo bad idl >&2; exit 3".into()]);
        let err = compiler.compile("protocol P {}").expect_err("non-zero exit");
        assert!(err.to_string().contains("bad idl"));
    }
}
