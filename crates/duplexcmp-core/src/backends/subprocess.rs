use super::{Backend, BackendError};
use crate::core::io::fasta::SequenceArtifact;
use crate::core::models::{DuplexResult, ReactionConditions, SequencePair};
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tracing::debug;

/// Wall-clock limit for one oracle invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// 0-indexed positions in the oracle's first output line. Fields 0-1 are
// positional/identifying metadata and are not consumed. Positional parsing
// with no schema check mirrors the oracles' actual output contract; a field
// reorder upstream would misparse silently.
const DG_FIELD: usize = 2;
const TM_FIELD: usize = 3;

/// Adapter over an external calculation binary.
///
/// The invocation materializes the primer sequence as two transient FASTA
/// artifacts (the same sequence fills both the `--file` and `--patterns`
/// roles), runs the binary with a fixed flag set and a zero match-reporting
/// threshold so every candidate alignment is reported, and parses the first
/// line of standard output as tab-separated fields. The binaries never emit
/// ΔH/ΔS, so those fields stay absent rather than fabricated.
pub struct SubprocessBackend {
    label: String,
    binary: PathBuf,
    timeout: Duration,
}

impl SubprocessBackend {
    pub fn new(label: impl Into<String>, binary: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            binary: binary.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the invocation timeout. Production rosters keep
    /// [`DEFAULT_TIMEOUT`]; tests shrink it.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Backend for SubprocessBackend {
    fn label(&self) -> &str {
        &self.label
    }

    fn invoke(
        &self,
        pair: &SequencePair,
        conditions: &ReactionConditions,
    ) -> Result<DuplexResult, BackendError> {
        // Scoped guards: both artifacts are deleted whenever this function
        // returns, including the timeout and parse-failure paths.
        let seq_file = SequenceArtifact::materialize("test", &pair.primer)?;
        let pattern_file = SequenceArtifact::materialize("pattern", &pair.primer)?;

        let mut command = Command::new(&self.binary);
        command
            .arg("--file")
            .arg(seq_file.path())
            .arg("--patterns")
            .arg(pattern_file.path())
            .arg("--na")
            .arg(conditions.monovalent_mm.to_string())
            .arg("--mg")
            .arg(conditions.divalent_mm.to_string())
            .arg("--dntp")
            .arg(conditions.dntp_mm.to_string())
            .arg("--dnac")
            .arg(conditions.dna_nm.to_string())
            .arg("--temp")
            .arg(conditions.temperature_c.to_string())
            .arg("--threshold")
            .arg("0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(backend = %self.label, binary = %self.binary.display(), "invoking oracle");

        let mut child = command.spawn().map_err(|e| BackendError::Invocation {
            detail: format!("failed to spawn {}: {e}", self.binary.display()),
        })?;

        let status = wait_with_deadline(&mut child, self.timeout)?;

        let stdout = drain_pipe(child.stdout.take())?;
        let stderr = drain_pipe(child.stderr.take())?;

        if !status.success() {
            return Err(BackendError::Invocation {
                detail: format!(
                    "{} exited with {status}: {}",
                    self.binary.display(),
                    stderr.trim()
                ),
            });
        }

        parse_first_line(&stdout)
    }
}

/// Polls the child until it exits or the deadline passes; on expiry the
/// child is killed and reaped before the timeout is reported.
fn wait_with_deadline(child: &mut Child, limit: Duration) -> Result<ExitStatus, BackendError> {
    let started = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {}
            Err(e) => {
                terminate_and_reap(child);
                return Err(BackendError::Io(e));
            }
        }
        if started.elapsed() >= limit {
            terminate_and_reap(child);
            return Err(BackendError::Timeout { limit });
        }
        std::thread::sleep(Duration::from_millis(10));
    }
}

fn terminate_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn drain_pipe(pipe: Option<impl Read>) -> Result<String, BackendError> {
    let mut buf = Vec::new();
    if let Some(mut reader) = pipe {
        reader.read_to_end(&mut buf)?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Consumes only the first tab-separated line of oracle output: field 2 is
/// ΔG (kcal/mol), field 3 is Tm (°C).
fn parse_first_line(stdout: &str) -> Result<DuplexResult, BackendError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(stdout.as_bytes());

    let mut record = csv::StringRecord::new();
    let got_record = reader
        .read_record(&mut record)
        .map_err(|e| BackendError::OutputParse {
            detail: format!("output is not tab-separated text: {e}"),
        })?;
    if !got_record {
        return Err(BackendError::OutputParse {
            detail: "oracle produced no output".into(),
        });
    }
    if record.len() <= TM_FIELD {
        return Err(BackendError::OutputParse {
            detail: format!(
                "expected at least {} tab-separated fields, got {}",
                TM_FIELD + 1,
                record.len()
            ),
        });
    }

    let dg = numeric_field(&record, DG_FIELD)?;
    let tm = numeric_field(&record, TM_FIELD)?;

    Ok(DuplexResult {
        dg,
        tm,
        dh: None,
        ds: None,
    })
}

fn numeric_field(record: &csv::StringRecord, index: usize) -> Result<f64, BackendError> {
    let raw = &record[index];
    raw.parse::<f64>().map_err(|_| BackendError::OutputParse {
        detail: format!("field {index} is not numeric: '{raw}'"),
    })
}

#[cfg(all(test, unix))]
mod subprocess_tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::TempDir;

    fn script_oracle(dir: &Path, body: &str) -> SubprocessBackend {
        let path = dir.join("oracle.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n"))
            .expect("oracle script should be writable");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("oracle script should be executable");
        SubprocessBackend::new("fake-oracle", path)
    }

    fn pair() -> SequencePair {
        SequencePair::new("GCGCGCGCGC", "GCGCGCGCGC")
    }

    #[test]
    fn parses_fields_two_and_three_of_the_first_line() {
        let dir = TempDir::new().expect("temp dir should be creatable");
        let backend = script_oracle(
            dir.path(),
            r"printf 'hit\t0\t-9.87\t45.6\textra\nsecond\t1\t0\t0\n'",
        );
        let result = backend
            .invoke(&pair(), &ReactionConditions::baseline())
            .expect("well-formed oracle output should parse");
        assert_eq!(result.dg, -9.87);
        assert_eq!(result.tm, 45.6);
    }

    #[test]
    fn dh_and_ds_are_always_absent() {
        let dir = TempDir::new().expect("temp dir should be creatable");
        let backend = script_oracle(dir.path(), r"printf 'a\tb\t-1.5\t30.0\n'");
        let result = backend
            .invoke(&pair(), &ReactionConditions::baseline())
            .expect("well-formed oracle output should parse");
        assert!(result.dh.is_none());
        assert!(result.ds.is_none());
    }

    #[test]
    fn passes_the_fixed_flag_set_with_zero_threshold() {
        let dir = TempDir::new().expect("temp dir should be creatable");
        let backend = script_oracle(dir.path(), r#"echo "$@" >&2; exit 9"#);
        let err = backend
            .invoke(&pair(), &ReactionConditions::baseline())
            .expect_err("exit 9 should be a failure");
        let detail = err.to_string();
        assert!(detail.contains("--na 50 --mg 1.5 --dntp 0.6 --dnac 50 --temp 37 --threshold 0"));
    }

    #[test]
    fn writes_the_primer_into_both_artifact_roles() {
        let dir = TempDir::new().expect("temp dir should be creatable");
        let backend = script_oracle(dir.path(), r#"cat "$2" "$4" >&2; exit 7"#);
        let err = backend
            .invoke(
                &SequencePair::new("ATGCATGC", "TTTTTTTT"),
                &ReactionConditions::baseline(),
            )
            .expect_err("exit 7 should be a failure");
        let detail = err.to_string();
        assert_eq!(detail.matches("ATGCATGC").count(), 2);
        assert!(!detail.contains("TTTTTTTT"));
    }

    #[test]
    fn nonzero_exit_surfaces_captured_stderr() {
        let dir = TempDir::new().expect("temp dir should be creatable");
        let backend = script_oracle(dir.path(), "echo boom >&2; exit 3");
        let err = backend
            .invoke(&pair(), &ReactionConditions::baseline())
            .expect_err("non-zero exit should be a failure");
        assert!(matches!(err, BackendError::Invocation { .. }));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn too_few_fields_is_a_parse_failure_not_a_record() {
        let dir = TempDir::new().expect("temp dir should be creatable");
        let backend = script_oracle(dir.path(), "echo nonsense");
        let err = backend
            .invoke(&pair(), &ReactionConditions::baseline())
            .expect_err("a one-field line must not parse");
        assert!(matches!(err, BackendError::OutputParse { .. }));
    }

    #[test]
    fn non_numeric_field_is_a_parse_failure() {
        let dir = TempDir::new().expect("temp dir should be creatable");
        let backend = script_oracle(dir.path(), r"printf 'a\tb\tnot-a-number\t45.6\n'");
        let err = backend
            .invoke(&pair(), &ReactionConditions::baseline())
            .expect_err("a non-numeric ΔG field must not parse");
        assert!(matches!(err, BackendError::OutputParse { .. }));
        assert!(err.to_string().contains("not-a-number"));
    }

    #[test]
    fn empty_output_is_a_parse_failure() {
        let dir = TempDir::new().expect("temp dir should be creatable");
        let backend = script_oracle(dir.path(), ":");
        let err = backend
            .invoke(&pair(), &ReactionConditions::baseline())
            .expect_err("empty output must not parse");
        assert!(matches!(err, BackendError::OutputParse { .. }));
    }

    #[test]
    fn hung_oracle_is_killed_and_reported_as_timeout() {
        let dir = TempDir::new().expect("temp dir should be creatable");
        let backend = script_oracle(dir.path(), "sleep 30").with_timeout(Duration::from_millis(100));
        let started = Instant::now();
        let err = backend
            .invoke(&pair(), &ReactionConditions::baseline())
            .expect_err("a hung oracle should time out");
        assert!(matches!(err, BackendError::Timeout { .. }));
        assert!(
            started.elapsed() < Duration::from_secs(5),
            "timeout must not wait for the oracle to finish"
        );
    }

    #[test]
    fn missing_binary_is_an_invocation_failure() {
        let backend = SubprocessBackend::new("gone", "/nonexistent/duplexcmp-oracle");
        let err = backend
            .invoke(&pair(), &ReactionConditions::baseline())
            .expect_err("a missing binary should fail");
        assert!(matches!(err, BackendError::Invocation { .. }));
    }

    #[test]
    fn identical_input_yields_identical_result() {
        let dir = TempDir::new().expect("temp dir should be creatable");
        let backend = script_oracle(dir.path(), r"printf 'a\tb\t-7.77\t52.1\n'");
        let conditions = ReactionConditions::baseline();
        let first = backend
            .invoke(&pair(), &conditions)
            .expect("first invocation should succeed");
        let second = backend
            .invoke(&pair(), &conditions)
            .expect("second invocation should succeed");
        assert_eq!(first, second);
    }
}
