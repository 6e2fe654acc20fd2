//! The process list file format.
//!
//! The first line holds the number of processes, every following line one
//! process as `pid, arrival_time, burst_time`:
//!
//! ```text
//! 3
//! 1, 0, 5
//! 2, 1, 3
//! 3, 2, 1
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use scheduler::ProcessSpec;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

fn malformed(line: usize, reason: impl Into<String>) -> InputError {
    InputError::Malformed {
        line,
        reason: reason.into(),
    }
}

/// Parses a process list. Blank lines are skipped.
///
/// A header that disagrees with the number of process lines is only
/// reported as a warning, the process lines are what counts.
pub fn parse_processes(text: &str) -> Result<Vec<ProcessSpec>, InputError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let Some((line, header)) = lines.next() else {
        return Ok(vec![]);
    };
    let expected = header
        .parse::<usize>()
        .map_err(|err| malformed(line, format!("invalid process count {header:?}: {err}")))?;

    let specs = lines
        .map(|(line, content)| parse_line(line, content))
        .collect::<Result<Vec<_>, _>>()?;

    if specs.len() != expected {
        warn!(
            "header announces {} processes, found {}",
            expected,
            specs.len()
        );
    }
    Ok(specs)
}

fn parse_line(line: usize, content: &str) -> Result<ProcessSpec, InputError> {
    let fields = content
        .split(',')
        .map(|field| {
            let field = field.trim();
            field
                .parse::<i64>()
                .map_err(|err| malformed(line, format!("invalid number {field:?}: {err}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    match fields[..] {
        [pid, arrival_time, burst_time] => Ok(ProcessSpec::new(pid, arrival_time, burst_time)),
        _ => Err(malformed(
            line,
            format!("expected `pid, arrival, burst`, found {} fields", fields.len()),
        )),
    }
}

/// Reads and parses a process list file.
pub fn load_processes(path: impl AsRef<Path>) -> Result<Vec<ProcessSpec>, InputError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_processes(&text)
}

/// Writes processes in the format read by [`parse_processes`].
pub fn to_input_format(specs: &[ProcessSpec]) -> String {
    let mut content = format!("{}\n", specs.len());
    for spec in specs {
        content.push_str(&format!(
            "{}, {}, {}\n",
            spec.pid, spec.arrival_time, spec.burst_time
        ));
    }
    content
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse() {
        let specs = parse_processes("3\n1, 0, 5\n2,1,3\n\n  3 , 2 , 1  \n").unwrap();

        assert_eq!(
            specs,
            vec![
                ProcessSpec::new(1, 0, 5),
                ProcessSpec::new(2, 1, 3),
                ProcessSpec::new(3, 2, 1)
            ]
        );
    }

    #[test]
    fn negative_values_are_kept_for_validation() {
        let specs = parse_processes("1\n4, -2, 0\n").unwrap();
        assert_eq!(specs, vec![ProcessSpec::new(4, -2, 0)]);
    }

    #[test]
    fn empty_text() {
        assert!(parse_processes("").unwrap().is_empty());
        assert!(parse_processes("0\n").unwrap().is_empty());
    }

    #[test]
    fn count_mismatch_is_not_an_error() {
        assert_eq!(parse_processes("5\n1, 0, 1\n").unwrap().len(), 1);
    }

    #[test]
    fn malformed_lines() {
        assert!(matches!(
            parse_processes("x\n1, 0, 1\n"),
            Err(InputError::Malformed { line: 1, .. })
        ));
        assert!(matches!(
            parse_processes("2\n1, 0, 1\n2, 3\n"),
            Err(InputError::Malformed { line: 3, .. })
        ));
        assert!(matches!(
            parse_processes("1\n\n1, zero, 1\n"),
            Err(InputError::Malformed { line: 3, .. })
        ));
    }

    #[test]
    fn write_then_load() {
        let specs = vec![ProcessSpec::new(1, 0, 4), ProcessSpec::new(2, 6, 2)];
        let content = to_input_format(&specs);
        assert_eq!(content, "2\n1, 0, 4\n2, 6, 2\n");

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        assert_eq!(load_processes(file.path()).unwrap(), specs);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_processes(dir.path().join("missing")),
            Err(InputError::Io { .. })
        ));
    }
}
