use std::fs;
use std::io::Write;
use std::path::PathBuf;

use proptest::prelude::*;
use tempfile::tempdir;
use tracing_subscriber::fmt::MakeWriter;

use super::*;
use crate::logger::writer::RotatingFileWriter;

fn file_config(path: PathBuf, max_size: u64, max_files: usize) -> FileConfig {
    FileConfig {
        enabled: true,
        path,
        append: true,
        format: LogFormat::Json,
        rotation: RotationConfig {
            max_size,
            max_files,
        },
    }
}

#[test]
fn test_defaults_are_valid() {
    assert!(LoggerConfig::default().validate().is_ok());
    assert!(RotationConfig::default().validate().is_ok());
}

#[test]
fn test_no_outputs_fail() {
    let config = LoggerConfig {
        console: ConsoleConfig {
            enabled: false,
            colored: false,
        },
        ..LoggerConfig::default()
    };
    assert!(matches!(config.validate(), Err(LoggerError::Config { .. })));
}

#[test]
fn test_empty_path_fails_when_file_enabled() {
    let mut config = LoggerConfig::default();
    config.file = file_config(PathBuf::new(), 1024, 3);
    assert!(config.validate().is_err());
}

#[test]
fn test_log_format_parse_is_case_insensitive() {
    assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
    assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
    assert!("yaml".parse::<LogFormat>().is_err());
}

#[test]
fn test_writer_creates_parent_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested/deeper/app.log");
    let writer = RotatingFileWriter::new(&file_config(path.clone(), 1024, 2)).unwrap();

    writer.make_writer().write_all(b"hello\n").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    assert!(!writer.is_in_fallback_mode());
}

#[test]
fn test_writer_rotates_when_size_exceeded() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");
    let writer = RotatingFileWriter::new(&file_config(path.clone(), 10, 2)).unwrap();

    writer.make_writer().write_all(b"first-line\n").unwrap();
    writer.make_writer().write_all(b"second-line\n").unwrap();
    writer.make_writer().write_all(b"third-line\n").unwrap();
    writer.make_writer().write_all(b"fourth-line\n").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "fourth-line\n");
    assert_eq!(
        fs::read_to_string(RotatingFileWriter::rotated_path(&path, 1)).unwrap(),
        "third-line\n"
    );
    assert_eq!(
        fs::read_to_string(RotatingFileWriter::rotated_path(&path, 2)).unwrap(),
        "second-line\n"
    );
    assert!(!RotatingFileWriter::rotated_path(&path, 3).exists());
}

#[test]
fn test_writer_truncates_without_append() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");
    fs::write(&path, "stale\n").unwrap();

    let mut config = file_config(path.clone(), 1024, 2);
    config.append = false;
    let writer = RotatingFileWriter::new(&config).unwrap();
    writer.make_writer().write_all(b"fresh\n").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\n");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// The number of files on disk never exceeds `max_files + 1`.
    #[test]
    fn prop_rotation_bounds_file_count(
        lines in proptest::collection::vec("[a-z]{1,40}", 1..60),
        max_size in 16u64..128u64,
        max_files in 1usize..4usize,
    ) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let writer = RotatingFileWriter::new(&file_config(path.clone(), max_size, max_files)).unwrap();

        for line in &lines {
            writer.make_writer().write_all(format!("{}\n", line).as_bytes()).unwrap();
        }

        let count = fs::read_dir(dir.path()).unwrap().count();
        prop_assert!(count <= max_files + 1);
        prop_assert!(path.exists());
    }
}
