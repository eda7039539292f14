#![cfg(all(unix, feature = "cli"))]

use std::path::PathBuf;
use std::process::{Command, Output};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "spcli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn streamprims(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_streamprims"))
        .args(["--log-level", "error"])
        .args(args)
        .output()
        .expect("streamprims should run")
}

fn path_arg(path: &std::path::Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

#[test]
fn info_reports_regular_file_properties() {
    let dir = unique_temp_dir("info");
    let file = dir.join("data.bin");
    std::fs::write(&file, b"0123456789").unwrap();

    let output = streamprims(&["--format", "json", "info", path_arg(&file)]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["kind"], "stdio");
    assert_eq!(report["size"], 10);
    assert_eq!(report["regular_file"], true);
    assert_eq!(report["autoclose"], true);
    assert!(report["fd"].is_number());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn cat_writes_file_bytes_verbatim() {
    let dir = unique_temp_dir("cat");
    let file = dir.join("blob.bin");
    let payload: Vec<u8> = (0..=255u8).cycle().take(3000).collect();
    std::fs::write(&file, &payload).unwrap();

    let output = streamprims(&["cat", path_arg(&file)]);
    assert!(output.status.success());
    assert_eq!(output.stdout, payload);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn copy_duplicates_file_and_reports_bytes() {
    let dir = unique_temp_dir("copy");
    let src = dir.join("src.bin");
    let dst = dir.join("dst.bin");
    let payload = vec![0x5Au8; 4099];
    std::fs::write(&src, &payload).unwrap();

    let output = streamprims(&[
        "--format",
        "json",
        "copy",
        path_arg(&src),
        path_arg(&dst),
        "--chunk-size",
        "100",
    ]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["bytes"], 4099);
    assert_eq!(report["chunk_size"], 100);
    assert_eq!(std::fs::read(&dst).unwrap(), payload);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn dump_decodes_big_endian_signed_values() {
    let dir = unique_temp_dir("dump");
    let file = dir.join("words.bin");
    std::fs::write(&file, [0xAA, 0x00, 0x01, 0xFF, 0xFE, 0x12]).unwrap();

    let output = streamprims(&[
        "--format",
        "json",
        "dump",
        path_arg(&file),
        "--width",
        "16",
        "--endian",
        "be",
        "--signed",
        "--offset",
        "1",
    ]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["width"], 16);
    assert_eq!(report["endian"], "be");
    let values = report["values"].as_array().unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values[0]["offset"], 1);
    assert_eq!(values[0]["value"], 1);
    assert_eq!(values[1]["offset"], 3);
    assert_eq!(values[1]["value"], -2);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn dump_respects_count_in_raw_format() {
    let dir = unique_temp_dir("dumpcount");
    let file = dir.join("bytes.bin");
    std::fs::write(&file, [1, 2, 3, 4, 5]).unwrap();

    let output = streamprims(&["--format", "raw", "dump", path_arg(&file), "--count", "3"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "1\n2\n3\n");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_file_exits_not_found() {
    let dir = unique_temp_dir("missing");
    let missing = dir.join("absent.bin");

    let output = streamprims(&["cat", path_arg(&missing)]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("couldn't open"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn directory_is_rejected_as_data_invalid() {
    let dir = unique_temp_dir("dir");

    let output = streamprims(&["info", path_arg(&dir)]);
    assert_eq!(output.status.code(), Some(60));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn version_prints_package_version() {
    let output = streamprims(&["version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        format!("streamprims {}", env!("CARGO_PKG_VERSION"))
    );

    let output = streamprims(&["version", "--extended"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("build_target:"));
}
