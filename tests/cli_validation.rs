mod common;

use std::process::Command;
use tempfile::tempdir;

#[test]
fn split_reports_missing_bucket_list() {
    let d = tempdir().expect("tempdir should be creatable");
    let source = d.path().join("reads.fa");
    common::write_fasta(&source, &[("seq1", "ACGT")]).expect("source should be writable");

    let out = Command::new(env!("CARGO_BIN_EXE_seqbucket"))
        .args([
            "split",
            "-l",
            d.path().join("absent.list").to_str().expect("path should be utf-8"),
            source.to_str().expect("path should be utf-8"),
        ])
        .output()
        .expect("split command should run");

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("failed to read bucket list"), "stderr: {stderr}");
}

#[test]
fn split_fails_on_malformed_list_before_writing_output() {
    let d = tempdir().expect("tempdir should be creatable");
    let list = d.path().join("buckets.list");
    let source = d.path().join("reads.fa");
    common::write_raw(&list, "seq1 bucketA\n").expect("list should be writable");
    common::write_fasta(&source, &[("seq1", "ACGT")]).expect("source should be writable");

    let out = Command::new(env!("CARGO_BIN_EXE_bucketize"))
        .args([
            "-l",
            list.to_str().expect("path should be utf-8"),
            "-o",
            d.path().to_str().expect("path should be utf-8"),
            source.to_str().expect("path should be utf-8"),
        ])
        .output()
        .expect("bucketize command should run");

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("two tab-separated fields"), "stderr: {stderr}");
    assert!(common::fasta_files_in(d.path()).is_empty());
}

#[test]
fn plan_rejects_conflicting_inputs() {
    let d = tempdir().expect("tempdir should be creatable");
    let fasta = d.path().join("reads.fa");
    common::write_fasta(&fasta, &[("r1", "ACGT")]).expect("fasta should be writable");

    let out = Command::new(env!("CARGO_BIN_EXE_seqbucket"))
        .args([
            "plan",
            "-f",
            fasta.to_str().expect("path should be utf-8"),
            "-d",
            fasta.to_str().expect("path should be utf-8"),
        ])
        .output()
        .expect("plan command should run");

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("choose exactly one input"),
        "stderr: {stderr}"
    );
}

#[test]
fn plan_rejects_out_of_range_delta() {
    let d = tempdir().expect("tempdir should be creatable");
    let fasta = d.path().join("reads.fa");
    common::write_fasta(&fasta, &[("r1", "ACGT")]).expect("fasta should be writable");

    let out = Command::new(env!("CARGO_BIN_EXE_alignbucket"))
        .args([
            "-f",
            fasta.to_str().expect("path should be utf-8"),
            "--delta",
            "0",
        ])
        .output()
        .expect("alignbucket command should run");

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("--delta must be in (0, 100]"), "stderr: {stderr}");
}

#[test]
fn plan_then_split_routes_every_record() {
    let d = tempdir().expect("tempdir should be creatable");
    let fasta = d.path().join("reads.fa");
    common::write_fasta(
        &fasta,
        &[("r1", "ACGT"), ("r2", "ACGTAC"), ("r3", "ACGTACGTACGTACGT")],
    )
    .expect("fasta should be writable");

    let plan_out = Command::new(env!("CARGO_BIN_EXE_alignbucket"))
        .args([
            "-f",
            fasta.to_str().expect("path should be utf-8"),
            "-o",
            d.path().to_str().expect("path should be utf-8"),
        ])
        .output()
        .expect("alignbucket command should run");
    assert!(
        plan_out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&plan_out.stderr)
    );
    let list = d.path().join("buckets.list");
    assert!(list.exists());

    let split_out = Command::new(env!("CARGO_BIN_EXE_seqbucket"))
        .args([
            "split",
            "-l",
            list.to_str().expect("path should be utf-8"),
            "-o",
            d.path().to_str().expect("path should be utf-8"),
            fasta.to_str().expect("path should be utf-8"),
        ])
        .output()
        .expect("split command should run");
    assert!(
        split_out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&split_out.stderr)
    );

    let stdout = String::from_utf8_lossy(&split_out.stdout);
    assert!(stdout.contains("total_records\t3"), "stdout: {stdout}");
    assert!(stdout.contains("dropped_records\t0"), "stdout: {stdout}");
    assert!(!common::fasta_files_in(d.path()).is_empty());
}
