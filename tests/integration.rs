use std::error::Error;
use std::fs;
use std::process::Command;

use assert_cmd::prelude::OutputAssertExt;
use assert_fs::{assert::PathAssert, fixture::PathChild, TempDir};
use escargot::CargoBuild;
use predicates::prelude::predicate;

fn build_nonbdna() -> escargot::CargoRun {
    CargoBuild::new()
        .bin("nonbdna")
        .release()
        .no_default_features()
        .run()
        .expect("failed to build nonbdna")
}

fn write_fasta(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.child(name);
    fs::write(path.path(), contents).unwrap();
    path.path().to_path_buf()
}

/// Runs a G-quadruplex-bearing sequence end to end through the CLI and
/// checks every requested output format was written with the expected
/// header shape.
#[test]
fn test_s1_g4_sequence_produces_all_output_formats() -> Result<(), Box<dyn Error>> {
    let temp_dir = TempDir::new()?.into_persistent_if(std::env::var("TEST_PERSIST").is_ok());
    let run = build_nonbdna();
    let nonbdna = run.path().as_os_str();

    let fasta = write_fasta(
        &temp_dir,
        "g4.fa",
        ">chr1\nGGGTTAGGGTTAGGGTTAGGGAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA\n",
    );
    let out_prefix = temp_dir.child("out");

    Command::new(nonbdna)
        .arg("--fasta")
        .arg(&fasta)
        .arg("--out")
        .arg(out_prefix.path())
        .arg("--classes")
        .arg("g_quadruplex")
        .arg("--workers")
        .arg("1")
        .output()?
        .assert()
        .success();

    temp_dir.child("out.csv").assert(predicate::path::exists());
    temp_dir.child("out.gff3").assert(predicate::path::exists());
    temp_dir.child("out.bed").assert(predicate::path::exists());
    temp_dir
        .child("out.bedgraph")
        .assert(predicate::path::exists());

    let csv = fs::read_to_string(temp_dir.child("out.csv").path())?;
    let header = csv.lines().next().unwrap();
    assert!(header.starts_with("S.No"));
    assert!(header.contains("Sequence_Name"));
    assert!(csv.lines().count() > 1);

    let gff3 = fs::read_to_string(temp_dir.child("out.gff3").path())?;
    assert!(gff3.starts_with("##gff-version 3"));

    Ok(())
}

/// An empty FASTA is a legal, motif-free input (B1): the run must
/// succeed and every format file must still exist, header-only.
#[test]
fn test_b1_empty_fasta_still_succeeds() -> Result<(), Box<dyn Error>> {
    let temp_dir = TempDir::new()?;
    let run = build_nonbdna();
    let nonbdna = run.path().as_os_str();

    let fasta = write_fasta(&temp_dir, "empty.fa", "");
    let out_prefix = temp_dir.child("out");

    Command::new(nonbdna)
        .arg("--fasta")
        .arg(&fasta)
        .arg("--out")
        .arg(out_prefix.path())
        .output()?
        .assert()
        .success();

    temp_dir.child("out.csv").assert(predicate::path::exists());
    let csv = fs::read_to_string(temp_dir.child("out.csv").path())?;
    assert_eq!(csv.lines().count(), 1);

    Ok(())
}

/// R1: running the same input twice (forcing chunking with a tiny
/// `--chunk-size`, then again single-threaded) yields the same sorted
/// candidate set, modulo the row-order-dependent `S.No` column.
#[test]
fn test_r1_chunked_and_single_thread_runs_agree() -> Result<(), Box<dyn Error>> {
    let temp_dir = TempDir::new()?;
    let run = build_nonbdna();
    let nonbdna = run.path().as_os_str();

    let mut seq = String::from(">chr1\n");
    seq.push_str(&"GGGTTAGGGTTAGGGTTAGGG".repeat(5));
    seq.push_str(&"A".repeat(10_000));
    seq.push_str(&"CCCTAACCCTAACCCTAACCC".repeat(5));
    seq.push('\n');
    let fasta = write_fasta(&temp_dir, "seq.fa", &seq);

    let out1 = temp_dir.child("out1");
    Command::new(nonbdna)
        .arg("--fasta")
        .arg(&fasta)
        .arg("--out")
        .arg(out1.path())
        .arg("--chunk-size")
        .arg("3000")
        .arg("--workers")
        .arg("1")
        .output()?
        .assert()
        .success();

    let out2 = temp_dir.child("out2");
    Command::new(nonbdna)
        .arg("--fasta")
        .arg(&fasta)
        .arg("--out")
        .arg(out2.path())
        .arg("--chunk-size")
        .arg("50000")
        .arg("--workers")
        .arg("1")
        .output()?
        .assert()
        .success();

    let csv1 = fs::read_to_string(out1.path().with_extension("csv"))?;
    let csv2 = fs::read_to_string(out2.path().with_extension("csv"))?;
    let strip_serial = |csv: &str| -> Vec<String> {
        csv.lines()
            .skip(1)
            .map(|line| line.splitn(2, ',').nth(1).unwrap_or("").to_string())
            .collect()
    };
    let mut rows1 = strip_serial(&csv1);
    let mut rows2 = strip_serial(&csv2);
    rows1.sort();
    rows2.sort();
    pretty_assertions::assert_eq!(rows1, rows2);

    Ok(())
}

/// Unsupported `--classes` names should fail argument parsing rather
/// than silently no-op.
#[test]
fn test_unknown_class_name_is_rejected() -> Result<(), Box<dyn Error>> {
    let temp_dir = TempDir::new()?;
    let run = build_nonbdna();
    let nonbdna = run.path().as_os_str();

    let fasta = write_fasta(&temp_dir, "seq.fa", ">chr1\nACGT\n");
    Command::new(nonbdna)
        .arg("--fasta")
        .arg(&fasta)
        .arg("--out")
        .arg(temp_dir.child("out").path())
        .arg("--classes")
        .arg("not_a_real_class")
        .output()?
        .assert()
        .failure();

    Ok(())
}
