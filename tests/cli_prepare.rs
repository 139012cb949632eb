use std::fs;
use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

fn write_templates(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("cwl.sh"), "cwltool --outdir PLACEHOLDER_OUTDIR targeted_assembly.cwl PLACEHOLDER_YML\n").unwrap();
    fs::write(dir.join("qsub"), "qsub -P proj -N ta -o PLACEHOLDER_CWL_OUT -e PLACEHOLDER_CWL_ERR PLACEHOLDER_CWL_SH\n").unwrap();
    fs::write(dir.join("targeted_assembly.yml"), "reads1: PLACEHOLDER_READS1\nreads2: PLACEHOLDER_READS2\n").unwrap();
}

#[test]
fn cli_help_smoke() {
    let mut cmd = Command::cargo_bin("gridprep").unwrap();
    cmd.arg("--help");
    cmd.assert().success();
}

#[test]
fn prepare_two_samples() {
    let tmp = TempDir::new().unwrap();
    let templates = tmp.path().join("templates");
    write_templates(&templates);
    fs::write(tmp.path().join("reads.csv"), "a1,a2\nb1,b2\n").unwrap();
    let out = tmp.path().join("out");

    let mut cmd = Command::cargo_bin("gridprep").unwrap();
    let assert = cmd
        .arg("prepare")
        .arg("-c").arg(tmp.path().join("reads.csv"))
        .arg("-i").arg(&templates)
        .arg("-o").arg(&out)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let root = out.to_string_lossy();
    assert_eq!(
        stdout,
        format!("qsub -P proj -N ta -o {root}/cwl.out -e {root}/cwl.err -t 1-2 -tc 15 {root}/cwl.sh\n")
    );

    for id in ["1", "2"] {
        assert!(out.join(id).join("cwl.sh").is_file());
        assert!(out.join(id).join("targeted_assembly.yml").is_file());
    }
    let yml = fs::read_to_string(out.join("2").join("targeted_assembly.yml")).unwrap();
    assert_eq!(yml, "reads1: b1\nreads2: b2\n");

    let master = fs::read_to_string(out.join("cwl.sh")).unwrap();
    assert!(master.starts_with("#!/bin/sh\n"));
    assert!(master.contains("$SGE_TASK_ID/targeted_assembly.yml"));

    let manifest = fs::read_to_string(out.join("preparation_map.csv")).unwrap();
    let lines: Vec<&str> = manifest.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "ID,qsub,reads1,reads2");
    assert!(lines[1].starts_with("1,qsub ") && lines[1].ends_with(",a1,a2"));
    assert!(lines[2].starts_with("2,qsub ") && lines[2].ends_with(",b1,b2"));
}

#[test]
fn prepare_custom_concurrency() {
    let tmp = TempDir::new().unwrap();
    let templates = tmp.path().join("templates");
    write_templates(&templates);
    fs::write(tmp.path().join("reads.csv"), "a1,a2\n").unwrap();

    let mut cmd = Command::cargo_bin("gridprep").unwrap();
    let assert = cmd
        .arg("prepare")
        .arg("-c").arg(tmp.path().join("reads.csv"))
        .arg("-i").arg(&templates)
        .arg("-o").arg(tmp.path().join("out"))
        .arg("--max-concurrent").arg("4")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains(" -t 1-1 -tc 4 "));
}

#[test]
fn prepare_malformed_list_fails_without_output() {
    let tmp = TempDir::new().unwrap();
    let templates = tmp.path().join("templates");
    write_templates(&templates);
    fs::write(tmp.path().join("reads.csv"), "a1,a2\nb1\n").unwrap();
    let out = tmp.path().join("out");

    let mut cmd = Command::cargo_bin("gridprep").unwrap();
    cmd.arg("prepare")
        .arg("-c").arg(tmp.path().join("reads.csv"))
        .arg("-i").arg(&templates)
        .arg("-o").arg(&out)
        .assert()
        .failure();

    assert!(!out.exists());
}

#[test]
fn prepare_missing_template_fails() {
    let tmp = TempDir::new().unwrap();
    let templates = tmp.path().join("templates");
    write_templates(&templates);
    fs::remove_file(templates.join("qsub")).unwrap();
    fs::write(tmp.path().join("reads.csv"), "a1,a2\n").unwrap();

    let mut cmd = Command::cargo_bin("gridprep").unwrap();
    cmd.arg("prepare")
        .arg("-c").arg(tmp.path().join("reads.csv"))
        .arg("-i").arg(&templates)
        .arg("-o").arg(tmp.path().join("out"))
        .assert()
        .failure();
}

#[test]
fn check_reports_tokens() {
    let tmp = TempDir::new().unwrap();
    let templates = tmp.path().join("templates");
    write_templates(&templates);
    fs::write(tmp.path().join("reads.csv"), "a1,a2\nb1,b2\nc1,c2\n").unwrap();

    let mut cmd = Command::cargo_bin("gridprep").unwrap();
    let assert = cmd
        .arg("check")
        .arg("-c").arg(tmp.path().join("reads.csv"))
        .arg("-i").arg(&templates)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let expected = "samples\t3\n\
                    cwl.sh\tPLACEHOLDER_OUTDIR,PLACEHOLDER_YML\n\
                    qsub\tPLACEHOLDER_CWL_OUT,PLACEHOLDER_CWL_ERR,PLACEHOLDER_CWL_SH\n\
                    targeted_assembly.yml\tPLACEHOLDER_READS1,PLACEHOLDER_READS2\n";
    assert_eq!(stdout, expected);
}

#[test]
fn check_fails_on_blank_submit_template() {
    let tmp = TempDir::new().unwrap();
    let templates = tmp.path().join("templates");
    write_templates(&templates);
    fs::write(templates.join("qsub"), "   \n").unwrap();
    fs::write(tmp.path().join("reads.csv"), "a1,a2\n").unwrap();

    let mut cmd = Command::cargo_bin("gridprep").unwrap();
    cmd.arg("check")
        .arg("-c").arg(tmp.path().join("reads.csv"))
        .arg("-i").arg(&templates)
        .assert()
        .failure();
}

#[test]
fn check_fails_on_multi_line_submit_template() {
    let tmp = TempDir::new().unwrap();
    let templates = tmp.path().join("templates");
    write_templates(&templates);
    fs::write(templates.join("qsub"), "qsub -P proj\n-o PLACEHOLDER_CWL_OUT PLACEHOLDER_CWL_SH\n").unwrap();
    fs::write(tmp.path().join("reads.csv"), "a1,a2\n").unwrap();

    let mut cmd = Command::cargo_bin("gridprep").unwrap();
    cmd.arg("check")
        .arg("-c").arg(tmp.path().join("reads.csv"))
        .arg("-i").arg(&templates)
        .assert()
        .failure();
}

#[test]
fn prepare_empty_list_prints_nothing() {
    let tmp = TempDir::new().unwrap();
    let templates = tmp.path().join("templates");
    write_templates(&templates);
    fs::write(tmp.path().join("reads.csv"), "").unwrap();
    let out = tmp.path().join("out");

    let mut cmd = Command::cargo_bin("gridprep").unwrap();
    let assert = cmd
        .arg("prepare")
        .arg("-c").arg(tmp.path().join("reads.csv"))
        .arg("-i").arg(&templates)
        .arg("-o").arg(&out)
        .assert()
        .success();

    assert!(assert.get_output().stdout.is_empty());
    let manifest = fs::read_to_string(out.join("preparation_map.csv")).unwrap();
    assert_eq!(manifest, "ID,qsub,reads1,reads2\n");
}
