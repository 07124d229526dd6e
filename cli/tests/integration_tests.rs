use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

const BIN: &str = env!("CARGO_BIN_EXE_docopt-codegen");

const CONSOLE: &str = "\
Console.

Usage:
    console motor show [--plain-text]
    console motor cal [left|right] [--iters=<iters>]
    console pid show [--plain-text]

Options:
    -p, --plain-text     Display output as plain text
    -t, --iters=<iters>  Number of iterations [default: 3]
";

/// Helper to create a temp directory that is cleaned up on drop.
struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("docopt_cli_test_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("failed to create temp dir");
        Self { path }
    }

    fn path(&self) -> &PathBuf {
        &self.path
    }

    fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.join(name);
        fs::write(&path, contents).expect("failed to write fixture");
        path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run(args: &[&str]) -> Output {
    Command::new(BIN)
        .args(args)
        .output()
        .expect("failed to run docopt-codegen")
}

fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(BIN)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn docopt-codegen");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("failed to write stdin");
    child.wait_with_output().expect("failed to wait for docopt-codegen")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

#[test]
fn generate_prints_both_artifacts_without_output_name() {
    let dir = TempDir::new("generate_stdout");
    let grammar = dir.write("console.docopt", CONSOLE);

    let output = run(&["generate", grammar.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    assert!(text.starts_with("Module Header\n#ifndef DOCOPT_H\n"));
    assert!(text.contains("\nModule C\n"));
    assert!(text.contains("#include \"docopt.h\""));
    assert!(text.contains("    int plain_text;"));
    assert!(text.contains("    char *iters;"));
    assert!(text.contains("const char motor_usage_pattern[] ="));
    assert!(text.contains("const char pid_help_message[] ="));
}

#[test]
fn generate_reads_grammar_from_stdin() {
    let output = run_with_stdin(&["generate"], CONSOLE);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("{\"cal\", 0}"));
}

#[test]
fn generate_writes_header_and_source() {
    let dir = TempDir::new("generate_files");
    let grammar = dir.write("console.docopt", CONSOLE);
    let base = dir.join("console");

    let output = run(&[
        "generate",
        grammar.to_str().unwrap(),
        "--output-name",
        base.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).starts_with("Wrote '"));

    let header = fs::read_to_string(dir.join("console.h")).unwrap();
    let source = fs::read_to_string(dir.join("console.c")).unwrap();
    assert!(header.starts_with("#ifndef CONSOLE_H\n#define CONSOLE_H\n"));
    assert!(source.contains("#include \"console.h\""));
    assert!(source.ends_with("}\n"));
}

#[test]
fn generate_honours_subcommand_and_line_ending_flags() {
    let output = run_with_stdin(
        &["generate", "--subcommand", "pid", "--line-ending", "lf", "--strip-program-name"],
        CONSOLE,
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    assert!(text.contains("const char pid_usage_pattern[] =\n\"Pid Usage\\n\"\n\"Usage:\\n\"\n\"    pid show [--plain-text]\""));
    assert!(!text.contains("motor_usage_pattern"));
    assert!(!text.contains("\\r\\n"));
}

#[test]
fn generate_reads_config_file() {
    let dir = TempDir::new("generate_config");
    let config = dir.write("codegen.yaml", "subcommands: [motor]\nline_ending: lf\n");

    let output = run_with_stdin(&["generate", "--config", config.to_str().unwrap()], CONSOLE);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    assert!(text.contains("motor_help_message"));
    assert!(!text.contains("pid_help_message"));
    assert!(text.contains("\"Console.\\n\""));
}

#[test]
fn generate_uses_template_module() {
    let dir = TempDir::new("generate_module");
    dir.write("tpl.h", "/* $module */\n$commands\n");
    dir.write("tpl.c", "/* $module */ $elems_n\n");
    let base = dir.join("tpl");

    let output = run_with_stdin(&["generate", "-m", base.to_str().unwrap()], CONSOLE);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "Module Header\n/* DOCOPT_H */\n\n    /* commands */\n    int cal;\n    int left;\n    int motor;\n    int pid;\n    int right;\n    int show;\n\nModule C\n/* docopt */ 6, 0, 2\n\n"
    );
}

#[test]
fn generate_rejects_duplicate_usage_sections() {
    let dir = TempDir::new("generate_duplicate");
    let grammar = dir.write("dup.docopt", "Usage: prog start\n\nUsage: prog stop\n");
    let base = dir.join("dup");

    let output = run(&[
        "generate",
        grammar.to_str().unwrap(),
        "-o",
        base.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("error: grammar error: more than one"));
    assert!(!dir.join("dup.h").exists());
    assert!(!dir.join("dup.c").exists());
}

#[test]
fn generate_reports_missing_input_file() {
    let dir = TempDir::new("generate_missing");
    let missing = dir.join("absent.docopt");

    let output = run(&["generate", missing.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Failed to read"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn generate_strict_fails_on_field_collision() {
    let grammar = "Usage: prog plain-text [--plain-text]\n";

    let lenient = run_with_stdin(&["generate"], grammar);
    assert!(lenient.status.success(), "stderr: {}", stderr(&lenient));

    let strict = run_with_stdin(&["generate", "--strict"], grammar);
    assert_eq!(strict.status.code(), Some(1));
    assert!(stderr(&strict).contains("plain_text"));
}

#[test]
fn generate_without_usage_section_fails() {
    let output = run_with_stdin(&["generate"], "Nothing to see here.\n");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("\"usage:\" (case-insensitive) not found"));
}

// ---------------------------------------------------------------------------
// inspect
// ---------------------------------------------------------------------------

#[test]
fn inspect_prints_json_summary() {
    let output = run_with_stdin(&["inspect"], CONSOLE);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["program"], "console");
    assert_eq!(value["subcommands"], serde_json::json!(["motor", "pid"]));
    assert_eq!(value["leaves"]["commands"].as_array().unwrap().len(), 6);
    assert_eq!(value["leaves"]["options"][0]["value"], "3");
    assert_eq!(value["fragments"].as_array().unwrap().len(), 4);
}

#[test]
fn inspect_table_format() {
    let output = run_with_stdin(&["inspect", "--format", "table"], CONSOLE);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    assert!(text.starts_with("Program: console  Leaves: 8  Options registered: 2\n"));
    assert!(text.contains("  Subcommands: motor, pid\n"));
}

#[test]
fn inspect_rejects_unknown_format() {
    let output = run_with_stdin(&["inspect", "--format", "xml"], CONSOLE);
    assert!(!output.status.success());
}
