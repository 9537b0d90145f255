use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn kbseed_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("kbseed");
    path
}

fn doc(title: &str, source_id: &str, sections: &[&str]) -> String {
    let mut text = format!(
        "---\ntitle: \"{title}\"\ncategory: \"recovery\"\ntags: [\"sleep\", \"recovery\"]\nsport: \"running\"\ndifficulty: \"beginner\"\nsource_id: \"{source_id}\"\n---\n\n# {title}\n\n",
    );
    for section in sections {
        text.push_str(&format!("## {section}\n\nContent for {section}.\n\n"));
    }
    text
}

/// Two documents (3 + 1 sections) plus distractors that must be skipped.
fn setup_knowledge_tree() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("knowledge");

    let recovery = root.join("recovery");
    fs::create_dir_all(&recovery).unwrap();

    fs::write(
        recovery.join("sleep.md"),
        doc(
            "Sleep and Recovery",
            "recovery/sleep-and-recovery",
            &["Sleep as the Primary Recovery Mechanism", "Sleep Hygiene", "Key Takeaways"],
        ),
    )
    .unwrap();
    fs::write(
        root.join("hydration.md"),
        doc("Hydration Basics", "nutrition/hydration-basics", &["Why It Matters"]),
    )
    .unwrap();
    fs::write(root.join("README.md"), "# Not a knowledge document\n").unwrap();
    fs::write(root.join("notes.txt"), "scratch notes\n").unwrap();

    (tmp, root)
}

fn run_kbseed(root: &Path, extra_args: &[&str]) -> (String, String, Option<i32>) {
    let output = Command::new(kbseed_binary())
        .arg("--root")
        .arg(root)
        .arg("--progress")
        .arg("off")
        .args(extra_args)
        .env("SUPABASE_URL", "https://example.supabase.co")
        .env("SUPABASE_SERVICE_ROLE_KEY", "test-service-key")
        .env_remove("SUPABASE_ACCESS_TOKEN")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run kbseed binary: {e}"));

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code(),
    )
}

#[test]
fn dry_run_counts_documents_and_chunks() {
    let (_tmp, root) = setup_knowledge_tree();

    let (stdout, stderr, code) = run_kbseed(&root, &["--dry-run"]);
    assert_eq!(code, Some(0), "stdout={stdout}, stderr={stderr}");
    assert!(stdout.contains("(dry-run)"));
    assert!(stdout.contains("documents found: 2"));
    assert!(stdout.contains("chunks generated: 4"));
    assert!(stdout.contains("embeddings created: 0"));
    assert!(stdout.contains("ok"));
}

#[test]
fn dry_run_json_summary_is_machine_readable() {
    let (_tmp, root) = setup_knowledge_tree();

    let (stdout, stderr, code) = run_kbseed(&root, &["--dry-run", "--json"]);
    assert_eq!(code, Some(0), "stdout={stdout}, stderr={stderr}");

    let result: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(result["documentsFound"], 2);
    assert_eq!(result["chunksGenerated"], 4);
    assert_eq!(result["embeddingsCreated"], 0);
    assert_eq!(result["errors"].as_array().unwrap().len(), 0);
}

#[test]
fn parse_errors_are_itemized_and_exit_nonzero() {
    let (_tmp, root) = setup_knowledge_tree();
    fs::write(root.join("broken.md"), "# Missing front matter\n\nBody.\n").unwrap();

    let (stdout, _stderr, code) = run_kbseed(&root, &["--dry-run"]);
    assert_eq!(code, Some(1));
    assert!(stdout.contains("documents found: 3"));
    assert!(stdout.contains("errors: 1"));
    assert!(stdout.contains("broken.md [document]: no front-matter found"));
}

#[test]
fn missing_env_exits_nonzero_before_processing() {
    let (_tmp, root) = setup_knowledge_tree();

    let output = Command::new(kbseed_binary())
        .arg("--root")
        .arg(&root)
        .arg("--dry-run")
        .env_remove("SUPABASE_URL")
        .env_remove("SUPABASE_SERVICE_ROLE_KEY")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SUPABASE_URL"), "stderr={stderr}");
}

#[test]
fn missing_root_exits_nonzero() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("does-not-exist");

    let (_stdout, stderr, code) = run_kbseed(&missing, &["--dry-run"]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("source directory"), "stderr={stderr}");
}

#[test]
fn progress_json_emits_event_lines_on_stderr() {
    let (_tmp, root) = setup_knowledge_tree();

    let output = Command::new(kbseed_binary())
        .arg("--root")
        .arg(&root)
        .arg("--dry-run")
        .arg("--progress")
        .arg("json")
        .env("SUPABASE_URL", "https://example.supabase.co")
        .env("SUPABASE_SERVICE_ROLE_KEY", "test-service-key")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    let first = stderr.lines().next().unwrap();
    let event: serde_json::Value = serde_json::from_str(first).unwrap();
    assert_eq!(event["event"], "discovered");
    assert_eq!(event["count"], 2);
}
