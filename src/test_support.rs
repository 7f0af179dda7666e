use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// Application skeleton with placeholder tokens in text files and a small
/// binary blob that must survive reseeding untouched.
pub(crate) fn create_application_template() -> TempDir {
    create_template_repo(|path| {
        std::fs::write(path.join("README.md"), "# {{project_name}}\n").unwrap();

        std::fs::create_dir_all(path.join("src")).unwrap();
        std::fs::write(
            path.join("src/app.py"),
            "APP_NAME = \"{{project_name}}\"\nTEAM = \"{{team}}\"\n",
        )
        .unwrap();

        // NUL byte up front marks this file as binary.
        let mut blob = vec![0u8, 159, 146, 150];
        blob.extend_from_slice(b"{{project_name}}");
        blob.push(0);
        std::fs::write(path.join("logo.bin"), blob).unwrap();
    })
}

/// Infrastructure skeleton declaring the variables the config file feeds.
pub(crate) fn create_infrastructure_template() -> TempDir {
    create_template_repo(|path| {
        std::fs::write(
            path.join("main.tf"),
            "variable \"project_name\" {}\nvariable \"region\" {}\n",
        )
        .unwrap();
    })
}

fn create_template_repo(populate: fn(&Path)) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path();

    git(path, &["init"]);
    // Ensure the repo uses a deterministic default branch name across environments.
    // This sets HEAD to an unborn `main` branch before the first commit.
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);

    // Configure git user for commits
    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "user.name", "Test User"]);

    populate(path);
    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Initial commit"]);

    temp_dir
}

/// Populate `root` with working copies of both bundled helpers.
///
/// The provisioning helper records its argument and `AWS_PROFILE` in a
/// marker file, so tests can tell whether and how it ran.
pub(crate) fn create_asset_root(root: &Path) {
    let bin_dir = root.join("clouduct-bin");
    std::fs::create_dir_all(&bin_dir).unwrap();
    std::fs::write(bin_dir.join("clouduct-deploy"), "#!/bin/sh\necho deploy\n").unwrap();
    std::fs::write(
        bin_dir.join("clouduct-tf"),
        "#!/bin/sh\necho \"$1 ${AWS_PROFILE}\" > provision-marker.txt\n",
    )
    .unwrap();
}

/// Like [`create_asset_root`], but the provisioning helper always fails.
pub(crate) fn create_failing_asset_root(root: &Path) {
    let bin_dir = root.join("clouduct-bin");
    std::fs::create_dir_all(&bin_dir).unwrap();
    std::fs::write(bin_dir.join("clouduct-deploy"), "#!/bin/sh\necho deploy\n").unwrap();
    std::fs::write(bin_dir.join("clouduct-tf"), "#!/bin/sh\nexit 1\n").unwrap();
}

/// Write a single-template registry document.
pub(crate) fn write_registry(path: &Path, name: &str, application: &str, infrastructure: &str) {
    let yaml = format!(
        "{}:\n  application: \"{}\"\n  infrastructure: \"{}\"\n",
        name, application, infrastructure
    );
    std::fs::write(path, yaml).unwrap();
}

fn git(repo_dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .current_dir(repo_dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute git {}: {}", args.join(" "), e));

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "git {} failed (exit code {:?})\nstdout:\n{}\nstderr:\n{}",
            args.join(" "),
            output.status.code(),
            stdout,
            stderr
        );
    }
}
