//! Test environment builder for isolated sifter testing.
//!
//! Provides `TestEnv`: a temp project directory, a temp config home, and a
//! `bin/` directory with fake tools that is put first on PATH.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

use super::fixtures::{CATALOG_CONFIG, FAKE_APPTAINER, FAKE_DOCKER};

/// Result of running a sifter CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated test environment with temp directories.
pub struct TestEnv {
    /// Working directory the CLI runs in
    pub project_root: TempDir,
    /// Config home and fake tool directory
    pub home_dir: TempDir,
    sifter_bin: PathBuf,
}

impl TestEnv {
    /// Project with the standard catalog config and both fake tools.
    pub fn new() -> Self {
        let env = Self::bare();
        env.write_project_file("sifter.toml", CATALOG_CONFIG);
        env.install_tool("docker", FAKE_DOCKER);
        env.install_tool("apptainer", FAKE_APPTAINER);
        env
    }

    /// No config and no tools.
    pub fn bare() -> Self {
        let env = Self {
            project_root: TempDir::new().expect("Failed to create project dir"),
            home_dir: TempDir::new().expect("Failed to create home dir"),
            sifter_bin: PathBuf::from(env!("CARGO_BIN_EXE_sifter")),
        };
        fs::create_dir_all(env.bin_dir()).expect("Failed to create bin dir");
        env
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.home_dir.path().join("bin")
    }

    /// Get path relative to project root
    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    /// Registry at its default location
    pub fn registry_path(&self) -> PathBuf {
        self.project_path("inputs/values/dockers.json")
    }

    pub fn install_tool(&self, name: &str, script: &str) {
        let path = self.bin_dir().join(name);
        fs::write(&path, script).expect("Failed to write tool script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to mark tool executable");
    }

    /// Write a file to the project directory
    pub fn write_project_file(&self, relative_path: &str, content: &str) {
        let full_path = self.project_path(relative_path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create directories");
        }
        fs::write(&full_path, content).expect("Failed to write file");
    }

    pub fn read_project_file(&self, relative_path: &str) -> String {
        fs::read_to_string(self.project_path(relative_path))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative_path, e))
    }

    /// Run sifter in this environment from project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    /// Run sifter from project root with extra env vars.
    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        self.run_from_with_env(self.project_root.path(), args, env_vars)
    }

    pub fn run_from_with_env(
        &self,
        cwd: &Path,
        args: &[&str],
        env_vars: &[(&str, &str)],
    ) -> TestResult {
        let path = match std::env::var_os("PATH") {
            Some(system) => {
                let mut dirs = vec![self.bin_dir()];
                dirs.extend(std::env::split_paths(&system));
                std::env::join_paths(dirs).expect("PATH entries are valid")
            }
            None => self.bin_dir().into_os_string(),
        };

        let mut cmd = Command::new(&self.sifter_bin);
        cmd.current_dir(cwd)
            .args(args)
            .env("PATH", path)
            .env("HOME", self.home_dir.path())
            .env("XDG_CONFIG_HOME", self.home_dir.path().join(".config"))
            .env_remove("RUST_LOG")
            .env_remove("SIFTER_REGISTRY")
            .env_remove("SIFTER_BACKEND")
            .env_remove("SIFTER_RUNTIME")
            .env_remove("SIFTER_JOBS")
            .env_remove("FAKE_DOCKER_MISSING");

        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("Failed to execute sifter");
        output_to_result(output)
    }
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

/// List all files in a directory (for failure messages)
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = fs::read_dir(dir)
        .map(|entries| {
            entries
                .flatten()
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    files.sort();
    files
}
