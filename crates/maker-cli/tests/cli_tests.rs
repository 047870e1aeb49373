//! Black-box tests for the `r3f-maker` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// The binary, run inside `dir` with an isolated config home.
fn maker(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("r3f-maker").unwrap();
    cmd.current_dir(dir)
        .env("NO_COLOR", "1")
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("R3F_MAKER_PREVIEW__DELAY_SECS", "0")
        .env_remove("RUST_LOG");
    cmd
}

// ── argument handling ─────────────────────────────────────────────────────────

#[test]
fn help_exits_zero() {
    let tmp = TempDir::new().unwrap();
    maker(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("React Three Fiber"))
        .stdout(predicate::str::contains("--skip-install"));
}

#[test]
fn version_exits_zero() {
    let tmp = TempDir::new().unwrap();
    maker(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_flag_exits_two() {
    let tmp = TempDir::new().unwrap();
    maker(tmp.path())
        .args(["demo", "--frobnicate"])
        .assert()
        .code(2);
    assert!(!tmp.path().join("demo").exists());
}

#[test]
fn missing_name_exits_two() {
    let tmp = TempDir::new().unwrap();
    maker(tmp.path()).assert().code(2);
}

#[test]
fn invalid_name_exits_one_before_writing() {
    let tmp = TempDir::new().unwrap();
    maker(tmp.path())
        .args([".hidden", "--skip-install"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid project name"));
    assert!(!tmp.path().join(".hidden").exists());
}

#[test]
fn name_with_space_exits_one_before_writing() {
    let tmp = TempDir::new().unwrap();
    maker(tmp.path())
        .args(["my scene", "--skip-install"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("name cannot contain whitespace"));
    assert!(!tmp.path().join("my scene").exists());
}

// ── scaffolding ───────────────────────────────────────────────────────────────

#[test]
fn skip_install_writes_project() {
    let tmp = TempDir::new().unwrap();
    maker(tmp.path())
        .args(["demo", "--skip-install"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped npm install"))
        .stdout(predicate::str::contains("Project 'demo' created successfully!"))
        .stdout(predicate::str::contains("npm run dev"));

    let root = tmp.path().join("demo");
    let manifest = fs::read_to_string(root.join("package.json")).unwrap();
    assert!(manifest.contains(r#""name": "demo""#));
    assert!(root.join("src/components/Scene.jsx").is_file());
    assert!(root.join(".gitignore").is_file());
    assert!(!root.join("node_modules").exists());
}

#[test]
fn non_empty_destination_is_left_alone() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("demo");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("keep.txt"), "mine").unwrap();

    maker(tmp.path())
        .args(["demo", "--skip-install"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(fs::read_to_string(root.join("keep.txt")).unwrap(), "mine");
    assert_eq!(fs::read_dir(&root).unwrap().count(), 1);
}

#[test]
fn empty_destination_is_filled() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("demo")).unwrap();

    maker(tmp.path())
        .args(["demo", "--skip-install"])
        .assert()
        .success();
    assert!(tmp.path().join("demo/package.json").is_file());
}

#[test]
fn second_run_conflicts() {
    let tmp = TempDir::new().unwrap();
    maker(tmp.path())
        .args(["demo", "--skip-install"])
        .assert()
        .success();
    maker(tmp.path())
        .args(["demo", "--skip-install"])
        .assert()
        .code(1);
}

#[test]
fn missing_tooling_exits_one_without_writing() {
    let tmp = TempDir::new().unwrap();
    maker(tmp.path())
        .arg("demo")
        .env("R3F_MAKER_TOOLCHAIN__RUNTIME", "r3f-maker-test-no-such-runtime")
        .env("R3F_MAKER_TOOLCHAIN__PACKAGE_MANAGER", "r3f-maker-test-no-such-pm")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--skip-install"));
    assert!(!tmp.path().join("demo").exists());
}

#[test]
fn bad_config_file_exits_one() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("broken.toml");
    fs::write(&config, "[preview]\ndelay_secs = \"soon\"\n").unwrap();

    maker(tmp.path())
        .args(["demo", "--skip-install", "--config"])
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"));
    assert!(!tmp.path().join("demo").exists());
}

// ── fake package manager (unix shell scripts on PATH) ────────────────────────

#[cfg(unix)]
mod with_fake_npm {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Put `node` and `npm` scripts first on PATH. `npm_body` is the body
    /// of a `case "$*" in ... esac` over npm's arguments.
    fn fake_tooling(dir: &Path, npm_body: &str) -> String {
        let bin = dir.join("bin");
        fs::create_dir(&bin).unwrap();
        let scripts = [
            ("node", "#!/bin/sh\necho v20.11.0\n".to_owned()),
            (
                "npm",
                format!("#!/bin/sh\ncase \"$*\" in\n{npm_body}\nesac\n"),
            ),
        ];
        for (name, body) in scripts {
            let path = bin.join(name);
            fs::write(&path, body).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        let inherited = std::env::var("PATH").unwrap_or_default();
        format!("{}:{inherited}", bin.display())
    }

    #[test]
    fn full_run_with_healthy_tooling() {
        let tmp = TempDir::new().unwrap();
        let path = fake_tooling(
            tmp.path(),
            "--version) echo 10.2.4 ;;\naudit) echo 'found 0 vulnerabilities' ;;\n*) exit 0 ;;",
        );

        maker(tmp.path())
            .arg("demo")
            .env("PATH", path)
            .assert()
            .success()
            .stdout(predicate::str::contains("node v20.11.0"))
            .stdout(predicate::str::contains("$ npm install"))
            .stdout(predicate::str::contains("No vulnerabilities found!"))
            .stdout(predicate::str::contains("$ npm run dev"));
    }

    #[test]
    fn install_failure_prints_manual_recovery() {
        let tmp = TempDir::new().unwrap();
        let path = fake_tooling(
            tmp.path(),
            "--version) echo 10.2.4 ;;\ninstall*) echo ERESOLVE >&2; exit 1 ;;\n*) exit 0 ;;",
        );

        maker(tmp.path())
            .arg("demo")
            .env("PATH", path)
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Trying with --legacy-peer-deps"))
            .stderr(predicate::str::contains("cd demo"))
            .stderr(predicate::str::contains("npm install --legacy-peer-deps"));

        // The written project stays for a manual install.
        assert!(tmp.path().join("demo/package.json").is_file());
    }

    #[test]
    fn unfixable_audit_still_succeeds() {
        let tmp = TempDir::new().unwrap();
        let path = fake_tooling(
            tmp.path(),
            "--version) echo 10.2.4 ;;\naudit*) exit 1 ;;\n*) exit 0 ;;",
        );

        maker(tmp.path())
            .args(["demo", "--skip-dev-server"])
            .env("PATH", path)
            .assert()
            .success()
            .stdout(predicate::str::contains("couldn't be auto-fixed"));
    }

    #[test]
    fn dev_server_failure_is_a_warning() {
        let tmp = TempDir::new().unwrap();
        let path = fake_tooling(
            tmp.path(),
            "--version) echo 10.2.4 ;;\n'run dev') exit 3 ;;\n*) exit 0 ;;",
        );

        maker(tmp.path())
            .arg("demo")
            .env("PATH", path)
            .assert()
            .success()
            .stdout(predicate::str::contains("cd demo && npm run dev"));
    }
}
