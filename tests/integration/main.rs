//! Integration tests for csspipe

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn csspipe(dir: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("csspipe");
        cmd.current_dir(dir.path())
            .env("CSSPIPE_CONFIG", dir.path().join("config.toml"))
            .env_remove("DEBUG_METEOR_POSTCSS_DEP_CACHE")
            .env_remove("DEBUG_POSTCSS_DEP_CACHE")
            .arg("--no-local");
        cmd
    }

    fn install(project: &Path, name: &str, version: &str) {
        let dir = project.join("node_modules").join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("package.json"),
            format!(r#"{{"name": "{}", "version": "{}"}}"#, name, version),
        )
        .unwrap();
    }

    fn tailwind_project(postcss_version: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        install(temp.path(), "postcss-load-config", "6.0.1");
        install(temp.path(), "tailwindcss", "3.4.0");
        install(temp.path(), "postcss", postcss_version);
        temp
    }

    fn digest_output(dir: &TempDir) -> String {
        let output = csspipe(dir)
            .args(["digest", "--file", "main.css", "--dir", "client=**/*.html"])
            .output()
            .unwrap();
        assert!(output.status.success());
        String::from_utf8(output.stdout).unwrap()
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        csspipe(&temp)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("PostCSS pipeline"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        csspipe(&temp)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("csspipe"));
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();
        csspipe(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        csspipe(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[pipeline]"))
            .stdout(predicate::str::contains("node_modules"));
    }

    #[test]
    fn resolve_empty_project() {
        let temp = TempDir::new().unwrap();
        csspipe(&temp)
            .arg("resolve")
            .assert()
            .success()
            .stdout(predicate::str::contains("No PostCSS pipeline configured"));
    }

    #[test]
    fn resolve_tailwind_only() {
        let temp = tailwind_project("8.4.49");
        csspipe(&temp)
            .args(["resolve", "--format", "plain"])
            .assert()
            .success()
            .stdout("tailwindcss\n");
    }

    #[test]
    fn resolve_rejects_old_postcss() {
        let temp = tailwind_project("7.0.0");
        csspipe(&temp)
            .arg("resolve")
            .assert()
            .failure()
            .stderr(predicate::str::contains("postcss 7.0.0 is not supported"));
    }

    #[test]
    fn resolve_missing_postcss() {
        let temp = TempDir::new().unwrap();
        install(temp.path(), "postcss-load-config", "6.0.1");
        install(temp.path(), "tailwindcss", "3.4.0");
        csspipe(&temp)
            .arg("resolve")
            .assert()
            .failure()
            .stderr(predicate::str::contains("npm install postcss@8"));
    }

    #[test]
    fn check_excluded_package() {
        let temp = tailwind_project("8.4.49");
        fs::write(
            temp.path().join("package.json"),
            r#"{"postcss": {"plugins": {}, "excludedMeteorPackages": ["my:pkg"]}}"#,
        )
        .unwrap();

        csspipe(&temp)
            .args(["check", "--arch", "web.browser.legacy", "--path", "packages/my_pkg/foo.css"])
            .assert()
            .success()
            .stdout(predicate::str::contains("skipped"));

        csspipe(&temp)
            .args(["check", "--arch", "os.linux.x86_64", "--path", "packages/my_pkg/foo.css"])
            .assert()
            .success()
            .stdout(predicate::str::contains("applies"));
    }

    #[test]
    fn digest_is_stable_and_content_sensitive() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("main.css"), "@tailwind base;").unwrap();
        fs::create_dir_all(temp.path().join("client")).unwrap();
        fs::write(temp.path().join("client/index.html"), "<div class=\"p-4\">").unwrap();

        let first = digest_output(&temp);
        assert_eq!(first.trim().len(), 64);
        assert_eq!(first, digest_output(&temp));

        fs::write(temp.path().join("client/readme.md"), "unmatched").unwrap();
        assert_eq!(first, digest_output(&temp));

        fs::write(temp.path().join("client/index.html"), "<div class=\"p-8\">").unwrap();
        assert_ne!(first, digest_output(&temp));
    }

    #[test]
    fn digest_debug_prints_diagnostics() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("main.css"), "a{}").unwrap();
        csspipe(&temp)
            .args(["digest", "--file", "main.css", "--debug"])
            .assert()
            .success()
            .stderr(predicate::str::contains("PostCSS Cache Info"))
            .stderr(predicate::str::contains("File dep count 1"));
    }

    #[test]
    fn digest_env_flag_prints_diagnostics() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("main.css"), "a{}").unwrap();
        csspipe(&temp)
            .env("DEBUG_METEOR_POSTCSS_DEP_CACHE", "true")
            .args(["digest", "--file", "main.css"])
            .assert()
            .success()
            .stderr(predicate::str::contains("PostCSS Cache Info"));
    }

    #[test]
    fn digest_empty_glob_hashes_whole_dir() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("styles")).unwrap();
        fs::write(temp.path().join("styles/a.css"), "a{}").unwrap();
        fs::write(
            temp.path().join("deps.json"),
            r#"[{"type": "dir-dependency", "dir": "styles", "glob": ""}]"#,
        )
        .unwrap();

        csspipe(&temp)
            .args(["digest", "--deps-json", "deps.json", "--debug"])
            .assert()
            .success()
            .stderr(predicate::str::contains("File dep count 1"));
    }

    #[test]
    fn resolve_missing_project_dir_fails() {
        let temp = TempDir::new().unwrap();
        csspipe(&temp)
            .args(["resolve", "--project", "no-such-dir"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("no-such-dir"));
    }

    #[test]
    fn digest_requires_dependencies() {
        let temp = TempDir::new().unwrap();
        csspipe(&temp)
            .arg("digest")
            .assert()
            .failure()
            .stderr(predicate::str::contains("No dependencies given"));
    }

    #[test]
    fn digest_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        csspipe(&temp)
            .args(["digest", "--file", "missing.css"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to hash"));
    }
}
