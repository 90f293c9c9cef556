//! Integration tests for deplayer

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use sha2::{Digest, Sha256};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn deplayer(temp: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("deplayer");
        cmd.env("DEPLAYER_CONFIG", temp.join("config.toml"))
            .env_remove("CNB_STACK_ID");
        cmd
    }

    /// Buildpack dir with a catalog pointing at a local artifact
    struct Fixture {
        temp: TempDir,
    }

    impl Fixture {
        fn new(artifact: &[u8]) -> Self {
            let temp = TempDir::new().unwrap();
            let cnb = temp.path().join("cnb");
            std::fs::create_dir_all(&cnb).unwrap();
            let artifact_path = temp.path().join("dep-0.5.4.tgz");
            std::fs::write(&artifact_path, artifact).unwrap();

            let sha = hex::encode(Sha256::digest(artifact));
            std::fs::write(
                cnb.join("buildpack.toml"),
                format!(
                    r#"
[buildpack]
id = "example/dep"
name = "Dep Buildpack"
version = "1.2.3"
sbom-formats = ["application/vnd.cyclonedx+json"]

[[metadata.dependencies]]
id = "dep"
name = "Dep"
version = "0.5.4"
sha256 = "{sha}"
uri = "file://{uri}"
stacks = ["some-stack"]
"#,
                    sha = sha,
                    uri = artifact_path.display()
                ),
            )
            .unwrap();

            std::fs::write(
                temp.path().join("plan.toml"),
                r#"
[[entries]]
name = "dep"

[entries.metadata]
launch = true
"#,
            )
            .unwrap();

            Self { temp }
        }

        fn path(&self, name: &str) -> PathBuf {
            self.temp.path().join(name)
        }

        fn build(&self) -> Command {
            let mut cmd = deplayer(self.temp.path());
            cmd.arg("build")
                .arg("--layers")
                .arg(self.path("layers"))
                .arg("--plan")
                .arg(self.path("plan.toml"))
                .arg("--buildpack")
                .arg(self.path("cnb"))
                .arg("--platform")
                .arg(self.path("platform"))
                .arg("--stack")
                .arg("some-stack");
            cmd
        }
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        deplayer(temp.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("dependency layer builder"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        deplayer(temp.path())
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("deplayer"));
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();
        deplayer(temp.path())
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        deplayer(temp.path())
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[build]"));
    }

    #[test]
    fn detect_writes_plan() {
        let temp = TempDir::new().unwrap();
        let plan = temp.path().join("out").join("plan.toml");

        deplayer(temp.path())
            .arg("detect")
            .arg("--plan")
            .arg(&plan)
            .assert()
            .success();

        let content = std::fs::read_to_string(plan).unwrap();
        assert!(content.contains("[[provides]]"));
        assert!(content.contains("name = \"dep\""));
    }

    #[test]
    fn build_installs_then_reuses() {
        let fixture = Fixture::new(b"dep artifact");

        fixture
            .build()
            .assert()
            .success()
            .stdout(predicate::str::contains("Executing build process"))
            .stdout(predicate::str::contains("Installing Dep 0.5.4"));

        let layers = fixture.path("layers");
        assert!(layers.join("dep/dep-0.5.4.tgz").is_file());
        assert!(layers.join("dep.sbom.cdx.json").is_file());
        assert!(layers.join("launch.toml").is_file());
        assert!(!layers.join("build.toml").exists());

        let metadata = std::fs::read_to_string(layers.join("dep.toml")).unwrap();
        assert!(metadata.contains("dependency-sha"));
        assert!(metadata.contains("built_at"));

        fixture
            .build()
            .assert()
            .success()
            .stdout(predicate::str::contains("Reusing cached layer"));
    }

    #[test]
    fn build_with_unknown_sbom_format_fails() {
        let fixture = Fixture::new(b"dep artifact");

        fixture
            .build()
            .args(["--sbom-format", "application/x-unknown"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("application/x-unknown"));

        assert!(!fixture.path("layers").join("dep.toml").exists());
    }

    #[test]
    fn build_on_unknown_stack_fails_with_hint() {
        let fixture = Fixture::new(b"dep artifact");

        let mut cmd = deplayer(fixture.temp.path());
        cmd.arg("build")
            .arg("--layers")
            .arg(fixture.path("layers"))
            .arg("--plan")
            .arg(fixture.path("plan.toml"))
            .arg("--buildpack")
            .arg(fixture.path("cnb"))
            .arg("--stack")
            .arg("other-stack")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to resolve dependency dep"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn build_without_stack_fails() {
        let fixture = Fixture::new(b"dep artifact");

        deplayer(fixture.temp.path())
            .arg("build")
            .arg("--layers")
            .arg(fixture.path("layers"))
            .arg("--plan")
            .arg(fixture.path("plan.toml"))
            .arg("--buildpack")
            .arg(fixture.path("cnb"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("No stack given"));
    }
}
