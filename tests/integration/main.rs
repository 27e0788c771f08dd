//! Integration tests for Memoir

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn memoir() -> Command {
        cargo_bin_cmd!("memoir")
    }

    /// Config pointing the cache into `dir`, with one unreachable datasource
    fn write_config(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("config.toml");
        let content = format!(
            r#"
[cache]
dir = "{}"

[redcap]
api_url = "http://127.0.0.1:9/api/"

[redcap.datasources.hcpa]
token = "super-secret-token"

[redcap.studies.aging]
datasource = "hcpa"
"#,
            dir.join("cache").display()
        );
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn help_displays() {
        memoir()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("cached REDCap exports"));
    }

    #[test]
    fn version_displays() {
        memoir()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("memoir"));
    }

    #[test]
    fn config_path_follows_flag() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path());

        memoir()
            .arg("--config")
            .arg(&config)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show_redacts_tokens() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path());

        memoir()
            .arg("--config")
            .arg(&config)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[cache]"))
            .stdout(predicate::str::contains("super-secret-token").not());
    }

    #[test]
    fn config_init_writes_defaults() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("nested").join("config.toml");

        memoir()
            .arg("--config")
            .arg(&config)
            .args(["config", "init"])
            .assert()
            .success();

        let content = fs::read_to_string(&config).unwrap();
        assert!(content.contains("ttl_days = 7"));
    }

    #[test]
    fn secrets_file_is_merged() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("config.toml");
        fs::write(
            &config,
            "secrets = \"secrets.toml\"\n[redcap.studies.aging]\ndatasource = \"hcpa\"\n",
        )
        .unwrap();
        fs::write(
            temp.path().join("secrets.toml"),
            "[redcap.datasources.hcpa]\ntoken = \"abc\"\n",
        )
        .unwrap();

        memoir()
            .arg("--config")
            .arg(&config)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[redcap.datasources.hcpa]"));
    }

    #[test]
    fn invalid_config_is_reported() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("config.toml");
        fs::write(&config, "[cache]\nttl_days = \"soon\"\n").unwrap();

        memoir()
            .arg("--config")
            .arg(&config)
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn load_parses_and_caches_document() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path());
        let doc = temp.path().join("defs.json");
        fs::write(&doc, r#"{"name": "hcpa"}"#).unwrap();

        memoir()
            .arg("--config")
            .arg(&config)
            .arg("load")
            .arg(&doc)
            .assert()
            .success()
            .stdout(predicate::str::contains("\"name\": \"hcpa\""));

        memoir()
            .arg("-vv")
            .arg("--config")
            .arg(&config)
            .arg("load")
            .arg(&doc)
            .assert()
            .success()
            .stdout(predicate::str::contains("\"name\": \"hcpa\""))
            .stderr(predicate::str::contains("from cache"));

        assert!(temp.path().join("cache").join("documents.json").exists());

        memoir()
            .arg("--config")
            .arg(&config)
            .args(["cache", "info"])
            .assert()
            .success()
            .stdout(predicate::str::contains("1 entries"));
    }

    #[test]
    fn load_rejects_unknown_format() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path());
        let doc = temp.path().join("defs.yaml");
        fs::write(&doc, "name: hcpa").unwrap();

        memoir()
            .arg("--config")
            .arg(&config)
            .arg("load")
            .arg(&doc)
            .assert()
            .failure()
            .stderr(predicate::str::contains("defs.yaml"));
    }

    #[test]
    fn unknown_study_fails() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path());

        memoir()
            .arg("--config")
            .arg(&config)
            .args(["study", "nope"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not configured"));
    }

    #[test]
    fn unknown_datasource_fails() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path());

        memoir()
            .arg("--config")
            .arg(&config)
            .args(["fetch", "nope"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("hcpa"));
    }

    #[test]
    fn failed_fetch_is_not_cached() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path());

        memoir()
            .arg("--config")
            .arg(&config)
            .args(["fetch", "hcpa"])
            .assert()
            .failure();

        assert!(!temp.path().join("cache").join("redcap.json").exists());

        memoir()
            .arg("--config")
            .arg(&config)
            .args(["cache", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No cached exports"));
    }
}
