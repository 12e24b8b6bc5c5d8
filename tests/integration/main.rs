//! Integration tests for pkgcat

/// Minimal package API that answers every connection from a fixed route table
mod fake_api {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    pub const LIST_PATH: &str =
        "/apis/packages.operators.coreos.com/v1/namespaces/default/packagemanifests";

    pub struct FakeApi {
        pub url: String,
        hits: Arc<AtomicUsize>,
    }

    impl FakeApi {
        pub fn hits(&self) -> usize {
            self.hits.load(Ordering::SeqCst)
        }
    }

    fn manifest(name: &str, source: &str, keywords: &[&str], certified: &str) -> serde_json::Value {
        serde_json::json!({
            "metadata": { "name": name, "namespace": "default" },
            "status": {
                "catalogSource": source,
                "catalogSourceDisplayName": "Test Catalog",
                "catalogSourcePublisher": "Example Inc",
                "provider": { "name": "Example" },
                "defaultChannel": "stable",
                "channels": [{
                    "name": "stable",
                    "currentCSV": format!("{}.v1.0.0", name),
                    "currentCSVDesc": {
                        "displayName": format!("{} Operator", name),
                        "version": "1.0.0",
                        "longDescription": format!("Runs {} on the cluster", name),
                        "keywords": keywords,
                        "annotations": { "certified": certified },
                        "installModes": [
                            { "type": "OwnNamespace", "supported": true },
                            { "type": "AllNamespaces", "supported": false }
                        ]
                    }
                }]
            }
        })
    }

    fn route(path: &str) -> (&'static str, String) {
        let items = vec![
            manifest("etcd", "community-operators", &["database", "key value"], "false"),
            manifest("prometheus", "community-operators", &["monitoring"], "true"),
            manifest("etcd-backup", "certified-operators", &["database"], "true"),
        ];

        if path == LIST_PATH {
            let body = serde_json::json!({ "items": items });
            return ("HTTP/1.1 200 OK", body.to_string());
        }

        let wanted = path.strip_prefix(LIST_PATH).and_then(|p| p.strip_prefix('/'));
        match items.into_iter().find(|m| Some(m["metadata"]["name"].as_str().unwrap_or("")) == wanted) {
            Some(m) => ("HTTP/1.1 200 OK", m.to_string()),
            None => ("HTTP/1.1 404 Not Found", "{}".to_string()),
        }
    }

    pub fn start() -> FakeApi {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                counter.fetch_add(1, Ordering::SeqCst);

                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut request_line = String::new();
                reader.read_line(&mut request_line).unwrap();
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                        break;
                    }
                }

                let path = request_line.split_whitespace().nth(1).unwrap_or("/");
                let (status, body) = route(path);

                let mut stream = stream;
                write!(
                    stream,
                    "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                )
                .unwrap();
                stream.flush().unwrap();
            }
        });

        FakeApi { url, hits }
    }
}

mod cli_tests {
    use super::fake_api;
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::Path;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Command isolated from the user's config, cache and environment
    fn pkgcat(home: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("pkgcat");
        cmd.env_remove("PKGCAT_SERVER")
            .env_remove("PKGCAT_TOKEN")
            .env_remove("PKGCAT_CONFIG")
            .arg("--config")
            .arg(home.join("config.toml"))
            .arg("--cache-dir")
            .arg(home.join("cache"));
        cmd
    }

    #[test]
    fn help_displays() {
        let home = TempDir::new().unwrap();
        pkgcat(home.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("package catalog"));
    }

    #[test]
    fn version_displays() {
        let home = TempDir::new().unwrap();
        pkgcat(home.path())
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("pkgcat"));
    }

    #[test]
    fn config_path_follows_flag() {
        let home = TempDir::new().unwrap();
        pkgcat(home.path())
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show_reflects_overrides() {
        let home = TempDir::new().unwrap();
        pkgcat(home.path())
            .args(["--namespace", "olm", "config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[server]"))
            .stdout(predicate::str::contains(r#"namespace = "olm""#));
    }

    #[test]
    fn config_set_then_show() {
        let home = TempDir::new().unwrap();
        pkgcat(home.path())
            .args(["config", "set", "cache.lifetime", "2h"])
            .assert()
            .success();

        pkgcat(home.path())
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#"lifetime = "2h""#));
    }

    #[test]
    fn config_show_hides_token() {
        let home = TempDir::new().unwrap();
        pkgcat(home.path())
            .args(["--token", "s3cret", "config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("s3cret").not())
            .stdout(predicate::str::contains("<redacted>"));
    }

    #[test]
    fn empty_package_name_is_not_found() {
        let api = fake_api::start();
        let home = TempDir::new().unwrap();

        pkgcat(home.path())
            .args(["--server", &api.url, "show", ""])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Package not found"));
        assert_eq!(api.hits(), 0);
    }

    #[test]
    fn unreachable_server_fails_with_hint() {
        let home = TempDir::new().unwrap();
        pkgcat(home.path())
            .args(["--server", "http://127.0.0.1:1", "--no-cache", "list"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to fetch"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn malformed_glob_fails_before_fetching() {
        let home = TempDir::new().unwrap();
        pkgcat(home.path())
            .args(["--server", "http://127.0.0.1:1", "list", "--glob", "[oops"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid pattern"));
    }

    #[test]
    fn invalid_lifetime_is_reported() {
        let home = TempDir::new().unwrap();
        pkgcat(home.path())
            .args(["--cache-lifetime", "soon", "cache", "path"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid duration"));
    }

    #[test]
    fn list_applies_every_filter() {
        let api = fake_api::start();
        let home = TempDir::new().unwrap();

        pkgcat(home.path())
            .args(["--server", &api.url, "list", "etcd", "-w", "database", "-f", "plain"])
            .assert()
            .success()
            .stdout("etcd\netcd-backup\n");

        pkgcat(home.path())
            .args([
                "--server", &api.url, "list", "etcd", "-w", "database", "--certified", "true",
                "-f", "plain",
            ])
            .assert()
            .success()
            .stdout("etcd-backup\n");
    }

    #[test]
    fn glob_is_anchored() {
        let api = fake_api::start();
        let home = TempDir::new().unwrap();

        pkgcat(home.path())
            .args(["--server", &api.url, "list", "--glob", "*backup", "-f", "plain"])
            .assert()
            .success()
            .stdout("etcd-backup\n");
    }

    #[test]
    fn list_json_is_machine_readable() {
        let api = fake_api::start();
        let home = TempDir::new().unwrap();

        let output = pkgcat(home.path())
            .args(["--server", &api.url, "list", "prometheus", "-f", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(rows.as_array().unwrap().len(), 1);
        assert_eq!(rows[0]["name"], "prometheus");
        assert_eq!(rows[0]["default_channel"], "stable");
    }

    #[test]
    fn second_run_is_served_from_cache() {
        let api = fake_api::start();
        let home = TempDir::new().unwrap();

        for _ in 0..2 {
            pkgcat(home.path())
                .args(["--server", &api.url, "list", "-f", "plain"])
                .assert()
                .success()
                .stdout(predicate::str::contains("prometheus"));
        }

        assert_eq!(api.hits(), 1);
    }

    #[test]
    fn no_cache_always_fetches() {
        let api = fake_api::start();
        let home = TempDir::new().unwrap();

        for _ in 0..2 {
            pkgcat(home.path())
                .args(["--server", &api.url, "--no-cache", "list", "-f", "plain"])
                .assert()
                .success();
        }

        assert_eq!(api.hits(), 2);
    }

    #[test]
    fn expired_entries_are_refetched() {
        let api = fake_api::start();
        let home = TempDir::new().unwrap();
        let args = ["--server", api.url.as_str(), "--cache-lifetime", "1s", "list"];

        pkgcat(home.path()).args(args).assert().success();
        thread::sleep(Duration::from_millis(2100));
        pkgcat(home.path()).args(args).assert().success();

        assert_eq!(api.hits(), 2);
    }

    #[test]
    fn cache_clear_forces_refetch() {
        let api = fake_api::start();
        let home = TempDir::new().unwrap();

        pkgcat(home.path())
            .args(["--server", &api.url, "list"])
            .assert()
            .success();
        pkgcat(home.path())
            .args(["--server", &api.url, "cache", "clear", "--yes"])
            .assert()
            .success();
        pkgcat(home.path())
            .args(["--server", &api.url, "list"])
            .assert()
            .success();

        assert_eq!(api.hits(), 2);
    }

    #[test]
    fn cache_path_points_into_cache_dir() {
        let home = TempDir::new().unwrap();
        pkgcat(home.path())
            .args(["cache", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("cache.db"));
    }

    #[test]
    fn show_prints_summary() {
        let api = fake_api::start();
        let home = TempDir::new().unwrap();

        pkgcat(home.path())
            .args(["--server", &api.url, "show", "etcd", "-d"])
            .assert()
            .success()
            .stdout(predicate::str::contains("community-operators"))
            .stdout(predicate::str::contains("etcd.v1.0.0"))
            .stdout(predicate::str::contains("Runs etcd on the cluster"));
    }

    #[test]
    fn show_missing_package() {
        let api = fake_api::start();
        let home = TempDir::new().unwrap();

        pkgcat(home.path())
            .args(["--server", &api.url, "show", "vault"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Package not found: vault"));
    }

    #[test]
    fn dump_prints_manifest_json() {
        let api = fake_api::start();
        let home = TempDir::new().unwrap();

        let output = pkgcat(home.path())
            .args(["--server", &api.url, "dump", "prometheus"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let manifest: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(manifest["metadata"]["name"], "prometheus");
        assert_eq!(
            manifest["status"]["channels"][0]["currentCSVDesc"]["annotations"]["certified"],
            "true"
        );
    }
}

mod library_tests {
    use pkgcat::cache::{CacheSettings, ResponseCache};
    use pkgcat::catalog::{match_install_mode, Fetcher, PackageCatalog};
    use pkgcat::{PkgcatError, PkgcatResult};
    use std::cell::Cell;
    use std::time::Duration;
    use tempfile::TempDir;

    struct CountingFetcher {
        calls: Cell<usize>,
    }

    impl Fetcher for CountingFetcher {
        fn fetch(&self, path: &str) -> PkgcatResult<Vec<u8>> {
            self.calls.set(self.calls.get() + 1);
            if path.ends_with("/packagemanifests") {
                Ok(br#"{"items":[{"metadata":{"name":"etcd"},"status":{"defaultChannel":"alpha","channels":[{"name":"alpha","currentCSVDesc":{"installModes":[{"type":"AllNamespaces","supported":true}]}}]}}]}"#.to_vec())
            } else {
                Err(PkgcatError::ResourceNotFound {
                    path: path.to_string(),
                })
            }
        }
    }

    #[test]
    fn cached_catalog_survives_reopen() {
        let temp = TempDir::new().unwrap();
        let settings = CacheSettings::new("pkgcat-it", "endpoint")
            .with_directory(temp.path())
            .with_lifetime(Duration::from_secs(600));

        {
            let fetcher = CountingFetcher { calls: Cell::new(0) };
            let catalog = PackageCatalog::new(fetcher, "default")
                .with_cache(Box::new(settings.clone().start().unwrap()));
            let found = catalog
                .list_packages(&[match_install_mode("allnamespaces")])
                .unwrap();
            assert_eq!(found.len(), 1);
        }

        let cache = settings.start().unwrap();
        assert!(cache
            .get("/apis/packages.operators.coreos.com/v1/namespaces/default/packagemanifests")
            .unwrap()
            .is_some());
    }

    #[test]
    fn missing_package_maps_to_not_found() {
        let fetcher = CountingFetcher { calls: Cell::new(0) };
        let catalog = PackageCatalog::new(fetcher, "default");

        let err = catalog.get_package("vault").unwrap_err();
        assert!(err.is_not_found());
        assert!(err.hint().is_some());
    }
}
