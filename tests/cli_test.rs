use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const UNREACHABLE_PAYOUT: &str = "http://127.0.0.1:1/releaseEscrow";

fn snapshot(value: serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", value).unwrap();
    file
}

fn due_digital(order_id: &str) -> serde_json::Value {
    json!({
        "orderId": order_id,
        "type": "digital",
        "status": "Ordered",
        "buyerConfirmed": false,
        "createdAt": "2020-01-01T00:00:00Z",
        "buyerId": "buyer-1",
        "sellerId": "seller-1"
    })
}

#[test]
fn test_run_with_nothing_eligible() {
    let file = snapshot(json!({
        "transactions": [{
            "orderId": "R1",
            "type": "rwi",
            "status": "Shipped",
            "buyerConfirmed": false,
            "buyerId": "b",
            "sellerId": "s"
        }],
        "notifications": []
    }));

    let mut cmd = Command::new(cargo_bin!("escrow-release"));
    cmd.arg("run")
        .arg("--snapshot")
        .arg(file.path())
        .arg("--payout-url")
        .arg(UNREACHABLE_PAYOUT);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"processed\": 0"))
        .stdout(predicate::str::contains("\"successful\": 0"));
}

#[test]
fn test_dry_run_lists_without_paying() {
    let file = snapshot(json!({
        "transactions": [due_digital("D1")],
        "notifications": []
    }));

    let mut cmd = Command::new(cargo_bin!("escrow-release"));
    cmd.arg("run")
        .arg("--dry-run")
        .arg("--snapshot")
        .arg(file.path())
        .arg("--payout-url")
        .arg(UNREACHABLE_PAYOUT);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"orderId\": \"D1\""))
        .stdout(predicate::str::contains("\"releaseAt\": \"2020-01-08T00:00:00Z\""));
}

#[test]
fn test_dispatch_failure_is_reported_not_fatal() {
    let file = snapshot(json!({ "transactions": [due_digital("D1")] }));

    let mut cmd = Command::new(cargo_bin!("escrow-release"));
    cmd.arg("run")
        .arg("--snapshot")
        .arg(file.path())
        .arg("--payout-url")
        .arg(UNREACHABLE_PAYOUT);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"processed\": 1"))
        .stdout(predicate::str::contains("\"orderId\": \"D1\""));
}

#[test]
fn test_missing_snapshot_fails() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(cargo_bin!("escrow-release"));
    cmd.arg("run")
        .arg("--snapshot")
        .arg(dir.path().join("nope.json"))
        .arg("--payout-url")
        .arg(UNREACHABLE_PAYOUT);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Store error"));
}

#[test]
fn test_invalid_hold_days_rejected() {
    let file = snapshot(json!({}));

    let mut cmd = Command::new(cargo_bin!("escrow-release"));
    cmd.arg("run")
        .arg("--snapshot")
        .arg(file.path())
        .arg("--payout-url")
        .arg(UNREACHABLE_PAYOUT)
        .arg("--hold-days")
        .arg("0");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("hold period"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_releases_through_payout_function() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"signature": "abc"})))
        .expect(1)
        .mount(&server)
        .await;

    let file = snapshot(json!({ "transactions": [due_digital("D1")] }));
    let url = format!("{}/releaseEscrow", server.uri());
    let path = file.path().to_path_buf();

    let assert = tokio::task::spawn_blocking(move || {
        let mut cmd = Command::new(cargo_bin!("escrow-release"));
        cmd.arg("run")
            .arg("--snapshot")
            .arg(path)
            .arg("--payout-url")
            .arg(url)
            .assert()
    })
    .await
    .unwrap();

    assert
        .success()
        .stdout(predicate::str::contains("\"processed\": 1"))
        .stdout(predicate::str::contains("\"successful\": 1"));
}
