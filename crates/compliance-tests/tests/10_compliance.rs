//! Compliance scenarios against real compose tools.
//!
//! Every test deploys one fixture with every tool in `commands/` and probes the
//! target service from outside. Tests share host ports and the container
//! runtime, so they run serially.

#![cfg(feature = "compliance")]

use common::types::LOCAL_PONG;
use compliance_tests::fixtures::TargetClient;
use compliance_tests::{init_tracing, HarnessError, LifecycleDriver, Scenario};
use serial_test::serial;
use std::future::Future;
use std::time::Duration;

/// Address the entry service relays to inside the deployment.
const TARGET_PING: &str = "target:8080/ping";

/// Run `scenario` against the catalogue and fail on any failed case.
async fn run_scenario<F, Fut>(scenario: &Scenario, verify: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), HarnessError>>,
{
    init_tracing();
    let report = LifecycleDriver::from_env()
        .run_up_down(scenario, verify)
        .await
        .expect("Failed to load the tool catalogue - check COMPLIANCE_ROOT");

    report.assert_all_passed();
}

fn client() -> TargetClient {
    TargetClient::from_config(LifecycleDriver::from_env().config())
}

/// Verification that reads `filename` from the target's volumes root.
async fn check_volume_file(scenario: &Scenario, filename: &str, expected: &str) {
    let client = client();
    let (client, check) = (&client, scenario);
    run_scenario(scenario, move || async move {
        client.wait_until_ready().await?;
        let actual = client.volume_file(filename).await?;
        check.check(expected, &actual)
    })
    .await;
}

#[tokio::test]
#[serial]
async fn test_simple_lifecycle() {
    let scenario = Scenario::new("simple_lifecycle");

    run_scenario(&scenario, || async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        Ok(())
    })
    .await;
}

#[tokio::test]
#[serial]
async fn test_simple_lifecycle_is_repeatable() {
    let scenario = Scenario::new("simple_lifecycle");

    for _ in 0..2 {
        run_scenario(&scenario, || async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(())
        })
        .await;
    }
}

#[tokio::test]
#[serial]
async fn test_simple_network() {
    let scenario = Scenario::new("simple_network").with_spec_ref("Networks-top-level-element");
    let client = client();
    let (client, check) = (&client, &scenario);

    run_scenario(&scenario, move || async move {
        client.wait_until_ready().await?;
        let actual = client.wait_for_ping(TARGET_PING, LOCAL_PONG).await?;
        check.check(LOCAL_PONG, &actual)
    })
    .await;
}

#[tokio::test]
#[serial]
async fn test_simple_network_unknown_host() {
    let scenario = Scenario::new("simple_network").with_spec_ref("Networks-top-level-element");
    let client = client();
    let (client, check) = (&client, &scenario);

    run_scenario(&scenario, move || async move {
        client.wait_until_ready().await?;
        let address = "notatarget:8080/ping";
        let expected = "Could not reach address: notatarget:8080/ping";
        let actual = client.wait_for_ping(address, expected).await?;
        check.check(expected, &actual)
    })
    .await;
}

#[tokio::test]
#[serial]
async fn test_different_networks() {
    let scenario =
        Scenario::new("different_networks").with_spec_ref("Networks-top-level-element");
    let client = client();
    let (client, check) = (&client, &scenario);

    run_scenario(&scenario, move || async move {
        client.wait_until_ready().await?;
        let expected = "Could not reach address: target:8080/ping";
        let actual = client.wait_for_ping(TARGET_PING, expected).await?;
        check.check(expected, &actual)
    })
    .await;
}

#[tokio::test]
#[serial]
async fn test_volume_file() {
    let scenario = Scenario::new("simple_volume").with_spec_ref("volumes-top-level-element");
    check_volume_file(&scenario, "test_volume.txt", "MYVOLUME").await;
}

#[tokio::test]
#[serial]
async fn test_secret_file() {
    let scenario =
        Scenario::new("simple_secretfile").with_spec_ref("secrets-top-level-element");
    check_volume_file(&scenario, "test_secret.txt", "MYSECRET").await;
}

#[tokio::test]
#[serial]
async fn test_config_file() {
    let scenario = Scenario::new("simple_configfile")
        .skipping(&["docker-composeV1"])
        .with_spec_ref("configs-top-level-element");
    check_volume_file(&scenario, "test_config.txt", "MYCONFIG").await;
}

#[tokio::test]
#[serial]
async fn test_udp_port() {
    let scenario = Scenario::new("udp_port").with_spec_ref("Networks-top-level-element");
    let client = client();
    let (client, check) = (&client, &scenario);

    run_scenario(&scenario, move || async move {
        let value = "myUdpvalue";
        client.wait_until_ready().await?;
        client.send_udp(value).await?;
        let actual = client.wait_for_udp_payload(value).await?;
        check.check(value, &actual)
    })
    .await;
}

#[tokio::test]
#[serial]
async fn test_scaling() {
    let scenario = Scenario::new("scaling")
        .skipping(&["compose-ref"])
        .with_spec_ref("Networks-top-level-element");
    let client = client();
    let (client, check) = (&client, &scenario);

    run_scenario(&scenario, move || async move {
        client.wait_until_ready().await?;
        let actual = client.wait_for_scale_report("3").await?;
        check.check("3", &actual)
    })
    .await;
}
