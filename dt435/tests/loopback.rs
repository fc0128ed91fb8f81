//! End-to-end tests against a scripted TCP concentrator.

use std::time::Duration;

use dt435::{Config, Dispenser, Error, OperatingMode, Reading, TotalMode};
use dt435_core::constants::MAX_FRAME_LEN;
use dt435_transport::tcp::read_frame;
use pretty_assertions::assert_eq;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Accept one client; for each request check it and answer the paired reply
async fn concentrator(script: Vec<(&'static str, Option<&'static str>)>) -> (Config, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let mut socket = BufReader::new(socket);

        for (expected, reply) in script {
            let request = read_frame(&mut socket, MAX_FRAME_LEN).await.unwrap();
            assert_eq!(String::from_utf8(request.to_vec()).unwrap(), expected);

            match reply {
                Some(reply) => socket.get_mut().write_all(reply.as_bytes()).await.unwrap(),
                // Hold the line without answering
                None => tokio::time::sleep(Duration::from_secs(5)).await,
            }
        }
    });

    let config = Config {
        command_timeout: Duration::from_millis(500),
        ..Config::new("127.0.0.1", port)
    };

    (config, handle)
}

#[tokio::test]
async fn test_session_over_tcp() {
    let supply = "(001500002500060002012308211430011234000012345601AB0032)";
    let (config, server) = concentrator(vec![
        ("(&S)", Some("(SLBCAEFPX)")),
        ("(&T08L2E)", Some("(L080001234567B0)")),
        ("(&A67)", Some(supply)),
        ("(&I)", Some("(I)")),
        ("(&V)", Some("(0)")),
        ("(&P08001000FF)", Some("(P)")),
        ("(&M04B19)", Some("(M)")),
    ])
    .await;

    let dispenser = Dispenser::from_config(&config);
    dispenser.connect().await.unwrap();

    let status = dispenser.status().await.unwrap().into_option().unwrap();
    assert_eq!(status.len(), 8);
    assert_eq!(status.active().count(), 7);

    let total = dispenser
        .read_total("08", TotalMode::Volume)
        .await
        .unwrap()
        .into_option()
        .unwrap();
    assert_eq!(total.total_mode(), Some(TotalMode::Volume));

    let record = dispenser.read_supply().await.unwrap().into_option().unwrap();
    assert_eq!(record.nozzle.as_deref(), Some("08"));
    assert_eq!(record.final_total.as_deref(), Some("0000123456"));

    assert_eq!(dispenser.increment().await.unwrap(), "(I)");
    assert_eq!(dispenser.visualization().await.unwrap(), Reading::NoData);
    assert_eq!(dispenser.set_preset("08", "1000").await.unwrap(), "(P)");
    assert_eq!(
        dispenser
            .set_operating_mode("04", OperatingMode::Block)
            .await
            .unwrap(),
        "(M)"
    );

    dispenser.disconnect().await.unwrap();
    assert!(!dispenser.is_connected());

    server.await.unwrap();
}

#[tokio::test]
async fn test_line_endings_between_replies() {
    let (config, server) = concentrator(vec![
        ("(&A67)", Some("(0)\r\n")),
        ("(&A67)", Some("\r\n(0)\r\n")),
        ("(&S)", Some("(SLA)\r\n")),
    ])
    .await;

    let dispenser = Dispenser::from_config(&config);
    dispenser.connect().await.unwrap();

    assert_eq!(dispenser.read_supply().await.unwrap(), Reading::NoData);
    assert_eq!(dispenser.read_supply().await.unwrap(), Reading::NoData);

    let status = dispenser.status().await.unwrap().into_option().unwrap();
    assert_eq!(status.len(), 2);

    dispenser.disconnect().await.unwrap();
    server.await.unwrap();
}

#[tokio::test]
async fn test_timeout_over_tcp() {
    let (config, _server) = concentrator(vec![("(&R)", None)]).await;
    let dispenser = Dispenser::from_config(&config).with_timeout(Duration::from_millis(100));

    dispenser.connect().await.unwrap();

    let result = dispenser.read_calendar().await;
    assert!(matches!(result, Err(Error::Timeout { millis: 100 })));
    assert!(!dispenser.is_connected());
}

#[tokio::test]
async fn test_connection_refused() {
    // Grab a free port, then close it
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let dispenser = Dispenser::new("127.0.0.1", port);
    let result = dispenser.connect().await;

    assert!(matches!(result, Err(Error::Connect { .. })));
    assert!(!dispenser.is_connected());
}
