use order_relay::bus::{LineBus, MessageBus, Publisher, FOOD_TOPIC, ORDER_TOPIC};
use order_relay::config::RelayConfig;
use order_relay::fulfillment::FixedDelay;
use order_relay::lifecycle::RelaySystem;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Seen = Arc<Mutex<Vec<(String, Vec<u8>)>>>;

/// Only lines on subscribed topics reach the handler; junk lines are skipped.
#[tokio::test]
async fn test_reader_delivers_subscribed_topics() {
    let bus = LineBus::new(Vec::new());
    bus.subscribe(ORDER_TOPIC).await.unwrap();

    let input = concat!(
        "ORDER {\"food\": \"pizza\", \"table\": 5}\n",
        "FOOD {\"food\": \"pizza\", \"table\": 5}\n",
        "no-payload-here\n",
        "\n",
        "ORDER second\r\n",
    );
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    bus.spawn_reader(Cursor::new(input.as_bytes().to_vec()), move |topic, payload| {
        sink.lock().unwrap().push((topic.to_string(), payload.to_vec()));
    })
    .unwrap()
    .join()
    .unwrap();

    let seen = seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            (
                ORDER_TOPIC.to_string(),
                br#"{"food": "pizza", "table": 5}"#.to_vec()
            ),
            (ORDER_TOPIC.to_string(), b"second".to_vec()),
        ]
    );
}

#[tokio::test]
async fn test_publish_writes_one_line() {
    let bus = LineBus::new(Vec::new());
    bus.publish(FOOD_TOPIC, br#"{"food": "tea", "table": 2}"#.to_vec())
        .await
        .unwrap();
    bus.publish(FOOD_TOPIC, b"x".to_vec()).await.unwrap();

    let output = String::from_utf8(bus.into_output()).unwrap();
    assert_eq!(output, "FOOD {\"food\": \"tea\", \"table\": 2}\nFOOD x\n");
}

/// Lines in, deliveries out, through the whole relay.
#[tokio::test(start_paused = true)]
async fn test_relay_over_line_bus() {
    let config = RelayConfig::default();
    let bus = Arc::new(LineBus::new(Vec::new()));
    bus.subscribe(&config.inbound_topic).await.unwrap();

    let system = RelaySystem::start_with(
        &config,
        bus.clone(),
        Arc::new(FixedDelay(Duration::from_secs(3))),
    )
    .unwrap();

    let input = concat!(
        "ORDER {\"food\": \"pizza\", \"table\": 5}\n",
        "ORDER {\"food\": \"\", \"table\": 6}\n",
        "ORDER {\"food\": \"salad\", \"table\": 7}\n",
    );
    let bridge = system.bridge.clone();
    bus.spawn_reader(Cursor::new(input.as_bytes().to_vec()), move |topic, payload| {
        bridge.on_message(topic, payload)
    })
    .unwrap()
    .join()
    .unwrap();

    tokio::time::sleep(Duration::from_secs(5)).await;
    system.shutdown().await.unwrap();

    let bus = Arc::try_unwrap(bus).ok().expect("relay released the bus");
    let output = String::from_utf8(bus.into_output()).unwrap();
    let mut lines: Vec<&str> = output.lines().collect();
    lines.sort();
    assert_eq!(
        lines,
        vec![
            "FOOD {\"food\": \"pizza\", \"table\": 5}",
            "FOOD {\"food\": \"salad\", \"table\": 7}",
        ]
    );
}
