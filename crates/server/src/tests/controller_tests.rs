use super::*;

use tokio::time::timeout;

const SLOW_TICK: Duration = Duration::from_secs(3600);
const FAST_TICK: Duration = Duration::from_millis(200);

struct Fixture {
    gate: GestureGate,
    hub: Arc<Hub>,
    samples: mpsc::Sender<HandSample>,
    lines: mpsc::UnboundedReceiver<Arc<str>>,
    _shutdown: watch::Sender<bool>,
}

fn spawn_controller(update_interval: Duration) -> Fixture {
    let gate = GestureGate::new();
    let hub = Arc::new(Hub::new());
    let (_id, lines) = hub.subscribe();
    let (sample_tx, sample_rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let controller = Controller::new(
        TimeDial::default(),
        gate.clone(),
        Arc::clone(&hub),
        update_interval,
        Duration::from_millis(10),
    );
    tokio::spawn(controller.run(ChannelSource::new(sample_rx), shutdown_rx));

    Fixture {
        gate,
        hub,
        samples: sample_tx,
        lines,
        _shutdown: shutdown_tx,
    }
}

async fn next_record(lines: &mut mpsc::UnboundedReceiver<Arc<str>>) -> serde_json::Value {
    let line = timeout(Duration::from_secs(2), lines.recv())
        .await
        .expect("line in time")
        .expect("line");
    serde_json::from_str(line.trim_end()).expect("json")
}

/// Open the gate and give the controller a beat to enter its active phase,
/// so samples sent next are not discarded by the closed-gate loop.
async fn open_gate(gate: &GestureGate) {
    gate.enable();
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn fist_commits_the_final_time_then_closes_the_gate() {
    let mut fx = spawn_controller(SLOW_TICK);
    open_gate(&fx.gate).await;

    fx.samples
        .send(HandSample { x: 1.0, fist: false })
        .await
        .expect("send sample");
    fx.samples
        .send(HandSample { x: 0.0, fist: true })
        .await
        .expect("send fist");

    let final_record = next_record(&mut fx.lines).await;
    assert_eq!(final_record["type"], "gesture_time_final");
    assert_eq!(final_record["minutes"], 690);
    assert_eq!(final_record["time"], "11:30");

    let toggled = next_record(&mut fx.lines).await;
    assert_eq!(toggled["type"], "gesture_mode_toggled");
    assert_eq!(toggled["enabled"], false);

    assert!(!fx.gate.is_enabled());
}

#[tokio::test]
async fn updates_are_rate_limited_to_the_most_recent_sample() {
    let mut fx = spawn_controller(FAST_TICK);
    open_gate(&fx.gate).await;

    // A burst of samples inside one interval collapses to the latest.
    for x in [0.1, 0.2, 0.0] {
        fx.samples
            .send(HandSample { x, fist: false })
            .await
            .expect("send sample");
    }

    let update = next_record(&mut fx.lines).await;
    assert_eq!(update["type"], "gesture_time_update");
    assert_eq!(update["minutes"], 210);
    assert_eq!(update["time"], "03:30");
}

#[tokio::test]
async fn external_disable_reports_the_final_time_exactly_once() {
    let mut fx = spawn_controller(SLOW_TICK);
    open_gate(&fx.gate).await;

    fx.samples
        .send(HandSample { x: 0.5, fist: false })
        .await
        .expect("send sample");
    // Give the controller a beat to consume the sample before disabling.
    tokio::time::sleep(Duration::from_millis(50)).await;
    fx.gate.disable();

    let final_record = next_record(&mut fx.lines).await;
    assert_eq!(final_record["type"], "gesture_time_final");
    assert_eq!(final_record["minutes"], 450);

    let toggled = next_record(&mut fx.lines).await;
    assert_eq!(toggled["type"], "gesture_mode_toggled");
    assert_eq!(toggled["enabled"], false);

    // Samples sent while the gate is closed are discarded, and no second
    // final report appears.
    fx.samples
        .send(HandSample { x: 0.9, fist: true })
        .await
        .expect("send stale sample");
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(fx.lines.try_recv().is_err());
}

#[tokio::test]
async fn nothing_is_reported_while_the_gate_is_closed() {
    let mut fx = spawn_controller(FAST_TICK);

    fx.samples
        .send(HandSample { x: 0.9, fist: false })
        .await
        .expect("send sample");
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert!(fx.lines.try_recv().is_err());
    assert_eq!(fx.hub.subscriber_count(), 1);
}

#[tokio::test]
async fn reenabling_starts_a_fresh_phase_from_the_base_time() {
    let mut fx = spawn_controller(SLOW_TICK);
    open_gate(&fx.gate).await;
    fx.samples
        .send(HandSample { x: 1.0, fist: false })
        .await
        .expect("send sample");
    tokio::time::sleep(Duration::from_millis(50)).await;
    fx.gate.disable();

    let first_final = next_record(&mut fx.lines).await;
    assert_eq!(first_final["minutes"], 690);
    let _ = next_record(&mut fx.lines).await; // gesture_mode_toggled

    // Second phase: no samples at all, external disable reports base time.
    open_gate(&fx.gate).await;
    fx.gate.disable();

    let second_final = next_record(&mut fx.lines).await;
    assert_eq!(second_final["type"], "gesture_time_final");
    assert_eq!(second_final["minutes"], 450);
}
