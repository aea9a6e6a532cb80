// Mux stand-in: publishes enable flags so the keyboard slot can be toggled
//
// Usage: cargo run --example mux_publisher -- [on|off] [slot]
// Example: cargo run --example mux_publisher -- on 1

use manual_control_node::config::{topic_key_expr, DEFAULT_KEY_MUX_IDX, DEFAULT_MUX_STATE_TOPIC};
use manual_control_node::messages::MuxState;
use std::time::Duration;
use tracing::info;

const MUX_SIZE: usize = 4;
const PUBLISH_HZ: u64 = 10;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let mut args = std::env::args().skip(1);
    let enabled = args.next().as_deref() != Some("off");
    let slot = match args.next() {
        Some(s) => s.parse::<usize>()?,
        None => DEFAULT_KEY_MUX_IDX,
    };
    if slot >= MUX_SIZE {
        return Err(format!("slot must be < {}", MUX_SIZE).into());
    }

    let mut state = MuxState {
        data: vec![0; MUX_SIZE],
    };
    state.data[slot] = i32::from(enabled);

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let topic = topic_key_expr("mux_state_topic", DEFAULT_MUX_STATE_TOPIC)?;
    let publisher = session.declare_publisher(topic.clone()).await?;

    info!("Publishing {:?} on {} (Ctrl-C to stop)", state.data, topic);

    let mut tick = tokio::time::interval(Duration::from_millis(1000 / PUBLISH_HZ));
    loop {
        tokio::select! {
            _ = tick.tick() => {
                publisher.put(serde_json::to_string(&state)?).await?;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}
