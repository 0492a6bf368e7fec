use arm_pilot_lib::{init_tracing, JointTelemetry};
use dora_node_api::{
    arrow::array::{types::GenericBinaryType, Array, AsArray},
    DoraNode, Event,
};
use eyre::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Payload accepted by urdf-viz's `/set_joint_positions` endpoint.
#[derive(Serialize, Debug)]
struct JointPositionsRequest {
    names: Vec<String>,
    positions: Vec<f64>,
}

// urdf-viz response structure
#[derive(Deserialize, Debug)]
struct UrdfVizResponse {
    pub is_ok: bool,
    pub reason: String,
}

/// Forwards the dispatcher's joint telemetry to a running urdf-viz
/// instance so the arm motion can be watched.
struct UrdfVizBridge {
    url: String,
    client: reqwest::Client,
}

impl UrdfVizBridge {
    fn with_url(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }

    async fn send_joint_positions(&self, telemetry: &JointTelemetry) -> Result<()> {
        let endpoint = format!("{}/set_joint_positions", self.url);
        let request = JointPositionsRequest {
            names: telemetry.names.clone(),
            positions: telemetry.positions.clone(),
        };

        let response = self
            .client
            .post(&endpoint)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if response.status().is_success() {
            let result: UrdfVizResponse = response.json().await?;
            if result.is_ok {
                debug!("Joint positions sent to urdf-viz");
            } else {
                eyre::bail!("urdf-viz error: {}", result.reason);
            }
        } else {
            eyre::bail!("HTTP error: {}", response.status());
        }

        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _guard = init_tracing();

    info!("Starting urdf-viz bridge node");

    let (_node, mut events) = DoraNode::init_from_env()?;

    let urdf_viz_url =
        std::env::var("URDFVIZ_URL").unwrap_or_else(|_| "http://127.0.0.1:7777".to_string());
    info!("Forwarding joint telemetry to {}", urdf_viz_url);

    let bridge = UrdfVizBridge::with_url(urdf_viz_url);

    while let Some(event) = events.recv() {
        match event {
            Event::Input {
                id,
                metadata: _,
                data,
            } => {
                if id.as_str() != "joint_telemetry" {
                    debug!("Unknown input id: {}", id.as_str());
                    continue;
                }

                if let Some(bytes_array) = data.as_bytes_opt::<GenericBinaryType<i32>>() {
                    if bytes_array.len() > 0 {
                        let bytes = bytes_array.value(0);

                        match serde_json::from_slice::<JointTelemetry>(bytes) {
                            Ok(telemetry) => {
                                debug!(
                                    "Telemetry at tick {}: {} joints",
                                    telemetry.ticks_elapsed,
                                    telemetry.positions.len()
                                );
                                if let Err(e) = bridge.send_joint_positions(&telemetry).await {
                                    warn!("Failed to update urdf-viz: {}", e);
                                    warn!(
                                        "Make sure urdf-viz is running at the configured URL"
                                    );
                                }
                            }
                            Err(e) => {
                                warn!("Failed to parse joint telemetry: {}", e);
                            }
                        }
                    }
                }
            }

            Event::Stop(_) => {
                info!("Stop event received");
                break;
            }

            _ => {}
        }
    }

    info!("urdf-viz bridge shutting down");
    Ok(())
}
