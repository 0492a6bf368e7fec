use arm_pilot_lib::{
    init_tracing, ArmConfig, DhKinematics, Pacing, SimulatedActuator, ToolCallWithMetadata,
    ToolDispatcher,
};
use dora_node_api::{
    arrow::array::{Array, BinaryArray},
    dora_core::config::DataId,
    DoraNode, Event,
};
use eyre::Result;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info, warn};

fn build_dispatcher() -> Result<ToolDispatcher<SimulatedActuator, DhKinematics>> {
    let config_path =
        std::env::var("ARM_CONFIG").unwrap_or_else(|_| "config/arm_7dof.toml".to_string());

    let config = ArmConfig::load_from_file(&config_path)
        .map_err(|e| eyre::eyre!("Failed to load arm config from {}: {}", config_path, e))?;
    config.validate()?;

    info!("Loaded arm configuration: {} DOF", config.dof);
    info!(
        "Trajectory sampling: {} arm steps, {} gripper steps",
        config.control.arm_steps, config.control.gripper_steps
    );

    let solver = DhKinematics::from_config(&config);

    // The workcell starts at home with the gripper open.
    let mut actuator = SimulatedActuator::new(
        config.home_configuration.clone(),
        config.gripper.open_limit,
        config.gripper.mirror_sign,
    );
    if config.control.pacing_every_ticks > 0 {
        actuator = actuator.with_pacing(Pacing {
            every_ticks: config.control.pacing_every_ticks,
            sleep: Duration::from_millis(config.control.pacing_sleep_ms),
        });
    }

    Ok(ToolDispatcher::new(actuator, solver, config))
}

fn main() -> Result<(), Box<dyn Error>> {
    let _guard = init_tracing();

    info!("Starting tool dispatcher node");

    let (mut node, mut events) = DoraNode::init_from_env()?;
    let result_output = DataId::from("tool_result".to_owned());
    let telemetry_output = DataId::from("joint_telemetry".to_owned());

    let mut dispatcher = build_dispatcher()?;

    info!("Tool dispatcher ready");

    while let Some(event) = events.recv() {
        match event {
            Event::Input {
                id,
                metadata: _,
                data,
            } => {
                let id_str = id.as_str();
                debug!("Received input: {}", id_str);

                match id_str {
                    "tool_call" => {
                        if let Some(array) = data.as_any().downcast_ref::<BinaryArray>() {
                            if array.len() > 0 {
                                let bytes = array.value(0);

                                match serde_json::from_slice::<ToolCallWithMetadata>(bytes) {
                                    Ok(request) => {
                                        info!(
                                            "Received tool call {} (command {})",
                                            request.call.tool, request.metadata.command_id
                                        );

                                        // Blocks until the trajectory drains; the
                                        // dataflow buffers further calls meanwhile.
                                        let payload = match dispatcher
                                            .dispatch(&request.call.tool, &request.call.args)
                                        {
                                            Ok(response) => serde_json::to_vec(&response)?,
                                            Err(e) => {
                                                warn!("Tool call {} failed: {}", request.call.tool, e);
                                                serde_json::to_vec(&serde_json::json!({
                                                    "tool": request.call.tool,
                                                    "error": e.to_string(),
                                                    "args": request.call.args,
                                                }))?
                                            }
                                        };

                                        let arrow_data =
                                            BinaryArray::from_vec(vec![payload.as_slice()]);
                                        if let Err(e) = node.send_output(
                                            result_output.clone(),
                                            Default::default(),
                                            arrow_data,
                                        ) {
                                            warn!("Failed to send tool result: {}", e);
                                        }

                                        let telemetry =
                                            serde_json::to_vec(&dispatcher.telemetry())?;
                                        let arrow_data =
                                            BinaryArray::from_vec(vec![telemetry.as_slice()]);
                                        if let Err(e) = node.send_output(
                                            telemetry_output.clone(),
                                            Default::default(),
                                            arrow_data,
                                        ) {
                                            warn!("Failed to send joint telemetry: {}", e);
                                        }
                                    }
                                    Err(e) => {
                                        warn!("Failed to parse tool call: {}", e);
                                    }
                                }
                            }
                        }
                    }

                    _ => {
                        debug!("Unknown input id: {}", id_str);
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

    info!("Tool dispatcher shutting down");
    Ok(())
}
