//! End to end behaviour against the simulated arm over loopback UDP.

use arm_lib::{
    arm_client::{ArmClient, ArmClientError},
    params::MotionParams,
};
use comms_if::net::{NetParams, Transport, UdpTransport};
use mech_sim::{SimHandle, SimParams, SimServer};

fn start_sim(drop_every: u32) -> SimHandle {
    SimServer::new(&SimParams {
        bind_address: String::from("127.0.0.1:0"),
        num_joints: 7,
        max_angle_deg: 180.0,
        drop_every,
    })
    .unwrap()
    .spawn()
    .unwrap()
}

fn udp_client(sim: &SimHandle) -> ArmClient<UdpTransport> {
    let net = NetParams {
        peer_address: String::from("127.0.0.1"),
        peer_port: sim.addr().port(),
        timeout_s: 0.2,
    };
    let motion = MotionParams {
        step_delay_s: 0.0,
        trajectory_pause_s: 0.0,
        ..MotionParams::default()
    };

    ArmClient::new(UdpTransport::new(net), 7, motion)
}

#[test]
fn test_session() {
    let sim = start_sim(0);
    let mut client = udp_client(&sim);

    client.connect().unwrap();
    assert_eq!(client.get_all_joint_angles(), vec![0.0; 7]);

    for joint in 0..7 {
        client.set_joint_limits(joint, 0.0, 180.0).unwrap();
    }
    client.set_joint_offset(6, 2.5).unwrap();

    client.set_joint_angle(0, 12.0).unwrap();
    client.set_joint_angle_unsafe(6, 40.0).unwrap();
    assert_eq!(client.get_joint_angle(0).unwrap(), 12.0);
    assert_eq!(client.get_joint_angle(6).unwrap(), 42.5);

    client
        .execute_trajectory(
            &[vec![10.0; 7], vec![20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0]],
            50.0,
        )
        .unwrap();
    assert_eq!(
        client.get_all_joint_angles(),
        vec![20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 82.5]
    );

    client.set_joint_offset(6, 0.0).unwrap();
    client.move_to_home().unwrap();
    assert_eq!(client.get_all_joint_angles(), vec![0.0; 7]);

    client.disconnect();
    assert!(!client.is_connected());
    assert!(matches!(
        client.move_to_home(),
        Err(ArmClientError::NotConnected)
    ));
}

#[test]
fn test_connect_timeout() {
    let sim = start_sim(1);
    let mut client = udp_client(&sim);

    // Every request is dropped so the handshake times out
    assert!(matches!(
        client.connect(),
        Err(ArmClientError::ProtocolTimeout)
    ));
    assert!(!client.is_connected());
    assert!(!client.transport().is_open());
}

#[test]
fn test_packet_loss() {
    // Requests 3, 6, 9, ... are dropped
    let sim = start_sim(3);
    let mut client = udp_client(&sim);

    // Requests 1 and 2
    client.connect().unwrap();

    // Requests 3 to 7, two of which are lost
    client.set_stepwise(0, 5.0, 50.0, 1.0, 0.0).unwrap();
    assert_eq!(client.joint_table().get(0).unwrap().current_angle_deg, 5.0);

    // Request 8, the last step did arrive
    assert_eq!(client.get_joint_angle(0).unwrap(), 5.0);

    // Request 9 is lost, the single command move fails without changing the estimate
    assert!(matches!(
        client.set_unsafe(0, 10.0, 50.0),
        Err(ArmClientError::ProtocolTimeout)
    ));
    assert_eq!(client.joint_table().get(0).unwrap().current_angle_deg, 5.0);

    // Request 10 succeeds
    client.set_unsafe(0, 10.0, 50.0).unwrap();
    assert_eq!(client.joint_table().get(0).unwrap().current_angle_deg, 10.0);
}
