//! Telecommand execution against a scripted transport.

mod common;

use arm_lib::{
    arm_client::ArmClientError,
    params::{ArmExecParams, JointParams},
    tc_processor::{exec, TcOutput},
};
use comms_if::tc::{self, ArmCmd};

fn params(num_joints: usize) -> ArmExecParams {
    let mut params = ArmExecParams::default();
    params.num_joints = num_joints;
    params.motion.speed = 30.0;
    params.motion.step_delay_s = 0.0;
    params.motion.trajectory_pause_s = 0.0;
    params
}

#[test]
fn test_connect_applies_joint_params() {
    let mut params = params(3);
    params.joints = vec![
        JointParams {
            min_deg: 0.0,
            max_deg: 180.0,
            offset_deg: 0.0,
        },
        JointParams {
            offset_deg: 4.0,
            ..JointParams::default()
        },
    ];

    let (mut client, handle) = common::client(3);
    handle.borrow_mut().push("OK");
    handle.borrow_mut().push("0.00,0.00,0.00");

    assert_eq!(exec(&mut client, &ArmCmd::Connect, &params).unwrap(), TcOutput::None);
    assert!(client.is_connected());

    let table = client.joint_table();
    assert_eq!(table.get(0).unwrap().limit.min_deg(), 0.0);
    assert_eq!(table.get(1).unwrap().offset_deg, 4.0);
    assert_eq!(table.get(2).unwrap().limit.min_deg(), -180.0);
}

#[test]
fn test_reconnect_keeps_joint_config() {
    let mut params = params(2);
    params.joints = vec![JointParams {
        offset_deg: 4.0,
        ..JointParams::default()
    }];

    let (mut client, handle) = common::client(2);
    handle.borrow_mut().push("OK");
    handle.borrow_mut().push("0.00,0.00");
    exec(&mut client, &ArmCmd::Connect, &params).unwrap();

    exec(
        &mut client,
        &ArmCmd::Offset {
            joint: 0,
            offset_deg: 7.0,
        },
        &params,
    )
    .unwrap();
    handle.borrow_mut().sent.clear();

    exec(&mut client, &ArmCmd::Connect, &params).unwrap();

    assert!(handle.borrow().sent.is_empty());
    assert_eq!(client.joint_table().get(0).unwrap().offset_deg, 7.0);
}

#[test]
fn test_connect_rejects_extra_joint_params() {
    let mut params = params(1);
    params.joints = vec![JointParams::default(); 2];

    let (mut client, handle) = common::client(1);
    handle.borrow_mut().push("OK");
    handle.borrow_mut().push("0.00");

    assert!(matches!(
        exec(&mut client, &ArmCmd::Connect, &params),
        Err(ArmClientError::InvalidJointIndex { .. })
    ));
}

#[test]
fn test_defaults_filled_from_params() {
    let params = params(2);
    let (mut client, handle) = common::connected_client(2);

    let cmd = tc::from_json(r#"{"joint": {"joint": 0, "angle_deg": 2.0}}"#).unwrap();
    exec(&mut client, &cmd, &params).unwrap();

    let cmd = tc::from_json(r#"{"joint_unsafe": {"joint": 1, "angle_deg": 7.0, "speed": 5.0}}"#)
        .unwrap();
    exec(&mut client, &cmd, &params).unwrap();

    assert_eq!(
        handle.borrow_mut().take_sent(),
        vec![
            "SET_JOINT_ANGLE,0,1.00,30.00\n",
            "SET_JOINT_ANGLE,0,2.00,30.00\n",
            "SET_JOINT_ANGLE,1,7.00,5.00\n",
        ]
    );
}

#[test]
fn test_get() {
    let params = params(2);
    let (mut client, handle) = common::connected_client(2);

    handle.borrow_mut().push("12.00,34.00");
    assert_eq!(
        exec(&mut client, &ArmCmd::Get { joint: Some(1) }, &params).unwrap(),
        TcOutput::JointAngle {
            joint: 1,
            angle_deg: 34.0
        }
    );

    handle.borrow_mut().push("56.00,78.00");
    assert_eq!(
        exec(&mut client, &ArmCmd::Get { joint: None }, &params).unwrap(),
        TcOutput::JointAngles(vec![56.0, 78.0])
    );
}

#[test]
fn test_axis() {
    let params = params(1);
    let (mut client, handle) = common::connected_client(1);

    // Straight to the centre in one step
    let mut params_big_step = params.clone();
    params_big_step.motion.step_deg = 180.0;
    exec(
        &mut client,
        &ArmCmd::Axis {
            joint: 0,
            value: 0.0,
        },
        &params_big_step,
    )
    .unwrap();
    assert_eq!(
        handle.borrow_mut().take_sent(),
        vec!["SET_JOINT_ANGLE,0,90.00,30.00\n"]
    );

    exec(
        &mut client,
        &ArmCmd::Axis {
            joint: 0,
            value: 0.5,
        },
        &params,
    )
    .unwrap();
    assert_eq!(handle.borrow_mut().take_sent().len(), 23);
    assert_eq!(client.joint_table().get(0).unwrap().current_angle_deg, 112.5);
}

#[test]
fn test_traj_and_home() {
    let params = params(2);
    let (mut client, handle) = common::connected_client(2);

    let cmd = tc::from_json(r#"{"traj": {"points": [[1.0, 2.0], [3.0, 4.0]]}}"#).unwrap();
    exec(&mut client, &cmd, &params).unwrap();
    exec(&mut client, &ArmCmd::Home, &params).unwrap();

    assert_eq!(
        handle.borrow_mut().take_sent(),
        vec![
            "SET_ALL_JOINT_ANGLES,1.00,2.00,30.00\n",
            "SET_ALL_JOINT_ANGLES,3.00,4.00,30.00\n",
            "SET_ALL_JOINT_ANGLES,0.00,0.00,50.00\n",
        ]
    );
}

#[test]
fn test_limits_offset_and_disconnect() {
    let params = params(2);
    let (mut client, handle) = common::connected_client(2);

    exec(
        &mut client,
        &ArmCmd::Limits {
            joint: 0,
            min_deg: 0.0,
            max_deg: 10.0,
        },
        &params,
    )
    .unwrap();
    exec(
        &mut client,
        &ArmCmd::Offset {
            joint: 0,
            offset_deg: 1.0,
        },
        &params,
    )
    .unwrap();

    assert!(matches!(
        exec(
            &mut client,
            &ArmCmd::All {
                angles_deg: vec![9.5, 0.0],
                speed: None
            },
            &params
        ),
        Err(ArmClientError::LimitViolation { joint: 0, .. })
    ));

    exec(&mut client, &ArmCmd::Disconnect, &params).unwrap();
    assert!(!client.is_connected());
    assert_eq!(handle.borrow_mut().take_sent(), vec!["DISCONNECT\n"]);
}
