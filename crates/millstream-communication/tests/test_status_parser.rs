use millstream_communication::status::{apply_report, parse_report};
use millstream_core::MachineStatus;

#[test]
fn test_parse_run_report() {
    let status = parse_report("<Run|MPos:-0.950,-4.887,-2.500|FS:1010,1000>");
    assert_eq!(status.state, "Run");
    assert_eq!(status.x, -0.950);
    assert_eq!(status.y, -4.887);
    assert_eq!(status.z, -2.500);
}

#[test]
fn test_parse_idle_report() {
    let status = parse_report("<Idle|MPos:0.000,0.000,0.000|FS:0,0>");
    assert_eq!(status.state, "Idle");
    assert_eq!(status.x, 0.0);
    assert_eq!(status.y, 0.0);
    assert_eq!(status.z, 0.0);
}

#[test]
fn test_parse_hold_substate() {
    let status = parse_report("<Hold:0|MPos:10.000,5.000,2.500|FS:0,0>");
    // ':' terminates the state token just like '|'
    assert_eq!(status.state, "Hold");
    assert_eq!(status.x, 10.0);
}

#[test]
fn test_feed_speed_group_is_ignored() {
    let status = parse_report("<Run|MPos:1.0,2.0,3.0|FS:9999,12000>");
    assert_eq!(status.x, 1.0);
    assert_eq!(status.y, 2.0);
    assert_eq!(status.z, 3.0);
}

#[test]
fn test_report_overwrites_previous_values() {
    let mut status = MachineStatus {
        state: "Run".to_string(),
        x: 5.0,
        y: 5.0,
        z: 5.0,
    };
    apply_report("<Idle|MPos:0.000,0.000,0.000|FS:0,0>", &mut status);
    assert_eq!(status.state, "Idle");
    assert_eq!(status.x, 0.0);
    assert_eq!(status.y, 0.0);
    assert_eq!(status.z, 0.0);
}

#[test]
fn test_garbage_never_panics() {
    for line in [
        "",
        "<",
        ">",
        "<>",
        "<|||>",
        "<Run",
        "not a report",
        "<Run|MPos:,,|FS:,>",
    ] {
        let _ = parse_report(line);
    }
}
