use millstream_communication::ResponseFramer;
use proptest::prelude::*;

/// Split `bytes` at the given cut points and feed each piece to the framer,
/// collecting any frames produced.
fn feed_chunked(bytes: &[u8], cuts: &[usize]) -> Vec<String> {
    let mut framer = ResponseFramer::new();
    let mut frames = Vec::new();

    let mut boundaries: Vec<usize> = cuts
        .iter()
        .map(|c| c % (bytes.len() + 1))
        .collect();
    boundaries.push(0);
    boundaries.push(bytes.len());
    boundaries.sort_unstable();
    boundaries.dedup();

    for pair in boundaries.windows(2) {
        if let Some(frame) = framer.push_chunk(&bytes[pair[0]..pair[1]]) {
            frames.push(frame);
        }
    }
    frames
}

proptest! {
    /// Any chunking of an ok-terminated response yields exactly one frame
    /// equal to the trimmed concatenation.
    #[test]
    fn prop_chunking_is_boundary_independent(
        body in "[ -~]{0,40}",
        cuts in proptest::collection::vec(0usize..128, 0..8),
    ) {
        // Keep the body free of the terminator conventions so the only
        // completion point is the trailing "ok".
        prop_assume!(!body.contains("ok"));
        prop_assume!(!body.trim_start().starts_with("error"));

        let line = format!("{}ok\r\n", body);
        let frames = feed_chunked(line.as_bytes(), &cuts);

        prop_assert_eq!(frames.len(), 1);
        prop_assert_eq!(frames[0].as_str(), line.trim());
    }

    /// Error frames complete on their prefix alone, under any chunking that
    /// delivers the prefix in one piece or builds it up across ticks.
    #[test]
    fn prop_error_frames_complete(
        code in 1u8..60,
        cuts in proptest::collection::vec(0usize..32, 0..4),
    ) {
        let line = format!("error:{}\r\n", code);
        let frames = feed_chunked(line.as_bytes(), &cuts);

        prop_assert!(!frames.is_empty());
        prop_assert!(frames[0].starts_with("error"));
    }
}

#[test]
fn test_two_responses_in_separate_drains() {
    let mut framer = ResponseFramer::new();
    assert_eq!(framer.push_chunk(b"ok\r\n"), Some("ok".to_string()));
    assert_eq!(framer.push_chunk(b"ok\r\n"), Some("ok".to_string()));
}

#[test]
fn test_multiline_report_with_trailing_ack() {
    let mut framer = ResponseFramer::new();
    assert_eq!(framer.push_chunk(b"<Hold|MPos:1.000,"), None);
    assert_eq!(framer.push_chunk(b"2.000,3.000|FS:0,0>"), None);
    let frame = framer.push_chunk(b"\r\nok\r\n").unwrap();
    assert!(frame.starts_with("<Hold"));
    assert!(frame.ends_with("ok"));
}
