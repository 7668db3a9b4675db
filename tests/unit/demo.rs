use super::*;
use keyhit::poller::scripted::ScriptedPoller;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn run_to_string(scenario: Scenario, json: bool, poller: ScriptedPoller) -> String {
    let stop = AtomicBool::new(false);
    let mut out = Vec::new();
    run(
        Options { scenario, json },
        poller,
        ClassifierConfig::default(),
        &mut out,
        &stop,
    )
    .unwrap();
    String::from_utf8(out).unwrap()
}

/// Each burst, then ESC, followed by two empty polls: one ends the drain,
/// the next is the idle tick that flushes.
fn typed_then_escape(bursts: &[&[u8]]) -> ScriptedPoller {
    let mut poller = ScriptedPoller::new();
    for burst in bursts.iter().copied().chain([&[ESCAPE as u8][..]]) {
        poller.schedule(burst).schedule(b"").schedule(b"");
    }
    poller
}

#[test]
fn parse_args_accepts_a_scenario_with_or_without_dashes() {
    assert_eq!(
        parse_args(args(&["codes"])),
        Some(Options {
            scenario: Scenario::Codes,
            json: false
        })
    );
    assert_eq!(
        parse_args(args(&["--receiver", "--json"])),
        Some(Options {
            scenario: Scenario::Receiver,
            json: true
        })
    );
}

#[test]
fn parse_args_rejects_missing_or_unknown_flags() {
    assert_eq!(parse_args(args(&[])), None);
    assert_eq!(parse_args(args(&["--json"])), None);
    assert_eq!(parse_args(args(&["--bogus"])), None);
    assert!(usage().contains("ESC"));
}

#[test]
fn codes_scenario_prints_each_code_and_stops_at_escape() {
    let mut poller = ScriptedPoller::new();
    poller.type_bytes(b"hK").schedule(b"").schedule(&[27]);
    let text = run_to_string(Scenario::Codes, false, poller);

    assert!(text.contains("Read Code: 104 'h'"));
    assert!(text.contains("Read Code: 75 [LEFT] 'K'"));
    assert!(text.contains("Read Code: 27 [ESCAPE]"));
}

#[test]
fn codes_scenario_stops_at_end_of_stream() {
    let mut poller = ScriptedPoller::new();
    poller.type_bytes(b"a");
    let stop = AtomicBool::new(false);
    let mut out = Vec::new();
    let mut lying = Overcount(poller);
    run_codes(&mut lying, &mut out, &stop, false).unwrap();
    assert!(String::from_utf8(out).unwrap().contains("Read Code: 97"));
}

/// Reports one byte more than it can deliver, like a stream closing mid-burst.
struct Overcount(ScriptedPoller);

impl Poller for Overcount {
    fn key_hit(&mut self) -> usize {
        self.0.key_hit() + 1
    }

    fn read_key(&mut self) -> KeyCode {
        self.0.read_key()
    }
}

#[test]
fn classify_scenario_reports_keys_and_text() {
    let poller = typed_then_escape(&[b"x", b"/tmp/file"]);
    let text = run_to_string(Scenario::Classify, false, poller);

    assert!(text.contains("Key: 120 'x'"));
    assert!(text.contains("Text: /tmp/file (9 bytes)"));
    assert!(text.contains("Key: 27 [ESCAPE]"));
}

#[test]
fn receiver_scenario_summarizes_dropped_paths() {
    let poller = typed_then_escape(&[b"/a/b", b"q"]);
    let text = run_to_string(Scenario::Receiver, false, poller);

    assert!(text.contains("Text: /a/b (4 bytes)"));
    assert!(text.contains("2 keystrokes, 1 paths dropped"));
    assert!(text.contains("  /a/b"));
}

#[test]
fn json_output_is_one_object_per_event() {
    let poller = typed_then_escape(&[b"hi"]);
    let text = run_to_string(Scenario::Classify, true, poller);
    let lines: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(
        lines,
        vec![
            serde_json::json!({ "kind": "text", "codes": [104, 105], "text": "hi" }),
            serde_json::json!({ "kind": "keystroke", "code": 27, "text": "\u{1b}" }),
        ]
    );
}

#[test]
fn stop_flag_ends_the_loop_before_any_poll() {
    let stop = AtomicBool::new(true);
    let mut poller = ScriptedPoller::new();
    let mut out = Vec::new();
    run(
        Options {
            scenario: Scenario::Receiver,
            json: true,
        },
        &mut poller,
        ClassifierConfig::default(),
        &mut out,
        &stop,
    )
    .unwrap();
    assert_eq!(poller.hits(), 0);
    assert!(out.is_empty());
}
