use super::*;

#[test]
fn constants_match_ascii_and_scan_codes() {
    assert_eq!(BACKSPACE, 8);
    assert_eq!(TAB, 9);
    assert_eq!(ENTER, 13);
    assert_eq!(RETURN, ENTER);
    assert_eq!(ESCAPE, 27);
    assert_eq!(SPACE, 32);
    assert_eq!((LEFT, UP, DOWN, RIGHT), (75, 72, 80, 77));
    assert_eq!((INSERT, DELETE, HOME, END), (82, 83, 71, 79));
    assert_eq!((PAGEUP, PAGEDOWN), (73, 81));
    assert_eq!(DIGIT_0, 48);
    assert_eq!(DIGIT_9, 57);
    assert_eq!(NUM_5, DIGIT_5);
}

#[test]
fn navigation_codes_stay_ambiguous_with_letters() {
    let pairs = [
        (LEFT, 'K'),
        (UP, 'H'),
        (DOWN, 'P'),
        (RIGHT, 'M'),
        (INSERT, 'R'),
        (DELETE, 'S'),
        (HOME, 'G'),
        (END, 'O'),
        (PAGEUP, 'I'),
        (PAGEDOWN, 'Q'),
    ];
    for (code, letter) in pairs {
        assert_eq!(as_char(code), Some(letter));
        assert_eq!(key_names(code).len(), 1, "code {code} should keep its key name");
    }
}

#[test]
fn enter_and_return_share_one_name_entry() {
    assert_eq!(key_names(RETURN), vec!["ENTER"]);
    assert!(key_names('a' as KeyCode).is_empty());
}

#[test]
fn printable_excludes_control_codes() {
    assert!(is_printable('a' as KeyCode));
    assert!(is_printable(SPACE));
    assert!(!is_printable(ESCAPE));
    assert!(!is_printable(END_OF_STREAM));
    assert!(!is_printable(0));
}

#[test]
fn codes_to_string_decodes_utf8_bursts() {
    let path: Vec<KeyCode> = "path".bytes().map(KeyCode::from).collect();
    assert_eq!(codes_to_string(&path), "path");

    let accented: Vec<KeyCode> = "é".bytes().map(KeyCode::from).collect();
    assert_eq!(codes_to_string(&accented), "é");
}

#[test]
fn codes_to_string_replaces_out_of_range_codes() {
    let codes = ['a' as KeyCode, END_OF_STREAM, 'b' as KeyCode];
    assert_eq!(codes_to_string(&codes), "a\u{FFFD}b");
}

#[test]
fn end_of_stream_is_not_a_byte() {
    assert!(is_end_of_stream(END_OF_STREAM));
    assert_eq!(as_char(END_OF_STREAM), None);
}
