use std::str::FromStr;

use stoker::record::{Channel, Level, PRODUCER_NAME, RecordBuilder, decode_line};

#[test]
fn decodes_a_full_record_line() {
    let line = r#"{"time":"2026-08-23T10:00:00.123456","application":"whenever","level":"INFO","emitter":"task","action":"run","item":"Backup","item_id":1,"when":"HIST","status":"START","message":"starting"}"#;
    let record = decode_line(line).unwrap();

    assert_eq!(record.time, "2026-08-23T10:00:00.123456");
    assert_eq!(record.application, "whenever");
    assert_eq!(record.level, Level::Info);
    assert_eq!(record.emitter, "task");
    assert_eq!(record.action, "run");
    assert_eq!(record.item.as_deref(), Some("Backup"));
    // Numeric ids are normalized to strings.
    assert_eq!(record.item_id.as_deref(), Some("1"));
    assert_eq!(record.channel(), Channel::Hist);
    assert!(record.parsed_time().is_some());
}

#[test]
fn null_identity_pair_decodes_to_none() {
    let line = r#"{"time":"2026-08-23T10:00:00.000000","application":"whenever","level":"ERROR","emitter":"core","action":"tick","item":null,"item_id":null,"when":"PROC","status":"MSG","message":"boom"}"#;
    let record = decode_line(line).unwrap();

    assert_eq!(record.item, None);
    assert_eq!(record.item_id, None);
    assert_eq!(record.channel(), Channel::Plain);
}

#[test]
fn malformed_or_incomplete_lines_are_errors() {
    assert!(decode_line("this is not json").is_err());
    // Missing required fields (no `message`).
    let line = r#"{"time":"2026-08-23T10:00:00.000000","application":"whenever","level":"INFO","emitter":"task","action":"run","item":null,"item_id":null,"when":"PROC","status":"MSG"}"#;
    assert!(decode_line(line).is_err());
    // Unknown level name.
    let line = r#"{"time":"2026-08-23T10:00:00.000000","application":"whenever","level":"LOUD","emitter":"task","action":"run","item":null,"item_id":null,"when":"PROC","status":"MSG","message":"m"}"#;
    assert!(decode_line(line).is_err());
}

#[test]
fn levels_form_a_total_order() {
    assert!(Level::Trace < Level::Debug);
    assert!(Level::Debug < Level::Info);
    assert!(Level::Info < Level::Warn);
    assert!(Level::Warn < Level::Error);

    assert_eq!(Level::from_str("warn").unwrap(), Level::Warn);
    assert_eq!(Level::from_str("WARNING").unwrap(), Level::Warn);
    assert!(Level::from_str("loud").is_err());
    assert_eq!(Level::Error.to_string(), "ERROR");
}

#[test]
fn channel_tags_classify_as_expected() {
    assert_eq!(Channel::from_when("HIST"), Channel::Hist);
    assert_eq!(Channel::from_when("BUSY"), Channel::Busy);
    assert_eq!(Channel::from_when("PAUSE"), Channel::Pause);
    assert_eq!(Channel::from_when("PROC"), Channel::Plain);
    assert_eq!(Channel::from_when(""), Channel::Plain);
}

#[test]
fn builder_fails_fast_on_missing_required_fields() {
    assert!(RecordBuilder::new().emitter("e").action("a").build().is_err());
    assert!(RecordBuilder::new().message("m").action("a").build().is_err());
    assert!(RecordBuilder::new().message("m").emitter("e").build().is_err());
}

#[test]
fn builder_defaults_are_sensible() {
    let record = RecordBuilder::new()
        .message("m")
        .emitter("e")
        .action("a")
        .build()
        .unwrap();

    assert_eq!(record.application, PRODUCER_NAME);
    assert_eq!(record.level, Level::Info);
    assert_eq!(record.item, None);
    assert_eq!(record.channel(), Channel::Plain);
    assert!(
        record.parsed_time().is_some(),
        "default timestamp must be in the wire format"
    );
}
