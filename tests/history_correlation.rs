mod common;

use std::time::Duration;

use common::hist_record;
use stoker::history::ExecutionHistory;

#[test]
fn start_then_done_yields_one_entry_with_parsed_fields() {
    let history = ExecutionHistory::new(10);

    history.append(&hist_record(
        "Backup",
        "1",
        "START",
        "2026-08-23T10:00:00.000000",
        "starting",
    ));
    assert!(history.is_empty(), "START alone must not produce an entry");

    history.append(&hist_record(
        "Backup",
        "1",
        "DONE",
        "2026-08-23T10:00:02.500000",
        "OK/task:Nightly finished",
    ));

    let entries = history.snapshot();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.time, "2026-08-23T10:00:02.500000");
    assert_eq!(entry.task, "Backup");
    assert_eq!(entry.task_id, "1");
    assert_eq!(entry.trigger, "Nightly");
    assert_eq!(entry.success, "OK");
    assert_eq!(entry.message, "finished");
    assert_eq!(entry.duration, Duration::from_millis(2500));
}

#[test]
fn capacity_eviction_is_strictly_oldest_first() {
    let history = ExecutionHistory::new(2);

    for (i, name) in ["First", "Second", "Third"].iter().enumerate() {
        let start = format!("2026-08-23T10:0{i}:00.000000");
        let end = format!("2026-08-23T10:0{i}:01.000000");
        history.append(&hist_record(name, "1", "START", &start, "starting"));
        history.append(&hist_record(
            name,
            "1",
            "DONE",
            &end,
            "OK/task:Cron finished",
        ));
    }

    let entries = history.snapshot();
    assert_eq!(entries.len(), 2, "history must never exceed its capacity");
    assert_eq!(entries[0].task, "Second");
    assert_eq!(entries[1].task, "Third");
}

#[test]
fn terminal_without_start_degrades_to_zero_duration() {
    let history = ExecutionHistory::new(10);

    history.append(&hist_record(
        "Orphan",
        "7",
        "DONE",
        "2026-08-23T10:00:05.000000",
        "FAIL/task:Cron gave up",
    ));

    let entries = history.snapshot();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].duration, Duration::ZERO);
    assert_eq!(entries[0].success, "FAIL");
    assert_eq!(entries[0].trigger, "Cron");
    assert_eq!(entries[0].message, "gave up");
}

#[test]
fn malformed_terminal_message_keeps_raw_text() {
    let history = ExecutionHistory::new(10);

    history.append(&hist_record(
        "Backup",
        "1",
        "START",
        "2026-08-23T10:00:00.000000",
        "starting",
    ));
    history.append(&hist_record(
        "Backup",
        "1",
        "DONE",
        "2026-08-23T10:00:01.000000",
        "finished without the usual shape",
    ));

    let entries = history.snapshot();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].success, "IND");
    assert_eq!(entries[0].trigger, "");
    assert_eq!(entries[0].message, "finished without the usual shape");
    assert_eq!(entries[0].duration, Duration::from_secs(1));
}

#[test]
fn duplicate_start_overwrites_the_open_timestamp() {
    let history = ExecutionHistory::new(10);

    history.append(&hist_record(
        "Backup",
        "1",
        "START",
        "2026-08-23T10:00:00.000000",
        "starting",
    ));
    history.append(&hist_record(
        "Backup",
        "1",
        "START",
        "2026-08-23T10:00:10.000000",
        "starting again",
    ));
    history.append(&hist_record(
        "Backup",
        "1",
        "DONE",
        "2026-08-23T10:00:12.000000",
        "OK/task:Cron finished",
    ));

    let entries = history.snapshot();
    assert_eq!(entries.len(), 1, "only one entry despite two STARTs");
    assert_eq!(
        entries[0].duration,
        Duration::from_secs(2),
        "duration must be measured from the most recent START"
    );
}

#[test]
fn unparseable_start_timestamp_falls_back_to_zero_duration() {
    let history = ExecutionHistory::new(10);

    history.append(&hist_record("Backup", "1", "START", "not-a-time", "starting"));
    history.append(&hist_record(
        "Backup",
        "1",
        "DONE",
        "2026-08-23T10:00:01.000000",
        "OK/task:Cron finished",
    ));

    let entries = history.snapshot();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].duration, Duration::ZERO);
    // The message is still parsed normally; only the duration degrades.
    assert_eq!(entries[0].trigger, "Cron");
    assert_eq!(entries[0].success, "OK");
    assert_eq!(entries[0].message, "finished");
}

#[test]
fn unparseable_terminal_timestamp_falls_back_to_zero_duration() {
    let history = ExecutionHistory::new(10);

    history.append(&hist_record(
        "Backup",
        "1",
        "START",
        "2026-08-23T10:00:00.000000",
        "starting",
    ));
    history.append(&hist_record(
        "Backup",
        "1",
        "DONE",
        "also-not-a-time",
        "OK/task:Cron finished",
    ));

    let entries = history.snapshot();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].duration, Duration::ZERO);
    assert_eq!(entries[0].time, "also-not-a-time", "end time is kept verbatim");
    assert_eq!(entries[0].trigger, "Cron");
    assert_eq!(entries[0].success, "OK");
}

#[test]
fn distinct_item_ids_are_correlated_independently() {
    let history = ExecutionHistory::new(10);

    history.append(&hist_record(
        "Backup",
        "1",
        "START",
        "2026-08-23T10:00:00.000000",
        "starting",
    ));
    history.append(&hist_record(
        "Backup",
        "2",
        "START",
        "2026-08-23T10:00:01.000000",
        "starting",
    ));
    history.append(&hist_record(
        "Backup",
        "2",
        "DONE",
        "2026-08-23T10:00:02.000000",
        "OK/task:Cron finished",
    ));
    history.append(&hist_record(
        "Backup",
        "1",
        "DONE",
        "2026-08-23T10:00:04.000000",
        "FAIL/task:Cron broke",
    ));

    let entries = history.snapshot();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].task_id, "2");
    assert_eq!(entries[0].duration, Duration::from_secs(1));
    assert_eq!(entries[1].task_id, "1");
    assert_eq!(entries[1].duration, Duration::from_secs(4));
}
