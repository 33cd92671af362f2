use std::fs;
use std::path::PathBuf;

use forge::menu::{append_exit_item, build_menu, ActionRef, MenuEntry};
use forge::resolver::{Resolve, ScriptResolver};
use forge::runner::{dispatch, ProcessExecutor, Status};

fn entries(names: &[&str]) -> Vec<MenuEntry> {
    names
        .iter()
        .map(|n| MenuEntry {
            label: (*n).to_string(),
            desc: None,
            script: (*n).to_string(),
        })
        .collect()
}

/// End-to-end aggregate semantics over real scripts: every task runs once,
/// in declaration order, with no early abort on failure.
#[cfg(unix)]
#[test]
fn aggregate_runs_all_scripts_in_order_past_failures() {
    let dir = tempfile::tempdir().unwrap();
    let scripts = dir.path().join("scripts");
    fs::create_dir_all(&scripts).unwrap();
    let log = dir.path().join("ran.log");
    for (name, code) in [("first", 0), ("second", 1), ("third", 0)] {
        fs::write(
            scripts.join(name),
            format!("echo {name} >> {}\nexit {code}\n", log.display()),
        )
        .unwrap();
    }

    let mut menu = build_menu(&entries(&["first", "second", "third"]), true).unwrap();
    append_exit_item(&mut menu);
    let tasks = menu.concrete_tasks();
    assert_eq!(tasks.len(), 3);

    let resolver = ScriptResolver::new(scripts, PathBuf::from(dir.path()));
    let mut executor = ProcessExecutor;
    let outcomes = dispatch(&resolver, &mut executor, &tasks);

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].1.status, Status::Success);
    assert_eq!(outcomes[1].1.exit_code, Some(1));
    assert!(matches!(outcomes[1].1.status, Status::Failure(_)));
    assert_eq!(outcomes[2].1.status, Status::Success);

    let ran = fs::read_to_string(&log).unwrap();
    assert_eq!(ran, "first\nsecond\nthird\n");
}

#[cfg(unix)]
#[test]
fn missing_script_is_reported_without_stopping_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let scripts = dir.path().join("scripts");
    fs::create_dir_all(&scripts).unwrap();
    fs::write(scripts.join("real"), "exit 0\n").unwrap();

    let tasks = vec![
        ("Ghost".to_string(), ActionRef::Script("ghost".to_string())),
        ("Real".to_string(), ActionRef::Script("real".to_string())),
    ];
    let resolver = ScriptResolver::new(scripts, PathBuf::from(dir.path()));
    let outcomes = dispatch(&resolver, &mut ProcessExecutor, &tasks);
    assert_eq!(outcomes[0].1.status, Status::NotFound);
    assert_eq!(outcomes[1].1.status, Status::Success);
}

#[test]
fn exit_item_never_reaches_the_resolver() {
    let mut menu = build_menu(&entries(&["a", "b"]), true).unwrap();
    append_exit_item(&mut menu);
    // The aggregate expansion must not include the exit item, so selecting
    // "run everything" can never shut the session down mid-batch.
    assert!(menu
        .concrete_tasks()
        .iter()
        .all(|(_, action)| !matches!(action, ActionRef::Exit | ActionRef::Aggregate)));

    let dir = tempfile::tempdir().unwrap();
    let resolver = ScriptResolver::new(dir.path().join("scripts"), PathBuf::from(dir.path()));
    assert!(resolver.resolve(&ActionRef::Exit).is_none());
}
