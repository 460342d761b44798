use std::cell::RefCell;
use std::rc::Rc;

use eframe_snip::export::ImageBlob;
use eframe_snip::lifecycle::{Lifecycle, QueueMode, Status};

type Calls = Rc<RefCell<Vec<Option<ImageBlob>>>>;

fn tracked_lifecycle() -> (Lifecycle<&'static str>, Calls, Rc<RefCell<u32>>) {
    let destroyed: Calls = Rc::default();
    let ready = Rc::new(RefCell::new(0));

    let destroy_log = destroyed.clone();
    let ready_count = ready.clone();
    let lifecycle = Lifecycle::new(
        Some(Box::new(move || *ready_count.borrow_mut() += 1)),
        Some(Box::new(move |payload| destroy_log.borrow_mut().push(payload))),
    );
    (lifecycle, destroyed, ready)
}

fn blob() -> ImageBlob {
    ImageBlob {
        width: 1,
        height: 1,
        png: vec![1, 2, 3],
    }
}

#[test]
fn test_status_progression() {
    let (mut lifecycle, _, ready) = tracked_lifecycle();
    assert_eq!(lifecycle.status(), Status::Pending);

    lifecycle.set_status(Status::WaitForImage);
    assert_eq!(lifecycle.status(), Status::WaitForImage);

    lifecycle.set_status(Status::Ready);
    assert!(lifecycle.is_ready());
    assert_eq!(*ready.borrow(), 1);
}

#[test]
fn test_status_never_moves_backwards() {
    let (mut lifecycle, _, ready) = tracked_lifecycle();
    lifecycle.set_status(Status::Ready);
    lifecycle.set_status(Status::WaitForImage);
    lifecycle.set_status(Status::Ready);

    assert_eq!(lifecycle.status(), Status::Ready);
    assert_eq!(*ready.borrow(), 1);
}

#[test]
fn test_destroy_fires_once() {
    let (mut lifecycle, destroyed, _) = tracked_lifecycle();

    assert!(lifecycle.destroy(Some(blob())));
    assert!(!lifecycle.destroy(None));

    assert_eq!(destroyed.borrow().len(), 1);
    assert_eq!(destroyed.borrow()[0], Some(blob()));
    assert!(lifecycle.is_destroyed());
}

#[test]
fn test_destroyed_absorbs_status_changes() {
    let (mut lifecycle, destroyed, ready) = tracked_lifecycle();
    lifecycle.set_status(Status::WaitForImage);
    lifecycle.destroy(None);

    let tasks = lifecycle.set_status(Status::Ready);
    assert!(tasks.is_empty());
    assert_eq!(lifecycle.status(), Status::Destroyed);
    assert_eq!(*ready.borrow(), 0);
    assert_eq!(destroyed.borrow().len(), 1);
}

#[test]
fn test_setting_destroyed_status_destroys() {
    let (mut lifecycle, destroyed, _) = tracked_lifecycle();
    lifecycle.set_status(Status::Destroyed);
    lifecycle.set_status(Status::Destroyed);

    assert!(lifecycle.is_destroyed());
    assert_eq!(*destroyed.borrow(), vec![None]);
}

#[test]
fn test_replace_keeps_only_the_last_task() {
    let (mut lifecycle, _, _) = tracked_lifecycle();
    lifecycle.set_status(Status::WaitForImage);

    assert_eq!(lifecycle.when_ready("first", QueueMode::Replace), None);
    assert_eq!(lifecycle.when_ready("second", QueueMode::Replace), None);
    assert_eq!(lifecycle.queued(), 1);

    assert_eq!(lifecycle.set_status(Status::Ready), vec!["second"]);
    // The queue is one-shot
    assert!(lifecycle.set_status(Status::Ready).is_empty());
}

#[test]
fn test_append_and_clear() {
    let (mut lifecycle, _, _) = tracked_lifecycle();
    lifecycle.when_ready("a", QueueMode::Append);
    lifecycle.when_ready("b", QueueMode::Append);
    assert_eq!(lifecycle.queued(), 2);

    lifecycle.when_ready("c", QueueMode::Clear);
    assert_eq!(lifecycle.queued(), 0);

    lifecycle.when_ready("d", QueueMode::Append);
    assert_eq!(lifecycle.set_status(Status::Ready), vec!["d"]);
}

#[test]
fn test_ready_runs_tasks_immediately() {
    let (mut lifecycle, _, _) = tracked_lifecycle();
    lifecycle.set_status(Status::Ready);

    assert_eq!(lifecycle.when_ready("now", QueueMode::Replace), Some("now"));
    assert_eq!(lifecycle.when_ready("never", QueueMode::Clear), None);
    assert_eq!(lifecycle.queued(), 0);
}

#[test]
fn test_destroy_drops_queue() {
    let (mut lifecycle, _, _) = tracked_lifecycle();
    lifecycle.when_ready("task", QueueMode::Append);
    lifecycle.destroy(None);

    assert_eq!(lifecycle.queued(), 0);
    assert_eq!(lifecycle.when_ready("late", QueueMode::Append), None);
}

#[test]
fn test_status_names() {
    assert_eq!(Status::Pending.name(), "pending");
    assert_eq!(Status::WaitForImage.name(), "waitForImage");
    assert_eq!(Status::Ready.name(), "ready");
    assert_eq!(Status::Destroyed.name(), "destroyed");
}
