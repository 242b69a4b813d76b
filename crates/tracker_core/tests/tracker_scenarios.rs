use tracker_core::{
    DocumentStore, Goal, GoalDraft, GoalPatch, Habit, HabitDraft, MemoryKvStore, Note, NoteDraft,
    NotePatch, ProgressStep, RecordId, RecordKind, Task, TaskDraft, TaskPatch, TrackerError,
    TrackerService,
};

fn fresh_service() -> TrackerService<MemoryKvStore> {
    TrackerService::open(DocumentStore::new(MemoryKvStore::new()))
}

#[test]
fn opening_empty_storage_yields_empty_collections() {
    let service = fresh_service();
    assert!(service.tasks().is_empty());
    assert!(service.habits().is_empty());
    assert!(service.goals().is_empty());
    assert!(service.notes().is_empty());
}

#[test]
fn task_completion_toggles_back_and_forth() {
    let mut service = fresh_service();
    let task = service.add::<Task>(TaskDraft::new("Buy milk")).unwrap();
    assert!(!task.completed);

    assert!(service.toggle_task_completion(&task.id).unwrap().completed);
    assert!(!service.toggle_task_completion(&task.id).unwrap().completed);
    assert!(!service.tasks()[0].completed);
}

#[test]
fn habit_streak_is_a_one_way_counter() {
    let mut service = fresh_service();
    let habit = service.add::<Habit>(HabitDraft::new("Run")).unwrap();
    assert_eq!(habit.streak, 0);
    assert!(!habit.completed_today);

    let on = service.toggle_habit_completion(&habit.id).unwrap();
    assert!(on.completed_today);
    assert_eq!(on.streak, 1);

    let off = service.toggle_habit_completion(&habit.id).unwrap();
    assert!(!off.completed_today);
    assert_eq!(off.streak, 1);

    let on_again = service.toggle_habit_completion(&habit.id).unwrap();
    assert_eq!(on_again.streak, 2);
}

#[test]
fn goal_progress_steps_and_clamps() {
    let mut service = fresh_service();
    let goal = service.add::<Goal>(GoalDraft::new("Read 12 books")).unwrap();
    assert_eq!(goal.progress, 0);

    for _ in 0..5 {
        service.adjust_goal_progress(&goal.id, 10).unwrap();
    }
    assert_eq!(service.find::<Goal>(&goal.id).unwrap().progress, 50);

    assert_eq!(service.adjust_goal_progress(&goal.id, 60).unwrap().progress, 100);
    assert_eq!(
        service
            .step_goal_progress(&goal.id, ProgressStep::Back)
            .unwrap()
            .progress,
        90
    );
    assert_eq!(service.adjust_goal_progress(&goal.id, -1000).unwrap().progress, 0);
    assert_eq!(service.adjust_goal_progress(&goal.id, 1000).unwrap().progress, 100);
}

#[test]
fn update_merges_fields_and_preserves_the_rest() {
    let mut service = fresh_service();
    let task = service
        .add::<Task>(TaskDraft::new("Write report").with_description("Q3"))
        .unwrap();
    service.toggle_task_completion(&task.id).unwrap();

    let updated = service
        .update::<Task>(
            &task.id,
            TaskPatch {
                title: Some("Write Q3 report".to_string()),
                ..TaskPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.id, task.id);
    assert_eq!(updated.title, "Write Q3 report");
    assert_eq!(updated.description.as_deref(), Some("Q3"));
    assert!(updated.completed);

    let goal = service.add::<Goal>(GoalDraft::new("Save")).unwrap();
    let goal = service
        .update::<Goal>(
            &goal.id,
            GoalPatch {
                progress: Some(-5),
                description: Some(Some("emergency fund".to_string())),
                ..GoalPatch::default()
            },
        )
        .unwrap();
    assert_eq!(goal.progress, 0);
    assert_eq!(goal.title, "Save");
}

#[test]
fn note_created_timestamp_is_stable_across_updates() {
    let mut service = fresh_service();
    let note = service
        .add::<Note>(NoteDraft::new("Ideas", "tracker core"))
        .unwrap();

    let updated = service
        .update::<Note>(
            &note.id,
            NotePatch {
                content: Some("tracker core in rust".to_string()),
                ..NotePatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.created, note.created);
    assert_eq!(updated.title, "Ideas");
    assert_eq!(updated.content, "tracker core in rust");
}

#[test]
fn missing_ids_surface_not_found_without_changes() {
    let mut service = fresh_service();
    service.add::<Task>(TaskDraft::new("keep me")).unwrap();
    let before = service.document().clone();
    let missing = RecordId::from("does-not-exist");

    let err = service
        .update::<Task>(&missing, TaskPatch::default())
        .unwrap_err();
    match err {
        TrackerError::NotFound { kind, id } => {
            assert_eq!(kind, RecordKind::Task);
            assert_eq!(id, missing);
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(service.toggle_habit_completion(&missing).unwrap_err().is_not_found());
    assert!(service.adjust_goal_progress(&missing, 10).unwrap_err().is_not_found());
    assert_eq!(service.document(), &before);
}

#[test]
fn remove_is_idempotent_and_silent_for_missing_ids() {
    let mut service = fresh_service();
    let keep = service.add::<Habit>(HabitDraft::new("Stretch")).unwrap();
    let gone = service.add::<Habit>(HabitDraft::new("Smoke")).unwrap();

    assert!(service.remove::<Habit>(&gone.id).unwrap());
    let after_once = service.document().clone();

    assert!(!service.remove::<Habit>(&gone.id).unwrap());
    assert_eq!(service.document(), &after_once);
    assert_eq!(service.habits().len(), 1);
    assert_eq!(service.habits()[0].id, keep.id);

    assert!(!service
        .remove_kind(RecordKind::Note, &RecordId::from("nothing"))
        .unwrap());
}

#[test]
fn collections_keep_insertion_order() {
    let mut service = fresh_service();
    for name in ["Meditate", "Journal", "Walk"] {
        service.add::<Habit>(HabitDraft::new(name)).unwrap();
    }
    let names: Vec<&str> = service.habits().iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, ["Meditate", "Journal", "Walk"]);
}
