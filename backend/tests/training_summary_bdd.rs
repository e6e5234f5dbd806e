//! Behaviour tests for the training summary journey.
//!
//! Scenarios drive the domain ports over the in-memory store, so no
//! database is needed.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use backend::domain::{
    AchievementLevel, Error, ErrorCode, Grade, TrainingContent, TrainingDraft, TrainingId,
    TrainingResultDraft, TrainingResultEntry, TrainingSummary, TrainingType, UserDraft, UserId,
    UserName,
};
use backend::inbound::http::state::HttpStatePorts;
use backend::outbound::memory::MemoryStore;
use chrono::NaiveDate;
use mockable::DefaultClock;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;

struct SummaryWorld {
    runtime: Runtime,
    ports: HttpStatePorts,
    user_id: Option<UserId>,
    trainings: HashMap<String, TrainingId>,
    summary: Option<Result<TrainingSummary, Error>>,
}

impl SummaryWorld {
    fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            runtime: Runtime::new().expect("runtime"),
            ports: HttpStatePorts::from_repositories(
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
                store,
                Arc::new(DefaultClock),
            ),
            user_id: None,
            trainings: HashMap::new(),
            summary: None,
        }
    }

    fn run<T>(&self, future: impl Future<Output = T>) -> T {
        self.runtime.block_on(future)
    }

    fn user_id(&self) -> UserId {
        self.user_id.expect("user chosen in a Given step")
    }

    fn summary(&self) -> &TrainingSummary {
        match self.summary.as_ref().expect("summary requested") {
            Ok(summary) => summary,
            Err(err) => panic!("summary failed: {err}"),
        }
    }
}

fn training_type(label: &str) -> TrainingType {
    TrainingType::ALL
        .iter()
        .copied()
        .find(|kind| kind.label() == label)
        .unwrap_or_else(|| panic!("unknown training type {label}"))
}

fn achievement_level(label: &str) -> AchievementLevel {
    AchievementLevel::ALL
        .iter()
        .copied()
        .find(|level| level.label() == label)
        .unwrap_or_else(|| panic!("unknown achievement level {label}"))
}

#[fixture]
fn world() -> Mutex<SummaryWorld> {
    Mutex::new(SummaryWorld::new())
}

#[given("a registered user")]
fn a_registered_user(world: &Mutex<SummaryWorld>) {
    let mut world = world.lock().expect("world lock");
    let created = world
        .run(world.ports.users.create_user(UserDraft {
            name: UserName::new("Pupil").expect("valid name"),
            grade: Grade::new("5").expect("valid grade"),
            birthday: None,
            auth_subject: None,
        }))
        .expect("user created");
    world.user_id = Some(created.user.id);
}

#[given("an unregistered user")]
fn an_unregistered_user(world: &Mutex<SummaryWorld>) {
    let mut world = world.lock().expect("world lock");
    world.user_id = Some(UserId::random());
}

#[given("a {kind} training named {title}")]
fn a_training_named(world: &Mutex<SummaryWorld>, kind: String, title: String) {
    let mut world = world.lock().expect("world lock");
    let content = TrainingContent::new(TrainingDraft {
        training_type: i64::from(training_type(&kind).code()),
        title: title.clone(),
        ..TrainingDraft::default()
    })
    .expect("valid training");
    let training = world
        .run(world.ports.trainings.create(content))
        .expect("training created");
    world.trainings.insert(title, training.id);
}

#[when("the user records {level} for {title} on {date}")]
fn the_user_records(world: &Mutex<SummaryWorld>, level: String, title: String, date: String) {
    let world = world.lock().expect("world lock");
    let training_id = *world.trainings.get(&title).expect("training declared");
    let entry = TrainingResultEntry::new(TrainingResultDraft {
        user_id: world.user_id(),
        training_id,
        date: NaiveDate::parse_from_str(&date, "%Y-%m-%d").expect("ISO date"),
        achievement_level: i64::from(achievement_level(&level).code()),
        comment: None,
    })
    .expect("valid entry");
    world
        .run(world.ports.training_progress.record(entry))
        .expect("result recorded");
}

#[when("the summary is requested")]
fn the_summary_is_requested(world: &Mutex<SummaryWorld>) {
    let mut world = world.lock().expect("world lock");
    let user_id = world.user_id();
    let summary = world.run(world.ports.training_progress.summary(user_id));
    world.summary = Some(summary);
}

#[then("the summary total is {total}")]
fn the_summary_total_is(world: &Mutex<SummaryWorld>, total: u32) {
    let world = world.lock().expect("world lock");
    assert_eq!(world.summary().total_trainings_with_status, total);
}

#[then(
    "category {position} is {kind} with {needs_improvement} needs improvement, {achieved} achieved and {excellent} excellent"
)]
fn category_counts(
    world: &Mutex<SummaryWorld>,
    position: usize,
    kind: String,
    needs_improvement: u32,
    achieved: u32,
    excellent: u32,
) {
    let world = world.lock().expect("world lock");
    let category = world
        .summary()
        .categories
        .get(position - 1)
        .unwrap_or_else(|| panic!("no category at position {position}"));
    assert_eq!(category.training_type_label, kind);
    assert_eq!(category.needs_improvement, needs_improvement);
    assert_eq!(category.achieved, achieved);
    assert_eq!(category.excellent, excellent);
}

#[then("the summary has no categories")]
fn the_summary_has_no_categories(world: &Mutex<SummaryWorld>) {
    let world = world.lock().expect("world lock");
    assert!(world.summary().categories.is_empty());
}

#[then("the summary is not found")]
fn the_summary_is_not_found(world: &Mutex<SummaryWorld>) {
    let world = world.lock().expect("world lock");
    let err = world
        .summary
        .as_ref()
        .expect("summary requested")
        .as_ref()
        .expect_err("unknown user");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[scenario(
    path = "tests/features/training_summary.feature",
    name = "Only the latest result per training is counted"
)]
fn latest_result_per_training(world: Mutex<SummaryWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/training_summary.feature",
    name = "A later result on an older date does not replace the newer one"
)]
fn older_dates_do_not_replace(world: Mutex<SummaryWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/training_summary.feature",
    name = "A user without results has an empty summary"
)]
fn empty_summary(world: Mutex<SummaryWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/training_summary.feature",
    name = "An unknown user has no summary"
)]
fn unknown_user(world: Mutex<SummaryWorld>) {
    drop(world);
}
